use eg_ledger::{Artifact, ObjectiveDirection, Session};
use eg_types::{Metadata, SessionConfig, SessionInfo, WindowMode};
use serde_json::json;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let output_dir = std::env::temp_dir().join("equigrid-basic-usage");
    let config = SessionConfig::new(&output_dir)
        .with_stamp(1)
        .with_total_runtime(0.05)
        .with_time_precision(0.01)
        .with_window_mode(WindowMode::Stamped);
    let info = SessionInfo::new()
        .with("dataset", "synthetic")
        .with("optimizer", "random");

    let mut session = Session::new(config, info)?.with_direction(ObjectiveDirection::Minimize);
    session.clean_files()?;
    session.start_timer();

    for i in 0..8 {
        let c = 0.1 * (i as f64 + 1.0);
        let loss = (c - 0.45).powi(2);
        std::thread::sleep(std::time::Duration::from_millis(4));

        let obs = session.observe(json!({"C": c}), Metadata::new().with("loss", loss), loss)?;
        println!(
            "eval {:>2} at {:.4}s loss {:.4}{}",
            i + 1,
            obs.elapsed,
            loss,
            if obs.incumbent { "  (incumbent)" } else { "" }
        );
    }

    session.save_info()?;
    let points = session.save_resampled()?;
    println!(
        "{} grid points written to {}",
        points.len(),
        session.artifact_path(Artifact::RunsTransformed).display()
    );
    Ok(())
}
