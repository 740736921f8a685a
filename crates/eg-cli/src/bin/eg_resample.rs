use std::path::PathBuf;

use eg_cli::{resample_all, ResampleSettings, HORIZON_VAR, PRECISION_VAR};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let inputs: Vec<PathBuf> = std::env::args_os().skip(1).map(PathBuf::from).collect();
    if inputs.is_empty() {
        anyhow::bail!(
            "usage: {HORIZON_VAR}=<seconds> {PRECISION_VAR}=<seconds> eg-resample <run-log>..."
        );
    }

    let settings = ResampleSettings::from_env()?;
    info!(
        "Resampling {} run logs: horizon {}s, precision {}s, {} windows",
        inputs.len(),
        settings.grid.horizon,
        settings.grid.precision,
        settings.grid.mode
    );

    let outcomes = resample_all(&inputs, &settings);
    let mut failed = 0;
    for outcome in &outcomes {
        if let Err(e) = &outcome.result {
            error!("Failed to resample {}: {}", outcome.input.display(), e);
            failed += 1;
        }
    }

    if failed > 0 {
        anyhow::bail!("{failed} of {} run logs failed", outcomes.len());
    }
    Ok(())
}
