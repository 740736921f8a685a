//! Recording session: clock, ledgers and artifacts for one optimization run.

use eg_types::{
    EgResult, Metadata, ResampleGrid, ResampledPoint, RunRecord, SessionConfig, SessionInfo,
};
use serde_json::Value;
use tracing::info;

use crate::clock::Clock;
use crate::incumbent::{IncumbentTracker, ObjectiveDirection};
use crate::ledger::{IncumbentLedger, RunLedger};
use crate::resample::resample;
use crate::store::{Artifact, RunLogStore};

/// Outcome of [`Session::observe`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub elapsed: f64,
    pub incumbent: bool,
}

/// Owns all recording state of one session.
#[derive(Debug)]
pub struct Session {
    config: SessionConfig,
    info: SessionInfo,
    clock: Clock,
    runs: RunLedger,
    incumbents: IncumbentLedger,
    tracker: IncumbentTracker,
}

impl Session {
    /// Create the session and its output directory. The clock is not started.
    pub fn new(config: SessionConfig, info: SessionInfo) -> EgResult<Self> {
        let store = RunLogStore::new(&config.output_dir, config.stamp.clone())?;
        info!(
            "Created session {} writing to {}",
            config.stamp,
            config.output_dir.display()
        );

        Ok(Self {
            config,
            info,
            clock: Clock::new(),
            runs: RunLedger::new(store),
            incumbents: IncumbentLedger::new(),
            tracker: IncumbentTracker::default(),
        })
    }

    /// Direction used by [`Session::observe`].
    pub fn with_direction(mut self, direction: ObjectiveDirection) -> Self {
        self.tracker = IncumbentTracker::new(direction);
        self
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn info(&self) -> &SessionInfo {
        &self.info
    }

    pub fn start_timer(&mut self) {
        self.clock.start();
        info!("Session {} timer started", self.config.stamp);
    }

    pub fn elapsed(&self) -> EgResult<f64> {
        self.clock.elapsed()
    }

    pub fn record_run(&mut self, config: Value, metadata: Metadata) -> EgResult<f64> {
        self.runs.record(&self.clock, config, metadata)
    }

    pub fn record_incumbent(&mut self, config: Value, metadata: Metadata) -> EgResult<f64> {
        self.incumbents
            .record_incumbent(&mut self.runs, &self.clock, config, metadata)
    }

    /// Record a run, as an incumbent if `objective` beats the best so far.
    pub fn observe(
        &mut self,
        config: Value,
        metadata: Metadata,
        objective: f64,
    ) -> EgResult<Observation> {
        let incumbent = self.tracker.improves(objective);
        let elapsed = if incumbent {
            let elapsed = self.record_incumbent(config, metadata)?;
            self.tracker.update_best(objective);
            elapsed
        } else {
            self.record_run(config, metadata)?
        };

        Ok(Observation { elapsed, incumbent })
    }

    pub fn run_trajectory(&self) -> &[RunRecord] {
        self.runs.trajectory()
    }

    pub fn incumbent_trajectory(&self) -> &[RunRecord] {
        self.incumbents.trajectory()
    }

    pub fn best_objective(&self) -> Option<f64> {
        self.tracker.best
    }

    pub fn artifact_path(&self, artifact: Artifact) -> std::path::PathBuf {
        self.runs.store().path(artifact)
    }

    /// Rewrite the run log from memory.
    pub fn save(&self) -> EgResult<()> {
        self.runs.flush(self.runs.trajectory())?;
        info!(
            "Saved {} runs to {}",
            self.runs.len(),
            self.artifact_path(Artifact::Runs).display()
        );
        Ok(())
    }

    /// Resample the run ledger and write it. Config errors surface before
    /// any file is touched.
    pub fn save_resampled(&self) -> EgResult<Vec<ResampledPoint>> {
        let grid = self.config.resample_grid()?;
        self.write_resampled(self.runs.trajectory(), &grid, Artifact::RunsTransformed)
    }

    pub fn save_resampled_incumbents(&self) -> EgResult<Vec<ResampledPoint>> {
        let grid = self.config.resample_grid()?;
        self.write_resampled(
            self.incumbents.trajectory(),
            &grid,
            Artifact::IncumbentsTransformed,
        )
    }

    pub fn save_info(&self) -> EgResult<()> {
        let text = format!("stamp: {}\n{}", self.config.stamp, self.info.to_text());
        self.runs.store().write_text(Artifact::Info, &text)
    }

    /// Empty the run log on disk, e.g. before reusing a stamp.
    pub fn clean_files(&self) -> EgResult<()> {
        self.runs.reset_artifact()
    }

    fn write_resampled(
        &self,
        records: &[RunRecord],
        grid: &ResampleGrid,
        artifact: Artifact,
    ) -> EgResult<Vec<ResampledPoint>> {
        let points = resample(records, grid);
        self.runs.store().rewrite(artifact, &points)?;

        let placeholders = points.iter().filter(|p| p.is_placeholder()).count();
        info!(
            "Resampled {} records onto {} grid points ({} placeholders, {} windows) -> {}",
            records.len(),
            points.len(),
            placeholders,
            grid.mode,
            self.artifact_path(artifact).display()
        );
        Ok(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eg_types::{EgError, WindowMode};
    use serde_json::json;
    use tempfile::tempdir;

    fn session(dir: &std::path::Path) -> Session {
        let config = SessionConfig::new(dir)
            .with_stamp("unit")
            .with_total_runtime(2.0)
            .with_time_precision(0.5);
        Session::new(config, SessionInfo::new().with("dataset", "iris")).unwrap()
    }

    #[test]
    fn observe_routes_improvements_to_incumbents() {
        let temp_dir = tempdir().unwrap();
        let mut s = session(temp_dir.path()).with_direction(ObjectiveDirection::Minimize);
        s.start_timer();

        let first = s.observe(json!("A"), Metadata::new().with("loss", 0.9), 0.9).unwrap();
        let worse = s.observe(json!("B"), Metadata::new().with("loss", 1.2), 1.2).unwrap();
        let better = s.observe(json!("C"), Metadata::new().with("loss", 0.4), 0.4).unwrap();

        assert!(first.incumbent);
        assert!(!worse.incumbent);
        assert!(better.incumbent);
        assert_eq!(s.run_trajectory().len(), 3);

        let inc_evals: Vec<usize> = s
            .incumbent_trajectory()
            .iter()
            .map(|r| r.eval_index)
            .collect();
        assert_eq!(inc_evals, vec![1, 3]);
        assert_eq!(s.best_objective(), Some(0.4));
    }

    #[test]
    fn failed_observe_keeps_best() {
        let temp_dir = tempdir().unwrap();
        let mut s = session(temp_dir.path());
        s.start_timer();

        let err = s
            .observe(json!("A"), Metadata::new().with("config", 1), 0.1)
            .unwrap_err();
        assert!(matches!(err, EgError::ReservedKeyConflict { .. }));
        assert_eq!(s.best_objective(), None);
        assert!(s.incumbent_trajectory().is_empty());
    }

    #[test]
    fn resample_without_config_writes_nothing() {
        let temp_dir = tempdir().unwrap();
        let config = SessionConfig::new(temp_dir.path()).with_stamp("bare");
        let mut s = Session::new(config, SessionInfo::new()).unwrap();
        s.start_timer();
        s.record_run(json!("A"), Metadata::new()).unwrap();

        assert!(matches!(
            s.save_resampled(),
            Err(EgError::MissingResampleConfig)
        ));
        assert!(!s.artifact_path(Artifact::RunsTransformed).exists());
    }

    #[test]
    fn save_info_writes_text() {
        let temp_dir = tempdir().unwrap();
        let s = session(temp_dir.path());
        s.save_info().unwrap();

        let text = std::fs::read_to_string(s.artifact_path(Artifact::Info)).unwrap();
        assert!(text.starts_with("stamp: unit\n"));
        assert!(text.contains("dataset: iris\n"));
    }

    #[test]
    fn resampled_incumbents_use_configured_mode() {
        let temp_dir = tempdir().unwrap();
        let config = SessionConfig::new(temp_dir.path())
            .with_stamp("inc")
            .with_total_runtime(1.0)
            .with_time_precision(1.0)
            .with_window_mode(WindowMode::Stamped);
        let mut s = Session::new(config, SessionInfo::new()).unwrap();
        s.start_timer();
        s.record_incumbent(json!("A"), Metadata::new()).unwrap();

        let points = s.save_resampled_incumbents().unwrap();
        assert_eq!(points.len(), 2);
        // the single incumbent was recorded well before t=1
        assert_eq!(points[1].record().map(|r| r.eval_index), Some(1));
        assert!(s.artifact_path(Artifact::IncumbentsTransformed).exists());
    }
}
