//! Append-only run and incumbent ledgers.

use eg_types::{EgResult, Metadata, RunRecord};
use serde_json::Value;
use tracing::debug;

use crate::clock::Clock;
use crate::store::{Artifact, RunLogStore};

/// Every evaluated configuration, in evaluation order, mirrored to the run log.
#[derive(Debug)]
pub struct RunLedger {
    records: Vec<RunRecord>,
    store: RunLogStore,
}

impl RunLedger {
    pub fn new(store: RunLogStore) -> Self {
        Self {
            records: Vec::new(),
            store,
        }
    }

    /// Stamp, append and persist a run. Returns the elapsed time used.
    pub fn record(&mut self, clock: &Clock, config: Value, metadata: Metadata) -> EgResult<f64> {
        self.record_entry(clock, config, metadata)
            .map(|record| record.elapsed_time)
    }

    /// Like [`RunLedger::record`] but hands back the appended record.
    ///
    /// Nothing is appended in memory unless the line reached the run log.
    pub fn record_entry(
        &mut self,
        clock: &Clock,
        config: Value,
        metadata: Metadata,
    ) -> EgResult<&RunRecord> {
        metadata.validate()?;
        let elapsed = clock.elapsed()?;
        let record = RunRecord::new(self.records.len() + 1, elapsed, config, metadata)?;

        self.store
            .append(Artifact::Runs, std::slice::from_ref(&record))?;
        debug!("Recorded run {} at {:.3}s", record.eval_index, elapsed);
        self.records.push(record);

        Ok(&self.records[self.records.len() - 1])
    }

    pub fn trajectory(&self) -> &[RunRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rewrite the run log with exactly `records`.
    pub fn flush(&self, records: &[RunRecord]) -> EgResult<()> {
        self.store.rewrite(Artifact::Runs, records)
    }

    /// Empty the run log on disk; in-memory records are kept.
    pub fn reset_artifact(&self) -> EgResult<()> {
        self.store.truncate(Artifact::Runs)
    }

    pub fn store(&self) -> &RunLogStore {
        &self.store
    }
}

/// Runs the caller designated as improvements. Kept in memory only.
#[derive(Debug, Default)]
pub struct IncumbentLedger {
    records: Vec<RunRecord>,
}

impl IncumbentLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the run in `runs` first, then mirror that record here.
    pub fn record_incumbent(
        &mut self,
        runs: &mut RunLedger,
        clock: &Clock,
        config: Value,
        metadata: Metadata,
    ) -> EgResult<f64> {
        let record = runs.record_entry(clock, config, metadata)?.clone();
        let elapsed = record.elapsed_time;

        debug!("Run {} is the new incumbent", record.eval_index);
        self.records.push(record);
        Ok(elapsed)
    }

    pub fn trajectory(&self) -> &[RunRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
