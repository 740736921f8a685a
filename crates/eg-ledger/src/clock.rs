//! Session clock.

use std::time::Instant;

use eg_types::{EgError, EgResult};
use tracing::warn;

/// Monotonic elapsed-time source for one session.
#[derive(Debug, Clone, Default)]
pub struct Clock {
    start_instant: Option<Instant>,
}

impl Clock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the session origin to now. Calling it again moves the origin.
    pub fn start(&mut self) {
        if self.start_instant.is_some() {
            warn!("Session clock restarted; earlier timestamps are no longer comparable");
        }
        self.start_instant = Some(Instant::now());
    }

    pub fn is_started(&self) -> bool {
        self.start_instant.is_some()
    }

    /// Seconds since [`Clock::start`].
    pub fn elapsed(&self) -> EgResult<f64> {
        self.start_instant
            .map(|start| start.elapsed().as_secs_f64())
            .ok_or(EgError::NotStarted)
    }
}
