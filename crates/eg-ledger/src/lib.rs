//! # eg-ledger
//!
//! Trajectory recording for iterative optimizers. Runs are stamped with
//! the elapsed session time and appended to a newline-delimited JSON run
//! log as they happen; at the end of a session the log can be resampled
//! onto an equidistant time grid so runs of different length, speed or
//! seed line up on a common axis.

mod clock;
mod incumbent;
mod ledger;
mod resample;
mod session;
mod store;

pub use clock::Clock;
pub use incumbent::{IncumbentTracker, ObjectiveDirection};
pub use ledger::{IncumbentLedger, RunLedger};
pub use resample::{active_index, resample};
pub use session::{Observation, Session};
pub use store::{read_records, write_records, Artifact, RunLogStore};
