//! Session configuration and resample grid settings.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use uuid::Uuid;

use crate::errors::{EgError, EgResult};

/// Slack applied when counting grid steps so `H / Δ` landing a hair below
/// an integer still yields the final point.
const GRID_EPSILON: f64 = 1e-9;

/// Upper bound on resampled points per series (ten million).
pub const MAX_GRID_POINTS: usize = 10_000_000;

/// How the resampler decides which run is active at a grid time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WindowMode {
    /// Window boundaries are running sums of the records' `time` values.
    /// This is what existing resampled artifacts were produced with.
    #[default]
    Cumulative,
    /// The active run is the last one whose own `time` is at or before the
    /// grid time.
    Stamped,
}

impl fmt::Display for WindowMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WindowMode::Cumulative => write!(f, "cumulative"),
            WindowMode::Stamped => write!(f, "stamped"),
        }
    }
}

impl FromStr for WindowMode {
    type Err = EgError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cumulative" => Ok(WindowMode::Cumulative),
            "stamped" => Ok(WindowMode::Stamped),
            other => Err(crate::config_error!(
                "unknown window mode '{}', expected 'cumulative' or 'stamped'",
                other
            )),
        }
    }
}

/// A validated resample grid: `0, Δ, 2Δ, …` up to and including `horizon`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResampleGrid {
    pub horizon: f64,
    pub precision: f64,
    pub mode: WindowMode,
}

impl ResampleGrid {
    pub fn new(horizon: f64, precision: f64, mode: WindowMode) -> EgResult<Self> {
        if !precision.is_finite() || precision <= 0.0 {
            return Err(crate::resample_error!(
                "time precision must be a positive finite number, got {}",
                precision
            ));
        }
        if !horizon.is_finite() || horizon < 0.0 {
            return Err(crate::resample_error!(
                "total runtime must be a non-negative finite number, got {}",
                horizon
            ));
        }
        let points = (horizon / precision + GRID_EPSILON).floor() + 1.0;
        if points > MAX_GRID_POINTS as f64 {
            return Err(crate::resample_error!(
                "grid of {} over {}s yields {} points, more than the maximum of {}",
                precision,
                horizon,
                points,
                MAX_GRID_POINTS
            ));
        }
        Ok(Self {
            horizon,
            precision,
            mode,
        })
    }

    /// Number of grid points, both ends included. Never above
    /// [`MAX_GRID_POINTS`], even for a grid built without [`ResampleGrid::new`].
    pub fn point_count(&self) -> usize {
        let steps = (self.horizon / self.precision + GRID_EPSILON).floor();
        if steps.is_nan() || steps < 0.0 {
            return 1;
        }
        (steps.min((MAX_GRID_POINTS - 1) as f64) as usize) + 1
    }

    /// Grid times, computed as `k * Δ` so no rounding error accumulates.
    pub fn times(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.point_count()).map(move |k| k as f64 * self.precision)
    }
}

/// Configuration of one recording session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Directory all artifacts are written to; created if missing.
    pub output_dir: PathBuf,

    /// Identifier embedded in every artifact file name.
    pub stamp: String,

    /// Total runtime the resampled grid must cover.
    pub total_runtime: Option<f64>,

    /// Step between resampled grid points.
    pub time_precision: Option<f64>,

    pub window_mode: WindowMode,
}

impl SessionConfig {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
            stamp: Uuid::new_v4().to_string(),
            total_runtime: None,
            time_precision: None,
            window_mode: WindowMode::default(),
        }
    }

    pub fn with_stamp(mut self, stamp: impl fmt::Display) -> Self {
        self.stamp = stamp.to_string();
        self
    }

    pub fn with_total_runtime(mut self, seconds: f64) -> Self {
        self.total_runtime = Some(seconds);
        self
    }

    pub fn with_time_precision(mut self, seconds: f64) -> Self {
        self.time_precision = Some(seconds);
        self
    }

    pub fn with_window_mode(mut self, mode: WindowMode) -> Self {
        self.window_mode = mode;
        self
    }

    /// Resolve the resample grid; both runtime and precision must be set.
    pub fn resample_grid(&self) -> EgResult<ResampleGrid> {
        match (self.total_runtime, self.time_precision) {
            (Some(horizon), Some(precision)) => {
                ResampleGrid::new(horizon, precision, self.window_mode)
            }
            _ => Err(EgError::MissingResampleConfig),
        }
    }
}
