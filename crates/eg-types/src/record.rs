//! Run records, caller metadata, and resampled grid points.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::{EgError, EgResult};

/// Field names owned by the record itself; caller metadata may not use them.
pub const RESERVED_KEYS: [&str; 3] = ["time", "eval", "config"];

/// Caller-supplied information attached to a run (scores, budgets, seeds...).
///
/// Serialized transparently as a JSON object so its keys land next to
/// `time`, `eval` and `config` in the run log.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Metadata(Map<String, Value>);

impl Metadata {
    pub fn new() -> Self {
        Self(Map::new())
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        self.0.insert(key.into(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }

    /// Fails on the first reserved key found.
    pub fn validate(&self) -> EgResult<()> {
        match RESERVED_KEYS.iter().find(|key| self.0.contains_key(**key)) {
            Some(key) => Err(EgError::ReservedKeyConflict {
                key: key.to_string(),
            }),
            None => Ok(()),
        }
    }
}

impl From<Map<String, Value>> for Metadata {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Metadata {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// One evaluated configuration, stamped with its sequence index and the
/// elapsed session time at which it was recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunRecord {
    /// Seconds since the session clock was started.
    #[serde(rename = "time")]
    pub elapsed_time: f64,

    /// 1-based position in the ledger.
    #[serde(rename = "eval")]
    pub eval_index: usize,

    /// Opaque configuration value supplied by the optimizer.
    pub config: Value,

    #[serde(flatten)]
    pub metadata: Metadata,
}

impl RunRecord {
    pub fn new(
        eval_index: usize,
        elapsed_time: f64,
        config: Value,
        metadata: Metadata,
    ) -> EgResult<Self> {
        metadata.validate()?;
        Ok(Self {
            elapsed_time,
            eval_index,
            config,
            metadata,
        })
    }

    /// Copy of this record with its time replaced by `time`.
    pub fn at_time(&self, time: f64) -> Self {
        Self {
            elapsed_time: time,
            ..self.clone()
        }
    }
}

/// A point of a resampled series.
///
/// Variant order matters for untagged deserialization: a placeholder line
/// only carries `time`, so `Run` has to be tried first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResampledPoint {
    /// Forward-filled run with the grid time substituted.
    Run(RunRecord),
    /// Grid time before any run happened.
    Placeholder { time: f64 },
}

impl ResampledPoint {
    pub fn time(&self) -> f64 {
        match self {
            Self::Run(record) => record.elapsed_time,
            Self::Placeholder { time } => *time,
        }
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self, Self::Placeholder { .. })
    }

    pub fn record(&self) -> Option<&RunRecord> {
        match self {
            Self::Run(record) => Some(record),
            Self::Placeholder { .. } => None,
        }
    }
}
