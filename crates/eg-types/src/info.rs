use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Descriptive information about a session (dataset, optimizer, seed...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionInfo {
    pub created_at: DateTime<Utc>,
    pub entries: Map<String, Value>,
}

impl SessionInfo {
    pub fn new() -> Self {
        Self {
            created_at: Utc::now(),
            entries: Map::new(),
        }
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.entries.insert(key.into(), value.into());
        self
    }

    /// Render as `key: value` lines. Strings are written without quotes.
    pub fn to_text(&self) -> String {
        let mut text = format!("created_at: {}\n", self.created_at.to_rfc3339());
        for (key, value) in &self.entries {
            match value {
                Value::String(s) => text.push_str(&format!("{key}: {s}\n")),
                other => text.push_str(&format!("{key}: {other}\n")),
            }
        }
        text
    }
}

impl Default for SessionInfo {
    fn default() -> Self {
        Self::new()
    }
}
