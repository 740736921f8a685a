use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use eg_types::{EgError, EgResult, RunRecord};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Files a session can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Artifact {
    /// Every run, appended as it is recorded.
    Runs,
    /// Runs resampled onto the time grid.
    RunsTransformed,
    /// Incumbents resampled onto the time grid.
    IncumbentsTransformed,
    /// `key: value` session description.
    Info,
}

impl Artifact {
    pub fn file_name(&self, stamp: &str) -> String {
        match self {
            Artifact::Runs => format!("statistics_runs_{stamp}.json"),
            Artifact::RunsTransformed => format!("statistics_runs_transformed_{stamp}.json"),
            Artifact::IncumbentsTransformed => {
                format!("statistics_incumbents_transformed_{stamp}.json")
            }
            Artifact::Info => format!("statistics_info_{stamp}.txt"),
        }
    }
}

/// Storage manager for newline-delimited JSON run logs.
///
/// Every call opens, writes, flushes and closes its own handle.
#[derive(Debug, Clone)]
pub struct RunLogStore {
    pub output_dir: PathBuf,
    pub stamp: String,
}

impl RunLogStore {
    pub fn new<P: AsRef<Path>>(output_dir: P, stamp: impl Into<String>) -> EgResult<Self> {
        let output_dir = output_dir.as_ref().to_path_buf();
        fs::create_dir_all(&output_dir)?;

        Ok(Self {
            output_dir,
            stamp: stamp.into(),
        })
    }

    pub fn path(&self, artifact: Artifact) -> PathBuf {
        self.output_dir.join(artifact.file_name(&self.stamp))
    }

    /// Append rows to `artifact`, one JSON object per line, creating it if needed.
    pub fn append<T: Serialize>(&self, artifact: Artifact, rows: &[T]) -> EgResult<()> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.path(artifact))?;
        write_lines(file, rows)
    }

    /// Replace the contents of `artifact` with `rows`.
    pub fn rewrite<T: Serialize>(&self, artifact: Artifact, rows: &[T]) -> EgResult<()> {
        let file = File::create(self.path(artifact))?;
        write_lines(file, rows)
    }

    /// Create `artifact` empty, discarding anything it held.
    pub fn truncate(&self, artifact: Artifact) -> EgResult<()> {
        File::create(self.path(artifact))?;
        Ok(())
    }

    pub fn write_text(&self, artifact: Artifact, text: &str) -> EgResult<()> {
        fs::write(self.path(artifact), text)?;
        Ok(())
    }

    pub fn read_runs(&self) -> EgResult<Vec<RunRecord>> {
        read_records(self.path(Artifact::Runs))
    }
}

fn write_lines<T: Serialize>(file: File, rows: &[T]) -> EgResult<()> {
    let mut writer = BufWriter::new(file);
    for row in rows {
        serde_json::to_writer(&mut writer, row)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    Ok(())
}

/// Read a newline-delimited JSON file back. Blank lines are skipped.
pub fn read_records<T: DeserializeOwned, P: AsRef<Path>>(path: P) -> EgResult<Vec<T>> {
    let reader = BufReader::new(File::open(path)?);
    let mut rows = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let row = serde_json::from_str(&line).map_err(|e| EgError::Corrupt {
            line: idx + 1,
            message: e.to_string(),
        })?;
        rows.push(row);
    }

    Ok(rows)
}

/// Write rows to an arbitrary path, replacing its contents.
pub fn write_records<T: Serialize, P: AsRef<Path>>(path: P, rows: &[T]) -> EgResult<()> {
    if let Some(parent) = path.as_ref().parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    write_lines(File::create(path)?, rows)
}
