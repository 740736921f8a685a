//! Batch resampling of existing run logs.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use eg_ledger::{read_records, resample, write_records};
use eg_types::{EgError, EgResult, ResampleGrid, RunRecord, WindowMode};
use rayon::prelude::*;
use tracing::{info, warn};

pub const HORIZON_VAR: &str = "EQUIGRID_HORIZON";
pub const PRECISION_VAR: &str = "EQUIGRID_PRECISION";
pub const WINDOW_VAR: &str = "EQUIGRID_WINDOW";
pub const OUTPUT_DIR_VAR: &str = "EQUIGRID_OUTPUT_DIR";

/// Settings for a batch run, read from the environment.
#[derive(Debug, Clone, PartialEq)]
pub struct ResampleSettings {
    pub grid: ResampleGrid,
    /// Write outputs here instead of next to each input.
    pub output_dir: Option<PathBuf>,
}

impl ResampleSettings {
    pub fn from_env() -> EgResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> EgResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let horizon = parse_seconds(&lookup, HORIZON_VAR)?;
        let precision = parse_seconds(&lookup, PRECISION_VAR)?;
        let mode = match lookup(WINDOW_VAR) {
            Some(raw) => raw.parse::<WindowMode>()?,
            None => WindowMode::default(),
        };

        let grid = match (horizon, precision) {
            (Some(h), Some(p)) => ResampleGrid::new(h, p, mode)?,
            _ => return Err(EgError::MissingResampleConfig),
        };

        Ok(Self {
            grid,
            output_dir: lookup(OUTPUT_DIR_VAR).map(PathBuf::from),
        })
    }

    /// `<stem>_transformed.json`, next to the input unless an output dir is set.
    pub fn output_path(&self, input: &Path) -> PathBuf {
        let stem = input
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("runs");
        let name = format!("{stem}_transformed.json");
        match &self.output_dir {
            Some(dir) => dir.join(name),
            None => input.with_file_name(name),
        }
    }
}

fn parse_seconds<F>(lookup: &F, key: &str) -> EgResult<Option<f64>>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<f64>()
                .map_err(|e| eg_types::config_error!("{key}='{raw}' is not a number: {e}"))
        })
        .transpose()
}

/// Result of resampling one file.
#[derive(Debug)]
pub struct FileOutcome {
    pub input: PathBuf,
    pub result: EgResult<(PathBuf, usize)>,
}

/// Resample a single run log and write the series. Returns the output path
/// and the number of grid points written.
pub fn resample_file(input: &Path, settings: &ResampleSettings) -> EgResult<(PathBuf, usize)> {
    let records: Vec<RunRecord> = read_records(input)?;
    if records.is_empty() {
        warn!("{} holds no runs; output will be placeholders only", input.display());
    }

    let points = resample(&records, &settings.grid);
    let output = settings.output_path(input);
    write_records(&output, &points)?;

    info!(
        "Resampled {} runs from {} -> {} ({} points)",
        records.len(),
        input.display(),
        output.display(),
        points.len()
    );
    Ok((output, points.len()))
}

/// Resample every input in parallel. Outcomes keep input order.
///
/// Inputs whose output paths coincide are all rejected up front and none of
/// them is written.
pub fn resample_all(inputs: &[PathBuf], settings: &ResampleSettings) -> Vec<FileOutcome> {
    let mut targets: HashMap<PathBuf, usize> = HashMap::new();
    for input in inputs {
        *targets.entry(settings.output_path(input)).or_default() += 1;
    }

    inputs
        .par_iter()
        .map(|input| {
            let output = settings.output_path(input);
            let result = if targets.get(&output).copied().unwrap_or(0) > 1 {
                Err(eg_types::config_error!(
                    "{} would be written by more than one input",
                    output.display()
                ))
            } else {
                resample_file(input, settings)
            };
            FileOutcome {
                input: input.clone(),
                result,
            }
        })
        .collect()
}
