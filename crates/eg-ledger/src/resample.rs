//! Forward-fill resampling of an irregular run log onto a fixed time grid.
//!
//! Every grid time `t` yields exactly one point. Before the first run a
//! placeholder carrying only `t` is emitted; afterwards the active run is
//! copied with its time replaced by `t`. Which run counts as active is
//! decided by the grid's [`WindowMode`].

use eg_types::{ResampleGrid, ResampledPoint, RunRecord, WindowMode};

/// Resample `records` onto `grid`. An empty slice yields only placeholders.
pub fn resample(records: &[RunRecord], grid: &ResampleGrid) -> Vec<ResampledPoint> {
    grid.times()
        .map(|t| match active_index(records, t, grid.mode) {
            Some(idx) => ResampledPoint::Run(records[idx].at_time(t)),
            None => ResampledPoint::Placeholder { time: t },
        })
        .collect()
}

/// Index of the run active at `t`, or `None` if no run has happened yet.
pub fn active_index(records: &[RunRecord], t: f64, mode: WindowMode) -> Option<usize> {
    let first = records.first()?;
    if t < first.elapsed_time {
        return None;
    }

    let idx = match mode {
        WindowMode::Cumulative => cumulative_index(records, t),
        WindowMode::Stamped => records
            .iter()
            .rposition(|r| r.elapsed_time <= t)
            .unwrap_or(0),
    };
    Some(idx)
}

/// Window `i` spans `(acc_i, acc_i + time_{i+1}]` where `acc_i` is the sum of
/// the `time` values of records `0..=i`. Past the last window the final
/// record is active. Grid times no window covers (a single-record ledger,
/// or `t` equal to the first record's time) fall back to the first record.
fn cumulative_index(records: &[RunRecord], t: f64) -> usize {
    let last_pair = records.len().saturating_sub(2);
    let mut acc = 0.0;

    for (i, pair) in records.windows(2).enumerate() {
        acc += pair[0].elapsed_time;
        let upper = acc + pair[1].elapsed_time;
        if t > acc && t <= upper {
            return i;
        }
        if i == last_pair && t > upper {
            return i + 1;
        }
    }

    0
}
