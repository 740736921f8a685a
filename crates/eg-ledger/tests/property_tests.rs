//! Property-based tests for resampling and run-log persistence.

use eg_ledger::{active_index, read_records, resample, write_records};
use eg_types::{Metadata, ResampleGrid, RunRecord, WindowMode, RESERVED_KEYS};
use proptest::prelude::*;
use serde_json::json;
use tempfile::tempdir;

/// Ledgers with non-decreasing times, as produced by a running clock.
fn arb_ledger(max_len: usize) -> impl Strategy<Value = Vec<RunRecord>> {
    prop::collection::vec((0.0f64..5.0, -100.0f64..100.0), 0..max_len).prop_map(|steps| {
        let mut t = 0.0;
        steps
            .into_iter()
            .enumerate()
            .map(|(i, (dt, score))| {
                t += dt;
                RunRecord::new(i + 1, t, json!({"x": i}), Metadata::new().with("score", score))
                    .unwrap()
            })
            .collect()
    })
}

fn arb_mode() -> impl Strategy<Value = WindowMode> {
    prop_oneof![Just(WindowMode::Cumulative), Just(WindowMode::Stamped)]
}

fn arb_grid() -> impl Strategy<Value = ResampleGrid> {
    (0.0f64..60.0, 0.25f64..10.0, arb_mode())
        .prop_map(|(h, p, mode)| ResampleGrid::new(h, p, mode).unwrap())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property: one point per grid step, each stamped with its grid time
    #[test]
    fn prop_points_follow_grid(records in arb_ledger(30), grid in arb_grid()) {
        let points = resample(&records, &grid);
        let times: Vec<f64> = grid.times().collect();

        prop_assert_eq!(points.len(), times.len());
        for (point, t) in points.iter().zip(times) {
            prop_assert_eq!(point.time(), t);
        }
    }

    /// Property: placeholders appear exactly before the first run
    #[test]
    fn prop_placeholders_only_before_first_run(records in arb_ledger(30), grid in arb_grid()) {
        let points = resample(&records, &grid);
        for point in &points {
            let expect_placeholder = records
                .first()
                .map_or(true, |first| point.time() < first.elapsed_time);
            prop_assert_eq!(point.is_placeholder(), expect_placeholder);
        }
    }

    /// Property: resampling an unchanged ledger twice gives identical output
    #[test]
    fn prop_resample_idempotent(records in arb_ledger(30), grid in arb_grid()) {
        prop_assert_eq!(resample(&records, &grid), resample(&records, &grid));
    }

    /// Property: stamped windows never look ahead and never skip a run
    #[test]
    fn prop_stamped_picks_latest_started_run(records in arb_ledger(30), t in 0.0f64..200.0) {
        if let Some(idx) = active_index(&records, t, WindowMode::Stamped) {
            prop_assert!(records[idx].elapsed_time <= t);
            if let Some(next) = records.get(idx + 1) {
                prop_assert!(next.elapsed_time > t);
            }
        }
    }

    /// Property: forward-filled points carry a real run's payload
    #[test]
    fn prop_filled_points_copy_a_run(records in arb_ledger(30), grid in arb_grid()) {
        for point in resample(&records, &grid) {
            if let Some(filled) = point.record() {
                let source = &records[filled.eval_index - 1];
                prop_assert_eq!(&filled.config, &source.config);
                prop_assert_eq!(&filled.metadata, &source.metadata);
            }
        }
    }

    /// Property: a full rewrite reads back equal to what was written
    #[test]
    fn prop_run_log_round_trip(records in arb_ledger(20)) {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("runs.json");
        write_records(&path, &records).unwrap();

        let back: Vec<RunRecord> = read_records(&path).unwrap();
        prop_assert_eq!(back, records);
    }

    /// Property: reserved keys are rejected whatever else the metadata holds
    #[test]
    fn prop_reserved_keys_rejected(
        key_idx in 0usize..RESERVED_KEYS.len(),
        extra in prop::collection::btree_map("[a-z]{4,8}", -10i64..10, 0..5)
    ) {
        let mut metadata: Metadata = extra.into_iter().collect();
        metadata.insert(RESERVED_KEYS[key_idx], 1);
        prop_assert!(RunRecord::new(1, 0.0, json!(null), metadata).is_err());
    }
}
