// Property-based tests for sequencing and classification.
// CI: 256 cases (default). Soak: PROPTEST_CASES=10000 cargo test --release

use std::collections::HashMap;

use proptest::prelude::*;
use correlativo_recon::config::ReconConfig;
use correlativo_recon::engine::run;
use correlativo_recon::model::{
    DuplicateStatus, RawBatch, ReconInput, ReconResult, SequenceStatus, NO_PREVIOUS_INVOICE,
};

// ---------------------------------------------------------------------------
// Config
// ---------------------------------------------------------------------------

fn config_256() -> ProptestConfig {
    ProptestConfig {
        cases: std::env::var("PROPTEST_CASES")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(256),
        failure_persistence: None,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Generators
// ---------------------------------------------------------------------------

fn headers() -> Vec<String> {
    ReconConfig::default()
        .columns
        .entries()
        .iter()
        .map(|(_, h)| h.to_string())
        .collect()
}

/// A row drawn from a small key space so series and invoice numbers collide often.
fn arb_row() -> impl Strategy<Value = Vec<String>> {
    (
        prop::sample::select(vec!["R1", "R2"]),
        prop::sample::select(vec!["FAC", "BOL", "01"]),
        prop::sample::select(vec!["A", "F001", "1"]),
        0i64..40,
        prop::option::of(prop::sample::select(vec![202403i64, 202404, 202405])),
    )
        .prop_map(|(report, voucher, series, number, period)| {
            vec![
                report.to_string(),
                voucher.to_string(),
                series.to_string(),
                number.to_string(),
                period.map(|p| p.to_string()).unwrap_or_default(),
            ]
        })
}

/// A batch with at least one period present, so normalization succeeds.
fn arb_batch() -> impl Strategy<Value = RawBatch> {
    (prop::collection::vec(arb_row(), 0..30), arb_row()).prop_map(|(mut rows, mut anchor)| {
        anchor[4] = "202404".into();
        rows.push(anchor);
        RawBatch::new(headers(), rows)
    })
}

fn reconcile(previous: &RawBatch, current: &RawBatch) -> ReconResult {
    run(&ReconConfig::default(), &ReconInput { previous, current }).unwrap()
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config_256())]

    #[test]
    fn merge_drops_no_rows(previous in arb_batch(), current in arb_batch()) {
        let result = reconcile(&previous, &current);
        prop_assert_eq!(result.summary.total_records, previous.len() + current.len());
        prop_assert_eq!(result.records.len(), previous.len() + current.len());
    }

    #[test]
    fn gap_is_exact_difference(previous in arb_batch(), current in arb_batch()) {
        let result = reconcile(&previous, &current);
        for r in &result.records {
            match r.sequenced.previous_invoice_number {
                Some(prev) => prop_assert_eq!(r.sequenced.gap, Some(r.record().invoice_number - prev)),
                None => prop_assert_eq!(r.sequenced.gap, None),
            }
        }
    }

    #[test]
    fn series_start_has_sentinel_and_never_breaks(previous in arb_batch(), current in arb_batch()) {
        let result = reconcile(&previous, &current);
        let mut seen = std::collections::HashSet::new();
        for r in &result.records {
            let first = seen.insert(r.record().series_key());
            if first {
                prop_assert_eq!(r.sequenced.previous_or_sentinel(), NO_PREVIOUS_INVOICE);
                prop_assert_eq!(r.sequence_status, SequenceStatus::NoBreak);
            } else {
                prop_assert!(r.sequenced.has_predecessor());
            }
        }
    }

    #[test]
    fn duplicate_status_is_symmetric(previous in arb_batch(), current in arb_batch()) {
        let result = reconcile(&previous, &current);
        let mut counts: HashMap<_, usize> = HashMap::new();
        for r in &result.records {
            *counts.entry(r.record().invoice_key()).or_insert(0) += 1;
        }
        for r in &result.records {
            let n = counts[&r.record().invoice_key()];
            let expected = if n > 1 { DuplicateStatus::Duplicate } else { DuplicateStatus::Unique };
            prop_assert_eq!(r.duplicate_status, expected);
            prop_assert_eq!(r.duplicate_count, n);
        }
    }

    #[test]
    fn unit_step_never_breaks(previous in arb_batch(), current in arb_batch()) {
        let result = reconcile(&previous, &current);
        for r in &result.records {
            if r.sequenced.gap == Some(1) {
                prop_assert_eq!(r.sequence_status, SequenceStatus::NoBreak);
            }
            if matches!(r.sequenced.gap, Some(g) if g != 1) {
                prop_assert_eq!(r.sequence_status, SequenceStatus::SequenceBreak);
            }
        }
    }

    #[test]
    fn series_type_concatenates(previous in arb_batch(), current in arb_batch()) {
        let result = reconcile(&previous, &current);
        for r in &result.records {
            let expected = format!("{}{}", r.record().voucher_type, r.record().series);
            prop_assert_eq!(&r.series_type, &expected);
        }
    }

    #[test]
    fn runs_are_idempotent(previous in arb_batch(), current in arb_batch()) {
        let first = reconcile(&previous, &current);
        let second = reconcile(&previous, &current);
        prop_assert_eq!(&first.records, &second.records);
        prop_assert_eq!(&first.summary, &second.summary);
    }
}
