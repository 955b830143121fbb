use std::collections::BTreeSet;

use crate::model::{AnnotatedRecord, BatchOrigin, DuplicateStatus, ReconSummary, SequenceStatus};

/// Compute summary counters from annotated records.
pub fn compute_summary(records: &[AnnotatedRecord]) -> ReconSummary {
    let mut sequence_breaks = 0;
    let mut duplicates = 0;
    let mut previous_records = 0;
    let mut current_records = 0;
    let mut series = BTreeSet::new();

    for r in records {
        if r.sequence_status == SequenceStatus::SequenceBreak {
            sequence_breaks += 1;
        }
        if r.duplicate_status == DuplicateStatus::Duplicate {
            duplicates += 1;
        }
        match r.record().origin {
            BatchOrigin::Previous => previous_records += 1,
            BatchOrigin::Current => current_records += 1,
        }
        series.insert(r.record().series_key());
    }

    ReconSummary {
        total_records: records.len(),
        sequence_breaks,
        duplicates,
        previous_records,
        current_records,
        series: series.len(),
    }
}
