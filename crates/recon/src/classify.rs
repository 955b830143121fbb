use std::collections::BTreeMap;

use crate::error::ReconError;
use crate::model::{Classification, InvoiceKey, SequencedRecord};

/// Count records per (series, invoice number) across both reports.
pub fn count_invoices(records: &[SequencedRecord]) -> BTreeMap<InvoiceKey, usize> {
    let mut counts: BTreeMap<InvoiceKey, usize> = BTreeMap::new();
    for r in records {
        *counts.entry(r.record.invoice_key()).or_insert(0) += 1;
    }
    counts
}

/// Count break occurrences per (series, invoice number).
///
/// Only records with a predecessor are considered, so a series' first record
/// never contributes, whatever its number.
pub fn count_breaks(records: &[SequencedRecord]) -> BTreeMap<InvoiceKey, usize> {
    let mut counts: BTreeMap<InvoiceKey, usize> = BTreeMap::new();
    for r in records.iter().filter(|r| r.is_break_occurrence()) {
        *counts.entry(r.record.invoice_key()).or_insert(0) += 1;
    }
    counts
}

/// Run both groupings. They are independent: duplicate detection ignores
/// predecessors and gaps entirely.
pub fn classify(records: &[SequencedRecord]) -> Result<Classification, ReconError> {
    let counts = count_invoices(records);

    let counted: usize = counts.values().sum();
    if counted != records.len() {
        return Err(ReconError::Classification(format!(
            "invoice grouping covers {counted} of {} records",
            records.len()
        )));
    }

    let duplicates: BTreeMap<InvoiceKey, usize> =
        counts.into_iter().filter(|(_, count)| *count > 1).collect();
    let breaks = count_breaks(records);

    log::debug!(
        "classified {} records: {} duplicate keys, {} break keys",
        records.len(),
        duplicates.len(),
        breaks.len()
    );

    Ok(Classification { duplicates, breaks })
}
