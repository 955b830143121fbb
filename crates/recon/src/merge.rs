use crate::model::{MergedDataset, NormalizedBatch};

/// Concatenate previous then current. Every row is kept, duplicates included.
pub fn merge_batches(previous: NormalizedBatch, current: NormalizedBatch) -> MergedDataset {
    let previous_period = previous.representative_period;
    let current_period = current.representative_period;

    let mut records = previous.records;
    records.extend(current.records);

    let reporting_period = current_period.div_euclid(100);
    log::debug!(
        "merged {} records, reporting period {reporting_period}",
        records.len()
    );

    MergedDataset {
        records,
        previous_period,
        current_period,
        reporting_period,
    }
}
