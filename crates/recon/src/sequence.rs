use std::cmp::Ordering;

use crate::error::ReconError;
use crate::model::{InvoiceRecord, SequencedRecord};

/// Series order: report, voucher type, series, then invoice number.
fn series_order(a: &InvoiceRecord, b: &InvoiceRecord) -> Ordering {
    a.report_id
        .cmp(&b.report_id)
        .then_with(|| a.voucher_type.cmp(&b.voucher_type))
        .then_with(|| a.series.cmp(&b.series))
        .then_with(|| a.invoice_number.cmp(&b.invoice_number))
}

/// Sort into series order and attach each record's predecessor and gap.
///
/// The sort is stable, so repeated invoice numbers keep merge order
/// (previous report first). The first record of every series has no
/// predecessor and no gap.
pub fn sequence_records(mut records: Vec<InvoiceRecord>) -> Result<Vec<SequencedRecord>, ReconError> {
    records.sort_by(series_order);

    let mut sequenced: Vec<SequencedRecord> = Vec::with_capacity(records.len());
    for record in records {
        let previous_invoice_number = match sequenced.last() {
            Some(prev) if prev.record.same_series(&record) => Some(prev.record.invoice_number),
            _ => None,
        };

        let gap = match previous_invoice_number {
            Some(prev) => Some(record.invoice_number.checked_sub(prev).ok_or_else(|| {
                ReconError::Classification(format!(
                    "gap overflow in series {}/{}/{}: {} - {prev}",
                    record.report_id, record.voucher_type, record.series, record.invoice_number,
                ))
            })?),
            None => None,
        };

        sequenced.push(SequencedRecord {
            record,
            previous_invoice_number,
            gap,
        });
    }

    Ok(sequenced)
}
