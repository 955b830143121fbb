use crate::config::ColumnMapping;
use crate::error::ReconError;
use crate::model::{BatchOrigin, InvoiceRecord, NormalizedBatch, RawBatch};

/// Column positions of the five required fields within one batch.
struct Selection {
    report_id: usize,
    voucher_type: usize,
    series: usize,
    invoice_number: usize,
    period: usize,
}

fn select_columns(
    origin: BatchOrigin,
    batch: &RawBatch,
    columns: &ColumnMapping,
) -> Result<Selection, ReconError> {
    let idx = |name: &str| -> Result<usize, ReconError> {
        batch.column_index(name).ok_or_else(|| ReconError::MissingColumn {
            batch: origin,
            column: name.into(),
        })
    };

    Ok(Selection {
        report_id: idx(&columns.report_id)?,
        voucher_type: idx(&columns.voucher_type)?,
        series: idx(&columns.series)?,
        invoice_number: idx(&columns.invoice_number)?,
        period: idx(&columns.period)?,
    })
}

fn cell(row: &[String], i: usize) -> String {
    row.get(i).cloned().unwrap_or_default()
}

/// Parse an integer cell. Spreadsheet readers hand integral numbers back as
/// `1001.0`, so integral decimals are accepted too. Blank cells are `None`.
pub(crate) fn parse_integer_cell(value: &str) -> Result<Option<i64>, ()> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }
    if let Ok(n) = trimmed.parse::<i64>() {
        return Ok(Some(n));
    }
    match trimmed.parse::<f64>() {
        Ok(f) if f.is_finite() && f.fract() == 0.0 && f.abs() < 9.0e15 => Ok(Some(f as i64)),
        _ => Err(()),
    }
}

/// Select the required columns of one batch and backfill missing periods with
/// the batch's representative period (its latest non-missing period).
///
/// Runs per batch so each report falls back to its own period.
pub fn normalize_batch(
    origin: BatchOrigin,
    batch: &RawBatch,
    columns: &ColumnMapping,
) -> Result<NormalizedBatch, ReconError> {
    let sel = select_columns(origin, batch, columns)?;

    let mut parsed: Vec<(InvoiceRecord, Option<i64>)> = Vec::with_capacity(batch.len());
    for (i, row) in batch.rows.iter().enumerate() {
        let row_number = i + 1;

        let invoice_raw = cell(row, sel.invoice_number);
        let invoice_number = match parse_integer_cell(&invoice_raw) {
            Ok(Some(n)) => n,
            Ok(None) | Err(()) => {
                return Err(ReconError::InvoiceNumberParse {
                    batch: origin,
                    row: row_number,
                    value: invoice_raw,
                })
            }
        };

        let period_raw = cell(row, sel.period);
        let period = parse_integer_cell(&period_raw).map_err(|()| ReconError::PeriodParse {
            batch: origin,
            row: row_number,
            value: period_raw.clone(),
        })?;

        let record = InvoiceRecord {
            report_id: cell(row, sel.report_id),
            voucher_type: cell(row, sel.voucher_type),
            series: cell(row, sel.series),
            invoice_number,
            // Placeholder until the representative period is known.
            period: 0,
            origin,
        };
        parsed.push((record, period));
    }

    let representative_period = parsed
        .iter()
        .filter_map(|(_, period)| *period)
        .max()
        .ok_or(ReconError::EmptyPeriod { batch: origin })?;

    let mut backfilled = 0usize;
    let records: Vec<InvoiceRecord> = parsed
        .into_iter()
        .map(|(mut record, period)| {
            record.period = period.unwrap_or_else(|| {
                backfilled += 1;
                representative_period
            });
            record
        })
        .collect();

    log::debug!(
        "normalized {origin} report: {} rows, representative period {representative_period}, {backfilled} backfilled",
        records.len(),
    );

    Ok(NormalizedBatch {
        representative_period,
        records,
    })
}
