use crate::annotate::annotate;
use crate::classify::classify;
use crate::config::ReconConfig;
use crate::error::ReconError;
use crate::summary::compute_summary;
use crate::merge::merge_batches;
use crate::model::{BatchOrigin, RawBatch, ReconInput, ReconMeta, ReconResult};
use crate::normalize::normalize_batch;
use crate::sequence::sequence_records;

/// Run one reconciliation: normalize both reports, merge, sequence, classify
/// and annotate. Either every stage succeeds or the first error is returned;
/// the input batches are only borrowed.
pub fn run(config: &ReconConfig, input: &ReconInput<'_>) -> Result<ReconResult, ReconError> {
    // Both batches are normalized before anything is merged.
    let previous = normalize_batch(BatchOrigin::Previous, input.previous, &config.columns)?;
    let current = normalize_batch(BatchOrigin::Current, input.current, &config.columns)?;

    let merged = merge_batches(previous, current);
    let meta = ReconMeta {
        config_name: config.name.clone(),
        engine_version: env!("CARGO_PKG_VERSION").to_string(),
        run_at: chrono::Utc::now().to_rfc3339(),
        previous_period: merged.previous_period,
        current_period: merged.current_period,
        reporting_period: merged.reporting_period,
    };

    let sequenced = sequence_records(merged.records)?;
    let classification = classify(&sequenced)?;
    let records = annotate(sequenced, &classification, &config.labels);
    let summary = compute_summary(&records);

    log::info!(
        "'{}': {} records ({} previous, {} current) in {} series; {} sequence breaks, {} duplicates",
        config.name,
        summary.total_records,
        summary.previous_records,
        summary.current_records,
        summary.series,
        summary.sequence_breaks,
        summary.duplicates,
    );

    Ok(ReconResult {
        meta,
        summary,
        records,
    })
}

/// Parse CSV text into a raw batch. The first record is the header row.
///
/// Headers are kept verbatim (no trimming) so that column selection stays
/// exact. Short rows are padded with empty cells.
pub fn load_csv_batch(csv_data: &str, delimiter: u8) -> Result<RawBatch, ReconError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(csv_data.as_bytes());

    let headers: Vec<String> = reader
        .headers()
        .map_err(|e| ReconError::Io(e.to_string()))?
        .iter()
        .map(|h| h.to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(|e| ReconError::Io(e.to_string()))?;

        // Blank lines inside the data carry nothing to reconcile.
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }

        let mut row: Vec<String> = record.iter().map(|field| field.to_string()).collect();
        if row.len() < headers.len() {
            row.resize(headers.len(), String::new());
        }
        rows.push(row);
    }

    Ok(RawBatch::new(headers, rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DuplicateStatus, SequenceStatus, NO_PREVIOUS_INVOICE};

    const HEADER: &str = "Reporte,TIPO COMPROBANTE,SERIE,FACTURA,1 Periodo ";

    fn csv_batch(body: &str) -> RawBatch {
        load_csv_batch(&format!("{HEADER}\n{body}"), b',').unwrap()
    }

    #[test]
    fn load_csv_basic() {
        let batch = csv_batch("R1,FAC,A,100,202405\nR1,FAC,A,101,\n");
        assert_eq!(batch.headers[4], "1 Periodo ");
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.rows[1], vec!["R1", "FAC", "A", "101", ""]);
    }

    #[test]
    fn load_csv_pads_short_rows_and_skips_blank_lines() {
        let batch = csv_batch("R1,FAC,A,100\n,,,,\nR1,FAC,A,101,202405\n");
        assert_eq!(batch.len(), 2);
        assert_eq!(batch.rows[0].len(), 5);
        assert_eq!(batch.rows[0][4], "");
    }

    #[test]
    fn load_csv_semicolon() {
        let batch = load_csv_batch(
            "Reporte;TIPO COMPROBANTE;SERIE;FACTURA;1 Periodo \nR1;FAC;A;100;202405\n",
            b';',
        )
        .unwrap();
        assert_eq!(batch.rows[0][3], "100");
    }

    #[test]
    fn integration_example_series() {
        let previous = csv_batch("R1,FAC,A,100,202404\nR1,FAC,A,101,202404\nR1,FAC,A,103,\n");
        let current = csv_batch("R1,FAC,A,103,202405\nR1,FAC,A,104,\n");

        let result = run(
            &ReconConfig::default(),
            &ReconInput {
                previous: &previous,
                current: &current,
            },
        )
        .unwrap();

        assert_eq!(result.meta.reporting_period, 2024);
        assert_eq!(result.meta.previous_period, 202404);
        assert_eq!(result.meta.current_period, 202405);
        assert_eq!(result.summary.total_records, 5);
        assert_eq!(result.summary.sequence_breaks, 2);
        assert_eq!(result.summary.duplicates, 2);

        let prev: Vec<i64> = result
            .records
            .iter()
            .map(|r| r.sequenced.previous_or_sentinel())
            .collect();
        assert_eq!(prev, vec![NO_PREVIOUS_INVOICE, 100, 101, 103, 103]);

        // The first 103 comes from the previous report and keeps its backfilled period.
        assert_eq!(result.records[2].record().period, 202404);
        assert_eq!(result.records[2].sequence_status, SequenceStatus::SequenceBreak);
        assert_eq!(result.records[3].duplicate_status, DuplicateStatus::Duplicate);
        assert_eq!(result.records[4].record().period, 202405);
    }

    #[test]
    fn empty_period_stops_before_merge() {
        let previous = csv_batch("R1,FAC,A,100,\n");
        let current = csv_batch("R1,FAC,A,101,202405\n");
        let err = run(
            &ReconConfig::default(),
            &ReconInput {
                previous: &previous,
                current: &current,
            },
        )
        .unwrap_err();
        assert_eq!(err, ReconError::EmptyPeriod { batch: BatchOrigin::Previous });
    }

    #[test]
    fn schema_error_on_current_batch() {
        let previous = csv_batch("R1,FAC,A,100,202405\n");
        let current = load_csv_batch("Reporte,TIPO COMPROBANTE,SERIE,1 Periodo \nR1,FAC,A,202405\n", b',').unwrap();
        let err = run(
            &ReconConfig::default(),
            &ReconInput {
                previous: &previous,
                current: &current,
            },
        )
        .unwrap_err();
        assert_eq!(
            err,
            ReconError::MissingColumn {
                batch: BatchOrigin::Current,
                column: "FACTURA".into(),
            }
        );
    }
}
