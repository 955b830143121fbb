use crate::config::StatusLabels;
use crate::model::{
    AnnotatedRecord, Classification, DuplicateStatus, SequenceStatus, SequencedRecord,
};

/// Join both classifications back onto every record.
///
/// The duplicate join is by key: every record of a duplicated
/// (series, invoice number) is a duplicate. The break count is joined by key
/// too, but the break status is only set on the occurrences that broke the
/// sequence themselves, so a series' first record and a record following its
/// predecessor by exactly one keep `NoBreak`.
pub fn annotate(
    records: Vec<SequencedRecord>,
    classification: &Classification,
    labels: &StatusLabels,
) -> Vec<AnnotatedRecord> {
    records
        .into_iter()
        .map(|sequenced| {
            let key = sequenced.record.invoice_key();

            let break_count = classification.breaks.get(&key).copied().unwrap_or(0);
            let sequence_status = if break_count > 0 && sequenced.is_break_occurrence() {
                SequenceStatus::SequenceBreak
            } else {
                SequenceStatus::NoBreak
            };

            let (duplicate_count, duplicate_status) = match classification.duplicates.get(&key) {
                Some(&count) => (count, DuplicateStatus::Duplicate),
                None => (1, DuplicateStatus::Unique),
            };

            let series_type = format!("{}{}", sequenced.record.voucher_type, sequenced.record.series);

            AnnotatedRecord {
                break_count,
                duplicate_count,
                sequence_status,
                duplicate_status,
                sequence_label: labels.sequence(sequence_status).to_string(),
                duplicate_label: labels.duplicate(duplicate_status).to_string(),
                series_type,
                sequenced,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify;
    use crate::model::{BatchOrigin, InvoiceRecord};
    use crate::sequence::sequence_records;

    fn run(voucher: &str, series: &str, numbers: &[i64]) -> Vec<AnnotatedRecord> {
        let records = numbers
            .iter()
            .map(|&n| InvoiceRecord {
                report_id: "R1".into(),
                voucher_type: voucher.into(),
                series: series.into(),
                invoice_number: n,
                period: 202405,
                origin: BatchOrigin::Previous,
            })
            .collect();
        let seq = sequence_records(records).unwrap();
        let classification = classify(&seq).unwrap();
        annotate(seq, &classification, &StatusLabels::default())
    }

    #[test]
    fn example_series_labels() {
        let out = run("FAC", "A", &[100, 101, 103, 103, 104]);

        let seq: Vec<SequenceStatus> = out.iter().map(|a| a.sequence_status).collect();
        assert_eq!(
            seq,
            vec![
                SequenceStatus::NoBreak,
                SequenceStatus::NoBreak,
                SequenceStatus::SequenceBreak,
                SequenceStatus::SequenceBreak,
                SequenceStatus::NoBreak,
            ]
        );

        let dup: Vec<DuplicateStatus> = out.iter().map(|a| a.duplicate_status).collect();
        assert_eq!(
            dup,
            vec![
                DuplicateStatus::Unique,
                DuplicateStatus::Unique,
                DuplicateStatus::Duplicate,
                DuplicateStatus::Duplicate,
                DuplicateStatus::Unique,
            ]
        );

        assert_eq!(out[2].sequence_label, "salto de Correlativo");
        assert_eq!(out[0].sequence_label, "sin salto");
        assert_eq!(out[3].duplicate_label, "Duplicados");
        assert_eq!(out[4].duplicate_label, "Unicos");
        assert_eq!(out[2].break_count, 2);
        assert_eq!(out[2].duplicate_count, 2);
        assert_eq!(out[0].break_count, 0);
        assert_eq!(out[0].duplicate_count, 1);
    }

    #[test]
    fn first_row_duplicate_is_not_a_break() {
        let out = run("FAC", "A", &[101, 101]);
        assert_eq!(out[0].sequence_status, SequenceStatus::NoBreak);
        assert_eq!(out[1].sequence_status, SequenceStatus::SequenceBreak);
        // The key is a break point, so both records carry its count.
        assert_eq!(out[0].break_count, 1);
        assert!(out.iter().all(|a| a.duplicate_status == DuplicateStatus::Duplicate));
    }

    #[test]
    fn consecutive_duplicate_first_occurrence_not_a_break() {
        let out = run("FAC", "A", &[100, 101, 101]);
        assert_eq!(out[1].sequenced.gap, Some(1));
        assert_eq!(out[1].sequence_status, SequenceStatus::NoBreak);
        assert_eq!(out[1].duplicate_status, DuplicateStatus::Duplicate);
        assert_eq!(out[2].sequence_status, SequenceStatus::SequenceBreak);
    }

    #[test]
    fn series_type_is_plain_concatenation() {
        let out = run("01", "F001", &[1]);
        assert_eq!(out[0].series_type, "01F001");
    }

    #[test]
    fn custom_labels_applied() {
        let labels = StatusLabels {
            no_break: "ok".into(),
            sequence_break: "gap".into(),
            unique: "single".into(),
            duplicate: "repeated".into(),
        };
        let records = vec![InvoiceRecord {
            report_id: "R1".into(),
            voucher_type: "FAC".into(),
            series: "A".into(),
            invoice_number: 1,
            period: 202405,
            origin: BatchOrigin::Current,
        }];
        let seq = sequence_records(records).unwrap();
        let c = classify(&seq).unwrap();
        let out = annotate(seq, &c, &labels);
        assert_eq!(out[0].sequence_label, "ok");
        assert_eq!(out[0].duplicate_label, "single");
    }
}
