use std::fmt;

use serde::Serialize;

/// Predecessor value reported for the first record of a series.
pub const NO_PREVIOUS_INVOICE: i64 = -1;

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Which of the two reports a record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchOrigin {
    Previous,
    Current,
}

impl fmt::Display for BatchOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Previous => write!(f, "previous"),
            Self::Current => write!(f, "current"),
        }
    }
}

/// One uploaded report as plain tabular data: a header row plus string cells.
///
/// Loaders (CSV, spreadsheets) produce this shape; the engine only reads it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawBatch {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl RawBatch {
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        Self { headers, rows }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a header, exact match (no trimming, no case folding).
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

/// The pair of reports reconciled in a single run.
#[derive(Debug, Clone, Copy)]
pub struct ReconInput<'a> {
    pub previous: &'a RawBatch,
    pub current: &'a RawBatch,
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// Grouping unit within which invoice numbers must increase by exactly one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct SeriesKey {
    pub report_id: String,
    pub voucher_type: String,
    pub series: String,
}

/// A series plus one invoice number within it. Key for both classifications.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InvoiceKey {
    pub series: SeriesKey,
    pub invoice_number: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InvoiceRecord {
    pub report_id: String,
    pub voucher_type: String,
    pub series: String,
    pub invoice_number: i64,
    pub period: i64,
    pub origin: BatchOrigin,
}

impl InvoiceRecord {
    pub fn series_key(&self) -> SeriesKey {
        SeriesKey {
            report_id: self.report_id.clone(),
            voucher_type: self.voucher_type.clone(),
            series: self.series.clone(),
        }
    }

    pub fn invoice_key(&self) -> InvoiceKey {
        InvoiceKey {
            series: self.series_key(),
            invoice_number: self.invoice_number,
        }
    }

    /// Same series as `other`, compared without allocating keys.
    pub fn same_series(&self, other: &InvoiceRecord) -> bool {
        self.report_id == other.report_id
            && self.voucher_type == other.voucher_type
            && self.series == other.series
    }
}

/// A batch after column selection and period backfill.
#[derive(Debug, Clone)]
pub struct NormalizedBatch {
    pub representative_period: i64,
    pub records: Vec<InvoiceRecord>,
}

/// Both batches concatenated, previous first.
#[derive(Debug, Clone)]
pub struct MergedDataset {
    pub records: Vec<InvoiceRecord>,
    pub previous_period: i64,
    pub current_period: i64,
    /// Current representative period without its two-digit month suffix.
    /// Only used to name the exported artifact.
    pub reporting_period: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SequencedRecord {
    #[serde(flatten)]
    pub record: InvoiceRecord,
    /// Invoice number of the prior record in the same series, `None` for the first.
    /// Serialized with the `-1` sentinel, like the exported table.
    #[serde(serialize_with = "serialize_previous")]
    pub previous_invoice_number: Option<i64>,
    /// `invoice_number - previous_invoice_number`; `None` for the first record.
    pub gap: Option<i64>,
}

fn serialize_previous<S: serde::Serializer>(value: &Option<i64>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_i64(value.unwrap_or(NO_PREVIOUS_INVOICE))
}

impl SequencedRecord {
    pub fn has_predecessor(&self) -> bool {
        self.previous_invoice_number.is_some()
    }

    /// Predecessor as reported downstream, with the `-1` sentinel for series starts.
    pub fn previous_or_sentinel(&self) -> i64 {
        self.previous_invoice_number.unwrap_or(NO_PREVIOUS_INVOICE)
    }

    /// A break occurrence: has a predecessor and does not follow it by exactly one.
    pub fn is_break_occurrence(&self) -> bool {
        matches!(self.gap, Some(gap) if gap != 1)
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

/// Group counts produced by the classifier.
#[derive(Debug, Clone, Default)]
pub struct Classification {
    /// Keys appearing more than once across both batches.
    pub duplicates: std::collections::BTreeMap<InvoiceKey, usize>,
    /// Keys with at least one break occurrence, with the number of occurrences.
    pub breaks: std::collections::BTreeMap<InvoiceKey, usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SequenceStatus {
    NoBreak,
    SequenceBreak,
}

impl fmt::Display for SequenceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoBreak => write!(f, "no_break"),
            Self::SequenceBreak => write!(f, "sequence_break"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateStatus {
    Unique,
    Duplicate,
}

impl fmt::Display for DuplicateStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unique => write!(f, "unique"),
            Self::Duplicate => write!(f, "duplicate"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnnotatedRecord {
    #[serde(flatten)]
    pub sequenced: SequencedRecord,
    /// Break occurrences recorded for this record's (series, invoice number).
    pub break_count: usize,
    /// Records sharing this record's (series, invoice number), itself included.
    pub duplicate_count: usize,
    pub sequence_status: SequenceStatus,
    pub duplicate_status: DuplicateStatus,
    /// Label text for `sequence_status`, as configured.
    pub sequence_label: String,
    /// Label text for `duplicate_status`, as configured.
    pub duplicate_label: String,
    /// `voucher_type` followed by `series`, no separator.
    pub series_type: String,
}

impl AnnotatedRecord {
    pub fn record(&self) -> &InvoiceRecord {
        &self.sequenced.record
    }
}

// ---------------------------------------------------------------------------
// Summary + Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReconSummary {
    pub total_records: usize,
    pub sequence_breaks: usize,
    pub duplicates: usize,
    pub previous_records: usize,
    pub current_records: usize,
    pub series: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconMeta {
    pub config_name: String,
    pub engine_version: String,
    pub run_at: String,
    pub previous_period: i64,
    pub current_period: i64,
    pub reporting_period: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReconResult {
    pub meta: ReconMeta,
    pub summary: ReconSummary,
    pub records: Vec<AnnotatedRecord>,
}
