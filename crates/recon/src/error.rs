use std::fmt;

use crate::model::BatchOrigin;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (empty column name, clashing labels, etc.).
    ConfigValidation(String),
    /// Required column absent from an input batch.
    MissingColumn { batch: BatchOrigin, column: String },
    /// No row in the batch carries a period to backfill the others with.
    EmptyPeriod { batch: BatchOrigin },
    /// Invoice number missing or not an integer. `row` is 1-based, header excluded.
    InvoiceNumberParse { batch: BatchOrigin, row: usize, value: String },
    /// Period present but not an integer.
    PeriodParse { batch: BatchOrigin, row: usize, value: String },
    /// Grouping, joining or arithmetic failure after the inputs were accepted.
    Classification(String),
    /// CSV reader error.
    Io(String),
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::MissingColumn { batch, column } => {
                write!(f, "{batch} report: missing column '{column}'")
            }
            Self::EmptyPeriod { batch } => {
                write!(f, "{batch} report: period column has no values to backfill from")
            }
            Self::InvoiceNumberParse { batch, row, value } => {
                write!(f, "{batch} report, row {row}: invalid invoice number '{value}'")
            }
            Self::PeriodParse { batch, row, value } => {
                write!(f, "{batch} report, row {row}: invalid period '{value}'")
            }
            Self::Classification(msg) => write!(f, "classification error: {msg}"),
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for ReconError {}
