//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract: scripts rely on them.
//!
//! | Code | Meaning                                               |
//! |------|-------------------------------------------------------|
//! | 0    | Success                                               |
//! | 1    | General error (unspecified)                           |
//! | 2    | CLI usage error (bad args, unsupported file type)     |
//! | 3    | Findings present (only with `run --strict`)           |
//! | 4    | A report lacks a configured column                    |
//! | 5    | A report has no usable period                         |
//! | 6    | Invoice number or period cell is not an integer       |
//! | 7    | Config cannot be parsed or fails validation           |
//! | 8    | File could not be read or written                     |
//! | 9    | Grouping or join failure inside the engine            |

use correlativo_recon::ReconError;

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, unsupported input file.
pub const EXIT_USAGE: u8 = 2;

/// Sequence breaks or duplicates found and `--strict` was given.
pub const EXIT_FINDINGS: u8 = 3;

/// Required column missing from a report.
pub const EXIT_SCHEMA: u8 = 4;

/// Every period cell of a report is blank.
pub const EXIT_EMPTY_PERIOD: u8 = 5;

/// Invoice number or period cell could not be parsed.
pub const EXIT_INPUT_PARSE: u8 = 6;

/// Config parse or validation error.
pub const EXIT_INVALID_CONFIG: u8 = 7;

/// File read or write failure.
pub const EXIT_IO: u8 = 8;

/// Classification (grouping, join, arithmetic) failure.
pub const EXIT_CLASSIFICATION: u8 = 9;

/// Map an engine error to its exit code.
pub fn recon_exit_code(err: &ReconError) -> u8 {
    match err {
        ReconError::ConfigParse(_) | ReconError::ConfigValidation(_) => EXIT_INVALID_CONFIG,
        ReconError::MissingColumn { .. } => EXIT_SCHEMA,
        ReconError::EmptyPeriod { .. } => EXIT_EMPTY_PERIOD,
        ReconError::InvoiceNumberParse { .. } | ReconError::PeriodParse { .. } => EXIT_INPUT_PARSE,
        ReconError::Classification(_) => EXIT_CLASSIFICATION,
        ReconError::Io(_) => EXIT_IO,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use correlativo_recon::BatchOrigin;

    #[test]
    fn codes_are_distinct() {
        let codes = [
            EXIT_SUCCESS,
            EXIT_ERROR,
            EXIT_USAGE,
            EXIT_FINDINGS,
            EXIT_SCHEMA,
            EXIT_EMPTY_PERIOD,
            EXIT_INPUT_PARSE,
            EXIT_INVALID_CONFIG,
            EXIT_IO,
            EXIT_CLASSIFICATION,
        ];
        let mut sorted = codes.to_vec();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), codes.len());
    }

    #[test]
    fn engine_errors_map() {
        let missing = ReconError::MissingColumn {
            batch: BatchOrigin::Current,
            column: "SERIE".into(),
        };
        assert_eq!(recon_exit_code(&missing), EXIT_SCHEMA);
        assert_eq!(
            recon_exit_code(&ReconError::EmptyPeriod { batch: BatchOrigin::Previous }),
            EXIT_EMPTY_PERIOD
        );
        assert_eq!(recon_exit_code(&ReconError::ConfigParse("x".into())), EXIT_INVALID_CONFIG);
        assert_eq!(recon_exit_code(&ReconError::Classification("x".into())), EXIT_CLASSIFICATION);
    }
}
