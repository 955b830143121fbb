// File I/O: report import and result export

pub mod csv;
pub mod table;
pub mod xlsx;

use std::path::Path;

use correlativo_recon::RawBatch;

/// Input formats recognised by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Csv,
    Spreadsheet,
}

impl InputFormat {
    pub fn from_path(path: &Path) -> Result<Self, String> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase())
            .unwrap_or_default();

        match ext.as_str() {
            "csv" | "tsv" | "txt" => Ok(Self::Csv),
            "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => Ok(Self::Spreadsheet),
            "" => Err(format!("{}: cannot tell the file type without an extension", path.display())),
            other => Err(format!("{}: unsupported file type '.{other}'", path.display())),
        }
    }
}

/// Load one report. Spreadsheets are read from `preferred_sheet` when the
/// workbook has it, otherwise from their first sheet.
pub fn load_batch(path: &Path, preferred_sheet: &str) -> Result<RawBatch, String> {
    match InputFormat::from_path(path)? {
        InputFormat::Csv => csv::import(path),
        InputFormat::Spreadsheet => xlsx::import(path, preferred_sheet),
    }
}

/// Name of the exported result: `"{prefix} {reporting_period}.{ext}"`.
pub fn artifact_file_name(prefix: &str, reporting_period: i64, ext: &str) -> String {
    format!("{prefix} {reporting_period}.{ext}")
}
