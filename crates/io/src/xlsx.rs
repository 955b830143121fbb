// Excel import (xlsx, xlsm, xls, xlsb, ods) and result export (xlsx only)
//
// Import: the preferred sheet (or the first one) becomes a RawBatch of strings.
// Export: a single result sheet with a bold, frozen, filterable header.

use std::path::Path;

use calamine::{open_workbook_auto, Data, Reader, Sheets};
use rust_xlsxwriter::{Format, Workbook as XlsxWorkbook};

use correlativo_recon::{RawBatch, ReconResult};

use crate::table::{result_rows, ResultCell, RESULT_HEADERS};

/// Maximum rows read from one sheet (Excel's own row limit)
const MAX_ROWS: usize = 1_048_576;

/// Import one sheet of a workbook.
///
/// The sheet named `preferred_sheet` is used when present, otherwise the
/// first sheet. The first non-empty row is the header; blank rows after it are
/// skipped and short rows are padded to the header width.
pub fn import(path: &Path, preferred_sheet: &str) -> Result<RawBatch, String> {
    let mut workbook: Sheets<_> = open_workbook_auto(path)
        .map_err(|e| format!("Failed to open {}: {}", path.display(), e))?;

    let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
    let sheet_name = pick_sheet(&sheet_names, preferred_sheet)
        .ok_or_else(|| format!("{}: workbook contains no sheets", path.display()))?;

    if sheet_name != preferred_sheet {
        log::warn!(
            "{}: no sheet named '{}', reading '{}'",
            path.display(),
            preferred_sheet,
            sheet_name
        );
    }

    let range = workbook
        .worksheet_range(&sheet_name)
        .map_err(|e| format!("Failed to read sheet '{}': {}", sheet_name, e))?;

    let mut headers: Option<Vec<String>> = None;
    let mut rows = Vec::new();

    for (row_idx, row) in range.rows().enumerate() {
        if row_idx >= MAX_ROWS {
            log::warn!(
                "{}: sheet '{}' truncated at {} rows",
                path.display(),
                sheet_name,
                MAX_ROWS
            );
            break;
        }

        let mut values: Vec<String> = row.iter().map(cell_to_string).collect();
        if values.iter().all(|v| v.trim().is_empty()) {
            continue;
        }

        match &headers {
            None => headers = Some(values),
            Some(h) => {
                if values.len() < h.len() {
                    values.resize(h.len(), String::new());
                }
                rows.push(values);
            }
        }
    }

    let headers = headers.unwrap_or_default();
    log::debug!(
        "{}: sheet '{}', {} columns, {} rows",
        path.display(),
        sheet_name,
        headers.len(),
        rows.len()
    );

    Ok(RawBatch::new(headers, rows))
}

fn pick_sheet(sheet_names: &[String], preferred: &str) -> Option<String> {
    sheet_names
        .iter()
        .find(|name| name.as_str() == preferred)
        .or_else(|| sheet_names.first())
        .cloned()
}

/// Render a calamine cell the way it reads in Excel
fn cell_to_string(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        Data::String(s) => s.clone(),
        Data::Float(n) => {
            // Integers without decimals
            if n.fract() == 0.0 && n.abs() < 1e15 {
                format!("{}", *n as i64)
            } else {
                format!("{}", n)
            }
        }
        Data::Int(n) => n.to_string(),
        Data::Bool(b) => (if *b { "TRUE" } else { "FALSE" }).to_string(),
        Data::Error(e) => format!("#{:?}", e),
        Data::DateTime(dt) => format!("{}", dt.as_f64()),
        Data::DateTimeIso(s) => s.clone(),
        Data::DurationIso(s) => s.clone(),
    }
}

/// Export the annotated table to a single-sheet xlsx file.
pub fn export_result(result: &ReconResult, path: &Path, sheet_name: &str) -> Result<(), String> {
    let mut xlsx_workbook = XlsxWorkbook::new();
    let worksheet = xlsx_workbook
        .add_worksheet()
        .set_name(sheet_name)
        .map_err(|e| format!("Failed to create sheet '{}': {}", sheet_name, e))?;

    let header_format = Format::new().set_bold();
    for (col, header) in RESULT_HEADERS.iter().enumerate() {
        worksheet
            .write_string_with_format(0, col as u16, *header, &header_format)
            .map_err(|e| format!("Failed to write header: {}", e))?;
        worksheet
            .set_column_width(col as u16, (header.len() + 4) as f64)
            .map_err(|e| format!("Failed to size column: {}", e))?;
    }

    let rows = result_rows(result);
    for (idx, row) in rows.iter().enumerate() {
        let row32 = (idx + 1) as u32;
        for (col, cell) in row.iter().enumerate() {
            let col16 = col as u16;
            match cell {
                ResultCell::Text(s) => {
                    worksheet
                        .write_string(row32, col16, s.as_str())
                        .map_err(|e| format!("Failed to write cell: {}", e))?;
                }
                ResultCell::Number(n) => {
                    worksheet
                        .write_number(row32, col16, *n as f64)
                        .map_err(|e| format!("Failed to write cell: {}", e))?;
                }
                ResultCell::Blank => {}
            }
        }
    }

    worksheet
        .set_freeze_panes(1, 0)
        .map_err(|e| format!("Failed to freeze header: {}", e))?;
    worksheet
        .autofilter(0, 0, rows.len() as u32, (RESULT_HEADERS.len() - 1) as u16)
        .map_err(|e| format!("Failed to set autofilter: {}", e))?;

    xlsx_workbook
        .save(path)
        .map_err(|e| format!("Failed to save XLSX file: {}", e))?;

    log::debug!("{}: wrote {} result rows", path.display(), rows.len());
    Ok(())
}
