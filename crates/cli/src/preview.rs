//! Plain-text preview of the last rows of a result.

use correlativo_io::table::{record_row, RESULT_HEADERS};
use correlativo_recon::ReconResult;

/// Render the last `n` annotated rows as a space-aligned table.
pub fn render_tail(result: &ReconResult, n: usize) -> String {
    let start = result.records.len().saturating_sub(n);
    let rows: Vec<Vec<String>> = result.records[start..]
        .iter()
        .map(|r| record_row(r).iter().map(|c| c.display()).collect())
        .collect();

    let mut widths: Vec<usize> = RESULT_HEADERS.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row) {
            *w = (*w).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, RESULT_HEADERS.iter().copied(), &widths);
    for row in &rows {
        push_line(&mut out, row.iter().map(String::as_str), &widths);
    }
    out
}

fn push_line<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize]) {
    let line: Vec<String> = cells
        .zip(widths)
        .map(|(cell, &w)| format!("{:<w$}", cell, w = w))
        .collect();
    out.push_str(line.join("  ").trim_end());
    out.push('\n');
}

#[cfg(test)]
mod tests {
    use super::*;
    use correlativo_recon::{run, RawBatch, ReconConfig, ReconInput};

    fn result(numbers: &[&str]) -> ReconResult {
        let headers: Vec<String> = ReconConfig::default()
            .columns
            .entries()
            .iter()
            .map(|(_, h)| h.to_string())
            .collect();
        let rows = |p: &str| -> Vec<Vec<String>> {
            numbers
                .iter()
                .map(|n| vec!["R1".into(), "FAC".into(), "F001".into(), n.to_string(), p.into()])
                .collect()
        };
        let previous = RawBatch::new(headers.clone(), rows("202404"));
        let current = RawBatch::new(headers, rows("202405"));
        run(&ReconConfig::default(), &ReconInput { previous: &previous, current: &current }).unwrap()
    }

    #[test]
    fn tail_keeps_last_rows() {
        let r = result(&["1", "2", "3"]);
        let text = render_tail(&r, 2);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("Reporte"));
        assert!(lines[2].contains("Duplicados"));
        assert!(lines[2].ends_with("FACF001"));
    }

    #[test]
    fn tail_larger_than_result() {
        let r = result(&["1"]);
        assert_eq!(render_tail(&r, 50).lines().count(), 3);
    }

    #[test]
    fn tail_zero_is_header_only() {
        let r = result(&["1"]);
        assert_eq!(render_tail(&r, 0).lines().count(), 1);
    }
}
