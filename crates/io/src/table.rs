// Flat result table shared by the CSV and XLSX exporters

use correlativo_recon::{AnnotatedRecord, ReconResult};

/// Output columns, in export order.
pub const RESULT_HEADERS: [&str; 13] = [
    "Reporte",
    "Tipo de Comprobante",
    "Serie",
    "Factura",
    "Periodo",
    "Origen",
    "Factura Anterior",
    "NroSaltos",
    "Recuento_Salto",
    "Recuento_Duplicado",
    "Status_Salto",
    "Status_Duplicado",
    "Tipo_Serie",
];

#[derive(Debug, Clone, PartialEq)]
pub enum ResultCell {
    Text(String),
    Number(i64),
    Blank,
}

impl ResultCell {
    /// Text form used by the CSV exporter and the CLI preview.
    pub fn display(&self) -> String {
        match self {
            ResultCell::Text(s) => s.clone(),
            ResultCell::Number(n) => n.to_string(),
            ResultCell::Blank => String::new(),
        }
    }
}

/// One output row per annotated record, columns as in [`RESULT_HEADERS`].
pub fn record_row(r: &AnnotatedRecord) -> Vec<ResultCell> {
    let rec = r.record();
    vec![
        ResultCell::Text(rec.report_id.clone()),
        ResultCell::Text(rec.voucher_type.clone()),
        ResultCell::Text(rec.series.clone()),
        ResultCell::Number(rec.invoice_number),
        ResultCell::Number(rec.period),
        ResultCell::Text(rec.origin.to_string()),
        ResultCell::Number(r.sequenced.previous_or_sentinel()),
        r.sequenced.gap.map_or(ResultCell::Blank, ResultCell::Number),
        ResultCell::Number(r.break_count as i64),
        ResultCell::Number(r.duplicate_count as i64),
        ResultCell::Text(r.sequence_label.clone()),
        ResultCell::Text(r.duplicate_label.clone()),
        ResultCell::Text(r.series_type.clone()),
    ]
}

pub fn result_rows(result: &ReconResult) -> Vec<Vec<ResultCell>> {
    result.records.iter().map(record_row).collect()
}
