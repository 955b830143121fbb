use serde::{Deserialize, Serialize};

use crate::error::ReconError;
use crate::model::{DuplicateStatus, SequenceStatus};

/// Excel refuses sheet names longer than this.
const MAX_SHEET_NAME_LEN: usize = 31;

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Run configuration. Every section is optional; the defaults match the
/// report layout the tool was built for.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ReconConfig {
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default)]
    pub columns: ColumnMapping,
    #[serde(default)]
    pub labels: StatusLabels,
    #[serde(default)]
    pub output: OutputConfig,
}

fn default_name() -> String {
    "Correlativo".into()
}

impl Default for ReconConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
            columns: ColumnMapping::default(),
            labels: StatusLabels::default(),
            output: OutputConfig::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Column mapping
// ---------------------------------------------------------------------------

/// Input header for each required field. Matched exactly, including case and
/// surrounding whitespace (the stock period header ends with a space).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ColumnMapping {
    pub report_id: String,
    pub voucher_type: String,
    pub series: String,
    pub invoice_number: String,
    pub period: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            report_id: "Reporte".into(),
            voucher_type: "TIPO COMPROBANTE".into(),
            series: "SERIE".into(),
            invoice_number: "FACTURA".into(),
            period: "1 Periodo ".into(),
        }
    }
}

impl ColumnMapping {
    /// (field, header) pairs in selection order.
    pub fn entries(&self) -> [(&'static str, &str); 5] {
        [
            ("report_id", &self.report_id),
            ("voucher_type", &self.voucher_type),
            ("series", &self.series),
            ("invoice_number", &self.invoice_number),
            ("period", &self.period),
        ]
    }
}

// ---------------------------------------------------------------------------
// Labels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct StatusLabels {
    pub no_break: String,
    pub sequence_break: String,
    pub unique: String,
    pub duplicate: String,
}

impl Default for StatusLabels {
    fn default() -> Self {
        Self {
            no_break: "sin salto".into(),
            sequence_break: "salto de Correlativo".into(),
            unique: "Unicos".into(),
            duplicate: "Duplicados".into(),
        }
    }
}

impl StatusLabels {
    pub fn sequence(&self, status: SequenceStatus) -> &str {
        match status {
            SequenceStatus::NoBreak => &self.no_break,
            SequenceStatus::SequenceBreak => &self.sequence_break,
        }
    }

    pub fn duplicate(&self, status: DuplicateStatus) -> &str {
        match status {
            DuplicateStatus::Unique => &self.unique,
            DuplicateStatus::Duplicate => &self.duplicate,
        }
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Settings read by the loaders and exporters, not by the engine itself.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    /// Worksheet name of the exported result.
    pub sheet_name: String,
    /// Artifact name prefix; the reporting period is appended.
    pub file_prefix: String,
    /// Worksheet to read from spreadsheet inputs when present.
    pub preferred_sheet: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            sheet_name: "Resultado".into(),
            file_prefix: "Resultado_Salto_Correlativo - OrigenCarga".into(),
            preferred_sheet: "Base".into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl ReconConfig {
    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: ReconConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ReconError> {
        toml::to_string_pretty(self).map_err(|e| ReconError::ConfigParse(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        let entries = self.columns.entries();
        for (field, header) in &entries {
            if header.is_empty() {
                return Err(ReconError::ConfigValidation(format!(
                    "columns.{field} must not be empty"
                )));
            }
        }

        for (i, (field_a, header_a)) in entries.iter().enumerate() {
            for (field_b, header_b) in &entries[i + 1..] {
                if header_a == header_b {
                    return Err(ReconError::ConfigValidation(format!(
                        "columns.{field_a} and columns.{field_b} both map to '{header_a}'"
                    )));
                }
            }
        }

        let labels = &self.labels;
        for (field, label) in [
            ("no_break", &labels.no_break),
            ("sequence_break", &labels.sequence_break),
            ("unique", &labels.unique),
            ("duplicate", &labels.duplicate),
        ] {
            if label.trim().is_empty() {
                return Err(ReconError::ConfigValidation(format!(
                    "labels.{field} must not be empty"
                )));
            }
        }
        if labels.no_break == labels.sequence_break {
            return Err(ReconError::ConfigValidation(
                "labels.no_break and labels.sequence_break must differ".into(),
            ));
        }
        if labels.unique == labels.duplicate {
            return Err(ReconError::ConfigValidation(
                "labels.unique and labels.duplicate must differ".into(),
            ));
        }

        let sheet = &self.output.sheet_name;
        if sheet.is_empty() || sheet.chars().count() > MAX_SHEET_NAME_LEN {
            return Err(ReconError::ConfigValidation(format!(
                "output.sheet_name must be 1-{MAX_SHEET_NAME_LEN} characters, got '{sheet}'"
            )));
        }
        if self.output.file_prefix.trim().is_empty() {
            return Err(ReconError::ConfigValidation(
                "output.file_prefix must not be empty".into(),
            ));
        }

        Ok(())
    }
}
