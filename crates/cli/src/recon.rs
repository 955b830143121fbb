//! `correlativo run | validate | init-config`

use std::path::{Path, PathBuf};

use correlativo_io::InputFormat;
use correlativo_recon::{RawBatch, ReconConfig, ReconInput, ReconResult};

use crate::exit_codes::{EXIT_FINDINGS, EXIT_INVALID_CONFIG};
use crate::{preview, CliError, ResultFormat};

pub struct RunOptions {
    pub previous: PathBuf,
    pub current: PathBuf,
    pub config: Option<PathBuf>,
    pub out_dir: PathBuf,
    pub format: ResultFormat,
    pub json: bool,
    pub output: Option<PathBuf>,
    pub tail: Option<usize>,
    pub strict: bool,
}

fn load_config(path: Option<&Path>) -> Result<ReconConfig, CliError> {
    let Some(path) = path else {
        return Ok(ReconConfig::default());
    };

    let config_str = std::fs::read_to_string(path)
        .map_err(|e| CliError::io(format!("cannot read config {}: {e}", path.display())))?;

    ReconConfig::from_toml(&config_str).map_err(CliError::recon)
}

fn load_report(path: &Path, preferred_sheet: &str) -> Result<RawBatch, CliError> {
    InputFormat::from_path(path).map_err(|e| {
        CliError::args(e).with_hint("supported: csv, tsv, txt, xlsx, xlsm, xls, xlsb, ods")
    })?;

    if !path.exists() {
        return Err(CliError::io(format!("file not found: {}", path.display())));
    }

    correlativo_io::load_batch(path, preferred_sheet).map_err(CliError::io)
}

fn export(result: &ReconResult, config: &ReconConfig, out_dir: &Path, format: ResultFormat) -> Result<PathBuf, CliError> {
    std::fs::create_dir_all(out_dir)
        .map_err(|e| CliError::io(format!("cannot create {}: {e}", out_dir.display())))?;

    let file_name = correlativo_io::artifact_file_name(
        &config.output.file_prefix,
        result.meta.reporting_period,
        format.extension(),
    );
    let path = out_dir.join(file_name);

    let written = match format {
        ResultFormat::Xlsx => {
            correlativo_io::xlsx::export_result(result, &path, &config.output.sheet_name)
        }
        ResultFormat::Csv => correlativo_io::csv::export_result(result, &path),
    };
    written.map_err(CliError::io)?;

    Ok(path)
}

pub fn cmd_run(opts: RunOptions) -> Result<(), CliError> {
    let config = load_config(opts.config.as_deref())?;

    let previous = load_report(&opts.previous, &config.output.preferred_sheet)?;
    let current = load_report(&opts.current, &config.output.preferred_sheet)?;

    let result = correlativo_recon::run(
        &config,
        &ReconInput {
            previous: &previous,
            current: &current,
        },
    )
    .map_err(CliError::recon)?;

    let artifact = export(&result, &config, &opts.out_dir, opts.format)?;

    if opts.json || opts.output.is_some() {
        let json_str = serde_json::to_string_pretty(&result)
            .map_err(|e| CliError::general(format!("JSON serialization error: {e}")))?;

        if let Some(ref path) = opts.output {
            std::fs::write(path, &json_str)
                .map_err(|e| CliError::io(format!("cannot write output: {e}")))?;
            eprintln!("wrote {}", path.display());
        }

        if opts.json {
            println!("{json_str}");
        }
    }

    // Human summary to stderr
    let s = &result.summary;
    eprintln!(
        "periodo {} -> {} (reporte {})",
        result.meta.previous_period, result.meta.current_period, result.meta.reporting_period
    );
    eprintln!("Total Registros:   {}", s.total_records);
    eprintln!("Saltos Detectados: {}", s.sequence_breaks);
    eprintln!("Duplicados:        {}", s.duplicates);
    eprintln!("wrote {}", artifact.display());

    if let Some(n) = opts.tail {
        eprint!("{}", preview::render_tail(&result, n));
    }

    if opts.strict && (s.sequence_breaks > 0 || s.duplicates > 0) {
        return Err(CliError::new(
            EXIT_FINDINGS,
            format!("{} sequence breaks, {} duplicates", s.sequence_breaks, s.duplicates),
        ));
    }

    Ok(())
}

pub fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config = load_config(Some(config_path.as_path()))?;
    eprintln!(
        "valid: '{}' reading {} -> sheet '{}'",
        config.name,
        config
            .columns
            .entries()
            .iter()
            .map(|(_, header)| format!("'{header}'"))
            .collect::<Vec<_>>()
            .join(", "),
        config.output.sheet_name,
    );
    Ok(())
}

pub fn cmd_init_config(output: Option<PathBuf>) -> Result<(), CliError> {
    let toml_str = ReconConfig::default()
        .to_toml()
        .map_err(|e| CliError::new(EXIT_INVALID_CONFIG, e.to_string()))?;

    match output {
        Some(path) => {
            if path.exists() {
                return Err(CliError::args(format!("{} already exists", path.display()))
                    .with_hint("remove it or pick another --output path"));
            }
            std::fs::write(&path, &toml_str)
                .map_err(|e| CliError::io(format!("cannot write {}: {e}", path.display())))?;
            eprintln!("wrote {}", path.display());
        }
        None => print!("{toml_str}"),
    }

    Ok(())
}
