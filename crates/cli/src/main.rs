// correlativo CLI - invoice numbering breaks and duplicates across two period reports

mod exit_codes;
mod preview;
mod recon;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use correlativo_recon::ReconError;
use exit_codes::{recon_exit_code, EXIT_ERROR, EXIT_IO, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "correlativo")]
#[command(about = "Detect invoice numbering breaks and duplicates across two period reports")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// Log every stage to stderr (same as RUST_LOG=debug)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile the previous and current period reports
    #[command(after_help = "\
Exit code 3 (with --strict) means sequence breaks or duplicates were found.

Examples:
  correlativo run abril.xlsx mayo.xlsx
  correlativo run abril.csv mayo.csv --format csv --out-dir out/
  correlativo run abril.xlsx mayo.xlsx --tail 20
  correlativo run abril.xlsx mayo.xlsx --config empresa.recon.toml --json
  correlativo run abril.xlsx mayo.xlsx --output result.json --strict")]
    Run {
        /// Report of the previous period (csv, tsv, txt, xlsx, xlsm, xls, xlsb, ods)
        previous: PathBuf,

        /// Report of the current period
        current: PathBuf,

        /// Config file (.recon.toml); built-in defaults when omitted
        #[arg(long, short = 'c')]
        config: Option<PathBuf>,

        /// Directory for the result file
        #[arg(long, default_value = ".")]
        out_dir: PathBuf,

        /// Result file format
        #[arg(long, short = 'f', value_enum, default_value_t = ResultFormat::Xlsx)]
        format: ResultFormat,

        /// Print the full result as JSON on stdout
        #[arg(long)]
        json: bool,

        /// Write the JSON result to a file
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Preview the last N annotated rows on stderr
        #[arg(long, value_name = "N")]
        tail: Option<usize>,

        /// Exit 3 when any sequence break or duplicate is found
        #[arg(long)]
        strict: bool,
    },

    /// Parse and validate a config without running
    #[command(after_help = "\
Examples:
  correlativo validate empresa.recon.toml")]
    Validate {
        /// Path to the .recon.toml config file
        config: PathBuf,
    },

    /// Print the default config (or write it to a file)
    #[command(after_help = "\
Examples:
  correlativo init-config
  correlativo init-config --output empresa.recon.toml")]
    InitConfig {
        /// Write to this file instead of stdout
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ResultFormat {
    Xlsx,
    Csv,
}

impl ResultFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ResultFormat::Xlsx => "xlsx",
            ResultFormat::Csv => "csv",
        }
    }
}

fn long_version() -> &'static str {
    if cfg!(debug_assertions) {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nengine:  correlativo-recon ", env!("CARGO_PKG_VERSION"),
            "\nbuild:   debug",
            "\ntarget:  ", env!("TARGET"),
        )
    } else {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nengine:  correlativo-recon ", env!("CARGO_PKG_VERSION"),
            "\nbuild:   release",
            "\ntarget:  ", env!("TARGET"),
        )
    }
}

/// stderr subscriber; `log` records from the library crates are bridged in.
fn init_logging(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false),
        )
        .with(filter)
        .try_init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Run {
            previous,
            current,
            config,
            out_dir,
            format,
            json,
            output,
            tail,
            strict,
        } => recon::cmd_run(recon::RunOptions {
            previous,
            current,
            config,
            out_dir,
            format,
            json,
            output,
            tail,
            strict,
        }),
        Commands::Validate { config } => recon::cmd_validate(config),
        Commands::InitConfig { output } => recon::cmd_init_config(output),
    };

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn new(code: u8, msg: impl Into<String>) -> Self {
        Self { code, message: msg.into(), hint: None }
    }

    pub fn args(msg: impl Into<String>) -> Self {
        Self::new(EXIT_USAGE, msg)
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self::new(EXIT_IO, msg)
    }

    pub fn general(msg: impl Into<String>) -> Self {
        Self::new(EXIT_ERROR, msg)
    }

    /// Create error from an engine error with its registered exit code.
    pub fn recon(err: ReconError) -> Self {
        let hint = match &err {
            ReconError::MissingColumn { .. } => Some(
                "headers must match the [columns] config exactly, including trailing spaces".to_string(),
            ),
            ReconError::EmptyPeriod { .. } => {
                Some("at least one row of each report needs a period".to_string())
            }
            _ => None,
        };
        Self { code: recon_exit_code(&err), message: err.to_string(), hint }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
