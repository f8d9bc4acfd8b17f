// flexitrack CLI - headless flexi officer reconciliation
//
// Replaces the upload/run/download form: point it at the SAP employment
// export and the deployment roster, get the flagged-officer summary back.

mod exit_codes;
mod recon;
mod util;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{ArgAction, Parser, Subcommand};

use exit_codes::{EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "flexitrack")]
#[command(about = "Flag flexi officers who have not worked recently or have no employment record")]
#[command(long_version = long_version())]
#[command(version)]
struct Cli {
    /// More log output on stderr (-v info, -vv debug). RUST_LOG overrides.
    #[arg(long, short, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile an employment export against a roster
    #[command(after_help = "\
Examples:
  flexitrack check sap_export.xlsx roster.csv
  flexitrack check sap_export.xlsx roster.xlsx --roster-sheet 'Week 27'
  flexitrack check sap.csv roster.csv --output flagged_officers_summary.csv
  flexitrack check sap.csv roster.csv --as-of 2024-07-01 --json
  flexitrack check sap.csv roster.csv --date-format %d/%m/%Y --strict-exit")]
    Check(recon::CheckArgs),

    /// Run a saved .flexi.toml config
    #[command(after_help = "\
Examples:
  flexitrack run weekly.flexi.toml
  flexitrack run weekly.flexi.toml --json --quiet
  FLEXITRACK_AS_OF=2024-07-01 flexitrack run weekly.flexi.toml --strict-exit")]
    Run(recon::RunArgs),

    /// Validate a .flexi.toml config without running it
    #[command(after_help = "\
Examples:
  flexitrack validate weekly.flexi.toml")]
    Validate {
        /// Path to the .flexi.toml config file
        config: PathBuf,
    },
}

fn long_version() -> &'static str {
    if cfg!(debug_assertions) {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nbuild:   debug",
            "\ntarget:  ", env!("TARGET"),
        )
    } else {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nbuild:   release",
            "\ntarget:  ", env!("TARGET"),
        )
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .format_target(false)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Check(args) => recon::cmd_check(args),
        Commands::Run(args) => recon::cmd_run(args),
        Commands::Validate { config } => recon::cmd_validate(config),
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
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}
