//! `flexitrack check` / `run` / `validate`: load the two uploads, reconcile,
//! report.

use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{NaiveDate, NaiveDateTime};
use clap::Args;

use flexitrack_recon::config::{ReconOptions, RosterTieBreak, RunConfig};
use flexitrack_recon::export::{to_json, write_csv, DEFAULT_CSV_NAME};
use flexitrack_recon::model::ReconInput;
use flexitrack_recon::schema::{employment_records, roster_records, EMPLOYMENT_COLUMNS, ROSTER_COLUMNS};
use flexitrack_recon::{ReconError, StatusReport};

use crate::exit_codes::{
    io_exit_code, recon_exit_code, EXIT_ERROR, EXIT_RECON_FLAGGED, EXIT_RECON_UNREADABLE,
};
use crate::util::format_table;
use crate::CliError;

/// Widest a column may grow in the stderr table.
const TABLE_MAX_COL: usize = 36;

#[derive(Args)]
pub struct CheckArgs {
    /// SAP employment export (CSV, TSV or spreadsheet)
    pub employment: PathBuf,

    /// Deployment roster (CSV, TSV or spreadsheet)
    pub roster: PathBuf,

    /// Worksheet to read from the employment workbook (default: first sheet)
    #[arg(long, value_name = "SHEET")]
    pub employment_sheet: Option<String>,

    /// Worksheet to read from the roster workbook (default: first sheet)
    #[arg(long, value_name = "SHEET")]
    pub roster_sheet: Option<String>,

    #[command(flatten)]
    pub clock: ClockArgs,

    /// Keep the first roster row per officer instead of the last
    #[arg(long)]
    pub keep_first: bool,

    /// Extra chrono date format for Start Date, tried before the built-ins. Repeatable.
    #[arg(long = "date-format", value_name = "FORMAT")]
    pub date_formats: Vec<String>,

    /// Write the flagged-officer CSV here (a directory gets flagged_officers_summary.csv)
    #[arg(long, short = 'o', value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Write the JSON report here
    #[arg(long, value_name = "FILE")]
    pub json_output: Option<PathBuf>,

    #[command(flatten)]
    pub report: ReportArgs,
}

#[derive(Args)]
pub struct RunArgs {
    /// Path to the .flexi.toml run config
    pub config: PathBuf,

    #[command(flatten)]
    pub clock: ClockArgs,

    #[command(flatten)]
    pub report: ReportArgs,
}

#[derive(Args)]
pub struct ClockArgs {
    /// Reconcile as of this time instead of now (YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS)
    #[arg(long, env = "FLEXITRACK_AS_OF", value_name = "WHEN", value_parser = parse_as_of)]
    pub as_of: Option<NaiveDateTime>,
}

impl ClockArgs {
    /// The only place the wall clock is read.
    fn now(&self) -> NaiveDateTime {
        self.as_of
            .unwrap_or_else(|| chrono::Local::now().naive_local())
    }
}

#[derive(Args)]
pub struct ReportArgs {
    /// Print the JSON report to stdout
    #[arg(long)]
    pub json: bool,

    /// No summary or table on stderr
    #[arg(long, short)]
    pub quiet: bool,

    /// Exit 64 when any officer is flagged
    #[arg(long)]
    pub strict_exit: bool,
}

pub(crate) fn parse_as_of(value: &str) -> Result<NaiveDateTime, String> {
    let value = value.trim();
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(value, fmt) {
            return Ok(dt);
        }
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map(|d| d.and_time(chrono::NaiveTime::MIN))
        .map_err(|_| format!("invalid date/time '{value}' (expected YYYY-MM-DD or YYYY-MM-DDTHH:MM:SS)"))
}

fn recon_err(err: ReconError) -> CliError {
    let hint = match &err {
        ReconError::MissingColumn { .. } => Some(format!(
            "employment needs: {}; roster needs: {}",
            EMPLOYMENT_COLUMNS.join(", "),
            ROSTER_COLUMNS.join(", ")
        )),
        ReconError::MalformedDate { .. } => {
            Some("add the file's date layout with --date-format (e.g. --date-format %d/%m/%Y)".into())
        }
        _ => None,
    };
    CliError { code: recon_exit_code(&err), message: err.to_string(), hint }
}

fn io_err(err: flexitrack_io::IoError) -> CliError {
    CliError { code: io_exit_code(&err), message: err.to_string(), hint: None }
}

/// One input file plus the worksheet to read from it.
struct Upload<'a> {
    path: &'a Path,
    sheet: Option<&'a str>,
}

fn reconcile_files(
    employment: Upload<'_>,
    roster: Upload<'_>,
    now: NaiveDateTime,
    options: &ReconOptions,
) -> Result<StatusReport, CliError> {
    let started = Instant::now();
    let employment_table =
        flexitrack_io::load_table(employment.path, employment.sheet).map_err(io_err)?;
    let roster_table = flexitrack_io::load_table(roster.path, roster.sheet).map_err(io_err)?;

    let input = ReconInput {
        employment: employment_records(&employment_table).map_err(recon_err)?,
        roster: roster_records(&roster_table).map_err(recon_err)?,
        now,
    };
    let report = flexitrack_recon::run(&input, options).map_err(recon_err)?;
    log::info!("reconciled in {:.2}s", started.elapsed().as_secs_f64());
    Ok(report)
}

/// Where a finished report goes.
struct Outputs {
    csv: Option<PathBuf>,
    json_file: Option<PathBuf>,
}

fn emit(report: &StatusReport, outputs: &Outputs, flags: &ReportArgs) -> Result<(), CliError> {
    if let Some(ref path) = outputs.csv {
        let file = std::fs::File::create(path).map_err(|e| CliError {
            code: EXIT_ERROR,
            message: format!("cannot write {}: {e}", path.display()),
            hint: None,
        })?;
        write_csv(report, file).map_err(recon_err)?;
        log::info!("wrote {}", path.display());
        if !flags.quiet {
            eprintln!("wrote {}", path.display());
        }
    }

    if outputs.json_file.is_some() || flags.json {
        let json_str = to_json(report).map_err(recon_err)?;
        if let Some(ref path) = outputs.json_file {
            std::fs::write(path, &json_str).map_err(|e| CliError {
                code: EXIT_ERROR,
                message: format!("cannot write {}: {e}", path.display()),
                hint: None,
            })?;
            if !flags.quiet {
                eprintln!("wrote {}", path.display());
            }
        }
        if flags.json {
            println!("{json_str}");
        }
    }

    if !flags.quiet {
        print_summary(report);
    }

    if flags.strict_exit && !report.is_clean() {
        return Err(CliError {
            code: EXIT_RECON_FLAGGED,
            message: format!("{} officer(s) flagged", report.summary.total_flagged),
            hint: None,
        });
    }
    Ok(())
}

fn print_summary(report: &StatusReport) {
    let s = &report.summary;
    for warning in &report.warnings {
        eprintln!("warning: {warning}");
    }
    eprintln!(
        "flexi check as of {}: {} employment row(s) for {} officer(s), {} roster row(s) for {} officer(s)",
        report.meta.now.format("%Y-%m-%d %H:%M"),
        s.employment_rows,
        s.employment_staff,
        s.roster_rows,
        s.roster_staff,
    );
    eprintln!(
        "{} flagged: {} not worked since {}, {} with no employment record",
        s.total_flagged,
        s.not_worked,
        report.meta.cutoff.format("%Y-%m-%d"),
        s.no_record,
    );

    if report.rows.is_empty() {
        return;
    }
    let rows: Vec<Vec<String>> = report
        .rows
        .iter()
        .map(|r| {
            vec![
                r.staff_id.clone(),
                r.name.clone(),
                r.last_deployed_date.to_string(),
                r.status.to_string(),
            ]
        })
        .collect();
    eprintln!();
    for line in format_table(
        &["Staff ID", "Name", "Last Deployed", "Status"],
        &rows,
        TABLE_MAX_COL,
    ) {
        eprintln!("  {line}");
    }
}

pub fn cmd_check(args: CheckArgs) -> Result<(), CliError> {
    let options = ReconOptions {
        roster_tie_break: if args.keep_first { RosterTieBreak::First } else { RosterTieBreak::Last },
        date_formats: args.date_formats,
    };
    if let Some(bad) = options
        .date_formats
        .iter()
        .find(|f| !flexitrack_recon::dates::is_valid_format(f))
    {
        return Err(CliError::args(format!("invalid --date-format '{bad}'"))
            .with_hint("use chrono strftime syntax, e.g. %d/%m/%Y"));
    }

    let report = reconcile_files(
        Upload { path: &args.employment, sheet: args.employment_sheet.as_deref() },
        Upload { path: &args.roster, sheet: args.roster_sheet.as_deref() },
        args.clock.now(),
        &options,
    )?;

    let csv = args
        .output
        .map(|p| if p.is_dir() { p.join(DEFAULT_CSV_NAME) } else { p });
    let outputs = Outputs { csv, json_file: args.json_output };
    emit(&report, &outputs, &args.report)
}

fn load_config(config_path: &Path) -> Result<RunConfig, CliError> {
    let config_str = std::fs::read_to_string(config_path).map_err(|e| CliError {
        code: EXIT_RECON_UNREADABLE,
        message: format!("cannot read config {}: {e}", config_path.display()),
        hint: None,
    })?;
    RunConfig::from_toml(&config_str).map_err(recon_err)
}

pub fn cmd_run(args: RunArgs) -> Result<(), CliError> {
    let config = load_config(&args.config)?;
    log::info!("running '{}'", config.name);

    // Paths in the config are relative to the config file's directory
    let base_dir = args.config.parent().unwrap_or_else(|| Path::new("."));
    let employment = base_dir.join(&config.inputs.employment);
    let roster = base_dir.join(&config.inputs.roster);

    let report = reconcile_files(
        Upload { path: &employment, sheet: config.inputs.employment_sheet.as_deref() },
        Upload { path: &roster, sheet: config.inputs.roster_sheet.as_deref() },
        args.clock.now(),
        &config.options,
    )?;

    let outputs = Outputs {
        csv: config.output.csv.as_ref().map(|p| base_dir.join(p)),
        json_file: config.output.json.as_ref().map(|p| base_dir.join(p)),
    };
    emit(&report, &outputs, &args.report)
}

pub fn cmd_validate(config_path: PathBuf) -> Result<(), CliError> {
    let config = load_config(&config_path)?;
    let outputs: Vec<&str> = [config.output.csv.as_deref(), config.output.json.as_deref()]
        .into_iter()
        .flatten()
        .collect();
    eprintln!(
        "valid: '{}' ({} vs {}, roster tie-break: {}, {} extra date format(s), output: {})",
        config.name,
        config.inputs.employment,
        config.inputs.roster,
        config.options.roster_tie_break,
        config.options.date_formats.len(),
        if outputs.is_empty() { "none".to_string() } else { outputs.join(", ") },
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn as_of_accepts_date_and_datetime() {
        let d = parse_as_of("2024-07-01").unwrap();
        assert_eq!(d.format("%Y-%m-%d %H:%M:%S").to_string(), "2024-07-01 00:00:00");
        let dt = parse_as_of("2024-07-01T09:30:00").unwrap();
        assert_eq!(dt.format("%H:%M").to_string(), "09:30");
        let spaced = parse_as_of(" 2024-07-01 09:30:00 ").unwrap();
        assert_eq!(spaced, dt);
    }

    #[test]
    fn as_of_rejects_garbage() {
        let err = parse_as_of("next tuesday").unwrap_err();
        assert!(err.contains("next tuesday"));
        assert!(parse_as_of("2024-13-01").is_err());
    }

    #[test]
    fn schema_errors_carry_column_hint() {
        let err = recon_err(ReconError::MissingColumn {
            table: "roster.csv".into(),
            column: "Personnel no.".into(),
        });
        assert_eq!(err.code, crate::exit_codes::EXIT_RECON_SCHEMA);
        assert!(err.hint.unwrap().contains("Person First Name"));
    }
}
