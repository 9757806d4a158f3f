use anyhow::{Context, Result};
use gh_attachments::cli::commands::{CheckCommand, FilterArgs, ListCommand, SummaryCommand};
use gh_attachments::cli::output::*;
use gh_attachments::cli::{exit_code_for, Cli, Command};
use gh_attachments::core::{listing_entries, listing_lines};
use gh_attachments::{Archive, ScanConfig, ScanReport, Scanner, Summary};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

fn main() {
    let cli = Cli::from_args();

    if let Err(e) = init_logging(cli.verbose) {
        eprintln!("{}{:#}", WARN, e);
    }

    let code = match run(&cli) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}{} {:#}", CROSS, style("Error:").red().bold(), e);
            exit_code_for(&e)
        }
    };

    std::process::exit(code);
}

fn init_logging(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set logging subscriber")?;
    Ok(())
}

fn run(cli: &Cli) -> Result<exitcode::ExitCode> {
    let file_config = match &cli.config {
        Some(path) => ScanConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ScanConfig::default(),
    };

    match cli.command() {
        Command::List(cmd) => {
            let config = resolve_config(file_config, cli.directory.clone(), &cmd.filters)?;
            list_attachments(&cmd, &config)
        }
        Command::Summary(cmd) => {
            let config = resolve_config(file_config, cli.directory.clone(), &cmd.filters)?;
            summarize_attachments(&cmd, &config)
        }
        Command::Check(cmd) => {
            let overrides = ScanConfig {
                directory: cli.directory.clone(),
                allow_missing: Some(true),
                ..Default::default()
            };
            check_archive(&cmd, &file_config.merge_cli(overrides))
        }
    }
}

fn resolve_config(
    file_config: ScanConfig,
    directory: Option<PathBuf>,
    filters: &FilterArgs,
) -> Result<ScanConfig> {
    let config = file_config.merge_cli(filters.to_config(directory));
    config.validate().context("Invalid options")?;
    Ok(config)
}

fn scan(config: &ScanConfig) -> Result<ScanReport> {
    let archive = Archive::open(config.directory())?;

    let progress = create_progress_bar();
    let mut scanner = Scanner::new(config.to_scan_options());
    let handler_progress = progress.clone();
    scanner.add_event_handler(move |event| report_progress(&handler_progress, event));

    let result = scanner.scan(&archive);
    progress.finish_and_clear();

    Ok(result?)
}

/// Print results to stdout
fn emit<I>(lines: I) -> Result<()>
where
    I: IntoIterator,
    I::Item: std::fmt::Display,
{
    print_lines(lines).context("Failed to write output")
}

fn list_attachments(cmd: &ListCommand, config: &ScanConfig) -> Result<exitcode::ExitCode> {
    let report = scan(config)?;

    if cmd.json {
        let json = serde_json::to_string_pretty(&listing_entries(&report))?;
        emit([json])?;
    } else {
        emit(listing_lines(&report))?;
    }

    if !report.missing.is_empty() {
        eprintln!(
            "{}{} attachment file(s) missing",
            WARN,
            style(report.missing.len()).yellow()
        );
    }

    Ok(exitcode::OK)
}

fn summarize_attachments(cmd: &SummaryCommand, config: &ScanConfig) -> Result<exitcode::ExitCode> {
    let report = scan(config)?;
    let summary = Summary::from_report(&report);

    if cmd.json {
        emit([serde_json::to_string_pretty(&summary)?])?;
    } else {
        emit([format_summary(&summary)])?;
    }

    Ok(exitcode::OK)
}

fn check_archive(cmd: &CheckCommand, config: &ScanConfig) -> Result<exitcode::ExitCode> {
    let report = scan(config)?;

    if cmd.json {
        let data = serde_json::json!({
            "metadata_files": report.metadata_files,
            "attachments": report.total_records,
            "orphans": report.orphans.len(),
            "missing": report.missing,
        });
        emit([serde_json::to_string_pretty(&data)?])?;
    } else if report.missing.is_empty() {
        let mut lines = vec![format!(
            "{}Archive OK: {} attachment(s) across {} metadata file(s)",
            CHECK,
            style(report.total_records).cyan(),
            style(report.metadata_files).cyan()
        )];
        if !report.orphans.is_empty() {
            lines.push(format!(
                "{}{} attachment(s) without a parent",
                WARN,
                style(report.orphans.len()).yellow()
            ));
        }
        emit(lines)?;
    } else {
        emit([format_missing(&report.missing)])?;
    }

    if report.missing.is_empty() {
        Ok(exitcode::OK)
    } else {
        Ok(exitcode::DATAERR)
    }
}
