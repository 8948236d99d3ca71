//! Command execution: logging setup, the conversion run and its report

use crate::cli::args::Args;
use crate::error::Result;
use crate::models::BatchReport;
use crate::processor::BatchConverter;

use colored::*;
use tracing::debug;

/// Set up structured logging based on CLI arguments
pub fn setup_logging(args: &Args) -> anyhow::Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("wdf_converter={}", log_level)));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_level(true)
                .with_timer(fmt::time::uptime())
                .with_writer(std::io::stderr),
        )
        .try_init()?;

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Run a batch conversion for the parsed arguments
pub fn run(args: &Args) -> Result<BatchReport> {
    let config = args.to_config()?;
    debug!("Conversion configuration: {:?}", config);

    let report = BatchConverter::new(config).run()?;
    print_report(&report, args.verbose);
    Ok(report)
}

/// Final report lines for a finished batch
pub fn report_lines(report: &BatchReport, verbose: bool) -> Vec<String> {
    let mut lines = vec![report.summary_line()];

    if verbose && !report.failures.is_empty() {
        lines.push("Failures grouped by error:".to_string());
        for group in report.failures.groups() {
            lines.push(format!("- {} ({}):", group.category, group.files.len()));
            lines.extend(group.files.iter().map(|file| format!("    - {}", file)));
        }
    }

    lines.push(format!(
        "Successfully converted {} WDF files to {} files.",
        report.succeeded, report.format
    ));

    let failed = report.failures.failed_files();
    if !failed.is_empty() {
        lines.push(format!("Failed to convert {} files:", failed.len()));
        if verbose {
            lines.extend(failed.iter().map(|file| format!(" - {}", file)));
        }
    }

    lines
}

fn print_report(report: &BatchReport, verbose: bool) {
    for line in report_lines(report, verbose) {
        if line.starts_with("Completed") {
            println!("{}", line.bright_green().bold());
        } else if line.starts_with("Failed to convert") || line.starts_with("Failures grouped") {
            println!("{}", line.bright_red());
        } else {
            println!("{}", line);
        }
    }
}
