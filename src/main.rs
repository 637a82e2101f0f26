use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;

use perf_import::config::{self, Config};
use perf_import::import::{ImportEvent, ImportOptions, ImportSummary, run_import};
use perf_import::logging::init_tracing;
use perf_import::report::write_report;
use perf_import::rest::{BatchOutcome, DEFAULT_BATCH_SIZE};
use perf_import::sheet::DEFAULT_WORKBOOK;

const SKIPPED_PREVIEW: usize = 15;

fn main() -> Result<ExitCode> {
    config::load_dotenv();
    let Some(config) = Config::from_env() else {
        println!("Error: Missing environment variables");
        println!("Run: source .env.local first");
        return Ok(ExitCode::from(1));
    };
    init_tracing("warn")?;

    let options = ImportOptions {
        workbook: parse_path_arg("--file").unwrap_or_else(|| PathBuf::from(DEFAULT_WORKBOOK)),
        batch_size: parse_batch_size_arg().unwrap_or(DEFAULT_BATCH_SIZE),
        dry_run: has_flag("--dry-run"),
    };

    let summary = run_import(&config, &options, print_event)?;
    print_totals(&summary, &options);

    if let Some(path) = parse_path_arg("--report") {
        write_report(&path, &summary)?;
        println!("Report written to {}", path.display());
    }

    Ok(ExitCode::SUCCESS)
}

fn print_event(event: ImportEvent<'_>) {
    match event {
        ImportEvent::LoadingWorkbook => println!("Loading Excel file..."),
        ImportEvent::DateColumns(n) => println!("Found {n} date columns"),
        ImportEvent::FetchingPlayers => println!("Fetching players from database..."),
        ImportEvent::PlayersFetched(n) => println!("Found {n} players in database"),
        ImportEvent::Parsed {
            matched,
            skipped,
            records,
        } => {
            println!("\nMatched {} players", matched.len());
            println!("Skipped {} players (not in database)", skipped.len());
            if !skipped.is_empty() {
                println!("\nSkipped players (first {SKIPPED_PREVIEW}):");
                for name in skipped.iter().take(SKIPPED_PREVIEW) {
                    println!("  - {name}");
                }
                if skipped.len() > SKIPPED_PREVIEW {
                    println!("  ... and {} more", skipped.len() - SKIPPED_PREVIEW);
                }
            }
            println!("\nTotal performance records to insert: {records}");
        }
        ImportEvent::Batch(report) => match &report.outcome {
            BatchOutcome::Inserted => {
                println!("  Inserted batch {}: {} records", report.index, report.size)
            }
            BatchOutcome::Unconfirmed { .. } => {}
            BatchOutcome::Rejected { status, body } => println!("Error: {status} - {body}"),
            BatchOutcome::Failed(err) => println!("Error: batch {} - {err}", report.index),
        },
    }
}

fn print_totals(summary: &ImportSummary, options: &ImportOptions) {
    if summary.records.is_empty() {
        println!("No records to insert!");
        return;
    }
    if options.dry_run {
        println!("\nDry run: nothing sent.");
        return;
    }
    println!("\nDone! Inserted {} performance records.", summary.inserted());
}

fn parse_path_arg(flag: &str) -> Option<PathBuf> {
    parse_value_arg(flag).map(PathBuf::from)
}

fn parse_batch_size_arg() -> Option<usize> {
    parse_value_arg("--batch-size")
        .and_then(|raw| raw.parse::<usize>().ok())
        .filter(|n| *n > 0)
}

fn has_flag(flag: &str) -> bool {
    std::env::args().skip(1).any(|arg| arg == flag)
}

fn parse_value_arg(flag: &str) -> Option<String> {
    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let prefix = format!("{flag}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(value) = arg.strip_prefix(&prefix) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if arg == flag {
            let Some(next) = args.get(idx + 1) else {
                continue;
            };
            if !next.trim().is_empty() {
                return Some(next.clone());
            }
        }
    }
    None
}
