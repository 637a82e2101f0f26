use std::path::Path;

use anyhow::{Context, Result};
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::import::ImportSummary;
use crate::model::{PerformanceRecord, Score};

/// Writes Summary, Skipped and Records sheets for one import run.
pub fn write_report(path: &Path, summary: &ImportSummary) -> Result<()> {
    let upsert = summary.upsert.clone().unwrap_or_default();
    let summary_rows = vec![
        vec!["Metric".to_string(), "Value".to_string()],
        count_row("Date columns", summary.date_columns),
        count_row("Registry players", summary.registry_players),
        count_row("Matched players", summary.matched.len()),
        count_row("Skipped players", summary.skipped.len()),
        count_row("Records", summary.records.len()),
        count_row("Batches sent", upsert.batches),
        count_row("Batches failed", upsert.failed_batches),
        count_row("Records inserted", upsert.inserted),
    ];

    let mut skipped_rows = vec![vec!["Player".to_string()]];
    skipped_rows.extend(summary.skipped.iter().map(|name| vec![name.clone()]));

    let mut record_rows = vec![vec![
        "Player ID".to_string(),
        "Match Date".to_string(),
        "Raw Score".to_string(),
        "Ranking".to_string(),
        "Reward".to_string(),
    ]];
    record_rows.extend(summary.records.iter().map(record_row));

    let mut workbook = Workbook::new();
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Summary")?;
        write_rows(sheet, &summary_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Skipped")?;
        write_rows(sheet, &skipped_rows)?;
    }
    {
        let sheet = workbook.add_worksheet();
        sheet.set_name("Records")?;
        write_rows(sheet, &record_rows)?;
    }

    workbook
        .save(path)
        .with_context(|| format!("failed writing report to {}", path.display()))?;
    Ok(())
}

fn count_row(label: &str, value: usize) -> Vec<String> {
    vec![label.to_string(), value.to_string()]
}

fn record_row(record: &PerformanceRecord) -> Vec<String> {
    vec![
        record.player_id.to_string(),
        record.match_date.clone(),
        record.raw_score.map(score_text).unwrap_or_default(),
        opt_to_string(record.ranking),
        opt_to_string(record.reward),
    ]
}

fn score_text(score: Score) -> String {
    match score {
        Score::Int(v) => v.to_string(),
        Score::Decimal(v) => v.to_string(),
    }
}

fn opt_to_string<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32, col_idx as u16, value)
                .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}
