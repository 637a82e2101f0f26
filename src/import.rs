use std::collections::BTreeSet;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use crate::blocks::parse_blocks;
use crate::config::Config;
use crate::dates::date_columns;
use crate::http_client::http_client;
use crate::model::PerformanceRecord;
use crate::names::PlayerMatcher;
use crate::rest::{BatchReport, DEFAULT_BATCH_SIZE, RestClient, UpsertSummary, upsert_performance};
use crate::sheet::{DEFAULT_WORKBOOK, load_first_sheet};

#[derive(Debug, Clone)]
pub struct ImportOptions {
    pub workbook: PathBuf,
    pub batch_size: usize,
    pub dry_run: bool,
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            workbook: PathBuf::from(DEFAULT_WORKBOOK),
            batch_size: DEFAULT_BATCH_SIZE,
            dry_run: false,
        }
    }
}

pub enum ImportEvent<'a> {
    LoadingWorkbook,
    DateColumns(usize),
    FetchingPlayers,
    PlayersFetched(usize),
    Parsed {
        matched: &'a BTreeSet<String>,
        skipped: &'a BTreeSet<String>,
        records: usize,
    },
    Batch(&'a BatchReport),
}

#[derive(Debug, Clone, Default)]
pub struct ImportSummary {
    pub date_columns: usize,
    pub registry_players: usize,
    pub matched: BTreeSet<String>,
    pub skipped: BTreeSet<String>,
    pub records: Vec<PerformanceRecord>,
    /// `None` when nothing was sent (dry run or no records).
    pub upsert: Option<UpsertSummary>,
}

impl ImportSummary {
    pub fn inserted(&self) -> usize {
        self.upsert.as_ref().map(|u| u.inserted).unwrap_or(0)
    }
}

pub fn run_import(
    config: &Config,
    options: &ImportOptions,
    mut on_event: impl FnMut(ImportEvent<'_>),
) -> Result<ImportSummary> {
    on_event(ImportEvent::LoadingWorkbook);
    let grid = load_first_sheet(&options.workbook)?;
    let dates = date_columns(&grid);
    on_event(ImportEvent::DateColumns(dates.len()));

    on_event(ImportEvent::FetchingPlayers);
    let client = http_client()?;
    let rest = RestClient::new(client, config);
    let players = rest
        .fetch_players()
        .context("fetch player registry")?;
    let matcher = PlayerMatcher::from_players(&players);
    on_event(ImportEvent::PlayersFetched(matcher.len()));

    let parsed = parse_blocks(&grid, &dates, &matcher);
    on_event(ImportEvent::Parsed {
        matched: &parsed.matched,
        skipped: &parsed.skipped,
        records: parsed.records.len(),
    });
    info!(
        rows = grid.height(),
        dates = dates.len(),
        records = parsed.records.len(),
        "sheet parsed"
    );

    let upsert = if options.dry_run || parsed.records.is_empty() {
        None
    } else {
        Some(upsert_performance(
            &rest,
            &parsed.records,
            options.batch_size,
            |report| on_event(ImportEvent::Batch(report)),
        ))
    };

    Ok(ImportSummary {
        date_columns: dates.len(),
        registry_players: matcher.len(),
        matched: parsed.matched,
        skipped: parsed.skipped,
        records: parsed.records,
        upsert,
    })
}
