use anyhow::{Context, Result, anyhow};
use reqwest::blocking::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::Config;
use crate::model::{PerformanceRecord, Player};

pub const PLAYERS_TABLE: &str = "players";
pub const PERFORMANCE_TABLE: &str = "performance";
pub const DEFAULT_BATCH_SIZE: usize = 200;

const MERGE_DUPLICATES: &str = "resolution=merge-duplicates";
const ERROR_BODY_PREVIEW_CHARS: usize = 200;

/// Thin PostgREST wrapper: `apikey` plus bearer auth on every call.
pub struct RestClient<'a> {
    client: &'a Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum BatchOutcome {
    Inserted,
    /// Success status other than 200/201; the rows may or may not have
    /// landed, so they are not counted.
    Unconfirmed { status: u16 },
    Rejected { status: u16, body: String },
    Failed(String),
}

#[derive(Debug, Clone)]
pub struct BatchReport {
    /// 1-based.
    pub index: usize,
    pub size: usize,
    pub outcome: BatchOutcome,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpsertSummary {
    pub batches: usize,
    pub failed_batches: usize,
    pub inserted: usize,
}

impl<'a> RestClient<'a> {
    pub fn new(client: &'a Client, config: &Config) -> Self {
        Self {
            client,
            base_url: config.base_url.clone(),
            api_key: config.service_key.clone(),
        }
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    pub fn select<T: DeserializeOwned>(&self, table: &str, select: &str) -> Result<Vec<T>> {
        let url = format!("{}?select={}", self.table_url(table), select);
        let resp = self
            .client
            .get(&url)
            .header("apikey", &self.api_key)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .send()
            .with_context(|| format!("GET {table}"))?;
        let status = resp.status();
        let body = resp.text().context("failed reading body")?;
        if !status.is_success() {
            return Err(anyhow!("http {}: {}", status, preview(&body)));
        }
        serde_json::from_str(&body).with_context(|| format!("decode {table} rows"))
    }

    pub fn fetch_players(&self) -> Result<Vec<Player>> {
        self.select(PLAYERS_TABLE, "id,display_name")
    }

    /// One POST with merge-duplicates. Never errors: failures come back as
    /// an outcome so the caller can move on to the next batch.
    pub fn upsert<T: Serialize>(&self, table: &str, rows: &[T]) -> BatchOutcome {
        let body = match serde_json::to_vec(rows) {
            Ok(body) => body,
            Err(err) => return BatchOutcome::Failed(format!("encode {table} rows: {err}")),
        };
        let sent = self
            .client
            .post(self.table_url(table))
            .header("apikey", &self.api_key)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header(CONTENT_TYPE, "application/json")
            .header("Prefer", MERGE_DUPLICATES)
            .body(body)
            .send();
        let resp = match sent {
            Ok(resp) => resp,
            Err(err) => return BatchOutcome::Failed(err.to_string()),
        };

        let status = resp.status().as_u16();
        if status == 200 || status == 201 {
            return BatchOutcome::Inserted;
        }
        if resp.status().is_success() {
            return BatchOutcome::Unconfirmed { status };
        }
        let body = resp.text().unwrap_or_default();
        BatchOutcome::Rejected {
            status,
            body: preview(&body),
        }
    }
}

pub fn upsert_performance(
    rest: &RestClient<'_>,
    records: &[PerformanceRecord],
    batch_size: usize,
    mut on_batch: impl FnMut(&BatchReport),
) -> UpsertSummary {
    let mut summary = UpsertSummary::default();
    for (idx, batch) in records.chunks(batch_size.max(1)).enumerate() {
        let outcome = rest.upsert(PERFORMANCE_TABLE, batch);
        summary.batches += 1;
        match &outcome {
            BatchOutcome::Inserted => {
                summary.inserted += batch.len();
                debug!(batch = idx + 1, size = batch.len(), "batch upserted");
            }
            BatchOutcome::Unconfirmed { status } => {
                debug!(batch = idx + 1, status, "batch not confirmed");
            }
            BatchOutcome::Rejected { status, .. } => {
                summary.failed_batches += 1;
                warn!(batch = idx + 1, status, "batch rejected");
            }
            BatchOutcome::Failed(err) => {
                summary.failed_batches += 1;
                warn!(batch = idx + 1, error = %err, "batch request failed");
            }
        }
        on_batch(&BatchReport {
            index: idx + 1,
            size: batch.len(),
            outcome,
        });
    }
    summary
}

fn preview(body: &str) -> String {
    body.chars().take(ERROR_BODY_PREVIEW_CHARS).collect()
}
