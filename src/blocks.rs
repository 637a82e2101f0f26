use std::collections::BTreeSet;

use indexmap::IndexMap;
use tracing::debug;

use crate::model::{DateColumn, DayMetrics, PerformanceRecord, PlayerId, Score, round2};
use crate::names::PlayerMatcher;
use crate::sheet::Grid;

pub const NAME_COLUMN: usize = 0;
pub const METRIC_TYPE_COLUMN: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    RawScore,
    Ranking,
    Reward,
}

impl MetricKind {
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "raw score" => Some(MetricKind::RawScore),
            "ranking" => Some(MetricKind::Ranking),
            "reward" => Some(MetricKind::Reward),
            _ => None,
        }
    }

    fn apply(self, metrics: &mut DayMetrics, value: f64) {
        match self {
            MetricKind::RawScore => metrics.raw_score = Some(Score::from_value(value)),
            MetricKind::Ranking => metrics.ranking = Some(value.trunc() as i64),
            MetricKind::Reward => metrics.reward = Some(round2(value)),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ParsedSheet {
    pub records: Vec<PerformanceRecord>,
    pub matched: BTreeSet<String>,
    pub skipped: BTreeSet<String>,
}

struct Block {
    player_id: Option<PlayerId>,
    days: IndexMap<String, DayMetrics>,
}

impl Block {
    fn new(player_id: Option<PlayerId>, dates: &[DateColumn]) -> Self {
        let days = dates
            .iter()
            .map(|d| (d.date.clone(), DayMetrics::default()))
            .collect();
        Self { player_id, days }
    }

    fn flush_into(self, out: &mut Vec<PerformanceRecord>) {
        let Some(player_id) = self.player_id else {
            return;
        };
        for (date, metrics) in self.days {
            if metrics.has_any() {
                out.push(PerformanceRecord::new(player_id.clone(), date, &metrics));
            }
        }
    }
}

/// Walks data rows (everything below the header) grouping them into player
/// blocks. A non-empty name cell opens a block; that row and the ones after
/// it feed metrics until the next name.
pub fn parse_blocks(grid: &Grid, dates: &[DateColumn], matcher: &PlayerMatcher) -> ParsedSheet {
    let mut parsed = ParsedSheet::default();
    let mut current: Option<Block> = None;

    for row in 1..grid.height() {
        if let Some(name) = grid.cell(row, NAME_COLUMN).text() {
            if let Some(block) = current.take() {
                block.flush_into(&mut parsed.records);
            }

            let player_id = match matcher.find_with_kind(&name) {
                Some((id, kind)) => {
                    debug!(row, name = %name, player_id = %id, ?kind, "matched player");
                    parsed.matched.insert(name);
                    Some(id.clone())
                }
                None => {
                    debug!(row, name = %name, "no registry match");
                    parsed.skipped.insert(name);
                    None
                }
            };
            current = Some(Block::new(player_id, dates));
        }

        let Some(label) = grid.cell(row, METRIC_TYPE_COLUMN).text() else {
            continue;
        };
        let Some(kind) = MetricKind::from_label(&label) else {
            continue;
        };
        let Some(block) = current.as_mut() else {
            continue;
        };
        if block.player_id.is_none() {
            continue;
        }

        for date in dates {
            let Some(value) = grid.cell(row, date.column).as_f64() else {
                continue;
            };
            if let Some(metrics) = block.days.get_mut(&date.date) {
                kind.apply(metrics, value);
            }
        }
    }

    if let Some(block) = current.take() {
        block.flush_into(&mut parsed.records);
    }
    parsed
}
