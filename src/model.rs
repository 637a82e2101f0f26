use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Registry id, passed through to the performance table exactly as the
/// players endpoint returned it (uuid string or integer).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub Value);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.0 {
            Value::String(s) => f.write_str(s),
            other => write!(f, "{other}"),
        }
    }
}

impl From<&str> for PlayerId {
    fn from(value: &str) -> Self {
        Self(Value::String(value.to_string()))
    }
}

impl From<i64> for PlayerId {
    fn from(value: i64) -> Self {
        Self(Value::from(value))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub display_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateColumn {
    pub column: usize,
    pub date: String,
}

/// Raw score keeps whole numbers integral on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Score {
    Int(i64),
    Decimal(f64),
}

impl Score {
    pub fn from_value(value: f64) -> Self {
        if value.fract() == 0.0 {
            Score::Int(value as i64)
        } else {
            Score::Decimal(round2(value))
        }
    }

    pub fn as_f64(self) -> f64 {
        match self {
            Score::Int(v) => v as f64,
            Score::Decimal(v) => v,
        }
    }

    pub fn is_truthy(self) -> bool {
        self.as_f64() != 0.0
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DayMetrics {
    pub raw_score: Option<Score>,
    pub ranking: Option<i64>,
    pub reward: Option<f64>,
}

impl DayMetrics {
    /// Zero counts as empty here, the same as a missing value.
    pub fn has_any(&self) -> bool {
        self.raw_score.is_some_and(Score::is_truthy)
            || self.ranking.is_some_and(|v| v != 0)
            || self.reward.is_some_and(|v| v != 0.0)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceRecord {
    pub player_id: PlayerId,
    pub match_date: String,
    pub raw_score: Option<Score>,
    pub ranking: Option<i64>,
    pub reward: Option<f64>,
}

impl PerformanceRecord {
    pub fn new(player_id: PlayerId, match_date: String, metrics: &DayMetrics) -> Self {
        Self {
            player_id,
            match_date,
            raw_score: metrics.raw_score,
            ranking: metrics.ranking,
            reward: metrics.reward,
        }
    }
}

/// Rounds on the exact decimal expansion of `value`, ties to even, so
/// `2.675` (stored as 2.67499..) gives 2.67 and `0.125` gives 0.12.
pub fn round2(value: f64) -> f64 {
    format!("{value:.2}").parse::<f64>().unwrap_or(value)
}
