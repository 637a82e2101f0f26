use std::collections::HashSet;

use indexmap::IndexMap;

use crate::model::{Player, PlayerId};

/// Most tokens a sheet name may have and still match on a shared token.
pub const MAX_TOKEN_OVERLAP_WORDS: usize = 3;

pub fn normalize_name(name: Option<&str>) -> Option<String> {
    name.map(|n| n.trim().to_lowercase())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchKind {
    Exact,
    Substring,
    TokenOverlap,
}

/// Registry lookup keyed by normalized display name, kept in the order the
/// registry returned the players.
#[derive(Debug, Clone, Default)]
pub struct PlayerMatcher {
    by_name: IndexMap<String, PlayerId>,
}

impl PlayerMatcher {
    pub fn from_players(players: &[Player]) -> Self {
        let mut by_name = IndexMap::with_capacity(players.len());
        for player in players {
            let Some(key) = normalize_name(player.display_name.as_deref()) else {
                continue;
            };
            // A repeated name keeps its first position but takes the later id.
            by_name.insert(key, player.id.clone());
        }
        Self { by_name }
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }

    pub fn find(&self, display_name: &str) -> Option<&PlayerId> {
        self.find_with_kind(display_name).map(|(id, _)| id)
    }

    /// Exact lookup first, then the first registry entry (in order) that
    /// contains or is contained by the name, or shares a token with a short
    /// name. First hit wins even when a later entry would fit better.
    pub fn find_with_kind(&self, display_name: &str) -> Option<(&PlayerId, MatchKind)> {
        let normalized = normalize_name(Some(display_name))?;
        if let Some(id) = self.by_name.get(&normalized) {
            return Some((id, MatchKind::Exact));
        }
        if normalized.is_empty() {
            return None;
        }

        let sheet_tokens = normalized.split_whitespace().collect::<HashSet<_>>();
        for (db_name, id) in &self.by_name {
            if db_name.is_empty() {
                continue;
            }
            if normalized.contains(db_name.as_str()) || db_name.contains(normalized.as_str()) {
                return Some((id, MatchKind::Substring));
            }
            let shares_token = db_name
                .split_whitespace()
                .any(|token| sheet_tokens.contains(token));
            if shares_token && sheet_tokens.len() <= MAX_TOKEN_OVERLAP_WORDS {
                return Some((id, MatchKind::TokenOverlap));
            }
        }
        None
    }
}
