//! Cumulative scores across rounds
//!
//! The engine only emits events; keeping totals is left to a key-value store the host
//! provides. `ScoreKeeper` turns `RoundOver` events into store updates.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::sim::{GameEvent, Scores, Side};

/// Maximum number of finished rounds kept in the history list
pub const MAX_HISTORY: usize = 10;

/// Minimal key-value storage (LocalStorage, a database row, a file...)
pub trait ScoreStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: String);
}

/// In-memory store for tests and native hosts
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MemoryStore {
    pub entries: BTreeMap<String, String>,
}

impl ScoreStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: String) {
        self.entries.insert(key.to_string(), value);
    }
}

/// One finished round
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundRecord {
    pub winner: Option<Side>,
    pub scores: Scores,
}

/// Running totals for one side
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideTotals {
    pub points: u64,
    pub wins: u32,
}

/// Everything the keeper tracks for a session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Totals {
    pub rounds: u32,
    pub a: SideTotals,
    pub b: SideTotals,
    /// Most recent first
    pub history: Vec<RoundRecord>,
}

impl Totals {
    pub fn side(&self, side: Side) -> SideTotals {
        match side {
            Side::A => self.a,
            Side::B => self.b,
        }
    }

    fn side_mut(&mut self, side: Side) -> &mut SideTotals {
        match side {
            Side::A => &mut self.a,
            Side::B => &mut self.b,
        }
    }
}

/// Applies round results to a store under a session key
#[derive(Debug, Clone)]
pub struct ScoreKeeper {
    key: String,
}

impl ScoreKeeper {
    pub fn new(session: &str) -> Self {
        Self {
            key: format!("carrom.{session}"),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Load totals, starting fresh if nothing (or something unreadable) is stored
    pub fn load(&self, store: &impl ScoreStore) -> Totals {
        match store.get(&self.key) {
            Some(json) => match serde_json::from_str(&json) {
                Ok(totals) => totals,
                Err(err) => {
                    log::warn!("Discarding unreadable totals under {}: {}", self.key, err);
                    Totals::default()
                }
            },
            None => Totals::default(),
        }
    }

    /// Record every `RoundOver` in `events`. Returns how many rounds were recorded.
    pub fn apply(&self, events: &[GameEvent], store: &mut impl ScoreStore) -> usize {
        let finished: Vec<RoundRecord> = events
            .iter()
            .filter_map(|e| match e {
                GameEvent::RoundOver { winner, scores } => Some(RoundRecord {
                    winner: *winner,
                    scores: *scores,
                }),
                _ => None,
            })
            .collect();
        if finished.is_empty() {
            return 0;
        }

        let mut totals = self.load(store);
        for record in &finished {
            totals.rounds += 1;
            totals.a.points += u64::from(record.scores.a);
            totals.b.points += u64::from(record.scores.b);
            if let Some(winner) = record.winner {
                totals.side_mut(winner).wins += 1;
            }
            totals.history.insert(0, record.clone());
        }
        totals.history.truncate(MAX_HISTORY);

        match serde_json::to_string(&totals) {
            Ok(json) => {
                store.set(&self.key, json);
                log::info!("Saved totals under {} ({} rounds)", self.key, totals.rounds);
            }
            Err(err) => log::error!("Failed to encode totals: {}", err),
        }
        finished.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round_over(a: u32, b: u32) -> GameEvent {
        let scores = Scores { a, b };
        GameEvent::RoundOver {
            winner: scores.leader(),
            scores,
        }
    }

    #[test]
    fn test_ignores_non_round_events() {
        let keeper = ScoreKeeper::new("test");
        let mut store = MemoryStore::default();
        let events = [GameEvent::TurnChanged { next: Side::B, changed: true }];
        assert_eq!(keeper.apply(&events, &mut store), 0);
        assert!(store.entries.is_empty());
    }

    #[test]
    fn test_accumulates_rounds() {
        let keeper = ScoreKeeper::new("test");
        let mut store = MemoryStore::default();
        keeper.apply(&[round_over(9, 4)], &mut store);
        keeper.apply(&[round_over(2, 6), round_over(3, 3)], &mut store);

        let totals = keeper.load(&store);
        assert_eq!(totals.rounds, 3);
        assert_eq!(totals.side(Side::A), SideTotals { points: 14, wins: 1 });
        assert_eq!(totals.side(Side::B), SideTotals { points: 13, wins: 1 });
        assert_eq!(totals.history[0].scores, Scores { a: 3, b: 3 });
        assert_eq!(totals.history[0].winner, None);
    }

    #[test]
    fn test_history_is_capped() {
        let keeper = ScoreKeeper::new("test");
        let mut store = MemoryStore::default();
        for i in 0..(MAX_HISTORY as u32 + 5) {
            keeper.apply(&[round_over(i, 0)], &mut store);
        }
        let totals = keeper.load(&store);
        assert_eq!(totals.history.len(), MAX_HISTORY);
        assert_eq!(totals.rounds, MAX_HISTORY as u32 + 5);
    }

    #[test]
    fn test_corrupt_entry_starts_fresh() {
        let keeper = ScoreKeeper::new("test");
        let mut store = MemoryStore::default();
        store.set(keeper.key(), "not json".to_string());
        assert_eq!(keeper.load(&store), Totals::default());
        keeper.apply(&[round_over(1, 0)], &mut store);
        assert_eq!(keeper.load(&store).rounds, 1);
    }
}
