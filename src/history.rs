//! Session history and player performance
//!
//! Persisted to LocalStorage, keeps the 10 most recent sessions. The same
//! history drives the stats panel and the difficulty of the next level.

use serde::{Deserialize, Serialize};

use crate::platform;
use crate::sim::{CompletionStats, GamePhase, GridSimulation, MAX_DIFFICULTY, MIN_DIFFICULTY};

/// Maximum number of sessions to keep
pub const MAX_HISTORY: usize = 10;

/// Completion rate above which levels get harder
pub const INCREASE_THRESHOLD: f64 = 0.7;
/// Completion rate below which levels get easier
pub const DECREASE_THRESHOLD: f64 = 0.3;

/// One finished (or abandoned) session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    /// Completion time in seconds (time played, if abandoned)
    pub time: f64,
    pub coins: u32,
    pub moves: u32,
    /// Difficulty of the level played
    pub difficulty: u8,
    pub completed: bool,
    /// Unix timestamp (ms) when recorded
    pub timestamp: f64,
}

/// Aggregates shown on the stats panel
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatsSummary {
    pub total_sessions: usize,
    pub avg_completion_time: f64,
    pub avg_coins: f64,
    pub completed_levels: usize,
    pub avg_difficulty: f64,
}

/// Which way the next level's difficulty should move
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DifficultyTrend {
    Increase,
    Maintain,
    Decrease,
}

impl DifficultyTrend {
    pub fn from_completion_rate(rate: f64) -> Self {
        if rate > INCREASE_THRESHOLD {
            DifficultyTrend::Increase
        } else if rate < DECREASE_THRESHOLD {
            DifficultyTrend::Decrease
        } else {
            DifficultyTrend::Maintain
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyTrend::Increase => "increase",
            DifficultyTrend::Maintain => "maintain",
            DifficultyTrend::Decrease => "decrease",
        }
    }

    /// Apply the trend to `current`, staying within 1..=5
    pub fn apply(&self, current: u8) -> u8 {
        let next = match self {
            DifficultyTrend::Increase => current.saturating_add(1),
            DifficultyTrend::Maintain => current,
            DifficultyTrend::Decrease => current.saturating_sub(1),
        };
        next.clamp(MIN_DIFFICULTY, MAX_DIFFICULTY)
    }
}

/// Performance figures handed to level generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceContext {
    pub sessions: usize,
    pub avg_time: f64,
    pub avg_coins: f64,
    pub completion_rate: f64,
    pub trend: DifficultyTrend,
}

/// Recent sessions, newest first
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SessionHistory {
    pub entries: Vec<SessionRecord>,
}

impl SessionHistory {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "tile_quest_history";

    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Record a won session
    pub fn record_completion(&mut self, stats: &CompletionStats, difficulty: u8, timestamp: f64) {
        self.push(SessionRecord {
            time: stats.time,
            coins: stats.coins,
            moves: stats.moves,
            difficulty,
            completed: true,
            timestamp,
        });
    }

    /// Record a session the player left before reaching the goal
    pub fn record_abandoned(
        &mut self,
        difficulty: u8,
        moves: u32,
        coins: u32,
        elapsed: f64,
        timestamp: f64,
    ) {
        self.push(SessionRecord {
            time: elapsed,
            coins,
            moves,
            difficulty,
            completed: false,
            timestamp,
        });
    }

    /// Record `sim` as abandoned if it is still in play and has been moved in.
    ///
    /// Won sessions are recorded through `record_completion` when the goal is
    /// reached, so they are skipped here. Returns whether a record was added.
    pub fn record_unfinished(&mut self, sim: &GridSimulation, now_ms: f64) -> bool {
        if sim.phase() != GamePhase::Playing || sim.moves() == 0 {
            return false;
        }
        self.record_abandoned(
            sim.level().difficulty,
            sim.moves(),
            sim.collected().len() as u32,
            sim.tick(now_ms),
            now_ms,
        );
        true
    }

    /// Add a record, dropping the oldest beyond `MAX_HISTORY`
    pub fn push(&mut self, record: SessionRecord) {
        self.entries.insert(0, record);
        self.entries.truncate(MAX_HISTORY);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Most recent session (if any)
    pub fn latest(&self) -> Option<&SessionRecord> {
        self.entries.first()
    }

    /// Stats panel aggregates, `None` before the first session
    pub fn summary(&self) -> Option<StatsSummary> {
        if self.entries.is_empty() {
            return None;
        }
        let n = self.entries.len() as f64;
        Some(StatsSummary {
            total_sessions: self.entries.len(),
            avg_completion_time: self.entries.iter().map(|e| e.time).sum::<f64>() / n,
            avg_coins: self.entries.iter().map(|e| e.coins as f64).sum::<f64>() / n,
            completed_levels: self.entries.iter().filter(|e| e.completed).count(),
            avg_difficulty: self.entries.iter().map(|e| e.difficulty as f64).sum::<f64>() / n,
        })
    }

    /// Averages over the kept sessions; an empty history reports zeros
    pub fn performance(&self) -> PerformanceContext {
        let n = self.entries.len().max(1) as f64;
        let completion_rate = self.entries.iter().filter(|e| e.completed).count() as f64 / n;
        PerformanceContext {
            sessions: self.entries.len(),
            avg_time: self.entries.iter().map(|e| e.time).sum::<f64>() / n,
            avg_coins: self.entries.iter().map(|e| e.coins as f64).sum::<f64>() / n,
            completion_rate,
            trend: DifficultyTrend::from_completion_rate(completion_rate),
        }
    }

    /// Difficulty for the level after one played at `current`
    pub fn next_difficulty(&self, current: u8) -> u8 {
        self.performance().trend.apply(current)
    }

    /// Load history from LocalStorage, starting fresh if absent or corrupt
    pub fn load() -> Self {
        match platform::storage_get(Self::STORAGE_KEY)
            .and_then(|json| serde_json::from_str::<SessionHistory>(&json).ok())
        {
            Some(history) => {
                log::info!("Loaded {} past sessions", history.entries.len());
                history
            }
            None => {
                log::info!("No session history found, starting fresh");
                Self::new()
            }
        }
    }

    pub fn save(&self) {
        match serde_json::to_string(self) {
            Ok(json) => {
                if platform::storage_set(Self::STORAGE_KEY, &json) {
                    log::info!("Session history saved ({} entries)", self.entries.len());
                }
            }
            Err(e) => log::warn!("Failed to serialize session history: {}", e),
        }
    }
}

impl PerformanceContext {
    /// One-line summary for logs
    pub fn describe(&self) -> String {
        format!(
            "{} sessions, avg {:.1}s, avg {:.1} coins, {:.0}% completed, {}",
            self.sessions,
            self.avg_time,
            self.avg_coins,
            self.completion_rate * 100.0,
            self.trend.as_str()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{Direction, Grid, LevelData};

    fn record(time: f64, coins: u32, difficulty: u8, completed: bool) -> SessionRecord {
        SessionRecord {
            time,
            coins,
            moves: 10,
            difficulty,
            completed,
            timestamp: 0.0,
        }
    }

    #[test]
    fn test_keeps_most_recent() {
        let mut history = SessionHistory::new();
        for i in 0..15 {
            history.push(record(i as f64, 0, 1, true));
        }
        assert_eq!(history.len(), MAX_HISTORY);
        assert_eq!(history.latest().map(|r| r.time), Some(14.0));
        assert_eq!(history.entries.last().map(|r| r.time), Some(5.0));
    }

    #[test]
    fn test_record_completion() {
        let mut history = SessionHistory::new();
        let stats = CompletionStats {
            time: 9.5,
            coins: 2,
            moves: 21,
        };
        history.record_completion(&stats, 3, 1234.0);
        let latest = history.latest().unwrap();
        assert_eq!(latest.time, 9.5);
        assert_eq!(latest.moves, 21);
        assert_eq!(latest.difficulty, 3);
        assert!(latest.completed);
        assert_eq!(latest.timestamp, 1234.0);
    }

    #[test]
    fn test_summary() {
        let mut history = SessionHistory::new();
        assert!(history.summary().is_none());

        history.push(record(10.0, 2, 1, true));
        history.push(record(20.0, 4, 3, false));
        let summary = history.summary().unwrap();
        assert_eq!(summary.total_sessions, 2);
        assert_eq!(summary.avg_completion_time, 15.0);
        assert_eq!(summary.avg_coins, 3.0);
        assert_eq!(summary.completed_levels, 1);
        assert_eq!(summary.avg_difficulty, 2.0);
    }

    #[test]
    fn test_empty_performance() {
        let perf = SessionHistory::new().performance();
        assert_eq!(perf.sessions, 0);
        assert_eq!(perf.avg_time, 0.0);
        assert_eq!(perf.completion_rate, 0.0);
        assert_eq!(perf.trend, DifficultyTrend::Decrease);
    }

    #[test]
    fn test_trend_thresholds() {
        assert_eq!(DifficultyTrend::from_completion_rate(1.0), DifficultyTrend::Increase);
        assert_eq!(DifficultyTrend::from_completion_rate(0.7), DifficultyTrend::Maintain);
        assert_eq!(DifficultyTrend::from_completion_rate(0.5), DifficultyTrend::Maintain);
        assert_eq!(DifficultyTrend::from_completion_rate(0.3), DifficultyTrend::Maintain);
        assert_eq!(DifficultyTrend::from_completion_rate(0.29), DifficultyTrend::Decrease);
        assert_eq!(DifficultyTrend::Increase.as_str(), "increase");
    }

    #[test]
    fn test_next_difficulty_clamped() {
        let mut history = SessionHistory::new();
        history.push(record(5.0, 1, 5, true));
        assert_eq!(history.performance().trend, DifficultyTrend::Increase);
        assert_eq!(history.next_difficulty(2), 3);
        assert_eq!(history.next_difficulty(5), 5);

        let mut struggling = SessionHistory::new();
        struggling.push(record(60.0, 0, 1, false));
        assert_eq!(struggling.next_difficulty(1), 1);
        assert_eq!(struggling.next_difficulty(4), 3);
    }

    #[test]
    fn test_json_round_trip_field_names() {
        let mut history = SessionHistory::new();
        history.push(record(3.0, 1, 2, true));
        let json = serde_json::to_string(&history).unwrap();
        assert!(json.contains("\"completed\":true"));
        let back: SessionHistory = serde_json::from_str(&json).unwrap();
        assert_eq!(back.entries, history.entries);
    }

    fn session(text: &str, difficulty: u8) -> GridSimulation {
        let grid = Grid::from_ascii(text).unwrap();
        let level = LevelData {
            coins: grid.coin_count() as u32,
            grid,
            difficulty,
            estimated_time: 10.0,
            description: String::new(),
        };
        GridSimulation::new(level, 0.0).unwrap()
    }

    /// Walk right once; on "S.G" this leaves the level unfinished
    fn play_and_quit(history: &mut SessionHistory, difficulty: u8) -> bool {
        let mut sim = session("S.G", difficulty);
        sim.apply_input(Direction::Right, 1_000.0);
        history.record_unfinished(&sim, 30_000.0)
    }

    fn play_and_win(history: &mut SessionHistory, difficulty: u8) {
        let mut sim = session("S.G", difficulty);
        sim.apply_input(Direction::Right, 1_000.0);
        let outcome = sim.apply_input(Direction::Right, 2_000.0);
        let stats = outcome.completion().copied().unwrap();
        history.record_completion(&stats, difficulty, 2_000.0);
        assert!(!history.record_unfinished(&sim, 3_000.0));
    }

    #[test]
    fn test_record_unfinished() {
        let mut history = SessionHistory::new();
        let untouched = session("S.G", 2);
        assert!(!history.record_unfinished(&untouched, 5_000.0));
        assert!(history.is_empty());

        assert!(play_and_quit(&mut history, 2));
        let latest = history.latest().unwrap();
        assert!(!latest.completed);
        assert_eq!(latest.moves, 1);
        assert_eq!(latest.coins, 0);
        assert_eq!(latest.time, 30.0);
        assert_eq!(latest.difficulty, 2);
        assert_eq!(latest.timestamp, 30_000.0);
    }

    #[test]
    fn test_abandoned_sessions_ease_difficulty() {
        let mut history = SessionHistory::new();
        let mut difficulty = 5;
        for _ in 0..4 {
            play_and_quit(&mut history, difficulty);
            difficulty = history.next_difficulty(difficulty);
        }
        assert_eq!(history.performance().trend, DifficultyTrend::Decrease);
        assert_eq!(difficulty, 1);
    }

    #[test]
    fn test_mixed_sessions_maintain_then_decrease() {
        let mut history = SessionHistory::new();
        play_and_win(&mut history, 3);
        play_and_win(&mut history, 3);
        play_and_quit(&mut history, 3);
        play_and_quit(&mut history, 3);
        // 2 of 4 completed
        assert_eq!(history.performance().trend, DifficultyTrend::Maintain);
        assert_eq!(history.next_difficulty(3), 3);

        for _ in 0..3 {
            play_and_quit(&mut history, 3);
        }
        // 2 of 7 completed
        let perf = history.performance();
        assert_eq!(perf.sessions, 7);
        assert_eq!(perf.trend, DifficultyTrend::Decrease);
        assert_eq!(history.next_difficulty(3), 2);
        assert_eq!(history.summary().unwrap().completed_levels, 2);
        assert!(perf.describe().contains("29% completed, decrease"));
    }
}
