//! Input-driven simulation step
//!
//! The session only advances when the host feeds it a direction. Each input
//! resolves in a fixed order:
//!   1. Phase gate (ignored once won)
//!   2. Bounds check
//!   3. Wall check
//!   4. Commit the move and count it
//!   5. Destination effect (coin / goal / spike)

use std::collections::BTreeSet;

use super::grid::Position;
use super::level::{LevelData, LevelError};
use super::state::{CompletionStats, GamePhase, Snapshot, StepOutcome};
use super::tile::{Direction, Tile};

/// One playthrough of one level
#[derive(Debug, Clone)]
pub struct GridSimulation {
    level: LevelData,
    /// Row-major-first spawn tile, cached at construction
    spawn: Position,
    player: Position,
    collected: BTreeSet<Position>,
    moves: u32,
    /// Host clock reading (ms) at construction
    start_ms: f64,
    phase: GamePhase,
    completion: Option<CompletionStats>,
}

impl GridSimulation {
    /// Start a session on `level` at host time `now_ms`.
    ///
    /// Fails if the grid is empty, ragged, or has no spawn tile. Extra spawn
    /// tiles are allowed and behave as empty floor.
    pub fn new(level: LevelData, now_ms: f64) -> Result<Self, LevelError> {
        level.check_playable()?;
        let spawn = level.grid.find_spawn().ok_or(LevelError::MissingSpawn)?;

        Ok(Self {
            level,
            spawn,
            player: spawn,
            collected: BTreeSet::new(),
            moves: 0,
            start_ms: now_ms,
            phase: GamePhase::Playing,
            completion: None,
        })
    }

    /// Resolve one directional input
    pub fn apply_input(&mut self, dir: Direction, now_ms: f64) -> StepOutcome {
        if self.phase != GamePhase::Playing {
            return StepOutcome::Ignored;
        }

        let grid = &self.level.grid;
        let Some(target) = grid.neighbor(self.player, dir) else {
            return StepOutcome::Ignored;
        };
        let Some(tile) = grid.get(target) else {
            return StepOutcome::Ignored;
        };
        if tile.blocks_movement() {
            return StepOutcome::Ignored;
        }

        self.player = target;
        self.moves += 1;

        match tile {
            Tile::Coin => {
                if self.collected.insert(target) {
                    StepOutcome::CoinCollected(target)
                } else {
                    StepOutcome::Moved
                }
            }
            Tile::Goal => {
                let stats = CompletionStats {
                    time: self.tick(now_ms),
                    coins: self.collected.len() as u32,
                    moves: self.moves,
                };
                self.phase = GamePhase::Won;
                self.completion = Some(stats);
                log::debug!(
                    "Level won in {:.2}s: {} coins, {} moves",
                    stats.time,
                    stats.coins,
                    stats.moves
                );
                StepOutcome::Won(stats)
            }
            Tile::Spike => {
                // Soft death: only the position is lost
                self.player = self.spawn;
                StepOutcome::Respawned
            }
            Tile::Empty | Tile::PlayerSpawn | Tile::Wall => StepOutcome::Moved,
        }
    }

    /// Resolve a raw key name; unbound keys are ignored
    pub fn apply_key(&mut self, key: &str, now_ms: f64) -> StepOutcome {
        match Direction::from_key(key) {
            Some(dir) => self.apply_input(dir, now_ms),
            None => StepOutcome::Ignored,
        }
    }

    /// Seconds since the session started (never negative)
    pub fn tick(&self, now_ms: f64) -> f64 {
        ((now_ms - self.start_ms) / 1000.0).max(0.0)
    }

    pub fn snapshot(&self, now_ms: f64) -> Snapshot<'_> {
        Snapshot {
            grid: &self.level.grid,
            player: self.player,
            collected: &self.collected,
            moves: self.moves,
            elapsed_secs: self.tick(now_ms),
            phase: self.phase,
        }
    }

    /// The completion event, once the goal has been reached
    pub fn completion(&self) -> Option<&CompletionStats> {
        self.completion.as_ref()
    }

    pub fn level(&self) -> &LevelData {
        &self.level
    }

    /// Hand the level back to the host when the session is discarded
    pub fn into_level(self) -> LevelData {
        self.level
    }

    pub fn spawn(&self) -> Position {
        self.spawn
    }

    pub fn player(&self) -> Position {
        self.player
    }

    pub fn moves(&self) -> u32 {
        self.moves
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn collected(&self) -> &BTreeSet<Position> {
        &self.collected
    }
}
