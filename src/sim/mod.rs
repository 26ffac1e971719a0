//! Level simulation module
//!
//! All gameplay rules live here. This module must stay pure:
//! - Advances only on explicit input
//! - Time is read from the host, never from a global clock
//! - Stable iteration order (row-major grid, ordered coin set)
//! - No rendering or platform dependencies

pub mod grid;
pub mod level;
pub mod state;
pub mod step;
pub mod tile;

pub use grid::{Grid, Position};
pub use level::{DifficultyLabel, LevelData, LevelError, MAX_DIFFICULTY, MIN_DIFFICULTY};
pub use state::{CompletionStats, GamePhase, Snapshot, StepOutcome};
pub use step::GridSimulation;
pub use tile::{Direction, Tile};
