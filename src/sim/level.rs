//! Level descriptors as supplied by a level source
//!
//! `LevelData` mirrors the JSON level shape shared by the static level list
//! and the adaptive generator:
//!
//! ```json
//! { "grid": [["player", "coin", "goal"]], "difficulty": 2,
//!   "estimatedTime": 30, "coins": 1, "description": "..." }
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::grid::Grid;
use super::tile::Tile;

/// Lowest and highest nominal difficulty
pub const MIN_DIFFICULTY: u8 = 1;
pub const MAX_DIFFICULTY: u8 = 5;

/// Reasons a level cannot be loaded
#[derive(Debug, Error)]
pub enum LevelError {
    #[error("level grid is empty")]
    EmptyGrid,

    #[error("row {row} has {found} tiles, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("level has no player spawn")]
    MissingSpawn,

    #[error("level has {0} player spawns, expected exactly one")]
    MultipleSpawns(usize),

    #[error("level has no goal")]
    MissingGoal,

    #[error("difficulty {0} outside 1..=5")]
    DifficultyOutOfRange(u8),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Coarse difficulty bucket shown on level cards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DifficultyLabel {
    Easy,
    Medium,
    Hard,
}

impl DifficultyLabel {
    pub fn for_difficulty(difficulty: u8) -> Self {
        match difficulty {
            0..=2 => DifficultyLabel::Easy,
            3 => DifficultyLabel::Medium,
            _ => DifficultyLabel::Hard,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DifficultyLabel::Easy => "Easy",
            DifficultyLabel::Medium => "Medium",
            DifficultyLabel::Hard => "Hard",
        }
    }
}

/// A complete level, immutable for the session that plays it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelData {
    pub grid: Grid,
    /// Nominal difficulty (1-5)
    pub difficulty: u8,
    /// Estimated completion time in seconds (informational)
    pub estimated_time: f64,
    /// Advertised coin total (informational, see `Grid::coin_count`)
    pub coins: u32,
    pub description: String,
}

impl LevelData {
    /// Parse and validate a level descriptor
    pub fn from_json(json: &str) -> Result<Self, LevelError> {
        let level: LevelData = serde_json::from_str(json)?;
        level.validate()?;
        Ok(level)
    }

    pub fn to_json(&self) -> Result<String, LevelError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Shape checks the simulation itself depends on: a non-empty, rectangular
    /// grid with at least one spawn.
    pub fn check_playable(&self) -> Result<(), LevelError> {
        if self.grid.is_empty() {
            return Err(LevelError::EmptyGrid);
        }
        let expected = self.grid.width();
        if let Some((row, found)) = self
            .grid
            .rows()
            .iter()
            .map(Vec::len)
            .enumerate()
            .find(|&(_, len)| len != expected)
        {
            return Err(LevelError::RaggedRow {
                row,
                expected,
                found,
            });
        }
        if self.grid.find_spawn().is_none() {
            return Err(LevelError::MissingSpawn);
        }
        Ok(())
    }

    /// Full load-time validation: playable shape, exactly one spawn, a goal,
    /// and difficulty in range.
    pub fn validate(&self) -> Result<(), LevelError> {
        self.check_playable()?;

        let spawns = self.grid.count(Tile::PlayerSpawn);
        if spawns != 1 {
            return Err(LevelError::MultipleSpawns(spawns));
        }
        if self.grid.count(Tile::Goal) == 0 {
            return Err(LevelError::MissingGoal);
        }
        if !(MIN_DIFFICULTY..=MAX_DIFFICULTY).contains(&self.difficulty) {
            return Err(LevelError::DifficultyOutOfRange(self.difficulty));
        }
        Ok(())
    }

    pub fn difficulty_label(&self) -> DifficultyLabel {
        DifficultyLabel::for_difficulty(self.difficulty)
    }

    /// The introductory level served before any history exists
    pub fn tutorial() -> Self {
        let grid = Grid::from_ascii(
            "S..#....
             .#.#.c#.
             .#c..^#.
             .####.#.
             c.....#G",
        )
        .unwrap_or_default();
        Self {
            coins: grid.coin_count() as u32,
            grid,
            difficulty: 1,
            estimated_time: 20.0,
            description: "Find your footing: grab the coins and mind the spike".to_string(),
        }
    }
}
