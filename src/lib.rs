//! Tile Quest - a grid puzzle-platformer with adaptive levels
//!
//! Core modules:
//! - `sim`: Level simulation (grid rules, movement, coins, hazards, goal)
//! - `levelgen`: Seeded local level source
//! - `remote`: Adaptive level generation contract
//! - `history`: Session history and difficulty adaptation
//! - `renderer`: Draw lists, HUD and Canvas 2D painting
//! - `platform`: Browser/native platform abstraction

pub mod history;
pub mod levelgen;
pub mod platform;
pub mod remote;
pub mod renderer;
pub mod settings;
pub mod sim;

pub use history::SessionHistory;
pub use settings::{KeyScheme, Settings};
pub use sim::{GridSimulation, LevelData};

/// Game configuration constants
pub mod consts {
    /// Default tile edge length in CSS pixels
    pub const TILE_SIZE: u32 = 48;
    pub const MIN_TILE_SIZE: u32 = 16;
    pub const MAX_TILE_SIZE: u32 = 96;

    /// Generated level dimensions (columns x rows)
    pub const LEVEL_WIDTH: usize = 12;
    pub const LEVEL_HEIGHT: usize = 8;
}
