//! Session state types shared between the simulation and its host
//!
//! The host only ever sees these through a `Snapshot` or a `StepOutcome`.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::grid::{Grid, Position};

/// Coarse session state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// Accepting input
    #[default]
    Playing,
    /// Goal reached (terminal)
    Won,
}

/// Summary reported once, on the move that reaches the goal
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CompletionStats {
    /// Seconds from session start to the winning move
    pub time: f64,
    /// Distinct coins collected
    pub coins: u32,
    /// Accepted moves, including the winning one
    pub moves: u32,
}

/// What a single input did to the session
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StepOutcome {
    /// Out of bounds, into a wall, unbound key, or session already won
    Ignored,
    /// Plain move (includes re-stepping on a collected coin)
    Moved,
    /// Move onto a coin not collected before
    CoinCollected(Position),
    /// Move onto a spike; player is back on spawn
    Respawned,
    /// Move onto the goal; carries the completion event
    Won(CompletionStats),
}

impl StepOutcome {
    /// Whether the input was accepted as a move
    pub fn is_move(&self) -> bool {
        !matches!(self, StepOutcome::Ignored)
    }

    pub fn completion(&self) -> Option<&CompletionStats> {
        match self {
            StepOutcome::Won(stats) => Some(stats),
            _ => None,
        }
    }
}

/// Read-only view of a session, pulled by the renderer after each input
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot<'a> {
    pub grid: &'a Grid,
    pub player: Position,
    pub collected: &'a BTreeSet<Position>,
    pub moves: u32,
    /// Recomputed from the clock on every call
    pub elapsed_secs: f64,
    pub phase: GamePhase,
}

impl Snapshot<'_> {
    pub fn is_collected(&self, pos: Position) -> bool {
        self.collected.contains(&pos)
    }

    pub fn coins(&self) -> usize {
        self.collected.len()
    }

    /// Equal in everything except the wall-clock derived elapsed time
    pub fn same_state(&self, other: &Snapshot<'_>) -> bool {
        self.grid == other.grid
            && self.player == other.player
            && self.collected == other.collected
            && self.moves == other.moves
            && self.phase == other.phase
    }
}
