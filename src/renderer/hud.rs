//! HUD text and terminal rendering

use crate::sim::{GamePhase, Snapshot};

/// Values shown above the board
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hud {
    pub coins: usize,
    pub total_coins: usize,
    pub moves: u32,
    /// Whole seconds elapsed (floored)
    pub seconds: u64,
    pub won: bool,
}

impl Hud {
    pub fn from_snapshot(snapshot: &Snapshot<'_>, total_coins: usize) -> Self {
        Self {
            coins: snapshot.coins(),
            total_coins,
            moves: snapshot.moves,
            seconds: snapshot.elapsed_secs.floor() as u64,
            won: snapshot.phase == GamePhase::Won,
        }
    }

    pub fn coins_text(&self) -> String {
        format!("{}/{}", self.coins, self.total_coins)
    }

    pub fn time_text(&self) -> String {
        format!("{}s", self.seconds)
    }

    /// Single status line for the terminal host
    pub fn status_line(&self, show_timer: bool) -> String {
        let mut line = format!("Coins: {}  Moves: {}", self.coins_text(), self.moves);
        if show_timer {
            line.push_str("  Time: ");
            line.push_str(&self.time_text());
        }
        if self.won {
            line.push_str("  GOAL!");
        }
        line
    }
}

/// One character per cell; `@` marks the player, collected coins show as floor
pub fn to_ascii(snapshot: &Snapshot<'_>) -> String {
    snapshot
        .grid
        .rows()
        .iter()
        .enumerate()
        .map(|(y, row)| {
            row.iter()
                .enumerate()
                .map(|(x, tile)| {
                    let pos = crate::sim::Position::new(x, y);
                    if pos == snapshot.player {
                        '@'
                    } else if snapshot.is_collected(pos) {
                        '.'
                    } else {
                        tile.as_char()
                    }
                })
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}
