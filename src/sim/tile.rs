//! Tile kinds and movement directions
//!
//! Tiles are fixed once a level is loaded. Collected coins are tracked by the
//! simulation, never by mutating the tile.

use serde::{Deserialize, Serialize};

/// Static type of a single grid cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tile {
    #[default]
    Empty,
    Wall,
    /// Player spawn point (serialized as `"player"`)
    #[serde(rename = "player")]
    PlayerSpawn,
    Coin,
    Spike,
    Goal,
}

impl Tile {
    /// Wire tag used in level JSON
    pub fn as_str(&self) -> &'static str {
        match self {
            Tile::Empty => "empty",
            Tile::Wall => "wall",
            Tile::PlayerSpawn => "player",
            Tile::Coin => "coin",
            Tile::Spike => "spike",
            Tile::Goal => "goal",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "empty" => Some(Tile::Empty),
            "wall" => Some(Tile::Wall),
            "player" => Some(Tile::PlayerSpawn),
            "coin" => Some(Tile::Coin),
            "spike" => Some(Tile::Spike),
            "goal" => Some(Tile::Goal),
            _ => None,
        }
    }

    /// Single-character form used by the terminal host and test fixtures
    pub fn as_char(&self) -> char {
        match self {
            Tile::Empty => '.',
            Tile::Wall => '#',
            Tile::PlayerSpawn => 'S',
            Tile::Coin => 'c',
            Tile::Spike => '^',
            Tile::Goal => 'G',
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '.' => Some(Tile::Empty),
            '#' => Some(Tile::Wall),
            'S' => Some(Tile::PlayerSpawn),
            'c' => Some(Tile::Coin),
            '^' => Some(Tile::Spike),
            'G' => Some(Tile::Goal),
            _ => None,
        }
    }

    /// Whether the player can never enter this tile
    #[inline]
    pub fn blocks_movement(&self) -> bool {
        matches!(self, Tile::Wall)
    }

    /// Whether entering this tile sends the player back to spawn
    #[inline]
    pub fn is_hazard(&self) -> bool {
        matches!(self, Tile::Spike)
    }
}

/// One of the four cardinal moves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// Unit step in grid space (y grows downward, row-major)
    pub fn delta(self) -> (isize, isize) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// Arrow key binding (`KeyboardEvent.key` name)
    pub fn from_arrow_key(key: &str) -> Option<Self> {
        match key {
            "ArrowUp" => Some(Direction::Up),
            "ArrowDown" => Some(Direction::Down),
            "ArrowLeft" => Some(Direction::Left),
            "ArrowRight" => Some(Direction::Right),
            _ => None,
        }
    }

    /// WASD binding, either case
    pub fn from_letter_key(key: &str) -> Option<Self> {
        match key {
            "w" | "W" => Some(Direction::Up),
            "s" | "S" => Some(Direction::Down),
            "a" | "A" => Some(Direction::Left),
            "d" | "D" => Some(Direction::Right),
            _ => None,
        }
    }

    /// Default binding: arrows and WASD both map to the same direction
    pub fn from_key(key: &str) -> Option<Self> {
        Self::from_arrow_key(key).or_else(|| Self::from_letter_key(key))
    }
}
