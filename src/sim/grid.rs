//! Grid storage and spatial queries
//!
//! Rows are stored top to bottom, cells left to right. `Position { x, y }`
//! indexes `rows[y][x]`.

use std::collections::{BTreeSet, VecDeque};

use serde::{Deserialize, Serialize};

use super::tile::{Direction, Tile};

/// A cell coordinate on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: usize,
    pub y: usize,
}

impl Position {
    pub const fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Neighbour one step in `dir`, or `None` if it would leave `width` x `height`
    pub fn step(self, dir: Direction, width: usize, height: usize) -> Option<Position> {
        let (dx, dy) = dir.delta();
        let x = self.x.checked_add_signed(dx)?;
        let y = self.y.checked_add_signed(dy)?;
        (x < width && y < height).then_some(Position { x, y })
    }
}

/// Rectangular tile grid, immutable for the lifetime of a level
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Grid {
    rows: Vec<Vec<Tile>>,
}

impl Grid {
    pub fn from_rows(rows: Vec<Vec<Tile>>) -> Self {
        Self { rows }
    }

    /// Parse a compact text layout, one line per row (see `Tile::from_char`).
    /// Blank lines and surrounding whitespace are ignored.
    pub fn from_ascii(text: &str) -> Option<Self> {
        let rows = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(|line| line.chars().map(Tile::from_char).collect::<Option<Vec<_>>>())
            .collect::<Option<Vec<_>>>()?;
        Some(Self { rows })
    }

    pub fn rows(&self) -> &[Vec<Tile>] {
        &self.rows
    }

    /// Number of columns (length of the first row)
    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, Vec::len)
    }

    /// Number of rows
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.width() == 0 || self.height() == 0
    }

    /// All rows share the first row's length
    pub fn is_rectangular(&self) -> bool {
        let width = self.width();
        self.rows.iter().all(|row| row.len() == width)
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x < self.width() && pos.y < self.height()
    }

    pub fn get(&self, pos: Position) -> Option<Tile> {
        self.rows.get(pos.y).and_then(|row| row.get(pos.x)).copied()
    }

    /// Neighbour of `pos` in `dir` if it lies inside the grid
    pub fn neighbor(&self, pos: Position, dir: Direction) -> Option<Position> {
        pos.step(dir, self.width(), self.height())
    }

    /// Every cell in row-major order
    pub fn cells(&self) -> impl Iterator<Item = (Position, Tile)> + '_ {
        self.rows.iter().enumerate().flat_map(|(y, row)| {
            row.iter()
                .enumerate()
                .map(move |(x, &tile)| (Position::new(x, y), tile))
        })
    }

    /// Row-major positions of every tile of `kind`
    pub fn positions_of(&self, kind: Tile) -> impl Iterator<Item = Position> + '_ {
        self.cells()
            .filter(move |&(_, tile)| tile == kind)
            .map(|(pos, _)| pos)
    }

    pub fn count(&self, kind: Tile) -> usize {
        self.positions_of(kind).count()
    }

    /// First spawn tile in row-major order
    pub fn find_spawn(&self) -> Option<Position> {
        self.positions_of(Tile::PlayerSpawn).next()
    }

    pub fn coin_count(&self) -> usize {
        self.count(Tile::Coin)
    }

    /// Cells reachable from `start` by single steps that avoid walls and spikes.
    ///
    /// `start` itself is always included when it lies on the grid.
    pub fn reachable_from(&self, start: Position) -> BTreeSet<Position> {
        let mut seen = BTreeSet::new();
        if !self.contains(start) {
            return seen;
        }

        let mut queue = VecDeque::from([start]);
        seen.insert(start);
        while let Some(pos) = queue.pop_front() {
            for dir in Direction::ALL {
                let Some(next) = self.neighbor(pos, dir) else {
                    continue;
                };
                let Some(tile) = self.get(next) else {
                    continue;
                };
                if tile.blocks_movement() || tile.is_hazard() {
                    continue;
                }
                if seen.insert(next) {
                    queue.push_back(next);
                }
            }
        }
        seen
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(text: &str) -> Grid {
        Grid::from_ascii(text).expect("valid layout")
    }

    #[test]
    fn test_dimensions() {
        let g = grid(
            "S.#
             .cG",
        );
        assert_eq!(g.width(), 3);
        assert_eq!(g.height(), 2);
        assert!(g.is_rectangular());
        assert!(!g.is_empty());
        assert_eq!(g.get(Position::new(2, 0)), Some(Tile::Wall));
        assert_eq!(g.get(Position::new(1, 1)), Some(Tile::Coin));
        assert_eq!(g.get(Position::new(3, 0)), None);
    }

    #[test]
    fn test_ragged_rows() {
        let g = Grid::from_rows(vec![vec![Tile::PlayerSpawn, Tile::Empty], vec![Tile::Goal]]);
        assert!(!g.is_rectangular());
        assert!(Grid::default().is_empty());
    }

    #[test]
    fn test_unknown_ascii_tile() {
        assert!(Grid::from_ascii("S.x").is_none());
    }

    #[test]
    fn test_find_spawn_row_major_first() {
        let g = grid(
            "..S
             S..",
        );
        assert_eq!(g.find_spawn(), Some(Position::new(2, 0)));
        assert_eq!(grid("...").find_spawn(), None);
    }

    #[test]
    fn test_neighbor_bounds() {
        let g = grid(
            "S.
             ..",
        );
        let origin = Position::new(0, 0);
        assert_eq!(g.neighbor(origin, Direction::Up), None);
        assert_eq!(g.neighbor(origin, Direction::Left), None);
        assert_eq!(g.neighbor(origin, Direction::Right), Some(Position::new(1, 0)));
        assert_eq!(g.neighbor(origin, Direction::Down), Some(Position::new(0, 1)));
        assert_eq!(g.neighbor(Position::new(1, 1), Direction::Right), None);
        assert_eq!(g.neighbor(Position::new(1, 1), Direction::Down), None);
    }

    #[test]
    fn test_coin_count() {
        let g = grid(
            "Sc.c
             c#^G",
        );
        assert_eq!(g.coin_count(), 3);
        assert_eq!(g.count(Tile::Spike), 1);
    }

    #[test]
    fn test_reachable_avoids_walls_and_spikes() {
        let g = grid(
            "S.#c
             .^#G
             ....",
        );
        let reach = g.reachable_from(Position::new(0, 0));
        assert!(reach.contains(&Position::new(3, 1)));
        assert!(reach.contains(&Position::new(3, 0)));
        assert!(!reach.contains(&Position::new(1, 1)));
        assert!(!reach.contains(&Position::new(2, 0)));

        let sealed = grid(
            "S#G
             ^#.",
        );
        assert!(!sealed.reachable_from(Position::new(0, 0)).contains(&Position::new(2, 0)));
    }

    #[test]
    fn test_serde_is_nested_arrays() {
        let g = grid("Sc");
        let json = serde_json::to_string(&g).unwrap();
        assert_eq!(json, r#"[["player","coin"]]"#);
        let back: Grid = serde_json::from_str(&json).unwrap();
        assert_eq!(back, g);
    }
}
