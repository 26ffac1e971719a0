//! Seeded local level source
//!
//! Used when no remote level is available (first run, offline, or a failed
//! generation request). Output is deterministic for a given seed and
//! difficulty, and always solvable: a carved path joins spawn and goal, and
//! coins are only placed on cells reachable without touching a spike.

use std::collections::BTreeSet;

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::consts::{LEVEL_HEIGHT, LEVEL_WIDTH};
use crate::sim::{Grid, LevelData, MAX_DIFFICULTY, MIN_DIFFICULTY, Position, Tile};

/// Chance that the carved path wanders vertically instead of advancing
const WANDER_CHANCE: f64 = 0.35;

const DESCRIPTIONS: [&str; 5] = [
    "A gentle stroll with a few shiny detours",
    "Corridors open up, and so do the spikes",
    "Pick your route carefully through the maze",
    "Tight squeezes between walls and hazards",
    "A spiked gauntlet for steady hands",
];

/// Generate an 8 x 12 level for `difficulty` (clamped to 1..=5)
pub fn generate_level(seed: u64, difficulty: u8) -> LevelData {
    let difficulty = difficulty.clamp(MIN_DIFFICULTY, MAX_DIFFICULTY);
    let level_seed = seed
        .wrapping_mul(2654435761)
        .wrapping_add(difficulty as u64);
    let mut rng = Pcg32::seed_from_u64(level_seed);

    let spawn = Position::new(0, rng.random_range(0..LEVEL_HEIGHT));
    let goal = Position::new(LEVEL_WIDTH - 1, rng.random_range(0..LEVEL_HEIGHT));
    let path = carve_path(&mut rng, spawn, goal);

    // Hazard density scales with difficulty
    let d = difficulty as f64;
    let wall_chance = 0.10 + 0.04 * d;
    let spike_chance = 0.02 + 0.03 * d;

    let mut rows = vec![vec![Tile::Empty; LEVEL_WIDTH]; LEVEL_HEIGHT];
    for (y, row) in rows.iter_mut().enumerate() {
        for (x, tile) in row.iter_mut().enumerate() {
            if path.contains(&Position::new(x, y)) {
                continue;
            }
            let roll: f64 = rng.random();
            *tile = if roll < wall_chance {
                Tile::Wall
            } else if roll < wall_chance + spike_chance {
                Tile::Spike
            } else {
                Tile::Empty
            };
        }
    }
    rows[spawn.y][spawn.x] = Tile::PlayerSpawn;
    rows[goal.y][goal.x] = Tile::Goal;

    // Coins only where the player can actually get to
    let reachable = Grid::from_rows(rows.clone()).reachable_from(spawn);
    let mut candidates: Vec<Position> = reachable
        .into_iter()
        .filter(|&pos| rows[pos.y][pos.x] == Tile::Empty)
        .collect();
    candidates.shuffle(&mut rng);
    let coin_target = 2 + difficulty as usize;
    let coins = coin_target.min(candidates.len());
    for pos in &candidates[..coins] {
        rows[pos.y][pos.x] = Tile::Coin;
    }

    let estimated_time = (path.len() as f64 * (0.5 + 0.1 * d) + coins as f64 * 2.0).round();
    let description = DESCRIPTIONS[(difficulty - MIN_DIFFICULTY) as usize].to_string();

    log::info!(
        "Generated level: seed={}, difficulty={}, path={}, coins={}",
        seed,
        difficulty,
        path.len(),
        coins
    );

    LevelData {
        grid: Grid::from_rows(rows),
        difficulty,
        estimated_time,
        coins: coins as u32,
        description,
    }
}

/// Random monotone-in-x walk from `from` to `to`, returned as the set of cells
/// it covers (both endpoints included)
fn carve_path(rng: &mut Pcg32, from: Position, to: Position) -> BTreeSet<Position> {
    let mut path = BTreeSet::from([from]);
    let mut cur = from;

    while cur != to {
        let toward_goal_y = match cur.y.cmp(&to.y) {
            std::cmp::Ordering::Less => cur.y + 1,
            std::cmp::Ordering::Greater => cur.y - 1,
            std::cmp::Ordering::Equal => cur.y,
        };

        cur = if cur.x == to.x {
            Position::new(cur.x, toward_goal_y)
        } else if rng.random_bool(WANDER_CHANCE) {
            let up = rng.random_bool(0.5);
            let y = if up {
                cur.y.saturating_sub(1)
            } else {
                (cur.y + 1).min(LEVEL_HEIGHT - 1)
            };
            Position::new(cur.x, y)
        } else {
            Position::new(cur.x + 1, cur.y)
        };
        path.insert(cur);
    }
    path
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_levels_validate() {
        for difficulty in MIN_DIFFICULTY..=MAX_DIFFICULTY {
            for seed in 0..40u64 {
                let level = generate_level(seed, difficulty);
                level.validate().unwrap();
                assert_eq!(level.grid.width(), LEVEL_WIDTH);
                assert_eq!(level.grid.height(), LEVEL_HEIGHT);
                assert_eq!(level.difficulty, difficulty);
                assert_eq!(level.coins as usize, level.grid.coin_count());
            }
        }
    }

    #[test]
    fn test_goal_and_coins_reachable() {
        for seed in 0..60u64 {
            let level = generate_level(seed, 5);
            let spawn = level.grid.find_spawn().unwrap();
            let reach = level.grid.reachable_from(spawn);
            for goal in level.grid.positions_of(Tile::Goal) {
                assert!(reach.contains(&goal), "seed {seed}: goal unreachable");
            }
            for coin in level.grid.positions_of(Tile::Coin) {
                assert!(reach.contains(&coin), "seed {seed}: coin unreachable");
            }
        }
    }

    #[test]
    fn test_deterministic() {
        assert_eq!(generate_level(42, 3), generate_level(42, 3));
        assert_ne!(generate_level(42, 3).grid, generate_level(43, 3).grid);
    }

    #[test]
    fn test_difficulty_clamped() {
        assert_eq!(generate_level(7, 0).difficulty, MIN_DIFFICULTY);
        assert_eq!(generate_level(7, 200).difficulty, MAX_DIFFICULTY);
    }

    #[test]
    fn test_harder_levels_have_more_hazards() {
        let hazards = |difficulty| -> usize {
            (0..50u64)
                .map(|seed| {
                    let grid = generate_level(seed, difficulty).grid;
                    grid.count(Tile::Spike) + grid.count(Tile::Wall)
                })
                .sum()
        };
        assert!(hazards(5) > hazards(1));
    }

    #[test]
    fn test_carve_path_connects() {
        let mut rng = Pcg32::seed_from_u64(9);
        let from = Position::new(0, 7);
        let to = Position::new(LEVEL_WIDTH - 1, 0);
        let path = carve_path(&mut rng, from, to);
        assert!(path.contains(&from));
        assert!(path.contains(&to));
        assert!(path.len() >= LEVEL_WIDTH - 1 + 7 + 1);
    }
}
