//! Draw-list generation for the board
//!
//! Converts a simulation snapshot into 2D primitives in pixel space. Sizes are
//! authored for a 48px tile and scaled to the configured tile size.

use glam::Vec2;

use crate::consts::TILE_SIZE;
use crate::sim::{Grid, Position, Snapshot, Tile};

/// A single filled and/or stroked primitive
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Rect {
        min: Vec2,
        size: Vec2,
        fill: Option<&'static str>,
        stroke: Option<Stroke>,
    },
    Circle {
        center: Vec2,
        radius: f32,
        fill: &'static str,
        stroke: Option<Stroke>,
    },
    Triangle {
        points: [Vec2; 3],
        fill: &'static str,
    },
    /// Disc with a radial gradient from `inner` (at `inner_radius`) to `outer`
    Orb {
        center: Vec2,
        inner_radius: f32,
        radius: f32,
        inner: &'static str,
        outer: &'static str,
        stroke: Stroke,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub color: &'static str,
    pub width: f32,
}

/// Colors for board elements (CSS color strings)
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    pub wall: &'static str,
    pub wall_edge: &'static str,
    pub coin: &'static str,
    pub coin_edge: &'static str,
    pub spike: &'static str,
    pub goal: &'static str,
    pub goal_edge: &'static str,
    pub player_core: &'static str,
    pub player_rim: &'static str,
    pub player_edge: &'static str,
}

impl Palette {
    pub const STANDARD: Palette = Palette {
        wall: "hsl(220, 20%, 25%)",
        wall_edge: "hsl(220, 20%, 35%)",
        coin: "hsl(140, 70%, 55%)",
        coin_edge: "hsl(140, 70%, 70%)",
        spike: "hsl(0, 72%, 55%)",
        goal: "hsl(190, 85%, 55%)",
        goal_edge: "hsl(190, 85%, 70%)",
        player_core: "hsl(280, 85%, 75%)",
        player_rim: "hsl(280, 85%, 55%)",
        player_edge: "hsl(280, 85%, 85%)",
    };

    pub const HIGH_CONTRAST: Palette = Palette {
        wall: "hsl(0, 0%, 85%)",
        wall_edge: "hsl(0, 0%, 100%)",
        coin: "hsl(55, 100%, 50%)",
        coin_edge: "hsl(55, 100%, 80%)",
        spike: "hsl(0, 100%, 50%)",
        goal: "hsl(200, 100%, 50%)",
        goal_edge: "hsl(200, 100%, 85%)",
        player_core: "hsl(300, 100%, 85%)",
        player_rim: "hsl(300, 100%, 60%)",
        player_edge: "hsl(0, 0%, 100%)",
    };

    pub fn for_contrast(high_contrast: bool) -> &'static Palette {
        if high_contrast {
            &Self::HIGH_CONTRAST
        } else {
            &Self::STANDARD
        }
    }
}

/// Canvas size in pixels for `grid` at `tile_size`
pub fn board_size(grid: &Grid, tile_size: f32) -> Vec2 {
    Vec2::new(grid.width() as f32, grid.height() as f32) * tile_size
}

/// Top-left pixel corner of a cell
#[inline]
pub fn tile_origin(pos: Position, tile_size: f32) -> Vec2 {
    Vec2::new(pos.x as f32, pos.y as f32) * tile_size
}

/// Build the frame: tiles in row-major order, then the player on top
pub fn build_frame(snapshot: &Snapshot<'_>, tile_size: f32, palette: &Palette) -> Vec<Shape> {
    let scale = tile_size / TILE_SIZE as f32;
    let half = Vec2::splat(tile_size / 2.0);
    let inset = 10.0 * scale;

    let mut shapes = Vec::new();
    for (pos, tile) in snapshot.grid.cells() {
        let origin = tile_origin(pos, tile_size);
        match tile {
            Tile::Wall => shapes.push(Shape::Rect {
                min: origin,
                size: Vec2::splat(tile_size),
                fill: Some(palette.wall),
                stroke: Some(Stroke {
                    color: palette.wall_edge,
                    width: 1.0,
                }),
            }),
            Tile::Coin if !snapshot.is_collected(pos) => shapes.push(Shape::Circle {
                center: origin + half,
                radius: 12.0 * scale,
                fill: palette.coin,
                stroke: Some(Stroke {
                    color: palette.coin_edge,
                    width: 2.0 * scale,
                }),
            }),
            Tile::Spike => shapes.push(Shape::Triangle {
                points: [
                    origin + Vec2::new(tile_size / 2.0, inset),
                    origin + Vec2::new(tile_size - inset, tile_size - inset),
                    origin + Vec2::new(inset, tile_size - inset),
                ],
                fill: palette.spike,
            }),
            Tile::Goal => shapes.push(Shape::Rect {
                min: origin + Vec2::splat(inset),
                size: Vec2::splat(tile_size - 2.0 * inset),
                fill: Some(palette.goal),
                stroke: Some(Stroke {
                    color: palette.goal_edge,
                    width: 3.0 * scale,
                }),
            }),
            Tile::Coin | Tile::Empty | Tile::PlayerSpawn => {}
        }
    }

    shapes.push(Shape::Orb {
        center: tile_origin(snapshot.player, tile_size) + half,
        inner_radius: 5.0 * scale,
        radius: 18.0 * scale,
        inner: palette.player_core,
        outer: palette.player_rim,
        stroke: Stroke {
            color: palette.player_edge,
            width: 2.0 * scale,
        },
    });
    shapes
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{GridSimulation, LevelData, Direction};

    fn session(text: &str) -> GridSimulation {
        let grid = Grid::from_ascii(text).unwrap();
        let level = LevelData {
            coins: grid.coin_count() as u32,
            grid,
            difficulty: 1,
            estimated_time: 5.0,
            description: String::new(),
        };
        GridSimulation::new(level, 0.0).unwrap()
    }

    fn count_circles(shapes: &[Shape]) -> usize {
        shapes
            .iter()
            .filter(|s| matches!(s, Shape::Circle { .. }))
            .count()
    }

    #[test]
    fn test_board_size() {
        let grid = Grid::from_ascii("S..\n..G").unwrap();
        assert_eq!(board_size(&grid, 48.0), Vec2::new(144.0, 96.0));
    }

    #[test]
    fn test_frame_contents() {
        let sim = session("S#c\n^.G");
        let shapes = build_frame(&sim.snapshot(0.0), 48.0, &Palette::STANDARD);
        // wall, coin, spike, goal, player
        assert_eq!(shapes.len(), 5);
        assert!(matches!(
            shapes.last(),
            Some(Shape::Orb { center, .. }) if *center == Vec2::new(24.0, 24.0)
        ));
        let wall = Palette::STANDARD.wall;
        assert!(matches!(
            shapes[0],
            Shape::Rect { min, fill: Some(fill), .. } if min == Vec2::new(48.0, 0.0) && fill == wall
        ));
    }

    #[test]
    fn test_collected_coins_hidden() {
        let mut sim = session("Sc.G");
        let before = build_frame(&sim.snapshot(0.0), 48.0, &Palette::STANDARD);
        assert_eq!(count_circles(&before), 1);

        sim.apply_input(Direction::Right, 0.0);
        let after = build_frame(&sim.snapshot(0.0), 48.0, &Palette::STANDARD);
        assert_eq!(count_circles(&after), 0);
    }

    #[test]
    fn test_scales_with_tile_size() {
        let sim = session("SG");
        let shapes = build_frame(&sim.snapshot(0.0), 24.0, &Palette::STANDARD);
        match shapes.last() {
            Some(Shape::Orb { radius, stroke, .. }) => {
                assert_eq!(*radius, 9.0);
                assert_eq!(stroke.width, 1.0);
            }
            other => panic!("expected player orb, got {:?}", other),
        }
    }

    #[test]
    fn test_palette_selection() {
        assert_eq!(Palette::for_contrast(false), &Palette::STANDARD);
        assert_eq!(Palette::for_contrast(true), &Palette::HIGH_CONTRAST);
    }
}
