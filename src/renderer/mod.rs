//! Board rendering
//!
//! Pure draw-list construction lives in `shapes`; the browser painter in
//! `canvas` only replays it onto a 2D context.

#[cfg(target_arch = "wasm32")]
pub mod canvas;
pub mod hud;
pub mod shapes;

pub use hud::{Hud, to_ascii};
pub use shapes::{Palette, Shape, Stroke, board_size, build_frame};
