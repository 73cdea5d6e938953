//! **maze_solver** carves perfect mazes with a randomized recursive backtracker and solves them with a
//! depth first search, reporting every step to a `RenderSink` so both processes can be watched.

pub mod cells;
pub mod generators;
pub mod grid;
pub mod grid_displays;
pub mod pathing;
pub mod render_sink;
pub mod renderers;
pub mod units;
#[cfg(feature = "sdl")]
pub mod sdl;
pub mod utils;
