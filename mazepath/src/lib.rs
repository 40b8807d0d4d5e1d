//! Shortest paths through mazes drawn as images.
//!
//! Pure black pixels are walls, every other pixel is open. The [`GridMap`] is built
//! once from the pixels and answers 4-connected neighbor queries on demand, and the
//! [`PathFinder`] runs a breadth-first search over it.

pub mod classify;
pub mod config;
pub mod error;
pub mod find;
pub mod grid;
pub mod util;

pub use classify::{classify, Cell};
pub use error::GridError;
pub use find::*;
pub use grid::*;
pub use util::{load_map, parse_img};
