//! Shared pieces for the AoC 2022 solvers.
//!
//! The days that move things around a grid all need the same few tools:
//!
//! - [`geom`]: 2D/3D integer points, cardinal directions and turns
//! - [`grid`]: occupancy maps, dense grids parsed from text
//! - [`search`]: shortest paths over implicitly generated neighbours
//! - [`timed`]: pathfinding through obstacles that move every tick
//!
//! Axis convention everywhere: `x` grows east, `y` grows south.

pub mod error;
pub mod geom;
pub mod grid;
pub mod parse;
pub mod search;
pub mod timed;

pub use error::{GridError, SearchError};
pub use geom::{Bounds3, Direction, Lattice, Point2, Point3, Turn};
pub use grid::{distances_from, Grid, Occupancy};
pub use search::{
    shortest_path_to, shortest_paths, weighted_shortest_path_to, weighted_shortest_paths,
    Distances,
};
pub use timed::{traverse, ObstacleField, Phase, Timeline, Trip};
