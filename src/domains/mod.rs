//! Concrete planning domains implementing [`crate::search::Domain`].

mod dock_robot;
mod tiles;
mod traffic;

pub use dock_robot::{DockRobot, DockRobotOper, DockRobotState};
pub use tiles::{TileCosts, Tiles, TilesOper, TilesState};
pub use traffic::{Direction, Traffic, TrafficOper, TrafficState};

use thiserror::Error;

/// An instance that parsed fine but does not describe a valid problem.
#[derive(Debug, Error, PartialEq)]
pub enum DomainError {
    #[error("a {rows}x{cols} board is not supported, boards have 2 to 16 cells")]
    UnsupportedBoard { rows: usize, cols: usize },
    #[error("{what} positions are not a permutation of the {cells} cells")]
    NotAPermutation { what: &'static str, cells: usize },
    #[error("only a single robot is supported, got {0}")]
    UnsupportedRobots(usize),
    #[error("location {0} is out of range")]
    LocationOutOfRange(usize),
    #[error("location {0} is described more than once")]
    DuplicateLocation(usize),
    #[error("location {0} is not described")]
    MissingLocation(usize),
    #[error("box {0} is out of range")]
    BoxOutOfRange(usize),
    #[error("box {0} is placed more than once")]
    BoxPlacedTwice(usize),
    #[error("box {0} is not placed anywhere")]
    BoxNotPlaced(usize),
    #[error("box {0} has more than one goal")]
    DuplicateGoal(usize),
    #[error("location {location} has more than {capacity} {what}")]
    CapacityExceeded {
        location: usize,
        capacity: usize,
        what: &'static str,
    },
    #[error("negative travel cost from location {from} to location {to}")]
    NegativeDistance { from: usize, to: usize },
    #[error("a {width}x{height} grid is not supported")]
    UnsupportedGrid { width: usize, height: usize },
    #[error("grid row {row} has {found} cells, expected {expected}")]
    RaggedGrid {
        row: usize,
        found: usize,
        expected: usize,
    },
    #[error("{what} ({x}, {y}) is outside the grid or blocked")]
    InvalidPosition {
        what: &'static str,
        x: usize,
        y: usize,
    },
    #[error("obstacle {0} starts outside the grid")]
    ObstacleOutOfBounds(usize),
}
