//! Plain data parsed from instance files, before any domain specific
//! validation or precomputation.

mod dock_robot;
mod tiles;
mod traffic;

pub use dock_robot::{CraneSpec, DockRobotInstance, GoalSpec, LocationSpec, PileSpec, RobotSpec};
pub use tiles::TilesInstance;
pub use traffic::{Movement, ObstacleSpec, TrafficInstance};
