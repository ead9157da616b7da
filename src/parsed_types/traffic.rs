#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Movement {
    /// Up, down, left and right
    Four,
    /// Also the diagonals
    Eight,
}

/// An obstacle starting at `(x, y)` and moving by `(dx, dy)` every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObstacleSpec {
    pub x: i64,
    pub y: i64,
    pub dx: i64,
    pub dy: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrafficInstance {
    pub width: usize,
    pub height: usize,
    pub start: (usize, usize),
    pub goal: (usize, usize),
    pub movement: Movement,
    /// One row per line of the grid, `true` for cells that are permanently
    /// blocked
    pub grid: Vec<Vec<bool>>,
    pub obstacles: Vec<ObstacleSpec>,
}
