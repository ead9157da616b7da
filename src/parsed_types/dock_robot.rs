#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationSpec {
    pub index: usize,
    pub cranes: usize,
    pub piles: usize,
}

/// A crane at `location` holding `box_id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CraneSpec {
    pub location: usize,
    pub box_id: usize,
}

/// A pile at `location`, bottom box first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PileSpec {
    pub location: usize,
    pub boxes: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RobotSpec {
    pub location: usize,
    pub cargo: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoalSpec {
    pub box_id: usize,
    pub location: usize,
}

/// A dock robot instance as written in the instance file.
#[derive(Debug, Clone, PartialEq)]
pub struct DockRobotInstance {
    pub num_locations: usize,
    pub num_robots: usize,
    pub locations: Vec<LocationSpec>,
    /// Row-major travel costs between locations, infinite where there is no
    /// road
    pub adjacency: Vec<f64>,
    pub num_boxes: usize,
    pub cranes: Vec<CraneSpec>,
    pub piles: Vec<PileSpec>,
    /// Defaults to an empty robot at location 0
    pub robot: Option<RobotSpec>,
    pub goals: Vec<GoalSpec>,
}
