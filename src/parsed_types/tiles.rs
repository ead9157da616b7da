/// A sliding tiles instance. Tile 0 is the blank; positions are row-major
/// cell indices.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TilesInstance {
    rows: usize,
    cols: usize,
    /// Position of each tile in the initial state, indexed by tile
    initial: Vec<usize>,
    /// Position of each tile in the goal state, indexed by tile
    goal: Vec<usize>,
}

impl TilesInstance {
    pub fn new(rows: usize, cols: usize, initial: Vec<usize>, goal: Vec<usize>) -> Self {
        Self {
            rows,
            cols,
            initial,
            goal,
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn initial(&self) -> &[usize] {
        &self.initial
    }

    pub fn goal(&self) -> &[usize] {
        &self.goal
    }
}
