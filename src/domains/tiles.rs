//! The sliding tiles puzzle on boards of up to 16 cells, with Manhattan
//! distance estimates weighted by the cost of moving each tile.

use crate::domains::DomainError;
use crate::parsed_types::TilesInstance;
use crate::search::{Cost, Domain, Edge, Operators, ZERO_COST};
use smallvec::SmallVec;

const MAX_CELLS: usize = 16;

/// What it costs to slide tile `t`.
#[derive(clap::ValueEnum, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum TileCosts {
    /// Every tile costs 1
    #[default]
    Unit,
    /// Tile `t` costs `t`
    Heavy,
    /// Tile `t` costs `1 / t`
    Inverse,
}

impl TileCosts {
    fn cost(&self, tile: usize) -> Cost {
        debug_assert_ne!(tile, 0, "The blank has no cost");
        match self {
            TileCosts::Unit => Cost::from(1.),
            TileCosts::Heavy => Cost::from(tile as f64),
            TileCosts::Inverse => Cost::from(1. / tile as f64),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TilesState {
    /// Tile on each cell, 0 for the blank
    tiles: SmallVec<[u8; MAX_CELLS]>,
    blank: usize,
    h: Cost,
    d: Cost,
}

impl TilesState {
    pub fn tiles(&self) -> &[u8] {
        &self.tiles
    }

    pub fn blank(&self) -> usize {
        self.blank
    }
}

/// Slide the tile on the given cell into the blank, i.e. the blank moves to
/// that cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TilesOper {
    Nop,
    Blank(u8),
}

/// Estimates of the state before the move.
#[derive(Debug, Clone, Copy)]
pub struct TilesUndo {
    h: Cost,
    d: Cost,
}

#[derive(Debug)]
pub struct Tiles {
    rows: usize,
    cols: usize,
    costs: TileCosts,
    initial: SmallVec<[u8; MAX_CELLS]>,
    goal: SmallVec<[u8; MAX_CELLS]>,
    /// `md[tile][cell]` is the Manhattan distance from `cell` to the goal
    /// cell of `tile`
    md: Vec<Vec<usize>>,
    /// Cells the blank can move to, per blank cell
    moves: Vec<SmallVec<[u8; 4]>>,
}

/// Board indexed by cell from a list of cells indexed by tile.
fn board_from_positions(
    positions: &[usize],
    cells: usize,
    what: &'static str,
) -> Result<SmallVec<[u8; MAX_CELLS]>, DomainError> {
    let not_a_permutation = || DomainError::NotAPermutation { what, cells };
    if positions.len() != cells {
        return Err(not_a_permutation());
    }
    let mut board: SmallVec<[Option<u8>; MAX_CELLS]> = SmallVec::from_elem(None, cells);
    for (tile, &cell) in positions.iter().enumerate() {
        match board.get_mut(cell) {
            Some(slot) if slot.is_none() => *slot = Some(tile as u8),
            _ => return Err(not_a_permutation()),
        }
    }
    Ok(board.into_iter().flatten().collect())
}

impl Tiles {
    pub fn new(instance: &TilesInstance, costs: TileCosts) -> Result<Self, DomainError> {
        let (rows, cols) = (instance.rows(), instance.cols());
        let cells = rows * cols;
        if !(2..=MAX_CELLS).contains(&cells) {
            return Err(DomainError::UnsupportedBoard { rows, cols });
        }
        let initial = board_from_positions(instance.initial(), cells, "starting")?;
        let goal = board_from_positions(instance.goal(), cells, "goal")?;

        let md = (0..cells)
            .map(|tile| {
                let goal_cell = instance.goal()[tile];
                (0..cells)
                    .map(|cell| {
                        (cell / cols).abs_diff(goal_cell / cols)
                            + (cell % cols).abs_diff(goal_cell % cols)
                    })
                    .collect()
            })
            .collect();

        let moves = (0..cells)
            .map(|cell| {
                let (row, col) = (cell / cols, cell % cols);
                let mut targets = SmallVec::new();
                if row > 0 {
                    targets.push((cell - cols) as u8);
                }
                if col > 0 {
                    targets.push((cell - 1) as u8);
                }
                if col + 1 < cols {
                    targets.push((cell + 1) as u8);
                }
                if row + 1 < rows {
                    targets.push((cell + cols) as u8);
                }
                targets
            })
            .collect();

        Ok(Self {
            rows,
            cols,
            costs,
            initial,
            goal,
            md,
            moves,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    fn estimates(&self, tiles: &[u8]) -> (Cost, Cost) {
        let mut h = ZERO_COST;
        let mut d = 0;
        for (cell, &tile) in tiles.iter().enumerate() {
            if tile == 0 {
                continue;
            }
            let tile = usize::from(tile);
            let distance = self.md[tile][cell];
            h += self.costs.cost(tile) * Cost::from(distance as f64);
            d += distance;
        }
        (h, Cost::from(d as f64))
    }

    fn make_state(&self, tiles: SmallVec<[u8; MAX_CELLS]>) -> TilesState {
        let blank = tiles
            .iter()
            .position(|&tile| tile == 0)
            .expect("Board without blank");
        let (h, d) = self.estimates(&tiles);
        TilesState { tiles, blank, h, d }
    }
}

impl Domain for Tiles {
    type State = TilesState;
    type PackedState = u64;
    type Oper = TilesOper;
    type Undo = TilesUndo;

    fn nop(&self) -> TilesOper {
        TilesOper::Nop
    }

    fn initial_state(&self) -> TilesState {
        self.make_state(self.initial.clone())
    }

    fn operators(&self, state: &TilesState) -> Operators<TilesOper> {
        self.moves[state.blank]
            .iter()
            .map(|&cell| TilesOper::Blank(cell))
            .collect()
    }

    fn apply(&self, state: &mut TilesState, op: TilesOper) -> Edge<TilesOper, TilesUndo> {
        let TilesOper::Blank(target) = op else {
            panic!("Nop applied to {:?}", state);
        };
        let target = usize::from(target);
        assert!(
            self.moves[state.blank].contains(&(target as u8)),
            "{:?} not applicable in {:?}",
            op,
            state
        );
        let undo = TilesUndo {
            h: state.h,
            d: state.d,
        };
        let tile = usize::from(state.tiles[target]);
        let revop = TilesOper::Blank(state.blank as u8);
        state.tiles.swap(state.blank, target);
        state.blank = target;
        (state.h, state.d) = self.estimates(&state.tiles);
        Edge {
            cost: self.costs.cost(tile),
            revop,
            undo,
        }
    }

    fn revert(&self, state: &mut TilesState, edge: Edge<TilesOper, TilesUndo>) {
        let TilesOper::Blank(previous) = edge.revop else {
            panic!("Tiles moves always have a reverse");
        };
        let previous = usize::from(previous);
        state.tiles.swap(state.blank, previous);
        state.blank = previous;
        state.h = edge.undo.h;
        state.d = edge.undo.d;
    }

    fn pack(&self, state: &TilesState) -> u64 {
        state
            .tiles
            .iter()
            .enumerate()
            .fold(0, |word, (cell, &tile)| word | (u64::from(tile) << (4 * cell)))
    }

    fn unpack(&self, packed: &u64) -> TilesState {
        let cells = self.rows * self.cols;
        let tiles = (0..cells)
            .map(|cell| ((packed >> (4 * cell)) & 0xf) as u8)
            .collect();
        self.make_state(tiles)
    }

    fn hash(&self, packed: &u64) -> u64 {
        *packed
    }

    fn h(&self, state: &TilesState) -> Cost {
        state.h
    }

    fn d(&self, state: &TilesState) -> Cost {
        state.d
    }

    fn is_goal(&self, state: &TilesState) -> bool {
        state.tiles == self.goal
    }

    /// Half of the permutations are reachable.
    fn num_states_hint(&self) -> Option<usize> {
        let cells = self.rows * self.cols;
        (1..=cells)
            .try_fold(1usize, |acc, n| acc.checked_mul(n))
            .map(|permutations| permutations / 2)
    }
}
