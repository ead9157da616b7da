//! Moving across a grid with static walls and obstacles that sweep back and
//! forth, bouncing off the border. Time is part of the state, so no move can
//! be undone by another move.

use crate::domains::DomainError;
use crate::parsed_types::{Movement, ObstacleSpec, TrafficInstance};
use crate::search::{Cost, Domain, Edge, Operators};
use std::f64::consts::SQRT_2;

const MAX_SIDE: usize = u16::MAX as usize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    North,
    East,
    South,
    West,
    NorthEast,
    SouthEast,
    SouthWest,
    NorthWest,
}

impl Direction {
    const FOUR: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    const EIGHT: [Direction; 8] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
        Direction::NorthEast,
        Direction::SouthEast,
        Direction::SouthWest,
        Direction::NorthWest,
    ];

    /// Offset in grid coordinates, `y` grows southwards.
    pub fn offset(&self) -> (i64, i64) {
        match self {
            Direction::North => (0, -1),
            Direction::East => (1, 0),
            Direction::South => (0, 1),
            Direction::West => (-1, 0),
            Direction::NorthEast => (1, -1),
            Direction::SouthEast => (1, 1),
            Direction::SouthWest => (-1, 1),
            Direction::NorthWest => (-1, -1),
        }
    }

    pub fn is_diagonal(&self) -> bool {
        let (dx, dy) = self.offset();
        dx != 0 && dy != 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrafficState {
    x: usize,
    y: usize,
    t: usize,
    h: Cost,
    d: Cost,
}

impl TrafficState {
    pub fn position(&self) -> (usize, usize) {
        (self.x, self.y)
    }

    pub fn time(&self) -> usize {
        self.t
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrafficOper {
    Nop,
    /// Stay in place for one tick
    Wait,
    Move(Direction),
}

#[derive(Debug, Clone, Copy)]
pub struct TrafficUndo {
    x: usize,
    y: usize,
    h: Cost,
    d: Cost,
}

#[derive(Debug)]
pub struct Traffic {
    width: usize,
    height: usize,
    movement: Movement,
    /// Row-major, `true` for walls
    walls: Vec<bool>,
    start: (usize, usize),
    goal: (usize, usize),
    obstacles: Vec<ObstacleSpec>,
}

/// Position at time `t` of something starting at `start` and moving `speed`
/// cells per tick along an axis of `len` cells, bouncing off both ends.
fn bounce(start: i64, speed: i64, len: usize, t: usize) -> usize {
    if len <= 1 {
        return 0;
    }
    let period = 2 * (len as i64 - 1);
    let unfolded = (start + speed * t as i64).rem_euclid(period);
    let position = if unfolded < len as i64 {
        unfolded
    } else {
        period - unfolded
    };
    position as usize
}

impl Traffic {
    pub fn new(instance: &TrafficInstance) -> Result<Self, DomainError> {
        let (width, height) = (instance.width, instance.height);
        if width == 0 || height == 0 || width > MAX_SIDE || height > MAX_SIDE {
            return Err(DomainError::UnsupportedGrid { width, height });
        }
        let mut walls = Vec::with_capacity(width * height);
        for row in 0..height {
            let found = instance.grid.get(row).map_or(0, Vec::len);
            if found != width {
                return Err(DomainError::RaggedGrid {
                    row,
                    found,
                    expected: width,
                });
            }
            walls.extend_from_slice(&instance.grid[row]);
        }

        let mut domain = Self {
            width,
            height,
            movement: instance.movement,
            walls,
            start: instance.start,
            goal: instance.goal,
            obstacles: vec![],
        };
        for (what, (x, y)) in [("start", instance.start), ("goal", instance.goal)] {
            if !domain.is_free(x as i64, y as i64) {
                return Err(DomainError::InvalidPosition { what, x, y });
            }
        }
        for (index, obstacle) in instance.obstacles.iter().enumerate() {
            let inside = |position: i64, len: usize| (0..len as i64).contains(&position);
            if !inside(obstacle.x, width) || !inside(obstacle.y, height) {
                return Err(DomainError::ObstacleOutOfBounds(index));
            }
        }
        domain.obstacles = instance.obstacles.clone();
        Ok(domain)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Where the given obstacle is at time `t`.
    pub fn obstacle_position(&self, index: usize, t: usize) -> (usize, usize) {
        let obstacle = &self.obstacles[index];
        (
            bounce(obstacle.x, obstacle.dx, self.width, t),
            bounce(obstacle.y, obstacle.dy, self.height, t),
        )
    }

    /// Inside the grid and not a wall.
    fn is_free(&self, x: i64, y: i64) -> bool {
        (0..self.width as i64).contains(&x)
            && (0..self.height as i64).contains(&y)
            && !self.walls[y as usize * self.width + x as usize]
    }

    fn is_occupied(&self, x: usize, y: usize, t: usize) -> bool {
        (0..self.obstacles.len()).any(|index| self.obstacle_position(index, t) == (x, y))
    }

    fn directions(&self) -> &'static [Direction] {
        match self.movement {
            Movement::Four => &Direction::FOUR,
            Movement::Eight => &Direction::EIGHT,
        }
    }

    /// Where `op` leads from `state`, if it can be taken at all.
    fn destination(&self, state: &TrafficState, op: TrafficOper) -> Option<(usize, usize)> {
        let (x, y) = match op {
            TrafficOper::Nop => return None,
            TrafficOper::Wait => (state.x as i64, state.y as i64),
            TrafficOper::Move(direction) => {
                if !self.directions().contains(&direction) {
                    return None;
                }
                let (dx, dy) = direction.offset();
                (state.x as i64 + dx, state.y as i64 + dy)
            }
        };
        if !self.is_free(x, y) {
            return None;
        }
        let (x, y) = (x as usize, y as usize);
        (!self.is_occupied(x, y, state.t + 1)).then_some((x, y))
    }

    fn estimates(&self, x: usize, y: usize) -> (Cost, Cost) {
        let dx = x.abs_diff(self.goal.0) as f64;
        let dy = y.abs_diff(self.goal.1) as f64;
        match self.movement {
            Movement::Four => (Cost::from(dx + dy), Cost::from(dx + dy)),
            Movement::Eight => {
                let (short, long) = if dx < dy { (dx, dy) } else { (dy, dx) };
                (
                    Cost::from(long - short + SQRT_2 * short),
                    Cost::from(long),
                )
            }
        }
    }

    fn make_state(&self, x: usize, y: usize, t: usize) -> TrafficState {
        let (h, d) = self.estimates(x, y);
        TrafficState { x, y, t, h, d }
    }
}

impl Domain for Traffic {
    type State = TrafficState;
    /// Time, row and column in 32, 16 and 16 bits.
    type PackedState = u64;
    type Oper = TrafficOper;
    type Undo = TrafficUndo;

    fn nop(&self) -> TrafficOper {
        TrafficOper::Nop
    }

    fn initial_state(&self) -> TrafficState {
        self.make_state(self.start.0, self.start.1, 0)
    }

    fn operators(&self, state: &TrafficState) -> Operators<TrafficOper> {
        self.directions()
            .iter()
            .map(|&direction| TrafficOper::Move(direction))
            .chain(std::iter::once(TrafficOper::Wait))
            .filter(|&op| self.destination(state, op).is_some())
            .collect()
    }

    fn apply(&self, state: &mut TrafficState, op: TrafficOper) -> Edge<TrafficOper, TrafficUndo> {
        let (x, y) = self
            .destination(state, op)
            .unwrap_or_else(|| panic!("{:?} not applicable in {:?}", op, state));
        let undo = TrafficUndo {
            x: state.x,
            y: state.y,
            h: state.h,
            d: state.d,
        };
        let cost = match op {
            TrafficOper::Move(direction) if direction.is_diagonal() => Cost::from(SQRT_2),
            _ => Cost::from(1.),
        };
        *state = self.make_state(x, y, state.t + 1);
        Edge {
            cost,
            revop: TrafficOper::Nop,
            undo,
        }
    }

    fn revert(&self, state: &mut TrafficState, edge: Edge<TrafficOper, TrafficUndo>) {
        let undo = edge.undo;
        state.x = undo.x;
        state.y = undo.y;
        state.t -= 1;
        state.h = undo.h;
        state.d = undo.d;
    }

    fn pack(&self, state: &TrafficState) -> u64 {
        assert!(state.t <= u32::MAX as usize, "Time overflow in {:?}", state);
        ((state.t as u64) << 32) | ((state.y as u64) << 16) | state.x as u64
    }

    fn unpack(&self, packed: &u64) -> TrafficState {
        let x = (packed & 0xffff) as usize;
        let y = ((packed >> 16) & 0xffff) as usize;
        let t = (packed >> 32) as usize;
        self.make_state(x, y, t)
    }

    fn hash(&self, packed: &u64) -> u64 {
        packed.wrapping_mul(0x9E37_79B9_7F4A_7C15)
    }

    fn h(&self, state: &TrafficState) -> Cost {
        state.h
    }

    fn d(&self, state: &TrafficState) -> Cost {
        state.d
    }

    fn is_goal(&self, state: &TrafficState) -> bool {
        (state.x, state.y) == self.goal
    }

    fn ident(&self, state: &TrafficState) -> Option<(TrafficOper, Cost)> {
        self.destination(state, TrafficOper::Wait)
            .map(|_| (TrafficOper::Wait, Cost::from(1.)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::Parser;
    use crate::search::search_engines::{Greedy, GreedyOrdering, IdaStar};
    use crate::search::{validate_plan, AppliedEdge, SearchEngine, SearchOptions, SearchOutcome};
    use crate::test_utils::*;

    fn traffic(text: &str) -> Traffic {
        Traffic::new(&TrafficInstance::from_text(text).unwrap()).unwrap()
    }

    #[test]
    fn obstacles_bounce_off_border() {
        let domain = traffic(TRAFFIC_OBSTACLES_TEXT);
        let row_sweeper: Vec<_> = (0..10).map(|t| domain.obstacle_position(0, t)).collect();
        assert_eq!(
            row_sweeper.iter().map(|&(x, _)| x).collect::<Vec<_>>(),
            vec![0, 1, 2, 3, 4, 3, 2, 1, 0, 1]
        );
        assert!(row_sweeper.iter().all(|&(_, y)| y == 2));
        assert_eq!(domain.obstacle_position(1, 4), (4, 4));
        assert_eq!(domain.obstacle_position(1, 6), (4, 2));
    }

    #[test]
    fn occupied_cells_are_avoided() {
        let domain = traffic(TRAFFIC_OBSTACLES_TEXT);
        let state = domain.make_state(1, 2, 0);
        // The row sweeper reaches (1, 2) at t = 1.
        let ops = domain.operators(&state);
        assert!(!ops.contains(&TrafficOper::Wait));
        assert!(ops.contains(&TrafficOper::Move(Direction::South)));
        assert_eq!(domain.ident(&state), None);
        // Walls at (1, 1) and (2, 1).
        assert!(!ops.contains(&TrafficOper::Move(Direction::North)));
        assert!(!ops.contains(&TrafficOper::Move(Direction::NorthEast)));
    }

    #[test]
    fn straight_line_costs_distance() {
        let domain = traffic(TRAFFIC_STRAIGHT_TEXT);
        let initial_state = domain.initial_state();
        assert_eq!(domain.h(&initial_state), Cost::from(5.));

        let mut greedy = Greedy::<Traffic>::new(GreedyOrdering::Heuristic, SearchOptions::default());
        let mut idastar = IdaStar::<Traffic>::new(SearchOptions::default());
        let engines: [&mut dyn SearchEngine<Traffic>; 2] = [&mut greedy, &mut idastar];
        for engine in engines {
            let result = engine.search(&domain, &initial_state);
            assert_eq!(result.outcome, SearchOutcome::Success);
            let plan = result.plan.unwrap();
            assert_eq!(plan.len(), 5);
            assert_eq!(plan.cost(), Cost::from(5.));
            assert_eq!(validate_plan(&domain, &plan), Ok(plan.cost()));
            assert_eq!(plan.final_state().time(), 5);
        }
    }

    #[test]
    fn diagonal_moves_cost_more() {
        let domain = traffic(TRAFFIC_OBSTACLES_TEXT);
        let mut state = domain.make_state(3, 3, 0);
        let original = state.clone();
        let edge = domain.apply(&mut state, TrafficOper::Move(Direction::SouthEast));
        assert_eq!(edge.cost, Cost::from(SQRT_2));
        assert_eq!(edge.revop, TrafficOper::Nop);
        assert_eq!(state.position(), (4, 4));
        assert!(domain.is_goal(&state));
        domain.revert(&mut state, edge);
        assert_eq!(state, original);
    }

    #[test]
    fn apply_and_revert_restore_state() {
        let domain = traffic(TRAFFIC_OBSTACLES_TEXT);
        let mut state = domain.initial_state();
        {
            let mut first = AppliedEdge::apply(&domain, &mut state, TrafficOper::Wait);
            assert_eq!(first.time(), 1);
            let second = AppliedEdge::apply(&domain, &mut first, TrafficOper::Move(Direction::East));
            assert_eq!(second.position(), (1, 0));
            assert_eq!(domain.unpack(&domain.pack(&second)), *second);
        }
        assert_eq!(state, domain.initial_state());
    }

    #[test]
    fn greedy_avoids_obstacles() {
        let domain = traffic(TRAFFIC_OBSTACLES_TEXT);
        let mut engine = Greedy::new(GreedyOrdering::Heuristic, SearchOptions::default());
        let result = engine.search(&domain, &domain.initial_state());

        assert_eq!(result.outcome, SearchOutcome::Success);
        let plan = result.plan.unwrap();
        assert_eq!(validate_plan(&domain, &plan), Ok(plan.cost()));
        for state in plan.states() {
            let (x, y) = state.position();
            assert!(!domain.is_occupied(x, y, state.time()));
        }
    }

    #[test]
    fn invalid_instances_rejected() {
        let mut instance = TrafficInstance::from_text(TRAFFIC_STRAIGHT_TEXT).unwrap();
        instance.grid[1][5] = true;
        assert_eq!(
            Traffic::new(&instance).unwrap_err(),
            DomainError::InvalidPosition {
                what: "goal",
                x: 5,
                y: 1
            }
        );

        let mut instance = TrafficInstance::from_text(TRAFFIC_STRAIGHT_TEXT).unwrap();
        instance.grid[2].pop();
        assert_eq!(
            Traffic::new(&instance).unwrap_err(),
            DomainError::RaggedGrid {
                row: 2,
                found: 5,
                expected: 6
            }
        );

        let mut instance = TrafficInstance::from_text(TRAFFIC_STRAIGHT_TEXT).unwrap();
        instance.obstacles.push(ObstacleSpec {
            x: 6,
            y: 0,
            dx: 1,
            dy: 0,
        });
        assert_eq!(
            Traffic::new(&instance).unwrap_err(),
            DomainError::ObstacleOutOfBounds(0)
        );
    }
}
