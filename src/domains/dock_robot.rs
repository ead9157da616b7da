//! A single robot moving boxes between locations. Each location has a number
//! of cranes, which can hold one box each, and room for a number of piles.
//! The robot carries at most one box and can only interact with the cranes
//! of the location it is at.

use crate::domains::DomainError;
use crate::parsed_types::DockRobotInstance;
use crate::search::{Cost, Domain, Edge, Operators, INFINITE_COST, ZERO_COST};
use ordered_float::OrderedFloat;
use smallvec::{smallvec, SmallVec};
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

type BoxId = u16;

/// Boxes of a pile, bottom first.
type Pile = SmallVec<[BoxId; 8]>;

/// Cost of a crane handing a box to the robot or taking it back.
const CRANE_COST: Cost = OrderedFloat(0.01);

/// Cost per box in the pile of putting a box on or taking it off the pile.
const PILE_COST: f64 = 0.05;

#[derive(Debug, Clone, PartialEq)]
pub struct DockRobotState {
    robot: usize,
    cargo: Option<BoxId>,
    /// Boxes held by the cranes of each location, sorted
    cranes: Vec<SmallVec<[BoxId; 4]>>,
    /// Piles of each location, sorted by their bottom box
    piles: Vec<SmallVec<[Pile; 4]>>,
    /// Where every box is, the robot's location for the cargo
    box_location: Vec<usize>,
    /// Number of boxes away from their goal location
    nleft: usize,
    h: Cost,
    d: Cost,
}

impl DockRobotState {
    pub fn robot(&self) -> usize {
        self.robot
    }

    pub fn cargo(&self) -> Option<usize> {
        self.cargo.map(usize::from)
    }

    pub fn nleft(&self) -> usize {
        self.nleft
    }

    pub fn box_location(&self, box_id: usize) -> usize {
        self.box_location[box_id]
    }

    pub fn crane_boxes(&self, location: usize) -> &[BoxId] {
        &self.cranes[location]
    }

    pub fn piles(&self, location: usize) -> &[Pile] {
        &self.piles[location]
    }

    fn find_pile(&self, location: usize, bottom: BoxId) -> Option<usize> {
        self.piles[location]
            .binary_search_by_key(&bottom, |pile| pile[0])
            .ok()
    }

    fn holds(&self, location: usize, box_id: BoxId) -> bool {
        self.cranes[location].binary_search(&box_id).is_ok()
    }
}

/// Piles are named by their bottom box and cranes by the box they hold,
/// both at the robot's location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DockRobotOper {
    Nop,
    /// Put the box held by a crane on a pile, or on the ground as a new pile
    Push { held: BoxId, pile: Option<BoxId> },
    /// Take the top box of a pile with a free crane
    Pop { pile: BoxId },
    /// Hand the box held by a crane to the robot
    Load { held: BoxId },
    /// Hand the robot's cargo to a free crane
    Unload,
    Move { to: usize },
}

#[derive(Debug, Clone, Copy)]
pub struct DockRobotUndo {
    /// Restores the layout, even where no operator leads back
    inverse: DockRobotOper,
    h: Cost,
    d: Cost,
}

#[derive(Debug)]
pub struct DockRobot {
    num_locations: usize,
    crane_capacity: Vec<usize>,
    pile_capacity: Vec<usize>,
    /// Row-major travel costs
    adjacency: Vec<Cost>,
    /// Row-major shortest travel costs
    shortest: Vec<Cost>,
    /// Row-major fewest number of moves
    hops: Vec<Cost>,
    goals: Vec<Option<usize>>,
    initial: DockRobotState,
}

/// Floyd-Warshall over a row-major matrix, in place.
fn all_pairs_shortest(n: usize, matrix: &mut [Cost]) {
    for via in 0..n {
        for from in 0..n {
            let first = matrix[from * n + via];
            if first == INFINITE_COST {
                continue;
            }
            for to in 0..n {
                let candidate = first + matrix[via * n + to];
                if candidate < matrix[from * n + to] {
                    matrix[from * n + to] = candidate;
                }
            }
        }
    }
}

fn insert_sorted(boxes: &mut SmallVec<[BoxId; 4]>, box_id: BoxId) {
    let index = boxes
        .binary_search(&box_id)
        .expect_err("Box held by two cranes");
    boxes.insert(index, box_id);
}

fn remove_sorted(boxes: &mut SmallVec<[BoxId; 4]>, box_id: BoxId) {
    let index = boxes.binary_search(&box_id).expect("Box not held");
    boxes.remove(index);
}

impl DockRobot {
    pub fn new(instance: &DockRobotInstance) -> Result<Self, DomainError> {
        if instance.num_robots != 1 {
            return Err(DomainError::UnsupportedRobots(instance.num_robots));
        }
        let n = instance.num_locations;
        if n > usize::from(u16::MAX) {
            return Err(DomainError::LocationOutOfRange(n));
        }
        if instance.num_boxes > usize::from(BoxId::MAX) {
            return Err(DomainError::BoxOutOfRange(instance.num_boxes));
        }
        let check_location = |location: usize| {
            if location < n {
                Ok(location)
            } else {
                Err(DomainError::LocationOutOfRange(location))
            }
        };

        let mut described = vec![false; n];
        let mut crane_capacity = vec![0; n];
        let mut pile_capacity = vec![0; n];
        for spec in &instance.locations {
            let location = check_location(spec.index)?;
            if std::mem::replace(&mut described[location], true) {
                return Err(DomainError::DuplicateLocation(location));
            }
            crane_capacity[location] = spec.cranes;
            pile_capacity[location] = spec.piles;
        }
        if let Some(location) = described.iter().position(|&seen| !seen) {
            return Err(DomainError::MissingLocation(location));
        }

        assert_eq!(instance.adjacency.len(), n * n, "Adjacency is not {n}x{n}");
        let mut adjacency = Vec::with_capacity(n * n);
        for (index, &distance) in instance.adjacency.iter().enumerate() {
            if distance < 0. {
                return Err(DomainError::NegativeDistance {
                    from: index / n,
                    to: index % n,
                });
            }
            adjacency.push(Cost::from(distance));
        }
        let mut shortest = adjacency.clone();
        let mut hops: Vec<Cost> = adjacency
            .iter()
            .map(|&distance| {
                if distance == INFINITE_COST {
                    INFINITE_COST
                } else {
                    Cost::from(1.)
                }
            })
            .collect();
        for location in 0..n {
            shortest[location * n + location] = ZERO_COST;
            hops[location * n + location] = ZERO_COST;
        }
        all_pairs_shortest(n, &mut shortest);
        all_pairs_shortest(n, &mut hops);

        let num_boxes = instance.num_boxes;
        let mut placed = vec![false; num_boxes];
        let mut place = |box_id: usize| -> Result<BoxId, DomainError> {
            match placed.get_mut(box_id) {
                None => Err(DomainError::BoxOutOfRange(box_id)),
                Some(true) => Err(DomainError::BoxPlacedTwice(box_id)),
                Some(seen) => {
                    *seen = true;
                    Ok(box_id as BoxId)
                }
            }
        };

        let mut cranes: Vec<SmallVec<[BoxId; 4]>> = vec![SmallVec::new(); n];
        for spec in &instance.cranes {
            let location = check_location(spec.location)?;
            let box_id = place(spec.box_id)?;
            if cranes[location].len() == crane_capacity[location] {
                return Err(DomainError::CapacityExceeded {
                    location,
                    capacity: crane_capacity[location],
                    what: "cranes",
                });
            }
            insert_sorted(&mut cranes[location], box_id);
        }

        let mut piles: Vec<SmallVec<[Pile; 4]>> = vec![SmallVec::new(); n];
        for spec in &instance.piles {
            let location = check_location(spec.location)?;
            let pile = spec
                .boxes
                .iter()
                .map(|&box_id| place(box_id))
                .collect::<Result<Pile, _>>()?;
            if piles[location].len() == pile_capacity[location] {
                return Err(DomainError::CapacityExceeded {
                    location,
                    capacity: pile_capacity[location],
                    what: "piles",
                });
            }
            let index = piles[location]
                .binary_search_by_key(&pile[0], |other| other[0])
                .unwrap_or_else(|index| index);
            piles[location].insert(index, pile);
        }

        let (robot, cargo) = match &instance.robot {
            Some(spec) => (
                check_location(spec.location)?,
                spec.cargo.map(&mut place).transpose()?,
            ),
            None => (0, None),
        };

        if let Some(box_id) = placed.iter().position(|&seen| !seen) {
            return Err(DomainError::BoxNotPlaced(box_id));
        }

        let mut goals = vec![None; num_boxes];
        for spec in &instance.goals {
            let location = check_location(spec.location)?;
            let goal = goals
                .get_mut(spec.box_id)
                .ok_or(DomainError::BoxOutOfRange(spec.box_id))?;
            if goal.replace(location).is_some() {
                return Err(DomainError::DuplicateGoal(spec.box_id));
            }
        }

        let mut domain = Self {
            num_locations: n,
            crane_capacity,
            pile_capacity,
            adjacency,
            shortest,
            hops,
            goals,
            initial: DockRobotState {
                robot,
                cargo,
                cranes,
                piles,
                box_location: vec![0; num_boxes],
                nleft: 0,
                h: ZERO_COST,
                d: ZERO_COST,
            },
        };
        let mut initial = domain.initial.clone();
        domain.derive_fields(&mut initial);
        domain.initial = initial;
        Ok(domain)
    }

    pub fn num_locations(&self) -> usize {
        self.num_locations
    }

    pub fn num_boxes(&self) -> usize {
        self.goals.len()
    }

    fn travel(&self, from: usize, to: usize) -> Cost {
        self.adjacency[from * self.num_locations + to]
    }

    fn out_of_place(&self, box_id: usize, location: usize) -> bool {
        matches!(self.goals[box_id], Some(goal) if goal != location)
    }

    /// Number of boxes away from their goal, counted from scratch.
    pub fn count_left(&self, state: &DockRobotState) -> usize {
        state
            .box_location
            .iter()
            .enumerate()
            .filter(|&(box_id, &location)| self.out_of_place(box_id, location))
            .count()
    }

    /// Every box out of place has to be taken off its pile if it is on
    /// one, loaded, carried along the shortest road and unloaded. A box
    /// carried but already in place still has to be unloaded.
    fn estimates(&self, state: &DockRobotState) -> (Cost, Cost) {
        let n = self.num_locations;
        let one = Cost::from(1.);
        let mut h = ZERO_COST;
        let mut d = ZERO_COST;
        for (box_id, &location) in state.box_location.iter().enumerate() {
            let Some(goal) = self.goals[box_id] else {
                continue;
            };
            if goal == location {
                continue;
            }
            h += self.shortest[location * n + goal] + CRANE_COST;
            d += self.hops[location * n + goal] + one;
            let box_id = box_id as BoxId;
            if state.cargo != Some(box_id) {
                h += CRANE_COST;
                d += one;
                if !state.holds(location, box_id) {
                    h += Cost::from(PILE_COST);
                    d += one;
                }
            }
        }
        if let Some(box_id) = state.cargo {
            if !self.out_of_place(usize::from(box_id), state.robot) {
                h += CRANE_COST;
                d += one;
            }
        }
        (h, d)
    }

    /// Fill in everything that follows from the layout.
    fn derive_fields(&self, state: &mut DockRobotState) {
        for (location, boxes) in state.cranes.iter().enumerate() {
            for &box_id in boxes {
                state.box_location[usize::from(box_id)] = location;
            }
        }
        for (location, piles) in state.piles.iter().enumerate() {
            for &box_id in piles.iter().flatten() {
                state.box_location[usize::from(box_id)] = location;
            }
        }
        if let Some(box_id) = state.cargo {
            state.box_location[usize::from(box_id)] = state.robot;
        }
        state.nleft = self.count_left(state);
        (state.h, state.d) = self.estimates(state);
    }

    fn is_applicable(&self, state: &DockRobotState, op: DockRobotOper) -> bool {
        let here = state.robot;
        let crane_free = state.cranes[here].len() < self.crane_capacity[here];
        match op {
            DockRobotOper::Nop => false,
            DockRobotOper::Push { held, pile } => {
                state.holds(here, held)
                    && match pile {
                        Some(bottom) => state.find_pile(here, bottom).is_some(),
                        None => state.piles[here].len() < self.pile_capacity[here],
                    }
            }
            DockRobotOper::Pop { pile } => crane_free && state.find_pile(here, pile).is_some(),
            DockRobotOper::Load { held } => state.cargo.is_none() && state.holds(here, held),
            DockRobotOper::Unload => crane_free && state.cargo.is_some(),
            DockRobotOper::Move { to } => {
                to < self.num_locations && to != here && self.travel(here, to) != INFINITE_COST
            }
        }
    }

    fn cost(&self, state: &DockRobotState, op: DockRobotOper) -> Cost {
        let here = state.robot;
        let pile_height = |bottom: BoxId| {
            state
                .find_pile(here, bottom)
                .map_or(0, |index| state.piles[here][index].len())
        };
        match op {
            DockRobotOper::Nop => ZERO_COST,
            DockRobotOper::Push { pile, .. } => {
                let height = pile.map_or(0, pile_height);
                Cost::from(PILE_COST * (height + 1) as f64)
            }
            DockRobotOper::Pop { pile } => Cost::from(PILE_COST * pile_height(pile) as f64),
            DockRobotOper::Load { .. } | DockRobotOper::Unload => CRANE_COST,
            DockRobotOper::Move { to } => self.travel(here, to),
        }
    }

    /// Change the layout and return the operator restoring it. Moves are
    /// not checked against the roads so that one-way roads can be undone.
    fn mutate(&self, state: &mut DockRobotState, op: DockRobotOper) -> DockRobotOper {
        let here = state.robot;
        match op {
            DockRobotOper::Nop => panic!("Nop applied to {:?}", state),
            DockRobotOper::Push { held, pile } => {
                remove_sorted(&mut state.cranes[here], held);
                match pile {
                    Some(bottom) => {
                        let index = state.find_pile(here, bottom).expect("Pile not found");
                        state.piles[here][index].push(held);
                        DockRobotOper::Pop { pile: bottom }
                    }
                    None => {
                        let index = state.piles[here]
                            .binary_search_by_key(&held, |pile| pile[0])
                            .expect_err("Box both held and piled");
                        state.piles[here].insert(index, smallvec![held]);
                        DockRobotOper::Pop { pile: held }
                    }
                }
            }
            DockRobotOper::Pop { pile: bottom } => {
                let index = state.find_pile(here, bottom).expect("Pile not found");
                let pile = &mut state.piles[here][index];
                let top = pile.pop().expect("Empty pile");
                let inverse = if pile.is_empty() {
                    state.piles[here].remove(index);
                    DockRobotOper::Push {
                        held: top,
                        pile: None,
                    }
                } else {
                    DockRobotOper::Push {
                        held: top,
                        pile: Some(bottom),
                    }
                };
                insert_sorted(&mut state.cranes[here], top);
                inverse
            }
            DockRobotOper::Load { held } => {
                remove_sorted(&mut state.cranes[here], held);
                state.cargo = Some(held);
                DockRobotOper::Unload
            }
            DockRobotOper::Unload => {
                let held = state.cargo.take().expect("Nothing to unload");
                insert_sorted(&mut state.cranes[here], held);
                DockRobotOper::Load { held }
            }
            DockRobotOper::Move { to } => {
                state.robot = to;
                if let Some(box_id) = state.cargo {
                    let box_id = usize::from(box_id);
                    let was_out = self.out_of_place(box_id, here);
                    let is_out = self.out_of_place(box_id, to);
                    state.box_location[box_id] = to;
                    match (was_out, is_out) {
                        (true, false) => state.nleft -= 1,
                        (false, true) => state.nleft += 1,
                        _ => {}
                    }
                }
                DockRobotOper::Move { to: here }
            }
        }
    }
}

impl Domain for DockRobot {
    type State = DockRobotState;
    /// Robot location, cargo, then per location the held boxes and the
    /// piles, each prefixed by their count.
    type PackedState = Vec<u32>;
    type Oper = DockRobotOper;
    type Undo = DockRobotUndo;

    fn nop(&self) -> DockRobotOper {
        DockRobotOper::Nop
    }

    fn initial_state(&self) -> DockRobotState {
        self.initial.clone()
    }

    fn operators(&self, state: &DockRobotState) -> Operators<DockRobotOper> {
        let here = state.robot;
        let cranes = &state.cranes[here];
        let piles = &state.piles[here];
        let crane_free = cranes.len() < self.crane_capacity[here];
        let mut ops = Operators::new();

        for &held in cranes {
            for pile in piles {
                ops.push(DockRobotOper::Push {
                    held,
                    pile: Some(pile[0]),
                });
            }
            if piles.len() < self.pile_capacity[here] {
                ops.push(DockRobotOper::Push { held, pile: None });
            }
        }
        if crane_free {
            ops.extend(piles.iter().map(|pile| DockRobotOper::Pop { pile: pile[0] }));
        }
        if state.cargo.is_none() {
            ops.extend(cranes.iter().map(|&held| DockRobotOper::Load { held }));
        } else if crane_free {
            ops.push(DockRobotOper::Unload);
        }
        ops.extend(
            (0..self.num_locations)
                .filter(|&to| to != here && self.travel(here, to) != INFINITE_COST)
                .map(|to| DockRobotOper::Move { to }),
        );
        ops
    }

    fn apply(
        &self,
        state: &mut DockRobotState,
        op: DockRobotOper,
    ) -> Edge<DockRobotOper, DockRobotUndo> {
        assert!(
            self.is_applicable(state, op),
            "{:?} not applicable in {:?}",
            op,
            state
        );
        let cost = self.cost(state, op);
        let (h, d) = (state.h, state.d);
        let inverse = self.mutate(state, op);
        (state.h, state.d) = self.estimates(state);
        let revop = match inverse {
            DockRobotOper::Move { to } if self.travel(state.robot, to) == INFINITE_COST => {
                DockRobotOper::Nop
            }
            inverse => inverse,
        };
        Edge {
            cost,
            revop,
            undo: DockRobotUndo { inverse, h, d },
        }
    }

    fn revert(&self, state: &mut DockRobotState, edge: Edge<DockRobotOper, DockRobotUndo>) {
        self.mutate(state, edge.undo.inverse);
        state.h = edge.undo.h;
        state.d = edge.undo.d;
    }

    fn pack(&self, state: &DockRobotState) -> Vec<u32> {
        let mut packed = vec![
            state.robot as u32,
            state.cargo.map_or(0, |box_id| u32::from(box_id) + 1),
        ];
        for (cranes, piles) in state.cranes.iter().zip(&state.piles) {
            packed.push(cranes.len() as u32);
            packed.extend(cranes.iter().copied().map(u32::from));
            packed.push(piles.len() as u32);
            for pile in piles {
                packed.push(pile.len() as u32);
                packed.extend(pile.iter().copied().map(u32::from));
            }
        }
        packed
    }

    fn unpack(&self, packed: &Vec<u32>) -> DockRobotState {
        let mut words = packed.iter().map(|&word| word as usize);
        let mut next = || words.next().expect("Truncated packed state");
        let robot = next();
        let cargo = match next() {
            0 => None,
            box_id => Some((box_id - 1) as BoxId),
        };
        let mut cranes: Vec<SmallVec<[BoxId; 4]>> = Vec::with_capacity(self.num_locations);
        let mut piles: Vec<SmallVec<[Pile; 4]>> = Vec::with_capacity(self.num_locations);
        for _ in 0..self.num_locations {
            let held = next();
            cranes.push((0..held).map(|_| next() as BoxId).collect());
            let num_piles = next();
            piles.push(
                (0..num_piles)
                    .map(|_| {
                        let height = next();
                        (0..height).map(|_| next() as BoxId).collect::<Pile>()
                    })
                    .collect(),
            );
        }
        let mut state = DockRobotState {
            robot,
            cargo,
            cranes,
            piles,
            box_location: vec![0; self.num_boxes()],
            nleft: 0,
            h: ZERO_COST,
            d: ZERO_COST,
        };
        self.derive_fields(&mut state);
        state
    }

    fn hash(&self, packed: &Vec<u32>) -> u64 {
        let mut hasher = DefaultHasher::new();
        packed.hash(&mut hasher);
        hasher.finish()
    }

    fn h(&self, state: &DockRobotState) -> Cost {
        state.h
    }

    fn d(&self, state: &DockRobotState) -> Cost {
        state.d
    }

    fn is_goal(&self, state: &DockRobotState) -> bool {
        state.nleft == 0 && state.cargo.is_none()
    }
}
