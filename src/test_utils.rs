use crate::search::{Cost, Domain, Edge, Operators};

pub const TILES_ONE_MOVE_TEXT: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/benchmarks/tiles/one-move.txt"
));

pub const TILES_EASY_TEXT: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/benchmarks/tiles/easy.txt"
));

pub const TILES_UNSOLVABLE_TEXT: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/benchmarks/tiles/unsolvable-2x2.txt"
));

pub const DOCK_ROBOT_ONE_BOX_TEXT: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/benchmarks/dock-robot/one-box.txt"
));

pub const DOCK_ROBOT_STACKS_TEXT: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/benchmarks/dock-robot/stacks.txt"
));

pub const TRAFFIC_STRAIGHT_TEXT: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/benchmarks/traffic/straight.txt"
));

pub const TRAFFIC_OBSTACLES_TEXT: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/benchmarks/traffic/obstacles.txt"
));

#[derive(Debug, Clone, PartialEq)]
pub struct GraphState {
    pub node: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GraphOper {
    Nop,
    Edge(usize),
}

/// An explicit directed graph with per-node heuristic values, small enough
/// to check search behaviour by hand.
#[derive(Debug)]
pub struct GraphDomain {
    edges: Vec<Vec<(usize, Cost)>>,
    h: Vec<Cost>,
    start: usize,
    goal: usize,
}

impl GraphDomain {
    pub fn new(num_nodes: usize, edges: &[(usize, usize, f64)], h: &[f64], goal: usize) -> Self {
        assert_eq!(h.len(), num_nodes);
        let mut adjacency = vec![vec![]; num_nodes];
        for &(from, to, cost) in edges {
            adjacency[from].push((to, Cost::from(cost)));
        }
        Self {
            edges: adjacency,
            h: h.iter().copied().map(Cost::from).collect(),
            start: 0,
            goal,
        }
    }

    fn edge_cost(&self, from: usize, to: usize) -> Option<Cost> {
        self.edges[from]
            .iter()
            .find(|(target, _)| *target == to)
            .map(|(_, cost)| *cost)
    }
}

impl Domain for GraphDomain {
    type State = GraphState;
    type PackedState = usize;
    type Oper = GraphOper;
    type Undo = usize;

    fn nop(&self) -> GraphOper {
        GraphOper::Nop
    }

    fn initial_state(&self) -> GraphState {
        GraphState { node: self.start }
    }

    fn operators(&self, state: &GraphState) -> Operators<GraphOper> {
        self.edges[state.node]
            .iter()
            .map(|(to, _)| GraphOper::Edge(*to))
            .collect()
    }

    fn apply(&self, state: &mut GraphState, op: GraphOper) -> Edge<GraphOper, usize> {
        let GraphOper::Edge(to) = op else {
            panic!("Nop applied to {:?}", state);
        };
        let from = state.node;
        let cost = self
            .edge_cost(from, to)
            .unwrap_or_else(|| panic!("{:?} not applicable in {:?}", op, state));
        state.node = to;
        let revop = match self.edge_cost(to, from) {
            Some(_) => GraphOper::Edge(from),
            None => GraphOper::Nop,
        };
        Edge {
            cost,
            revop,
            undo: from,
        }
    }

    fn revert(&self, state: &mut GraphState, edge: Edge<GraphOper, usize>) {
        state.node = edge.undo;
    }

    fn pack(&self, state: &GraphState) -> usize {
        state.node
    }

    fn unpack(&self, packed: &usize) -> GraphState {
        GraphState { node: *packed }
    }

    fn hash(&self, packed: &usize) -> u64 {
        *packed as u64
    }

    fn h(&self, state: &GraphState) -> Cost {
        self.h[state.node]
    }

    fn d(&self, state: &GraphState) -> Cost {
        self.h[state.node]
    }

    fn is_goal(&self, state: &GraphState) -> bool {
        state.node == self.goal
    }

    fn num_states_hint(&self) -> Option<usize> {
        Some(self.edges.len())
    }
}

/// 0 -> {1, 2} -> 3, goal 3. The cheap branch is listed first.
pub fn diamond_graph() -> GraphDomain {
    GraphDomain::new(
        4,
        &[(0, 1, 1.), (0, 2, 2.), (1, 3, 1.), (2, 3, 1.), (1, 0, 1.)],
        &[2., 1., 1., 0.],
        3,
    )
}

/// S=0, A=1, B=2, C=3, G=4. Greedy reaches C through A first with cost 11
/// and later finds the path through B with cost 2.
pub fn reopening_graph() -> GraphDomain {
    GraphDomain::new(
        5,
        &[(0, 1, 1.), (0, 2, 1.), (1, 3, 10.), (2, 3, 1.), (3, 4, 1.)],
        &[3., 1., 2., 3., 0.],
        4,
    )
}

/// Like [`reopening_graph`], but node 3 is expanded through the expensive
/// branch 0 -> 1 -> 3 before the cheap branch 0 -> 2 -> 4 -> 3 reaches it,
/// so it has to come back from the closed list. Goal 6 lies behind 3 and 5.
pub fn closed_reopening_graph() -> GraphDomain {
    GraphDomain::new(
        7,
        &[
            (0, 1, 1.),
            (0, 2, 1.),
            (1, 3, 10.),
            (2, 4, 1.),
            (4, 3, 1.),
            (3, 5, 1.),
            (5, 6, 1.),
        ],
        &[9., 1., 3., 0.5, 4., 5., 0.],
        6,
    )
}

/// 0 -> 1 -> dead end, goal 2 is unreachable.
pub fn dead_end_graph() -> GraphDomain {
    GraphDomain::new(3, &[(0, 1, 1.)], &[0., 0., 0.], 2)
}

/// A ring of `n` nodes with edges both ways, goal opposite the start.
/// Heuristic is zero everywhere, so real-time search has to learn.
pub fn ring_graph(n: usize) -> GraphDomain {
    let mut edges = vec![];
    for i in 0..n {
        edges.push((i, (i + 1) % n, 1.));
        edges.push(((i + 1) % n, i, 1.));
    }
    GraphDomain::new(n, &edges, &vec![0.; n], n / 2)
}
