use crate::search::{
    ClosedNode, Cost, Domain, NodeId, OpenNode, INFINITE_COST, NO_NODE, ZERO_COST,
};

/// The status of a search node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchNodeStatus {
    /// Node has been constructed but not registered yet
    New,
    /// Node is in the open list
    Open,
    /// Node has been expanded
    Closed,
}

/// A [`SearchNode`] is a node in the search space. It contains the packed
/// state and the information specific to the search, such as path cost and
/// parent node.
#[derive(Debug, Clone)]
pub struct SearchNode<D: Domain> {
    packed: D::PackedState,
    status: SearchNodeStatus,
    /// G-value of the node, i.e. the cost of the best known path to it.
    g: Cost,
    /// The value the node is ordered by, either the heuristic or the distance
    /// estimate depending on the search.
    h: Cost,
    /// Operator that generated this node
    op: D::Oper,
    /// Operator leading back to the parent, this is never generated when
    /// expanding the node
    pop: D::Oper,
    parent_id: NodeId,
    open_index: Option<usize>,
    closed_next: Option<NodeId>,
}

impl<D: Domain> SearchNode<D> {
    /// Create the root node of a search.
    pub fn new_root(packed: D::PackedState, nop: D::Oper) -> Self {
        Self {
            packed,
            status: SearchNodeStatus::New,
            g: ZERO_COST,
            h: INFINITE_COST,
            op: nop,
            pop: nop,
            parent_id: NO_NODE,
            open_index: None,
            closed_next: None,
        }
    }

    /// Create a node reached from `parent_id` by `op`, with `pop` leading
    /// back.
    pub fn new_with_parent(
        packed: D::PackedState,
        parent_id: NodeId,
        g: Cost,
        op: D::Oper,
        pop: D::Oper,
    ) -> Self {
        Self {
            packed,
            status: SearchNodeStatus::New,
            g,
            h: INFINITE_COST,
            op,
            pop,
            parent_id,
            open_index: None,
            closed_next: None,
        }
    }

    pub fn open(&mut self, h: Cost) {
        self.status = SearchNodeStatus::Open;
        self.h = h;
    }

    /// Move the node to a cheaper path through `parent_id`.
    pub fn reparent(&mut self, parent_id: NodeId, g: Cost, op: D::Oper, pop: D::Oper) {
        debug_assert!(g < self.g, "Reparenting must lower the path cost");
        self.parent_id = parent_id;
        self.g = g;
        self.op = op;
        self.pop = pop;
    }

    pub fn reopen(&mut self) {
        self.status = SearchNodeStatus::Open;
    }

    pub fn close(&mut self) {
        debug_assert_eq!(
            self.status,
            SearchNodeStatus::Open,
            "Node must be open to close it"
        );
        self.status = SearchNodeStatus::Closed;
    }

    pub fn get_status(&self) -> SearchNodeStatus {
        self.status
    }

    pub fn get_packed(&self) -> &D::PackedState {
        &self.packed
    }

    pub fn get_g(&self) -> Cost {
        self.g
    }

    pub fn get_op(&self) -> D::Oper {
        self.op
    }

    pub fn get_pop(&self) -> D::Oper {
        self.pop
    }

    pub fn get_parent_id(&self) -> NodeId {
        self.parent_id
    }
}

impl<D: Domain> OpenNode for SearchNode<D> {
    fn prio(&self) -> Cost {
        self.h
    }

    fn tieprio(&self) -> Cost {
        self.g
    }

    fn open_index(&self) -> Option<usize> {
        self.open_index
    }

    fn set_open_index(&mut self, index: Option<usize>) {
        self.open_index = index;
    }
}

impl<D: Domain> ClosedNode for SearchNode<D> {
    type Packed = D::PackedState;

    fn packed(&self) -> &D::PackedState {
        &self.packed
    }

    fn closed_next(&self) -> Option<NodeId> {
        self.closed_next
    }

    fn set_closed_next(&mut self, next: Option<NodeId>) {
        self.closed_next = next;
    }
}
