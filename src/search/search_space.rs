use crate::search::{
    AppliedEdge, ClosedList, Domain, NodeId, NodePool, Plan, SearchNode, NO_NODE, ZERO_COST,
};

/// A [`SearchSpace`] manages the nodes of a best-first search: the pool they
/// live in and the closed list used to detect duplicates.
#[derive(Debug)]
pub struct SearchSpace<D: Domain> {
    nodes: NodePool<SearchNode<D>>,
    closed: ClosedList,
}

impl<D: Domain> SearchSpace<D> {
    pub fn new(closed_capacity: usize) -> Self {
        Self {
            nodes: NodePool::new(),
            closed: ClosedList::new(closed_capacity),
        }
    }

    /// Prepare for a new search on `domain`, dropping all nodes.
    pub fn reset(&mut self, domain: &D) {
        self.nodes.reset();
        if self.closed.is_initialised() {
            self.closed.clear();
        } else {
            self.closed.init(domain);
        }
    }

    pub fn construct(&mut self, node: SearchNode<D>) -> NodeId {
        self.nodes.construct(node)
    }

    /// Discard a node that was never registered in the closed list.
    pub fn destruct(&mut self, node_id: NodeId) {
        self.nodes.destruct(node_id);
    }

    pub fn register(&mut self, domain: &D, node_id: NodeId, hash: u64) {
        self.closed.add(domain, &mut self.nodes, node_id, Some(hash));
    }

    pub fn find(&self, packed: &D::PackedState, hash: u64) -> Option<NodeId> {
        self.closed.find(&self.nodes, packed, hash)
    }

    #[inline(always)]
    pub fn get_node(&self, node_id: NodeId) -> &SearchNode<D> {
        self.nodes.get(node_id)
    }

    #[inline(always)]
    pub fn get_node_mut(&mut self, node_id: NodeId) -> &mut SearchNode<D> {
        self.nodes.get_mut(node_id)
    }

    #[inline(always)]
    pub fn nodes_mut(&mut self) -> &mut NodePool<SearchNode<D>> {
        &mut self.nodes
    }

    pub fn len(&self) -> usize {
        self.closed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closed.is_empty()
    }

    /// Rebuild the path to `goal_id` by following parent links back to the
    /// root and unpacking the states along the way. The cost is summed along
    /// the path, as the g-value of the goal may predate a cheaper path to one
    /// of its ancestors.
    pub fn extract_plan(&self, domain: &D, goal_id: NodeId) -> Plan<D::State, D::Oper> {
        let mut ops = vec![];
        let mut states = vec![];
        let mut current_node = self.get_node(goal_id);
        loop {
            states.push(domain.unpack(current_node.get_packed()));
            if NO_NODE == current_node.get_parent_id() {
                break;
            }
            ops.push(current_node.get_op());
            current_node = self.get_node(current_node.get_parent_id());
        }
        ops.reverse();
        states.reverse();

        let mut state = states[0].clone();
        let mut cost = ZERO_COST;
        for &op in &ops {
            cost += AppliedEdge::apply(domain, &mut state, op).commit();
        }
        Plan::new(ops, states, cost)
    }
}
