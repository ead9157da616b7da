//! Learning real-time A*. The agent repeatedly looks ahead a bounded number
//! of expansions from where it is, raises the heuristic values inside that
//! local search space so that they stay consistent with its border, and then
//! moves greedily on the learned values until it leaves the local search
//! space. Learned values persist between episodes.

use crate::search::{
    search_engines::{DomainSearchResult, SearchEngine, SearchOptions, SearchOutcome, SearchResult},
    AppliedEdge, ClosedList, ClosedNode, Cost, Domain, NodeId, NodePool, OpenList, OpenNode, Plan,
    SearchStatistics, TerminationCondition, INFINITE_COST, ZERO_COST,
};
use tracing::debug;

#[derive(Debug, Clone, Copy)]
struct LrtaEdge<O> {
    op: O,
    cost: Cost,
    target: NodeId,
}

/// A state the agent knows about. The learned value and the successor list
/// live as long as the search; everything below `succs` is only meaningful
/// during one episode.
#[derive(Debug)]
struct LrtaNode<D: Domain> {
    packed: D::PackedState,
    h: Cost,
    is_goal: bool,
    closed_next: Option<NodeId>,
    /// `None` until the node is expanded the first time
    succs: Option<Vec<LrtaEdge<D::Oper>>>,

    reached: bool,
    g: Cost,
    /// Position in the local search space, if the node was expanded
    lss_index: Option<usize>,
    /// Value before the update of the current episode
    horig: Cost,
    /// Local search space nodes with an edge into this one
    preds: Vec<(NodeId, Cost)>,
    prio: Cost,
    tieprio: Cost,
    open_index: Option<usize>,
}

impl<D: Domain> LrtaNode<D> {
    fn new(packed: D::PackedState, h: Cost, is_goal: bool) -> Self {
        Self {
            packed,
            h,
            is_goal,
            closed_next: None,
            succs: None,
            reached: false,
            g: INFINITE_COST,
            lss_index: None,
            horig: h,
            preds: vec![],
            prio: ZERO_COST,
            tieprio: ZERO_COST,
            open_index: None,
        }
    }

    fn clear_episode(&mut self) {
        self.reached = false;
        self.g = INFINITE_COST;
        self.lss_index = None;
        self.preds.clear();
    }
}

impl<D: Domain> OpenNode for LrtaNode<D> {
    fn prio(&self) -> Cost {
        self.prio
    }

    fn tieprio(&self) -> Cost {
        self.tieprio
    }

    fn open_index(&self) -> Option<usize> {
        self.open_index
    }

    fn set_open_index(&mut self, index: Option<usize>) {
        self.open_index = index;
    }
}

impl<D: Domain> ClosedNode for LrtaNode<D> {
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

enum Episode {
    /// The agent moved and is still short of the goal
    Moved,
    /// The agent stands on a goal
    AtGoal,
    /// The learned value of the current state became infinite
    DeadEnd,
}

#[derive(Debug)]
pub struct LrtaStar<D: Domain> {
    options: SearchOptions,
    nodes: NodePool<LrtaNode<D>>,
    seen: ClosedList,
    open_list: OpenList,
    /// Nodes expanded in the current episode, in expansion order
    lss: Vec<NodeId>,
    /// Every node reached in the current episode
    touched: Vec<NodeId>,
    /// Operators executed so far
    trace: Vec<D::Oper>,
}

impl<D: Domain> LrtaStar<D> {
    pub fn new(options: SearchOptions) -> Self {
        Self {
            seen: ClosedList::new(options.closed_capacity),
            options,
            nodes: NodePool::new(),
            open_list: OpenList::new(),
            lss: vec![],
            touched: vec![],
            trace: vec![],
        }
    }

    /// The node of `state`, created with the domain's estimate if the state
    /// was never seen before. The flag tells whether the node already existed.
    fn intern(&mut self, domain: &D, state: &D::State) -> (NodeId, bool) {
        let packed = domain.pack(state);
        let hash = domain.hash(&packed);
        if let Some(node_id) = self.seen.find(&self.nodes, &packed, hash) {
            return (node_id, true);
        }
        let node_id = self.nodes.construct(LrtaNode::new(
            packed,
            domain.h(state),
            domain.is_goal(state),
        ));
        self.seen.add(domain, &mut self.nodes, node_id, Some(hash));
        (node_id, false)
    }

    /// Make sure the successors of `node_id` are known.
    fn generate(&mut self, domain: &D, node_id: NodeId, statistics: &mut SearchStatistics) {
        if self.nodes.get(node_id).succs.is_some() {
            return;
        }
        let mut state = domain.unpack(&self.nodes.get(node_id).packed);
        let mut succs = vec![];
        for op in domain.operators(&state) {
            let edge = AppliedEdge::apply(domain, &mut state, op);
            statistics.increment_generated_nodes();
            let (target, seen) = self.intern(domain, &edge);
            if seen {
                statistics.increment_duplicate_nodes();
            }
            succs.push(LrtaEdge {
                op,
                cost: edge.cost(),
                target,
            });
        }
        self.nodes.get_mut(node_id).succs = Some(succs);
    }

    fn succs(&self, node_id: NodeId) -> &[LrtaEdge<D::Oper>] {
        self.nodes
            .get(node_id)
            .succs
            .as_deref()
            .expect("Successors of an unexpanded node")
    }

    fn reach(&mut self, node_id: NodeId, g: Cost) {
        let node = self.nodes.get_mut(node_id);
        node.reached = true;
        node.g = g;
        node.prio = g + node.h;
        node.tieprio = node.h;
        self.touched.push(node_id);
        self.open_list.push(&mut self.nodes, node_id);
    }

    /// A* from `current` for at most `lss_size` expansions. Goals are never
    /// expanded; popping one ends the lookahead.
    fn build_lss(&mut self, domain: &D, current: NodeId, statistics: &mut SearchStatistics) {
        self.reach(current, ZERO_COST);
        while self.lss.len() < self.options.lss_size {
            let Some(node_id) = self.open_list.pop(&mut self.nodes) else {
                break;
            };
            if self.nodes.get(node_id).is_goal {
                self.open_list.push(&mut self.nodes, node_id);
                break;
            }

            self.generate(domain, node_id, statistics);
            statistics.increment_expanded_nodes();
            let index = self.lss.len();
            self.lss.push(node_id);
            let node = self.nodes.get_mut(node_id);
            node.lss_index = Some(index);
            let g = node.g;

            let succs = self.succs(node_id).to_vec();
            for succ in succs {
                let child_g = g + succ.cost;
                let child = self.nodes.get(succ.target);
                if !child.reached {
                    self.reach(succ.target, child_g);
                } else if child_g < child.g && self.open_list.mem(&self.nodes, succ.target) {
                    self.open_list.pre_update(&self.nodes, succ.target);
                    let child = self.nodes.get_mut(succ.target);
                    child.g = child_g;
                    child.prio = child_g + child.h;
                    self.open_list.post_update(&mut self.nodes, succ.target);
                }
            }
        }
        self.open_list.clear(&mut self.nodes);
    }

    /// Raise every value in the local search space to the cheapest way out
    /// of it, never below what it was. Nodes are resolved cheapest value
    /// first, ties in expansion order.
    fn update_values(&mut self) {
        for &node_id in &self.lss {
            let node = self.nodes.get_mut(node_id);
            node.horig = node.h;
            node.h = INFINITE_COST;
        }
        for &node_id in &self.lss {
            let succs = self
                .nodes
                .get(node_id)
                .succs
                .clone()
                .expect("Successors of an expanded node");
            for succ in succs {
                if self.nodes.get(succ.target).lss_index.is_some() {
                    self.nodes
                        .get_mut(succ.target)
                        .preds
                        .push((node_id, succ.cost));
                }
            }
        }

        for index in 0..self.lss.len() {
            let node_id = self.lss[index];
            let way_out = self
                .succs(node_id)
                .iter()
                .map(|succ| succ.cost + self.nodes.get(succ.target).h)
                .min()
                .unwrap_or(INFINITE_COST);
            let node = self.nodes.get_mut(node_id);
            node.prio = node.horig.max(way_out);
            node.tieprio = Cost::from(index as f64);
            self.open_list.push(&mut self.nodes, node_id);
        }

        while let Some(node_id) = self.open_list.pop(&mut self.nodes) {
            let node = self.nodes.get_mut(node_id);
            node.h = node.prio;
            let h = node.h;
            let preds = std::mem::take(&mut node.preds);
            for (pred_id, cost) in preds {
                if !self.open_list.mem(&self.nodes, pred_id) {
                    continue;
                }
                let pred = self.nodes.get(pred_id);
                let candidate = pred.horig.max(cost + h);
                if candidate < pred.prio {
                    self.open_list.pre_update(&self.nodes, pred_id);
                    self.nodes.get_mut(pred_id).prio = candidate;
                    self.open_list.post_update(&mut self.nodes, pred_id);
                }
            }
        }
    }

    /// Walk on the learned values until leaving the local search space or
    /// reaching a goal. Returns the node the agent ends up on.
    fn commit(&mut self, domain: &D, state: &mut D::State, mut current: NodeId) -> NodeId {
        let mut steps = 0;
        loop {
            let node = self.nodes.get(current);
            if node.is_goal || node.lss_index.is_none() || steps > self.lss.len() {
                return current;
            }
            let mut best: Option<LrtaEdge<D::Oper>> = None;
            let mut best_value = INFINITE_COST;
            for succ in self.succs(current) {
                let value = succ.cost + self.nodes.get(succ.target).h;
                if best.is_none() || value < best_value {
                    best = Some(*succ);
                    best_value = value;
                }
            }
            let Some(best) = best else {
                return current;
            };
            if best_value == INFINITE_COST {
                return current;
            }
            AppliedEdge::apply(domain, state, best.op).commit();
            self.trace.push(best.op);
            current = best.target;
            steps += 1;
        }
    }

    fn clear_episode(&mut self) {
        for &node_id in &self.touched {
            self.nodes.get_mut(node_id).clear_episode();
        }
        self.touched.clear();
        self.lss.clear();
    }

    fn episode(
        &mut self,
        domain: &D,
        state: &mut D::State,
        current: &mut NodeId,
        statistics: &mut SearchStatistics,
    ) -> Episode {
        if self.nodes.get(*current).is_goal {
            return Episode::AtGoal;
        }
        self.build_lss(domain, *current, statistics);
        self.update_values();
        if self.nodes.get(*current).h == INFINITE_COST {
            self.clear_episode();
            return Episode::DeadEnd;
        }
        *current = self.commit(domain, state, *current);
        debug!(
            lss_size = self.lss.len(),
            trace_len = self.trace.len(),
            h = self.nodes.get(*current).h.into_inner(),
            "episode finished"
        );
        self.clear_episode();
        if self.nodes.get(*current).is_goal {
            Episode::AtGoal
        } else {
            Episode::Moved
        }
    }

    /// Replay the executed operators from the initial state.
    fn extract_plan(&self, domain: &D, initial_state: &D::State) -> Plan<D::State, D::Oper> {
        let mut state = initial_state.clone();
        let mut states = vec![state.clone()];
        let mut cost = ZERO_COST;
        for &op in &self.trace {
            cost += AppliedEdge::apply(domain, &mut state, op).commit();
            states.push(state.clone());
        }
        Plan::new(self.trace.clone(), states, cost)
    }

    fn prepare(&mut self, domain: &D) {
        self.reset();
        if !self.seen.is_initialised() {
            self.seen.init(domain);
        }
    }
}

impl<D: Domain> SearchEngine<D> for LrtaStar<D> {
    fn search(&mut self, domain: &D, initial_state: &D::State) -> DomainSearchResult<D> {
        self.prepare(domain);
        let mut statistics = SearchStatistics::new();
        let mut termination_condition = TerminationCondition::from_options(&self.options);
        let mut state = initial_state.clone();
        let (mut current, _) = self.intern(domain, &state);
        statistics.register_heuristic_value(self.nodes.get(current).h);

        let outcome = loop {
            if let Some(outcome) = termination_condition.should_terminate(&statistics) {
                break outcome;
            }
            match self.episode(domain, &mut state, &mut current, &mut statistics) {
                Episode::AtGoal => break SearchOutcome::Success,
                Episode::DeadEnd => break SearchOutcome::ProvablyUnsolvable,
                Episode::Moved => {
                    statistics.register_heuristic_value(self.nodes.get(current).h);
                }
            }
        };

        statistics.finalise_search();
        termination_condition.finalise();
        match outcome {
            SearchOutcome::Success => {
                let plan = self.extract_plan(domain, initial_state);
                SearchResult::success(plan, statistics)
            }
            _ => SearchResult::failure(outcome, statistics),
        }
    }

    fn reset(&mut self) {
        self.open_list.clear(&mut self.nodes);
        self.nodes.reset();
        self.seen.clear();
        self.lss.clear();
        self.touched.clear();
        self.trace.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::validate;
    use crate::test_utils::*;

    fn small_options(lss_size: usize) -> SearchOptions {
        SearchOptions {
            closed_capacity: 256,
            lss_size,
            ..SearchOptions::default()
        }
    }

    fn learned_values(engine: &LrtaStar<GraphDomain>, n: usize) -> Vec<Option<Cost>> {
        (0..n)
            .map(|node| {
                engine
                    .seen
                    .find(&engine.nodes, &node, node as u64)
                    .map(|node_id| engine.nodes.get(node_id).h)
            })
            .collect()
    }

    #[test]
    fn learned_values_never_decrease() {
        let n = 16;
        let domain = ring_graph(n);
        let mut engine = LrtaStar::new(small_options(2));
        engine.prepare(&domain);
        let mut statistics = SearchStatistics::new();
        let mut state = domain.initial_state();
        let (mut current, _) = engine.intern(&domain, &state);

        let mut previous = learned_values(&engine, n);
        for _ in 0..1000 {
            let episode = engine.episode(&domain, &mut state, &mut current, &mut statistics);
            let values = learned_values(&engine, n);
            for (before, after) in previous.iter().zip(values.iter()) {
                if let (Some(before), Some(after)) = (before, after) {
                    assert!(after >= before);
                }
            }
            previous = values;
            if matches!(episode, Episode::AtGoal) {
                break;
            }
        }
        assert!(domain.is_goal(&state));
        assert!(previous.iter().flatten().any(|h| *h > Cost::from(0.)));
    }

    #[test]
    fn state_follows_trace() {
        let domain = ring_graph(10);
        let mut engine = LrtaStar::new(small_options(3));
        let result = engine.search(&domain, &domain.initial_state());

        assert_eq!(result.outcome, SearchOutcome::Success);
        let plan = result.plan.unwrap();
        assert_eq!(plan.states().len(), plan.len() + 1);
        assert_eq!(plan.final_state().node, 5);
        assert_eq!(validate(&domain, plan.ops()), Ok(plan.cost()));
    }

    #[test]
    fn known_successors_count_as_duplicates() {
        let domain = ring_graph(10);
        let mut engine = LrtaStar::new(small_options(3));
        let result = engine.search(&domain, &domain.initial_state());

        assert_eq!(result.outcome, SearchOutcome::Success);
        // Expanding a neighbour of the start regenerates the start
        let statistics = &result.statistics;
        assert!(statistics.duplicate_nodes() >= 1);
        assert!(statistics.duplicate_nodes() < statistics.generated_nodes());
    }

    #[test]
    fn large_lookahead_finds_cheap_path() {
        let domain = reopening_graph();
        let mut engine = LrtaStar::new(small_options(10));
        let result = engine.search(&domain, &domain.initial_state());

        let plan = result.plan.unwrap();
        assert_eq!(plan.cost(), Cost::from(3.));
        assert_eq!(
            plan.ops(),
            &[GraphOper::Edge(2), GraphOper::Edge(3), GraphOper::Edge(4)]
        );
    }

    #[test]
    fn goal_start_needs_no_moves() {
        let domain = diamond_graph();
        let mut engine = LrtaStar::new(small_options(4));
        let result = engine.search(&domain, &GraphState { node: 3 });

        assert_eq!(result.outcome, SearchOutcome::Success);
        assert!(result.plan.unwrap().is_empty());
        assert_eq!(result.statistics.expanded_nodes(), 0);
    }

    #[test]
    fn expansion_limit_reports_no_plan() {
        let domain = ring_graph(40);
        let options = SearchOptions {
            expansion_limit: Some(3),
            ..small_options(1)
        };
        let mut engine = LrtaStar::new(options);
        let result = engine.search(&domain, &domain.initial_state());

        assert_eq!(result.outcome, SearchOutcome::ExpansionLimitExceeded);
        assert!(result.plan.is_none());
    }
}
