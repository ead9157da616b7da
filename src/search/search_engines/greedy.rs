//! This module implements greedy best-first search, in the usual heuristic
//! guided flavour and in the "speedy" flavour guided by the distance
//! estimate.

use crate::search::{
    search_engines::{DomainSearchResult, SearchEngine, SearchOptions, SearchOutcome, SearchResult},
    AppliedEdge, Cost, Domain, OpenList, SearchNode, SearchNodeStatus, SearchSpace,
    SearchStatistics, TerminationCondition,
};
use tracing::debug;

/// Which estimate orders the open list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GreedyOrdering {
    /// Expand the node with the lowest heuristic value first
    Heuristic,
    /// Expand the node with the fewest estimated steps to the goal first
    Distance,
}

/// Greedy best-first search. Nodes are ordered on their estimate, ties are
/// broken in favour of the lower path cost. Duplicates reached by a cheaper
/// path are moved to that path and reopened unless duplicates are dropped.
#[derive(Debug)]
pub struct Greedy<D: Domain> {
    ordering: GreedyOrdering,
    options: SearchOptions,
    search_space: SearchSpace<D>,
    open_list: OpenList,
}

impl<D: Domain> Greedy<D> {
    pub fn new(ordering: GreedyOrdering, options: SearchOptions) -> Self {
        Self {
            ordering,
            search_space: SearchSpace::new(options.closed_capacity),
            options,
            open_list: OpenList::new(),
        }
    }

    fn estimate(&self, domain: &D, state: &D::State) -> Cost {
        match self.ordering {
            GreedyOrdering::Heuristic => domain.h(state),
            GreedyOrdering::Distance => domain.d(state),
        }
    }

    fn finish(
        &self,
        outcome: SearchOutcome,
        statistics: SearchStatistics,
        termination_condition: &TerminationCondition,
    ) -> DomainSearchResult<D> {
        statistics.finalise_search();
        termination_condition.finalise();
        SearchResult::failure(outcome, statistics)
    }
}

impl<D: Domain> SearchEngine<D> for Greedy<D> {
    fn search(&mut self, domain: &D, initial_state: &D::State) -> DomainSearchResult<D> {
        let mut statistics = SearchStatistics::new();
        let mut termination_condition = TerminationCondition::from_options(&self.options);
        self.open_list.clear(self.search_space.nodes_mut());
        self.search_space.reset(domain);

        let root_packed = domain.pack(initial_state);
        let root_hash = domain.hash(&root_packed);
        let root_id = self
            .search_space
            .construct(SearchNode::new_root(root_packed, domain.nop()));
        self.search_space.register(domain, root_id, root_hash);
        let root_h = self.estimate(domain, initial_state);
        self.search_space.get_node_mut(root_id).open(root_h);
        statistics.register_heuristic_value(root_h);
        self.open_list.push(self.search_space.nodes_mut(), root_id);

        loop {
            if let Some(outcome) = termination_condition.should_terminate(&statistics) {
                return self.finish(outcome, statistics, &termination_condition);
            }
            let Some(node_id) = self.open_list.pop(self.search_space.nodes_mut()) else {
                break;
            };

            let node = self.search_space.get_node_mut(node_id);
            node.close();
            let g = node.get_g();
            let pop = node.get_pop();
            let mut state = domain.unpack(node.get_packed());

            if domain.is_goal(&state) {
                let plan = self.search_space.extract_plan(domain, node_id);
                statistics.finalise_search();
                termination_condition.finalise();
                return SearchResult::success(plan, statistics);
            }
            statistics.increment_expanded_nodes();

            for op in domain.operators(&state) {
                if op == pop {
                    continue;
                }
                let edge = AppliedEdge::apply(domain, &mut state, op);
                statistics.increment_generated_nodes();

                let child_g = g + edge.cost();
                let child_id = self.search_space.construct(SearchNode::new_with_parent(
                    domain.pack(&edge),
                    node_id,
                    child_g,
                    op,
                    edge.revop(),
                ));
                let child_packed = self.search_space.get_node(child_id).get_packed();
                let child_hash = domain.hash(child_packed);

                match self.search_space.find(child_packed, child_hash) {
                    Some(dup_id) => {
                        statistics.increment_duplicate_nodes();
                        self.search_space.destruct(child_id);
                        let dup = self.search_space.get_node(dup_id);
                        if self.options.drop_duplicates || dup.get_g() <= child_g {
                            continue;
                        }

                        statistics.increment_reopened_nodes();
                        let was_open = self.open_list.mem(self.search_space.nodes_mut(), dup_id);
                        if was_open {
                            self.open_list
                                .pre_update(self.search_space.nodes_mut(), dup_id);
                        }
                        let dup = self.search_space.get_node_mut(dup_id);
                        dup.reparent(node_id, child_g, op, edge.revop());
                        if was_open {
                            self.open_list
                                .post_update(self.search_space.nodes_mut(), dup_id);
                        } else {
                            debug_assert_eq!(dup.get_status(), SearchNodeStatus::Closed);
                            dup.reopen();
                            self.open_list.push(self.search_space.nodes_mut(), dup_id);
                        }
                    }
                    None => {
                        let child_h = self.estimate(domain, &edge);
                        statistics.register_heuristic_value(child_h);
                        self.search_space.get_node_mut(child_id).open(child_h);
                        self.search_space.register(domain, child_id, child_hash);
                        self.open_list.push(self.search_space.nodes_mut(), child_id);
                    }
                }
            }
        }

        debug!(states = self.search_space.len(), "open list exhausted");
        self.finish(
            SearchOutcome::ProvablyUnsolvable,
            statistics,
            &termination_condition,
        )
    }

    fn reset(&mut self) {
        self.open_list.clear(self.search_space.nodes_mut());
        self.search_space = SearchSpace::new(self.options.closed_capacity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::{validate, validate_plan};
    use crate::test_utils::*;

    fn small_options() -> SearchOptions {
        SearchOptions {
            closed_capacity: 64,
            ..SearchOptions::default()
        }
    }

    #[test]
    fn cheaper_duplicate_is_reopened() {
        let domain = reopening_graph();
        let mut engine = Greedy::new(GreedyOrdering::Heuristic, small_options());
        let result = engine.search(&domain, &domain.initial_state());

        assert_eq!(result.outcome, SearchOutcome::Success);
        assert!(result.statistics.reopened_nodes() >= 1);
        let plan = result.plan.unwrap();
        assert_eq!(plan.cost(), Cost::from(3.));
        assert_eq!(
            plan.ops(),
            &[GraphOper::Edge(2), GraphOper::Edge(3), GraphOper::Edge(4)]
        );
        assert_eq!(validate(&domain, plan.ops()), Ok(plan.cost()));
    }

    #[test]
    fn expanded_node_is_reopened() {
        let domain = closed_reopening_graph();
        let mut engine = Greedy::new(GreedyOrdering::Heuristic, small_options());
        let result = engine.search(&domain, &domain.initial_state());

        assert_eq!(result.outcome, SearchOutcome::Success);
        // Node 3 leaves the closed list, node 5 is improved while open
        assert_eq!(result.statistics.reopened_nodes(), 2);
        assert_eq!(result.statistics.expanded_nodes(), 7);
        let plan = result.plan.unwrap();
        assert_eq!(plan.cost(), Cost::from(5.));
        assert_eq!(
            plan.ops(),
            &[
                GraphOper::Edge(2),
                GraphOper::Edge(4),
                GraphOper::Edge(3),
                GraphOper::Edge(5),
                GraphOper::Edge(6)
            ]
        );
        assert_eq!(validate_plan(&domain, &plan), Ok(plan.cost()));
    }

    #[test]
    fn dropped_duplicates_keep_first_path() {
        let domain = reopening_graph();
        let options = SearchOptions {
            drop_duplicates: true,
            ..small_options()
        };
        let mut engine = Greedy::new(GreedyOrdering::Heuristic, options);
        let result = engine.search(&domain, &domain.initial_state());

        assert_eq!(result.outcome, SearchOutcome::Success);
        assert_eq!(result.statistics.reopened_nodes(), 0);
        assert_eq!(result.plan.unwrap().cost(), Cost::from(12.));
    }

    #[test]
    fn goal_root_gives_empty_plan() {
        let domain = diamond_graph();
        let mut engine = Greedy::new(GreedyOrdering::Heuristic, small_options());
        let result = engine.search(&domain, &GraphState { node: 3 });

        assert_eq!(result.outcome, SearchOutcome::Success);
        let plan = result.plan.unwrap();
        assert!(plan.is_empty());
        assert_eq!(plan.cost(), Cost::from(0.));
        assert_eq!(result.statistics.expanded_nodes(), 0);
    }

    #[test]
    fn expansion_limit_stops_search() {
        let domain = ring_graph(40);
        let options = SearchOptions {
            expansion_limit: Some(5),
            ..small_options()
        };
        let mut engine = Greedy::new(GreedyOrdering::Heuristic, options);
        let result = engine.search(&domain, &domain.initial_state());

        assert_eq!(result.outcome, SearchOutcome::ExpansionLimitExceeded);
        assert!(result.plan.is_none());
        assert_eq!(result.statistics.expanded_nodes(), 5);
    }

    #[test]
    fn engine_is_reusable() {
        let domain = reopening_graph();
        let mut engine = Greedy::new(GreedyOrdering::Distance, small_options());
        let first = engine.search(&domain, &domain.initial_state());
        engine.reset();
        let second = engine.search(&domain, &domain.initial_state());

        assert_eq!(
            first.plan.unwrap().ops(),
            second.plan.unwrap().ops()
        );
        assert_eq!(
            first.statistics.expanded_nodes(),
            second.statistics.expanded_nodes()
        );
    }
}
