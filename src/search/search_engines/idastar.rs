//! Iterative deepening A*. Each iteration is a depth-first search bounded by
//! an f-value threshold; the next threshold is the smallest f-value that
//! exceeded the current one. The search works on a single state buffer that
//! is mutated and reverted in place.

use crate::search::{
    search_engines::{DomainSearchResult, SearchEngine, SearchOptions, SearchOutcome, SearchResult},
    AppliedEdge, Cost, Domain, Plan, SearchStatistics, TerminationCondition, INFINITE_COST,
    ZERO_COST,
};
use tracing::{debug, info};

enum Probe {
    /// A goal was reached within the bound
    Found,
    /// The subtree was exhausted
    Exhausted,
    /// A resource limit was hit
    Aborted(SearchOutcome),
}

#[derive(Debug)]
pub struct IdaStar<D: Domain> {
    options: SearchOptions,
    /// Every bound an iteration was started with, in order
    bounds: Vec<Cost>,
    /// Smallest f-value above the bound seen in the current iteration
    minoob: Cost,
    /// Filled goal first while unwinding from a goal
    ops: Vec<D::Oper>,
    states: Vec<D::State>,
    goal_cost: Cost,
}

impl<D: Domain> IdaStar<D> {
    pub fn new(options: SearchOptions) -> Self {
        Self {
            options,
            bounds: vec![],
            minoob: INFINITE_COST,
            ops: vec![],
            states: vec![],
            goal_cost: ZERO_COST,
        }
    }

    pub fn bounds(&self) -> &[Cost] {
        &self.bounds
    }

    #[allow(clippy::too_many_arguments)]
    fn probe(
        &mut self,
        domain: &D,
        state: &mut D::State,
        g: Cost,
        pop: D::Oper,
        bound: Cost,
        statistics: &mut SearchStatistics,
        termination_condition: &mut TerminationCondition,
    ) -> Probe {
        if let Some(outcome) = termination_condition.should_terminate(statistics) {
            return Probe::Aborted(outcome);
        }

        let f = g + domain.h(state);
        if f > bound {
            self.minoob = self.minoob.min(f);
            return Probe::Exhausted;
        }
        if domain.is_goal(state) {
            self.goal_cost = g;
            self.states.push(state.clone());
            return Probe::Found;
        }

        statistics.increment_expanded_nodes();
        for op in domain.operators(state) {
            if op == pop {
                continue;
            }
            let mut edge = AppliedEdge::apply(domain, state, op);
            statistics.increment_generated_nodes();
            let child_g = g + edge.cost();
            let revop = edge.revop();
            match self.probe(
                domain,
                &mut edge,
                child_g,
                revop,
                bound,
                statistics,
                termination_condition,
            ) {
                Probe::Found => {
                    drop(edge);
                    self.ops.push(op);
                    self.states.push(state.clone());
                    return Probe::Found;
                }
                Probe::Aborted(outcome) => return Probe::Aborted(outcome),
                Probe::Exhausted => {}
            }
        }
        Probe::Exhausted
    }
}

impl<D: Domain> SearchEngine<D> for IdaStar<D> {
    fn search(&mut self, domain: &D, initial_state: &D::State) -> DomainSearchResult<D> {
        self.reset();
        let mut statistics = SearchStatistics::new();
        let mut termination_condition = TerminationCondition::from_options(&self.options);
        let mut state = initial_state.clone();

        let mut bound = domain.h(&state);
        statistics.register_heuristic_value(bound);
        let outcome = loop {
            info!(bound = bound.into_inner(), "starting iteration");
            self.bounds.push(bound);
            self.minoob = INFINITE_COST;
            match self.probe(
                domain,
                &mut state,
                ZERO_COST,
                domain.nop(),
                bound,
                &mut statistics,
                &mut termination_condition,
            ) {
                Probe::Found => break SearchOutcome::Success,
                Probe::Aborted(outcome) => break outcome,
                Probe::Exhausted => {}
            }
            debug!(
                expanded_nodes = statistics.expanded_nodes(),
                minoob = self.minoob.into_inner(),
                "iteration finished"
            );
            if self.minoob == INFINITE_COST {
                break SearchOutcome::ProvablyUnsolvable;
            }
            bound = self.minoob;
        };

        statistics.finalise_search();
        termination_condition.finalise();
        if outcome != SearchOutcome::Success {
            return SearchResult::failure(outcome, statistics);
        }
        let mut ops = std::mem::take(&mut self.ops);
        let mut states = std::mem::take(&mut self.states);
        ops.reverse();
        states.reverse();
        SearchResult::success(Plan::new(ops, states, self.goal_cost), statistics)
    }

    fn reset(&mut self) {
        self.bounds.clear();
        self.minoob = INFINITE_COST;
        self.ops.clear();
        self.states.clear();
        self.goal_cost = ZERO_COST;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::{TileCosts, Tiles};
    use crate::parsed_types::TilesInstance;
    use crate::parsers::Parser;
    use crate::search::validate;
    use crate::test_utils::*;

    fn tiles(text: &str) -> Tiles {
        let instance = TilesInstance::from_text(text).unwrap();
        Tiles::new(&instance, TileCosts::Unit).unwrap()
    }

    #[test]
    fn one_move_puzzle_expands_root_once() {
        let domain = tiles(TILES_ONE_MOVE_TEXT);
        let mut engine = IdaStar::new(SearchOptions::default());
        let result = engine.search(&domain, &domain.initial_state());

        assert_eq!(result.outcome, SearchOutcome::Success);
        assert_eq!(result.statistics.expanded_nodes(), 1);
        let plan = result.plan.unwrap();
        assert_eq!(plan.len(), 1);
        assert_eq!(plan.cost(), Cost::from(1.));
        assert_eq!(plan.states().len(), 2);
        assert!(domain.is_goal(plan.final_state()));
        assert_eq!(engine.bounds(), &[Cost::from(1.)]);
    }

    #[test]
    fn bounds_never_decrease() {
        let domain = tiles(TILES_EASY_TEXT);
        let mut engine = IdaStar::new(SearchOptions::default());
        let initial_state = domain.initial_state();
        let result = engine.search(&domain, &initial_state);

        assert_eq!(result.outcome, SearchOutcome::Success);
        let bounds = engine.bounds();
        assert!(bounds.windows(2).all(|pair| pair[0] < pair[1]));
        assert_eq!(bounds[0], domain.h(&initial_state));

        let plan = result.plan.unwrap();
        assert!(plan.cost() <= *bounds.last().unwrap());
        assert_eq!(validate(&domain, plan.ops()), Ok(plan.cost()));
        assert_eq!(plan.states()[0], initial_state);
    }

    #[test]
    fn expansion_limit_aborts_iteration() {
        let domain = ring_graph(12);
        let options = SearchOptions {
            expansion_limit: Some(7),
            ..SearchOptions::default()
        };
        let mut engine = IdaStar::new(options);
        let result = engine.search(&domain, &domain.initial_state());

        assert_eq!(result.outcome, SearchOutcome::ExpansionLimitExceeded);
        assert!(result.plan.is_none());
        assert_eq!(result.statistics.expanded_nodes(), 7);
    }

    #[test]
    fn finds_cheapest_path_on_weighted_graph() {
        let domain = reopening_graph();
        let mut engine = IdaStar::new(SearchOptions::default());
        let result = engine.search(&domain, &domain.initial_state());

        let plan = result.plan.unwrap();
        assert_eq!(plan.cost(), Cost::from(3.));
        assert_eq!(
            plan.states().iter().map(|s| s.node).collect::<Vec<_>>(),
            vec![0, 2, 3, 4]
        );
    }
}
