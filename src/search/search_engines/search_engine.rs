use crate::search::{
    search_engines::{Greedy, GreedyOrdering, IdaStar, LrtaStar, SearchOptions},
    Domain, Plan, SearchStatistics,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchOutcome {
    /// The search found a plan
    Success,
    /// The search exhausted the state space without finding a goal
    ProvablyUnsolvable,
    /// The search engine ran out of expansions
    ExpansionLimitExceeded,
    /// The search engine ran out of time
    TimeLimitExceeded,
    /// The search engine ran out of memory
    MemoryLimitExceeded,
}

impl SearchOutcome {
    /// Whether the search was stopped by a resource limit rather than by
    /// running out of states.
    pub fn is_limit(&self) -> bool {
        matches!(
            self,
            SearchOutcome::ExpansionLimitExceeded
                | SearchOutcome::TimeLimitExceeded
                | SearchOutcome::MemoryLimitExceeded
        )
    }
}

/// What a search hands back: how it ended, the plan if one was found, and
/// the counters collected on the way.
#[derive(Debug)]
pub struct SearchResult<S, O> {
    pub outcome: SearchOutcome,
    pub plan: Option<Plan<S, O>>,
    pub statistics: SearchStatistics,
}

/// Shorthand for the result type of a search on domain `D`.
pub type DomainSearchResult<D> = SearchResult<<D as Domain>::State, <D as Domain>::Oper>;

impl<S, O> SearchResult<S, O> {
    pub fn success(plan: Plan<S, O>, statistics: SearchStatistics) -> Self {
        Self {
            outcome: SearchOutcome::Success,
            plan: Some(plan),
            statistics,
        }
    }

    pub fn failure(outcome: SearchOutcome, statistics: SearchStatistics) -> Self {
        debug_assert_ne!(outcome, SearchOutcome::Success);
        Self {
            outcome,
            plan: None,
            statistics,
        }
    }
}

pub trait SearchEngine<D: Domain> {
    fn search(&mut self, domain: &D, initial_state: &D::State) -> DomainSearchResult<D>;

    /// Drop everything left over from a previous search.
    fn reset(&mut self);
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
#[clap(rename_all = "kebab-case")]
pub enum SearchEngineName {
    /// Greedy best-first search on the heuristic
    Greedy,
    /// Greedy best-first search on the distance estimate
    Speedy,
    #[value(name = "idastar")]
    IdaStar,
    #[value(name = "lrtastar")]
    LrtaStar,
}

impl SearchEngineName {
    pub fn create<D: Domain + 'static>(&self, options: &SearchOptions) -> Box<dyn SearchEngine<D>> {
        match self {
            SearchEngineName::Greedy => {
                Box::new(Greedy::new(GreedyOrdering::Heuristic, options.clone()))
            }
            SearchEngineName::Speedy => {
                Box::new(Greedy::new(GreedyOrdering::Distance, options.clone()))
            }
            SearchEngineName::IdaStar => Box::new(IdaStar::new(options.clone())),
            SearchEngineName::LrtaStar => Box::new(LrtaStar::new(options.clone())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;
    use crate::search::validate_plan;
    use clap::ValueEnum;

    #[test]
    fn limits_are_told_apart_from_exhaustion() {
        assert!(SearchOutcome::ExpansionLimitExceeded.is_limit());
        assert!(SearchOutcome::TimeLimitExceeded.is_limit());
        assert!(SearchOutcome::MemoryLimitExceeded.is_limit());
        assert!(!SearchOutcome::ProvablyUnsolvable.is_limit());
        assert!(!SearchOutcome::Success.is_limit());
    }

    #[test]
    fn engine_names_parse() {
        assert_eq!(
            SearchEngineName::from_str("idastar", false),
            Ok(SearchEngineName::IdaStar)
        );
        assert_eq!(
            SearchEngineName::from_str("lrtastar", false),
            Ok(SearchEngineName::LrtaStar)
        );
        assert_eq!(
            SearchEngineName::from_str("speedy", false),
            Ok(SearchEngineName::Speedy)
        );
    }

    #[test]
    fn every_engine_solves_diamond() {
        let domain = diamond_graph();
        let options = SearchOptions {
            closed_capacity: 64,
            ..SearchOptions::default()
        };
        for name in SearchEngineName::value_variants() {
            let mut engine = name.create::<GraphDomain>(&options);
            let result = engine.search(&domain, &domain.initial_state());
            assert_eq!(result.outcome, SearchOutcome::Success, "{:?}", name);
            let plan = result.plan.unwrap();
            assert!(domain.is_goal(plan.final_state()));
            assert_eq!(
                validate_plan(&domain, &plan),
                Ok(plan.cost()),
                "{:?}",
                name
            );
        }
    }

    #[test]
    fn every_engine_detects_dead_end() {
        let domain = dead_end_graph();
        let options = SearchOptions {
            closed_capacity: 64,
            ..SearchOptions::default()
        };
        for name in SearchEngineName::value_variants() {
            let mut engine = name.create::<GraphDomain>(&options);
            let result = engine.search(&domain, &domain.initial_state());
            assert_eq!(result.outcome, SearchOutcome::ProvablyUnsolvable, "{:?}", name);
            assert!(result.plan.is_none());
        }
    }
}
