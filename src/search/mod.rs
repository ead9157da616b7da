mod closed_list;
mod domain;
mod edge;
mod node_pool;
mod open_list;
mod plan;
pub mod search_engines;
mod search_node;
mod search_space;
mod search_statistics;
mod termination_condition;
mod validate;
mod verbosity;

pub use closed_list::{ClosedList, ClosedNode, DEFAULT_CLOSED_CAPACITY};
pub use domain::{Cost, Domain, DomainEdge, Edge, Operators, INFINITE_COST, ZERO_COST};
pub use edge::AppliedEdge;
pub use node_pool::{NodeId, NodePool, NO_NODE};
pub use open_list::{OpenList, OpenNode};
pub use plan::Plan;
pub use search_engines::{SearchEngine, SearchEngineName, SearchOptions, SearchOutcome};
pub use search_node::{SearchNode, SearchNodeStatus};
pub use search_space::SearchSpace;
pub use search_statistics::SearchStatistics;
pub use termination_condition::TerminationCondition;
pub use validate::{validate, validate_plan, ValidationError};
pub use verbosity::Verbosity;
