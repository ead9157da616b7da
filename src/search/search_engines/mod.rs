mod greedy;
mod idastar;
mod lrtastar;
mod search_engine;
mod search_options;

pub use greedy::{Greedy, GreedyOrdering};
pub use idastar::IdaStar;
pub use lrtastar::LrtaStar;
pub use search_engine::{
    DomainSearchResult, SearchEngine, SearchEngineName, SearchOutcome, SearchResult,
};
pub use search_options::{ConfigError, SearchOptions, DEFAULT_LSS_SIZE};
