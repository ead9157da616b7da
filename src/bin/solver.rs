use clap::{Args, Parser, Subcommand};
use heurisearch::{
    domains::{DockRobot, DomainError, TileCosts, Tiles, Traffic},
    parsed_types::{DockRobotInstance, TilesInstance, TrafficInstance},
    parsers::{InstanceError, Parser as _},
    search::{
        search_engines::ConfigError, validate_plan, Domain, SearchEngineName, SearchOptions,
        ValidationError, Verbosity,
    },
};
use std::path::PathBuf;
use std::process::ExitCode;
use thiserror::Error;
use tracing::{error, info};

#[derive(Parser)]
#[command(version)]
/// Solve a planning instance with one of the heuristic search engines.
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[arg(
        value_enum,
        help = "The search engine to use",
        short = 'e',
        long = "engine",
        id = "ENGINE",
        default_value_t = SearchEngineName::Greedy
    )]
    search_engine_name: SearchEngineName,
    #[arg(
        help = "A TOML file with search options, command line options take \
        precedence over it",
        long = "config",
        id = "CONFIG"
    )]
    config: Option<PathBuf>,
    #[command(flatten)]
    overrides: OptionOverrides,
    #[arg(
        value_enum,
        help = "The verbosity level",
        short = 'v',
        long = "verbosity",
        id = "VERBOSITY",
        default_value_t = Verbosity::Normal
    )]
    verbosity: Verbosity,
    #[arg(help = "Whether to use coloured output", short = 'c', long = "colour")]
    colour: bool,
}

#[derive(Args)]
struct OptionOverrides {
    #[arg(help = "Number of buckets of the closed list", long = "closed-capacity")]
    closed_capacity: Option<usize>,
    #[arg(
        help = "Never reopen duplicates in greedy search",
        long = "drop-duplicates"
    )]
    drop_duplicates: bool,
    #[arg(help = "Expansions per LRTA* lookahead", long = "lss-size")]
    lss_size: Option<usize>,
    #[arg(help = "Maximum number of expansions", long = "expansion-limit")]
    expansion_limit: Option<u64>,
    #[arg(help = "Maximum search time in seconds", long = "time-limit")]
    time_limit: Option<f64>,
    #[arg(help = "Maximum memory use in megabytes", long = "memory-limit")]
    memory_limit: Option<usize>,
}

impl OptionOverrides {
    fn apply(&self, options: &mut SearchOptions) {
        if let Some(closed_capacity) = self.closed_capacity {
            options.closed_capacity = closed_capacity;
        }
        if self.drop_duplicates {
            options.drop_duplicates = true;
        }
        if let Some(lss_size) = self.lss_size {
            options.lss_size = lss_size;
        }
        if self.expansion_limit.is_some() {
            options.expansion_limit = self.expansion_limit;
        }
        if self.time_limit.is_some() {
            options.time_limit_secs = self.time_limit;
        }
        if self.memory_limit.is_some() {
            options.memory_limit_mb = self.memory_limit;
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// The sliding tiles puzzle.
    Tiles {
        #[arg(help = "The instance file")]
        instance: PathBuf,
        #[arg(
            value_enum,
            help = "What moving a tile costs",
            long = "costs",
            id = "COSTS",
            default_value_t = TileCosts::Unit
        )]
        costs: TileCosts,
    },
    /// A robot moving boxes between locations with cranes and piles.
    DockRobot {
        #[arg(help = "The instance file")]
        instance: PathBuf,
    },
    /// Crossing a grid with moving obstacles.
    Traffic {
        #[arg(help = "The instance file")]
        instance: PathBuf,
    },
}

#[derive(Debug, Error)]
enum SolverError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Instance(#[from] InstanceError),
    #[error("invalid instance: {0}")]
    Domain(#[from] DomainError),
    #[error("the engine returned an invalid plan: {0}")]
    InvalidPlan(#[from] ValidationError),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let level: tracing::Level = cli.verbosity.into();
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_ansi(cli.colour)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), SolverError> {
    let mut options = match &cli.config {
        Some(path) => SearchOptions::from_path(path)?,
        None => SearchOptions::default(),
    };
    cli.overrides.apply(&mut options);
    options.validate()?;

    let engine = cli.search_engine_name;
    match cli.command {
        Commands::Tiles { instance, costs } => {
            let instance = TilesInstance::from_path(&instance)?;
            solve(&Tiles::new(&instance, costs)?, engine, &options)
        }
        Commands::DockRobot { instance } => {
            let instance = DockRobotInstance::from_path(&instance)?;
            solve(&DockRobot::new(&instance)?, engine, &options)
        }
        Commands::Traffic { instance } => {
            let instance = TrafficInstance::from_path(&instance)?;
            solve(&Traffic::new(&instance)?, engine, &options)
        }
    }
}

fn solve<D: Domain + 'static>(
    domain: &D,
    engine_name: SearchEngineName,
    options: &SearchOptions,
) -> Result<(), SolverError> {
    let mut engine = engine_name.create::<D>(options);
    info!(engine = ?engine_name, "starting search");
    let result = engine.search(domain, &domain.initial_state());

    match &result.plan {
        Some(plan) => {
            info!("validating plan");
            let cost = validate_plan(domain, plan)?;
            info!(cost = cost.into_inner(), "plan is valid");

            println!("Plan found:");
            println!("{}", plan.to_text());
            println!("Plan length: {}", plan.len());
            println!("Plan cost: {}", plan.cost());
        }
        None if result.outcome.is_limit() => {
            info!(outcome = ?result.outcome, "search stopped by a limit");
            println!("No plan found, search stopped early: {:?}", result.outcome);
        }
        None => {
            info!("no plan found");
            println!("No plan found, the instance is unsolvable: {:?}", result.outcome);
        }
    }
    let statistics = &result.statistics;
    println!(
        "Expanded: {}, generated: {}, duplicates: {}, reopened: {}",
        statistics.expanded_nodes(),
        statistics.generated_nodes(),
        statistics.duplicate_nodes(),
        statistics.reopened_nodes()
    );
    Ok(())
}
