/// How much the solver reports while it works, mapped onto the maximum
/// [`tracing::Level`] of the subscriber.
#[derive(clap::ValueEnum, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Verbosity {
    /// Only errors
    Silent,
    /// Search progress and final statistics
    #[default]
    Normal,
    /// Also table sizes, bounds and per-iteration details
    Verbose,
    /// Everything
    Debug,
}

impl From<Verbosity> for tracing::Level {
    fn from(value: Verbosity) -> Self {
        match value {
            Verbosity::Silent => tracing::Level::ERROR,
            Verbosity::Normal => tracing::Level::INFO,
            Verbosity::Verbose => tracing::Level::DEBUG,
            Verbosity::Debug => tracing::Level::TRACE,
        }
    }
}
