use crate::search::DEFAULT_CLOSED_CAPACITY;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_LSS_SIZE: usize = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read options file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("malformed options: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("{name} must be at least 1")]
    NotPositive { name: &'static str },
    #[error("time limit must be a positive number of seconds, got {0}")]
    InvalidTimeLimit(f64),
}

/// Options shared by the search engines. Every field has a default, so an
/// options file only needs to name what it changes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchOptions {
    /// Number of buckets of the closed list
    pub closed_capacity: usize,
    /// Discard every duplicate in greedy search, even if it was reached more
    /// cheaply
    pub drop_duplicates: bool,
    /// Number of expansions per LRTA* lookahead
    pub lss_size: usize,
    pub expansion_limit: Option<u64>,
    pub time_limit_secs: Option<f64>,
    pub memory_limit_mb: Option<usize>,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            closed_capacity: DEFAULT_CLOSED_CAPACITY,
            drop_duplicates: false,
            lss_size: DEFAULT_LSS_SIZE,
            expansion_limit: None,
            time_limit_secs: None,
            memory_limit_mb: None,
        }
    }
}

impl SearchOptions {
    pub fn from_toml(text: &str) -> Result<Self, ConfigError> {
        let options: Self = toml::from_str(text)?;
        options.validate()?;
        Ok(options)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.closed_capacity == 0 {
            return Err(ConfigError::NotPositive {
                name: "closed_capacity",
            });
        }
        if self.lss_size == 0 {
            return Err(ConfigError::NotPositive { name: "lss_size" });
        }
        if self.expansion_limit == Some(0) {
            return Err(ConfigError::NotPositive {
                name: "expansion_limit",
            });
        }
        if self.memory_limit_mb == Some(0) {
            return Err(ConfigError::NotPositive {
                name: "memory_limit_mb",
            });
        }
        if let Some(secs) = self.time_limit_secs {
            if !secs.is_finite() || secs <= 0. {
                return Err(ConfigError::InvalidTimeLimit(secs));
            }
        }
        Ok(())
    }

    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit_secs.map(Duration::from_secs_f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn empty_text_gives_defaults() {
        let options = SearchOptions::from_toml("").unwrap();
        assert_eq!(options, SearchOptions::default());
        assert_eq!(options.lss_size, DEFAULT_LSS_SIZE);
        assert_eq!(options.closed_capacity, DEFAULT_CLOSED_CAPACITY);
        assert_eq!(options.time_limit(), None);
    }

    #[test]
    fn fields_are_read() {
        let options = SearchOptions::from_toml(
            r#"
            drop_duplicates = true
            lss_size = 25
            expansion_limit = 1000
            time_limit_secs = 1.5
            "#,
        )
        .unwrap();
        assert!(options.drop_duplicates);
        assert_eq!(options.lss_size, 25);
        assert_eq!(options.expansion_limit, Some(1000));
        assert_eq!(options.time_limit(), Some(Duration::from_millis(1500)));
        assert_eq!(options.memory_limit_mb, None);
    }

    #[test]
    fn unknown_field_rejected() {
        assert!(matches!(
            SearchOptions::from_toml("lookahead = 3"),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn invalid_values_rejected() {
        assert!(matches!(
            SearchOptions::from_toml("lss_size = 0"),
            Err(ConfigError::NotPositive { name: "lss_size" })
        ));
        assert!(matches!(
            SearchOptions::from_toml("time_limit_secs = -2.0"),
            Err(ConfigError::InvalidTimeLimit(_))
        ));
    }

    #[test]
    fn from_path_reads_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "closed_capacity = 1024").unwrap();
        let options = SearchOptions::from_path(file.path()).unwrap();
        assert_eq!(options.closed_capacity, 1024);
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.toml");
        assert!(matches!(
            SearchOptions::from_path(&path),
            Err(ConfigError::Io { .. })
        ));
    }
}
