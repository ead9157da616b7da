use crate::parsers::ParseError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InstanceError {
    #[error("failed to read instance file {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("syntax error at line {line}, column {column}")]
    Syntax { line: u32, column: usize },
    #[error("unexpected input at line {line}, column {column}")]
    TrailingInput { line: u32, column: usize },
    #[error("unexpected end of input")]
    UnexpectedEnd,
}

impl InstanceError {
    /// Locates a parse error at the furthest point any alternative reached,
    /// which is usually where the text stops making sense.
    pub fn from_parse_error(error: &ParseError) -> Self {
        match error
            .errors
            .iter()
            .map(|(span, _)| span)
            .max_by_key(|span| span.location_offset())
        {
            Some(span) => InstanceError::Syntax {
                line: span.location_line(),
                column: span.get_utf8_column(),
            },
            None => InstanceError::UnexpectedEnd,
        }
    }
}
