mod comments;
mod dock_robot;
mod instance_error;
mod test_helpers;
mod tiles;
mod traffic;
mod utilities;

#[cfg(test)]
pub(crate) use test_helpers::Match;
pub use test_helpers::UnwrapValue;

use nom::combinator::success;
use std::path::Path;

pub trait Parser {
    type Item;

    fn parse<'a, S: Into<Span<'a>>>(input: S) -> ParseResult<'a, Self::Item>;

    /// Parse a string slice into the desired type. Discards any remaining
    /// input.
    fn from_str(input: &str) -> Result<Self::Item, nom::Err<ParseError>> {
        let (_, value) = Self::parse(input)?;
        Ok(value)
    }

    /// Parse a complete instance text. Only whitespace and comments may
    /// follow the parsed item.
    fn from_text(input: &str) -> Result<Self::Item, InstanceError> {
        match Self::parse(input) {
            Ok((remaining, value)) => {
                let remaining = match leading_whitespace(success(()))(remaining) {
                    Ok((rest, ())) => rest,
                    Err(_) => remaining,
                };
                if remaining.fragment().is_empty() {
                    Ok(value)
                } else {
                    Err(InstanceError::TrailingInput {
                        line: remaining.location_line(),
                        column: remaining.get_utf8_column(),
                    })
                }
            }
            Err(nom::Err::Error(error) | nom::Err::Failure(error)) => {
                Err(InstanceError::from_parse_error(&error))
            }
            Err(nom::Err::Incomplete(_)) => Err(InstanceError::UnexpectedEnd),
        }
    }

    /// Read and parse an instance file.
    fn from_path(path: &Path) -> Result<Self::Item, InstanceError> {
        let text = std::fs::read_to_string(path).map_err(|source| InstanceError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_text(&text)
    }
}

pub type Span<'a> = nom_locate::LocatedSpan<&'a str>;

pub type ParseError<'a> = nom_greedyerror::GreedyError<Span<'a>, nom::error::ErrorKind>;

pub type ParseResult<'a, T, E = ParseError<'a>> = nom::IResult<Span<'a>, T, E>;

/// Re-exports commonly used types.
pub mod preamble {
    pub use crate::parsers::test_helpers::UnwrapValue;
    pub use crate::parsers::Parser;
    pub use crate::parsers::{ParseError, ParseResult, Span};
}

pub use comments::ignore_single_line_comment;
pub use dock_robot::parse_dock_robot_instance;
pub use instance_error::InstanceError;
pub use tiles::parse_tiles_instance;
pub use traffic::parse_traffic_instance;

#[allow(unused_imports)]
pub(crate) use utilities::{
    keyed, leading_whitespace, parse_distance, parse_i64, parse_usize, phrase, usize_list1,
};
