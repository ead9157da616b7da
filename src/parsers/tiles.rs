//! Provides parsers for sliding tiles instances.

use crate::{
    parsed_types::TilesInstance,
    parsers::{parse_usize, phrase, usize_list1, ParseResult, Span},
};
use nom::{
    combinator::map,
    sequence::{preceded, tuple},
};

/// Parses a sliding tiles instance, i.e.
/// `<rows> <cols> starting positions for each tile: <pos>+ goal positions: <pos>+`.
///
/// ## Example
/// ```
/// # use heurisearch::parsers::{parse_tiles_instance, preamble::*};
/// let input = r#"2 2
/// starting positions for each tile:
/// 1 0 2 3
/// goal positions:
/// 0 1 2 3
/// "#;
/// let instance = parse_tiles_instance(input).unwrap_value();
/// assert_eq!(instance.rows(), 2);
/// assert_eq!(instance.initial(), &[1, 0, 2, 3]);
/// ```
pub fn parse_tiles_instance<'a, T: Into<Span<'a>>>(input: T) -> ParseResult<'a, TilesInstance> {
    map(
        tuple((
            parse_usize,
            parse_usize,
            preceded(phrase("starting positions for each tile:"), usize_list1),
            preceded(phrase("goal positions:"), usize_list1),
        )),
        |(rows, cols, initial, goal)| TilesInstance::new(rows, cols, initial, goal),
    )(input.into())
}

impl crate::parsers::Parser for TilesInstance {
    type Item = TilesInstance;

    /// Parses a sliding tiles instance.
    ///
    /// ## See also
    /// See [`parse_tiles_instance`].
    fn parse<'a, S: Into<Span<'a>>>(input: S) -> ParseResult<'a, Self::Item> {
        parse_tiles_instance(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::{InstanceError, Match, Parser};
    use crate::test_utils::*;

    #[test]
    fn parses_with_comments() {
        let input = r#"
        # a 2x3 puzzle
        2 3
        starting positions for each tile:
        0 1 2
        3 4 5   # tile 5 in the corner
        goal positions:
        0 1 2 3 4 5
        "#;
        assert!(parse_tiles_instance(Span::new(input)).is_value(TilesInstance::new(
            2,
            3,
            vec![0, 1, 2, 3, 4, 5],
            vec![0, 1, 2, 3, 4, 5],
        )));
    }

    #[test]
    fn benchmark_instances_parse() {
        let instance = TilesInstance::from_text(TILES_ONE_MOVE_TEXT).unwrap();
        assert_eq!((instance.rows(), instance.cols()), (3, 3));
        assert_eq!(instance.initial().len(), 9);
        assert_eq!(instance.goal().len(), 9);
        assert!(TilesInstance::from_text(TILES_EASY_TEXT).is_ok());
    }

    #[test]
    fn missing_goal_section_is_syntax_error() {
        let input = "3 3\nstarting positions for each tile:\n0 1 2 3 4 5 6 7 8\n";
        assert!(matches!(
            TilesInstance::from_text(input),
            Err(InstanceError::Syntax { .. })
        ));
    }

    #[test]
    fn trailing_garbage_is_reported() {
        let input = "1 2\nstarting positions for each tile:\n0 1\ngoal positions:\n1 0\nextra";
        assert!(matches!(
            TilesInstance::from_text(input),
            Err(InstanceError::TrailingInput { line: 6, column: 1 })
        ));
    }
}
