use crate::parsers::{ParseResult, Span};
use nom::bytes::complete::is_not;
use nom::character::complete::{char, multispace0};
use nom::combinator::{opt, value};
use nom::sequence::{pair, terminated, tuple};

/// Skips any number of `#` line comments, together with the whitespace that
/// follows each of them.
pub fn ignore_single_line_comment<'a, S: Into<Span<'a>>>(input: S) -> ParseResult<'a, ()> {
    value(
        (),
        opt(terminated(
            pair(char('#'), opt(is_not("\r\n"))),
            tuple((multispace0, opt(ignore_single_line_comment))),
        )),
    )(input.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn just_hash() {
        let (remainder, _comment) = ignore_single_line_comment("#\n").unwrap();
        assert!(remainder.is_empty());
    }

    #[test]
    fn consecutive_comments() {
        let input = "# first\n  # second\n\nlocations 2";
        let (remainder, _comment) = ignore_single_line_comment(input).unwrap();
        assert_eq!(remainder.fragment(), &"locations 2");
    }

    #[test]
    fn no_comment_keeps_text() {
        let (remainder, _comment) = ignore_single_line_comment("width 3").unwrap();
        assert_eq!(remainder.fragment(), &"width 3");
    }
}
