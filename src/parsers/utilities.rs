//! Utility parsers shared by the instance formats.

use crate::parsers::{ignore_single_line_comment, ParseResult, Span};
use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{char, digit0, digit1, i64 as parse_i64_raw, multispace0},
    combinator::{opt, recognize, value},
    error::ErrorKind,
    error_position,
    multi::many1,
    sequence::{pair, preceded},
};

/// A combinator that takes a parser `inner` and produces a parser that also
/// consumes leading whitespace, returning the output of `inner`. This parser
/// also suppresses line comments.
pub fn leading_whitespace<'a, F, O>(inner: F) -> impl FnMut(Span<'a>) -> ParseResult<'a, O>
where
    F: FnMut(Span<'a>) -> ParseResult<'a, O>,
{
    preceded(preceded(multispace0, ignore_single_line_comment), inner)
}

/// Matches the words of `text` one after the other, with any whitespace or
/// comments between them.
pub fn phrase<'a>(text: &'a str) -> impl FnMut(Span<'a>) -> ParseResult<'a, ()> {
    move |mut input: Span<'a>| {
        for word in text.split_whitespace() {
            let (remaining, _) = leading_whitespace(tag(word))(input)?;
            input = remaining;
        }
        Ok((input, ()))
    }
}

/// A keyword followed by one value, e.g. `width 5`.
pub fn keyed<'a, F, O>(key: &'a str, inner: F) -> impl FnMut(Span<'a>) -> ParseResult<'a, O>
where
    F: FnMut(Span<'a>) -> ParseResult<'a, O>,
{
    preceded(leading_whitespace(tag(key)), inner)
}

fn unsigned(input: Span) -> ParseResult<usize> {
    let (remaining, digits) = digit1(input)?;
    match digits.fragment().parse::<usize>() {
        Ok(number) => Ok((remaining, number)),
        Err(_) => Err(nom::Err::Error(error_position!(input, ErrorKind::Digit))),
    }
}

fn decimal(input: Span) -> ParseResult<f64> {
    let (remaining, number) = recognize(pair(digit1, opt(pair(char('.'), digit0))))(input)?;
    match number.fragment().parse::<f64>() {
        Ok(number) => Ok((remaining, number)),
        Err(_) => Err(nom::Err::Error(error_position!(input, ErrorKind::Float))),
    }
}

pub fn parse_usize<'a, T: Into<Span<'a>>>(input: T) -> ParseResult<'a, usize> {
    leading_whitespace(unsigned)(input.into())
}

pub fn parse_i64<'a, T: Into<Span<'a>>>(input: T) -> ParseResult<'a, i64> {
    leading_whitespace(parse_i64_raw)(input.into())
}

/// A non-negative decimal number or `inf`.
pub fn parse_distance<'a, T: Into<Span<'a>>>(input: T) -> ParseResult<'a, f64> {
    leading_whitespace(alt((value(f64::INFINITY, tag("inf")), decimal)))(input.into())
}

/// One or more whitespace separated unsigned integers.
pub fn usize_list1<'a, T: Into<Span<'a>>>(input: T) -> ParseResult<'a, Vec<usize>> {
    many1(parse_usize)(input.into())
}
