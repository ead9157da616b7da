//! Provides parsers for traffic grid instances.

use crate::{
    parsed_types::{Movement, ObstacleSpec, TrafficInstance},
    parsers::{keyed, leading_whitespace, parse_i64, parse_usize, ParseResult, Span},
};
use nom::{
    branch::alt,
    bytes::complete::{tag, take_while1},
    character::complete::multispace0,
    combinator::{map, value},
    multi::count,
    sequence::{pair, preceded, tuple},
};

fn parse_movement(input: Span) -> ParseResult<Movement> {
    keyed(
        "movement",
        leading_whitespace(alt((
            value(Movement::Four, tag("four")),
            value(Movement::Eight, tag("eight")),
        ))),
    )(input)
}

/// One row of the grid. Rows are not comment aware, `#` marks a blocked
/// cell here.
fn parse_grid_row(input: Span) -> ParseResult<Vec<bool>> {
    map(
        preceded(multispace0, take_while1(|c: char| c == '.' || c == '#')),
        |row: Span| row.fragment().chars().map(|c| c == '#').collect(),
    )(input)
}

fn parse_obstacle(input: Span) -> ParseResult<ObstacleSpec> {
    map(
        tuple((parse_i64, parse_i64, parse_i64, parse_i64)),
        |(x, y, dx, dy)| ObstacleSpec { x, y, dx, dy },
    )(input)
}

/// Parses a traffic instance: dimensions, start, goal, movement model, the
/// grid of static obstacles and the list of moving obstacles.
pub fn parse_traffic_instance<'a, T: Into<Span<'a>>>(input: T) -> ParseResult<'a, TrafficInstance> {
    let input = input.into();
    let (input, width) = keyed("width", parse_usize)(input)?;
    let (input, height) = keyed("height", parse_usize)(input)?;
    let (input, start) = keyed("start", pair(parse_usize, parse_usize))(input)?;
    let (input, goal) = keyed("goal", pair(parse_usize, parse_usize))(input)?;
    let (input, movement) = parse_movement(input)?;
    let (input, grid) =
        preceded(leading_whitespace(tag("grid")), count(parse_grid_row, height))(input)?;
    let (input, num_obstacles) = keyed("obstacles", parse_usize)(input)?;
    let (input, obstacles) = count(parse_obstacle, num_obstacles)(input)?;

    Ok((
        input,
        TrafficInstance {
            width,
            height,
            start,
            goal,
            movement,
            grid,
            obstacles,
        },
    ))
}

impl crate::parsers::Parser for TrafficInstance {
    type Item = TrafficInstance;

    /// Parses a traffic instance.
    ///
    /// ## See also
    /// See [`parse_traffic_instance`].
    fn parse<'a, S: Into<Span<'a>>>(input: S) -> ParseResult<'a, Self::Item> {
        parse_traffic_instance(input)
    }
}
