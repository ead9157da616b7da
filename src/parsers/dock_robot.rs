//! Provides parsers for dock robot instances.

use crate::{
    parsed_types::{CraneSpec, DockRobotInstance, GoalSpec, LocationSpec, PileSpec, RobotSpec},
    parsers::{keyed, parse_distance, parse_usize, usize_list1, ParseResult, Span},
};
use nom::{
    branch::alt,
    combinator::{map, opt},
    multi::{count, many0},
    sequence::{pair, tuple},
};

fn parse_location(input: Span) -> ParseResult<LocationSpec> {
    map(
        tuple((
            keyed("location", parse_usize),
            keyed("cranes", parse_usize),
            keyed("piles", parse_usize),
        )),
        |(index, cranes, piles)| LocationSpec {
            index,
            cranes,
            piles,
        },
    )(input)
}

enum Placement {
    Crane(CraneSpec),
    Pile(PileSpec),
}

fn parse_placement(input: Span) -> ParseResult<Placement> {
    alt((
        map(
            keyed("crane", pair(parse_usize, parse_usize)),
            |(location, box_id)| Placement::Crane(CraneSpec { location, box_id }),
        ),
        map(
            keyed("pile", pair(parse_usize, usize_list1)),
            |(location, boxes)| Placement::Pile(PileSpec { location, boxes }),
        ),
    ))(input)
}

fn parse_robot(input: Span) -> ParseResult<RobotSpec> {
    map(
        keyed("robot", pair(parse_usize, opt(parse_usize))),
        |(location, cargo)| RobotSpec { location, cargo },
    )(input)
}

fn parse_goal(input: Span) -> ParseResult<GoalSpec> {
    map(
        keyed("goal", pair(parse_usize, parse_usize)),
        |(box_id, location)| GoalSpec { box_id, location },
    )(input)
}

/// Parses a dock robot instance. The sections come in a fixed order:
/// locations, robots, per-location crane and pile counts, the adjacency
/// matrix, boxes with their initial placement, the robot and the goals.
pub fn parse_dock_robot_instance<'a, T: Into<Span<'a>>>(
    input: T,
) -> ParseResult<'a, DockRobotInstance> {
    let input = input.into();
    let (input, num_locations) = keyed("locations", parse_usize)(input)?;
    let (input, num_robots) = keyed("robots", parse_usize)(input)?;
    let (input, locations) = many0(parse_location)(input)?;
    let (input, adjacency) = keyed(
        "adjacency",
        count(parse_distance, num_locations * num_locations),
    )(input)?;
    let (input, num_boxes) = keyed("boxes", parse_usize)(input)?;
    let (input, placements) = many0(parse_placement)(input)?;
    let (input, robot) = opt(parse_robot)(input)?;
    let (input, goals) = many0(parse_goal)(input)?;

    let mut cranes = vec![];
    let mut piles = vec![];
    for placement in placements {
        match placement {
            Placement::Crane(crane) => cranes.push(crane),
            Placement::Pile(pile) => piles.push(pile),
        }
    }
    Ok((
        input,
        DockRobotInstance {
            num_locations,
            num_robots,
            locations,
            adjacency,
            num_boxes,
            cranes,
            piles,
            robot,
            goals,
        },
    ))
}

impl crate::parsers::Parser for DockRobotInstance {
    type Item = DockRobotInstance;

    /// Parses a dock robot instance.
    ///
    /// ## See also
    /// See [`parse_dock_robot_instance`].
    fn parse<'a, S: Into<Span<'a>>>(input: S) -> ParseResult<'a, Self::Item> {
        parse_dock_robot_instance(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::{InstanceError, Match, Parser};
    use crate::test_utils::*;

    #[test]
    fn location_line_works() {
        assert!(
            parse_location(Span::new("location 1 cranes 2 piles 3")).is_exactly(LocationSpec {
                index: 1,
                cranes: 2,
                piles: 3
            })
        );
    }

    #[test]
    fn robot_cargo_is_optional() {
        assert!(parse_robot(Span::new("robot 2")).is_exactly(RobotSpec {
            location: 2,
            cargo: None
        }));
        assert!(parse_robot(Span::new("robot 2 7")).is_exactly(RobotSpec {
            location: 2,
            cargo: Some(7)
        }));
    }

    #[test]
    fn one_box_instance_parses() {
        let instance = DockRobotInstance::from_text(DOCK_ROBOT_ONE_BOX_TEXT).unwrap();
        assert_eq!(instance.num_locations, 2);
        assert_eq!(instance.num_robots, 1);
        assert_eq!(instance.locations.len(), 2);
        assert_eq!(instance.adjacency.len(), 4);
        assert_eq!(instance.num_boxes, 1);
        assert_eq!(
            instance.cranes,
            vec![CraneSpec {
                location: 0,
                box_id: 0
            }]
        );
        assert!(instance.piles.is_empty());
        assert_eq!(
            instance.goals,
            vec![GoalSpec {
                box_id: 0,
                location: 1
            }]
        );
    }

    #[test]
    fn piles_and_infinite_distances_parse() {
        let input = r#"
        locations 2
        robots 1
        location 0 cranes 1 piles 2
        location 1 cranes 1 piles 1
        adjacency
        0 inf
        1.5 0
        boxes 3
        pile 0 2 0   # box 2 at the bottom
        pile 1 1
        robot 1
        goal 0 1
        "#;
        let instance = DockRobotInstance::from_text(input).unwrap();
        assert_eq!(instance.adjacency, vec![0., f64::INFINITY, 1.5, 0.]);
        assert_eq!(
            instance.piles,
            vec![
                PileSpec {
                    location: 0,
                    boxes: vec![2, 0]
                },
                PileSpec {
                    location: 1,
                    boxes: vec![1]
                }
            ]
        );
        assert_eq!(
            instance.robot,
            Some(RobotSpec {
                location: 1,
                cargo: None
            })
        );
    }

    #[test]
    fn short_adjacency_is_syntax_error() {
        let input = "locations 2 robots 1 adjacency 0 1 1 boxes 0";
        assert!(matches!(
            DockRobotInstance::from_text(input),
            Err(InstanceError::Syntax { .. })
        ));
    }
}
