//! Narratable direction kinds and turn classification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper bounds (exclusive, degrees of absolute heading change) of each turn class.
pub const STRAIGHT_LIMIT: f64 = 20.0;
pub const SLIGHT_LIMIT: f64 = 45.0;
pub const TURN_LIMIT: f64 = 100.0;
pub const SHARP_LIMIT: f64 = 160.0;

/// Kind of a navigation instruction, indexing the direction table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    Origin,
    Start,
    Left,
    Right,
    SlightLeft,
    SlightRight,
    SharpLeft,
    SharpRight,
    UTurn,
    Straight,
    Reroute,
    Rain,
    Temperature,
    End,
}

impl Direction {
    /// Symbolic icon name for front ends.
    pub fn icon(self) -> &'static str {
        match self {
            Direction::Origin => "my-location",
            Direction::Start => "explore",
            Direction::Left => "turn-left",
            Direction::Right => "turn-right",
            Direction::SlightLeft => "turn-slight-left",
            Direction::SlightRight => "turn-slight-right",
            Direction::SharpLeft => "rotate-left",
            Direction::SharpRight => "rotate-right",
            Direction::UTurn => "u-turn-right",
            Direction::Straight => "arrow-upward",
            Direction::Reroute => "auto-awesome",
            Direction::Rain => "umbrella",
            Direction::Temperature => "cloud",
            Direction::End => "place",
        }
    }

    /// English narration prefix; the instruction value is appended after it.
    pub fn output(self) -> &'static str {
        match self {
            Direction::Origin => "starting from",
            Direction::Start => "going to",
            Direction::Left => "please, turn to the left",
            Direction::Right => "please, turn to the right",
            Direction::SlightLeft => "turn slightly to the left",
            Direction::SlightRight => "turn slightly to the right",
            Direction::SharpLeft => "make a sharp left turn",
            Direction::SharpRight => "make a sharp right turn",
            Direction::UTurn => "please, make a u-turn",
            Direction::Straight => "go straight",
            Direction::Reroute => "hold up, rerouting quickly",
            Direction::Rain => "rain chance of",
            Direction::Temperature => "current temperature",
            Direction::End => "you have arrived to",
        }
    }

    pub fn is_turn(self) -> bool {
        matches!(
            self,
            Direction::Left
                | Direction::Right
                | Direction::SlightLeft
                | Direction::SlightRight
                | Direction::SharpLeft
                | Direction::SharpRight
                | Direction::UTurn
        )
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let id = match self {
            Direction::Origin => "origin",
            Direction::Start => "start",
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::SlightLeft => "slight-left",
            Direction::SlightRight => "slight-right",
            Direction::SharpLeft => "sharp-left",
            Direction::SharpRight => "sharp-right",
            Direction::UTurn => "u-turn",
            Direction::Straight => "straight",
            Direction::Reroute => "reroute",
            Direction::Rain => "rain",
            Direction::Temperature => "temperature",
            Direction::End => "end",
        };
        f.write_str(id)
    }
}

/// Classify a signed heading change (positive = clockwise) into a direction.
///
/// Only the magnitude picks the class; the sign picks the side.
pub fn classify_turn(delta: f64) -> Direction {
    let magnitude = delta.abs();
    let right = delta > 0.0;
    let pick = |left, right_dir| if right { right_dir } else { left };

    if magnitude < STRAIGHT_LIMIT {
        Direction::Straight
    } else if magnitude < SLIGHT_LIMIT {
        pick(Direction::SlightLeft, Direction::SlightRight)
    } else if magnitude < TURN_LIMIT {
        pick(Direction::Left, Direction::Right)
    } else if magnitude < SHARP_LIMIT {
        pick(Direction::SharpLeft, Direction::SharpRight)
    } else {
        Direction::UTurn
    }
}
