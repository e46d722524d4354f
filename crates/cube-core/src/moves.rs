//! Move notation.
//!
//! A [`Move`] is the engine primitive: one face turned a quarter in either
//! direction. A [`Turn`] is a token as written by the search service, which
//! may also be a double turn (`R2`) that only exists at the notation level.

use crate::facelet::Face;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Turn direction of a quarter turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Clockwise,
    CounterClockwise,
}

impl Direction {
    pub fn reversed(self) -> Self {
        match self {
            Direction::Clockwise => Direction::CounterClockwise,
            Direction::CounterClockwise => Direction::Clockwise,
        }
    }
}

/// A quarter turn of one face
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    pub face: Face,
    pub direction: Direction,
}

impl Move {
    /// The twelve quarter turns, clockwise then counter-clockwise per face
    pub const ALL: [Move; 12] = [
        Move::cw(Face::U),
        Move::ccw(Face::U),
        Move::cw(Face::L),
        Move::ccw(Face::L),
        Move::cw(Face::F),
        Move::ccw(Face::F),
        Move::cw(Face::R),
        Move::ccw(Face::R),
        Move::cw(Face::B),
        Move::ccw(Face::B),
        Move::cw(Face::D),
        Move::ccw(Face::D),
    ];

    pub const fn cw(face: Face) -> Self {
        Self {
            face,
            direction: Direction::Clockwise,
        }
    }

    pub const fn ccw(face: Face) -> Self {
        Self {
            face,
            direction: Direction::CounterClockwise,
        }
    }

    /// The move that undoes this one
    pub fn inverse(self) -> Self {
        Self {
            face: self.face,
            direction: self.direction.reversed(),
        }
    }

    /// Position of this move in [`Move::ALL`]
    pub fn index(self) -> usize {
        self.face.index() * 2
            + match self.direction {
                Direction::Clockwise => 0,
                Direction::CounterClockwise => 1,
            }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.direction {
            Direction::Clockwise => write!(f, "{}", self.face),
            Direction::CounterClockwise => write!(f, "{}'", self.face),
        }
    }
}

/// Error for a token that is not valid move notation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unrecognized move token `{0}`")]
pub struct ParseMoveError(pub String);

impl FromStr for Move {
    type Err = ParseMoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.parse::<Turn>()? {
            Turn::Quarter(mv) => Ok(mv),
            Turn::Double(_) => Err(ParseMoveError(s.to_string())),
        }
    }
}

/// A notation token: a quarter turn or a double turn of one face
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Turn {
    Quarter(Move),
    Double(Face),
}

impl Turn {
    /// The quarter turns this token stands for
    pub fn quarter_turns(self) -> Vec<Move> {
        match self {
            Turn::Quarter(mv) => vec![mv],
            Turn::Double(face) => vec![Move::cw(face), Move::cw(face)],
        }
    }

    pub fn quarter_count(self) -> usize {
        match self {
            Turn::Quarter(_) => 1,
            Turn::Double(_) => 2,
        }
    }
}

impl From<Move> for Turn {
    fn from(mv: Move) -> Self {
        Turn::Quarter(mv)
    }
}

impl fmt::Display for Turn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Turn::Quarter(mv) => write!(f, "{}", mv),
            Turn::Double(face) => write!(f, "{}2", face),
        }
    }
}

impl FromStr for Turn {
    type Err = ParseMoveError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseMoveError(s.to_string());
        let mut chars = s.chars();
        let face = chars.next().and_then(Face::from_letter).ok_or_else(err)?;
        let turn = match chars.as_str() {
            "" => Turn::Quarter(Move::cw(face)),
            "'" => Turn::Quarter(Move::ccw(face)),
            "2" => Turn::Double(face),
            _ => return Err(err()),
        };
        Ok(turn)
    }
}

/// Parse a whitespace-separated token sequence such as `"R U' F2"`
pub fn parse_sequence(text: &str) -> Result<Vec<Turn>, ParseMoveError> {
    text.split_whitespace().map(str::parse).collect()
}

/// Expand tokens into the quarter turns they stand for
pub fn expand_turns(turns: &[Turn]) -> Vec<Move> {
    turns.iter().flat_map(|t| t.quarter_turns()).collect()
}

/// Inverse of a sequence: each move inverted, in reverse order
pub fn invert_sequence(moves: &[Move]) -> Vec<Move> {
    moves.iter().rev().map(|mv| mv.inverse()).collect()
}

/// Render tokens back into service notation
pub fn format_sequence<T: fmt::Display>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_quarter_turns() {
        assert_eq!("U".parse::<Move>(), Ok(Move::cw(Face::U)));
        assert_eq!("B'".parse::<Move>(), Ok(Move::ccw(Face::B)));
        assert!("R2".parse::<Move>().is_err());
        assert!("X".parse::<Move>().is_err());
        assert!("U''".parse::<Move>().is_err());
        assert!("".parse::<Move>().is_err());
    }

    #[test]
    fn test_parse_sequence_with_doubles() {
        let turns = parse_sequence("  F R2  D' ").unwrap();
        assert_eq!(
            turns,
            vec![
                Turn::Quarter(Move::cw(Face::F)),
                Turn::Double(Face::R),
                Turn::Quarter(Move::ccw(Face::D)),
            ]
        );
        assert_eq!(format_sequence(&turns), "F R2 D'");
        assert_eq!(
            expand_turns(&turns),
            vec![
                Move::cw(Face::F),
                Move::cw(Face::R),
                Move::cw(Face::R),
                Move::ccw(Face::D),
            ]
        );
    }

    #[test]
    fn test_parse_sequence_reports_bad_token() {
        let err = parse_sequence("U R Q'").unwrap_err();
        assert_eq!(err, ParseMoveError("Q'".to_string()));
        assert_eq!(err.to_string(), "unrecognized move token `Q'`");
    }

    #[test]
    fn test_inverse_flips_direction() {
        for mv in Move::ALL {
            assert_ne!(mv.inverse(), mv);
            assert_eq!(mv.inverse().inverse(), mv);
            assert_eq!(mv.inverse().face, mv.face);
        }
    }

    #[test]
    fn test_invert_sequence() {
        let history = [Move::cw(Face::U), Move::cw(Face::R)];
        assert_eq!(
            invert_sequence(&history),
            vec![Move::ccw(Face::R), Move::ccw(Face::U)]
        );
        assert!(invert_sequence(&[]).is_empty());
    }

    #[test]
    fn test_move_index_matches_table() {
        for (i, mv) in Move::ALL.iter().enumerate() {
            assert_eq!(mv.index(), i);
        }
    }
}
