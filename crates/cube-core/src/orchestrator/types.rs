use crate::client::Metrics;
use crate::facelet::FaceletState;
use crate::moves::{expand_turns, format_sequence, Move, Turn};
use crate::scramble::ScrambleRecord;
use std::fmt;
use thiserror::Error;

/// Everything a solve needs, captured when it starts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolveSnapshot {
    pub state: FaceletState,
    pub history: Vec<Move>,
    pub scramble: Option<ScrambleRecord>,
}

/// Solve progress as reported to observers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Searching from the current state
    Attempt1,
    /// Searching from a rewound state
    BacktrackAttempt2,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Attempt1 => write!(f, "solving"),
            Phase::BacktrackAttempt2 => write!(f, "backtracking"),
        }
    }
}

/// A move sequence that solves the snapshot state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    pub turns: Vec<Turn>,
    pub metrics: Option<Metrics>,
}

impl Solution {
    pub fn new(turns: Vec<Turn>, metrics: Metrics) -> Self {
        Self {
            turns,
            metrics: Some(metrics),
        }
    }

    /// Solution obtained by undoing recorded moves
    pub fn reversal(moves: &[Move]) -> Self {
        Self::new(
            moves.iter().copied().map(Turn::from).collect(),
            Metrics::reversal(moves.len()),
        )
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// The turns with doubles expanded
    pub fn quarter_turns(&self) -> Vec<Move> {
        expand_turns(&self.turns)
    }

    pub fn notation(&self) -> String {
        format_sequence(&self.turns)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SolveError {
    /// The service answered but could not solve
    #[error("{0}")]
    LogicalFailure(String),
    /// The service could not be reached
    #[error("{0}")]
    TransportFailure(String),
    #[error("Solver timeout on initial state (no move history to backtrack).")]
    NoHistoryToBacktrack,
    #[error("Solver timeout even after backtracking to depth ≤ {}{}", .depth, detail_suffix(.detail))]
    BacktrackExhausted {
        depth: usize,
        /// Why the second attempt failed, when it was not a timeout
        detail: Option<String>,
    },
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail
        .as_ref()
        .map(|d| format!(" ({})", d))
        .unwrap_or_default()
}

/// Terminal outcome of a solve
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveResult {
    /// Solved by the search service
    Done(Solution),
    /// Solved by undoing player moves, alone or ahead of a rewound search
    Fallback(Solution),
    Error(SolveError),
}

impl SolveResult {
    /// The puzzle needed no moves
    pub fn already_solved() -> Self {
        SolveResult::Done(Solution {
            turns: Vec::new(),
            metrics: None,
        })
    }

    pub fn solution(&self) -> Option<&Solution> {
        match self {
            SolveResult::Done(solution) | SolveResult::Fallback(solution) => Some(solution),
            SolveResult::Error(_) => None,
        }
    }

    pub fn error(&self) -> Option<&SolveError> {
        match self {
            SolveResult::Error(err) => Some(err),
            _ => None,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, SolveResult::Fallback(_))
    }

    /// Whether there is something to play back
    pub fn is_playable(&self) -> bool {
        self.solution().is_some_and(|s| !s.is_empty())
    }
}

impl fmt::Display for SolveResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveResult::Done(solution) if solution.is_empty() => write!(f, "Already solved"),
            SolveResult::Done(solution) => write!(f, "{}", solution.notation()),
            SolveResult::Fallback(solution) => write!(f, "{} (Fallback)", solution.notation()),
            SolveResult::Error(err) => write!(f, "{}", err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facelet::Face;
    use crate::moves::parse_sequence;

    #[test]
    fn test_result_display() {
        assert_eq!(SolveResult::already_solved().to_string(), "Already solved");

        let turns = parse_sequence("R U2 F'").unwrap();
        let metrics = Metrics::reversal(3);
        let done = SolveResult::Done(Solution::new(turns.clone(), metrics.clone()));
        assert_eq!(done.to_string(), "R U2 F'");

        let fallback = SolveResult::Fallback(Solution::new(turns, metrics));
        assert_eq!(fallback.to_string(), "R U2 F' (Fallback)");
    }

    #[test]
    fn test_reversal_solution() {
        let solution = Solution::reversal(&[Move::ccw(Face::R), Move::ccw(Face::U)]);
        assert_eq!(solution.notation(), "R' U'");
        assert_eq!(solution.metrics, Some(Metrics::reversal(2)));
        let metrics = solution.metrics.unwrap();
        assert_eq!(metrics.time, "0.01");
        assert_eq!(metrics.nodes, "0 (Reversal)");
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            SolveError::NoHistoryToBacktrack.to_string(),
            "Solver timeout on initial state (no move history to backtrack)."
        );
        assert_eq!(
            SolveError::BacktrackExhausted {
                depth: 12,
                detail: None
            }
            .to_string(),
            "Solver timeout even after backtracking to depth ≤ 12"
        );
        assert_eq!(
            SolveError::BacktrackExhausted {
                depth: 12,
                detail: Some("Solution not found".to_string())
            }
            .to_string(),
            "Solver timeout even after backtracking to depth ≤ 12 (Solution not found)"
        );
    }

    #[test]
    fn test_playable() {
        assert!(!SolveResult::already_solved().is_playable());
        assert!(!SolveResult::Error(SolveError::NoHistoryToBacktrack).is_playable());
        assert!(SolveResult::Fallback(Solution::reversal(&[Move::cw(Face::D)])).is_playable());
    }
}
