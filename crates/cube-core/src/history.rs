use crate::moves::Move;
use serde::{Deserialize, Serialize};

/// Ordered record of the quarter turns a player applied.
///
/// Replayed moves (undo compensation, playback, fallback execution) never
/// enter the log; callers only `record` moves that came from the player.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryLog {
    moves: Vec<Move>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, mv: Move) {
        self.moves.push(mv);
    }

    /// Remove and return the most recent move
    pub fn pop(&mut self) -> Option<Move> {
        self.moves.pop()
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn clear(&mut self) {
        self.moves.clear();
    }

    pub fn as_slice(&self) -> &[Move] {
        &self.moves
    }

}

impl From<Vec<Move>> for HistoryLog {
    fn from(moves: Vec<Move>) -> Self {
        Self { moves }
    }
}

/// `(kept, excess)` where `excess` holds everything past the first `max_depth` moves
pub fn split_excess(moves: &[Move], max_depth: usize) -> (&[Move], &[Move]) {
    let excess = moves.len().saturating_sub(max_depth);
    moves.split_at(moves.len() - excess)
}
