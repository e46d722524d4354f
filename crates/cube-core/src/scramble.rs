use crate::engine;
use crate::facelet::FaceletState;
use crate::moves::Move;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Number of quarter turns in a scramble
pub const SCRAMBLE_DEPTH: usize = 12;

/// The quarter turns that produced the current scramble from solved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrambleRecord {
    moves: Vec<Move>,
}

impl ScrambleRecord {
    pub fn new(moves: Vec<Move>) -> Self {
        Self { moves }
    }

    pub fn moves(&self) -> &[Move] {
        &self.moves
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    /// The state immediately after scrambling
    pub fn replay(&self) -> FaceletState {
        engine::apply_all(&FaceletState::solved(), &self.moves)
    }
}

/// Scramble generator
pub struct Scrambler<R: Rng = StdRng> {
    rng: R,
    depth: usize,
}

impl Default for Scrambler<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl Scrambler<StdRng> {
    /// Create a scrambler seeded from the operating system
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// Create a scrambler with a specific seed for reproducibility
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Scrambler<R> {
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng,
            depth: SCRAMBLE_DEPTH,
        }
    }

    /// Draw independent quarter turns uniformly from all twelve
    pub fn generate(&mut self) -> ScrambleRecord {
        let moves = (0..self.depth)
            .filter_map(|_| Move::ALL.choose(&mut self.rng).copied())
            .collect();
        ScrambleRecord::new(moves)
    }
}
