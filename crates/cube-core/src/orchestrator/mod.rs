//! Multi-attempt solve protocol.
//!
//! One bounded search from the current state; on timeout, a second search
//! from a rewound state whose answer is prefixed with the moves that rewind
//! to it. Whenever the service cannot help and the player has recorded
//! moves, reversing those moves is the answer of last resort. The
//! orchestrator only computes a [`SolveResult`]; applying it is up to the
//! caller.

mod types;

pub use types::{Phase, Solution, SolveError, SolveResult, SolveSnapshot};

use crate::client::{ClientOutcome, Deadline, Metrics, SolverClient};
use crate::config::SolverConfig;
use crate::engine;
use crate::facelet::FaceletState;
use crate::history::split_excess;
use crate::moves::{invert_sequence, parse_sequence, Move, Turn};
use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Duration;

/// Default wait for each request to the service
pub const REQUEST_BUDGET: Duration = Duration::from_secs(100);
/// Default cap on how many recorded moves a backtrack may rewind
pub const MAX_BACKTRACK_DEPTH: usize = 12;
/// Failure reported when the service answers an unsolved state with no moves
pub const EMPTY_SOLUTION: &str = "Solver returned an empty solution";

/// Result of one bounded request
enum Attempt {
    Solved(Vec<Turn>, Metrics),
    TimedOut,
    Failed(SolveError),
}

/// Where a second attempt starts and how to get there from the current state
struct BacktrackPlan {
    undo: Vec<Move>,
    base_state: FaceletState,
}

pub struct Orchestrator {
    client: Arc<dyn SolverClient>,
    budget: Duration,
    max_backtrack_depth: usize,
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("client", &self.client.name())
            .field("budget", &self.budget)
            .field("max_backtrack_depth", &self.max_backtrack_depth)
            .finish()
    }
}

impl Orchestrator {
    pub fn new(client: Arc<dyn SolverClient>) -> Self {
        Self {
            client,
            budget: REQUEST_BUDGET,
            max_backtrack_depth: MAX_BACKTRACK_DEPTH,
        }
    }

    pub fn from_config(client: Arc<dyn SolverClient>, config: &SolverConfig) -> Self {
        Self {
            client,
            budget: config.request_budget(),
            max_backtrack_depth: config.max_backtrack_depth,
        }
    }

    pub fn with_budget(mut self, budget: Duration) -> Self {
        self.budget = budget;
        self
    }

    pub fn client_name(&self) -> &'static str {
        self.client.name()
    }

    pub fn solve(&self, snapshot: &SolveSnapshot) -> SolveResult {
        self.solve_with_progress(snapshot, |_| {})
    }

    /// Solve, reporting each phase to `progress` as it begins
    pub fn solve_with_progress<F>(&self, snapshot: &SolveSnapshot, mut progress: F) -> SolveResult
    where
        F: FnMut(Phase),
    {
        if snapshot.state.is_solved() {
            info!("already solved, no search needed");
            return SolveResult::already_solved();
        }

        progress(Phase::Attempt1);
        match self.attempt(&snapshot.state, Phase::Attempt1) {
            Attempt::Solved(turns, metrics) => {
                info!("solved by search in {} tokens", turns.len());
                return SolveResult::Done(Solution::new(turns, metrics));
            }
            Attempt::Failed(err) => return reversal_or(snapshot, err),
            Attempt::TimedOut => {}
        }

        let Some(plan) = self.backtrack_plan(snapshot) else {
            warn!("first attempt timed out with no history to rewind");
            return SolveResult::Error(SolveError::NoHistoryToBacktrack);
        };

        progress(Phase::BacktrackAttempt2);
        debug!("backtracking: rewinding {} moves", plan.undo.len());
        let detail = match self.attempt(&plan.base_state, Phase::BacktrackAttempt2) {
            Attempt::Solved(turns, metrics) => return combine(plan.undo, turns, metrics),
            Attempt::TimedOut => None,
            Attempt::Failed(err) => Some(err.to_string()),
        };

        reversal_or(
            snapshot,
            SolveError::BacktrackExhausted {
                depth: self.max_backtrack_depth,
                detail,
            },
        )
    }

    fn attempt(&self, state: &FaceletState, phase: Phase) -> Attempt {
        let deadline = Deadline::after(self.budget);
        debug!("{:?}: asking {} client", phase, self.client.name());

        let outcome = self.client.request(state, deadline);
        if deadline.is_expired() && !outcome.is_timeout() {
            debug!("{:?}: reply arrived after the deadline, discarding", phase);
            return Attempt::TimedOut;
        }

        match outcome {
            ClientOutcome::Success(reply) => match parse_sequence(&reply.solution) {
                Ok(turns) if turns.is_empty() && !state.is_solved() => {
                    warn!("{:?}: service returned no moves for an unsolved state", phase);
                    Attempt::Failed(SolveError::LogicalFailure(EMPTY_SOLUTION.to_string()))
                }
                Ok(turns) => Attempt::Solved(turns, reply.metrics),
                Err(err) => {
                    warn!("{:?}: unusable solution `{}`: {}", phase, reply.solution, err);
                    Attempt::Failed(SolveError::LogicalFailure(err.to_string()))
                }
            },
            ClientOutcome::Timeout => {
                info!("{:?}: timed out after {:?}", phase, deadline.elapsed());
                Attempt::TimedOut
            }
            ClientOutcome::LogicalFailure(message) => {
                info!("{:?}: service could not solve: {}", phase, message);
                Attempt::Failed(SolveError::LogicalFailure(message))
            }
            ClientOutcome::TransportFailure(message) => {
                warn!("{:?}: {}", phase, message);
                Attempt::Failed(SolveError::TransportFailure(message))
            }
        }
    }

    /// `None` when there is neither a scramble nor any recorded move.
    ///
    /// With a scramble the base is the post-scramble state and every recorded
    /// move is undone. Without one, only moves past the depth cap are undone
    /// and the base is the kept prefix replayed from solved. When the history
    /// fits within the cap nothing is undone and the base is the state that
    /// just timed out.
    fn backtrack_plan(&self, snapshot: &SolveSnapshot) -> Option<BacktrackPlan> {
        if let Some(scramble) = snapshot.scramble.as_ref().filter(|s| !s.is_empty()) {
            return Some(BacktrackPlan {
                undo: invert_sequence(&snapshot.history),
                base_state: scramble.replay(),
            });
        }

        if snapshot.history.is_empty() {
            return None;
        }

        let (kept, excess) = split_excess(&snapshot.history, self.max_backtrack_depth);
        Some(BacktrackPlan {
            undo: invert_sequence(excess),
            base_state: engine::apply_all(&FaceletState::solved(), kept),
        })
    }
}

/// Reverse the recorded history if there is any, otherwise report `err`
fn reversal_or(snapshot: &SolveSnapshot, err: SolveError) -> SolveResult {
    if snapshot.history.is_empty() {
        warn!("solve failed: {}", err);
        return SolveResult::Error(err);
    }

    info!(
        "falling back to reversing {} recorded moves ({})",
        snapshot.history.len(),
        err
    );
    SolveResult::Fallback(Solution::reversal(&invert_sequence(&snapshot.history)))
}

/// Undo moves followed by the search answer from the rewound state
fn combine(undo: Vec<Move>, turns: Vec<Turn>, metrics: Metrics) -> SolveResult {
    let mut combined: Vec<Turn> = undo.into_iter().map(Turn::from).collect();
    combined.extend(turns);

    let depth = combined.iter().map(|t| t.quarter_count()).sum();
    info!("solved after backtracking, {} quarter turns", depth);
    SolveResult::Fallback(Solution::new(combined, Metrics { depth, ..metrics }))
}
