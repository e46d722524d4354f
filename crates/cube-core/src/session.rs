//! The puzzle session: current state, history, scramble baseline, and the
//! single flag that keeps solving and playback from racing player moves.

use crate::engine;
use crate::facelet::FaceletState;
use crate::history::HistoryLog;
use crate::moves::Move;
use crate::orchestrator::{SolveResult, SolveSnapshot};
use crate::playback::{Playback, PlaybackDelays};
use crate::scramble::{ScrambleRecord, Scrambler};
use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;
use std::time::Instant;

#[derive(Debug, Clone, Default)]
pub struct Session {
    state: FaceletState,
    history: HistoryLog,
    scramble: Option<ScrambleRecord>,
    solving: bool,
    playback: Option<Playback>,
    last_result: Option<SolveResult>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &FaceletState {
        &self.state
    }

    pub fn history(&self) -> &HistoryLog {
        &self.history
    }

    pub fn scramble_record(&self) -> Option<&ScrambleRecord> {
        self.scramble.as_ref()
    }

    pub fn last_result(&self) -> Option<&SolveResult> {
        self.last_result.as_ref()
    }

    pub fn is_solving(&self) -> bool {
        self.solving
    }

    pub fn is_playing_back(&self) -> bool {
        self.playback.is_some()
    }

    /// Player input is locked out while either is running
    pub fn is_busy(&self) -> bool {
        self.solving || self.playback.is_some()
    }

    pub fn playback_progress(&self) -> Option<(usize, usize)> {
        self.playback.as_ref().map(Playback::progress)
    }

    /// Apply and record a player move. Returns false when locked out.
    pub fn turn(&mut self, mv: Move) -> bool {
        if self.is_busy() {
            return false;
        }
        self.state = engine::apply(&self.state, mv);
        self.history.record(mv);
        true
    }

    /// Apply and record one uniformly drawn quarter turn
    pub fn random_turn<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<Move> {
        if self.is_busy() {
            return None;
        }
        let mv = *Move::ALL.choose(rng)?;
        self.turn(mv);
        self.last_result = None;
        Some(mv)
    }

    /// Take back the last recorded move. Returns the compensating move applied.
    pub fn undo(&mut self) -> Option<Move> {
        if self.is_busy() {
            return None;
        }
        let inverse = self.history.pop()?.inverse();
        self.state = engine::apply(&self.state, inverse);
        Some(inverse)
    }

    /// Scramble from solved. The scramble becomes the new baseline, so
    /// history starts over.
    pub fn scramble<R: Rng>(&mut self, scrambler: &mut Scrambler<R>) -> bool {
        if self.is_busy() {
            return false;
        }
        let record = scrambler.generate();
        debug!("scrambled with {} moves", record.len());
        self.state = record.replay();
        self.history.clear();
        self.scramble = Some(record);
        self.last_result = None;
        true
    }

    /// Back to solved with nothing recorded, stopping any playback. Refused
    /// while a solve is in flight, since its result describes this state.
    pub fn reset(&mut self) -> bool {
        if self.solving {
            return false;
        }
        self.state = FaceletState::solved();
        self.history.clear();
        self.scramble = None;
        self.playback = None;
        self.last_result = None;
        true
    }

    /// Lock the session for a solve and capture what the solve needs.
    /// `None` when a solve or playback is already running.
    pub fn begin_solve(&mut self) -> Option<SolveSnapshot> {
        if self.is_busy() {
            return None;
        }
        self.solving = true;
        self.last_result = None;
        Some(SolveSnapshot {
            state: self.state,
            history: self.history.as_slice().to_vec(),
            scramble: self.scramble.clone(),
        })
    }

    pub fn finish_solve(&mut self, result: SolveResult) {
        self.solving = false;
        self.last_result = Some(result);
    }

    /// Start playing the last solution. Returns false when there is nothing
    /// to play or the session is busy.
    pub fn start_playback(&mut self, delays: PlaybackDelays, now: Instant) -> bool {
        if self.is_busy() {
            return false;
        }
        let Some(solution) = self.last_result.as_ref().and_then(SolveResult::solution) else {
            return false;
        };
        if solution.is_empty() {
            return false;
        }
        self.playback = Some(Playback::new(&solution.turns, delays, now));
        true
    }

    /// Apply every playback move due at `now`, unrecorded. Returns how many
    /// were applied.
    pub fn advance_playback(&mut self, now: Instant) -> usize {
        let Some(playback) = self.playback.as_mut() else {
            return 0;
        };
        let due = playback.due_moves(now);
        let finished = playback.is_finished();

        self.state = engine::apply_all(&self.state, &due);
        if finished {
            debug!("playback finished");
            self.playback = None;
        }
        due.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facelet::Face;
    use crate::orchestrator::{Solution, SolveError};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::time::Duration;

    fn session_with(moves: &[Move]) -> Session {
        let mut session = Session::new();
        for &mv in moves {
            assert!(session.turn(mv));
        }
        session
    }

    #[test]
    fn test_turn_records_history() {
        let session = session_with(&[Move::cw(Face::U), Move::ccw(Face::L)]);
        assert_eq!(session.history().len(), 2);
        assert!(!session.state().is_solved());
    }

    #[test]
    fn test_undo_restores_state_without_recording() {
        let mut session = session_with(&[Move::cw(Face::F)]);
        assert_eq!(session.undo(), Some(Move::ccw(Face::F)));
        assert!(session.state().is_solved());
        assert!(session.history().is_empty());
        assert_eq!(session.undo(), None);
        assert!(session.state().is_solved());
    }

    #[test]
    fn test_scramble_replaces_baseline() {
        let mut session = session_with(&[Move::cw(Face::R)]);
        let mut scrambler = Scrambler::with_seed(8);
        assert!(session.scramble(&mut scrambler));

        let record = session.scramble_record().unwrap().clone();
        assert_eq!(record.len(), 12);
        assert_eq!(*session.state(), record.replay());
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_random_turn_is_recorded() {
        let mut session = Session::new();
        let mut rng = StdRng::seed_from_u64(4);
        let mv = session.random_turn(&mut rng).unwrap();
        assert_eq!(session.history().as_slice(), &[mv]);
    }

    #[test]
    fn test_reset() {
        let mut session = session_with(&[Move::cw(Face::B)]);
        session.scramble(&mut Scrambler::with_seed(1));
        session.turn(Move::cw(Face::D));
        assert!(session.reset());

        assert!(session.state().is_solved());
        assert!(session.history().is_empty());
        assert!(session.scramble_record().is_none());
    }

    #[test]
    fn test_solve_locks_out_moves() {
        let mut session = session_with(&[Move::cw(Face::U)]);
        let snapshot = session.begin_solve().unwrap();
        assert_eq!(snapshot.history, vec![Move::cw(Face::U)]);
        assert_eq!(snapshot.state, *session.state());

        assert!(session.begin_solve().is_none());
        assert!(!session.turn(Move::cw(Face::R)));
        assert_eq!(session.undo(), None);
        assert!(!session.scramble(&mut Scrambler::with_seed(2)));
        assert!(!session.reset());
        assert_eq!(session.history().len(), 1);

        session.finish_solve(SolveResult::Error(SolveError::NoHistoryToBacktrack));
        assert!(!session.is_solving());
        assert!(session.turn(Move::cw(Face::R)));
    }

    #[test]
    fn test_playback_applies_solution_unrecorded() {
        let mut session = session_with(&[Move::cw(Face::U), Move::cw(Face::R)]);
        let snapshot = session.begin_solve().unwrap();
        let solution = Solution::reversal(&crate::moves::invert_sequence(&snapshot.history));
        session.finish_solve(SolveResult::Fallback(solution));

        let start = Instant::now();
        assert!(session.start_playback(PlaybackDelays::default(), start));
        assert!(!session.turn(Move::cw(Face::F)));
        assert!(!session.start_playback(PlaybackDelays::default(), start));

        assert_eq!(session.advance_playback(start), 1);
        assert!(session.is_playing_back());
        assert_eq!(session.advance_playback(start + Duration::from_secs(1)), 1);
        assert!(!session.is_playing_back());

        assert!(session.state().is_solved());
        assert_eq!(session.history().len(), 2);
    }

    #[test]
    fn test_reset_stops_playback() {
        let mut session = session_with(&[Move::cw(Face::L)]);
        session.begin_solve();
        session.finish_solve(SolveResult::Fallback(Solution::reversal(&[Move::ccw(Face::L)])));
        assert!(session.start_playback(PlaybackDelays::default(), Instant::now()));

        assert!(session.reset());
        assert!(!session.is_playing_back());
        assert!(session.last_result().is_none());
    }

    #[test]
    fn test_nothing_to_play() {
        let mut session = Session::new();
        assert!(!session.start_playback(PlaybackDelays::default(), Instant::now()));

        session.begin_solve();
        session.finish_solve(SolveResult::already_solved());
        assert!(!session.start_playback(PlaybackDelays::default(), Instant::now()));
        assert_eq!(session.advance_playback(Instant::now()), 0);
    }
}
