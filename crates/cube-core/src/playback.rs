//! Timed replay of a solution, one quarter turn at a time.

use crate::moves::{Move, Turn};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Pauses between animated quarter turns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackDelays {
    /// Before each token
    pub move_delay: Duration,
    /// Between the two halves of a double turn
    pub double_delay: Duration,
}

impl Default for PlaybackDelays {
    fn default() -> Self {
        Self {
            move_delay: Duration::from_millis(550),
            double_delay: Duration::from_millis(200),
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Step {
    mv: Move,
    /// Wait after the previous step before this one is due
    delay: Duration,
}

/// A solution being played back against a clock supplied by the caller
#[derive(Debug, Clone)]
pub struct Playback {
    steps: VecDeque<Step>,
    next_due: Instant,
    total: usize,
}

impl Playback {
    /// Schedule `turns` with the first quarter turn due at `now`
    pub fn new(turns: &[Turn], delays: PlaybackDelays, now: Instant) -> Self {
        let mut steps = VecDeque::new();
        for turn in turns {
            for (half, mv) in turn.quarter_turns().into_iter().enumerate() {
                let delay = if half == 0 {
                    delays.move_delay
                } else {
                    delays.double_delay
                };
                steps.push_back(Step { mv, delay });
            }
        }

        Self {
            total: steps.len(),
            steps,
            next_due: now,
        }
    }

    /// Pop every quarter turn due at `now`, in order
    pub fn due_moves(&mut self, now: Instant) -> Vec<Move> {
        let mut due = Vec::new();
        while now >= self.next_due {
            let Some(step) = self.steps.pop_front() else {
                break;
            };
            due.push(step.mv);
            if let Some(next) = self.steps.front() {
                self.next_due += next.delay;
            }
        }
        due
    }

    pub fn is_finished(&self) -> bool {
        self.steps.is_empty()
    }

    /// (applied, total) quarter turns
    pub fn progress(&self) -> (usize, usize) {
        (self.total - self.steps.len(), self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facelet::Face;
    use crate::moves::parse_sequence;

    #[test]
    fn test_first_move_is_immediate() {
        let turns = parse_sequence("R U").unwrap();
        let start = Instant::now();
        let mut playback = Playback::new(&turns, PlaybackDelays::default(), start);

        assert_eq!(playback.due_moves(start), vec![Move::cw(Face::R)]);
        assert!(playback.due_moves(start + Duration::from_millis(549)).is_empty());
        assert_eq!(
            playback.due_moves(start + Duration::from_millis(550)),
            vec![Move::cw(Face::U)]
        );
        assert!(playback.is_finished());
    }

    #[test]
    fn test_double_uses_short_delay() {
        let turns = parse_sequence("F2 D'").unwrap();
        let start = Instant::now();
        let mut playback = Playback::new(&turns, PlaybackDelays::default(), start);
        assert_eq!(playback.progress(), (0, 3));

        assert_eq!(playback.due_moves(start), vec![Move::cw(Face::F)]);
        assert_eq!(
            playback.due_moves(start + Duration::from_millis(200)),
            vec![Move::cw(Face::F)]
        );
        assert!(playback.due_moves(start + Duration::from_millis(700)).is_empty());
        assert_eq!(
            playback.due_moves(start + Duration::from_millis(750)),
            vec![Move::ccw(Face::D)]
        );
        assert_eq!(playback.progress(), (3, 3));
    }

    #[test]
    fn test_late_tick_catches_up() {
        let turns = parse_sequence("U R F").unwrap();
        let start = Instant::now();
        let mut playback = Playback::new(&turns, PlaybackDelays::default(), start);
        let due = playback.due_moves(start + Duration::from_secs(5));
        assert_eq!(due.len(), 3);
        assert!(playback.is_finished());
    }

    #[test]
    fn test_empty_solution() {
        let mut playback = Playback::new(&[], PlaybackDelays::default(), Instant::now());
        assert!(playback.is_finished());
        assert!(playback.due_moves(Instant::now()).is_empty());
    }
}
