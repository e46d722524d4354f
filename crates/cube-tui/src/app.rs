use crate::theme::Theme;
use crossbeam_channel::{unbounded, Receiver, Sender};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use cube_core::{Face, Move, Orchestrator, Phase, PlaybackDelays, Scrambler, Session, SolveResult};
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

/// Result of handling a key press
pub enum AppAction {
    Continue,
    Quit,
}

/// Messages from the solve worker
pub enum SolveEvent {
    Progress(Phase),
    Finished(SolveResult),
}

/// The main application state
pub struct App {
    /// Puzzle state, history and solve lock
    pub session: Session,
    /// Color theme
    pub theme: Theme,
    /// Message to display
    pub message: Option<String>,
    /// Message timer
    message_timer: u32,
    /// Phase of the running solve, if any
    pub phase: Option<Phase>,
    orchestrator: Arc<Orchestrator>,
    delays: PlaybackDelays,
    scrambler: Scrambler,
    rng: StdRng,
    events_tx: Sender<SolveEvent>,
    events_rx: Receiver<SolveEvent>,
}

impl App {
    pub fn new(orchestrator: Orchestrator, delays: PlaybackDelays) -> Self {
        Self::build(orchestrator, delays, Scrambler::new(), StdRng::from_entropy())
    }

    /// An app whose scrambles and random moves repeat for a given seed
    pub fn with_seed(orchestrator: Orchestrator, delays: PlaybackDelays, seed: u64) -> Self {
        Self::build(
            orchestrator,
            delays,
            Scrambler::with_seed(seed),
            StdRng::seed_from_u64(seed),
        )
    }

    fn build(
        orchestrator: Orchestrator,
        delays: PlaybackDelays,
        scrambler: Scrambler,
        rng: StdRng,
    ) -> Self {
        let (events_tx, events_rx) = unbounded();
        Self {
            session: Session::new(),
            theme: Theme::dark(),
            message: None,
            message_timer: 0,
            phase: None,
            orchestrator: Arc::new(orchestrator),
            delays,
            scrambler,
            rng,
            events_tx,
            events_rx,
        }
    }

    pub fn solver_name(&self) -> &'static str {
        self.orchestrator.client_name()
    }

    /// Faster ticks while a solution is animating
    pub fn get_tick_rate(&self) -> Duration {
        if self.session.is_playing_back() {
            Duration::from_millis(33)
        } else {
            Duration::from_millis(100)
        }
    }

    /// Update timers, solver events and playback (called every tick)
    pub fn tick(&mut self) {
        if self.message_timer > 0 {
            self.message_timer -= 1;
            if self.message_timer == 0 {
                self.message = None;
            }
        }

        self.poll_solver();

        if self.session.is_playing_back() {
            self.session.advance_playback(Instant::now());
            if !self.session.is_playing_back() {
                self.show_message(if self.session.state().is_solved() {
                    "Solved!"
                } else {
                    "Playback finished"
                });
            }
        }
    }

    /// Drain worker events. Returns true once a solve has finished.
    pub fn poll_solver(&mut self) -> bool {
        let mut finished = false;
        while let Ok(event) = self.events_rx.try_recv() {
            finished |= self.apply_event(event);
        }
        finished
    }

    fn apply_event(&mut self, event: SolveEvent) -> bool {
        match event {
            SolveEvent::Progress(phase) => {
                debug!("solve phase: {}", phase);
                self.phase = Some(phase);
                false
            }
            SolveEvent::Finished(result) => {
                info!("solve finished: {}", result);
                self.phase = None;
                let summary = match &result {
                    SolveResult::Done(solution) if solution.is_empty() => "Already solved".to_string(),
                    SolveResult::Done(solution) => {
                        format!("Solved in {} moves, Space to play", solution.turns.len())
                    }
                    SolveResult::Fallback(solution) => format!(
                        "Fallback solution, {} quarter turns, Space to play",
                        solution.quarter_turns().len()
                    ),
                    SolveResult::Error(err) => err.to_string(),
                };
                self.session.finish_solve(result);
                self.show_message(&summary);
                true
            }
        }
    }

    /// Block until the running solve reports its result
    #[cfg(test)]
    pub fn wait_for_solver(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        while self.session.is_solving() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.events_rx.recv_timeout(remaining) {
                Ok(event) => {
                    self.apply_event(event);
                }
                Err(_) => return false,
            }
        }
        true
    }

    /// Show a temporary message
    pub fn show_message(&mut self, msg: &str) {
        self.message = Some(msg.to_string());
        self.message_timer = 30; // ~3 seconds at 100ms poll
    }

    /// Handle a key press
    pub fn handle_key(&mut self, key: KeyEvent) -> AppAction {
        match key.code {
            KeyCode::Char('q') => return AppAction::Quit,

            KeyCode::Char('z') if key.modifiers.contains(KeyModifiers::CONTROL) => self.undo(),
            KeyCode::Backspace => self.undo(),

            KeyCode::Char('s') => self.start_solve(),
            KeyCode::Char('x') => self.scramble(),
            KeyCode::Char('m') => self.random_move(),
            KeyCode::Char(' ') => self.start_playback(),
            KeyCode::Esc => self.reset(),

            KeyCode::Char(c) => {
                if let Some(mv) = Self::move_for_key(c, key.modifiers) {
                    self.turn(mv);
                }
            }
            _ => {}
        }
        AppAction::Continue
    }

    /// `u d l r f b` turn clockwise; uppercase or Shift turns counter-clockwise
    fn move_for_key(c: char, modifiers: KeyModifiers) -> Option<Move> {
        let face = Face::from_letter(c.to_ascii_uppercase())?;
        if c.is_ascii_uppercase() || modifiers.contains(KeyModifiers::SHIFT) {
            Some(Move::ccw(face))
        } else {
            Some(Move::cw(face))
        }
    }

    fn busy_message(&mut self) {
        if self.session.is_solving() {
            self.show_message("Solving, please wait");
        } else {
            self.show_message("Playing back solution");
        }
    }

    fn turn(&mut self, mv: Move) {
        if !self.session.turn(mv) {
            self.busy_message();
        }
    }

    fn undo(&mut self) {
        if self.session.is_busy() {
            self.busy_message();
            return;
        }
        match self.session.undo() {
            Some(mv) => self.show_message(&format!("Undo ({})", mv)),
            None => self.show_message("Nothing to undo"),
        }
    }

    fn random_move(&mut self) {
        match self.session.random_turn(&mut self.rng) {
            Some(mv) => self.show_message(&format!("Random move: {}", mv)),
            None => self.busy_message(),
        }
    }

    fn scramble(&mut self) {
        if self.session.scramble(&mut self.scrambler) {
            self.show_message("Scrambled");
        } else {
            self.busy_message();
        }
    }

    fn reset(&mut self) {
        if self.session.reset() {
            self.show_message("Reset");
        } else {
            self.busy_message();
        }
    }

    fn start_solve(&mut self) {
        let Some(snapshot) = self.session.begin_solve() else {
            self.busy_message();
            return;
        };

        info!(
            "starting solve with {} recorded moves via {}",
            snapshot.history.len(),
            self.solver_name()
        );
        self.phase = Some(Phase::Attempt1);
        let orchestrator = Arc::clone(&self.orchestrator);
        let tx = self.events_tx.clone();
        thread::spawn(move || {
            let result = orchestrator.solve_with_progress(&snapshot, |phase| {
                let _ = tx.send(SolveEvent::Progress(phase));
            });
            let _ = tx.send(SolveEvent::Finished(result));
        });
    }

    fn start_playback(&mut self) {
        if self.session.is_busy() {
            self.busy_message();
        } else if !self.session.start_playback(self.delays, Instant::now()) {
            self.show_message("No solution to play");
        }
    }
}
