//! Cube Core - 3x3x3 puzzle engine and solve orchestration
//!
//! This crate provides:
//! - A 54-facelet state with a precomputed quarter-turn permutation engine
//! - Move notation, a history log with undo, and a scramble generator
//! - Clients for an external search service, bounded by a deadline
//! - A solve orchestrator with backtracking and reversal fallback
//! - A session context and timed solution playback

pub mod client;
pub mod config;
pub mod engine;
mod facelet;
mod history;
mod moves;
pub mod orchestrator;
mod playback;
mod scramble;
mod session;

pub use client::{
    create_client, ClientMode, ClientOutcome, Deadline, HttpSolverClient, Metrics,
    OfflineSolverClient, ScriptedSolverClient, SearchReply, SolverClient,
};
pub use config::{ConfigError, SolverConfig};
pub use facelet::{Color, Face, FaceletError, FaceletState, FACELETS_PER_FACE, FACELET_COUNT};
pub use history::{split_excess, HistoryLog};
pub use moves::{
    expand_turns, format_sequence, invert_sequence, parse_sequence, Direction, Move,
    ParseMoveError, Turn,
};
pub use orchestrator::{Orchestrator, Phase, Solution, SolveError, SolveResult, SolveSnapshot};
pub use playback::{Playback, PlaybackDelays};
pub use scramble::{ScrambleRecord, Scrambler, SCRAMBLE_DEPTH};
pub use session::Session;
