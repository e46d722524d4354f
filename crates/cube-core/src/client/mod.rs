//! Solver client abstraction
//!
//! The search itself runs in an external service. Clients differ in how they
//! reach it:
//! - Http: the real service over HTTP/JSON
//! - Offline: no service at all, every request fails to connect
//! - Scripted: canned outcomes for tests

mod http;
mod mock;
pub mod protocol;

pub use http::HttpSolverClient;
pub use mock::{OfflineSolverClient, ScriptedSolverClient};
pub use protocol::{interpret, ClientOutcome, Metrics, SearchReply, SolveRequest, SolveResponse};

use crate::config::SolverConfig;
use crate::facelet::FaceletState;
use std::sync::Arc;
use std::time::{Duration, Instant};

/// Message shown when the service cannot be reached
pub const UNREACHABLE: &str = "Solver service unreachable. Ensure the solve server is running.";

/// Wall-clock limit for a single request.
///
/// Starts counting when created; the request is abandoned once it expires.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    started: Instant,
    budget: Duration,
}

impl Deadline {
    /// A deadline `budget` from now
    pub fn after(budget: Duration) -> Self {
        Self {
            started: Instant::now(),
            budget,
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Time left before expiry, zero once expired
    pub fn remaining(&self) -> Duration {
        self.budget.saturating_sub(self.started.elapsed())
    }

    pub fn is_expired(&self) -> bool {
        self.started.elapsed() >= self.budget
    }
}

/// Trait for solver clients
pub trait SolverClient: Send + Sync {
    /// Ask the service to solve `state`, giving up when `deadline` expires
    fn request(&self, state: &FaceletState, deadline: Deadline) -> ClientOutcome;

    /// Check if the service is reachable
    fn is_available(&self) -> bool;

    /// Client name for display
    fn name(&self) -> &'static str;
}

/// Which client to build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientMode {
    Http,
    Offline,
}

/// Create the client for `mode`
pub fn create_client(mode: ClientMode, config: &SolverConfig) -> Arc<dyn SolverClient> {
    match mode {
        ClientMode::Http => Arc::new(HttpSolverClient::from_config(config)),
        ClientMode::Offline => Arc::new(OfflineSolverClient),
    }
}
