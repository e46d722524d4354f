use super::protocol::ClientOutcome;
use super::{Deadline, SolverClient, UNREACHABLE};
use crate::facelet::FaceletState;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Client used when no service is configured; every request fails to connect
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineSolverClient;

impl SolverClient for OfflineSolverClient {
    fn request(&self, _state: &FaceletState, _deadline: Deadline) -> ClientOutcome {
        ClientOutcome::TransportFailure(UNREACHABLE.to_string())
    }

    fn is_available(&self) -> bool {
        false
    }

    fn name(&self) -> &'static str {
        "Offline"
    }
}

/// In-memory client that replays queued outcomes, for testing.
///
/// Every requested state is recorded. Once the queue runs dry each further
/// request gets a transport failure.
pub struct ScriptedSolverClient {
    script: Mutex<VecDeque<ClientOutcome>>,
    requests: Mutex<Vec<FaceletState>>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl ScriptedSolverClient {
    pub fn new(outcomes: impl IntoIterator<Item = ClientOutcome>) -> Self {
        Self {
            script: Mutex::new(outcomes.into_iter().collect()),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// States requested so far, oldest first
    pub fn requests(&self) -> Vec<FaceletState> {
        lock(&self.requests).clone()
    }

    pub fn request_count(&self) -> usize {
        lock(&self.requests).len()
    }
}

impl SolverClient for ScriptedSolverClient {
    fn request(&self, state: &FaceletState, _deadline: Deadline) -> ClientOutcome {
        lock(&self.requests).push(*state);
        lock(&self.script)
            .pop_front()
            .unwrap_or_else(|| ClientOutcome::TransportFailure(UNREACHABLE.to_string()))
    }

    fn is_available(&self) -> bool {
        true
    }

    fn name(&self) -> &'static str {
        "Scripted"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_offline_always_unreachable() {
        let client = OfflineSolverClient;
        let outcome = client.request(&FaceletState::solved(), Deadline::after(Duration::from_secs(1)));
        assert_eq!(outcome, ClientOutcome::TransportFailure(UNREACHABLE.to_string()));
    }

    #[test]
    fn test_scripted_replays_in_order() {
        let client = ScriptedSolverClient::new([
            ClientOutcome::Timeout,
            ClientOutcome::LogicalFailure("no".to_string()),
        ]);
        let deadline = Deadline::after(Duration::from_secs(1));
        let state = FaceletState::solved();

        assert_eq!(client.request(&state, deadline), ClientOutcome::Timeout);
        assert_eq!(
            client.request(&state, deadline),
            ClientOutcome::LogicalFailure("no".to_string())
        );
        assert!(matches!(
            client.request(&state, deadline),
            ClientOutcome::TransportFailure(_)
        ));
        assert_eq!(client.request_count(), 3);
    }
}
