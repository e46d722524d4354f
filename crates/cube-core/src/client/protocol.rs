//! Wire format of the search service and the rules for reading its replies.

use crate::facelet::FaceletState;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Time reported when the service omits it
pub const DEFAULT_TIME: &str = "0.1";
/// Node count reported when the service omits it
pub const DEFAULT_NODES: &str = "88M (Lookup)";
/// Marker the service embeds in its text when the search ran out of time
pub const TIMEOUT_MARKER: &str = "TIMEOUT";
/// Prefix the service puts on a `solution` that is really an error
pub const ERROR_PREFIX: &str = "Error";
/// Message used when the service reports neither a solution nor an error
pub const UNKNOWN_ERROR: &str = "Unknown Error";

/// Body of a solve request: the 54 facelet labels in wire order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolveRequest {
    pub state: FaceletState,
}

impl SolveRequest {
    pub fn new(state: &FaceletState) -> Self {
        Self { state: *state }
    }
}

/// Reply from the service. Every field is optional; metrics may arrive as
/// numbers or strings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SolveResponse {
    #[serde(default)]
    pub solution: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub time: Option<Value>,
    #[serde(default)]
    pub depth: Option<Value>,
    #[serde(default)]
    pub nodes: Option<Value>,
}

/// Reply from the `/health` endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct HealthResponse {
    pub status: String,
}

impl HealthResponse {
    pub fn is_online(&self) -> bool {
        self.status == "online"
    }
}

/// Search statistics attached to a solution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metrics {
    pub time: String,
    pub depth: usize,
    pub nodes: String,
}

impl Metrics {
    /// Metrics for a solution obtained by reversing recorded moves
    pub fn reversal(depth: usize) -> Self {
        Self {
            time: "0.01".to_string(),
            depth,
            nodes: "0 (Reversal)".to_string(),
        }
    }
}

/// A successful search reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchReply {
    /// Space-separated move tokens as sent by the service
    pub solution: String,
    pub metrics: Metrics,
}

/// Normalized result of one bounded request to the service
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientOutcome {
    Success(SearchReply),
    /// The service, or the deadline, ran out of time
    Timeout,
    /// The service answered but could not solve
    LogicalFailure(String),
    /// The service could not be reached
    TransportFailure(String),
}

impl ClientOutcome {
    pub fn is_timeout(&self) -> bool {
        matches!(self, ClientOutcome::Timeout)
    }
}

/// Text treated as absent when empty
fn non_empty(text: &Option<String>) -> Option<&str> {
    text.as_deref().filter(|s| !s.is_empty())
}

/// Render a metric, treating null, zero, false and empty strings as absent
fn metric_text(value: &Option<Value>) -> Option<String> {
    match value.as_ref()? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64().is_some_and(|f| f != 0.0) => Some(n.to_string()),
        _ => None,
    }
}

fn metric_count(value: &Option<Value>) -> Option<usize> {
    match value.as_ref()? {
        Value::Number(n) => n.as_u64().filter(|&d| d > 0).map(|d| d as usize),
        Value::String(s) => s.trim().parse().ok().filter(|&d: &usize| d > 0),
        _ => None,
    }
}

/// Classify a service reply.
///
/// A `TIMEOUT` marker anywhere in the text wins over every other field. A
/// `solution` that does not start with `Error` is a success, with missing
/// metrics defaulted. Anything else is a logical failure carrying the first
/// non-empty of `solution` and `error`.
pub fn interpret(response: &SolveResponse) -> ClientOutcome {
    let solution = non_empty(&response.solution);
    let error = non_empty(&response.error);
    let text = solution.or(error).unwrap_or("");

    if text.contains(TIMEOUT_MARKER) {
        return ClientOutcome::Timeout;
    }

    match solution {
        Some(solution) if !solution.starts_with(ERROR_PREFIX) => {
            let metrics = Metrics {
                time: metric_text(&response.time).unwrap_or_else(|| DEFAULT_TIME.to_string()),
                depth: metric_count(&response.depth)
                    .unwrap_or_else(|| solution.split_whitespace().count()),
                nodes: metric_text(&response.nodes).unwrap_or_else(|| DEFAULT_NODES.to_string()),
            };
            ClientOutcome::Success(SearchReply {
                solution: solution.to_string(),
                metrics,
            })
        }
        _ => ClientOutcome::LogicalFailure(
            solution.or(error).unwrap_or(UNKNOWN_ERROR).to_string(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> SolveResponse {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_request_body_shape() {
        let body = serde_json::to_value(SolveRequest::new(&FaceletState::solved())).unwrap();
        let state = body["state"].as_array().unwrap();
        assert_eq!(state.len(), 54);
        assert_eq!(state[0], 0);
        assert_eq!(state[53], 5);
    }

    #[test]
    fn test_success_with_reported_metrics() {
        let reply = parse(r#"{"solution": "R U R'", "time": 12.5, "depth": 3, "nodes": "1,230"}"#);
        assert_eq!(
            interpret(&reply),
            ClientOutcome::Success(SearchReply {
                solution: "R U R'".to_string(),
                metrics: Metrics {
                    time: "12.5".to_string(),
                    depth: 3,
                    nodes: "1,230".to_string(),
                },
            })
        );
    }

    #[test]
    fn test_success_defaults_missing_metrics() {
        let reply = parse(r#"{"solution": "F R2 D' "}"#);
        match interpret(&reply) {
            ClientOutcome::Success(reply) => {
                assert_eq!(reply.metrics.time, DEFAULT_TIME);
                assert_eq!(reply.metrics.depth, 3);
                assert_eq!(reply.metrics.nodes, DEFAULT_NODES);
            }
            other => panic!("expected success, got {:?}", other),
        }
    }

    #[test]
    fn test_timeout_marker_wins() {
        let reply = parse(r#"{"solution": "SEARCH TIMEOUT", "time": 100000}"#);
        assert_eq!(interpret(&reply), ClientOutcome::Timeout);

        let reply = parse(r#"{"error": "TIMEOUT after 100s"}"#);
        assert_eq!(interpret(&reply), ClientOutcome::Timeout);
    }

    #[test]
    fn test_error_prefixed_solution_is_logical_failure() {
        let reply = parse(r#"{"solution": "Error: Invalid Output from Solver"}"#);
        assert_eq!(
            interpret(&reply),
            ClientOutcome::LogicalFailure("Error: Invalid Output from Solver".to_string())
        );
    }

    #[test]
    fn test_error_field_only() {
        let reply = parse(r#"{"error": "bad cube"}"#);
        assert_eq!(
            interpret(&reply),
            ClientOutcome::LogicalFailure("bad cube".to_string())
        );
    }

    #[test]
    fn test_empty_reply_is_unknown_error() {
        let reply = parse(r#"{"solution": ""}"#);
        assert_eq!(
            interpret(&reply),
            ClientOutcome::LogicalFailure(UNKNOWN_ERROR.to_string())
        );
    }

    #[test]
    fn test_health_status() {
        let health: HealthResponse =
            serde_json::from_str(r#"{"status": "online", "solver_path": "/bin/solver"}"#).unwrap();
        assert!(health.is_online());
    }
}
