use super::protocol::{interpret, ClientOutcome, HealthResponse, SolveRequest, SolveResponse};
use super::{Deadline, SolverClient, UNREACHABLE};
use crate::config::SolverConfig;
use crate::facelet::FaceletState;
use log::{debug, warn};
use std::io::ErrorKind;
use std::time::Duration;
use ureq::Agent;

/// How long a health probe may take
const HEALTH_TIMEOUT: Duration = Duration::from_secs(2);

/// Client for the search service over HTTP/JSON
pub struct HttpSolverClient {
    base_url: String,
}

impl HttpSolverClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    pub fn from_config(config: &SolverConfig) -> Self {
        Self::new(config.base_url.clone())
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), path)
    }

    /// An agent whose every call is cut off after `timeout`. Non-2xx replies
    /// still carry a JSON body worth reading, so they are not errors here.
    fn agent(timeout: Duration) -> Agent {
        Agent::config_builder()
            .timeout_global(Some(timeout))
            .http_status_as_error(false)
            .build()
            .into()
    }

    /// Only a cut-off at the request deadline counts as a timeout. Every other
    /// failure, unreadable replies included, means the service is unusable.
    fn classify_error(err: ureq::Error, deadline: &Deadline) -> ClientOutcome {
        match err {
            ureq::Error::Timeout(kind) => {
                debug!("solver request hit the deadline ({:?})", kind);
                ClientOutcome::Timeout
            }
            ureq::Error::Io(ref io) if io.kind() == ErrorKind::TimedOut && deadline.is_expired() => {
                debug!("solver connection timed out at the deadline");
                ClientOutcome::Timeout
            }
            other => {
                warn!("solver request failed: {}", other);
                ClientOutcome::TransportFailure(UNREACHABLE.to_string())
            }
        }
    }
}

impl SolverClient for HttpSolverClient {
    fn request(&self, state: &FaceletState, deadline: Deadline) -> ClientOutcome {
        if deadline.is_expired() {
            return ClientOutcome::Timeout;
        }

        let url = self.endpoint("solve");
        debug!("POST {} (budget {:?})", url, deadline.remaining());

        let reply = Self::agent(deadline.remaining())
            .post(&url)
            .send_json(SolveRequest::new(state))
            .and_then(|mut response| {
                debug!("solver answered with status {}", response.status());
                response.body_mut().read_json::<SolveResponse>()
            });

        match reply {
            Ok(reply) => interpret(&reply),
            Err(err) => Self::classify_error(err, &deadline),
        }
    }

    fn is_available(&self) -> bool {
        let health = Self::agent(HEALTH_TIMEOUT)
            .get(&self.endpoint("health"))
            .call()
            .and_then(|mut response| response.body_mut().read_json::<HealthResponse>());

        match health {
            Ok(health) => health.is_online(),
            Err(err) => {
                debug!("health check failed: {}", err);
                false
            }
        }
    }

    fn name(&self) -> &'static str {
        "HTTP"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::{TcpListener, TcpStream};
    use std::thread;

    /// Read one request: headers, then the body by content length or chunked terminator
    fn read_request(stream: &mut TcpStream) {
        let mut data = Vec::new();
        let mut buf = [0u8; 1024];
        loop {
            if let Some(end) = data.windows(4).position(|w| w == b"\r\n\r\n") {
                let head = String::from_utf8_lossy(&data[..end]).to_ascii_lowercase();
                let body = data.len() - (end + 4);
                let length = head
                    .lines()
                    .find_map(|l| l.strip_prefix("content-length:"))
                    .and_then(|v| v.trim().parse::<usize>().ok());
                let complete = match length {
                    Some(length) => body >= length,
                    None => !head.contains("chunked") || data.ends_with(b"0\r\n\r\n"),
                };
                if complete {
                    return;
                }
            }
            match stream.read(&mut buf) {
                Ok(0) | Err(_) => return,
                Ok(n) => data.extend_from_slice(&buf[..n]),
            }
        }
    }

    /// Serve a single canned reply, returning the base URL
    fn serve_once(status: &'static str, content_type: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            read_request(&mut stream);
            let reply = format!(
                "HTTP/1.1 {}\r\nContent-Type: {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                content_type,
                body.len(),
                body
            );
            let _ = stream.write_all(reply.as_bytes());
        });
        format!("http://{}", addr)
    }

    fn solve(base_url: &str, budget: Duration) -> ClientOutcome {
        HttpSolverClient::new(base_url).request(&FaceletState::solved(), Deadline::after(budget))
    }

    #[test]
    fn test_endpoint_joins_paths() {
        let client = HttpSolverClient::new("http://localhost:5000/");
        assert_eq!(client.endpoint("solve"), "http://localhost:5000/solve");

        let client = HttpSolverClient::new("http://solver.local");
        assert_eq!(client.endpoint("health"), "http://solver.local/health");
    }

    #[test]
    fn test_expired_deadline_skips_request() {
        // nothing listens here, an actual request would be a transport failure
        let client = HttpSolverClient::new("http://127.0.0.1:9");
        let outcome = client.request(&FaceletState::solved(), Deadline::after(Duration::ZERO));
        assert_eq!(outcome, ClientOutcome::Timeout);
    }

    #[test]
    fn test_successful_reply() {
        let url = serve_once("200 OK", "application/json", r#"{"solution": "R U2", "time": 0.5}"#);
        match solve(&url, Duration::from_secs(5)) {
            ClientOutcome::Success(reply) => {
                assert_eq!(reply.solution, "R U2");
                assert_eq!(reply.metrics.time, "0.5");
            }
            other => panic!("expected success, got {:?}", other),
        }
    }

    #[test]
    fn test_refused_connection_is_unreachable() {
        let addr = TcpListener::bind("127.0.0.1:0").unwrap().local_addr().unwrap();
        let outcome = solve(&format!("http://{}", addr), Duration::from_secs(5));
        assert_eq!(outcome, ClientOutcome::TransportFailure(UNREACHABLE.to_string()));
    }

    #[test]
    fn test_silent_server_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            let (_stream, _) = listener.accept().unwrap();
            thread::sleep(Duration::from_secs(3));
        });

        let outcome = solve(&format!("http://{}", addr), Duration::from_millis(500));
        assert_eq!(outcome, ClientOutcome::Timeout);
    }

    #[test]
    fn test_unreadable_reply_is_unreachable() {
        let url = serve_once(
            "500 Internal Server Error",
            "text/html",
            "<html><body>Internal Server Error</body></html>",
        );
        let outcome = solve(&url, Duration::from_secs(5));
        assert_eq!(outcome, ClientOutcome::TransportFailure(UNREACHABLE.to_string()));
    }

    #[test]
    fn test_error_status_body_is_interpreted() {
        let url = serve_once(
            "500 Internal Server Error",
            "application/json",
            r#"{"solution": "Error: Invalid Output from Solver"}"#,
        );
        let outcome = solve(&url, Duration::from_secs(5));
        assert_eq!(
            outcome,
            ClientOutcome::LogicalFailure("Error: Invalid Output from Solver".to_string())
        );
    }

    #[test]
    fn test_timeout_marker_in_reply() {
        let url = serve_once("200 OK", "application/json", r#"{"error": "Error: TIMEOUT"}"#);
        assert_eq!(solve(&url, Duration::from_secs(5)), ClientOutcome::Timeout);
    }

    #[test]
    fn test_os_timeout_before_deadline_is_unreachable() {
        let err = || ureq::Error::Io(std::io::Error::new(ErrorKind::TimedOut, "connect timed out"));

        let live = Deadline::after(Duration::from_secs(60));
        assert_eq!(
            HttpSolverClient::classify_error(err(), &live),
            ClientOutcome::TransportFailure(UNREACHABLE.to_string())
        );

        let spent = Deadline::after(Duration::ZERO);
        assert_eq!(HttpSolverClient::classify_error(err(), &spent), ClientOutcome::Timeout);
    }
}
