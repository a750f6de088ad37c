//! Connect-JSON transport.
//!
//! A unary Connect call is an HTTP POST of a JSON body to
//! `{base}/{package}.{Service}/{Method}`. A 200 answer carries the response
//! message; any other status carries a Connect error body
//! `{"code": "...", "message": "..."}`.
//!
//! Use [`MockTransport`] for testing without network access:
//!
//! ```
//! use controlplane::transport::{MockTransport, Transport};
//! use serde_json::json;
//!
//! let mock = MockTransport::new();
//! mock.respond("pkg.Svc/Get", json!({ "thing": { "id": "t1" } }));
//!
//! let response = mock.call("pkg.Svc/Get", json!({ "id": "t1" })).unwrap();
//! assert_eq!(response["thing"]["id"], "t1");
//! assert_eq!(mock.calls().len(), 1);
//! ```

use crate::auth::TokenSource;
use crate::error::{Code, Error, Result};
use serde::Deserialize;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Global timeout applied to every request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Unary RPC transport.
pub trait Transport: Send + Sync {
    /// Call `procedure` (`package.Service/Method`) with a JSON request.
    fn call(&self, procedure: &str, request: Value) -> Result<Value>;
}

#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    code: Option<Code>,
    #[serde(default)]
    message: String,
}

/// Decode a non-200 answer into an RPC error.
fn decode_error(procedure: &str, status: u16, body: &str) -> Error {
    let parsed: ErrorBody = serde_json::from_str(body).unwrap_or_default();
    let code = parsed.code.unwrap_or_else(|| Code::from_http_status(status));
    let message = if parsed.message.is_empty() {
        format!("HTTP {status}")
    } else {
        parsed.message
    };
    Error::rpc(procedure, code, message)
}

/// Build a ureq agent that returns non-2xx responses instead of failing.
#[must_use]
pub fn agent(timeout: Duration) -> ureq::Agent {
    let config = ureq::Agent::config_builder()
        .timeout_global(Some(timeout))
        .http_status_as_error(false)
        .build();
    ureq::Agent::new_with_config(config)
}

/// HTTP transport with bearer authentication.
pub struct HttpTransport {
    agent: ureq::Agent,
    base_url: String,
    tokens: Arc<dyn TokenSource>,
}

impl HttpTransport {
    pub fn new(agent: ureq::Agent, base_url: &str, tokens: Arc<dyn TokenSource>) -> Result<Self> {
        let base_url = base_url.trim_end_matches('/');
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(Error::Config(format!(
                "API URL must start with http:// or https://, got {base_url:?}"
            )));
        }
        Ok(Self {
            agent,
            base_url: base_url.to_string(),
            tokens,
        })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, procedure: &str) -> String {
        format!("{}/{}", self.base_url, procedure)
    }
}

impl Transport for HttpTransport {
    fn call(&self, procedure: &str, request: Value) -> Result<Value> {
        let token = self.tokens.token()?;
        let url = self.url(procedure);
        log::debug!("POST {url}");

        let mut response = self
            .agent
            .post(&url)
            .header("Authorization", format!("Bearer {token}"))
            .header("Connect-Protocol-Version", "1")
            .header(
                "User-Agent",
                concat!("controlplane-rs/", env!("CARGO_PKG_VERSION")),
            )
            .send_json(&request)?;

        let status = response.status().as_u16();
        let body = response.body_mut().read_to_string()?;
        if status != 200 {
            let err = decode_error(procedure, status, &body);
            log::debug!("{procedure} failed: {err}");
            return Err(err);
        }

        if body.trim().is_empty() {
            return Ok(Value::Object(serde_json::Map::new()));
        }
        Ok(serde_json::from_str(&body)?)
    }
}

/// In-memory transport returning canned responses.
///
/// Responses are queued per procedure and consumed in order. Calls without
/// a queued response fail with `unimplemented`.
#[derive(Clone, Default)]
pub struct MockTransport {
    responses: Arc<Mutex<HashMap<String, VecDeque<Result<Value>>>>>,
    calls: Arc<Mutex<Vec<(String, Value)>>>,
}

impl MockTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a successful response.
    pub fn respond(&self, procedure: &str, response: Value) {
        self.push(procedure, Ok(response));
    }

    /// Queue a Connect error.
    pub fn fail(&self, procedure: &str, code: Code, message: &str) {
        self.push(procedure, Err(Error::rpc(procedure, code, message)));
    }

    fn push(&self, procedure: &str, response: Result<Value>) {
        let mut responses = self.responses.lock().unwrap();
        responses
            .entry(procedure.to_string())
            .or_default()
            .push_back(response);
    }

    /// Requests received so far, in order.
    #[must_use]
    pub fn calls(&self) -> Vec<(String, Value)> {
        self.calls.lock().unwrap().clone()
    }
}

impl Transport for MockTransport {
    fn call(&self, procedure: &str, request: Value) -> Result<Value> {
        self.calls
            .lock()
            .unwrap()
            .push((procedure.to_string(), request));

        self.responses
            .lock()
            .unwrap()
            .get_mut(procedure)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Err(Error::rpc(procedure, Code::Unimplemented, "no mock response")))
    }
}
