//! HTTP client for the accident-query service.
//!
//! Issues exactly one blocking `POST {base_url}/api/accidents` per search
//! using `ureq`. There is no retry and no de-duplication; every failure is
//! mapped to a [`FetchError`] whose `Display` text is the message shown to
//! the user.
use std::io::Read;
use std::time::Duration;

use serde_json::{Map, Value};
use thiserror::Error;

use crate::config::schema::ServiceConfig;
use crate::record::AccidentRecord;

/// Fixed path of the search endpoint, relative to the service base URL.
pub const ACCIDENTS_PATH: &str = "/api/accidents";

/// Fallback when a transport error carries no message.
pub const TRANSPORT_FALLBACK: &str = "Error fetching accident data. Please try again.";

/// Fallback when an error response has no usable `detail`.
pub const STATUS_FALLBACK: &str = "Failed to fetch accident data";

/// Message for a success response without an `accidents` array.
pub const INVALID_FORMAT: &str = "Invalid data format received from server";

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Why a search produced no records.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    /// Connection-level failure (refused, DNS, timeout, ...).
    #[error("{message}")]
    Transport { message: String },

    /// The service answered with a non-success status.
    #[error("{message}")]
    Status { status: u16, message: String },

    /// Success status, but the body did not carry an `accidents` array.
    #[error("Invalid data format received from server")]
    InvalidFormat,
}

impl FetchError {
    /// Short category name for the query log.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport { .. } => "transport",
            Self::Status { .. } => "status",
            Self::InvalidFormat => "invalid_format",
        }
    }
}

// ---------------------------------------------------------------------------
// Source seam
// ---------------------------------------------------------------------------

/// Anything that can answer a search payload with accident records.
pub trait AccidentSource {
    fn fetch(&self, payload: &Map<String, Value>) -> Result<Vec<AccidentRecord>, FetchError>;
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

/// Blocking client for the accident service.
#[derive(Debug)]
pub struct AccidentClient {
    base_url: String,
    timeout: Duration,
}

impl AccidentClient {
    /// Build a client from the resolved `[service]` config.
    pub fn from_config(config: &ServiceConfig) -> Self {
        Self::new(&config.base_url, Duration::from_millis(config.timeout_ms))
    }

    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full URL of the search endpoint.
    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, ACCIDENTS_PATH)
    }

    /// Check that the service answers at all (any HTTP status counts).
    ///
    /// Uses a short timeout so `crashscope health` doesn't stall.
    pub fn probe(&self) -> bool {
        match ureq::get(&self.base_url)
            .timeout(Duration::from_secs(3))
            .call()
        {
            Ok(_) | Err(ureq::Error::Status(..)) => true,
            Err(ureq::Error::Transport(_)) => false,
        }
    }

    /// Send one search request and interpret the response.
    pub fn search(&self, payload: &Map<String, Value>) -> Result<Vec<AccidentRecord>, FetchError> {
        let result = ureq::post(&self.endpoint())
            .timeout(self.timeout)
            .set("Content-Type", "application/json")
            .send_json(Value::Object(payload.clone()));

        let (status, resp) = match result {
            Ok(resp) => (resp.status(), resp),
            Err(ureq::Error::Status(status, resp)) => (status, resp),
            Err(ureq::Error::Transport(transport)) => {
                return Err(FetchError::Transport {
                    message: transport_message(&transport),
                });
            }
        };

        let body = read_body(resp).map_err(|e| FetchError::Transport {
            message: io_message(&e),
        })?;
        interpret_response(status, &body)
    }
}

impl AccidentSource for AccidentClient {
    fn fetch(&self, payload: &Map<String, Value>) -> Result<Vec<AccidentRecord>, FetchError> {
        self.search(payload)
    }
}

// ---------------------------------------------------------------------------
// Response interpretation
// ---------------------------------------------------------------------------

/// Map an HTTP status and body to records or a [`FetchError`].
///
/// - `2xx`: the body must be a JSON object with an `accidents` array.
/// - anything else: the body's `detail` string becomes the message, falling
///   back to [`STATUS_FALLBACK`].
pub fn interpret_response(status: u16, body: &str) -> Result<Vec<AccidentRecord>, FetchError> {
    let parsed: Option<Value> = serde_json::from_str(body).ok();

    if !(200..300).contains(&status) {
        let message = parsed
            .as_ref()
            .and_then(|v| v.get("detail"))
            .and_then(Value::as_str)
            .filter(|detail| !detail.is_empty())
            .unwrap_or(STATUS_FALLBACK)
            .to_string();
        return Err(FetchError::Status { status, message });
    }

    match parsed {
        Some(Value::Object(mut object)) => match object.remove("accidents") {
            Some(Value::Array(items)) => Ok(items.into_iter().map(AccidentRecord::from_value).collect()),
            _ => Err(FetchError::InvalidFormat),
        },
        _ => Err(FetchError::InvalidFormat),
    }
}

/// Read the whole body. A timeout or dropped connection mid-body is an
/// error, not a short body.
fn read_body(resp: ureq::Response) -> std::io::Result<String> {
    let mut body = String::new();
    resp.into_reader().read_to_string(&mut body)?;
    Ok(body)
}

fn io_message(error: &std::io::Error) -> String {
    let message = error.to_string();
    if message.is_empty() {
        TRANSPORT_FALLBACK.to_string()
    } else {
        message
    }
}

/// The transport error's own message, then its source, then the fallback.
fn transport_message(transport: &ureq::Transport) -> String {
    if let Some(message) = transport.message()
        && !message.is_empty()
    {
        return message.to_string();
    }
    std::error::Error::source(transport)
        .map(|source| source.to_string())
        .filter(|message| !message.is_empty())
        .unwrap_or_else(|| TRANSPORT_FALLBACK.to_string())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
