//! JSON API handlers for the web dashboard.
//!
//! Each handler corresponds to an API endpoint and returns a
//! `Response<Cursor<Vec<u8>>>` with JSON content.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tiny_http::{Response, StatusCode};

use super::{HttpResponse, content_type_json};
use crate::app::session::Session;
use crate::app::{AppState, Event};
use crate::client::AccidentClient;
use crate::config::{self, CrashscopeConfig};
use crate::filter::FilterCriteria;
use crate::history::{logger, reporter};
use crate::render::SearchReport;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Request-level failures, answered as `{"error": ...}`.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> u16 {
        match self {
            Self::BadRequest(_) => 400,
            Self::Internal(_) => 500,
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        Self::Internal(e.into())
    }
}

// ---------------------------------------------------------------------------
// JSON response types
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct HealthResponse {
    service_url: String,
    service_reachable: bool,
    config_exists: bool,
    history_enabled: bool,
    history_exists: bool,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Build a JSON success response.
fn json_response<T: Serialize>(data: &T) -> Result<HttpResponse, ApiError> {
    let body = serde_json::to_string(data)?;
    Ok(Response::from_data(body.into_bytes())
        .with_header(content_type_json())
        .with_status_code(StatusCode(200)))
}

/// Parse the `?days=N` query parameter from a URL.
fn parse_days_param(url: &str) -> Option<u32> {
    url.split('?').nth(1)?.split('&').find_map(|pair| {
        let (k, v) = pair.split_once('=')?;
        if k == "days" { v.parse().ok() } else { None }
    })
}

/// Turn a request body into filter criteria.
fn parse_filters(body: &str) -> Result<FilterCriteria, ApiError> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| ApiError::BadRequest(format!("invalid JSON in search request: {e}")))?;
    let Value::Object(object) = value else {
        return Err(ApiError::BadRequest(
            "search request must be a JSON object".to_string(),
        ));
    };
    FilterCriteria::from_json_object(&object).map_err(|e| ApiError::BadRequest(e.to_string()))
}

// ---------------------------------------------------------------------------
// API Handlers
// ---------------------------------------------------------------------------

/// `POST /api/search`: run one search against the accident service.
///
/// The body is the filter object (`{"vehicle_make": "FORD", ...}`). Service
/// failures are not HTTP errors here: they come back in the report's `error`
/// field, exactly as the terminal would show them.
pub fn post_search(body: &str, config: &CrashscopeConfig) -> Result<HttpResponse, ApiError> {
    let criteria = parse_filters(body)?;

    let mut state = AppState::new(config.display.view);
    for (field, value) in criteria.active() {
        (state, _) = state.update(Event::FieldChanged {
            field,
            value: value.to_string(),
        });
    }

    let session = Session::new(AccidentClient::from_config(&config.service))
        .with_history(config.history.enabled);
    let state = session.submit(state);

    json_response(&SearchReport::from_state(&state))
}

/// `GET /api/history?days=N`: query history summary.
pub fn get_history(url: &str) -> Result<HttpResponse, ApiError> {
    let summary = reporter::compute_summary(parse_days_param(url));
    json_response(&summary)
}

/// `GET /api/health`: service reachability and local file status.
pub fn get_health(config: &CrashscopeConfig) -> Result<HttpResponse, ApiError> {
    let client = AccidentClient::from_config(&config.service);

    let resp = HealthResponse {
        service_url: client.endpoint(),
        service_reachable: client.probe(),
        config_exists: config::global_config_file()
            .map(|p| p.exists())
            .unwrap_or(false),
        history_enabled: config.history.enabled,
        history_exists: logger::query_log_path()
            .map(|p| p.exists())
            .unwrap_or(false),
    };

    json_response(&resp)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
