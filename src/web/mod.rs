//! Embedded web dashboard for crashscope.
//!
//! Provides a lightweight HTTP server (sync, via `tiny_http`) that serves:
//! - A single-page search dashboard (filter form, detail cards, charts)
//! - JSON API endpoints for search, query history and health
//!
//! Launched via `crashscope web` (default: `http://127.0.0.1:9747`).

mod api;
mod frontend;

use std::io::{Cursor, Read};

use anyhow::Result;
use tiny_http::{Header, Method, Response, Server, StatusCode};

use crate::client::AccidentClient;
use crate::config::CrashscopeConfig;

pub use api::ApiError;

type HttpResponse = Response<Cursor<Vec<u8>>>;

// ---------------------------------------------------------------------------
// Server entry point
// ---------------------------------------------------------------------------

/// Start the dashboard server on `addr`.
///
/// Blocks the current thread. Requests are handled one at a time, so two
/// searches never run concurrently. Errors are answered per request without
/// stopping the server.
pub fn serve(addr: &str, config: &CrashscopeConfig) -> Result<()> {
    let server = Server::http(addr)
        .map_err(|e| anyhow::anyhow!("failed to start HTTP server on {addr}: {e}"))?;

    println!("crashscope dashboard running at http://{addr}");
    println!("Searching {}", AccidentClient::from_config(&config.service).endpoint());
    println!("Press Ctrl+C to stop.\n");

    run(server, config);
    Ok(())
}

/// Answer requests from `server` until it shuts down.
pub fn run(server: Server, config: &CrashscopeConfig) {
    for mut request in server.incoming_requests() {
        let method = request.method().clone();
        let url = request.url().to_string();

        let handled = read_body(&method, request.as_reader())
            .and_then(|body| dispatch(&method, &url, body.as_deref(), config));

        let response = match handled {
            Ok(resp) => resp,
            Err(e) => error_response(&e),
        };
        let status = response.status_code().0;
        let _ = request.respond(response);

        println!(
            "{} {} {} {}",
            method,
            url,
            status,
            chrono::Local::now().format("%H:%M:%S")
        );
    }
}

/// Read the request body for methods that carry one.
///
/// A body that is not UTF-8 or stops early is a bad request.
fn read_body(method: &Method, mut reader: impl Read) -> Result<Option<String>, ApiError> {
    if !matches!(method, Method::Put | Method::Post | Method::Patch) {
        return Ok(None);
    }

    let mut buf = String::new();
    reader
        .read_to_string(&mut buf)
        .map_err(|e| ApiError::BadRequest(format!("could not read request body: {e}")))?;
    Ok(Some(buf))
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

/// Dispatch an incoming request to the appropriate handler.
fn dispatch(
    method: &Method,
    url: &str,
    body: Option<&str>,
    config: &CrashscopeConfig,
) -> Result<HttpResponse, ApiError> {
    let path = url.split('?').next().unwrap_or(url);

    match (method, path) {
        (&Method::Get, "/") | (&Method::Get, "/index.html") => Ok(serve_frontend()),

        (&Method::Post, "/api/search") => api::post_search(body.unwrap_or("{}"), config),
        (&Method::Get, "/api/history") => api::get_history(url),
        (&Method::Get, "/api/health") => api::get_health(config),

        _ => Ok(not_found()),
    }
}

// ---------------------------------------------------------------------------
// Response helpers
// ---------------------------------------------------------------------------

fn serve_frontend() -> HttpResponse {
    Response::from_data(frontend::INDEX_HTML.as_bytes().to_vec())
        .with_header(content_type_html())
        .with_status_code(StatusCode(200))
}

fn not_found() -> HttpResponse {
    json_error(404, "not found")
}

fn error_response(error: &ApiError) -> HttpResponse {
    json_error(error.status(), &error.to_string())
}

fn json_error(status: u16, message: &str) -> HttpResponse {
    let body = serde_json::json!({ "error": message }).to_string();
    Response::from_data(body.into_bytes())
        .with_header(content_type_json())
        .with_status_code(StatusCode(status))
}

/// JSON content type header.
pub(crate) fn content_type_json() -> Header {
    Header::from_bytes("Content-Type", "application/json; charset=utf-8")
        .expect("static header is valid")
}

/// HTML content type header.
fn content_type_html() -> Header {
    Header::from_bytes("Content-Type", "text/html; charset=utf-8").expect("static header is valid")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
