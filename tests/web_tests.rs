//! Dashboard server tests.
//!
//! Starts the dashboard on an ephemeral port, pointed at a stub accident
//! service, and talks to it over HTTP like the browser page does.
use std::io::Read;
use std::thread;
use std::time::Duration;

use crashscope::config::CrashscopeConfig;
use crashscope::web;
use serde_json::{Value, json};
use tiny_http::{Header, Response, Server, StatusCode};

fn upstream(status: u16, body: &'static str) -> String {
    let server = Server::http("127.0.0.1:0").unwrap();
    let port = server.server_addr().to_ip().unwrap().port();

    thread::spawn(move || {
        for mut request in server.incoming_requests() {
            let mut sink = String::new();
            let _ = request.as_reader().read_to_string(&mut sink);
            let response = Response::from_string(body)
                .with_status_code(StatusCode(status))
                .with_header(Header::from_bytes("Content-Type", "application/json").unwrap());
            let _ = request.respond(response);
        }
    });

    format!("http://127.0.0.1:{port}")
}

fn dashboard(service_url: &str) -> String {
    let mut config = CrashscopeConfig::default();
    config.service.base_url = service_url.to_string();
    config.service.timeout_ms = 5_000;
    config.history.enabled = false;

    let server = Server::http("127.0.0.1:0").unwrap();
    let port = server.server_addr().to_ip().unwrap().port();
    thread::spawn(move || web::run(server, &config));

    format!("http://127.0.0.1:{port}")
}

fn post_search(base: &str, body: &str) -> (u16, Value) {
    let result = ureq::post(&format!("{base}/api/search"))
        .timeout(Duration::from_secs(10))
        .set("Content-Type", "application/json")
        .send_string(body);

    let resp = match result {
        Ok(resp) => resp,
        Err(ureq::Error::Status(_, resp)) => resp,
        Err(e) => panic!("transport error: {e}"),
    };
    let status = resp.status();
    (status, resp.into_json().unwrap())
}

#[test]
fn search_returns_records_and_tables() {
    let service = upstream(
        200,
        r#"{"accidents": [
            {"time": "08:15", "vehicle": {"type": "Sedan"}, "damage_locations": ["FRONT", "FRONT", "REAR"]},
            {"time": "09:05", "vehicle": {"type": "Sedan"}}
        ]}"#,
    );
    let base = dashboard(&service);

    let (status, report) = post_search(&base, r#"{"vehicle_make": "ford"}"#);
    assert_eq!(status, 200);
    assert!(report["error"].is_null());
    assert_eq!(report["accidents"].as_array().unwrap().len(), 2);
    assert_eq!(
        report["analytics"]["damage_locations"],
        json!([
            { "label": "FRONT", "count": 2, "color": "#FF6384" },
            { "label": "REAR", "count": 1, "color": "#36A2EB" }
        ])
    );
    assert_eq!(
        report["analytics"]["vehicle_types"],
        json!([{ "label": "Sedan", "count": 2, "color": "#FF6384" }])
    );
}

#[test]
fn service_failure_is_reported_in_body() {
    let service = upstream(404, r#"{"detail": "no such resource"}"#);
    let base = dashboard(&service);

    let (status, report) = post_search(&base, "{}");
    assert_eq!(status, 200);
    assert_eq!(report["error"], "no such resource");
    assert_eq!(report["accidents"], json!([]));
    assert!(report["analytics"].is_null());
}

#[test]
fn malformed_request_is_400() {
    let base = dashboard("http://127.0.0.1:9");

    let (status, body) = post_search(&base, "not json");
    assert_eq!(status, 400);
    assert!(body["error"].as_str().unwrap().contains("invalid JSON"));

    let (status, body) = post_search(&base, r#"{"colour": "red"}"#);
    assert_eq!(status, 400);
    assert!(body["error"].is_string());
}

#[test]
fn page_and_unknown_routes() {
    let base = dashboard("http://127.0.0.1:9");

    let page = ureq::get(&format!("{base}/")).call().unwrap();
    assert_eq!(page.status(), 200);
    assert!(page.content_type().starts_with("text/html"));
    assert!(page.into_string().unwrap().contains("Vehicle Collision Search"));

    match ureq::get(&format!("{base}/api/nope")).call() {
        Err(ureq::Error::Status(404, _)) => {}
        other => panic!("expected 404, got {other:?}"),
    }
}

#[test]
fn health_reports_service_reachability() {
    let service = upstream(200, "{}");
    let base = dashboard(&service);

    let health: Value = ureq::get(&format!("{base}/api/health"))
        .call()
        .unwrap()
        .into_json()
        .unwrap();
    assert_eq!(health["service_reachable"], true);
    assert_eq!(health["history_enabled"], false);
    assert_eq!(
        health["service_url"],
        format!("{service}/api/accidents").as_str()
    );
}
