use std::fs::{self, OpenOptions, create_dir_all};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::client::FetchError;
use crate::record::AccidentRecord;

// ---------------------------------------------------------------------------
// Query log entry (JSONL)
// ---------------------------------------------------------------------------

/// A single entry in the query log (`~/.crashscope/query-log.jsonl`).
///
/// One line per submitted search: what was sent, how it ended and how long
/// the service took. Read back by the reporter for `crashscope history`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryLogEntry {
    pub timestamp: String,
    /// The request body exactly as sent (non-empty filters only).
    #[serde(default)]
    pub filters: Map<String, Value>,
    /// `"ok"` or `"error"`.
    pub outcome: String,
    #[serde(default)]
    pub record_count: usize,
    /// Failure category (`transport`, `status`, `invalid_format`).
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error_kind: Option<String>,
    /// User-visible error message.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
    pub latency_ms: u64,
}

impl QueryLogEntry {
    /// Build an entry stamped with the current time.
    pub fn new(
        filters: &Map<String, Value>,
        result: &Result<Vec<AccidentRecord>, FetchError>,
        latency_ms: u64,
    ) -> Self {
        let (outcome, record_count, error_kind, error) = match result {
            Ok(records) => ("ok", records.len(), None, None),
            Err(e) => ("error", 0, Some(e.kind().to_string()), Some(e.to_string())),
        };

        Self {
            timestamp: Utc::now().to_rfc3339(),
            filters: filters.clone(),
            outcome: outcome.to_string(),
            record_count,
            error_kind,
            error,
            latency_ms,
        }
    }

    pub fn succeeded(&self) -> bool {
        self.outcome == "ok"
    }
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// Append one finished search to the query log. Write failures are ignored.
pub fn log_query(
    filters: &Map<String, Value>,
    result: &Result<Vec<AccidentRecord>, FetchError>,
    latency_ms: u64,
) {
    let entry = QueryLogEntry::new(filters, result, latency_ms);
    let _ = append_log_entry(&entry);
}

// ---------------------------------------------------------------------------
// Reading log entries
// ---------------------------------------------------------------------------

/// Read all entries from the query log.
///
/// Silently skips malformed lines. Returns an empty vec if the file does not
/// exist or cannot be read.
pub fn read_all_entries() -> Vec<QueryLogEntry> {
    let Some(path) = query_log_path() else {
        return Vec::new();
    };

    let Ok(file) = fs::File::open(path) else {
        return Vec::new();
    };

    parse_entries(BufReader::new(file))
}

/// Parse JSONL, skipping lines that are not valid entries.
pub fn parse_entries(reader: impl BufRead) -> Vec<QueryLogEntry> {
    reader
        .lines()
        .map_while(Result::ok)
        .filter_map(|line| serde_json::from_str::<QueryLogEntry>(&line).ok())
        .collect()
}

/// Read log entries filtered to the last `days` days (all when `None`).
pub fn read_entries_since_days(days: Option<u32>) -> Vec<QueryLogEntry> {
    filter_since_days(read_all_entries(), days)
}

/// Keep entries whose timestamp falls within the last `days` days.
pub fn filter_since_days(entries: Vec<QueryLogEntry>, days: Option<u32>) -> Vec<QueryLogEntry> {
    let Some(days) = days else {
        return entries;
    };

    let cutoff = Utc::now() - chrono::Duration::days(i64::from(days));
    let cutoff_str = cutoff.to_rfc3339();

    entries
        .into_iter()
        .filter(|e| e.timestamp >= cutoff_str)
        .collect()
}

// ---------------------------------------------------------------------------
// File I/O
// ---------------------------------------------------------------------------

fn append_log_entry(entry: &QueryLogEntry) -> Result<()> {
    let Some(path) = query_log_path() else {
        return Ok(());
    };

    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    let json = serde_json::to_string(entry)?;
    writeln!(file, "{json}")?;

    Ok(())
}

/// Return the path to the query log file.
pub fn query_log_path() -> Option<PathBuf> {
    crate::config::data_dir().map(|dir| dir.join("query-log.jsonl"))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
