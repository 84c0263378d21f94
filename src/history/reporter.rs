//! Query history reporter.
//!
//! Summarizes the query log for `crashscope history` and the dashboard's
//! `/api/history`: outcome counts, latency and result-size averages, which
//! filters get used, and the most recent searches.

use std::collections::HashMap;

use serde::Serialize;

use crate::filter::FilterField;
use crate::history::logger::{self, QueryLogEntry};

/// How many recent searches the summary carries.
const RECENT_LIMIT: usize = 10;

/// Aggregated view of the query log.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistorySummary {
    pub total_queries: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub avg_latency_ms: f64,
    /// Average record count over successful searches.
    pub avg_records: f64,
    /// Filter usage, most used first; unused fields are left out.
    pub field_usage: Vec<FieldUsage>,
    /// Failure categories, most frequent first.
    pub error_kinds: Vec<(String, usize)>,
    /// Newest first.
    pub recent: Vec<QueryLogEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldUsage {
    pub field: String,
    pub count: usize,
}

impl HistorySummary {
    pub fn success_pct(&self) -> f64 {
        if self.total_queries == 0 {
            0.0
        } else {
            (self.succeeded as f64 / self.total_queries as f64) * 100.0
        }
    }
}

/// Summarize the query log, optionally limited to the last `days` days.
pub fn compute_summary(days: Option<u32>) -> HistorySummary {
    let entries = logger::read_entries_since_days(days);
    build_summary(&entries)
}

pub fn build_summary(entries: &[QueryLogEntry]) -> HistorySummary {
    let total_queries = entries.len();
    let succeeded = entries.iter().filter(|e| e.succeeded()).count();
    let failed = total_queries - succeeded;

    let avg_latency_ms = if total_queries == 0 {
        0.0
    } else {
        entries.iter().map(|e| e.latency_ms as f64).sum::<f64>() / total_queries as f64
    };

    let avg_records = if succeeded == 0 {
        0.0
    } else {
        entries
            .iter()
            .filter(|e| e.succeeded())
            .map(|e| e.record_count as f64)
            .sum::<f64>()
            / succeeded as f64
    };

    let mut recent: Vec<QueryLogEntry> = entries.iter().rev().take(RECENT_LIMIT).cloned().collect();
    recent.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));

    HistorySummary {
        total_queries,
        succeeded,
        failed,
        avg_latency_ms,
        avg_records,
        field_usage: compute_field_usage(entries),
        error_kinds: compute_error_kinds(entries),
        recent,
    }
}

/// Count how often each filter field was sent, in descending order.
///
/// Ties keep the canonical field order.
fn compute_field_usage(entries: &[QueryLogEntry]) -> Vec<FieldUsage> {
    let mut usage: Vec<FieldUsage> = FilterField::ALL
        .iter()
        .map(|field| FieldUsage {
            field: field.wire_name().to_string(),
            count: entries
                .iter()
                .filter(|e| e.filters.contains_key(field.wire_name()))
                .count(),
        })
        .filter(|u| u.count > 0)
        .collect();

    usage.sort_by(|a, b| b.count.cmp(&a.count));
    usage
}

fn compute_error_kinds(entries: &[QueryLogEntry]) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for kind in entries.iter().filter_map(|e| e.error_kind.as_deref()) {
        *counts.entry(kind).or_default() += 1;
    }

    let mut kinds: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(kind, count)| (kind.to_string(), count))
        .collect();
    kinds.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    kinds
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
