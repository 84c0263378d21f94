//! Search page state container.
//!
//! All mutable page state lives in one [`AppState`] value that is consumed
//! and replaced by [`AppState::update`] for every [`Event`]. Side effects are
//! returned as [`Effect`]s for the caller to run, so the state machine itself
//! never touches the network.
//!
//! Each submit gets a fresh submission id. A completion carrying an older id
//! belongs to a superseded search and is dropped, so a slow response can
//! never overwrite the results of a newer one.

pub mod session;

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::aggregate::{self, Aggregates};
use crate::client::FetchError;
use crate::filter::{FilterCriteria, FilterField};
use crate::record::AccidentRecord;

/// Shown when a search finished without records or error.
pub const EMPTY_STATE_MESSAGE: &str =
    "No accidents found. Use the filters to search for accidents.";

// ---------------------------------------------------------------------------
// View mode
// ---------------------------------------------------------------------------

/// Which derived state the presentation layer shows.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewMode {
    /// One card per record.
    #[default]
    Detail,
    /// Four chart widgets built from the frequency tables.
    Analytics,
}

impl fmt::Display for ViewMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Detail => write!(f, "detail"),
            Self::Analytics => write!(f, "analytics"),
        }
    }
}

// ---------------------------------------------------------------------------
// Events and effects
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub enum Event {
    /// User edited one filter field.
    FieldChanged { field: FilterField, value: String },
    /// User submitted the form.
    Submit,
    /// A fetch started by `Submit` finished.
    FetchCompleted {
        submission: u64,
        result: Result<Vec<AccidentRecord>, FetchError>,
    },
    /// User switched between detail and analytics.
    SetView(ViewMode),
}

/// Work the caller must perform after an update.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Send `payload` to the accident service and report back with
    /// [`Event::FetchCompleted`] carrying `submission`.
    Fetch {
        submission: u64,
        payload: Map<String, Value>,
    },
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Default)]
pub struct AppState {
    filters: FilterCriteria,
    records: Vec<AccidentRecord>,
    loading: bool,
    error: Option<String>,
    view: ViewMode,
    aggregates: Option<Aggregates>,
    latest_submission: u64,
}

/// What the page should show right now.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Screen<'a> {
    Error(&'a str),
    Loading,
    Empty,
    Results(&'a [AccidentRecord]),
}

impl AppState {
    pub fn new(view: ViewMode) -> Self {
        Self {
            view,
            ..Self::default()
        }
    }

    /// Apply one event, returning the next state and any effect to run.
    pub fn update(mut self, event: Event) -> (Self, Option<Effect>) {
        match event {
            Event::FieldChanged { field, value } => {
                self.filters.set(field, &value);
                (self, None)
            }
            Event::Submit => {
                self.latest_submission += 1;
                self.loading = true;
                self.error = None;
                self.records = Vec::new();
                self.aggregates = None;
                let effect = Effect::Fetch {
                    submission: self.latest_submission,
                    payload: self.filters.payload(),
                };
                (self, Some(effect))
            }
            Event::FetchCompleted { submission, result } => {
                if submission != self.latest_submission {
                    return (self, None);
                }
                self.loading = false;
                match result {
                    Ok(records) => {
                        self.aggregates = Some(aggregate::aggregate(&records));
                        self.records = records;
                    }
                    Err(err) => self.error = Some(err.to_string()),
                }
                (self, None)
            }
            Event::SetView(view) => {
                self.view = view;
                (self, None)
            }
        }
    }

    pub fn filters(&self) -> &FilterCriteria {
        &self.filters
    }

    pub fn records(&self) -> &[AccidentRecord] {
        &self.records
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn view(&self) -> ViewMode {
        self.view
    }

    /// Frequency tables for the current records, `None` until a search
    /// has succeeded.
    pub fn aggregates(&self) -> Option<&Aggregates> {
        self.aggregates.as_ref()
    }

    pub fn latest_submission(&self) -> u64 {
        self.latest_submission
    }

    /// Select the screen from (records-empty, loading, error-present).
    pub fn screen(&self) -> Screen<'_> {
        if let Some(error) = self.error.as_deref() {
            Screen::Error(error)
        } else if self.loading {
            Screen::Loading
        } else if self.records.is_empty() {
            Screen::Empty
        } else {
            Screen::Results(&self.records)
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn submit(state: AppState) -> (AppState, u64) {
        let (state, effect) = state.update(Event::Submit);
        match effect {
            Some(Effect::Fetch { submission, .. }) => (state, submission),
            None => panic!("submit must emit a fetch"),
        }
    }

    fn records(n: usize) -> Vec<AccidentRecord> {
        (0..n)
            .map(|i| AccidentRecord::from_value(json!({ "time": format!("{:02}:10", i) })))
            .collect()
    }

    #[test]
    fn initial_state_is_empty() {
        let state = AppState::new(ViewMode::Analytics);
        assert_eq!(state.screen(), Screen::Empty);
        assert_eq!(state.view(), ViewMode::Analytics);
        assert!(state.aggregates().is_none());
    }

    #[test]
    fn field_change_updates_filters() {
        let (state, effect) = AppState::default().update(Event::FieldChanged {
            field: FilterField::VehicleMake,
            value: "ford".into(),
        });
        assert!(effect.is_none());
        assert_eq!(state.filters().get(FilterField::VehicleMake), "FORD");
    }

    #[test]
    fn submit_emits_payload_and_sets_loading() {
        let (state, _) = AppState::default().update(Event::FieldChanged {
            field: FilterField::DriverSex,
            value: "F".into(),
        });
        let (state, effect) = state.update(Event::Submit);
        assert!(state.is_loading());
        assert_eq!(state.screen(), Screen::Loading);

        let Some(Effect::Fetch { submission, payload }) = effect else {
            panic!("expected fetch effect");
        };
        assert_eq!(submission, 1);
        assert_eq!(payload.len(), 1);
        assert_eq!(payload["driver_sex"], "F");
    }

    #[test]
    fn submit_clears_previous_error_and_results() {
        let (state, id) = submit(AppState::default());
        let (state, _) = state.update(Event::FetchCompleted {
            submission: id,
            result: Ok(records(2)),
        });
        assert_eq!(state.records().len(), 2);

        let (state, id) = submit(state);
        assert!(state.records().is_empty());
        assert!(state.aggregates().is_none());
        let (state, _) = state.update(Event::FetchCompleted {
            submission: id,
            result: Err(FetchError::InvalidFormat),
        });
        assert_eq!(
            state.screen(),
            Screen::Error("Invalid data format received from server")
        );

        let (state, _) = submit(state);
        assert!(state.error().is_none());
    }

    #[test]
    fn success_replaces_records_and_builds_tables() {
        let (state, id) = submit(AppState::default());
        let (state, _) = state.update(Event::FetchCompleted {
            submission: id,
            result: Ok(records(3)),
        });
        assert!(!state.is_loading());
        assert!(matches!(state.screen(), Screen::Results(r) if r.len() == 3));
        assert_eq!(state.aggregates().unwrap().vehicle_types.total(), 3);
    }

    #[test]
    fn empty_success_shows_empty_state() {
        let (state, id) = submit(AppState::default());
        let (state, _) = state.update(Event::FetchCompleted {
            submission: id,
            result: Ok(Vec::new()),
        });
        assert_eq!(state.screen(), Screen::Empty);
        assert!(state.error().is_none());
        assert!(state.aggregates().is_some());
    }

    #[test]
    fn failure_clears_loading() {
        let (state, id) = submit(AppState::default());
        let (state, _) = state.update(Event::FetchCompleted {
            submission: id,
            result: Err(FetchError::Transport {
                message: "connection refused".into(),
            }),
        });
        assert!(!state.is_loading());
        assert_eq!(state.error(), Some("connection refused"));
    }

    #[test]
    fn superseded_completion_is_dropped() {
        let (state, first) = submit(AppState::default());
        let (state, second) = submit(state);
        assert_ne!(first, second);

        let (state, _) = state.update(Event::FetchCompleted {
            submission: first,
            result: Ok(records(5)),
        });
        assert!(state.is_loading());
        assert!(state.records().is_empty());

        let (state, _) = state.update(Event::FetchCompleted {
            submission: second,
            result: Ok(records(1)),
        });
        assert_eq!(state.records().len(), 1);

        // A straggler arriving after the latest result changes nothing.
        let (state, _) = state.update(Event::FetchCompleted {
            submission: first,
            result: Err(FetchError::InvalidFormat),
        });
        assert!(state.error().is_none());
        assert_eq!(state.records().len(), 1);
    }

    #[test]
    fn switching_view_keeps_derived_state() {
        let (state, id) = submit(AppState::default());
        let (state, _) = state.update(Event::FetchCompleted {
            submission: id,
            result: Ok(records(2)),
        });
        let before = state.aggregates().cloned();
        let (state, effect) = state.update(Event::SetView(ViewMode::Analytics));
        assert!(effect.is_none());
        assert_eq!(state.view(), ViewMode::Analytics);
        assert_eq!(state.aggregates().cloned(), before);
        assert_eq!(state.records().len(), 2);
    }

    #[test]
    fn view_mode_display() {
        assert_eq!(ViewMode::Detail.to_string(), "detail");
        assert_eq!(ViewMode::Analytics.to_string(), "analytics");
    }
}
