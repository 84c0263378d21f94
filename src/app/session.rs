//! Drives submissions through the state container.
//!
//! A [`Session`] owns an [`AccidentSource`] and runs the fetch effect that
//! [`Event::Submit`] produces, feeding the result back as
//! [`Event::FetchCompleted`]. Each finished submission is appended to the
//! query history when that is enabled.
use std::time::Instant;

use super::{AppState, Effect, Event};
use crate::client::AccidentSource;
use crate::history::logger;

pub struct Session<S> {
    source: S,
    record_history: bool,
}

impl<S: AccidentSource> Session<S> {
    /// A session with history logging off.
    pub fn new(source: S) -> Self {
        Self {
            source,
            record_history: false,
        }
    }

    pub fn with_history(mut self, enabled: bool) -> Self {
        self.record_history = enabled;
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Submit the current filters and wait for the result.
    ///
    /// Exactly one request is sent. Whatever happens, the returned state is
    /// no longer loading.
    pub fn submit(&self, state: AppState) -> AppState {
        let (mut state, mut effect) = state.update(Event::Submit);

        while let Some(Effect::Fetch { submission, payload }) = effect {
            let start = Instant::now();
            let result = self.source.fetch(&payload);
            let latency_ms = start.elapsed().as_millis() as u64;

            if self.record_history {
                logger::log_query(&payload, &result, latency_ms);
            }

            (state, effect) = state.update(Event::FetchCompleted { submission, result });
        }

        state
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
