//! Extraction decision trail, collected per file instead of logged globally.

use serde::Serialize;

/// One recorded decision: which stage made it and what it was.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TraceEvent {
    pub stage: String,
    pub detail: String,
}

/// Collector handed into each extraction call. Callers that do not care
/// pass a fresh one and drop it; tests assert on the decisions made
/// without capturing stdout. Events also go to the `tracing` subscriber
/// at debug level.
#[derive(Debug, Clone, Default)]
pub struct ParseTrace {
    events: Vec<TraceEvent>,
}

impl ParseTrace {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn note(&mut self, stage: &str, detail: impl Into<String>) {
        let detail = detail.into();
        tracing::debug!(stage, detail = %detail);
        self.events.push(TraceEvent {
            stage: stage.to_string(),
            detail,
        });
    }

    pub fn events(&self) -> &[TraceEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<TraceEvent> {
        self.events
    }

    /// First recorded detail for a stage, if any.
    pub fn detail_for(&self, stage: &str) -> Option<&str> {
        self.events
            .iter()
            .find(|e| e.stage == stage)
            .map(|e| e.detail.as_str())
    }
}
