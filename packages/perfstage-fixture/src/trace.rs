use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;

/// One observable occurrence on the fixture's timeline.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TraceEvent {
    /// A named busy task occupied the thread from `start_ms` to `end_ms`.
    Task {
        label: String,
        start_ms: f64,
        end_ms: f64,
    },
    /// An instantaneous point of interest (status transitions, boundaries).
    Marker { label: String, at_ms: f64 },
    /// A display-sync callback fired; callbacks serviced in the same frame
    /// carry the same timestamp.
    Frame { label: String, timestamp_ms: f64 },
}

/// Headless stand-in for a profiler capture.
///
/// The real deliverable of a fixture run is whatever an external profiler
/// records; tests can't see that, so every busy task, status transition,
/// and frame callback also lands here. Clone handle, single-threaded.
#[derive(Clone, Default)]
pub struct TraceSheet {
    events: Rc<RefCell<Vec<TraceEvent>>>,
}

impl TraceSheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_task(&self, label: &str, start_ms: f64, end_ms: f64) {
        tracing::debug!(label, start_ms, end_ms, "busy task");
        self.events.borrow_mut().push(TraceEvent::Task {
            label: label.to_string(),
            start_ms,
            end_ms,
        });
    }

    pub fn marker(&self, label: &str, at_ms: f64) {
        self.events.borrow_mut().push(TraceEvent::Marker {
            label: label.to_string(),
            at_ms,
        });
    }

    pub fn frame(&self, label: &str, timestamp_ms: f64) {
        self.events.borrow_mut().push(TraceEvent::Frame {
            label: label.to_string(),
            timestamp_ms,
        });
    }

    pub fn events(&self) -> Vec<TraceEvent> {
        self.events.borrow().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    /// Start time of the first task recorded under `label`.
    pub fn task_start(&self, label: &str) -> Option<f64> {
        self.events.borrow().iter().find_map(|event| match event {
            TraceEvent::Task {
                label: l, start_ms, ..
            } if l == label => Some(*start_ms),
            _ => None,
        })
    }

    /// End time of the first task recorded under `label`.
    pub fn task_end(&self, label: &str) -> Option<f64> {
        self.events.borrow().iter().find_map(|event| match event {
            TraceEvent::Task {
                label: l, end_ms, ..
            } if l == label => Some(*end_ms),
            _ => None,
        })
    }

    pub fn marker_at(&self, label: &str) -> Option<f64> {
        self.events.borrow().iter().find_map(|event| match event {
            TraceEvent::Marker { label: l, at_ms } if l == label => Some(*at_ms),
            _ => None,
        })
    }

    pub fn frame_timestamp(&self, label: &str) -> Option<f64> {
        self.events.borrow().iter().find_map(|event| match event {
            TraceEvent::Frame {
                label: l,
                timestamp_ms,
            } if l == label => Some(*timestamp_ms),
            _ => None,
        })
    }

    /// How many tasks were recorded under `label`.
    pub fn task_count(&self, label: &str) -> usize {
        self.events
            .borrow()
            .iter()
            .filter(|event| matches!(event, TraceEvent::Task { label: l, .. } if l == label))
            .count()
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&*self.events.borrow())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn queries_find_first_matching_event() {
        let sheet = TraceSheet::new();
        sheet.record_task("work", 1.0, 2.0);
        sheet.record_task("work", 5.0, 6.0);
        sheet.marker("boundary", 3.0);
        sheet.frame("frame-a", 4.0);

        assert_eq!(sheet.task_start("work"), Some(1.0));
        assert_eq!(sheet.task_end("work"), Some(2.0));
        assert_eq!(sheet.task_count("work"), 2);
        assert_eq!(sheet.marker_at("boundary"), Some(3.0));
        assert_eq!(sheet.frame_timestamp("frame-a"), Some(4.0));
        assert_eq!(sheet.task_start("missing"), None);
    }

    #[test]
    fn serializes_to_tagged_json() {
        let sheet = TraceSheet::new();
        sheet.marker("boundary", 3.0);
        let json = sheet.to_json().unwrap();
        assert!(json.contains("\"kind\": \"marker\""));
        assert!(json.contains("\"boundary\""));
    }
}
