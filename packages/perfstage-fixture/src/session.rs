//! Scripted replacement for the human tester.
//!
//! The original fixture relies on someone moving the mouse and clicking.
//! Headless runs declare that activity up front as a [`PointerScript`]; the
//! [`Session`] posts every scripted event to the loop's input class at its
//! timestamp and then drives the loop to idle.

use perfstage_loop::EventLoop;
use perfstage_page::{ElementId, InputEvent, Page};

use crate::scenario::{self, Timings};
use crate::trace::TraceSheet;
use crate::FixtureCx;

/// Pointer activity declared ahead of a run.
#[derive(Default)]
pub struct PointerScript {
    events: Vec<(f64, InputEvent)>,
}

impl PointerScript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pointer movements over `target` at a fixed cadence across
    /// `[start_ms, end_ms)`.
    pub fn moves(mut self, start_ms: f64, end_ms: f64, interval_ms: f64, target: ElementId) -> Self {
        let mut at = start_ms;
        while at < end_ms {
            self.events.push((at, InputEvent::pointer_move(target, at, at)));
            at += interval_ms;
        }
        self
    }

    /// A primary activation on `target` at `at_ms`.
    pub fn click(mut self, at_ms: f64, target: ElementId) -> Self {
        self.events.push((at_ms, InputEvent::click(target, 0.0, 0.0)));
        self
    }

    fn into_events(self) -> Vec<(f64, InputEvent)> {
        self.events
    }
}

/// One wired-up fixture: loop + page + scenario listeners + trace sheet.
pub struct Session {
    event_loop: EventLoop,
    cx: FixtureCx,
}

impl Session {
    pub fn new(timings: Timings) -> Self {
        let event_loop = EventLoop::new();
        let cx = FixtureCx {
            host: event_loop.handle(),
            page: Page::new(),
            trace: TraceSheet::new(),
        };
        scenario::install(&cx, timings);
        Self { event_loop, cx }
    }

    pub fn cx(&self) -> &FixtureCx {
        &self.cx
    }

    pub fn page(&self) -> &Page {
        &self.cx.page
    }

    pub fn set_frame_interval(&self, interval_ms: f64) {
        self.event_loop.set_frame_interval(interval_ms);
    }

    /// Posts the script to the loop's input class and runs to idle.
    /// Returns the recorded trace.
    pub fn run(&self, script: PointerScript) -> TraceSheet {
        for (at_ms, event) in script.into_events() {
            let page = self.cx.page.clone();
            self.cx.host.post_input_at(at_ms, move || {
                if let Err(err) = page.dispatch(&event) {
                    tracing::warn!(%err, "dropped scripted input event");
                }
            });
        }
        self.event_loop.run_until_idle();
        self.cx.trace.clone()
    }
}
