//! Manual test fixture for browser-style performance profilers.
//!
//! Produces a known, reproducible pattern of main-thread work, timer
//! callbacks, animation-frame callbacks, and suspension points so a
//! profiler's captured trace can be checked against an expected shape. The
//! "output" of a run is the timeline a profiler records; the [`TraceSheet`]
//! is the headless stand-in the tests assert against.
//!
//! Target environment: the `perfstage-loop` scheduler. Its documented policy
//! (microtasks drain fully between macrotasks; input > display-sync > timer
//! when several classes are due) is what the scenario's two observable
//! orderings rely on.

pub mod busy;
pub mod scenario;
pub mod session;
pub mod trace;

use perfstage_loop::LoopHandle;
use perfstage_page::Page;

use trace::TraceSheet;

/// Everything a fixture callback needs: the host loop, the page, and the
/// trace sheet. Cheap to clone into closures.
#[derive(Clone)]
pub struct FixtureCx {
    pub host: LoopHandle,
    pub page: Page,
    pub trace: TraceSheet,
}

pub use scenario::{STATUS_DONE, STATUS_RUNNING, Timings, install};
pub use session::{PointerScript, Session};
