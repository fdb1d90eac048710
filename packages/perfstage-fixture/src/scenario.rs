//! The scenario driver: the fixed choreography the profiler trace is
//! checked against.
//!
//! Two observable properties fall out of the host's scheduling policy rather
//! than anything enforced here:
//!
//! 1. After the blocked phase, its frame callback is serviced before its
//!    timer callback even though the timer's nominal delay was shorter than
//!    the busy stretch that delayed both.
//! 2. In the awaited phase, both frame callbacks coalesce into one frame
//!    (serviced after all five awaited tasks, since the yields never release
//!    the thread long enough for a paint), and the timer fires last.

use std::rc::Rc;

use perfstage_loop::yield_now;
use perfstage_page::EventKind;

use crate::FixtureCx;
use crate::busy;

pub const STATUS_RUNNING: &str =
    "Running the test, move your mouse continuously for a couple of seconds.";
pub const STATUS_DONE: &str = "Done running tests. Capture the profile. Refresh to try again.";

/// Durations for one scenario run, in milliseconds.
///
/// `Default` is the shape the fixture is meant to be profiled with; tests
/// may scale everything down, the orderings only depend on the ratios.
#[derive(Debug, Clone, Copy)]
pub struct Timings {
    /// Length of every scenario busy task.
    pub busy_ms: f64,
    /// Work done per pointer movement.
    pub pointer_busy_ms: f64,
    /// Nominal delay requested for both timer callbacks.
    pub timer_delay_ms: f64,
    /// Idle gap between the two phases.
    pub pause_ms: f64,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            busy_ms: 100.0,
            pointer_busy_ms: 10.0,
            timer_delay_ms: 100.0,
            pause_ms: 1000.0,
        }
    }
}

/// Attaches the fixture's two listeners to the page.
///
/// Pointer movement: 10ms of named work per event, never throttled or
/// batched. Click: starts one scenario run, unless the target is a
/// hyperlink, which is ignored entirely. Nothing guards against a second
/// click starting an overlapping run; this is a manual test tool.
pub fn install(cx: &FixtureCx, timings: Timings) {
    let move_cx = cx.clone();
    cx.page.add_event_listener(
        EventKind::PointerMove,
        Rc::new(move |_event| {
            busy::move_mouse(&move_cx, timings.pointer_busy_ms);
        }),
    );

    let click_cx = cx.clone();
    cx.page.add_event_listener(
        EventKind::Click,
        Rc::new(move |event| {
            match click_cx.page.element_kind(event.target) {
                Ok(kind) if kind.is_hyperlink() => {
                    tracing::debug!("click on a hyperlink, ignoring");
                    return;
                }
                Ok(_) => {}
                Err(err) => {
                    tracing::warn!(%err, "click with unknown target, ignoring");
                    return;
                }
            }
            let cx = click_cx.clone();
            click_cx.host.spawn_local(run_scenario(cx, timings));
        }),
    );
}

async fn run_scenario(cx: FixtureCx, timings: Timings) {
    tracing::info!("scenario started");
    cx.page.set_status(STATUS_RUNNING);
    cx.trace.marker("status-running", cx.host.now());

    // Fully synchronous phase: lots of CPU work with a timer and a frame
    // callback registered mid-stream.
    blocked_event_loop(&cx, timings);

    // Idle gap. The thread is released, so the phase's frame and timer
    // callbacks (and any pointer work) run in here.
    cx.host.sleep(timings.pause_ms).await;

    // Awaited phase: same amount of work, threaded through suspension
    // points.
    awaited_event_loop(cx.clone(), timings).await;

    cx.page.set_status(STATUS_DONE);
    cx.trace.marker("status-done", cx.host.now());
    tracing::info!("scenario finished");
}

/// Phase A: runs without a single yield until it returns.
///
/// The five trailing tasks keep the thread occupied long past the timer's
/// nominal deadline, so when the thread finally idles both callbacks are
/// ready and class priority decides: frame first, timer after.
fn blocked_event_loop(cx: &FixtureCx, timings: Timings) {
    busy::first_task(cx, timings.busy_ms);

    let timer_cx = cx.clone();
    cx.host.set_timeout(timings.timer_delay_ms, move || {
        busy::work_in_timeout(&timer_cx, timings.busy_ms);
    });

    let frame_cx = cx.clone();
    cx.host.request_animation_frame(move |timestamp| {
        frame_cx.trace.frame("blocked-frame", timestamp);
        busy::blocked_frame_work(&frame_cx, timings.busy_ms);
    });

    busy::sync_work_a(cx, timings.busy_ms);
    busy::sync_work_b(cx, timings.busy_ms);
    busy::sync_work_c(cx, timings.busy_ms);
    busy::sync_work_d(cx, timings.busy_ms);
    busy::sync_work_e(cx, timings.busy_ms);
}

/// Phase B: the same workload threaded through suspension points.
///
/// Every yield resumes as a microtask, so despite five suspend/resume
/// cycles the thread never idles until the last awaited task completes;
/// only then are the two frame callbacks (one batch) and the timer
/// serviced.
async fn awaited_event_loop(cx: FixtureCx, timings: Timings) {
    // Still in the caller's context; a profiler attributes this task to the
    // scenario itself.
    busy::before_first_await(&cx, timings.busy_ms);

    yield_now().await;

    // From here on the caller frame is the loop's resume machinery.
    busy::after_first_await(&cx, timings.busy_ms);

    let frame_a_cx = cx.clone();
    cx.host.request_animation_frame(move |timestamp| {
        frame_a_cx.trace.frame("frame-a", timestamp);
        busy::frame_a_work(&frame_a_cx, timings.busy_ms);
    });

    let timer_cx = cx.clone();
    cx.host.set_timeout(timings.timer_delay_ms, move || {
        busy::late_timer_work(&timer_cx, timings.busy_ms);
    });

    let frame_b_cx = cx.clone();
    cx.host.request_animation_frame(move |timestamp| {
        frame_b_cx.trace.frame("frame-b", timestamp);
        busy::frame_b_work(&frame_b_cx, timings.busy_ms);
    });

    // Expensive work with an inert suspension point before each piece. The
    // yields hand control back but resume immediately, so the pending frame
    // and timer callbacks stay blocked throughout.
    yield_now().await;
    busy::awaited_task_a(&cx, timings.busy_ms);
    yield_now().await;
    busy::awaited_task_b(&cx, timings.busy_ms);
    yield_now().await;
    busy::awaited_task_c(&cx, timings.busy_ms);
    yield_now().await;
    busy::awaited_task_d(&cx, timings.busy_ms);
    yield_now().await;
    busy::awaited_task_e(&cx, timings.busy_ms);
}
