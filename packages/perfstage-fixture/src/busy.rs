//! Named busy-work generator.
//!
//! Each task is a distinct `#[inline(never)]` function item, so a sampling
//! profiler sees a stable, human-readable symbol while the task burns the
//! thread. The original browser version synthesized named functions at
//! runtime; function items are the Rust way to get the same frame identity.
//!
//! A busy task never suspends: it polls the monotonic clock until the
//! deadline passes, which keeps the host from servicing anything else for
//! the whole window. A requested duration of zero or less returns
//! immediately (the polling condition is already false).

use perfstage_loop::LoopHandle;

use crate::FixtureCx;

/// Occupies the thread until `ms` milliseconds have elapsed.
pub fn spin_for(host: &LoopHandle, ms: f64) {
    let deadline = host.now() + ms;
    while host.now() < deadline {
        std::hint::spin_loop();
    }
}

macro_rules! named_busy_tasks {
    ($($(#[$meta:meta])* $name:ident),+ $(,)?) => {$(
        $(#[$meta])*
        #[inline(never)]
        pub fn $name(cx: &FixtureCx, ms: f64) {
            let start = cx.host.now();
            spin_for(&cx.host, ms);
            cx.trace.record_task(stringify!($name), start, cx.host.now());
        }
    )+};
}

named_busy_tasks!(
    /// One short burst per pointer movement; the background interactive
    /// load that should interleave with everything else on the trace.
    move_mouse,
    // Phase A: one leading task, the timer and frame bodies, five sync tasks.
    first_task,
    work_in_timeout,
    blocked_frame_work,
    sync_work_a,
    sync_work_b,
    sync_work_c,
    sync_work_d,
    sync_work_e,
    // Phase B: around the first suspension point, the frame/timer bodies,
    // five awaited tasks.
    before_first_await,
    after_first_await,
    frame_a_work,
    frame_b_work,
    late_timer_work,
    awaited_task_a,
    awaited_task_b,
    awaited_task_c,
    awaited_task_d,
    awaited_task_e,
);
