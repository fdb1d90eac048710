//! A single-threaded, browser-style event loop.
//!
//! This crate is the "host environment" the perfstage fixture runs against.
//! It reproduces the scheduling policy a browser main thread exposes to page
//! script, with three macrotask classes and a microtask queue:
//!
//! - **Input tasks** (`post_input_at`): user events; highest priority.
//! - **Display-sync callbacks** (`request_animation_frame`): serviced when
//!   the thread is idle at a paint opportunity; all callbacks in one frame
//!   see the same timestamp.
//! - **Timer callbacks** (`set_timeout`): fire no earlier than requested,
//!   and only once nothing of a higher class is due. Lowest priority.
//!
//! Microtasks (`queue_microtask`, and the wakes of futures spawned with
//! `spawn_local`) drain completely after every callback, before the next
//! macrotask is selected. That rule is what makes the `yield_now` suspension
//! point "inert": a yielded future resumes before any frame or timer can be
//! serviced.

pub mod clock;
pub mod event_loop;
pub mod frame;
pub mod task;
pub mod timers;

pub use clock::MonotonicClock;
pub use event_loop::{EventLoop, LoopHandle};
pub use task::{Sleep, TaskId, YieldNow, yield_now};
pub use timers::TimerId;
