use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::future::Future;
use std::rc::Rc;
use std::task::{Context, Poll};
use std::time::Duration;

use slab::Slab;

use crate::clock::MonotonicClock;
use crate::frame::FrameQueue;
use crate::task::{LocalFuture, Sleep, TaskId, WakeQueue, task_waker};
use crate::timers::{TimerId, TimerQueue};

const DEFAULT_FRAME_INTERVAL_MS: f64 = 1000.0 / 60.0;

enum Microtask {
    Run(Box<dyn FnOnce()>),
    Resume(TaskId),
}

struct LoopInner {
    clock: MonotonicClock,
    microtasks: RefCell<VecDeque<Microtask>>,
    woken: WakeQueue,
    tasks: RefCell<Slab<Option<LocalFuture>>>,
    timers: RefCell<TimerQueue>,
    input: RefCell<TimerQueue>,
    frames: RefCell<FrameQueue>,
    frame_interval: Cell<f64>,
    next_frame_at: Cell<f64>,
}

/// The loop itself. Owns every queue; only the thread that created it may
/// drive it or register work on it.
pub struct EventLoop {
    inner: Rc<LoopInner>,
}

/// Cheap clone handed to callbacks; all registration goes through this.
#[derive(Clone)]
pub struct LoopHandle {
    inner: Rc<LoopInner>,
}

impl EventLoop {
    pub fn new() -> Self {
        Self {
            inner: Rc::new(LoopInner {
                clock: MonotonicClock::new(),
                microtasks: RefCell::new(VecDeque::new()),
                woken: WakeQueue::default(),
                tasks: RefCell::new(Slab::new()),
                timers: RefCell::new(TimerQueue::default()),
                input: RefCell::new(TimerQueue::default()),
                frames: RefCell::new(FrameQueue::default()),
                frame_interval: Cell::new(DEFAULT_FRAME_INTERVAL_MS),
                next_frame_at: Cell::new(0.0),
            }),
        }
    }

    pub fn handle(&self) -> LoopHandle {
        LoopHandle {
            inner: self.inner.clone(),
        }
    }

    /// Changes the display refresh cadence. Takes effect from the next frame.
    pub fn set_frame_interval(&self, interval_ms: f64) {
        self.inner.frame_interval.set(interval_ms);
    }

    /// Drains microtasks, then services the highest-priority macrotask that
    /// is due right now: input first, then an animation frame batch, then a
    /// timer. Returns whether a macrotask ran.
    pub fn tick(&self) -> bool {
        let inner = &self.inner;
        inner.drain_microtasks();

        let now = inner.clock.now();

        let due_input = inner.input.borrow_mut().pop_due(now);
        if let Some(callback) = due_input {
            tracing::trace!(now, "servicing input task");
            callback();
            inner.drain_microtasks();
            return true;
        }

        if inner.frame_due(now) {
            inner.service_frame(now);
            return true;
        }

        let due_timer = inner.timers.borrow_mut().pop_due(now);
        if let Some(callback) = due_timer {
            tracing::trace!(now, "servicing timer");
            callback();
            inner.drain_microtasks();
            return true;
        }

        false
    }

    /// Runs until no input, frame, timer, or microtask work remains, putting
    /// the thread to sleep between deadlines. Futures that are parked with
    /// no pending wake source left are abandoned (nothing could ever wake
    /// them).
    pub fn run_until_idle(&self) {
        loop {
            while self.tick() {}
            match self.inner.next_wakeup() {
                Some(at) => {
                    let now = self.inner.clock.now();
                    if at > now {
                        std::thread::sleep(Duration::from_secs_f64((at - now) / 1000.0));
                    }
                }
                None => break,
            }
        }
    }

    /// True when no queue holds runnable or scheduled work.
    pub fn is_idle(&self) -> bool {
        let inner = &self.inner;
        inner.microtasks.borrow().is_empty()
            && inner.woken.is_empty()
            && inner.timers.borrow().is_empty()
            && inner.input.borrow().is_empty()
            && inner.frames.borrow().is_empty()
    }
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl LoopHandle {
    /// Milliseconds since the loop was created.
    pub fn now(&self) -> f64 {
        self.inner.clock.now()
    }

    /// Timer-class callback: fires no earlier than `delay_ms` from now, and
    /// only once the thread is idle with nothing of a higher class due.
    /// Negative delays clamp to zero.
    pub fn set_timeout(&self, delay_ms: f64, callback: impl FnOnce() + 'static) -> TimerId {
        let deadline = self.now() + delay_ms.max(0.0);
        tracing::debug!(deadline, "set_timeout");
        self.inner
            .timers
            .borrow_mut()
            .insert(deadline, Box::new(callback))
    }

    pub fn clear_timeout(&self, id: TimerId) -> bool {
        self.inner.timers.borrow_mut().remove(id)
    }

    /// Display-sync-class callback: runs at the next paint opportunity. The
    /// callback receives the frame timestamp; every callback serviced in the
    /// same frame receives the same value.
    pub fn request_animation_frame(&self, callback: impl FnOnce(f64) + 'static) -> u64 {
        tracing::debug!("request_animation_frame");
        self.inner.frames.borrow_mut().request(Box::new(callback))
    }

    /// Strict-FIFO microtask; drains before any macrotask is considered.
    pub fn queue_microtask(&self, thunk: impl FnOnce() + 'static) {
        self.inner
            .microtasks
            .borrow_mut()
            .push_back(Microtask::Run(Box::new(thunk)));
    }

    /// Input-class task arriving at `at_ms` on the loop clock. Models a user
    /// event; serviced ahead of frames and timers once due.
    pub fn post_input_at(&self, at_ms: f64, thunk: impl FnOnce() + 'static) {
        self.inner
            .input
            .borrow_mut()
            .insert(at_ms, Box::new(thunk));
    }

    /// Input-class task due immediately.
    pub fn post_input(&self, thunk: impl FnOnce() + 'static) {
        self.post_input_at(self.now(), thunk);
    }

    /// Runs a `!Send` future on the loop. The body runs synchronously up to
    /// its first suspension point, in the caller's context, the same shape
    /// as calling an async function in a browser. Every resumption after
    /// that re-enters through the microtask queue via the loop's
    /// `resume_task` frame, so a profiler attributes resumed work to the
    /// loop's resume machinery rather than to the original caller.
    pub fn spawn_local(&self, future: impl Future<Output = ()> + 'static) -> TaskId {
        let id = TaskId(self.inner.tasks.borrow_mut().insert(Some(Box::pin(future))));
        tracing::debug!(task = id.0, "spawn_local");
        self.inner.resume_task(id);
        id
    }

    /// Suspend for `delay_ms` without blocking the thread.
    pub fn sleep(&self, delay_ms: f64) -> Sleep {
        Sleep::new(self.clone(), delay_ms)
    }
}

impl LoopInner {
    fn flush_woken(&self) {
        for id in self.woken.drain() {
            self.microtasks.borrow_mut().push_back(Microtask::Resume(id));
        }
    }

    fn drain_microtasks(&self) {
        loop {
            self.flush_woken();
            let next = self.microtasks.borrow_mut().pop_front();
            match next {
                Some(Microtask::Run(thunk)) => thunk(),
                Some(Microtask::Resume(id)) => self.resume_task(id),
                None => break,
            }
        }
    }

    /// Polls a spawned future once. This frame sits on the stack under all
    /// work a resumed continuation does, which is what distinguishes resumed
    /// work from work still attributed to the spawning caller.
    fn resume_task(&self, id: TaskId) {
        let future = self
            .tasks
            .borrow_mut()
            .get_mut(id.0)
            .and_then(Option::take);
        let Some(mut future) = future else {
            // Already completed, or a stale wake. Nothing to do.
            return;
        };

        let waker = task_waker(id, self.woken.clone());
        let mut cx = Context::from_waker(&waker);
        tracing::trace!(task = id.0, "resume_task");
        match future.as_mut().poll(&mut cx) {
            Poll::Ready(()) => {
                self.tasks.borrow_mut().remove(id.0);
            }
            Poll::Pending => {
                if let Some(slot) = self.tasks.borrow_mut().get_mut(id.0) {
                    *slot = Some(future);
                }
            }
        }
    }

    fn frame_due(&self, now: f64) -> bool {
        !self.frames.borrow().is_empty() && now >= self.next_frame_at.get()
    }

    /// Services one animation frame: the batch that was pending when the
    /// frame began, all with the same timestamp. Callbacks registered while
    /// the batch runs land in the next frame.
    fn service_frame(&self, timestamp: f64) {
        let batch = self.frames.borrow_mut().take_batch();
        tracing::debug!(callbacks = batch.len(), timestamp, "servicing frame");
        for (_id, callback) in batch {
            callback(timestamp);
            self.drain_microtasks();
        }
        self.next_frame_at
            .set(self.clock.now() + self.frame_interval.get());
    }

    /// Earliest instant at which anything could run, or `None` when the loop
    /// has nothing left to wait for.
    fn next_wakeup(&self) -> Option<f64> {
        let now = self.clock.now();
        if !self.microtasks.borrow().is_empty() || !self.woken.is_empty() {
            return Some(now);
        }

        let mut next: Option<f64> = None;
        let mut merge = |candidate: f64| {
            next = Some(match next {
                Some(current) => current.min(candidate),
                None => candidate,
            });
        };

        if let Some(at) = self.input.borrow().next_deadline() {
            merge(at);
        }
        if let Some(at) = self.timers.borrow().next_deadline() {
            merge(at);
        }
        if !self.frames.borrow().is_empty() {
            merge(self.next_frame_at.get().max(now));
        }
        next
    }
}
