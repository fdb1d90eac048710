use std::cell::{Cell, RefCell};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll, Waker};

use futures::task::{ArcWake, waker};

use crate::event_loop::LoopHandle;

/// Identity of a future spawned on the loop with `spawn_local`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(pub(crate) usize);

pub(crate) type LocalFuture = Pin<Box<dyn Future<Output = ()>>>;

/// Wake signals from task wakers back to the loop.
///
/// Wakers must be `Send + Sync` even though everything here stays on one
/// thread, so the signal buffer sits behind an `Arc<Mutex<..>>` and the loop
/// flushes it into the microtask queue at each pump point. A resumed future
/// is therefore a microtask, same as a Promise reaction.
#[derive(Clone, Default)]
pub(crate) struct WakeQueue {
    woken: Arc<Mutex<Vec<TaskId>>>,
}

impl WakeQueue {
    pub fn push(&self, id: TaskId) {
        self.woken.lock().unwrap().push(id);
    }

    pub fn drain(&self) -> Vec<TaskId> {
        std::mem::take(&mut *self.woken.lock().unwrap())
    }

    pub fn is_empty(&self) -> bool {
        self.woken.lock().unwrap().is_empty()
    }
}

struct TaskWaker {
    id: TaskId,
    queue: WakeQueue,
}

impl ArcWake for TaskWaker {
    fn wake_by_ref(arc_self: &Arc<Self>) {
        arc_self.queue.push(arc_self.id);
    }
}

pub(crate) fn task_waker(id: TaskId, queue: WakeQueue) -> Waker {
    waker(Arc::new(TaskWaker { id, queue }))
}

/// Future returned by [`yield_now`].
///
/// Pending exactly once, and it wakes itself before returning, so the
/// continuation is already queued as a microtask when control reaches the
/// loop. Nothing of macrotask class can run in the gap; this is the inert
/// suspension point: it hands control back without releasing the thread for
/// any externally meaningful duration.
pub struct YieldNow {
    yielded: bool,
}

/// Yield to the scheduler and resume on the next microtask opportunity.
pub fn yield_now() -> YieldNow {
    YieldNow { yielded: false }
}

impl Future for YieldNow {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let this = self.get_mut();
        if this.yielded {
            Poll::Ready(())
        } else {
            this.yielded = true;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    }
}

struct SleepShared {
    done: Cell<bool>,
    waker: RefCell<Option<Waker>>,
}

/// Future returned by [`LoopHandle::sleep`].
///
/// Registers a timer on first poll; the timer callback flips the flag and
/// wakes the task. The thread is released for the whole interval, so input,
/// frame, and timer work are all free to run in the gap.
pub struct Sleep {
    handle: LoopHandle,
    delay_ms: f64,
    shared: Option<Rc<SleepShared>>,
}

impl Sleep {
    pub(crate) fn new(handle: LoopHandle, delay_ms: f64) -> Self {
        Self {
            handle,
            delay_ms,
            shared: None,
        }
    }
}

impl Future for Sleep {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let this = self.get_mut();
        match &this.shared {
            Some(shared) if shared.done.get() => Poll::Ready(()),
            Some(shared) => {
                *shared.waker.borrow_mut() = Some(cx.waker().clone());
                Poll::Pending
            }
            None => {
                let shared = Rc::new(SleepShared {
                    done: Cell::new(false),
                    waker: RefCell::new(Some(cx.waker().clone())),
                });
                let timer_shared = shared.clone();
                this.handle.set_timeout(this.delay_ms, move || {
                    timer_shared.done.set(true);
                    if let Some(waker) = timer_shared.waker.borrow_mut().take() {
                        waker.wake();
                    }
                });
                this.shared = Some(shared);
                Poll::Pending
            }
        }
    }
}
