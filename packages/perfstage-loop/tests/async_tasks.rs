use perfstage_loop::{EventLoop, yield_now};
use std::cell::RefCell;
use std::rc::Rc;

#[test]
fn spawned_future_runs_synchronously_until_first_yield() {
    let event_loop = EventLoop::new();
    let handle = event_loop.handle();
    let log = Rc::new(RefCell::new(Vec::new()));

    log.borrow_mut().push("before-spawn");
    {
        let log = log.clone();
        handle.spawn_local(async move {
            log.borrow_mut().push("body");
            yield_now().await;
            log.borrow_mut().push("resumed");
        });
    }
    log.borrow_mut().push("after-spawn");

    // The body up to the first suspension point ran inside spawn_local; the
    // continuation only runs once the loop is driven.
    assert_eq!(*log.borrow(), vec!["before-spawn", "body", "after-spawn"]);

    event_loop.run_until_idle();
    assert_eq!(
        *log.borrow(),
        vec!["before-spawn", "body", "after-spawn", "resumed"]
    );
}

#[test]
fn yield_resumes_as_microtask_ahead_of_due_timer() {
    let event_loop = EventLoop::new();
    let handle = event_loop.handle();
    let log = Rc::new(RefCell::new(Vec::new()));

    {
        let log = log.clone();
        handle.set_timeout(0.0, move || log.borrow_mut().push("timer"));
    }
    {
        let log = log.clone();
        handle.spawn_local(async move {
            yield_now().await;
            log.borrow_mut().push("resumed");
        });
    }

    event_loop.run_until_idle();
    assert_eq!(*log.borrow(), vec!["resumed", "timer"]);
}

#[test]
fn chained_yields_stay_in_one_microtask_drain() {
    // Five yield/resume cycles with a frame callback pending the whole time:
    // the frame must not be serviced between any of them.
    let event_loop = EventLoop::new();
    let handle = event_loop.handle();
    let log = Rc::new(RefCell::new(Vec::new()));

    {
        let log = log.clone();
        handle.request_animation_frame(move |_| log.borrow_mut().push("frame"));
    }
    {
        let log = log.clone();
        handle.spawn_local(async move {
            for _ in 0..5 {
                yield_now().await;
                log.borrow_mut().push("step");
            }
        });
    }

    event_loop.run_until_idle();
    assert_eq!(
        *log.borrow(),
        vec!["step", "step", "step", "step", "step", "frame"]
    );
}

#[test]
fn sleep_suspends_for_at_least_the_requested_interval() {
    let event_loop = EventLoop::new();
    let handle = event_loop.handle();
    let woke_at = Rc::new(RefCell::new(None));

    {
        let woke_at = woke_at.clone();
        let probe = handle.clone();
        handle.spawn_local(async move {
            probe.sleep(30.0).await;
            *woke_at.borrow_mut() = Some(probe.now());
        });
    }

    event_loop.run_until_idle();
    assert!(woke_at.borrow().expect("sleep completed") >= 30.0);
}

#[test]
fn sleep_releases_the_thread_for_other_work() {
    let event_loop = EventLoop::new();
    let handle = event_loop.handle();
    let log = Rc::new(RefCell::new(Vec::new()));

    {
        let log = log.clone();
        let probe = handle.clone();
        handle.spawn_local(async move {
            probe.sleep(40.0).await;
            log.borrow_mut().push("woke");
        });
    }
    {
        let log = log.clone();
        handle.post_input_at(2.0, move || log.borrow_mut().push("input"));
    }
    {
        let log = log.clone();
        handle.set_timeout(20.0, move || log.borrow_mut().push("timer"));
    }

    event_loop.run_until_idle();
    assert_eq!(*log.borrow(), vec!["input", "timer", "woke"]);
}
