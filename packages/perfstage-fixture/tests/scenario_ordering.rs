use perfstage_fixture::{PointerScript, STATUS_DONE, Session, Timings};
use perfstage_page::ElementKind;

// Scaled-down timings: the orderings only depend on the ratios, and these
// keep the suite fast. The full-duration run lives in end_to_end.rs.
fn scaled() -> Timings {
    Timings {
        busy_ms: 20.0,
        pointer_busy_ms: 2.0,
        timer_delay_ms: 20.0,
        pause_ms: 100.0,
    }
}

#[test]
fn hyperlink_click_starts_nothing() {
    let session = Session::new(scaled());
    let link = session.page().create_element(ElementKind::Anchor, "a link");

    let trace = session.run(PointerScript::new().click(5.0, link));

    assert_eq!(session.page().status(), "");
    assert!(trace.is_empty(), "hyperlink click recorded trace events");
}

#[test]
fn any_non_hyperlink_target_is_a_valid_trigger() {
    let session = Session::new(scaled());
    let button = session.page().create_element(ElementKind::Button, "go");

    let trace = session.run(PointerScript::new().click(5.0, button));

    assert_eq!(session.page().status(), STATUS_DONE);
    assert_eq!(trace.task_count("first_task"), 1);
}

#[test]
fn scenario_runs_every_named_task_once() {
    let session = Session::new(scaled());
    let body = session.page().body();

    let trace = session.run(PointerScript::new().click(5.0, body));

    for label in [
        "first_task",
        "work_in_timeout",
        "blocked_frame_work",
        "sync_work_a",
        "sync_work_b",
        "sync_work_c",
        "sync_work_d",
        "sync_work_e",
        "before_first_await",
        "after_first_await",
        "frame_a_work",
        "frame_b_work",
        "late_timer_work",
        "awaited_task_a",
        "awaited_task_b",
        "awaited_task_c",
        "awaited_task_d",
        "awaited_task_e",
    ] {
        assert_eq!(trace.task_count(label), 1, "task {label}");
    }
    assert!(trace.marker_at("status-running").unwrap() < trace.marker_at("status-done").unwrap());
}

#[test]
fn blocked_phase_frame_callback_beats_the_timer() {
    let session = Session::new(scaled());
    let body = session.page().body();

    let trace = session.run(PointerScript::new().click(5.0, body));

    let sync_end = trace.task_end("sync_work_e").unwrap();
    let frame_start = trace.task_start("blocked_frame_work").unwrap();
    let timer_start = trace.task_start("work_in_timeout").unwrap();

    // The frame body only runs once the synchronous stretch releases the
    // thread, and it still wins over the timer whose nominal delay elapsed
    // long before.
    assert!(frame_start >= sync_end);
    assert!(timer_start >= trace.task_end("blocked_frame_work").unwrap());
}

#[test]
fn awaited_phase_frames_coalesce_and_timer_fires_last() {
    let session = Session::new(scaled());
    let body = session.page().body();

    let trace = session.run(PointerScript::new().click(5.0, body));

    // Both frame callbacks were serviced in the same frame.
    assert_eq!(
        trace.frame_timestamp("frame-a").unwrap(),
        trace.frame_timestamp("frame-b").unwrap()
    );

    // And only after the whole awaited stretch finished.
    let awaited_end = trace.task_end("awaited_task_e").unwrap();
    let frame_a_start = trace.task_start("frame_a_work").unwrap();
    let frame_b_start = trace.task_start("frame_b_work").unwrap();
    assert!(frame_a_start >= awaited_end);
    assert!(frame_b_start >= trace.task_end("frame_a_work").unwrap());

    // The timer is the lowest-priority pending callback.
    let timer_start = trace.task_start("late_timer_work").unwrap();
    assert!(timer_start >= trace.task_end("frame_b_work").unwrap());
}

#[test]
fn done_status_precedes_the_trailing_callbacks() {
    let session = Session::new(scaled());
    let body = session.page().body();

    let trace = session.run(PointerScript::new().click(5.0, body));

    // The scenario's logical completion happens in the same microtask drain
    // as the last awaited task; the registered frame/timer bodies fire
    // afterwards.
    let done = trace.marker_at("status-done").unwrap();
    assert!(done >= trace.task_end("awaited_task_e").unwrap());
    assert!(done <= trace.task_start("frame_a_work").unwrap());
    assert_eq!(session.page().status(), STATUS_DONE);
}

#[test]
fn pointer_moves_interleave_with_the_scenario() {
    let session = Session::new(scaled());
    let body = session.page().body();

    let script = PointerScript::new()
        .moves(0.0, 600.0, 8.0, body)
        .click(20.0, body);
    let trace = session.run(script);

    assert_eq!(session.page().status(), STATUS_DONE);
    let moves = trace.task_count("move_mouse");
    assert!(moves > 10, "only {moves} pointer tasks ran");

    // At least one movement task ran while the scenario was in flight.
    let running = trace.marker_at("status-running").unwrap();
    let done = trace.marker_at("status-done").unwrap();
    let interleaved = trace.events().iter().any(|event| match event {
        perfstage_fixture::trace::TraceEvent::Task {
            label, start_ms, ..
        } => label == "move_mouse" && *start_ms > running && *start_ms < done,
        _ => false,
    });
    assert!(interleaved, "no pointer task between the status transitions");
}

#[test]
fn overlapping_runs_are_not_guarded_against() {
    // A second activation mid-run starts a second scenario; nothing
    // deduplicates. Deliberate simplification for a manual test tool.
    let session = Session::new(scaled());
    let body = session.page().body();

    let trace = session.run(PointerScript::new().click(5.0, body).click(10.0, body));

    assert_eq!(trace.task_count("first_task"), 2);
    assert_eq!(trace.task_count("awaited_task_e"), 2);
    assert_eq!(session.page().status(), STATUS_DONE);
}
