mod common;

use std::sync::Arc;

use common::{kinds, record, runner, trace, Probe};
use taskchain::{
    EventKind, JsonPayload, Outcome, Runner, RunnerConfig, RunnerError, TaskFailure, TaskSet,
    TeardownPolicy,
};

#[tokio::test]
async fn returns_same_payload_and_marks_every_task() {
    let (a, _) = Probe::new("a").into_spec();
    let (b, _) = Probe::new("b").into_spec();
    let (c, _) = Probe::new("c").into_spec();
    let r = runner("main", [a.clone(), b.clone(), c.clone()]);

    let mut payload = JsonPayload::new();
    let input: *const JsonPayload = &payload;
    let out = r.run(&mut payload).await.unwrap();

    assert!(std::ptr::eq(out, input));
    assert_eq!(trace(out), ["a", "b", "c"]);
    assert!(a.is_successfully_executed());
    assert!(b.is_successfully_executed());
    assert!(c.is_successfully_executed());
}

#[tokio::test]
async fn empty_task_set_fails_before_any_event() {
    let mut r = Runner::with_tasks(RunnerConfig::named("empty"), TaskSet::new());
    let seen = record(&mut r);

    let err = r.run(&mut JsonPayload::new()).await.unwrap_err();

    assert!(matches!(err, RunnerError::EmptyTaskSet));
    assert!(err.is_invalid_state());
    assert!(kinds(&seen).is_empty());
}

#[tokio::test]
async fn missing_task_set_fails_before_any_event() {
    let mut r: Runner<JsonPayload> = Runner::new(RunnerConfig::named("unbound"));
    let seen = record(&mut r);

    let err = r.run(&mut JsonPayload::new()).await.unwrap_err();

    assert!(matches!(err, RunnerError::NoTaskSet));
    assert!(err.is_invalid_state());
    assert!(matches!(r.task_set(), Err(RunnerError::NoTaskSet)));
    assert!(kinds(&seen).is_empty());
}

#[tokio::test]
async fn retry_within_bound_runs_body_n_plus_one_times() {
    let (task, calls) = Probe::new("flaky")
        .script([Outcome::Retry, Outcome::Retry, Outcome::Retry])
        .into_spec();
    task.set_max_retries(3).unwrap();
    let r = runner("main", [task.clone()]);

    r.run(&mut JsonPayload::new()).await.unwrap();

    assert_eq!(calls.run(), 4);
    // The whole sequence restarts, `unless` included.
    assert_eq!(calls.unless(), 4);
    assert_eq!(calls.set_up(), 4);
    assert_eq!(calls.tear_down(), 1);
    assert_eq!(task.max_retries().unwrap().retries(), 3);
    assert!(task.is_successfully_executed());
}

#[tokio::test]
async fn retry_past_bound_aborts_run() {
    let (task, calls) = Probe::new("flaky")
        .script([Outcome::Retry, Outcome::Retry, Outcome::Retry])
        .into_spec();
    task.set_max_retries(2).unwrap();
    let (after, after_calls) = Probe::new("after").into_spec();
    let mut r = runner("main", [task.clone(), after]);
    let seen = record(&mut r);

    let err = r.run(&mut JsonPayload::new()).await.unwrap_err();

    assert_eq!(err.as_label(), "runner_run_failed");
    assert!(!err.is_invalid_state());
    assert!(matches!(
        err.cause(),
        Some(TaskFailure::RetriesExhausted { task, .. }) if task == "flaky"
    ));
    assert!(err.to_string().starts_with("run failed: "));
    assert_eq!(calls.run(), 3);
    assert_eq!(after_calls.run(), 0);
    assert!(!task.is_successfully_executed());
    assert_eq!(kinds(&seen).last(), Some(&EventKind::RunFailure));
}

#[tokio::test]
async fn retry_without_counter_is_invalid_state_after_one_run() {
    let (task, calls) = Probe::new("unbound").script([Outcome::Retry]).into_spec();
    let r = runner("main", [task]);

    let err = r.run(&mut JsonPayload::new()).await.unwrap_err();

    assert!(err.is_invalid_state());
    assert!(matches!(err.cause(), Some(TaskFailure::RetriesNotBound { .. })));
    assert_eq!(calls.run(), 1);
}

#[tokio::test]
async fn unless_false_skips_every_hook() {
    let (task, calls) = Probe::new("guarded").skip_unless().into_spec();
    let (next, next_calls) = Probe::new("next").into_spec();
    let mut r = runner("main", [task.clone(), next]);
    let seen = record(&mut r);

    r.run(&mut JsonPayload::new()).await.unwrap();

    assert_eq!(calls.unless(), 1);
    assert_eq!(calls.set_up(), 0);
    assert_eq!(calls.run(), 0);
    assert_eq!(calls.tear_down(), 0);
    assert!(!task.is_successfully_executed());
    assert_eq!(next_calls.run(), 1);
    assert_eq!(
        seen.lock().unwrap()[1],
        (EventKind::TaskUnlessSkip, Some("guarded".to_string()))
    );
}

#[tokio::test]
async fn skip_skips_tear_down_and_continues() {
    let (task, calls) = Probe::new("skipper").script([Outcome::Skip]).into_spec();
    let (next, _) = Probe::new("next").into_spec();
    let r = runner("main", [task.clone(), next.clone()]);

    let mut payload = JsonPayload::new();
    r.run(&mut payload).await.unwrap();

    assert_eq!(calls.run(), 1);
    assert_eq!(calls.tear_down(), 0);
    assert!(!task.is_successfully_executed());
    assert!(next.is_successfully_executed());
    assert_eq!(trace(&payload), ["skipper", "next"]);
}

#[tokio::test]
async fn fail_stops_remaining_tasks_and_chain() {
    let (task, calls) = Probe::new("breaks")
        .script([Outcome::fail("bad input")])
        .into_spec();
    let (after, after_calls) = Probe::new("after").into_spec();
    let (child_task, child_calls) = Probe::new("child").into_spec();

    let mut r = runner("main", [task.clone(), after]);
    r.attach(Arc::new(runner("child", [child_task]))).unwrap();

    let mut payload = JsonPayload::new();
    let err = r.run(&mut payload).await.unwrap_err();

    assert_eq!(err.to_string(), "run failed: task 'breaks' failed: bad input");
    assert_eq!(calls.tear_down(), 0);
    assert_eq!(after_calls.run(), 0);
    assert_eq!(child_calls.run(), 0);
    assert_eq!(trace(&payload), ["breaks"]);
}

#[tokio::test]
async fn nonzero_exit_with_fail_flag_aborts() {
    let (task, calls) = Probe::new("exits").script([Outcome::Success(3)]).into_spec();
    task.set_fail_on_error(true);
    let (after, after_calls) = Probe::new("after").into_spec();
    let mut r = runner("main", [task.clone(), after]);
    let seen = record(&mut r);

    let err = r.run(&mut JsonPayload::new()).await.unwrap_err();

    assert_eq!(err.cause().and_then(TaskFailure::exit_code), Some(3));
    assert_eq!(calls.tear_down(), 1);
    assert_eq!(after_calls.run(), 0);
    assert!(!task.is_successfully_executed());
    assert_eq!(
        kinds(&seen),
        [
            EventKind::RunStart,
            EventKind::TaskStart,
            EventKind::TaskFailure,
            EventKind::RunFailure,
        ]
    );
}

#[tokio::test]
async fn nonzero_exit_without_fail_flag_succeeds() {
    let (task, _) = Probe::new("exits").script([Outcome::Success(3)]).into_spec();
    let r = runner("main", [task.clone()]);

    r.run(&mut JsonPayload::new()).await.unwrap();

    assert!(task.is_successfully_executed());
}

#[tokio::test]
async fn task_fault_is_wrapped_once_without_task_failure_event() {
    let (task, calls) = Probe::new("faulty")
        .script_results([Err("connection reset".to_string())])
        .into_spec();
    let mut r = runner("main", [task]);
    let seen = record(&mut r);

    let err = r.run(&mut JsonPayload::new()).await.unwrap_err();

    assert_eq!(
        err.to_string(),
        "run failed: task 'faulty' raised a fault: connection reset"
    );
    assert_eq!(err.cause().map(TaskFailure::as_label), Some("task_fault"));
    assert_eq!(calls.tear_down(), 0);
    assert_eq!(
        kinds(&seen),
        [EventKind::RunStart, EventKind::TaskStart, EventKind::RunFailure]
    );
}

#[tokio::test]
async fn teardown_always_runs_after_fault() {
    let (task, calls) = Probe::new("faulty")
        .script_results([Err("boom".to_string())])
        .into_spec();
    let mut cfg = RunnerConfig::named("main");
    cfg.teardown = TeardownPolicy::Always;
    let r = Runner::with_tasks(cfg, TaskSet::new().with(task));

    assert!(r.run(&mut JsonPayload::new()).await.is_err());
    assert_eq!(calls.tear_down(), 1);
}

#[tokio::test]
async fn events_follow_lifecycle_order() {
    let (a, _) = Probe::new("a").script([Outcome::Retry]).into_spec();
    a.set_max_retries(1).unwrap();
    let (b, _) = Probe::new("b").script([Outcome::Skip]).into_spec();
    let (c, _) = Probe::new("c").skip_unless().into_spec();
    let mut r = runner("main", [a, b, c]);
    let seen = record(&mut r);

    r.run(&mut JsonPayload::new()).await.unwrap();

    let named = |k, t: &str| (k, Some(t.to_string()));
    assert_eq!(
        *seen.lock().unwrap(),
        [
            (EventKind::RunStart, None),
            named(EventKind::TaskStart, "a"),
            named(EventKind::TaskRetry, "a"),
            named(EventKind::TaskStart, "a"),
            named(EventKind::TaskSuccess, "a"),
            named(EventKind::TaskStart, "b"),
            named(EventKind::TaskSkip, "b"),
            named(EventKind::TaskUnlessSkip, "c"),
            (EventKind::RunSuccess, None),
        ]
    );
}

#[tokio::test]
async fn run_start_carries_task_count_and_listeners_keep_order() {
    let (a, _) = Probe::new("a").into_spec();
    let (b, _) = Probe::new("b").into_spec();
    let mut r = runner("main", [a, b]);

    let order = Arc::new(std::sync::Mutex::new(Vec::new()));
    for id in 1..=3 {
        let order = Arc::clone(&order);
        r.on_name("run.start", move |ev| {
            assert_eq!(ev.task_count, Some(2));
            assert_eq!(&*ev.runner, "main");
            order.lock().unwrap().push(id);
        })
        .unwrap();
    }

    r.run(&mut JsonPayload::new()).await.unwrap();
    assert_eq!(*order.lock().unwrap(), [1, 2, 3]);
}

#[test]
fn on_name_rejects_malformed_names() {
    let mut r: Runner<JsonPayload> = Runner::new(RunnerConfig::default());
    for bad in ["", "task", "task.started", "RUN.START"] {
        let err = r.on_name(bad, |_| {}).unwrap_err();
        assert!(matches!(err, RunnerError::InvalidEventName { .. }), "{bad:?}");
    }
}

#[tokio::test]
async fn panicking_listener_does_not_abort_run() {
    let (a, _) = Probe::new("a").into_spec();
    let mut r = runner("main", [a.clone()]);
    r.on(EventKind::TaskStart, |_| panic!("listener bug"));

    r.run(&mut JsonPayload::new()).await.unwrap();
    assert!(a.is_successfully_executed());
}

#[tokio::test]
async fn reset_allows_a_clean_second_run() {
    let (task, calls) = Probe::new("flaky")
        .script([Outcome::Retry, Outcome::ok(), Outcome::Retry])
        .into_spec();
    task.set_max_retries(1).unwrap();
    let r = runner("main", [task.clone()]);

    r.run(&mut JsonPayload::new()).await.unwrap();
    r.task_set().unwrap().reset();
    assert!(!task.is_successfully_executed());
    assert_eq!(task.max_retries().unwrap().retries(), 0);

    r.run(&mut JsonPayload::new()).await.unwrap();
    assert_eq!(calls.run(), 4);
}

// ---- Hook payload and hook faults ----

#[tokio::test]
async fn hooks_see_the_payload() {
    let (first, _) = Probe::new("first").into_spec();
    let (second, calls) = Probe::new("second").into_spec();
    let r = runner("main", [first, second]);

    r.run(&mut JsonPayload::new()).await.unwrap();

    assert_eq!(calls.set_up_saw(), ["first"]);
    assert_eq!(calls.tear_down_saw(), ["first", "second"]);
}

#[tokio::test]
async fn set_up_fault_aborts_before_run() {
    let (task, calls) = Probe::new("conn").fail_set_up("no conn").into_spec();
    let (after, after_calls) = Probe::new("after").into_spec();
    let mut r = runner("main", [task.clone(), after]);
    let seen = record(&mut r);

    let err = r.run(&mut JsonPayload::new()).await.unwrap_err();

    assert!(matches!(err, RunnerError::RunFailed { .. }));
    assert_eq!(err.to_string(), "run failed: task 'conn' raised a fault: no conn");
    assert_eq!(calls.set_up(), 1);
    assert_eq!(calls.run(), 0);
    assert_eq!(calls.tear_down(), 0);
    assert_eq!(after_calls.run(), 0);
    assert!(!task.is_successfully_executed());
    assert_eq!(
        kinds(&seen),
        [EventKind::RunStart, EventKind::TaskStart, EventKind::RunFailure]
    );
}

#[tokio::test]
async fn tear_down_fault_after_success_aborts_run() {
    let (task, calls) = Probe::new("conn").fail_tear_down("close failed").into_spec();
    let (after, after_calls) = Probe::new("after").into_spec();
    let mut r = runner("main", [task.clone(), after]);
    let seen = record(&mut r);

    let err = r.run(&mut JsonPayload::new()).await.unwrap_err();

    assert_eq!(
        err.to_string(),
        "run failed: task 'conn' raised a fault: close failed"
    );
    assert_eq!(calls.run(), 1);
    assert_eq!(calls.tear_down(), 1);
    assert_eq!(after_calls.run(), 0);
    assert!(!task.is_successfully_executed());
    assert!(!kinds(&seen).contains(&EventKind::TaskSuccess));
}

#[tokio::test]
async fn tear_down_fault_on_skip_counts_only_with_teardown_always() {
    let (task, calls) = Probe::new("skipper")
        .script([Outcome::Skip])
        .fail_tear_down("close failed")
        .into_spec();
    let mut cfg = RunnerConfig::named("main");
    cfg.teardown = TeardownPolicy::Always;
    let r = Runner::with_tasks(cfg, TaskSet::new().with(task));

    let err = r.run(&mut JsonPayload::new()).await.unwrap_err();

    assert_eq!(err.cause().map(TaskFailure::as_label), Some("task_fault"));
    assert_eq!(calls.tear_down(), 1);

    // Under the default policy the skip never reaches `tear_down`.
    let (task, calls) = Probe::new("skipper")
        .script([Outcome::Skip])
        .fail_tear_down("close failed")
        .into_spec();
    runner("main", [task]).run(&mut JsonPayload::new()).await.unwrap();
    assert_eq!(calls.tear_down(), 0);
}

#[tokio::test]
async fn run_fault_wins_over_tear_down_fault() {
    let (task, calls) = Probe::new("faulty")
        .script_results([Err("run broke".to_string())])
        .fail_tear_down("close failed")
        .into_spec();
    let mut cfg = RunnerConfig::named("main");
    cfg.teardown = TeardownPolicy::Always;
    let r = Runner::with_tasks(cfg, TaskSet::new().with(task));

    let err = r.run(&mut JsonPayload::new()).await.unwrap_err();

    assert_eq!(
        err.to_string(),
        "run failed: task 'faulty' raised a fault: run broke"
    );
    assert_eq!(calls.tear_down(), 1);
}
