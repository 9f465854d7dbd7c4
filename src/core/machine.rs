//! # Per-task state machine.
//!
//! Drives one [`TaskSpec`](crate::TaskSpec) to a terminal state, publishing
//! lifecycle events and applying the skip/retry/fail contract.
//!
//! ## State machine
//! ```text
//!            ┌──────────────────────────────────────────────┐
//!            ▼                                              │
//!      Unless-Check ── false ──► task.unless-skip ──► Skipped
//!            │ true
//!            ▼
//!         Started ── task.start, set_up, run, [tear_down]
//!            │
//!            ├─ Success(code) ─┬─ fail_on_error && code != 0 ─► Fail
//!            │                 └─ task.success, mark executed ─► Succeeded
//!            ├─ Skip  ─► task.skip ─► Skipped
//!            ├─ Retry ─► task.retry ─► counter.increase() ──────┘ (from the top)
//!            │                         ├─ no counter  ─► RetriesNotBound
//!            │                         └─ exhausted   ─► RetriesExhausted
//!            ├─ Fail  ─► task.failure ─► Failed
//!            └─ Err(TaskError) ─► Fault (no task event; run-level handling)
//! ```
//!
//! ## Rules
//! - A retry re-runs the **whole** sequence, including `unless`.
//! - `tear_down` runs only after `Success` unless [`TeardownPolicy::Always`].
//! - Every `Err` returned here aborts the run; the caller wraps it once.

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::{
    core::config::TeardownPolicy,
    error::{TaskError, TaskFailure},
    events::{Dispatcher, Event, EventKind},
    payload::Payload,
    tasks::{Outcome, TaskRef},
};

/// Terminal non-failing state of one task.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TaskState {
    Skipped,
    Succeeded { exit_code: i32, attempts: u32 },
}

/// Borrowed view of the runner needed to execute tasks.
pub(crate) struct TaskDriver<'r, P: Payload> {
    pub runner: &'r Arc<str>,
    pub dispatcher: &'r Dispatcher<P>,
    pub teardown: TeardownPolicy,
}

impl<P: Payload> TaskDriver<'_, P> {
    /// Executes `spec` against `payload` until it reaches a terminal state.
    pub async fn run_task(
        &self,
        spec: &TaskRef<P>,
        payload: &mut P,
    ) -> Result<TaskState, TaskFailure> {
        let runner = &**self.runner;
        let name = spec.name();
        let mut attempt: u32 = 0;

        loop {
            attempt += 1;
            info!(runner, task = name, attempt, "starting execution");

            if !spec.task().unless(&*payload) {
                info!(runner, task = name, "skipping because unless() returned false");
                self.publish(task_event(EventKind::TaskUnlessSkip, self.runner, spec, payload, attempt))
                    .await;
                return Ok(TaskState::Skipped);
            }

            self.publish(task_event(EventKind::TaskStart, self.runner, spec, payload, attempt))
                .await;

            let outcome = self.execute(spec, payload).await?;

            match classify(spec, outcome) {
                Outcome::Success(exit_code) => {
                    if exit_code == 0 {
                        info!(runner, task = name, exit_code, "task exited with status code {exit_code}");
                    } else {
                        warn!(runner, task = name, exit_code, "task exited with status code {exit_code}");
                    }
                    self.publish(
                        task_event(EventKind::TaskSuccess, self.runner, spec, payload, attempt)
                            .with_exit_code(exit_code),
                    )
                    .await;
                    spec.mark_as_successfully_executed();
                    info!(runner, task = name, "execution successful");
                    return Ok(TaskState::Succeeded {
                        exit_code,
                        attempts: attempt,
                    });
                }
                Outcome::Skip => {
                    info!(runner, task = name, "skipping");
                    self.publish(task_event(EventKind::TaskSkip, self.runner, spec, payload, attempt))
                        .await;
                    return Ok(TaskState::Skipped);
                }
                Outcome::Retry => {
                    info!(runner, task = name, notice = true, "retry signaled, starting again");
                    self.publish(task_event(EventKind::TaskRetry, self.runner, spec, payload, attempt))
                        .await;

                    match spec.increase_retries() {
                        None => {
                            return Err(TaskFailure::RetriesNotBound {
                                task: name.to_string(),
                            });
                        }
                        Some(Err(source)) => {
                            return Err(TaskFailure::RetriesExhausted {
                                task: name.to_string(),
                                source,
                            });
                        }
                        Some(Ok(retries)) => {
                            debug!(runner, task = name, retries, "retry recorded");
                        }
                    }
                }
                Outcome::Fail { reason, exit_code } => {
                    warn!(runner, task = name, ?exit_code, "failure signaled: {reason}");
                    let failure = TaskFailure::Failed {
                        task: name.to_string(),
                        reason,
                        exit_code,
                    };
                    let mut ev = task_event(EventKind::TaskFailure, self.runner, spec, payload, attempt)
                        .with_error(&failure);
                    if let Some(code) = exit_code {
                        ev = ev.with_exit_code(code);
                    }
                    self.publish(ev).await;
                    return Err(failure);
                }
            }
        }
    }

    /// One attempt: `set_up`, `run` and, per policy, `tear_down`.
    async fn execute(&self, spec: &TaskRef<P>, payload: &mut P) -> Result<Outcome, TaskFailure> {
        let task = spec.task();

        task.set_up(&*payload).await.map_err(|e| fault(spec, e))?;
        let result = task.run(payload).await;

        let tear_down = matches!(result, Ok(Outcome::Success(_)))
            || self.teardown == TeardownPolicy::Always;
        if !tear_down {
            return result.map_err(|e| fault(spec, e));
        }

        let torn_down = task.tear_down(&*payload).await;
        // A fault from `run` wins over one from `tear_down`.
        let outcome = result.map_err(|e| fault(spec, e))?;
        torn_down.map_err(|e| fault(spec, e))?;
        Ok(outcome)
    }

    async fn publish(&self, ev: Event<'_, P>) {
        self.dispatcher.publish(&ev).await;
    }
}

/// Turns a nonzero exit code into a failure when the task asks for it.
fn classify<P: Payload>(spec: &TaskRef<P>, outcome: Outcome) -> Outcome {
    match outcome {
        Outcome::Success(code) if code != 0 && spec.fail_on_error() => Outcome::Fail {
            reason: format!("exited with code {code}"),
            exit_code: Some(code),
        },
        other => other,
    }
}

fn fault<P: Payload>(spec: &TaskRef<P>, source: TaskError) -> TaskFailure {
    TaskFailure::Fault {
        task: spec.name().to_string(),
        source,
    }
}

fn task_event<'a, P: Payload>(
    kind: EventKind,
    runner: &Arc<str>,
    spec: &TaskRef<P>,
    payload: &'a P,
    attempt: u32,
) -> Event<'a, P> {
    Event::new(kind, Arc::clone(runner))
        .with_task(spec)
        .with_payload(payload)
        .with_attempt(attempt)
}
