//! # Outcome of a single task body invocation.
//!
//! A task's [`run`](crate::Task::run) returns `Ok(Outcome)` for every expected
//! result, and `Err(TaskError)` only for unrecognized faults. The runner
//! dispatches on the variant:
//!
//! ```text
//! Success(code) ─► tear_down ─► fail_on_error && code != 0 ? ─► Fail
//!                                                           └► task.success
//! Skip          ─► task.skip     (run continues with next task)
//! Retry         ─► task.retry    (counter.increase(), whole sequence again)
//! Fail          ─► task.failure  (run aborts)
//! ```

/// Control-flow result reported by a task body.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Normal completion with an exit code (`0` = clean).
    Success(i32),
    /// Abandon this task only; no error.
    Skip,
    /// Abandon this attempt and run the task again from the precondition check.
    Retry,
    /// Abandon this task and the entire run.
    Fail {
        /// Human-readable failure reason.
        reason: String,
        /// Optional exit code reported with the failure.
        exit_code: Option<i32>,
    },
}

impl Outcome {
    /// Clean success (`Success(0)`).
    #[inline]
    pub fn ok() -> Self {
        Outcome::Success(0)
    }

    /// Failure without an exit code.
    #[inline]
    pub fn fail(reason: impl Into<String>) -> Self {
        Outcome::Fail {
            reason: reason.into(),
            exit_code: None,
        }
    }

    /// Failure carrying an exit code.
    #[inline]
    pub fn fail_with_code(reason: impl Into<String>, exit_code: i32) -> Self {
        Outcome::Fail {
            reason: reason.into(),
            exit_code: Some(exit_code),
        }
    }
}

impl Default for Outcome {
    /// Returns `Success(0)`; an absent exit code counts as zero.
    fn default() -> Self {
        Outcome::ok()
    }
}

impl From<i32> for Outcome {
    fn from(code: i32) -> Self {
        Outcome::Success(code)
    }
}

impl From<()> for Outcome {
    fn from(_: ()) -> Self {
        Outcome::ok()
    }
}
