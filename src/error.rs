//! Error types used by the taskchain runner and tasks.
//!
//! This module defines four error enums, from the innermost to the outermost:
//!
//! - [`RetriesError`]: invalid retry configuration or an exhausted retry counter.
//! - [`TaskError`]: unrecognized faults raised by a task's lifecycle hooks.
//! - [`TaskFailure`]: the reason a single task aborted the whole run.
//! - [`RunnerError`]: everything a caller of [`Runner`](crate::Runner) can observe.
//!
//! All of them provide `as_label` for logging. Task-level problems never reach
//! the caller directly: they are wrapped exactly once into
//! [`RunnerError::RunFailed`].

use thiserror::Error;

/// # Errors produced by a retry counter.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RetriesError {
    /// The allowed retry count is zero, negative or above `u32::MAX`.
    #[error("max allowed retries count must be between 1 and {} (got {max})", u32::MAX)]
    Invalid {
        /// The rejected value.
        max: i64,
    },

    /// One more retry was requested than the counter allows.
    #[error("max allowed retries exceeded. allowed: {max}. tried: {tried}.")]
    Exceeded {
        /// Configured bound.
        max: u32,
        /// Attempted retry count (always `max + 1`).
        tried: u32,
    },
}

impl From<std::convert::Infallible> for RetriesError {
    fn from(never: std::convert::Infallible) -> Self {
        match never {}
    }
}

impl RetriesError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use taskchain::RetriesError;
    ///
    /// let err = RetriesError::Exceeded { max: 1, tried: 2 };
    /// assert_eq!(err.as_label(), "retries_exceeded");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RetriesError::Invalid { .. } => "retries_invalid",
            RetriesError::Exceeded { .. } => "retries_exceeded",
        }
    }
}

/// # Faults raised by task hooks.
///
/// Returned from [`Task::set_up`](crate::Task::set_up), [`Task::run`](crate::Task::run)
/// or [`Task::tear_down`](crate::Task::tear_down) when something went wrong that is
/// not one of the recognized control-flow outcomes. Any such fault aborts the run.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum TaskError {
    /// Generic fault with a message.
    #[error("{error}")]
    Fault {
        /// The underlying error message.
        error: String,
    },

    /// I/O failure inside a hook.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

impl TaskError {
    /// Shorthand for [`TaskError::Fault`].
    pub fn fault(error: impl Into<String>) -> Self {
        TaskError::Fault {
            error: error.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            TaskError::Fault { .. } => "task_fault",
            TaskError::Io(_) => "task_io",
        }
    }
}

/// # Reason a task aborted the run.
///
/// Produced by the per-task state machine and carried as the cause of
/// [`RunnerError::RunFailed`].
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum TaskFailure {
    /// The task reported failure, either explicitly or through a nonzero exit
    /// code while `fail_on_error` was set.
    #[error("task '{task}' failed: {reason}")]
    Failed {
        /// Task name.
        task: String,
        /// Failure message.
        reason: String,
        /// Exit code, when known.
        exit_code: Option<i32>,
    },

    /// The task asked to be retried but has no retry counter bound.
    #[error("task '{task}' signaled retry, but no retry counter is bound")]
    RetriesNotBound {
        /// Task name.
        task: String,
    },

    /// The task asked to be retried more often than its counter allows.
    #[error("task '{task}': {source}")]
    RetriesExhausted {
        /// Task name.
        task: String,
        /// The counter error.
        #[source]
        source: RetriesError,
    },

    /// A hook raised an unrecognized fault.
    #[error("task '{task}' raised a fault: {source}")]
    Fault {
        /// Task name.
        task: String,
        /// The original fault.
        #[source]
        source: TaskError,
    },
}

impl TaskFailure {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            TaskFailure::Failed { .. } => "task_failed",
            TaskFailure::RetriesNotBound { .. } => "task_retries_not_bound",
            TaskFailure::RetriesExhausted { .. } => "task_retries_exhausted",
            TaskFailure::Fault { .. } => "task_fault",
        }
    }

    /// Name of the task that caused the failure.
    pub fn task(&self) -> &str {
        match self {
            TaskFailure::Failed { task, .. }
            | TaskFailure::RetriesNotBound { task }
            | TaskFailure::RetriesExhausted { task, .. }
            | TaskFailure::Fault { task, .. } => task,
        }
    }

    /// Exit code reported by the task, if the failure carries one.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            TaskFailure::Failed { exit_code, .. } => *exit_code,
            _ => None,
        }
    }

    /// True for engine-logic faults (a retry was signaled without a bound counter).
    pub fn is_invalid_state(&self) -> bool {
        matches!(self, TaskFailure::RetriesNotBound { .. })
    }
}

/// # Errors produced by the runner.
///
/// Configuration problems (`NoTaskSet`, `EmptyTaskSet`, `AlreadyAttached`,
/// `NotAttached`, `InvalidEventName`) are reported before anything runs.
/// Every task-originated problem arrives as [`RunnerError::RunFailed`].
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RunnerError {
    /// `run` was called before a task set was bound.
    #[error("can't get task set: none set")]
    NoTaskSet,

    /// `run` was called with an empty task set.
    #[error("can't invoke task run: empty task set")]
    EmptyTaskSet,

    /// The runner is already attached to this chain.
    #[error("can't attach already attached runner '{runner}'")]
    AlreadyAttached {
        /// Name of the attached runner.
        runner: String,
    },

    /// The runner was never attached to this chain.
    #[error("can't detach not attached runner '{runner}'")]
    NotAttached {
        /// Name of the runner.
        runner: String,
    },

    /// Listener registration used an unknown event name.
    #[error("invalid event name: {name:?}")]
    InvalidEventName {
        /// The rejected name.
        name: String,
    },

    /// A task aborted the run.
    #[error("run failed: {cause}")]
    RunFailed {
        /// Name of the failing runner.
        runner: String,
        /// What went wrong.
        #[source]
        cause: TaskFailure,
    },

    /// A chained runner failed after this runner succeeded.
    #[error("chained runner '{runner}' failed: {source}")]
    ChainFailed {
        /// Name of the chained runner.
        runner: String,
        /// The chained runner's own error.
        #[source]
        source: Box<RunnerError>,
    },
}

impl RunnerError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use taskchain::RunnerError;
    ///
    /// assert_eq!(RunnerError::EmptyTaskSet.as_label(), "runner_empty_task_set");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RunnerError::NoTaskSet => "runner_no_task_set",
            RunnerError::EmptyTaskSet => "runner_empty_task_set",
            RunnerError::AlreadyAttached { .. } => "runner_already_attached",
            RunnerError::NotAttached { .. } => "runner_not_attached",
            RunnerError::InvalidEventName { .. } => "runner_invalid_event_name",
            RunnerError::RunFailed { .. } => "runner_run_failed",
            RunnerError::ChainFailed { .. } => "runner_chain_failed",
        }
    }

    /// True for invalid-state conditions, including a wrapped
    /// [`TaskFailure::RetriesNotBound`], following chained runners.
    pub fn is_invalid_state(&self) -> bool {
        match self {
            RunnerError::NoTaskSet | RunnerError::EmptyTaskSet => true,
            RunnerError::RunFailed { cause, .. } => cause.is_invalid_state(),
            RunnerError::ChainFailed { source, .. } => source.is_invalid_state(),
            _ => false,
        }
    }

    /// The task failure behind this error, following chained runners.
    pub fn cause(&self) -> Option<&TaskFailure> {
        match self {
            RunnerError::RunFailed { cause, .. } => Some(cause),
            RunnerError::ChainFailed { source, .. } => source.cause(),
            _ => None,
        }
    }
}
