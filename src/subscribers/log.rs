//! # LogWriter: event printer
//!
//! A minimal subscriber that renders incoming [`Event`]s as `tracing` records.
//! Use it for tests or demos; production code usually wants its own
//! [`Subscribe`] implementation.
//!
//! ## Example output
//! ```text
//! INFO  [run-start] runner=main tasks=2
//! INFO  [task-start] runner=main task=fetch attempt=1
//! INFO  [task-retry] runner=main task=fetch attempt=1
//! INFO  [task-success] runner=main task=fetch attempt=2 exit_code=0
//! WARN  [task-failure] runner=main task=load exit_code=Some(2) err="..."
//! ERROR [run-failure] runner=main err="..."
//! INFO  [run-success] runner=main
//! ```

use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::events::{Event, EventKind};
use crate::payload::Payload;
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl<P: Payload> Subscribe<P> for LogWriter {
    async fn on_event(&self, e: &Event<'_, P>) {
        let runner = &*e.runner;
        let task = e.task_name().unwrap_or("-");
        let err = e.error.map(ToString::to_string);

        match e.kind {
            EventKind::RunStart => {
                info!("[run-start] runner={runner} tasks={:?}", e.task_count);
            }
            EventKind::RunSuccess => {
                info!("[run-success] runner={runner}");
            }
            EventKind::RunFailure => {
                error!("[run-failure] runner={runner} err={err:?}");
            }
            EventKind::TaskUnlessSkip => {
                info!("[task-unless-skip] runner={runner} task={task}");
            }
            EventKind::TaskStart => {
                info!("[task-start] runner={runner} task={task} attempt={:?}", e.attempt);
            }
            EventKind::TaskSuccess => {
                info!(
                    "[task-success] runner={runner} task={task} attempt={:?} exit_code={:?}",
                    e.attempt, e.exit_code
                );
            }
            EventKind::TaskRetry => {
                info!("[task-retry] runner={runner} task={task} attempt={:?}", e.attempt);
            }
            EventKind::TaskSkip => {
                info!("[task-skip] runner={runner} task={task}");
            }
            EventKind::TaskFailure => {
                warn!(
                    "[task-failure] runner={runner} task={task} exit_code={:?} err={err:?}",
                    e.exit_code
                );
            }
        }
    }

    fn name(&self) -> &'static str {
        "log_writer"
    }
}
