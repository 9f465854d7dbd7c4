use std::sync::Arc;

use crate::{
    core::{config::RunnerConfig, runner::Runner},
    error::RunnerError,
    events::EventKind,
    payload::Payload,
    subscribers::Subscribe,
    tasks::TaskSet,
};

/// Builder for constructing a [`Runner`] in one expression.
pub struct RunnerBuilder<P: Payload> {
    cfg: RunnerConfig,
    tasks: Option<TaskSet<P>>,
    subscribers: Vec<(Option<EventKind>, Arc<dyn Subscribe<P>>)>,
    chained: Vec<Arc<Runner<P>>>,
}

impl<P: Payload> RunnerBuilder<P> {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: RunnerConfig) -> Self {
        Self {
            cfg,
            tasks: None,
            subscribers: Vec::new(),
            chained: Vec::new(),
        }
    }

    /// Sets the task set.
    pub fn with_tasks(mut self, tasks: TaskSet<P>) -> Self {
        self.tasks = Some(tasks);
        self
    }

    /// Adds subscribers that receive every event, in the given order.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe<P>>>) -> Self {
        self.subscribers
            .extend(subscribers.into_iter().map(|s| (None, s)));
        self
    }

    /// Adds a subscriber for one event kind.
    pub fn with_subscriber_for(mut self, kind: EventKind, subscriber: Arc<dyn Subscribe<P>>) -> Self {
        self.subscribers.push((Some(kind), subscriber));
        self
    }

    /// Adds a runner to notify after a successful run.
    pub fn with_chained(mut self, runner: Arc<Runner<P>>) -> Self {
        self.chained.push(runner);
        self
    }

    /// Builds the runner.
    ///
    /// Fails with [`RunnerError::AlreadyAttached`] if the same runner was chained twice.
    pub fn build(self) -> Result<Runner<P>, RunnerError> {
        let mut runner = Runner::new(self.cfg);
        if let Some(tasks) = self.tasks {
            runner.set_task_set(tasks);
        }
        for (kind, sub) in self.subscribers {
            match kind {
                Some(kind) => runner.subscribe_to(kind, sub),
                None => runner.subscribe(sub),
            };
        }
        for chained in self.chained {
            runner.attach(chained)?;
        }
        Ok(runner)
    }
}
