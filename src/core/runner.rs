//! # Runner: executes a task set against a payload and notifies chained runners.
//!
//! The [`Runner`] owns a [`TaskSet`], an event [`Dispatcher`], its
//! [`RunnerConfig`] and the runners chained after it.
//!
//! ## Key responsibilities
//! - validate that a non-empty task set is bound
//! - drive every task through the per-task state machine, in set order
//! - convert the first task failure into a single [`RunnerError::RunFailed`]
//! - on success, notify chained runners with the same payload
//!
//! ## High-level architecture
//! ```text
//! run(&mut payload):
//!   task_set()?  ── none ──► Err(NoTaskSet)
//!        │       ── empty ─► Err(EmptyTaskSet)
//!        ▼
//!   publish(run.start)
//!        │
//!   for spec in TaskSet (insertion order):
//!        TaskDriver::run_task(spec, payload)
//!             ├─ Skipped / Succeeded ─► next task
//!             └─ Err(TaskFailure) ─► publish(run.failure) ─► Err(RunFailed)
//!        │
//!   publish(run.success)
//!        │
//!   Chain::notify(payload) ─► child.run(payload) ...
//!        │
//!   Ok(payload)   (the same &mut P that was passed in)
//! ```
//!
//! ## Example
//! ```rust
//! use taskchain::{JsonPayload, Outcome, Runner, RunnerConfig, TaskError, TaskFn, TaskSet};
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let step = TaskFn::spec("step", |p: &mut JsonPayload| {
//!     p.insert("done", true);
//!     Ok::<_, TaskError>(Outcome::ok())
//! });
//!
//! let runner = Runner::with_tasks(RunnerConfig::named("main"), TaskSet::new().with(step.clone()));
//!
//! let mut payload = JsonPayload::new();
//! let out = runner.run(&mut payload).await.unwrap();
//! assert_eq!(out.get("done"), Some(&serde_json::json!(true)));
//! assert!(step.is_successfully_executed());
//! # });
//! ```

use std::sync::Arc;

use tracing::{debug, error, info};

use crate::{
    core::{
        builder::RunnerBuilder,
        chain::Chain,
        config::RunnerConfig,
        machine::{TaskDriver, TaskState},
    },
    error::RunnerError,
    events::{Dispatcher, Event, EventKind},
    payload::Payload,
    subscribers::{FnSubscriber, Subscribe},
    tasks::TaskSet,
};

/// Executes one [`TaskSet`] against a payload.
///
/// Configuration methods take `&mut self`; [`run`](Runner::run) takes `&self`
/// so a runner can be shared (`Arc<Runner<P>>`) and attached to other runners.
pub struct Runner<P: Payload> {
    cfg: RunnerConfig,
    name: Arc<str>,
    tasks: Option<TaskSet<P>>,
    dispatcher: Dispatcher<P>,
    chain: Chain<P>,
}

impl<P: Payload> Runner<P> {
    /// Creates a runner without a task set.
    pub fn new(cfg: RunnerConfig) -> Self {
        Self {
            name: Arc::from(cfg.name.as_str()),
            cfg,
            tasks: None,
            dispatcher: Dispatcher::new(),
            chain: Chain::new(),
        }
    }

    /// Creates a runner bound to `tasks`.
    pub fn with_tasks(cfg: RunnerConfig, tasks: TaskSet<P>) -> Self {
        let mut runner = Self::new(cfg);
        runner.set_task_set(tasks);
        runner
    }

    /// Returns a builder.
    pub fn builder(cfg: RunnerConfig) -> RunnerBuilder<P> {
        RunnerBuilder::new(cfg)
    }

    /// Runner name (from config).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Runner configuration.
    pub fn config(&self) -> &RunnerConfig {
        &self.cfg
    }

    /// Binds a task set, replacing any previous one.
    pub fn set_task_set(&mut self, tasks: TaskSet<P>) -> &mut Self {
        self.tasks = Some(tasks);
        self
    }

    /// The bound task set.
    pub fn task_set(&self) -> Result<&TaskSet<P>, RunnerError> {
        self.tasks.as_ref().ok_or(RunnerError::NoTaskSet)
    }

    /// The bound task set, for editing between runs.
    pub fn task_set_mut(&mut self) -> Result<&mut TaskSet<P>, RunnerError> {
        self.tasks.as_mut().ok_or(RunnerError::NoTaskSet)
    }

    /// Registers a callback for one event kind.
    pub fn on<F>(&mut self, kind: EventKind, f: F) -> &mut Self
    where
        F: Fn(&Event<'_, P>) + Send + Sync + 'static,
    {
        self.dispatcher.subscribe(kind, Arc::new(FnSubscriber::new(f)));
        self
    }

    /// Registers a callback by dotted event name (e.g. `"task.start"`).
    ///
    /// Fails with [`RunnerError::InvalidEventName`] for unknown or empty names.
    pub fn on_name<F>(&mut self, name: &str, f: F) -> Result<&mut Self, RunnerError>
    where
        F: Fn(&Event<'_, P>) + Send + Sync + 'static,
    {
        let kind = name.parse::<EventKind>()?;
        Ok(self.on(kind, f))
    }

    /// Registers a subscriber for one event kind.
    pub fn subscribe_to(&mut self, kind: EventKind, subscriber: Arc<dyn Subscribe<P>>) -> &mut Self {
        self.dispatcher.subscribe(kind, subscriber);
        self
    }

    /// Registers a subscriber for every event kind.
    pub fn subscribe(&mut self, subscriber: Arc<dyn Subscribe<P>>) -> &mut Self {
        self.dispatcher.subscribe_all(subscriber);
        self
    }

    /// Attaches a runner to be run after this one succeeds.
    ///
    /// Fails with [`RunnerError::AlreadyAttached`] if this exact runner is
    /// already attached.
    pub fn attach(&mut self, runner: Arc<Runner<P>>) -> Result<(), RunnerError> {
        self.chain.attach(runner)
    }

    /// Detaches a previously attached runner.
    ///
    /// Fails with [`RunnerError::NotAttached`] if it was never attached.
    pub fn detach(&mut self, runner: &Arc<Runner<P>>) -> Result<(), RunnerError> {
        self.chain.detach(runner)
    }

    /// True if this exact runner is attached.
    pub fn is_attached(&self, runner: &Arc<Runner<P>>) -> bool {
        self.chain.contains(runner)
    }

    /// Number of attached runners.
    pub fn attached(&self) -> usize {
        self.chain.len()
    }

    /// Runs every attached runner with `payload`, per [`ChainPolicy`](crate::ChainPolicy).
    ///
    /// Called by [`run`](Runner::run) after a successful run.
    pub async fn notify(&self, payload: &mut P) -> Result<(), RunnerError> {
        self.chain.notify(self.cfg.chain, payload).await
    }

    /// Executes the task set against `payload` and returns the same payload.
    ///
    /// ### Errors
    /// - [`RunnerError::NoTaskSet`] / [`RunnerError::EmptyTaskSet`] before any event
    /// - [`RunnerError::RunFailed`] when a task aborts the run; remaining tasks
    ///   and chained runners are not executed
    /// - [`RunnerError::ChainFailed`] when a chained runner fails
    ///
    /// Success flags and retry counters persist across calls; reset the task
    /// set (see [`TaskSet::reset`]) before running it again.
    pub async fn run<'p>(&self, payload: &'p mut P) -> Result<&'p mut P, RunnerError> {
        let tasks = self.task_set()?;
        if tasks.is_empty() {
            return Err(RunnerError::EmptyTaskSet);
        }

        let runner = &*self.name;
        let count = tasks.len();
        info!(runner, tasks = count, "starting runner with {count} tasks ready for execution");
        self.dispatcher
            .publish(
                &Event::new(EventKind::RunStart, Arc::clone(&self.name))
                    .with_task_count(count)
                    .with_payload(&*payload),
            )
            .await;

        let driver = TaskDriver {
            runner: &self.name,
            dispatcher: &self.dispatcher,
            teardown: self.cfg.teardown,
        };

        for spec in tasks {
            match driver.run_task(spec, payload).await {
                Ok(TaskState::Succeeded {
                    exit_code,
                    attempts,
                }) => {
                    debug!(runner, task = spec.name(), exit_code, attempts, "task succeeded");
                }
                Ok(TaskState::Skipped) => {
                    debug!(runner, task = spec.name(), "task skipped");
                }
                Err(cause) => {
                    error!(
                        runner,
                        task = spec.name(),
                        label = cause.as_label(),
                        "an error was raised: {cause}"
                    );
                    self.dispatcher
                        .publish(
                            &Event::new(EventKind::RunFailure, Arc::clone(&self.name))
                                .with_task(spec)
                                .with_error(&cause),
                        )
                        .await;
                    return Err(RunnerError::RunFailed {
                        runner: self.name.to_string(),
                        cause,
                    });
                }
            }
        }

        info!(runner, "all tasks were processed");
        self.dispatcher
            .publish(&Event::new(EventKind::RunSuccess, Arc::clone(&self.name)).with_payload(&*payload))
            .await;

        if self.chain.len() > 0 {
            info!(runner, attached = self.chain.len(), "calling attached runners");
            self.notify(payload).await?;
        }

        info!(runner, "execution successful");
        Ok(payload)
    }

    /// Wraps the runner for attaching to another runner.
    pub fn into_shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

impl<P: Payload> std::fmt::Debug for Runner<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runner")
            .field("name", &self.name)
            .field("tasks", &self.tasks.as_ref().map(TaskSet::len))
            .field("subscribers", &self.dispatcher.len())
            .field("attached", &self.chain.len())
            .finish()
    }
}
