//! # Runner configuration.
//!
//! Provides [`RunnerConfig`], the settings of one [`Runner`](crate::Runner).
//!
//! Config is used in two ways:
//! 1. **Runner creation**: `Runner::new(config)` / `Runner::builder(config)`
//! 2. **TaskSpec defaults**: `TaskSpec::with_defaults(task, &config)`
//!
//! ## Sentinel values
//! - `max_retries = 0` → tasks built from defaults get no retry counter

/// When `tear_down` is invoked.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TeardownPolicy {
    /// Only after a `run` that returned [`Outcome::Success`](crate::Outcome::Success)
    /// (default). Skip, retry, fail and faults leave `tear_down` uncalled.
    #[default]
    OnSuccess,
    /// After every `run` whose `set_up` completed, whatever the outcome.
    ///
    /// Changes observable behavior: skipping, retrying and failing tasks get
    /// their `tear_down` called too (once per attempt).
    Always,
}

/// How chained runners are executed after a successful run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ChainPolicy {
    /// Run chained runners in attachment order; the first failure stops the
    /// rest and is returned (default).
    #[default]
    StopOnFailure,
    /// Run every chained runner; the first failure is returned afterwards.
    RunAll,
}

/// Configuration for a runner.
///
/// ## Field semantics
/// - `name`: Runner name in logs and events
/// - `teardown`: When `tear_down` is called (see [`TeardownPolicy`])
/// - `chain`: How chained runners are executed (see [`ChainPolicy`])
/// - `fail_on_error`: Default fail-on-nonzero-exit flag for `TaskSpec::with_defaults`
/// - `max_retries`: Default retry bound for `TaskSpec::with_defaults` (`0` = none)
#[derive(Clone, Debug)]
pub struct RunnerConfig {
    /// Runner name in logs and events.
    pub name: String,

    /// When `tear_down` is invoked.
    pub teardown: TeardownPolicy,

    /// How chained runners are executed.
    pub chain: ChainPolicy,

    /// Default fail-on-nonzero-exit flag.
    ///
    /// Used by `TaskSpec::with_defaults()`. Can be overridden per-task.
    pub fail_on_error: bool,

    /// Default retry bound.
    ///
    /// - `0` = no retry counter (retry signals abort the run)
    /// - `n > 0` = at most `n` retries per task
    ///
    /// Used by `TaskSpec::with_defaults()`. Can be overridden per-task.
    pub max_retries: u32,
}

impl RunnerConfig {
    /// Config with defaults and the given name.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Returns the default retry bound as an `Option`.
    ///
    /// - `None` → no retry counter
    /// - `Some(n)` → at most `n` retries
    #[inline]
    pub fn default_max_retries(&self) -> Option<u32> {
        if self.max_retries == 0 {
            None
        } else {
            Some(self.max_retries)
        }
    }
}

impl Default for RunnerConfig {
    /// Default configuration:
    ///
    /// - `name = "runner"`
    /// - `teardown = TeardownPolicy::OnSuccess`
    /// - `chain = ChainPolicy::StopOnFailure`
    /// - `fail_on_error = false`
    /// - `max_retries = 0` (no retries)
    fn default() -> Self {
        Self {
            name: "runner".to_string(),
            teardown: TeardownPolicy::default(),
            chain: ChainPolicy::default(),
            fail_on_error: false,
            max_retries: 0,
        }
    }
}
