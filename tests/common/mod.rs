#![allow(dead_code)]

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use taskchain::{
    Event, EventKind, JsonPayload, Outcome, Runner, RunnerConfig, Task, TaskError, TaskRef,
    TaskSet, TaskSpec,
};

/// Hook invocation counters shared between a [`Probe`] and the test.
#[derive(Default)]
pub struct Calls {
    pub unless: AtomicU32,
    pub set_up: AtomicU32,
    pub run: AtomicU32,
    pub tear_down: AtomicU32,
    /// Payload `trace` as seen by the latest `set_up` / `tear_down` call.
    pub set_up_saw: Mutex<Vec<String>>,
    pub tear_down_saw: Mutex<Vec<String>>,
}

impl Calls {
    pub fn unless(&self) -> u32 {
        self.unless.load(Ordering::SeqCst)
    }

    pub fn set_up(&self) -> u32 {
        self.set_up.load(Ordering::SeqCst)
    }

    pub fn run(&self) -> u32 {
        self.run.load(Ordering::SeqCst)
    }

    pub fn tear_down(&self) -> u32 {
        self.tear_down.load(Ordering::SeqCst)
    }

    pub fn set_up_saw(&self) -> Vec<String> {
        self.set_up_saw.lock().unwrap().clone()
    }

    pub fn tear_down_saw(&self) -> Vec<String> {
        self.tear_down_saw.lock().unwrap().clone()
    }
}

/// Test task: plays back a script of outcomes (then `Success(0)`) and counts
/// every hook call. Each run appends the task name to the payload's `trace`.
pub struct Probe {
    name: &'static str,
    should_run: bool,
    set_up_fault: Option<&'static str>,
    tear_down_fault: Option<&'static str>,
    script: Mutex<Vec<Result<Outcome, String>>>,
    calls: Arc<Calls>,
}

impl Probe {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            should_run: true,
            set_up_fault: None,
            tear_down_fault: None,
            script: Mutex::new(Vec::new()),
            calls: Arc::new(Calls::default()),
        }
    }

    /// Outcomes returned by successive `run` calls.
    pub fn script(self, outcomes: impl IntoIterator<Item = Outcome>) -> Self {
        self.script_results(outcomes.into_iter().map(Ok))
    }

    /// Like [`Probe::script`], `Err` entries become task faults.
    pub fn script_results(self, results: impl IntoIterator<Item = Result<Outcome, String>>) -> Self {
        let mut script: Vec<_> = results.into_iter().collect();
        script.reverse();
        *self.script.lock().unwrap() = script;
        self
    }

    pub fn skip_unless(mut self) -> Self {
        self.should_run = false;
        self
    }

    /// Makes every `set_up` call fail with `msg`.
    pub fn fail_set_up(mut self, msg: &'static str) -> Self {
        self.set_up_fault = Some(msg);
        self
    }

    /// Makes every `tear_down` call fail with `msg`.
    pub fn fail_tear_down(mut self, msg: &'static str) -> Self {
        self.tear_down_fault = Some(msg);
        self
    }

    pub fn calls(&self) -> Arc<Calls> {
        Arc::clone(&self.calls)
    }

    pub fn into_spec(self) -> (TaskRef<JsonPayload>, Arc<Calls>) {
        let calls = self.calls();
        (TaskSpec::new(self).into_ref(), calls)
    }
}

#[async_trait]
impl Task<JsonPayload> for Probe {
    fn name(&self) -> &str {
        self.name
    }

    fn unless(&self, _payload: &JsonPayload) -> bool {
        self.calls.unless.fetch_add(1, Ordering::SeqCst);
        self.should_run
    }

    async fn set_up(&self, payload: &JsonPayload) -> Result<(), TaskError> {
        self.calls.set_up.fetch_add(1, Ordering::SeqCst);
        *self.calls.set_up_saw.lock().unwrap() = trace(payload);
        match self.set_up_fault {
            Some(msg) => Err(TaskError::fault(msg)),
            None => Ok(()),
        }
    }

    async fn run(&self, payload: &mut JsonPayload) -> Result<Outcome, TaskError> {
        self.calls.run.fetch_add(1, Ordering::SeqCst);
        match payload.get_mut("trace").and_then(|v| v.as_array_mut()) {
            Some(trace) => trace.push(self.name.into()),
            None => {
                payload.insert("trace", vec![self.name]);
            }
        }
        match self.script.lock().unwrap().pop() {
            Some(Ok(outcome)) => Ok(outcome),
            Some(Err(msg)) => Err(TaskError::fault(msg)),
            None => Ok(Outcome::ok()),
        }
    }

    async fn tear_down(&self, payload: &JsonPayload) -> Result<(), TaskError> {
        self.calls.tear_down.fetch_add(1, Ordering::SeqCst);
        *self.calls.tear_down_saw.lock().unwrap() = trace(payload);
        match self.tear_down_fault {
            Some(msg) => Err(TaskError::fault(msg)),
            None => Ok(()),
        }
    }
}

/// Events seen by a runner, as `(kind, task name)`.
pub type Recorded = Arc<Mutex<Vec<(EventKind, Option<String>)>>>;

pub fn record(runner: &mut Runner<JsonPayload>) -> Recorded {
    let seen: Recorded = Arc::default();
    for kind in EventKind::ALL {
        let sink = Arc::clone(&seen);
        runner.on(kind, move |ev: &Event<'_, JsonPayload>| {
            sink.lock()
                .unwrap()
                .push((ev.kind, ev.task_name().map(str::to_string)));
        });
    }
    seen
}

pub fn kinds(seen: &Recorded) -> Vec<EventKind> {
    seen.lock().unwrap().iter().map(|(k, _)| *k).collect()
}

pub fn runner(name: &str, tasks: impl IntoIterator<Item = TaskRef<JsonPayload>>) -> Runner<JsonPayload> {
    Runner::with_tasks(RunnerConfig::named(name), tasks.into_iter().collect::<TaskSet<_>>())
}

/// Names of the tasks whose `run` was invoked, in order.
pub fn trace(payload: &JsonPayload) -> Vec<String> {
    payload
        .get("trace")
        .and_then(|v| v.as_array())
        .map(|a| a.iter().filter_map(|v| v.as_str().map(str::to_string)).collect())
        .unwrap_or_default()
}
