//! # Simple runner
//!
//! Demonstrates basic taskchain features:
//! - Tasks sharing one mutable payload
//! - `unless` skipping a task whose work is already done
//! - Task-level skip and nonzero exit codes
//! - Listening to events with `Runner::on_name`

use async_trait::async_trait;

use taskchain::{
    EventKind, JsonPayload, Outcome, Runner, RunnerConfig, Task, TaskError, TaskFn, TaskSet,
    TaskSpec,
};

/// Only fetches when the payload has no `rows` yet.
struct Fetch;

#[async_trait]
impl Task<JsonPayload> for Fetch {
    fn name(&self) -> &str {
        "fetch"
    }

    fn unless(&self, payload: &JsonPayload) -> bool {
        payload.get("rows").is_none()
    }

    async fn set_up(&self, payload: &JsonPayload) -> Result<(), TaskError> {
        let source = payload.get("source").and_then(|v| v.as_str()).unwrap_or("memory");
        println!("🔌 Fetch: opening {source}");
        Ok(())
    }

    async fn run(&self, payload: &mut JsonPayload) -> Result<Outcome, TaskError> {
        payload.insert("rows", serde_json::json!([3, 1, 2]));
        Ok(Outcome::ok())
    }

    async fn tear_down(&self, payload: &JsonPayload) -> Result<(), TaskError> {
        let rows = payload.get("rows").and_then(|v| v.as_array()).map_or(0, Vec::len);
        println!("🔌 Fetch: closing source after {rows} rows");
        Ok(())
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    println!("🚀 Simple Runner Demo\n");

    let sort = TaskFn::spec("sort", |p: &mut JsonPayload| {
        let Some(rows) = p.get_mut("rows").and_then(|v| v.as_array_mut()) else {
            return Ok(Outcome::fail("no rows to sort"));
        };
        rows.sort_by_key(|v| v.as_i64());
        Ok(Outcome::ok())
    });

    // Nothing to archive in this demo: the task asks to be skipped.
    let archive = TaskFn::spec("archive", |_: &mut JsonPayload| Ok(Outcome::Skip));

    // Exits with 1; fail_on_error is off, so the run goes on.
    let audit = TaskFn::spec("audit", |p: &mut JsonPayload| {
        p.insert("audited", true);
        Ok(Outcome::Success(1))
    });

    let fetch = TaskSpec::new(Fetch).into_ref();
    let tasks = TaskSet::new()
        .with(fetch.clone())
        .with(sort.clone())
        .with(archive)
        .with(audit);

    let mut runner = Runner::with_tasks(RunnerConfig::named("simple"), tasks);
    runner
        .on_name("task.success", |ev| {
            println!("✅ {} exited with {:?}", ev.task_name().unwrap_or("-"), ev.exit_code);
        })?
        .on(EventKind::TaskSkip, |ev| {
            println!("⏭️  {} skipped", ev.task_name().unwrap_or("-"));
        })
        .on(EventKind::TaskUnlessSkip, |ev| {
            println!("⏭️  {} not needed", ev.task_name().unwrap_or("-"));
        });

    let mut payload = JsonPayload::new();
    runner.run(&mut payload).await?;
    println!("\n📦 Payload: {}", serde_json::to_string(&payload)?);

    // Second run: `rows` is present, so `fetch` is skipped by `unless`.
    runner.task_set()?.reset();
    runner.run(&mut payload).await?;
    println!(
        "\n🔁 Second run: fetch executed = {}, sort executed = {}",
        fetch.is_successfully_executed(),
        sort.is_successfully_executed()
    );
    Ok(())
}
