//! # Chained runners
//!
//! Demonstrates chaining:
//! - An `ingest` runner whose success triggers `index` and `notify`
//! - `index` has its own chained runner (`report`)
//! - Every runner shares the same payload
//! - A failing primary run never triggers its chain
//!
//! Run with: `RUST_LOG=info cargo run --example chain_runners --features logging`

use std::sync::Arc;

use taskchain::{
    JsonPayload, LogWriter, Outcome, Runner, RunnerConfig, TaskError, TaskFn, TaskSet,
};
use tracing_subscriber::EnvFilter;

fn step(runner: &'static str, key: &'static str) -> Runner<JsonPayload> {
    let task = TaskFn::spec(key, move |p: &mut JsonPayload| {
        p.insert(key, true);
        Ok::<_, TaskError>(Outcome::ok())
    });
    let mut r = Runner::with_tasks(RunnerConfig::named(runner), TaskSet::new().with(task));
    r.subscribe(Arc::new(LogWriter::new()));
    r
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let report = Arc::new(step("report", "reported"));

    let mut index = step("index", "indexed");
    index.attach(report)?;
    let index = index.into_shared();

    let notify = Arc::new(step("notify", "notified"));

    let mut ingest = step("ingest", "ingested");
    ingest.attach(Arc::clone(&index))?;
    ingest.attach(Arc::clone(&notify))?;

    let mut payload = JsonPayload::new();
    ingest.run(&mut payload).await?;
    println!("📦 after chain: {}", serde_json::to_string(&payload)?);

    // Detached runners are no longer notified.
    ingest.detach(&notify)?;
    let mut payload = JsonPayload::new();
    ingest.run(&mut payload).await?;
    println!("📦 after detach: {}", serde_json::to_string(&payload)?);

    // A failing primary keeps its chain untouched.
    let broken = TaskFn::spec("broken", |_: &mut JsonPayload| {
        Ok::<_, TaskError>(Outcome::fail_with_code("upstream unavailable", 75))
    });
    let mut guarded = Runner::with_tasks(RunnerConfig::named("guarded"), TaskSet::new().with(broken));
    guarded.subscribe(Arc::new(LogWriter::new()));
    guarded.attach(index)?;

    let mut payload = JsonPayload::new();
    if let Err(e) = guarded.run(&mut payload).await {
        println!("⚠️  {e}; indexed = {:?}", payload.get("indexed"));
    }
    Ok(())
}
