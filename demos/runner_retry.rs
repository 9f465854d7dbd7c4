//! # Bounded retries
//!
//! A flaky task asks to be retried until its third attempt. The first runner
//! allows three retries and succeeds; the second allows only one and fails
//! with a wrapped `RetriesExhausted` cause.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use taskchain::{
    JsonPayload, Outcome, Runner, RunnerConfig, TaskError, TaskFn, TaskRef, TaskSet, TaskSpec,
};
use tracing_subscriber::EnvFilter;

fn flaky(succeed_on: u32) -> TaskRef<JsonPayload> {
    let calls = Arc::new(AtomicU32::new(0));
    TaskFn::spec("flaky", move |p: &mut JsonPayload| {
        let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
        p.insert("attempts", n);
        if n < succeed_on {
            println!("🔁 flaky: attempt {n} not ready, retrying");
            return Ok::<_, TaskError>(Outcome::Retry);
        }
        println!("✅ flaky: attempt {n} done");
        Ok(Outcome::ok())
    })
}

fn runner(name: &str, max_retries: u32) -> anyhow::Result<Runner<JsonPayload>> {
    let task = flaky(3);
    task.set_max_retries(max_retries)?;
    Ok(Runner::with_tasks(
        RunnerConfig::named(name),
        TaskSet::new().with(task),
    ))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("🚀 Retry Demo\n");

    let mut payload = JsonPayload::new();
    runner("patient", 3)?.run(&mut payload).await?;
    println!("📦 patient: {}\n", serde_json::to_string(&payload)?);

    let mut payload = JsonPayload::new();
    match runner("impatient", 1)?.run(&mut payload).await {
        Ok(_) => println!("unexpected success"),
        Err(e) => {
            println!("⚠️  impatient stopped: {e}");
            if let Some(cause) = e.cause() {
                println!("   cause [{}]: {cause}", cause.as_label());
            }
        }
    }

    // A retry without a bound counter is a configuration error.
    let unbound = TaskSpec::new(TaskFn::new("unbound", |_: &mut JsonPayload| {
        Ok::<_, TaskError>(Outcome::Retry)
    }))
    .into_ref();
    let plain = Runner::with_tasks(RunnerConfig::named("plain"), TaskSet::new().with(unbound));
    if let Err(e) = plain.run(&mut JsonPayload::new()).await {
        println!("⚠️  plain stopped: {e} (invalid state: {})", e.is_invalid_state());
    }
    Ok(())
}
