// tests/runtime_fake_backend.rs

use std::error::Error;
use std::path::PathBuf;

use tokio::sync::mpsc;
use tokio::time::{Duration, timeout};

use atomizer_watch::build::BuildRequest;
use atomizer_watch::engine::{CoreRuntime, Runtime, RuntimeEvent, RuntimeOptions};
use atomizer_watch::errors::AtomizerError;
use atomizer_watch_test_utils::fakes::{RecordingBackend, completed, failed};
use atomizer_watch_test_utils::{init_tracing, with_timeout};

type TestResult = Result<(), Box<dyn Error>>;

fn added(p: &str) -> RuntimeEvent {
    RuntimeEvent::FileAdded { path: PathBuf::from(p) }
}

fn removed(p: &str) -> RuntimeEvent {
    RuntimeEvent::FileRemoved { path: PathBuf::from(p) }
}

fn changed(p: &str) -> RuntimeEvent {
    RuntimeEvent::FileChanged { path: PathBuf::from(p) }
}

async fn next_request(rx: &mut mpsc::UnboundedReceiver<BuildRequest>) -> BuildRequest {
    with_timeout(rx.recv()).await.expect("backend dropped")
}

#[tokio::test]
async fn removal_and_addition_during_build_cause_exactly_one_rebuild() -> TestResult {
    init_tracing();

    let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(16);
    let (started_tx, mut started_rx) = mpsc::unbounded_channel();
    let backend = RecordingBackend::new().notify_on_start(started_tx);
    let recorded = backend.clone();

    let core = CoreRuntime::new(RuntimeOptions::default());
    let runtime = tokio::spawn(Runtime::new(core, rt_rx, backend).run());

    rt_tx.send(added("/w/x.js")).await?;
    rt_tx.send(RuntimeEvent::WatcherReady).await?;

    let first = next_request(&mut started_rx).await;
    assert_eq!(first.build_id, 1);
    assert_eq!(first.inputs, vec![PathBuf::from("/w/x.js")]);

    // Both land while build 1 is in flight.
    rt_tx.send(removed("/w/x.js")).await?;
    rt_tx.send(added("/w/y.js")).await?;
    rt_tx.send(completed(1)).await?;

    let second = next_request(&mut started_rx).await;
    assert_eq!(second.build_id, 2);
    assert_eq!(second.inputs, vec![PathBuf::from("/w/y.js")]);

    rt_tx.send(completed(2)).await?;
    rt_tx.send(RuntimeEvent::ShutdownRequested).await?;

    with_timeout(runtime).await??;
    assert_eq!(recorded.requests().len(), 2);
    Ok(())
}

#[tokio::test]
async fn changes_after_idle_start_a_new_build() -> TestResult {
    init_tracing();

    let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(16);
    let (started_tx, mut started_rx) = mpsc::unbounded_channel();
    let backend = RecordingBackend::new().notify_on_start(started_tx);

    let core = CoreRuntime::new(RuntimeOptions::default());
    let runtime = tokio::spawn(Runtime::new(core, rt_rx, backend).run());

    rt_tx.send(added("/w/a.html")).await?;
    rt_tx.send(RuntimeEvent::WatcherReady).await?;
    assert_eq!(next_request(&mut started_rx).await.build_id, 1);
    rt_tx.send(completed(1)).await?;

    rt_tx.send(changed("/w/a.html")).await?;
    let again = next_request(&mut started_rx).await;
    assert_eq!(again.build_id, 2);
    assert_eq!(again.inputs, vec![PathBuf::from("/w/a.html")]);

    rt_tx.send(completed(2)).await?;
    rt_tx.send(RuntimeEvent::ShutdownRequested).await?;
    with_timeout(runtime).await??;
    Ok(())
}

#[tokio::test]
async fn single_build_mode_builds_once_and_exits() -> TestResult {
    init_tracing();

    let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(16);
    let backend = RecordingBackend::new();
    let recorded = backend.clone();

    // Everything is queued up front; the fake backend never completes on
    // its own, so `completed(1)` stands in for the build finishing.
    rt_tx.send(added("/p/a.html")).await?;
    rt_tx.send(added("/p/b.html")).await?;
    rt_tx.send(RuntimeEvent::WatcherReady).await?;
    rt_tx.send(completed(1)).await?;

    let core = CoreRuntime::new(RuntimeOptions { exit_when_idle: true });
    let runtime = Runtime::new(core, rt_rx, backend);

    match timeout(Duration::from_secs(3), runtime.run()).await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => return Err(e.into()),
        Err(_) => panic!("runtime did not finish within 3 seconds"),
    }

    let requests = recorded.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(
        requests[0].inputs,
        vec![PathBuf::from("/p/a.html"), PathBuf::from("/p/b.html")]
    );
    // Keep the sender alive until the runtime is done.
    drop(rt_tx);
    Ok(())
}

#[tokio::test]
async fn failed_build_stops_the_runtime_with_its_error() -> TestResult {
    init_tracing();

    let (rt_tx, rt_rx) = mpsc::channel::<RuntimeEvent>(16);
    let backend = RecordingBackend::new();

    rt_tx.send(added("/w/x.js")).await?;
    rt_tx.send(RuntimeEvent::WatcherReady).await?;
    rt_tx.send(failed(1, "generator exploded")).await?;
    // Must never be looked at: the runtime stops on the failure.
    rt_tx.send(changed("/w/x.js")).await?;

    let core = CoreRuntime::new(RuntimeOptions::default());
    let result = with_timeout(Runtime::new(core, rt_rx, backend.clone()).run()).await;

    match result {
        Err(AtomizerError::GenerationError(msg)) => assert_eq!(msg, "generator exploded"),
        other => panic!("expected GenerationError, got {other:?}"),
    }
    assert_eq!(backend.requests().len(), 1);
    drop(rt_tx);
    Ok(())
}
