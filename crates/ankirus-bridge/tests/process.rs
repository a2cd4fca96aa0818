//! Bridge behaviour against real subprocesses.

#![cfg(unix)]

use std::sync::Arc;
use std::time::Duration;

use ankirus_bridge::{BridgeError, BridgeState, WorkerBridge, WorkerCommand};
use pretty_assertions::assert_eq;

/// Minimal protocol speaker: answers every request with `"ok"`.
const SH_WORKER: &str = r#"
while IFS= read -r line; do
  id=$(printf '%s\n' "$line" | sed -n 's/^{"id":\([0-9]*\),.*/\1/p')
  printf '{"id":%s,"result":"ok"}\n' "$id"
done
"#;

fn sh_worker() -> WorkerBridge {
    WorkerBridge::new(
        WorkerCommand::new("sh", ["-c", SH_WORKER]),
        Duration::from_secs(5),
    )
}

#[tokio::test]
async fn first_call_starts_the_worker() {
    let bridge = sh_worker();
    assert_eq!(bridge.state(), BridgeState::NotStarted);

    assert_eq!(bridge.echo("hello").await.unwrap(), "ok");
    assert_eq!(bridge.state(), BridgeState::Running);
    assert_eq!(bridge.purify("<p>x</p>").await.unwrap(), "ok");

    bridge.close().await.unwrap();
    assert_eq!(bridge.state(), BridgeState::Closed);
}

#[tokio::test]
async fn explicit_start_is_idempotent() {
    let bridge = sh_worker();
    bridge.start().await.unwrap();
    bridge.start().await.unwrap();
    assert_eq!(bridge.state(), BridgeState::Running);
    bridge.close().await.unwrap();
    assert!(bridge.start().await.unwrap_err().is_closed());
}

#[tokio::test]
async fn echoed_requests_are_not_mistaken_for_replies() {
    // `cat` writes every request straight back; none of them is a reply.
    let bridge = WorkerBridge::new(
        WorkerCommand::new("cat", Vec::<String>::new()),
        Duration::from_millis(200),
    );

    let err = bridge.echo("loop").await.unwrap_err();
    assert!(matches!(err, BridgeError::Timeout { id: 1, .. }), "got {err:?}");
    assert_eq!(bridge.pending_calls(), 0);

    bridge.close().await.unwrap();
}

#[tokio::test]
async fn missing_program_is_a_spawn_error() {
    let bridge = WorkerBridge::new(
        WorkerCommand::new("ankirus-definitely-not-installed", Vec::<String>::new()),
        Duration::from_secs(1),
    );
    let err = bridge.echo("x").await.unwrap_err();
    assert!(matches!(err, BridgeError::Spawn { .. }), "got {err:?}");
    assert_eq!(bridge.state(), BridgeState::NotStarted);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_first_calls_spawn_one_worker() {
    let dir = tempfile::tempdir().unwrap();
    let log = dir.path().join("spawns");
    let script = format!("echo spawned >> '{}'\n{SH_WORKER}", log.display());
    let bridge = Arc::new(WorkerBridge::new(
        WorkerCommand::new("sh", ["-c", script.as_str()]),
        Duration::from_secs(5),
    ));

    let calls: Vec<_> = (0..16)
        .map(|i| {
            let bridge = Arc::clone(&bridge);
            tokio::spawn(async move { bridge.echo(&format!("call {i}")).await })
        })
        .collect();
    for call in calls {
        assert_eq!(call.await.unwrap().unwrap(), "ok");
    }

    bridge.close().await.unwrap();
    let spawns = std::fs::read_to_string(&log).unwrap();
    assert_eq!(spawns.lines().count(), 1);
}
