//! Bridge behaviour against in-process fake workers.
//!
//! Each test wires a `WorkerBridge` to one end of a pair of in-memory pipes and
//! drives the other end by hand, so reply order and timing are fully controlled.

use std::sync::Arc;
use std::time::Duration;

use ankirus_bridge::{BridgeError, BridgeState, WorkerBridge};
use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, DuplexStream, Lines};

const BOUND: Duration = Duration::from_secs(5);

/// The worker's side of the pipes.
struct FakeWorker {
    requests: Lines<BufReader<DuplexStream>>,
    replies: DuplexStream,
}

impl FakeWorker {
    async fn next_request(&mut self) -> Value {
        let line = self
            .requests
            .next_line()
            .await
            .expect("read request")
            .expect("bridge closed its input early");
        serde_json::from_str(&line).expect("request is json")
    }

    async fn reply(&mut self, reply: Value) {
        let mut line = reply.to_string();
        line.push('\n');
        self.replies.write_all(line.as_bytes()).await.expect("write reply");
    }

    async fn reply_raw(&mut self, line: &str) {
        self.replies.write_all(line.as_bytes()).await.expect("write reply");
    }
}

fn bridge_with_worker(call_timeout: Duration) -> (Arc<WorkerBridge>, FakeWorker) {
    let (bridge_out, worker_in) = tokio::io::duplex(64 * 1024);
    let (worker_out, bridge_in) = tokio::io::duplex(64 * 1024);
    let bridge = WorkerBridge::connect(bridge_in, bridge_out, call_timeout);
    let worker = FakeWorker {
        requests: BufReader::new(worker_in).lines(),
        replies: worker_out,
    };
    (Arc::new(bridge), worker)
}

async fn wait_for_pending(bridge: &WorkerBridge, count: usize) {
    tokio::time::timeout(BOUND, async {
        while bridge.pending_calls() < count {
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("calls should register");
}

#[tokio::test]
async fn requests_carry_increasing_ids_from_one() {
    let (bridge, mut worker) = bridge_with_worker(BOUND);

    let caller = tokio::spawn({
        let bridge = Arc::clone(&bridge);
        async move {
            let first = bridge.echo("a").await.unwrap();
            let second = bridge.echo("b").await.unwrap();
            (first, second)
        }
    });

    let first = worker.next_request().await;
    assert_eq!(first, json!({"id": 1, "name": "test", "args": "a"}));
    worker.reply(json!({"id": 1, "result": "a"})).await;

    let second = worker.next_request().await;
    assert_eq!(second, json!({"id": 2, "name": "test", "args": "b"}));
    worker.reply(json!({"id": 2, "result": "b"})).await;

    assert_eq!(caller.await.unwrap(), ("a".to_string(), "b".to_string()));
}

#[tokio::test]
async fn out_of_order_replies_reach_their_own_callers() {
    let (bridge, mut worker) = bridge_with_worker(BOUND);

    let callers: Vec<_> = ["one", "two", "three"]
        .into_iter()
        .map(|text| {
            let bridge = Arc::clone(&bridge);
            tokio::spawn(async move { (text, bridge.purify(text).await) })
        })
        .collect();

    let mut requests = Vec::new();
    for _ in 0..3 {
        requests.push(worker.next_request().await);
    }
    requests.sort_by_key(|request| request["id"].as_u64());
    let ids: Vec<u64> = requests.iter().filter_map(|r| r["id"].as_u64()).collect();
    assert_eq!(ids, vec![1, 2, 3]);

    // Answer 2, 3, 1.
    for index in [1, 2, 0] {
        let request = &requests[index];
        let result = format!("clean:{}", request["args"].as_str().unwrap());
        worker
            .reply(json!({"id": request["id"], "result": result}))
            .await;
    }

    for caller in callers {
        let (text, result) = caller.await.unwrap();
        assert_eq!(result.unwrap(), format!("clean:{text}"));
    }
    assert_eq!(bridge.pending_calls(), 0);
}

#[tokio::test]
async fn worker_errors_become_remote_errors() {
    let (bridge, mut worker) = bridge_with_worker(BOUND);

    let caller = tokio::spawn({
        let bridge = Arc::clone(&bridge);
        async move { bridge.purify("bad").await }
    });

    let request = worker.next_request().await;
    worker
        .reply(json!({"id": request["id"], "error": "input is not a string"}))
        .await;

    match caller.await.unwrap() {
        Err(BridgeError::Remote(message)) => assert_eq!(message, "input is not a string"),
        other => panic!("expected remote error, got {other:?}"),
    }
}

#[tokio::test]
async fn unknown_and_malformed_replies_are_discarded() {
    let (bridge, mut worker) = bridge_with_worker(BOUND);

    let caller = tokio::spawn({
        let bridge = Arc::clone(&bridge);
        async move { bridge.call("test", json!(42)).await }
    });

    let request = worker.next_request().await;
    worker.reply(json!({"id": 999, "result": "stray"})).await;
    worker.reply_raw("this is not json\n\n").await;
    worker.reply(json!({"id": request["id"], "result": 42})).await;

    assert_eq!(caller.await.unwrap().unwrap(), json!(42));
}

#[tokio::test]
async fn unexpected_result_shape_is_reported() {
    let (bridge, mut worker) = bridge_with_worker(BOUND);

    let caller = tokio::spawn({
        let bridge = Arc::clone(&bridge);
        async move { bridge.purify("x").await }
    });

    let request = worker.next_request().await;
    worker.reply(json!({"id": request["id"], "result": [1, 2]})).await;

    let err = caller.await.unwrap().unwrap_err();
    assert!(matches!(err, BridgeError::UnexpectedResult { ref method, .. } if method == "purify"));
}

#[tokio::test]
async fn timed_out_calls_leave_the_table_clean() {
    let (bridge, mut worker) = bridge_with_worker(Duration::from_millis(50));

    let caller = tokio::spawn({
        let bridge = Arc::clone(&bridge);
        async move { bridge.echo("slow").await }
    });

    let request = worker.next_request().await;
    let err = caller.await.unwrap().unwrap_err();
    assert!(matches!(err, BridgeError::Timeout { id: 1, .. }), "got {err:?}");
    assert_eq!(bridge.pending_calls(), 0);

    // The late reply is dropped and the bridge keeps working.
    worker.reply(json!({"id": request["id"], "result": "slow"})).await;
    let next = tokio::spawn({
        let bridge = Arc::clone(&bridge);
        async move { bridge.echo("fast").await }
    });
    let request = worker.next_request().await;
    assert_eq!(request["id"], json!(2));
    worker.reply(json!({"id": 2, "result": "fast"})).await;
    assert_eq!(next.await.unwrap().unwrap(), "fast");
}

#[tokio::test]
async fn close_fails_outstanding_calls() {
    let (bridge, mut worker) = bridge_with_worker(BOUND);

    // Calls 1..=6 are answered; call 7 is left hanging.
    for n in 1..=6_u64 {
        let caller = tokio::spawn({
            let bridge = Arc::clone(&bridge);
            async move { bridge.call("test", json!(n)).await }
        });
        let request = worker.next_request().await;
        worker.reply(json!({"id": request["id"], "result": n})).await;
        assert_eq!(caller.await.unwrap().unwrap(), json!(n));
    }

    let hanging = tokio::spawn({
        let bridge = Arc::clone(&bridge);
        async move { bridge.call("test", json!(7)).await }
    });
    let request = worker.next_request().await;
    assert_eq!(request["id"], json!(7));
    wait_for_pending(&bridge, 1).await;

    // The worker exits once its input closes.
    let worker_task = tokio::spawn(async move {
        while let Ok(Some(_)) = worker.requests.next_line().await {}
        drop(worker);
    });

    bridge.close().await.unwrap();
    let result = tokio::time::timeout(BOUND, hanging)
        .await
        .expect("pending call must not hang")
        .unwrap();
    let err = result.unwrap_err();
    assert!(err.is_closed(), "got {err:?}");
    assert_eq!(bridge.state(), BridgeState::Closed);
    assert_eq!(bridge.pending_calls(), 0);
    worker_task.await.unwrap();
}

#[tokio::test]
async fn close_is_idempotent_and_rejects_later_calls() {
    let (bridge, worker) = bridge_with_worker(BOUND);
    drop(worker);

    bridge.close().await.unwrap();
    bridge.close().await.unwrap();
    assert_eq!(bridge.state(), BridgeState::Closed);

    let err = bridge.echo("late").await.unwrap_err();
    assert!(err.is_closed());
}

#[tokio::test]
async fn worker_exit_fails_pending_calls() {
    let (bridge, mut worker) = bridge_with_worker(BOUND);

    let caller = tokio::spawn({
        let bridge = Arc::clone(&bridge);
        async move { bridge.echo("orphan").await }
    });
    worker.next_request().await;
    drop(worker);

    let err = tokio::time::timeout(BOUND, caller)
        .await
        .expect("call must not hang")
        .unwrap()
        .unwrap_err();
    match err {
        BridgeError::Remote(message) => assert_eq!(message, ankirus_bridge::WORKER_EXITED),
        other => panic!("expected remote error, got {other:?}"),
    }
}

#[tokio::test]
async fn mathjax_is_sent_under_its_method_name() {
    let (bridge, mut worker) = bridge_with_worker(BOUND);
    let caller = tokio::spawn({
        let bridge = Arc::clone(&bridge);
        async move { bridge.mathjax(r"\(x^2\)").await }
    });

    let request = worker.next_request().await;
    assert_eq!(request["name"], "mathjax");
    assert_eq!(request["args"], r"\(x^2\)");
    worker.reply(json!({"id": request["id"], "result": "<svg/>"})).await;

    assert_eq!(caller.await.unwrap().unwrap(), "<svg/>");
}
