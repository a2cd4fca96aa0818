//! The worker bridge: one subprocess, many concurrent calls.

use std::process::Stdio;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use ankirus_config::WorkerConfig;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::{BRIDGE_CLOSED, BridgeError, WORKER_EXITED};
use crate::pending::PendingCalls;
use crate::protocol::{Reply, Request};

type BoxedWriter = Box<dyn AsyncWrite + Send + Unpin>;

/// Lifecycle of a [`WorkerBridge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BridgeState {
    NotStarted,
    Running,
    Closing,
    Closed,
}

/// Executable and arguments of the worker process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerCommand {
    pub program: String,
    pub args: Vec<String>,
}

impl WorkerCommand {
    pub fn new<I, S>(program: impl Into<String>, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            program: program.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }
}

/// Request/reply client for a long-running worker process.
///
/// Calls are tagged with increasing correlation ids, written one line at a
/// time under a write lock, and resolved independently as reply lines arrive,
/// in whatever order the worker produces them.
pub struct WorkerBridge {
    command: Option<WorkerCommand>,
    call_timeout: Duration,
    next_id: AtomicU64,
    state: Arc<Mutex<BridgeState>>,
    pending: Arc<PendingCalls>,
    output_ended: Arc<AtomicBool>,
    writer: tokio::sync::Mutex<Option<BoxedWriter>>,
    child: tokio::sync::Mutex<Option<Child>>,
    reader: Mutex<Option<JoinHandle<()>>>,
}

impl std::fmt::Debug for WorkerBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkerBridge")
            .field("command", &self.command)
            .field("call_timeout", &self.call_timeout)
            .field("state", &self.state())
            .field("pending", &self.pending.len())
            .finish_non_exhaustive()
    }
}

impl WorkerBridge {
    /// A bridge that spawns `command` on [`start`](Self::start) or on the first call.
    #[must_use]
    pub fn new(command: WorkerCommand, call_timeout: Duration) -> Self {
        Self::with_state(Some(command), call_timeout, BridgeState::NotStarted)
    }

    #[must_use]
    pub fn from_config(config: &WorkerConfig) -> Self {
        Self::new(
            WorkerCommand::new(&config.program, &config.args),
            config.call_timeout(),
        )
    }

    /// A running bridge over already-open streams instead of a subprocess.
    ///
    /// `output` carries reply lines from the worker, `input` receives request
    /// lines. Must be called within a tokio runtime.
    pub fn connect<R, W>(output: R, input: W, call_timeout: Duration) -> Self
    where
        R: AsyncRead + Send + Unpin + 'static,
        W: AsyncWrite + Send + Unpin + 'static,
    {
        let bridge = Self::with_state(None, call_timeout, BridgeState::Running);
        bridge.attach(output, Box::new(input));
        bridge
    }

    fn with_state(
        command: Option<WorkerCommand>,
        call_timeout: Duration,
        state: BridgeState,
    ) -> Self {
        Self {
            command,
            call_timeout,
            next_id: AtomicU64::new(1),
            state: Arc::new(Mutex::new(state)),
            pending: Arc::new(PendingCalls::default()),
            output_ended: Arc::new(AtomicBool::new(false)),
            writer: tokio::sync::Mutex::new(None),
            child: tokio::sync::Mutex::new(None),
            reader: Mutex::new(None),
        }
    }

    #[must_use]
    pub fn state(&self) -> BridgeState {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_state(&self, state: BridgeState) {
        *self.state.lock().unwrap_or_else(PoisonError::into_inner) = state;
    }

    /// Number of calls currently awaiting a reply.
    #[must_use]
    pub fn pending_calls(&self) -> usize {
        self.pending.len()
    }

    /// Spawn the worker process. No-op when already running.
    ///
    /// # Errors
    ///
    /// Returns `BridgeError::Spawn` if the process cannot be started, or a
    /// closed error if the bridge was already closed.
    pub async fn start(&self) -> Result<(), BridgeError> {
        // Holding the write lock keeps concurrent first calls from spawning twice.
        let mut writer = self.writer.lock().await;
        match self.state() {
            BridgeState::Running => return Ok(()),
            BridgeState::Closing | BridgeState::Closed => return Err(BridgeError::closed()),
            BridgeState::NotStarted => {}
        }
        let Some(command) = &self.command else {
            return Err(BridgeError::closed());
        };

        let mut child = Command::new(&command.program)
            .args(&command.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| BridgeError::Spawn {
                program: command.program.clone(),
                source,
            })?;

        let (Some(stdin), Some(stdout)) = (child.stdin.take(), child.stdout.take()) else {
            return Err(BridgeError::Io(std::io::Error::other(
                "worker stdio was not captured",
            )));
        };
        if let Some(stderr) = child.stderr.take() {
            tokio::spawn(forward_stderr(stderr));
        }

        info!(program = %command.program, pid = ?child.id(), "worker started");
        *writer = Some(Box::new(stdin));
        *self.child.lock().await = Some(child);
        self.spawn_reader(stdout);
        // Published before the write lock is released so that a start queued
        // behind this one finds `Running`.
        self.set_state(BridgeState::Running);
        drop(writer);
        Ok(())
    }

    fn attach<R>(&self, output: R, input: BoxedWriter)
    where
        R: AsyncRead + Send + Unpin + 'static,
    {
        // Only reachable from `connect`, before the bridge is shared.
        if let Ok(mut writer) = self.writer.try_lock() {
            *writer = Some(input);
        }
        self.spawn_reader(output);
    }

    fn spawn_reader<R>(&self, output: R)
    where
        R: AsyncRead + Send + Unpin + 'static,
    {
        let handle = tokio::spawn(read_replies(
            output,
            Arc::clone(&self.pending),
            Arc::clone(&self.state),
            Arc::clone(&self.output_ended),
        ));
        *self.reader.lock().unwrap_or_else(PoisonError::into_inner) = Some(handle);
    }

    /// Invoke `method` on the worker and wait for its reply.
    ///
    /// Starts the worker first if the bridge has not been started.
    ///
    /// # Errors
    ///
    /// Returns `BridgeError::Remote` when the worker reports an error or the
    /// bridge closes before the reply arrives, and `BridgeError::Timeout` when
    /// no reply arrives within the call timeout.
    pub async fn call(&self, method: &str, args: Value) -> Result<Value, BridgeError> {
        if self.state() == BridgeState::NotStarted {
            self.start().await?;
        }
        if self.state() != BridgeState::Running {
            return Err(BridgeError::closed());
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let line = Request {
            id,
            name: method,
            args: &args,
        }
        .to_line()?;

        let slot = self.pending.register(id);
        if self.output_ended.load(Ordering::SeqCst) {
            self.pending.remove(id);
            return Err(BridgeError::Remote(WORKER_EXITED.to_string()));
        }
        if let Err(error) = self.write_line(&line).await {
            self.pending.remove(id);
            return Err(error);
        }
        debug!(id, method, "worker call sent");

        match tokio::time::timeout(self.call_timeout, slot).await {
            Ok(Ok(Ok(value))) => Ok(value),
            Ok(Ok(Err(message))) => Err(BridgeError::Remote(message)),
            Ok(Err(_)) => Err(BridgeError::closed()),
            Err(_) => {
                self.pending.remove(id);
                warn!(id, method, timeout = ?self.call_timeout, "worker call timed out");
                Err(BridgeError::Timeout {
                    id,
                    method: method.to_string(),
                    timeout: self.call_timeout,
                })
            }
        }
    }

    async fn write_line(&self, line: &str) -> Result<(), BridgeError> {
        let mut writer = self.writer.lock().await;
        let Some(stream) = writer.as_mut() else {
            return Err(BridgeError::closed());
        };
        stream.write_all(line.as_bytes()).await?;
        stream.flush().await?;
        Ok(())
    }

    /// Call `method` and decode its result as `T`.
    ///
    /// # Errors
    ///
    /// Same as [`call`](Self::call), plus `BridgeError::UnexpectedResult` when
    /// the result does not decode as `T`.
    pub async fn call_as<T: DeserializeOwned>(
        &self,
        method: &str,
        args: Value,
    ) -> Result<T, BridgeError> {
        let value = self.call(method, args).await?;
        serde_json::from_value(value).map_err(|source| BridgeError::UnexpectedResult {
            method: method.to_string(),
            source,
        })
    }

    /// HTML sanitization of `html` by the worker.
    ///
    /// # Errors
    ///
    /// See [`call_as`](Self::call_as).
    pub async fn purify(&self, html: &str) -> Result<String, BridgeError> {
        self.call_as("purify", Value::from(html)).await
    }

    /// Server-side `MathJax` rendering of `text` by the worker.
    ///
    /// # Errors
    ///
    /// See [`call_as`](Self::call_as).
    pub async fn mathjax(&self, text: &str) -> Result<String, BridgeError> {
        self.call_as("mathjax", Value::from(text)).await
    }

    /// Round-trips `text` through the worker's `test` method.
    ///
    /// # Errors
    ///
    /// See [`call_as`](Self::call_as).
    pub async fn echo(&self, text: &str) -> Result<String, BridgeError> {
        self.call_as("test", Value::from(text)).await
    }

    /// Shut the worker down and fail every call still waiting.
    ///
    /// Closes the worker's input, waits (bounded by the call timeout) for it to
    /// exit and for its remaining output to be read, then resolves all pending
    /// calls with a "bridge closed" error. Safe to call more than once.
    ///
    /// # Errors
    ///
    /// Returns `BridgeError::Io` if waiting on the worker process fails.
    pub async fn close(&self) -> Result<(), BridgeError> {
        {
            let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
            match *state {
                BridgeState::Closing | BridgeState::Closed => return Ok(()),
                BridgeState::NotStarted => {
                    *state = BridgeState::Closed;
                    return Ok(());
                }
                BridgeState::Running => *state = BridgeState::Closing,
            }
        }

        let writer = self.writer.lock().await.take();
        if let Some(mut stream) = writer
            && let Err(error) = stream.shutdown().await
        {
            debug!(%error, "worker input already closed");
        }

        let child = self.child.lock().await.take();
        let mut wait_result = Ok(());
        if let Some(mut child) = child {
            match tokio::time::timeout(self.call_timeout, child.wait()).await {
                Ok(Ok(status)) => info!(%status, "worker exited"),
                Ok(Err(error)) => wait_result = Err(BridgeError::Io(error)),
                Err(_) => {
                    warn!(timeout = ?self.call_timeout, "worker did not exit, killing it");
                    if let Err(error) = child.kill().await {
                        wait_result = Err(BridgeError::Io(error));
                    }
                }
            }
        }

        let reader = self
            .reader
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = reader {
            let abort = handle.abort_handle();
            if tokio::time::timeout(self.call_timeout, handle).await.is_err() {
                abort.abort();
            }
        }

        self.set_state(BridgeState::Closed);
        let abandoned = self.pending.fail_all(BRIDGE_CLOSED);
        if abandoned > 0 {
            warn!(abandoned, "failed pending worker calls on close");
        }
        wait_result
    }
}

/// Resolve pending calls from reply lines until the worker's output ends.
///
/// An end of output while the bridge is still running means the worker died:
/// pending calls fail right away. During `close` the drain is left to `close`.
async fn read_replies<R>(
    output: R,
    pending: Arc<PendingCalls>,
    state: Arc<Mutex<BridgeState>>,
    output_ended: Arc<AtomicBool>,
) where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(output).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => handle_reply_line(&line, &pending),
            Ok(None) => break,
            Err(error) => {
                warn!(%error, "failed to read worker output");
                break;
            }
        }
    }

    output_ended.store(true, Ordering::SeqCst);
    let running = *state.lock().unwrap_or_else(PoisonError::into_inner) == BridgeState::Running;
    if running {
        let abandoned = pending.fail_all(WORKER_EXITED);
        warn!(abandoned, "worker output ended while running");
    }
}

fn handle_reply_line(line: &str, pending: &PendingCalls) {
    let line = line.trim();
    if line.is_empty() {
        return;
    }
    match serde_json::from_str::<Reply>(line) {
        Ok(reply) => {
            let id = reply.id();
            if !pending.resolve(id, reply.into_outcome()) {
                debug!(id, "discarding reply for unknown call");
            }
        }
        Err(error) => warn!(%error, line, "undecodable worker output"),
    }
}

async fn forward_stderr<R>(stderr: R)
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(stderr).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        warn!(target: "ankirus::worker", "{line}");
    }
}
