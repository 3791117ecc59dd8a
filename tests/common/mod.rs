//! Shared test fixtures: an in-memory engine double and a recording
//! event handler.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, Once};

use async_trait::async_trait;
use serde_json::{json, Value};
use tokio::sync::mpsc;

use audio_bridge_core::{
    AudioEventHandler, BridgeResult, EngineErrorInfo, EngineFault, EngineTransport, Invocation,
    Operation, StateChangeInfo,
};

static TRACING: Once = Once::new();

/// Install the test log subscriber, once per test binary.
///
/// Honors `RUST_LOG`; run with `--nocapture` to see dispatch logging.
pub fn init_tracing() {
    TRACING.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .init();
    });
}

/// In-memory engine: records outbound invocations, answers the operations a
/// test scripted, and lets tests inject inbound status envelopes.
#[derive(Default)]
pub struct MockEngine {
    pub sent: Mutex<Vec<(Operation, Vec<Value>)>>,
    replies: Mutex<HashMap<Operation, Result<Value, EngineFault>>>,
    status_tx: Mutex<Option<mpsc::UnboundedSender<Value>>>,
}

impl MockEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the engine's single outcome for an operation.
    pub fn reply_with(&self, operation: Operation, reply: Result<Value, EngineFault>) {
        self.replies.lock().unwrap().insert(operation, reply);
    }

    /// Operations sent so far, in order.
    pub fn operations(&self) -> Vec<Operation> {
        self.sent.lock().unwrap().iter().map(|(op, _)| *op).collect()
    }

    /// Inject a well-formed status envelope into the inbound stream.
    pub fn push_status(&self, id: &str, msg_type: i64, value: Value) {
        self.push_envelope(json!({
            "action": "status",
            "status": { "id": id, "msgType": msg_type, "value": value }
        }));
    }

    /// Inject a raw envelope (for protocol-anomaly tests).
    pub fn push_envelope(&self, envelope: Value) {
        self.status_tx
            .lock()
            .unwrap()
            .as_ref()
            .expect("message_channel was never installed")
            .send(envelope)
            .expect("dispatch loop is gone");
    }
}

#[async_trait]
impl EngineTransport for MockEngine {
    async fn send(&self, mut invocation: Invocation) -> BridgeResult<()> {
        let reply = self
            .replies
            .lock()
            .unwrap()
            .get(&invocation.operation)
            .cloned();
        self.sent
            .lock()
            .unwrap()
            .push((invocation.operation, std::mem::take(&mut invocation.args)));
        // Unscripted operations never respond; their responders just drop,
        // which a fire-and-forget invoker must tolerate.
        if let (Some(reply), Some(tx)) = (reply, invocation.responder.take()) {
            let _ = tx.send(reply);
        }
        Ok(())
    }

    async fn message_channel(&self) -> BridgeResult<mpsc::UnboundedReceiver<Value>> {
        let (tx, rx) = mpsc::unbounded_channel();
        *self.status_tx.lock().unwrap() = Some(tx);
        Ok(rx)
    }
}

/// Event handler that records everything it sees, preserving order.
#[derive(Default)]
pub struct RecordingHandler {
    /// Flat event log, e.g. `["state:Running", "completed", "error:…"]`.
    pub log: Mutex<Vec<String>>,
    pub completions: AtomicUsize,
    pub errors: Mutex<Vec<EngineFault>>,
}

impl RecordingHandler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log_snapshot(&self) -> Vec<String> {
        self.log.lock().unwrap().clone()
    }

    pub fn completion_count(&self) -> usize {
        self.completions.load(Ordering::SeqCst)
    }

    pub fn error_count(&self) -> usize {
        self.errors.lock().unwrap().len()
    }
}

#[async_trait]
impl AudioEventHandler for RecordingHandler {
    async fn on_state_changed(&self, info: StateChangeInfo) {
        self.log
            .lock()
            .unwrap()
            .push(format!("state:{}", info.new_state));
    }

    async fn on_completed(&self, _handle_id: audio_bridge_core::HandleId) {
        self.completions.fetch_add(1, Ordering::SeqCst);
        self.log.lock().unwrap().push("completed".to_string());
    }

    async fn on_error(&self, info: EngineErrorInfo) {
        self.log
            .lock()
            .unwrap()
            .push(format!("error:{}", info.fault));
        self.errors.lock().unwrap().push(info.fault);
    }
}

/// Give the spawned dispatch loop a moment to drain injected envelopes.
pub async fn settle() {
    tokio::time::sleep(tokio::time::Duration::from_millis(50)).await;
}
