//! Unit tests for the client surface: lifecycle, handle creation,
//! validation, and capability gating over a recording transport.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::mpsc;
use tokio_test::assert_ok;

use crate::error::{BridgeError, BridgeResult};
use crate::protocol::Operation;
use crate::transport::{EngineTransport, Invocation};

use super::config::{BridgeConfig, EngineCapabilities};
use super::BridgeClient;

/// Transport that records every invocation and never responds.
#[derive(Default)]
struct RecordingTransport {
    sent: Mutex<Vec<(Operation, Vec<Value>)>>,
    channels_installed: AtomicUsize,
    status_tx: Mutex<Option<mpsc::UnboundedSender<Value>>>,
}

impl RecordingTransport {
    fn operations(&self) -> Vec<Operation> {
        self.sent.lock().unwrap().iter().map(|(op, _)| *op).collect()
    }
}

#[async_trait]
impl EngineTransport for RecordingTransport {
    async fn send(&self, invocation: Invocation) -> BridgeResult<()> {
        self.sent
            .lock()
            .unwrap()
            .push((invocation.operation, invocation.args));
        Ok(())
    }

    async fn message_channel(&self) -> BridgeResult<mpsc::UnboundedReceiver<Value>> {
        self.channels_installed.fetch_add(1, Ordering::SeqCst);
        let (tx, rx) = mpsc::unbounded_channel();
        *self.status_tx.lock().unwrap() = Some(tx);
        Ok(rx)
    }
}

#[tokio::test]
async fn create_handle_requires_start() {
    let transport = Arc::new(RecordingTransport::default());
    let client = BridgeClient::new(BridgeConfig::new(), transport);

    let result = client.create_handle("asset://beep.wav", None).await;
    assert!(matches!(result, Err(BridgeError::NotRunning { .. })));
}

#[tokio::test]
async fn create_handle_rejects_empty_source() {
    let transport = Arc::new(RecordingTransport::default());
    let client = BridgeClient::new(BridgeConfig::new(), transport.clone());
    client.start().await.unwrap();

    let result = client.create_handle("   ", None).await;
    assert!(matches!(result, Err(BridgeError::InvalidArgument { .. })));

    // Validation failed before any registration or engine contact.
    assert_eq!(client.get_stats().await.total_handles, 0);
    assert!(transport.operations().is_empty());
}

#[tokio::test]
async fn create_handle_registers_and_issues_create() {
    let transport = Arc::new(RecordingTransport::default());
    let client = BridgeClient::new(BridgeConfig::new(), transport.clone());
    tokio_test::assert_ok!(client.start().await);

    let handle = client.create_handle("asset://beep.wav", None).await.unwrap();

    // Lookup of the fresh id returns the same object.
    let found = client.lookup_handle(&handle.id()).expect("handle registered");
    assert!(Arc::ptr_eq(&handle, &found));

    // The create command carried (id, source), positionally.
    let sent = transport.sent.lock().unwrap();
    let (operation, args) = &sent[0];
    assert_eq!(*operation, Operation::Create);
    assert_eq!(args[0], Value::String(handle.id().to_string()));
    assert_eq!(args[1], Value::String("asset://beep.wav".to_string()));
}

#[tokio::test]
async fn handle_ids_are_unique() {
    let transport = Arc::new(RecordingTransport::default());
    let client = BridgeClient::new(BridgeConfig::new(), transport);
    client.start().await.unwrap();

    let a = client.create_handle("asset://a.wav", None).await.unwrap();
    let b = client.create_handle("asset://b.wav", None).await.unwrap();
    assert_ne!(a.id(), b.id());
    assert_eq!(client.get_stats().await.total_handles, 2);
}

#[tokio::test]
async fn set_rate_is_suppressed_without_capability() {
    let transport = Arc::new(RecordingTransport::default());
    let config = BridgeConfig::new()
        .with_platform("android")
        .with_capabilities(EngineCapabilities {
            supports_playback_rate: false,
            requires_status_channel: true,
        });
    let client = BridgeClient::new(config, transport.clone());
    client.start().await.unwrap();

    let handle = client.create_handle("asset://beep.wav", None).await.unwrap();
    tokio_test::assert_ok!(handle.set_rate(1.5).await);

    // No setRate command reached the transport; the call downgraded to a
    // warning, not an error.
    assert!(!transport.operations().contains(&Operation::SetRate));
}

#[tokio::test]
async fn set_rate_is_forwarded_with_capability() {
    let transport = Arc::new(RecordingTransport::default());
    let client = BridgeClient::new(BridgeConfig::new(), transport.clone());
    client.start().await.unwrap();

    let handle = client.create_handle("asset://beep.wav", None).await.unwrap();
    handle.set_rate(1.5).await.unwrap();

    assert!(transport.operations().contains(&Operation::SetRate));
}

#[tokio::test]
async fn listener_installation_follows_capabilities() {
    let transport = Arc::new(RecordingTransport::default());
    let config = BridgeConfig::new().with_capabilities(EngineCapabilities {
        supports_playback_rate: true,
        requires_status_channel: false,
    });
    let client = BridgeClient::new(config, transport.clone());
    client.start().await.unwrap();

    assert_eq!(transport.channels_installed.load(Ordering::SeqCst), 0);

    let transport = Arc::new(RecordingTransport::default());
    let client = BridgeClient::new(BridgeConfig::new(), transport.clone());
    client.start().await.unwrap();

    assert_eq!(transport.channels_installed.load(Ordering::SeqCst), 1);
    assert!(transport.status_tx.lock().unwrap().is_some());
}

#[tokio::test]
async fn start_is_idempotent() {
    let transport = Arc::new(RecordingTransport::default());
    let client = BridgeClient::new(BridgeConfig::new(), transport.clone());
    client.start().await.unwrap();
    client.start().await.unwrap();

    // The singleton listener was installed exactly once.
    assert_eq!(transport.channels_installed.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn stop_marks_client_not_running() {
    let transport = Arc::new(RecordingTransport::default());
    let client = BridgeClient::new(BridgeConfig::new(), transport);
    client.start().await.unwrap();
    assert!(client.get_stats().await.is_running);

    client.stop().await;
    assert!(!client.get_stats().await.is_running);
}

#[tokio::test]
async fn fire_and_forget_commands_record_id_first() {
    let transport = Arc::new(RecordingTransport::default());
    let client = BridgeClient::new(BridgeConfig::new(), transport.clone());
    client.start().await.unwrap();

    let handle = client.create_handle("asset://beep.wav", None).await.unwrap();
    handle.play(None).await.unwrap();
    handle.pause().await.unwrap();
    handle.set_volume(0.5).await.unwrap();
    handle.release().await.unwrap();

    let sent = transport.sent.lock().unwrap();
    let wire_id = Value::String(handle.id().to_string());
    for (operation, args) in sent.iter() {
        assert_eq!(
            args[0], wire_id,
            "first arg of {operation} must be the handle id"
        );
    }
    let ops: Vec<Operation> = sent.iter().map(|(op, _)| *op).collect();
    assert_eq!(
        ops,
        vec![
            Operation::Create,
            Operation::StartPlayingAudio,
            Operation::PausePlayingAudio,
            Operation::SetVolume,
            Operation::Release,
        ]
    );
}

#[tokio::test]
async fn duration_defaults_to_unknown_sentinel() {
    let transport = Arc::new(RecordingTransport::default());
    let client = BridgeClient::new(BridgeConfig::new(), transport);
    client.start().await.unwrap();

    let handle = client.create_handle("asset://beep.wav", None).await.unwrap();
    assert_eq!(handle.duration().await, -1);
    assert_eq!(handle.cached_position().await, -1.0);
}
