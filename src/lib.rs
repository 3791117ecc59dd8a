//! # Audio Bridge Core - Engine Control/Status Bridge
//!
//! This crate is the client-side half of a bidirectional control/status
//! bridge to an out-of-process audio engine it does not implement:
//! - **handles**: per-session objects with locally-cached duration/position
//! - **commands**: fire-and-forget and single-result invocation shapes
//! - **status dispatch**: one multiplexed inbound channel demultiplexed
//!   into per-handle, per-kind callbacks
//!
//! The engine itself (decoding, mixing, output) and the transport that
//! physically carries commands and status are external collaborators; hosts
//! plug them in by implementing [`EngineTransport`].
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use async_trait::async_trait;
//! use serde_json::Value;
//! use tokio::sync::mpsc;
//!
//! use audio_bridge_core::{
//!     BridgeClient, BridgeConfig, BridgeResult, EngineTransport, Invocation,
//! };
//!
//! struct NativeBridge;
//!
//! #[async_trait]
//! impl EngineTransport for NativeBridge {
//!     async fn send(&self, invocation: Invocation) -> BridgeResult<()> {
//!         // hand the invocation to the native side
//!         # let _ = invocation;
//!         Ok(())
//!     }
//!
//!     async fn message_channel(&self) -> BridgeResult<mpsc::UnboundedReceiver<Value>> {
//!         // install the engine's status listener and return its stream
//!         let (_tx, rx) = mpsc::unbounded_channel();
//!         Ok(rx)
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = BridgeClient::new(BridgeConfig::new(), Arc::new(NativeBridge));
//!     client.start().await?;
//!
//!     let handle = client
//!         .create_handle("https://example.com/track.mp3", None)
//!         .await?;
//!     handle.play(None).await?;
//!     handle.seek_to(30_000.0).await?;
//!     println!("duration: {} ms", handle.duration().await);
//!     handle.stop().await?;
//!     handle.release().await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────┐
//! │       Application       │
//! └───────────┬─────────────┘
//!             │ create / play / seek / …        callbacks
//! ┌───────────▼─────────────┐      ┌─────────────────────────┐
//! │  BridgeClient + Handles │      │    StatusDispatcher     │
//! │  (registry, invoker)    │      │  (decode, lookup, route)│
//! └───────────┬─────────────┘      └───────────▲─────────────┘
//!             │ invocations                    │ status envelopes
//! ┌───────────▼────────────────────────────────┴─────────────┐
//! │              EngineTransport (host-supplied)             │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Features
//!
//! - Exactly-once success-xor-failure contract for single-result commands
//! - Orphaned and malformed status messages are logged and isolated,
//!   never fatal to the listener or to other handles
//! - Capability descriptor resolved once at construction gates
//!   platform-conditional behavior
//! - Event-driven: no polling, no locking discipline imposed on callers

#![warn(missing_docs)]

pub mod client;
pub mod error;
pub mod events;
pub mod handle;
mod invoker;
pub mod protocol;
pub mod registry;
pub mod transport;

// Re-export main types
pub use client::config::{BridgeConfig, EngineCapabilities};
pub use client::dispatcher::StatusDispatcher;
pub use client::{BridgeClient, BridgeStats};
pub use error::{BridgeError, BridgeResult};
pub use events::{AudioEventHandler, EngineErrorInfo, StateChangeInfo};
pub use handle::{AudioHandle, PlayOptions};
pub use protocol::{
    EngineFault, Operation, PlaybackState, StatusMessage, StatusPayload, NAMESPACE,
};
pub use registry::{HandleId, HandleRegistry};
pub use transport::{EngineTransport, Invocation};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
