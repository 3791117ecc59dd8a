//! Event handling for audio bridge sessions
//!
//! Each handle may carry one [`AudioEventHandler`] supplied at creation.
//! The status dispatcher invokes it for the engine's unsolicited events:
//! state transitions, playback completion, and runtime errors. Duration and
//! position reports update the handle's cached fields silently and never
//! reach the handler.
//!
//! All methods default to no-ops, so applications implement only the events
//! they care about.
//!
//! # Examples
//!
//! ```rust
//! use audio_bridge_core::events::{AudioEventHandler, EngineErrorInfo, StateChangeInfo};
//! use audio_bridge_core::registry::HandleId;
//! use async_trait::async_trait;
//!
//! struct LoggingHandler;
//!
//! #[async_trait]
//! impl AudioEventHandler for LoggingHandler {
//!     async fn on_state_changed(&self, info: StateChangeInfo) {
//!         println!("{} is now {}", info.handle_id, info.new_state);
//!     }
//!
//!     async fn on_completed(&self, handle_id: HandleId) {
//!         println!("{} finished playing", handle_id);
//!     }
//!
//!     async fn on_error(&self, info: EngineErrorInfo) {
//!         eprintln!("{} failed: {}", info.handle_id, info.fault);
//!     }
//! }
//! ```

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::protocol::{EngineFault, PlaybackState};
use crate::registry::HandleId;

/// Information about a playback state transition
#[derive(Debug, Clone)]
pub struct StateChangeInfo {
    /// Handle whose state changed
    pub handle_id: HandleId,
    /// The state the engine reported
    pub new_state: PlaybackState,
    /// When the report was dispatched
    pub timestamp: DateTime<Utc>,
}

/// Information about an engine-reported runtime error
///
/// Runtime errors are not fatal to the handle; it remains usable afterward.
#[derive(Debug, Clone)]
pub struct EngineErrorInfo {
    /// Handle the error belongs to
    pub handle_id: HandleId,
    /// The normalized engine fault
    pub fault: EngineFault,
    /// When the report was dispatched
    pub timestamp: DateTime<Utc>,
}

/// Handler for per-session engine events
///
/// Registered once at handle creation. The dispatcher calls these methods
/// synchronously with message delivery, one message at a time, in order.
#[async_trait]
pub trait AudioEventHandler: Send + Sync {
    /// The engine reported a playback state transition
    async fn on_state_changed(&self, _info: StateChangeInfo) {}

    /// Playback reached the stopped state
    ///
    /// Fired once per stopped-state report, after [`on_state_changed`]
    /// for the same message. Stopping is the defined successful-completion
    /// signal, decoupled from any explicit stop command.
    ///
    /// [`on_state_changed`]: AudioEventHandler::on_state_changed
    async fn on_completed(&self, _handle_id: HandleId) {}

    /// The engine reported a runtime error, or a fire-and-forget command
    /// failed asynchronously
    async fn on_error(&self, _info: EngineErrorInfo) {}
}
