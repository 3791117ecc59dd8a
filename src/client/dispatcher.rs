//! Status dispatch
//!
//! The [`StatusDispatcher`] is the single inbound entry point: it decodes
//! one multiplexed status envelope at a time, looks up the target handle in
//! the registry, and routes the typed payload to that handle's cached state
//! and event handler. Isolation between handles is solely by id lookup;
//! there is no cross-handle shared mutable state, so one handle's malformed
//! message can never affect another handle.
//!
//! Anomaly policy, per message and never fatal to the listener:
//! - unknown envelope action: protocol error, message dropped;
//! - unknown message kind or malformed value: logged, ignored;
//! - message for an unregistered id: logged, ignored (orphaned or
//!   late-arriving status is a normal condition).

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;
use tokio::sync::mpsc;

use crate::error::{BridgeError, BridgeResult};
use crate::events::{EngineErrorInfo, StateChangeInfo};
use crate::protocol::{
    DecodeError, PlaybackState, StatusEnvelope, StatusMessage, StatusPayload, STATUS_ACTION,
};
use crate::registry::HandleRegistry;

/// Routes inbound status messages to their handles
#[derive(Debug, Clone)]
pub struct StatusDispatcher {
    registry: Arc<HandleRegistry>,
}

impl StatusDispatcher {
    /// Create a dispatcher over the given registry.
    pub fn new(registry: Arc<HandleRegistry>) -> Self {
        Self { registry }
    }

    /// Drain the inbound envelope stream until the transport closes it
    ///
    /// Envelopes are processed one at a time, in delivery order. A rejected
    /// envelope is logged and dropped; the loop continues.
    pub async fn run(self, mut envelopes: mpsc::UnboundedReceiver<Value>) {
        while let Some(envelope) = envelopes.recv().await {
            if let Err(err) = self.dispatch_envelope(envelope).await {
                tracing::error!(%err, "rejected inbound engine message");
            }
        }
        tracing::info!("engine status channel closed, dispatch loop ending");
    }

    /// Decode and dispatch one raw envelope
    ///
    /// Returns an error only for protocol violations (undecodable envelope,
    /// unknown action); those are fatal for the message, not the process.
    pub async fn dispatch_envelope(&self, raw: Value) -> BridgeResult<()> {
        let envelope: StatusEnvelope = serde_json::from_value(raw)
            .map_err(|e| BridgeError::protocol(format!("undecodable envelope: {e}")))?;

        if envelope.action != STATUS_ACTION {
            return Err(BridgeError::protocol(format!(
                "unknown inbound action: {}",
                envelope.action
            )));
        }

        let raw_status = envelope
            .status
            .ok_or_else(|| BridgeError::protocol("status envelope without status body"))?;

        match raw_status.decode() {
            Ok(message) => {
                self.on_status(message).await;
                Ok(())
            }
            // Unknown kinds and malformed values are logged and ignored,
            // not rejected.
            Err(err @ DecodeError::UnknownKind(_)) => {
                tracing::error!(%err, "unhandled status message kind");
                Ok(())
            }
            Err(err) => {
                tracing::error!(%err, "malformed status message, ignoring");
                Ok(())
            }
        }
    }

    /// Route one decoded status message to its handle
    ///
    /// Messages for ids not present in the registry are no-ops with respect
    /// to every other handle's state and callbacks.
    pub async fn on_status(&self, message: StatusMessage) {
        let Some(handle) = self.registry.lookup_wire(&message.id) else {
            tracing::warn!(id = %message.id, "status for unknown handle, dropping");
            return;
        };
        let handle_id = handle.id();

        match message.payload {
            StatusPayload::State(state) => {
                if let Some(events) = handle.events() {
                    events
                        .on_state_changed(StateChangeInfo {
                            handle_id,
                            new_state: state,
                            timestamp: Utc::now(),
                        })
                        .await;
                    // Reaching Stopped is the successful-completion signal.
                    if state == PlaybackState::Stopped {
                        events.on_completed(handle_id).await;
                    }
                }
            }
            StatusPayload::Duration(duration) => {
                handle.set_cached_duration(duration).await;
            }
            StatusPayload::Position(position) => {
                handle.set_cached_position(position).await;
            }
            StatusPayload::Error(fault) => {
                if let Some(events) = handle.events() {
                    events
                        .on_error(EngineErrorInfo {
                            handle_id,
                            fault,
                            timestamp: Utc::now(),
                        })
                        .await;
                }
            }
        }
    }
}
