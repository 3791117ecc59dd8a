//! Command invocation shapes
//!
//! Every handle method maps to exactly one outbound command, issued in one
//! of two shapes:
//!
//! - **fire-and-forget** ([`CommandInvoker::cast`]): no success delivery;
//!   an asynchronous engine-side failure, if any, is forwarded to the
//!   handle's event handler.
//! - **single-result** ([`CommandInvoker::call`]): the caller suspends on
//!   the invocation's responder and receives exactly one success value or
//!   one failure, never both, never zero short of transport teardown.
//!
//! Issuing a command returns as soon as the transport accepts it; there is
//! no cancellation once an invocation has been sent.

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;

use crate::error::{BridgeError, BridgeResult};
use crate::events::{AudioEventHandler, EngineErrorInfo};
use crate::protocol::Operation;
use crate::registry::HandleId;
use crate::transport::{EngineTransport, Invocation};

/// Issues commands for one handle over the engine transport
#[derive(Clone)]
pub(crate) struct CommandInvoker {
    id: HandleId,
    transport: Arc<dyn EngineTransport>,
}

impl CommandInvoker {
    pub(crate) fn new(id: HandleId, transport: Arc<dyn EngineTransport>) -> Self {
        Self { id, transport }
    }

    /// Positional args for a command: the handle id first, then the rest.
    pub(crate) fn args(&self, rest: impl IntoIterator<Item = Value>) -> Vec<Value> {
        let mut args = vec![Value::String(self.id.to_string())];
        args.extend(rest);
        args
    }

    /// Fire-and-forget invocation
    ///
    /// Success is never delivered. A failure outcome, if the engine reports
    /// one later, is forwarded to `events` as an error; an engine that
    /// simply never responds is indistinguishable from success.
    pub(crate) async fn cast(
        &self,
        operation: Operation,
        args: Vec<Value>,
        events: Option<Arc<dyn AudioEventHandler>>,
    ) -> BridgeResult<()> {
        let (invocation, rx) = Invocation::new(operation, args);
        self.transport.send(invocation).await?;

        let handle_id = self.id;
        tokio::spawn(async move {
            if let Ok(Err(fault)) = rx.await {
                tracing::debug!(%handle_id, %operation, %fault, "fire-and-forget command failed");
                if let Some(events) = events {
                    events
                        .on_error(EngineErrorInfo {
                            handle_id,
                            fault,
                            timestamp: Utc::now(),
                        })
                        .await;
                }
            }
        });

        Ok(())
    }

    /// Single-result invocation
    ///
    /// Suspends until the engine delivers the one success-or-failure
    /// outcome for this command.
    pub(crate) async fn call(&self, operation: Operation, args: Vec<Value>) -> BridgeResult<Value> {
        let (invocation, rx) = Invocation::new(operation, args);
        self.transport.send(invocation).await?;

        match rx.await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(fault)) => Err(BridgeError::CommandFailed { operation, fault }),
            Err(_) => Err(BridgeError::ChannelClosed { operation }),
        }
    }
}

impl std::fmt::Debug for CommandInvoker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandInvoker")
            .field("id", &self.id)
            .finish()
    }
}
