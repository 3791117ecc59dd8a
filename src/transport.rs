//! Engine transport boundary
//!
//! The actual transport that carries commands to the audio engine and
//! delivers its status stream is an external collaborator: hosts implement
//! [`EngineTransport`] over whatever mechanism they have (a native bridge,
//! a socket, an in-process engine thread). This module only fixes the
//! contract at the seam.
//!
//! Outbound traffic is one [`Invocation`] per command. Inbound traffic is a
//! single long-lived stream of raw JSON envelopes obtained once per process
//! through [`EngineTransport::message_channel`]; there is no per-handle
//! subscription.

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::{mpsc, oneshot};

use crate::error::BridgeResult;
use crate::protocol::{EngineFault, Operation};

/// One outbound command to the engine
///
/// Every invocation is addressed to the [`NAMESPACE`](crate::protocol::NAMESPACE)
/// service and carries positional arguments whose first element is the
/// handle id (except [`Operation::MessageChannel`], which is argument-less).
///
/// The `responder` is the per-invocation completion channel. The engine side
/// must send at most one outcome through it: a success value or an
/// [`EngineFault`], never both. Dropping the responder without sending is
/// how a transport signals teardown to an awaiting caller.
#[derive(Debug)]
pub struct Invocation {
    /// Service namespace, always [`NAMESPACE`](crate::protocol::NAMESPACE).
    pub namespace: &'static str,
    /// The operation to perform.
    pub operation: Operation,
    /// Positional arguments, first element the handle id.
    pub args: Vec<Value>,
    /// Exactly-once completion channel for this invocation.
    pub responder: Option<oneshot::Sender<Result<Value, EngineFault>>>,
}

impl Invocation {
    /// Build an invocation together with the receiving end of its
    /// completion channel.
    pub fn new(
        operation: Operation,
        args: Vec<Value>,
    ) -> (Self, oneshot::Receiver<Result<Value, EngineFault>>) {
        let (tx, rx) = oneshot::channel();
        (
            Self {
                namespace: crate::protocol::NAMESPACE,
                operation,
                args,
                responder: Some(tx),
            },
            rx,
        )
    }
}

/// Transport carrying commands to the engine and status back
///
/// Implementations must preserve delivery order on the inbound stream; the
/// dispatcher processes envelopes one at a time in the order received.
/// Ordering guarantees between outbound commands and engine-side execution
/// stop at this boundary.
#[async_trait]
pub trait EngineTransport: Send + Sync {
    /// Carry one outbound invocation to the engine
    ///
    /// Returning an error means the transport refused to carry the
    /// invocation at all. Engine-side outcomes arrive later through the
    /// invocation's responder, asynchronously.
    async fn send(&self, invocation: Invocation) -> BridgeResult<()>;

    /// Install the singleton inbound status listener
    ///
    /// Corresponds to the wire `messageChannel` operation. Called at most
    /// once per process, before any handle can receive status; yields the
    /// stream of raw status envelopes in delivery order. Closing the
    /// returned channel ends the dispatch loop.
    async fn message_channel(&self) -> BridgeResult<mpsc::UnboundedReceiver<Value>>;
}
