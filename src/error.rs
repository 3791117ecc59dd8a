//! Error types for the audio bridge

use thiserror::Error;

use crate::protocol::{EngineFault, Operation};

/// Result type for bridge operations
pub type BridgeResult<T> = Result<T, BridgeError>;

/// Errors that can occur in the audio bridge
///
/// Asynchronous engine outcomes never surface here directly: engine-reported
/// runtime errors are [`EngineFault`] values delivered to the handle's event
/// handler, and only single-result command failures are wrapped into
/// [`BridgeError::CommandFailed`] for the awaiting caller.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// Malformed argument at handle-creation time, raised before any
    /// registration or engine contact
    #[error("Invalid {field}: {message}")]
    InvalidArgument {
        /// Which argument was malformed
        field: String,
        /// What was wrong with it
        message: String,
    },

    /// A single-result command completed with the engine's failure outcome
    #[error("Command {operation} failed: {fault}")]
    CommandFailed {
        /// The operation that failed
        operation: Operation,
        /// The engine-reported failure
        fault: EngineFault,
    },

    /// The transport refused to carry an outbound invocation
    #[error("Transport error: {message}")]
    Transport {
        /// Transport-supplied description
        message: String,
    },

    /// The transport dropped a single-result responder without delivering
    /// either outcome, breaking the exactly-once contract
    #[error("Engine dropped the response channel for {operation}")]
    ChannelClosed {
        /// The operation whose outcome was lost
        operation: Operation,
    },

    /// An inbound envelope violated the protocol (fatal for that message
    /// only, never for the listener)
    #[error("Protocol violation: {message}")]
    Protocol {
        /// What was wrong with the envelope
        message: String,
    },

    /// An operation that needs the inbound listener was attempted before
    /// the bridge was started
    #[error("Bridge not started: {message}")]
    NotRunning {
        /// What was attempted
        message: String,
    },
}

impl BridgeError {
    /// Create an invalid-argument error
    pub fn invalid_argument(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a transport error
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    /// Create a protocol-violation error
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::Protocol {
            message: message.into(),
        }
    }

    /// Create a not-running error
    pub fn not_running(message: impl Into<String>) -> Self {
        Self::NotRunning {
            message: message.into(),
        }
    }
}
