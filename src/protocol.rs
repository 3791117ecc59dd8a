//! Wire protocol shared with the audio engine
//!
//! This module defines the outbound command vocabulary and the inbound
//! status envelope exchanged with the out-of-process engine. Everything the
//! engine sends arrives through a single multiplexed channel as JSON values
//! of the shape `{ "action": "status", "status": { "id", "msgType", "value" } }`;
//! this module decodes that shape into the strongly-typed [`StatusMessage`]
//! the dispatcher routes on.
//!
//! The numeric message-kind and state codes are fixed by the engine side of
//! the bridge and must not be renumbered.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Service namespace every outbound invocation is addressed to.
pub const NAMESPACE: &str = "AudioBridge";

/// The only inbound envelope action this crate understands.
pub const STATUS_ACTION: &str = "status";

/// Message kind code: playback state transition.
pub const MSG_STATE: i64 = 1;
/// Message kind code: duration discovered.
pub const MSG_DURATION: i64 = 2;
/// Message kind code: position update.
pub const MSG_POSITION: i64 = 3;
/// Message kind code: engine-reported runtime error.
pub const MSG_ERROR: i64 = 9;

/// Outbound command vocabulary
///
/// One variant per engine operation. The wire names are positional-argument
/// commands; the first argument is always the handle id, except for
/// [`Operation::MessageChannel`] which is argument-less and installs the
/// singleton inbound status listener (see
/// [`EngineTransport::message_channel`](crate::transport::EngineTransport::message_channel)).
///
/// Wire names come from [`Operation::wire_name`], not from serialization of
/// the variant names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Register a new audio session with the engine.
    Create,
    /// Start or resume playback.
    StartPlayingAudio,
    /// Stop playback; success resets the cached position to zero.
    StopPlayingAudio,
    /// Jump to a new position in the track.
    SeekToAudio,
    /// Pause playback.
    PausePlayingAudio,
    /// Query the current playback position.
    GetCurrentPositionAudio,
    /// Release engine-side resources for a session.
    Release,
    /// Adjust the playback volume.
    SetVolume,
    /// Adjust the playback rate (capability-gated).
    SetRate,
    /// Query the current output amplitude.
    GetCurrentAmplitudeAudio,
    /// Install the singleton inbound status listener.
    MessageChannel,
}

impl Operation {
    /// The exact operation name carried on the wire.
    pub fn wire_name(&self) -> &'static str {
        match self {
            Operation::Create => "create",
            Operation::StartPlayingAudio => "startPlayingAudio",
            Operation::StopPlayingAudio => "stopPlayingAudio",
            Operation::SeekToAudio => "seekToAudio",
            Operation::PausePlayingAudio => "pausePlayingAudio",
            Operation::GetCurrentPositionAudio => "getCurrentPositionAudio",
            Operation::Release => "release",
            Operation::SetVolume => "setVolume",
            Operation::SetRate => "setRate",
            Operation::GetCurrentAmplitudeAudio => "getCurrentAmplitudeAudio",
            Operation::MessageChannel => "messageChannel",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// Playback state reported by the engine (`msgType = 1`)
///
/// The discriminants are the wire codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i64)]
pub enum PlaybackState {
    /// No media loaded yet.
    None = 0,
    /// Playback is being set up.
    Starting = 1,
    /// Audio is playing.
    Running = 2,
    /// Playback is paused.
    Paused = 3,
    /// Playback has stopped. This is the defined successful-completion
    /// signal: the dispatcher fires the completion callback on it.
    Stopped = 4,
}

impl PlaybackState {
    /// Map a wire state code to a state, or `None` for codes this crate
    /// does not know about.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(PlaybackState::None),
            1 => Some(PlaybackState::Starting),
            2 => Some(PlaybackState::Running),
            3 => Some(PlaybackState::Paused),
            4 => Some(PlaybackState::Stopped),
            _ => None,
        }
    }

    /// The wire code for this state.
    pub fn code(&self) -> i64 {
        *self as i64
    }
}

impl fmt::Display for PlaybackState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            PlaybackState::None => "None",
            PlaybackState::Starting => "Starting",
            PlaybackState::Running => "Running",
            PlaybackState::Paused => "Paused",
            PlaybackState::Stopped => "Stopped",
        };
        f.write_str(name)
    }
}

/// Error payload reported by the engine (`msgType = 9`)
///
/// The engine is free to send a structured `{ "code", "message" }` object,
/// a bare string, or anything else; this type normalizes all of those.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineFault {
    /// Engine-specific error code, when one was supplied.
    pub code: Option<i64>,
    /// Human-readable description of the failure.
    pub message: String,
}

impl EngineFault {
    /// Build a fault with a message and no code.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            code: None,
            message: message.into(),
        }
    }

    /// Normalize an arbitrary engine-supplied error value.
    pub fn from_value(value: Value) -> Self {
        match value {
            Value::String(message) => Self {
                code: None,
                message,
            },
            Value::Object(ref map) => Self {
                code: map.get("code").and_then(Value::as_i64),
                message: map
                    .get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| value.to_string()),
            },
            other => Self {
                code: None,
                message: other.to_string(),
            },
        }
    }
}

impl fmt::Display for EngineFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "engine fault {}: {}", code, self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Raw inbound envelope, exactly as the engine serializes it.
#[derive(Debug, Clone, Deserialize)]
pub struct StatusEnvelope {
    /// Envelope action; anything other than `"status"` is a protocol
    /// violation for that message.
    pub action: String,
    /// Status body, present when `action == "status"`.
    #[serde(default)]
    pub status: Option<RawStatus>,
}

/// Undecoded status body: target id, kind code, kind-dependent value.
#[derive(Debug, Clone, Deserialize)]
pub struct RawStatus {
    /// Wire id of the target handle.
    pub id: String,
    /// Message kind code (1=state, 2=duration, 3=position, 9=error).
    /// Deliberately wide: out-of-table codes must still deserialize so
    /// they can be logged and ignored instead of rejecting the envelope.
    #[serde(rename = "msgType")]
    pub msg_type: i64,
    /// Kind-dependent payload value.
    #[serde(default)]
    pub value: Value,
}

/// Decoded status message, ready for dispatch.
#[derive(Debug, Clone)]
pub struct StatusMessage {
    /// Wire id of the target handle.
    pub id: String,
    /// Typed payload.
    pub payload: StatusPayload,
}

/// Tagged union over the four status message kinds
///
/// Replaces the wire's "value whose meaning depends on msgType" with one
/// typed payload per kind.
#[derive(Debug, Clone)]
pub enum StatusPayload {
    /// Playback state transition (`msgType = 1`).
    State(PlaybackState),
    /// Track duration in milliseconds (`msgType = 2`).
    Duration(i64),
    /// Playback position in milliseconds (`msgType = 3`).
    Position(f64),
    /// Engine-reported runtime error (`msgType = 9`).
    Error(EngineFault),
}

/// Reasons a status body failed to decode
///
/// None of these are fatal to the listener: the dispatcher logs the message
/// and drops it.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The kind code is not one this crate handles.
    #[error("unhandled status message kind {0}")]
    UnknownKind(i64),
    /// A state message carried a code outside the known state table.
    #[error("unknown playback state code {0}")]
    UnknownState(i64),
    /// A numeric payload was neither a number nor a numeric string.
    #[error("non-numeric value for status kind {kind}: {value}")]
    NonNumericValue {
        /// Kind code of the offending message.
        kind: i64,
        /// The value as received.
        value: Value,
    },
}

impl RawStatus {
    /// Decode the kind code and value into a typed [`StatusMessage`].
    pub fn decode(self) -> Result<StatusMessage, DecodeError> {
        let payload = match self.msg_type {
            MSG_STATE => {
                let code = numeric_value(&self.value).ok_or(DecodeError::NonNumericValue {
                    kind: MSG_STATE,
                    value: self.value.clone(),
                })? as i64;
                let state =
                    PlaybackState::from_code(code).ok_or(DecodeError::UnknownState(code))?;
                StatusPayload::State(state)
            }
            MSG_DURATION => {
                let duration = numeric_value(&self.value).ok_or(DecodeError::NonNumericValue {
                    kind: MSG_DURATION,
                    value: self.value.clone(),
                })?;
                StatusPayload::Duration(duration as i64)
            }
            MSG_POSITION => {
                let position = numeric_value(&self.value).ok_or(DecodeError::NonNumericValue {
                    kind: MSG_POSITION,
                    value: self.value.clone(),
                })?;
                StatusPayload::Position(position)
            }
            MSG_ERROR => StatusPayload::Error(EngineFault::from_value(self.value)),
            other => return Err(DecodeError::UnknownKind(other)),
        };

        Ok(StatusMessage {
            id: self.id,
            payload,
        })
    }
}

/// Coerce a JSON value to a number, accepting numeric strings
///
/// Engines on some platforms serialize positions as strings (`"1234"`);
/// both forms are accepted everywhere a number is expected.
pub fn numeric_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}
