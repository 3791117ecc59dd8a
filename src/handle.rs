//! Audio session handles
//!
//! An [`AudioHandle`] is the per-session object a caller holds. It owns the
//! locally-cached duration and position, the caller-supplied event handler,
//! and the command methods that drive the engine. Handles are created
//! through [`BridgeClient::create_handle`](crate::client::BridgeClient::create_handle),
//! which registers them and issues the engine-side `create` command.
//!
//! Cached fields start at the sentinel `-1` ("unknown") and are written only
//! by inbound status reports and by the local completions of `stop` and
//! `seek_to`. Reading them never contacts the engine.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::RwLock;

use crate::client::config::EngineCapabilities;
use crate::error::{BridgeError, BridgeResult};
use crate::events::AudioEventHandler;
use crate::invoker::CommandInvoker;
use crate::protocol::{numeric_value, Operation};
use crate::registry::HandleId;
use crate::transport::EngineTransport;

/// Per-invocation playback options forwarded with `play`
///
/// All fields are optional; the engine applies its defaults for anything
/// left unset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayOptions {
    /// How many times to loop the track.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub number_of_loops: Option<u32>,
    /// Keep playing while the device screen is locked.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub play_audio_when_screen_is_locked: Option<bool>,
}

/// Client-side object representing one audio session
///
/// Commands come in two shapes. Fire-and-forget methods (`play`, `pause`,
/// `set_volume`, `set_rate`, `release`) return as soon as the transport
/// accepts the command; an engine-side failure, if any, reaches the
/// handle's event handler asynchronously. Single-result methods (`stop`,
/// `seek_to`, `position`, `amplitude`) suspend until the engine delivers
/// exactly one success-or-failure outcome.
pub struct AudioHandle {
    id: HandleId,
    source: String,
    invoker: CommandInvoker,
    capabilities: EngineCapabilities,
    platform: String,
    events: Option<Arc<dyn AudioEventHandler>>,
    cached_duration: RwLock<i64>,
    cached_position: RwLock<f64>,
}

impl AudioHandle {
    pub(crate) fn new(
        id: HandleId,
        source: String,
        transport: Arc<dyn EngineTransport>,
        capabilities: EngineCapabilities,
        platform: String,
        events: Option<Arc<dyn AudioEventHandler>>,
    ) -> Self {
        Self {
            id,
            source,
            invoker: CommandInvoker::new(id, transport),
            capabilities,
            platform,
            events,
            cached_duration: RwLock::new(-1),
            cached_position: RwLock::new(-1.0),
        }
    }

    /// Unique id of this session.
    pub fn id(&self) -> HandleId {
        self.id
    }

    /// The resource locator this session was created with.
    pub fn source(&self) -> &str {
        &self.source
    }

    pub(crate) fn events(&self) -> Option<Arc<dyn AudioEventHandler>> {
        self.events.clone()
    }

    /// Issue the engine-side `create` for this handle
    ///
    /// Fire-and-forget: construction always succeeds from the caller's
    /// point of view, and any failure (including a transport refusal)
    /// surfaces only through the event handler.
    pub(crate) async fn issue_create(&self) {
        let args = self
            .invoker
            .args([Value::String(self.source.clone())]);
        if let Err(err) = self
            .invoker
            .cast(Operation::Create, args, self.events.clone())
            .await
        {
            tracing::warn!(handle_id = %self.id, %err, "transport refused create command");
            if let Some(events) = self.events.clone() {
                events
                    .on_error(crate::events::EngineErrorInfo {
                        handle_id: self.id,
                        fault: crate::protocol::EngineFault::message(err.to_string()),
                        timestamp: chrono::Utc::now(),
                    })
                    .await;
            }
        }
    }

    /// Start or resume playing the audio file
    ///
    /// Fire-and-forget; failures reach the event handler.
    pub async fn play(&self, options: Option<PlayOptions>) -> BridgeResult<()> {
        let options = match options {
            Some(options) => serde_json::to_value(options)
                .map_err(|e| BridgeError::invalid_argument("options", e.to_string()))?,
            None => Value::Null,
        };
        let args = self
            .invoker
            .args([Value::String(self.source.clone()), options]);
        self.invoker
            .cast(Operation::StartPlayingAudio, args, self.events.clone())
            .await
    }

    /// Pause playback
    ///
    /// Fire-and-forget; failures reach the event handler.
    pub async fn pause(&self) -> BridgeResult<()> {
        let args = self.invoker.args([]);
        self.invoker
            .cast(Operation::PausePlayingAudio, args, self.events.clone())
            .await
    }

    /// Stop playback
    ///
    /// Single-result: on the engine's success outcome the cached position
    /// is reset to `0` before this method returns.
    pub async fn stop(&self) -> BridgeResult<()> {
        let args = self.invoker.args([]);
        self.invoker.call(Operation::StopPlayingAudio, args).await?;
        *self.cached_position.write().await = 0.0;
        Ok(())
    }

    /// Seek to a new position, in milliseconds
    ///
    /// Single-result: on success the cached position is updated to the
    /// position the engine reports (falling back to the requested target
    /// if the engine's value is not numeric).
    pub async fn seek_to(&self, milliseconds: f64) -> BridgeResult<()> {
        let args = self.invoker.args([Value::from(milliseconds)]);
        let value = self.invoker.call(Operation::SeekToAudio, args).await?;
        let position = numeric_value(&value).unwrap_or(milliseconds);
        *self.cached_position.write().await = position;
        Ok(())
    }

    /// Query the current playback position, in milliseconds
    ///
    /// Single-result: the returned value also updates the cached position.
    pub async fn position(&self) -> BridgeResult<f64> {
        let args = self.invoker.args([]);
        let value = self
            .invoker
            .call(Operation::GetCurrentPositionAudio, args)
            .await?;
        let position = numeric_value(&value).ok_or_else(|| {
            BridgeError::protocol(format!("non-numeric position from engine: {value}"))
        })?;
        *self.cached_position.write().await = position;
        Ok(position)
    }

    /// Query the current output amplitude
    ///
    /// Single-result; does not touch any cached field.
    pub async fn amplitude(&self) -> BridgeResult<f64> {
        let args = self.invoker.args([]);
        let value = self
            .invoker
            .call(Operation::GetCurrentAmplitudeAudio, args)
            .await?;
        numeric_value(&value).ok_or_else(|| {
            BridgeError::protocol(format!("non-numeric amplitude from engine: {value}"))
        })
    }

    /// Duration of the audio file, in milliseconds
    ///
    /// Pure local read; never contacts the engine. Returns `-1` until the
    /// engine has reported a duration. The duration is only known for
    /// audio that is playing, paused, or stopped.
    pub async fn duration(&self) -> i64 {
        *self.cached_duration.read().await
    }

    /// Last known playback position, in milliseconds
    ///
    /// Pure local read of the cached position; `-1` until the engine has
    /// reported one. Use [`position`](AudioHandle::position) for a fresh
    /// engine-side value.
    pub async fn cached_position(&self) -> f64 {
        *self.cached_position.read().await
    }

    /// Adjust the playback volume
    ///
    /// Fire-and-forget; failures reach the event handler.
    pub async fn set_volume(&self, volume: f64) -> BridgeResult<()> {
        let args = self.invoker.args([Value::from(volume)]);
        self.invoker
            .cast(Operation::SetVolume, args, self.events.clone())
            .await
    }

    /// Adjust the playback rate
    ///
    /// Capability-gated: on platforms whose [`EngineCapabilities`] lack
    /// playback-rate support, no command is sent and a warning is logged;
    /// the call is a no-op, never an error.
    pub async fn set_rate(&self, rate: f64) -> BridgeResult<()> {
        if !self.capabilities.supports_playback_rate {
            tracing::warn!(
                platform = %self.platform,
                "set_rate is not supported on this platform, ignoring"
            );
            return Ok(());
        }
        let args = self.invoker.args([Value::from(rate)]);
        self.invoker
            .cast(Operation::SetRate, args, self.events.clone())
            .await
    }

    /// Release engine-side resources for this session
    ///
    /// Fire-and-forget. The handle stays registered and technically callable
    /// afterwards; the engine is expected to emit no further status for it,
    /// but that is a caller responsibility, not an enforced invariant. Late
    /// status that arrives anyway is delivered normally.
    pub async fn release(&self) -> BridgeResult<()> {
        let args = self.invoker.args([]);
        self.invoker
            .cast(Operation::Release, args, self.events.clone())
            .await
    }

    pub(crate) async fn set_cached_duration(&self, duration: i64) {
        *self.cached_duration.write().await = duration;
    }

    pub(crate) async fn set_cached_position(&self, position: f64) {
        *self.cached_position.write().await = position;
    }
}

impl std::fmt::Debug for AudioHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AudioHandle")
            .field("id", &self.id)
            .field("source", &self.source)
            .field("platform", &self.platform)
            .field("has_events", &self.events.is_some())
            .finish()
    }
}
