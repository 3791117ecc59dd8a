//! Bridge client: process-level composition root
//!
//! The [`BridgeClient`] owns the pieces the rest of the crate shares: the
//! handle registry, the engine transport, and the capability descriptor.
//! [`BridgeClient::start`] installs the singleton inbound status listener
//! (on platforms whose capabilities require one) and spawns the dispatch
//! loop. It is the readiness point: handles created before it cannot
//! receive status, so handle creation is refused until the client is
//! started.

pub mod config;
pub mod dispatcher;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::error::{BridgeError, BridgeResult};
use crate::events::AudioEventHandler;
use crate::handle::AudioHandle;
use crate::registry::{HandleId, HandleRegistry};
use crate::transport::EngineTransport;

use config::BridgeConfig;
use dispatcher::StatusDispatcher;

/// Snapshot of the client's current state and activity
#[derive(Debug, Clone)]
pub struct BridgeStats {
    /// Whether the client has been started.
    pub is_running: bool,
    /// Platform identifier from the configuration.
    pub platform: String,
    /// Number of handles registered since the client was created.
    pub total_handles: usize,
}

/// Process-level context for the audio bridge
///
/// One instance per engine connection. Composes the injectable registry
/// with the host-supplied transport, so teardown and test isolation are a
/// matter of dropping the instance rather than resetting global state.
pub struct BridgeClient {
    config: BridgeConfig,
    transport: Arc<dyn EngineTransport>,
    registry: Arc<HandleRegistry>,
    is_running: RwLock<bool>,
    dispatch_task: RwLock<Option<JoinHandle<()>>>,
}

impl BridgeClient {
    /// Create a client over the given transport
    ///
    /// The client is inert until [`start`](BridgeClient::start) is called.
    pub fn new(config: BridgeConfig, transport: Arc<dyn EngineTransport>) -> Arc<Self> {
        Arc::new(Self {
            config,
            transport,
            registry: Arc::new(HandleRegistry::new()),
            is_running: RwLock::new(false),
            dispatch_task: RwLock::new(None),
        })
    }

    /// Start the client
    ///
    /// On platforms whose capability descriptor requires the singleton
    /// listener, this installs the `messageChannel` stream and spawns the
    /// dispatch loop before returning, so status can be received for any
    /// handle created afterwards, independent of creation order. Calling
    /// `start` on a running client is a no-op.
    pub async fn start(&self) -> BridgeResult<()> {
        let mut running = self.is_running.write().await;
        if *running {
            return Ok(());
        }

        if self.config.capabilities.requires_status_channel {
            let envelopes = self.transport.message_channel().await?;
            let dispatcher = StatusDispatcher::new(self.registry.clone());
            let task = tokio::spawn(dispatcher.run(envelopes));
            *self.dispatch_task.write().await = Some(task);
            tracing::info!(platform = %self.config.platform, "inbound status listener installed");
        } else {
            tracing::info!(
                platform = %self.config.platform,
                "platform delivers status externally, no listener installed"
            );
        }

        *running = true;
        tracing::info!(platform = %self.config.platform, "audio bridge started");
        Ok(())
    }

    /// Stop the client
    ///
    /// Aborts the dispatch loop. Registered handles remain addressable but
    /// receive no further status.
    pub async fn stop(&self) {
        let mut running = self.is_running.write().await;
        if let Some(task) = self.dispatch_task.write().await.take() {
            task.abort();
        }
        *running = false;
        tracing::info!(platform = %self.config.platform, "audio bridge stopped");
    }

    /// Create a new audio session handle
    ///
    /// Validates the source, generates a fresh id, registers the handle,
    /// and issues the fire-and-forget engine-side `create` command carrying
    /// `(id, source)`. A failure of that command is reported only through
    /// the supplied event handler, asynchronously; once the arguments
    /// validate, construction always succeeds from the caller's point of
    /// view.
    ///
    /// # Errors
    ///
    /// * [`BridgeError::InvalidArgument`] - malformed `source`, raised
    ///   before any registration or engine contact
    /// * [`BridgeError::NotRunning`] - the client has not been started
    pub async fn create_handle(
        &self,
        source: impl Into<String>,
        events: Option<Arc<dyn AudioEventHandler>>,
    ) -> BridgeResult<Arc<AudioHandle>> {
        let source = source.into();
        validate_source(&source)?;

        if !*self.is_running.read().await {
            return Err(BridgeError::not_running(
                "call start() before creating handles",
            ));
        }

        let id: HandleId = Uuid::new_v4();
        let handle = Arc::new(AudioHandle::new(
            id,
            source,
            self.transport.clone(),
            self.config.capabilities.clone(),
            self.config.platform.clone(),
            events,
        ));
        self.registry.register(handle.clone());
        tracing::info!(handle_id = %id, source = %handle.source(), "audio handle created");

        handle.issue_create().await;
        Ok(handle)
    }

    /// Look up a live handle by id
    ///
    /// Returns `None` for ids this client never issued. Released handles
    /// are still found; the registry never removes entries.
    pub fn lookup_handle(&self, id: &HandleId) -> Option<Arc<AudioHandle>> {
        self.registry.lookup(id)
    }

    /// The configuration this client was built with.
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Snapshot of client state and activity.
    pub async fn get_stats(&self) -> BridgeStats {
        BridgeStats {
            is_running: *self.is_running.read().await,
            platform: self.config.platform.clone(),
            total_handles: self.registry.len(),
        }
    }
}

impl std::fmt::Debug for BridgeClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BridgeClient")
            .field("config", &self.config)
            .field("handles", &self.registry.len())
            .finish()
    }
}

/// Validate the source argument for handle creation
///
/// The locator is opaque to this crate; only its shape is checked.
fn validate_source(source: &str) -> BridgeResult<()> {
    if source.trim().is_empty() {
        return Err(BridgeError::invalid_argument(
            "source",
            "expected a non-empty resource locator",
        ));
    }
    Ok(())
}
