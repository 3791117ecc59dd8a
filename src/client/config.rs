//! Configuration for the audio bridge
//!
//! Platform-conditional behavior is resolved once, at construction, through
//! an [`EngineCapabilities`] descriptor injected via [`BridgeConfig`],
//! never queried ad hoc from a global platform identifier. The descriptor
//! gates both the `set_rate` command and whether the singleton inbound
//! status listener is installed at all.
//!
//! # Examples
//!
//! ```rust
//! use audio_bridge_core::client::config::{BridgeConfig, EngineCapabilities};
//!
//! let config = BridgeConfig::new()
//!     .with_platform("android")
//!     .with_capabilities(EngineCapabilities {
//!         supports_playback_rate: false,
//!         requires_status_channel: true,
//!     });
//!
//! assert_eq!(config.platform, "android");
//! assert!(!config.capabilities.supports_playback_rate);
//! ```

use serde::{Deserialize, Serialize};

/// What the target platform's engine supports
///
/// A small enumeration of supported operations, resolved once per process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineCapabilities {
    /// Whether the engine honors playback-rate changes (`set_rate`)
    ///
    /// When `false`, `set_rate` sends nothing and downgrades to a warning.
    pub supports_playback_rate: bool,

    /// Whether status delivery requires explicitly installing the singleton
    /// inbound listener (`messageChannel`)
    ///
    /// Platforms that deliver status through some other external mechanism
    /// set this to `false`; [`BridgeClient::start`](crate::client::BridgeClient::start)
    /// then skips listener installation.
    pub requires_status_channel: bool,
}

impl Default for EngineCapabilities {
    fn default() -> Self {
        Self {
            supports_playback_rate: true,
            requires_status_channel: true,
        }
    }
}

/// Configuration for a [`BridgeClient`](crate::client::BridgeClient)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BridgeConfig {
    /// Platform identifier, used only for diagnostics (capability
    /// decisions live in `capabilities`).
    pub platform: String,
    /// Capability descriptor for the target platform's engine.
    pub capabilities: EngineCapabilities,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            platform: "generic".to_string(),
            capabilities: EngineCapabilities::default(),
        }
    }
}

impl BridgeConfig {
    /// Create a config with default capabilities.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the platform identifier.
    pub fn with_platform(mut self, platform: impl Into<String>) -> Self {
        self.platform = platform.into();
        self
    }

    /// Set the capability descriptor.
    pub fn with_capabilities(mut self, capabilities: EngineCapabilities) -> Self {
        self.capabilities = capabilities;
        self
    }
}
