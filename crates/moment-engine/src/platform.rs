//! Capability probe and context factory.
//!
//! The session controller is generic over an [`AudioPlatform`] so it can run
//! against a real device or a deterministic offline graph.

use crate::backend::{AudioBackend, BackendStreamConfig};
use crate::context::{AudioContext, OfflineContext, RealtimeContext};
use crate::cpal_backend::CpalBackend;
use crate::error::{EngineError, Result};

/// Where audio contexts come from.
pub trait AudioPlatform {
    /// Context type this platform creates.
    type Context: AudioContext;

    /// Whether audio output is available at all. Checked once by the
    /// controller at construction.
    fn is_supported(&self) -> bool;

    /// Create a context. Called lazily, at most once per controller.
    fn create_context(&self) -> Result<Self::Context>;
}

/// Plays through the default (or a named) output device via cpal.
pub struct CpalPlatform {
    backend: CpalBackend,
    config: BackendStreamConfig,
}

impl CpalPlatform {
    /// Use the default host with a stream configuration.
    pub fn new(config: BackendStreamConfig) -> Self {
        Self {
            backend: CpalBackend::new(),
            config,
        }
    }
}

impl Default for CpalPlatform {
    fn default() -> Self {
        Self::new(BackendStreamConfig::default())
    }
}

impl AudioPlatform for CpalPlatform {
    type Context = RealtimeContext;

    fn is_supported(&self) -> bool {
        match self.backend.default_output_device() {
            Ok(Some(device)) => {
                tracing::debug!(device = %device.name, "default output device");
                true
            }
            Ok(None) => false,
            Err(e) => {
                tracing::warn!(error = %e, "output device probe failed");
                false
            }
        }
    }

    fn create_context(&self) -> Result<RealtimeContext> {
        RealtimeContext::open(&self.backend, &self.config)
    }
}

/// Creates [`OfflineContext`]s. Options reproduce device conditions in tests.
#[derive(Debug, Clone)]
pub struct OfflinePlatform {
    sample_rate: f32,
    supported: bool,
    start_suspended: bool,
    block_resume: bool,
}

impl OfflinePlatform {
    /// A supported platform whose contexts start running.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            supported: true,
            start_suspended: false,
            block_resume: false,
        }
    }

    /// A platform with no audio capability.
    pub fn unsupported() -> Self {
        Self {
            supported: false,
            ..Self::new(48000.0)
        }
    }

    /// Contexts start suspended.
    #[must_use]
    pub fn starting_suspended(mut self) -> Self {
        self.start_suspended = true;
        self
    }

    /// Contexts refuse to resume, as under an autoplay policy.
    #[must_use]
    pub fn blocking_resume(mut self) -> Self {
        self.block_resume = true;
        self
    }
}

impl AudioPlatform for OfflinePlatform {
    type Context = OfflineContext;

    fn is_supported(&self) -> bool {
        self.supported
    }

    fn create_context(&self) -> Result<OfflineContext> {
        if !self.supported {
            return Err(EngineError::UnsupportedPlatform);
        }
        let mut ctx = OfflineContext::new(self.sample_rate);
        if self.start_suspended {
            ctx = ctx.starting_suspended();
        }
        if self.block_resume {
            ctx = ctx.blocking_resume();
        }
        Ok(ctx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ContextState;

    #[test]
    fn test_offline_platform_options() {
        let ctx = OfflinePlatform::new(44100.0)
            .starting_suspended()
            .create_context()
            .unwrap();
        assert_eq!(ctx.state(), ContextState::Suspended);
        assert_eq!(ctx.sample_rate(), 44100.0);
    }

    #[test]
    fn test_unsupported_platform_refuses_contexts() {
        let platform = OfflinePlatform::unsupported();
        assert!(!platform.is_supported());
        assert!(matches!(
            platform.create_context(),
            Err(EngineError::UnsupportedPlatform)
        ));
    }
}
