//! Pluggable audio output backend.
//!
//! [`AudioBackend`] keeps platform audio APIs out of the engine. The real-time
//! context only needs an output stream that calls back with interleaved
//! buffers; [`CpalBackend`](crate::cpal_backend::CpalBackend) provides one
//! on desktop systems.
//!
//! ```text
//! ┌──────────────────────────────────┐
//! │         RealtimeContext          │
//! └──────────────┬───────────────────┘
//!                │ uses AudioBackend trait
//!                ▼
//! ┌──────────────────────────────────┐
//! │        AudioBackend trait        │
//! │  default_output / build_output   │
//! └──────────────┬───────────────────┘
//!                ▼
//!         ┌─────────────┐
//!         │ CpalBackend │
//!         └─────────────┘
//! ```

use crate::error::Result;

/// Audio output device information.
#[derive(Debug, Clone)]
pub struct AudioDevice {
    /// Human-readable device name.
    pub name: String,
    /// Default sample rate in Hz.
    pub default_sample_rate: u32,
}

/// Configuration for building an output stream.
#[derive(Debug, Clone)]
pub struct BackendStreamConfig {
    /// Requested sample rate in Hz. `None` uses the device default.
    pub sample_rate: Option<u32>,
    /// Number of interleaved output channels.
    pub channels: u16,
    /// Optional device name filter (uses the default device if `None`).
    pub device_name: Option<String>,
}

impl Default for BackendStreamConfig {
    fn default() -> Self {
        Self {
            sample_rate: None,
            channels: 2,
            device_name: None,
        }
    }
}

/// Type-erased audio stream handle.
///
/// The stream plays while this handle exists; dropping it stops playback.
pub struct StreamHandle {
    /// The backend-specific stream object, kept alive via RAII.
    _inner: Box<dyn Send>,
}

impl StreamHandle {
    /// Wrap a backend-specific stream object.
    pub fn new<T: Send + 'static>(stream: T) -> Self {
        Self {
            _inner: Box::new(stream),
        }
    }
}

impl std::fmt::Debug for StreamHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StreamHandle").finish_non_exhaustive()
    }
}

/// Audio output callback.
///
/// Runs on the real-time thread and fills a buffer of interleaved f32
/// samples (`[L0, R0, L1, R1, ...]` for stereo). Must not block.
pub type OutputCallback = Box<dyn FnMut(&mut [f32]) + Send>;

/// Error callback, given a human-readable message.
pub type ErrorCallback = Box<dyn FnMut(&str) + Send>;

/// A stream that has been built and started.
#[derive(Debug)]
pub struct OutputStream {
    /// Keeps the stream alive
    pub handle: StreamHandle,
    /// Sample rate the device actually runs at
    pub sample_rate: u32,
    /// Channels per frame in the callback buffer
    pub channels: u16,
}

/// Platform audio output.
pub trait AudioBackend: Send {
    /// Human-readable name of this backend (e.g., "cpal").
    fn name(&self) -> &str;

    /// The default output device, if any.
    fn default_output_device(&self) -> Result<Option<AudioDevice>>;

    /// Build and start an output stream.
    ///
    /// The returned [`OutputStream`] reports the negotiated sample rate and
    /// channel count; the callback receives buffers in that layout.
    fn build_output_stream(
        &self,
        config: &BackendStreamConfig,
        callback: OutputCallback,
        error_callback: ErrorCallback,
    ) -> Result<OutputStream>;
}
