//! cpal-based audio backend.
//!
//! [`CpalBackend`] wraps [cpal](https://crates.io/crates/cpal) for
//! cross-platform output: ALSA on Linux, CoreAudio on macOS, WASAPI on
//! Windows.

use cpal::Host;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};

use crate::backend::{
    AudioBackend, AudioDevice, BackendStreamConfig, ErrorCallback, OutputCallback, OutputStream,
    StreamHandle,
};
use crate::error::{EngineError, Result};

fn device_name(device: &cpal::Device) -> std::result::Result<String, cpal::DeviceNameError> {
    device.description().map(|d| d.name().to_string())
}

/// cpal-based audio backend using the platform's default host.
pub struct CpalBackend {
    host: Host,
}

impl CpalBackend {
    /// Create a backend on the default audio host.
    pub fn new() -> Self {
        let host = cpal::default_host();
        tracing::info!(host = host.id().name(), "cpal backend initialized");
        Self { host }
    }

    /// Find an output device by name, or return the default.
    fn find_output_device(&self, name: Option<&str>) -> Result<cpal::Device> {
        match name {
            Some(search) => {
                let search_lower = search.to_lowercase();
                let devices = self
                    .host
                    .output_devices()
                    .map_err(|e| EngineError::Stream(e.to_string()))?;

                for device in devices {
                    if let Ok(dev_name) = device_name(&device)
                        && dev_name.to_lowercase().contains(search_lower.as_str())
                    {
                        return Ok(device);
                    }
                }
                Err(EngineError::Stream(format!(
                    "no output device matching '{}'",
                    search
                )))
            }
            None => self
                .host
                .default_output_device()
                .ok_or(EngineError::UnsupportedPlatform),
        }
    }
}

impl Default for CpalBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl AudioBackend for CpalBackend {
    fn name(&self) -> &'static str {
        "cpal"
    }

    fn default_output_device(&self) -> Result<Option<AudioDevice>> {
        Ok(self.host.default_output_device().and_then(|d| {
            device_name(&d).ok().map(|name| AudioDevice {
                name,
                default_sample_rate: d
                    .default_output_config()
                    .map(|c| c.sample_rate())
                    .unwrap_or(48000),
            })
        }))
    }

    fn build_output_stream(
        &self,
        config: &BackendStreamConfig,
        mut callback: OutputCallback,
        mut error_callback: ErrorCallback,
    ) -> Result<OutputStream> {
        let device = self.find_output_device(config.device_name.as_deref())?;

        let sample_rate = match config.sample_rate {
            Some(rate) => rate,
            None => device
                .default_output_config()
                .map(|c| c.sample_rate())
                .map_err(|e| EngineError::Stream(e.to_string()))?,
        };

        let stream_config = cpal::StreamConfig {
            channels: config.channels,
            sample_rate,
            buffer_size: cpal::BufferSize::Default,
        };

        let stream = device
            .build_output_stream(
                &stream_config,
                move |data: &mut [f32], _: &cpal::OutputCallbackInfo| {
                    callback(data);
                },
                move |err| {
                    error_callback(&err.to_string());
                },
                None,
            )
            .map_err(|e| EngineError::Stream(e.to_string()))?;

        stream
            .play()
            .map_err(|e| EngineError::Stream(e.to_string()))?;
        tracing::info!(
            channels = config.channels,
            sample_rate,
            "output stream started"
        );

        Ok(OutputStream {
            handle: StreamHandle::new(stream),
            sample_rate,
            channels: config.channels,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cpal_backend_name() {
        let backend = CpalBackend::new();
        assert_eq!(backend.name(), "cpal");
    }

    #[test]
    fn test_default_output_device_does_not_fail() {
        let backend = CpalBackend::new();
        // Device availability depends on the system.
        assert!(backend.default_output_device().is_ok());
    }

    #[test]
    fn test_default_config() {
        let config = BackendStreamConfig::default();
        assert_eq!(config.sample_rate, None);
        assert_eq!(config.channels, 2);
        assert!(config.device_name.is_none());
    }

    #[test]
    fn test_stream_handle_debug() {
        let handle = StreamHandle::new(42u32);
        assert!(format!("{:?}", handle).contains("StreamHandle"));
    }
}
