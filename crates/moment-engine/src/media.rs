//! WAV decoding for file-backed channels and WAV export of offline renders.

use std::path::Path;
use std::sync::Arc;

use hound::{SampleFormat, WavReader, WavWriter};

use crate::error::{EngineError, Result};

/// A decoded, mono audio clip.
#[derive(Debug, Clone)]
pub struct AudioClip {
    /// Mono samples in [-1, 1]
    pub samples: Arc<[f32]>,
    /// Sample rate in Hz
    pub sample_rate: u32,
}

impl AudioClip {
    /// Duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        self.samples.len() as f64 / f64::from(self.sample_rate.max(1))
    }

    /// Playback rate that plays this clip at its natural speed in a context
    /// running at `context_rate`.
    pub fn playback_rate(&self, context_rate: f32) -> f32 {
        self.sample_rate as f32 / context_rate
    }
}

/// Read a WAV file, mixing multi-channel audio down to mono.
///
/// Integer formats are scaled to [-1, 1]; float files are read as-is.
pub fn load_clip(path: &Path) -> Result<AudioClip> {
    let reader = WavReader::open(path).map_err(|e| EngineError::media(path, e))?;
    let spec = reader.spec();
    let channels = usize::from(spec.channels.max(1));

    let samples: Vec<f32> = match spec.sample_format {
        SampleFormat::Float => reader
            .into_samples::<f32>()
            .collect::<std::result::Result<Vec<_>, _>>(),
        SampleFormat::Int => {
            let max_val = (1i64 << (spec.bits_per_sample.clamp(1, 32) - 1)) as f32;
            reader
                .into_samples::<i32>()
                .map(|s| s.map(|v| v as f32 / max_val))
                .collect::<std::result::Result<Vec<_>, _>>()
        }
    }
    .map_err(|e| EngineError::media(path, e))?;

    let mono: Vec<f32> = if channels > 1 {
        samples
            .chunks(channels)
            .map(|chunk| chunk.iter().sum::<f32>() / channels as f32)
            .collect()
    } else {
        samples
    };

    tracing::debug!(
        path = %path.display(),
        frames = mono.len(),
        sample_rate = spec.sample_rate,
        channels,
        "audio file decoded"
    );

    Ok(AudioClip {
        samples: Arc::from(mono),
        sample_rate: spec.sample_rate,
    })
}

/// Write mono samples to a 32-bit float WAV file.
pub fn write_wav(path: &Path, samples: &[f32], sample_rate: u32) -> Result<()> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };
    let mut writer = WavWriter::create(path, spec).map_err(|e| EngineError::media(path, e))?;
    for &sample in samples {
        writer
            .write_sample(sample)
            .map_err(|e| EngineError::media(path, e))?;
    }
    writer.finalize().map_err(|e| EngineError::media(path, e))?;
    tracing::debug!(path = %path.display(), frames = samples.len(), "wav written");
    Ok(())
}
