//! Bell playback.

use moment_synth::ToneSpec;

use crate::catalog::BellSpec;
use crate::context::AudioContext;
use crate::error::Result;
use crate::graph::Target;
use crate::tone::ToneSynthesizer;

/// Plays bell presets through [`ToneSynthesizer`].
///
/// Bells go straight to the output, independent of any ambient voice, and
/// may overlap.
pub struct BellPlayer;

impl BellPlayer {
    /// Strike a bell now at `volume` (fundamental amplitude).
    ///
    /// Returns the clock time at which the bell has finished.
    pub fn play<C: AudioContext + ?Sized>(ctx: &mut C, bell: &BellSpec, volume: f32) -> Result<f64> {
        let spec = ToneSpec {
            frequency_hz: bell.frequency_hz,
            amplitude: volume,
            decay_seconds: bell.decay_seconds,
            start_time: ctx.current_time(),
        };
        ToneSynthesizer::render_tone(ctx, &spec, Target::Destination)?;
        tracing::info!(bell = %bell.name, volume, "bell struck");
        Ok(spec.stop_time())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::OfflineContext;

    #[test]
    fn test_returns_completion_time() {
        let mut ctx = OfflineContext::new(48000.0);
        ctx.render_seconds(1.0);
        let bell = BellSpec::new(2, "Chime", 880.0, 2.0);
        let done = BellPlayer::play(&mut ctx, &bell, 0.8).unwrap();
        assert!((done - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_overlapping_bells() {
        let mut ctx = OfflineContext::new(48000.0);
        let bell = BellSpec::new(0, "Bowl", 528.0, 4.0);
        BellPlayer::play(&mut ctx, &bell, 0.8).unwrap();
        BellPlayer::play(&mut ctx, &bell, 0.8).unwrap();
        assert_eq!(ctx.graph().live_sources(), 8);
    }
}
