//! Scheduling decaying tones onto a context.

use moment_synth::{ToneSpec, tone_partials};

use crate::context::AudioContext;
use crate::error::Result;
use crate::graph::{NodeId, NodeKind, ParamKind, Target};

/// Oscillator and envelope gain created for one partial.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ScheduledPartial {
    /// Sine oscillator
    pub oscillator: NodeId,
    /// Envelope gain stage
    pub envelope: NodeId,
}

/// Builds bell-like tones: a fundamental and three harmonics, each a sine
/// through its own decaying gain.
pub struct ToneSynthesizer;

impl ToneSynthesizer {
    /// Schedule a tone and return the nodes it created.
    ///
    /// Every node is transient: oscillators stop at
    /// `start_time + decay_seconds` and the graph releases them and their
    /// envelopes afterwards. Invalid frequency or decay is rejected before
    /// anything is created; zero amplitude creates nothing.
    pub fn render_tone<C: AudioContext + ?Sized>(
        ctx: &mut C,
        spec: &ToneSpec,
        output: Target,
    ) -> Result<Vec<ScheduledPartial>> {
        let partials = tone_partials(spec)?;

        let scheduled = partials
            .iter()
            .map(|partial| {
                let oscillator = ctx.create_transient(NodeKind::Oscillator {
                    frequency: partial.frequency_hz,
                });
                let envelope = ctx.create_transient(NodeKind::Gain { gain: 0.0 });
                for event in partial.envelope() {
                    ctx.schedule(envelope, ParamKind::Gain, event);
                }
                ctx.connect(oscillator, Target::Node(envelope));
                ctx.connect(envelope, output);
                ctx.start(oscillator, partial.start_time);
                ctx.stop(oscillator, partial.stop_time);
                ScheduledPartial {
                    oscillator,
                    envelope,
                }
            })
            .collect::<Vec<_>>();

        tracing::debug!(
            frequency_hz = spec.frequency_hz,
            amplitude = spec.amplitude,
            decay_seconds = spec.decay_seconds,
            partials = scheduled.len(),
            "tone scheduled"
        );
        Ok(scheduled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::OfflineContext;
    use crate::error::EngineError;

    fn spec(amplitude: f32) -> ToneSpec {
        ToneSpec {
            frequency_hz: 440.0,
            amplitude,
            decay_seconds: 1.0,
            start_time: 0.0,
        }
    }

    #[test]
    fn test_creates_four_partials() {
        let mut ctx = OfflineContext::new(48000.0);
        let partials = ToneSynthesizer::render_tone(&mut ctx, &spec(0.5), Target::Destination).unwrap();
        assert_eq!(partials.len(), 4);
        assert_eq!(ctx.graph().live_nodes(), 8);
        assert_eq!(ctx.graph().live_sources(), 4);
    }

    #[test]
    fn test_invalid_tone_creates_nothing() {
        let mut ctx = OfflineContext::new(48000.0);
        let mut bad = spec(0.5);
        bad.decay_seconds = 0.0;
        let err = ToneSynthesizer::render_tone(&mut ctx, &bad, Target::Destination).unwrap_err();
        assert!(matches!(err, EngineError::InvalidTone(_)));
        assert_eq!(ctx.graph().live_nodes(), 0);
    }

    #[test]
    fn test_zero_amplitude_creates_nothing() {
        let mut ctx = OfflineContext::new(48000.0);
        let partials = ToneSynthesizer::render_tone(&mut ctx, &spec(0.0), Target::Destination).unwrap();
        assert!(partials.is_empty());
        assert_eq!(ctx.graph().live_nodes(), 0);
    }

    #[test]
    fn test_nodes_released_after_stop() {
        let mut ctx = OfflineContext::new(48000.0);
        ToneSynthesizer::render_tone(&mut ctx, &spec(0.5), Target::Destination).unwrap();
        ctx.render_seconds(1.1);
        assert_eq!(ctx.graph().live_nodes(), 0);
    }
}
