//! Ambient voices: one looping soundscape and its output gain.
//!
//! Starting a voice happens in two steps. [`AmbientVoice::prepare`] does all
//! the fallible work (generating noise, decoding a file) without touching the
//! context. [`PreparedVoice::start`] then wires the nodes up and cannot fail,
//! so a bad file never leaves the session half switched.
//!
//! ```text
//! noise:  pink buffer (loop) ──────────────────────► output gain ─► out
//! waves:  white buffer (loop) ─► lowpass 500 Hz ───► output gain ─► out
//!         lfo 0.1 Hz ─► gain 0.3 ─────────────────► output gain.gain
//! drone:  sine f ──────────────────────────────────► output gain ─► out
//!         lfo 0.2 Hz ─► gain 2 ─► sine f.frequency
//! file:   decoded clip (loop, resampled) ─────────► output gain ─► out
//! ```

use std::sync::Arc;

use moment_core::biquad::BUTTERWORTH_Q;
use moment_synth::{NoiseGenerator, NoiseShape};

use crate::catalog::{AmbientChannelSpec, ChannelKind};
use crate::context::AudioContext;
use crate::error::Result;
use crate::graph::{NodeId, NodeKind, ParamKind, Target};
use crate::media::{AudioClip, load_clip};

/// Cutoff of the waves low-pass, in Hz.
pub const WAVES_CUTOFF_HZ: f32 = 500.0;
/// Rate of the waves volume swell, in Hz.
pub const WAVES_LFO_HZ: f32 = 0.1;
/// Depth of the waves volume swell, added to the output gain.
pub const WAVES_LFO_DEPTH: f32 = 0.3;
/// Rate of the drone vibrato, in Hz.
pub const DRONE_LFO_HZ: f32 = 0.2;
/// Depth of the drone vibrato, in Hz.
pub const DRONE_LFO_DEPTH_HZ: f32 = 2.0;

/// Sound source ready to be wired into a context.
#[derive(Debug, Clone)]
enum Source {
    Noise(Arc<[f32]>),
    Waves(Arc<[f32]>),
    Drone(f32),
    File(AudioClip),
}

/// A voice whose audio is ready; starting it cannot fail.
#[derive(Debug, Clone)]
pub struct PreparedVoice {
    channel_id: u32,
    source: Source,
}

/// Builds ambient voices from channel specs.
pub struct AmbientVoice;

impl AmbientVoice {
    /// Generate or load the audio a channel needs.
    ///
    /// Returns `None` for the silent channel. Fails only when a file-backed
    /// channel cannot be decoded.
    pub fn prepare(
        channel: &AmbientChannelSpec,
        sample_rate: f32,
        noise: &mut NoiseGenerator,
    ) -> Result<Option<PreparedVoice>> {
        let source = match &channel.kind {
            ChannelKind::Silence => return Ok(None),
            ChannelKind::GeneratedNoise => {
                Source::Noise(noise.generate_default(sample_rate, NoiseShape::Pink).into())
            }
            ChannelKind::GeneratedWaves => {
                Source::Waves(noise.generate_default(sample_rate, NoiseShape::White).into())
            }
            ChannelKind::GeneratedDrone { frequency_hz } => Source::Drone(*frequency_hz),
            ChannelKind::FileBacked { path } => Source::File(load_clip(path)?),
        };
        Ok(Some(PreparedVoice {
            channel_id: channel.id,
            source,
        }))
    }
}

impl PreparedVoice {
    /// Channel this voice plays.
    pub fn channel_id(&self) -> u32 {
        self.channel_id
    }

    /// Create, connect, and start the voice's nodes at `volume`.
    pub fn start<C: AudioContext + ?Sized>(self, ctx: &mut C, volume: f32) -> AmbientVoiceHandle {
        let now = ctx.current_time();
        let output = ctx.create_node(NodeKind::Gain { gain: volume });
        ctx.connect(output, Target::Destination);
        let mut nodes = vec![output];
        let mut sources = Vec::new();

        let kind = match self.source {
            Source::Noise(buffer) => {
                let src = looping_buffer(ctx, buffer, 1.0);
                ctx.connect(src, Target::Node(output));
                sources.push(src);
                "noise"
            }
            Source::Waves(buffer) => {
                let src = looping_buffer(ctx, buffer, 1.0);
                let filter = ctx.create_node(NodeKind::Lowpass {
                    frequency: WAVES_CUTOFF_HZ,
                    q: BUTTERWORTH_Q,
                });
                ctx.connect(src, Target::Node(filter));
                ctx.connect(filter, Target::Node(output));

                let (lfo, depth) = lfo(ctx, WAVES_LFO_HZ, WAVES_LFO_DEPTH);
                ctx.connect(depth, Target::Param(output, ParamKind::Gain));

                nodes.extend([filter, depth]);
                sources.extend([src, lfo]);
                "waves"
            }
            Source::Drone(frequency) => {
                let carrier = ctx.create_node(NodeKind::Oscillator { frequency });
                ctx.connect(carrier, Target::Node(output));

                let (lfo, depth) = lfo(ctx, DRONE_LFO_HZ, DRONE_LFO_DEPTH_HZ);
                ctx.connect(depth, Target::Param(carrier, ParamKind::Frequency));

                nodes.push(depth);
                sources.extend([carrier, lfo]);
                "drone"
            }
            Source::File(clip) => {
                let rate = clip.playback_rate(ctx.sample_rate());
                let src = looping_buffer(ctx, clip.samples, rate);
                ctx.connect(src, Target::Node(output));
                sources.push(src);
                "file"
            }
        };

        for &src in &sources {
            ctx.start(src, now);
        }
        nodes.extend(sources.iter().copied());

        tracing::info!(
            channel = self.channel_id,
            kind,
            volume,
            nodes = nodes.len(),
            "ambient voice started"
        );

        AmbientVoiceHandle {
            channel_id: self.channel_id,
            output,
            sources,
            nodes,
            stopped: false,
        }
    }
}

fn looping_buffer<C: AudioContext + ?Sized>(
    ctx: &mut C,
    buffer: Arc<[f32]>,
    playback_rate: f32,
) -> NodeId {
    ctx.create_node(NodeKind::BufferSource {
        buffer,
        looping: true,
        playback_rate,
    })
}

/// A sine LFO scaled by a gain stage. Returns (oscillator, depth gain).
fn lfo<C: AudioContext + ?Sized>(ctx: &mut C, rate_hz: f32, depth: f32) -> (NodeId, NodeId) {
    let osc = ctx.create_node(NodeKind::Oscillator { frequency: rate_hz });
    let gain = ctx.create_node(NodeKind::Gain { gain: depth });
    ctx.connect(osc, Target::Node(gain));
    (osc, gain)
}

/// The live nodes of the currently playing ambient voice.
///
/// Owned by the session controller. Stopping releases every node; doing so
/// twice, or after the nodes have already gone, is harmless.
#[derive(Debug)]
pub struct AmbientVoiceHandle {
    channel_id: u32,
    output: NodeId,
    sources: Vec<NodeId>,
    nodes: Vec<NodeId>,
    stopped: bool,
}

impl AmbientVoiceHandle {
    /// Channel this voice plays.
    pub fn channel_id(&self) -> u32 {
        self.channel_id
    }

    /// The output gain stage.
    pub fn output(&self) -> NodeId {
        self.output
    }

    /// Every node the voice owns, output gain first.
    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    /// Whether [`stop`](Self::stop) has been called.
    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Set the output gain now.
    pub fn set_volume<C: AudioContext + ?Sized>(&self, ctx: &mut C, volume: f32) {
        if !self.stopped {
            ctx.set_param(self.output, ParamKind::Gain, volume);
        }
    }

    /// Stop the sources and release every node.
    pub fn stop<C: AudioContext + ?Sized>(&mut self, ctx: &mut C) {
        if self.stopped {
            return;
        }
        let now = ctx.current_time();
        for &src in &self.sources {
            ctx.stop(src, now);
        }
        for &id in &self.nodes {
            ctx.release(id);
        }
        self.stopped = true;
        tracing::info!(channel = self.channel_id, "ambient voice stopped");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::OfflineContext;

    fn start(kind: ChannelKind, ctx: &mut OfflineContext) -> AmbientVoiceHandle {
        let channel = AmbientChannelSpec::new(1, "test", kind);
        let mut noise = NoiseGenerator::new(1);
        AmbientVoice::prepare(&channel, ctx.sample_rate(), &mut noise)
            .unwrap()
            .unwrap()
            .start(ctx, 0.5)
    }

    #[test]
    fn test_silence_prepares_nothing() {
        let channel = AmbientChannelSpec::new(0, "Silence", ChannelKind::Silence);
        let mut noise = NoiseGenerator::new(1);
        assert!(
            AmbientVoice::prepare(&channel, 48000.0, &mut noise)
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn test_node_counts_per_kind() {
        let cases = [
            (ChannelKind::GeneratedNoise, 2, 1),
            (ChannelKind::GeneratedWaves, 5, 2),
            (
                ChannelKind::GeneratedDrone {
                    frequency_hz: 220.0,
                },
                4,
                2,
            ),
        ];
        for (kind, nodes, sources) in cases {
            let mut ctx = OfflineContext::new(48000.0);
            let handle = start(kind.clone(), &mut ctx);
            assert_eq!(handle.nodes().len(), nodes, "{kind:?}");
            assert_eq!(ctx.graph().live_nodes(), nodes, "{kind:?}");
            assert_eq!(ctx.graph().live_sources(), sources, "{kind:?}");
        }
    }

    #[test]
    fn test_stop_releases_everything_and_is_idempotent() {
        let mut ctx = OfflineContext::new(48000.0);
        let mut handle = start(ChannelKind::GeneratedWaves, &mut ctx);
        ctx.render(256);

        handle.stop(&mut ctx);
        assert!(handle.is_stopped());
        assert_eq!(ctx.graph().live_nodes(), 0);

        handle.stop(&mut ctx);
        assert_eq!(ctx.graph().live_nodes(), 0);
    }

    #[test]
    fn test_set_volume_updates_output_gain() {
        let mut ctx = OfflineContext::new(48000.0);
        let handle = start(ChannelKind::GeneratedNoise, &mut ctx);
        handle.set_volume(&mut ctx, 0.2);
        assert_eq!(
            ctx.graph().param_value(handle.output(), ParamKind::Gain),
            Some(0.2)
        );
    }

    #[test]
    fn test_missing_file_fails_before_touching_context() {
        let channel = AmbientChannelSpec::new(
            5,
            "Missing",
            ChannelKind::FileBacked {
                path: "/no/such/file.wav".into(),
            },
        );
        let mut noise = NoiseGenerator::new(1);
        assert!(AmbientVoice::prepare(&channel, 48000.0, &mut noise).is_err());
    }
}
