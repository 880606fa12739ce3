//! Context backed by a live audio output stream.
//!
//! The control thread owns a [`RealtimeContext`]; the audio thread owns a
//! [`StreamRenderer`] inside the backend callback. They share:
//!
//! - an unbounded command channel (control → audio), drained at the start of
//!   every buffer
//! - a frame counter the audio thread publishes after each buffer
//! - a running flag; while it is clear the callback writes silence and the
//!   counter does not move

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use crossbeam_channel::{Receiver, Sender, unbounded};

use crate::backend::{AudioBackend, BackendStreamConfig, StreamHandle};
use crate::error::Result;
use crate::graph::{GraphCommand, NodeId, RenderGraph};

use super::{AudioContext, ContextState};

/// Audio-thread half of a real-time context.
pub struct StreamRenderer {
    graph: RenderGraph,
    commands: Receiver<GraphCommand>,
    frames: Arc<AtomicU64>,
    running: Arc<AtomicBool>,
    channels: usize,
}

impl StreamRenderer {
    /// Fill one interleaved output buffer.
    pub fn process(&mut self, data: &mut [f32]) {
        while let Ok(cmd) = self.commands.try_recv() {
            self.graph.apply(cmd);
        }

        if !self.running.load(Ordering::Acquire) {
            data.fill(0.0);
            return;
        }

        self.graph.render_interleaved(data, self.channels);
        self.frames.store(self.graph.frame(), Ordering::Release);
    }
}

/// A context that plays through an audio device.
///
/// # Example
///
/// ```rust,no_run
/// use moment_engine::context::{AudioContext, RealtimeContext};
/// use moment_engine::cpal_backend::CpalBackend;
/// use moment_engine::backend::BackendStreamConfig;
/// use moment_engine::graph::{NodeKind, Target};
///
/// let mut ctx = RealtimeContext::open(&CpalBackend::new(), &BackendStreamConfig::default())?;
/// let osc = ctx.create_transient(NodeKind::Oscillator { frequency: 440.0 });
/// ctx.connect(osc, Target::Destination);
/// let now = ctx.current_time();
/// ctx.start(osc, now);
/// ctx.stop(osc, now + 1.0);
/// # Ok::<(), moment_engine::EngineError>(())
/// ```
pub struct RealtimeContext {
    _stream: StreamHandle,
    commands: Sender<GraphCommand>,
    frames: Arc<AtomicU64>,
    running: Arc<AtomicBool>,
    sample_rate: f32,
    next_id: u64,
}

impl RealtimeContext {
    /// Build the shared state and the audio-thread renderer for a stream.
    ///
    /// The context starts running.
    pub fn channel_pair(sample_rate: f32, channels: u16) -> (ContextLink, StreamRenderer) {
        let (tx, rx) = unbounded();
        let frames = Arc::new(AtomicU64::new(0));
        let running = Arc::new(AtomicBool::new(true));
        let renderer = StreamRenderer {
            graph: RenderGraph::new(sample_rate),
            commands: rx,
            frames: Arc::clone(&frames),
            running: Arc::clone(&running),
            channels: usize::from(channels.max(1)),
        };
        let link = ContextLink {
            commands: tx,
            frames,
            running,
            sample_rate,
        };
        (link, renderer)
    }

    /// Open an output stream on `backend` and start rendering into it.
    pub fn open(backend: &dyn AudioBackend, config: &BackendStreamConfig) -> Result<Self> {
        // The graph must run at the rate the device negotiates, which is only
        // known once the stream exists. The renderer is handed over afterwards.
        let (probe_tx, probe_rx) = unbounded::<StreamRenderer>();
        let mut renderer: Option<StreamRenderer> = None;

        let stream = backend.build_output_stream(
            config,
            Box::new(move |data: &mut [f32]| {
                if let Ok(r) = probe_rx.try_recv() {
                    renderer = Some(r);
                }
                match renderer.as_mut() {
                    Some(r) => r.process(data),
                    None => data.fill(0.0),
                }
            }),
            Box::new(|err| tracing::error!(error = err, "audio stream error")),
        )?;

        let sample_rate = stream.sample_rate as f32;
        let (link, renderer) = Self::channel_pair(sample_rate, stream.channels);
        // Receiver lives in the callback for as long as the stream does.
        let _ = probe_tx.send(renderer);

        tracing::info!(
            backend = backend.name(),
            sample_rate = stream.sample_rate,
            channels = stream.channels,
            "realtime context opened"
        );

        Ok(Self::from_link(link, stream.handle))
    }

    /// Assemble a context from its control-side link and a live stream.
    pub fn from_link(link: ContextLink, stream: StreamHandle) -> Self {
        Self {
            _stream: stream,
            commands: link.commands,
            frames: link.frames,
            running: link.running,
            sample_rate: link.sample_rate,
            next_id: 0,
        }
    }
}

/// Control-side handles produced by [`RealtimeContext::channel_pair`].
#[derive(Debug, Clone)]
pub struct ContextLink {
    commands: Sender<GraphCommand>,
    frames: Arc<AtomicU64>,
    running: Arc<AtomicBool>,
    sample_rate: f32,
}

impl AudioContext for RealtimeContext {
    fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    fn current_time(&self) -> f64 {
        self.frames.load(Ordering::Acquire) as f64 / f64::from(self.sample_rate)
    }

    fn state(&self) -> ContextState {
        if self.running.load(Ordering::Acquire) {
            ContextState::Running
        } else {
            ContextState::Suspended
        }
    }

    fn resume(&mut self) -> Result<()> {
        if !self.running.swap(true, Ordering::AcqRel) {
            tracing::debug!("realtime context resumed");
        }
        Ok(())
    }

    fn suspend(&mut self) {
        if self.running.swap(false, Ordering::AcqRel) {
            tracing::debug!("realtime context suspended");
        }
    }

    fn allocate_id(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    fn submit(&mut self, command: GraphCommand) {
        if self.commands.send(command).is_err() {
            tracing::warn!("audio thread has gone away; command dropped");
        }
    }
}

impl std::fmt::Debug for RealtimeContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RealtimeContext")
            .field("sample_rate", &self.sample_rate)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{NodeKind, Target};

    fn context_with_renderer() -> (RealtimeContext, StreamRenderer) {
        let (link, renderer) = RealtimeContext::channel_pair(48000.0, 2);
        (RealtimeContext::from_link(link, StreamHandle::new(())), renderer)
    }

    #[test]
    fn test_commands_reach_the_audio_thread() {
        let (mut ctx, mut renderer) = context_with_renderer();
        let osc = ctx.create_node(NodeKind::Oscillator { frequency: 440.0 });
        ctx.connect(osc, Target::Destination);
        ctx.start(osc, 0.0);

        let mut buf = vec![0.0; 512];
        renderer.process(&mut buf);
        assert!(buf.iter().any(|&s| s != 0.0));
        assert!((ctx.current_time() - 256.0 / 48000.0).abs() < 1e-12);
    }

    #[test]
    fn test_suspended_outputs_silence_and_freezes_clock() {
        let (mut ctx, mut renderer) = context_with_renderer();
        let osc = ctx.create_node(NodeKind::Oscillator { frequency: 440.0 });
        ctx.connect(osc, Target::Destination);
        ctx.start(osc, 0.0);
        ctx.suspend();

        let mut buf = vec![1.0; 512];
        renderer.process(&mut buf);
        assert!(buf.iter().all(|&s| s == 0.0));
        assert_eq!(ctx.current_time(), 0.0);
        assert_eq!(ctx.state(), ContextState::Suspended);

        ctx.resume().unwrap();
        renderer.process(&mut buf);
        assert!(ctx.current_time() > 0.0);
    }

    #[test]
    fn test_submit_after_renderer_dropped_does_not_panic() {
        let (mut ctx, renderer) = context_with_renderer();
        drop(renderer);
        let id = ctx.create_node(NodeKind::Gain { gain: 1.0 });
        ctx.release(id);
    }
}
