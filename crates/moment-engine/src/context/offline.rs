//! Deterministic context that renders on demand.

use crate::error::{EngineError, Result};
use crate::graph::{GraphCommand, NodeId, RenderGraph};

use super::{AudioContext, ContextState};

/// A context that owns its render graph and renders only when asked.
///
/// Commands are applied synchronously, so a test can schedule a bell and
/// inspect the resulting nodes straight away. Rendering while suspended
/// yields silence and leaves the clock where it is, like a real device.
///
/// # Example
///
/// ```rust
/// use moment_engine::context::{AudioContext, OfflineContext};
/// use moment_engine::graph::{NodeKind, Target};
///
/// let mut ctx = OfflineContext::new(48000.0);
/// let osc = ctx.create_transient(NodeKind::Oscillator { frequency: 440.0 });
/// ctx.connect(osc, Target::Destination);
/// ctx.start(osc, 0.0);
/// ctx.stop(osc, 0.5);
///
/// let audio = ctx.render_seconds(1.0);
/// assert_eq!(audio.len(), 48000);
/// assert_eq!(ctx.graph().live_nodes(), 0);
/// ```
#[derive(Debug)]
pub struct OfflineContext {
    graph: RenderGraph,
    next_id: u64,
    state: ContextState,
    block_resume: bool,
}

impl OfflineContext {
    /// Create a running context.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            graph: RenderGraph::new(sample_rate),
            next_id: 0,
            state: ContextState::Running,
            block_resume: false,
        }
    }

    /// Start in the suspended state.
    #[must_use]
    pub fn starting_suspended(mut self) -> Self {
        self.state = ContextState::Suspended;
        self
    }

    /// Make every `resume` fail with `AutoplayBlocked`.
    #[must_use]
    pub fn blocking_resume(mut self) -> Self {
        self.block_resume = true;
        self
    }

    /// Allow or refuse later resumes.
    pub fn set_resume_blocked(&mut self, blocked: bool) {
        self.block_resume = blocked;
    }

    /// The render graph, for inspection.
    pub fn graph(&self) -> &RenderGraph {
        &self.graph
    }

    /// Render `frames` mono samples.
    pub fn render(&mut self, frames: usize) -> Vec<f32> {
        let mut out = vec![0.0; frames];
        self.render_into(&mut out);
        out
    }

    /// Render into an existing buffer.
    pub fn render_into(&mut self, out: &mut [f32]) {
        match self.state {
            ContextState::Running => self.graph.render(out),
            ContextState::Suspended => out.fill(0.0),
        }
    }

    /// Render `seconds` of mono audio.
    pub fn render_seconds(&mut self, seconds: f64) -> Vec<f32> {
        let frames = (seconds.max(0.0) * f64::from(self.graph.sample_rate())).round() as usize;
        self.render(frames)
    }
}

impl AudioContext for OfflineContext {
    fn sample_rate(&self) -> f32 {
        self.graph.sample_rate()
    }

    fn current_time(&self) -> f64 {
        self.graph.current_time()
    }

    fn state(&self) -> ContextState {
        self.state
    }

    fn resume(&mut self) -> Result<()> {
        if self.state == ContextState::Running {
            return Ok(());
        }
        if self.block_resume {
            return Err(EngineError::AutoplayBlocked);
        }
        self.state = ContextState::Running;
        Ok(())
    }

    fn suspend(&mut self) {
        self.state = ContextState::Suspended;
    }

    fn allocate_id(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    fn submit(&mut self, command: GraphCommand) {
        self.graph.apply(command);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suspended_clock_does_not_advance() {
        let mut ctx = OfflineContext::new(48000.0).starting_suspended();
        let out = ctx.render(4800);
        assert_eq!(ctx.current_time(), 0.0);
        assert!(out.iter().all(|&s| s == 0.0));

        ctx.resume().unwrap();
        ctx.render(4800);
        assert!((ctx.current_time() - 0.1).abs() < 1e-9);

        ctx.suspend();
        ctx.render(4800);
        assert!((ctx.current_time() - 0.1).abs() < 1e-9);
    }

    #[test]
    fn test_blocked_resume_stays_suspended() {
        let mut ctx = OfflineContext::new(48000.0)
            .starting_suspended()
            .blocking_resume();
        assert!(matches!(ctx.resume(), Err(EngineError::AutoplayBlocked)));
        assert_eq!(ctx.state(), ContextState::Suspended);

        ctx.set_resume_blocked(false);
        ctx.resume().unwrap();
        assert_eq!(ctx.state(), ContextState::Running);
    }

    #[test]
    fn test_resume_when_running_is_ok_even_if_blocked() {
        let mut ctx = OfflineContext::new(48000.0).blocking_resume();
        assert!(ctx.resume().is_ok());
    }

    #[test]
    fn test_ids_are_unique() {
        let mut ctx = OfflineContext::new(48000.0);
        let a = ctx.allocate_id();
        let b = ctx.allocate_id();
        assert_ne!(a, b);
    }
}
