//! Audio contexts: the clock and command sink that voices schedule into.
//!
//! An [`AudioContext`] hands out node ids, accepts [`GraphCommand`]s, and
//! reports the current clock time. Everything else (creating nodes,
//! connecting, scheduling) is provided on top of [`AudioContext::submit`].
//!
//! - [`OfflineContext`] owns its [`RenderGraph`](crate::graph::RenderGraph)
//!   and renders on demand. Deterministic; used by tests and WAV rendering.
//! - [`RealtimeContext`] drives a cpal output stream and forwards commands to
//!   the audio thread.

mod offline;
mod realtime;

pub use offline::OfflineContext;
pub use realtime::{ContextLink, RealtimeContext, StreamRenderer};

use moment_core::ParamEvent;

use crate::error::Result;
use crate::graph::{GraphCommand, NodeId, NodeKind, ParamKind, Target};

/// Whether a context's clock is running.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ContextState {
    /// Outputs silence; the clock does not advance.
    Suspended,
    /// Rendering and advancing the clock.
    Running,
}

/// Clock plus command sink for a render graph.
///
/// Scheduling is fire-and-forget: no method waits for the render side, and
/// commands naming nodes that have already been released are ignored.
pub trait AudioContext {
    /// Sample rate in Hz.
    fn sample_rate(&self) -> f32;

    /// Clock time in seconds.
    fn current_time(&self) -> f64;

    /// Whether the clock is running.
    fn state(&self) -> ContextState;

    /// Start or continue rendering.
    ///
    /// Returns [`EngineError::AutoplayBlocked`](crate::EngineError::AutoplayBlocked)
    /// when the platform refuses; the context then stays suspended.
    fn resume(&mut self) -> Result<()>;

    /// Stop rendering and freeze the clock.
    fn suspend(&mut self);

    /// Allocate an unused node id.
    fn allocate_id(&mut self) -> NodeId;

    /// Deliver a command to the render graph.
    fn submit(&mut self, command: GraphCommand);

    /// Create a node that lives until explicitly released (or, for sources,
    /// until it stops).
    fn create_node(&mut self, kind: NodeKind) -> NodeId {
        let id = self.allocate_id();
        self.submit(GraphCommand::Create {
            id,
            kind,
            transient: false,
        });
        id
    }

    /// Create a node that the graph releases as soon as it is finished.
    fn create_transient(&mut self, kind: NodeKind) -> NodeId {
        let id = self.allocate_id();
        self.submit(GraphCommand::Create {
            id,
            kind,
            transient: true,
        });
        id
    }

    /// Route `from`'s output to `to`.
    fn connect(&mut self, from: NodeId, to: Target) {
        self.submit(GraphCommand::Connect { from, to });
    }

    /// Start a source node at clock time `at`.
    fn start(&mut self, id: NodeId, at: f64) {
        self.submit(GraphCommand::Start { id, at });
    }

    /// Stop a source node at clock time `at`.
    fn stop(&mut self, id: NodeId, at: f64) {
        self.submit(GraphCommand::Stop { id, at });
    }

    /// Set a parameter now, dropping its automation.
    fn set_param(&mut self, id: NodeId, param: ParamKind, value: f32) {
        self.submit(GraphCommand::SetParam { id, param, value });
    }

    /// Add an automation event to a parameter.
    fn schedule(&mut self, id: NodeId, param: ParamKind, event: ParamEvent) {
        self.submit(GraphCommand::Schedule { id, param, event });
    }

    /// Remove a node immediately.
    fn release(&mut self, id: NodeId) {
        self.submit(GraphCommand::Release { id });
    }
}
