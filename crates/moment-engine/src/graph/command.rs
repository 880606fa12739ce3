//! Graph mutation commands.
//!
//! Every change to a render graph goes through a [`GraphCommand`], whether it
//! is applied directly (offline) or sent to the audio thread (real-time).

use moment_core::ParamEvent;

use super::node::{NodeId, NodeKind, ParamKind, Target};

/// A single mutation of the render graph.
#[derive(Clone, Debug)]
pub enum GraphCommand {
    /// Add a node.
    Create {
        /// Id allocated by the context
        id: NodeId,
        /// Node behavior and initial values
        kind: NodeKind,
        /// Drop this node once it is finished: sources after their stop
        /// time, processing nodes once nothing feeds them any more.
        transient: bool,
    },
    /// Route a node's output. Duplicate connections are ignored.
    Connect {
        /// Source node
        from: NodeId,
        /// Where its output goes
        to: Target,
    },
    /// Start a source node at a clock time.
    Start {
        /// Source node
        id: NodeId,
        /// Clock time in seconds
        at: f64,
    },
    /// Stop a source node at a clock time. The earliest stop wins.
    Stop {
        /// Source node
        id: NodeId,
        /// Clock time in seconds
        at: f64,
    },
    /// Set a parameter immediately, clearing its automation.
    SetParam {
        /// Target node
        id: NodeId,
        /// Which parameter
        param: ParamKind,
        /// New value
        value: f32,
    },
    /// Append an automation event to a parameter.
    Schedule {
        /// Target node
        id: NodeId,
        /// Which parameter
        param: ParamKind,
        /// Event to add
        event: ParamEvent,
    },
    /// Remove a node and every connection to or from it.
    Release {
        /// Node to remove
        id: NodeId,
    },
}

impl GraphCommand {
    /// The node a command acts on, for logging.
    pub fn node(&self) -> NodeId {
        match self {
            Self::Create { id, .. }
            | Self::Start { id, .. }
            | Self::Stop { id, .. }
            | Self::SetParam { id, .. }
            | Self::Schedule { id, .. }
            | Self::Release { id } => *id,
            Self::Connect { from, .. } => *from,
        }
    }
}
