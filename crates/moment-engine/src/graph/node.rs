//! Node identifiers, kinds, and connection targets.

use std::fmt;
use std::sync::Arc;

/// Unique identifier for a node in the render graph.
///
/// Ids are allocated by the owning context on the control thread, so the
/// control side can wire up nodes without waiting for the render thread.
/// They are never reused within a context.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u64);

impl NodeId {
    /// Returns the raw numeric identifier.
    #[inline]
    pub fn index(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

/// What a node does.
#[derive(Clone, Debug)]
pub enum NodeKind {
    /// Sine oscillator. Source node; silent until started.
    Oscillator {
        /// Initial frequency in Hz
        frequency: f32,
    },
    /// Plays a mono sample buffer. Source node; silent until started.
    BufferSource {
        /// Sample data, shared so the control thread never copies it
        buffer: Arc<[f32]>,
        /// Wrap to the start at the end of the buffer
        looping: bool,
        /// Read speed; 1.0 plays at the graph's sample rate
        playback_rate: f32,
    },
    /// Multiplies its summed input by the gain parameter.
    Gain {
        /// Initial gain
        gain: f32,
    },
    /// Second-order low-pass filter. Its frequency parameter is the cutoff.
    Lowpass {
        /// Initial cutoff in Hz
        frequency: f32,
        /// Resonance
        q: f32,
    },
}

impl NodeKind {
    /// Whether this node produces sound on its own and obeys start/stop.
    pub fn is_source(&self) -> bool {
        matches!(self, Self::Oscillator { .. } | Self::BufferSource { .. })
    }

    /// Short name for logs.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Oscillator { .. } => "oscillator",
            Self::BufferSource { .. } => "buffer_source",
            Self::Gain { .. } => "gain",
            Self::Lowpass { .. } => "lowpass",
        }
    }
}

/// An automatable parameter on a node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParamKind {
    /// Gain of a [`NodeKind::Gain`].
    Gain,
    /// Frequency of an oscillator or cutoff of a low-pass.
    Frequency,
}

/// Where a node's output goes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Target {
    /// Summed into another node's audio input.
    Node(NodeId),
    /// Added to another node's parameter value, per sample.
    Param(NodeId, ParamKind),
    /// Summed into the context output.
    Destination,
}

impl Target {
    /// The node this target refers to, if any.
    pub fn node(self) -> Option<NodeId> {
        match self {
            Self::Node(id) | Self::Param(id, _) => Some(id),
            Self::Destination => None,
        }
    }
}
