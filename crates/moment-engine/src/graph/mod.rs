//! Render graph: nodes, connections, and sample-accurate scheduling.
//!
//! The graph follows the Web Audio model closely enough that the voices and
//! bells above it read like their browser counterparts:
//!
//! - **Nodes**: [`NodeKind::Oscillator`], [`NodeKind::BufferSource`],
//!   [`NodeKind::Gain`], [`NodeKind::Lowpass`]
//! - **Connections**: into another node's input, into a node's parameter
//!   (audio-rate modulation added to its intrinsic value), or to the output
//! - **Scheduling**: sources start and stop at clock times; parameters take
//!   `set`, linear ramp, and exponential ramp events
//! - **Release**: finished sources are dropped after each block, transient
//!   processing nodes follow once nothing feeds them
//!
//! # Architecture
//!
//! ```text
//! control thread                        render thread
//! ──────────────                        ─────────────
//! AudioContext::create_node ──┐
//! AudioContext::connect     ──┼─ GraphCommand ─► RenderGraph::apply
//! AudioContext::schedule    ──┘                  RenderGraph::render
//! ```
//!
//! Offline contexts own the [`RenderGraph`] and apply commands directly; the
//! real-time context sends them over a channel that the audio callback drains
//! at the start of every buffer.

mod command;
mod node;
mod render;

pub use command::GraphCommand;
pub use node::{NodeId, NodeKind, ParamKind, Target};
pub use render::{NodeInfo, RenderGraph};
