//! Sample-by-sample execution of the node graph.

use std::sync::Arc;

use moment_core::{AudioParam, Biquad};
use moment_synth::Oscillator;

use super::command::GraphCommand;
use super::node::{NodeId, NodeKind, ParamKind, Target};

/// Resolved output route, by node index. Rebuilt whenever the structure changes.
#[derive(Clone, Copy, Debug)]
enum Route {
    Node(usize),
    Param(usize),
    Destination,
}

/// Per-node signal processing state.
#[derive(Debug)]
enum Processor {
    Oscillator(Oscillator),
    Buffer {
        buffer: Arc<[f32]>,
        looping: bool,
        playback_rate: f32,
        position: f64,
        ended: bool,
    },
    Gain,
    Lowpass {
        filter: Biquad,
        q: f32,
        cutoff: f32,
    },
}

#[derive(Debug)]
struct NodeSlot {
    id: NodeId,
    label: &'static str,
    source: bool,
    processor: Processor,
    param: Option<(ParamKind, AudioParam)>,
    outputs: Vec<Target>,
    routes: Vec<Route>,
    start: Option<f64>,
    stop: Option<f64>,
    transient: bool,
    /// Something has been connected into this node at least once.
    fed: bool,
    input: f32,
    modulation: f32,
}

impl NodeSlot {
    fn new(id: NodeId, kind: NodeKind, transient: bool, sample_rate: f32) -> Self {
        let label = kind.label();
        let source = kind.is_source();
        let (processor, param) = match kind {
            NodeKind::Oscillator { frequency } => {
                let mut osc = Oscillator::new(sample_rate);
                osc.set_frequency(frequency);
                (
                    Processor::Oscillator(osc),
                    Some((ParamKind::Frequency, AudioParam::new(frequency))),
                )
            }
            NodeKind::BufferSource {
                buffer,
                looping,
                playback_rate,
            } => (
                Processor::Buffer {
                    buffer,
                    looping,
                    playback_rate,
                    position: 0.0,
                    ended: false,
                },
                None,
            ),
            NodeKind::Gain { gain } => (
                Processor::Gain,
                Some((ParamKind::Gain, AudioParam::new(gain))),
            ),
            NodeKind::Lowpass { frequency, q } => (
                Processor::Lowpass {
                    filter: Biquad::lowpass(frequency, q, sample_rate),
                    q,
                    cutoff: frequency,
                },
                Some((ParamKind::Frequency, AudioParam::new(frequency))),
            ),
        };

        Self {
            id,
            label,
            source,
            processor,
            param,
            outputs: Vec::new(),
            routes: Vec::new(),
            start: None,
            stop: None,
            transient,
            fed: false,
            input: 0.0,
            modulation: 0.0,
        }
    }

    fn param_mut(&mut self, kind: ParamKind) -> Option<&mut AudioParam> {
        match &mut self.param {
            Some((k, p)) if *k == kind => Some(p),
            _ => None,
        }
    }

    fn is_playing(&self, t: f64) -> bool {
        if !self.source {
            return true;
        }
        match self.start {
            Some(start) => t >= start && self.stop.is_none_or(|stop| t < stop),
            None => false,
        }
    }

    /// Finished sources never make sound again.
    fn is_finished(&self, t: f64) -> bool {
        if !self.source {
            return false;
        }
        let stopped = self.start.is_some() && self.stop.is_some_and(|stop| stop <= t);
        let ended = matches!(self.processor, Processor::Buffer { ended: true, .. });
        stopped || ended
    }

    #[inline]
    fn tick(&mut self, t: f64, sample_rate: f32) -> f32 {
        let playing = self.is_playing(t);
        let param = self.param.as_ref().map_or(0.0, |(_, p)| p.value_at(t)) + self.modulation;
        let input = self.input;
        self.input = 0.0;
        self.modulation = 0.0;

        match &mut self.processor {
            Processor::Oscillator(osc) => {
                if playing {
                    osc.advance_with_frequency(param)
                } else {
                    0.0
                }
            }
            Processor::Buffer {
                buffer,
                looping,
                playback_rate,
                position,
                ended,
            } => {
                if !playing || *ended {
                    return 0.0;
                }
                let len = buffer.len();
                if len == 0 {
                    *ended = true;
                    return 0.0;
                }
                let index = *position as usize;
                let frac = (*position - index as f64) as f32;
                let a = buffer[index];
                let b = if index + 1 < len {
                    buffer[index + 1]
                } else if *looping {
                    buffer[0]
                } else {
                    0.0
                };

                *position += f64::from(*playback_rate);
                if *position >= len as f64 || *position < 0.0 {
                    if *looping {
                        *position = (*position).rem_euclid(len as f64);
                    } else {
                        *ended = true;
                    }
                }
                a + (b - a) * frac
            }
            Processor::Gain => input * param,
            Processor::Lowpass { filter, q, cutoff } => {
                if (param - *cutoff).abs() > 1e-3 && param.is_finite() {
                    filter.set_lowpass(param, *q, sample_rate);
                    *cutoff = param;
                }
                filter.process(input)
            }
        }
    }
}

/// Read-only view of one node, for inspection and tests.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeInfo {
    /// Node id
    pub id: NodeId,
    /// Kind label: `oscillator`, `buffer_source`, `gain`, or `lowpass`
    pub kind: &'static str,
    /// Whether the node is a source
    pub is_source: bool,
    /// The node's parameter and its intrinsic value now, excluding modulation
    pub param: Option<(ParamKind, f32)>,
    /// Scheduled start time, if started
    pub start: Option<f64>,
    /// Scheduled stop time, if stopped
    pub stop: Option<f64>,
    /// Released automatically when finished
    pub transient: bool,
    /// Outgoing connections
    pub outputs: Vec<Target>,
}

/// A Web-Audio-style node graph rendered one sample at a time.
///
/// The graph is mutated only through [`apply`](Self::apply). Rendering runs
/// nodes in topological order, so modulators are always computed before the
/// parameters they feed. After every rendered block, finished sources and
/// transient processing nodes that nothing feeds any more are dropped.
///
/// # Example
///
/// ```rust
/// use moment_engine::graph::{GraphCommand, NodeKind, RenderGraph, Target};
///
/// let mut graph = RenderGraph::new(48000.0);
/// let osc = graph.allocate_id();
/// graph.apply(GraphCommand::Create { id: osc, kind: NodeKind::Oscillator { frequency: 440.0 }, transient: true });
/// graph.apply(GraphCommand::Connect { from: osc, to: Target::Destination });
/// graph.apply(GraphCommand::Start { id: osc, at: 0.0 });
/// graph.apply(GraphCommand::Stop { id: osc, at: 0.01 });
///
/// let mut out = vec![0.0; 960];
/// graph.render(&mut out);
/// assert!(out.iter().any(|&s| s != 0.0));
/// assert_eq!(graph.live_nodes(), 0);
/// ```
#[derive(Debug)]
pub struct RenderGraph {
    sample_rate: f32,
    frame: u64,
    nodes: Vec<NodeSlot>,
    order: Vec<usize>,
    dirty: bool,
    next_id: u64,
}

impl RenderGraph {
    /// Create an empty graph at a sample rate.
    pub fn new(sample_rate: f32) -> Self {
        Self {
            sample_rate,
            frame: 0,
            nodes: Vec::new(),
            order: Vec::new(),
            dirty: false,
            next_id: 0,
        }
    }

    /// Sample rate in Hz.
    pub fn sample_rate(&self) -> f32 {
        self.sample_rate
    }

    /// Frames rendered so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Clock time in seconds.
    pub fn current_time(&self) -> f64 {
        self.frame as f64 / f64::from(self.sample_rate)
    }

    /// Allocate a fresh node id. Only used when the graph is driven directly.
    pub fn allocate_id(&mut self) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;
        id
    }

    fn position(&self, id: NodeId) -> Option<usize> {
        self.nodes.iter().position(|n| n.id == id)
    }

    /// Apply one mutation. Commands naming unknown nodes are ignored.
    pub fn apply(&mut self, command: GraphCommand) {
        match command {
            GraphCommand::Create {
                id,
                kind,
                transient,
            } => {
                if self.position(id).is_some() {
                    tracing::warn!(%id, "duplicate node id ignored");
                    return;
                }
                tracing::trace!(%id, kind = kind.label(), transient, "node created");
                self.nodes
                    .push(NodeSlot::new(id, kind, transient, self.sample_rate));
                self.dirty = true;
            }
            GraphCommand::Connect { from, to } => {
                let Some(src) = self.position(from) else {
                    return;
                };
                let target_ok = match to {
                    Target::Destination => true,
                    Target::Node(id) => self.position(id).is_some(),
                    Target::Param(id, kind) => self
                        .position(id)
                        .is_some_and(|i| self.nodes[i].param_mut(kind).is_some()),
                };
                if !target_ok {
                    tracing::debug!(%from, ?to, "connection to missing target ignored");
                    return;
                }
                if self.nodes[src].outputs.contains(&to) {
                    return;
                }
                if let Some(id) = to.node()
                    && let Some(dst) = self.position(id)
                {
                    self.nodes[dst].fed = true;
                }
                self.nodes[src].outputs.push(to);
                self.dirty = true;
            }
            GraphCommand::Start { id, at } => {
                if let Some(i) = self.position(id) {
                    let node = &mut self.nodes[i];
                    if node.source && node.start.is_none() {
                        node.start = Some(at);
                    }
                }
            }
            GraphCommand::Stop { id, at } => {
                if let Some(i) = self.position(id) {
                    let node = &mut self.nodes[i];
                    if node.source && node.start.is_some() {
                        node.stop = Some(node.stop.map_or(at, |s| s.min(at)));
                    }
                }
            }
            GraphCommand::SetParam { id, param, value } => {
                if let Some(i) = self.position(id)
                    && let Some(p) = self.nodes[i].param_mut(param)
                {
                    p.set_value(value);
                }
            }
            GraphCommand::Schedule { id, param, event } => {
                if let Some(i) = self.position(id)
                    && let Some(p) = self.nodes[i].param_mut(param)
                {
                    p.schedule(event);
                }
            }
            GraphCommand::Release { id } => {
                if let Some(i) = self.position(id) {
                    tracing::trace!(%id, "node released");
                    self.nodes.remove(i);
                    self.dirty = true;
                }
            }
        }
    }

    /// Resolve routes and recompute the processing order (Kahn's algorithm).
    fn rebuild(&mut self) {
        let ids: Vec<NodeId> = self.nodes.iter().map(|n| n.id).collect();
        let index_of = |id: NodeId| ids.iter().position(|&x| x == id);

        for node in &mut self.nodes {
            node.outputs
                .retain(|t| t.node().is_none_or(|id| index_of(id).is_some()));
            node.routes = node
                .outputs
                .iter()
                .filter_map(|t| match *t {
                    Target::Destination => Some(Route::Destination),
                    Target::Node(id) => index_of(id).map(Route::Node),
                    Target::Param(id, _) => index_of(id).map(Route::Param),
                })
                .collect();
        }

        let n = self.nodes.len();
        let mut in_degree = vec![0u32; n];
        for node in &self.nodes {
            for route in &node.routes {
                if let Route::Node(j) | Route::Param(j) = *route {
                    in_degree[j] += 1;
                }
            }
        }

        let mut queue: Vec<usize> = (0..n).filter(|&i| in_degree[i] == 0).collect();
        let mut order = Vec::with_capacity(n);
        while let Some(idx) = queue.pop() {
            order.push(idx);
            for route in &self.nodes[idx].routes {
                if let Route::Node(j) | Route::Param(j) = *route {
                    in_degree[j] -= 1;
                    if in_degree[j] == 0 {
                        queue.push(j);
                    }
                }
            }
        }

        if order.len() < n {
            tracing::warn!(
                skipped = n - order.len(),
                "graph contains a cycle; nodes on it are not rendered"
            );
        }

        self.order = order;
        self.dirty = false;
    }

    /// Render one frame and advance the clock.
    #[inline]
    pub fn process_frame(&mut self) -> f32 {
        if self.dirty {
            self.rebuild();
        }
        let t = self.current_time();
        let mut out = 0.0;

        for k in 0..self.order.len() {
            let i = self.order[k];
            let y = self.nodes[i].tick(t, self.sample_rate);
            for r in 0..self.nodes[i].routes.len() {
                match self.nodes[i].routes[r] {
                    Route::Node(j) => self.nodes[j].input += y,
                    Route::Param(j) => self.nodes[j].modulation += y,
                    Route::Destination => out += y,
                }
            }
        }

        self.frame += 1;
        out
    }

    /// Render a block of mono frames, then release finished nodes.
    pub fn render(&mut self, out: &mut [f32]) {
        for sample in out.iter_mut() {
            *sample = self.process_frame();
        }
        self.end_block();
    }

    /// Render interleaved frames, writing the same signal to every channel.
    pub fn render_interleaved(&mut self, out: &mut [f32], channels: usize) {
        let channels = channels.max(1);
        for frame in out.chunks_mut(channels) {
            let v = self.process_frame();
            frame.fill(v);
        }
        self.end_block();
    }

    /// Fold elapsed automation and drop finished nodes.
    fn end_block(&mut self) {
        let t = self.current_time();
        for node in &mut self.nodes {
            if let Some((_, p)) = &mut node.param {
                p.prune(t);
            }
        }

        let before = self.nodes.len();
        self.nodes.retain(|n| !n.is_finished(t));

        // Transient processing nodes go once nothing feeds them; repeat for chains.
        loop {
            let ids: Vec<NodeId> = self.nodes.iter().map(|n| n.id).collect();
            let mut has_input = vec![false; ids.len()];
            for node in &self.nodes {
                for target in &node.outputs {
                    if let Some(id) = target.node()
                        && let Some(j) = ids.iter().position(|&x| x == id)
                    {
                        has_input[j] = true;
                    }
                }
            }
            let mut k = 0;
            let len_before = self.nodes.len();
            self.nodes.retain(|n| {
                let keep = n.source || !n.transient || !n.fed || has_input[k];
                k += 1;
                keep
            });
            if self.nodes.len() == len_before {
                break;
            }
        }

        if self.nodes.len() != before {
            self.dirty = true;
        }
    }

    /// Number of nodes in the graph.
    pub fn live_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of source nodes in the graph.
    pub fn live_sources(&self) -> usize {
        self.nodes.iter().filter(|n| n.source).count()
    }

    /// Whether a node is still in the graph.
    pub fn contains(&self, id: NodeId) -> bool {
        self.position(id).is_some()
    }

    /// Intrinsic value of a parameter now, excluding modulation.
    pub fn param_value(&self, id: NodeId, param: ParamKind) -> Option<f32> {
        let t = self.current_time();
        self.position(id)
            .and_then(|i| self.nodes[i].param.as_ref())
            .filter(|(k, _)| *k == param)
            .map(|(_, p)| p.value_at(t))
    }

    /// Intrinsic value of a parameter at an arbitrary time.
    pub fn param_value_at(&self, id: NodeId, param: ParamKind, t: f64) -> Option<f32> {
        self.position(id)
            .and_then(|i| self.nodes[i].param.as_ref())
            .filter(|(k, _)| *k == param)
            .map(|(_, p)| p.value_at(t))
    }

    /// Snapshot of every node.
    pub fn nodes(&self) -> Vec<NodeInfo> {
        let t = self.current_time();
        self.nodes
            .iter()
            .map(|n| NodeInfo {
                id: n.id,
                kind: n.label,
                is_source: n.source,
                param: n.param.as_ref().map(|(k, p)| (*k, p.value_at(t))),
                start: n.start,
                stop: n.stop,
                transient: n.transient,
                outputs: n.outputs.clone(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use moment_core::ParamEvent;

    const SR: f32 = 48000.0;

    fn create(graph: &mut RenderGraph, kind: NodeKind, transient: bool) -> NodeId {
        let id = graph.allocate_id();
        graph.apply(GraphCommand::Create {
            id,
            kind,
            transient,
        });
        id
    }

    fn connect(graph: &mut RenderGraph, from: NodeId, to: Target) {
        graph.apply(GraphCommand::Connect { from, to });
    }

    fn peak(buf: &[f32]) -> f32 {
        buf.iter().fold(0.0f32, |m, s| m.max(s.abs()))
    }

    #[test]
    fn test_unstarted_source_is_silent() {
        let mut graph = RenderGraph::new(SR);
        let osc = create(&mut graph, NodeKind::Oscillator { frequency: 440.0 }, false);
        connect(&mut graph, osc, Target::Destination);

        let mut out = vec![1.0; 512];
        graph.render(&mut out);
        assert_eq!(peak(&out), 0.0);
        assert_eq!(graph.live_nodes(), 1);
    }

    #[test]
    fn test_start_and_stop_are_sample_accurate() {
        let mut graph = RenderGraph::new(SR);
        let osc = create(&mut graph, NodeKind::Oscillator { frequency: 1000.0 }, false);
        connect(&mut graph, osc, Target::Destination);
        graph.apply(GraphCommand::Start { id: osc, at: 0.01 });
        graph.apply(GraphCommand::Stop { id: osc, at: 0.02 });

        let mut out = vec![0.0; 2400];
        graph.render(&mut out);

        assert_eq!(peak(&out[..480]), 0.0, "silent before start");
        assert!(peak(&out[480..960]) > 0.9, "audible while playing");
        assert_eq!(peak(&out[960..]), 0.0, "silent after stop");
        assert!(!graph.contains(osc), "stopped source is released");
    }

    #[test]
    fn test_earliest_stop_wins() {
        let mut graph = RenderGraph::new(SR);
        let osc = create(&mut graph, NodeKind::Oscillator { frequency: 440.0 }, false);
        graph.apply(GraphCommand::Start { id: osc, at: 0.0 });
        graph.apply(GraphCommand::Stop { id: osc, at: 1.0 });
        graph.apply(GraphCommand::Stop { id: osc, at: 5.0 });
        graph.apply(GraphCommand::Stop { id: osc, at: 0.5 });

        let info = graph.nodes();
        assert_eq!(info[0].stop, Some(0.5));
    }

    #[test]
    fn test_stop_before_start_is_ignored() {
        let mut graph = RenderGraph::new(SR);
        let osc = create(&mut graph, NodeKind::Oscillator { frequency: 440.0 }, false);
        graph.apply(GraphCommand::Stop { id: osc, at: 0.0 });
        graph.apply(GraphCommand::Start { id: osc, at: 0.0 });
        assert_eq!(graph.nodes()[0].stop, None);
    }

    #[test]
    fn test_commands_on_unknown_nodes_are_ignored() {
        let mut graph = RenderGraph::new(SR);
        let ghost = graph.allocate_id();
        graph.apply(GraphCommand::Stop { id: ghost, at: 0.0 });
        graph.apply(GraphCommand::Release { id: ghost });
        graph.apply(GraphCommand::SetParam {
            id: ghost,
            param: ParamKind::Gain,
            value: 1.0,
        });
        assert_eq!(graph.live_nodes(), 0);
    }

    #[test]
    fn test_gain_scales_input() {
        let mut graph = RenderGraph::new(SR);
        let osc = create(&mut graph, NodeKind::Oscillator { frequency: 500.0 }, false);
        let gain = create(&mut graph, NodeKind::Gain { gain: 0.25 }, false);
        connect(&mut graph, osc, Target::Node(gain));
        connect(&mut graph, gain, Target::Destination);
        graph.apply(GraphCommand::Start { id: osc, at: 0.0 });

        let mut out = vec![0.0; 4800];
        graph.render(&mut out);
        let p = peak(&out);
        assert!((p - 0.25).abs() < 0.01, "peak should be ~0.25, got {p}");
    }

    #[test]
    fn test_param_modulation_adds_to_intrinsic_value() {
        let mut graph = RenderGraph::new(SR);
        // A constant source: one-sample looping buffer of 1.0
        let dc = create(
            &mut graph,
            NodeKind::BufferSource {
                buffer: Arc::from(vec![1.0f32]),
                looping: true,
                playback_rate: 1.0,
            },
            false,
        );
        let gain = create(&mut graph, NodeKind::Gain { gain: 0.5 }, false);
        let offset = create(
            &mut graph,
            NodeKind::BufferSource {
                buffer: Arc::from(vec![0.25f32]),
                looping: true,
                playback_rate: 1.0,
            },
            false,
        );
        connect(&mut graph, dc, Target::Node(gain));
        connect(&mut graph, offset, Target::Param(gain, ParamKind::Gain));
        connect(&mut graph, gain, Target::Destination);
        graph.apply(GraphCommand::Start { id: dc, at: 0.0 });
        graph.apply(GraphCommand::Start { id: offset, at: 0.0 });

        let mut out = vec![0.0; 16];
        graph.render(&mut out);
        assert!(out.iter().all(|&s| (s - 0.75).abs() < 1e-6), "{out:?}");
        assert_eq!(graph.param_value(gain, ParamKind::Gain), Some(0.5));
    }

    #[test]
    fn test_connect_to_missing_param_is_ignored() {
        let mut graph = RenderGraph::new(SR);
        let osc = create(&mut graph, NodeKind::Oscillator { frequency: 1.0 }, false);
        let gain = create(&mut graph, NodeKind::Gain { gain: 1.0 }, false);
        connect(&mut graph, osc, Target::Param(gain, ParamKind::Frequency));
        assert!(graph.nodes()[0].outputs.is_empty());
    }

    #[test]
    fn test_transient_gain_released_after_its_source() {
        let mut graph = RenderGraph::new(SR);
        let osc = create(&mut graph, NodeKind::Oscillator { frequency: 440.0 }, true);
        let gain = create(&mut graph, NodeKind::Gain { gain: 1.0 }, true);
        connect(&mut graph, osc, Target::Node(gain));
        connect(&mut graph, gain, Target::Destination);
        graph.apply(GraphCommand::Start { id: osc, at: 0.0 });
        graph.apply(GraphCommand::Stop { id: osc, at: 0.005 });

        let mut out = vec![0.0; 128];
        graph.render(&mut out);
        assert_eq!(graph.live_nodes(), 2);

        let mut out = vec![0.0; 480];
        graph.render(&mut out);
        assert_eq!(graph.live_nodes(), 0);
    }

    #[test]
    fn test_unfed_transient_gain_survives() {
        let mut graph = RenderGraph::new(SR);
        let gain = create(&mut graph, NodeKind::Gain { gain: 1.0 }, true);
        let mut out = vec![0.0; 64];
        graph.render(&mut out);
        assert!(graph.contains(gain), "not yet connected, must not be dropped");
    }

    #[test]
    fn test_non_looping_buffer_ends_and_is_released() {
        let mut graph = RenderGraph::new(SR);
        let src = create(
            &mut graph,
            NodeKind::BufferSource {
                buffer: Arc::from(vec![0.5f32; 10]),
                looping: false,
                playback_rate: 1.0,
            },
            false,
        );
        connect(&mut graph, src, Target::Destination);
        graph.apply(GraphCommand::Start { id: src, at: 0.0 });

        let mut out = vec![0.0; 32];
        graph.render(&mut out);
        assert!(out[..10].iter().all(|&s| s != 0.0));
        assert!(out[10..].iter().all(|&s| s == 0.0));
        assert!(!graph.contains(src));
    }

    #[test]
    fn test_playback_rate_resamples() {
        let mut graph = RenderGraph::new(SR);
        let ramp: Vec<f32> = (0..100).map(|i| i as f32).collect();
        let src = create(
            &mut graph,
            NodeKind::BufferSource {
                buffer: Arc::from(ramp),
                looping: true,
                playback_rate: 0.5,
            },
            false,
        );
        connect(&mut graph, src, Target::Destination);
        graph.apply(GraphCommand::Start { id: src, at: 0.0 });

        let mut out = vec![0.0; 4];
        graph.render(&mut out);
        assert_eq!(out, [0.0, 0.5, 1.0, 1.5]);
    }

    #[test]
    fn test_scheduled_automation_is_followed() {
        let mut graph = RenderGraph::new(SR);
        let gain = create(&mut graph, NodeKind::Gain { gain: 0.0 }, false);
        graph.apply(GraphCommand::Schedule {
            id: gain,
            param: ParamKind::Gain,
            event: ParamEvent::SetValue {
                value: 1.0,
                time: 0.0,
            },
        });
        graph.apply(GraphCommand::Schedule {
            id: gain,
            param: ParamKind::Gain,
            event: ParamEvent::LinearRamp {
                value: 0.0,
                end_time: 1.0,
            },
        });

        let mut out = vec![0.0; 24000];
        graph.render(&mut out);
        let v = graph.param_value(gain, ParamKind::Gain).unwrap();
        assert!((v - 0.5).abs() < 1e-3, "half-way down the ramp, got {v}");
    }

    #[test]
    fn test_cycle_does_not_hang() {
        let mut graph = RenderGraph::new(SR);
        let a = create(&mut graph, NodeKind::Gain { gain: 1.0 }, false);
        let b = create(&mut graph, NodeKind::Gain { gain: 1.0 }, false);
        connect(&mut graph, a, Target::Node(b));
        connect(&mut graph, b, Target::Node(a));
        connect(&mut graph, b, Target::Destination);

        let mut out = vec![0.0; 64];
        graph.render(&mut out);
        assert!(out.iter().all(|&s| s == 0.0));
    }

    #[test]
    fn test_interleaved_duplicates_channels() {
        let mut graph = RenderGraph::new(SR);
        let osc = create(&mut graph, NodeKind::Oscillator { frequency: 440.0 }, false);
        connect(&mut graph, osc, Target::Destination);
        graph.apply(GraphCommand::Start { id: osc, at: 0.0 });

        let mut out = vec![0.0; 256];
        graph.render_interleaved(&mut out, 2);
        for frame in out.chunks(2) {
            assert_eq!(frame[0], frame[1]);
        }
        assert_eq!(graph.frame(), 128);
    }
}
