//! Backward pass: required-time (RT) propagation in reverse topological order.

use crate::forward::ForwardResult;
use crate::graph::TimingGraph;
use crate::ids::VertexId;
use slacktime_config::TimingConfig;

/// The result of the backward pass: RT per vertex.
#[derive(Debug, Clone)]
pub struct BackwardResult {
    /// Required time, in nanoseconds, indexed by vertex id. `f64::INFINITY`
    /// for a vertex with no successors that is not a declared endpoint.
    pub rt: Vec<f64>,
}

impl BackwardResult {
    /// Required time of `v`.
    pub fn rt(&self, v: VertexId) -> f64 {
        self.rt[v.as_index()]
    }
}

/// Runs the backward pass over `graph` in the reverse of the forward
/// pass's topological `order`.
///
/// Boundary condition: every endpoint's RT is `Tclk - setup`. Every other
/// vertex's RT is `min over successors w of (RT(w) - delay(w))`. A vertex
/// with no successors that is not a declared endpoint receives
/// `RT(v) = +inf` and is excluded from slack reporting.
pub fn run_backward(graph: &TimingGraph, order: &[VertexId], config: &TimingConfig) -> BackwardResult {
    let n = graph.vertex_count();
    let mut rt = vec![f64::INFINITY; n];
    let required_at_endpoint = config.tclk_ns - config.setup_ns;

    for &v in order.iter().rev() {
        let vertex = graph.vertex(v);
        let idx = v.as_index();

        if vertex.role.is_endpoint() {
            rt[idx] = required_at_endpoint;
            continue;
        }

        let outgoing = graph.outgoing_edges(v);
        if outgoing.is_empty() {
            continue; // stays +inf
        }

        let mut best = f64::INFINITY;
        for &edge_id in outgoing {
            let succ = graph.edge(edge_id).to;
            let succ_idx = succ.as_index();
            let candidate = rt[succ_idx] - graph.vertex(succ).delay_ns;
            if candidate < best {
                best = candidate;
            }
        }
        rt[idx] = best;
    }

    BackwardResult { rt }
}

/// Per-vertex slack, plus the derived WNS/TNS metrics over a set of
/// endpoints.
#[derive(Debug, Clone)]
pub struct SlackResult {
    /// `slack(v) = RT(v) - AT(v)`, indexed by vertex id.
    pub slack: Vec<f64>,
    /// Worst Negative Slack: the minimum slack among endpoints.
    pub wns: f64,
    /// Total Negative Slack: the sum of `min(0, slack(e))` over endpoints.
    pub tns: f64,
}

impl SlackResult {
    /// Slack of `v`.
    pub fn slack(&self, v: VertexId) -> f64 {
        self.slack[v.as_index()]
    }
}

/// Computes per-vertex slack and the WNS/TNS metrics derived from it.
pub fn compute_slack(
    graph: &TimingGraph,
    forward: &ForwardResult,
    backward: &BackwardResult,
    endpoints: &[VertexId],
) -> SlackResult {
    let n = graph.vertex_count();
    let slack: Vec<f64> = (0..n)
        .map(|i| backward.rt[i] - forward.at[i])
        .collect();

    let mut wns = f64::INFINITY;
    let mut tns = 0.0;
    for &e in endpoints {
        let s = slack[e.as_index()];
        if s < wns {
            wns = s;
        }
        tns += s.min(0.0);
    }
    if endpoints.is_empty() {
        wns = 0.0;
    }

    SlackResult { slack, wns, tns }
}
