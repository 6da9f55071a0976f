//! Forward pass: arrival-time (AT) propagation in topological order.

use crate::graph::TimingGraph;
use crate::ids::{EdgeId, VertexId};
use slacktime_config::TimingConfig;

/// The result of the forward pass: AT per vertex, plus the critical
/// predecessor edge used to reconstruct paths in the K-path extractor.
#[derive(Debug, Clone)]
pub struct ForwardResult {
    /// Arrival time, in nanoseconds, indexed by vertex id.
    pub at: Vec<f64>,
    /// The incoming edge that set each vertex's AT (the argmax
    /// predecessor), or `None` for startpoints and sourceless vertices.
    pub critical_predecessor: Vec<Option<EdgeId>>,
}

impl ForwardResult {
    /// Arrival time of `v`.
    pub fn at(&self, v: VertexId) -> f64 {
        self.at[v.as_index()]
    }

    /// The edge that determined `v`'s arrival time, if any.
    pub fn critical_predecessor(&self, v: VertexId) -> Option<EdgeId> {
        self.critical_predecessor[v.as_index()]
    }
}

/// Runs the forward pass over `graph` in the given topological `order`.
///
/// Boundary condition: a startpoint's AT is `clock_to_q` for a flip-flop
/// Q-side, or `0` for a primary input. Every other vertex's AT is
/// `delay(v) + max over predecessors u of AT(u)`, with ties among
/// equal-AT predecessors broken by incoming-edge insertion order (the
/// first maximal predecessor wins). A vertex with no predecessors that is
/// not a declared startpoint is treated as an implicit constant driver:
/// `AT(v) = delay(v)`.
pub fn run_forward(graph: &TimingGraph, order: &[VertexId], config: &TimingConfig) -> ForwardResult {
    let n = graph.vertex_count();
    let mut at = vec![0.0; n];
    let mut critical_predecessor = vec![None; n];

    for &v in order {
        let vertex = graph.vertex(v);
        let idx = v.as_index();

        if vertex.role.is_startpoint() {
            at[idx] = match vertex.role {
                crate::graph::Role::FlipFlopQ => config.clock_to_q_ns,
                _ => 0.0,
            };
            continue;
        }

        let incoming = graph.incoming_edges(v);
        if incoming.is_empty() {
            at[idx] = vertex.delay_ns;
            continue;
        }

        let mut best_edge = incoming[0];
        let mut best_at = at[graph.edge(best_edge).from.as_index()];
        for &edge_id in &incoming[1..] {
            let candidate_at = at[graph.edge(edge_id).from.as_index()];
            if candidate_at > best_at {
                best_at = candidate_at;
                best_edge = edge_id;
            }
        }

        at[idx] = vertex.delay_ns + best_at;
        critical_predecessor[idx] = Some(best_edge);
    }

    ForwardResult {
        at,
        critical_predecessor,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{GateTag, Role};
    use crate::topo::topo_order;

    fn default_timing() -> TimingConfig {
        TimingConfig {
            tclk_ns: 2.0,
            setup_ns: 0.05,
            clock_to_q_ns: 0.08,
        }
    }

    #[test]
    fn single_gate_scenario() {
        let mut g = TimingGraph::new();
        let a = g.add_vertex("a".into(), Role::PrimaryInput, GateTag::Primary, 0.0);
        let b = g.add_vertex("b".into(), Role::PrimaryInput, GateTag::Primary, 0.0);
        let y = g.add_vertex("y".into(), Role::PrimaryOutput, GateTag::And, 0.02);
        g.add_edge(a, y);
        g.add_edge(b, y);
        let order = topo_order(&g).unwrap();
        let result = run_forward(&g, &order, &default_timing());
        assert_eq!(result.at(y), 0.02);
    }

    #[test]
    fn chain_scenario() {
        let mut g = TimingGraph::new();
        let a = g.add_vertex("a".into(), Role::PrimaryInput, GateTag::Primary, 0.0);
        let b = g.add_vertex("b".into(), Role::PrimaryInput, GateTag::Primary, 0.0);
        let c = g.add_vertex("c".into(), Role::PrimaryInput, GateTag::Primary, 0.0);
        let n1 = g.add_vertex("n1".into(), Role::InternalCombinational, GateTag::Not, 0.01);
        let n2 = g.add_vertex("n2".into(), Role::InternalCombinational, GateTag::And, 0.02);
        let y = g.add_vertex("y".into(), Role::PrimaryOutput, GateTag::Or, 0.04);
        g.add_edge(a, n1);
        g.add_edge(n1, n2);
        g.add_edge(b, n2);
        g.add_edge(n2, y);
        g.add_edge(c, y);
        let order = topo_order(&g).unwrap();
        let result = run_forward(&g, &order, &default_timing());
        assert!((result.at(y) - 0.07).abs() < 1e-9);
    }

    #[test]
    fn dff_q_side_uses_clock_to_q_boundary() {
        let mut g = TimingGraph::new();
        let q = g.add_vertex("ff1/Q".into(), Role::FlipFlopQ, GateTag::Dff, 0.0);
        let n = g.add_vertex("n".into(), Role::InternalCombinational, GateTag::Not, 0.01);
        g.add_edge(q, n);
        let order = topo_order(&g).unwrap();
        let result = run_forward(&g, &order, &default_timing());
        assert_eq!(result.at(q), 0.08);
        assert!((result.at(n) - 0.09).abs() < 1e-9);
    }

    #[test]
    fn sourceless_non_startpoint_uses_own_delay() {
        // Constant source vertex: no incoming edges, not a declared startpoint.
        let mut g = TimingGraph::new();
        let c = g.add_vertex("1'b0".into(), Role::InternalCombinational, GateTag::Primary, 0.0);
        let order = topo_order(&g).unwrap();
        let result = run_forward(&g, &order, &default_timing());
        assert_eq!(result.at(c), 0.0);
    }

    #[test]
    fn diamond_fanout_equal_at_both_predecessors() {
        let mut g = TimingGraph::new();
        let a = g.add_vertex("a".into(), Role::PrimaryInput, GateTag::Primary, 0.0);
        let p = g.add_vertex("p".into(), Role::InternalCombinational, GateTag::Not, 0.01);
        let q = g.add_vertex("q".into(), Role::InternalCombinational, GateTag::Not, 0.01);
        let y = g.add_vertex("y".into(), Role::PrimaryOutput, GateTag::And, 0.02);
        g.add_edge(a, p);
        g.add_edge(a, q);
        let e_py = g.add_edge(p, y);
        g.add_edge(q, y);
        let order = topo_order(&g).unwrap();
        let result = run_forward(&g, &order, &default_timing());
        assert!((result.at(y) - 0.03).abs() < 1e-9);
        // Tie broken by incoming-edge insertion order: p arrives first.
        assert_eq!(result.critical_predecessor(y), Some(e_py));
    }
}
