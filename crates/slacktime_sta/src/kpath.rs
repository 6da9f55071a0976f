//! K-worst edge-disjoint critical-path extraction.

use crate::error::StaError;
use crate::forward::ForwardResult;
use crate::graph::TimingGraph;
use crate::backward::SlackResult;
use crate::ids::{EdgeId, VertexId};
use slacktime_config::KPathConfig;
use slacktime_diagnostics::{Category, Diagnostic, DiagnosticCode, DiagnosticSink};
use slacktime_source::{FileId, Span};
use std::collections::HashSet;

/// A single reported critical path, source vertex to sink endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct PathReport {
    /// Vertex names along the path, source to sink.
    pub vertices: Vec<String>,
    /// Edges along the path as `(from_name, to_name)` pairs, source to sink.
    pub edges: Vec<(String, String)>,
    /// The delay, in nanoseconds, attributed to each vertex in [`vertices`](Self::vertices).
    pub per_vertex_delay: Vec<f64>,
    /// The sink endpoint's arrival time, in nanoseconds.
    pub total_delay: f64,
    /// The sink endpoint's slack, in nanoseconds.
    pub endpoint_slack: f64,
}

/// Extracts up to `config.k` edge-disjoint critical paths, worst slack first.
///
/// Implements §4.5: repeatedly pick the minimum-slack endpoint still
/// reachable with available edges, reconstruct its path by following
/// `critical_predecessor` (falling back to the best available predecessor
/// when that edge is already consumed), and mark the path's edges
/// unavailable before the next iteration. An endpoint whose reconstruction
/// gets stuck (no available predecessor anywhere along the walk back) is
/// dropped and reported as a [`Diagnostic`] warning rather than failing the
/// whole extraction.
///
/// `file` attributes any `NoPathToEndpoint` warning to the netlist file the
/// graph was loaded from, since the finding itself has no single token span.
///
/// Returns [`StaError::NoEndpoints`] if `endpoints` is empty.
#[allow(clippy::too_many_arguments)]
pub fn find_k_critical_paths(
    graph: &TimingGraph,
    endpoints: &[VertexId],
    forward: &ForwardResult,
    slack: &SlackResult,
    config: &KPathConfig,
    sink: &DiagnosticSink,
    file: FileId,
) -> Result<Vec<PathReport>, StaError> {
    if endpoints.is_empty() {
        return Err(StaError::NoEndpoints);
    }

    let mut available = vec![true; graph.edge_count()];
    let mut dropped: HashSet<VertexId> = HashSet::new();
    let mut reports = Vec::new();

    loop {
        if reports.len() >= config.k {
            break;
        }

        let candidate = endpoints
            .iter()
            .copied()
            .filter(|e| !dropped.contains(e))
            .min_by(|&a, &b| {
                slack
                    .slack(a)
                    .partial_cmp(&slack.slack(b))
                    .unwrap_or(std::cmp::Ordering::Equal)
            });

        let Some(e) = candidate else {
            break;
        };

        let e_slack = slack.slack(e);
        if !reports.is_empty() && config.violating_only && e_slack >= 0.0 {
            break;
        }

        match reconstruct_path(graph, forward, &available, e) {
            Some((path_edges, path_vertices)) => {
                for &eid in &path_edges {
                    available[eid.as_index()] = false;
                }
                reports.push(build_report(graph, forward, slack, &path_edges, &path_vertices, e));
            }
            None => {
                dropped.insert(e);
                let name = graph.vertex(e).name.clone();
                sink.emit(
                    Diagnostic::warning(
                        DiagnosticCode::new(Category::Timing, 301),
                        format!("endpoint `{name}` became unreachable during K-path extraction"),
                        Span::whole_file(file),
                    )
                    .with_note("all available predecessor edges were already used by earlier paths"),
                );
            }
        }
    }

    Ok(reports)
}

/// Walks backward from `sink` via `critical_predecessor`, falling back to
/// the available predecessor with the highest AT when the recorded edge is
/// consumed. Returns the edges and vertices of the path in source-to-sink
/// order, or `None` if some vertex along the way has incoming edges but
/// none available.
fn reconstruct_path(
    graph: &TimingGraph,
    forward: &ForwardResult,
    available: &[bool],
    sink: VertexId,
) -> Option<(Vec<EdgeId>, Vec<VertexId>)> {
    let mut edges_used = Vec::new();
    let mut vertices = vec![sink];
    let mut current = sink;

    loop {
        let incoming = graph.incoming_edges(current);
        if incoming.is_empty() {
            break;
        }

        let critical = forward
            .critical_predecessor(current)
            .filter(|&eid| available[eid.as_index()]);

        let chosen = critical.or_else(|| {
            incoming
                .iter()
                .copied()
                .filter(|&eid| available[eid.as_index()])
                .max_by(|&a, &b| {
                    let at_a = forward.at(graph.edge(a).from);
                    let at_b = forward.at(graph.edge(b).from);
                    at_a.partial_cmp(&at_b).unwrap_or(std::cmp::Ordering::Equal)
                })
        });

        let eid = chosen?;
        edges_used.push(eid);
        current = graph.edge(eid).from;
        vertices.push(current);
    }

    edges_used.reverse();
    vertices.reverse();
    Some((edges_used, vertices))
}

fn build_report(
    graph: &TimingGraph,
    forward: &ForwardResult,
    slack: &SlackResult,
    path_edges: &[EdgeId],
    path_vertices: &[VertexId],
    sink: VertexId,
) -> PathReport {
    let vertices = path_vertices
        .iter()
        .map(|&v| graph.vertex(v).name.clone())
        .collect();
    let edges = path_edges
        .iter()
        .map(|&eid| {
            let edge = graph.edge(eid);
            (graph.vertex(edge.from).name.clone(), graph.vertex(edge.to).name.clone())
        })
        .collect();
    let per_vertex_delay = path_vertices
        .iter()
        .map(|&v| graph.vertex(v).delay_ns)
        .collect();

    PathReport {
        vertices,
        edges,
        per_vertex_delay,
        total_delay: forward.at(sink),
        endpoint_slack: slack.slack(sink),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backward::{compute_slack, run_backward};
    use crate::forward::run_forward;
    use crate::graph::{GateTag, Role};
    use crate::topo::topo_order;
    use slacktime_config::TimingConfig;
    use slacktime_source::FileId;

    fn default_timing() -> TimingConfig {
        TimingConfig {
            tclk_ns: 2.0,
            setup_ns: 0.05,
            clock_to_q_ns: 0.08,
        }
    }

    #[test]
    fn no_endpoints_is_error() {
        let g = TimingGraph::new();
        let forward = run_forward(&g, &[], &default_timing());
        let backward = run_backward(&g, &[], &default_timing());
        let slack = compute_slack(&g, &forward, &backward, &[]);
        let sink = DiagnosticSink::new();
        let err = find_k_critical_paths(
            &g,
            &[],
            &forward,
            &slack,
            &KPathConfig::default(),
            &sink,
            FileId::from_raw(0),
        )
        .unwrap_err();
        assert!(matches!(err, StaError::NoEndpoints));
    }

    #[test]
    fn diamond_fanout_yields_two_edge_disjoint_paths() {
        let mut g = TimingGraph::new();
        let a = g.add_vertex("a".into(), Role::PrimaryInput, GateTag::Primary, 0.0);
        let p = g.add_vertex("p".into(), Role::InternalCombinational, GateTag::Not, 0.01);
        let q = g.add_vertex("q".into(), Role::InternalCombinational, GateTag::Not, 0.01);
        let y = g.add_vertex("y".into(), Role::PrimaryOutput, GateTag::And, 0.02);
        g.add_edge(a, p);
        g.add_edge(a, q);
        g.add_edge(p, y);
        g.add_edge(q, y);

        let order = topo_order(&g).unwrap();
        let timing = default_timing();
        let forward = run_forward(&g, &order, &timing);
        let backward = run_backward(&g, &order, &timing);
        let slack = compute_slack(&g, &forward, &backward, &[y]);

        let config = KPathConfig {
            k: 2,
            violating_only: false,
        };
        let sink = DiagnosticSink::new();
        let paths =
            find_k_critical_paths(&g, &[y], &forward, &slack, &config, &sink, FileId::from_raw(0))
                .unwrap();

        assert_eq!(paths.len(), 2);
        let mut used_edges: HashSet<(String, String)> = HashSet::new();
        for path in &paths {
            for edge in &path.edges {
                assert!(used_edges.insert(edge.clone()), "edge reused across paths: {edge:?}");
            }
        }
        // Slacks non-decreasing (worst first); here they're equal.
        assert!(paths[0].endpoint_slack <= paths[1].endpoint_slack);
    }

    #[test]
    fn k_larger_than_reachable_endpoints_returns_fewer() {
        let mut g = TimingGraph::new();
        let a = g.add_vertex("a".into(), Role::PrimaryInput, GateTag::Primary, 0.0);
        let y = g.add_vertex("y".into(), Role::PrimaryOutput, GateTag::Buf, 0.01);
        g.add_edge(a, y);
        let order = topo_order(&g).unwrap();
        let timing = default_timing();
        let forward = run_forward(&g, &order, &timing);
        let backward = run_backward(&g, &order, &timing);
        let slack = compute_slack(&g, &forward, &backward, &[y]);

        let config = KPathConfig {
            k: 5,
            violating_only: false,
        };
        let sink = DiagnosticSink::new();
        let paths =
            find_k_critical_paths(&g, &[y], &forward, &slack, &config, &sink, FileId::from_raw(0))
                .unwrap();
        assert_eq!(paths.len(), 1);
    }

    #[test]
    fn violating_only_stops_after_first_nonnegative_slack_path() {
        let mut g = TimingGraph::new();
        let a = g.add_vertex("a".into(), Role::PrimaryInput, GateTag::Primary, 0.0);
        let b = g.add_vertex("b".into(), Role::PrimaryInput, GateTag::Primary, 0.0);
        let y1 = g.add_vertex("y1".into(), Role::PrimaryOutput, GateTag::Buf, 0.01);
        let y2 = g.add_vertex("y2".into(), Role::PrimaryOutput, GateTag::Buf, 0.01);
        g.add_edge(a, y1);
        g.add_edge(b, y2);
        let order = topo_order(&g).unwrap();
        let timing = default_timing();
        let forward = run_forward(&g, &order, &timing);
        let backward = run_backward(&g, &order, &timing);
        let slack = compute_slack(&g, &forward, &backward, &[y1, y2]);

        let config = KPathConfig {
            k: 2,
            violating_only: true,
        };
        let sink = DiagnosticSink::new();
        let paths = find_k_critical_paths(
            &g,
            &[y1, y2],
            &forward,
            &slack,
            &config,
            &sink,
            FileId::from_raw(0),
        )
        .unwrap();
        // Both endpoints have identical non-negative slack; only the first is returned.
        assert_eq!(paths.len(), 1);
    }

    #[test]
    fn path_slacks_are_non_decreasing() {
        let mut g = TimingGraph::new();
        let a = g.add_vertex("a".into(), Role::PrimaryInput, GateTag::Primary, 0.0);
        let y_bad = g.add_vertex("y_bad".into(), Role::PrimaryOutput, GateTag::Or, 0.04);
        let y_good = g.add_vertex("y_good".into(), Role::PrimaryOutput, GateTag::Buf, 0.01);
        g.add_edge(a, y_bad);
        g.add_edge(a, y_good);
        let order = topo_order(&g).unwrap();
        let timing = default_timing();
        let forward = run_forward(&g, &order, &timing);
        let backward = run_backward(&g, &order, &timing);
        let slack = compute_slack(&g, &forward, &backward, &[y_bad, y_good]);

        let config = KPathConfig {
            k: 2,
            violating_only: false,
        };
        let sink = DiagnosticSink::new();
        let paths = find_k_critical_paths(
            &g,
            &[y_bad, y_good],
            &forward,
            &slack,
            &config,
            &sink,
            FileId::from_raw(0),
        )
        .unwrap();
        assert_eq!(paths.len(), 2);
        assert!(paths[0].endpoint_slack <= paths[1].endpoint_slack);
        assert_eq!(paths[0].vertices.last().unwrap(), "y_bad");
    }
}
