//! Static timing analysis for gate-level digital circuit netlists.
//!
//! This crate turns a gate-level netlist into a [`TimingGraph`], runs the
//! forward (arrival time) and backward (required time) passes over it, and
//! extracts the K worst edge-disjoint critical paths. It computes slack at
//! every endpoint and the aggregate WNS/TNS metrics for a timing-closure
//! report.
//!
//! # Usage
//!
//! ```ignore
//! use slacktime_sta::{build_graph, run_sta, find_k_critical_paths};
//! use slacktime_config::StaConfig;
//! use slacktime_diagnostics::DiagnosticSink;
//!
//! let sink = DiagnosticSink::new();
//! let netlist = build_graph(source, file_id, &sink)?;
//! let config = StaConfig::default();
//! let timing = run_sta(&netlist, &config.timing);
//! println!("WNS: {:.3} ns, TNS: {:.3} ns", timing.slack.wns, timing.slack.tns);
//!
//! let paths = find_k_critical_paths(
//!     &netlist.graph,
//!     &netlist.endpoints,
//!     &timing.forward,
//!     &timing.slack,
//!     &config.kpath,
//!     &sink,
//!     file_id,
//! )?;
//! ```
//!
//! # Architecture
//!
//! - [`lexer`] / [`expr`] — netlist tokenizer and boolean expression parser
//! - [`loader`] — netlist-to-graph translator (declare-then-wire, two passes)
//! - [`graph`] — the timing graph itself: vertices, edges, adjacency
//! - [`topo`] — Kahn's-algorithm topological ordering
//! - [`forward`] / [`backward`] — arrival time / required time / slack
//! - [`kpath`] — K-worst edge-disjoint critical path extraction
//! - [`error`] — fatal error types

#![warn(missing_docs)]

pub mod backward;
pub mod error;
pub mod expr;
pub mod forward;
pub mod graph;
pub mod ids;
pub mod kpath;
pub mod lexer;
pub mod loader;
pub mod topo;

pub use backward::{compute_slack, run_backward, BackwardResult, SlackResult};
pub use error::StaError;
pub use forward::{run_forward, ForwardResult};
pub use graph::{Edge, GateTag, Role, TimingGraph, Vertex};
pub use ids::{EdgeId, VertexId};
pub use kpath::{find_k_critical_paths, PathReport};
pub use loader::{build_graph, LoadedNetlist};
pub use topo::{topo_order, topo_waves};

use slacktime_config::TimingConfig;

/// The combined result of a full forward + backward + slack run: everything
/// needed to build a timing report or feed the K-path extractor, without
/// re-running the topological sort for each stage.
#[derive(Debug, Clone)]
pub struct TimingResult {
    /// The topological order the forward and backward passes walked.
    pub order: Vec<VertexId>,
    /// Arrival times and critical-predecessor edges.
    pub forward: ForwardResult,
    /// Required times.
    pub backward: BackwardResult,
    /// Per-vertex slack plus WNS/TNS.
    pub slack: SlackResult,
}

/// Runs the full timing analysis pipeline over an already-loaded netlist:
/// topological sort, forward pass, backward pass, slack computation.
///
/// Returns [`StaError::CycleInCombinational`] if `netlist.graph` is not
/// acyclic — this should not happen for a graph [`build_graph`] produced,
/// since it runs the same check at load time, but a graph assembled by
/// hand (as the test suites do) is not guaranteed to be.
pub fn run_sta(netlist: &LoadedNetlist, timing: &TimingConfig) -> Result<TimingResult, StaError> {
    let order = topo_order(&netlist.graph)?;
    let forward = run_forward(&netlist.graph, &order, timing);
    let backward = run_backward(&netlist.graph, &order, timing);
    let slack = compute_slack(&netlist.graph, &forward, &backward, &netlist.endpoints);
    Ok(TimingResult { order, forward, backward, slack })
}

#[cfg(test)]
mod tests {
    use super::*;
    use slacktime_config::{KPathConfig, StaConfig};
    use slacktime_diagnostics::DiagnosticSink;
    use slacktime_source::FileId;

    fn load(src: &str) -> LoadedNetlist {
        let sink = DiagnosticSink::new();
        build_graph(src, FileId::from_raw(0), &sink).unwrap()
    }

    #[test]
    fn single_gate_scenario_end_to_end() {
        let netlist = load(
            r#"
            module top(a, b, y);
            input a, b;
            output y;
            assign y = a & b;
            endmodule
            "#,
        );
        let config = StaConfig::default();
        let result = run_sta(&netlist, &config.timing).unwrap();
        let y = netlist.endpoints[0];
        assert!((result.forward.at(y) - 0.02).abs() < 1e-9);
        assert!((result.slack.wns - 1.93).abs() < 1e-9);
        assert_eq!(result.slack.tns, 0.0);
    }

    #[test]
    fn chain_scenario_end_to_end() {
        let netlist = load(
            r#"
            module top(a, b, c, y);
            input a, b, c;
            output y;
            assign n1 = ~a;
            assign n2 = n1 & b;
            assign y = n2 | c;
            endmodule
            "#,
        );
        let config = StaConfig::default();
        let result = run_sta(&netlist, &config.timing).unwrap();
        let y = netlist.endpoints[0];
        assert!((result.forward.at(y) - 0.07).abs() < 1e-9);
        assert!((result.slack.wns - 1.88).abs() < 1e-9);
    }

    #[test]
    fn dff_chain_scenario_end_to_end() {
        let netlist = load(
            r#"
            module top(d, clk, q2);
            input d, clk;
            output q2;
            DFF DFF1 ( .D(d), .Q(q1), .CLK(clk) );
            assign n = ~q1;
            DFF DFF2 ( .D(n), .Q(q2), .CLK(clk) );
            endmodule
            "#,
        );
        let config = StaConfig::default();
        let result = run_sta(&netlist, &config.timing).unwrap();
        let dff1_q = netlist
            .graph
            .vertex_ids()
            .find(|&id| netlist.graph.vertex(id).name == "DFF1.Q")
            .unwrap();
        let dff2_d = netlist
            .graph
            .vertex_ids()
            .find(|&id| netlist.graph.vertex(id).name == "DFF2.D")
            .unwrap();
        assert!((result.forward.at(dff1_q) - 0.08).abs() < 1e-9);
        assert!((result.forward.at(dff2_d) - 0.09).abs() < 1e-9);
        assert!((result.slack.wns - 1.86).abs() < 1e-9);
    }

    #[test]
    fn diamond_fanout_scenario_yields_k_edge_disjoint_paths() {
        let netlist = load(
            r#"
            module top(a, y);
            input a;
            output y;
            NOT p ( .A(a), .Y(p_net) );
            NOT q ( .A(a), .Y(q_net) );
            assign y = p_net & q_net;
            endmodule
            "#,
        );
        let config = StaConfig::default();
        let result = run_sta(&netlist, &config.timing).unwrap();
        let sink = DiagnosticSink::new();
        let kconfig = KPathConfig { k: 2, violating_only: false };
        let paths = find_k_critical_paths(
            &netlist.graph,
            &netlist.endpoints,
            &result.forward,
            &result.slack,
            &kconfig,
            &sink,
            FileId::from_raw(0),
        )
        .unwrap();
        assert_eq!(paths.len(), 2);
        let mut seen = std::collections::HashSet::new();
        for path in &paths {
            for edge in &path.edges {
                assert!(seen.insert(edge.clone()));
            }
        }
    }

    #[test]
    fn combinational_cycle_scenario_is_rejected_at_load() {
        let sink = DiagnosticSink::new();
        let err = build_graph(
            r#"
            module top(a, b, y);
            input a, b;
            output y;
            assign n1 = n2 & a;
            assign n2 = n1 | b;
            assign y = n2;
            endmodule
            "#,
            FileId::from_raw(0),
            &sink,
        )
        .unwrap_err();
        assert!(matches!(err, StaError::CycleInCombinational(_)));
    }

    #[test]
    fn tight_timing_scenario_end_to_end() {
        let netlist = load(
            r#"
            module top(a, b, c, y);
            input a, b, c;
            output y;
            assign n1 = ~a;
            assign n2 = n1 & b;
            assign y = n2 | c;
            endmodule
            "#,
        );
        let timing = TimingConfig { tclk_ns: 0.05, setup_ns: 0.05, clock_to_q_ns: 0.08 };
        let result = run_sta(&netlist, &timing).unwrap();
        assert!((result.slack.wns - (-0.07)).abs() < 1e-9);
        assert!((result.slack.tns - (-0.07)).abs() < 1e-9);
    }
}
