//! Timing graph data structures for static timing analysis.
//!
//! The [`TimingGraph`] is a directed graph of signal vertices and the
//! logical-causality edges between them. It is built once by the netlist
//! loader and is read-only thereafter: the forward pass, backward pass, and
//! K-path extractor all take a `&TimingGraph` and return their own arrival
//! time / required time / slack arrays rather than mutating the graph.

use crate::ids::{EdgeId, VertexId};
use serde::{Deserialize, Serialize};

/// The role a vertex plays in timing analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// A module input port. A startpoint with AT boundary condition zero.
    PrimaryInput,
    /// A module output port. An endpoint with RT boundary condition `Tclk - setup`.
    PrimaryOutput,
    /// The Q-side output of a flip-flop. A startpoint with AT boundary
    /// condition `clock_to_q`.
    FlipFlopQ,
    /// The D-side input of a flip-flop. An endpoint with RT boundary
    /// condition `Tclk - setup`.
    FlipFlopD,
    /// An internal combinational signal: neither a startpoint nor an
    /// endpoint, propagated by the forward and backward recurrences.
    InternalCombinational,
}

impl Role {
    /// Whether a vertex with this role is a startpoint (AT boundary
    /// condition rather than the forward recurrence).
    pub fn is_startpoint(self) -> bool {
        matches!(self, Role::PrimaryInput | Role::FlipFlopQ)
    }

    /// Whether a vertex with this role is an endpoint (RT boundary
    /// condition rather than the backward recurrence).
    pub fn is_endpoint(self) -> bool {
        matches!(self, Role::PrimaryOutput | Role::FlipFlopD)
    }
}

/// The gate-type tag attributed to a vertex, selecting its delay from the
/// gate delay table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GateTag {
    /// Inverter, `~x`.
    Not,
    /// Two-input AND, `a & b`.
    And,
    /// Two-input OR, `a | b`.
    Or,
    /// Two-input NAND, De Morgan form `~a | ~b`.
    Nand,
    /// Two-input NOR, De Morgan form `~a & ~b`.
    Nor,
    /// Two-input XOR, `a ^ b`.
    Xor,
    /// Two-input XNOR, `~(a ^ b)`.
    Xnor,
    /// Buffer: a named primitive instance that passes its input through.
    Buf,
    /// A continuous assignment of a bare identifier, `lhs = x;`.
    Assign,
    /// The select-inverter stage of a decomposed two-input mux.
    Mux2Not,
    /// The AND stage of a decomposed two-input mux.
    Mux2And,
    /// The OR stage of a decomposed two-input mux.
    Mux2Or,
    /// A flip-flop D-side or Q-side vertex.
    Dff,
    /// A primary input/output port, or a constant source vertex.
    Primary,
    /// An instance of an unrecognized primitive; tolerated with a warning.
    Unknown,
}

impl GateTag {
    /// The tag name as it appears in the gate delay table (`slacktime_config`).
    pub fn as_str(self) -> &'static str {
        match self {
            GateTag::Not => "NOT",
            GateTag::And => "AND",
            GateTag::Or => "OR",
            GateTag::Nand => "NAND",
            GateTag::Nor => "NOR",
            GateTag::Xor => "XOR",
            GateTag::Xnor => "XNOR",
            GateTag::Buf => "BUF",
            GateTag::Assign => "ASSIGN",
            GateTag::Mux2Not => "MUX2_NOT",
            GateTag::Mux2And => "MUX2_AND",
            GateTag::Mux2Or => "MUX2_OR",
            GateTag::Dff => "DFF",
            GateTag::Primary => "PRIMARY",
            GateTag::Unknown => "UNKNOWN",
        }
    }
}

/// A signal vertex in the timing graph.
///
/// Mirrors §3 of the design: a unique name, a role, a gate-type tag, and the
/// resolved delay for that tag. AT/RT/slack are *not* stored here — they
/// live in the parallel arrays returned by [`crate::forward::run_forward`]
/// and [`crate::backward::run_backward`], so the graph itself stays
/// immutable across repeated STA invocations.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vertex {
    /// The unique ID of this vertex (its index in [`TimingGraph::vertices`]).
    pub id: VertexId,
    /// The signal name, after identifier normalization.
    pub name: String,
    /// The role this vertex plays in timing analysis.
    pub role: Role,
    /// The gate-type tag used to look up this vertex's delay.
    pub gate: GateTag,
    /// The resolved propagation delay, in nanoseconds, attributed to this
    /// vertex (the destination-attributed gate delay model).
    pub delay_ns: f64,
}

/// A directed, unweighted edge in the timing graph: `from` is a direct
/// fan-in of `to`. Propagation delay is attributed to the destination
/// vertex, not the edge.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Edge {
    /// The unique ID of this edge (its index in [`TimingGraph::edges`]).
    pub id: EdgeId,
    /// The fan-in vertex.
    pub from: VertexId,
    /// The fan-out vertex.
    pub to: VertexId,
}

/// The timing graph `G = (V, E)`.
///
/// Built once by the loader and read-only afterward. Adjacency (outgoing and
/// incoming edge ids per vertex) is precomputed at construction so lookups
/// during the three passes and the K-path extractor are O(1) rather than a
/// linear scan over all edges.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimingGraph {
    /// All vertices, in insertion order. Insertion order is the single
    /// source of truth for deterministic tie-breaking throughout the core.
    pub vertices: Vec<Vertex>,
    /// All edges, in insertion order.
    pub edges: Vec<Edge>,
    out_edges: Vec<Vec<EdgeId>>,
    in_edges: Vec<Vec<EdgeId>>,
}

impl TimingGraph {
    /// Creates an empty timing graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a vertex and returns its ID. Adjacency tables are extended to
    /// make room; the vertex starts with no edges.
    pub fn add_vertex(&mut self, name: String, role: Role, gate: GateTag, delay_ns: f64) -> VertexId {
        let id = VertexId::from_raw(self.vertices.len() as u32);
        self.vertices.push(Vertex {
            id,
            name,
            role,
            gate,
            delay_ns,
        });
        self.out_edges.push(Vec::new());
        self.in_edges.push(Vec::new());
        id
    }

    /// Adds a directed edge `from -> to` and returns its ID.
    ///
    /// Does not itself deduplicate multi-edges between the same pair; the
    /// loader is responsible for collapsing those before calling this (see
    /// §3: "Multi-edges between the same pair collapse to one").
    pub fn add_edge(&mut self, from: VertexId, to: VertexId) -> EdgeId {
        let id = EdgeId::from_raw(self.edges.len() as u32);
        self.edges.push(Edge { id, from, to });
        self.out_edges[from.as_index()].push(id);
        self.in_edges[to.as_index()].push(id);
        id
    }

    /// Returns the vertex with the given ID.
    pub fn vertex(&self, id: VertexId) -> &Vertex {
        &self.vertices[id.as_index()]
    }

    /// Returns the edge with the given ID.
    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id.as_index()]
    }

    /// Returns the total number of vertices in the graph.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Returns the total number of edges in the graph.
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Returns the edge ids outgoing from `vertex`, in insertion order.
    pub fn outgoing_edges(&self, vertex: VertexId) -> &[EdgeId] {
        &self.out_edges[vertex.as_index()]
    }

    /// Returns the edge ids incoming to `vertex`, in insertion order.
    pub fn incoming_edges(&self, vertex: VertexId) -> &[EdgeId] {
        &self.in_edges[vertex.as_index()]
    }

    /// Returns the in-degree of a vertex: the number of distinct incoming
    /// edges, used by the topological orderer's Kahn queue.
    pub fn in_degree(&self, vertex: VertexId) -> usize {
        self.in_edges[vertex.as_index()].len()
    }

    /// Returns an iterator over all vertex ids, in insertion order.
    pub fn vertex_ids(&self) -> impl Iterator<Item = VertexId> + '_ {
        (0..self.vertices.len() as u32).map(VertexId::from_raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_graph() {
        let g = TimingGraph::new();
        assert_eq!(g.vertex_count(), 0);
        assert_eq!(g.edge_count(), 0);
    }

    #[test]
    fn add_vertices() {
        let mut g = TimingGraph::new();
        let a = g.add_vertex("a".into(), Role::PrimaryInput, GateTag::Primary, 0.0);
        let y = g.add_vertex("y".into(), Role::InternalCombinational, GateTag::And, 0.02);
        assert_eq!(a.as_raw(), 0);
        assert_eq!(y.as_raw(), 1);
        assert_eq!(g.vertex_count(), 2);
        assert_eq!(g.vertex(a).name, "a");
        assert_eq!(g.vertex(y).gate, GateTag::And);
    }

    #[test]
    fn add_edges_and_adjacency() {
        let mut g = TimingGraph::new();
        let a = g.add_vertex("a".into(), Role::PrimaryInput, GateTag::Primary, 0.0);
        let b = g.add_vertex("b".into(), Role::PrimaryInput, GateTag::Primary, 0.0);
        let y = g.add_vertex("y".into(), Role::PrimaryOutput, GateTag::And, 0.02);
        let e1 = g.add_edge(a, y);
        let e2 = g.add_edge(b, y);
        assert_eq!(g.edge_count(), 2);
        assert_eq!(g.outgoing_edges(a), &[e1]);
        assert_eq!(g.outgoing_edges(b), &[e2]);
        assert_eq!(g.incoming_edges(y), &[e1, e2]);
        assert_eq!(g.in_degree(y), 2);
        assert_eq!(g.in_degree(a), 0);
    }

    #[test]
    fn vertex_ids_preserve_insertion_order() {
        let mut g = TimingGraph::new();
        g.add_vertex("a".into(), Role::PrimaryInput, GateTag::Primary, 0.0);
        g.add_vertex("b".into(), Role::PrimaryInput, GateTag::Primary, 0.0);
        g.add_vertex("c".into(), Role::PrimaryOutput, GateTag::Buf, 0.01);
        let ids: Vec<u32> = g.vertex_ids().map(|id| id.as_raw()).collect();
        assert_eq!(ids, vec![0, 1, 2]);
    }

    #[test]
    fn role_startpoint_and_endpoint() {
        assert!(Role::PrimaryInput.is_startpoint());
        assert!(Role::FlipFlopQ.is_startpoint());
        assert!(!Role::PrimaryOutput.is_startpoint());
        assert!(Role::PrimaryOutput.is_endpoint());
        assert!(Role::FlipFlopD.is_endpoint());
        assert!(!Role::InternalCombinational.is_startpoint());
        assert!(!Role::InternalCombinational.is_endpoint());
    }

    #[test]
    fn gate_tag_as_str_matches_config_table() {
        assert_eq!(GateTag::And.as_str(), "AND");
        assert_eq!(GateTag::Mux2And.as_str(), "MUX2_AND");
        assert_eq!(GateTag::Dff.as_str(), "DFF");
    }

    #[test]
    fn graph_serde_roundtrip() {
        let mut g = TimingGraph::new();
        let a = g.add_vertex("a".into(), Role::PrimaryInput, GateTag::Primary, 0.0);
        let b = g.add_vertex("b".into(), Role::PrimaryOutput, GateTag::Buf, 0.01);
        g.add_edge(a, b);

        let json = serde_json::to_string(&g).unwrap();
        let restored: TimingGraph = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.vertex_count(), 2);
        assert_eq!(restored.edge_count(), 1);
        assert_eq!(restored.vertices[0].name, "a");
    }

    #[test]
    fn diamond_graph_adjacency() {
        let mut g = TimingGraph::new();
        let a = g.add_vertex("a".into(), Role::PrimaryInput, GateTag::Primary, 0.0);
        let p = g.add_vertex("p".into(), Role::InternalCombinational, GateTag::Not, 0.01);
        let q = g.add_vertex("q".into(), Role::InternalCombinational, GateTag::Not, 0.01);
        let y = g.add_vertex("y".into(), Role::PrimaryOutput, GateTag::And, 0.02);
        g.add_edge(a, p);
        g.add_edge(a, q);
        g.add_edge(p, y);
        g.add_edge(q, y);
        assert_eq!(g.outgoing_edges(a).len(), 2);
        assert_eq!(g.incoming_edges(y).len(), 2);
    }
}
