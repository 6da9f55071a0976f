//! Topological ordering of the timing graph via Kahn's algorithm.

use crate::error::StaError;
use crate::graph::TimingGraph;
use crate::ids::VertexId;
use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// Computes a single deterministic topological order over all vertices.
///
/// Ties among simultaneously-available vertices are broken by ascending
/// vertex id, i.e. by insertion order at load time (§9: "insertion order...
/// is the single source of truth... do not re-derive it from hash
/// iteration"). The forward pass walks this order directly; the backward
/// pass walks its exact reverse.
///
/// Returns [`StaError::CycleInCombinational`] naming one vertex still stuck
/// with nonzero in-degree if the graph is not acyclic.
pub fn topo_order(graph: &TimingGraph) -> Result<Vec<VertexId>, StaError> {
    let mut in_degree: Vec<u32> = graph
        .vertex_ids()
        .map(|v| graph.in_degree(v) as u32)
        .collect();

    let mut frontier: BinaryHeap<Reverse<u32>> = BinaryHeap::new();
    for v in graph.vertex_ids() {
        if in_degree[v.as_index()] == 0 {
            frontier.push(Reverse(v.as_raw()));
        }
    }

    let mut order = Vec::with_capacity(graph.vertex_count());
    while let Some(Reverse(raw)) = frontier.pop() {
        let v = VertexId::from_raw(raw);
        order.push(v);
        for &edge_id in graph.outgoing_edges(v) {
            let succ = graph.edge(edge_id).to;
            let idx = succ.as_index();
            in_degree[idx] -= 1;
            if in_degree[idx] == 0 {
                frontier.push(Reverse(succ.as_raw()));
            }
        }
    }

    if order.len() != graph.vertex_count() {
        let witness = in_degree
            .iter()
            .position(|&d| d != 0)
            .map(|idx| graph.vertex(VertexId::from_raw(idx as u32)).name.clone())
            .unwrap_or_else(|| "<unknown>".to_string());
        return Err(StaError::CycleInCombinational(witness));
    }

    Ok(order)
}

/// Computes the topological order grouped into Kahn "waves": each wave is
/// the set of vertices that reached in-degree zero simultaneously, in the
/// same relative order as [`topo_order`]. Used by a visualization
/// collaborator; the three timing passes do not depend on wave granularity.
pub fn topo_waves(graph: &TimingGraph) -> Result<Vec<Vec<VertexId>>, StaError> {
    let mut in_degree: Vec<u32> = graph
        .vertex_ids()
        .map(|v| graph.in_degree(v) as u32)
        .collect();

    let mut current: Vec<u32> = (0..graph.vertex_count() as u32)
        .filter(|&raw| in_degree[raw as usize] == 0)
        .collect();
    current.sort_unstable();

    let mut waves = Vec::new();
    let mut visited = 0usize;
    while !current.is_empty() {
        let mut next = Vec::new();
        for &raw in &current {
            let v = VertexId::from_raw(raw);
            for &edge_id in graph.outgoing_edges(v) {
                let succ = graph.edge(edge_id).to;
                let idx = succ.as_index();
                in_degree[idx] -= 1;
                if in_degree[idx] == 0 {
                    next.push(succ.as_raw());
                }
            }
        }
        visited += current.len();
        waves.push(current.iter().map(|&raw| VertexId::from_raw(raw)).collect());
        next.sort_unstable();
        current = next;
    }

    if visited != graph.vertex_count() {
        let witness = in_degree
            .iter()
            .position(|&d| d != 0)
            .map(|idx| graph.vertex(VertexId::from_raw(idx as u32)).name.clone())
            .unwrap_or_else(|| "<unknown>".to_string());
        return Err(StaError::CycleInCombinational(witness));
    }

    Ok(waves)
}
