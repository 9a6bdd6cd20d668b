//! Edge substitution: replacing a u-atom of a graph by a network.

use crate::{
    bijections::debug_check_map,
    error::Result,
    halfedge::{HalfEdgeArena, HalfEdgeGraph, HalfEdgeId, Network, TraversalFilter},
};

/// Substitutes the edge carried by `edge` (and its opposite) with `network`.
///
/// The network's pole rotations are spliced into the graph at the former
/// endpoints of the edge, the poles inherit the endpoint vertex ids, and the
/// substituted edge is removed. The network's root edge becomes a regular
/// edge of the graph, so substituting the single-edge link network leaves
/// every count unchanged.
///
/// The graph's own root edge must not be substituted; callers exclude it.
///
/// # Errors
/// Returns [`crate::SamplerError::HalfEdge`] when `edge` is unpaired;
/// propagates arena failures.
pub fn substitute_edge_by_network(
    graph: &mut HalfEdgeGraph,
    edge: HalfEdgeId,
    network: Network,
) -> Result<()> {
    let root = graph.root();
    let arena = graph.arena_mut();
    debug_assert!(
        edge != root && arena.opposite(root) != Some(edge),
        "the root edge is never substituted"
    );

    let (zero, inf) = (network.zero_pole(), network.inf_pole());
    let opposite = arena.unpair(edge)?;
    let near_node = arena.node_nr(edge);
    let far_node = arena.node_nr(opposite);

    let offset = arena.absorb(network.into_graph().into_parts().0);
    let zero = offset.map(zero);
    let inf = offset.map(inf);

    // The poles inherit the endpoint ids of the removed edge.
    arena.relabel_component(zero, near_node);
    arena.relabel_component(inf, far_node);

    // Splice each pole rotation into the matching endpoint rotation at the
    // angular position of the removed half-edge, then detach that half-edge.
    arena.merge_orbits(edge, zero);
    arena.detach_from_rotation(edge);
    arena.merge_orbits(opposite, inf);
    arena.detach_from_rotation(opposite);

    debug_check_map(graph.arena(), root)?;
    Ok(())
}

/// Substitutes every non-root, non-excepted edge of `graph` by a freshly
/// sampled network, one draw per edge. This is the u-substitution step of
/// the network decomposition.
///
/// `exceptions` may name either half of an edge to protect it. Returns the
/// number of substituted edges.
///
/// # Errors
/// Propagates sampling failures from `sample_network` and substitution
/// failures.
pub fn replace_u_atoms<F>(
    graph: &mut HalfEdgeGraph,
    exceptions: &[HalfEdgeId],
    mut sample_network: F,
) -> Result<usize>
where
    F: FnMut() -> Result<Network>,
{
    let root = graph.root();
    let excluded = |arena: &HalfEdgeArena, h: HalfEdgeId| {
        let opposite = arena.opposite(h);
        h == root
            || opposite == Some(root)
            || exceptions.contains(&h)
            || opposite.is_some_and(|o| exceptions.contains(&o))
    };

    let candidates: Vec<HalfEdgeId> = graph
        .arena()
        .all_half_edges(root, TraversalFilter::edges())
        .into_iter()
        .filter(|&h| !excluded(graph.arena(), h))
        .collect();

    for &edge in &candidates {
        let network = sample_network()?;
        substitute_edge_by_network(graph, edge, network)?;
    }
    Ok(candidates.len())
}
