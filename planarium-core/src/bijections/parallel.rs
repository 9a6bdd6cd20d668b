//! Parallel composition of networks.

use crate::{
    bijections::debug_check_map,
    error::Result,
    halfedge::{HalfEdgeGraph, Network},
};

/// Merges `second` into `first` in parallel: both pole pairs are identified,
/// the pole degrees add up, and the composed network is re-rooted on a fresh
/// edge between the merged poles.
///
/// No vertices survive the identification beyond the poles themselves, so
/// `l_size = l₁ + l₂`; the fresh root edge makes `u_size = u₁ + u₂ + 1`.
///
/// # Errors
/// Propagates arena failures; the composed map is rechecked in debug builds.
pub fn merge_in_parallel(first: Network, second: Network) -> Result<Network> {
    let zero_first = first.zero_pole();
    let inf_first = first.inf_pole();
    let (zero_second, inf_second) = (second.zero_pole(), second.inf_pole());

    let (mut arena, _) = first.into_graph().into_parts();
    let offset = arena.absorb(second.into_graph().into_parts().0);
    let zero_second = offset.map(zero_second);
    let inf_second = offset.map(inf_second);

    // Identify the poles pairwise and relabel the merged rotations to the
    // surviving vertex ids of `first`.
    let zero_node = arena.node_nr(zero_first);
    arena.merge_orbits(zero_first, zero_second);
    arena.relabel_component(zero_first, zero_node);
    let inf_node = arena.node_nr(inf_first);
    arena.merge_orbits(inf_first, inf_second);
    arena.relabel_component(inf_first, inf_node);

    // Re-root on a fresh edge between the merged poles.
    let new_root = arena.create(zero_node, arena.color(zero_first));
    arena.insert_after(zero_first, new_root)?;
    let new_root_opposite = arena.create(inf_node, arena.color(inf_first));
    arena.insert_after(inf_first, new_root_opposite)?;
    arena.pair(new_root, new_root_opposite)?;

    debug_check_map(&arena, new_root)?;
    Ok(Network::new(HalfEdgeGraph::new(arena, new_root))?)
}
