//! Series composition of networks.

use crate::{
    bijections::debug_check_map,
    error::Result,
    halfedge::{HalfEdgeGraph, Network},
};

/// Merges `second` into `first` in series: the infinity pole of `first` is
/// identified with the zero pole of `second`, and the composed network is
/// re-rooted on a fresh edge spanning its new outer poles.
///
/// The identified middle vertex keeps the vertex id of `first`'s infinity
/// pole and becomes a regular labeled vertex of the result, so
/// `l_size = l₁ + l₂ + 1` and `u_size = u₁ + u₂ + 1` (the fresh root edge).
///
/// # Errors
/// Propagates arena failures; the composed map is rechecked in debug builds.
pub fn merge_in_series(first: Network, second: Network) -> Result<Network> {
    let zero_first = first.zero_pole();
    let inf_first = first.inf_pole();
    let (zero_second, inf_second) = (second.zero_pole(), second.inf_pole());

    let (mut arena, _) = first.into_graph().into_parts();
    let offset = arena.absorb(second.into_graph().into_parts().0);
    let zero_second = offset.map(zero_second);
    let inf_second = offset.map(inf_second);

    // Fresh root pair: one half at the composed zero pole (the zero pole of
    // `first`), the other at the composed infinity pole (the infinity pole
    // of `second`). The root pair joins the rotations but stays outside the
    // pole identification below.
    let new_root = arena.create(arena.node_nr(zero_first), arena.color(zero_first));
    arena.insert_after(zero_first, new_root)?;
    let new_root_opposite = arena.create(arena.node_nr(inf_second), arena.color(inf_second));
    arena.insert_after(inf_second, new_root_opposite)?;
    arena.pair(new_root, new_root_opposite)?;

    // Identify the middle vertex: splice the rotation at `first`'s infinity
    // pole together with the rotation at `second`'s zero pole, then relabel
    // the merged orbit to the surviving vertex id.
    let middle = arena.node_nr(inf_first);
    arena.merge_orbits(inf_first, zero_second);
    arena.relabel_component(inf_first, middle);

    debug_check_map(&arena, new_root)?;
    Ok(Network::new(HalfEdgeGraph::new(arena, new_root))?)
}

#[cfg(test)]
mod tests {
    use super::merge_in_series;
    use crate::{
        halfedge::MapChecker,
        sampler::SampleContext,
        test_utils::{degree_multiset, link_network, path_network},
    };

    #[test]
    fn series_of_two_links_is_a_two_edge_path() {
        let mut ctx = SampleContext::new(0);
        let merged = merge_in_series(link_network(&mut ctx), link_network(&mut ctx))
            .expect("series merge succeeds");
        // Two link edges plus the fresh root edge.
        assert_eq!(merged.u_size(), 3);
        // The identified middle vertex is the only inner vertex.
        assert_eq!(merged.l_size(), 1);
        assert_eq!(merged.graph().vertex_count(), 3);
        MapChecker::new(merged.graph().arena(), merged.zero_pole())
            .check_all()
            .expect("merged map is consistent");
    }

    #[test]
    fn series_u_size_is_the_sum_of_inputs_plus_the_root_edge() {
        let mut ctx = SampleContext::new(1);
        let left = path_network(&mut ctx, 2);
        let right = path_network(&mut ctx, 2);
        let (u_left, u_right) = (left.u_size(), right.u_size());
        let (l_left, l_right) = (left.l_size(), right.l_size());

        let merged = merge_in_series(left, right).expect("series merge succeeds");
        assert_eq!(merged.u_size(), u_left + u_right + 1);
        assert_eq!(merged.l_size(), l_left + l_right + 1);
    }

    #[test]
    fn series_is_associative_up_to_sizes_and_degrees() {
        let mut ctx = SampleContext::new(2);
        let nets = |ctx: &mut SampleContext| {
            (
                path_network(ctx, 1),
                path_network(ctx, 2),
                path_network(ctx, 3),
            )
        };

        let (a, b, c) = nets(&mut ctx);
        let left_first = merge_in_series(merge_in_series(a, b).expect("a·b"), c).expect("(a·b)·c");
        let (a, b, c) = nets(&mut ctx);
        let right_first = merge_in_series(a, merge_in_series(b, c).expect("b·c")).expect("a·(b·c)");

        assert_eq!(left_first.u_size(), right_first.u_size());
        assert_eq!(left_first.l_size(), right_first.l_size());
        assert_eq!(
            degree_multiset(&left_first),
            degree_multiset(&right_first)
        );
    }
}
