//! Primal-map extraction from a two-colored rooted map.

use std::collections::{HashMap, HashSet};

use crate::{
    bijections::debug_check_map,
    error::{Result, SamplerError},
    halfedge::{Color, HalfEdgeArena, HalfEdgeGraph, HalfEdgeId, TraversalFilter, VertexId},
};

/// Extracts the sub-map induced on one color class of a two-colored rooted
/// map: the vertices of color `keep` together with every edge joining two of
/// them, each rotation keeping its cyclic order. This is how the
/// three-connected skeleton is read off a closed dissection.
///
/// The result is rooted at the image of the input root when that survives,
/// otherwise at an arbitrary surviving half-edge.
///
/// # Errors
/// Returns [`SamplerError::MalformedRule`] when no edge joins two vertices
/// of the kept color; propagates arena failures from the rebuild.
pub fn primal_map(graph: &HalfEdgeGraph, keep: Color) -> Result<HalfEdgeGraph> {
    let arena = graph.arena();
    let reachable = arena.all_half_edges(graph.root(), TraversalFilter::default());
    let kept: HashSet<HalfEdgeId> = reachable
        .iter()
        .copied()
        .filter(|&h| {
            arena.color(h) == keep
                && arena
                    .opposite(h)
                    .is_some_and(|o| arena.color(o) == keep)
        })
        .collect();
    if kept.is_empty() {
        return Err(SamplerError::MalformedRule {
            rule: "primal_map".to_owned(),
            detail: "no edge joins two vertices of the kept color".to_owned(),
        });
    }

    // Rebuild each surviving rotation in its original cyclic order.
    let mut primal = HalfEdgeArena::new();
    let mut image: HashMap<HalfEdgeId, HalfEdgeId> = HashMap::new();
    let mut fallback_root = None;
    let mut seen_vertices: HashSet<VertexId> = HashSet::new();
    for &h in &reachable {
        if !kept.contains(&h) || !seen_vertices.insert(arena.node_nr(h)) {
            continue;
        }
        let mut anchor: Option<HalfEdgeId> = None;
        for member in arena.walk_orbit(h).filter(|m| kept.contains(m)) {
            let fresh = primal.create(arena.node_nr(member), keep);
            if let Some(previous) = anchor {
                primal.insert_after(previous, fresh)?;
            }
            anchor = Some(fresh);
            fallback_root.get_or_insert(fresh);
            image.insert(member, fresh);
        }
    }

    // Re-pair surviving edges.
    for (&old, &new_h) in &image {
        let Some(opposite) = arena.opposite(old) else {
            continue;
        };
        let Some(&new_o) = image.get(&opposite) else {
            continue;
        };
        if !primal.is_paired(new_h) {
            primal.pair(new_h, new_o)?;
        }
    }

    let root = image
        .get(&graph.root())
        .copied()
        .or(fallback_root)
        .ok_or_else(|| SamplerError::MalformedRule {
            rule: "primal_map".to_owned(),
            detail: "no half-edge survived extraction".to_owned(),
        })?;
    debug_check_map(&primal, root)?;
    Ok(HalfEdgeGraph::new(primal, root))
}

#[cfg(test)]
mod tests {
    use super::primal_map;
    use crate::{
        halfedge::{Color, HalfEdgeArena, HalfEdgeGraph, MapChecker, TraversalFilter, VertexId},
        test_utils::vertex,
    };

    /// A square with one chord, alternating colors on the square and the
    /// chord joining the two black corners.
    fn chorded_square() -> HalfEdgeGraph {
        let mut arena = HalfEdgeArena::new();
        // Corners: a (black), b (white), c (black), d (white).
        let colors = [Color::Black, Color::White, Color::Black, Color::White];
        let mut firsts = Vec::new();
        let mut halves = Vec::new();
        for corner in 0..4 {
            // Two square half-edges per corner: towards next and previous.
            let forward = arena.create(vertex(corner as u64), colors[corner]);
            let backward = arena.create(vertex(corner as u64), colors[corner]);
            arena.insert_after(forward, backward).expect("fresh");
            firsts.push(forward);
            halves.push((forward, backward));
        }
        for corner in 0..4 {
            let (forward, _) = halves[corner];
            let (_, backward_next) = halves[(corner + 1) % 4];
            arena.pair(forward, backward_next).expect("unpaired");
        }
        // Chord between the black corners a and c.
        let chord_a = arena.create(vertex(0), Color::Black);
        arena.insert_after(firsts[0], chord_a).expect("fresh");
        let chord_c = arena.create(vertex(2), Color::Black);
        arena.insert_after(firsts[2], chord_c).expect("fresh");
        arena.pair(chord_a, chord_c).expect("unpaired");
        HalfEdgeGraph::new(arena, firsts[0])
    }

    #[test]
    fn primal_keeps_only_monochromatic_edges() {
        let graph = chorded_square();
        let primal = primal_map(&graph, Color::Black).expect("chord survives");
        assert_eq!(primal.vertex_count(), 2, "the two black corners");
        assert_eq!(primal.edge_count(), 1, "only the chord is monochromatic");
        MapChecker::new(primal.arena(), primal.root())
            .check_all()
            .expect("primal map is consistent");
        for h in primal
            .arena()
            .all_half_edges(primal.root(), TraversalFilter::default())
        {
            assert_eq!(primal.arena().color(h), Color::Black);
        }
    }

    #[test]
    fn primal_of_a_map_without_monochromatic_edges_fails() {
        let mut arena = HalfEdgeArena::new();
        let a = arena.create(vertex(0), Color::Black);
        let b = arena.create(vertex(1), Color::White);
        arena.pair(a, b).expect("unpaired");
        let graph = HalfEdgeGraph::new(arena, a);
        assert!(primal_map(&graph, Color::Black).is_err());
    }

    #[test]
    fn vertex_ids_survive_extraction() {
        let graph = chorded_square();
        let primal = primal_map(&graph, Color::Black).expect("chord survives");
        let nodes: std::collections::HashSet<VertexId> = primal
            .arena()
            .all_half_edges(primal.root(), TraversalFilter::default())
            .into_iter()
            .map(|h| primal.arena().node_nr(h))
            .collect();
        assert!(nodes.contains(&vertex(0)) && nodes.contains(&vertex(2)));
    }
}
