//! Irreducible-dissection closure.
//!
//! A bicolored tree of half-edges carries unpaired stubs on its outer
//! boundary. The partial closure walks that boundary and matches stubs of
//! opposite colors into chords; the complete closure then absorbs whatever
//! stubs remain into fresh outer vertices. Both operations read `color` and
//! write `opposite` links only; `next`/`prior` links of existing half-edges
//! are never reassigned.

use tracing::trace;

use crate::{
    bijections::debug_check_map,
    error::Result,
    halfedge::{HalfEdgeArena, HalfEdgeGraph, HalfEdgeId, TraversalFilter},
    sampler::SampleContext,
};

/// Successor of a stub along the outer boundary: step to the rotation
/// successor, skipping through paired edges.
fn next_stub(arena: &HalfEdgeArena, h: HalfEdgeId) -> HalfEdgeId {
    let mut k = arena.next(h);
    while let Some(opposite) = arena.opposite(k) {
        k = arena.next(opposite);
    }
    k
}

/// Stubs in boundary-walk order, starting from `start`.
fn boundary_walk(arena: &HalfEdgeArena, start: HalfEdgeId) -> Vec<HalfEdgeId> {
    let mut walk = vec![start];
    let mut current = next_stub(arena, start);
    while current != start {
        walk.push(current);
        current = next_stub(arena, current);
    }
    walk
}

/// Matches boundary stubs of opposite colors into chords.
///
/// The walk is processed with a stack: a stub closing against the most
/// recent open stub of the other color is paired with it, so chords nest and
/// the embedding stays planar. Returns the number of chords formed.
///
/// # Errors
/// Propagates pairing failures; the map is rechecked in debug builds.
pub fn partial_closure(graph: &mut HalfEdgeGraph) -> Result<usize> {
    let root = graph.root();
    let reachable = graph
        .arena()
        .all_half_edges(root, TraversalFilter::default());
    let Some(&start) = reachable.iter().find(|&&h| !graph.arena().is_paired(h)) else {
        return Ok(0);
    };
    let walk = boundary_walk(graph.arena(), start);
    trace!(stubs = walk.len(), "closing boundary stubs");

    let arena = graph.arena_mut();
    let mut open: Vec<HalfEdgeId> = Vec::new();
    let mut chords = 0;
    for stub in walk {
        if let Some(&candidate) = open.last() {
            if arena.color(candidate) != arena.color(stub) {
                arena.pair(candidate, stub)?;
                open.pop();
                chords += 1;
                continue;
            }
        }
        open.push(stub);
    }

    debug_check_map(graph.arena(), root)?;
    Ok(chords)
}

/// Completes a dissection: runs the partial closure, then pairs every stub
/// it left open with a half-edge on a fresh outer vertex of the opposite
/// color. Afterwards no reachable half-edge is unpaired and every edge joins
/// the two color classes.
///
/// Closing an already-closed map is the identity. Returns the total number
/// of pairings performed.
///
/// # Errors
/// Propagates pairing failures; the map is rechecked in debug builds.
pub fn complete_closure(graph: &mut HalfEdgeGraph, ctx: &mut SampleContext) -> Result<usize> {
    let mut pairings = partial_closure(graph)?;
    let root = graph.root();
    let remaining: Vec<HalfEdgeId> = graph
        .arena()
        .all_half_edges(root, TraversalFilter::default())
        .into_iter()
        .filter(|&h| !graph.arena().is_paired(h))
        .collect();

    let arena = graph.arena_mut();
    for stub in remaining {
        let outer_vertex = ctx.next_vertex();
        let absorber = arena.create(outer_vertex, arena.color(stub).opposite());
        arena.pair(stub, absorber)?;
        pairings += 1;
    }

    debug_check_map(graph.arena(), root)?;
    Ok(pairings)
}
