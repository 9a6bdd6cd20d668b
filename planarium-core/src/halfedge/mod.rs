//! Half-edge planar map primitives: the arena, rooted graph wrappers and the
//! structural invariant checker.

mod arena;
mod graph;
mod invariants;

pub use self::{
    arena::{ArenaOffset, Color, HalfEdgeArena, HalfEdgeId, OrbitIter, TraversalFilter, VertexId},
    graph::{HalfEdgeGraph, Network},
    invariants::{MapChecker, MapInvariant, MapInvariantViolation},
};
