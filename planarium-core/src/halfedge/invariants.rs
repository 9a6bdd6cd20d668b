//! Structural invariant checks for half-edge maps.
//!
//! Bijections must leave every map they touch in a consistent state; the
//! checker here lets tests (and debug assertions inside the bijections)
//! verify that without reimplementing traversal logic. Checks run over the
//! half-edges reachable from a seed, so detached records left behind by edge
//! substitution are ignored.

use std::collections::{HashMap, HashSet};

use thiserror::Error;

use crate::halfedge::arena::{HalfEdgeArena, HalfEdgeId, TraversalFilter, VertexId};

/// Enumerates the structural invariants of a half-edge map.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum MapInvariant {
    /// `h.next.prior == h` and `h.prior.next == h` for every half-edge.
    RotationLinks,
    /// `h.opposite.opposite == h` and opposite endpoints are distinct.
    PairingInvolution,
    /// The orbit under `next` covers exactly the half-edges of one vertex.
    OrbitConsistency,
}

impl MapInvariant {
    /// Returns all invariants in the order they should be evaluated.
    #[must_use]
    pub const fn all() -> [Self; 3] {
        [
            Self::RotationLinks,
            Self::PairingInvolution,
            Self::OrbitConsistency,
        ]
    }
}

/// Reports an invariant violation surfaced by [`MapChecker`].
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum MapInvariantViolation {
    /// A rotation link is not mirrored by its inverse link.
    #[error("rotation links around {half_edge} are asymmetric")]
    AsymmetricRotation {
        /// Half-edge whose `next`/`prior` mirror failed.
        half_edge: usize,
    },
    /// An opposite link is not an involution.
    #[error("opposite of the opposite of {half_edge} is not itself")]
    BrokenInvolution {
        /// Half-edge whose pairing round trip failed.
        half_edge: usize,
    },
    /// A paired edge begins and ends on the same vertex.
    #[error("half-edge {half_edge} is paired within vertex {node}")]
    LoopEdge {
        /// One half of the offending edge.
        half_edge: usize,
        /// The vertex carrying both halves.
        node: u64,
    },
    /// Two half-edges of one vertex sit in different rotations.
    #[error("vertex {node} is split across multiple rotations")]
    SplitVertex {
        /// Vertex whose half-edges do not form a single orbit.
        node: u64,
    },
    /// One rotation mixes half-edges of different vertices.
    #[error("rotation at {half_edge} mixes vertices {node} and {other}")]
    MixedOrbit {
        /// Half-edge whose orbit was inspected.
        half_edge: usize,
        /// Vertex of the inspected half-edge.
        node: u64,
        /// Conflicting vertex found in the same orbit.
        other: u64,
    },
}

/// Runs structural checks over the half-edges reachable from a seed.
#[derive(Clone, Copy, Debug)]
pub struct MapChecker<'a> {
    arena: &'a HalfEdgeArena,
    seed: HalfEdgeId,
}

enum EvaluationMode<'a> {
    FailFast,
    Collect(&'a mut Vec<MapInvariantViolation>),
}

impl EvaluationMode<'_> {
    fn record(&mut self, violation: MapInvariantViolation) -> Result<(), MapInvariantViolation> {
        match self {
            Self::FailFast => Err(violation),
            Self::Collect(sink) => {
                sink.push(violation);
                Ok(())
            }
        }
    }
}

impl<'a> MapChecker<'a> {
    /// Creates a checker rooted at `seed`.
    #[must_use]
    pub fn new(arena: &'a HalfEdgeArena, seed: HalfEdgeId) -> Self {
        Self { arena, seed }
    }

    /// Runs all invariants, returning the first violation encountered.
    pub fn check_all(&self) -> Result<(), MapInvariantViolation> {
        self.check_many(MapInvariant::all())
    }

    /// Runs a custom subset of invariants in the provided order.
    pub fn check_many(
        &self,
        invariants: impl IntoIterator<Item = MapInvariant>,
    ) -> Result<(), MapInvariantViolation> {
        self.run_with_mode(invariants, EvaluationMode::FailFast)
    }

    /// Runs a single invariant.
    pub fn check(&self, invariant: MapInvariant) -> Result<(), MapInvariantViolation> {
        self.check_many([invariant])
    }

    /// Executes every invariant and returns the full set of violations.
    #[must_use]
    pub fn collect_all(&self) -> Vec<MapInvariantViolation> {
        let mut violations = Vec::new();
        let _ = self.run_with_mode(MapInvariant::all(), EvaluationMode::Collect(&mut violations));
        violations
    }

    fn run_with_mode(
        &self,
        invariants: impl IntoIterator<Item = MapInvariant>,
        mut mode: EvaluationMode<'_>,
    ) -> Result<(), MapInvariantViolation> {
        let reachable = self
            .arena
            .all_half_edges(self.seed, TraversalFilter::default());
        for invariant in invariants {
            match invariant {
                MapInvariant::RotationLinks => self.check_rotation(&reachable, &mut mode)?,
                MapInvariant::PairingInvolution => self.check_pairing(&reachable, &mut mode)?,
                MapInvariant::OrbitConsistency => self.check_orbits(&reachable, &mut mode)?,
            }
        }
        Ok(())
    }

    fn check_rotation(
        &self,
        reachable: &[HalfEdgeId],
        mode: &mut EvaluationMode<'_>,
    ) -> Result<(), MapInvariantViolation> {
        for &h in reachable {
            let mirrored = self.arena.prior(self.arena.next(h)) == h
                && self.arena.next(self.arena.prior(h)) == h;
            if !mirrored {
                mode.record(MapInvariantViolation::AsymmetricRotation {
                    half_edge: h.index(),
                })?;
            }
        }
        Ok(())
    }

    fn check_pairing(
        &self,
        reachable: &[HalfEdgeId],
        mode: &mut EvaluationMode<'_>,
    ) -> Result<(), MapInvariantViolation> {
        for &h in reachable {
            let Some(opposite) = self.arena.opposite(h) else {
                continue;
            };
            if self.arena.opposite(opposite) != Some(h) {
                mode.record(MapInvariantViolation::BrokenInvolution {
                    half_edge: h.index(),
                })?;
            }
            if self.arena.node_nr(opposite) == self.arena.node_nr(h) {
                mode.record(MapInvariantViolation::LoopEdge {
                    half_edge: h.index(),
                    node: self.arena.node_nr(h).raw(),
                })?;
            }
        }
        Ok(())
    }

    fn check_orbits(
        &self,
        reachable: &[HalfEdgeId],
        mode: &mut EvaluationMode<'_>,
    ) -> Result<(), MapInvariantViolation> {
        let mut by_vertex: HashMap<VertexId, Vec<HalfEdgeId>> = HashMap::new();
        for &h in reachable {
            by_vertex.entry(self.arena.node_nr(h)).or_default().push(h);
        }
        for (node, members) in by_vertex {
            let Some(&representative) = members.first() else {
                continue;
            };
            let mut orbit = HashSet::new();
            for h in self.arena.walk_orbit(representative) {
                let found = self.arena.node_nr(h);
                if found != node {
                    mode.record(MapInvariantViolation::MixedOrbit {
                        half_edge: representative.index(),
                        node: node.raw(),
                        other: found.raw(),
                    })?;
                }
                orbit.insert(h);
            }
            if members.iter().any(|h| !orbit.contains(h)) {
                mode.record(MapInvariantViolation::SplitVertex { node: node.raw() })?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{MapChecker, MapInvariantViolation};
    use crate::halfedge::arena::{Color, HalfEdgeArena, VertexId};

    fn vertex(raw: u64) -> VertexId {
        VertexId::new(raw)
    }

    fn two_edge_path() -> (HalfEdgeArena, crate::halfedge::arena::HalfEdgeId) {
        // a - b - c
        let mut arena = HalfEdgeArena::new();
        let ab = arena.create(vertex(0), Color::Black);
        let ba = arena.create(vertex(1), Color::White);
        arena.pair(ab, ba).expect("unpaired");
        let bc = arena.create(vertex(1), Color::White);
        arena.insert_after(ba, bc).expect("fresh");
        let cb = arena.create(vertex(2), Color::Black);
        arena.pair(bc, cb).expect("unpaired");
        (arena, ab)
    }

    #[test]
    fn valid_map_passes_all_checks() {
        let (arena, root) = two_edge_path();
        MapChecker::new(&arena, root)
            .check_all()
            .expect("path map is consistent");
    }

    #[test]
    fn split_vertex_is_reported() {
        let (mut arena, root) = two_edge_path();
        // A half-edge claiming vertex 1 in its own rotation, reachable
        // through a pairing with a half-edge spliced in at vertex 0.
        let far = arena.create(vertex(3), Color::Black);
        let stray = arena.create(vertex(1), Color::White);
        arena.pair(stray, far).expect("unpaired");
        arena.insert_after(root, far).expect("fresh rotation slot");
        let violations = MapChecker::new(&arena, root).collect_all();
        assert!(
            violations
                .iter()
                .any(|v| matches!(v, MapInvariantViolation::SplitVertex { node: 1 })),
            "expected a split-vertex violation, got {violations:?}"
        );
    }

    #[test]
    fn loop_edge_is_reported() {
        let mut arena = HalfEdgeArena::new();
        let a = arena.create(vertex(0), Color::Black);
        let b = arena.create(vertex(1), Color::White);
        arena.pair(a, b).expect("unpaired");
        // Relabel one endpoint onto the other to fake a loop.
        arena.relabel_component(b, vertex(0));
        let violations = MapChecker::new(&arena, a).collect_all();
        assert!(
            violations
                .iter()
                .any(|v| matches!(v, MapInvariantViolation::LoopEdge { node: 0, .. }))
        );
    }
}
