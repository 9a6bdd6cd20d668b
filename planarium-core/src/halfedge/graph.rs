//! Graph wrappers over the half-edge arena.
//!
//! A [`HalfEdgeGraph`] owns an arena together with a designated root
//! half-edge and the size accounting that decides how many vertices and
//! edges are "pinned" by the rooting (and therefore excluded from the
//! labeled/unlabeled atom counts). A [`Network`] is an edge-rooted graph with
//! two distinguished poles, the building block of two-connected composition.

use std::collections::HashSet;

use crate::{
    error::HalfEdgeError,
    halfedge::arena::{Color, HalfEdgeArena, HalfEdgeId, TraversalFilter, VertexId},
};

/// A half-edge map with a root and size accounting.
///
/// `l_size` is the number of vertices minus the pinned vertices; `u_size` is
/// the number of edges minus the distinguished root edges. Counts are derived
/// from the arena by traversal from the root, so they stay correct across
/// bijections without list bookkeeping.
#[derive(Clone, Debug)]
pub struct HalfEdgeGraph {
    arena: HalfEdgeArena,
    root: HalfEdgeId,
    pinned_vertices: usize,
    root_edges: usize,
}

impl HalfEdgeGraph {
    /// Wraps an arena with no pinned vertices and no distinguished edges.
    #[must_use]
    pub fn new(arena: HalfEdgeArena, root: HalfEdgeId) -> Self {
        Self::with_accounting(arena, root, 0, 0)
    }

    /// Wraps an arena with explicit accounting.
    #[must_use]
    pub fn with_accounting(
        arena: HalfEdgeArena,
        root: HalfEdgeId,
        pinned_vertices: usize,
        root_edges: usize,
    ) -> Self {
        Self {
            arena,
            root,
            pinned_vertices,
            root_edges,
        }
    }

    /// Edge-rooted accounting: the root edge and both of its endpoints are
    /// excluded from the sizes.
    ///
    /// # Errors
    /// Returns [`HalfEdgeError::NotPaired`] when `root` has no opposite.
    pub fn edge_rooted(arena: HalfEdgeArena, root: HalfEdgeId) -> Result<Self, HalfEdgeError> {
        if !arena.is_paired(root) {
            return Err(HalfEdgeError::NotPaired { id: root.index() });
        }
        Ok(Self::with_accounting(arena, root, 2, 1))
    }

    /// The zero-atom graph: a lone root edge between two fresh vertices,
    /// contributing nothing to either size.
    ///
    /// # Panics
    /// Panics when `a` and `b` name the same vertex; callers pass two fresh
    /// counter-drawn ids.
    #[must_use]
    pub fn zero_atom(a: VertexId, b: VertexId) -> Self {
        let mut arena = HalfEdgeArena::new();
        let root = arena.create(a, Color::Black);
        let opposite = arena.create(b, Color::White);
        arena
            .pair(root, opposite)
            .expect("fresh half-edges on distinct vertices pair");
        Self::with_accounting(arena, root, 2, 1)
    }

    /// The designated root half-edge.
    #[must_use]
    pub fn root(&self) -> HalfEdgeId {
        self.root
    }

    pub(crate) fn set_root(&mut self, root: HalfEdgeId) {
        self.root = root;
    }

    /// Shared access to the owned arena.
    #[must_use]
    pub fn arena(&self) -> &HalfEdgeArena {
        &self.arena
    }

    /// Mutable access to the owned arena.
    pub fn arena_mut(&mut self) -> &mut HalfEdgeArena {
        &mut self.arena
    }

    /// Consumes the wrapper, yielding the arena and the root id.
    #[must_use]
    pub fn into_parts(self) -> (HalfEdgeArena, HalfEdgeId) {
        (self.arena, self.root)
    }

    /// Number of distinct vertices reachable from the root.
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        let reachable = self
            .arena
            .all_half_edges(self.root, TraversalFilter::default());
        let vertices: HashSet<VertexId> =
            reachable.iter().map(|&h| self.arena.node_nr(h)).collect();
        vertices.len()
    }

    /// Number of full edges reachable from the root.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.arena
            .all_half_edges(self.root, TraversalFilter::edges())
            .len()
    }

    /// Unpaired half-edges reachable from the root.
    #[must_use]
    pub fn stub_count(&self) -> usize {
        self.arena
            .all_half_edges(self.root, TraversalFilter::default())
            .iter()
            .filter(|&&h| !self.arena.is_paired(h))
            .count()
    }

    /// Labeled-atom count: vertices minus the pinned vertices.
    #[must_use]
    pub fn l_size(&self) -> usize {
        self.vertex_count().saturating_sub(self.pinned_vertices)
    }

    /// Unlabeled-atom count: edges minus the distinguished root edges.
    #[must_use]
    pub fn u_size(&self) -> usize {
        self.edge_count().saturating_sub(self.root_edges)
    }

    /// Vertices excluded from `l_size` by the rooting.
    #[must_use]
    pub fn pinned_vertices(&self) -> usize {
        self.pinned_vertices
    }

    /// Edges excluded from `u_size` by the rooting.
    #[must_use]
    pub fn root_edges(&self) -> usize {
        self.root_edges
    }
}

/// A planar graph with two distinguished poles, rooted at a half-edge whose
/// opposite marks the infinity pole.
///
/// Network sizes follow the network decomposition convention: both poles are
/// pinned, while the root edge counts as a regular u-atom (the link graph, a
/// single edge, has `u_size` 1).
#[derive(Clone, Debug)]
pub struct Network {
    graph: HalfEdgeGraph,
}

impl Network {
    /// Wraps a graph as a network; its accounting is replaced by the network
    /// convention (two pinned poles, root edge counted).
    ///
    /// # Errors
    /// Returns [`HalfEdgeError::NotPaired`] when the root half-edge has no
    /// opposite to serve as the infinity pole.
    pub fn new(graph: HalfEdgeGraph) -> Result<Self, HalfEdgeError> {
        let (arena, root) = graph.into_parts();
        if !arena.is_paired(root) {
            return Err(HalfEdgeError::NotPaired { id: root.index() });
        }
        Ok(Self {
            graph: HalfEdgeGraph::with_accounting(arena, root, 2, 0),
        })
    }

    /// The link graph: a single edge between two fresh poles. This is the
    /// network representation of one u-atom.
    ///
    /// # Panics
    /// Panics when `zero` and `inf` name the same vertex; callers pass two
    /// fresh counter-drawn ids.
    #[must_use]
    pub fn link_graph(zero: VertexId, inf: VertexId) -> Self {
        let mut arena = HalfEdgeArena::new();
        let root = arena.create(zero, Color::Black);
        let opposite = arena.create(inf, Color::White);
        arena
            .pair(root, opposite)
            .expect("fresh half-edges on distinct poles pair");
        Self {
            graph: HalfEdgeGraph::with_accounting(arena, root, 2, 0),
        }
    }

    /// Half-edge at the zero pole; this is the network's root.
    #[must_use]
    pub fn zero_pole(&self) -> HalfEdgeId {
        self.graph.root()
    }

    /// Half-edge at the infinity pole; the opposite of the root.
    ///
    /// # Panics
    /// Panics if the root has lost its opposite, which construction rules
    /// out: every network is validated at creation and pairings are only
    /// dissolved by edge substitution, never on a network root.
    #[must_use]
    pub fn inf_pole(&self) -> HalfEdgeId {
        self.graph
            .arena()
            .opposite(self.graph.root())
            .expect("network root is paired by construction")
    }

    /// Shared access to the underlying rooted graph.
    #[must_use]
    pub fn graph(&self) -> &HalfEdgeGraph {
        &self.graph
    }

    /// Mutable access to the underlying rooted graph.
    pub fn graph_mut(&mut self) -> &mut HalfEdgeGraph {
        &mut self.graph
    }

    /// Consumes the network, yielding the underlying rooted graph.
    #[must_use]
    pub fn into_graph(self) -> HalfEdgeGraph {
        self.graph
    }

    /// Labeled-atom count: inner vertices (poles are pinned).
    #[must_use]
    pub fn l_size(&self) -> usize {
        self.graph.l_size()
    }

    /// Unlabeled-atom count: every edge, the root edge included.
    #[must_use]
    pub fn u_size(&self) -> usize {
        self.graph.u_size()
    }
}
