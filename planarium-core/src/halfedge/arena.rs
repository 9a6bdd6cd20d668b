//! Flat arena of half-edge records.
//!
//! A planar embedding is held as a set of half-edges with `next`/`prior`
//! links (the rotation around the incident vertex) and an optional `opposite`
//! link (the pairing that forms a full edge). The cyclic object graph is
//! represented as a flat arena addressed by stable [`HalfEdgeId`] indices;
//! "unpaired" is an explicit `None` rather than a dangling pointer.
//!
//! Mutating operations validate their preconditions and return
//! [`HalfEdgeError`]; read accessors take ids previously handed out by the
//! same arena and resolve them through checked lookups, panicking only when
//! handed an id from a different arena.

use std::{
    collections::{HashSet, VecDeque},
    fmt,
};

use crate::error::HalfEdgeError;

/// Index of a half-edge inside its owning [`HalfEdgeArena`].
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct HalfEdgeId(usize);

impl HalfEdgeId {
    /// Raw index into the arena.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for HalfEdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "h{}", self.0)
    }
}

/// Identifier of a vertex, drawn from the monotonic counter of the sampling
/// context. Vertex ids are never reused within one sampling run.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct VertexId(u64);

impl VertexId {
    /// Wraps a raw counter value.
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    /// The raw counter value.
    #[must_use]
    pub const fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v{}", self.0)
    }
}

/// Two-coloring used by the irreducible-dissection closure. All half-edges
/// incident to one vertex share its color.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Color {
    /// Color class 0.
    Black,
    /// Color class 1.
    White,
}

impl Color {
    /// The other color class.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Self::Black => Self::White,
            Self::White => Self::Black,
        }
    }
}

/// Traversal filter for [`HalfEdgeArena::all_half_edges`].
///
/// With `include_opposites` unset only one half of each paired edge is
/// reported; with `include_unpaired` unset stubs are skipped.
#[derive(Clone, Copy, Debug)]
pub struct TraversalFilter {
    /// Report both halves of every paired edge.
    pub include_opposites: bool,
    /// Report half-edges without an opposite.
    pub include_unpaired: bool,
}

impl Default for TraversalFilter {
    fn default() -> Self {
        Self {
            include_opposites: true,
            include_unpaired: true,
        }
    }
}

impl TraversalFilter {
    /// One representative half-edge per paired edge, no stubs. This is the
    /// edge enumeration used by u-atom substitution.
    #[must_use]
    pub const fn edges() -> Self {
        Self {
            include_opposites: false,
            include_unpaired: false,
        }
    }
}

#[derive(Clone, Debug)]
struct HalfEdgeRecord {
    next: HalfEdgeId,
    prior: HalfEdgeId,
    opposite: Option<HalfEdgeId>,
    node_nr: VertexId,
    color: Color,
}

/// Arena owning a set of half-edge records.
///
/// Freshly created half-edges are *self-consistent*: `next` and `prior` point
/// back at the half-edge itself and `opposite` is absent. They join rotations
/// via [`HalfEdgeArena::insert_after`] and become edges via
/// [`HalfEdgeArena::pair`].
#[derive(Clone, Debug, Default)]
pub struct HalfEdgeArena {
    records: Vec<HalfEdgeRecord>,
}

/// Index offset returned by [`HalfEdgeArena::absorb`], mapping ids of the
/// absorbed arena into the absorbing one.
#[derive(Clone, Copy, Debug)]
pub struct ArenaOffset {
    base: usize,
}

impl ArenaOffset {
    /// Translates an id of the absorbed arena.
    #[must_use]
    pub const fn map(self, id: HalfEdgeId) -> HalfEdgeId {
        HalfEdgeId(self.base + id.0)
    }
}

impl HalfEdgeArena {
    /// Creates an empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of half-edges in the arena, including detached ones.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns whether the arena holds no half-edges.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Returns whether `id` belongs to this arena.
    #[must_use]
    pub fn contains(&self, id: HalfEdgeId) -> bool {
        id.0 < self.records.len()
    }

    /// Creates a fresh self-consistent half-edge at `node`.
    pub fn create(&mut self, node: VertexId, color: Color) -> HalfEdgeId {
        let id = HalfEdgeId(self.records.len());
        self.records.push(HalfEdgeRecord {
            next: id,
            prior: id,
            opposite: None,
            node_nr: node,
            color,
        });
        id
    }

    fn record(&self, id: HalfEdgeId) -> &HalfEdgeRecord {
        self.records
            .get(id.0)
            .expect("half-edge id was issued by a different arena")
    }

    fn record_mut(&mut self, id: HalfEdgeId) -> &mut HalfEdgeRecord {
        self.records
            .get_mut(id.0)
            .expect("half-edge id was issued by a different arena")
    }

    fn ensure_known(&self, id: HalfEdgeId) -> Result<(), HalfEdgeError> {
        if self.contains(id) {
            Ok(())
        } else {
            Err(HalfEdgeError::UnknownHalfEdge {
                id: id.0,
                len: self.records.len(),
            })
        }
    }

    /// Successor of `h` in the rotation around its vertex.
    #[must_use]
    pub fn next(&self, h: HalfEdgeId) -> HalfEdgeId {
        self.record(h).next
    }

    /// Predecessor of `h` in the rotation around its vertex.
    #[must_use]
    pub fn prior(&self, h: HalfEdgeId) -> HalfEdgeId {
        self.record(h).prior
    }

    /// The paired half-edge forming a full edge with `h`, if any.
    #[must_use]
    pub fn opposite(&self, h: HalfEdgeId) -> Option<HalfEdgeId> {
        self.record(h).opposite
    }

    /// Returns whether `h` currently has an opposite.
    #[must_use]
    pub fn is_paired(&self, h: HalfEdgeId) -> bool {
        self.record(h).opposite.is_some()
    }

    /// Returns whether `h` is alone in its rotation and unpaired, i.e. still
    /// (or again) in the self-consistent state it was created in.
    #[must_use]
    pub fn is_self_consistent(&self, h: HalfEdgeId) -> bool {
        let record = self.record(h);
        record.next == h && record.prior == h && record.opposite.is_none()
    }

    /// Vertex the half-edge is incident to.
    #[must_use]
    pub fn node_nr(&self, h: HalfEdgeId) -> VertexId {
        self.record(h).node_nr
    }

    /// Color of the half-edge's vertex.
    #[must_use]
    pub fn color(&self, h: HalfEdgeId) -> Color {
        self.record(h).color
    }

    /// Overwrites the color of one half-edge.
    pub fn set_color(&mut self, h: HalfEdgeId, color: Color) {
        self.record_mut(h).color = color;
    }

    /// Splices `k` into the rotation right after `h`. `k` adopts `h`'s vertex.
    ///
    /// # Errors
    /// Returns [`HalfEdgeError::AlreadyLinked`] if `k` already sits in a
    /// rotation, and [`HalfEdgeError::UnknownHalfEdge`] for foreign ids.
    pub fn insert_after(&mut self, h: HalfEdgeId, k: HalfEdgeId) -> Result<(), HalfEdgeError> {
        self.ensure_known(h)?;
        self.ensure_known(k)?;
        let k_record = self.record(k);
        if k_record.next != k || k_record.prior != k {
            return Err(HalfEdgeError::AlreadyLinked { id: k.0 });
        }
        let node = self.record(h).node_nr;
        let after = self.record(h).next;
        {
            let k_record = self.record_mut(k);
            k_record.node_nr = node;
            k_record.next = after;
            k_record.prior = h;
        }
        self.record_mut(after).prior = k;
        self.record_mut(h).next = k;
        Ok(())
    }

    /// Pairs `h` and `k` into a full edge.
    ///
    /// # Errors
    /// Returns [`HalfEdgeError::AlreadyPaired`] if either half-edge has an
    /// opposite, and [`HalfEdgeError::SelfLoop`] if both sit on one vertex.
    pub fn pair(&mut self, h: HalfEdgeId, k: HalfEdgeId) -> Result<(), HalfEdgeError> {
        self.ensure_known(h)?;
        self.ensure_known(k)?;
        if self.record(h).opposite.is_some() {
            return Err(HalfEdgeError::AlreadyPaired { id: h.0 });
        }
        if self.record(k).opposite.is_some() {
            return Err(HalfEdgeError::AlreadyPaired { id: k.0 });
        }
        let node = self.record(h).node_nr;
        if node == self.record(k).node_nr {
            return Err(HalfEdgeError::SelfLoop {
                left: h.0,
                right: k.0,
                node: node.raw(),
            });
        }
        self.record_mut(h).opposite = Some(k);
        self.record_mut(k).opposite = Some(h);
        Ok(())
    }

    /// Dissolves the pairing of `h`, returning its former opposite.
    ///
    /// Only edge substitution removes edges; the rest of the crate treats
    /// pairings as permanent.
    pub(crate) fn unpair(&mut self, h: HalfEdgeId) -> Result<HalfEdgeId, HalfEdgeError> {
        let opposite = self
            .record(h)
            .opposite
            .ok_or(HalfEdgeError::NotPaired { id: h.0 })?;
        self.record_mut(h).opposite = None;
        self.record_mut(opposite).opposite = None;
        Ok(opposite)
    }

    /// Removes `h` from its rotation, leaving it self-linked. The pairing of
    /// `h`, if any, is untouched.
    pub(crate) fn detach_from_rotation(&mut self, h: HalfEdgeId) {
        let record = self.record(h);
        let (next, prior) = (record.next, record.prior);
        if next == h {
            return;
        }
        self.record_mut(prior).next = next;
        self.record_mut(next).prior = prior;
        let record = self.record_mut(h);
        record.next = h;
        record.prior = h;
    }

    /// Merges the rotations containing `a` and `b` into a single orbit.
    ///
    /// After the splice, walking from `a` visits `b`'s former orbit between
    /// `a.prior` and `a`. The caller is responsible for relabeling the merged
    /// orbit to a single vertex id.
    pub(crate) fn merge_orbits(&mut self, a: HalfEdgeId, b: HalfEdgeId) {
        let a_prior = self.record(a).prior;
        let b_prior = self.record(b).prior;
        self.record_mut(a).prior = b_prior;
        self.record_mut(b_prior).next = a;
        self.record_mut(b).prior = a_prior;
        self.record_mut(a_prior).next = b;
    }

    /// Iterates the rotation at `h`'s vertex in `next` order, starting at `h`
    /// and yielding every orbit member exactly once.
    #[must_use]
    pub fn walk_orbit(&self, h: HalfEdgeId) -> OrbitIter<'_> {
        OrbitIter {
            arena: self,
            start: h,
            current: Some(h),
        }
    }

    /// Number of half-edges in the rotation at `h`'s vertex.
    #[must_use]
    pub fn orbit_len(&self, h: HalfEdgeId) -> usize {
        self.walk_orbit(h).count()
    }

    /// Overwrites `node_nr` on every half-edge in the orbit of `h`; used when
    /// two vertices are identified.
    pub fn relabel_component(&mut self, h: HalfEdgeId, new_node: VertexId) {
        let orbit: Vec<HalfEdgeId> = self.walk_orbit(h).collect();
        for member in orbit {
            self.record_mut(member).node_nr = new_node;
        }
    }

    /// Breadth-first enumeration of every half-edge reachable from `seed`
    /// via rotation and pairing links, filtered by `filter`.
    ///
    /// Traversal order is an implementation detail; callers must not depend
    /// on it.
    #[must_use]
    pub fn all_half_edges(&self, seed: HalfEdgeId, filter: TraversalFilter) -> Vec<HalfEdgeId> {
        let mut visited: HashSet<HalfEdgeId> = HashSet::new();
        let mut selected: HashSet<HalfEdgeId> = HashSet::new();
        let mut result = Vec::new();
        let mut queue = VecDeque::new();
        visited.insert(seed);
        queue.push_back(seed);
        while let Some(h) = queue.pop_front() {
            let record = self.record(h);
            match record.opposite {
                Some(opposite) => {
                    if filter.include_opposites || !selected.contains(&opposite) {
                        selected.insert(h);
                        result.push(h);
                    }
                    if visited.insert(opposite) {
                        queue.push_back(opposite);
                    }
                }
                None => {
                    if filter.include_unpaired {
                        result.push(h);
                    }
                }
            }
            if visited.insert(record.next) {
                queue.push_back(record.next);
            }
        }
        result
    }

    /// Appends every record of `other` to this arena, returning the offset
    /// that translates `other`'s ids. All links are remapped; vertex ids and
    /// colors are preserved.
    pub fn absorb(&mut self, other: Self) -> ArenaOffset {
        let base = self.records.len();
        let offset = ArenaOffset { base };
        self.records
            .extend(other.records.into_iter().map(|record| HalfEdgeRecord {
                next: offset.map(record.next),
                prior: offset.map(record.prior),
                opposite: record.opposite.map(|o| offset.map(o)),
                node_nr: record.node_nr,
                color: record.color,
            }));
        offset
    }

    /// Every id currently held by the arena, detached half-edges included.
    pub fn ids(&self) -> impl Iterator<Item = HalfEdgeId> + '_ {
        (0..self.records.len()).map(HalfEdgeId)
    }
}

/// Iterator over one rotation; see [`HalfEdgeArena::walk_orbit`].
#[derive(Clone, Debug)]
pub struct OrbitIter<'a> {
    arena: &'a HalfEdgeArena,
    start: HalfEdgeId,
    current: Option<HalfEdgeId>,
}

impl Iterator for OrbitIter<'_> {
    type Item = HalfEdgeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.current?;
        let successor = self.arena.next(current);
        self.current = (successor != self.start).then_some(successor);
        Some(current)
    }
}
