//! Values flowing through the grammar interpreter.
//!
//! Every rule produces a [`Value`]: atoms at the leaves, products, tagged
//! sums and collections in the interior, derivation markers that discount one
//! distinguished atom, and domain objects (half-edge graphs and networks)
//! once a builder or bijection has assembled them.

use crate::halfedge::{HalfEdgeGraph, Network, VertexId};

/// Which branch a sum sampler chose.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SumBranch {
    /// The left summand.
    Left,
    /// The right summand.
    Right,
}

/// Kind of a derivation marker.
///
/// A derived value distinguishes one atom of the corresponding kind, so its
/// declared size of that kind is one less than the wrapped value's.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Derivation {
    /// One labeled atom is distinguished.
    Labeled,
    /// One unlabeled atom is distinguished.
    Unlabeled,
}

/// Kind of a multi-child collection value.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum CollectionKind {
    /// Unordered collection from a set sampler.
    Set,
    /// Ordered collection from a sequence sampler.
    Sequence,
    /// Collection up to rotation from a cycle sampler.
    Cycle,
}

/// A sampled combinatorial value.
#[derive(Clone, Debug)]
pub enum Value {
    /// The neutral atom; contributes to neither size.
    ZeroAtom,
    /// A labeled atom carrying its fresh vertex id.
    LAtom(VertexId),
    /// An unlabeled atom.
    UAtom,
    /// An ordered pair with additive sizes.
    Product(Box<Value>, Box<Value>),
    /// The result of a sum sampler, tagged with the chosen branch.
    Sum {
        /// Which summand was drawn.
        branch: SumBranch,
        /// The drawn value.
        inner: Box<Value>,
    },
    /// A derivation marker discounting one distinguished atom.
    Derived {
        /// Kind of the distinguished atom.
        kind: Derivation,
        /// The underlying value.
        inner: Box<Value>,
    },
    /// Children of a set, sequence or cycle sampler.
    Collection {
        /// Which collection sampler produced the children.
        kind: CollectionKind,
        /// The sampled children.
        items: Vec<Value>,
    },
    /// A rooted half-edge map assembled by a builder or bijection.
    Graph(HalfEdgeGraph),
    /// A two-pole network.
    Network(Network),
}

impl Value {
    /// Labeled-atom count of the value.
    #[must_use]
    pub fn l_size(&self) -> usize {
        match self {
            Self::ZeroAtom | Self::UAtom => 0,
            Self::LAtom(_) => 1,
            Self::Product(left, right) => left.l_size() + right.l_size(),
            Self::Sum { inner, .. } => inner.l_size(),
            Self::Derived { kind, inner } => match kind {
                Derivation::Labeled => inner.l_size().saturating_sub(1),
                Derivation::Unlabeled => inner.l_size(),
            },
            Self::Collection { items, .. } => items.iter().map(Self::l_size).sum(),
            Self::Graph(graph) => graph.l_size(),
            Self::Network(network) => network.l_size(),
        }
    }

    /// Unlabeled-atom count of the value.
    #[must_use]
    pub fn u_size(&self) -> usize {
        match self {
            Self::ZeroAtom | Self::LAtom(_) => 0,
            Self::UAtom => 1,
            Self::Product(left, right) => left.u_size() + right.u_size(),
            Self::Sum { inner, .. } => inner.u_size(),
            Self::Derived { kind, inner } => match kind {
                Derivation::Labeled => inner.u_size(),
                Derivation::Unlabeled => inner.u_size().saturating_sub(1),
            },
            Self::Collection { items, .. } => items.iter().map(Self::u_size).sum(),
            Self::Graph(graph) => graph.u_size(),
            Self::Network(network) => network.u_size(),
        }
    }

    /// Returns the derivation kind when the value is a derived wrapper.
    #[must_use]
    pub fn derivation(&self) -> Option<Derivation> {
        match self {
            Self::Derived { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// Strips every outer derivation marker and sum tag, yielding a reference
    /// to the underlying object.
    #[must_use]
    pub fn underlying(&self) -> &Self {
        match self {
            Self::Derived { inner, .. } | Self::Sum { inner, .. } => inner.underlying(),
            other => other,
        }
    }

    /// Consuming variant of [`Value::underlying`].
    #[must_use]
    pub fn into_underlying(self) -> Self {
        match self {
            Self::Derived { inner, .. } | Self::Sum { inner, .. } => inner.into_underlying(),
            other => other,
        }
    }

    /// Swaps the two outermost derivation markers, turning for instance a
    /// u-derivative of an l-derivative into the l-derivative of a
    /// u-derivative. Returns `None` when fewer than two markers are present.
    #[must_use]
    pub fn invert_derivation_order(self) -> Option<Self> {
        let Self::Derived { kind: outer, inner } = self else {
            return None;
        };
        let Self::Derived {
            kind: inner_kind,
            inner: base,
        } = *inner
        else {
            return None;
        };
        Some(Self::Derived {
            kind: inner_kind,
            inner: Box::new(Self::Derived {
                kind: outer,
                inner: base,
            }),
        })
    }
}
