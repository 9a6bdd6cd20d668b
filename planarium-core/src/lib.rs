//! Planarium core library: Boltzmann sampling of planar graphs.
//!
//! The crate interprets a decomposition grammar over an evaluation oracle,
//! assembles half-edge planar maps through builders and bijections, and
//! drives rejection sampling towards a target size window.

mod algebra;
mod bijections;
mod driver;
mod error;
mod grammar;
mod halfedge;
mod oracle;
mod sampler;

pub use crate::{
    algebra::{Builder, CollectionKind, DefaultBuilder, Derivation, SumBranch, Value},
    bijections::{
        complete_closure, merge_in_parallel, merge_in_series, partial_closure, primal_map,
        replace_u_atoms, substitute_edge_by_network,
    },
    driver::{DriverParams, RejectionSampler, SizeMetric},
    error::{HalfEdgeError, HalfEdgeErrorCode, Result, SamplerError, SamplerErrorCode},
    grammar::DecompositionGrammar,
    halfedge::{
        ArenaOffset, Color, HalfEdgeArena, HalfEdgeGraph, HalfEdgeId, MapChecker, MapInvariant,
        MapInvariantViolation, Network, OrbitIter, TraversalFilter, VertexId,
    },
    oracle::EvaluationOracle,
    sampler::{
        DEFAULT_MAX_DEPTH, EvalTransform, SampleContext, Sampler, SymbolicPoint, ValueMap,
        exp_tail,
    },
};

#[cfg(test)]
pub(crate) mod test_utils;
