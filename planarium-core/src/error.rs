//! Error types for the planarium core library.
//!
//! Defines error enums exposed by the public API and a convenient result alias.

use std::fmt;

use thiserror::Error;

use crate::halfedge::MapInvariantViolation;

/// Stable codes describing [`HalfEdgeError`] variants.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum HalfEdgeErrorCode {
    /// Pairing was requested for a half-edge that already has an opposite.
    AlreadyPaired,
    /// A rotation splice was requested for a half-edge already in an orbit.
    AlreadyLinked,
    /// An unpair was requested for a half-edge with no opposite.
    NotPaired,
    /// Pairing would connect two half-edges on the same vertex.
    SelfLoop,
    /// A half-edge identifier did not belong to the arena.
    UnknownHalfEdge,
}

impl HalfEdgeErrorCode {
    /// Return the stable machine-readable representation of this error code.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AlreadyPaired => "HALF_EDGE_ALREADY_PAIRED",
            Self::AlreadyLinked => "HALF_EDGE_ALREADY_LINKED",
            Self::NotPaired => "HALF_EDGE_NOT_PAIRED",
            Self::SelfLoop => "HALF_EDGE_SELF_LOOP",
            Self::UnknownHalfEdge => "HALF_EDGE_UNKNOWN",
        }
    }
}

impl fmt::Display for HalfEdgeErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An error produced by half-edge arena operations.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum HalfEdgeError {
    /// Pairing was requested for a half-edge that already has an opposite.
    #[error("half-edge {id} is already paired")]
    AlreadyPaired {
        /// Identifier of the half-edge that still carries an opposite link.
        id: usize,
    },
    /// A rotation splice was requested for a half-edge already in an orbit.
    #[error("half-edge {id} is already linked into a rotation")]
    AlreadyLinked {
        /// Identifier of the half-edge that is not self-consistent.
        id: usize,
    },
    /// An unpair was requested for a half-edge with no opposite.
    #[error("half-edge {id} has no opposite")]
    NotPaired {
        /// Identifier of the unpaired half-edge.
        id: usize,
    },
    /// Pairing would connect two half-edges on the same vertex.
    #[error("pairing half-edges {left} and {right} would form a loop at vertex {node}")]
    SelfLoop {
        /// First half-edge of the rejected pairing.
        left: usize,
        /// Second half-edge of the rejected pairing.
        right: usize,
        /// Vertex both half-edges are incident to.
        node: u64,
    },
    /// A half-edge identifier did not belong to the arena.
    #[error("half-edge {id} is outside the arena (len {len})")]
    UnknownHalfEdge {
        /// Identifier that failed the bounds check.
        id: usize,
        /// Number of half-edges held by the arena.
        len: usize,
    },
}

impl HalfEdgeError {
    /// Retrieve the stable [`HalfEdgeErrorCode`] for this error.
    pub const fn code(&self) -> HalfEdgeErrorCode {
        match self {
            Self::AlreadyPaired { .. } => HalfEdgeErrorCode::AlreadyPaired,
            Self::AlreadyLinked { .. } => HalfEdgeErrorCode::AlreadyLinked,
            Self::NotPaired { .. } => HalfEdgeErrorCode::NotPaired,
            Self::SelfLoop { .. } => HalfEdgeErrorCode::SelfLoop,
            Self::UnknownHalfEdge { .. } => HalfEdgeErrorCode::UnknownHalfEdge,
        }
    }
}

/// Stable codes describing [`SamplerError`] variants.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum SamplerErrorCode {
    /// The oracle lacked an entry required by the grammar.
    MissingOracleEntry,
    /// An oracle entry was negative or non-finite.
    InvalidOracleEntry,
    /// A probabilistic choice had no mass on any branch.
    DegenerateGrammar,
    /// A sequence or cycle sampler was evaluated outside its convergence disc.
    BadSeries,
    /// Recursive descent exceeded the configured depth limit.
    RecursionTooDeep,
    /// The rejection driver exhausted its attempt budget.
    BudgetExhausted,
    /// A rule name was not present in the grammar.
    UnknownRule,
    /// A rule name was registered twice.
    DuplicateRule,
    /// Sampling was attempted before the grammar was initialized.
    GrammarUninitialized,
    /// A rule produced or consumed a value of the wrong shape.
    MalformedRule,
    /// Driver parameters failed validation.
    InvalidDriverParams,
    /// A half-edge map violated a structural invariant.
    InvariantViolation,
    /// A half-edge arena operation failed.
    HalfEdgeFailure,
}

impl SamplerErrorCode {
    /// Return the stable machine-readable representation of this error code.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MissingOracleEntry => "SAMPLER_MISSING_ORACLE_ENTRY",
            Self::InvalidOracleEntry => "SAMPLER_INVALID_ORACLE_ENTRY",
            Self::DegenerateGrammar => "SAMPLER_DEGENERATE_GRAMMAR",
            Self::BadSeries => "SAMPLER_BAD_SERIES",
            Self::RecursionTooDeep => "SAMPLER_RECURSION_TOO_DEEP",
            Self::BudgetExhausted => "SAMPLER_BUDGET_EXHAUSTED",
            Self::UnknownRule => "SAMPLER_UNKNOWN_RULE",
            Self::DuplicateRule => "SAMPLER_DUPLICATE_RULE",
            Self::GrammarUninitialized => "SAMPLER_GRAMMAR_UNINITIALIZED",
            Self::MalformedRule => "SAMPLER_MALFORMED_RULE",
            Self::InvalidDriverParams => "SAMPLER_INVALID_DRIVER_PARAMS",
            Self::InvariantViolation => "SAMPLER_INVARIANT_VIOLATION",
            Self::HalfEdgeFailure => "SAMPLER_HALF_EDGE_FAILURE",
        }
    }
}

impl fmt::Display for SamplerErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error type produced by the grammar, the sampler algebra and the driver.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum SamplerError {
    /// The oracle lacked an entry required by the grammar.
    #[error("oracle has no entry for `{expr}`")]
    MissingOracleEntry {
        /// Symbolic expression that was looked up.
        expr: String,
    },
    /// An oracle entry was negative or non-finite.
    #[error("oracle entry `{expr}` has invalid value {value}")]
    InvalidOracleEntry {
        /// Symbolic expression being registered.
        expr: String,
        /// The rejected value.
        value: f64,
    },
    /// A probabilistic choice had no mass on any branch.
    #[error("degenerate grammar: {detail}")]
    DegenerateGrammar {
        /// Description of the choice whose weights all vanished.
        detail: String,
    },
    /// A sequence or cycle sampler was evaluated outside its convergence disc.
    #[error("series does not converge: inner evaluation {value} must be < 1")]
    BadSeries {
        /// The offending inner evaluation.
        value: f64,
    },
    /// Recursive descent exceeded the configured depth limit.
    #[error("recursion exceeded the configured depth limit {limit}")]
    RecursionTooDeep {
        /// The depth limit in force when descent was abandoned.
        limit: usize,
    },
    /// The rejection driver exhausted its attempt budget.
    #[error("rejection driver gave up after {attempts} attempt(s)")]
    BudgetExhausted {
        /// Number of attempts performed before giving up.
        attempts: usize,
    },
    /// A rule name was not present in the grammar.
    #[error("grammar has no rule named `{name}`")]
    UnknownRule {
        /// The missing rule name.
        name: String,
    },
    /// A rule name was registered twice.
    #[error("rule `{name}` is already registered")]
    DuplicateRule {
        /// The duplicated rule name.
        name: String,
    },
    /// Sampling was attempted before the grammar was initialized.
    #[error("grammar must be initialized before sampling `{name}`")]
    GrammarUninitialized {
        /// Rule whose sampling was rejected.
        name: String,
    },
    /// A rule produced or consumed a value of the wrong shape.
    #[error("rule `{rule}` is malformed: {detail}")]
    MalformedRule {
        /// Name of the offending rule.
        rule: String,
        /// Explanation of the shape mismatch.
        detail: String,
    },
    /// Driver parameters failed validation.
    #[error("invalid driver parameters: {reason}")]
    InvalidDriverParams {
        /// Human-readable explanation of the parameter failure.
        reason: String,
    },
    /// A half-edge map violated a structural invariant after a bijection.
    #[error("half-edge map invariant violated: {0}")]
    InvariantViolation(#[from] MapInvariantViolation),
    /// A half-edge arena operation failed.
    #[error("half-edge operation failed: {0}")]
    HalfEdge(#[from] HalfEdgeError),
}

impl SamplerError {
    /// Retrieve the stable [`SamplerErrorCode`] for this error.
    pub const fn code(&self) -> SamplerErrorCode {
        match self {
            Self::MissingOracleEntry { .. } => SamplerErrorCode::MissingOracleEntry,
            Self::InvalidOracleEntry { .. } => SamplerErrorCode::InvalidOracleEntry,
            Self::DegenerateGrammar { .. } => SamplerErrorCode::DegenerateGrammar,
            Self::BadSeries { .. } => SamplerErrorCode::BadSeries,
            Self::RecursionTooDeep { .. } => SamplerErrorCode::RecursionTooDeep,
            Self::BudgetExhausted { .. } => SamplerErrorCode::BudgetExhausted,
            Self::UnknownRule { .. } => SamplerErrorCode::UnknownRule,
            Self::DuplicateRule { .. } => SamplerErrorCode::DuplicateRule,
            Self::GrammarUninitialized { .. } => SamplerErrorCode::GrammarUninitialized,
            Self::MalformedRule { .. } => SamplerErrorCode::MalformedRule,
            Self::InvalidDriverParams { .. } => SamplerErrorCode::InvalidDriverParams,
            Self::InvariantViolation(_) => SamplerErrorCode::InvariantViolation,
            Self::HalfEdge(_) => SamplerErrorCode::HalfEdgeFailure,
        }
    }

    /// Retrieve the inner [`HalfEdgeErrorCode`] when the error originated in the arena.
    pub const fn half_edge_code(&self) -> Option<HalfEdgeErrorCode> {
        match self {
            Self::HalfEdge(error) => Some(error.code()),
            _ => None,
        }
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, SamplerError>;

#[cfg(test)]
mod tests {
    use super::{HalfEdgeError, HalfEdgeErrorCode, SamplerError, SamplerErrorCode};

    #[test]
    fn half_edge_failures_expose_their_inner_code() {
        let err = SamplerError::from(HalfEdgeError::NotPaired { id: 3 });
        assert_eq!(err.code(), SamplerErrorCode::HalfEdgeFailure);
        assert_eq!(err.half_edge_code(), Some(HalfEdgeErrorCode::NotPaired));
    }

    #[test]
    fn non_arena_failures_have_no_half_edge_code() {
        let err = SamplerError::BadSeries { value: 2.0 };
        assert_eq!(err.code(), SamplerErrorCode::BadSeries);
        assert_eq!(err.half_edge_code(), None);
    }

    #[test]
    fn codes_are_stable_strings() {
        assert_eq!(
            SamplerErrorCode::MissingOracleEntry.as_str(),
            "SAMPLER_MISSING_ORACLE_ENTRY"
        );
        assert_eq!(
            HalfEdgeErrorCode::AlreadyPaired.as_str(),
            "HALF_EDGE_ALREADY_PAIRED"
        );
    }
}
