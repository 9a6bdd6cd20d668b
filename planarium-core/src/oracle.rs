//! Evaluation oracle: a read-only mapping from symbolic generating-function
//! expressions to their numeric values at the chosen Boltzmann parameters.
//!
//! The oracle is populated once, before sampling, from an externally computed
//! table. The grammar queries it for atom weights (the `x` and `y` parameter
//! expressions) and for the values of recursively defined rules, looked up
//! under keys of the form `Name(x,y)`.

use std::collections::HashMap;

use crate::error::{Result, SamplerError};

/// Read-only table of generating-function evaluations.
///
/// Keys are symbolic expression strings such as `"x*G_1_dx(x,y)"`; values are
/// nonnegative finite floats. Unknown keys fail with
/// [`SamplerError::MissingOracleEntry`], which indicates a programming error
/// in the grammar rather than a recoverable condition.
///
/// # Examples
/// ```
/// use planarium_core::EvaluationOracle;
///
/// let oracle = EvaluationOracle::from_entries([("x", 0.25), ("y", 0.5)])
///     .expect("entries are nonnegative and finite");
/// assert_eq!(oracle.get("y").expect("registered"), 0.5);
/// assert!(oracle.get("z").is_err());
/// ```
#[derive(Clone, Debug, Default)]
pub struct EvaluationOracle {
    entries: HashMap<String, f64>,
}

impl EvaluationOracle {
    /// Creates an empty oracle.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an oracle from `(expression, value)` pairs.
    ///
    /// # Errors
    /// Returns [`SamplerError::InvalidOracleEntry`] when a value is negative
    /// or non-finite.
    pub fn from_entries<K, I>(entries: I) -> Result<Self>
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, f64)>,
    {
        let mut oracle = Self::new();
        for (expr, value) in entries {
            oracle.insert(expr, value)?;
        }
        Ok(oracle)
    }

    /// Registers one evaluation, replacing any previous entry for `expr`.
    ///
    /// # Errors
    /// Returns [`SamplerError::InvalidOracleEntry`] when `value` is negative
    /// or non-finite.
    pub fn insert(&mut self, expr: impl Into<String>, value: f64) -> Result<()> {
        let expr = expr.into();
        if !value.is_finite() || value < 0.0 {
            return Err(SamplerError::InvalidOracleEntry { expr, value });
        }
        self.entries.insert(expr, value);
        Ok(())
    }

    /// Looks up the value of a symbolic expression.
    ///
    /// # Errors
    /// Returns [`SamplerError::MissingOracleEntry`] for unknown expressions.
    pub fn get(&self, expr: &str) -> Result<f64> {
        self.entries
            .get(expr)
            .copied()
            .ok_or_else(|| SamplerError::MissingOracleEntry {
                expr: expr.to_owned(),
            })
    }

    /// Returns whether the oracle knows `expr`.
    #[must_use]
    pub fn contains(&self, expr: &str) -> bool {
        self.entries.contains_key(expr)
    }

    /// Number of registered expressions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the oracle has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Builds the lookup key under which a recursively defined rule is
    /// evaluated, e.g. `alias_key("G_2_dx", "x", "y")` yields `"G_2_dx(x,y)"`.
    #[must_use]
    pub fn alias_key(name: &str, x: &str, y: &str) -> String {
        format!("{name}({x},{y})")
    }
}
