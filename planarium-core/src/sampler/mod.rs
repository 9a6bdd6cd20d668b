//! The sampler algebra and its interpreter.
//!
//! A [`Sampler`] is a node of a rule expression: atoms at the leaves, sums,
//! products, sets, sequences and cycles in the interior, transformations and
//! bijections at the seams, and aliases referring back into the grammar's
//! rule table. Sampling draws a value according to the Boltzmann branching
//! probabilities; evaluation reports the generating-function value the
//! probabilities are derived from.

mod context;
mod distributions;

use std::ops::{Add, Mul};

pub use self::context::{DEFAULT_MAX_DEPTH, SampleContext};
pub use self::distributions::exp_tail;
use self::distributions::{bernoulli, geometric, logarithmic, poisson_tail};
use crate::{
    algebra::{Derivation, SumBranch, Value},
    error::{Result, SamplerError},
    grammar::DecompositionGrammar,
    oracle::EvaluationOracle,
};

/// The symbolic `(x, y)` parameter pair a grammar is sampled at. Both are
/// expression strings understood by the oracle, e.g. `"x*G_1_dx(x,y)"`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SymbolicPoint<'a> {
    /// Expression standing in for the labeled-atom parameter.
    pub x: &'a str,
    /// Expression standing in for the unlabeled-atom parameter.
    pub y: &'a str,
}

impl<'a> SymbolicPoint<'a> {
    /// Bundles the two parameter expressions.
    #[must_use]
    pub const fn new(x: &'a str, y: &'a str) -> Self {
        Self { x, y }
    }
}

/// A value-to-value hook applied by bijection and transformation samplers.
pub type ValueMap = fn(Value, &mut SampleContext) -> Result<Value>;

/// Rewrites an inner evaluation into the transformed rule's evaluation.
pub type EvalTransform = fn(f64, SymbolicPoint<'_>, &EvaluationOracle) -> Result<f64>;

/// One node of a rule expression.
#[derive(Clone, Debug)]
pub enum Sampler {
    /// Emits a zero atom; evaluates to 1.
    ZeroAtom,
    /// Emits a labeled atom; evaluates to `oracle(x)`.
    LAtom,
    /// Emits an unlabeled atom; evaluates to `oracle(y)`.
    UAtom,
    /// Draws one branch with probability proportional to its evaluation.
    Sum(Box<Sampler>, Box<Sampler>),
    /// Draws both factors independently.
    Product(Box<Sampler>, Box<Sampler>),
    /// Draws a Poisson-distributed number of children, truncated below.
    Set {
        /// Minimum number of children.
        min: usize,
        /// Child expression.
        inner: Box<Sampler>,
    },
    /// Draws a geometric number of children.
    Sequence(Box<Sampler>),
    /// Draws a logarithmic number of children, identified up to rotation.
    Cycle(Box<Sampler>),
    /// Samples the inner expression and applies a size-preserving map.
    Bijection {
        /// Inner expression.
        inner: Box<Sampler>,
        /// Size-preserving rewrite of the sampled value.
        map: ValueMap,
    },
    /// Like [`Sampler::Bijection`], with an explicit evaluation rewrite.
    Transformation {
        /// Inner expression.
        inner: Box<Sampler>,
        /// Rewrite of the sampled value.
        map: ValueMap,
        /// Rewrite of the inner evaluation; `None` keeps it unchanged.
        eval_transform: Option<EvalTransform>,
    },
    /// Turns a u-derived sampler into an l-derived one by rejection.
    LDerFromUDer {
        /// The u-derived inner expression.
        inner: Box<Sampler>,
        /// Grammar-specific acceptance weight; any positive real.
        alpha_l_u: f64,
    },
    /// Reference to another rule of the grammar, resolved at `init`.
    Alias {
        /// Name of the referenced rule.
        name: String,
        /// Slot back-reference, filled in by grammar initialization.
        slot: Option<usize>,
    },
}

impl Sampler {
    /// Sum of two expressions.
    #[must_use]
    pub fn sum(left: Self, right: Self) -> Self {
        Self::Sum(Box::new(left), Box::new(right))
    }

    /// Product of two expressions.
    #[must_use]
    pub fn product(left: Self, right: Self) -> Self {
        Self::Product(Box::new(left), Box::new(right))
    }

    /// Set of at least `min` children.
    #[must_use]
    pub fn set(min: usize, inner: Self) -> Self {
        Self::Set {
            min,
            inner: Box::new(inner),
        }
    }

    /// Sequence of children.
    #[must_use]
    pub fn sequence(inner: Self) -> Self {
        Self::Sequence(Box::new(inner))
    }

    /// Cycle of children.
    #[must_use]
    pub fn cycle(inner: Self) -> Self {
        Self::Cycle(Box::new(inner))
    }

    /// Applies a size-preserving bijection to the sampled value.
    #[must_use]
    pub fn bijection(inner: Self, map: ValueMap) -> Self {
        Self::Bijection {
            inner: Box::new(inner),
            map,
        }
    }

    /// Applies a rewrite with an explicit evaluation transform.
    #[must_use]
    pub fn transformation(inner: Self, map: ValueMap, eval_transform: EvalTransform) -> Self {
        Self::Transformation {
            inner: Box::new(inner),
            map,
            eval_transform: Some(eval_transform),
        }
    }

    /// Applies a rewrite that keeps the inner evaluation.
    #[must_use]
    pub fn retagging(inner: Self, map: ValueMap) -> Self {
        Self::Transformation {
            inner: Box::new(inner),
            map,
            eval_transform: None,
        }
    }

    /// Rejection sampler deriving an l-derived class from a u-derived one.
    #[must_use]
    pub fn l_der_from_u_der(inner: Self, alpha_l_u: f64) -> Self {
        Self::LDerFromUDer {
            inner: Box::new(inner),
            alpha_l_u,
        }
    }

    /// Reference to the rule registered under `name`.
    #[must_use]
    pub fn alias(name: impl Into<String>) -> Self {
        Self::Alias {
            name: name.into(),
            slot: None,
        }
    }

    /// Generating-function value of this expression at `point`.
    ///
    /// Aliases are looked up in the oracle under their `Name(x,y)` key, which
    /// is what keeps evaluation of mutually recursive rule systems finite.
    ///
    /// # Errors
    /// Propagates oracle misses; returns [`SamplerError::BadSeries`] for
    /// sequences and cycles evaluated at or beyond 1.
    pub fn eval(&self, grammar: &DecompositionGrammar, point: SymbolicPoint<'_>) -> Result<f64> {
        let oracle = grammar.oracle();
        match self {
            Self::ZeroAtom => Ok(1.0),
            Self::LAtom => oracle.get(point.x),
            Self::UAtom => oracle.get(point.y),
            Self::Sum(left, right) => Ok(left.eval(grammar, point)? + right.eval(grammar, point)?),
            Self::Product(left, right) => {
                Ok(left.eval(grammar, point)? * right.eval(grammar, point)?)
            }
            Self::Set { min, inner } => Ok(exp_tail(*min, inner.eval(grammar, point)?)),
            Self::Sequence(inner) => {
                let q = convergent(inner.eval(grammar, point)?)?;
                Ok(1.0 / (1.0 - q))
            }
            Self::Cycle(inner) => {
                let q = convergent(inner.eval(grammar, point)?)?;
                Ok(-(1.0 - q).ln())
            }
            Self::Bijection { inner, .. } => inner.eval(grammar, point),
            Self::Transformation {
                inner,
                eval_transform,
                ..
            } => {
                let value = inner.eval(grammar, point)?;
                match eval_transform {
                    Some(transform) => transform(value, point, oracle),
                    None => Ok(value),
                }
            }
            Self::LDerFromUDer { inner, alpha_l_u } => {
                // Formal derivation rule: A_dx = α · (y/x) · A_dy.
                let x_value = oracle.get(point.x)?;
                let y_value = oracle.get(point.y)?;
                if x_value <= 0.0 {
                    return Err(SamplerError::DegenerateGrammar {
                        detail: format!("l-derivation at zero x parameter `{}`", point.x),
                    });
                }
                Ok(alpha_l_u * (y_value / x_value) * inner.eval(grammar, point)?)
            }
            Self::Alias { name, .. } => {
                oracle.get(&EvaluationOracle::alias_key(name, point.x, point.y))
            }
        }
    }

    /// Draws one value from this expression.
    ///
    /// `rule` names the enclosing grammar rule for error context; `builder`
    /// is that rule's builder slot.
    pub(crate) fn sample(
        &self,
        grammar: &DecompositionGrammar,
        rule: &str,
        builder: usize,
        point: SymbolicPoint<'_>,
        ctx: &mut SampleContext,
    ) -> Result<Value> {
        match self {
            Self::ZeroAtom => grammar.with_builder(builder, |b| b.zero_atom(ctx)),
            Self::LAtom => grammar.with_builder(builder, |b| b.l_atom(ctx)),
            Self::UAtom => grammar.with_builder(builder, |b| b.u_atom(ctx)),
            Self::Sum(left, right) => {
                let left_weight = underflow_to_zero(left.eval(grammar, point)?);
                let right_weight = underflow_to_zero(right.eval(grammar, point)?);
                let total = left_weight + right_weight;
                if total <= 0.0 {
                    return Err(SamplerError::DegenerateGrammar {
                        detail: format!("both branches of `{rule}` have zero weight"),
                    });
                }
                // A zero-weight branch is never taken, regardless of the draw.
                let take_left = if left_weight <= 0.0 {
                    false
                } else if right_weight <= 0.0 {
                    true
                } else {
                    bernoulli(ctx.rng(), left_weight / total)
                };
                let (branch, chosen) = if take_left {
                    (SumBranch::Left, left)
                } else {
                    (SumBranch::Right, right)
                };
                let inner = chosen.sample(grammar, rule, builder, point, ctx)?;
                Ok(Value::Sum {
                    branch,
                    inner: Box::new(inner),
                })
            }
            Self::Product(left, right) => {
                let left_value = left.sample(grammar, rule, builder, point, ctx)?;
                let right_value = right.sample(grammar, rule, builder, point, ctx)?;
                grammar.with_builder(builder, |b| b.product(left_value, right_value, ctx))
            }
            Self::Set { min, inner } => {
                let rate = inner.eval(grammar, point)?;
                let count = poisson_tail(ctx.rng(), *min, rate)?;
                let items = inner.sample_repeatedly(grammar, rule, builder, point, ctx, count)?;
                grammar.with_builder(builder, |b| b.set(items, ctx))
            }
            Self::Sequence(inner) => {
                let q = convergent(inner.eval(grammar, point)?)?;
                let count = geometric(ctx.rng(), q);
                let items = inner.sample_repeatedly(grammar, rule, builder, point, ctx, count)?;
                grammar.with_builder(builder, |b| b.sequence(items, ctx))
            }
            Self::Cycle(inner) => {
                let q = convergent(inner.eval(grammar, point)?)?;
                if q <= 0.0 {
                    return Err(SamplerError::DegenerateGrammar {
                        detail: format!("cycle in `{rule}` has zero weight"),
                    });
                }
                let count = logarithmic(ctx.rng(), q);
                let items = inner.sample_repeatedly(grammar, rule, builder, point, ctx, count)?;
                grammar.with_builder(builder, |b| b.cycle(items, ctx))
            }
            Self::Bijection { inner, map } => {
                let value = inner.sample(grammar, rule, builder, point, ctx)?;
                map(value, ctx)
            }
            Self::Transformation { inner, map, .. } => {
                let value = inner.sample(grammar, rule, builder, point, ctx)?;
                map(value, ctx)
            }
            Self::LDerFromUDer { inner, alpha_l_u } => {
                loop {
                    let candidate = inner.sample(grammar, rule, builder, point, ctx)?;
                    let l = candidate.l_size() as f64;
                    let u = candidate.u_size() as f64;
                    let weight = alpha_l_u * l;
                    if weight + u <= 0.0 {
                        return Err(SamplerError::DegenerateGrammar {
                            detail: format!("l-from-u derivation in `{rule}` saw an empty object"),
                        });
                    }
                    if !bernoulli(ctx.rng(), weight / (weight + u)) {
                        continue;
                    }
                    // Flip the derivation marker over the same object.
                    let Value::Derived {
                        kind: Derivation::Unlabeled,
                        inner: base,
                    } = candidate
                    else {
                        return Err(SamplerError::MalformedRule {
                            rule: rule.to_owned(),
                            detail: "l-from-u derivation expects a u-derived inner value".into(),
                        });
                    };
                    return Ok(Value::Derived {
                        kind: Derivation::Labeled,
                        inner: base,
                    });
                }
            }
            Self::Alias { name, slot } => {
                let slot = slot.ok_or_else(|| SamplerError::GrammarUninitialized {
                    name: name.clone(),
                })?;
                grammar.sample_slot(slot, point, ctx)
            }
        }
    }

    /// Draws `count` independent values from this expression.
    fn sample_repeatedly(
        &self,
        grammar: &DecompositionGrammar,
        rule: &str,
        builder: usize,
        point: SymbolicPoint<'_>,
        ctx: &mut SampleContext,
        count: usize,
    ) -> Result<Vec<Value>> {
        let mut items = Vec::with_capacity(count);
        for _ in 0..count {
            items.push(self.sample(grammar, rule, builder, point, ctx)?);
        }
        Ok(items)
    }

    /// Walks the expression, applying `f` to every node.
    pub(crate) fn visit_mut(&mut self, f: &mut impl FnMut(&mut Self)) {
        f(self);
        match self {
            Self::ZeroAtom | Self::LAtom | Self::UAtom | Self::Alias { .. } => {}
            Self::Sum(left, right) | Self::Product(left, right) => {
                left.visit_mut(f);
                right.visit_mut(f);
            }
            Self::Set { inner, .. }
            | Self::Sequence(inner)
            | Self::Cycle(inner)
            | Self::Bijection { inner, .. }
            | Self::Transformation { inner, .. }
            | Self::LDerFromUDer { inner, .. } => inner.visit_mut(f),
        }
    }
}

impl Add for Sampler {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::sum(self, rhs)
    }
}

impl Mul for Sampler {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self::product(self, rhs)
    }
}

/// Validates a series argument, treating values at or beyond 1 as fatal.
fn convergent(q: f64) -> Result<f64> {
    if q >= 1.0 || !q.is_finite() {
        return Err(SamplerError::BadSeries { value: q });
    }
    Ok(q)
}

/// Branch weights below the subnormal threshold count as zero mass.
fn underflow_to_zero(weight: f64) -> f64 {
    if weight.is_finite() && weight >= f64::MIN_POSITIVE {
        weight
    } else {
        0.0
    }
}
