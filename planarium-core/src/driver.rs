//! Rejection driver: size-windowed sampling on top of the grammar.
//!
//! One rejection attempt is a full recursive-descent sample of the root
//! rule. The driver measures the configured size of the result, accepts it
//! inside the target window and otherwise retries. Depth-guard trips are
//! recoverable: the attempt is discarded and the driver tries again.

use std::num::NonZeroUsize;

use tracing::{debug, info, instrument, warn};

use crate::{
    algebra::Value,
    error::{Result, SamplerError},
    grammar::DecompositionGrammar,
    sampler::{DEFAULT_MAX_DEPTH, SampleContext, SymbolicPoint},
};

/// Which size the acceptance window is measured against.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SizeMetric {
    /// Accept on `l_size` (labeled atoms).
    Labeled,
    /// Accept on `u_size` (unlabeled atoms).
    Unlabeled,
}

impl SizeMetric {
    /// Measures a sampled value.
    #[must_use]
    pub fn measure(self, value: &Value) -> usize {
        match self {
            Self::Labeled => value.l_size(),
            Self::Unlabeled => value.u_size(),
        }
    }
}

/// Configuration of the rejection driver.
///
/// # Examples
/// ```
/// use planarium_core::{DriverParams, SizeMetric};
///
/// let params = DriverParams::new("x", "y")
///     .with_metric(SizeMetric::Labeled)
///     .with_seed(13)
///     .with_max_attempts(1_000);
/// assert_eq!(params.metric(), SizeMetric::Labeled);
/// ```
#[derive(Clone, Debug)]
pub struct DriverParams {
    x: String,
    y: String,
    metric: SizeMetric,
    max_attempts: Option<NonZeroUsize>,
    max_depth: usize,
    seed: u64,
}

impl DriverParams {
    /// Creates driver parameters for the symbolic `(x, y)` pair, with the
    /// unlabeled-size metric, no attempt bound, the default depth limit and
    /// seed 0.
    #[must_use]
    pub fn new(x: impl Into<String>, y: impl Into<String>) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
            metric: SizeMetric::Unlabeled,
            max_attempts: None,
            max_depth: DEFAULT_MAX_DEPTH,
            seed: 0,
        }
    }

    /// Selects the size the acceptance window applies to.
    #[must_use]
    pub fn with_metric(mut self, metric: SizeMetric) -> Self {
        self.metric = metric;
        self
    }

    /// Bounds the number of rejection attempts; zero means unbounded.
    #[must_use]
    pub fn with_max_attempts(mut self, max_attempts: usize) -> Self {
        self.max_attempts = NonZeroUsize::new(max_attempts);
        self
    }

    /// Overrides the recursion depth limit of each attempt.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Seeds the sampling RNG.
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// The symbolic labeled-atom parameter expression.
    #[must_use]
    pub fn x(&self) -> &str {
        &self.x
    }

    /// The symbolic unlabeled-atom parameter expression.
    #[must_use]
    pub fn y(&self) -> &str {
        &self.y
    }

    /// The configured size metric.
    #[must_use]
    pub fn metric(&self) -> SizeMetric {
        self.metric
    }

    /// The configured attempt bound, if any.
    #[must_use]
    pub fn max_attempts(&self) -> Option<NonZeroUsize> {
        self.max_attempts
    }

    /// The configured recursion depth limit.
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// The configured RNG seed.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    fn point(&self) -> SymbolicPoint<'_> {
        SymbolicPoint::new(&self.x, &self.y)
    }
}

/// Entry point for size-windowed sampling from a grammar.
#[derive(Debug)]
pub struct RejectionSampler<'g> {
    grammar: &'g DecompositionGrammar,
    params: DriverParams,
}

impl<'g> RejectionSampler<'g> {
    /// Binds driver parameters to an initialized grammar.
    #[must_use]
    pub fn new(grammar: &'g DecompositionGrammar, params: DriverParams) -> Self {
        Self { grammar, params }
    }

    /// Samples `class_name` until the configured size lands inside
    /// `[target · (1 − tolerance), target · (1 + tolerance)]`.
    ///
    /// # Errors
    /// Returns [`SamplerError::InvalidDriverParams`] for a negative or
    /// non-finite tolerance, [`SamplerError::BudgetExhausted`] past the
    /// attempt bound, and propagates every fatal grammar failure.
    /// [`SamplerError::RecursionTooDeep`] is absorbed: the attempt is
    /// discarded and retried.
    #[instrument(
        name = "driver.sample_class",
        err,
        skip(self),
        fields(seed = self.params.seed),
    )]
    pub fn sample_class(
        &self,
        class_name: &str,
        target_size: usize,
        tolerance: f64,
    ) -> Result<Value> {
        let mut ctx = SampleContext::with_depth_limit(self.params.seed, self.params.max_depth);
        self.sample_class_with(class_name, target_size, tolerance, &mut ctx)
    }

    /// Like [`RejectionSampler::sample_class`], reusing an existing context
    /// so vertex ids keep increasing across driver calls.
    ///
    /// # Errors
    /// See [`RejectionSampler::sample_class`].
    pub fn sample_class_with(
        &self,
        class_name: &str,
        target_size: usize,
        tolerance: f64,
        ctx: &mut SampleContext,
    ) -> Result<Value> {
        if !(tolerance.is_finite() && tolerance >= 0.0) {
            return Err(SamplerError::InvalidDriverParams {
                reason: format!("tolerance must be finite and nonnegative, got {tolerance}"),
            });
        }
        let target = target_size as f64;
        let lower = target * (1.0 - tolerance);
        let upper = target * (1.0 + tolerance);

        let mut attempts = 0usize;
        loop {
            if let Some(bound) = self.params.max_attempts {
                if attempts >= bound.get() {
                    return Err(SamplerError::BudgetExhausted { attempts });
                }
            }
            attempts += 1;
            ctx.reset_depth();
            match self.grammar.sample(class_name, self.params.point(), ctx) {
                Ok(value) => {
                    let size = self.params.metric.measure(&value);
                    let measured = size as f64;
                    if lower <= measured && measured <= upper {
                        info!(attempts, size, "accepted sample");
                        return Ok(value);
                    }
                    debug!(attempt = attempts, size, "size outside acceptance window");
                }
                Err(SamplerError::RecursionTooDeep { limit }) => {
                    warn!(attempt = attempts, limit, "discarding attempt: depth limit hit");
                }
                Err(fatal) => return Err(fatal),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{DriverParams, RejectionSampler, SizeMetric};
    use crate::{
        error::SamplerError,
        grammar::DecompositionGrammar,
        oracle::EvaluationOracle,
        sampler::Sampler,
    };

    fn atom_grammar() -> DecompositionGrammar {
        let oracle =
            EvaluationOracle::from_entries([("x", 0.5), ("y", 0.5)]).expect("valid entries");
        let mut grammar = DecompositionGrammar::new(oracle);
        grammar
            .add_rule("pair", Sampler::product(Sampler::LAtom, Sampler::LAtom))
            .expect("fresh name");
        grammar.init().expect("no aliases");
        grammar
    }

    #[test]
    fn accepts_a_sample_inside_the_window() {
        let grammar = atom_grammar();
        let params = DriverParams::new("x", "y").with_metric(SizeMetric::Labeled);
        let driver = RejectionSampler::new(&grammar, params);
        let value = driver.sample_class("pair", 2, 0.0).expect("always size 2");
        assert_eq!(value.l_size(), 2);
    }

    #[test]
    fn exhausts_the_budget_on_an_unreachable_target() {
        let grammar = atom_grammar();
        let params = DriverParams::new("x", "y")
            .with_metric(SizeMetric::Labeled)
            .with_max_attempts(25);
        let driver = RejectionSampler::new(&grammar, params);
        let err = driver
            .sample_class("pair", 100, 0.1)
            .expect_err("size 2 never reaches 100");
        assert!(matches!(err, SamplerError::BudgetExhausted { attempts: 25 }));
    }

    #[test]
    fn rejects_invalid_tolerances() {
        let grammar = atom_grammar();
        let driver = RejectionSampler::new(&grammar, DriverParams::new("x", "y"));
        for tolerance in [-0.1, f64::NAN, f64::INFINITY] {
            let err = driver
                .sample_class("pair", 10, tolerance)
                .expect_err("tolerance must be validated");
            assert!(matches!(err, SamplerError::InvalidDriverParams { .. }));
        }
    }
}
