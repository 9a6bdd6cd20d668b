//! The decomposition grammar: named rules over the sampler algebra.
//!
//! Rules refer to each other through aliases, so a grammar is a mutually
//! recursive system. `init` resolves every alias to a stable rule slot
//! (cycles are permitted; resolution records a back-reference, never an
//! inlining) and validates rule parameters. Sampling then interprets the
//! rule expressions, switching to each rule's registered builder as control
//! crosses rule boundaries.

use std::{cell::RefCell, collections::HashMap, fmt};

use tracing::{debug, trace};

use crate::{
    algebra::{Builder, DefaultBuilder, Value},
    error::{Result, SamplerError},
    oracle::EvaluationOracle,
    sampler::{SampleContext, Sampler, SymbolicPoint},
};

const DEFAULT_BUILDER: usize = 0;

struct Rule {
    name: String,
    sampler: Sampler,
    builder: usize,
}

/// A rule table with builder registration and a single sampling entry point.
///
/// # Examples
/// ```
/// use planarium_core::{
///     DecompositionGrammar, EvaluationOracle, SampleContext, Sampler, SymbolicPoint,
/// };
///
/// let oracle = EvaluationOracle::from_entries([("x", 0.5), ("y", 0.25)])
///     .expect("valid oracle entries");
/// let mut grammar = DecompositionGrammar::new(oracle);
/// grammar
///     .add_rule("pair", Sampler::product(Sampler::LAtom, Sampler::LAtom))
///     .expect("fresh rule name");
/// grammar.init().expect("no unresolved aliases");
///
/// let mut ctx = SampleContext::new(7);
/// let value = grammar
///     .sample("pair", SymbolicPoint::new("x", "y"), &mut ctx)
///     .expect("sampling succeeds");
/// assert_eq!(value.l_size(), 2);
/// ```
pub struct DecompositionGrammar {
    oracle: EvaluationOracle,
    rules: Vec<Rule>,
    names: HashMap<String, usize>,
    builders: Vec<RefCell<Box<dyn Builder>>>,
    eval_cache: RefCell<HashMap<(usize, String, String), f64>>,
    initialized: bool,
}

impl DecompositionGrammar {
    /// Creates an empty grammar over the given oracle.
    #[must_use]
    pub fn new(oracle: EvaluationOracle) -> Self {
        Self {
            oracle,
            rules: Vec::new(),
            names: HashMap::new(),
            builders: vec![RefCell::new(Box::new(DefaultBuilder))],
            eval_cache: RefCell::new(HashMap::new()),
            initialized: false,
        }
    }

    /// The oracle backing this grammar's evaluations.
    #[must_use]
    pub fn oracle(&self) -> &EvaluationOracle {
        &self.oracle
    }

    /// Registers a rule under `name`.
    ///
    /// # Errors
    /// Returns [`SamplerError::DuplicateRule`] when the name is taken.
    pub fn add_rule(&mut self, name: impl Into<String>, sampler: Sampler) -> Result<()> {
        let name = name.into();
        if self.names.contains_key(&name) {
            return Err(SamplerError::DuplicateRule { name });
        }
        let slot = self.rules.len();
        self.names.insert(name.clone(), slot);
        self.rules.push(Rule {
            name,
            sampler,
            builder: DEFAULT_BUILDER,
        });
        self.initialized = false;
        Ok(())
    }

    /// Registers one builder for a group of rules.
    ///
    /// # Errors
    /// Returns [`SamplerError::UnknownRule`] when a rule name is unknown.
    pub fn set_builder(&mut self, rule_names: &[&str], builder: Box<dyn Builder>) -> Result<()> {
        let index = self.builders.len();
        let slots: Vec<usize> = rule_names
            .iter()
            .map(|&name| {
                self.names
                    .get(name)
                    .copied()
                    .ok_or_else(|| SamplerError::UnknownRule {
                        name: name.to_owned(),
                    })
            })
            .collect::<Result<_>>()?;
        self.builders.push(RefCell::new(builder));
        for slot in slots {
            self.rules
                .get_mut(slot)
                .expect("rule slots are created together with name entries")
                .builder = index;
        }
        Ok(())
    }

    /// Resolves aliases to rule slots and validates rule parameters. Must be
    /// called after the last `add_rule` and before sampling.
    ///
    /// # Errors
    /// Returns [`SamplerError::UnknownRule`] for an alias naming no rule and
    /// [`SamplerError::MalformedRule`] for invalid rule parameters.
    pub fn init(&mut self) -> Result<()> {
        let names = &self.names;
        let mut missing: Option<String> = None;
        let mut bad_alpha: Option<(String, f64)> = None;
        for rule in &mut self.rules {
            let rule_name = rule.name.clone();
            rule.sampler.visit_mut(&mut |node| match node {
                Sampler::Alias { name, slot } => match names.get(name.as_str()) {
                    Some(&index) => *slot = Some(index),
                    None => {
                        if missing.is_none() {
                            missing = Some(name.clone());
                        }
                    }
                },
                Sampler::LDerFromUDer { alpha_l_u, .. } => {
                    if !(*alpha_l_u > 0.0 && alpha_l_u.is_finite()) && bad_alpha.is_none() {
                        bad_alpha = Some((rule_name.clone(), *alpha_l_u));
                    }
                }
                _ => {}
            });
        }
        if let Some(name) = missing {
            return Err(SamplerError::UnknownRule { name });
        }
        if let Some((rule, alpha)) = bad_alpha {
            return Err(SamplerError::MalformedRule {
                rule,
                detail: format!("acceptance weight alpha_l_u must be positive, got {alpha}"),
            });
        }
        self.eval_cache.borrow_mut().clear();
        self.initialized = true;
        debug!(rules = self.rules.len(), "grammar initialized");
        Ok(())
    }

    /// Names of the registered rules, in registration order.
    pub fn rule_names(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|rule| rule.name.as_str())
    }

    /// Returns whether `name` is a registered rule.
    #[must_use]
    pub fn has_rule(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    /// Samples the rule registered under `name` at the symbolic `point`.
    ///
    /// # Errors
    /// Returns [`SamplerError::UnknownRule`] for unregistered names,
    /// [`SamplerError::GrammarUninitialized`] before `init`, and propagates
    /// every sampling failure.
    pub fn sample(
        &self,
        name: &str,
        point: SymbolicPoint<'_>,
        ctx: &mut SampleContext,
    ) -> Result<Value> {
        if !self.initialized {
            return Err(SamplerError::GrammarUninitialized {
                name: name.to_owned(),
            });
        }
        let slot = self.slot(name)?;
        self.sample_slot(slot, point, ctx)
    }

    /// Evaluates the body of the rule registered under `name` at `point`.
    ///
    /// Evaluations are memoized per `(rule, x, y)` until the next `init`.
    ///
    /// # Errors
    /// Propagates oracle misses and series divergences.
    pub fn eval(&self, name: &str, point: SymbolicPoint<'_>) -> Result<f64> {
        let slot = self.slot(name)?;
        let key = (slot, point.x.to_owned(), point.y.to_owned());
        if let Some(&cached) = self.eval_cache.borrow().get(&key) {
            return Ok(cached);
        }
        let rule = self
            .rules
            .get(slot)
            .expect("rule slots are created together with name entries");
        let value = rule.sampler.eval(self, point)?;
        self.eval_cache.borrow_mut().insert(key, value);
        Ok(value)
    }

    fn slot(&self, name: &str) -> Result<usize> {
        self.names
            .get(name)
            .copied()
            .ok_or_else(|| SamplerError::UnknownRule {
                name: name.to_owned(),
            })
    }

    pub(crate) fn sample_slot(
        &self,
        slot: usize,
        point: SymbolicPoint<'_>,
        ctx: &mut SampleContext,
    ) -> Result<Value> {
        ctx.descend()?;
        let rule = self
            .rules
            .get(slot)
            .expect("alias slots are resolved against this grammar's rule table");
        trace!(rule = rule.name.as_str(), depth = ctx.depth(), "sampling rule");
        let result = rule
            .sampler
            .sample(self, &rule.name, rule.builder, point, ctx);
        ctx.ascend();
        result
    }

    pub(crate) fn with_builder<R>(&self, index: usize, f: impl FnOnce(&mut dyn Builder) -> R) -> R {
        let mut builder = self
            .builders
            .get(index)
            .expect("builder indices are assigned by set_builder")
            .borrow_mut();
        f(builder.as_mut())
    }
}

impl fmt::Debug for DecompositionGrammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecompositionGrammar")
            .field("rules", &self.rules.iter().map(|r| &r.name).collect::<Vec<_>>())
            .field("builders", &self.builders.len())
            .field("initialized", &self.initialized)
            .finish_non_exhaustive()
    }
}
