//! Builder hooks that turn algebraic values into domain objects.
//!
//! A builder is registered against a set of grammar rules; whenever one of
//! those rules produces an atom, product or collection, the matching hook is
//! invoked with the already-sampled children. The contract is size
//! preservation: the returned domain object must report the same `l_size`
//! and `u_size` as the algebraic value it replaces.

use crate::{
    algebra::value::{CollectionKind, Value},
    error::Result,
    sampler::SampleContext,
};

/// Assembly hooks keyed by algebraic variant.
///
/// Every hook has a pass-through default, so builders implement only the
/// variants they care about. Hooks receive the sampling context to draw
/// fresh vertex ids from the shared counter.
pub trait Builder {
    /// Called when a rule emits a zero atom.
    fn zero_atom(&mut self, ctx: &mut SampleContext) -> Result<Value> {
        let _ = ctx;
        Ok(Value::ZeroAtom)
    }

    /// Called when a rule emits a labeled atom. The default draws a fresh
    /// vertex id from the context counter.
    fn l_atom(&mut self, ctx: &mut SampleContext) -> Result<Value> {
        Ok(Value::LAtom(ctx.next_vertex()))
    }

    /// Called when a rule emits an unlabeled atom.
    fn u_atom(&mut self, ctx: &mut SampleContext) -> Result<Value> {
        let _ = ctx;
        Ok(Value::UAtom)
    }

    /// Called with both children of a product rule.
    fn product(&mut self, left: Value, right: Value, ctx: &mut SampleContext) -> Result<Value> {
        let _ = ctx;
        Ok(Value::Product(Box::new(left), Box::new(right)))
    }

    /// Called with the children of a set rule.
    fn set(&mut self, items: Vec<Value>, ctx: &mut SampleContext) -> Result<Value> {
        let _ = ctx;
        Ok(Value::Collection {
            kind: CollectionKind::Set,
            items,
        })
    }

    /// Called with the children of a sequence rule, in draw order.
    fn sequence(&mut self, items: Vec<Value>, ctx: &mut SampleContext) -> Result<Value> {
        let _ = ctx;
        Ok(Value::Collection {
            kind: CollectionKind::Sequence,
            items,
        })
    }

    /// Called with the children of a cycle rule; the rotation start is not
    /// distinguished.
    fn cycle(&mut self, items: Vec<Value>, ctx: &mut SampleContext) -> Result<Value> {
        let _ = ctx;
        Ok(Value::Collection {
            kind: CollectionKind::Cycle,
            items,
        })
    }
}

/// Builder that leaves every algebraic value unchanged.
#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultBuilder;

impl Builder for DefaultBuilder {}
