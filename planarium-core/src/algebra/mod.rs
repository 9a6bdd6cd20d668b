//! The sampler value algebra and the builder seam between algebraic values
//! and half-edge domain objects.

mod builder;
mod value;

pub use self::{
    builder::{Builder, DefaultBuilder},
    value::{CollectionKind, Derivation, SumBranch, Value},
};
