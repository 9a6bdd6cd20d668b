//! Structural bijections on half-edge maps.
//!
//! These operations compose networks, substitute edges and close dissections.
//! Every bijection must leave the touched map consistent: in debug builds
//! each one re-runs the structural checker on its result before handing it
//! back.

mod closure;
mod parallel;
mod primal;
mod series;
mod substitution;

pub use self::{
    closure::{complete_closure, partial_closure},
    parallel::merge_in_parallel,
    primal::primal_map,
    series::merge_in_series,
    substitution::{replace_u_atoms, substitute_edge_by_network},
};

use crate::{
    error::Result,
    halfedge::{HalfEdgeArena, HalfEdgeId},
};

/// Debug-build recheck of the structural invariants after a bijection.
pub(crate) fn debug_check_map(arena: &HalfEdgeArena, root: HalfEdgeId) -> Result<()> {
    #[cfg(debug_assertions)]
    crate::halfedge::MapChecker::new(arena, root).check_all()?;
    #[cfg(not(debug_assertions))]
    let _ = (arena, root);
    Ok(())
}
