//! Mutable state threaded through one sampling run.
//!
//! The random-number generator and the monotonic vertex counter are shared by
//! every rule of a grammar, so they live in an explicit context value rather
//! than ambient globals. The context also carries the recursion-depth guard
//! that stands in for platform stack probing.

use rand::{SeedableRng, rngs::SmallRng};

use crate::{
    error::{Result, SamplerError},
    halfedge::VertexId,
};

/// Default bound on rule-to-rule recursion depth.
pub const DEFAULT_MAX_DEPTH: usize = 4096;

/// Explicit sampling state: seeded RNG, vertex counter and depth guard.
///
/// One context is created per sampling session and reused across rejection
/// attempts; the counter keeps increasing so vertex ids never collide between
/// a discarded attempt and its successor.
#[derive(Clone, Debug)]
pub struct SampleContext {
    rng: SmallRng,
    vertex_counter: u64,
    depth: usize,
    max_depth: usize,
}

impl SampleContext {
    /// Creates a context with the default depth limit.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self::with_depth_limit(seed, DEFAULT_MAX_DEPTH)
    }

    /// Creates a context with an explicit depth limit.
    #[must_use]
    pub fn with_depth_limit(seed: u64, max_depth: usize) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            vertex_counter: 0,
            depth: 0,
            max_depth,
        }
    }

    /// Draws the next vertex id from the monotonic counter.
    pub fn next_vertex(&mut self) -> VertexId {
        let id = VertexId::new(self.vertex_counter);
        self.vertex_counter += 1;
        id
    }

    /// Number of vertex ids drawn so far.
    #[must_use]
    pub fn vertices_drawn(&self) -> u64 {
        self.vertex_counter
    }

    /// The sampling RNG.
    pub fn rng(&mut self) -> &mut SmallRng {
        &mut self.rng
    }

    /// Current rule-to-rule recursion depth.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The depth limit in force.
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Enters one level of rule recursion.
    ///
    /// # Errors
    /// Returns [`SamplerError::RecursionTooDeep`] once the limit is hit; the
    /// rejection driver treats that as a discarded attempt.
    pub(crate) fn descend(&mut self) -> Result<()> {
        if self.depth >= self.max_depth {
            return Err(SamplerError::RecursionTooDeep {
                limit: self.max_depth,
            });
        }
        self.depth += 1;
        Ok(())
    }

    /// Leaves one level of rule recursion.
    pub(crate) fn ascend(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    /// Resets the depth guard at the start of a fresh attempt. Unwinding from
    /// [`SamplerError::RecursionTooDeep`] skips the paired
    /// [`SampleContext::ascend`] calls, so the driver clears the guard before
    /// retrying.
    pub fn reset_depth(&mut self) {
        self.depth = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::SampleContext;
    use crate::error::SamplerError;

    #[test]
    fn vertex_ids_are_strictly_increasing() {
        let mut ctx = SampleContext::new(42);
        let a = ctx.next_vertex();
        let b = ctx.next_vertex();
        let c = ctx.next_vertex();
        assert!(a < b && b < c);
        assert_eq!(ctx.vertices_drawn(), 3);
    }

    #[test]
    fn depth_guard_trips_at_the_limit() {
        let mut ctx = SampleContext::with_depth_limit(0, 2);
        ctx.descend().expect("depth 1");
        ctx.descend().expect("depth 2");
        let err = ctx.descend().expect_err("limit reached");
        assert!(matches!(err, SamplerError::RecursionTooDeep { limit: 2 }));
        ctx.reset_depth();
        ctx.descend().expect("guard cleared");
    }
}
