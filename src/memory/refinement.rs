//! Refinement of shared-memory programs under release-acquire semantics.

use log::debug;

use crate::error::Result;
use crate::memory::release_acquire::ReleaseAcquireModel;
use crate::order::PartialOrderModel;
use crate::partial_string::PartialString;
use crate::refinement::{PartialStringChecker, Refinement, Statistics};
use crate::smt::Solver;

/// Does `x` refine `y` when `y` must also be a release-acquire consistent
/// execution?
///
/// The memory axioms of `y` are stated over `y`'s events mapped into `x`'s
/// order, so `x` must supply every synchronization `y` relies on. Two
/// release stores to one address are thus never concurrent in `x`, even
/// without loads.
#[derive(Debug)]
pub struct MemoryRefinement<S> {
    refinement: Refinement<S, PartialOrderModel>,
    release_acquire: ReleaseAcquireModel,
}

impl<S: Solver> MemoryRefinement<S> {
    pub fn new(solver: S) -> Self {
        Self {
            refinement: Refinement::new(solver),
            release_acquire: ReleaseAcquireModel::default(),
        }
    }

    pub fn with_precise_shortcut(mut self, precise: bool) -> Self {
        self.refinement = self.refinement.with_precise_shortcut(precise);
        self
    }

    pub fn stats(&self) -> &Statistics {
        self.refinement.stats()
    }

    pub fn reset_stats(&mut self) {
        self.refinement.reset_stats();
    }
}

impl<S: Solver> PartialStringChecker for MemoryRefinement<S> {
    fn check(&mut self, x: &PartialString, y: &PartialString) -> Result<bool> {
        if self.refinement.begin_check(x, y) {
            return Ok(false);
        }

        let mut conjuncts = Vec::new();
        let order = self.refinement.mapped_order();
        if self
            .release_acquire
            .release_acquire(&order, &[], y, &mut conjuncts)
        {
            debug!("{} violates release-acquire on its own", y);
            return Ok(false);
        }

        self.refinement.solve(x, y, conjuncts)
    }
}
