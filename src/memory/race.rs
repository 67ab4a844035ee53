//! Data race detection for symbolic release-acquire programs.
//!
//! Two accesses to one address race when at least one is a
//! non-synchronizing store, neither happens before the other, and the
//! guards of both hold in some release-acquire consistent execution. The
//! detector asks the solver for exactly such an execution.

use log::debug;

use crate::error::Result;
use crate::memory::label::{is_none_load, is_none_store};
use crate::memory::release_acquire::{is_guarded, store_load_filter, ReleaseAcquireModel};
use crate::memory::symbolic::SymbolicProgram;
use crate::order::{OrderModel, TotalOrderModel};
use crate::partial_string::PartialString;
use crate::refinement::decide;
use crate::smt::{Solver, Term};
use crate::types::Event;

#[derive(Debug)]
pub struct DataRaceDetector<S, M = TotalOrderModel> {
    solver: S,
    model: M,
    release_acquire: ReleaseAcquireModel,
}

impl<S: Solver> DataRaceDetector<S> {
    pub fn new(solver: S) -> Self {
        Self::with_model(solver, TotalOrderModel::default())
    }
}

impl<S: Solver, M: OrderModel> DataRaceDetector<S, M> {
    pub fn with_model(solver: S, model: M) -> Self {
        Self {
            solver,
            model,
            release_acquire: ReleaseAcquireModel::default(),
        }
    }

    pub fn solver(&self) -> &S {
        &self.solver
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// Does some feasible execution of `program` contain a data race?
    pub fn is_racy(&mut self, program: &SymbolicProgram) -> Result<bool> {
        let racy = self.check(program.assume_map(), program.p())?;
        debug!("racy = {}: {}", racy, program);
        Ok(racy)
    }

    /// Like [`is_racy`](Self::is_racy) for a program without branches.
    pub fn is_racy_partial_string(&mut self, x: &PartialString) -> Result<bool> {
        let racy = self.check(&[], x)?;
        debug!("racy = {}: {}", racy, x);
        Ok(racy)
    }

    /// Guards of `a` and `b` (if any) and "neither happens before the other".
    fn unordered(&self, assume_map: &[Event], x: &PartialString, a: Event, b: Event) -> Term {
        let mut conjuncts = Vec::with_capacity(4);
        for e in [a, b] {
            if is_guarded(assume_map, e) {
                conjuncts.push(self.release_acquire.guard(assume_map, x, e));
            }
        }
        conjuncts.push(!self.model.happens_before(a, b));
        conjuncts.push(!self.model.happens_before(b, a));
        Term::and(conjuncts)
    }

    fn check(&mut self, assume_map: &[Event], x: &PartialString) -> Result<bool> {
        self.solver.reset();

        let mut conjuncts = Vec::new();
        if self.model.strict_partial_order(x, &mut conjuncts) {
            return Ok(false);
        }
        if self
            .release_acquire
            .release_acquire(&self.model, assume_map, x, &mut conjuncts)
        {
            debug!("no release-acquire consistent execution");
            return Ok(false);
        }

        let (store_map, load_map) = store_load_filter(x, is_none_store, is_none_load);

        let mut races = Vec::new();
        for (stores, loads) in store_map.iter().zip(&load_map) {
            for (i, &store) in stores.iter().enumerate() {
                for &load in loads {
                    races.push(self.unordered(assume_map, x, store, load));
                }
                for &other in &stores[i + 1..] {
                    races.push(self.unordered(assume_map, x, store, other));
                }
            }
        }

        if races.is_empty() {
            return Ok(false);
        }
        debug!("{} candidate races", races.len());

        if !conjuncts.is_empty() {
            self.solver.add(Term::and(conjuncts));
        }
        self.solver.add(Term::or(races));
        let result = self.solver.check()?;
        self.solver.reset();

        debug!("solver: {:?}", result);
        decide(result)
    }
}
