//! Boundary to the constraint solver.
//!
//! Decision procedures build quantifier-free [`Term`]s and hand them to any
//! [`Solver`]. Two backends are provided:
//!
//! - [`z3::Z3Solver`] pipes an SMT-LIB2 script into an external `z3` process.
//! - [`bdd::BddSolver`] decides the propositional fragment with BDDs and
//!   abstracts every theory atom, answering [`CheckResult::Unknown`] whenever
//!   the abstraction is too coarse to decide.

use std::path::PathBuf;

use thiserror::Error;

pub mod bdd;
pub mod smtlib;
pub mod term;
pub mod z3;

pub use term::{Func, Sort, Term};

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum CheckResult {
    Sat,
    Unsat,
    /// The solver gave up; the payload says why.
    Unknown(String),
}

#[derive(Debug, Error)]
pub enum SolverError {
    #[error("solver binary not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("solver process failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("solver reported an error: {0}")]
    Backend(String),

    #[error("unexpected solver output: {0:?}")]
    UnexpectedOutput(String),
}

/// Scoped, incremental satisfiability checking.
///
/// Symbols are declared implicitly: every constant and function symbol
/// occurring in an added term is known to the solver.
pub trait Solver {
    /// Open a new assertion frame.
    fn push(&mut self);

    /// Drop the assertions of the innermost frame.
    fn pop(&mut self);

    /// Drop every assertion and frame.
    fn reset(&mut self);

    /// Assert `term` in the innermost frame.
    fn add(&mut self, term: Term);

    /// Check the conjunction of all live assertions.
    fn check(&mut self) -> Result<CheckResult, SolverError>;
}

impl<S: Solver + ?Sized> Solver for &mut S {
    fn push(&mut self) {
        (**self).push()
    }
    fn pop(&mut self) {
        (**self).pop()
    }
    fn reset(&mut self) {
        (**self).reset()
    }
    fn add(&mut self, term: Term) {
        (**self).add(term)
    }
    fn check(&mut self) -> Result<CheckResult, SolverError> {
        (**self).check()
    }
}

/// Assertion frame that is popped when dropped.
pub struct Scope<'s, S: Solver + ?Sized> {
    solver: &'s mut S,
}

impl<'s, S: Solver + ?Sized> Scope<'s, S> {
    pub fn new(solver: &'s mut S) -> Self {
        solver.push();
        Self { solver }
    }

    pub fn add(&mut self, term: Term) {
        self.solver.add(term);
    }

    pub fn check(&mut self) -> Result<CheckResult, SolverError> {
        self.solver.check()
    }
}

impl<S: Solver + ?Sized> Drop for Scope<'_, S> {
    fn drop(&mut self) {
        self.solver.pop();
    }
}
