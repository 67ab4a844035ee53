//! Shared helpers for the z3-backed suites.

use pomset_rs::smt::z3::{SolverConfig, Z3Solver};

/// A fresh `z3` backend, or `None` (with a note on stderr) if no `z3`
/// binary can be found.
pub fn z3_or_skip() -> Option<Z3Solver> {
    match SolverConfig::auto_detect() {
        Ok(config) => Some(Z3Solver::new(config)),
        Err(e) => {
            eprintln!("skipping: {}", e);
            None
        }
    }
}

