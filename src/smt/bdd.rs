//! Boolean-abstraction backend on top of [`crate::bdd`].
//!
//! Propositional structure is encoded exactly. Atoms the engine cannot
//! interpret (arithmetic comparisons, equalities between integer terms,
//! predicates over symbolic arguments) are replaced by fresh propositional
//! variables. The abstraction over-approximates, so:
//!
//! - an unsatisfiable abstraction proves the query unsatisfiable,
//! - a satisfiable abstraction is only conclusive when no atom was abstracted.

use std::collections::HashMap;

use log::debug;

use crate::bdd::{Bdd, Ref};
use crate::smt::{CheckResult, Solver, SolverError, Sort, Term};

#[derive(Debug, Copy, Clone)]
struct Frame {
    assertion: Ref,
    abstracted: bool,
}

#[derive(Debug)]
pub struct BddSolver {
    bdd: Bdd,
    atoms: HashMap<Term, u32>,
    frames: Vec<Frame>,
}

impl Default for BddSolver {
    fn default() -> Self {
        Self::new()
    }
}

impl BddSolver {
    pub fn new() -> Self {
        let bdd = Bdd::default();
        let root = Frame {
            assertion: bdd.one,
            abstracted: false,
        };
        Self {
            bdd,
            atoms: HashMap::new(),
            frames: vec![root],
        }
    }

    /// Number of distinct propositional variables introduced so far.
    pub fn num_atoms(&self) -> usize {
        self.atoms.len()
    }

    fn top(&self) -> Frame {
        // `frames` always holds the root frame.
        self.frames[self.frames.len() - 1]
    }

    fn atom(&mut self, term: &Term) -> Ref {
        let next = self.atoms.len() as u32 + 1;
        let v = *self.atoms.entry(term.clone()).or_insert(next);
        self.bdd.mk_var(v)
    }

    /// Encode `term`; `abstracted` is set when an atom had to be abstracted.
    fn encode(&mut self, term: &Term, abstracted: &mut bool) -> Ref {
        match term {
            Term::Bool(true) => self.bdd.one,
            Term::Bool(false) => self.bdd.zero,
            Term::Const(_, Sort::Bool) => self.atom(term),
            Term::App(func, args)
                if func.range() == Sort::Bool && args.iter().all(Term::is_literal) =>
            {
                self.atom(term)
            }
            Term::Not(t) => -self.encode(t, abstracted),
            Term::And(ts) => {
                let nodes: Vec<Ref> = ts.iter().map(|t| self.encode(t, abstracted)).collect();
                self.bdd.apply_and_many(nodes)
            }
            Term::Or(ts) => {
                let nodes: Vec<Ref> = ts.iter().map(|t| self.encode(t, abstracted)).collect();
                self.bdd.apply_or_many(nodes)
            }
            Term::Implies(a, b) => {
                let a = self.encode(a, abstracted);
                let b = self.encode(b, abstracted);
                self.bdd.apply_imply(a, b)
            }
            Term::Eq(a, b) if a.sort() == Sort::Bool && b.sort() == Sort::Bool => {
                let a = self.encode(a, abstracted);
                let b = self.encode(b, abstracted);
                self.bdd.apply_eq(a, b)
            }
            Term::Eq(a, b) => match (a.as_ref(), b.as_ref()) {
                (Term::Int(x), Term::Int(y)) => self.constant(x == y),
                _ => self.abstract_atom(term, abstracted),
            },
            Term::Lt(a, b) => match (a.as_ref(), b.as_ref()) {
                (Term::Int(x), Term::Int(y)) => self.constant(x < y),
                _ => self.abstract_atom(term, abstracted),
            },
            Term::Le(a, b) => match (a.as_ref(), b.as_ref()) {
                (Term::Int(x), Term::Int(y)) => self.constant(x <= y),
                _ => self.abstract_atom(term, abstracted),
            },
            Term::Distinct(ts) if ts.iter().all(|t| matches!(t, Term::Int(_))) => {
                let mut seen = std::collections::HashSet::new();
                let distinct = ts.iter().all(|t| seen.insert(t));
                self.constant(distinct)
            }
            _ => self.abstract_atom(term, abstracted),
        }
    }

    fn constant(&self, value: bool) -> Ref {
        if value {
            self.bdd.one
        } else {
            self.bdd.zero
        }
    }

    fn abstract_atom(&mut self, term: &Term, abstracted: &mut bool) -> Ref {
        *abstracted = true;
        self.atom(term)
    }
}

impl Solver for BddSolver {
    fn push(&mut self) {
        let top = self.top();
        self.frames.push(top);
    }

    fn pop(&mut self) {
        if self.frames.len() > 1 {
            self.frames.pop();
        } else {
            self.frames[0] = Frame {
                assertion: self.bdd.one,
                abstracted: false,
            };
        }
    }

    fn reset(&mut self) {
        *self = Self::new();
    }

    fn add(&mut self, term: Term) {
        let mut abstracted = false;
        let node = self.encode(&term, &mut abstracted);
        let top = self.top();
        let assertion = self.bdd.apply_and(top.assertion, node);
        let last = self.frames.len() - 1;
        self.frames[last] = Frame {
            assertion,
            abstracted: top.abstracted || abstracted,
        };
    }

    fn check(&mut self) -> Result<CheckResult, SolverError> {
        let top = self.top();
        let result = if self.bdd.is_zero(top.assertion) {
            CheckResult::Unsat
        } else if top.abstracted {
            CheckResult::Unknown("satisfiable boolean abstraction of theory atoms".to_string())
        } else {
            CheckResult::Sat
        };
        debug!(
            "bdd: {:?} ({} atoms, {} nodes)",
            result,
            self.atoms.len(),
            self.bdd.size(top.assertion)
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::smt::Func;

    #[test]
    fn test_literals() {
        let mut solver = BddSolver::new();
        assert_eq!(solver.check().unwrap(), CheckResult::Sat);

        solver.push();
        solver.add(Term::Bool(true));
        assert_eq!(solver.check().unwrap(), CheckResult::Sat);
        solver.add(Term::Bool(false));
        assert_eq!(solver.check().unwrap(), CheckResult::Unsat);
        solver.pop();

        assert_eq!(solver.check().unwrap(), CheckResult::Sat);
    }

    #[test]
    fn test_propositional() {
        let mut solver = BddSolver::new();
        let a = Term::constant("a", Sort::Bool);
        let b = Term::constant("b", Sort::Bool);

        solver.add(Term::or([a.clone(), b.clone()]));
        solver.add(a.clone().implies(b.clone()));
        assert_eq!(solver.check().unwrap(), CheckResult::Sat);

        solver.add(!b);
        assert_eq!(solver.check().unwrap(), CheckResult::Unsat);
        assert_eq!(solver.num_atoms(), 2);
    }

    #[test]
    fn test_predicate_on_literals_is_exact() {
        let mut solver = BddSolver::new();
        let order = Func::new("order", vec![Sort::Int, Sort::Int], Sort::Bool);
        let hb = |a: i64, b: i64| order.apply([Term::int(a), Term::int(b)]);

        solver.add(hb(0, 1));
        solver.add(hb(0, 1).implies(!hb(1, 0)));
        assert_eq!(solver.check().unwrap(), CheckResult::Sat);

        solver.add(hb(1, 0));
        assert_eq!(solver.check().unwrap(), CheckResult::Unsat);
    }

    #[test]
    fn test_theory_atoms_are_abstracted() {
        let mut solver = BddSolver::new();
        let a = Term::constant("a", Sort::Int);
        let b = Term::constant("b", Sort::Int);

        solver.push();
        solver.add(a.clone().lt(b.clone()));
        assert!(matches!(solver.check().unwrap(), CheckResult::Unknown(_)));

        // Same atom, opposite polarity: unsat without any arithmetic.
        solver.add(!a.clone().lt(b.clone()));
        assert_eq!(solver.check().unwrap(), CheckResult::Unsat);
        solver.pop();

        // a < b and b < a is unsat in arithmetic, but not in the abstraction.
        solver.push();
        solver.add(a.clone().lt(b.clone()));
        solver.add(b.lt(a));
        assert!(matches!(solver.check().unwrap(), CheckResult::Unknown(_)));
        solver.pop();

        assert_eq!(solver.check().unwrap(), CheckResult::Sat);
    }

    #[test]
    fn test_literal_comparisons() {
        let mut solver = BddSolver::new();
        solver.add(Term::int(1).lt(Term::int(2)));
        solver.add(Term::int(2).le(Term::int(2)));
        solver.add(Term::int(3).equal(Term::int(3)));
        solver.add(Term::distinct([Term::int(1), Term::int(2)]));
        assert_eq!(solver.check().unwrap(), CheckResult::Sat);

        solver.add(Term::distinct([Term::int(1), Term::int(1)]));
        assert_eq!(solver.check().unwrap(), CheckResult::Unsat);
    }

    #[test]
    fn test_reset() {
        let mut solver = BddSolver::new();
        solver.add(Term::Bool(false));
        assert_eq!(solver.check().unwrap(), CheckResult::Unsat);
        solver.reset();
        assert_eq!(solver.check().unwrap(), CheckResult::Sat);
        assert_eq!(solver.num_atoms(), 0);
    }
}
