//! Encodings of happens-before into solver terms.
//!
//! [`PartialOrderModel`] reads `a < b` as an uninterpreted predicate
//! `order_x(a, b)` and must assert irreflexivity, asymmetry and transitivity
//! itself. [`TotalOrderModel`] maps every event to a real-valued time and
//! reads `a < b` as `time(a) < time(b)`, so only the transitive reduction
//! needs asserting. The total-order model cannot say that two events are
//! unordered, so it rejects incomparable pairs.

use crate::error::{Error, Result};
use crate::partial_string::PartialString;
use crate::smt::{Func, Sort, Term};
use crate::types::Event;

/// Anything that can state "`a` happens before `b`" for two concrete events.
pub trait OrderSupplier {
    fn happens_before(&self, a: Event, b: Event) -> Term;
}

pub trait OrderModel: OrderSupplier {
    /// "`a` happens before `b`" for two symbolic event terms.
    fn order(&self, a: Term, b: Term) -> Term;

    /// Push the constraints of `p`'s strict partial order.
    ///
    /// Returns `true` if the constraints are unsatisfiable on their own.
    fn strict_partial_order(&self, p: &PartialString, conjuncts: &mut Vec<Term>) -> bool;

    /// Push "neither ordered way" for every incomparable pair of `p`.
    ///
    /// Returns `true` if the constraints are unsatisfiable on their own.
    fn incomparables(&self, p: &PartialString, conjuncts: &mut Vec<Term>) -> Result<bool>;
}

#[derive(Debug, Clone)]
pub struct PartialOrderModel {
    order: Func,
}

impl Default for PartialOrderModel {
    fn default() -> Self {
        Self {
            order: Func::new("order_x", vec![Sort::Int, Sort::Int], Sort::Bool),
        }
    }
}

impl OrderSupplier for PartialOrderModel {
    fn happens_before(&self, a: Event, b: Event) -> Term {
        self.order.apply([Term::index(a), Term::index(b)])
    }
}

impl OrderModel for PartialOrderModel {
    fn order(&self, a: Term, b: Term) -> Term {
        self.order.apply([a, b])
    }

    fn strict_partial_order(&self, p: &PartialString, conjuncts: &mut Vec<Term>) -> bool {
        let n = p.len();

        for &(a, b) in p.strict_partial_order() {
            conjuncts.push(self.happens_before(a, b));
        }

        // irreflexivity
        for e in 0..n {
            conjuncts.push(!self.happens_before(e, e));
        }

        // asymmetry
        for a in 0..n {
            for b in 0..n {
                if a != b {
                    conjuncts.push(self.happens_before(a, b).implies(!self.happens_before(b, a)));
                }
            }
        }

        // transitivity
        for a in 0..n {
            for b in 0..n {
                for c in 0..n {
                    let premise = Term::and([self.happens_before(a, b), self.happens_before(b, c)]);
                    conjuncts.push(premise.implies(self.happens_before(a, c)));
                }
            }
        }

        false
    }

    fn incomparables(&self, p: &PartialString, conjuncts: &mut Vec<Term>) -> Result<bool> {
        for &(a, b) in p.incomparables() {
            conjuncts.push(!self.happens_before(a, b));
            conjuncts.push(!self.happens_before(b, a));
        }
        Ok(false)
    }
}

#[derive(Debug, Clone)]
pub struct TotalOrderModel {
    time: Func,
}

impl Default for TotalOrderModel {
    fn default() -> Self {
        Self {
            time: Func::new("time", vec![Sort::Int], Sort::Real),
        }
    }
}

impl OrderSupplier for TotalOrderModel {
    fn happens_before(&self, a: Event, b: Event) -> Term {
        self.order(Term::index(a), Term::index(b))
    }
}

impl OrderModel for TotalOrderModel {
    fn order(&self, a: Term, b: Term) -> Term {
        self.time.apply([a]).lt(self.time.apply([b]))
    }

    fn strict_partial_order(&self, p: &PartialString, conjuncts: &mut Vec<Term>) -> bool {
        for &(a, b) in p.strict_partial_order() {
            conjuncts.push(self.happens_before(a, b));
        }
        false
    }

    fn incomparables(&self, p: &PartialString, _conjuncts: &mut Vec<Term>) -> Result<bool> {
        if p.incomparables().is_empty() {
            Ok(false)
        } else {
            Err(Error::Unsupported(
                "total-order model cannot keep events unordered".to_string(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::smt::bdd::BddSolver;
    use crate::smt::{CheckResult, Solver};

    fn xyz() -> (PartialString, PartialString, PartialString) {
        (
            PartialString::from(1),
            PartialString::from(2),
            PartialString::from(3),
        )
    }

    #[test]
    fn test_partial_order_constraint_count() {
        let (x, y, z) = xyz();
        let p = x.sequential(&y).sequential(&z);
        let model = PartialOrderModel::default();

        let mut conjuncts = Vec::new();
        assert!(!model.strict_partial_order(&p, &mut conjuncts));
        // 2 edges, 3 irreflexivity, 6 asymmetry, 27 transitivity
        assert_eq!(conjuncts.len(), 2 + 3 + 6 + 27);
    }

    #[test]
    fn test_partial_order_is_transitive() {
        let (x, y, z) = xyz();
        let p = x.sequential(&y).sequential(&z);
        let model = PartialOrderModel::default();

        let mut conjuncts = Vec::new();
        model.strict_partial_order(&p, &mut conjuncts);

        let mut solver = BddSolver::new();
        solver.add(Term::and(conjuncts.clone()));
        assert_eq!(solver.check().unwrap(), CheckResult::Sat);

        solver.push();
        solver.add(!model.happens_before(0, 2));
        assert_eq!(solver.check().unwrap(), CheckResult::Unsat);
        solver.pop();

        solver.push();
        solver.add(model.happens_before(2, 0));
        assert_eq!(solver.check().unwrap(), CheckResult::Unsat);
        solver.pop();
    }

    #[test]
    fn test_partial_order_incomparables() {
        let (x, y, _) = xyz();
        let p = &x | &y;
        let model = PartialOrderModel::default();

        let mut conjuncts = Vec::new();
        model.strict_partial_order(&p, &mut conjuncts);
        assert!(!model.incomparables(&p, &mut conjuncts).unwrap());

        let mut solver = BddSolver::new();
        solver.add(Term::and(conjuncts));
        assert_eq!(solver.check().unwrap(), CheckResult::Sat);
        solver.add(Term::or([model.happens_before(0, 1), model.happens_before(1, 0)]));
        assert_eq!(solver.check().unwrap(), CheckResult::Unsat);
    }

    #[test]
    fn test_total_order_asserts_reduction_only() {
        let (x, y, z) = xyz();
        let p = x.sequential(&y).sequential(&z);
        let model = TotalOrderModel::default();

        let mut conjuncts = Vec::new();
        assert!(!model.strict_partial_order(&p, &mut conjuncts));
        assert_eq!(conjuncts.len(), 2);
        assert_eq!(conjuncts[0].to_string(), "(< (time 0) (time 1))");
        assert!(!model.incomparables(&p, &mut conjuncts).unwrap());
    }

    #[test]
    fn test_total_order_rejects_incomparables() {
        let (x, y, _) = xyz();
        let p = &x | &y;
        let model = TotalOrderModel::default();

        let mut conjuncts = Vec::new();
        assert!(matches!(
            model.incomparables(&p, &mut conjuncts),
            Err(Error::Unsupported(_))
        ));
    }
}
