//! Refinement of partial strings, programs and lfp programs.
//!
//! `x` refines `y` iff there is a bijection `φ` from the events of `y` onto
//! the events of `x` that preserves labels and maps every ordered pair of
//! `y` to an ordered pair of `x`. In words: `y` can be replayed inside `x`.
//! The existence of `φ` is decided by the solver; `φ` is the uninterpreted
//! function `event`.
//!
//! Program refinement is `∀x ∈ X. ∃y ∈ Y. x ≤ y`, so it is not symmetric.

use log::debug;

use crate::error::{Error, Result};
use crate::lazy::LazyProgram;
use crate::order::{OrderModel, OrderSupplier, PartialOrderModel};
use crate::partial_string::PartialString;
use crate::program::{LfpProgram, Program};
use crate::smt::{CheckResult, Func, Scope, Solver, Sort, Term};
use crate::types::Event;

/// Counters of a checker.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
pub struct Statistics {
    /// Partial-string checks requested.
    pub checks: u64,
    /// Checks refuted without the solver.
    pub shortcuts: u64,
    /// Solver invocations.
    pub solver_calls: u64,
}

/// Map a solver answer to a decision; unknown never becomes a decision.
pub(crate) fn decide(result: CheckResult) -> Result<bool> {
    match result {
        CheckResult::Sat => Ok(true),
        CheckResult::Unsat => Ok(false),
        CheckResult::Unknown(reason) => Err(Error::Unknown(reason)),
    }
}

/// Necessary conditions for `x ≤ y` that need no solver.
///
/// Returns `true` if `x` certainly does not refine `y`.
pub(crate) fn refutes(x: &PartialString, y: &PartialString, precise: bool) -> bool {
    if x.len() != y.len() {
        return true;
    }
    if x.is_empty() {
        return false;
    }
    if x.min_label() != y.min_label() || x.max_label() != y.max_label() {
        return true;
    }
    if precise {
        let (min, max) = (x.min_label(), x.max_label());
        return !x
            .label_counts_between(min, max)
            .eq(y.label_counts_between(min, max));
    }
    false
}

/// Refinement checks over single partial strings, lifted to programs.
pub trait PartialStringChecker {
    /// Does `x` refine `y`?
    fn check(&mut self, x: &PartialString, y: &PartialString) -> Result<bool>;

    /// Does every partial string of `xs` refine some partial string of `ys`?
    fn check_programs(&mut self, xs: &Program, ys: &Program) -> Result<bool> {
        for x in xs {
            let mut refined = false;
            for y in ys {
                if self.check(x, y)? {
                    refined = true;
                    break;
                }
            }
            if !refined {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Like [`check_programs`](Self::check_programs), enumerating `ys` lazily.
    fn check_lazy(&mut self, xs: &Program, ys: &mut LazyProgram<'_>) -> Result<bool> {
        for x in xs {
            let mut refined = false;
            let mut iter = ys.iter();
            while let Some(y) = iter.next() {
                if self.check(x, &y)? {
                    iter.reset();
                    refined = true;
                    break;
                }
            }
            if !refined {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Bounded refinement of least fixed points over the same operator.
    ///
    /// `lfp(X) ≤ lfp(Y)` holds if `X ≤ Y^k` for some `k ≤ j` where
    /// `j = max_length(X) / min_length(Y)`: beyond `j` copies every string
    /// of `Y^k` is longer than any string of `X`.
    fn check_lfp(&mut self, lfp_x: &LfpProgram, lfp_y: &LfpProgram) -> Result<bool> {
        if lfp_x.operator() != lfp_y.operator() {
            return Err(Error::Unsupported(format!(
                "lfp refinement between operators '{}' and '{}'",
                lfp_x.operator(),
                lfp_y.operator()
            )));
        }
        let xs = lfp_x.program();
        let ys = lfp_y.program();

        let Some(max_length) = xs.max_length() else {
            return Ok(true);
        };
        let Some(min_length) = ys.min_length() else {
            return Ok(false);
        };
        if min_length == 0 {
            return Err(Error::Unsupported(
                "lfp refinement of a program containing the empty partial string".to_string(),
            ));
        }

        let bound = max_length / min_length;
        debug!("check_lfp: bound = {}", bound);

        let mut lazy = LazyProgram::new(ys, lfp_y.operator());
        for k in 0..=bound {
            if k > 0 {
                lazy.extend();
            }
            if self.check_lazy(xs, &mut lazy)? {
                return Ok(true);
            }
        }
        Ok(false)
    }
}

/// Partial-string refinement by reduction to the solver.
#[derive(Debug)]
pub struct Refinement<S, M = PartialOrderModel> {
    solver: S,
    model: M,
    event: Func,
    label: Func,
    precise: bool,
    stats: Statistics,
}

impl<S: Solver> Refinement<S> {
    pub fn new(solver: S) -> Self {
        Self::with_model(solver, PartialOrderModel::default())
    }
}

impl<S: Solver, M: OrderModel> Refinement<S, M> {
    pub fn with_model(solver: S, model: M) -> Self {
        Self {
            solver,
            model,
            event: Func::new("event", vec![Sort::Int], Sort::Int),
            label: Func::new("label_x", vec![Sort::Int], Sort::Int),
            precise: false,
            stats: Statistics::default(),
        }
    }

    /// Also compare label occurrence counts before calling the solver.
    pub fn with_precise_shortcut(mut self, precise: bool) -> Self {
        self.precise = precise;
        self
    }

    pub fn stats(&self) -> &Statistics {
        &self.stats
    }

    pub fn reset_stats(&mut self) {
        self.stats = Statistics::default();
    }

    pub fn solver(&self) -> &S {
        &self.solver
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    /// `φ(e)` for an event of the refined string.
    pub fn event_func(&self, e: Event) -> Term {
        self.event.apply([Term::index(e)])
    }

    /// Happens-before of `y`'s events read through `φ` into `x`'s order.
    pub fn mapped_order(&self) -> MappedOrder<'_, M> {
        MappedOrder {
            event: &self.event,
            model: &self.model,
        }
    }

    /// Count a new check and try to refute it without the solver.
    ///
    /// Returns `true` if `x` certainly does not refine `y`.
    pub(crate) fn begin_check(&mut self, x: &PartialString, y: &PartialString) -> bool {
        self.stats.checks += 1;
        if refutes(x, y, self.precise) {
            self.stats.shortcuts += 1;
            debug!("shortcut: {} does not refine {}", x, y);
            return true;
        }
        false
    }

    /// Ask the solver for an embedding of `y` into `x`, with `extra`
    /// asserted alongside.
    pub(crate) fn solve(
        &mut self,
        x: &PartialString,
        y: &PartialString,
        extra: Vec<Term>,
    ) -> Result<bool> {
        let mut conjuncts = extra;
        if self.model.incomparables(x, &mut conjuncts)? {
            return Ok(false);
        }
        if self.model.strict_partial_order(x, &mut conjuncts) {
            return Ok(false);
        }
        self.encode_labels(x, &mut conjuncts);
        self.encode_embedding(x, y, &mut conjuncts);

        self.stats.solver_calls += 1;
        let result = {
            let mut scope = Scope::new(&mut self.solver);
            scope.add(Term::and(conjuncts));
            scope.check()?
        };
        debug!("solver: {:?}", result);
        decide(result)
    }

    fn encode_labels(&self, x: &PartialString, conjuncts: &mut Vec<Term>) {
        for (e, &label) in x.label_function().iter().enumerate() {
            conjuncts.push(self.label.apply([Term::index(e)]).equal(Term::int(label)));
        }
    }

    /// `φ` is a monotonic, label-preserving bijection from `y` onto `x`.
    fn encode_embedding(&self, x: &PartialString, y: &PartialString, conjuncts: &mut Vec<Term>) {
        let last = x.len() as i64 - 1;
        let mut images = Vec::with_capacity(y.len());
        for (e, &label) in y.label_function().iter().enumerate() {
            let image = self.event_func(e);
            conjuncts.push(Term::int(0).le(image.clone()));
            conjuncts.push(image.clone().le(Term::int(last)));
            conjuncts.push(self.label.apply([image.clone()]).equal(Term::int(label)));
            images.push(image);
        }
        conjuncts.push(Term::distinct(images));

        let mapped = self.mapped_order();
        for &(a, b) in y.strict_partial_order() {
            conjuncts.push(mapped.happens_before(a, b));
        }
    }
}

impl<S: Solver, M: OrderModel> PartialStringChecker for Refinement<S, M> {
    fn check(&mut self, x: &PartialString, y: &PartialString) -> Result<bool> {
        if self.begin_check(x, y) {
            return Ok(false);
        }
        self.solve(x, y, Vec::new())
    }
}

/// Order of the refined string pulled back along `φ`:
/// `hb(a, b) := order_x(φ(a), φ(b))`.
#[derive(Debug)]
pub struct MappedOrder<'a, M> {
    event: &'a Func,
    model: &'a M,
}

impl<M: OrderModel> OrderSupplier for MappedOrder<'_, M> {
    fn happens_before(&self, a: Event, b: Event) -> Term {
        self.model.order(
            self.event.apply([Term::index(a)]),
            self.event.apply([Term::index(b)]),
        )
    }
}
