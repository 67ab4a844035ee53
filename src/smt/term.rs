use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::ops::Not;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Sort {
    Bool,
    Int,
    Real,
}

impl Display for Sort {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Sort::Bool => write!(f, "Bool"),
            Sort::Int => write!(f, "Int"),
            Sort::Real => write!(f, "Real"),
        }
    }
}

/// Uninterpreted function symbol.
#[derive(Debug, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Func {
    name: String,
    domain: Vec<Sort>,
    range: Sort,
}

impl Func {
    pub fn new(name: impl Into<String>, domain: Vec<Sort>, range: Sort) -> Self {
        Self {
            name: name.into(),
            domain,
            range,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn domain(&self) -> &[Sort] {
        &self.domain
    }
    pub fn range(&self) -> Sort {
        self.range
    }

    /// # Panics
    ///
    /// Panics if the number of arguments does not match the domain.
    pub fn apply(&self, args: impl IntoIterator<Item = Term>) -> Term {
        let args: Vec<Term> = args.into_iter().collect();
        assert_eq!(
            args.len(),
            self.domain.len(),
            "Function {} expects {} arguments",
            self.name,
            self.domain.len()
        );
        Term::App(self.clone(), args)
    }
}

/// Quantifier-free term over booleans, integers, reals and uninterpreted
/// functions.
#[derive(Debug, Clone, Eq, PartialEq, Hash)]
pub enum Term {
    Bool(bool),
    Int(i64),
    Const(String, Sort),
    App(Func, Vec<Term>),
    Not(Box<Term>),
    And(Vec<Term>),
    Or(Vec<Term>),
    Implies(Box<Term>, Box<Term>),
    Eq(Box<Term>, Box<Term>),
    Distinct(Vec<Term>),
    Lt(Box<Term>, Box<Term>),
    Le(Box<Term>, Box<Term>),
}

impl Term {
    pub fn constant(name: impl Into<String>, sort: Sort) -> Self {
        Term::Const(name.into(), sort)
    }

    /// Per-index symbol `<prefix><index>`, e.g. `v!3`.
    pub fn indexed(prefix: &str, index: usize, sort: Sort) -> Self {
        Term::Const(format!("{}{}", prefix, index), sort)
    }

    /// Integer literal for an event or label.
    pub fn int(value: impl Into<i64>) -> Self {
        Term::Int(value.into())
    }

    /// Integer literal for a dense index.
    pub fn index(index: usize) -> Self {
        Term::Int(index as i64)
    }

    pub fn and(terms: impl IntoIterator<Item = Term>) -> Self {
        let mut terms: Vec<Term> = terms.into_iter().collect();
        match terms.len() {
            0 => Term::Bool(true),
            1 => terms.remove(0),
            _ => Term::And(terms),
        }
    }

    pub fn or(terms: impl IntoIterator<Item = Term>) -> Self {
        let mut terms: Vec<Term> = terms.into_iter().collect();
        match terms.len() {
            0 => Term::Bool(false),
            1 => terms.remove(0),
            _ => Term::Or(terms),
        }
    }

    pub fn implies(self, conclusion: Term) -> Self {
        Term::Implies(Box::new(self), Box::new(conclusion))
    }

    pub fn equal(self, other: Term) -> Self {
        Term::Eq(Box::new(self), Box::new(other))
    }

    pub fn not_equal(self, other: Term) -> Self {
        !self.equal(other)
    }

    pub fn lt(self, other: Term) -> Self {
        Term::Lt(Box::new(self), Box::new(other))
    }

    pub fn le(self, other: Term) -> Self {
        Term::Le(Box::new(self), Box::new(other))
    }

    pub fn distinct(terms: impl IntoIterator<Item = Term>) -> Self {
        let terms: Vec<Term> = terms.into_iter().collect();
        if terms.len() < 2 {
            Term::Bool(true)
        } else {
            Term::Distinct(terms)
        }
    }

    pub fn is_literal(&self) -> bool {
        matches!(self, Term::Bool(_) | Term::Int(_))
    }

    pub fn sort(&self) -> Sort {
        match self {
            Term::Int(_) => Sort::Int,
            Term::Const(_, sort) => *sort,
            Term::App(func, _) => func.range(),
            _ => Sort::Bool,
        }
    }

    /// Collect every constant and function symbol occurring in the term.
    pub fn collect_symbols(
        &self,
        consts: &mut BTreeMap<String, Sort>,
        funcs: &mut BTreeMap<String, Func>,
    ) {
        match self {
            Term::Bool(_) | Term::Int(_) => {}
            Term::Const(name, sort) => {
                consts.entry(name.clone()).or_insert(*sort);
            }
            Term::App(func, args) => {
                funcs
                    .entry(func.name().to_string())
                    .or_insert_with(|| func.clone());
                for arg in args {
                    arg.collect_symbols(consts, funcs);
                }
            }
            Term::Not(t) => t.collect_symbols(consts, funcs),
            Term::And(ts) | Term::Or(ts) | Term::Distinct(ts) => {
                for t in ts {
                    t.collect_symbols(consts, funcs);
                }
            }
            Term::Implies(a, b) | Term::Eq(a, b) | Term::Lt(a, b) | Term::Le(a, b) => {
                a.collect_symbols(consts, funcs);
                b.collect_symbols(consts, funcs);
            }
        }
    }
}

impl Not for Term {
    type Output = Term;

    fn not(self) -> Self::Output {
        match self {
            Term::Bool(b) => Term::Bool(!b),
            Term::Not(t) => *t,
            t => Term::Not(Box::new(t)),
        }
    }
}

impl From<bool> for Term {
    fn from(value: bool) -> Self {
        Term::Bool(value)
    }
}
