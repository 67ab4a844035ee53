//! Programs: finite sets of partial strings closed under `|`, `,` and `+`.

use std::fmt::{Display, Formatter};
use std::ops::{Add, BitOr};

use crate::partial_string::PartialString;
use crate::types::{Label, Length};

/// Composition operator of the algebra.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Operator {
    /// `|`
    Concurrent,
    /// `,`
    Sequential,
}

impl Operator {
    pub fn compose(self, x: &PartialString, y: &PartialString) -> PartialString {
        match self {
            Operator::Concurrent => x.concurrent(y),
            Operator::Sequential => x.sequential(y),
        }
    }

    /// Pairwise composition of every string of `xs` with every string of `ys`,
    /// `xs` in the outer loop.
    pub fn compose_programs(self, xs: &Program, ys: &Program) -> Program {
        let mut partial_strings = Vec::with_capacity(xs.len() * ys.len());
        for x in xs {
            for y in ys {
                partial_strings.push(self.compose(x, y));
            }
        }
        Program { partial_strings }
    }
}

impl Display for Operator {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Operator::Concurrent => write!(f, "|"),
            Operator::Sequential => write!(f, ","),
        }
    }
}

/// A finite, not deduplicated, set of partial strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    partial_strings: Vec<PartialString>,
}

impl Program {
    /// The program without any behaviour.
    pub fn zero() -> Self {
        Self::default()
    }

    pub fn new(partial_strings: Vec<PartialString>) -> Self {
        Self { partial_strings }
    }

    pub fn partial_strings(&self) -> &[PartialString] {
        &self.partial_strings
    }

    pub fn len(&self) -> usize {
        self.partial_strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.partial_strings.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PartialString> {
        self.partial_strings.iter()
    }

    pub fn concurrent(&self, other: &Self) -> Self {
        Operator::Concurrent.compose_programs(self, other)
    }

    pub fn sequential(&self, other: &Self) -> Self {
        Operator::Sequential.compose_programs(self, other)
    }

    /// Nondeterministic choice: the union of both behaviour sets.
    pub fn choice(&self, other: &Self) -> Self {
        let mut partial_strings = self.partial_strings.clone();
        partial_strings.extend_from_slice(&other.partial_strings);
        Self { partial_strings }
    }

    /// Length of the shortest partial string, `None` for [`Program::zero`].
    pub fn min_length(&self) -> Option<Length> {
        self.partial_strings.iter().map(PartialString::len).min()
    }

    /// Length of the longest partial string, `None` for [`Program::zero`].
    pub fn max_length(&self) -> Option<Length> {
        self.partial_strings.iter().map(PartialString::len).max()
    }

    /// Closure of this program under unbounded self-composition by `operator`.
    pub fn lfp(self, operator: Operator) -> LfpProgram {
        LfpProgram::new(self, operator)
    }
}

impl From<Label> for Program {
    fn from(label: Label) -> Self {
        Self::from(PartialString::singleton(label))
    }
}

impl From<PartialString> for Program {
    fn from(partial_string: PartialString) -> Self {
        Self {
            partial_strings: vec![partial_string],
        }
    }
}

impl std::ops::Index<usize> for Program {
    type Output = PartialString;

    fn index(&self, index: usize) -> &Self::Output {
        &self.partial_strings[index]
    }
}

impl<'a> IntoIterator for &'a Program {
    type Item = &'a PartialString;
    type IntoIter = std::slice::Iter<'a, PartialString>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl BitOr for &Program {
    type Output = Program;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.concurrent(rhs)
    }
}

impl Add for &Program {
    type Output = Program;

    fn add(self, rhs: Self) -> Self::Output {
        self.choice(rhs)
    }
}

/// A program read as the least fixed point of its self-composition under
/// one operator: `P ∪ (P op P) ∪ (P op P op P) ∪ ...`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LfpProgram {
    program: Program,
    operator: Operator,
}

impl LfpProgram {
    pub fn new(program: Program, operator: Operator) -> Self {
        Self { program, operator }
    }

    pub fn program(&self) -> &Program {
        &self.program
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }
}
