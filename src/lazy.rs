//! Lazy enumeration of iterated self-composition.
//!
//! `P op P op ... op P` (k times) has `|P|^k` partial strings. A
//! [`LazyProgram`] stands for that product without building it: a k-digit
//! counter in base `|P|` selects one operand per position, and the cursor
//! returned by [`LazyProgram::iter`] composes the selected operands on demand.
//!
//! Digit `0` is the least significant one, so for `P = a + b` and `k = 2` the
//! order is `(a, a)`, `(b, a)`, `(a, b)`, `(b, b)`.

use log::debug;
use num_bigint::BigUint;

use crate::partial_string::PartialString;
use crate::program::{Operator, Program};

#[derive(Debug, Clone)]
pub struct LazyProgram<'a> {
    base: &'a Program,
    operator: Operator,
    digits: Vec<usize>,
}

impl<'a> LazyProgram<'a> {
    /// One-fold composition of `base`, i.e. `base` itself.
    pub fn new(base: &'a Program, operator: Operator) -> Self {
        Self {
            base,
            operator,
            digits: vec![0],
        }
    }

    pub fn base(&self) -> &'a Program {
        self.base
    }

    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// Number of self-composed copies of the base program.
    pub fn depth(&self) -> usize {
        self.digits.len()
    }

    /// Number of partial strings this program enumerates: `|base|^depth`.
    pub fn size(&self) -> BigUint {
        BigUint::from(self.base.len()).pow(self.digits.len() as u32)
    }

    /// Compose one more copy of the base program and restart enumeration.
    pub fn extend(&mut self) {
        self.digits.fill(0);
        self.digits.push(0);
        debug!(
            "extend: depth = {}, size = {}",
            self.digits.len(),
            self.size()
        );
    }

    /// Restart enumeration from the first partial string.
    pub fn reset(&mut self) {
        self.digits.fill(0);
    }

    /// Cursor over the partial strings, starting at the current counter.
    ///
    /// The cursor borrows the counter mutably, so only one can be live.
    /// Running a cursor to the end leaves the counter at zero again.
    pub fn iter(&mut self) -> PartialStrings<'_> {
        PartialStrings {
            base: self.base,
            operator: self.operator,
            digits: &mut self.digits,
            exhausted: false,
        }
    }
}

/// Cursor over the partial strings of a [`LazyProgram`].
#[derive(Debug)]
pub struct PartialStrings<'l> {
    base: &'l Program,
    operator: Operator,
    digits: &'l mut Vec<usize>,
    exhausted: bool,
}

impl PartialStrings<'_> {
    /// Rewind the underlying counter to zero and end this cursor.
    pub fn reset(&mut self) {
        self.digits.fill(0);
        self.exhausted = true;
    }

    fn compose_current(&self) -> PartialString {
        self.digits
            .iter()
            .fold(PartialString::empty(), |acc, &digit| {
                self.operator.compose(&acc, &self.base[digit])
            })
    }

    /// Ripple-carry increment; returns `true` on overflow.
    fn increment(&mut self) -> bool {
        let radix = self.base.len();
        for digit in self.digits.iter_mut() {
            *digit += 1;
            if *digit < radix {
                return false;
            }
            *digit = 0;
        }
        true
    }
}

impl Iterator for PartialStrings<'_> {
    type Item = PartialString;

    fn next(&mut self) -> Option<Self::Item> {
        if self.exhausted || self.base.is_empty() || self.digits.is_empty() {
            return None;
        }
        let partial_string = self.compose_current();
        if self.increment() {
            self.exhausted = true;
        }
        Some(partial_string)
    }
}
