//! Partial strings with branching control flow.
//!
//! A [`SymbolicProgram`] is one partial string whose events may be guarded by
//! assume events. Its assume map sends every event either to itself
//! (unguarded) or to the assume event of the innermost enclosing
//! [`if_then`]. Nesting is "boxes inside boxes": composing two programs keeps
//! each box intact and shifts the right one past the left one.

use std::fmt;
use std::ops::BitOr;

use crate::memory::label::{
    assume_acquire_eq_label, assume_acquire_neq_label, is_assume, Address, Byte,
};
use crate::memory::release_acquire::AssumeMap;
use crate::partial_string::PartialString;
use crate::types::{Event, Label};

/// A partial string together with the guard structure of its events.
///
/// Invariants:
/// - `assume_map.len() == p.len()`;
/// - if `assume_map[e] != e` then `assume_map[e]` is labelled by an assume;
/// - `unguarded_events` are exactly the fixed points of `assume_map`,
///   in ascending order.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct SymbolicProgram {
    assume_map: AssumeMap,
    unguarded_events: Vec<Event>,
    p: PartialString,
}

impl SymbolicProgram {
    /// A program of exactly one unguarded event.
    pub fn new(label: Label) -> Self {
        Self {
            assume_map: vec![0],
            unguarded_events: vec![0],
            p: PartialString::from(label),
        }
    }

    pub fn assume_map(&self) -> &[Event] {
        &self.assume_map
    }

    pub fn unguarded_events(&self) -> &[Event] {
        &self.unguarded_events
    }

    pub fn p(&self) -> &PartialString {
        &self.p
    }

    pub fn len(&self) -> usize {
        self.p.len()
    }

    pub fn is_empty(&self) -> bool {
        self.p.is_empty()
    }

    /// Put `x` and `y` side by side inside `p`, which must be a composition
    /// of `x.p()` followed by `y.p()`.
    fn nest(x: &Self, y: &Self, p: PartialString) -> Self {
        assert_eq!(
            p.len(),
            x.len() + y.len(),
            "Composite of {} and {} events has {} events",
            x.len(),
            y.len(),
            p.len()
        );
        let offset = x.len();

        let mut assume_map = x.assume_map.clone();
        assume_map.extend(y.assume_map.iter().map(|&a| offset + a));

        let mut unguarded_events = x.unguarded_events.clone();
        unguarded_events.extend(y.unguarded_events.iter().map(|&e| offset + e));

        let program = Self {
            assume_map,
            unguarded_events,
            p,
        };
        program.debug_check_invariants();
        program
    }

    pub fn concurrent(&self, other: &Self) -> Self {
        Self::nest(self, other, self.p.concurrent(&other.p))
    }

    pub fn sequential(&self, other: &Self) -> Self {
        Self::nest(self, other, self.p.sequential(&other.p))
    }

    /// Run `body` after an assume event labelled `assume`.
    ///
    /// The assume becomes event 0 and guards every unguarded event of
    /// `body`; events already guarded inside `body` keep their guard.
    fn guarded_by(assume: Label, body: &Self) -> Self {
        debug_assert!(is_assume(assume));
        let p = PartialString::from(assume).sequential(&body.p);

        let mut assume_map = Vec::with_capacity(p.len());
        assume_map.push(0);
        for (e, &a) in body.assume_map.iter().enumerate() {
            assume_map.push(if a == e { 0 } else { a + 1 });
        }

        let program = Self {
            assume_map,
            unguarded_events: vec![0],
            p,
        };
        program.debug_check_invariants();
        program
    }

    fn debug_check_invariants(&self) {
        debug_assert_eq!(self.assume_map.len(), self.p.len());
        debug_assert!(self
            .assume_map
            .iter()
            .enumerate()
            .all(|(e, &a)| a == e || is_assume(self.p.label(a))));
        debug_assert!(self
            .unguarded_events
            .iter()
            .all(|&e| self.assume_map[e] == e));
        debug_assert_eq!(
            self.unguarded_events.len(),
            self.assume_map
                .iter()
                .enumerate()
                .filter(|&(e, &a)| a == e)
                .count()
        );
    }
}

impl From<Label> for SymbolicProgram {
    fn from(label: Label) -> Self {
        Self::new(label)
    }
}

impl BitOr for &SymbolicProgram {
    type Output = SymbolicProgram;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.concurrent(rhs)
    }
}

impl fmt::Display for SymbolicProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} with guards {:?}", self.p, self.assume_map)
    }
}

/// `if ([address] == byte) then body`, reading `address` with an acquire load.
pub fn if_then(address: Address, byte: Byte, body: &SymbolicProgram) -> SymbolicProgram {
    SymbolicProgram::guarded_by(assume_acquire_eq_label(address, byte), body)
}

/// `if ([address] != byte) then body`, reading `address` with an acquire load.
pub fn if_not_then(address: Address, byte: Byte, body: &SymbolicProgram) -> SymbolicProgram {
    SymbolicProgram::guarded_by(assume_acquire_neq_label(address, byte), body)
}
