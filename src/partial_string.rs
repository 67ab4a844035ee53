//! Partial strings: finite labelled partial orders (pomsets).
//!
//! A [`PartialString`] is built from the empty string, from singletons, or by
//! composing two existing strings concurrently or sequentially. It is never
//! mutated afterwards.
//!
//! Only the transitive reduction of the order is stored. Sequential
//! composition adds the bridge layer `maximals(x) × minimals(y)`, which keeps
//! the stored relation a reduction of the full order. Concurrent composition
//! adds no order at all, but records every cross pair as incomparable.

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::ops::BitOr;

use crate::types::{Event, EventPair, Label, Length};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialString {
    label_function: Vec<Label>,
    strict_partial_order: Vec<EventPair>,
    incomparables: Vec<EventPair>,
    min_label: Label,
    max_label: Label,
    label_counts: BTreeMap<Label, u32>,
}

impl PartialString {
    /// The partial string with no events.
    pub fn empty() -> Self {
        Self::default()
    }

    /// A partial string with a single event labelled `label`.
    pub fn singleton(label: Label) -> Self {
        Self {
            label_function: vec![label],
            strict_partial_order: Vec::new(),
            incomparables: Vec::new(),
            min_label: label,
            max_label: label,
            label_counts: BTreeMap::from([(label, 1)]),
        }
    }

    /// Disjoint union of `x` and `y`: events of `y` are shifted by `len(x)`.
    fn coproduct(x: &Self, y: &Self) -> Self {
        let offset = x.len();

        let mut label_function = Vec::with_capacity(x.len() + y.len());
        label_function.extend_from_slice(&x.label_function);
        label_function.extend_from_slice(&y.label_function);

        let shift = |&(a, b): &EventPair| (offset + a, offset + b);

        let mut strict_partial_order = x.strict_partial_order.clone();
        strict_partial_order.extend(y.strict_partial_order.iter().map(shift));

        let mut incomparables = x.incomparables.clone();
        incomparables.extend(y.incomparables.iter().map(shift));

        let (min_label, max_label) = match (x.is_empty(), y.is_empty()) {
            (true, true) => (0, 0),
            (true, false) => (y.min_label, y.max_label),
            (false, true) => (x.min_label, x.max_label),
            (false, false) => (
                x.min_label.min(y.min_label),
                x.max_label.max(y.max_label),
            ),
        };

        let mut label_counts = x.label_counts.clone();
        for (&label, &count) in &y.label_counts {
            *label_counts.entry(label).or_insert(0) += count;
        }

        Self {
            label_function,
            strict_partial_order,
            incomparables,
            min_label,
            max_label,
            label_counts,
        }
    }

    /// `x | y`: every event of `x` is concurrent with every event of `y`.
    pub fn concurrent(&self, other: &Self) -> Self {
        let mut result = Self::coproduct(self, other);
        let offset = self.len();
        for e in 0..self.len() {
            for f in 0..other.len() {
                result.incomparables.push((e, offset + f));
            }
        }
        result
    }

    /// `x , y`: every event of `x` happens before every event of `y`.
    pub fn sequential(&self, other: &Self) -> Self {
        let mut result = Self::coproduct(self, other);
        let offset = self.len();
        let minimals = other.minimals();
        for max in self.maximals() {
            for &min in &minimals {
                result.strict_partial_order.push((max, offset + min));
            }
        }
        result
    }

    pub fn len(&self) -> Length {
        self.label_function.len()
    }

    pub fn is_empty(&self) -> bool {
        self.label_function.is_empty()
    }

    pub fn label_function(&self) -> &[Label] {
        &self.label_function
    }

    /// Label of event `e`.
    ///
    /// # Panics
    ///
    /// Panics if `e` is not an event of this string.
    pub fn label(&self, e: Event) -> Label {
        assert!(e < self.len(), "Event {} out of range 0..{}", e, self.len());
        self.label_function[e]
    }

    /// Transitive reduction of the strict partial order.
    pub fn strict_partial_order(&self) -> &[EventPair] {
        &self.strict_partial_order
    }

    /// Unordered pairs of concurrent events; each pair is listed once but
    /// stands for both directions.
    pub fn incomparables(&self) -> &[EventPair] {
        &self.incomparables
    }

    pub fn is_minimal(&self, e: Event) -> bool {
        assert!(e < self.len(), "Event {} out of range 0..{}", e, self.len());
        self.strict_partial_order.iter().all(|&(_, b)| b != e)
    }

    pub fn is_maximal(&self, e: Event) -> bool {
        assert!(e < self.len(), "Event {} out of range 0..{}", e, self.len());
        self.strict_partial_order.iter().all(|&(a, _)| a != e)
    }

    /// Events without a predecessor, in increasing order.
    pub fn minimals(&self) -> Vec<Event> {
        let mut has_predecessor = vec![false; self.len()];
        for &(_, b) in &self.strict_partial_order {
            has_predecessor[b] = true;
        }
        (0..self.len()).filter(|&e| !has_predecessor[e]).collect()
    }

    /// Events without a successor, in increasing order.
    pub fn maximals(&self) -> Vec<Event> {
        let mut has_successor = vec![false; self.len()];
        for &(a, _) in &self.strict_partial_order {
            has_successor[a] = true;
        }
        (0..self.len()).filter(|&e| !has_successor[e]).collect()
    }

    /// Smallest label of any event.
    ///
    /// # Panics
    ///
    /// Panics on the empty string, which has no labels.
    pub fn min_label(&self) -> Label {
        assert!(!self.is_empty(), "Empty partial string has no minimal label");
        self.min_label
    }

    /// Largest label of any event.
    ///
    /// # Panics
    ///
    /// Panics on the empty string, which has no labels.
    pub fn max_label(&self) -> Label {
        assert!(!self.is_empty(), "Empty partial string has no maximal label");
        self.max_label
    }

    pub fn number_of_events_with_label(&self, label: Label) -> u32 {
        self.label_counts.get(&label).copied().unwrap_or(0)
    }

    /// Occurrence counts of the labels in `min..=max`, skipping absent labels.
    pub(crate) fn label_counts_between(
        &self,
        min: Label,
        max: Label,
    ) -> impl Iterator<Item = (&Label, &u32)> + '_ {
        self.label_counts.range(min..=max)
    }
}

impl From<Label> for PartialString {
    fn from(label: Label) -> Self {
        Self::singleton(label)
    }
}

impl BitOr for &PartialString {
    type Output = PartialString;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.concurrent(rhs)
    }
}

impl Display for PartialString {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{{labels: {:?}", self.label_function)?;
        write!(f, ", order: {:?}", self.strict_partial_order)?;
        write!(f, ", incomparables: {:?}}}", self.incomparables)
    }
}
