//! Release-acquire axioms over an arbitrary happens-before supplier.
//!
//! For every address, with `S` the release stores and `L` the acquire loads
//! to that address:
//!
//! - some read-from: each load whose guard holds reads from some store;
//! - synchronizes-with: `rf(l) = s` implies `s` happens before `l`, the load
//!   reads the stored value, and the guard of `s` holds;
//! - modification order: stores are totally ordered;
//! - from-read: `rf(l) = s`, `s` before `s'` and the guard of `s'` imply
//!   `l` before `s'`;
//! - values: every store writes its byte.
//!
//! Guards come from an [`AssumeMap`]: an event is guarded when it maps to an
//! assume event other than itself.

use crate::memory::label::{
    address, byte, is_acquire_load, is_assume, is_assume_acquire_eq, is_assume_acquire_neq,
    is_load, is_release_store, is_store,
};
use crate::order::OrderSupplier;
use crate::partial_string::PartialString;
use crate::smt::{Sort, Term};
use crate::types::{Event, Label};

/// Maps every event to the assume event guarding it, or to itself.
pub type AssumeMap = Vec<Event>;

/// Events per address, each list in ascending order.
pub type PerAddressMap = Vec<Vec<Event>>;

/// Split the events of `x` by address into stores satisfying `is_store_kind`
/// and loads satisfying `is_load_kind`.
///
/// Both maps cover every address up to the address of `x`'s largest label.
pub fn store_load_filter(
    x: &PartialString,
    is_store_kind: fn(Label) -> bool,
    is_load_kind: fn(Label) -> bool,
) -> (PerAddressMap, PerAddressMap) {
    if x.is_empty() {
        return (Vec::new(), Vec::new());
    }
    let size = address(x.max_label()) as usize + 1;
    let mut stores = vec![Vec::new(); size];
    let mut loads = vec![Vec::new(); size];

    for (e, &label) in x.label_function().iter().enumerate() {
        let a = address(label) as usize;
        if is_store_kind(label) {
            debug_assert!(is_store(label));
            stores[a].push(e);
        }
        if is_load_kind(label) {
            debug_assert!(is_load(label));
            loads[a].push(e);
        }
    }
    (stores, loads)
}

/// Can `e` only execute when some condition holds?
pub fn is_guarded(assume_map: &[Event], e: Event) -> bool {
    e < assume_map.len() && assume_map[e] != e
}

#[derive(Debug, Clone)]
pub struct ReleaseAcquireModel {
    value_sort: Sort,
}

impl Default for ReleaseAcquireModel {
    fn default() -> Self {
        Self {
            value_sort: Sort::Int,
        }
    }
}

impl ReleaseAcquireModel {
    /// Model whose read/written values have sort `value_sort`.
    pub fn new(value_sort: Sort) -> Self {
        Self { value_sort }
    }

    /// Value read or written by `e`.
    pub fn value(&self, e: Event) -> Term {
        Term::indexed("v!", e, self.value_sort)
    }

    /// Store that `load` reads from.
    fn read_from(&self, load: Event) -> Term {
        Term::indexed("rf!", load, Sort::Int)
    }

    fn byte_term(label: Label) -> Term {
        Term::int(byte(label))
    }

    /// Condition under which the guarded event `e` executes: the conjunction
    /// over every enclosing assume event.
    ///
    /// # Panics
    ///
    /// Panics if `e` is not guarded.
    pub fn guard(&self, assume_map: &[Event], x: &PartialString, e: Event) -> Term {
        assert!(is_guarded(assume_map, e), "Event {} is not guarded", e);

        let mut guards = Vec::new();
        let mut e = e;
        while is_guarded(assume_map, e) {
            let assume = assume_map[e];
            let label = x.label(assume);
            debug_assert!(is_assume(label));

            let value = self.value(assume);
            if is_assume_acquire_eq(label) {
                guards.push(value.equal(Self::byte_term(label)));
            } else {
                debug_assert!(is_assume_acquire_neq(label));
                guards.push(value.not_equal(Self::byte_term(label)));
            }
            e = assume;
        }
        Term::and(guards)
    }

    fn maybe_guard(&self, assume_map: &[Event], x: &PartialString, e: Event) -> Option<Term> {
        is_guarded(assume_map, e).then(|| self.guard(assume_map, x, e))
    }

    /// Push the release-acquire axioms of `x` under `order`.
    ///
    /// Returns `true` if the axioms are unsatisfiable on their own, i.e. some
    /// unguarded acquire load has no store to read from.
    pub fn release_acquire(
        &self,
        order: &dyn OrderSupplier,
        assume_map: &[Event],
        x: &PartialString,
        conjuncts: &mut Vec<Term>,
    ) -> bool {
        let (store_map, load_map) = store_load_filter(x, is_release_store, is_acquire_load);

        let mut all_rf = Vec::new();
        let mut order_sw = Vec::new();
        let mut mo = Vec::new();
        let mut order_fr = Vec::new();
        let mut values = Vec::new();

        for (stores, loads) in store_map.iter().zip(&load_map) {
            for &store in stores {
                values.push(self.value(store).equal(Self::byte_term(x.label(store))));
            }

            for &load in loads {
                let label = x.label(load);
                let load_value = self.value(load);
                let rf = self.read_from(load);
                let load_guard = self.maybe_guard(assume_map, x, load);

                let mut some_rf = Vec::new();
                for &store_a in stores {
                    let store_label = x.label(store_a);

                    // An assume can only read a store that satisfies it.
                    if (is_assume_acquire_eq(label) && byte(store_label) != byte(label))
                        || (is_assume_acquire_neq(label) && byte(store_label) == byte(label))
                    {
                        continue;
                    }

                    let rf_bool = rf.clone().equal(Term::index(store_a));
                    some_rf.push(rf_bool.clone());

                    let mut sw = vec![
                        order.happens_before(store_a, load),
                        self.value(store_a).equal(load_value.clone()),
                    ];
                    sw.extend(self.maybe_guard(assume_map, x, store_a));
                    order_sw.push(rf_bool.clone().implies(Term::and(sw)));

                    for &store_b in stores {
                        if store_a == store_b {
                            continue;
                        }
                        let mut premise = vec![rf_bool.clone(), order.happens_before(store_a, store_b)];
                        premise.extend(self.maybe_guard(assume_map, x, store_b));
                        order_fr.push(Term::and(premise).implies(order.happens_before(load, store_b)));
                    }
                }

                if assume_map.is_empty() && some_rf.is_empty() {
                    return true;
                }

                if some_rf.is_empty() && !is_assume(label) {
                    // Nothing to read: the load must not execute.
                    match load_guard {
                        None => return true,
                        Some(guard) => all_rf.push(!guard),
                    }
                } else {
                    // An unsatisfiable assume blocks everything it guards.
                    if !assume_map.is_empty() {
                        if is_assume_acquire_eq(label) {
                            some_rf.push(load_value.not_equal(Self::byte_term(label)));
                        } else if is_assume_acquire_neq(label) {
                            some_rf.push(load_value.equal(Self::byte_term(label)));
                        }
                    }
                    let some_rf = Term::or(some_rf);
                    all_rf.push(match load_guard {
                        None => some_rf,
                        Some(guard) => guard.implies(some_rf),
                    });
                }
            }

            for (i, &store_a) in stores.iter().enumerate() {
                for &store_b in &stores[i + 1..] {
                    mo.push(Term::or([
                        order.happens_before(store_a, store_b),
                        order.happens_before(store_b, store_a),
                    ]));
                }
            }
        }

        for axiom in [all_rf, order_sw, mo, order_fr, values] {
            if !axiom.is_empty() {
                conjuncts.push(Term::and(axiom));
            }
        }
        false
    }
}
