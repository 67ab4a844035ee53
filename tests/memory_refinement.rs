//! Refinement under the release-acquire axioms, decided with z3.

mod common;

use pomset_rs::memory::label::{
    acquire_load_label, assume_acquire_eq_label, assume_acquire_neq_label, release_store_label,
    Address,
};
use pomset_rs::memory::MemoryRefinement;
use pomset_rs::refinement::{PartialStringChecker, Refinement};
use pomset_rs::smt::z3::Z3Solver;
use pomset_rs::{PartialString, Program};

const A: Address = 0;
const B: Address = 1;

fn refinement() -> Option<MemoryRefinement<Z3Solver>> {
    common::z3_or_skip().map(MemoryRefinement::new)
}

fn ps(label: u32) -> PartialString {
    PartialString::from(label)
}

/// Left-to-right sequential composition.
fn seq(parts: &[&PartialString]) -> PartialString {
    parts[1..].iter().fold(parts[0].clone(), |acc, p| acc.sequential(p))
}

fn seq_programs(parts: &[&Program]) -> Program {
    parts[1..].iter().fold(parts[0].clone(), |acc, p| acc.sequential(p))
}

// ─── Read-from ─────────────────────────────────────────────────────────────────

#[test]
fn read_from_same_address() {
    let Some(mut r) = refinement() else { return };

    let x = ps(release_store_label(A, 1));
    let y = ps(release_store_label(A, 2));
    let z = ps(acquire_load_label(A));
    let p = &x.sequential(&y) | &z;

    assert!(r.check(&seq(&[&x, &z, &y]), &p).unwrap());
    assert!(r.check(&seq(&[&x, &y, &z]), &p).unwrap());

    // violates the order of `x` and `y` in `p`
    assert!(!r.check(&seq(&[&y, &x, &z]), &p).unwrap());
    assert!(!r.check(&seq(&[&y, &z, &x]), &p).unwrap());

    // a store with the same label may take the place of `y`
    let alike_y = ps(release_store_label(A, 2));
    assert!(r
        .check(&seq(&[&y, &z, &alike_y]), &(&alike_y.sequential(&y) | &z))
        .unwrap());

    // an acquire load cannot happen before every store to its address
    assert!(!r.check(&seq(&[&z, &y, &x]), &p).unwrap());
    assert!(!r.check(&seq(&[&z, &x, &y]), &p).unwrap());
    assert!(!r.check(&z.sequential(&(&x | &y)), &p).unwrap());
}

#[test]
fn read_from_different_address() {
    let Some(mut r) = refinement() else { return };

    let x = ps(release_store_label(A, 0));
    let y = ps(release_store_label(B, 0));
    let z = ps(acquire_load_label(A));
    let p = &x.sequential(&y) | &z;

    assert!(r.check(&seq(&[&x, &z, &y]), &p).unwrap());
    assert!(r.check(&seq(&[&x, &y, &z]), &p).unwrap());
    assert!(!r.check(&seq(&[&y, &x, &z]), &p).unwrap());
    assert!(!r.check(&seq(&[&y, &z, &x]), &p).unwrap());

    let unordered = &(&x | &y) | &z;
    assert!(r.check(&seq(&[&y, &x, &z]), &unordered).unwrap());
    assert!(!r.check(&seq(&[&y, &z, &x]), &unordered).unwrap());

    assert!(!r.check(&seq(&[&z, &y, &x]), &p).unwrap());
    assert!(!r.check(&z.sequential(&(&x | &y)), &p).unwrap());
}

// ─── Modification order ────────────────────────────────────────────────────────

#[test]
fn modification_order_same_address() {
    let Some(mut r) = refinement() else { return };

    let x = ps(release_store_label(A, 0));
    let y = ps(release_store_label(A, 0));
    let p = &x | &y;

    assert!(r.check(&x.sequential(&y), &p).unwrap());
    assert!(r.check(&y.sequential(&x), &p).unwrap());

    // no two release stores to one address are concurrent, even without loads
    assert!(!r.check(&p, &p).unwrap());
}

#[test]
fn modification_order_different_address() {
    let Some(mut r) = refinement() else { return };

    let x = ps(release_store_label(A, 0));
    let y = ps(release_store_label(B, 0));
    let p = &x | &y;

    assert!(r.check(&x.sequential(&y), &p).unwrap());
    assert!(r.check(&y.sequential(&x), &p).unwrap());
    assert!(r.check(&p, &p).unwrap());
}

// ─── Relaxed programs ──────────────────────────────────────────────────────────

#[test]
fn relaxed_program() {
    let Some(mut r) = refinement() else { return };

    let u = Program::from(release_store_label(A, 1));
    let v = Program::from(release_store_label(A, 2));
    let x = Program::from(acquire_load_label(A));
    let y = Program::from(acquire_load_label(A));
    let p = &u.sequential(&v) | &x.sequential(&y);

    for good in [
        seq_programs(&[&u, &x, &y, &v]),
        seq_programs(&[&u, &x, &v, &y]),
        seq_programs(&[&u, &v, &x, &y]),
        seq_programs(&[&u, &v, &y, &x]),
        seq_programs(&[&u, &y, &x, &v]),
    ] {
        assert!(r.check_programs(&good, &p).unwrap());
    }

    for bad in [
        p.clone(),
        seq_programs(&[&v, &x, &y, &v]),
        seq_programs(&[&u, &x, &y, &u]),
        seq_programs(&[&v, &x, &y, &u]),
        seq_programs(&[&(&u | &v), &x, &y]),
        seq_programs(&[&u, &v, &(&x | &y)]),
        seq_programs(&[&x, &u, &y, &v]),
        seq_programs(&[&x, &y, &u, &v]),
        seq_programs(&[&y, &u, &x, &v]),
    ] {
        assert!(!r.check_programs(&bad, &p).unwrap());
    }
}

/// `[x] := 0; [y] := 0; (r0 := [x] | r1 := [y] | [y] := 2 | [x] := 1)`
///
/// Without memory axioms the program refines itself. With them, from-read
/// forces each load between the initial store and the later store, an order
/// the left-hand side does not have.
#[test]
fn from_read_with_multiple_writes() {
    let Some(solver) = common::z3_or_skip() else { return };
    let Some(mut r) = refinement() else { return };
    let mut plain = Refinement::new(solver);

    let init_x = Program::from(release_store_label(A, 0));
    let init_y = Program::from(release_store_label(B, 0));
    let w_y = Program::from(release_store_label(B, 2));
    let w_x = Program::from(release_store_label(A, 1));
    let r_x = Program::from(acquire_load_label(A));
    let r_y = Program::from(acquire_load_label(B));

    let threads = &(&(&r_x | &r_y) | &w_y) | &w_x;
    let p = seq_programs(&[&init_x, &init_y, &threads]);

    assert!(plain.check_programs(&p, &p).unwrap());
    assert!(!r.check_programs(&p, &p).unwrap());
}

// ─── Assumptions ───────────────────────────────────────────────────────────────

#[test]
fn failing_assumption() {
    let Some(mut r) = refinement() else { return };

    let w = Program::from(release_store_label(A, 0));
    let neq = Program::from(assume_acquire_neq_label(A, 0));
    let eq = Program::from(assume_acquire_eq_label(A, 0));

    let p = w.sequential(&neq);
    let q = w.sequential(&eq);

    assert!(!r.check_programs(&p, &p).unwrap());
    assert!(!r.check_programs(&p, &q).unwrap());
    assert!(!r.check_programs(&q, &p).unwrap());
    assert!(r.check_programs(&q, &q).unwrap());
}

#[test]
fn assumptions_with_unsequenced_writes() {
    let Some(mut r) = refinement() else { return };

    let w1 = Program::from(release_store_label(A, 1));
    let w2 = Program::from(release_store_label(A, 2));
    let a1 = Program::from(assume_acquire_eq_label(A, 1));
    let a2 = Program::from(assume_acquire_eq_label(A, 2));

    let u = (&w1 | &w2).sequential(&(&a1 + &a2));

    assert!(r.check_programs(&seq_programs(&[&w2, &w1, &a1]), &u).unwrap());
    assert!(r.check_programs(&seq_programs(&[&w1, &w2, &a2]), &u).unwrap());

    // the assume cannot read an overwritten value
    assert!(!r.check_programs(&seq_programs(&[&w2, &w1, &a2]), &u).unwrap());
    assert!(!r.check_programs(&seq_programs(&[&w1, &w2, &a1]), &u).unwrap());
}

#[test]
fn assumptions_with_sequenced_writes() {
    let Some(mut r) = refinement() else { return };

    let w1 = Program::from(release_store_label(A, 1));
    let w2 = Program::from(release_store_label(A, 2));
    let eq = Program::from(assume_acquire_eq_label(A, 1));
    let neq = Program::from(assume_acquire_neq_label(A, 1));

    let x = seq_programs(&[&w1, &(&eq + &neq), &w2]);

    assert!(r.check_programs(&seq_programs(&[&w1, &eq, &w2]), &x).unwrap());
    assert!(!r.check_programs(&seq_programs(&[&w1, &neq, &w2]), &x).unwrap());
}
