//! # pomset-rs: refinement and data races of concurrent programs
//!
//! **`pomset-rs`** decides two questions about concurrent programs given as sets of
//! *partial strings* (labelled partial orders, also known as pomsets):
//!
//! - **Refinement**: is every execution of one program also an execution of another?
//! - **Data races**: can a branching program under release-acquire semantics run two
//!   conflicting accesses without ordering them?
//!
//! Both questions are reduced to satisfiability queries over quantifier-free terms and
//! handed to a [`Solver`][crate::smt::Solver].
//!
//! ## Key Features
//!
//! - **Program Algebra**: concurrent (`|`), sequential (`,`) and choice (`+`) composition
//!   of [`Program`]s, plus [`LfpProgram`]s for unbounded self-composition.
//! - **Lazy Enumeration**: a [`LazyProgram`][crate::lazy::LazyProgram] walks the `k`-fold
//!   self-composition of a program one partial string at a time.
//! - **Pluggable Solvers**: an external `z3` process ([`Z3Solver`][crate::smt::z3::Z3Solver])
//!   or a BDD-based boolean abstraction ([`BddSolver`][crate::smt::bdd::BddSolver]) that needs
//!   nothing installed.
//! - **Memory Model**: release-acquire axioms, refinement under them, and a symbolic
//!   data race detector for programs with `if_then` branches.
//!
//! ## Basic Usage
//!
//! ```rust
//! use pomset_rs::memory::label::{none_load_label, none_store_label};
//! use pomset_rs::memory::{DataRaceDetector, SymbolicProgram};
//! use pomset_rs::order::PartialOrderModel;
//! use pomset_rs::smt::bdd::BddSolver;
//!
//! // A non-atomic store and a non-atomic load of address 0
//! let store = SymbolicProgram::from(none_store_label(0, 1));
//! let load = SymbolicProgram::from(none_load_label(0));
//!
//! let mut drd = DataRaceDetector::with_model(BddSolver::new(), PartialOrderModel::default());
//!
//! // Running them concurrently is a race, running them in sequence is not
//! assert!(drd.is_racy(&(&store | &load)).unwrap());
//! assert!(!drd.is_racy(&store.sequential(&load)).unwrap());
//! ```
//!
//! Refinement needs integer arithmetic, so it is usually checked with `z3`:
//!
//! ```rust,no_run
//! use pomset_rs::refinement::{PartialStringChecker, Refinement};
//! use pomset_rs::smt::z3::Z3Solver;
//! use pomset_rs::PartialString;
//!
//! let x = PartialString::from(1);
//! let y = PartialString::from(2);
//!
//! let p = x.sequential(&y);
//! let q = &x | &y;
//!
//! let mut refinement = Refinement::new(Z3Solver::with_default_config()?);
//! assert!(refinement.check(&p, &q)?);
//! assert!(!refinement.check(&q, &p)?);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Core Components
//!
//! - **[`partial_string`]** and **[`program`]**: the algebra.
//! - **[`refinement`]**: the decision procedure and its lifting to programs.
//! - **[`order`]**: encodings of happens-before.
//! - **[`memory`]**: labels, release-acquire, symbolic programs, race detection.
//! - **[`smt`]**: terms, the solver trait and its backends.
//! - **[`bdd`]**: the small BDD engine behind [`BddSolver`][crate::smt::bdd::BddSolver].

pub mod bdd;
pub mod error;
pub mod lazy;
pub mod memory;
pub mod order;
pub mod partial_string;
pub mod program;
pub mod refinement;
pub mod smt;
pub mod types;

pub use error::{Error, Result};
pub use partial_string::PartialString;
pub use program::{LfpProgram, Operator, Program};
