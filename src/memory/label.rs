//! Memory-access labels.
//!
//! ```text
//!  31      12 11     4 3  0
//! +----------+--------+----+
//! | address  |  byte  |kind|
//! +----------+--------+----+
//! ```
//!
//! | kind     | access                          |
//! |----------|---------------------------------|
//! | `0b0000` | non-synchronizing store         |
//! | `0b0001` | non-synchronizing load          |
//! | `0b0010` | release store                   |
//! | `0b0011` | acquire load                    |
//! | `0b0111` | acquire load assuming `!= byte` |
//! | `0b1111` | acquire load assuming `== byte` |
//!
//! Stores are even and loads odd. The address occupies the most significant
//! bits, so ordering labels groups them by address, and the largest label of
//! a partial string bounds the addresses it touches.

use crate::types::Label;

/// Memory location; addresses are assumed dense.
pub type Address = u16;

/// Value written to or expected from memory.
pub type Byte = u8;

const NONE_STORE: Label = 0b0000;
const NONE_LOAD: Label = 0b0001;
const RELEASE_STORE: Label = 0b0010;
const ACQUIRE_LOAD: Label = 0b0011;
const ASSUME_NEQ: Label = 0b0111;
const ASSUME_EQ: Label = 0b1111;

const fn encode(address: Address, byte: Byte, kind: Label) -> Label {
    ((address as Label) << 12) | ((byte as Label) << 4) | kind
}

pub const fn none_store_label(address: Address, byte: Byte) -> Label {
    encode(address, byte, NONE_STORE)
}

pub const fn none_load_label(address: Address) -> Label {
    encode(address, 0, NONE_LOAD)
}

pub const fn release_store_label(address: Address, byte: Byte) -> Label {
    encode(address, byte, RELEASE_STORE)
}

pub const fn acquire_load_label(address: Address) -> Label {
    encode(address, 0, ACQUIRE_LOAD)
}

/// Acquire load that continues only if it reads `byte`.
pub const fn assume_acquire_eq_label(address: Address, byte: Byte) -> Label {
    encode(address, byte, ASSUME_EQ)
}

/// Acquire load that continues only if it reads anything but `byte`.
pub const fn assume_acquire_neq_label(address: Address, byte: Byte) -> Label {
    encode(address, byte, ASSUME_NEQ)
}

pub const fn is_store(label: Label) -> bool {
    label & 1 == 0
}

pub const fn is_load(label: Label) -> bool {
    label & 1 == 1
}

pub const fn is_none_store(label: Label) -> bool {
    label & 0xF == NONE_STORE
}

pub const fn is_none_load(label: Label) -> bool {
    label & 0xF == NONE_LOAD
}

pub const fn is_release_store(label: Label) -> bool {
    label & 0xF == RELEASE_STORE
}

/// Includes the assume variants.
pub const fn is_acquire_load(label: Label) -> bool {
    label & 0b11 == ACQUIRE_LOAD
}

pub const fn is_assume(label: Label) -> bool {
    label & 0b111 == ASSUME_NEQ
}

pub const fn is_assume_acquire_eq(label: Label) -> bool {
    label & 0xF == ASSUME_EQ
}

pub const fn is_assume_acquire_neq(label: Label) -> bool {
    label & 0xF == ASSUME_NEQ
}

/// Byte written by a store or expected by an assume.
pub fn byte(label: Label) -> Byte {
    debug_assert!(is_store(label) || is_assume(label));
    ((label >> 4) & 0xFF) as Byte
}

pub const fn address(label: Label) -> Address {
    (label >> 12) as Address
}

/// Does a release `store` write the location an acquire `load` reads?
///
/// # Panics
///
/// Panics if `store` is not a release store or `load` not an acquire load.
pub fn is_shared(store: Label, load: Label) -> bool {
    assert!(is_release_store(store), "Label {} is not a release store", store);
    assert!(is_acquire_load(load), "Label {} is not an acquire load", load);
    address(store) == address(load)
}
