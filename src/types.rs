//! Scalar types shared by partial strings, programs and checkers.
//!
//! Events are dense indices local to one partial string. Labels are small
//! integers; their meaning is up to the caller (see [`crate::memory::label`]
//! for the memory-access encoding), the algebra only compares them.

/// Event identifier, always in `0..len` of the partial string that owns it.
pub type Event = usize;

/// Event label.
pub type Label = u32;

/// Number of events in a partial string.
pub type Length = usize;

/// Ordered pair of events; `(a, b)` reads as "`a` before `b`" in an order
/// relation and as "`a` and `b` are concurrent" in an incomparables list.
pub type EventPair = (Event, Event);
