use std::fmt::{Display, Formatter};
use std::ops::Neg;

/// Edge to a BDD node. Negative values are complemented edges.
#[derive(Debug, Default, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Ref(i32);

impl Ref {
    pub(crate) const fn positive(index: u32) -> Self {
        Self(index as i32)
    }

    pub const fn is_negated(self) -> bool {
        self.0 < 0
    }

    /// Index of the referenced node.
    pub const fn index(self) -> usize {
        self.0.unsigned_abs() as usize
    }

    /// Injective mapping to `u64`, used for hashing: `2|i| + [i < 0]`.
    pub(crate) const fn key(self) -> u64 {
        ((self.0.unsigned_abs() as u64) << 1) | (self.0 < 0) as u64
    }
}

impl Neg for Ref {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self(-self.0)
    }
}

impl Display for Ref {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let sign = if self.is_negated() { "~" } else { "" };
        write!(f, "{}@{}", sign, self.index())
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn test_negation() {
        let r = Ref::positive(5);
        assert!(!r.is_negated());
        assert!((-r).is_negated());
        assert_eq!(-(-r), r);
        assert_eq!((-r).index(), 5);
        assert_eq!(r.to_string(), "@5");
        assert_eq!((-r).to_string(), "~@5");
    }

    #[test]
    fn test_key_is_injective() {
        assert_eq!(Ref::positive(3).key(), 6);
        assert_eq!((-Ref::positive(3)).key(), 7);
        assert_ne!(Ref::positive(1).key(), (-Ref::positive(1)).key());
    }
}
