//! Unique table (hash consing) and computed table of the BDD manager.

use std::cell::Cell;

/// [Szudzik pairing function][szudzik-pairing], wrapping on overflow.
///
/// [szudzik-pairing]: http://szudzik.com/ElegantPairing.pdf
pub(crate) fn pairing2(a: u64, b: u64) -> u64 {
    if a < b {
        b.wrapping_mul(b).wrapping_add(a)
    } else {
        a.wrapping_mul(a).wrapping_add(a).wrapping_add(b)
    }
}

pub(crate) fn pairing3(a: u64, b: u64, c: u64) -> u64 {
    pairing2(pairing2(a, b), c)
}

pub(crate) trait TableHash {
    fn table_hash(&self) -> u64;
}

/// Append-only hash-consing table: equal values share one index.
///
/// Index `0` holds a sentinel and is never returned by [`Table::put`].
pub(crate) struct Table<T> {
    values: Vec<T>,
    next: Vec<usize>,
    buckets: Vec<usize>,
    bitmask: u64,
}

impl<T> Table<T>
where
    T: Default + Eq + TableHash,
{
    /// Create a table with `2^bits` buckets.
    pub fn new(bits: usize) -> Self {
        assert!(bits <= 31, "Bucket bits should be in the range 0..=31");
        let size = 1usize << bits;
        Self {
            values: vec![T::default()],
            next: vec![0],
            buckets: vec![0; size],
            bitmask: (size - 1) as u64,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn value(&self, index: usize) -> &T {
        &self.values[index]
    }

    /// Store `value` outside the hash chains.
    pub fn alloc(&mut self, value: T) -> usize {
        self.values.push(value);
        self.next.push(0);
        self.values.len() - 1
    }

    /// Index of `value`, inserting it if absent.
    pub fn put(&mut self, value: T) -> usize {
        let bucket = (value.table_hash() & self.bitmask) as usize;
        let mut index = self.buckets[bucket];
        while index != 0 {
            if self.values[index] == value {
                return index;
            }
            index = self.next[index];
        }
        let index = self.alloc(value);
        self.next[index] = self.buckets[bucket];
        self.buckets[bucket] = index;
        index
    }
}

/// Direct-mapped lossy cache: a colliding insert evicts the previous entry.
pub(crate) struct Cache<K, V> {
    entries: Vec<Option<(K, V)>>,
    bitmask: u64,
    hits: Cell<usize>,
    misses: Cell<usize>,
}

impl<K, V> Cache<K, V>
where
    K: Eq + TableHash,
    V: Copy,
{
    /// Create a cache with `2^bits` slots.
    pub fn new(bits: usize) -> Self {
        assert!(bits <= 31, "Cache bits should be in the range 0..=31");
        let size = 1usize << bits;
        Self {
            entries: std::iter::repeat_with(|| None).take(size).collect(),
            bitmask: (size - 1) as u64,
            hits: Cell::new(0),
            misses: Cell::new(0),
        }
    }

    pub fn hits(&self) -> usize {
        self.hits.get()
    }
    pub fn misses(&self) -> usize {
        self.misses.get()
    }

    fn slot(&self, key: &K) -> usize {
        (key.table_hash() & self.bitmask) as usize
    }

    pub fn get(&self, key: &K) -> Option<V> {
        match &self.entries[self.slot(key)] {
            Some((k, v)) if k == key => {
                self.hits.set(self.hits.get() + 1);
                Some(*v)
            }
            _ => {
                self.misses.set(self.misses.get() + 1);
                None
            }
        }
    }

    pub fn insert(&mut self, key: K, value: V) {
        let slot = self.slot(&key);
        self.entries[slot] = Some((key, value));
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
    struct Pair(u64, u64);

    impl TableHash for Pair {
        fn table_hash(&self) -> u64 {
            pairing2(self.0, self.1)
        }
    }

    #[test]
    fn test_szudzik() {
        // a\b  0  1  2
        // -------------
        //  0 | 0  1  4
        //  1 | 2  3  5
        //  2 | 6  7  8
        assert_eq!(pairing2(0, 0), 0);
        assert_eq!(pairing2(0, 1), 1);
        assert_eq!(pairing2(1, 0), 2);
        assert_eq!(pairing2(1, 1), 3);
        assert_eq!(pairing2(0, 2), 4);
        assert_eq!(pairing2(1, 2), 5);
        assert_eq!(pairing2(2, 0), 6);
        assert_eq!(pairing2(2, 2), 8);
        // No overflow panic on large inputs.
        pairing3(u64::MAX, u64::MAX, 1);
    }

    #[test]
    fn test_table_hash_consing() {
        let mut table = Table::<Pair>::new(2);
        let a = table.put(Pair(1, 2));
        let b = table.put(Pair(2, 1));
        let c = table.put(Pair(1, 2));
        assert_ne!(a, 0);
        assert_ne!(a, b);
        assert_eq!(a, c);
        assert_eq!(table.len(), 3);
        assert_eq!(table.value(b), &Pair(2, 1));
    }

    #[test]
    fn test_table_collisions() {
        // A single bucket forces every value into one chain.
        let mut table = Table::<Pair>::new(0);
        let indices: Vec<_> = (0..10).map(|i| table.put(Pair(i, i))).collect();
        for (i, &index) in indices.iter().enumerate() {
            assert_eq!(table.put(Pair(i as u64, i as u64)), index);
        }
    }

    #[test]
    fn test_cache() {
        let mut cache = Cache::<Pair, i32>::new(3);

        cache.insert(Pair(1, 2), 3);
        cache.insert(Pair(2, 3), 1);

        assert_eq!(cache.get(&Pair(1, 2)), Some(3));
        assert_eq!(cache.get(&Pair(2, 3)), Some(1));
        assert_eq!(cache.get(&Pair(2, 1)), None);
        assert_eq!(cache.hits(), 2);
        assert_eq!(cache.misses(), 1);
    }
}
