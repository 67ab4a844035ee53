//! Reduced ordered binary decision diagrams with complement edges.
//!
//! Backing engine of [`crate::smt::bdd::BddSolver`]. All operations go
//! through the [`Bdd`] manager, which hash-conses nodes so that every boolean
//! function over a fixed variable order has exactly one [`Ref`]. In
//! particular a function is unsatisfiable iff its reference is [`Bdd::zero`].
//!
//! Variables are 1-indexed; smaller indices are closer to the root.
//!
//! ```
//! use pomset_rs::bdd::Bdd;
//!
//! let bdd = Bdd::default();
//! let x = bdd.mk_var(1);
//! let y = bdd.mk_var(2);
//! let f = bdd.apply_and(x, -y);
//! assert!(!bdd.is_zero(f));
//! assert!(bdd.is_zero(bdd.apply_and(f, y)));
//! ```

use std::cell::RefCell;
use std::collections::HashSet;
use std::fmt::Debug;

use log::trace;

pub mod reference;
mod table;

pub use reference::Ref;
use table::{pairing3, Cache, Table, TableHash};

#[derive(Debug, Default, Copy, Clone, Eq, PartialEq)]
struct Node {
    variable: u32,
    low: Ref,
    high: Ref,
}

impl TableHash for Node {
    fn table_hash(&self) -> u64 {
        pairing3(self.variable as u64, self.low.key(), self.high.key())
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
struct IteKey(Ref, Ref, Ref);

impl TableHash for IteKey {
    fn table_hash(&self) -> u64 {
        pairing3(self.0.key(), self.1.key(), self.2.key())
    }
}

pub struct Bdd {
    nodes: RefCell<Table<Node>>,
    cache: RefCell<Cache<IteKey, Ref>>,
    pub zero: Ref,
    pub one: Ref,
}

impl Bdd {
    /// Create a manager with `2^bits` unique-table buckets and cache slots.
    pub fn new(bits: usize) -> Self {
        let mut nodes = Table::new(bits);

        // Terminal node, always at index 1.
        let one = nodes.alloc(Node::default());
        assert_eq!(one, 1);
        let one = Ref::positive(one as u32);

        Self {
            nodes: RefCell::new(nodes),
            cache: RefCell::new(Cache::new(bits)),
            zero: -one,
            one,
        }
    }
}

impl Default for Bdd {
    fn default() -> Self {
        Bdd::new(16)
    }
}

impl Debug for Bdd {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cache = self.cache.borrow();
        f.debug_struct("Bdd")
            .field("nodes", &self.nodes.borrow().len())
            .field("cache_hits", &cache.hits())
            .field("cache_misses", &cache.misses())
            .finish()
    }
}

impl Bdd {
    fn node(&self, index: usize) -> Node {
        *self.nodes.borrow().value(index)
    }

    /// Top variable of `node`, `0` for terminals.
    pub fn variable(&self, node: Ref) -> u32 {
        self.node(node.index()).variable
    }

    pub fn low(&self, node: Ref) -> Ref {
        let low = self.node(node.index()).low;
        if node.is_negated() {
            -low
        } else {
            low
        }
    }

    pub fn high(&self, node: Ref) -> Ref {
        let high = self.node(node.index()).high;
        if node.is_negated() {
            -high
        } else {
            high
        }
    }

    pub fn is_zero(&self, node: Ref) -> bool {
        node == self.zero
    }
    pub fn is_one(&self, node: Ref) -> bool {
        node == self.one
    }
    pub fn is_terminal(&self, node: Ref) -> bool {
        node.index() == self.one.index()
    }

    /// Number of allocated nodes, terminal included.
    pub fn num_nodes(&self) -> usize {
        self.nodes.borrow().len() - 1
    }

    pub fn mk_node(&self, v: u32, low: Ref, high: Ref) -> Ref {
        assert_ne!(v, 0, "Variable index should not be zero");

        // High edges are never complemented.
        if high.is_negated() {
            return -self.mk_node(v, -low, -high);
        }
        if low == high {
            return low;
        }

        let index = self.nodes.borrow_mut().put(Node {
            variable: v,
            low,
            high,
        });
        let node = Ref::positive(index as u32);
        trace!("mk(v = {}, low = {}, high = {}) -> {}", v, low, high, node);
        node
    }

    pub fn mk_var(&self, v: u32) -> Ref {
        self.mk_node(v, self.zero, self.one)
    }

    /// Cofactors of `node` with respect to `v`, which must not be below the
    /// top variable of `node`.
    fn top_cofactors(&self, node: Ref, v: u32) -> (Ref, Ref) {
        if self.is_terminal(node) || v < self.variable(node) {
            return (node, node);
        }
        debug_assert_eq!(v, self.variable(node));
        (self.low(node), self.high(node))
    }

    /// `ite(f, g, h) = (f ∧ g) ∨ (¬f ∧ h)`
    pub fn apply_ite(&self, f: Ref, g: Ref, h: Ref) -> Ref {
        // Terminal cases.
        if self.is_one(f) {
            return g;
        }
        if self.is_zero(f) {
            return h;
        }
        if g == h {
            return g;
        }
        if self.is_one(g) && self.is_zero(h) {
            return f;
        }
        if self.is_zero(g) && self.is_one(h) {
            return -f;
        }

        // Standard triples:
        //   ite(F,F,H) => ite(F,1,H)
        //   ite(F,G,F) => ite(F,G,0)
        //   ite(F,~F,H) => ite(F,0,H)
        //   ite(F,G,~F) => ite(F,G,1)
        if g == f {
            return self.apply_ite(f, self.one, h);
        }
        if h == f {
            return self.apply_ite(f, g, self.zero);
        }
        if g == -f {
            return self.apply_ite(f, self.zero, h);
        }
        if h == -f {
            return self.apply_ite(f, g, self.one);
        }

        // Canonical form: f and g regular, result negated instead.
        let (mut f, mut g, mut h) = (f, g, h);
        if f.is_negated() {
            f = -f;
            std::mem::swap(&mut g, &mut h);
        }
        let negate = g.is_negated();
        if negate {
            g = -g;
            h = -h;
        }

        let key = IteKey(f, g, h);
        let cached = self.cache.borrow().get(&key);
        let res = match cached {
            Some(res) => res,
            None => {
                let m = [f, g, h]
                    .into_iter()
                    .map(|node| self.variable(node))
                    .filter(|&v| v != 0)
                    .min()
                    .unwrap_or(0);
                debug_assert_ne!(m, 0);

                let (f0, f1) = self.top_cofactors(f, m);
                let (g0, g1) = self.top_cofactors(g, m);
                let (h0, h1) = self.top_cofactors(h, m);
                let e = self.apply_ite(f0, g0, h0);
                let t = self.apply_ite(f1, g1, h1);
                let res = self.mk_node(m, e, t);
                self.cache.borrow_mut().insert(key, res);
                res
            }
        };

        if negate {
            -res
        } else {
            res
        }
    }

    pub fn apply_not(&self, f: Ref) -> Ref {
        -f
    }

    pub fn apply_and(&self, u: Ref, v: Ref) -> Ref {
        self.apply_ite(u, v, self.zero)
    }

    pub fn apply_or(&self, u: Ref, v: Ref) -> Ref {
        self.apply_ite(u, self.one, v)
    }

    pub fn apply_xor(&self, u: Ref, v: Ref) -> Ref {
        self.apply_ite(u, -v, v)
    }

    pub fn apply_eq(&self, u: Ref, v: Ref) -> Ref {
        self.apply_ite(u, v, -v)
    }

    pub fn apply_imply(&self, u: Ref, v: Ref) -> Ref {
        self.apply_ite(u, v, self.one)
    }

    /// Conjunction of `nodes`, stopping early at zero.
    pub fn apply_and_many(&self, nodes: impl IntoIterator<Item = Ref>) -> Ref {
        let mut res = self.one;
        for node in nodes {
            res = self.apply_and(res, node);
            if self.is_zero(res) {
                break;
            }
        }
        res
    }

    /// Disjunction of `nodes`, stopping early at one.
    pub fn apply_or_many(&self, nodes: impl IntoIterator<Item = Ref>) -> Ref {
        let mut res = self.zero;
        for node in nodes {
            res = self.apply_or(res, node);
            if self.is_one(res) {
                break;
            }
        }
        res
    }

    /// Number of nodes reachable from `f`, terminal included.
    pub fn size(&self, f: Ref) -> usize {
        let mut visited = HashSet::new();
        let mut stack = vec![f.index()];
        while let Some(index) = stack.pop() {
            if visited.insert(index) {
                let node = self.node(index);
                if node.variable != 0 {
                    stack.push(node.low.index());
                    stack.push(node.high.index());
                }
            }
        }
        visited.len()
    }

    /// One satisfying assignment of `f` as signed literals (`v` or `-v`),
    /// or `None` if `f` is zero.
    pub fn one_sat(&self, f: Ref) -> Option<Vec<i32>> {
        if self.is_zero(f) {
            return None;
        }
        let mut path = Vec::new();
        let mut node = f;
        while !self.is_terminal(node) {
            let v = self.variable(node) as i32;
            let high = self.high(node);
            if self.is_zero(high) {
                path.push(-v);
                node = self.low(node);
            } else {
                path.push(v);
                node = high;
            }
        }
        Some(path)
    }
}
