use std::cell::{Cell, RefCell};
use std::cmp::min;
use std::collections::{HashSet, VecDeque};
use std::fmt::{Debug, Display, Formatter};

use log::debug;

use crate::cache::Cache;
use crate::node::{Node, TERMINAL_VARIABLE};
use crate::reference::Ref;
use crate::store::NodeStore;

/// Binary Boolean operators of the apply engine.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Op {
    And,
    Or,
}

impl Display for Op {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Op::And => write!(f, "AND"),
            Op::Or => write!(f, "OR"),
        }
    }
}

/// Memoization key of an apply call.
///
/// Binary operands are stored in identity order: AND and OR are commutative,
/// so `(op, f, g)` and `(op, g, f)` share one entry.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum OpKey {
    Binary(Op, Ref, Ref),
    Not(Ref),
}

/// The diagram manager: arena, unique index, operation cache, and the
/// variable universe, behind a `&self` API with interior mutability.
///
/// Canonicity is maintained end to end: for a fixed variable order, equal
/// functions are always the same [`Ref`]. Nodes are owned by reference
/// counts; see [`Engine::acquire`] for the ownership contract.
pub struct Engine {
    store: RefCell<NodeStore>,
    cache: RefCell<Cache<OpKey, Ref>>,
    var_count: Cell<u32>,
    zero: Ref,
    one: Ref,
}

impl Engine {
    pub fn new(storage_bits: usize) -> Self {
        assert!(
            storage_bits <= 31,
            "Storage bits should be in the range 0..=31"
        );

        let cache_bits = min(storage_bits, 16);

        let mut store = NodeStore::new(storage_bits);

        // Allocate the two terminal constants:
        let zero = store.add(Node::terminal());
        assert_eq!(zero, 1); // Make sure the FALSE terminal is (1).
        let one = store.add(Node::terminal());
        assert_eq!(one, 2); // Make sure the TRUE terminal is (2).

        Self {
            store: RefCell::new(store),
            cache: RefCell::new(Cache::new(cache_bits)),
            var_count: Cell::new(0),
            zero: Ref::new(zero),
            one: Ref::new(one),
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new(20)
    }
}

impl Debug for Engine {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let store = self.store.borrow();
        f.debug_struct("Engine")
            .field("capacity", &store.capacity())
            .field("size", &store.size())
            .field("real_size", &store.real_size())
            .field("var_count", &self.var_count.get())
            .finish()
    }
}

impl Engine {
    /// The FALSE terminal.
    pub fn zero(&self) -> Ref {
        self.zero
    }
    /// The TRUE terminal.
    pub fn one(&self) -> Ref {
        self.one
    }

    pub fn is_zero(&self, node: Ref) -> bool {
        node == self.zero
    }
    pub fn is_one(&self, node: Ref) -> bool {
        node == self.one
    }
    pub fn is_terminal(&self, node: Ref) -> bool {
        self.is_zero(node) || self.is_one(node)
    }

    /// Branch variable of a node; terminals report [`TERMINAL_VARIABLE`].
    pub fn variable(&self, node: Ref) -> u32 {
        self.store.borrow().variable(node.raw())
    }
    pub fn low(&self, node: Ref) -> Ref {
        self.store.borrow().low(node.raw())
    }
    pub fn high(&self, node: Ref) -> Ref {
        self.store.borrow().high(node.raw())
    }

    /// Number of declared variables.
    pub fn var_count(&self) -> u32 {
        self.var_count.get()
    }

    /// Extend the variable universe to `n` variables (indices `0..n`).
    ///
    /// The universe only grows, and the positions of existing variables
    /// never change.
    pub fn declare_vars(&self, n: u32) {
        if n > self.var_count.get() {
            debug!(
                "declare_vars: extending universe from {} to {} variables",
                self.var_count.get(),
                n
            );
            self.var_count.set(n);
        }
    }

    /// Number of live nodes in the arena, terminals included.
    pub fn num_nodes(&self) -> usize {
        self.store.borrow().real_size()
    }

    /// Owner count of a node (terminals are immortal and uncounted).
    pub fn ref_count(&self, node: Ref) -> u32 {
        if self.is_terminal(node) {
            return 0;
        }
        self.store.borrow().ref_count(node.raw())
    }

    /// Hit and miss counters of the operation cache.
    pub fn cache_stats(&self) -> (usize, usize) {
        let cache = self.cache.borrow();
        (cache.hits(), cache.misses())
    }

    /// Look up or create the node `(v, low, high)`.
    ///
    /// This is the unique-table entry point: a node with equal children is
    /// never materialized (reduction), and an existing node with the same
    /// triple is returned as-is (canonicity). A fresh node starts with no
    /// owners; its children each gain one structural owner.
    pub fn mk_node(&self, v: u32, low: Ref, high: Ref) -> Ref {
        debug!("mk(v = {}, low = {}, high = {})", v, low, high);

        assert!(v < self.var_count.get(), "Variable {} is not declared", v);

        // Reduction
        if low == high {
            debug!("mk: duplicates {} == {}", low, high);
            return low;
        }

        // Ordering
        assert!(v < self.variable(low), "x{} is not above low = {}", v, low);
        assert!(v < self.variable(high), "x{} is not above high = {}", v, high);

        let (index, created) = self.store.borrow_mut().put(Node::new(v, low, high));
        let res = Ref::new(index);
        if created {
            debug!("mk: created {} := (x{}, {}, {})", res, v, low, high);
            self.acquire(low);
            self.acquire(high);
        }
        res
    }

    /// The function of a single variable.
    pub fn mk_var(&self, v: u32) -> Ref {
        self.mk_node(v, self.zero, self.one)
    }

    /// A single literal: the variable itself, or its negation.
    pub fn mk_literal(&self, v: u32, value: bool) -> Ref {
        if value {
            self.mk_node(v, self.zero, self.one)
        } else {
            self.mk_node(v, self.one, self.zero)
        }
    }

    /// Conjunction of literals over distinct variables, built directly
    /// without apply calls.
    pub fn mk_cube(&self, literals: impl IntoIterator<Item = (u32, bool)>) -> Ref {
        let mut literals: Vec<_> = literals.into_iter().collect();
        literals.sort_by_key(|&(v, _)| v);
        debug!("cube(literals = {:?})", literals);
        for pair in literals.windows(2) {
            assert_ne!(pair[0].0, pair[1].0, "Duplicate variable {}", pair[0].0);
        }
        let mut current = self.one;
        for &(v, value) in literals.iter().rev() {
            current = if value {
                self.mk_node(v, self.zero, current)
            } else {
                self.mk_node(v, current, self.zero)
            };
        }
        current
    }

    /// Disjunction of literals over distinct variables.
    pub fn mk_clause(&self, literals: impl IntoIterator<Item = (u32, bool)>) -> Ref {
        let mut literals: Vec<_> = literals.into_iter().collect();
        literals.sort_by_key(|&(v, _)| v);
        debug!("clause(literals = {:?})", literals);
        for pair in literals.windows(2) {
            assert_ne!(pair[0].0, pair[1].0, "Duplicate variable {}", pair[0].0);
        }
        let mut current = self.zero;
        for &(v, value) in literals.iter().rev() {
            current = if value {
                self.mk_node(v, current, self.one)
            } else {
                self.mk_node(v, self.one, current)
            };
        }
        current
    }

    /// Cofactors of `node` with respect to `v`, which must not sit below
    /// the node's own branch variable.
    pub fn top_cofactors(&self, node: Ref, v: u32) -> (Ref, Ref) {
        if self.is_terminal(node) || v < self.variable(node) {
            return (node, node);
        }
        assert_eq!(v, self.variable(node));
        (self.low(node), self.high(node))
    }

    /// Apply a binary Boolean operator to two diagrams.
    ///
    /// Bryant's recursion: terminal short-circuits first, then the memo
    /// cache, then a split on the smallest top variable, rebuilding through
    /// [`Engine::mk_node`]. Depth is bounded by the number of declared
    /// variables, since variables strictly increase along every path.
    pub fn apply(&self, op: Op, f: Ref, g: Ref) -> Ref {
        debug!("apply({}, f = {}, g = {})", op, f, g);

        if let Some(res) = self.apply_terminal(op, f, g) {
            debug!("apply({}, {}, {}): short-circuit -> {}", op, f, g, res);
            return res;
        }

        // Both operators are commutative: order the operands by identity
        // so that either argument order lands on the same memo entry.
        let (f, g) = if f <= g { (f, g) } else { (g, f) };

        let key = OpKey::Binary(op, f, g);
        if let Some(res) = self.cache.borrow_mut().get(&key) {
            debug!("cache: apply({}, {}, {}) -> {}", op, f, g, res);
            return res;
        }

        // Split on the smallest top variable; terminals sit below everything.
        let v = min(self.variable(f), self.variable(g));
        debug!("min variable = {}", v);
        assert_ne!(v, TERMINAL_VARIABLE);

        let (f0, f1) = self.top_cofactors(f, v);
        debug!("cofactors of f = {} are: f0 = {}, f1 = {}", f, f0, f1);
        let (g0, g1) = self.top_cofactors(g, v);
        debug!("cofactors of g = {} are: g0 = {}, g1 = {}", g, g0, g1);

        let low = self.apply(op, f0, g0);
        let high = self.apply(op, f1, g1);

        let res = self.mk_node(v, low, high);
        debug!("computed: apply({}, {}, {}) -> {}", op, f, g, res);
        self.cache.borrow_mut().insert(key, res);
        res
    }

    /// Terminal short-circuits, checked before any allocation or cache
    /// probe. One-sided rules fire even when the other operand is a
    /// non-terminal.
    fn apply_terminal(&self, op: Op, f: Ref, g: Ref) -> Option<Ref> {
        match op {
            Op::And => {
                if f == g {
                    return Some(f);
                }
                if self.is_zero(f) || self.is_zero(g) {
                    return Some(self.zero);
                }
                if self.is_one(f) {
                    return Some(g);
                }
                if self.is_one(g) {
                    return Some(f);
                }
            }
            Op::Or => {
                if f == g {
                    return Some(f);
                }
                if self.is_one(f) || self.is_one(g) {
                    return Some(self.one);
                }
                if self.is_zero(f) {
                    return Some(g);
                }
                if self.is_zero(g) {
                    return Some(f);
                }
            }
        }
        None
    }

    pub fn apply_and(&self, f: Ref, g: Ref) -> Ref {
        self.apply(Op::And, f, g)
    }

    pub fn apply_or(&self, f: Ref, g: Ref) -> Ref {
        self.apply(Op::Or, f, g)
    }

    /// Conjunction of many diagrams, folded left to right.
    pub fn apply_and_many(&self, nodes: impl IntoIterator<Item = Ref>) -> Ref {
        let mut res = self.one;
        for node in nodes {
            res = self.apply_and(res, node);
        }
        res
    }

    /// Disjunction of many diagrams, folded left to right.
    pub fn apply_or_many(&self, nodes: impl IntoIterator<Item = Ref>) -> Ref {
        let mut res = self.zero;
        for node in nodes {
            res = self.apply_or(res, node);
        }
        res
    }

    /// Negation, computed recursively with its own memo entries.
    pub fn apply_not(&self, f: Ref) -> Ref {
        debug!("apply_not(f = {})", f);

        if self.is_zero(f) {
            return self.one;
        }
        if self.is_one(f) {
            return self.zero;
        }

        let key = OpKey::Not(f);
        if let Some(res) = self.cache.borrow_mut().get(&key) {
            debug!("cache: apply_not({}) -> {}", f, res);
            return res;
        }

        let v = self.variable(f);
        let low = self.apply_not(self.low(f));
        let high = self.apply_not(self.high(f));

        let res = self.mk_node(v, low, high);
        debug!("computed: apply_not({}) -> {}", f, res);
        self.cache.borrow_mut().insert(key, res);
        res
    }

    /// Register one owner on `node` and hand it back.
    ///
    /// Constructors and apply calls return nodes with no implicit
    /// ownership: a caller that keeps a root across other engine calls
    /// must acquire it, and release it once done with it. Terminals are
    /// immortal and not counted.
    pub fn acquire(&self, node: Ref) -> Ref {
        if self.is_terminal(node) {
            return node;
        }
        let count = self.store.borrow_mut().inc_ref(node.raw());
        debug!("acquire({}): {} owners", node, count);
        node
    }

    /// Drop one owner from `node`, reclaiming it when the last owner is
    /// gone. Releasing a node that has no owners is a usage error and
    /// panics.
    pub fn release(&self, node: Ref) {
        if self.is_terminal(node) {
            return;
        }
        let count = self.store.borrow_mut().dec_ref(node.raw());
        debug!("release({}): {} owners", node, count);
        if count == 0 {
            self.reclaim(node);
        }
    }

    /// Sweep a dead node out of the arena and the unique index, cascading
    /// into each child whose last owner was the dying parent. Any
    /// reclamation flushes the operation cache: an entry may name a dead
    /// identity, and a reused slot must never satisfy a stale lookup.
    fn reclaim(&self, root: Ref) {
        let mut dead = vec![root];
        let mut reclaimed = 0usize;

        while let Some(node) = dead.pop() {
            let mut store = self.store.borrow_mut();
            let n = store.node(node.raw());
            debug!(
                "reclaim: dropping {} := (x{}, {}, {})",
                node, n.variable, n.low, n.high
            );
            store.remove(node.raw());
            reclaimed += 1;
            for child in [n.low, n.high] {
                if child == self.zero || child == self.one {
                    continue;
                }
                if store.dec_ref(child.raw()) == 0 {
                    dead.push(child);
                }
            }
        }

        debug!("reclaim: dropped {} nodes, flushing the op cache", reclaimed);
        self.cache.borrow_mut().clear();
    }

    /// Follow one path down to a terminal under a full assignment
    /// (`assignment[v]` is the value of variable `v`).
    pub fn evaluate(&self, f: Ref, assignment: &[bool]) -> bool {
        let mut current = f;
        while !self.is_terminal(current) {
            let v = self.variable(current) as usize;
            current = if assignment[v] {
                self.high(current)
            } else {
                self.low(current)
            };
        }
        self.is_one(current)
    }

    /// Every node reachable from `roots`, terminals included.
    pub fn descendants(&self, roots: impl IntoIterator<Item = Ref>) -> HashSet<Ref> {
        let mut visited = HashSet::new();
        let mut queue = VecDeque::from_iter(roots);

        while let Some(node) = queue.pop_front() {
            if visited.insert(node) && !self.is_terminal(node) {
                queue.push_back(self.low(node));
                queue.push_back(self.high(node));
            }
        }

        visited
    }

    /// Number of nodes reachable from `f`, terminals included.
    pub fn size(&self, f: Ref) -> u64 {
        self.descendants([f]).len() as u64
    }

    pub fn to_bracket_string(&self, node: Ref) -> String {
        if self.is_zero(node) {
            return "(0)".to_string();
        } else if self.is_one(node) {
            return "(1)".to_string();
        }

        let v = self.variable(node);
        format!(
            "{}:(x{}, {}, {})",
            node,
            v,
            self.to_bracket_string(self.high(node)),
            self.to_bracket_string(self.low(node))
        )
    }
}
