use std::fmt::{Display, Formatter};

/// Identity of a node in the engine's arena.
///
/// A `Ref` is a dense slot index. Index 0 is a reserved sentry and never
/// denotes a live node; the two terminal constants occupy indices 1 and 2.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Ref(u32);

impl Ref {
    pub(crate) const fn new(index: u32) -> Self {
        Self(index)
    }

    /// Return the slot index of the reference.
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    pub(crate) const fn raw(self) -> u32 {
        self.0
    }
}

impl Display for Ref {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "@{}", self.0)
    }
}
