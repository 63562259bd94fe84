use crate::reference::Ref;
use crate::utils::{pairing3, MyHash};

/// Variable index reserved for the two terminal constants.
///
/// It is strictly greater than any declarable variable, so min-variable
/// logic treats terminals as sitting below everything.
pub const TERMINAL_VARIABLE: u32 = u32::MAX;

/// A decision node: branch variable plus low (else) and high (then) children.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct Node {
    pub variable: u32,
    pub low: Ref,
    pub high: Ref,
}

impl Node {
    pub(crate) const fn new(variable: u32, low: Ref, high: Ref) -> Self {
        Self { variable, low, high }
    }

    /// Layout of a terminal constant: no children, variable pinned at the
    /// reserved maximum.
    pub(crate) const fn terminal() -> Self {
        Self {
            variable: TERMINAL_VARIABLE,
            low: Ref::new(0),
            high: Ref::new(0),
        }
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::terminal()
    }
}

impl MyHash for Node {
    fn hash(&self) -> u64 {
        pairing3(
            self.variable as u64,
            self.low.raw() as u64,
            self.high.raw() as u64,
        )
    }
}
