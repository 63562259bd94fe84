//! The opaque-handle boundary.

use std::cell::RefCell;

use log::debug;

use crate::engine::Engine;
use crate::error::{EngineError, Result};
use crate::handle::{Handle, HandleTable};
use crate::reference::Ref;

/// A session owns an [`Engine`] and leases its diagrams out as opaque,
/// generation-tagged [`Handle`]s.
///
/// Every handle pins its diagram with one owner; [`Session::dispose`]
/// drops that owner and invalidates the handle. A disposed handle stays
/// invalid even after its slot is reissued, so operating on a stale handle
/// reports [`EngineError::InvalidHandle`] instead of touching a stranger's
/// diagram.
///
/// A session is single-threaded (`RefCell` inside): callers entering from
/// multiple threads must serialize behind one lock.
pub struct Session {
    engine: Engine,
    handles: RefCell<HandleTable>,
}

impl Session {
    pub fn new(storage_bits: usize) -> Self {
        Self {
            engine: Engine::new(storage_bits),
            handles: RefCell::new(HandleTable::new()),
        }
    }

    /// The engine behind this session, for direct diagram work.
    pub fn engine(&self) -> &Engine {
        &self.engine
    }

    /// Number of live handles.
    pub fn live_handles(&self) -> usize {
        self.handles.borrow().len()
    }

    pub fn is_live(&self, handle: Handle) -> bool {
        self.handles.borrow().get(handle).is_some()
    }

    /// Declare a universe of `var_count` variables and lease the TRUE
    /// terminal as the seed: the neutral element of AND, onto which
    /// constraints are conjoined. The universe only grows; a repeated call
    /// with a smaller count keeps the larger universe.
    pub fn create(&self, var_count: i64) -> Result<Handle> {
        if var_count < 0 {
            return Err(EngineError::InvalidArgument {
                reason: format!("negative variable count: {}", var_count),
            });
        }
        if var_count > u32::MAX as i64 {
            return Err(EngineError::InvalidArgument {
                reason: format!("variable count {} is too large", var_count),
            });
        }
        self.engine.declare_vars(var_count as u32);
        Ok(self.register(self.engine.one()))
    }

    /// Conjunction of two leased diagrams, leased out as a new handle.
    /// Both operands must be live; neither is consumed.
    pub fn and(&self, a: Handle, b: Handle) -> Result<Handle> {
        let f = self.resolve(a)?;
        let g = self.resolve(b)?;
        Ok(self.register(self.engine.apply_and(f, g)))
    }

    /// Disjunction of two leased diagrams.
    pub fn or(&self, a: Handle, b: Handle) -> Result<Handle> {
        let f = self.resolve(a)?;
        let g = self.resolve(b)?;
        Ok(self.register(self.engine.apply_or(f, g)))
    }

    /// Lease `node` out under a fresh handle that owns it.
    pub fn register(&self, node: Ref) -> Handle {
        let handle = self.handles.borrow_mut().insert(self.engine.acquire(node));
        debug!("register({}) -> {}", node, handle);
        handle
    }

    /// The node behind a live handle.
    pub fn resolve(&self, handle: Handle) -> Result<Ref> {
        self.handles
            .borrow()
            .get(handle)
            .ok_or(EngineError::InvalidHandle { handle })
    }

    /// Invalidate a handle and drop its owner. Never fails: a stale or
    /// never-issued handle is ignored, so disposing twice is safe.
    pub fn dispose(&self, handle: Handle) {
        let node = self.handles.borrow_mut().remove(handle);
        match node {
            Some(node) => {
                debug!("dispose({}): releasing {}", handle, node);
                self.engine.release(node);
            }
            None => {
                debug!("dispose({}): stale handle, ignoring", handle);
            }
        }
    }
}

impl Default for Session {
    fn default() -> Self {
        Session::new(20)
    }
}
