use std::fmt::{Display, Formatter};

use crate::reference::Ref;

/// Opaque boundary handle: a 32-bit table slot packed with a 32-bit
/// generation into one `u64`, the shape a foreign binding passes around as
/// a pointer-sized integer.
///
/// The generation changes every time a slot is released, so a disposed
/// handle keeps failing to resolve even after its slot is reused for a new
/// registration.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct Handle(u64);

impl Handle {
    fn new(slot: u32, generation: u32) -> Self {
        Self(((generation as u64) << 32) | slot as u64)
    }

    fn slot(self) -> u32 {
        self.0 as u32
    }
    fn generation(self) -> u32 {
        (self.0 >> 32) as u32
    }

    /// The raw 64-bit value, for carrying across a foreign boundary.
    pub const fn into_raw(self) -> u64 {
        self.0
    }

    /// Reinterpret a raw 64-bit value as a handle. A value that was never
    /// issued by the table simply fails to resolve.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }
}

impl Display for Handle {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}.{}", self.slot(), self.generation())
    }
}

struct HandleSlot {
    node: Ref,
    generation: u32,
    live: bool,
}

/// Slot map from opaque handles to node identities.
///
/// Vacant slots are reused in LIFO order; resolution checks both liveness
/// and generation, so every stale handle (disposed, double-disposed, or
/// never issued) is rejected.
#[derive(Default)]
pub struct HandleTable {
    slots: Vec<HandleSlot>,
    free: Vec<u32>,
}

impl HandleTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the number of live handles.
    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Issue a fresh handle for `node`.
    pub fn insert(&mut self, node: Ref) -> Handle {
        match self.free.pop() {
            Some(slot) => {
                let s = &mut self.slots[slot as usize];
                s.node = node;
                s.live = true;
                Handle::new(slot, s.generation)
            }
            None => {
                assert!(self.slots.len() < u32::MAX as usize, "Handle table is full");
                let slot = self.slots.len() as u32;
                self.slots.push(HandleSlot {
                    node,
                    generation: 0,
                    live: true,
                });
                Handle::new(slot, 0)
            }
        }
    }

    /// Get the node behind a live handle, or `None` for a stale one.
    pub fn get(&self, handle: Handle) -> Option<Ref> {
        let s = self.slots.get(handle.slot() as usize)?;
        (s.live && s.generation == handle.generation()).then_some(s.node)
    }

    /// Invalidate a live handle and give back its node. Stale handles
    /// return `None` and leave the table untouched.
    pub fn remove(&mut self, handle: Handle) -> Option<Ref> {
        let slot = handle.slot();
        let s = self.slots.get_mut(slot as usize)?;
        if !s.live || s.generation != handle.generation() {
            return None;
        }
        s.live = false;
        s.generation = s.generation.wrapping_add(1);
        self.free.push(slot);
        Some(s.node)
    }
}
