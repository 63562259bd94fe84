use std::cmp::min;

use crate::node::Node;
use crate::reference::Ref;
use crate::utils::MyHash;

#[derive(Clone)]
struct Slot {
    node: Node,
    /// Owner count: structural parents plus external registrations.
    ref_count: u32,
    /// Bucket chain link while occupied, free-list link while vacant.
    next: u32,
    occupied: bool,
}

impl Default for Slot {
    fn default() -> Self {
        Self {
            node: Node::default(),
            ref_count: 0,
            next: 0,
            occupied: false,
        }
    }
}

/// Arena of decision nodes with an intrusive unique index.
///
/// Slots live in one contiguous allocation of `2^bits` entries. Occupied
/// slots are chained into hash buckets through their `next` field, which
/// makes the arena double as the unique table. Vacant slots are threaded
/// into a free list through the same field and reused before the arena
/// grows towards its capacity. Slot 0 is a sentry terminating every chain.
pub struct NodeStore {
    slots: Vec<Slot>,

    buckets: Vec<u32>,
    bitmask: u64,

    /// Head of the free list (0 = empty).
    free: u32,
    /// Index of the last slot ever handed out.
    last_index: u32,
    /// Number of occupied slots (sentry excluded).
    real_size: usize,
}

impl NodeStore {
    /// Create a new store of size `2^bits`.
    pub fn new(bits: usize) -> Self {
        assert!(bits <= 31, "Storage bits should be in the range 0..=31");

        let capacity = 1 << bits;
        let mut slots: Vec<Slot> = Vec::with_capacity(capacity);
        slots.resize_with(capacity, Slot::default);
        slots[0].occupied = true; // Set 0th slot as occupied (sentry).

        let buckets_bits = min(bits, 16);
        let buckets_size = 1 << buckets_bits;
        let buckets = vec![0; buckets_size];
        let bitmask = (buckets_size - 1) as u64;

        Self {
            slots,
            buckets,
            bitmask,
            free: 0,
            last_index: 0,
            real_size: 0,
        }
    }

    /// Get the capacity of the store.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }
    /// Get the highest slot index handed out so far.
    pub fn size(&self) -> usize {
        self.last_index as usize
    }
    /// Get the number of occupied slots.
    pub fn real_size(&self) -> usize {
        self.real_size
    }

    /// Get a copy of the node at the given index.
    pub fn node(&self, index: u32) -> Node {
        assert_ne!(index, 0, "Index is 0");
        self.slots[index as usize].node
    }
    pub fn variable(&self, index: u32) -> u32 {
        self.node(index).variable
    }
    pub fn low(&self, index: u32) -> Ref {
        self.node(index).low
    }
    pub fn high(&self, index: u32) -> Ref {
        self.node(index).high
    }

    /// Check if the slot at the given index is occupied.
    pub fn is_occupied(&self, index: u32) -> bool {
        assert_ne!(index, 0, "Index is 0");
        self.slots[index as usize].occupied
    }

    pub fn ref_count(&self, index: u32) -> u32 {
        assert_ne!(index, 0, "Index is 0");
        self.slots[index as usize].ref_count
    }

    /// Add one owner to the slot and return the new count.
    pub fn inc_ref(&mut self, index: u32) -> u32 {
        assert!(self.is_occupied(index), "Slot {} is vacant", index);
        let slot = &mut self.slots[index as usize];
        slot.ref_count += 1;
        slot.ref_count
    }

    /// Drop one owner from the slot and return the new count.
    pub fn dec_ref(&mut self, index: u32) -> u32 {
        assert!(self.is_occupied(index), "Slot {} is vacant", index);
        let slot = &mut self.slots[index as usize];
        assert!(slot.ref_count > 0, "Slot {} has no owners", index);
        slot.ref_count -= 1;
        slot.ref_count
    }

    fn next(&self, index: u32) -> u32 {
        assert_ne!(index, 0, "Index is 0");
        self.slots[index as usize].next
    }
    fn set_next(&mut self, index: u32, next: u32) {
        assert_ne!(index, 0, "Index is 0");
        self.slots[index as usize].next = next;
    }

    /// Allocate a slot, reusing the free list before fresh capacity.
    fn alloc(&mut self) -> u32 {
        let index = if self.free != 0 {
            let index = self.free;
            self.free = self.slots[index as usize].next;
            index
        } else {
            self.last_index += 1;
            self.last_index
        };

        if index as usize >= self.capacity() {
            panic!("Storage is full");
        }

        let slot = &mut self.slots[index as usize];
        slot.occupied = true;
        slot.ref_count = 0;
        self.real_size += 1;

        index
    }

    /// Add a node without indexing it (terminal slots only).
    pub fn add(&mut self, node: Node) -> u32 {
        let index = self.alloc();

        self.slots[index as usize].node = node;
        self.slots[index as usize].next = 0;

        index
    }

    fn bucket_index(&self, node: &Node) -> usize {
        (node.hash() & self.bitmask) as usize
    }

    /// Look up the node in the unique index, inserting it on a miss.
    /// Returns the slot index and whether a new slot was created.
    pub fn put(&mut self, node: Node) -> (u32, bool) {
        let bucket_index = self.bucket_index(&node);
        let mut index = self.buckets[bucket_index];

        if index == 0 {
            // Create a new node and put it into the bucket.
            let i = self.add(node);
            self.buckets[bucket_index] = i;
            return (i, true);
        }

        loop {
            assert!(index > 0);

            if node == self.node(index) {
                // The node already exists.
                return (index, false);
            }

            let next = self.next(index);

            if next == 0 {
                // Create a new node and append it to the bucket.
                let i = self.add(node);
                self.set_next(index, i);
                return (i, true);
            } else {
                // Go to the next node in the bucket.
                index = next;
            }
        }
    }

    /// Unlink the node from its bucket and return the slot to the free
    /// list. The identity becomes reusable immediately, so callers must
    /// have purged every reference to it first.
    pub fn remove(&mut self, index: u32) {
        assert!(self.is_occupied(index), "Slot {} is vacant", index);
        assert_eq!(self.ref_count(index), 0, "Slot {} still has owners", index);

        let node = self.node(index);
        let bucket_index = self.bucket_index(&node);

        let head = self.buckets[bucket_index];
        if head == index {
            self.buckets[bucket_index] = self.next(index);
        } else {
            let mut prev = head;
            loop {
                assert_ne!(prev, 0, "Slot {} is not in its bucket", index);
                let next = self.next(prev);
                if next == index {
                    self.set_next(prev, self.next(index));
                    break;
                }
                prev = next;
            }
        }

        let slot = &mut self.slots[index as usize];
        slot.occupied = false;
        slot.next = self.free;
        self.free = index;
        self.real_size -= 1;
    }

    /// Indices of all occupied slots (sentry excluded).
    pub fn live_indices(&self) -> impl Iterator<Item = u32> + '_ {
        (1..=self.last_index).filter(|&i| self.slots[i as usize].occupied)
    }
}
