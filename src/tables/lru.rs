use core::{borrow::Borrow, hash::Hash, num::NonZeroUsize};

use alloc::vec::Vec;

use hashbrown::HashMap;

#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LruError {
    #[error("cannot allocate an LRU cache holding {0} entries")]
    CapacityTooLarge(usize),
}

const HEAD: usize = 0;
const TAIL: usize = 1;

#[derive(Debug)]
struct Slot<K, V> {
    entry: Option<(K, V)>,
    prev: usize,
    next: usize,
}

// Least-recently-used cache over a pool of slots allocated once, up front.
// Slots form a doubly linked recency list between two sentinels,
//  most recently used right after HEAD; the map points keys at their slots.
#[derive(Debug)]
pub struct LruCache<K, V> {
    lookup: HashMap<K, usize>,
    slots: Vec<Slot<K, V>>,
    free: Vec<usize>,
    capacity: NonZeroUsize,
}

impl<K: Hash + Eq + Clone, V> LruCache<K, V> {
    // The whole pool is allocated here, so a capacity that cannot be allocated
    //  is refused instead of failing later
    pub fn new(capacity: NonZeroUsize) -> Result<Self, LruError> {
        let n = capacity.get();
        let too_large = LruError::CapacityTooLarge(n);
        let pool_len = n.checked_add(2).ok_or(too_large)?;

        let mut slots = Vec::new();
        slots.try_reserve_exact(pool_len).map_err(|_| too_large)?;
        let mut free = Vec::new();
        free.try_reserve_exact(n).map_err(|_| too_large)?;
        let mut lookup = HashMap::new();
        lookup.try_reserve(n).map_err(|_| too_large)?;

        slots.push(Slot {
            entry: None,
            prev: HEAD,
            next: TAIL,
        });
        slots.push(Slot {
            entry: None,
            prev: HEAD,
            next: TAIL,
        });
        for _ in 0..n {
            slots.push(Slot {
                entry: None,
                prev: HEAD,
                next: HEAD,
            });
        }
        // Popped from the back, so slots are handed out in order
        free.extend((2..pool_len).rev());
        Ok(Self {
            lookup,
            slots,
            free,
            capacity,
        })
    }

    pub fn capacity(&self) -> NonZeroUsize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.lookup.len()
    }

    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.lookup.contains_key(key)
    }

    // Inserts or overwrites the value and makes the key the most recently used.
    // When a new key arrives at a full cache, the least recently used entry
    //  gives up its slot and is returned.
    pub fn put(&mut self, key: K, value: V) -> Option<(K, V)> {
        if let Some(&idx) = self.lookup.get(&key) {
            self.slots[idx].entry = Some((key, value));
            self.move_to_front(idx);
            return None;
        }

        let (idx, evicted) = match self.free.pop() {
            Some(idx) => (idx, None),
            None => {
                // No free slot means the list holds `capacity` entries, none of them a sentinel
                let idx = self.slots[TAIL].prev;
                self.unlink(idx);
                let evicted = self.slots[idx].entry.take();
                if let Some((evicted_key, _)) = &evicted {
                    self.lookup.remove(evicted_key);
                }
                (idx, evicted)
            }
        };

        self.slots[idx].entry = Some((key.clone(), value));
        self.lookup.insert(key, idx);
        self.link_front(idx);
        evicted
    }

    // Returns the value and makes the key the most recently used
    pub fn get<Q>(&mut self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = *self.lookup.get(key)?;
        self.move_to_front(idx);
        self.slots[idx].entry.as_ref().map(|(_, v)| v)
    }

    pub fn remove<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let idx = self.lookup.remove(key)?;
        self.unlink(idx);
        self.free.push(idx);
        self.slots[idx].entry.take().map(|(_, v)| v)
    }

    // Most recently used first
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            slots: &self.slots,
            idx: self.slots[HEAD].next,
        }
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = (self.slots[idx].prev, self.slots[idx].next);
        self.slots[prev].next = next;
        self.slots[next].prev = prev;
    }

    fn link_front(&mut self, idx: usize) {
        let first = self.slots[HEAD].next;
        self.slots[idx].prev = HEAD;
        self.slots[idx].next = first;
        self.slots[HEAD].next = idx;
        self.slots[first].prev = idx;
    }

    fn move_to_front(&mut self, idx: usize) {
        if self.slots[HEAD].next != idx {
            self.unlink(idx);
            self.link_front(idx);
        }
    }
}

pub struct Iter<'a, K, V> {
    slots: &'a [Slot<K, V>],
    idx: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.idx == TAIL {
            return None;
        }
        let slot = &self.slots[self.idx];
        self.idx = slot.next;
        slot.entry.as_ref().map(|(k, v)| (k, v))
    }
}
