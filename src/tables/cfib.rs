use core::num::NonZeroUsize;

use alloc::vec::Vec;

use crate::{face::FaceId, name::Name};

use super::{
    fib::Fib,
    lru::{LruCache, LruError},
    FibEntry, RoutingTable,
};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CfibError {
    #[error("entry {prefix} is in the table but not in its LRU cache")]
    CacheInvariantViolation { prefix: Name },
    #[error(transparent)]
    Lru(#[from] LruError),
}

// Routing table holding at most `capacity` entries.
// Inserting a new prefix into a full table erases the least recently used entry,
//  where both inserting and a successful lookup count as a use.
// The cache only tracks prefixes; the entries themselves live in the base table,
//  and the two always hold the same set of prefixes.
#[derive(Debug)]
pub struct Cfib<T = Fib> {
    base: T,
    cache: LruCache<Name, ()>,
}

impl<T: RoutingTable + Default> Cfib<T> {
    pub fn new(capacity: NonZeroUsize) -> Result<Self, CfibError> {
        Ok(Self {
            base: T::default(),
            cache: LruCache::new(capacity)?,
        })
    }
}

impl<T: RoutingTable> Cfib<T> {
    pub fn capacity(&self) -> NonZeroUsize {
        self.cache.capacity()
    }

    // Keeps the most recently used entries that still fit, in their current order,
    //  and erases the rest. Nothing changes if the new capacity cannot be allocated.
    pub fn set_capacity(&mut self, capacity: NonZeroUsize) -> Result<(), CfibError> {
        if capacity == self.capacity() {
            return Ok(());
        }
        let mut cache = LruCache::new(capacity)?;
        let prefixes: Vec<Name> = self.cache.iter().map(|(prefix, _)| prefix.clone()).collect();
        for prefix in prefixes.into_iter().rev() {
            if let Some((evicted, ())) = cache.put(prefix, ()) {
                tracing::debug!(prefix = %evicted, "erasing entry after capacity change");
                self.base.erase(&evicted);
            }
        }
        self.cache = cache;
        Ok(())
    }

    pub fn base(&self) -> &T {
        &self.base
    }

    // Prefixes from most to least recently used
    pub fn recency(&self) -> impl Iterator<Item = &Name> {
        self.cache.iter().map(|(prefix, _)| prefix)
    }

    pub fn checked_find_longest_prefix_match(
        &mut self,
        name: &Name,
    ) -> Result<Option<&FibEntry>, CfibError> {
        let Some(entry) = self.base.find_longest_prefix_match(name) else {
            return Ok(None);
        };
        if self.cache.get(entry.prefix()).is_none() {
            return Err(CfibError::CacheInvariantViolation {
                prefix: entry.prefix().clone(),
            });
        }
        Ok(Some(entry))
    }

    pub fn checked_find_exact_match(
        &mut self,
        prefix: &Name,
    ) -> Result<Option<&FibEntry>, CfibError> {
        let Some(entry) = self.base.find_exact_match(prefix) else {
            return Ok(None);
        };
        if self.cache.get(prefix).is_none() {
            return Err(CfibError::CacheInvariantViolation {
                prefix: prefix.clone(),
            });
        }
        Ok(Some(entry))
    }

    fn touch(&mut self, prefix: &Name) {
        if self.cache.get(prefix).is_none() {
            report(CfibError::CacheInvariantViolation {
                prefix: prefix.clone(),
            });
        }
    }
}

fn report(err: CfibError) {
    tracing::error!(%err, "routing table out of sync with its LRU cache");
    debug_assert!(false, "{}", err);
}

impl<T: RoutingTable> RoutingTable for Cfib<T> {
    fn insert(&mut self, prefix: &Name) -> (&mut FibEntry, bool) {
        if !self.base.contains(prefix) {
            if let Some((evicted, ())) = self.cache.put(prefix.clone(), ()) {
                tracing::debug!(prefix = %evicted, "erasing least recently used entry");
                self.base.erase(&evicted);
            }
        }
        self.base.insert(prefix)
    }

    fn find_longest_prefix_match(&mut self, name: &Name) -> Option<&FibEntry> {
        let entry = self.base.find_longest_prefix_match(name)?;
        if self.cache.get(entry.prefix()).is_none() {
            report(CfibError::CacheInvariantViolation {
                prefix: entry.prefix().clone(),
            });
        }
        Some(entry)
    }

    fn find_exact_match(&mut self, prefix: &Name) -> Option<&FibEntry> {
        if !self.base.contains(prefix) {
            return None;
        }
        self.touch(prefix);
        self.base.find_exact_match(prefix)
    }

    fn find_exact_match_mut(&mut self, prefix: &Name) -> Option<&mut FibEntry> {
        if !self.base.contains(prefix) {
            return None;
        }
        self.touch(prefix);
        self.base.find_exact_match_mut(prefix)
    }

    fn contains(&self, prefix: &Name) -> bool {
        let contains = self.base.contains(prefix);
        debug_assert_eq!(contains, self.cache.contains(prefix));
        contains
    }

    fn erase(&mut self, prefix: &Name) -> bool {
        self.cache.remove(prefix);
        self.base.erase(prefix)
    }

    fn remove_face(&mut self, face: FaceId) -> Vec<Name> {
        let erased = self.base.remove_face(face);
        for prefix in erased.iter() {
            self.cache.remove(prefix);
        }
        erased
    }

    fn len(&self) -> usize {
        let len = self.base.len();
        debug_assert_eq!(len, self.cache.len());
        len
    }
}
