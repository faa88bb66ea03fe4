use alloc::{
    collections::{btree_map::Entry, BTreeMap},
    vec::Vec,
};

use crate::{face::FaceId, name::Name};

use super::{FibEntry, RoutingTable};

// Unbounded reference table
#[derive(Clone, Debug, Default)]
pub struct Fib {
    entries: BTreeMap<Name, FibEntry>,
}

impl Fib {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &FibEntry> {
        self.entries.values()
    }
}

impl RoutingTable for Fib {
    fn insert(&mut self, prefix: &Name) -> (&mut FibEntry, bool) {
        match self.entries.entry(prefix.clone()) {
            Entry::Occupied(entry) => (entry.into_mut(), false),
            Entry::Vacant(entry) => (entry.insert(FibEntry::new(prefix.clone())), true),
        }
    }

    fn find_longest_prefix_match(&mut self, name: &Name) -> Option<&FibEntry> {
        (0..=name.component_count())
            .rev()
            .find_map(|len| self.entries.get(name.prefix(len)))
    }

    fn find_exact_match(&mut self, prefix: &Name) -> Option<&FibEntry> {
        self.entries.get(prefix)
    }

    fn find_exact_match_mut(&mut self, prefix: &Name) -> Option<&mut FibEntry> {
        self.entries.get_mut(prefix)
    }

    fn contains(&self, prefix: &Name) -> bool {
        self.entries.contains_key(prefix)
    }

    fn erase(&mut self, prefix: &Name) -> bool {
        self.entries.remove(prefix).is_some()
    }

    fn remove_face(&mut self, face: FaceId) -> Vec<Name> {
        let mut erased = Vec::new();
        self.entries.retain(|prefix, entry| {
            entry.remove_next_hop(face);
            if entry.has_next_hops() {
                true
            } else {
                erased.push(prefix.clone());
                false
            }
        });
        erased
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}
