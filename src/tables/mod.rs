pub mod cfib;
pub mod fib;
pub mod lru;
pub mod pit;

use alloc::vec::Vec;

use crate::{
    face::{Face, FaceId},
    flags::{PathPin, SearchBudget},
    name::Name,
    timestamp::Timestamp,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct NextHop {
    pub face: Face,
    pub cost: u32,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FibEntry {
    prefix: Name,
    // Ordered by cost, lowest first
    next_hops: Vec<NextHop>,
}

impl FibEntry {
    pub fn new(prefix: Name) -> Self {
        Self {
            prefix,
            next_hops: Vec::new(),
        }
    }

    pub fn prefix(&self) -> &Name {
        &self.prefix
    }

    pub fn next_hops(&self) -> &[NextHop] {
        &self.next_hops
    }

    pub fn has_next_hops(&self) -> bool {
        !self.next_hops.is_empty()
    }

    // Adds the face or updates its cost if it is already a next hop.
    // Faces with equal cost keep the order in which they were added.
    pub fn add_next_hop(&mut self, face: Face, cost: u32) {
        if let Some(hop) = self.next_hops.iter_mut().find(|h| h.face.id == face.id) {
            hop.face = face;
            hop.cost = cost;
        } else {
            self.next_hops.push(NextHop { face, cost });
        }
        self.next_hops.sort_by_key(|h| h.cost);
    }

    pub fn remove_next_hop(&mut self, face: FaceId) -> bool {
        let len = self.next_hops.len();
        self.next_hops.retain(|h| h.face.id != face);
        self.next_hops.len() != len
    }
}

// Name-prefix routing table, used both for the FIB and for the search table (SIT).
// Lookups take `&mut self` because a table may track how recently entries were used.
pub trait RoutingTable {
    // Returns the entry for the prefix and whether this call created it
    fn insert(&mut self, prefix: &Name) -> (&mut FibEntry, bool);

    fn find_longest_prefix_match(&mut self, name: &Name) -> Option<&FibEntry>;

    fn find_exact_match(&mut self, prefix: &Name) -> Option<&FibEntry>;

    fn find_exact_match_mut(&mut self, prefix: &Name) -> Option<&mut FibEntry>;

    // Checks for the prefix without counting it as a use
    fn contains(&self, prefix: &Name) -> bool;

    fn erase(&mut self, prefix: &Name) -> bool;

    // Removes the face from every entry and erases the entries left without next hops,
    //  returning their prefixes
    fn remove_face(&mut self, face: FaceId) -> Vec<Name>;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    // Registers the face for the prefix, creating the entry if needed
    fn add_next_hop(&mut self, prefix: &Name, face: Face, cost: u32) {
        self.insert(prefix).0.add_next_hop(face, cost)
    }

    // An entry that loses its last next hop is erased
    fn remove_next_hop(&mut self, prefix: &Name, face: FaceId) -> bool {
        let (removed, is_empty) = match self.find_exact_match_mut(prefix) {
            Some(entry) => (entry.remove_next_hop(face), !entry.has_next_hops()),
            None => return false,
        };
        if is_empty {
            self.erase(prefix);
        }
        removed
    }
}

// The view of a PIT entry that forwarding strategies need.
// Strategies never create or expire records, they only read them
//  and update the two search flags.
pub trait PendingRequest {
    fn name(&self) -> &Name;

    fn search_budget(&self) -> SearchBudget;
    fn search_budget_mut(&mut self) -> &mut SearchBudget;

    fn path_pin(&self) -> PathPin;
    fn path_pin_mut(&mut self) -> &mut PathPin;

    // Whether sending to the face would take the interest out of its namespace scope
    fn violates_scope(&self, face: &Face) -> bool;

    // Whether the face is admissible at all: scope, pending downstreams, in-flight forwards
    fn can_forward_to(&self, face: &Face, now: Timestamp) -> bool;

    fn out_record_expiry(&self, face: FaceId) -> Option<Timestamp>;
}
