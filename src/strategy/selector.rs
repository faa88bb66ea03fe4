use alloc::vec::Vec;

use rand::{rngs::StdRng, Rng, SeedableRng};

use crate::{
    face::{Face, FaceId},
    tables::{NextHop, PendingRequest},
    timestamp::Timestamp,
};

use super::eligibility::{can_forward_to_next_hop, has_face_for_forwarding, is_next_hop_eligible};

// The rule by which a strategy chooses among search-table next hops.
// This is the only thing the strategies differ in.
pub trait NextHopSelector {
    const STRATEGY_NAME: &'static str;

    fn with_seed(seed: u64) -> Self;

    // The hop to follow along a pinned path
    fn pick<P: PendingRequest>(
        &mut self,
        next_hops: &[NextHop],
        pit_entry: &P,
        in_face: FaceId,
        now: Timestamp,
    ) -> Option<Face>;

    // The hops to search through while the budget allows, at most `budget` of them
    fn search<P: PendingRequest>(
        &mut self,
        next_hops: &[NextHop],
        pit_entry: &P,
        in_face: FaceId,
        now: Timestamp,
        budget: u32,
        out: &mut Vec<Face>,
    ) {
        if budget > 0 {
            out.extend(self.pick(next_hops, pit_entry, in_face, now));
        }
    }
}

// Uniformly random among the hops the PIT entry can forward to
#[derive(Clone, Debug)]
pub struct RandomCandidate {
    rng: StdRng,
}

impl NextHopSelector for RandomCandidate {
    const STRATEGY_NAME: &'static str = "/localhost/nfd/strategy/pickone";

    fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    fn pick<P: PendingRequest>(
        &mut self,
        next_hops: &[NextHop],
        pit_entry: &P,
        _in_face: FaceId,
        now: Timestamp,
    ) -> Option<Face> {
        // Draw until we hit an admissible hop, which terminates once one is known to exist
        if !has_face_for_forwarding(next_hops, pit_entry, now) {
            return None;
        }
        loop {
            let hop = &next_hops[self.rng.gen_range(0..next_hops.len())];
            if can_forward_to_next_hop(pit_entry, hop, now) {
                return Some(hop.face);
            }
        }
    }
}

// The first hop in table order, so the cheapest one that is eligible
#[derive(Copy, Clone, Debug, Default)]
pub struct FirstEligible;

impl NextHopSelector for FirstEligible {
    const STRATEGY_NAME: &'static str = "/localhost/nfd/strategy/picklatestone";

    fn with_seed(_seed: u64) -> Self {
        Self
    }

    fn pick<P: PendingRequest>(
        &mut self,
        next_hops: &[NextHop],
        pit_entry: &P,
        in_face: FaceId,
        now: Timestamp,
    ) -> Option<Face> {
        next_hops
            .iter()
            .find(|hop| is_next_hop_eligible(pit_entry, hop, in_face, false, now))
            .map(|hop| hop.face)
    }
}

// Follows a pinned path like `RandomCandidate`, but searches through
//  every hop the PIT entry can forward to
#[derive(Clone, Debug)]
pub struct Flood {
    random: RandomCandidate,
}

impl NextHopSelector for Flood {
    const STRATEGY_NAME: &'static str = "/localhost/nfd/strategy/multicast";

    fn with_seed(seed: u64) -> Self {
        Self {
            random: RandomCandidate::with_seed(seed),
        }
    }

    fn pick<P: PendingRequest>(
        &mut self,
        next_hops: &[NextHop],
        pit_entry: &P,
        in_face: FaceId,
        now: Timestamp,
    ) -> Option<Face> {
        self.random.pick(next_hops, pit_entry, in_face, now)
    }

    fn search<P: PendingRequest>(
        &mut self,
        next_hops: &[NextHop],
        pit_entry: &P,
        _in_face: FaceId,
        now: Timestamp,
        budget: u32,
        out: &mut Vec<Face>,
    ) {
        out.extend(
            next_hops
                .iter()
                .filter(|hop| can_forward_to_next_hop(pit_entry, hop, now))
                .map(|hop| hop.face)
                .take(budget as usize),
        );
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use crate::{
        face::{Face, FaceId},
        flags::PathPin,
        tables::{pit::PitEntry, NextHop},
        timestamp::Timestamp,
    };

    use super::{FirstEligible, Flood, NextHopSelector, RandomCandidate};

    fn at(ms: u64) -> Timestamp {
        Timestamp { ms_since_1970: ms }
    }

    fn hops(ids: &[u32]) -> Vec<NextHop> {
        ids.iter()
            .map(|id| NextHop {
                face: Face::non_local(*id),
                cost: 1,
            })
            .collect()
    }

    fn pit_from(in_face: u32) -> PitEntry {
        let mut pit = PitEntry::new("/a".parse().unwrap(), None, PathPin::default());
        pit.insert_or_update_in_record(Face::non_local(in_face), at(100));
        pit
    }

    #[test]
    fn test_random_candidate_skips_inadmissible() {
        let mut pit = pit_from(0);
        pit.insert_or_update_out_record(Face::non_local(1), at(100));
        pit.insert_or_update_out_record(Face::non_local(3), at(100));
        let next_hops = hops(&[1, 2, 3]);

        let mut selector = RandomCandidate::with_seed(5489);
        for _ in 0..50 {
            let face = selector.pick(&next_hops, &pit, FaceId(0), at(0));
            assert_eq!(face, Some(Face::non_local(2)));
        }

        pit.insert_or_update_out_record(Face::non_local(2), at(100));
        assert_eq!(selector.pick(&next_hops, &pit, FaceId(0), at(0)), None);
        assert_eq!(selector.pick(&[], &pit, FaceId(0), at(0)), None);
    }

    #[test]
    fn test_random_candidate_covers_all() {
        let pit = pit_from(0);
        let next_hops = hops(&[1, 2, 3]);
        let mut selector = RandomCandidate::with_seed(7);
        let mut seen = [false; 3];
        for _ in 0..200 {
            let face = selector.pick(&next_hops, &pit, FaceId(0), at(0)).unwrap();
            seen[(face.id.0 - 1) as usize] = true;
        }
        assert_eq!(seen, [true; 3]);
    }

    #[test]
    fn test_same_seed_same_picks() {
        let pit = pit_from(0);
        let next_hops = hops(&[1, 2, 3, 4, 5]);
        let mut a = RandomCandidate::with_seed(42);
        let mut b = RandomCandidate::with_seed(42);
        for _ in 0..20 {
            assert_eq!(
                a.pick(&next_hops, &pit, FaceId(0), at(0)),
                b.pick(&next_hops, &pit, FaceId(0), at(0))
            );
        }
    }

    #[test]
    fn test_first_eligible() {
        let pit = pit_from(1);
        let next_hops = hops(&[1, 2, 3]);
        let mut selector = FirstEligible;
        // The in-face comes first in the table but is skipped
        assert_eq!(
            selector.pick(&next_hops, &pit, FaceId(1), at(0)),
            Some(Face::non_local(2))
        );
        assert_eq!(selector.pick(&hops(&[1]), &pit, FaceId(1), at(0)), None);

        let mut out = Vec::new();
        selector.search(&next_hops, &pit, FaceId(1), at(0), 5, &mut out);
        assert_eq!(out, [Face::non_local(2)]);
        out.clear();
        selector.search(&next_hops, &pit, FaceId(1), at(0), 0, &mut out);
        assert!(out.is_empty());
    }

    #[test]
    fn test_flood_search_bounded_by_budget() {
        let pit = pit_from(0);
        let next_hops = hops(&[1, 2, 3, 4]);
        let mut selector = Flood::with_seed(5489);

        let mut out = Vec::new();
        selector.search(&next_hops, &pit, FaceId(0), at(0), 2, &mut out);
        assert_eq!(out, [Face::non_local(1), Face::non_local(2)]);

        out.clear();
        selector.search(&next_hops, &pit, FaceId(0), at(0), 10, &mut out);
        assert_eq!(out.len(), 4);

        out.clear();
        selector.search(&next_hops, &pit, FaceId(0), at(0), 0, &mut out);
        assert!(out.is_empty());
    }
}
