use crate::{
    face::FaceId,
    tables::{NextHop, PendingRequest},
    timestamp::Timestamp,
};

// Whether the request may go out through the next hop.
// With `want_unused` the hop must also have no out-record expiring after `now`,
//  otherwise repeated forwards along the same face are allowed.
pub fn is_next_hop_eligible<P: PendingRequest>(
    pit_entry: &P,
    next_hop: &NextHop,
    in_face: FaceId,
    want_unused: bool,
    now: Timestamp,
) -> bool {
    // Never back to the requester
    if next_hop.face.id == in_face {
        return false;
    }

    if pit_entry.violates_scope(&next_hop.face) {
        return false;
    }

    if want_unused {
        if let Some(expiry) = pit_entry.out_record_expiry(next_hop.face.id) {
            if expiry > now {
                return false;
            }
        }
    }

    true
}

pub fn can_forward_to_next_hop<P: PendingRequest>(
    pit_entry: &P,
    next_hop: &NextHop,
    now: Timestamp,
) -> bool {
    pit_entry.can_forward_to(&next_hop.face, now)
}

pub fn has_face_for_forwarding<P: PendingRequest>(
    next_hops: &[NextHop],
    pit_entry: &P,
    now: Timestamp,
) -> bool {
    next_hops
        .iter()
        .any(|hop| can_forward_to_next_hop(pit_entry, hop, now))
}

#[cfg(test)]
mod tests {
    use crate::{
        face::{Face, FaceId},
        flags::PathPin,
        tables::{pit::PitEntry, NextHop},
        timestamp::Timestamp,
    };

    use super::{has_face_for_forwarding, is_next_hop_eligible};

    fn at(ms: u64) -> Timestamp {
        Timestamp { ms_since_1970: ms }
    }

    fn hop(face: Face) -> NextHop {
        NextHop { face, cost: 1 }
    }

    #[test]
    fn test_never_back_to_in_face() {
        let mut pit = PitEntry::new("/a".parse().unwrap(), None, PathPin::default());
        pit.insert_or_update_in_record(Face::non_local(1), at(100));
        for want_unused in [false, true] {
            assert!(!is_next_hop_eligible(
                &pit,
                &hop(Face::non_local(1)),
                FaceId(1),
                want_unused,
                at(0)
            ));
            assert!(is_next_hop_eligible(
                &pit,
                &hop(Face::non_local(2)),
                FaceId(1),
                want_unused,
                at(0)
            ));
        }
    }

    #[test]
    fn test_scope() {
        let pit = PitEntry::new("/localhost/a".parse().unwrap(), None, PathPin::default());
        assert!(!is_next_hop_eligible(
            &pit,
            &hop(Face::non_local(2)),
            FaceId(1),
            false,
            Timestamp::MIN
        ));
        assert!(is_next_hop_eligible(
            &pit,
            &hop(Face::local(2)),
            FaceId(1),
            false,
            Timestamp::MIN
        ));
    }

    #[test]
    fn test_want_unused() {
        let mut pit = PitEntry::new("/a".parse().unwrap(), None, PathPin::default());
        pit.insert_or_update_out_record(Face::non_local(2), at(50));
        let next_hop = hop(Face::non_local(2));

        assert!(is_next_hop_eligible(&pit, &next_hop, FaceId(1), false, at(0)));
        assert!(!is_next_hop_eligible(&pit, &next_hop, FaceId(1), true, at(0)));
        assert!(!is_next_hop_eligible(&pit, &next_hop, FaceId(1), true, at(49)));
        assert!(is_next_hop_eligible(&pit, &next_hop, FaceId(1), true, at(50)));
    }

    #[test]
    fn test_has_face_for_forwarding() {
        let mut pit = PitEntry::new("/a".parse().unwrap(), None, PathPin::default());
        let hops = [hop(Face::non_local(1)), hop(Face::non_local(2))];
        assert!(!has_face_for_forwarding(&hops, &pit, at(0)));

        pit.insert_or_update_in_record(Face::non_local(1), at(100));
        assert!(has_face_for_forwarding(&hops, &pit, at(0)));
        assert!(!has_face_for_forwarding(&hops[..1], &pit, at(0)));
        assert!(!has_face_for_forwarding(&[], &pit, at(0)));
    }
}
