use alloc::vec::Vec;

use crate::{
    face::{Face, FaceId},
    flags::{PathPin, SearchBudget},
    name::Name,
    timestamp::Timestamp,
};

use super::PendingRequest;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct FaceRecord {
    pub face: Face,
    pub expiry: Timestamp,
}

// Reference PIT entry.
// In-records are the downstream faces waiting for data, out-records the upstream
//  faces the request has been sent to. A face has at most one record of each kind.
#[derive(Clone, Debug)]
pub struct PitEntry {
    name: Name,
    in_records: Vec<FaceRecord>,
    out_records: Vec<FaceRecord>,
    search_budget: SearchBudget,
    path_pin: PathPin,
}

impl PitEntry {
    // A request without a budget of its own may be searched for without limit
    pub fn new(name: Name, search_budget: Option<SearchBudget>, path_pin: PathPin) -> Self {
        Self {
            name,
            in_records: Vec::new(),
            out_records: Vec::new(),
            search_budget: search_budget.unwrap_or_default(),
            path_pin,
        }
    }

    pub fn in_records(&self) -> &[FaceRecord] {
        &self.in_records
    }

    pub fn out_records(&self) -> &[FaceRecord] {
        &self.out_records
    }

    pub fn insert_or_update_in_record(&mut self, face: Face, expiry: Timestamp) {
        Self::insert_or_update(&mut self.in_records, face, expiry)
    }

    pub fn insert_or_update_out_record(&mut self, face: Face, expiry: Timestamp) {
        Self::insert_or_update(&mut self.out_records, face, expiry)
    }

    pub fn delete_in_record(&mut self, face: FaceId) {
        self.in_records.retain(|r| r.face.id != face)
    }

    pub fn delete_out_record(&mut self, face: FaceId) {
        self.out_records.retain(|r| r.face.id != face)
    }

    fn insert_or_update(records: &mut Vec<FaceRecord>, face: Face, expiry: Timestamp) {
        match records.iter_mut().find(|r| r.face.id == face.id) {
            Some(record) => record.expiry = expiry,
            None => records.push(FaceRecord { face, expiry }),
        }
    }

    fn has_first_component(&self, component: &[u8]) -> bool {
        self.name
            .components()
            .first()
            .is_some_and(|c| c.is_generic() && &*c.bytes == component)
    }
}

impl PendingRequest for PitEntry {
    fn name(&self) -> &Name {
        &self.name
    }

    fn search_budget(&self) -> SearchBudget {
        self.search_budget
    }

    fn search_budget_mut(&mut self) -> &mut SearchBudget {
        &mut self.search_budget
    }

    fn path_pin(&self) -> PathPin {
        self.path_pin
    }

    fn path_pin_mut(&mut self) -> &mut PathPin {
        &mut self.path_pin
    }

    // /localhost never leaves the node.
    // /localhop goes at most one hop, so it may only go out to a non-local face
    //  when it came in from a local one.
    fn violates_scope(&self, face: &Face) -> bool {
        if face.is_local() {
            return false;
        }
        if self.has_first_component(b"localhost") {
            return true;
        }
        self.has_first_component(b"localhop") && !self.in_records.iter().any(|r| r.face.is_local())
    }

    fn can_forward_to(&self, face: &Face, now: Timestamp) -> bool {
        let has_pending_out_record = self
            .out_records
            .iter()
            .any(|r| r.face.id == face.id && r.expiry >= now);
        if has_pending_out_record {
            return false;
        }

        let has_other_in_record = self
            .in_records
            .iter()
            .any(|r| r.face.id != face.id && r.expiry >= now);
        if !has_other_in_record {
            return false;
        }

        !self.violates_scope(face)
    }

    fn out_record_expiry(&self, face: FaceId) -> Option<Timestamp> {
        self.out_records
            .iter()
            .find(|r| r.face.id == face)
            .map(|r| r.expiry)
    }
}
