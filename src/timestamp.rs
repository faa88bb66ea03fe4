#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp {
    pub ms_since_1970: u64,
}

impl Timestamp {
    pub const MIN: Timestamp = Timestamp { ms_since_1970: 0 };

    pub fn adding(&self, ms: u64) -> Self {
        Self {
            ms_since_1970: self.ms_since_1970.saturating_add(ms),
        }
    }
}
