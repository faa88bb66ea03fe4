use core::num::NonZeroU32;

use crate::tlv::{DecodingError, Encode, EncodingError, NonNegativeInteger, Write, TLV};

// Per-interest search state carried in the interest's protocol metadata.
// Both flags travel as a TLV holding a single NonNegativeInteger.
// The types are even and above 31, so forwarders that do not know them
//  are allowed to skip them.
pub const SEARCH_BUDGET_TLV_TYPE: u32 = 200;
pub const PATH_PIN_TLV_TYPE: u32 = 202;

#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FlagDecodeError {
    #[error(transparent)]
    Tlv(#[from] DecodingError),
    #[error("unexpected TLV type {found}, expected {expected}")]
    UnexpectedType { expected: u32, found: u32 },
    #[error("flag value of {0} bytes is not a NonNegativeInteger")]
    InvalidLength(usize),
    #[error("flag value {0} does not fit in 32 bits")]
    OutOfRange(u64),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TypedFlag<const T: u32> {
    val: u32,
}

// Remaining number of budgeted forwards (the "flood flag").
// Strategies only ever decrease it.
pub type SearchBudget = TypedFlag<SEARCH_BUDGET_TLV_TYPE>;

// Non-zero once a path has been discovered and should be followed (the "destination flag").
pub type PathPin = TypedFlag<PATH_PIN_TLV_TYPE>;

impl<const T: u32> TypedFlag<T> {
    pub const TLV_TYPE: u32 = T;

    const NONZERO_TYPE: NonZeroU32 = match NonZeroU32::new(T) {
        Some(typ) => typ,
        None => panic!("TLV type 0 is reserved"),
    };

    pub const fn new(val: u32) -> Self {
        Self { val }
    }

    pub fn get(&self) -> u32 {
        self.val
    }

    pub fn set(&mut self, val: u32) {
        self.val = val
    }

    pub fn clear(&mut self) {
        self.val = 0
    }

    pub fn try_decode(bytes: &[u8]) -> Result<(Self, usize), FlagDecodeError> {
        let (tlv, len) = TLV::try_decode(bytes)?;
        if tlv.typ.get() != T {
            return Err(FlagDecodeError::UnexpectedType {
                expected: T,
                found: tlv.typ.get(),
            });
        }
        let val = tlv
            .val_as_u64()
            .ok_or(FlagDecodeError::InvalidLength(tlv.val.len()))?;
        let val = u32::try_from(val).map_err(|_| FlagDecodeError::OutOfRange(val))?;
        Ok((Self::new(val), len))
    }
}

impl<const T: u32> Encode for TypedFlag<T> {
    fn encoded_length(&self) -> usize {
        let val = NonNegativeInteger::new(self.val as u64);
        TLV {
            typ: Self::NONZERO_TYPE,
            val: val.as_bytes(),
        }
        .encoded_length()
    }

    fn encode<W: Write>(&self, writer: &mut W) -> Result<(), EncodingError> {
        let val = NonNegativeInteger::new(self.val as u64);
        TLV {
            typ: Self::NONZERO_TYPE,
            val: val.as_bytes(),
        }
        .encode(writer)
    }
}

impl SearchBudget {
    // What an interest gets when its sender did not limit the search
    pub const UNBOUNDED: SearchBudget = SearchBudget::new(u32::MAX);

    pub fn is_exhausted(&self) -> bool {
        self.val == 0
    }

    // Spends one search and returns what is left
    pub fn consume(&mut self) -> u32 {
        self.val = self.val.saturating_sub(1);
        self.val
    }
}

// A zero budget would forbid any search, so an unset budget means no limit
impl Default for SearchBudget {
    fn default() -> Self {
        Self::UNBOUNDED
    }
}

impl PathPin {
    pub fn pin(&mut self) {
        self.val = 1
    }

    pub fn is_pinned(&self) -> bool {
        self.val != 0
    }
}

impl Default for PathPin {
    fn default() -> Self {
        Self::new(0)
    }
}
