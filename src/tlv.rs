use core::num::NonZeroU32;

use alloc::vec::Vec;

#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum VarintDecodingError {
    #[error("buffer too short")]
    BufferTooShort,
    #[error("non-minimal integer encoding")]
    NonMinimalIntegerEncoding,
    #[error("invalid value")]
    InvalidValue,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DecodingError {
    #[error("cannot decode type: {err}")]
    CannotDecodeType { err: VarintDecodingError },
    #[error("cannot decode length of TLV type {typ}: {err}")]
    CannotDecodeLength {
        typ: NonZeroU32,
        err: VarintDecodingError,
    },
    #[error("cannot decode value of TLV type {typ}: {len} bytes declared")]
    CannotDecodeValue { typ: NonZeroU32, len: usize },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum EncodingError {
    #[error("buffer too short")]
    BufferTooShort,
}

pub trait Write {
    fn write(&mut self, bytes: &[u8]) -> Result<(), EncodingError>;
}

impl Write for Vec<u8> {
    fn write(&mut self, bytes: &[u8]) -> Result<(), EncodingError> {
        self.extend_from_slice(bytes);
        Ok(())
    }
}

pub trait Encode {
    fn encoded_length(&self) -> usize;
    fn encode<W: Write>(&self, writer: &mut W) -> Result<(), EncodingError>;
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TLV<'a> {
    pub typ: NonZeroU32,
    pub val: &'a [u8],
}

impl<'a> TLV<'a> {
    // Values of NonNegativeInteger fields are always 1, 2, 4 or 8 bytes long
    pub fn val_as_u64(&self) -> Option<u64> {
        match self.val.len() {
            1 => Some(self.val[0] as u64),
            2 => Some(u16::from_be_bytes(self.val.try_into().ok()?) as u64),
            4 => Some(u32::from_be_bytes(self.val.try_into().ok()?) as u64),
            8 => Some(u64::from_be_bytes(self.val.try_into().ok()?)),
            _ => None,
        }
    }

    pub fn try_decode(bytes: &'a [u8]) -> Result<(TLV<'a>, usize), DecodingError> {
        let mut cursor = 0;
        let typ: u32 = Self::parse_varint(bytes, &mut cursor)
            .map_err(|err| DecodingError::CannotDecodeType { err })?
            .try_into()
            .map_err(|_| DecodingError::CannotDecodeType {
                err: VarintDecodingError::InvalidValue,
            })?;
        let typ = NonZeroU32::new(typ).ok_or(DecodingError::CannotDecodeType {
            err: VarintDecodingError::InvalidValue,
        })?;

        let len: usize = Self::parse_varint(bytes, &mut cursor)
            .map_err(|err| DecodingError::CannotDecodeLength { typ, err })?
            .try_into()
            .map_err(|_| DecodingError::CannotDecodeLength {
                typ,
                err: VarintDecodingError::InvalidValue,
            })?;

        let end = cursor
            .checked_add(len)
            .filter(|end| *end <= bytes.len())
            .ok_or(DecodingError::CannotDecodeValue { typ, len })?;

        let val = &bytes[cursor..end];
        Ok((TLV { typ, val }, end))
    }

    fn parse_varint(bytes: &[u8], cursor: &mut usize) -> Result<u64, VarintDecodingError> {
        let first = *bytes
            .get(*cursor)
            .ok_or(VarintDecodingError::BufferTooShort)?;
        *cursor += 1;
        match first {
            0..=252 => Ok(first as u64),
            253 => {
                let val = u16::from_be_bytes(Self::take(bytes, cursor)?);
                if val > 252 {
                    Ok(val as u64)
                } else {
                    Err(VarintDecodingError::NonMinimalIntegerEncoding)
                }
            }
            254 => {
                let val = u32::from_be_bytes(Self::take(bytes, cursor)?);
                if val > 65535 {
                    Ok(val as u64)
                } else {
                    Err(VarintDecodingError::NonMinimalIntegerEncoding)
                }
            }
            255 => {
                let val = u64::from_be_bytes(Self::take(bytes, cursor)?);
                if val > 4294967295 {
                    Ok(val)
                } else {
                    Err(VarintDecodingError::NonMinimalIntegerEncoding)
                }
            }
        }
    }

    fn take<const N: usize>(
        bytes: &[u8],
        cursor: &mut usize,
    ) -> Result<[u8; N], VarintDecodingError> {
        let next: [u8; N] = bytes
            .get(*cursor..(*cursor + N))
            .and_then(|b| b.try_into().ok())
            .ok_or(VarintDecodingError::BufferTooShort)?;
        *cursor += N;
        Ok(next)
    }
}

impl Encode for u64 {
    fn encoded_length(&self) -> usize {
        if *self <= 252 {
            1
        } else if *self <= 65535 {
            3
        } else if *self <= 4294967295 {
            5
        } else {
            9
        }
    }

    fn encode<W: Write>(&self, writer: &mut W) -> Result<(), EncodingError> {
        if *self <= 252 {
            writer.write(&[*self as u8])
        } else if *self <= 65535 {
            writer.write(&[253])?;
            writer.write(&(*self as u16).to_be_bytes())
        } else if *self <= 4294967295 {
            writer.write(&[254])?;
            writer.write(&(*self as u32).to_be_bytes())
        } else {
            writer.write(&[255])?;
            writer.write(&self.to_be_bytes())
        }
    }
}

impl<'a> Encode for TLV<'a> {
    fn encoded_length(&self) -> usize {
        let l = self.val.len();
        (self.typ.get() as u64).encoded_length() + (l as u64).encoded_length() + l
    }

    fn encode<W: Write>(&self, writer: &mut W) -> Result<(), EncodingError> {
        (self.typ.get() as u64).encode(writer)?;
        (self.val.len() as u64).encode(writer)?;
        writer.write(self.val)
    }
}

// A NonNegativeInteger TLV value, always using the shortest of the 1/2/4/8-byte forms
pub struct NonNegativeInteger {
    bytes: [u8; 8],
    len: usize,
}

impl NonNegativeInteger {
    pub fn new(value: u64) -> Self {
        let len = if value <= 0xFF {
            1
        } else if value <= 0xFFFF {
            2
        } else if value <= 0xFFFF_FFFF {
            4
        } else {
            8
        };
        let mut bytes = [0u8; 8];
        bytes[..len].copy_from_slice(&value.to_be_bytes()[(8 - len)..]);
        Self { bytes, len }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;
    use core::num::NonZeroU32;

    use super::{DecodingError, Encode, NonNegativeInteger, VarintDecodingError, TLV};

    #[test]
    fn test_unsigned() {
        for v in 0u64..252 {
            assert_eq!(v.encoded_length(), 1);
        }
        assert_eq!(253u64.encoded_length(), 3);
        assert_eq!(254u64.encoded_length(), 3);
        assert_eq!(255u64.encoded_length(), 3);
        assert_eq!(256u64.encoded_length(), 3);
        assert_eq!(65535u64.encoded_length(), 3);
        assert_eq!(65536u64.encoded_length(), 5);
        assert_eq!(4294967295u64.encoded_length(), 5);
        assert_eq!(4294967296u64.encoded_length(), 9);
    }

    #[test]
    fn test_tlv() {
        let typ = NonZeroU32::new(300).unwrap();
        let tlv = TLV { typ, val: &[1, 2, 3] };
        let mut buf = Vec::new();
        assert!(tlv.encode(&mut buf).is_ok());
        assert_eq!(buf, [253, 1, 44, 3, 1, 2, 3]);
        assert_eq!(tlv.encoded_length(), buf.len());

        let (decoded, len) = TLV::try_decode(&buf).unwrap();
        assert_eq!(decoded, tlv);
        assert_eq!(len, buf.len());
    }

    #[test]
    fn test_malformed() {
        assert_eq!(
            TLV::try_decode(&[]),
            Err(DecodingError::CannotDecodeType {
                err: VarintDecodingError::BufferTooShort
            })
        );
        assert_eq!(
            TLV::try_decode(&[0, 0]),
            Err(DecodingError::CannotDecodeType {
                err: VarintDecodingError::InvalidValue
            })
        );
        // 253 must be followed by a value that does not fit in one byte
        assert_eq!(
            TLV::try_decode(&[253, 0, 12, 0]),
            Err(DecodingError::CannotDecodeType {
                err: VarintDecodingError::NonMinimalIntegerEncoding
            })
        );
        assert_eq!(
            TLV::try_decode(&[253, 1]),
            Err(DecodingError::CannotDecodeType {
                err: VarintDecodingError::BufferTooShort
            })
        );
        let typ = NonZeroU32::new(7).unwrap();
        assert_eq!(
            TLV::try_decode(&[7, 4, 1, 2]),
            Err(DecodingError::CannotDecodeValue { typ, len: 4 })
        );
    }

    #[test]
    fn test_non_negative_integer() {
        assert_eq!(NonNegativeInteger::new(0).as_bytes(), &[0]);
        assert_eq!(NonNegativeInteger::new(255).as_bytes(), &[255]);
        assert_eq!(NonNegativeInteger::new(256).as_bytes(), &[1, 0]);
        assert_eq!(NonNegativeInteger::new(65536).as_bytes(), &[0, 1, 0, 0]);
        assert_eq!(
            NonNegativeInteger::new(1 << 32).as_bytes(),
            &[0, 0, 0, 1, 0, 0, 0, 0]
        );

        let typ = NonZeroU32::new(200).unwrap();
        for v in [0u64, 1, 255, 256, 65535, 65536, u32::MAX as u64, u64::MAX] {
            let nni = NonNegativeInteger::new(v);
            let tlv = TLV {
                typ,
                val: nni.as_bytes(),
            };
            assert_eq!(tlv.val_as_u64(), Some(v));
        }
        assert_eq!(TLV { typ, val: &[1, 2, 3] }.val_as_u64(), None);
    }
}
