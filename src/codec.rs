//! Fixed-width integer fields expressed as hexadecimal text.
//!
//! Detectors read multi-byte header fields through a [`HexView`], which hands
//! out the hex spelling of a byte range (two characters per byte) and decodes
//! it with [`decode_int`]. Every read is bounds-checked against the buffer so a
//! field lying past the end becomes a [`FieldError`] instead of an empty
//! string that compares equal to nothing in particular.

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::{Result, ValidatorError};

pub const HEX_CHARS_PER_BYTE: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Endianness {
    #[default]
    Little,
    Big,
}

/// Decodes a 16-bit (4 hex chars) or 32-bit (8 hex chars) field.
///
/// With [`Endianness::Little`] the byte pairs are reversed before the value is
/// read, so `"2400"` decodes to `0x0024`.
pub fn decode_int(field: &str, order: Endianness) -> Result<u32> {
    if !field.bytes().all(|b| b.is_ascii_hexdigit()) {
        return Err(ValidatorError::InvalidHexInput {
            input: field.to_string(),
        });
    }

    let width = field.len();
    if width != 4 && width != 8 {
        return Err(ValidatorError::InvalidFieldWidth { width });
    }

    let bytes = hex::decode(field).map_err(|_| ValidatorError::InvalidHexInput {
        input: field.to_string(),
    })?;

    let value = match (order, bytes.len()) {
        (Endianness::Little, 2) => u32::from(LittleEndian::read_u16(&bytes)),
        (Endianness::Little, _) => LittleEndian::read_u32(&bytes),
        (Endianness::Big, 2) => u32::from(BigEndian::read_u16(&bytes)),
        (Endianness::Big, _) => BigEndian::read_u32(&bytes),
    };

    Ok(value)
}

#[derive(Debug, Error)]
pub enum FieldError {
    #[error("{width}-byte field at offset {offset} lies beyond the end of the {len}-byte buffer")]
    OutOfBounds {
        offset: usize,
        width: usize,
        len: usize,
    },

    #[error(transparent)]
    Decode(#[from] ValidatorError),
}

/// Hexadecimal view over a borrowed buffer.
///
/// Offsets passed in are byte offsets; the view doubles them internally.
/// Hex text is produced per field rather than for the whole buffer.
#[derive(Debug, Clone, Copy)]
pub struct HexView<'a> {
    data: &'a [u8],
}

impl<'a> HexView<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    pub fn byte_len(&self) -> usize {
        self.data.len()
    }

    pub fn hex_len(&self) -> usize {
        self.data.len() * HEX_CHARS_PER_BYTE
    }

    /// Hex spelling of `width` bytes starting at byte `offset`.
    pub fn field(&self, offset: usize, width: usize) -> std::result::Result<String, FieldError> {
        offset
            .checked_add(width)
            .and_then(|end| self.data.get(offset..end))
            .map(hex::encode)
            .ok_or(FieldError::OutOfBounds {
                offset,
                width,
                len: self.data.len(),
            })
    }

    pub fn read_u16(&self, offset: usize, order: Endianness) -> std::result::Result<u32, FieldError> {
        let field = self.field(offset, 2)?;
        Ok(decode_int(&field, order)?)
    }

    pub fn read_u32(&self, offset: usize, order: Endianness) -> std::result::Result<u32, FieldError> {
        let field = self.field(offset, 4)?;
        Ok(decode_int(&field, order)?)
    }

    /// Whether the bytes at `offset` equal `expected`, false when out of range.
    pub fn matches(&self, offset: usize, expected: &[u8]) -> bool {
        self.field(offset, expected.len())
            .is_ok_and(|field| field == hex::encode(expected))
    }
}
