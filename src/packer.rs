//! Write side of the bit-field codec.
//!
//! Fields are appended back to back with no markers between them; a reader
//! must replay the same sequence of widths to decode them. The accumulated
//! bits render as a packed string of printable characters, seven bits per
//! character (see [crate::alphabet]).

use std::fmt;
use std::str::FromStr;

use tracing::{debug, warn};

use crate::{alphabet, bit_vector::BitVector, errors::DecodeError};

/// Replacement byte for characters outside the ASCII range.
const NON_ASCII_BYTE: u8 = b'?';

/// Appends integer and ASCII fields to a growing bit sequence.
///
/// # Example
///
/// ```
/// use bitpack::packer::BitPacker;
/// use bitpack::unpacker::BitUnpacker;
///
/// let mut packer = BitPacker::new();
/// packer.add_int(5, 3);
/// packer.add_ascii("ab", 5);
/// let packed = packer.to_packed();
///
/// let mut reader = BitUnpacker::from_packed(&packed);
/// assert_eq!(reader.read_int(3), 5);
/// assert_eq!(reader.read_ascii(5), "ab");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitPacker {
    bits: BitVector,
    len: usize,
    locked: bool,
}

impl BitPacker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds a read-only packer from a packed string without validating it.
    ///
    /// Characters outside the packed alphabet still decode to some 7-bit value.
    /// The result is locked: every `add_*` call is ignored.
    pub fn from_packed(packed: &str) -> Self {
        let mut bits = BitVector::new();
        let mut len = 0;

        for ch in packed.chars() {
            if !alphabet::is_packed_char(ch) {
                warn!(?ch, offset = len, "character outside the packed alphabet");
            }

            let value = alphabet::decode(ch);
            for i in 0..alphabet::BITS_PER_CHAR {
                if value & (1 << i) != 0 {
                    bits.set(len + i);
                }
            }
            len += alphabet::BITS_PER_CHAR;
        }

        BitPacker {
            bits,
            len,
            locked: true,
        }
    }

    /// Like [`BitPacker::from_packed`] but rejects characters outside the packed alphabet.
    pub fn try_from_packed(packed: &str) -> Result<Self, DecodeError> {
        if let Some((index, ch)) = packed
            .chars()
            .enumerate()
            .find(|&(_, ch)| alphabet::decode_strict(ch).is_none())
        {
            return Err(DecodeError::InvalidCharacter { ch, index });
        }

        Ok(Self::from_packed(packed))
    }

    /// Number of bits written so far.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// True when built from a packed string.
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Number of characters [`BitPacker::to_packed`] produces.
    pub fn packed_len(&self) -> usize {
        alphabet::packed_len(self.len)
    }

    /// Returns the bit at `index`; bits never written read as clear.
    pub fn get(&self, index: usize) -> bool {
        self.bits.get(index)
    }

    /// Appends the low `num_bits` bits of `value`, least significant bit first.
    ///
    /// Returns the bit offset at which the field starts. Widths above 64 pad
    /// the field with clear bits.
    pub fn add_int(&mut self, value: u64, num_bits: usize) -> usize {
        let start = self.len;
        if self.locked {
            debug!(num_bits, "ignoring int field on a locked packer");
            return start;
        }

        for i in 0..num_bits.min(64) {
            if (value >> i) & 1 != 0 {
                self.bits.set(start + i);
            }
        }
        self.len += num_bits;

        start
    }

    /// Appends the low `num_bits` bits of the two's complement form of `value`.
    pub fn add_signed(&mut self, value: i64, num_bits: usize) -> usize {
        self.add_int(value as u64, num_bits)
    }

    /// Appends a single-bit field.
    pub fn add_bool(&mut self, value: bool) -> usize {
        self.add_int(u64::from(value), 1)
    }

    /// Appends up to `num_bytes` single-byte characters of `text`.
    ///
    /// When `text` is shorter than `num_bytes` one zero byte is appended and
    /// the field ends there, so the field only takes the full `num_bytes * 8`
    /// bits when the text fills it. Characters outside ASCII are written as `?`.
    pub fn add_ascii(&mut self, text: &str, num_bytes: usize) -> usize {
        let start = self.len;
        if self.locked {
            debug!(num_bytes, "ignoring ascii field on a locked packer");
            return start;
        }

        let mut written = 0;
        for ch in text.chars().take(num_bytes) {
            let byte = if ch.is_ascii() { ch as u8 } else { NON_ASCII_BYTE };
            self.add_int(u64::from(byte), 8);
            written += 1;
        }
        if written < num_bytes {
            self.add_int(0, 8);
        }

        start
    }

    /// Renders the bits as a packed string, one character per seven bits.
    pub fn to_packed(&self) -> String {
        let mut packed = String::with_capacity(self.packed_len());

        for group in (0..self.len).step_by(alphabet::BITS_PER_CHAR) {
            let mut value = 0u8;
            for i in 0..alphabet::BITS_PER_CHAR {
                if self.bits.get(group + i) {
                    value |= 1 << i;
                }
            }
            packed.push(alphabet::encode(value));
        }

        packed
    }
}

impl fmt::Display for BitPacker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_packed())
    }
}

impl FromStr for BitPacker {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from_packed(s)
    }
}
