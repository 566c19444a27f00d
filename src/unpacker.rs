//! Read side of the bit-field codec.

use std::borrow::Cow;

use crate::{bits, errors::DecodeError, packer::BitPacker};

/// Consumes fields from a [`BitPacker`] with its own cursor.
///
/// The cursor is independent of the packer's write position, so the same
/// payload can be read any number of times. Reads past the written bits
/// produce zeros; nothing here fails.
#[derive(Debug, Clone)]
pub struct BitUnpacker<'a> {
    source: Cow<'a, BitPacker>,
    position: usize,
}

impl<'a> BitUnpacker<'a> {
    /// Reads from an existing packer, starting at bit 0.
    pub fn new(packer: &'a BitPacker) -> Self {
        Self::with_position(packer, 0)
    }

    /// Reads from an existing packer, resuming at `position`.
    ///
    /// Pair with [`BitUnpacker::into_position`] to keep reading a packer that
    /// was appended to after the previous reader was dropped.
    pub fn with_position(packer: &'a BitPacker, position: usize) -> Self {
        BitUnpacker {
            source: Cow::Borrowed(packer),
            position,
        }
    }

    /// Current read cursor, in bits.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Bits left before the end of the written data.
    pub fn remaining(&self) -> usize {
        self.source.len().saturating_sub(self.position)
    }

    pub fn seek(&mut self, position: usize) {
        self.position = position;
    }

    pub fn rewind(&mut self) {
        self.position = 0;
    }

    /// Drops the reader and returns its cursor.
    pub fn into_position(self) -> usize {
        self.position
    }

    /// Reads `num_bits` bits, least significant first.
    ///
    /// Widths above 64 consume the extra bits and discard them.
    pub fn read_int(&mut self, num_bits: usize) -> u64 {
        let mut value = 0u64;
        for i in 0..num_bits.min(64) {
            if self.source.get(self.position.saturating_add(i)) {
                value |= 1 << i;
            }
        }
        self.position = self.position.saturating_add(num_bits);

        value
    }

    /// Reads `num_bits` bits and sign-extends them.
    pub fn read_signed(&mut self, num_bits: usize) -> i64 {
        let value = self.read_int(num_bits);
        bits::sign_extend(value, num_bits.min(64))
    }

    pub fn read_bool(&mut self) -> bool {
        self.read_int(1) != 0
    }

    /// Reads up to `num_bytes` characters, stopping after a zero byte.
    ///
    /// The zero byte is consumed but not returned. `num_bytes` must match the
    /// width the field was written with, or every later field is misread.
    pub fn read_ascii(&mut self, num_bytes: usize) -> String {
        let mut text = String::with_capacity(num_bytes);
        for _ in 0..num_bytes {
            let byte = self.read_int(8) as u8;
            if byte == 0 {
                break;
            }
            text.push(char::from(byte));
        }

        text
    }
}

impl BitUnpacker<'static> {
    /// Reads from a packed string, decoded without validation.
    pub fn from_packed(packed: &str) -> Self {
        BitUnpacker {
            source: Cow::Owned(BitPacker::from_packed(packed)),
            position: 0,
        }
    }

    /// Reads from a packed string, rejecting characters outside the packed alphabet.
    pub fn try_from_packed(packed: &str) -> Result<Self, DecodeError> {
        Ok(BitUnpacker {
            source: Cow::Owned(BitPacker::try_from_packed(packed)?),
            position: 0,
        })
    }
}

impl<'a> From<&'a BitPacker> for BitUnpacker<'a> {
    fn from(packer: &'a BitPacker) -> Self {
        BitUnpacker::new(packer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_int() {
        let mut packer = BitPacker::new();
        packer.add_int(5, 3);
        packer.add_int(1000, 10);

        let mut reader = BitUnpacker::new(&packer);
        assert_eq!(reader.read_int(3), 5);
        assert_eq!(reader.read_int(10), 1000);
        assert_eq!(reader.position(), 13);
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn test_read_past_end_is_zero() {
        let mut packer = BitPacker::new();
        packer.add_int(3, 2);

        let mut reader = BitUnpacker::new(&packer);
        assert_eq!(reader.read_int(2), 3);
        assert_eq!(reader.read_int(32), 0);
        assert_eq!(reader.read_ascii(4), "");
        assert_eq!(reader.position(), 42);
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn test_read_from_packed_string() {
        let mut packer = BitPacker::new();
        packer.add_int(5, 3);
        let packed = packer.to_packed();

        let mut reader = BitUnpacker::from_packed(&packed);
        assert_eq!(reader.read_int(3), 5);
        // padding bits of the last character
        assert_eq!(reader.remaining(), 4);
        assert_eq!(reader.read_int(4), 0);
    }

    #[test]
    fn test_read_ascii_stops_at_terminator() {
        let mut packer = BitPacker::new();
        packer.add_ascii("ab", 5);
        packer.add_int(42, 6);

        let mut reader = BitUnpacker::new(&packer);
        assert_eq!(reader.read_ascii(5), "ab");
        assert_eq!(reader.position(), 24);
        assert_eq!(reader.read_int(6), 42);
    }

    #[test]
    fn test_read_ascii_full_width() {
        let mut packer = BitPacker::new();
        packer.add_ascii("abcdef", 4);
        packer.add_bool(true);

        let mut reader = BitUnpacker::new(&packer);
        assert_eq!(reader.read_ascii(4), "abcd");
        assert!(reader.read_bool());
    }

    #[test]
    fn test_mismatched_width_desynchronizes() {
        let mut packer = BitPacker::new();
        packer.add_ascii("ab", 5);
        packer.add_int(42, 6);

        let mut reader = BitUnpacker::new(&packer);
        assert_eq!(reader.read_ascii(1), "a");
        assert_ne!(reader.read_int(6), 42);
    }

    #[test]
    fn test_read_signed() {
        let mut packer = BitPacker::new();
        packer.add_signed(-3, 5);
        packer.add_signed(12, 5);
        packer.add_signed(i64::MIN, 64);

        let mut reader = BitUnpacker::new(&packer);
        assert_eq!(reader.read_signed(5), -3);
        assert_eq!(reader.read_signed(5), 12);
        assert_eq!(reader.read_signed(64), i64::MIN);
    }

    #[test]
    fn test_reread_and_seek() {
        let mut packer = BitPacker::new();
        packer.add_int(9, 4);
        packer.add_int(3, 4);

        let mut reader = BitUnpacker::new(&packer);
        assert_eq!(reader.read_int(4), 9);
        reader.rewind();
        assert_eq!(reader.read_int(4), 9);
        reader.seek(4);
        assert_eq!(reader.read_int(4), 3);

        let mut second = BitUnpacker::from(&packer);
        assert_eq!(second.read_int(8), 9 | (3 << 4));
    }

    #[test]
    fn test_resume_after_append() {
        let mut packer = BitPacker::new();
        packer.add_int(6, 3);

        let mut reader = BitUnpacker::new(&packer);
        assert_eq!(reader.read_int(3), 6);
        let position = reader.into_position();

        packer.add_ascii("hi", 4);

        let mut reader = BitUnpacker::with_position(&packer, position);
        assert_eq!(reader.read_ascii(4), "hi");
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn test_read_near_end_of_address_space() {
        let mut packer = BitPacker::new();
        packer.add_int(1, 1);

        let mut reader = BitUnpacker::new(&packer);
        reader.seek(usize::MAX - 3);
        assert_eq!(reader.read_int(16), 0);
        assert_eq!(reader.position(), usize::MAX);
        assert_eq!(reader.read_ascii(2), "");
        assert!(!reader.read_bool());
        assert_eq!(reader.remaining(), 0);
    }

    #[test]
    fn test_try_from_packed() {
        assert!(BitUnpacker::try_from_packed("\u{7F}").is_err());
        let mut reader = BitUnpacker::try_from_packed("%").unwrap();
        assert_eq!(reader.read_int(3), 5);
    }
}
