//! Growable bit vector backed by a contiguous byte buffer.
//!
//! The vector tracks its highest set bit; [`BitVector::size`] is derived from it
//! rather than from the allocated buffer. Reads past the buffer are permissive
//! and return `false` or `None`.

use std::fmt::{self, Write as _};
use std::hash::{Hash, Hasher};
use std::io::{self, Read, Write};

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use tracing::{debug, trace};

use crate::bits::{self, BIT_MASKS, CLEAR_MASKS, HIGH_MASKS, LOW_MASKS};

/// An indexable, growable sequence of bits.
///
/// # Examples
///
/// ```
/// use bitpack::bit_vector::BitVector;
///
/// let mut bv = BitVector::new();
/// bv.set(3);
/// bv.set(10);
/// assert_eq!(bv.size(), 11);
///
/// bv.shift_right(4, 2);
/// assert!(bv.get(3));
/// assert!(bv.get(12));
/// assert!(!bv.get(10));
/// ```
#[derive(Debug, Clone, Default)]
pub struct BitVector {
    bytes: Vec<u8>,
    highest: Option<usize>,
}

impl BitVector {
    /// Creates an empty vector with no allocated storage.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty vector whose buffer already holds `bits` bits.
    pub fn with_capacity(bits: usize) -> Self {
        BitVector {
            bytes: vec![0u8; bits::bytes_for_bits(bits)],
            highest: None,
        }
    }

    /// Index of the highest set bit, or `None` when no bit is set.
    pub fn highest_set_bit(&self) -> Option<usize> {
        self.highest
    }

    /// Logical length: highest set bit + 1.
    pub fn size(&self) -> usize {
        self.highest.map_or(0, |h| h + 1)
    }

    pub fn is_empty(&self) -> bool {
        self.highest.is_none()
    }

    /// Number of bits the current buffer can hold without growing.
    pub fn capacity_bits(&self) -> usize {
        self.bytes.len() * 8
    }

    /// Content bytes, from the first byte up to the one holding the highest set bit.
    pub fn as_bytes(&self) -> &[u8] {
        match self.highest {
            Some(h) => &self.bytes[..=bits::byte_index(h)],
            None => &[],
        }
    }

    /// Returns the bit at `index`; `false` outside the buffer.
    pub fn get(&self, index: usize) -> bool {
        self.bytes
            .get(bits::byte_index(index))
            .is_some_and(|byte| byte & BIT_MASKS[bits::bit_index(index)] != 0)
    }

    /// Sets the bit at `index`, growing the buffer when needed.
    pub fn set(&mut self, index: usize) {
        self.ensure_bytes(bits::byte_index(index) + 1);
        self.bytes[bits::byte_index(index)] |= BIT_MASKS[bits::bit_index(index)];

        if self.highest.is_none_or(|h| index > h) {
            self.highest = Some(index);
        }
    }

    /// Sets every bit in `start..end`.
    pub fn set_range(&mut self, start: usize, end: usize) {
        if start >= end {
            return;
        }

        let last_bit = end - 1;
        let first = bits::byte_index(start);
        let last = bits::byte_index(last_bit);
        self.ensure_bytes(last + 1);

        let head = HIGH_MASKS[bits::bit_index(start)];
        let tail = LOW_MASKS[bits::bit_index(last_bit) + 1];
        if first == last {
            self.bytes[first] |= head & tail;
        } else {
            self.bytes[first] |= head;
            self.bytes[first + 1..last].fill(0xFF);
            self.bytes[last] |= tail;
        }

        if self.highest.is_none_or(|h| last_bit > h) {
            self.highest = Some(last_bit);
        }
    }

    /// Clears the bit at `index`.
    pub fn clear(&mut self, index: usize) {
        let Some(byte) = self.bytes.get_mut(bits::byte_index(index)) else {
            return;
        };
        *byte &= CLEAR_MASKS[bits::bit_index(index)];

        if self.highest == Some(index) {
            self.highest = self.prev_set_bit(index);
        }
    }

    /// Clears every bit in `start..end`.
    pub fn clear_range(&mut self, start: usize, end: usize) {
        let Some(h) = self.highest else {
            return;
        };
        if start >= end || start > h {
            return;
        }

        // Nothing is set past the highest bit.
        let end = end.min(h + 1);
        let last_bit = end - 1;
        let first = bits::byte_index(start);
        let last = bits::byte_index(last_bit);

        let head = HIGH_MASKS[bits::bit_index(start)];
        let tail = LOW_MASKS[bits::bit_index(last_bit) + 1];
        if first == last {
            self.bytes[first] &= !(head & tail);
        } else {
            self.bytes[first] &= !head;
            self.bytes[first + 1..last].fill(0);
            self.bytes[last] &= !tail;
        }

        if h <= last_bit {
            self.highest = self.prev_set_bit(start);
        }
    }

    /// Smallest set index `>= from`.
    pub fn next_set_bit(&self, from: usize) -> Option<usize> {
        let h = self.highest?;
        if from > h {
            return None;
        }

        let last = bits::byte_index(h);
        let mut byte_idx = bits::byte_index(from);
        let mut byte = self.bytes[byte_idx] & HIGH_MASKS[bits::bit_index(from)];

        loop {
            if byte != 0 {
                return Some(byte_idx * 8 + byte.trailing_zeros() as usize);
            }
            if byte_idx == last {
                return None;
            }

            byte_idx += 1;
            byte = self.bytes[byte_idx];
        }
    }

    /// Largest set index strictly below `before`.
    pub fn prev_set_bit(&self, before: usize) -> Option<usize> {
        let h = self.highest?;
        if before == 0 {
            return None;
        }

        let start = (before - 1).min(h);
        let mut byte_idx = bits::byte_index(start);
        let mut byte = self.bytes[byte_idx] & LOW_MASKS[bits::bit_index(start) + 1];

        loop {
            if byte != 0 {
                return Some(byte_idx * 8 + 7 - byte.leading_zeros() as usize);
            }
            if byte_idx == 0 {
                return None;
            }

            byte_idx -= 1;
            byte = self.bytes[byte_idx];
        }
    }

    /// Number of set bits in `start..=end`, visited in ascending order.
    pub fn count_set_bits(&self, start: usize, end: usize) -> usize {
        let mut count = 0;
        let mut next = self.next_set_bit(start);

        while let Some(index) = next {
            if index > end {
                break;
            }
            count += 1;
            next = self.next_set_bit(index + 1);
        }

        count
    }

    /// Ascending iterator over the set indices.
    pub fn iter_ones(&self) -> Ones<'_> {
        Ones {
            vector: self,
            next: self.next_set_bit(0),
        }
    }

    /// Inserts `num_shift_bits` clear bits at `insert_offset`.
    ///
    /// Every bit at or after `insert_offset` moves up by `num_shift_bits`; bits
    /// below it are untouched. Bytes are moved from the top down, each
    /// destination byte assembled from at most two source bytes, so no scratch
    /// buffer is needed.
    pub fn shift_right(&mut self, insert_offset: usize, num_shift_bits: usize) {
        let Some(h) = self.highest else {
            return;
        };
        if insert_offset > h || num_shift_bits == 0 {
            return;
        }

        let new_highest = h + num_shift_bits;
        trace!(insert_offset, num_shift_bits, new_highest, "shifting bit vector");
        self.ensure_bytes(bits::byte_index(new_highest) + 1);

        let byte_shift = num_shift_bits / 8;
        let bit_shift = num_shift_bits % 8;
        let first = bits::byte_index(insert_offset);
        let split = bits::bit_index(insert_offset);

        // Bits below the insert point in the first byte stay put.
        let keep = self.bytes[first] & LOW_MASKS[split];
        self.bytes[first] &= HIGH_MASKS[split];

        for dst in (first + byte_shift..=bits::byte_index(new_highest)).rev() {
            let src = dst - byte_shift;
            let high = self.bytes[src];

            self.bytes[dst] = if bit_shift == 0 {
                high
            } else {
                let low = if src > first { self.bytes[src - 1] } else { 0 };
                (high << bit_shift) | (low >> (8 - bit_shift))
            };
        }

        self.bytes[first..first + byte_shift].fill(0);
        self.bytes[first] |= keep;
        self.highest = Some(new_highest);
    }

    /// Persists the vector: big-endian `i32` highest set bit (`-1` when empty),
    /// big-endian `i32` byte count, then the bytes.
    pub fn write<W: Write>(&self, output: &mut W) -> io::Result<()> {
        let highest = match self.highest {
            Some(h) => i32::try_from(h).map_err(|_| {
                io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "highest set bit does not fit in an i32",
                )
            })?,
            None => -1,
        };
        let buffer_len = i32::try_from(self.bytes.len()).unwrap_or(i32::MAX);
        // Truncating division: an empty vector with storage persists one byte.
        let count = buffer_len.min(highest / 8 + 1);

        output.write_i32::<BigEndian>(highest)?;
        output.write_i32::<BigEndian>(count)?;
        output.write_all(&self.bytes[..count as usize])?;

        debug!(highest, count, "wrote bit vector");
        Ok(())
    }

    /// Replaces this vector with one previously persisted by [`BitVector::write`].
    ///
    /// The buffer afterwards holds exactly the persisted bytes. On error the
    /// vector is left unchanged.
    ///
    /// Stricter than the format itself: headers that would break the
    /// highest-set-bit invariant (negative counts, a count too short for the
    /// highest bit, a clear highest bit, bits above it) fail with
    /// [`io::ErrorKind::InvalidData`].
    pub fn read<R: Read>(&mut self, input: &mut R) -> io::Result<()> {
        let highest = input.read_i32::<BigEndian>()?;
        let count = input.read_i32::<BigEndian>()?;

        if highest < -1 {
            return Err(invalid_data("highest set bit is below -1"));
        }
        let count = usize::try_from(count).map_err(|_| invalid_data("negative byte count"))?;
        let highest = usize::try_from(highest).ok();
        if highest.is_some_and(|h| bits::byte_index(h) >= count) {
            return Err(invalid_data("byte count too small for highest set bit"));
        }

        let mut bytes = Vec::new();
        input.by_ref().take(count as u64).read_to_end(&mut bytes)?;
        if bytes.len() != count {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "bit vector content is truncated",
            ));
        }

        let content_end = highest.map_or(0, |h| bits::byte_index(h) + 1);
        if let Some(h) = highest {
            let top = bytes[bits::byte_index(h)];
            if top & BIT_MASKS[bits::bit_index(h)] == 0 {
                return Err(invalid_data("highest set bit is clear"));
            }
            if top & !LOW_MASKS[bits::bit_index(h) + 1] != 0 {
                return Err(invalid_data("bits set above the highest set bit"));
            }
        }
        if bytes[content_end..].iter().any(|&b| b != 0) {
            return Err(invalid_data("bits set above the highest set bit"));
        }

        debug!(?highest, count, "read bit vector");
        self.bytes = bytes;
        self.highest = highest;
        Ok(())
    }

    /// Reads a vector previously persisted by [`BitVector::write`].
    pub fn read_from<R: Read>(input: &mut R) -> io::Result<Self> {
        let mut vector = BitVector::new();
        vector.read(input)?;
        Ok(vector)
    }

    fn ensure_bytes(&mut self, len: usize) {
        if self.bytes.len() < len {
            trace!(from = self.bytes.len(), to = len, "growing bit vector buffer");
            self.bytes.resize(len, 0);
        }
    }
}

fn invalid_data(message: &'static str) -> io::Error {
    io::Error::new(io::ErrorKind::InvalidData, message)
}

impl PartialEq for BitVector {
    fn eq(&self, other: &Self) -> bool {
        self.highest == other.highest && self.as_bytes() == other.as_bytes()
    }
}

impl Eq for BitVector {}

impl Hash for BitVector {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.highest.hash(state);
        self.as_bytes().hash(state);
    }
}

impl fmt::Display for BitVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for index in 0..self.size() {
            f.write_char(if self.get(index) { '1' } else { '0' })?;
        }
        Ok(())
    }
}

impl FromIterator<usize> for BitVector {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        let mut vector = BitVector::new();
        vector.extend(iter);
        vector
    }
}

impl Extend<usize> for BitVector {
    fn extend<I: IntoIterator<Item = usize>>(&mut self, iter: I) {
        for index in iter {
            self.set(index);
        }
    }
}

/// Iterator over set indices, see [`BitVector::iter_ones`].
pub struct Ones<'a> {
    vector: &'a BitVector,
    next: Option<usize>,
}

impl Iterator for Ones<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let current = self.next?;
        self.next = current
            .checked_add(1)
            .and_then(|from| self.vector.next_set_bit(from));
        Some(current)
    }
}
