//! Low-level bit manipulation helpers shared by the bit vector and the codec.
//!
//! Bits are addressed in LSB-first order inside each byte: bit `i` is stored in
//! byte `i / 8` under the mask `1 << (i % 8)`.

/// `BIT_MASKS[n]` selects bit `n` of a byte.
pub const BIT_MASKS: [u8; 8] = [
    0b0000_0001,
    0b0000_0010,
    0b0000_0100,
    0b0000_1000,
    0b0001_0000,
    0b0010_0000,
    0b0100_0000,
    0b1000_0000,
];

/// `CLEAR_MASKS[n]` keeps every bit of a byte except bit `n`.
pub const CLEAR_MASKS: [u8; 8] = [
    0b1111_1110,
    0b1111_1101,
    0b1111_1011,
    0b1111_0111,
    0b1110_1111,
    0b1101_1111,
    0b1011_1111,
    0b0111_1111,
];

/// `LOW_MASKS[n]` selects the bits strictly below bit `n`. Index 8 selects the whole byte.
pub const LOW_MASKS: [u8; 9] = [
    0b0000_0000,
    0b0000_0001,
    0b0000_0011,
    0b0000_0111,
    0b0000_1111,
    0b0001_1111,
    0b0011_1111,
    0b0111_1111,
    0b1111_1111,
];

/// `HIGH_MASKS[n]` selects bit `n` and every bit above it.
pub const HIGH_MASKS: [u8; 8] = [
    0b1111_1111,
    0b1111_1110,
    0b1111_1100,
    0b1111_1000,
    0b1111_0000,
    0b1110_0000,
    0b1100_0000,
    0b1000_0000,
];

/// Byte index holding bit `bit_pos`.
#[inline]
pub const fn byte_index(bit_pos: usize) -> usize {
    bit_pos / 8
}

/// Position of bit `bit_pos` inside its byte.
#[inline]
pub const fn bit_index(bit_pos: usize) -> usize {
    bit_pos % 8
}

/// Number of bytes needed to hold `bits` bits.
#[inline]
pub const fn bytes_for_bits(bits: usize) -> usize {
    bits.div_ceil(8)
}

/// Sign-extends the low `bits` of `value` to a full `i64`.
pub fn sign_extend(value: u64, bits: usize) -> i64 {
    if bits == 0 {
        return 0;
    }
    if bits >= 64 {
        return value as i64;
    }

    let shift = 64 - bits;
    ((value << shift) as i64) >> shift
}

/// Keeps the low `bits` of `value`.
pub fn low_bits(value: u64, bits: usize) -> u64 {
    if bits >= 64 {
        value
    } else {
        value & ((1u64 << bits) - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_masks_agree() {
        for n in 0..8 {
            assert_eq!(BIT_MASKS[n], !CLEAR_MASKS[n]);
            assert_eq!(LOW_MASKS[n] | HIGH_MASKS[n], 0xFF);
            assert_eq!(LOW_MASKS[n] & HIGH_MASKS[n], 0);
            assert_eq!(HIGH_MASKS[n] & BIT_MASKS[n], BIT_MASKS[n]);
        }
        assert_eq!(LOW_MASKS[8], 0xFF);
    }

    #[test]
    fn test_byte_and_bit_index() {
        assert_eq!(byte_index(0), 0);
        assert_eq!(byte_index(7), 0);
        assert_eq!(byte_index(8), 1);
        assert_eq!(bit_index(13), 5);
        assert_eq!(bytes_for_bits(0), 0);
        assert_eq!(bytes_for_bits(1), 1);
        assert_eq!(bytes_for_bits(16), 2);
        assert_eq!(bytes_for_bits(17), 3);
    }

    #[test]
    fn test_sign_extend() {
        assert_eq!(sign_extend(0b11111111, 8), -1);
        assert_eq!(sign_extend(0b01111111, 8), 127);
        assert_eq!(sign_extend(0b100, 3), -4);
        assert_eq!(sign_extend(u64::MAX, 64), -1);
        assert_eq!(sign_extend(1, 0), 0);
    }

    #[test]
    fn test_low_bits() {
        assert_eq!(low_bits(0xFF, 4), 0x0F);
        assert_eq!(low_bits(u64::MAX, 64), u64::MAX);
        assert_eq!(low_bits(u64::MAX, 0), 0);
    }
}
