//! Mapping between 7-bit values and the printable characters of a packed string.
//!
//! Values `0..95` map onto `' '..='~'`, values `95..128` map onto
//! `U+00C0..=U+00E0`.

/// Number of bits carried by one packed character.
pub const BITS_PER_CHAR: usize = 7;

const LOW_OFFSET: u32 = 32;
const HIGH_OFFSET: u32 = 97;
/// First 7-bit value that maps into the upper range.
const HIGH_START: u8 = 95;
/// First code point of the upper range.
const HIGH_CHAR_START: u32 = 192;
const HIGH_CHAR_END: u32 = 224;

/// Maps a 7-bit value to its printable character. Bits above the low 7 are ignored.
pub fn encode(value: u8) -> char {
    let value = value & 0x7F;
    let code = if value < HIGH_START {
        value + LOW_OFFSET as u8
    } else {
        value + HIGH_OFFSET as u8
    };

    char::from(code)
}

/// Maps a character back to its 7-bit value without validation.
///
/// Characters outside the alphabet still produce a value (the low 7 bits of
/// the offset-adjusted code point), so corrupted input decodes to garbage
/// rather than failing.
pub fn decode(ch: char) -> u8 {
    let code = ch as u32;
    let value = if code >= HIGH_CHAR_START {
        code.wrapping_sub(HIGH_OFFSET)
    } else {
        code.wrapping_sub(LOW_OFFSET)
    };

    (value & 0x7F) as u8
}

/// Maps a character back to its 7-bit value, or `None` if it is not in the alphabet.
pub fn decode_strict(ch: char) -> Option<u8> {
    if is_packed_char(ch) {
        Some(decode(ch))
    } else {
        None
    }
}

/// Returns true if `ch` belongs to one of the two printable ranges.
pub fn is_packed_char(ch: char) -> bool {
    let code = ch as u32;
    (LOW_OFFSET..LOW_OFFSET + u32::from(HIGH_START)).contains(&code)
        || (HIGH_CHAR_START..=HIGH_CHAR_END).contains(&code)
}

/// Number of characters needed to carry `bits` bits.
pub fn packed_len(bits: usize) -> usize {
    bits.div_ceil(BITS_PER_CHAR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_boundaries() {
        assert_eq!(encode(0), ' ');
        assert_eq!(encode(94), '~');
        assert_eq!(encode(95), '\u{C0}');
        assert_eq!(encode(127), '\u{E0}');
    }

    #[test]
    fn test_decode_inverts_encode() {
        for value in 0..128u8 {
            let ch = encode(value);
            assert!(is_packed_char(ch));
            assert_eq!(decode(ch), value);
            assert_eq!(decode_strict(ch), Some(value));
        }
    }

    #[test]
    fn test_decode_strict_rejects_outside_alphabet() {
        assert_eq!(decode_strict('\u{7F}'), None);
        assert_eq!(decode_strict('\n'), None);
        assert_eq!(decode_strict('\u{BF}'), None);
        assert_eq!(decode_strict('\u{E1}'), None);
        assert_eq!(decode_strict('€'), None);
    }

    #[test]
    fn test_decode_is_permissive() {
        // '\n' is 10, 10 - 32 wraps and keeps the low 7 bits.
        assert_eq!(decode('\n'), (10u32.wrapping_sub(32) & 0x7F) as u8);
    }

    #[test]
    fn test_packed_len() {
        assert_eq!(packed_len(0), 0);
        assert_eq!(packed_len(1), 1);
        assert_eq!(packed_len(7), 1);
        assert_eq!(packed_len(8), 2);
        assert_eq!(packed_len(24), 4);
    }
}
