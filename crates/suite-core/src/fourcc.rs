//! Four-character codes.
//!
//! Keys, classes, types, units and enumerations in the scripting model are all
//! 32-bit values conventionally written as four ASCII characters, packed
//! big-endian (`'long'` is `0x6C6F6E67`).

use std::fmt;

/// Pack four bytes big-endian into a 32-bit code.
#[inline]
pub const fn four_char_code(bytes: [u8; 4]) -> u32 {
    u32::from_be_bytes(bytes)
}

/// Display adapter that prints printable codes as `'abcd'` and anything else
/// as hex.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FourCc(pub u32);

impl fmt::Display for FourCc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bytes = self.0.to_be_bytes();
        if bytes.iter().all(|b| (0x20..0x7F).contains(b)) {
            let text: String = bytes.iter().map(|&b| char::from(b)).collect();
            write!(f, "'{}'", text)
        } else {
            write!(f, "0x{:08X}", self.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_and_display() {
        assert_eq!(four_char_code(*b"long"), 0x6C6F_6E67);
        assert_eq!(FourCc(four_char_code(*b"obj ")).to_string(), "'obj '");
        assert_eq!(FourCc(1).to_string(), "0x00000001");
    }
}
