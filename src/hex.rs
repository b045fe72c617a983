//! Hexadecimal codec.
//!
//! Conversions between hex text, raw bytes and big-endian 16-bit words.
//! Everything past this module works on integers only.

use ::hex::FromHexError;

use crate::PacketError;

/// Number of hex characters that make up one 16-bit word.
pub const CHARS_PER_WORD: usize = 4;

/// Decodes a string of hex digit pairs into bytes.
///
/// Upper and lower case digits are both accepted. No whitespace or `0x`
/// prefix is allowed.
///
/// # Returns
/// - `Ok(Vec<u8>)` - The decoded bytes
/// - `Err(PacketError)` - If the length is odd or a character is not a hex digit
pub fn decode(input: &str) -> Result<Vec<u8>, PacketError> {
    ::hex::decode(input).map_err(|e| match e {
        FromHexError::InvalidHexCharacter { index, .. } => {
            let offset = index - index % 2;
            PacketError::malformed(
                format!("invalid hex digit at offset {}", offset),
                input.get(offset..).unwrap_or(input),
            )
        }
        FromHexError::OddLength | FromHexError::InvalidStringLength => PacketError::malformed(
            format!("odd number of hex characters ({})", input.len()),
            input,
        ),
    })
}

/// Encodes bytes as lowercase hex.
pub fn encode(bytes: &[u8]) -> String {
    ::hex::encode(bytes)
}

/// Splits bytes into big-endian words. A trailing odd byte is ignored.
pub fn to_words(bytes: &[u8]) -> Vec<u16> {
    bytes
        .chunks_exact(2)
        .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
        .collect()
}

/// Formats a word the way the report prints it: `0x` prefix, lowercase, no padding.
pub fn word_to_hex(word: u16) -> String {
    format!("{:#x}", word)
}
