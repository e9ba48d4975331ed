//! Payload synthesis for the `send` command
//!
//! Three strategies: literal text, a deterministic cyclic filler of a
//! requested byte length, and hex-string decoding. Hex decoding runs in
//! bounded chunks through a fixed scratch buffer, matching the accounting
//! used on constrained-memory targets where the scratch size caps how many
//! hex pairs convert per pass.

use crate::errors::{CommandError, Result};
use crate::stack::OutboundMessage;

/// The 62-symbol alphabet the cyclic filler rotates through
pub const FILL_ALPHABET: &[u8; 62] =
    b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Scratch buffer size bounding how many bytes decode per hex chunk
pub const HEX_CHUNK_BYTES: usize = 50;

// ----------------------------------------------------------------------------
// Payload
// ----------------------------------------------------------------------------

/// One payload synthesis request, alive for a single send invocation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Payload<'a> {
    /// Literal text bytes
    Text(&'a str),
    /// Cyclic filler of exactly this many bytes
    AutoSize(u16),
    /// Hex string decoded into binary
    Hex(&'a str),
}

impl Payload<'_> {
    /// Append this payload's bytes to an outbound message
    pub fn encode_into<M: OutboundMessage>(&self, message: &mut M) -> Result<()> {
        match *self {
            Payload::Text(text) => {
                message.append(text.as_bytes())?;
                Ok(())
            }
            Payload::AutoSize(len) => append_fill(message, len),
            Payload::Hex(hex_str) => append_hex(message, hex_str),
        }
    }
}

// ----------------------------------------------------------------------------
// Cyclic Filler
// ----------------------------------------------------------------------------

/// Append `len` bytes of the cyclic alphanumeric filler
///
/// Byte `i` is symbol `i mod 62` of [`FILL_ALPHABET`]; bytes go into the
/// message one at a time in ascending cursor order.
pub fn append_fill<M: OutboundMessage>(message: &mut M, len: u16) -> Result<()> {
    for index in 0..usize::from(len) {
        let symbol = FILL_ALPHABET[index % FILL_ALPHABET.len()];
        message.append(&[symbol])?;
    }
    Ok(())
}

// ----------------------------------------------------------------------------
// Hex Decoding
// ----------------------------------------------------------------------------

/// Decode a hex string into the message in bounded chunks
///
/// Each pass converts up to [`HEX_CHUNK_BYTES`] bytes and advances the
/// cursor by the hex characters consumed. An odd remaining length means the
/// chunk's leading byte comes from a single character, so that pass consumes
/// one character fewer than two-per-byte.
pub fn append_hex<M: OutboundMessage>(message: &mut M, hex_str: &str) -> Result<()> {
    if hex_str.is_empty() || !hex_str.is_ascii() {
        return Err(CommandError::invalid_args("malformed hex payload"));
    }

    let mut scratch = [0u8; HEX_CHUNK_BYTES];
    let mut remaining = hex_str;
    while !remaining.is_empty() {
        let (decoded, consumed) = decode_chunk(remaining, &mut scratch)?;
        message.append(&scratch[..decoded])?;
        remaining = &remaining[consumed..];
    }
    Ok(())
}

/// Decode one scratch-bounded chunk, returning (bytes decoded, chars consumed)
fn decode_chunk(remaining: &str, scratch: &mut [u8; HEX_CHUNK_BYTES]) -> Result<(usize, usize)> {
    let odd = remaining.len() % 2 == 1;
    let decoded = remaining.len().div_ceil(2).min(HEX_CHUNK_BYTES);
    let consumed = if odd { decoded * 2 - 1 } else { decoded * 2 };

    let chunk = &remaining[..consumed];
    let result = if odd {
        // Leading byte carries a single nibble; zero-extend it.
        let padded = format!("0{chunk}");
        hex::decode_to_slice(&padded, &mut scratch[..decoded])
    } else {
        hex::decode_to_slice(chunk, &mut scratch[..decoded])
    };
    result.map_err(|_| CommandError::invalid_args(format!("malformed hex chunk `{chunk}`")))?;

    Ok((decoded, consumed))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::StackError;

    /// Message that refuses appends past a fixed capacity
    struct BoundedMessage {
        data: Vec<u8>,
        capacity: usize,
    }

    impl BoundedMessage {
        fn new(capacity: usize) -> Self {
            Self {
                data: Vec::new(),
                capacity,
            }
        }
    }

    impl OutboundMessage for BoundedMessage {
        fn append(&mut self, bytes: &[u8]) -> std::result::Result<(), StackError> {
            if self.data.len() + bytes.len() > self.capacity {
                return Err(StackError::NoBufs);
            }
            self.data.extend_from_slice(bytes);
            Ok(())
        }

        fn len(&self) -> usize {
            self.data.len()
        }
    }

    #[test]
    fn test_fill_five_bytes() {
        let mut message: Vec<u8> = Vec::new();
        append_fill(&mut message, 5).unwrap();
        assert_eq!(message, b"01234");
    }

    #[test]
    fn test_fill_wraps_at_sixty_two() {
        let mut message: Vec<u8> = Vec::new();
        append_fill(&mut message, 65).unwrap();
        assert_eq!(message.len(), 65);
        assert_eq!(message[61], b'z');
        assert_eq!(message[62], b'0');
        assert_eq!(message[63], b'1');
        assert_eq!(message[64], b'2');
    }

    #[test]
    fn test_fill_zero_length() {
        let mut message: Vec<u8> = Vec::new();
        append_fill(&mut message, 0).unwrap();
        assert!(message.is_empty());
    }

    #[test]
    fn test_fill_matches_modulo_formula() {
        let mut message: Vec<u8> = Vec::new();
        append_fill(&mut message, 200).unwrap();
        for (index, byte) in message.iter().enumerate() {
            assert_eq!(*byte, FILL_ALPHABET[index % 62]);
        }
    }

    #[test]
    fn test_hex_decodes_hello() {
        let mut message: Vec<u8> = Vec::new();
        append_hex(&mut message, "68656c6c6f").unwrap();
        assert_eq!(message, b"hello");
    }

    #[test]
    fn test_hex_odd_length_leading_nibble() {
        let mut message: Vec<u8> = Vec::new();
        append_hex(&mut message, "abc").unwrap();
        assert_eq!(message, vec![0x0a, 0xbc]);
    }

    #[test]
    fn test_hex_empty_is_rejected() {
        let mut message: Vec<u8> = Vec::new();
        assert!(matches!(
            append_hex(&mut message, ""),
            Err(CommandError::InvalidArgs { .. })
        ));
        assert!(message.is_empty());
    }

    #[test]
    fn test_hex_invalid_digit_is_rejected() {
        let mut message: Vec<u8> = Vec::new();
        assert!(matches!(
            append_hex(&mut message, "zz"),
            Err(CommandError::InvalidArgs { .. })
        ));
        assert!(message.is_empty());
    }

    #[test]
    fn test_hex_non_ascii_is_rejected() {
        let mut message: Vec<u8> = Vec::new();
        assert!(matches!(
            append_hex(&mut message, "abé1"),
            Err(CommandError::InvalidArgs { .. })
        ));
    }

    #[test]
    fn test_hex_spans_multiple_chunks() {
        // 120 characters decode to 60 bytes across two scratch passes.
        let hex_str: String = "0123456789abcdef".chars().cycle().take(120).collect();
        let mut message: Vec<u8> = Vec::new();
        append_hex(&mut message, &hex_str).unwrap();
        assert_eq!(message, hex::decode(&hex_str).unwrap());
    }

    #[test]
    fn test_hex_odd_length_spans_multiple_chunks() {
        // 101 characters: first pass decodes 50 bytes from 99 characters
        // (leading single nibble), second pass decodes the final byte.
        let hex_str: String = "fedcba98".chars().cycle().take(101).collect();
        let mut message: Vec<u8> = Vec::new();
        append_hex(&mut message, &hex_str).unwrap();

        let padded = format!("0{hex_str}");
        assert_eq!(message, hex::decode(&padded).unwrap());
        assert_eq!(message.len(), 51);
    }

    #[test]
    fn test_hex_append_failure_propagates() {
        let mut message = BoundedMessage::new(10);
        let hex_str: String = "ab".repeat(40);
        assert!(matches!(
            append_hex(&mut message, &hex_str),
            Err(CommandError::Stack(StackError::NoBufs))
        ));
    }

    #[test]
    fn test_fill_append_failure_propagates() {
        let mut message = BoundedMessage::new(3);
        assert!(matches!(
            append_fill(&mut message, 10),
            Err(CommandError::Stack(StackError::NoBufs))
        ));
        assert_eq!(message.data, b"012");
    }
}
