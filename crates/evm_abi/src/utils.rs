use num_bigint::BigUint;

use crate::{
    ABIError,
    constants::{HEX_PREFIX, WORD_SIZE},
};

/// Left-pads the big-endian bytes of `value` to `len` bytes.
///
/// Callers must have checked that `value` fits in `len` bytes.
pub fn big_uint_to_bytes(value: &BigUint, len: usize) -> Vec<u8> {
    let bytes = &value.to_bytes_be();
    let mut result = vec![0u8; len.saturating_sub(bytes.len())];
    result.extend_from_slice(bytes);
    result
}

/// Encodes a length or offset as a single big-endian ABI word.
pub fn usize_to_word(value: usize) -> Vec<u8> {
    let mut word = vec![0u8; WORD_SIZE];
    word[WORD_SIZE - size_of::<u64>()..].copy_from_slice(&(value as u64).to_be_bytes());
    word
}

/// Returns the word starting at `position`, or a `MalformedInput` error if the data is truncated.
pub fn read_word(bytes: &[u8], position: usize) -> Result<&[u8], ABIError> {
    position
        .checked_add(WORD_SIZE)
        .and_then(|end| bytes.get(position..end))
        .ok_or_else(|| ABIError::MalformedInput {
            message: format!(
                "Index out of bounds: trying to read a word at byte {} but data has length {}",
                position,
                bytes.len()
            ),
        })
}

/// Reads the word at `position` as a length or offset.
pub fn read_usize_word(bytes: &[u8], position: usize) -> Result<usize, ABIError> {
    let word = read_word(bytes, position)?;
    let (high, low) = word.split_at(WORD_SIZE - size_of::<u64>());
    if high.iter().any(|b| *b != 0) {
        return Err(ABIError::MalformedInput {
            message: format!("Word at byte {} is too large to be a length or offset", position),
        });
    }
    let mut buffer = [0u8; size_of::<u64>()];
    buffer.copy_from_slice(low);
    usize::try_from(u64::from_be_bytes(buffer)).map_err(|_| ABIError::MalformedInput {
        message: format!("Word at byte {} does not fit in usize", position),
    })
}

/// Number of bytes `len` occupies once right-padded to a word boundary.
pub fn padded_length(len: usize) -> usize {
    len.div_ceil(WORD_SIZE) * WORD_SIZE
}

/// Right-pads `bytes` with zeros to the next word boundary.
pub fn pad_right(bytes: &[u8]) -> Vec<u8> {
    let mut result = bytes.to_vec();
    result.resize(padded_length(bytes.len()), 0);
    result
}

pub fn strip_hex_prefix(input: &str) -> &str {
    input
        .strip_prefix(HEX_PREFIX)
        .or_else(|| input.strip_prefix("0X"))
        .unwrap_or(input)
}

/// Decodes a hex string with or without a `0x` prefix.
pub fn decode_hex(input: &str) -> Result<Vec<u8>, ABIError> {
    hex::decode(strip_hex_prefix(input)).map_err(|e| ABIError::MalformedInput {
        message: format!("Invalid hex input: {}", e),
    })
}

/// Renders bytes as a `0x`-prefixed lowercase hex string.
pub fn encode_hex(bytes: &[u8]) -> String {
    format!("{}{}", HEX_PREFIX, hex::encode(bytes))
}
