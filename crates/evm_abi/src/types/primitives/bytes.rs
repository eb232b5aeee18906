use crate::{ABIError, ABIType, ABIValue, constants::WORD_SIZE, utils};

/// Encodes `content` as a length word followed by the content right-padded to a word boundary.
pub(crate) fn encode_length_prefixed(content: &[u8]) -> Vec<u8> {
    let mut result = utils::usize_to_word(content.len());
    result.extend(utils::pad_right(content));
    result
}

/// Reads a length word at the start of `bytes` and returns the content it announces.
pub(crate) fn decode_length_prefixed(bytes: &[u8]) -> Result<&[u8], ABIError> {
    let length = utils::read_usize_word(bytes, 0)?;
    WORD_SIZE
        .checked_add(length)
        .and_then(|end| bytes.get(WORD_SIZE..end))
        .ok_or_else(|| ABIError::MalformedInput {
            message: format!(
                "Byte array is too short, length prefix announces {} bytes but only {} remain",
                length,
                bytes.len().saturating_sub(WORD_SIZE)
            ),
        })
}

impl ABIType {
    pub(crate) fn encode_bytes(&self, value: &ABIValue) -> Result<Vec<u8>, ABIError> {
        match self {
            ABIType::Bytes => match value {
                ABIValue::Bytes(b) => Ok(encode_length_prefixed(b)),
                _ => Err(ABIError::SchemaMismatch {
                    message: "ABI value mismatch, expected bytes".to_string(),
                }),
            },
            _ => Err(ABIError::SchemaMismatch {
                message: "ABI type mismatch, expected bytes".to_string(),
            }),
        }
    }

    pub(crate) fn decode_bytes(&self, bytes: &[u8]) -> Result<ABIValue, ABIError> {
        match self {
            ABIType::Bytes => Ok(ABIValue::Bytes(decode_length_prefixed(bytes)?.to_vec())),
            _ => Err(ABIError::SchemaMismatch {
                message: "ABI type mismatch, expected bytes".to_string(),
            }),
        }
    }
}
