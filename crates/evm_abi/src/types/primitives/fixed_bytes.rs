use crate::{ABIError, ABIType, ABIValue, constants::WORD_SIZE, utils};

impl ABIType {
    pub(crate) fn encode_fixed_bytes(&self, value: &ABIValue) -> Result<Vec<u8>, ABIError> {
        match self {
            ABIType::FixedBytes(length) => {
                let bytes = match value {
                    ABIValue::Bytes(b) => b,
                    _ => {
                        return Err(ABIError::SchemaMismatch {
                            message: format!("ABI value mismatch, expected bytes{}", length.value()),
                        });
                    }
                };

                if bytes.len() != length.value() {
                    return Err(ABIError::SchemaMismatch {
                        message: format!(
                            "Expected exactly {} bytes for bytes{}, got {}",
                            length.value(),
                            length.value(),
                            bytes.len()
                        ),
                    });
                }

                Ok(utils::pad_right(bytes))
            }
            _ => Err(ABIError::SchemaMismatch {
                message: "ABI type mismatch, expected fixed bytes".to_string(),
            }),
        }
    }

    pub(crate) fn decode_fixed_bytes(&self, bytes: &[u8]) -> Result<ABIValue, ABIError> {
        match self {
            ABIType::FixedBytes(length) => {
                if bytes.len() != WORD_SIZE {
                    return Err(ABIError::MalformedInput {
                        message: format!(
                            "Invalid byte array length, expected {} bytes, got {}",
                            WORD_SIZE,
                            bytes.len()
                        ),
                    });
                }

                let (content, padding) = bytes.split_at(length.value());
                if padding.iter().any(|b| *b != 0) {
                    return Err(ABIError::MalformedInput {
                        message: format!("bytes{} word has non-zero padding", length.value()),
                    });
                }

                Ok(ABIValue::Bytes(content.to_vec()))
            }
            _ => Err(ABIError::SchemaMismatch {
                message: "ABI type mismatch, expected fixed bytes".to_string(),
            }),
        }
    }
}
