use crate::{ABIError, ABIType, ABIValue, constants::WORD_SIZE};

impl ABIType {
    pub(crate) fn encode_bool(&self, value: &ABIValue) -> Result<Vec<u8>, ABIError> {
        match self {
            ABIType::Bool => {
                let bool_value = match value {
                    ABIValue::Bool(b) => b,
                    _ => {
                        return Err(ABIError::SchemaMismatch {
                            message: "ABI value mismatch, expected boolean".to_string(),
                        });
                    }
                };

                let mut word = vec![0u8; WORD_SIZE];
                word[WORD_SIZE - 1] = u8::from(*bool_value);
                Ok(word)
            }
            _ => Err(ABIError::SchemaMismatch {
                message: "ABI type mismatch, expected bool".to_string(),
            }),
        }
    }

    pub(crate) fn decode_bool(&self, bytes: &[u8]) -> Result<ABIValue, ABIError> {
        match self {
            ABIType::Bool => {
                if bytes.len() != WORD_SIZE {
                    return Err(ABIError::MalformedInput {
                        message: format!("Bool must be {} bytes long", WORD_SIZE),
                    });
                }

                let (padding, last) = bytes.split_at(WORD_SIZE - 1);
                if padding.iter().any(|b| *b != 0) {
                    return Err(ABIError::MalformedInput {
                        message: "Boolean could not be decoded from the byte string".to_string(),
                    });
                }
                match last[0] {
                    0 => Ok(ABIValue::Bool(false)),
                    1 => Ok(ABIValue::Bool(true)),
                    _ => Err(ABIError::MalformedInput {
                        message: "Boolean could not be decoded from the byte string".to_string(),
                    }),
                }
            }
            _ => Err(ABIError::SchemaMismatch {
                message: "ABI type mismatch, expected bool".to_string(),
            }),
        }
    }
}
