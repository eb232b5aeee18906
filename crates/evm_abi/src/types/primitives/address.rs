use crate::{
    ABIError, ABIType, ABIValue,
    constants::{ADDRESS_BYTE_LENGTH, ADDRESS_HEX_LENGTH, WORD_SIZE},
    utils,
};

impl ABIType {
    pub(crate) fn encode_address(&self, value: &ABIValue) -> Result<Vec<u8>, ABIError> {
        match self {
            ABIType::Address => {
                let address_str = match value {
                    ABIValue::Address(a) => a,
                    _ => {
                        return Err(ABIError::SchemaMismatch {
                            message: "ABI value mismatch, expected address string".to_string(),
                        });
                    }
                };

                let address_hex = utils::strip_hex_prefix(address_str);
                if address_hex.len() != ADDRESS_HEX_LENGTH {
                    return Err(ABIError::SchemaMismatch {
                        message: format!(
                            "Address must be exactly {} hex characters, got '{}'",
                            ADDRESS_HEX_LENGTH, address_str
                        ),
                    });
                }
                let address_bytes =
                    hex::decode(address_hex).map_err(|e| ABIError::SchemaMismatch {
                        message: format!("Invalid hex encoding for address '{}': {}", address_str, e),
                    })?;

                let mut word = vec![0u8; WORD_SIZE - ADDRESS_BYTE_LENGTH];
                word.extend_from_slice(&address_bytes);
                Ok(word)
            }
            _ => Err(ABIError::SchemaMismatch {
                message: "ABI type mismatch, expected address".to_string(),
            }),
        }
    }

    pub(crate) fn decode_address(&self, bytes: &[u8]) -> Result<ABIValue, ABIError> {
        match self {
            ABIType::Address => {
                if bytes.len() != WORD_SIZE {
                    return Err(ABIError::MalformedInput {
                        message: format!("Address word must be {} bytes long", WORD_SIZE),
                    });
                }
                let (padding, address_bytes) = bytes.split_at(WORD_SIZE - ADDRESS_BYTE_LENGTH);
                if padding.iter().any(|b| *b != 0) {
                    return Err(ABIError::MalformedInput {
                        message: "Address word has non-zero padding".to_string(),
                    });
                }

                Ok(ABIValue::Address(utils::encode_hex(address_bytes)))
            }
            _ => Err(ABIError::SchemaMismatch {
                message: "ABI type mismatch, expected address".to_string(),
            }),
        }
    }
}
