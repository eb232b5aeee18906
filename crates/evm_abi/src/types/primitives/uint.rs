use num_bigint::BigUint;

use crate::{ABIError, ABIType, ABIValue, constants::WORD_SIZE, utils};

impl ABIType {
    pub(crate) fn encode_uint(&self, value: &ABIValue) -> Result<Vec<u8>, ABIError> {
        match self {
            ABIType::Uint(bit_size) => {
                let bit_size = bit_size.value();
                let value = match value {
                    ABIValue::Uint(n) => n,
                    _ => {
                        return Err(ABIError::SchemaMismatch {
                            message: "ABI value mismatch, expected uint".to_string(),
                        });
                    }
                };

                if value.bits() > u64::from(bit_size) {
                    return Err(ABIError::SchemaMismatch {
                        message: format!("{} is too big to fit in uint{}", value, bit_size),
                    });
                }

                Ok(utils::big_uint_to_bytes(value, WORD_SIZE))
            }
            _ => Err(ABIError::SchemaMismatch {
                message: "ABI type mismatch, expected uint".to_string(),
            }),
        }
    }

    pub(crate) fn decode_uint(&self, bytes: &[u8]) -> Result<ABIValue, ABIError> {
        match self {
            ABIType::Uint(bit_size) => {
                let bit_size = bit_size.value();
                if bytes.len() != WORD_SIZE {
                    return Err(ABIError::MalformedInput {
                        message: format!(
                            "Invalid byte array length, expected {} bytes, got {}",
                            WORD_SIZE,
                            bytes.len()
                        ),
                    });
                }

                let value = BigUint::from_bytes_be(bytes);
                if value.bits() > u64::from(bit_size) {
                    return Err(ABIError::MalformedInput {
                        message: format!("{} does not fit in uint{}", value, bit_size),
                    });
                }

                Ok(ABIValue::Uint(value))
            }
            _ => Err(ABIError::SchemaMismatch {
                message: "ABI type mismatch, expected uint".to_string(),
            }),
        }
    }
}
