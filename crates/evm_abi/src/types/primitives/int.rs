use num_bigint::{BigInt, BigUint, Sign};

use crate::{ABIError, ABIType, ABIValue, constants::WORD_SIZE, utils};

/// 2^256, the modulus of two's complement words.
fn word_modulus() -> BigInt {
    BigInt::from(1u8) << (WORD_SIZE * 8)
}

/// Inclusive bounds of an `intN`.
fn int_bounds(bit_size: u16) -> (BigInt, BigInt) {
    let half = BigInt::from(1u8) << (bit_size - 1);
    (-half.clone(), half - 1)
}

impl ABIType {
    pub(crate) fn encode_int(&self, value: &ABIValue) -> Result<Vec<u8>, ABIError> {
        match self {
            ABIType::Int(bit_size) => {
                let bit_size = bit_size.value();
                let value = match value {
                    ABIValue::Int(n) => n,
                    _ => {
                        return Err(ABIError::SchemaMismatch {
                            message: "ABI value mismatch, expected int".to_string(),
                        });
                    }
                };

                let (min, max) = int_bounds(bit_size);
                if value < &min || value > &max {
                    return Err(ABIError::SchemaMismatch {
                        message: format!("{} does not fit in int{}", value, bit_size),
                    });
                }

                let unsigned = match value.sign() {
                    Sign::Minus => value + word_modulus(),
                    _ => value.clone(),
                };
                let unsigned = unsigned.to_biguint().ok_or_else(|| ABIError::SchemaMismatch {
                    message: format!("Failed to convert {} to two's complement", value),
                })?;

                Ok(utils::big_uint_to_bytes(&unsigned, WORD_SIZE))
            }
            _ => Err(ABIError::SchemaMismatch {
                message: "ABI type mismatch, expected int".to_string(),
            }),
        }
    }

    pub(crate) fn decode_int(&self, bytes: &[u8]) -> Result<ABIValue, ABIError> {
        match self {
            ABIType::Int(bit_size) => {
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

                let unsigned = BigInt::from(BigUint::from_bytes_be(bytes));
                let value = if bytes[0] & 0x80 != 0 {
                    unsigned - word_modulus()
                } else {
                    unsigned
                };

                let (min, max) = int_bounds(bit_size);
                if value < min || value > max {
                    return Err(ABIError::MalformedInput {
                        message: format!("{} is not a sign-extended int{}", value, bit_size),
                    });
                }

                Ok(ABIValue::Int(value))
            }
            _ => Err(ABIError::SchemaMismatch {
                message: "ABI type mismatch, expected int".to_string(),
            }),
        }
    }
}
