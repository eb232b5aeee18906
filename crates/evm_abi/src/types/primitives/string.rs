use crate::{
    ABIError, ABIType, ABIValue,
    types::primitives::bytes::{decode_length_prefixed, encode_length_prefixed},
};

impl ABIType {
    pub(crate) fn encode_string(&self, value: &ABIValue) -> Result<Vec<u8>, ABIError> {
        match self {
            ABIType::String => {
                let value = match value {
                    ABIValue::String(s) => s,
                    _ => {
                        return Err(ABIError::SchemaMismatch {
                            message: "ABI value mismatch, expected string".to_string(),
                        });
                    }
                };

                Ok(encode_length_prefixed(value.as_bytes()))
            }
            _ => Err(ABIError::SchemaMismatch {
                message: "ABI type mismatch, expected string".to_string(),
            }),
        }
    }

    pub(crate) fn decode_string(&self, bytes: &[u8]) -> Result<ABIValue, ABIError> {
        match self {
            ABIType::String => {
                let content_bytes = decode_length_prefixed(bytes)?;
                let string_value =
                    String::from_utf8(content_bytes.to_vec()).map_err(|_| ABIError::MalformedInput {
                        message: "Invalid UTF-8 encoding".to_string(),
                    })?;
                Ok(ABIValue::String(string_value))
            }
            _ => Err(ABIError::SchemaMismatch {
                message: "ABI type mismatch, expected string".to_string(),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils;

    #[test]
    fn test_multibyte_characters() {
        let value = ABIValue::String("What’s new 😅".to_string());
        let encoded = ABIType::String.encode(&value).unwrap();
        assert_eq!(utils::read_usize_word(&encoded, 0).unwrap(), 17);
        assert_eq!(ABIType::String.decode(&encoded).unwrap(), value);
    }

    #[test]
    fn test_invalid_utf8() {
        let mut bytes = utils::usize_to_word(2);
        bytes.extend(utils::pad_right(&[0xc3, 0x28]));
        let result = ABIType::String.decode(&bytes);
        assert_eq!(
            result.unwrap_err().to_string(),
            "ABI decoding failed: Invalid UTF-8 encoding"
        );
    }

    #[test]
    fn test_wrong_input_type() {
        let value = ABIValue::Uint(num_bigint::BigUint::from(42u32));
        let result = ABIType::String.encode(&value);
        assert_eq!(
            result.unwrap_err().to_string(),
            "ABI schema mismatch: ABI value mismatch, expected string"
        );
    }
}
