use crate::{
    ABIError, ABIType, ABIValue,
    constants::WORD_SIZE,
    types::collections::tuple::{decode_abi_types, encode_abi_types},
    utils,
};

impl ABIType {
    pub(crate) fn encode_dynamic_array(&self, value: &ABIValue) -> Result<Vec<u8>, ABIError> {
        let values = match value {
            ABIValue::Array(n) => n,
            _ => {
                return Err(ABIError::SchemaMismatch {
                    message: "ABI value mismatch, expected an array of values".to_string(),
                });
            }
        };

        let child_type = match self {
            ABIType::DynamicArray(child_type) => child_type.as_ref(),
            _ => {
                return Err(ABIError::SchemaMismatch {
                    message: "ABI type mismatch, expected dynamic array".to_string(),
                });
            }
        };

        let child_types = vec![child_type; values.len()];
        let encoded_value = encode_abi_types(&child_types, values)?;

        let mut merged_bytes = utils::usize_to_word(values.len());
        merged_bytes.extend(encoded_value);

        Ok(merged_bytes)
    }

    pub(crate) fn decode_dynamic_array(&self, bytes: &[u8]) -> Result<ABIValue, ABIError> {
        let child_type = match self {
            ABIType::DynamicArray(child_type) => child_type.as_ref(),
            _ => {
                return Err(ABIError::SchemaMismatch {
                    message: "ABI type mismatch, expected dynamic array".to_string(),
                });
            }
        };

        // The first word determines how many values are in the array
        let values_count = utils::read_usize_word(bytes, 0)?;
        let content = &bytes[WORD_SIZE..];

        let required = child_type.head_size().max(1).checked_mul(values_count);
        if required.is_none_or(|required| required > content.len()) {
            return Err(ABIError::MalformedInput {
                message: format!(
                    "Array length {} for {} exceeds the {} remaining bytes",
                    values_count,
                    self,
                    content.len()
                ),
            });
        }

        let child_types = vec![child_type; values_count];
        Ok(ABIValue::Array(decode_abi_types(&child_types, content)?))
    }
}
