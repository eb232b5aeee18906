use crate::{
    ABIError, ABIType, ABIValue,
    types::collections::tuple::{decode_abi_types, encode_abi_types},
};

impl ABIType {
    pub(crate) fn encode_static_array(&self, value: &ABIValue) -> Result<Vec<u8>, ABIError> {
        let (child_type, size) = match self {
            ABIType::StaticArray(child_type, size) => (child_type.as_ref(), *size),
            _ => {
                return Err(ABIError::SchemaMismatch {
                    message: "ABI type mismatch, expected static array".to_string(),
                });
            }
        };

        let values = match value {
            ABIValue::Array(n) => n,
            _ => {
                return Err(ABIError::SchemaMismatch {
                    message: "ABI value mismatch, expected an array of values".to_string(),
                });
            }
        };

        if values.len() != size {
            return Err(ABIError::SchemaMismatch {
                message: format!("Expected {} elements for {}, got {}", size, self, values.len()),
            });
        }

        // Same layout as a tuple of `size` copies of the element type
        let child_types = vec![child_type; size];
        encode_abi_types(&child_types, values)
    }

    pub(crate) fn decode_static_array(&self, bytes: &[u8]) -> Result<ABIValue, ABIError> {
        let (child_type, size) = match self {
            ABIType::StaticArray(child_type, size) => (child_type.as_ref(), *size),
            _ => {
                return Err(ABIError::SchemaMismatch {
                    message: "ABI type mismatch, expected static array".to_string(),
                });
            }
        };

        let required = child_type.head_size().saturating_mul(size);
        if required > bytes.len() {
            return Err(ABIError::MalformedInput {
                message: format!(
                    "{} needs at least {} bytes, but only {} remain",
                    self,
                    required,
                    bytes.len()
                ),
            });
        }

        let child_types = vec![child_type; size];
        Ok(ABIValue::Array(decode_abi_types(&child_types, bytes)?))
    }
}
