use crate::{
    ABIError, ABIType, ABIValue,
    types::collections::tuple::{decode_abi_types, encode_abi_types},
};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Represents an ABI struct type with named fields.
///
/// On the wire a struct is indistinguishable from the tuple of its field types; the
/// name and field names only exist on the Rust side, for building and reading
/// [`ABIValue::Struct`] values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ABIStruct {
    /// The name of the struct type
    pub name: String,
    /// The fields of the struct in declaration order
    pub fields: Vec<StructField>,
}

/// Represents a field in a struct
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructField {
    pub name: String,
    pub field_type: ABIType,
}

impl StructField {
    pub fn new(name: impl Into<String>, field_type: ABIType) -> Self {
        Self {
            name: name.into(),
            field_type,
        }
    }
}

impl ABIStruct {
    pub fn new(name: impl Into<String>, fields: Vec<StructField>) -> Self {
        Self {
            name: name.into(),
            fields,
        }
    }

    /// A struct is dynamic iff any of its fields is.
    pub fn is_dynamic(&self) -> bool {
        self.fields.iter().any(|field| field.field_type.is_dynamic())
    }

    /// The anonymous tuple with the same layout as this struct.
    pub fn to_tuple_type(&self) -> ABIType {
        ABIType::Tuple(
            self.fields
                .iter()
                .map(|field| match &field.field_type {
                    ABIType::Struct(nested) => nested.to_tuple_type(),
                    other => other.clone(),
                })
                .collect(),
        )
    }

    fn field_types(&self) -> Vec<&ABIType> {
        self.fields.iter().map(|field| &field.field_type).collect()
    }

    pub(crate) fn encode(&self, value: &ABIValue) -> Result<Vec<u8>, ABIError> {
        let struct_values = match value {
            ABIValue::Struct(values) => values,
            _ => {
                return Err(ABIError::SchemaMismatch {
                    message: format!("Cannot encode non-struct value as struct '{}'", self.name),
                });
            }
        };

        if let Some((unknown, _)) = struct_values
            .iter()
            .find(|(name, _)| !self.fields.iter().any(|field| &field.name == name))
        {
            return Err(ABIError::SchemaMismatch {
                message: format!("Unknown field '{}' in struct '{}'", unknown, self.name),
            });
        }

        let mut ordered_values = Vec::with_capacity(self.fields.len());
        for field in &self.fields {
            let field_value = struct_values
                .iter()
                .find(|(name, _)| name == &field.name)
                .map(|(_, value)| value.clone())
                .ok_or_else(|| ABIError::SchemaMismatch {
                    message: format!("Missing field '{}' in struct '{}'", field.name, self.name),
                })?;
            ordered_values.push(field_value);
        }

        encode_abi_types(&self.field_types(), &ordered_values)
    }

    pub(crate) fn decode(&self, bytes: &[u8]) -> Result<ABIValue, ABIError> {
        let values = decode_abi_types(&self.field_types(), bytes)?;
        Ok(ABIValue::Struct(
            self.fields
                .iter()
                .map(|field| field.name.clone())
                .zip(values)
                .collect(),
        ))
    }
}

impl Display for ABIStruct {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.to_tuple_type())
    }
}
