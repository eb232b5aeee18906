use log::trace;

use crate::{
    ABIError, ABIType, ABIValue,
    constants::WORD_SIZE,
    utils::{padded_length, read_usize_word, usize_to_word},
};

impl ABIType {
    pub(crate) fn encode_tuple(&self, value: &ABIValue) -> Result<Vec<u8>, ABIError> {
        let child_types = match self {
            ABIType::Tuple(child_types) => child_types,
            _ => {
                return Err(ABIError::SchemaMismatch {
                    message: "ABI type mismatch, expected tuple".to_string(),
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

        encode_abi_types(child_types, values)
    }

    pub(crate) fn decode_tuple(&self, bytes: &[u8]) -> Result<ABIValue, ABIError> {
        let child_types = match self {
            ABIType::Tuple(child_types) => child_types,
            _ => {
                return Err(ABIError::SchemaMismatch {
                    message: "ABI type mismatch, expected tuple".to_string(),
                });
            }
        };

        Ok(ABIValue::Array(decode_abi_types(child_types, bytes)?))
    }

    /// Number of bytes the canonical encoding of `value` occupies.
    pub(crate) fn encoded_len(&self, value: &ABIValue) -> Result<usize, ABIError> {
        if !self.is_dynamic() {
            return self.static_size();
        }
        match (self, value) {
            (ABIType::Bytes, ABIValue::Bytes(bytes)) => Ok(WORD_SIZE.saturating_add(padded_length(bytes.len()))),
            (ABIType::String, ABIValue::String(string)) => {
                Ok(WORD_SIZE.saturating_add(padded_length(string.len())))
            }
            (ABIType::DynamicArray(child_type), ABIValue::Array(values)) => {
                let content = encoded_abi_types_len(std::iter::repeat(child_type.as_ref()).zip(values))?;
                Ok(WORD_SIZE.saturating_add(content))
            }
            (ABIType::StaticArray(child_type, _), ABIValue::Array(values)) => {
                encoded_abi_types_len(std::iter::repeat(child_type.as_ref()).zip(values))
            }
            (ABIType::Tuple(child_types), ABIValue::Array(values)) => {
                encoded_abi_types_len(child_types.iter().zip(values))
            }
            (ABIType::Struct(struct_type), ABIValue::Struct(fields)) => encoded_abi_types_len(
                struct_type
                    .fields
                    .iter()
                    .map(|field| &field.field_type)
                    .zip(fields.iter().map(|(_, value)| value)),
            ),
            _ => Err(ABIError::SchemaMismatch {
                message: format!("ABI value mismatch, {:?} is not a value of {}", value, self),
            }),
        }
    }
}

fn encoded_abi_types_len<'a, T, I>(pairs: I) -> Result<usize, ABIError>
where
    T: AsRef<ABIType>,
    I: IntoIterator<Item = (T, &'a ABIValue)>,
{
    pairs.into_iter().try_fold(0usize, |acc, (abi_type, value)| {
        let abi_type = abi_type.as_ref();
        let len = if abi_type.is_dynamic() {
            WORD_SIZE.saturating_add(abi_type.encoded_len(value)?)
        } else {
            abi_type.static_size()?
        };
        Ok(acc.saturating_add(len))
    })
}

/// Packs `values` into the head/tail layout described by `abi_types`.
///
/// Static values are written inline in the head. Each dynamic value gets a single head
/// word holding the byte offset, measured from the start of this encoding, of its
/// data in the tail.
pub fn encode_abi_types<T>(abi_types: &[T], values: &[ABIValue]) -> Result<Vec<u8>, ABIError>
where
    T: AsRef<ABIType>,
{
    if abi_types.len() != values.len() {
        return Err(ABIError::SchemaMismatch {
            message: format!(
                "Mismatch lengths between the values and types, expected {} values, got {}",
                abi_types.len(),
                values.len()
            ),
        });
    }

    // Head slots are counted in words, the tail cursor advances in bytes.
    let head_word_count = abi_types
        .iter()
        .fold(0usize, |acc, t| acc.saturating_add(t.as_ref().head_word_count()));
    let mut dynamic_offset = head_word_count.saturating_mul(WORD_SIZE);

    let mut heads: Vec<u8> = Vec::new();
    let mut tails: Vec<u8> = Vec::new();

    for (abi_type, value) in abi_types.iter().zip(values) {
        let abi_type = abi_type.as_ref();
        let encoded = abi_type.encode(value)?;

        if abi_type.is_dynamic() {
            heads.extend(usize_to_word(dynamic_offset));
            dynamic_offset += encoded.len();
            tails.extend(encoded);
        } else {
            heads.extend(encoded);
        }
    }

    trace!(
        "Encoded {} values into {} head words and {} tail bytes",
        values.len(),
        head_word_count,
        tails.len()
    );

    heads.extend(tails);
    Ok(heads)
}

/// Reads values described by `abi_types` from a head/tail encoding that starts at `bytes[0]`.
///
/// Dynamic values must lie in the tail, in head order and without overlapping each other,
/// so no byte of the input is decoded twice.
pub fn decode_abi_types<T>(abi_types: &[T], bytes: &[u8]) -> Result<Vec<ABIValue>, ABIError>
where
    T: AsRef<ABIType>,
{
    let mut values: Vec<ABIValue> = Vec::with_capacity(abi_types.len());
    let mut head_cursor: usize = 0;
    let mut tail_cursor = abi_types
        .iter()
        .fold(0usize, |acc, t| acc.saturating_add(t.as_ref().head_size()));

    for abi_type in abi_types {
        let abi_type = abi_type.as_ref();

        if abi_type.is_dynamic() {
            let offset = read_usize_word(bytes, head_cursor)?;
            if offset < tail_cursor {
                return Err(ABIError::MalformedInput {
                    message: format!(
                        "Offset {} for {} overlaps data before byte {}",
                        offset, abi_type, tail_cursor
                    ),
                });
            }
            let tail = bytes.get(offset..).ok_or_else(|| ABIError::MalformedInput {
                message: format!(
                    "Offset {} for {} points outside of data with length {}",
                    offset,
                    abi_type,
                    bytes.len()
                ),
            })?;
            let value = abi_type.decode(tail)?;
            tail_cursor = offset.saturating_add(abi_type.encoded_len(&value)?);
            values.push(value);
            head_cursor += WORD_SIZE;
        } else {
            let size = abi_type.static_size()?;
            let slice = head_cursor
                .checked_add(size)
                .and_then(|end| bytes.get(head_cursor..end))
                .ok_or_else(|| ABIError::MalformedInput {
                    message: format!(
                        "Index out of bounds: trying to access bytes[{}..{}] but slice has length {}",
                        head_cursor,
                        head_cursor.saturating_add(size),
                        bytes.len()
                    ),
                })?;
            values.push(abi_type.decode(slice)?);
            head_cursor += size;
        }
    }

    Ok(values)
}
