use crate::abi_type::ABIType;
use crate::abi_value::ABIValue;
use crate::codec;
use crate::constants::{HASH_BYTES_LENGTH, WORD_SIZE};
use crate::error::ABIError;
use crate::selector::event_topic;
use crate::utils;

/// A parameter of an event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ABIEventParam {
    pub name: Option<String>,
    pub param_type: ABIType,
    /// Indexed parameters are carried in the log topics instead of the data.
    pub indexed: bool,
}

impl ABIEventParam {
    pub fn new(name: Option<String>, param_type: ABIType, indexed: bool) -> Self {
        Self {
            name,
            param_type,
            indexed,
        }
    }
}

/// Represents a contract event as it appears in a transaction log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ABIEvent {
    pub name: String,
    pub inputs: Vec<ABIEventParam>,
    /// Anonymous events do not emit their signature hash as the first topic.
    pub anonymous: bool,
}

impl ABIEvent {
    pub fn new(name: String, inputs: Vec<ABIEventParam>, anonymous: bool) -> Self {
        Self {
            name,
            inputs,
            anonymous,
        }
    }

    /// Returns the canonical signature, e.g. `Transfer(address,address,uint256)`.
    pub fn signature(&self) -> Result<String, ABIError> {
        let input_types: Vec<&ABIType> = self.inputs.iter().map(|p| &p.param_type).collect();
        codec::build_signature(&self.name, &input_types)
    }

    /// The keccak-256 hash of the signature, emitted as `topics[0]` for non-anonymous events.
    pub fn topic(&self) -> Result<[u8; HASH_BYTES_LENGTH], ABIError> {
        Ok(event_topic(&self.signature()?))
    }

    fn data_types(&self) -> Vec<&ABIType> {
        self.inputs
            .iter()
            .filter(|p| !p.indexed)
            .map(|p| &p.param_type)
            .collect()
    }

    /// Decodes the non-indexed parameters from the hex log data.
    pub fn decode_data(&self, raw_hex: &str) -> Result<Vec<ABIValue>, ABIError> {
        let data_types = self.data_types();
        let bytes = utils::decode_hex(raw_hex.trim())?;
        if bytes.is_empty() && data_types.is_empty() {
            return Ok(Vec::new());
        }
        codec::decode_params(&data_types, &bytes)
    }

    /// Decodes a full log into the values of all parameters, in declaration order.
    ///
    /// Indexed parameters of reference types (strings, bytes, arrays, tuples and structs,
    /// static ones included) are only available as the keccak-256 hash of their encoding,
    /// which is returned as [`ABIValue::Bytes`].
    pub fn decode_log<S: AsRef<str>>(&self, topics: &[S], data_hex: &str) -> Result<Vec<ABIValue>, ABIError> {
        let topics = topics
            .iter()
            .map(|topic| decode_topic(topic.as_ref()))
            .collect::<Result<Vec<_>, ABIError>>()?;

        let indexed_topics = if self.anonymous {
            topics.as_slice()
        } else {
            let expected = self.topic()?;
            match topics.split_first() {
                Some((first, rest)) if *first == expected => rest,
                Some((first, _)) => {
                    return Err(ABIError::SchemaMismatch {
                        message: format!(
                            "Log topic 0x{} does not match event {}",
                            hex::encode(first),
                            self.signature()?
                        ),
                    });
                }
                None => {
                    return Err(ABIError::MalformedInput {
                        message: format!("Log for event {} has no topics", self.name),
                    });
                }
            }
        };

        let indexed_count = self.inputs.iter().filter(|p| p.indexed).count();
        if indexed_topics.len() != indexed_count {
            return Err(ABIError::SchemaMismatch {
                message: format!(
                    "Event {} has {} indexed parameters, but the log carries {} topics for them",
                    self.name,
                    indexed_count,
                    indexed_topics.len()
                ),
            });
        }

        let mut data_values = self.decode_data(data_hex)?.into_iter();
        let mut topic_values = indexed_topics.iter();
        let mut values = Vec::with_capacity(self.inputs.len());

        for param in &self.inputs {
            let value = if param.indexed {
                let topic = topic_values.next().ok_or_else(|| ABIError::MalformedInput {
                    message: format!("Missing topic for indexed parameter of {}", self.name),
                })?;
                match param.param_type {
                    ABIType::Uint(_)
                    | ABIType::Int(_)
                    | ABIType::Address
                    | ABIType::Bool
                    | ABIType::FixedBytes(_) => param.param_type.decode(topic)?,
                    ABIType::Bytes
                    | ABIType::String
                    | ABIType::StaticArray(..)
                    | ABIType::DynamicArray(_)
                    | ABIType::Tuple(_)
                    | ABIType::Struct(_) => ABIValue::Bytes(topic.to_vec()),
                }
            } else {
                data_values.next().ok_or_else(|| ABIError::MalformedInput {
                    message: format!("Missing data value for event {}", self.name),
                })?
            };
            values.push(value);
        }

        Ok(values)
    }
}

fn decode_topic(topic_hex: &str) -> Result<[u8; WORD_SIZE], ABIError> {
    let bytes = utils::decode_hex(topic_hex)?;
    <[u8; WORD_SIZE]>::try_from(bytes.as_slice()).map_err(|_| ABIError::MalformedInput {
        message: format!("Log topic must be {} bytes, got {}", WORD_SIZE, bytes.len()),
    })
}
