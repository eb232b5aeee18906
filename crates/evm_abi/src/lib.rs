//! A library for encoding and decoding Ethereum contract ABI data: call data, return data and event logs.
pub mod abi_type;
pub mod abi_value;
pub mod codec;
pub mod constants;
pub mod contracts;
pub mod error;
pub mod event;
pub mod json_abi;
pub mod method;
pub mod selector;
pub mod types;
pub mod utils;

pub use abi_type::{ABIType, BitSize, ByteLength};
pub use abi_value::ABIValue;
pub use codec::{
    build_signature, decode_call_result, decode_params, encode_call, encode_call_hex,
    encode_params,
};
pub use error::ABIError;
pub use event::{ABIEvent, ABIEventParam};
pub use json_abi::{AbiEntry, JsonAbi, JsonParam};
pub use method::{ABIMethod, ABIMethodArg};
pub use selector::{event_topic, keccak256, selector};
pub use types::collections::r#struct::{ABIStruct, StructField};
