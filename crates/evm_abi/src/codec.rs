//! Call data and return data encoding on top of the per-type codecs.
//!
//! The entry points here deal with whole parameter lists: the method signature, the
//! 4 byte selector prefix and the hex representation used by RPC transports.
use log::{debug, trace};

use crate::{
    ABIError, ABIType, ABIValue,
    constants::WORD_SIZE,
    selector::selector,
    types::collections::tuple::{decode_abi_types, encode_abi_types},
    utils,
};

/// Builds the canonical signature `name(type1,type2,...)` hashed into a selector.
///
/// Structs render as the tuple of their field types, so two structs with the same
/// layout produce the same signature regardless of their names.
pub fn build_signature<T: AsRef<ABIType>>(name: &str, param_types: &[T]) -> Result<String, ABIError> {
    if name.is_empty() {
        return Err(ABIError::ValidationError {
            message: "Method name cannot be empty".to_string(),
        });
    }
    if name.chars().any(|c| c.is_whitespace() || c == '(' || c == ')' || c == ',') {
        return Err(ABIError::ValidationError {
            message: format!("Invalid method name '{}'", name),
        });
    }

    let type_strings: Vec<String> = param_types.iter().map(|t| t.as_ref().to_string()).collect();
    Ok(format!("{}({})", name, type_strings.join(",")))
}

/// Encodes `values` as a parameter list, without a selector.
pub fn encode_params<T: AsRef<ABIType>>(param_types: &[T], values: &[ABIValue]) -> Result<Vec<u8>, ABIError> {
    encode_abi_types(param_types, values)
}

/// Encodes a full call: the selector of `name(param_types)` followed by the encoded parameters.
pub fn encode_call<T: AsRef<ABIType>>(
    name: &str,
    param_types: &[T],
    values: &[ABIValue],
) -> Result<Vec<u8>, ABIError> {
    let signature = build_signature(name, param_types)?;
    let method_selector = selector(&signature);
    let params = encode_params(param_types, values)?;

    debug!(
        "Encoded call {} (selector 0x{}) with {} parameter bytes",
        signature,
        hex::encode(method_selector),
        params.len()
    );

    let mut call_data = method_selector.to_vec();
    call_data.extend(params);
    Ok(call_data)
}

/// Same as [`encode_call`], rendered as a `0x` prefixed hex string.
pub fn encode_call_hex<T: AsRef<ABIType>>(
    name: &str,
    param_types: &[T],
    values: &[ABIValue],
) -> Result<String, ABIError> {
    Ok(utils::encode_hex(&encode_call(name, param_types, values)?))
}

/// Decodes a parameter list (no selector) against `param_types`.
pub fn decode_params<T: AsRef<ABIType>>(param_types: &[T], bytes: &[u8]) -> Result<Vec<ABIValue>, ABIError> {
    decode_abi_types(param_types, bytes)
}

/// Decodes the hex return data of a call against the declared output types.
///
/// The `0x` prefix is optional. Empty return data decodes to an empty list, which is
/// how a call to a function without outputs (or to an address without code) comes back.
pub fn decode_call_result<T: AsRef<ABIType>>(
    raw_hex: &str,
    output_types: &[T],
) -> Result<Vec<ABIValue>, ABIError> {
    let stripped = utils::strip_hex_prefix(raw_hex.trim());
    if stripped.is_empty() {
        debug!("Empty return data, decoding to an empty result");
        return Ok(Vec::new());
    }

    let bytes = utils::decode_hex(stripped)?;
    trace!(
        "Decoding {} bytes of return data against {} output types",
        bytes.len(),
        output_types.len()
    );

    if let [output_type] = output_types {
        let output_type = output_type.as_ref();
        if is_dynamic_struct(output_type) {
            debug!("Decoding single dynamic struct {} from its offset", output_type);
            return Ok(vec![decode_single_dynamic_struct(output_type, &bytes)?]);
        }
    }

    decode_params(output_types, &bytes)
}

fn is_dynamic_struct(abi_type: &ABIType) -> bool {
    matches!(abi_type, ABIType::Struct(_) | ABIType::Tuple(_)) && abi_type.is_dynamic()
}

fn decode_single_dynamic_struct(abi_type: &ABIType, bytes: &[u8]) -> Result<ABIValue, ABIError> {
    let offset = utils::read_usize_word(bytes, 0)?;
    if offset < WORD_SIZE {
        return Err(ABIError::MalformedInput {
            message: format!("Offset {} for {} points into the head", offset, abi_type),
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
    abi_type.decode(tail)
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use rstest::rstest;

    use super::*;
    use crate::{ABIStruct, StructField};

    fn word(n: u64) -> String {
        format!("{:064x}", n)
    }

    fn right_padded(hex_str: &str) -> String {
        format!("{:0<64}", hex_str)
    }

    fn types(type_strs: &[&str]) -> Vec<ABIType> {
        type_strs.iter().map(|t| ABIType::from_str(t).unwrap()).collect()
    }

    fn flagged_type() -> ABIType {
        ABIType::Struct(ABIStruct::new(
            "Flagged",
            vec![
                StructField::new("flag", ABIType::Bool),
                StructField::new("data", ABIType::Bytes),
            ],
        ))
    }

    fn flagged(flag: bool, data: &[u8]) -> ABIValue {
        ABIValue::from_fields([("flag", ABIValue::Bool(flag)), ("data", ABIValue::from(data))])
    }

    #[rstest]
    #[case("transfer", &["address", "uint256"], "transfer(address,uint256)")]
    #[case("protocolVersion", &[], "protocolVersion()")]
    #[case("f", &["uint", "uint32[]", "bytes10", "bytes"], "f(uint256,uint32[],bytes10,bytes)")]
    #[case("g", &["(uint8,(bool,string))[2]"], "g((uint8,(bool,string))[2])")]
    fn test_build_signature(#[case] name: &str, #[case] type_strs: &[&str], #[case] expected: &str) {
        assert_eq!(build_signature(name, &types(type_strs)).unwrap(), expected);
    }

    #[rstest]
    #[case("")]
    #[case("two words")]
    #[case("f(")]
    fn test_build_signature_invalid_name(#[case] name: &str) {
        let result = build_signature::<ABIType>(name, &[]);
        assert!(matches!(result, Err(ABIError::ValidationError { .. })));
    }

    #[test]
    fn test_struct_signature_is_structural() {
        let signature = build_signature("openOffer", &[flagged_type()]).unwrap();
        assert_eq!(signature, "openOffer((bool,bytes))");
    }

    #[test]
    fn test_encode_transfer_call() {
        let call = encode_call_hex(
            "transfer",
            &types(&["address", "uint256"]),
            &[
                ABIValue::from_address("0x5B38Da6a701c568545dCfcB03FcB875f56beddC4"),
                ABIValue::from(1_000_000u64),
            ],
        )
        .unwrap();
        let expected = format!(
            "0xa9059cbb{}{}",
            "0000000000000000000000005b38da6a701c568545dcfcb03fcb875f56beddc4",
            word(1_000_000)
        );
        assert_eq!(call, expected);
    }

    #[test]
    fn test_static_scalar_has_no_tail() {
        let encoded = encode_params(&types(&["uint256"]), &[ABIValue::from(42u8)]).unwrap();
        assert_eq!(hex::encode(encoded), word(42));
    }

    #[test]
    fn test_encode_call_with_mixed_dynamic_params() {
        let call = encode_call(
            "f",
            &types(&["uint256", "uint32[]", "bytes10", "bytes"]),
            &[
                ABIValue::from(0x123u32),
                ABIValue::Array(vec![ABIValue::from(0x456u32), ABIValue::from(0x789u32)]),
                ABIValue::from(b"1234567890".as_slice()),
                ABIValue::from(b"Hello, world!".as_slice()),
            ],
        )
        .unwrap();
        let expected = [
            "8be65246".to_string(),
            word(0x123),
            word(0x80),
            right_padded("31323334353637383930"),
            word(0xe0),
            word(2),
            word(0x456),
            word(0x789),
            word(0xd),
            right_padded("48656c6c6f2c20776f726c6421"),
        ]
        .concat();
        assert_eq!(hex::encode(call), expected);
    }

    #[test]
    fn test_encode_call_with_leading_dynamic_param() {
        let call = encode_call(
            "sam",
            &types(&["bytes", "bool", "uint256[]"]),
            &[
                ABIValue::from(b"dave".as_slice()),
                ABIValue::Bool(true),
                ABIValue::Array(vec![
                    ABIValue::from(1u8),
                    ABIValue::from(2u8),
                    ABIValue::from(3u8),
                ]),
            ],
        )
        .unwrap();
        let expected = [
            "a5643bf2".to_string(),
            word(0x60),
            word(1),
            word(0xa0),
            word(4),
            right_padded("64617665"),
            word(3),
            word(1),
            word(2),
            word(3),
        ]
        .concat();
        assert_eq!(hex::encode(call), expected);
    }

    #[test]
    fn test_top_level_dynamic_struct() {
        let encoded = encode_params(&[flagged_type()], &[flagged(true, &[0x12, 0x34])]).unwrap();
        let expected = [
            word(0x20),
            word(1),
            word(0x40),
            word(2),
            right_padded("1234"),
        ]
        .concat();
        assert_eq!(hex::encode(&encoded), expected);

        let decoded = decode_call_result(&utils::encode_hex(&encoded), &[flagged_type()]).unwrap();
        assert_eq!(decoded, vec![flagged(true, &[0x12, 0x34])]);
    }

    #[test]
    fn test_fixed_array_of_dynamic_structs_offsets_each_element() {
        let elements = vec![flagged(true, &[0x12, 0x34]), flagged(false, &[0xab, 0xcd])];
        let element_words = [
            word(1),
            word(0x40),
            word(2),
            right_padded("1234"),
            word(0),
            word(0x40),
            word(2),
            right_padded("abcd"),
        ]
        .concat();

        let fixed_type = ABIType::StaticArray(Box::new(flagged_type()), 2);
        let fixed = encode_params(&[fixed_type.clone()], &[ABIValue::Array(elements.clone())]).unwrap();
        let expected_fixed = [word(0x20), word(0x40), word(0xc0), element_words.clone()].concat();
        assert_eq!(hex::encode(&fixed), expected_fixed);

        let dynamic_type = ABIType::DynamicArray(Box::new(flagged_type()));
        let dynamic =
            encode_params(&[dynamic_type.clone()], &[ABIValue::Array(elements.clone())]).unwrap();
        let expected_dynamic = [word(0x20), word(2), word(0x40), word(0xc0), element_words].concat();
        assert_eq!(hex::encode(&dynamic), expected_dynamic);

        assert_eq!(
            decode_params(&[fixed_type], &fixed).unwrap(),
            vec![ABIValue::Array(elements.clone())]
        );
        assert_eq!(
            decode_params(&[dynamic_type], &dynamic).unwrap(),
            vec![ABIValue::Array(elements)]
        );
    }

    #[test]
    fn test_decode_single_dynamic_struct_with_nested_array() {
        let listing_type = ABIType::Struct(ABIStruct::new(
            "Listing",
            vec![
                StructField::new("isCreated", ABIType::Bool),
                StructField::new("price", ABIType::Bytes),
                StructField::new("methods", ABIType::from_str("bytes[]").unwrap()),
                StructField::new("version", ABIType::from_str("uint256").unwrap()),
            ],
        ));
        let value = ABIValue::from_fields([
            ("isCreated", ABIValue::Bool(true)),
            ("price", ABIValue::from(vec![0x01u8, 0x02, 0x03])),
            (
                "methods",
                ABIValue::Array(vec![
                    ABIValue::from(b"EUR-SEPA".as_slice()),
                    ABIValue::from(b"USD-SWIFT".as_slice()),
                ]),
            ),
            ("version", ABIValue::from(1u8)),
        ]);
        let encoded = encode_params(&[listing_type.clone()], &[value.clone()]).unwrap();

        let decoded = decode_call_result(&hex::encode(&encoded), &[listing_type]).unwrap();
        assert_eq!(decoded, vec![value]);
    }

    #[test]
    fn test_decode_multiple_outputs() {
        let output_types = types(&["address", "string", "uint8"]);
        let values = vec![
            ABIValue::from_address("0x00000000000000000000000000000000deadbeef"),
            ABIValue::from("USDC"),
            ABIValue::from(6u8),
        ];
        let encoded = utils::encode_hex(&encode_params(&output_types, &values).unwrap());
        assert_eq!(decode_call_result(&encoded, &output_types).unwrap(), values);
    }

    #[rstest]
    #[case("")]
    #[case("0x")]
    #[case("0X")]
    fn test_empty_return_data(#[case] raw_hex: &str) {
        let output_types = types(&["uint256", "bytes"]);
        assert_eq!(decode_call_result(raw_hex, &output_types).unwrap(), vec![]);
    }

    #[rstest]
    #[case("0x123")]
    #[case("0xzz")]
    fn test_invalid_hex(#[case] raw_hex: &str) {
        let result = decode_call_result(raw_hex, &types(&["uint8"]));
        assert!(matches!(result, Err(ABIError::MalformedInput { .. })));
    }

    #[test]
    fn test_truncated_return_data() {
        let result = decode_call_result(&format!("0x{}", word(1)), &types(&["uint256", "bool"]));
        assert!(matches!(result, Err(ABIError::MalformedInput { .. })));
    }

    #[test]
    fn test_single_struct_offset_into_head() {
        let result = decode_call_result(&format!("0x{}{}", word(0), word(1)), &[flagged_type()]);
        assert_eq!(
            result.unwrap_err().to_string(),
            "ABI decoding failed: Offset 0 for (bool,bytes) points into the head"
        );
    }

    #[test]
    fn test_value_count_mismatch() {
        let result = encode_call("transfer", &types(&["address", "uint256"]), &[ABIValue::from(1u8)]);
        assert!(matches!(result, Err(ABIError::SchemaMismatch { .. })));
    }
}
