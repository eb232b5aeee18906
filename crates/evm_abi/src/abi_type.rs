use crate::{
    ABIError, ABIValue,
    constants::{
        BITS_PER_BYTE, FIXED_BYTES_REGEX, FIXED_POINT_REGEX, MAX_BIT_SIZE,
        MAX_FIXED_BYTES_LENGTH, STATIC_ARRAY_REGEX, WORD_SIZE,
    },
    types::collections::r#struct::ABIStruct,
};
use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

/// Represents a validated bit size for ABI `uintN` and `intN` types (8-256, multiple of 8).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitSize(u16);

impl BitSize {
    /// Creates a new [`BitSize`] with validation.
    ///
    /// # Arguments
    /// * `bits` - The bit size, must be 8-256 and divisible by 8.
    ///
    /// # Returns
    /// A new [`BitSize`] if valid, or an [`ABIError`] if invalid.
    pub fn new(bits: u16) -> Result<Self, ABIError> {
        if !(BITS_PER_BYTE..=MAX_BIT_SIZE).contains(&bits) || bits % BITS_PER_BYTE != 0 {
            return Err(ABIError::ValidationError {
                message: format!(
                    "Bit size must be between {} and {} and divisible by {}, got {}",
                    BITS_PER_BYTE, MAX_BIT_SIZE, BITS_PER_BYTE, bits
                ),
            });
        }
        Ok(BitSize(bits))
    }

    /// For sizes known to be valid; an invalid size fails const evaluation.
    pub(crate) const fn from_const(bits: u16) -> Self {
        assert!(bits >= BITS_PER_BYTE && bits <= MAX_BIT_SIZE && bits % BITS_PER_BYTE == 0);
        BitSize(bits)
    }

    /// Returns the bit size value.
    pub fn value(&self) -> u16 {
        self.0
    }
}

/// Represents a validated length for `bytesN` types (1-32).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteLength(usize);

impl ByteLength {
    /// Creates a new [`ByteLength`], rejecting lengths outside 1-32.
    pub fn new(length: usize) -> Result<Self, ABIError> {
        if !(1..=MAX_FIXED_BYTES_LENGTH).contains(&length) {
            return Err(ABIError::ValidationError {
                message: format!(
                    "Fixed bytes length must be between 1 and {}, got {}",
                    MAX_FIXED_BYTES_LENGTH, length
                ),
            });
        }
        Ok(ByteLength(length))
    }

    pub(crate) const fn from_const(length: usize) -> Self {
        assert!(length >= 1 && length <= MAX_FIXED_BYTES_LENGTH);
        ByteLength(length)
    }

    /// Returns the length in bytes.
    pub fn value(&self) -> usize {
        self.0
    }
}

/// Represents an Ethereum contract ABI type, used to drive encoding and decoding of [`ABIValue`]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ABIType {
    /// An unsigned integer of a specific bit size.
    Uint(BitSize),
    /// A two's complement signed integer of a specific bit size.
    Int(BitSize),
    /// A 20 byte account or contract address.
    Address,
    /// A boolean value.
    Bool,
    /// A fixed-length byte string (`bytes1` to `bytes32`).
    FixedBytes(ByteLength),
    /// A dynamic-length byte string.
    Bytes,
    /// A dynamic-length UTF-8 string.
    String,
    /// A static-length array of another ABI type.
    StaticArray(Box<ABIType>, usize),
    /// A dynamic-length array of another ABI type.
    DynamicArray(Box<ABIType>),
    /// An anonymous tuple of other ABI types.
    Tuple(Vec<ABIType>),
    /// A named struct, encoded exactly like the tuple of its field types.
    Struct(ABIStruct),
}

impl AsRef<ABIType> for ABIType {
    fn as_ref(&self) -> &ABIType {
        self
    }
}

impl ABIType {
    /// Encodes an [`ABIValue`] according to this ABI type specification.
    ///
    /// Static types produce their inline head bytes; dynamic types produce the bytes
    /// that belong in the tail region of an enclosing tuple.
    ///
    /// # Arguments
    /// * `value` - The value to encode, must match this type.
    ///
    /// # Returns
    /// The encoded bytes if successful, or an [`ABIError`] if encoding fails.
    pub fn encode(&self, value: &ABIValue) -> Result<Vec<u8>, ABIError> {
        match self {
            ABIType::Uint(_) => self.encode_uint(value),
            ABIType::Int(_) => self.encode_int(value),
            ABIType::Address => self.encode_address(value),
            ABIType::Bool => self.encode_bool(value),
            ABIType::FixedBytes(_) => self.encode_fixed_bytes(value),
            ABIType::Bytes => self.encode_bytes(value),
            ABIType::String => self.encode_string(value),
            ABIType::StaticArray(_, _) => self.encode_static_array(value),
            ABIType::DynamicArray(_) => self.encode_dynamic_array(value),
            ABIType::Tuple(_) => self.encode_tuple(value),
            ABIType::Struct(struct_type) => struct_type.encode(value),
        }
    }

    /// Decodes bytes according to this ABI type specification.
    ///
    /// For static types `bytes` must be exactly [`ABIType::static_size`] long. For dynamic
    /// types `bytes` starts where the value's encoding starts and may extend past it.
    ///
    /// # Arguments
    /// * `bytes` - The encoded bytes to decode.
    ///
    /// # Returns
    /// The decoded [`ABIValue`] if successful, or an [`ABIError`] if decoding fails.
    pub fn decode(&self, bytes: &[u8]) -> Result<ABIValue, ABIError> {
        match self {
            ABIType::Uint(_) => self.decode_uint(bytes),
            ABIType::Int(_) => self.decode_int(bytes),
            ABIType::Address => self.decode_address(bytes),
            ABIType::Bool => self.decode_bool(bytes),
            ABIType::FixedBytes(_) => self.decode_fixed_bytes(bytes),
            ABIType::Bytes => self.decode_bytes(bytes),
            ABIType::String => self.decode_string(bytes),
            ABIType::StaticArray(_, _) => self.decode_static_array(bytes),
            ABIType::DynamicArray(_) => self.decode_dynamic_array(bytes),
            ABIType::Tuple(_) => self.decode_tuple(bytes),
            ABIType::Struct(struct_type) => struct_type.decode(bytes),
        }
    }

    /// Whether the encoded size of this type depends on the value.
    ///
    /// A static array is dynamic iff its element type is; tuples and structs are
    /// dynamic iff any field is.
    pub fn is_dynamic(&self) -> bool {
        match self {
            ABIType::Bytes | ABIType::String | ABIType::DynamicArray(_) => true,
            ABIType::StaticArray(child_type, _) => child_type.is_dynamic(),
            ABIType::Tuple(child_types) => child_types.iter().any(|t| t.is_dynamic()),
            ABIType::Struct(struct_type) => struct_type.is_dynamic(),
            ABIType::Uint(_)
            | ABIType::Int(_)
            | ABIType::Address
            | ABIType::Bool
            | ABIType::FixedBytes(_) => false,
        }
    }

    /// Number of head words this type occupies inside an enclosing tuple.
    ///
    /// Dynamic types take a single offset word. Static arrays and static structs are
    /// inlined, so their element and field words are counted recursively.
    pub fn head_word_count(&self) -> usize {
        if self.is_dynamic() {
            return 1;
        }
        match self {
            ABIType::StaticArray(child_type, size) => child_type.head_word_count().saturating_mul(*size),
            ABIType::Tuple(child_types) => child_types
                .iter()
                .fold(0, |acc: usize, t| acc.saturating_add(t.head_word_count())),
            ABIType::Struct(struct_type) => struct_type
                .fields
                .iter()
                .fold(0, |acc: usize, f| acc.saturating_add(f.field_type.head_word_count())),
            _ => 1,
        }
    }

    /// Number of head bytes this type occupies inside an enclosing tuple.
    pub fn head_size(&self) -> usize {
        self.head_word_count().saturating_mul(WORD_SIZE)
    }

    /// The exact encoded size of a static type, in bytes.
    pub fn static_size(&self) -> Result<usize, ABIError> {
        if self.is_dynamic() {
            return Err(ABIError::ValidationError {
                message: format!("Failed to get size, {} is a dynamic type", self),
            });
        }
        Ok(self.head_size())
    }
}

impl Display for ABIType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ABIType::Uint(bit_size) => write!(f, "uint{}", bit_size.value()),
            ABIType::Int(bit_size) => write!(f, "int{}", bit_size.value()),
            ABIType::Address => write!(f, "address"),
            ABIType::Bool => write!(f, "bool"),
            ABIType::FixedBytes(length) => write!(f, "bytes{}", length.value()),
            ABIType::Bytes => write!(f, "bytes"),
            ABIType::String => write!(f, "string"),
            ABIType::StaticArray(child_type, length) => write!(f, "{}[{}]", child_type, length),
            ABIType::DynamicArray(child_type) => write!(f, "{}[]", child_type),
            ABIType::Tuple(child_types) => {
                let type_strings: Vec<String> = child_types.iter().map(|t| t.to_string()).collect();
                write!(f, "({})", type_strings.join(","))
            }
            ABIType::Struct(struct_type) => write!(f, "{}", struct_type),
        }
    }
}

impl FromStr for ABIType {
    type Err = ABIError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // Dynamic array
        if let Some(element_type_str) = s.strip_suffix("[]") {
            let element_type = ABIType::from_str(element_type_str)?;
            return Ok(ABIType::DynamicArray(Box::new(element_type)));
        }

        // Static array
        if s.ends_with(']') {
            let regex = &*STATIC_ARRAY_REGEX;
            if let Some(captures) = regex.captures(s) {
                let element_type_str = &captures[1];
                let length_str = &captures[2];

                let length = length_str.parse::<usize>().map_err(|_| ABIError::ValidationError {
                    message: format!("Invalid array length: {}", length_str),
                })?;

                let element_type = ABIType::from_str(element_type_str)?;
                return Ok(ABIType::StaticArray(Box::new(element_type), length));
            } else {
                return Err(ABIError::ValidationError {
                    message: format!("Malformed static array string: {}", s),
                });
            }
        }

        // Tuple type
        if s.len() >= 2 && s.starts_with('(') && s.ends_with(')') {
            let tuple_type_strings: Vec<_> = parse_tuple_content(&s[1..s.len() - 1])?;
            let child_types: Result<Vec<_>, _> = tuple_type_strings
                .iter()
                .map(|str| ABIType::from_str(str))
                .collect();

            return Ok(ABIType::Tuple(child_types?));
        }

        // Integer types, `uint` and `int` alias the 256 bit variants
        for (prefix, signed) in [("uint", false), ("int", true)] {
            if let Some(size_str) = s.strip_prefix(prefix) {
                let bit_size = if size_str.is_empty() {
                    BitSize::new(MAX_BIT_SIZE)?
                } else if size_str.chars().all(|c| c.is_ascii_digit()) {
                    let size = size_str.parse::<u16>().map_err(|_| ABIError::ValidationError {
                        message: format!("Invalid {} size: {}", prefix, size_str),
                    })?;
                    BitSize::new(size)?
                } else {
                    return Err(ABIError::ValidationError {
                        message: format!("Malformed {} string: {}", prefix, s),
                    });
                };
                return Ok(if signed {
                    ABIType::Int(bit_size)
                } else {
                    ABIType::Uint(bit_size)
                });
            }
        }

        // Fixed bytes
        if let Some(captures) = FIXED_BYTES_REGEX.captures(s) {
            let length_str = &captures[1];
            let length = length_str.parse::<usize>().map_err(|_| ABIError::ValidationError {
                message: format!("Invalid bytes length: {}", length_str),
            })?;
            return Ok(ABIType::FixedBytes(ByteLength::new(length)?));
        }

        if FIXED_POINT_REGEX.is_match(s) {
            return Err(ABIError::UnsupportedType {
                message: format!("Fixed point type '{}' is not supported", s),
            });
        }

        // Simple types
        match s {
            "bool" => Ok(ABIType::Bool),
            "address" => Ok(ABIType::Address),
            "bytes" => Ok(ABIType::Bytes),
            "string" => Ok(ABIType::String),
            "function" => Err(ABIError::UnsupportedType {
                message: "Function pointer type is not supported".to_string(),
            }),
            _ => Err(ABIError::ValidationError {
                message: format!("Cannot convert string '{}' to an ABI type", s),
            }),
        }
    }
}

pub(crate) fn parse_tuple_content(content: &str) -> Result<Vec<String>, ABIError> {
    if content.is_empty() {
        return Ok(Vec::new());
    }

    if content.starts_with(',') {
        return Err(ABIError::ValidationError {
            message: "Tuple string should not start with comma".to_string(),
        });
    }
    if content.ends_with(',') {
        return Err(ABIError::ValidationError {
            message: "Tuple string should not end with comma".to_string(),
        });
    }
    if content.contains(",,") {
        return Err(ABIError::ValidationError {
            message: "Tuple string should not have consecutive commas".to_string(),
        });
    }

    let mut tuple_strings: Vec<String> = Vec::new();
    let mut depth: i32 = 0;
    let mut word: String = String::new();

    for ch in content.chars() {
        word.push(ch);
        match ch {
            '(' => depth += 1,
            ')' => depth -= 1,
            ',' if depth == 0 => {
                word.pop();
                tuple_strings.push(word);
                word = String::new();
            }
            _ => {}
        }
        if depth < 0 {
            break;
        }
    }
    if !word.is_empty() {
        tuple_strings.push(word);
    }
    if depth != 0 {
        return Err(ABIError::ValidationError {
            message: "Tuple string has mismatched parentheses".to_string(),
        });
    }

    Ok(tuple_strings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::collections::r#struct::StructField;
    use num_bigint::{BigInt, BigUint};
    use rstest::rstest;

    fn uint(bits: u16) -> ABIType {
        ABIType::Uint(BitSize::new(bits).unwrap())
    }

    fn bool_bytes_struct() -> ABIType {
        ABIType::Struct(ABIStruct::new(
            "Flagged",
            vec![
                StructField::new("flag", ABIType::Bool),
                StructField::new("data", ABIType::Bytes),
            ],
        ))
    }

    #[rstest]
    #[case(uint(256), false)]
    #[case(ABIType::Int(BitSize::new(8).unwrap()), false)]
    #[case(ABIType::Bool, false)]
    #[case(ABIType::Address, false)]
    #[case(ABIType::FixedBytes(ByteLength::new(16).unwrap()), false)]
    #[case(ABIType::Bytes, true)]
    #[case(ABIType::String, true)]
    #[case(ABIType::DynamicArray(Box::new(uint(8))), true)]
    #[case(ABIType::StaticArray(Box::new(uint(8)), 3), false)]
    #[case(ABIType::StaticArray(Box::new(ABIType::String), 3), true)]
    #[case(ABIType::Tuple(vec![uint(8), ABIType::Bool]), false)]
    #[case(ABIType::Tuple(vec![uint(8), ABIType::Tuple(vec![ABIType::Bytes])]), true)]
    #[case(bool_bytes_struct(), true)]
    #[case(ABIType::StaticArray(Box::new(bool_bytes_struct()), 2), true)]
    fn test_is_dynamic(#[case] abi_type: ABIType, #[case] expected: bool) {
        assert_eq!(abi_type.is_dynamic(), expected);
    }

    #[rstest]
    #[case("uint256", 1)]
    #[case("bytes", 1)]
    #[case("uint8[3]", 3)]
    #[case("(uint8,address)[2]", 4)]
    #[case("((uint8,bool),address)[2]", 6)]
    #[case("(bool,bytes)[2]", 1)]
    #[case("string[2]", 1)]
    #[case("uint256[2][3]", 6)]
    #[case("(uint256,uint256[2])", 3)]
    fn test_head_word_count(#[case] type_str: &str, #[case] expected: usize) {
        let abi_type = ABIType::from_str(type_str).unwrap();
        assert_eq!(abi_type.head_word_count(), expected);
    }

    #[test]
    fn test_static_size_of_dynamic_type() {
        assert_eq!(
            ABIType::String.static_size().unwrap_err().to_string(),
            "ABI validation failed: Failed to get size, string is a dynamic type"
        );
    }

    #[rstest]
    #[case("uint8")]
    #[case("uint256")]
    #[case("int24")]
    #[case("address")]
    #[case("bool")]
    #[case("bytes1")]
    #[case("bytes32")]
    #[case("bytes")]
    #[case("string")]
    #[case("uint32[]")]
    #[case("bytes[]")]
    #[case("uint256[2][]")]
    #[case("uint256[][3]")]
    #[case("()")]
    #[case("(bool,bytes)")]
    #[case("(uint8,(address,string[]),bytes16)[4]")]
    fn test_type_string_round_trip(#[case] type_str: &str) {
        let abi_type = ABIType::from_str(type_str).unwrap();
        assert_eq!(abi_type.to_string(), type_str);
    }

    #[rstest]
    #[case("uint", "uint256")]
    #[case("int", "int256")]
    #[case("uint[]", "uint256[]")]
    #[case("(int,uint)", "(int256,uint256)")]
    fn test_type_string_aliases(#[case] input: &str, #[case] canonical: &str) {
        assert_eq!(ABIType::from_str(input).unwrap().to_string(), canonical);
    }

    #[rstest]
    #[case("uint7")]
    #[case("uint264")]
    #[case("int0")]
    #[case("uintx")]
    #[case("bytes0")]
    #[case("bytes33")]
    #[case("uint8[01]")]
    #[case("(uint8,,bool)")]
    #[case("(uint8,bool")]
    #[case("unknown")]
    fn test_invalid_type_strings(#[case] input: &str) {
        assert!(matches!(
            ABIType::from_str(input),
            Err(ABIError::ValidationError { .. })
        ));
    }

    #[rstest]
    #[case("fixed128x18")]
    #[case("ufixed")]
    #[case("function")]
    fn test_unsupported_type_strings(#[case] input: &str) {
        assert!(matches!(
            ABIType::from_str(input),
            Err(ABIError::UnsupportedType { .. })
        ));
    }

    #[rstest]
    #[case(
        uint(256),
        ABIValue::Uint(BigUint::from(42u8)),
        "000000000000000000000000000000000000000000000000000000000000002a"
    )]
    #[case(
        uint(8),
        ABIValue::Uint(BigUint::from(255u8)),
        "00000000000000000000000000000000000000000000000000000000000000ff"
    )]
    #[case(
        ABIType::Int(BitSize::new(8).unwrap()),
        ABIValue::Int(BigInt::from(-1)),
        "ffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffff"
    )]
    #[case(
        ABIType::Int(BitSize::new(256).unwrap()),
        ABIValue::Int(BigInt::from(-2)),
        "fffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffffe"
    )]
    #[case(
        ABIType::Int(BitSize::new(16).unwrap()),
        ABIValue::Int(BigInt::from(300)),
        "000000000000000000000000000000000000000000000000000000000000012c"
    )]
    #[case(
        ABIType::Bool,
        ABIValue::Bool(true),
        "0000000000000000000000000000000000000000000000000000000000000001"
    )]
    #[case(
        ABIType::Address,
        ABIValue::Address("0x5b38da6a701c568545dcfcb03fcb875f56beddc4".to_string()),
        "0000000000000000000000005b38da6a701c568545dcfcb03fcb875f56beddc4"
    )]
    #[case(
        ABIType::FixedBytes(ByteLength::new(2).unwrap()),
        ABIValue::Bytes(vec![0x12, 0x34]),
        "1234000000000000000000000000000000000000000000000000000000000000"
    )]
    #[case(
        ABIType::Bytes,
        ABIValue::Bytes(vec![0x12, 0x34]),
        concat!(
            "0000000000000000000000000000000000000000000000000000000000000002",
            "1234000000000000000000000000000000000000000000000000000000000000"
        )
    )]
    #[case(
        ABIType::Bytes,
        ABIValue::Bytes(vec![]),
        "0000000000000000000000000000000000000000000000000000000000000000"
    )]
    #[case(
        ABIType::String,
        ABIValue::String("dave".to_string()),
        concat!(
            "0000000000000000000000000000000000000000000000000000000000000004",
            "6461766500000000000000000000000000000000000000000000000000000000"
        )
    )]
    #[case(
        ABIType::from_str("uint32[]").unwrap(),
        ABIValue::Array(vec![ABIValue::from(0x456u32), ABIValue::from(0x789u32)]),
        concat!(
            "0000000000000000000000000000000000000000000000000000000000000002",
            "0000000000000000000000000000000000000000000000000000000000000456",
            "0000000000000000000000000000000000000000000000000000000000000789"
        )
    )]
    #[case(
        ABIType::from_str("uint256[2]").unwrap(),
        ABIValue::Array(vec![ABIValue::from(1u8), ABIValue::from(2u8)]),
        concat!(
            "0000000000000000000000000000000000000000000000000000000000000001",
            "0000000000000000000000000000000000000000000000000000000000000002"
        )
    )]
    #[case(
        ABIType::from_str("string[2]").unwrap(),
        ABIValue::Array(vec![ABIValue::from("a"), ABIValue::from("b")]),
        concat!(
            "0000000000000000000000000000000000000000000000000000000000000040",
            "0000000000000000000000000000000000000000000000000000000000000080",
            "0000000000000000000000000000000000000000000000000000000000000001",
            "6100000000000000000000000000000000000000000000000000000000000000",
            "0000000000000000000000000000000000000000000000000000000000000001",
            "6200000000000000000000000000000000000000000000000000000000000000"
        )
    )]
    #[case(
        ABIType::from_str("(bool,bytes)").unwrap(),
        ABIValue::Array(vec![ABIValue::Bool(true), ABIValue::Bytes(vec![0x12, 0x34])]),
        concat!(
            "0000000000000000000000000000000000000000000000000000000000000001",
            "0000000000000000000000000000000000000000000000000000000000000040",
            "0000000000000000000000000000000000000000000000000000000000000002",
            "1234000000000000000000000000000000000000000000000000000000000000"
        )
    )]
    #[case(
        ABIType::from_str("()").unwrap(),
        ABIValue::Array(vec![]),
        ""
    )]
    fn should_round_trip(
        #[case] abi_type: ABIType,
        #[case] abi_value: ABIValue,
        #[case] expected_encoded_hex: &str,
    ) {
        let encoded = abi_type.encode(&abi_value).expect("Failed to encode");
        assert_eq!(hex::encode(&encoded), expected_encoded_hex);
        let decoded = abi_type.decode(&encoded).expect("Failed to decode");
        assert_eq!(decoded, abi_value);
    }
}
