use num_bigint::{BigInt, BigUint};

/// Represents a value that can be encoded or decoded as an ABI type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ABIValue {
    /// A boolean value.
    Bool(bool),
    /// An unsigned integer value.
    Uint(BigUint),
    /// A signed integer value.
    Int(BigInt),
    /// A `0x`-prefixed, 20 byte hex address.
    Address(String),
    /// A byte string, used for both `bytesN` and `bytes`.
    Bytes(Vec<u8>),
    /// A UTF-8 string value.
    String(String),
    /// The elements of an array or a tuple.
    Array(Vec<ABIValue>),
    /// The fields of a named struct, in declaration order.
    Struct(Vec<(String, ABIValue)>),
}

impl From<bool> for ABIValue {
    fn from(value: bool) -> Self {
        ABIValue::Bool(value)
    }
}

impl From<BigUint> for ABIValue {
    fn from(value: BigUint) -> Self {
        ABIValue::Uint(value)
    }
}

impl From<BigInt> for ABIValue {
    fn from(value: BigInt) -> Self {
        ABIValue::Int(value)
    }
}

macro_rules! impl_from_unsigned {
    ($($t:ty),*) => {
        $(
            impl From<$t> for ABIValue {
                fn from(value: $t) -> Self {
                    ABIValue::Uint(BigUint::from(value))
                }
            }
        )*
    };
}

macro_rules! impl_from_signed {
    ($($t:ty),*) => {
        $(
            impl From<$t> for ABIValue {
                fn from(value: $t) -> Self {
                    ABIValue::Int(BigInt::from(value))
                }
            }
        )*
    };
}

impl_from_unsigned!(u8, u16, u32, u64, u128, usize);
impl_from_signed!(i8, i16, i32, i64, i128);

impl From<String> for ABIValue {
    fn from(value: String) -> Self {
        ABIValue::String(value)
    }
}

impl From<&str> for ABIValue {
    fn from(value: &str) -> Self {
        ABIValue::String(value.to_string())
    }
}

impl From<Vec<u8>> for ABIValue {
    fn from(value: Vec<u8>) -> Self {
        ABIValue::Bytes(value)
    }
}

impl From<&[u8]> for ABIValue {
    fn from(value: &[u8]) -> Self {
        ABIValue::Bytes(value.to_vec())
    }
}

impl From<Vec<ABIValue>> for ABIValue {
    fn from(value: Vec<ABIValue>) -> Self {
        ABIValue::Array(value)
    }
}

impl ABIValue {
    /// Create an ABIValue::Address from a hex string
    pub fn from_address<S: Into<String>>(value: S) -> Self {
        ABIValue::Address(value.into())
    }

    /// Create an ABIValue::Struct from ordered `(field name, value)` pairs
    pub fn from_fields<S, I>(fields: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = (S, ABIValue)>,
    {
        ABIValue::Struct(
            fields
                .into_iter()
                .map(|(name, value)| (name.into(), value))
                .collect(),
        )
    }

    /// Looks up a struct field by name.
    pub fn field(&self, name: &str) -> Option<&ABIValue> {
        match self {
            ABIValue::Struct(fields) => fields
                .iter()
                .find(|(field_name, _)| field_name == name)
                .map(|(_, value)| value),
            _ => None,
        }
    }
}
