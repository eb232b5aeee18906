use regex::Regex;
use std::sync::LazyLock;

/// Every head slot, length prefix and padded scalar is one ABI word.
pub const WORD_SIZE: usize = 32;
pub const SELECTOR_BYTE_LENGTH: usize = 4;
pub const HASH_BYTES_LENGTH: usize = 32;
pub const ADDRESS_BYTE_LENGTH: usize = 20;
pub const ADDRESS_HEX_LENGTH: usize = ADDRESS_BYTE_LENGTH * 2;

// Bit manipulation
pub const BITS_PER_BYTE: u16 = 8;

// ABI type parsing constants
pub const MAX_BIT_SIZE: u16 = 256;
pub const MAX_FIXED_BYTES_LENGTH: usize = 32;

pub const HEX_PREFIX: &str = "0x";

// Regex patterns for ABI type parsing
pub static STATIC_ARRAY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(.+)\[(0|[1-9][\d]*)]$").expect("Invalid static array regex")
});

pub static FIXED_BYTES_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^bytes([1-9][\d]*)$").expect("Invalid fixed bytes regex"));

pub static FIXED_POINT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^u?fixed(([1-9][\d]*)x([1-9][\d]*))?$").expect("Invalid fixed point regex")
});
