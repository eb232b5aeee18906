use sha3::{Digest, Keccak256};

use crate::constants::{HASH_BYTES_LENGTH, SELECTOR_BYTE_LENGTH};

/// Keccak-256 (the pre-standard SHA-3 variant Ethereum uses) of `data`.
pub fn keccak256(data: &[u8]) -> [u8; HASH_BYTES_LENGTH] {
    let mut hash = [0u8; HASH_BYTES_LENGTH];
    hash.copy_from_slice(&Keccak256::digest(data));
    hash
}

/// Returns the 4 byte method ID for a canonical function signature such as
/// `transfer(address,uint256)`.
pub fn selector(signature: &str) -> [u8; SELECTOR_BYTE_LENGTH] {
    let hash = keccak256(signature.as_bytes());
    let mut result = [0u8; SELECTOR_BYTE_LENGTH];
    result.copy_from_slice(&hash[..SELECTOR_BYTE_LENGTH]);
    result
}

/// Returns the full 32 byte hash used as `topics[0]` of a non-anonymous event log.
pub fn event_topic(signature: &str) -> [u8; HASH_BYTES_LENGTH] {
    keccak256(signature.as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_keccak_of_empty_input() {
        assert_eq!(
            hex::encode(keccak256(b"")),
            "c5d2460186f7233c927e7db2dcc703c0e500b653ca82273b7bfad8045d85a470"
        );
    }

    #[rstest]
    #[case("transfer(address,uint256)", "a9059cbb")]
    #[case("balanceOf(address)", "70a08231")]
    #[case("f(uint256,uint32[],bytes10,bytes)", "8be65246")]
    #[case("sam(bytes,bool,uint256[])", "a5643bf2")]
    #[case("getOffer(bytes16)", "7448b2c0")]
    fn test_selector(#[case] signature: &str, #[case] expected_hex: &str) {
        assert_eq!(hex::encode(selector(signature)), expected_hex);
    }

    #[test]
    fn test_event_topic() {
        assert_eq!(
            hex::encode(event_topic("Transfer(address,address,uint256)")),
            "ddf252ad1be2c89b69c2b068fc378daa952ba7f163c4a11628f55a4df523b3ef"
        );
    }
}
