//! Schemas for the CommutoSwap contract.
//!
//! Offers and swaps cross the contract boundary as structs with dynamic fields, so
//! `getOffer`/`getSwap` results come back through the single dynamic struct path of
//! [`crate::codec::decode_call_result`], and `openOffer`/`takeOffer` signatures are
//! rendered from the struct schemas themselves.
use num_bigint::BigUint;

use crate::{
    ABIError, ABIType, ABIValue,
    abi_type::{BitSize, ByteLength},
    event::{ABIEvent, ABIEventParam},
    method::{ABIMethod, ABIMethodArg},
    types::collections::r#struct::{ABIStruct, StructField},
};

/// Offer and swap IDs are UUIDs packed into a `bytes16`.
pub const ID_BYTE_LENGTH: usize = 16;

const UINT8: BitSize = BitSize::from_const(8);
const UINT256: BitSize = BitSize::from_const(256);
const ID_LENGTH: ByteLength = ByteLength::from_const(ID_BYTE_LENGTH);

fn uint8() -> ABIType {
    ABIType::Uint(UINT8)
}

fn uint256() -> ABIType {
    ABIType::Uint(UINT256)
}

fn bytes16() -> ABIType {
    ABIType::FixedBytes(ID_LENGTH)
}

/// The `Offer` struct: `(bool,bool,address,bytes,address,uint256,uint256,uint256,uint8,bytes,bytes[],uint256)`.
pub fn offer_type() -> ABIType {
    ABIType::Struct(ABIStruct::new(
        "Offer",
        vec![
            StructField::new("isCreated", ABIType::Bool),
            StructField::new("isTaken", ABIType::Bool),
            StructField::new("maker", ABIType::Address),
            StructField::new("interfaceId", ABIType::Bytes),
            StructField::new("stablecoin", ABIType::Address),
            StructField::new("amountLowerBound", uint256()),
            StructField::new("amountUpperBound", uint256()),
            StructField::new("securityDepositAmount", uint256()),
            StructField::new("direction", uint8()),
            StructField::new("price", ABIType::Bytes),
            StructField::new(
                "settlementMethods",
                ABIType::DynamicArray(Box::new(ABIType::Bytes)),
            ),
            StructField::new("protocolVersion", uint256()),
        ],
    ))
}

/// The `Swap` struct.
pub fn swap_type() -> ABIType {
    ABIType::Struct(ABIStruct::new(
        "Swap",
        vec![
            StructField::new("isCreated", ABIType::Bool),
            StructField::new("requiresFill", ABIType::Bool),
            StructField::new("maker", ABIType::Address),
            StructField::new("makerInterfaceId", ABIType::Bytes),
            StructField::new("taker", ABIType::Address),
            StructField::new("takerInterfaceId", ABIType::Bytes),
            StructField::new("stablecoin", ABIType::Address),
            StructField::new("amountLowerBound", uint256()),
            StructField::new("amountUpperBound", uint256()),
            StructField::new("securityDepositAmount", uint256()),
            StructField::new("takenSwapAmount", uint256()),
            StructField::new("serviceFeeAmount", uint256()),
            StructField::new("direction", uint8()),
            StructField::new("price", ABIType::Bytes),
            StructField::new("settlementMethod", ABIType::Bytes),
            StructField::new("protocolVersion", uint256()),
            StructField::new("isPaymentSent", ABIType::Bool),
            StructField::new("isPaymentReceived", ABIType::Bool),
            StructField::new("hasBuyerClosed", ABIType::Bool),
            StructField::new("hasSellerClosed", ABIType::Bool),
        ],
    ))
}

fn method(name: &str, args: Vec<(&str, ABIType)>, returns: Vec<ABIType>) -> ABIMethod {
    ABIMethod::new(
        name.to_string(),
        args.into_iter()
            .map(|(arg_name, arg_type)| ABIMethodArg::new(arg_type, Some(arg_name.to_string()), None))
            .collect(),
        returns,
        None,
    )
}

fn address_getter(name: &str) -> ABIMethod {
    method(name, vec![], vec![ABIType::Address])
}

pub fn busd_address() -> ABIMethod {
    address_getter("busdAddress")
}

pub fn dai_address() -> ABIMethod {
    address_getter("daiAddress")
}

pub fn usdc_address() -> ABIMethod {
    address_getter("usdcAddress")
}

pub fn usdt_address() -> ABIMethod {
    address_getter("usdtAddress")
}

pub fn owner() -> ABIMethod {
    address_getter("owner")
}

pub fn service_fee_pool() -> ABIMethod {
    address_getter("serviceFeePool")
}

pub fn protocol_version() -> ABIMethod {
    method("protocolVersion", vec![], vec![uint256()])
}

pub fn open_offer() -> ABIMethod {
    method(
        "openOffer",
        vec![("offerID", bytes16()), ("newOffer", offer_type())],
        vec![],
    )
}

pub fn edit_offer() -> ABIMethod {
    method(
        "editOffer",
        vec![
            ("offerID", bytes16()),
            ("editedOffer", offer_type()),
            ("editPrice", ABIType::Bool),
            ("editSettlementMethods", ABIType::Bool),
        ],
        vec![],
    )
}

pub fn cancel_offer() -> ABIMethod {
    method("cancelOffer", vec![("offerID", bytes16())], vec![])
}

pub fn get_offer() -> ABIMethod {
    method("getOffer", vec![("offerID", bytes16())], vec![offer_type()])
}

pub fn take_offer() -> ABIMethod {
    method(
        "takeOffer",
        vec![("offerID", bytes16()), ("newSwap", swap_type())],
        vec![],
    )
}

pub fn get_swap() -> ABIMethod {
    method("getSwap", vec![("swapID", bytes16())], vec![swap_type()])
}

pub fn fill_swap() -> ABIMethod {
    method("fillSwap", vec![("swapID", bytes16())], vec![])
}

pub fn report_payment_sent() -> ABIMethod {
    method("reportPaymentSent", vec![("swapID", bytes16())], vec![])
}

pub fn report_payment_received() -> ABIMethod {
    method("reportPaymentReceived", vec![("swapID", bytes16())], vec![])
}

pub fn close_swap() -> ABIMethod {
    method("closeSwap", vec![("swapID", bytes16())], vec![])
}

pub fn get_supported_settlement_methods() -> ABIMethod {
    method(
        "getSupportedSettlementMethods",
        vec![],
        vec![ABIType::DynamicArray(Box::new(ABIType::Bytes))],
    )
}

pub fn get_supported_stablecoins() -> ABIMethod {
    method(
        "getSupportedStablecoins",
        vec![],
        vec![ABIType::DynamicArray(Box::new(ABIType::Address))],
    )
}

pub fn set_settlement_method_support() -> ABIMethod {
    method(
        "setSettlementMethodSupport",
        vec![("settlementMethod", ABIType::Bytes), ("support", ABIType::Bool)],
        vec![],
    )
}

pub fn set_stablecoin_support() -> ABIMethod {
    method(
        "setStablecoinSupport",
        vec![("stablecoin", ABIType::Address), ("support", ABIType::Bool)],
        vec![],
    )
}

/// Every function of the contract.
pub fn functions() -> Vec<ABIMethod> {
    vec![
        busd_address(),
        cancel_offer(),
        close_swap(),
        dai_address(),
        edit_offer(),
        fill_swap(),
        get_offer(),
        get_supported_settlement_methods(),
        get_supported_stablecoins(),
        get_swap(),
        open_offer(),
        owner(),
        protocol_version(),
        report_payment_received(),
        report_payment_sent(),
        service_fee_pool(),
        set_settlement_method_support(),
        set_stablecoin_support(),
        take_offer(),
        usdc_address(),
        usdt_address(),
    ]
}

fn event(name: &str, params: Vec<(&str, ABIType)>) -> ABIEvent {
    ABIEvent::new(
        name.to_string(),
        params
            .into_iter()
            .map(|(param_name, param_type)| {
                ABIEventParam::new(Some(param_name.to_string()), param_type, false)
            })
            .collect(),
        false,
    )
}

/// Every event of the contract. None of them have indexed parameters.
pub fn events() -> Vec<ABIEvent> {
    vec![
        event("BuyerClosed", vec![("swapID", bytes16())]),
        event("OfferCanceled", vec![("offerID", bytes16())]),
        event(
            "OfferOpened",
            vec![("offerID", bytes16()), ("interfaceId", ABIType::Bytes)],
        ),
        event(
            "OfferTaken",
            vec![("offerID", bytes16()), ("takerInterfaceId", ABIType::Bytes)],
        ),
        event("PaymentReceived", vec![("swapID", bytes16())]),
        event("PaymentSent", vec![("swapID", bytes16())]),
        event("PriceChanged", vec![("offerID", bytes16())]),
        event("SellerClosed", vec![("swapID", bytes16())]),
        event("SwapFilled", vec![("swapID", bytes16())]),
    ]
}

/// Whether an offer buys or sells stablecoin, as stored in the `direction` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OfferDirection {
    Buy = 0,
    Sell = 1,
}

impl TryFrom<u8> for OfferDirection {
    type Error = ABIError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(OfferDirection::Buy),
            1 => Ok(OfferDirection::Sell),
            _ => Err(ABIError::SchemaMismatch {
                message: format!("Invalid offer direction {}", value),
            }),
        }
    }
}

/// A typed view of an `Offer` value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Offer {
    pub is_created: bool,
    pub is_taken: bool,
    pub maker: String,
    pub interface_id: Vec<u8>,
    pub stablecoin: String,
    pub amount_lower_bound: BigUint,
    pub amount_upper_bound: BigUint,
    pub security_deposit_amount: BigUint,
    pub direction: OfferDirection,
    pub price: Vec<u8>,
    pub settlement_methods: Vec<Vec<u8>>,
    pub protocol_version: BigUint,
}

impl From<&Offer> for ABIValue {
    fn from(offer: &Offer) -> Self {
        ABIValue::from_fields([
            ("isCreated", ABIValue::Bool(offer.is_created)),
            ("isTaken", ABIValue::Bool(offer.is_taken)),
            ("maker", ABIValue::from_address(offer.maker.clone())),
            ("interfaceId", ABIValue::from(offer.interface_id.clone())),
            ("stablecoin", ABIValue::from_address(offer.stablecoin.clone())),
            ("amountLowerBound", ABIValue::from(offer.amount_lower_bound.clone())),
            ("amountUpperBound", ABIValue::from(offer.amount_upper_bound.clone())),
            (
                "securityDepositAmount",
                ABIValue::from(offer.security_deposit_amount.clone()),
            ),
            ("direction", ABIValue::from(offer.direction as u8)),
            ("price", ABIValue::from(offer.price.clone())),
            (
                "settlementMethods",
                ABIValue::Array(
                    offer
                        .settlement_methods
                        .iter()
                        .map(|method| ABIValue::from(method.clone()))
                        .collect(),
                ),
            ),
            ("protocolVersion", ABIValue::from(offer.protocol_version.clone())),
        ])
    }
}

impl TryFrom<&ABIValue> for Offer {
    type Error = ABIError;

    fn try_from(value: &ABIValue) -> Result<Self, Self::Error> {
        Ok(Offer {
            is_created: bool_field(value, "isCreated")?,
            is_taken: bool_field(value, "isTaken")?,
            maker: address_field(value, "maker")?,
            interface_id: bytes_field(value, "interfaceId")?,
            stablecoin: address_field(value, "stablecoin")?,
            amount_lower_bound: uint_field(value, "amountLowerBound")?,
            amount_upper_bound: uint_field(value, "amountUpperBound")?,
            security_deposit_amount: uint_field(value, "securityDepositAmount")?,
            direction: direction_field(value)?,
            price: bytes_field(value, "price")?,
            settlement_methods: match field(value, "settlementMethods")? {
                ABIValue::Array(methods) => methods
                    .iter()
                    .map(|method| match method {
                        ABIValue::Bytes(bytes) => Ok(bytes.clone()),
                        _ => Err(wrong_kind("settlementMethods", "an array of bytes")),
                    })
                    .collect::<Result<Vec<_>, ABIError>>()?,
                _ => return Err(wrong_kind("settlementMethods", "an array of bytes")),
            },
            protocol_version: uint_field(value, "protocolVersion")?,
        })
    }
}

/// A typed view of a `Swap` value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Swap {
    pub is_created: bool,
    pub requires_fill: bool,
    pub maker: String,
    pub maker_interface_id: Vec<u8>,
    pub taker: String,
    pub taker_interface_id: Vec<u8>,
    pub stablecoin: String,
    pub amount_lower_bound: BigUint,
    pub amount_upper_bound: BigUint,
    pub security_deposit_amount: BigUint,
    pub taken_swap_amount: BigUint,
    pub service_fee_amount: BigUint,
    pub direction: OfferDirection,
    pub price: Vec<u8>,
    pub settlement_method: Vec<u8>,
    pub protocol_version: BigUint,
    pub is_payment_sent: bool,
    pub is_payment_received: bool,
    pub has_buyer_closed: bool,
    pub has_seller_closed: bool,
}

impl From<&Swap> for ABIValue {
    fn from(swap: &Swap) -> Self {
        ABIValue::from_fields([
            ("isCreated", ABIValue::Bool(swap.is_created)),
            ("requiresFill", ABIValue::Bool(swap.requires_fill)),
            ("maker", ABIValue::from_address(swap.maker.clone())),
            ("makerInterfaceId", ABIValue::from(swap.maker_interface_id.clone())),
            ("taker", ABIValue::from_address(swap.taker.clone())),
            ("takerInterfaceId", ABIValue::from(swap.taker_interface_id.clone())),
            ("stablecoin", ABIValue::from_address(swap.stablecoin.clone())),
            ("amountLowerBound", ABIValue::from(swap.amount_lower_bound.clone())),
            ("amountUpperBound", ABIValue::from(swap.amount_upper_bound.clone())),
            (
                "securityDepositAmount",
                ABIValue::from(swap.security_deposit_amount.clone()),
            ),
            ("takenSwapAmount", ABIValue::from(swap.taken_swap_amount.clone())),
            ("serviceFeeAmount", ABIValue::from(swap.service_fee_amount.clone())),
            ("direction", ABIValue::from(swap.direction as u8)),
            ("price", ABIValue::from(swap.price.clone())),
            ("settlementMethod", ABIValue::from(swap.settlement_method.clone())),
            ("protocolVersion", ABIValue::from(swap.protocol_version.clone())),
            ("isPaymentSent", ABIValue::Bool(swap.is_payment_sent)),
            ("isPaymentReceived", ABIValue::Bool(swap.is_payment_received)),
            ("hasBuyerClosed", ABIValue::Bool(swap.has_buyer_closed)),
            ("hasSellerClosed", ABIValue::Bool(swap.has_seller_closed)),
        ])
    }
}

impl TryFrom<&ABIValue> for Swap {
    type Error = ABIError;

    fn try_from(value: &ABIValue) -> Result<Self, Self::Error> {
        Ok(Swap {
            is_created: bool_field(value, "isCreated")?,
            requires_fill: bool_field(value, "requiresFill")?,
            maker: address_field(value, "maker")?,
            maker_interface_id: bytes_field(value, "makerInterfaceId")?,
            taker: address_field(value, "taker")?,
            taker_interface_id: bytes_field(value, "takerInterfaceId")?,
            stablecoin: address_field(value, "stablecoin")?,
            amount_lower_bound: uint_field(value, "amountLowerBound")?,
            amount_upper_bound: uint_field(value, "amountUpperBound")?,
            security_deposit_amount: uint_field(value, "securityDepositAmount")?,
            taken_swap_amount: uint_field(value, "takenSwapAmount")?,
            service_fee_amount: uint_field(value, "serviceFeeAmount")?,
            direction: direction_field(value)?,
            price: bytes_field(value, "price")?,
            settlement_method: bytes_field(value, "settlementMethod")?,
            protocol_version: uint_field(value, "protocolVersion")?,
            is_payment_sent: bool_field(value, "isPaymentSent")?,
            is_payment_received: bool_field(value, "isPaymentReceived")?,
            has_buyer_closed: bool_field(value, "hasBuyerClosed")?,
            has_seller_closed: bool_field(value, "hasSellerClosed")?,
        })
    }
}

/// Builds the call data for `openOffer(offerID, newOffer)`.
pub fn encode_open_offer(offer_id: &[u8; ID_BYTE_LENGTH], offer: &Offer) -> Result<Vec<u8>, ABIError> {
    open_offer().encode_call(&[ABIValue::from(offer_id.as_slice()), ABIValue::from(offer)])
}

/// Builds the call data for `takeOffer(offerID, newSwap)`.
pub fn encode_take_offer(offer_id: &[u8; ID_BYTE_LENGTH], swap: &Swap) -> Result<Vec<u8>, ABIError> {
    take_offer().encode_call(&[ABIValue::from(offer_id.as_slice()), ABIValue::from(swap)])
}

/// Decodes the hex return data of `getOffer`.
///
/// The contract returns a zeroed offer for unknown ids, so both empty return data and an
/// offer with `isCreated` unset yield `None`.
pub fn decode_get_offer(raw_hex: &str) -> Result<Option<Offer>, ABIError> {
    decode_single(&get_offer(), raw_hex)?
        .as_ref()
        .map(Offer::try_from)
        .transpose()
        .map(|offer| offer.filter(|offer| offer.is_created))
}

/// Decodes the hex return data of `getSwap`, with the same `None` cases as [`decode_get_offer`].
pub fn decode_get_swap(raw_hex: &str) -> Result<Option<Swap>, ABIError> {
    decode_single(&get_swap(), raw_hex)?
        .as_ref()
        .map(Swap::try_from)
        .transpose()
        .map(|swap| swap.filter(|swap| swap.is_created))
}

/// Empty return data yields `None`.
fn decode_single(method: &ABIMethod, raw_hex: &str) -> Result<Option<ABIValue>, ABIError> {
    Ok(method.decode_returns(raw_hex)?.into_iter().next())
}

fn field<'a>(value: &'a ABIValue, name: &str) -> Result<&'a ABIValue, ABIError> {
    value.field(name).ok_or_else(|| ABIError::SchemaMismatch {
        message: format!("Missing field '{}'", name),
    })
}

fn wrong_kind(name: &str, expected: &str) -> ABIError {
    ABIError::SchemaMismatch {
        message: format!("Field '{}' should be {}", name, expected),
    }
}

fn bool_field(value: &ABIValue, name: &str) -> Result<bool, ABIError> {
    match field(value, name)? {
        ABIValue::Bool(b) => Ok(*b),
        _ => Err(wrong_kind(name, "a bool")),
    }
}

fn uint_field(value: &ABIValue, name: &str) -> Result<BigUint, ABIError> {
    match field(value, name)? {
        ABIValue::Uint(n) => Ok(n.clone()),
        _ => Err(wrong_kind(name, "an unsigned integer")),
    }
}

fn address_field(value: &ABIValue, name: &str) -> Result<String, ABIError> {
    match field(value, name)? {
        ABIValue::Address(address) => Ok(address.clone()),
        _ => Err(wrong_kind(name, "an address")),
    }
}

fn bytes_field(value: &ABIValue, name: &str) -> Result<Vec<u8>, ABIError> {
    match field(value, name)? {
        ABIValue::Bytes(bytes) => Ok(bytes.clone()),
        _ => Err(wrong_kind(name, "bytes")),
    }
}

fn direction_field(value: &ABIValue) -> Result<OfferDirection, ABIError> {
    let direction = uint_field(value, "direction")?;
    u8::try_from(&direction)
        .map_err(|_| wrong_kind("direction", "a uint8"))
        .and_then(OfferDirection::try_from)
}

/// Looks up a function by name, for callers that only have the name at hand.
pub fn function(name: &str) -> Result<ABIMethod, ABIError> {
    functions()
        .into_iter()
        .find(|m| m.name == name)
        .ok_or_else(|| ABIError::ValidationError {
            message: format!("Unknown CommutoSwap function {}", name),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils;
    use rstest::rstest;

    fn sample_offer() -> Offer {
        Offer {
            is_created: true,
            is_taken: false,
            maker: "0x5b38da6a701c568545dcfcb03fcb875f56beddc4".to_string(),
            interface_id: b"maker-interface".to_vec(),
            stablecoin: "0x6b175474e89094c44da98b954eedeac495271d0f".to_string(),
            amount_lower_bound: BigUint::from(100u32),
            amount_upper_bound: BigUint::from(200u32),
            security_deposit_amount: BigUint::from(20u32),
            direction: OfferDirection::Buy,
            price: vec![0x01, 0x00],
            settlement_methods: vec![b"EUR-SEPA".to_vec(), b"USD-SWIFT".to_vec()],
            protocol_version: BigUint::from(1u8),
        }
    }

    #[rstest]
    #[case(
        open_offer(),
        "openOffer(bytes16,(bool,bool,address,bytes,address,uint256,uint256,uint256,uint8,bytes,bytes[],uint256))",
        "ebb7246a"
    )]
    #[case(
        take_offer(),
        "takeOffer(bytes16,(bool,bool,address,bytes,address,bytes,address,uint256,uint256,uint256,uint256,uint256,uint8,bytes,bytes,uint256,bool,bool,bool,bool))",
        "e2f05982"
    )]
    #[case(get_offer(), "getOffer(bytes16)", "7448b2c0")]
    #[case(get_supported_stablecoins(), "getSupportedStablecoins()", "7c6f73eb")]
    fn test_signatures(#[case] method: ABIMethod, #[case] signature: &str, #[case] selector: &str) {
        assert_eq!(method.signature().unwrap(), signature);
        assert_eq!(hex::encode(method.selector().unwrap()), selector);
    }

    #[test]
    fn test_event_topic() {
        let offer_opened = events()
            .into_iter()
            .find(|e| e.name == "OfferOpened")
            .unwrap();
        assert_eq!(
            hex::encode(offer_opened.topic().unwrap()),
            "ef2bf747944377181ec522e65058d1c1d86fb82ab8fa80ce6ca1a96de047efc6"
        );
    }

    #[test]
    fn test_offer_round_trip_through_get_offer() {
        let offer = sample_offer();
        let return_data = crate::codec::encode_params(&[offer_type()], &[ABIValue::from(&offer)]).unwrap();
        let decoded = decode_get_offer(&utils::encode_hex(&return_data)).unwrap();
        assert_eq!(decoded, Some(offer));
    }

    #[test]
    fn test_get_offer_without_return_data() {
        assert_eq!(decode_get_offer("0x").unwrap(), None);
    }

    #[test]
    fn test_uncreated_offer_is_none() {
        let offer = Offer {
            is_created: false,
            ..sample_offer()
        };
        let return_data = crate::codec::encode_params(&[offer_type()], &[ABIValue::from(&offer)]).unwrap();
        assert_eq!(decode_get_offer(&utils::encode_hex(&return_data)).unwrap(), None);
    }

    #[test]
    fn test_open_offer_call_data() {
        let offer = sample_offer();
        let offer_id = [0x42u8; ID_BYTE_LENGTH];
        let call_data = encode_open_offer(&offer_id, &offer).unwrap();
        assert_eq!(hex::encode(&call_data[..4]), "ebb7246a");
        // bytes16 id inline, then the offset of the offer struct
        assert_eq!(call_data[4..4 + ID_BYTE_LENGTH], offer_id);
        assert_eq!(utils::read_usize_word(&call_data[4..], 32).unwrap(), 64);

        let decoded = open_offer().decode_call(&call_data).unwrap();
        assert_eq!(Offer::try_from(&decoded[1]).unwrap(), offer);
    }

    #[test]
    fn test_invalid_direction() {
        let mut value = ABIValue::from(&sample_offer());
        if let ABIValue::Struct(fields) = &mut value {
            for (name, field_value) in fields.iter_mut() {
                if name == "direction" {
                    *field_value = ABIValue::from(7u8);
                }
            }
        }
        assert!(matches!(
            Offer::try_from(&value),
            Err(ABIError::SchemaMismatch { .. })
        ));
    }

    #[test]
    fn test_function_lookup() {
        assert_eq!(function("closeSwap").unwrap(), close_swap());
        assert!(function("withdraw").is_err());
        assert_eq!(functions().len(), 21);
    }
}
