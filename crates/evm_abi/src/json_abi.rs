use crate::abi_type::ABIType;
use crate::error::ABIError;
use crate::event::{ABIEvent, ABIEventParam};
use crate::method::{ABIMethod, ABIMethodArg};
use crate::types::collections::r#struct::{ABIStruct, StructField};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Type string used by the JSON ABI for tuples and structs, optionally followed by array suffixes.
const TUPLE_TYPE: &str = "tuple";

/// Name given to tuples whose `internalType` does not name a struct.
const ANONYMOUS_STRUCT_NAME: &str = "tuple";

/// How a function interacts with chain state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StateMutability {
    Pure,
    View,
    NonPayable,
    Payable,
}

/// A function, event or error parameter in a Solidity JSON ABI.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonParam {
    /// The parameter name, empty for unnamed outputs
    #[serde(default)]
    pub name: String,
    /// The canonical type string, `tuple` (with optional array suffixes) for structs
    #[serde(rename = "type")]
    pub param_type: String,
    /// The fields of a `tuple` type
    #[serde(skip_serializing_if = "Option::is_none")]
    pub components: Option<Vec<JsonParam>>,
    /// The Solidity type, e.g. `struct CommutoSwap.Offer`
    #[serde(rename = "internalType", skip_serializing_if = "Option::is_none")]
    pub internal_type: Option<String>,
    /// Only present on event inputs
    #[serde(skip_serializing_if = "Option::is_none")]
    pub indexed: Option<bool>,
}

impl JsonParam {
    /// Resolves this parameter into an [`ABIType`], turning `tuple` components into a named struct.
    pub fn to_abi_type(&self) -> Result<ABIType, ABIError> {
        let Some(array_suffix) = self.param_type.strip_prefix(TUPLE_TYPE) else {
            return ABIType::from_str(&self.param_type);
        };

        let components = self.components.as_ref().ok_or_else(|| ABIError::ValidationError {
            message: format!("Tuple parameter '{}' has no components", self.name),
        })?;
        let fields = components
            .iter()
            .map(|component| Ok(StructField::new(component.name.clone(), component.to_abi_type()?)))
            .collect::<Result<Vec<_>, ABIError>>()?;

        let base_type = ABIType::Struct(ABIStruct::new(self.struct_name(), fields));
        wrap_array_suffix(base_type, array_suffix)
    }

    /// Extracts `Offer` from an internal type such as `struct CommutoSwap.Offer[]`.
    fn struct_name(&self) -> String {
        self.internal_type
            .as_deref()
            .and_then(|internal_type| internal_type.strip_prefix("struct "))
            .map(|qualified| {
                let without_arrays = qualified.split('[').next().unwrap_or(qualified);
                without_arrays
                    .rsplit('.')
                    .next()
                    .unwrap_or(without_arrays)
                    .to_string()
            })
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| ANONYMOUS_STRUCT_NAME.to_string())
    }
}

fn wrap_array_suffix(base_type: ABIType, suffix: &str) -> Result<ABIType, ABIError> {
    let mut abi_type = base_type;
    let mut rest = suffix;
    while !rest.is_empty() {
        let close = rest
            .strip_prefix('[')
            .and_then(|inner| inner.find(']'))
            .ok_or_else(|| ABIError::ValidationError {
                message: format!("Malformed tuple array suffix '{}'", suffix),
            })?;
        let length_str = &rest[1..close + 1];
        abi_type = if length_str.is_empty() {
            ABIType::DynamicArray(Box::new(abi_type))
        } else {
            let length = length_str.parse::<usize>().map_err(|_| ABIError::ValidationError {
                message: format!("Invalid array length: {}", length_str),
            })?;
            ABIType::StaticArray(Box::new(abi_type), length)
        };
        rest = &rest[close + 2..];
    }
    Ok(abi_type)
}

fn to_method_args(params: &[JsonParam]) -> Result<Vec<ABIMethodArg>, ABIError> {
    params
        .iter()
        .map(|param| {
            let name = (!param.name.is_empty()).then(|| param.name.clone());
            Ok(ABIMethodArg::new(param.to_abi_type()?, name, None))
        })
        .collect()
}

fn to_types(params: &[JsonParam]) -> Result<Vec<ABIType>, ABIError> {
    params.iter().map(|param| param.to_abi_type()).collect()
}

/// A contract function.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct FunctionEntry {
    pub name: String,
    pub inputs: Vec<JsonParam>,
    #[serde(default)]
    pub outputs: Vec<JsonParam>,
    #[serde(rename = "stateMutability", skip_serializing_if = "Option::is_none")]
    pub state_mutability: Option<StateMutability>,
}

impl FunctionEntry {
    pub fn to_abi_method(&self) -> Result<ABIMethod, ABIError> {
        Ok(ABIMethod::new(
            self.name.clone(),
            to_method_args(&self.inputs)?,
            to_types(&self.outputs)?,
            None,
        ))
    }
}

/// A contract event.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EventEntry {
    pub name: String,
    pub inputs: Vec<JsonParam>,
    #[serde(default)]
    pub anonymous: bool,
}

impl EventEntry {
    pub fn to_abi_event(&self) -> Result<ABIEvent, ABIError> {
        let inputs = self
            .inputs
            .iter()
            .map(|param| {
                let name = (!param.name.is_empty()).then(|| param.name.clone());
                Ok(ABIEventParam::new(
                    name,
                    param.to_abi_type()?,
                    param.indexed.unwrap_or(false),
                ))
            })
            .collect::<Result<Vec<_>, ABIError>>()?;
        Ok(ABIEvent::new(self.name.clone(), inputs, self.anonymous))
    }
}

/// A custom error. Revert data for it is laid out exactly like a call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ErrorEntry {
    pub name: String,
    pub inputs: Vec<JsonParam>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ConstructorEntry {
    pub inputs: Vec<JsonParam>,
    #[serde(rename = "stateMutability", skip_serializing_if = "Option::is_none")]
    pub state_mutability: Option<StateMutability>,
}

/// Fallback and receive functions take no parameters.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SpecialFunctionEntry {
    #[serde(rename = "stateMutability", skip_serializing_if = "Option::is_none")]
    pub state_mutability: Option<StateMutability>,
}

/// One entry of a Solidity JSON ABI, discriminated by its `type` field.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AbiEntry {
    Function(FunctionEntry),
    Event(EventEntry),
    Error(ErrorEntry),
    Constructor(ConstructorEntry),
    Fallback(SpecialFunctionEntry),
    Receive(SpecialFunctionEntry),
}

/// A Solidity JSON ABI, as emitted by `solc --abi` and contract build tools.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct JsonAbi {
    pub entries: Vec<AbiEntry>,
}

impl JsonAbi {
    /// Create JsonAbi from JSON string
    pub fn from_json(json_str: &str) -> Result<Self, ABIError> {
        serde_json::from_str(json_str).map_err(|e| ABIError::ValidationError {
            message: format!("Failed to parse JSON ABI: {}", e),
        })
    }

    /// Convert JsonAbi to JSON string with optional indentation
    ///
    /// # Parameters
    /// * `indent` - Optional number of spaces for indentation. If None, produces compact JSON.
    pub fn to_json(&self, indent: Option<usize>) -> Result<String, ABIError> {
        let serialize_error = |e: &dyn std::fmt::Display| ABIError::ValidationError {
            message: format!("Failed to serialize JSON ABI: {}", e),
        };
        match indent {
            None => serde_json::to_string(self).map_err(|e| serialize_error(&e)),
            Some(indent_size) => {
                let indent_bytes = vec![b' '; indent_size];
                let formatter = serde_json::ser::PrettyFormatter::with_indent(&indent_bytes);
                let mut buf = Vec::new();
                let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
                self.serialize(&mut ser).map_err(|e| serialize_error(&e))?;
                String::from_utf8(buf).map_err(|e| serialize_error(&e))
            }
        }
    }

    pub fn functions(&self) -> impl Iterator<Item = &FunctionEntry> {
        self.entries.iter().filter_map(|entry| match entry {
            AbiEntry::Function(function) => Some(function),
            _ => None,
        })
    }

    pub fn events(&self) -> impl Iterator<Item = &EventEntry> {
        self.entries.iter().filter_map(|entry| match entry {
            AbiEntry::Event(event) => Some(event),
            _ => None,
        })
    }

    pub fn errors(&self) -> impl Iterator<Item = &ErrorEntry> {
        self.entries.iter().filter_map(|entry| match entry {
            AbiEntry::Error(error) => Some(error),
            _ => None,
        })
    }

    /// Get a function by name or signature and convert it to an [`ABIMethod`]
    pub fn function(&self, name_or_signature: &str) -> Result<ABIMethod, ABIError> {
        let methods = self
            .functions()
            .map(|function| function.to_abi_method())
            .collect::<Result<Vec<_>, ABIError>>()?;
        find_by_name_or_signature(methods, name_or_signature, "function", |m| m.signature())
    }

    /// Get an event by name or signature and convert it to an [`ABIEvent`]
    pub fn event(&self, name_or_signature: &str) -> Result<ABIEvent, ABIError> {
        let events = self
            .events()
            .map(|event| event.to_abi_event())
            .collect::<Result<Vec<_>, ABIError>>()?;
        find_by_name_or_signature(events, name_or_signature, "event", |e| e.signature())
    }

    /// Get a custom error by name or signature, as an [`ABIMethod`] so its revert data can be decoded.
    pub fn error(&self, name_or_signature: &str) -> Result<ABIMethod, ABIError> {
        let errors = self
            .errors()
            .map(|error| Ok(ABIMethod::new(error.name.clone(), to_method_args(&error.inputs)?, vec![], None)))
            .collect::<Result<Vec<_>, ABIError>>()?;
        find_by_name_or_signature(errors, name_or_signature, "error", |m| m.signature())
    }
}

trait Named {
    fn name(&self) -> &str;
}

impl Named for ABIMethod {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for ABIEvent {
    fn name(&self) -> &str {
        &self.name
    }
}

fn find_by_name_or_signature<T, F>(
    candidates: Vec<T>,
    name_or_signature: &str,
    kind: &str,
    signature: F,
) -> Result<T, ABIError>
where
    T: Named,
    F: Fn(&T) -> Result<String, ABIError>,
{
    let not_found = || ABIError::ValidationError {
        message: format!("Unable to find {} {} in the ABI", kind, name_or_signature),
    };

    if name_or_signature.contains('(') {
        return candidates
            .into_iter()
            .find(|candidate| signature(candidate).is_ok_and(|sig| sig == name_or_signature))
            .ok_or_else(not_found);
    }

    let mut matching: Vec<T> = candidates
        .into_iter()
        .filter(|candidate| candidate.name() == name_or_signature)
        .collect();

    match matching.len() {
        0 => Err(not_found()),
        1 => Ok(matching.remove(0)),
        _ => {
            let signatures = matching.iter().map(&signature).collect::<Result<Vec<_>, _>>()?;
            Err(ABIError::ValidationError {
                message: format!(
                    "{} resolved to multiple {}s, please pass in a signature instead: {}",
                    name_or_signature,
                    kind,
                    signatures.join(", ")
                ),
            })
        }
    }
}
