use crate::abi_type::{ABIType, parse_tuple_content};
use crate::abi_value::ABIValue;
use crate::codec;
use crate::constants::SELECTOR_BYTE_LENGTH;
use crate::error::ABIError;
use crate::selector::selector;
use std::fmt::Display;
use std::str::FromStr;

/// Represents a contract function, including its name, arguments, and output types.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ABIMethod {
    /// The name of the method.
    pub name: String,
    /// A list of the method's arguments.
    pub args: Vec<ABIMethodArg>,
    /// The output types of the method, empty if the method returns nothing.
    pub returns: Vec<ABIType>,
    /// An optional description of the method.
    pub description: Option<String>,
}

/// Represents an argument in an ABI method.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ABIMethodArg {
    /// The type of the argument.
    pub arg_type: ABIType,
    /// An optional name for the argument.
    pub name: Option<String>,
    /// An optional description of the argument.
    pub description: Option<String>,
}

impl ABIMethodArg {
    /// Creates a new ABI method argument.
    pub fn new(arg_type: ABIType, name: Option<String>, description: Option<String>) -> Self {
        Self {
            arg_type,
            name,
            description,
        }
    }
}

impl ABIMethod {
    /// Creates a new ABI method.
    pub fn new(
        name: String,
        args: Vec<ABIMethodArg>,
        returns: Vec<ABIType>,
        description: Option<String>,
    ) -> Self {
        Self {
            name,
            args,
            returns,
            description,
        }
    }

    /// The argument types, in order.
    pub fn arg_types(&self) -> Vec<&ABIType> {
        self.args.iter().map(|arg| &arg.arg_type).collect()
    }

    /// Returns the canonical signature, e.g. `transfer(address,uint256)`.
    ///
    /// Output types are not part of the signature.
    pub fn signature(&self) -> Result<String, ABIError> {
        codec::build_signature(&self.name, &self.arg_types())
    }

    /// Returns the method selector, the first 4 bytes of the keccak-256 hash of the signature.
    pub fn selector(&self) -> Result<[u8; SELECTOR_BYTE_LENGTH], ABIError> {
        Ok(selector(&self.signature()?))
    }

    /// Encodes a call to this method: selector followed by the encoded arguments.
    pub fn encode_call(&self, values: &[ABIValue]) -> Result<Vec<u8>, ABIError> {
        codec::encode_call(&self.name, &self.arg_types(), values)
    }

    /// Same as [`ABIMethod::encode_call`], as a `0x` prefixed hex string.
    pub fn encode_call_hex(&self, values: &[ABIValue]) -> Result<String, ABIError> {
        codec::encode_call_hex(&self.name, &self.arg_types(), values)
    }

    /// Decodes call data produced for this method back into its argument values.
    pub fn decode_call(&self, call_data: &[u8]) -> Result<Vec<ABIValue>, ABIError> {
        let expected = self.selector()?;
        let (call_selector, params) = call_data
            .split_at_checked(SELECTOR_BYTE_LENGTH)
            .ok_or_else(|| ABIError::MalformedInput {
                message: format!(
                    "Call data of {} bytes is too short to hold a selector",
                    call_data.len()
                ),
            })?;
        if call_selector != expected.as_slice() {
            return Err(ABIError::SchemaMismatch {
                message: format!(
                    "Selector 0x{} does not match {} (0x{})",
                    hex::encode(call_selector),
                    self.signature()?,
                    hex::encode(expected)
                ),
            });
        }
        codec::decode_params(&self.arg_types(), params)
    }

    /// Decodes the hex return data of a call to this method.
    pub fn decode_returns(&self, raw_hex: &str) -> Result<Vec<ABIValue>, ABIError> {
        codec::decode_call_result(raw_hex, &self.returns)
    }
}

impl Display for ABIMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let arg_types: Vec<String> = self.args.iter().map(|arg| arg.arg_type.to_string()).collect();
        write!(f, "{}({})", self.name, arg_types.join(","))?;
        if !self.returns.is_empty() {
            let return_types: Vec<String> = self.returns.iter().map(|t| t.to_string()).collect();
            write!(f, "({})", return_types.join(","))?;
        }
        Ok(())
    }
}

impl FromStr for ABIMethod {
    type Err = ABIError;

    /// Parses `name(args)` or `name(args)(outputs)`.
    fn from_str(signature: &str) -> Result<Self, Self::Err> {
        if signature.chars().any(|c| c.is_whitespace()) {
            return Err(ABIError::ValidationError {
                message: "Method signature cannot contain whitespace".to_string(),
            });
        }

        let open_paren_pos = signature.find('(').ok_or_else(|| ABIError::ValidationError {
            message: "Method signature must contain opening parenthesis".to_string(),
        })?;

        if open_paren_pos == 0 {
            return Err(ABIError::ValidationError {
                message: "Method name cannot be empty".to_string(),
            });
        }
        let method_name = signature[..open_paren_pos].to_string();

        let close_paren_pos = find_matching_closing_paren(signature, open_paren_pos)?;
        let args = split_arguments_by_comma(&signature[open_paren_pos + 1..close_paren_pos])?
            .iter()
            .enumerate()
            .map(|(i, arg_type)| {
                Ok(ABIMethodArg::new(
                    ABIType::from_str(arg_type)?,
                    Some(format!("arg{}", i)),
                    None,
                ))
            })
            .collect::<Result<Vec<_>, ABIError>>()?;

        let rest = &signature[close_paren_pos + 1..];
        let returns = if rest.is_empty() {
            Vec::new()
        } else {
            if !rest.starts_with('(') || find_matching_closing_paren(rest, 0)? != rest.len() - 1 {
                return Err(ABIError::ValidationError {
                    message: format!("Malformed output list '{}' in method signature", rest),
                });
            }
            split_arguments_by_comma(&rest[1..rest.len() - 1])?
                .iter()
                .map(|return_type| ABIType::from_str(return_type))
                .collect::<Result<Vec<_>, ABIError>>()?
        };

        Ok(ABIMethod::new(method_name, args, returns, None))
    }
}

/// Find the matching closing parenthesis for an opening parenthesis.
fn find_matching_closing_paren(s: &str, open_pos: usize) -> Result<usize, ABIError> {
    let mut depth = 0;

    for (i, ch) in s.char_indices().skip_while(|(i, _)| *i < open_pos) {
        match ch {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(i);
                }
            }
            _ => {}
        }
    }

    Err(ABIError::ValidationError {
        message: "Mismatched parentheses in method signature".to_string(),
    })
}

/// Split arguments by comma, respecting nested parentheses.
fn split_arguments_by_comma(args_str: &str) -> Result<Vec<String>, ABIError> {
    let arguments = parse_tuple_content(args_str)?;

    if arguments.iter().any(|arg| arg.is_empty()) {
        return Err(ABIError::ValidationError {
            message: "Empty argument in method signature".to_string(),
        });
    }

    Ok(arguments)
}
