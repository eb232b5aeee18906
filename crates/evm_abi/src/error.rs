use snafu::Snafu;

/// Represents an error that can occur during ABI operations.
#[derive(Debug, Snafu)]
pub enum ABIError {
    /// A type descriptor, type string or method definition is invalid.
    #[snafu(display("ABI validation failed: {message}"))]
    ValidationError { message: String },

    /// The provided values do not match the declared parameter or output types.
    #[snafu(display("ABI schema mismatch: {message}"))]
    SchemaMismatch { message: String },

    /// The bytes (or hex string) being decoded are malformed.
    #[snafu(display("ABI decoding failed: {message}"))]
    MalformedInput { message: String },

    /// A type that the codec does not support was requested.
    #[snafu(display("Unsupported ABI type: {message}"))]
    UnsupportedType { message: String },
}
