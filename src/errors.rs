//! Error types for multicall compilation, dispatch and decoding
//!
//! Errors are layered by the stage that produces them:
//! - Signature and argument errors, raised while compiling a batch
//! - Reply errors, raised when the aggregate reply is structurally invalid
//! - Per-call decode errors, stored on the affected call result only
//! - Configuration and transport errors

use thiserror::Error;

/// Top-level error type returned by [`crate::Multicall`]
///
/// Every variant is fatal for the whole batch. Per-call decode failures are
/// not represented here; they live on [`crate::types::CallResult`].
#[derive(Debug, Error)]
pub enum MulticallError {
    /// The batch could not be compiled; nothing was sent
    #[error("Failed to encode batch: {0}")]
    Encode(#[from] EncodeError),

    /// The aggregate reply could not be interpreted
    #[error("Invalid aggregate reply: {0}")]
    Reply(#[from] ReplyError),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Error reported by the transport, passed through unchanged
    #[error(transparent)]
    Transport(#[from] anyhow::Error),
}

/// Signature parsing errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SignatureError {
    /// The signature does not have the `name(args)(returns)` shape
    #[error("Malformed signature `{0}`: expected name(args)(returns)")]
    Malformed(String),
}

/// Errors converting a loosely typed argument into its declared ABI type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoerceError {
    /// Value is not a string or does not decode to 20 bytes
    #[error("Invalid address argument: {0}")]
    AddressFormat(String),

    /// Value is not a base-10 integer that fits the declared width
    #[error("Invalid numeric argument for {ty}: {reason}")]
    NumericFormat {
        ty: String,
        reason: String,
    },

    /// Type string is unsupported/malformed, or the value does not match it
    #[error("Invalid argument for type `{ty}`: {reason}")]
    TypeFormat {
        ty: String,
        reason: String,
    },
}

/// Errors compiling a single call into calldata
///
/// Every variant names the key of the offending call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// The call's signature could not be split into argument/return groups
    #[error("Call `{key}`: malformed signature `{signature}`")]
    MalformedSignature {
        key: String,
        signature: String,
    },

    /// Number of supplied arguments differs from the declared argument types
    ///
    /// # Fields
    /// * `expected` - Number of argument types in the signature
    /// * `actual` - Number of supplied arguments
    #[error(
        "Call `{key}`: number of argument types doesn't match number of arguments \
         for method {signature} (expected {expected}, got {actual})"
    )]
    ArgumentCountMismatch {
        key: String,
        signature: String,
        expected: usize,
        actual: usize,
    },

    /// An argument could not be coerced into its declared type
    ///
    /// # Fields
    /// * `index` - Position of the argument in the signature
    /// * `source` - Underlying coercion failure
    #[error("Call `{key}`: argument {index}: {source}")]
    Argument {
        key: String,
        index: usize,
        #[source]
        source: CoerceError,
    },
}

impl EncodeError {
    /// Key of the call that failed to compile
    pub fn key(&self) -> &str {
        match self {
            Self::MalformedSignature { key, .. }
            | Self::ArgumentCountMismatch { key, .. }
            | Self::Argument { key, .. } => key,
        }
    }

    /// Underlying coercion error, if this is an argument failure
    pub fn coerce_error(&self) -> Option<&CoerceError> {
        match self {
            Self::Argument { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Structural errors in the aggregate reply
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReplyError {
    /// Reply is not valid hex or not a valid `(uint256, (bool,bytes)[])` encoding
    #[error("Failed to decode aggregate reply: {0}")]
    Decode(String),

    /// Number of returned entries differs from the number of calls sent
    #[error("Aggregate reply has {actual} results for {expected} calls")]
    Shape {
        expected: usize,
        actual: usize,
    },
}

/// Failure to decode one successful call's return data
///
/// Scoped to a single call; the rest of the batch is unaffected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CallDecodeError {
    /// Return type string in the signature could not be parsed
    #[error("Invalid return type `{ty}`: {reason}")]
    ReturnType {
        ty: String,
        reason: String,
    },

    /// Return data does not match the declared return types
    #[error("Failed to decode return data: {0}")]
    Abi(String),
}

/// Configuration errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// Named preset does not exist
    #[error("Preset {0} is not defined")]
    UnknownPreset(String),

    /// Gas limit is not a `0x`-prefixed hex quantity
    #[error("Invalid gas limit: {0}")]
    InvalidGas(String),

    /// Invalid or malformed RPC URL
    #[error("Invalid RPC URL: {0}")]
    InvalidRpcUrl(String),

    /// Connection to the RPC endpoint could not be established
    #[error("Connection failed: {0}")]
    Connection(String),
}
