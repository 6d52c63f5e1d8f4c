//! Core types for multicall batches
//!
//! This module defines the data structures that flow through a batch:
//! - Loosely typed call arguments ([`ArgValue`])
//! - Decoded return values ([`ReturnValue`])
//! - Per-call and per-batch results
//! - The outbound `eth_call` request object

use std::collections::HashMap;
use std::fmt::Display;
pub use alloy::primitives::{Address, Bytes, I256, U256};
use alloy::dyn_abi::DynSolValue;
use serde::{Serialize, Serializer};

use crate::errors::CallDecodeError;
use crate::revert::parse_revert_reason;

/// Loosely typed argument value supplied by the caller
///
/// Each variant is matched against the declared ABI type of its position
/// when the call is compiled; see [`crate::call::coerce`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgValue {
    /// Text: addresses, decimal integers and `string` arguments
    Str(String),
    /// Signed native integer
    Int(i64),
    /// Unsigned native integer
    Uint(u64),
    Bool(bool),
    /// Raw bytes for `bytes` and `bytesN` arguments
    Bytes(Vec<u8>),
    /// Elements of an array or tuple argument
    List(Vec<ArgValue>),
}

impl From<&str> for ArgValue {
    fn from(value: &str) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<String> for ArgValue {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<Address> for ArgValue {
    fn from(value: Address) -> Self {
        Self::Str(value.to_string())
    }
}

impl From<i32> for ArgValue {
    fn from(value: i32) -> Self {
        Self::Int(value.into())
    }
}

impl From<i64> for ArgValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<u32> for ArgValue {
    fn from(value: u32) -> Self {
        Self::Uint(value.into())
    }
}

impl From<u64> for ArgValue {
    fn from(value: u64) -> Self {
        Self::Uint(value)
    }
}

impl From<bool> for ArgValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Vec<u8>> for ArgValue {
    fn from(value: Vec<u8>) -> Self {
        Self::Bytes(value)
    }
}

impl<const N: usize> From<[u8; N]> for ArgValue {
    fn from(value: [u8; N]) -> Self {
        Self::Bytes(value.to_vec())
    }
}

impl From<Vec<ArgValue>> for ArgValue {
    fn from(value: Vec<ArgValue>) -> Self {
        Self::List(value)
    }
}

/// A decoded return value
///
/// Integers serialize as decimal strings so large values survive JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ReturnValue {
    Uint(#[serde(serialize_with = "as_display")] U256),
    Int(#[serde(serialize_with = "as_display")] I256),
    Bool(bool),
    Address(Address),
    /// `bytesN`, trimmed to its declared length
    FixedBytes(Bytes),
    Bytes(Bytes),
    String(String),
    /// Arrays and tuples
    List(Vec<ReturnValue>),
}

impl ReturnValue {
    pub fn as_uint(&self) -> Option<U256> {
        match self {
            Self::Uint(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<I256> {
        match self {
            Self::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_address(&self) -> Option<Address> {
        match self {
            Self::Address(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    /// Bytes of a `bytes` or `bytesN` value
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(value) | Self::FixedBytes(value) => Some(value),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[ReturnValue]> {
        match self {
            Self::List(values) => Some(values),
            _ => None,
        }
    }
}

impl From<DynSolValue> for ReturnValue {
    fn from(value: DynSolValue) -> Self {
        match value {
            DynSolValue::Uint(value, _) => Self::Uint(value),
            DynSolValue::Int(value, _) => Self::Int(value),
            DynSolValue::Bool(value) => Self::Bool(value),
            DynSolValue::Address(value) => Self::Address(value),
            DynSolValue::FixedBytes(word, size) => {
                Self::FixedBytes(Bytes::copy_from_slice(&word[..size]))
            }
            DynSolValue::Bytes(value) => Self::Bytes(value.into()),
            DynSolValue::String(value) => Self::String(value),
            DynSolValue::Function(function) => {
                Self::FixedBytes(Bytes::copy_from_slice(function.as_slice()))
            }
            DynSolValue::Array(values)
            | DynSolValue::FixedArray(values)
            | DynSolValue::Tuple(values) => {
                Self::List(values.into_iter().map(Self::from).collect())
            }
            #[allow(unreachable_patterns)]
            other => Self::Bytes(other.abi_encode().into()),
        }
    }
}

/// Result of one call in a batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallResult {
    /// Whether the call succeeded on-chain
    pub success: bool,
    /// Raw return data, or revert data when `success` is false
    pub raw: Bytes,
    /// Decoded return values; empty unless the call succeeded and decoded
    pub decoded: Vec<ReturnValue>,
    /// Set when the call succeeded but its return data could not be decoded
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "as_display_opt")]
    pub decode_error: Option<CallDecodeError>,
}

impl CallResult {
    /// True if the call succeeded and its return values were decoded
    pub fn is_decoded(&self) -> bool {
        self.success && self.decode_error.is_none()
    }

    /// Human-readable revert reason of a failed call, if recognized
    pub fn revert_reason(&self) -> Option<String> {
        if self.success {
            return None;
        }
        parse_revert_reason(&self.raw)
    }
}

/// Results of one aggregate call, keyed by call key
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchResult {
    /// Block the aggregate call was evaluated at
    pub block_number: u64,
    pub calls: HashMap<String, CallResult>,
}

impl BatchResult {
    pub fn get(&self, key: &str) -> Option<&CallResult> {
        self.calls.get(key)
    }
}

/// Outbound `eth_call` object handed to the transport
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallRequest {
    /// Aggregator contract address
    pub to: Address,
    /// Aggregate calldata, selector included
    pub data: Bytes,
    /// Gas limit, serialized as a hex quantity
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "as_hex_quantity")]
    pub gas: Option<u64>,
}

fn as_display<T: Display, S: Serializer>(value: &T, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(value)
}

fn as_display_opt<T: Display, S: Serializer>(
    value: &Option<T>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(value) => serializer.collect_str(value),
        None => serializer.serialize_none(),
    }
}

fn as_hex_quantity<S: Serializer>(value: &Option<u64>, serializer: S) -> Result<S::Ok, S::Error> {
    match value {
        Some(value) => serializer.collect_str(&format_args!("{value:#x}")),
        None => serializer.serialize_none(),
    }
}
