//! View call descriptions and batch compilation
//!
//! A [`ViewCall`] names one read-only contract call by a caller-chosen key.
//! A [`ViewCalls`] batch compiles into a single aggregate payload and maps the
//! aggregate reply back onto the keys, position by position.
//!
//! # Example
//! ```
//! use view_multicall::{ViewCall, ViewCalls};
//! use alloy::primitives::address;
//!
//! let calls: ViewCalls = vec![
//!     ViewCall::new(
//!         "usdc.balance",
//!         address!("A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48"),
//!         "balanceOf(address)(uint256)",
//!         vec!["0x28C6c06298d514Db089934071355E5743bf21d60".into()],
//!     ),
//!     ViewCall::new(
//!         "usdc.decimals",
//!         address!("A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48"),
//!         "decimals()(uint8)",
//!         vec![],
//!     ),
//! ]
//! .into();
//!
//! let payload = calls.call_data().unwrap();
//! assert_eq!(&payload[..4], &[0x17, 0x35, 0x2e, 0x13]);
//! ```

pub mod coerce;
pub mod signature;

use std::collections::HashMap;

use alloy::{
    dyn_abi::{DynSolType, DynSolValue},
    primitives::{Address, Bytes, Selector},
};
use tracing::warn;

use crate::{
    aggregate::{decode_reply, encode_batch, AggregateReply, AggregateResult},
    errors::{CallDecodeError, EncodeError, ReplyError},
    types::{ArgValue, BatchResult, CallResult, ReturnValue},
};
use signature::Signature;

/// One read-only contract call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewCall {
    key: String,
    target: Address,
    signature: String,
    arguments: Vec<ArgValue>,
}

impl ViewCall {
    /// Describe a call
    ///
    /// # Arguments
    /// * `key` - Identifier used to look up the result; never sent on the wire
    /// * `target` - Contract to call
    /// * `signature` - `name(argTypes)(returnTypes)`, e.g. `balanceOf(address)(uint256)`
    /// * `arguments` - One value per argument type
    pub fn new(
        key: impl Into<String>,
        target: Address,
        signature: impl Into<String>,
        arguments: Vec<ArgValue>,
    ) -> Self {
        Self {
            key: key.into(),
            target,
            signature: signature.into(),
            arguments,
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn target(&self) -> Address {
        self.target
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }

    pub fn arguments(&self) -> &[ArgValue] {
        &self.arguments
    }

    fn parsed_signature(&self) -> Result<Signature, EncodeError> {
        Signature::parse(&self.signature).map_err(|_| EncodeError::MalformedSignature {
            key: self.key.clone(),
            signature: self.signature.clone(),
        })
    }

    pub fn argument_types(&self) -> Result<Vec<String>, EncodeError> {
        Ok(self.parsed_signature()?.argument_types)
    }

    pub fn return_types(&self) -> Result<Vec<String>, EncodeError> {
        Ok(self.parsed_signature()?.return_types)
    }

    /// 4-byte selector of the call's method; return types are not hashed
    pub fn selector(&self) -> Result<Selector, EncodeError> {
        Ok(self.parsed_signature()?.selector())
    }

    /// ABI-packed arguments, without the selector
    ///
    /// The argument count is checked before any value is coerced.
    pub fn args_call_data(&self) -> Result<Bytes, EncodeError> {
        let argument_types = self.argument_types()?;
        if argument_types.len() != self.arguments.len() {
            return Err(EncodeError::ArgumentCountMismatch {
                key: self.key.clone(),
                signature: self.signature.clone(),
                expected: argument_types.len(),
                actual: self.arguments.len(),
            });
        }

        let values = argument_types
            .iter()
            .zip(&self.arguments)
            .enumerate()
            .map(|(index, (ty, value))| {
                coerce::parse_type(ty)
                    .and_then(|ty| coerce::coerce(&ty, value))
                    .map_err(|source| EncodeError::Argument {
                        key: self.key.clone(),
                        index,
                        source,
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(coerce::pack(values).into())
    }

    /// Full calldata: selector followed by the packed arguments
    pub fn call_data(&self) -> Result<Bytes, EncodeError> {
        let selector = self.selector()?;
        let args = self.args_call_data()?;
        let mut data = Vec::with_capacity(4 + args.len());
        data.extend_from_slice(selector.as_slice());
        data.extend_from_slice(&args);
        Ok(data.into())
    }

    /// Check that the call compiles without building a payload
    pub fn validate(&self) -> Result<(), EncodeError> {
        self.args_call_data().map(|_| ())
    }

    /// Decode return data with the call's declared return types
    pub fn decode_returns(&self, raw: &[u8]) -> Result<Vec<ReturnValue>, CallDecodeError> {
        let return_types = Signature::parse(&self.signature)
            .map_err(|e| CallDecodeError::ReturnType {
                ty: self.signature.clone(),
                reason: e.to_string(),
            })?
            .return_types;
        let types = return_types
            .iter()
            .map(|ty| {
                DynSolType::parse(ty).map_err(|e| CallDecodeError::ReturnType {
                    ty: ty.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        match DynSolType::Tuple(types).abi_decode_params(raw) {
            Ok(DynSolValue::Tuple(values)) => Ok(values.into_iter().map(ReturnValue::from).collect()),
            Ok(other) => Ok(vec![ReturnValue::from(other)]),
            Err(e) => Err(CallDecodeError::Abi(e.to_string())),
        }
    }
}

/// An ordered batch of view calls
///
/// Order is significant: the i-th call is answered by the i-th reply entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewCalls(Vec<ViewCall>);

impl ViewCalls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, call: ViewCall) {
        self.0.push(call);
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ViewCall> {
        self.0.iter()
    }

    /// Aggregate calldata for the whole batch, selector included
    ///
    /// Fails on the first call that does not compile; the error names its key.
    pub fn call_data(&self) -> Result<Bytes, EncodeError> {
        let calls = self
            .iter()
            .map(|call| call.call_data().map(|data| (call.target, data)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(encode_batch(calls))
    }

    /// Decode an aggregate reply, decoding the return values of successful calls
    ///
    /// A call whose return data does not match its return types keeps its
    /// raw bytes and records the failure in `decode_error`; the rest of the
    /// batch is unaffected.
    pub fn decode(&self, raw: &str) -> Result<BatchResult, ReplyError> {
        let reply = decode_reply(raw, self.len())?;
        Ok(self.map_results(reply, |call, result| {
            let mut call_result = CallResult {
                success: result.success,
                raw: result.data,
                decoded: Vec::new(),
                decode_error: None,
            };
            if call_result.success {
                match call.decode_returns(&call_result.raw) {
                    Ok(values) => call_result.decoded = values,
                    Err(e) => {
                        warn!(key = %call.key, error = %e, "failed to decode call result");
                        call_result.decode_error = Some(e);
                    }
                }
            }
            call_result
        }))
    }

    /// Decode an aggregate reply without decoding any return values
    pub fn decode_raw(&self, raw: &str) -> Result<BatchResult, ReplyError> {
        let reply = decode_reply(raw, self.len())?;
        Ok(self.map_results(reply, |_, result| CallResult {
            success: result.success,
            raw: result.data,
            decoded: Vec::new(),
            decode_error: None,
        }))
    }

    fn map_results<F>(&self, reply: AggregateReply, mut map: F) -> BatchResult
    where
        F: FnMut(&ViewCall, AggregateResult) -> CallResult,
    {
        let mut calls = HashMap::with_capacity(self.len());
        for (call, result) in self.iter().zip(reply.results) {
            // duplicate keys: the later call wins
            calls.insert(call.key.clone(), map(call, result));
        }
        BatchResult { block_number: reply.block_number, calls }
    }
}

impl From<Vec<ViewCall>> for ViewCalls {
    fn from(calls: Vec<ViewCall>) -> Self {
        Self(calls)
    }
}

impl FromIterator<ViewCall> for ViewCalls {
    fn from_iter<I: IntoIterator<Item = ViewCall>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a ViewCalls {
    type Item = &'a ViewCall;
    type IntoIter = std::slice::Iter<'a, ViewCall>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
