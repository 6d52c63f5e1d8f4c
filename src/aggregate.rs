//! Aggregate payload encoding and reply decoding
//!
//! The aggregator exposes a single entry point:
//!
//! ```solidity
//! function aggregate((address target, bytes callData)[] calls, bool strict)
//!     returns (uint256 blockNumber, (bool success, bytes data)[] results);
//! ```
//!
//! With `strict = false` a reverting call does not revert the batch; it is
//! reported as `success = false` with its revert data instead. Batches built
//! here always disable strict mode.

use alloy::{
    hex,
    primitives::{Address, Bytes},
    sol_types::SolCall,
};

use crate::errors::ReplyError;

mod aggregator {
    use alloy::sol;

    sol! {
        #[derive(Debug, PartialEq, Eq)]
        struct AggregateCall {
            address target;
            bytes callData;
        }

        #[derive(Debug, PartialEq, Eq)]
        struct AggregateResult {
            bool success;
            bytes data;
        }

        contract Aggregator {
            function aggregate(AggregateCall[] calls, bool strict)
                public view
                returns (uint256 blockNumber, AggregateResult[] results);
        }
    }
}

pub use aggregator::{AggregateCall, AggregateResult, Aggregator::aggregateCall};

/// Selector of `aggregate((address,bytes)[],bool)`
pub const AGGREGATE_SELECTOR: [u8; 4] = [0x17, 0x35, 0x2e, 0x13];

/// Decoded aggregate reply
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregateReply {
    pub block_number: u64,
    /// Per-call outcomes, in request order
    pub results: Vec<AggregateResult>,
}

/// Encode `(target, calldata)` pairs into aggregate calldata, selector included
pub fn encode_batch<I>(calls: I) -> Bytes
where
    I: IntoIterator<Item = (Address, Bytes)>,
{
    let calls = calls
        .into_iter()
        .map(|(target, call_data)| AggregateCall { target, callData: call_data })
        .collect();
    aggregateCall { calls, strict: false }.abi_encode().into()
}

/// Decode the hex reply of an aggregate call
///
/// # Arguments
/// * `raw` - Hex string returned by `eth_call`, with or without `0x`
/// * `expected` - Number of calls in the originating batch
///
/// # Returns
/// * `Err(ReplyError::Decode)` - Invalid hex, malformed ABI data, or a block
///   number that does not fit in `u64`
/// * `Err(ReplyError::Shape)` - Result count differs from `expected`
pub fn decode_reply(raw: &str, expected: usize) -> Result<AggregateReply, ReplyError> {
    let raw = raw.trim();
    let bytes = hex::decode(raw.strip_prefix("0x").unwrap_or(raw))
        .map_err(|e| ReplyError::Decode(format!("invalid hex: {e}")))?;
    let decoded = aggregateCall::abi_decode_returns(&bytes)
        .map_err(|e| ReplyError::Decode(e.to_string()))?;

    if decoded.results.len() != expected {
        return Err(ReplyError::Shape { expected, actual: decoded.results.len() });
    }
    let block_number = u64::try_from(decoded.blockNumber).map_err(|_| {
        ReplyError::Decode(format!("block number {} does not fit in u64", decoded.blockNumber))
    })?;

    Ok(AggregateReply { block_number, results: decoded.results })
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::{
        dyn_abi::DynSolValue,
        primitives::{address, U256},
    };

    fn encode_reply(block_number: U256, results: &[(bool, &[u8])]) -> String {
        let results = results
            .iter()
            .map(|(success, data)| {
                DynSolValue::Tuple(vec![DynSolValue::Bool(*success), DynSolValue::Bytes(data.to_vec())])
            })
            .collect();
        let encoded = DynSolValue::Tuple(vec![
            DynSolValue::Uint(block_number, 256),
            DynSolValue::Array(results),
        ])
        .abi_encode_params();
        hex::encode_prefixed(encoded)
    }

    #[test]
    fn test_aggregate_selector() {
        assert_eq!(aggregateCall::SELECTOR, AGGREGATE_SELECTOR);
        let payload = encode_batch(Vec::<(Address, Bytes)>::new());
        assert_eq!(&payload[..4], &AGGREGATE_SELECTOR);
    }

    #[test]
    fn test_encode_batch_layout() {
        let target = address!("5eb3fa2dfecdde21c950813c665e9364fa609bd2");
        let payload = encode_batch([(target, Bytes::from(vec![0xaa, 0xbb, 0xcc, 0xdd]))]);

        let decoded = aggregateCall::abi_decode(&payload).unwrap();
        assert!(!decoded.strict);
        assert_eq!(
            decoded.calls,
            vec![AggregateCall { target, callData: Bytes::from(vec![0xaa, 0xbb, 0xcc, 0xdd]) }]
        );

        // head: offset of the calls array, then the strict flag
        assert_eq!(payload[4 + 31], 0x40);
        assert_eq!(&payload[4 + 32..4 + 64], &[0u8; 32]);
    }

    #[test]
    fn test_decode_reply() {
        let raw = encode_reply(U256::from(12_345_678u64), &[(true, &[1, 2, 3]), (false, &[])]);
        let reply = decode_reply(&raw, 2).unwrap();
        assert_eq!(reply.block_number, 12_345_678);
        assert_eq!(
            reply.results,
            vec![
                AggregateResult { success: true, data: Bytes::from(vec![1, 2, 3]) },
                AggregateResult { success: false, data: Bytes::new() },
            ]
        );

        // prefix is optional
        assert_eq!(decode_reply(raw.trim_start_matches("0x"), 2).unwrap(), reply);
    }

    #[test]
    fn test_decode_reply_errors() {
        let raw = encode_reply(U256::from(1), &[(true, &[1, 2, 3])]);

        assert_eq!(decode_reply(&raw, 2), Err(ReplyError::Shape { expected: 2, actual: 1 }));
        assert!(matches!(decode_reply(&raw[..raw.len() - 64], 1), Err(ReplyError::Decode(_))));
        assert!(matches!(decode_reply("0xzz", 1), Err(ReplyError::Decode(_))));
        assert!(matches!(decode_reply("0x", 0), Err(ReplyError::Decode(_))));

        let raw = encode_reply(U256::MAX, &[]);
        assert!(matches!(decode_reply(&raw, 0), Err(ReplyError::Decode(_))));
    }
}
