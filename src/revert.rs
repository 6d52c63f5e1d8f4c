//! Revert payload decoding for failed calls
//!
//! When an individual call in a batch reverts, the aggregator reports
//! `success = false` and hands back the revert data verbatim. Two payload
//! shapes are recognized:
//! - `Error(string)`, selector `0x08c379a0`
//! - `Panic(uint256)`, selector `0x4e487b71`

use alloy::dyn_abi::{DynSolType, DynSolValue};

const ERROR_STRING_SELECTOR: [u8; 4] = [0x08, 0xc3, 0x79, 0xa0];
const PANIC_SELECTOR: [u8; 4] = [0x4e, 0x48, 0x7b, 0x71];

/// Decode a revert payload into a readable reason
///
/// # Returns
/// * `Some(String)` - The `Error(string)` message or a panic description
/// * `None` - Empty data, unknown selector, or undecodable payload
///
/// # Example
/// ```
/// use view_multicall::revert::parse_revert_reason;
/// use alloy::primitives::hex;
///
/// let data = hex::decode(
///     "08c379a0\
///      0000000000000000000000000000000000000000000000000000000000000020\
///      000000000000000000000000000000000000000000000000000000000000000b\
///      6e6f74206120746f6b656e000000000000000000000000000000000000000000",
/// ).unwrap();
/// assert_eq!(parse_revert_reason(&data), Some("not a token".to_string()));
/// ```
pub fn parse_revert_reason(data: &[u8]) -> Option<String> {
    let (selector, payload) = data.split_first_chunk::<4>()?;
    match *selector {
        ERROR_STRING_SELECTOR => match decode_single(DynSolType::String, payload)? {
            DynSolValue::String(reason) => Some(reason),
            _ => None,
        },
        PANIC_SELECTOR => match decode_single(DynSolType::Uint(256), payload)? {
            DynSolValue::Uint(code, _) => Some(panic_description(code.saturating_to())),
            _ => None,
        },
        _ => None,
    }
}

fn decode_single(ty: DynSolType, payload: &[u8]) -> Option<DynSolValue> {
    match DynSolType::Tuple(vec![ty]).abi_decode_params(payload).ok()? {
        DynSolValue::Tuple(mut values) if values.len() == 1 => values.pop(),
        _ => None,
    }
}

fn panic_description(code: u64) -> String {
    match code {
        0x01 => "Panic: Assertion failed".to_string(),
        0x11 => "Panic: Arithmetic overflow".to_string(),
        0x12 => "Panic: Division by zero".to_string(),
        0x21 => "Panic: Invalid enum value".to_string(),
        0x22 => "Panic: Invalid storage byte array".to_string(),
        0x31 => "Panic: Pop on empty array".to_string(),
        0x32 => "Panic: Array access out of bounds".to_string(),
        0x41 => "Panic: Out of memory".to_string(),
        0x51 => "Panic: Zero-initialized function call".to_string(),
        code => format!("Panic: Unknown error code (0x{:x})", code),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::hex::decode;

    #[test]
    fn test_parse_error_string() {
        let error_bytes = decode(
            "08c379a0\
             0000000000000000000000000000000000000000000000000000000000000020\
             0000000000000000000000000000000000000000000000000000000000000014\
             496e73756666696369656e742062616c616e6365000000000000000000000000"
        ).unwrap();
        assert_eq!(parse_revert_reason(&error_bytes), Some("Insufficient balance".to_string()));

        // selector without payload
        assert_eq!(parse_revert_reason(&decode("08c379a0").unwrap()), None);
    }

    #[test]
    fn test_parse_panic() {
        for (code, expected) in [
            (0x01u8, "Panic: Assertion failed"),
            (0x11, "Panic: Arithmetic overflow"),
            (0x12, "Panic: Division by zero"),
            (0x32, "Panic: Array access out of bounds"),
            (0xff, "Panic: Unknown error code (0xff)"),
        ] {
            let mut panic_bytes = PANIC_SELECTOR.to_vec();
            panic_bytes.extend_from_slice(&[0u8; 31]);
            panic_bytes.push(code);
            assert_eq!(parse_revert_reason(&panic_bytes), Some(expected.to_string()));
        }
    }

    #[test]
    fn test_unrecognized_payloads() {
        assert_eq!(parse_revert_reason(&[]), None);
        assert_eq!(parse_revert_reason(&[0x08, 0xc3, 0x79]), None);
        assert_eq!(parse_revert_reason(&[0x00, 0x00, 0x00, 0x00]), None);
        assert_eq!(parse_revert_reason(&[0x4e, 0x48, 0x7b, 0x71, 0x00]), None);
    }
}
