//! Argument coercion and ABI packing
//!
//! Converts loosely typed [`ArgValue`]s into [`DynSolValue`]s of the declared
//! ABI types, then packs them with the standard parameter encoding (static
//! values inline in 32-byte words, dynamic values as offset/length/content
//! tails after the head).
//!
//! Coercion rules:
//! - `address`: a string, optional `0x` prefix, exactly 20 bytes of hex
//! - `uintN`/`intN`: every representation is rendered as a base-10 string
//!   and parsed once, so native and string inputs encode identically
//! - everything else must already have the matching shape

use alloy::{
    dyn_abi::{DynSolType, DynSolValue},
    hex,
    primitives::{Address, B256, I256, U256},
};

use crate::{errors::CoerceError, types::ArgValue};

/// Parse an ABI type string
pub fn parse_type(ty: &str) -> Result<DynSolType, CoerceError> {
    DynSolType::parse(ty).map_err(|e| CoerceError::TypeFormat {
        ty: ty.to_string(),
        reason: e.to_string(),
    })
}

/// Coerce a value into the given ABI type
pub fn coerce(ty: &DynSolType, value: &ArgValue) -> Result<DynSolValue, CoerceError> {
    match ty {
        DynSolType::Address => coerce_address(value).map(DynSolValue::Address),
        DynSolType::Uint(bits) => coerce_uint(value, *bits).map(|v| DynSolValue::Uint(v, *bits)),
        DynSolType::Int(bits) => coerce_int(value, *bits).map(|v| DynSolValue::Int(v, *bits)),
        DynSolType::Bool => match value {
            ArgValue::Bool(b) => Ok(DynSolValue::Bool(*b)),
            other => Err(mismatch(ty, other)),
        },
        DynSolType::String => match value {
            ArgValue::Str(s) => Ok(DynSolValue::String(s.clone())),
            other => Err(mismatch(ty, other)),
        },
        DynSolType::Bytes => match value {
            ArgValue::Bytes(b) => Ok(DynSolValue::Bytes(b.clone())),
            other => Err(mismatch(ty, other)),
        },
        DynSolType::FixedBytes(size) => match value {
            ArgValue::Bytes(b) if b.len() == *size => {
                let mut word = B256::ZERO;
                word.0[..*size].copy_from_slice(b);
                Ok(DynSolValue::FixedBytes(word, *size))
            }
            ArgValue::Bytes(b) => Err(CoerceError::TypeFormat {
                ty: ty.sol_type_name().into_owned(),
                reason: format!("expected {size} bytes, got {}", b.len()),
            }),
            other => Err(mismatch(ty, other)),
        },
        DynSolType::Array(inner) => {
            let items = as_list(ty, value)?;
            Ok(DynSolValue::Array(coerce_all(inner, items)?))
        }
        DynSolType::FixedArray(inner, len) => {
            let items = as_list(ty, value)?;
            if items.len() != *len {
                return Err(CoerceError::TypeFormat {
                    ty: ty.sol_type_name().into_owned(),
                    reason: format!("expected {len} elements, got {}", items.len()),
                });
            }
            Ok(DynSolValue::FixedArray(coerce_all(inner, items)?))
        }
        DynSolType::Tuple(types) => {
            let items = as_list(ty, value)?;
            if items.len() != types.len() {
                return Err(CoerceError::TypeFormat {
                    ty: ty.sol_type_name().into_owned(),
                    reason: format!("expected {} fields, got {}", types.len(), items.len()),
                });
            }
            types
                .iter()
                .zip(items)
                .map(|(ty, item)| coerce(ty, item))
                .collect::<Result<Vec<_>, _>>()
                .map(DynSolValue::Tuple)
        }
        other => Err(CoerceError::TypeFormat {
            ty: other.sol_type_name().into_owned(),
            reason: "unsupported argument type".to_string(),
        }),
    }
}

/// ABI-encode already coerced values as a parameter list
pub fn pack(values: Vec<DynSolValue>) -> Vec<u8> {
    DynSolValue::Tuple(values).abi_encode_params()
}

/// Decode a hex string (optional `0x` prefix) into a 20-byte address
pub fn parse_address(text: &str) -> Result<Address, CoerceError> {
    let digits = text.strip_prefix("0x").unwrap_or(text);
    let bytes = hex::decode(digits)
        .map_err(|e| CoerceError::AddressFormat(format!("{text}: {e}")))?;
    if bytes.len() != 20 {
        return Err(CoerceError::AddressFormat(format!(
            "{text}: expected 20 bytes, got {}",
            bytes.len()
        )));
    }
    Ok(Address::from_slice(&bytes))
}

fn coerce_address(value: &ArgValue) -> Result<Address, CoerceError> {
    match value {
        ArgValue::Str(text) => parse_address(text),
        other => Err(CoerceError::AddressFormat(format!(
            "expected address argument to be a string, got {}",
            variant_name(other)
        ))),
    }
}

/// Base-10 text of a numeric argument: optional sign, then ASCII digits
///
/// A leading `+` is dropped so both integer families see the same text.
fn decimal_digits(ty: &str, value: &ArgValue) -> Result<String, CoerceError> {
    let text = match value {
        ArgValue::Str(text) => text.trim().to_string(),
        ArgValue::Int(n) => n.to_string(),
        ArgValue::Uint(n) => n.to_string(),
        other => {
            return Err(CoerceError::NumericFormat {
                ty: ty.to_string(),
                reason: format!("expected a number or decimal string, got {}", variant_name(other)),
            })
        }
    };
    let (sign, digits) = match (text.strip_prefix('+'), text.strip_prefix('-')) {
        (Some(digits), _) => ("", digits),
        (_, Some(digits)) => ("-", digits),
        _ => ("", text.as_str()),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CoerceError::NumericFormat {
            ty: ty.to_string(),
            reason: format!("could not parse {text:?} as a base 10 number"),
        });
    }
    Ok(format!("{sign}{digits}"))
}

fn coerce_uint(value: &ArgValue, bits: usize) -> Result<U256, CoerceError> {
    let ty = format!("uint{bits}");
    let digits = decimal_digits(&ty, value)?;
    if digits.starts_with('-') {
        return Err(CoerceError::NumericFormat {
            ty,
            reason: format!("{digits} is negative"),
        });
    }
    let parsed = U256::from_str_radix(&digits, 10).map_err(|_| CoerceError::NumericFormat {
        ty: ty.clone(),
        reason: format!("could not parse {digits} as a base 10 number"),
    })?;
    if parsed.bit_len() > bits {
        return Err(CoerceError::NumericFormat {
            ty,
            reason: format!("{digits} does not fit in {bits} bits"),
        });
    }
    Ok(parsed)
}

fn coerce_int(value: &ArgValue, bits: usize) -> Result<I256, CoerceError> {
    let ty = format!("int{bits}");
    let digits = decimal_digits(&ty, value)?;
    let parsed = I256::from_dec_str(&digits).map_err(|_| CoerceError::NumericFormat {
        ty: ty.clone(),
        reason: format!("could not parse {digits} as a base 10 number"),
    })?;
    // two's complement range of an intN: [-2^(N-1), 2^(N-1) - 1]
    let limit = U256::from(1u8) << (bits - 1);
    let magnitude = parsed.unsigned_abs();
    let fits = if parsed.is_negative() { magnitude <= limit } else { magnitude < limit };
    if !fits {
        return Err(CoerceError::NumericFormat {
            ty,
            reason: format!("{digits} does not fit in {bits} bits"),
        });
    }
    Ok(parsed)
}

fn as_list<'a>(ty: &DynSolType, value: &'a ArgValue) -> Result<&'a [ArgValue], CoerceError> {
    match value {
        ArgValue::List(items) => Ok(items),
        other => Err(mismatch(ty, other)),
    }
}

fn coerce_all(ty: &DynSolType, items: &[ArgValue]) -> Result<Vec<DynSolValue>, CoerceError> {
    items.iter().map(|item| coerce(ty, item)).collect()
}

fn mismatch(ty: &DynSolType, value: &ArgValue) -> CoerceError {
    CoerceError::TypeFormat {
        ty: ty.sol_type_name().into_owned(),
        reason: format!("cannot use {} value", variant_name(value)),
    }
}

fn variant_name(value: &ArgValue) -> &'static str {
    match value {
        ArgValue::Str(_) => "string",
        ArgValue::Int(_) => "signed integer",
        ArgValue::Uint(_) => "unsigned integer",
        ArgValue::Bool(_) => "boolean",
        ArgValue::Bytes(_) => "bytes",
        ArgValue::List(_) => "list",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address() {
        let ty = parse_type("address").unwrap();
        let value = coerce(&ty, &"0x5eb3fa2dfecdde21c950813c665e9364fa609bd2".into()).unwrap();
        assert_eq!(
            value,
            DynSolValue::Address("0x5eb3fa2dfecdde21c950813c665e9364fa609bd2".parse().unwrap())
        );

        // prefix is optional
        assert!(coerce(&ty, &"5eb3fa2dfecdde21c950813c665e9364fa609bd2".into()).is_ok());

        assert!(matches!(coerce(&ty, &"0x1234".into()), Err(CoerceError::AddressFormat(_))));
        assert!(matches!(coerce(&ty, &"0xnothex".into()), Err(CoerceError::AddressFormat(_))));
        assert!(matches!(coerce(&ty, &ArgValue::Int(1234)), Err(CoerceError::AddressFormat(_))));
    }

    #[test]
    fn test_numeric_representation_invariance() {
        let ty = parse_type("uint256").unwrap();
        let from_str = coerce(&ty, &"12312312312313".into()).unwrap();
        let from_int = coerce(&ty, &ArgValue::Int(12312312312313)).unwrap();
        let from_uint = coerce(&ty, &ArgValue::Uint(12312312312313)).unwrap();
        assert_eq!(pack(vec![from_str.clone()]), pack(vec![from_int]));
        assert_eq!(pack(vec![from_str]), pack(vec![from_uint]));
    }

    #[test]
    fn test_numeric_bounds() {
        let uint8 = parse_type("uint8").unwrap();
        assert!(coerce(&uint8, &ArgValue::Uint(255)).is_ok());
        assert!(matches!(coerce(&uint8, &ArgValue::Uint(256)), Err(CoerceError::NumericFormat { .. })));
        assert!(matches!(coerce(&uint8, &ArgValue::Int(-1)), Err(CoerceError::NumericFormat { .. })));
        assert!(matches!(coerce(&uint8, &"0x10".into()), Err(CoerceError::NumericFormat { .. })));
        assert!(matches!(coerce(&uint8, &ArgValue::Bool(true)), Err(CoerceError::NumericFormat { .. })));

        let int8 = parse_type("int8").unwrap();
        assert!(coerce(&int8, &ArgValue::Int(-128)).is_ok());
        assert!(coerce(&int8, &ArgValue::Int(127)).is_ok());
        assert!(coerce(&int8, &ArgValue::Int(128)).is_err());
        assert!(coerce(&int8, &ArgValue::Int(-129)).is_err());

        // only an optional sign followed by decimal digits
        for text in ["1_000", "", " ", "+", "-", "1e3", "--1", "+-1", "1.5"] {
            assert!(matches!(coerce(&uint8, &text.into()), Err(CoerceError::NumericFormat { .. })), "{text}");
            assert!(matches!(coerce(&int8, &text.into()), Err(CoerceError::NumericFormat { .. })), "{text}");
        }
        let uint256 = parse_type("uint256").unwrap();
        let int256 = parse_type("int256").unwrap();
        assert!(coerce(&uint256, &"1_000".into()).is_err());
        assert!(coerce(&int256, &"1_000".into()).is_err());

        // a leading plus is accepted the same way by both families
        assert_eq!(coerce(&uint256, &"+5".into()).unwrap(), DynSolValue::Uint(U256::from(5), 256));
        assert_eq!(
            coerce(&int256, &"+5".into()).unwrap(),
            DynSolValue::Int(I256::try_from(5i64).unwrap(), 256)
        );
        assert_eq!(coerce(&uint8, &" 7 ".into()).unwrap(), DynSolValue::Uint(U256::from(7), 8));

        // wider than 64 bits through the string path
        let big = "115792089237316195423570985008687907853269984665640564039457584007913129639935";
        assert_eq!(coerce(&uint256, &big.into()).unwrap(), DynSolValue::Uint(U256::MAX, 256));
    }

    #[test]
    fn test_negative_int_sign_extends() {
        let ty = parse_type("int256").unwrap();
        let packed = pack(vec![coerce(&ty, &ArgValue::Int(-1)).unwrap()]);
        assert_eq!(packed, vec![0xff; 32]);
    }

    #[test]
    fn test_fixed_bytes_and_dynamic_types() {
        let bytes32 = parse_type("bytes32").unwrap();
        let value = coerce(&bytes32, &ArgValue::from([1u8; 32])).unwrap();
        assert_eq!(pack(vec![value]), vec![1u8; 32]);
        assert!(matches!(
            coerce(&bytes32, &ArgValue::Bytes(vec![1; 4])),
            Err(CoerceError::TypeFormat { .. })
        ));

        // string: head offset, then length and padded content
        let packed = pack(vec![coerce(&parse_type("string").unwrap(), &"abc".into()).unwrap()]);
        assert_eq!(packed.len(), 96);
        assert_eq!(packed[31], 0x20);
        assert_eq!(packed[63], 3);
        assert_eq!(&packed[64..67], b"abc");
    }

    #[test]
    fn test_arrays_coerce_elements() {
        let ty = parse_type("uint256[]").unwrap();
        let value = coerce(&ty, &ArgValue::List(vec!["1".into(), ArgValue::Uint(2)])).unwrap();
        assert_eq!(
            value,
            DynSolValue::Array(vec![
                DynSolValue::Uint(U256::from(1), 256),
                DynSolValue::Uint(U256::from(2), 256),
            ])
        );

        let ty = parse_type("address[2]").unwrap();
        assert!(matches!(
            coerce(&ty, &ArgValue::List(vec!["0x1234".into(), "0x1234".into()])),
            Err(CoerceError::AddressFormat(_))
        ));
        assert!(matches!(
            coerce(&ty, &ArgValue::List(vec![])),
            Err(CoerceError::TypeFormat { .. })
        ));
    }

    #[test]
    fn test_bad_type_strings() {
        assert!(matches!(parse_type("uint256["), Err(CoerceError::TypeFormat { .. })));
        assert!(matches!(parse_type("notatype"), Err(CoerceError::TypeFormat { .. })));
        assert!(matches!(
            coerce(&DynSolType::Bool, &"true".into()),
            Err(CoerceError::TypeFormat { .. })
        ));
    }
}
