//! Function signature parsing and selector computation
//!
//! Signatures are written `name(argType1,argType2)(retType1,retType2)`.
//! A call without return values is written `name(args)()`. Tuple types are
//! written in parentheses: `f((uint256,bool))(bool)`.

use alloy::{
    dyn_abi::DynSolType,
    primitives::{keccak256, Selector},
};

use crate::errors::SignatureError;

/// A parsed `name(args)(returns)` signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature {
    pub name: String,
    pub argument_types: Vec<String>,
    pub return_types: Vec<String>,
}

impl Signature {
    /// Split a signature into its name, argument types and return types
    ///
    /// Groups are matched by parenthesis depth, so tuple types such as
    /// `(uint256,bool)` stay whole. Types are trimmed; an empty group yields
    /// no types. No validation of the type names themselves happens here.
    ///
    /// # Returns
    /// * `Err(SignatureError::Malformed)` - If the name is missing or fewer
    ///   than two balanced parenthesized groups are present
    pub fn parse(signature: &str) -> Result<Self, SignatureError> {
        let malformed = || SignatureError::Malformed(signature.to_string());

        let (name, rest) = signature.split_once('(').ok_or_else(malformed)?;
        let name = name.trim();
        if name.is_empty() || name.contains(')') {
            return Err(malformed());
        }
        let (args, rest) = split_group(rest).ok_or_else(malformed)?;
        let (_, rest) = rest.split_once('(').ok_or_else(malformed)?;
        let (returns, _) = split_group(rest).ok_or_else(malformed)?;

        Ok(Self {
            name: name.to_string(),
            argument_types: split_types(args),
            return_types: split_types(returns),
        })
    }

    /// Canonical `name(t1,t2)` form used for the selector
    ///
    /// Whitespace is dropped and type aliases are expanded (`uint` becomes
    /// `uint256`). Type strings that do not parse are kept as written.
    pub fn canonical(&self) -> String {
        let types: Vec<String> = self
            .argument_types
            .iter()
            .map(|ty| match DynSolType::parse(ty) {
                Ok(parsed) => parsed.sol_type_name().into_owned(),
                Err(_) => ty.clone(),
            })
            .collect();
        format!("{}({})", self.name, types.join(","))
    }

    /// First 4 bytes of the keccak-256 hash of the canonical form
    pub fn selector(&self) -> Selector {
        let hash = keccak256(self.canonical().as_bytes());
        Selector::from_slice(&hash[..4])
    }
}

/// Split `text` at the `)` closing a group whose `(` was already consumed
fn split_group(text: &str) -> Option<(&str, &str)> {
    let mut depth = 0usize;
    for (i, c) in text.char_indices() {
        match c {
            '(' => depth += 1,
            ')' if depth == 0 => return Some((&text[..i], &text[i + 1..])),
            ')' => depth -= 1,
            _ => {}
        }
    }
    None
}

/// Split a group on top-level commas
fn split_types(group: &str) -> Vec<String> {
    if group.trim().is_empty() {
        return Vec::new();
    }
    let mut types = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in group.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                types.push(group[start..i].trim().to_string());
                start = i + 1;
            }
            _ => {}
        }
    }
    types.push(group[start..].trim().to_string());
    types
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy::primitives::hex;

    #[test]
    fn test_split_groups() {
        let sig = Signature::parse("f(t1,t2)(r1)").unwrap();
        assert_eq!(sig.name, "f");
        assert_eq!(sig.argument_types, vec!["t1", "t2"]);
        assert_eq!(sig.return_types, vec!["r1"]);

        let sig = Signature::parse("f()(r1)").unwrap();
        assert!(sig.argument_types.is_empty());
        assert_eq!(sig.return_types, vec!["r1"]);

        let sig = Signature::parse("balanceOf(address, uint64)()").unwrap();
        assert_eq!(sig.argument_types, vec!["address", "uint64"]);
        assert!(sig.return_types.is_empty());
    }

    #[test]
    fn test_malformed() {
        for signature in ["f(uint256)", "f", "(uint256)(bool)", "f)(uint256)(bool)", "f(uint256)(bool"] {
            assert_eq!(
                Signature::parse(signature),
                Err(SignatureError::Malformed(signature.to_string())),
                "{signature}"
            );
        }
    }

    #[test]
    fn test_selector_ignores_returns() {
        let with_returns = Signature::parse("f(uint256)(bool)").unwrap();
        let without_returns = Signature::parse("f(uint256)()").unwrap();
        assert_eq!(with_returns.selector(), without_returns.selector());
    }

    #[test]
    fn test_known_selectors() {
        let sig = Signature::parse("transfer(address,uint256)(bool)").unwrap();
        assert_eq!(sig.selector(), Selector::from(hex!("a9059cbb")));

        let sig = Signature::parse("balanceOf(address)(uint256)").unwrap();
        assert_eq!(sig.selector(), Selector::from(hex!("70a08231")));

        // whitespace in the argument list does not change the canonical form
        let sig = Signature::parse("balanceOf(address, uint64)(int256)").unwrap();
        assert_eq!(sig.canonical(), "balanceOf(address,uint64)");
        assert_eq!(sig.selector(), Selector::from(hex!("8089452e")));
    }

    #[test]
    fn test_tuple_types_stay_whole() {
        let sig = Signature::parse("f((uint256,bool), address)((uint256,(bool,bytes32))[])").unwrap();
        assert_eq!(sig.argument_types, vec!["(uint256,bool)", "address"]);
        assert_eq!(sig.return_types, vec!["(uint256,(bool,bytes32))[]"]);
        assert_eq!(sig.canonical(), "f((uint256,bool),address)");

        let sig = Signature::parse("f()((uint256,bool))").unwrap();
        assert_eq!(sig.return_types, vec!["(uint256,bool)"]);

        // unbalanced tuple in the return group
        assert!(Signature::parse("f()((uint256,bool)").is_err());
    }

    #[test]
    fn test_type_aliases_are_expanded() {
        let alias = Signature::parse("balanceOf(uint)(uint)").unwrap();
        let full = Signature::parse("balanceOf(uint256)(uint256)").unwrap();
        assert_eq!(alias.canonical(), "balanceOf(uint256)");
        assert_eq!(alias.selector(), full.selector());

        let sig = Signature::parse("f(int, uint[2])()").unwrap();
        assert_eq!(sig.canonical(), "f(int256,uint256[2])");
    }
}
