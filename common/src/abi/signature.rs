//! Canonical type signatures and their hashes.

use crate::abi::param_type::ParamType;
use crate::hash;

/// Build the canonical signature string `name(type1,type2,...)`. Parameter
/// types render in their canonical form, so `uint` inputs appear as
/// `uint256` and tuple components as `(t1,t2)`.
pub fn canonical_signature(name: &str, params: &[ParamType]) -> String {
    let types = params
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(",");
    format!("{}({})", name, types)
}

/// Compute the 4-byte selector identifying a function call.
pub fn short_signature(name: &str, params: &[ParamType]) -> [u8; 4] {
    hash::function_selector(canonical_signature(name, params))
}

/// Compute the full 32-byte hash identifying an event signature.
pub fn long_signature(name: &str, params: &[ParamType]) -> [u8; 32] {
    hash::keccak256(canonical_signature(name, params))
}
