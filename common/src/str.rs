//! Implementation of string utilities for the hexadecimal wire format.

use crate::errors::AbiError;
use hex::FromHexError;
use web3::types::{Address, H256};

/// Remove a leading `0x` marker from a hex string, if present. Node
/// responses are inconsistent about the prefix, so every parse site goes
/// through here.
pub fn strip_hex_prefix(value: &str) -> &str {
    value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value)
}

/// Parse a 32-byte word from a hex string with an optional `0x` prefix.
pub fn parse_h256(value: &str) -> Result<H256, AbiError> {
    let bytes = hex::decode(strip_hex_prefix(value))?;
    if bytes.len() != 32 {
        return Err(AbiError::Hex(FromHexError::InvalidStringLength));
    }
    Ok(H256::from_slice(&bytes))
}

/// Parse a 20-byte address from a hex string with an optional `0x` prefix.
pub fn parse_address(value: &str) -> Result<Address, AbiError> {
    let bytes = hex::decode(strip_hex_prefix(value))?;
    if bytes.len() != 20 {
        return Err(AbiError::Format {
            name: String::new(),
            expected: "a 20-byte address".to_owned(),
        });
    }
    Ok(Address::from_slice(&bytes))
}

/// Extension trait for converting an `Address` into a hex string
/// implementation.
pub trait AddressHexExt {
    /// Convert an address into a 40 character representation.
    fn to_fixed_hex(&self) -> String;
}

impl AddressHexExt for Address {
    fn to_fixed_hex(&self) -> String {
        format!("{:040x}", self)
    }
}
