//! Runtime values crossing the ABI codec boundary.

use crate::abi::param_type::ParamType;
use crate::errors::AbiError;
use web3::types::{Address, U256};

/// A tagged runtime value, one variant per ABI type category. Values are
/// validated against their declared [`ParamType`] before encoding; the
/// codec never coerces between categories.
#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    /// A 20-byte address.
    Address(Address),
    /// A fixed-length byte sequence of 1 to 32 bytes.
    FixedBytes(Vec<u8>),
    /// A dynamically sized byte sequence.
    Bytes(Vec<u8>),
    /// A signed integer as its raw two's-complement 256-bit word.
    Int(U256),
    /// An unsigned integer.
    Uint(U256),
    /// A boolean.
    Bool(bool),
    /// A dynamically sized UTF-8 string.
    String(String),
    /// An array with a size fixed by its type.
    FixedArray(Vec<Token>),
    /// A dynamically sized array.
    Array(Vec<Token>),
    /// A tuple of heterogeneous values.
    Tuple(Vec<Token>),
}

impl Token {
    /// Returns true if the value encodes through an offset pointer into
    /// the tail region.
    pub fn is_dynamic(&self) -> bool {
        match self {
            Token::Bytes(_) | Token::String(_) | Token::Array(_) => true,
            Token::FixedArray(tokens) | Token::Tuple(tokens) => {
                tokens.iter().any(Token::is_dynamic)
            }
            _ => false,
        }
    }

    /// Check that the value matches the given parameter type and that
    /// numeric values fit the type's declared bit width. Shape mismatches
    /// report `Format`, out-of-width numerics report `Range`; the
    /// parameter label is filled in by the caller via
    /// [`AbiError::for_param`].
    pub fn validate(&self, kind: &ParamType) -> Result<(), AbiError> {
        let mismatch = || AbiError::Format {
            name: String::new(),
            expected: kind.to_string(),
        };
        let out_of_range = || AbiError::Range {
            name: String::new(),
            kind: kind.clone(),
        };

        match (self, kind) {
            (Token::Address(_), ParamType::Address)
            | (Token::Bool(_), ParamType::Bool)
            | (Token::Bytes(_), ParamType::Bytes)
            | (Token::String(_), ParamType::String) => Ok(()),
            (Token::Uint(value), ParamType::Uint(width)) => {
                if value.bits() > *width {
                    return Err(out_of_range());
                }
                Ok(())
            }
            (Token::Int(value), ParamType::Int(width)) => {
                // The raw word must already be sign-extended: every bit
                // above the declared width has to equal the sign bit.
                if *width < 256 {
                    let expected = if value.bit(width - 1) {
                        U256::MAX >> *width
                    } else {
                        U256::zero()
                    };
                    if *value >> *width != expected {
                        return Err(out_of_range());
                    }
                }
                Ok(())
            }
            (Token::FixedBytes(bytes), ParamType::FixedBytes(len)) => {
                if bytes.len() != *len {
                    return Err(mismatch());
                }
                Ok(())
            }
            (Token::Array(tokens), ParamType::Array(element)) => {
                for token in tokens {
                    token.validate(element)?;
                }
                Ok(())
            }
            (Token::FixedArray(tokens), ParamType::FixedArray(element, len)) => {
                if tokens.len() != *len {
                    return Err(mismatch());
                }
                for token in tokens {
                    token.validate(element)?;
                }
                Ok(())
            }
            (Token::Tuple(tokens), ParamType::Tuple(components)) => {
                if tokens.len() != components.len() {
                    return Err(mismatch());
                }
                for (token, component) in tokens.iter().zip(components) {
                    token.validate(component)?;
                }
                Ok(())
            }
            _ => Err(mismatch()),
        }
    }
}
