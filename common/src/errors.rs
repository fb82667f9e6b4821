//! Module with common error types.

use crate::abi::ParamType;
use hex::FromHexError;
use serde_json::Error as JsonError;
use std::io::Error as IoError;
use thiserror::Error;

/// An error representing an invalid parameter type descriptor.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("'{0}' is not a valid ABI type descriptor")]
pub struct ParseParamTypeError(pub String);

/// An error encoding or decoding ABI data.
///
/// Every variant except `Hex` carries the name (or positional index,
/// rendered as a string) of the parameter that failed, so callers can
/// report which field of a call or event could not be translated.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum AbiError {
    /// A numeric value does not fit within the bit width declared by its
    /// parameter type.
    #[error("parameter `{name}`: value out of range for {kind}")]
    Range {
        /// Name or index of the offending parameter.
        name: String,
        /// The declared parameter type.
        kind: ParamType,
    },

    /// A value does not structurally match its declared parameter type.
    #[error("parameter `{name}`: expected {expected}")]
    Format {
        /// Name or index of the offending parameter.
        name: String,
        /// Description of the expected value shape.
        expected: String,
    },

    /// Raw hexadecimal input could not be parsed.
    #[error("invalid hex input: {0}")]
    Hex(#[from] FromHexError),

    /// Encoded data does not decode against the supplied schema.
    #[error("parameter `{name}`: {reason}")]
    Decode {
        /// Name or index of the offending parameter.
        name: String,
        /// Why the data could not be decoded.
        reason: String,
    },
}

impl AbiError {
    /// Replace the parameter label carried by this error. Used by layers
    /// that know the declared parameter name to upgrade positional labels.
    pub fn for_param(self, param: &str) -> Self {
        match self {
            AbiError::Range { kind, .. } => AbiError::Range {
                name: param.to_owned(),
                kind,
            },
            AbiError::Format { expected, .. } => AbiError::Format {
                name: param.to_owned(),
                expected,
            },
            AbiError::Decode { reason, .. } => AbiError::Decode {
                name: param.to_owned(),
                reason,
            },
            hex @ AbiError::Hex(_) => hex,
        }
    }
}

/// An error loading or parsing contract metadata.
#[derive(Debug, Error)]
pub enum MetadataError {
    /// An IO error occurred when reading contract metadata.
    #[error("failed to open contract metadata: {0}")]
    Io(#[from] IoError),

    /// A JSON error occurred while parsing contract metadata.
    #[error("failed to parse contract metadata JSON: {0}")]
    Json(#[from] JsonError),
}
