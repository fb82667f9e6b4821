//! Raw and decoded event log value types.

use crate::abi::token::Token;
use web3::types::H256;

/// Raw topics and data for a contract event.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RawLog {
    /// The raw 32-byte topic words; `topics[0]` conventionally carries the
    /// event signature hash.
    pub topics: Vec<H256>,
    /// The raw non-indexed parameter data.
    pub data: Vec<u8>,
}

impl From<(Vec<H256>, Vec<u8>)> for RawLog {
    fn from((topics, data): (Vec<H256>, Vec<u8>)) -> Self {
        RawLog { topics, data }
    }
}

/// A decoded event parameter.
#[derive(Clone, Debug, PartialEq)]
pub struct LogParam {
    /// Declared parameter name.
    pub name: String,
    /// Decoded parameter value.
    pub value: Token,
}

/// A decoded event log, parameters in declaration order.
#[derive(Clone, Debug, PartialEq)]
pub struct Log {
    /// The decoded log parameters.
    pub params: Vec<LogParam>,
}
