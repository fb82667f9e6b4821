//! Module with runtime error types.

use chaincall_common::errors::AbiError;
use serde_json::Error as JsonError;
use thiserror::Error;
use web3::error::Error as Web3Error;

/// Error that can occur while executing a node RPC call.
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// An error occured in the underlying JSON-RPC transport.
    #[error("transport error: {0}")]
    Web3(#[from] Web3Error),

    /// The node returned a response that does not match the expected
    /// shape.
    #[error("unexpected response: {0}")]
    Json(#[from] JsonError),

    /// An error occured encoding call arguments or decoding call results.
    #[error("abi error: {0}")]
    Abi(#[from] AbiError),

    /// The node's VM reported an exception while executing a contract
    /// call.
    #[error("contract execution failed: {0}")]
    Failure(String),
}
