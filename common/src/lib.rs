#![deny(missing_docs, unsafe_code)]

//! Crate for common types shared between the `chaincall` runtime crate and
//! downstream consumers: the contract ABI codec, signature hashing, and
//! contract interface metadata.

pub mod abi;
pub mod contract;
pub mod errors;
pub mod hash;
pub mod str;

pub use crate::abi::{ParamType, Token};
pub use crate::contract::{Abi, Contract, ContractRegistry};
pub use crate::errors::AbiError;
pub use web3::types::{Address, H256, U256};
