//! Contract interface metadata.

use crate::abi::{Event, Function};
use crate::errors::MetadataError;
use serde::{Deserialize, Deserializer};
use std::collections::BTreeMap;
use std::io::Read;

/// A contract interface: its functions and events keyed by name.
/// Deserializes from the standard JSON ABI array; entries that are neither
/// functions nor events (constructors, fallbacks) are skipped.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Abi {
    /// Contract functions by name.
    pub functions: BTreeMap<String, Function>,
    /// Contract events by name.
    pub events: BTreeMap<String, Event>,
}

impl Abi {
    /// Get the function with the given name, if any.
    pub fn function(&self, name: &str) -> Option<&Function> {
        self.functions.get(name)
    }

    /// Get the event with the given name, if any.
    pub fn event(&self, name: &str) -> Option<&Event> {
        self.events.get(name)
    }
}

impl<'de> Deserialize<'de> for Abi {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let operations = Vec::<Operation>::deserialize(deserializer)?;

        let mut abi = Abi::default();
        for operation in operations {
            match operation {
                Operation::Function(function) => {
                    abi.functions.insert(function.name.clone(), function);
                }
                Operation::Event(event) => {
                    abi.events.insert(event.name.clone(), event);
                }
                Operation::Other => {}
            }
        }
        Ok(abi)
    }
}

/// A single entry of a JSON ABI array, dispatched on its `type` tag.
#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
enum Operation {
    Function(Function),
    Event(Event),
    #[serde(other)]
    Other,
}

/// Metadata describing a contract: its name, interface, and optionally the
/// address it is deployed at.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Contract {
    /// The contract name. Unnamed contracts have an empty string as their
    /// name.
    #[serde(rename = "contractName", alias = "name", default)]
    pub name: String,
    /// The contract interface.
    pub abi: Abi,
    /// The address the contract is deployed at, as a hex string.
    #[serde(default)]
    pub address: Option<String>,
}

impl Contract {
    /// Parse contract metadata from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self, MetadataError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load contract metadata from a JSON reader.
    pub fn load<R>(reader: R) -> Result<Self, MetadataError>
    where
        R: Read,
    {
        Ok(serde_json::from_reader(reader)?)
    }
}

/// A caller-owned table of contract metadata, keyed by contract name or
/// address. The key is opaque to this library; decoding derives event
/// definitions from every entry's interface.
pub type ContractRegistry = BTreeMap<String, Contract>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abi::ParamType;

    const TOKEN_METADATA: &str = r#"{
        "contractName": "Token",
        "address": "9fac3b52be975567103c4695a2835bba40076da1",
        "abi": [
            {
                "type": "constructor",
                "inputs": [{"name": "supply", "type": "uint256"}]
            },
            {
                "type": "function",
                "name": "transfer",
                "inputs": [
                    {"name": "to", "type": "address"},
                    {"name": "value", "type": "uint256"}
                ],
                "outputs": [{"name": "", "type": "bool"}]
            },
            {
                "type": "event",
                "name": "Transfer",
                "inputs": [
                    {"name": "from", "type": "address", "indexed": true},
                    {"name": "to", "type": "address", "indexed": true},
                    {"name": "value", "type": "uint256", "indexed": false}
                ],
                "anonymous": false
            }
        ]
    }"#;

    #[test]
    fn loads_contract_metadata() {
        let contract = Contract::from_json(TOKEN_METADATA).unwrap();
        assert_eq!(contract.name, "Token");
        assert_eq!(
            contract.address.as_deref(),
            Some("9fac3b52be975567103c4695a2835bba40076da1"),
        );

        let transfer = contract.abi.function("transfer").unwrap();
        assert_eq!(transfer.inputs.len(), 2);
        assert_eq!(transfer.inputs[1].kind, ParamType::Uint(256));

        let event = contract.abi.event("Transfer").unwrap();
        assert_eq!(event.inputs.len(), 3);
        assert!(event.inputs[0].indexed);
        assert!(!event.inputs[2].indexed);
    }

    #[test]
    fn skips_non_interface_operations() {
        let contract = Contract::from_json(TOKEN_METADATA).unwrap();
        assert_eq!(contract.abi.functions.len(), 1);
        assert_eq!(contract.abi.events.len(), 1);
    }
}
