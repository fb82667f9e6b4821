//! Decoding of event logs returned by the node's log-search RPC call.
//!
//! Raw entries carry their topics and data as hex strings plus an opaque
//! envelope of block/transaction identifiers. Decoding matches the first
//! topic against a table of known event signatures derived from contract
//! metadata; entries with unknown signatures pass through untouched so
//! callers can still inspect them.

use chaincall_common::abi::{Event, RawLog, Token};
use chaincall_common::contract::{Contract, ContractRegistry};
use chaincall_common::errors::AbiError;
use chaincall_common::str::{parse_h256, strip_hex_prefix, AddressHexExt};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use web3::types::{H256, U256};

/// A single raw entry of a log-search result: the topic words and data
/// payload as hex strings, with every other field of the entry (address,
/// block and transaction identifiers) passed through verbatim.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct RawLogEntry {
    /// The 32-byte topic words as hex strings; `topics[0]` conventionally
    /// carries the event signature hash.
    pub topics: Vec<String>,
    /// The concatenated non-indexed parameter words as a hex string.
    pub data: String,
    /// Remaining envelope fields, untouched by decoding.
    #[serde(flatten)]
    pub envelope: Map<String, Value>,
}

/// A table of event definitions keyed by signature hash, derived from
/// contract metadata. Owned by the caller and passed by reference into
/// each decode; never stored globally.
#[derive(Clone, Debug, Default)]
pub struct EventRegistry {
    events: HashMap<H256, Event>,
}

impl EventRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Default::default()
    }

    /// Build a registry from every event of the given contracts.
    /// Anonymous events carry no signature topic and are skipped.
    pub fn from_contracts<'a, I>(contracts: I) -> Self
    where
        I: IntoIterator<Item = &'a Contract>,
    {
        let mut registry = EventRegistry::new();
        for contract in contracts {
            for event in contract.abi.events.values() {
                registry.insert(event.clone());
            }
        }
        registry
    }

    /// Add an event definition, keyed by its signature hash.
    pub fn insert(&mut self, event: Event) {
        if !event.anonymous {
            self.events.insert(event.signature(), event);
        }
    }

    /// Look up the event matching a signature topic.
    pub fn get(&self, signature: &H256) -> Option<&Event> {
        self.events.get(signature)
    }

    /// The number of registered event definitions.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the registry holds no event definitions.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

/// A decoded event parameter, rendered as a JSON value: addresses and byte
/// sequences as `0x`-prefixed hex strings, integers as decimal strings.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DecodedParam {
    /// Declared parameter name.
    pub name: String,
    /// Decoded parameter value.
    pub value: Value,
}

/// A log entry resolved against a known event definition.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DecodedEvent {
    /// The resolved event name.
    pub event: String,
    /// Decoded parameters in declaration order.
    pub params: Vec<DecodedParam>,
    /// Envelope fields from the raw entry, carried through unchanged.
    #[serde(flatten)]
    pub envelope: Map<String, Value>,
}

/// Outcome of decoding a single raw log entry.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DecodedLog {
    /// The signature topic matched a known event definition.
    Event(DecodedEvent),
    /// The signature topic is not in the supplied table (or the entry has
    /// no topics); the raw entry passes through unchanged. This is an
    /// expected outcome when scanning logs emitted by unknown contracts,
    /// not an error.
    Unresolved(RawLogEntry),
}

impl DecodedLog {
    /// Get the decoded event, if the entry was resolved.
    pub fn as_event(&self) -> Option<&DecodedEvent> {
        match self {
            DecodedLog::Event(event) => Some(event),
            DecodedLog::Unresolved(_) => None,
        }
    }

    /// Whether the entry was resolved against a known event definition.
    pub fn is_resolved(&self) -> bool {
        matches!(self, DecodedLog::Event(_))
    }
}

/// Decode a single raw log entry against a table of known events.
///
/// Returns `DecodedLog::Unresolved` when the first topic is absent or not
/// in the table. Returns an error only for entries that match a known
/// event but cannot be decoded against it (malformed hex, topic count
/// mismatch, truncated data).
pub fn decode_log(entry: &RawLogEntry, registry: &EventRegistry) -> Result<DecodedLog, AbiError> {
    let signature = match entry.topics.first() {
        Some(topic) => parse_h256(topic)?,
        None => return Ok(DecodedLog::Unresolved(entry.clone())),
    };
    let event = match registry.get(&signature) {
        Some(event) => event,
        None => return Ok(DecodedLog::Unresolved(entry.clone())),
    };

    let topics = entry
        .topics
        .iter()
        .map(|topic| parse_h256(topic))
        .collect::<Result<Vec<_>, _>>()?;
    let data = hex::decode(strip_hex_prefix(&entry.data))?;
    let log = event.parse_log(RawLog { topics, data })?;

    Ok(DecodedLog::Event(DecodedEvent {
        event: event.name.clone(),
        params: log
            .params
            .into_iter()
            .map(|param| DecodedParam {
                name: param.name,
                value: token_to_value(&param.value),
            })
            .collect(),
        envelope: entry.envelope.clone(),
    }))
}

/// Decode a batch of raw log entries in input order.
///
/// Event definitions are derived from every contract in the supplied
/// metadata table. Each entry decodes independently: a malformed entry
/// yields an entry-level error without aborting the rest of the batch, and
/// unknown signatures pass through unresolved. With `remove_hex_prefix`
/// set, every decoded hexadecimal string field loses its `0x` marker in a
/// post-processing pass; envelope fields and unresolved entries are never
/// rewritten.
pub fn decode_search_logs(
    entries: &[RawLogEntry],
    contracts: &ContractRegistry,
    remove_hex_prefix: bool,
) -> Vec<Result<DecodedLog, AbiError>> {
    let registry = EventRegistry::from_contracts(contracts.values());
    entries
        .iter()
        .map(|entry| {
            let mut decoded = decode_log(entry, &registry)?;
            if remove_hex_prefix {
                if let DecodedLog::Event(event) = &mut decoded {
                    for param in &mut event.params {
                        strip_hex_prefixes(&mut param.value);
                    }
                }
            }
            Ok(decoded)
        })
        .collect()
}

/// Render a decoded token as a JSON value.
fn token_to_value(token: &Token) -> Value {
    match token {
        Token::Address(address) => Value::String(format!("0x{}", address.to_fixed_hex())),
        Token::FixedBytes(bytes) | Token::Bytes(bytes) => {
            Value::String(format!("0x{}", hex::encode(bytes)))
        }
        Token::Uint(value) => Value::String(value.to_string()),
        Token::Int(value) => Value::String(int_to_decimal(value)),
        Token::Bool(value) => Value::Bool(*value),
        Token::String(value) => Value::String(value.clone()),
        Token::FixedArray(tokens) | Token::Array(tokens) | Token::Tuple(tokens) => {
            Value::Array(tokens.iter().map(token_to_value).collect())
        }
    }
}

/// Render a raw two's-complement word as a signed decimal string.
fn int_to_decimal(raw: &U256) -> String {
    if raw.bit(255) {
        let magnitude = (!*raw).overflowing_add(U256::one()).0;
        format!("-{}", magnitude)
    } else {
        raw.to_string()
    }
}

/// Strip the `0x` marker from every string in a decoded value tree.
fn strip_hex_prefixes(value: &mut Value) {
    match value {
        Value::String(string) => {
            if let Some(stripped) = string.strip_prefix("0x") {
                *string = stripped.to_owned();
            }
        }
        Value::Array(values) => values.iter_mut().for_each(strip_hex_prefixes),
        _ => {}
    }
}
