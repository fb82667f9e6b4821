//! Contract event specification and log parsing.

use crate::abi::decoder::decode;
use crate::abi::log::{Log, LogParam, RawLog};
use crate::abi::param::RawParam;
use crate::abi::param_type::ParamType;
use crate::abi::signature::long_signature;
use crate::errors::AbiError;
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer};
use web3::types::H256;

/// A single event parameter.
#[derive(Clone, Debug, PartialEq)]
pub struct EventParam {
    /// Parameter name.
    pub name: String,
    /// Parameter type.
    pub kind: ParamType,
    /// Whether the parameter is emitted as a log topic rather than as part
    /// of the data payload.
    pub indexed: bool,
}

impl<'de> Deserialize<'de> for EventParam {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawParam::deserialize(deserializer)?;
        let kind = raw.resolve().map_err(DeError::custom)?;
        Ok(EventParam {
            name: raw.name,
            kind,
            indexed: raw.indexed,
        })
    }
}

/// A contract event specification.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Event {
    /// Event name.
    pub name: String,
    /// Event parameters.
    pub inputs: Vec<EventParam>,
    /// Whether the event omits its signature hash from `topics[0]`.
    #[serde(default)]
    pub anonymous: bool,
}

impl Event {
    fn param_types(&self) -> Vec<ParamType> {
        self.inputs.iter().map(|p| p.kind.clone()).collect()
    }

    fn indexed_params(&self, indexed: bool) -> Vec<&EventParam> {
        self.inputs
            .iter()
            .filter(|p| p.indexed == indexed)
            .collect()
    }

    /// The 32-byte hash of the canonical event signature, emitted as
    /// `topics[0]` for non-anonymous events.
    pub fn signature(&self) -> H256 {
        H256::from(long_signature(&self.name, &self.param_types()))
    }

    /// Parse a raw log against this event specification, producing named
    /// parameters in declaration order.
    ///
    /// Indexed parameters decode one topic word each. For dynamically
    /// sized indexed types (`string`, `bytes`, arrays, tuples) the topic
    /// carries only the hash of the encoded value, so the decoded
    /// parameter is that 32-byte commitment rather than the original
    /// content.
    pub fn parse_log(&self, log: RawLog) -> Result<Log, AbiError> {
        let topic_params = self.indexed_params(true);
        let data_params = self.indexed_params(false);

        let to_skip = if self.anonymous {
            0
        } else {
            let signature = log.topics.first().ok_or_else(|| AbiError::Decode {
                name: self.name.clone(),
                reason: "log has no signature topic".into(),
            })?;
            if *signature != self.signature() {
                return Err(AbiError::Decode {
                    name: self.name.clone(),
                    reason: "signature topic does not match event".into(),
                });
            }
            1
        };

        if log.topics.len() - to_skip != topic_params.len() {
            return Err(AbiError::Decode {
                name: self.name.clone(),
                reason: format!(
                    "log carries {} topics, event declares {} indexed parameters",
                    log.topics.len() - to_skip,
                    topic_params.len()
                ),
            });
        }

        let mut topic_tokens = Vec::with_capacity(topic_params.len());
        for (topic, param) in log.topics[to_skip..].iter().zip(&topic_params) {
            let token = decode(&[topic_kind(&param.kind)], topic.as_bytes())
                .map_err(|err| err.for_param(&param.name))?
                .remove(0);
            topic_tokens.push(token);
        }

        let data_types = data_params
            .iter()
            .map(|p| p.kind.clone())
            .collect::<Vec<_>>();
        let data_tokens =
            decode(&data_types, &log.data).map_err(|err| relabel(err, &data_params))?;

        let mut params = Vec::with_capacity(self.inputs.len());
        let mut topic_tokens = topic_tokens.into_iter();
        let mut data_tokens = data_tokens.into_iter();
        for param in &self.inputs {
            let value = if param.indexed {
                topic_tokens.next()
            } else {
                data_tokens.next()
            };
            let value = value.ok_or_else(|| AbiError::Decode {
                name: param.name.clone(),
                reason: "missing decoded value".into(),
            })?;
            params.push(LogParam {
                name: param.name.clone(),
                value,
            });
        }

        Ok(Log { params })
    }
}

/// The type a topic word decodes as. Value types decode directly; anything
/// else is emitted as the hash of its encoding.
fn topic_kind(kind: &ParamType) -> ParamType {
    match kind {
        ParamType::Address
        | ParamType::Uint(_)
        | ParamType::Int(_)
        | ParamType::Bool
        | ParamType::FixedBytes(_) => kind.clone(),
        _ => ParamType::FixedBytes(32),
    }
}

/// Upgrade a positional decode label to the declared parameter name.
fn relabel(err: AbiError, params: &[&EventParam]) -> AbiError {
    let index = match &err {
        AbiError::Range { name, .. }
        | AbiError::Format { name, .. }
        | AbiError::Decode { name, .. } => name.parse::<usize>().ok(),
        AbiError::Hex(_) => None,
    };
    match index.and_then(|index| params.get(index)) {
        Some(param) => err.for_param(&param.name),
        None => err,
    }
}
