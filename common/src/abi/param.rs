//! Function and event parameter descriptions.

use crate::abi::param_type::ParamType;
use crate::errors::ParseParamTypeError;
use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer};

/// A function input or output parameter.
#[derive(Clone, Debug, PartialEq)]
pub struct Param {
    /// Parameter name; empty for unnamed parameters.
    pub name: String,
    /// Parameter type.
    pub kind: ParamType,
}

impl<'de> Deserialize<'de> for Param {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = RawParam::deserialize(deserializer)?;
        let kind = raw.resolve().map_err(DeError::custom)?;
        Ok(Param {
            name: raw.name,
            kind,
        })
    }
}

/// The JSON wire form of a parameter, shared between function and event
/// parameters. Tuple types carry their component types in `components`
/// instead of in the type descriptor itself.
#[derive(Clone, Debug, Deserialize)]
pub(crate) struct RawParam {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub components: Vec<RawParam>,
    #[serde(default)]
    pub indexed: bool,
}

impl RawParam {
    /// Resolve the described type, expanding `tuple` descriptors from
    /// their components.
    pub fn resolve(&self) -> Result<ParamType, ParseParamTypeError> {
        if let Some(suffix) = self.kind.strip_prefix("tuple") {
            let components = self
                .components
                .iter()
                .map(RawParam::resolve)
                .collect::<Result<Vec<_>, _>>()?;
            return apply_array_suffixes(ParamType::Tuple(components), suffix, &self.kind);
        }
        ParamType::parse(&self.kind)
    }
}

fn apply_array_suffixes(
    base: ParamType,
    suffixes: &str,
    descriptor: &str,
) -> Result<ParamType, ParseParamTypeError> {
    let invalid = || ParseParamTypeError(descriptor.to_owned());

    let mut kind = base;
    let mut rest = suffixes;
    while !rest.is_empty() {
        let inner = rest
            .strip_prefix('[')
            .ok_or_else(invalid)?;
        let close = inner.find(']').ok_or_else(invalid)?;
        let len = &inner[..close];
        kind = if len.is_empty() {
            ParamType::Array(Box::new(kind))
        } else {
            ParamType::FixedArray(Box::new(kind), len.parse().map_err(|_| invalid())?)
        };
        rest = &inner[close + 1..];
    }
    Ok(kind)
}
