//! Function and event parameter types.

use crate::errors::ParseParamTypeError;
use lazy_static::lazy_static;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::RwLock;

/// A parameter type of a contract function or event.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParamType {
    /// A 20-byte account or contract address.
    Address,
    /// Dynamically sized byte sequence.
    Bytes,
    /// Signed integer of the given bit width.
    Int(usize),
    /// Unsigned integer of the given bit width.
    Uint(usize),
    /// Boolean.
    Bool,
    /// Dynamically sized UTF-8 string.
    String,
    /// Array of unknown size.
    Array(Box<ParamType>),
    /// Byte sequence with fixed size of 1 to 32 bytes.
    FixedBytes(usize),
    /// Array with fixed size.
    FixedArray(Box<ParamType>, usize),
    /// Tuple of heterogeneous component types.
    Tuple(Vec<ParamType>),
}

impl ParamType {
    /// Returns true if the type is encoded through an offset pointer into
    /// the tail region rather than in place.
    pub fn is_dynamic(&self) -> bool {
        match self {
            ParamType::Bytes | ParamType::String | ParamType::Array(_) => true,
            ParamType::FixedArray(element, _) => element.is_dynamic(),
            ParamType::Tuple(components) => components.iter().any(ParamType::is_dynamic),
            _ => false,
        }
    }

    /// Parse a type descriptor string, memoizing the result per distinct
    /// descriptor. Parsing is pure, so the cache is an optimization only.
    pub fn parse(descriptor: &str) -> Result<ParamType, ParseParamTypeError> {
        if let Some(kind) = PARSED.read().unwrap().get(descriptor) {
            return Ok(kind.clone());
        }
        let kind = descriptor.parse::<ParamType>()?;
        PARSED
            .write()
            .unwrap()
            .insert(descriptor.to_owned(), kind.clone());
        Ok(kind)
    }
}

lazy_static! {
    static ref PARSED: RwLock<HashMap<String, ParamType>> = RwLock::new(HashMap::new());
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            ParamType::Address => f.write_str("address"),
            ParamType::Bytes => f.write_str("bytes"),
            ParamType::Int(width) => write!(f, "int{}", width),
            ParamType::Uint(width) => write!(f, "uint{}", width),
            ParamType::Bool => f.write_str("bool"),
            ParamType::String => f.write_str("string"),
            ParamType::Array(element) => write!(f, "{}[]", element),
            ParamType::FixedBytes(len) => write!(f, "bytes{}", len),
            ParamType::FixedArray(element, len) => write!(f, "{}[{}]", element, len),
            ParamType::Tuple(components) => {
                let components = components
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(",");
                write!(f, "({})", components)
            }
        }
    }
}

impl FromStr for ParamType {
    type Err = ParseParamTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseParamTypeError(s.to_owned());

        // Array suffixes bind last: `uint8[2][]` is an unsized array of
        // `uint8[2]`.
        if let Some(stripped) = s.strip_suffix(']') {
            let open = stripped.rfind('[').ok_or_else(invalid)?;
            let element = stripped[..open].parse()?;
            let len = &stripped[open + 1..];
            return if len.is_empty() {
                Ok(ParamType::Array(Box::new(element)))
            } else {
                let len = len.parse().map_err(|_| invalid())?;
                Ok(ParamType::FixedArray(Box::new(element), len))
            };
        }

        if let Some(inner) = s.strip_prefix('(').and_then(|s| s.strip_suffix(')')) {
            let components = split_components(inner)
                .ok_or_else(invalid)?
                .into_iter()
                .map(str::parse)
                .collect::<Result<Vec<_>, _>>()?;
            return Ok(ParamType::Tuple(components));
        }

        match s {
            "address" => Ok(ParamType::Address),
            "bytes" => Ok(ParamType::Bytes),
            "bool" => Ok(ParamType::Bool),
            "string" => Ok(ParamType::String),
            // Unsized `uint`/`int` normalize to their canonical 256-bit form.
            "uint" => Ok(ParamType::Uint(256)),
            "int" => Ok(ParamType::Int(256)),
            _ => {
                if let Some(width) = s.strip_prefix("uint") {
                    let width = parse_int_width(width).ok_or_else(invalid)?;
                    Ok(ParamType::Uint(width))
                } else if let Some(width) = s.strip_prefix("int") {
                    let width = parse_int_width(width).ok_or_else(invalid)?;
                    Ok(ParamType::Int(width))
                } else if let Some(len) = s.strip_prefix("bytes") {
                    let len = len.parse().ok().filter(|len| (1..=32).contains(len));
                    Ok(ParamType::FixedBytes(len.ok_or_else(invalid)?))
                } else {
                    Err(invalid())
                }
            }
        }
    }
}

fn parse_int_width(s: &str) -> Option<usize> {
    let width = s.parse().ok()?;
    if (8..=256).contains(&width) && width % 8 == 0 {
        Some(width)
    } else {
        None
    }
}

/// Split a tuple body on top-level commas, leaving nested tuple and array
/// brackets intact. Returns `None` when brackets are unbalanced.
fn split_components(s: &str) -> Option<Vec<&str>> {
    if s.is_empty() {
        return Some(Vec::new());
    }

    let mut components = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (index, c) in s.char_indices() {
        match c {
            '(' | '[' => depth += 1,
            ')' | ']' => depth = depth.checked_sub(1)?,
            ',' if depth == 0 => {
                components.push(&s[start..index]);
                start = index + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return None;
    }
    components.push(&s[start..]);
    Some(components)
}
