//! ABI decoder.

use crate::abi::log::LogParam;
use crate::abi::param::Param;
use crate::abi::param_type::ParamType;
use crate::abi::token::Token;
use crate::errors::AbiError;
use web3::types::{Address, U256};

struct DecodeResult {
    token: Token,
    new_offset: usize,
}

fn decode_error<S>(reason: S) -> AbiError
where
    S: Into<String>,
{
    AbiError::Decode {
        name: String::new(),
        reason: reason.into(),
    }
}

fn peek_word(data: &[u8], offset: usize) -> Result<&[u8], AbiError> {
    let end = offset
        .checked_add(32)
        .filter(|end| *end <= data.len())
        .ok_or_else(|| decode_error("unexpected end of encoded data"))?;
    Ok(&data[offset..end])
}

/// Read a word as a byte offset or element count. Values above 2^64 cannot
/// describe a position in a real buffer and are rejected outright.
fn as_usize(word: &[u8]) -> Result<usize, AbiError> {
    if word[..24].iter().any(|byte| *byte != 0) {
        return Err(decode_error("offset or length word out of range"));
    }
    let mut buffer = [0u8; 8];
    buffer.copy_from_slice(&word[24..]);
    usize::try_from(u64::from_be_bytes(buffer))
        .map_err(|_| decode_error("offset or length word out of range"))
}

/// Resolve an offset word into the tail frame it points at.
fn tail_frame(data: &[u8], offset: usize) -> Result<&[u8], AbiError> {
    let start = as_usize(peek_word(data, offset)?)?;
    if start > data.len() {
        return Err(decode_error("offset points past end of encoded data"));
    }
    Ok(&data[start..])
}

/// Decode ABI-encoded data into tokens described by the given parameter
/// types. Errors are labeled with the position of the parameter that
/// failed to decode.
pub fn decode(types: &[ParamType], data: &[u8]) -> Result<Vec<Token>, AbiError> {
    let mut tokens = Vec::with_capacity(types.len());
    let mut offset = 0;
    for (index, kind) in types.iter().enumerate() {
        let result = decode_param(kind, data, offset)
            .map_err(|err| err.for_param(&index.to_string()))?;
        offset = result.new_offset;
        tokens.push(result.token);
    }
    Ok(tokens)
}

/// Decode ABI-encoded data against a named parameter list, producing
/// values in declaration order labeled with their parameter names.
pub fn decode_params(params: &[Param], data: &[u8]) -> Result<Vec<LogParam>, AbiError> {
    let types = params
        .iter()
        .map(|param| param.kind.clone())
        .collect::<Vec<_>>();
    let tokens = decode(&types, data).map_err(|err| {
        let declared = match &err {
            AbiError::Range { name, .. }
            | AbiError::Format { name, .. }
            | AbiError::Decode { name, .. } => name.parse::<usize>().ok(),
            AbiError::Hex(_) => None,
        }
        .and_then(|index| params.get(index))
        .filter(|param| !param.name.is_empty());
        match declared {
            Some(param) => err.for_param(&param.name),
            None => err,
        }
    })?;
    Ok(params
        .iter()
        .zip(tokens)
        .map(|(param, value)| LogParam {
            name: param.name.clone(),
            value,
        })
        .collect())
}

fn decode_param(kind: &ParamType, data: &[u8], offset: usize) -> Result<DecodeResult, AbiError> {
    match kind {
        ParamType::Address => {
            let word = peek_word(data, offset)?;
            Ok(DecodeResult {
                token: Token::Address(Address::from_slice(&word[12..])),
                new_offset: offset + 32,
            })
        }
        ParamType::Uint(_) => {
            let word = peek_word(data, offset)?;
            Ok(DecodeResult {
                token: Token::Uint(U256::from_big_endian(word)),
                new_offset: offset + 32,
            })
        }
        ParamType::Int(_) => {
            let word = peek_word(data, offset)?;
            Ok(DecodeResult {
                token: Token::Int(U256::from_big_endian(word)),
                new_offset: offset + 32,
            })
        }
        ParamType::Bool => {
            // Any nonzero word reads as true.
            let word = peek_word(data, offset)?;
            Ok(DecodeResult {
                token: Token::Bool(word.iter().any(|byte| *byte != 0)),
                new_offset: offset + 32,
            })
        }
        ParamType::FixedBytes(len) => {
            if *len > 32 {
                return Err(decode_error("fixed bytes length exceeds a word"));
            }
            let word = peek_word(data, offset)?;
            Ok(DecodeResult {
                token: Token::FixedBytes(word[..*len].to_vec()),
                new_offset: offset + 32,
            })
        }
        ParamType::Bytes => {
            let bytes = take_dynamic_bytes(data, offset)?;
            Ok(DecodeResult {
                token: Token::Bytes(bytes),
                new_offset: offset + 32,
            })
        }
        ParamType::String => {
            let bytes = take_dynamic_bytes(data, offset)?;
            let value = String::from_utf8(bytes)
                .map_err(|_| decode_error("string content is not valid UTF-8"))?;
            Ok(DecodeResult {
                token: Token::String(value),
                new_offset: offset + 32,
            })
        }
        ParamType::Array(element) => {
            let frame = tail_frame(data, offset)?;
            let len = as_usize(peek_word(frame, 0)?)?;
            let elements = &frame[32..];
            let mut tokens = Vec::new();
            let mut element_offset = 0;
            for _ in 0..len {
                let result = decode_param(element, elements, element_offset)?;
                element_offset = result.new_offset;
                tokens.push(result.token);
            }
            Ok(DecodeResult {
                token: Token::Array(tokens),
                new_offset: offset + 32,
            })
        }
        ParamType::FixedArray(element, len) => {
            if kind.is_dynamic() {
                let frame = tail_frame(data, offset)?;
                let mut tokens = Vec::with_capacity(*len);
                let mut element_offset = 0;
                for _ in 0..*len {
                    let result = decode_param(element, frame, element_offset)?;
                    element_offset = result.new_offset;
                    tokens.push(result.token);
                }
                Ok(DecodeResult {
                    token: Token::FixedArray(tokens),
                    new_offset: offset + 32,
                })
            } else {
                let mut tokens = Vec::with_capacity(*len);
                let mut new_offset = offset;
                for _ in 0..*len {
                    let result = decode_param(element, data, new_offset)?;
                    new_offset = result.new_offset;
                    tokens.push(result.token);
                }
                Ok(DecodeResult {
                    token: Token::FixedArray(tokens),
                    new_offset,
                })
            }
        }
        ParamType::Tuple(components) => {
            if kind.is_dynamic() {
                let frame = tail_frame(data, offset)?;
                let mut tokens = Vec::with_capacity(components.len());
                let mut component_offset = 0;
                for component in components {
                    let result = decode_param(component, frame, component_offset)?;
                    component_offset = result.new_offset;
                    tokens.push(result.token);
                }
                Ok(DecodeResult {
                    token: Token::Tuple(tokens),
                    new_offset: offset + 32,
                })
            } else {
                let mut tokens = Vec::with_capacity(components.len());
                let mut new_offset = offset;
                for component in components {
                    let result = decode_param(component, data, new_offset)?;
                    new_offset = result.new_offset;
                    tokens.push(result.token);
                }
                Ok(DecodeResult {
                    token: Token::Tuple(tokens),
                    new_offset,
                })
            }
        }
    }
}

fn take_dynamic_bytes(data: &[u8], offset: usize) -> Result<Vec<u8>, AbiError> {
    let frame = tail_frame(data, offset)?;
    let len = as_usize(peek_word(frame, 0)?)?;
    let end = len
        .checked_add(32)
        .filter(|end| *end <= frame.len())
        .ok_or_else(|| decode_error("length word points past end of encoded data"))?;
    // Padding after the content is ignored.
    Ok(frame[32..end].to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::abi::encoder::encode;

    fn decode_hex(types: &[ParamType], data: &str) -> Result<Vec<Token>, AbiError> {
        decode(types, &hex::decode(data).unwrap())
    }

    #[test]
    fn decode_uint_and_address() {
        let decoded = decode_hex(
            &[ParamType::Uint(256), ParamType::Address],
            "0000000000000000000000000000000000000000000000000000000000000001\
             0000000000000000000000001111111111111111111111111111111111111111",
        )
        .unwrap();
        assert_eq!(
            decoded,
            vec![
                Token::Uint(U256::one()),
                Token::Address(Address::repeat_byte(0x11)),
            ],
        );
    }

    #[test]
    fn decode_fixed_array_of_addresses() {
        let decoded = decode_hex(
            &[ParamType::FixedArray(Box::new(ParamType::Address), 2)],
            "0000000000000000000000001111111111111111111111111111111111111111\
             0000000000000000000000002222222222222222222222222222222222222222",
        )
        .unwrap();
        assert_eq!(
            decoded,
            vec![Token::FixedArray(vec![
                Token::Address(Address::repeat_byte(0x11)),
                Token::Address(Address::repeat_byte(0x22)),
            ])],
        );
    }

    #[test]
    fn decode_dynamic_array_of_addresses() {
        let decoded = decode_hex(
            &[ParamType::Array(Box::new(ParamType::Address))],
            "0000000000000000000000000000000000000000000000000000000000000020\
             0000000000000000000000000000000000000000000000000000000000000002\
             0000000000000000000000001111111111111111111111111111111111111111\
             0000000000000000000000002222222222222222222222222222222222222222",
        )
        .unwrap();
        assert_eq!(
            decoded,
            vec![Token::Array(vec![
                Token::Address(Address::repeat_byte(0x11)),
                Token::Address(Address::repeat_byte(0x22)),
            ])],
        );
    }

    #[test]
    fn decode_dynamic_array_of_dynamic_arrays() {
        let decoded = decode_hex(
            &[ParamType::Array(Box::new(ParamType::Array(Box::new(
                ParamType::Address,
            ))))],
            "0000000000000000000000000000000000000000000000000000000000000020\
             0000000000000000000000000000000000000000000000000000000000000002\
             0000000000000000000000000000000000000000000000000000000000000040\
             0000000000000000000000000000000000000000000000000000000000000080\
             0000000000000000000000000000000000000000000000000000000000000001\
             0000000000000000000000001111111111111111111111111111111111111111\
             0000000000000000000000000000000000000000000000000000000000000001\
             0000000000000000000000002222222222222222222222222222222222222222",
        )
        .unwrap();
        assert_eq!(
            decoded,
            vec![Token::Array(vec![
                Token::Array(vec![Token::Address(Address::repeat_byte(0x11))]),
                Token::Array(vec![Token::Address(Address::repeat_byte(0x22))]),
            ])],
        );
    }

    #[test]
    fn decode_bytes_ignores_padding() {
        let decoded = decode_hex(
            &[ParamType::Bytes],
            "0000000000000000000000000000000000000000000000000000000000000020\
             0000000000000000000000000000000000000000000000000000000000000002\
             1234000000000000000000000000000000000000000000000000000000000000",
        )
        .unwrap();
        assert_eq!(decoded, vec![Token::Bytes(vec![0x12, 0x34])]);
    }

    #[test]
    fn decode_two_bytes_values() {
        let decoded = decode_hex(
            &[ParamType::Bytes, ParamType::Bytes],
            "0000000000000000000000000000000000000000000000000000000000000040\
             0000000000000000000000000000000000000000000000000000000000000080\
             000000000000000000000000000000000000000000000000000000000000001f\
             1000000000000000000000000000000000000000000000000000000000000200\
             0000000000000000000000000000000000000000000000000000000000000020\
             0010000000000000000000000000000000000000000000000000000000000002",
        )
        .unwrap();
        assert_eq!(
            decoded,
            vec![
                Token::Bytes(
                    hex::decode(
                        "10000000000000000000000000000000000000000000000000000000000002"
                    )
                    .unwrap()
                ),
                Token::Bytes(
                    hex::decode(
                        "0010000000000000000000000000000000000000000000000000000000000002"
                    )
                    .unwrap()
                ),
            ],
        );
    }

    #[test]
    fn decode_string() {
        let decoded = decode_hex(
            &[ParamType::String],
            "0000000000000000000000000000000000000000000000000000000000000020\
             0000000000000000000000000000000000000000000000000000000000000009\
             6761766f66796f726b0000000000000000000000000000000000000000000000",
        )
        .unwrap();
        assert_eq!(decoded, vec![Token::String("gavofyork".to_owned())]);
    }

    #[test]
    fn decode_invalid_utf8_string() {
        let result = decode_hex(
            &[ParamType::String],
            "0000000000000000000000000000000000000000000000000000000000000020\
             0000000000000000000000000000000000000000000000000000000000000002\
             ff00000000000000000000000000000000000000000000000000000000000000",
        );
        assert!(matches!(result, Err(AbiError::Decode { .. })));
    }

    #[test]
    fn decode_empty_dynamic_array() {
        let decoded = decode_hex(
            &[ParamType::Array(Box::new(ParamType::Uint(256)))],
            "0000000000000000000000000000000000000000000000000000000000000020\
             0000000000000000000000000000000000000000000000000000000000000000",
        )
        .unwrap();
        assert_eq!(decoded, vec![Token::Array(vec![])]);
    }

    #[test]
    fn decode_nonzero_bool_word() {
        let decoded = decode_hex(
            &[ParamType::Bool],
            "00000000000000000000000000000000000000000000000000000000000000ff",
        )
        .unwrap();
        assert_eq!(decoded, vec![Token::Bool(true)]);
    }

    #[test]
    fn decode_rejects_truncated_head() {
        let result = decode_hex(
            &[ParamType::Uint(256), ParamType::Uint(256)],
            "0000000000000000000000000000000000000000000000000000000000000001",
        );
        assert!(matches!(result, Err(AbiError::Decode { .. })));
    }

    #[test]
    fn decode_rejects_offset_past_end() {
        let result = decode_hex(
            &[ParamType::Bytes],
            "00000000000000000000000000000000000000000000000000000000000000ff",
        );
        assert!(matches!(result, Err(AbiError::Decode { .. })));
    }

    #[test]
    fn decode_rejects_length_past_end() {
        let result = decode_hex(
            &[ParamType::Bytes],
            "0000000000000000000000000000000000000000000000000000000000000020\
             00000000000000000000000000000000000000000000000000000000000000ff",
        );
        assert!(matches!(result, Err(AbiError::Decode { .. })));
    }

    #[test]
    fn decode_error_reports_parameter_index() {
        let err = decode_hex(
            &[ParamType::Uint(256), ParamType::Bytes],
            "0000000000000000000000000000000000000000000000000000000000000001\
             00000000000000000000000000000000000000000000000000000000000000ff",
        )
        .unwrap_err();
        match err {
            AbiError::Decode { name, .. } => assert_eq!(name, "1"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn decode_named_parameters() {
        let params: Vec<Param> = serde_json::from_str(
            r#"[
                {"name": "value", "type": "uint256"},
                {"name": "owner", "type": "address"}
            ]"#,
        )
        .unwrap();
        let decoded = decode_params(
            &params,
            &hex::decode(
                "0000000000000000000000000000000000000000000000000000000000000001\
                 0000000000000000000000001111111111111111111111111111111111111111",
            )
            .unwrap(),
        )
        .unwrap();
        assert_eq!(
            decoded,
            vec![
                LogParam {
                    name: "value".to_owned(),
                    value: Token::Uint(U256::one()),
                },
                LogParam {
                    name: "owner".to_owned(),
                    value: Token::Address(Address::repeat_byte(0x11)),
                },
            ],
        );
    }

    #[test]
    fn decode_named_parameters_labels_errors() {
        let params: Vec<Param> = serde_json::from_str(
            r#"[
                {"name": "value", "type": "uint256"},
                {"name": "payload", "type": "bytes"}
            ]"#,
        )
        .unwrap();
        let err = decode_params(
            &params,
            &hex::decode(
                "0000000000000000000000000000000000000000000000000000000000000001\
                 00000000000000000000000000000000000000000000000000000000000000ff",
            )
            .unwrap(),
        )
        .unwrap_err();
        assert!(matches!(err, AbiError::Decode { name, .. } if name == "payload"));
    }

    #[test]
    fn composite_round_trip() {
        let tokens = vec![
            Token::Uint(U256::from(42)),
            Token::Array(vec![
                Token::Tuple(vec![Token::Bool(true), Token::String("a".to_owned())]),
                Token::Tuple(vec![Token::Bool(false), Token::String(String::new())]),
            ]),
            Token::FixedArray(vec![
                Token::Bytes(vec![1, 2, 3]),
                Token::Bytes(vec![]),
            ]),
            Token::Address(Address::repeat_byte(0x42)),
        ];
        let types = vec![
            ParamType::Uint(256),
            ParamType::Array(Box::new(ParamType::Tuple(vec![
                ParamType::Bool,
                ParamType::String,
            ]))),
            ParamType::FixedArray(Box::new(ParamType::Bytes), 2),
            ParamType::Address,
        ];
        let decoded = decode(&types, &encode(&tokens)).unwrap();
        assert_eq!(decoded, tokens);
    }
}
