//! ABI encoder implementing the head/tail word layout.

use crate::abi::token::Token;

/// Encode an ordered sequence of tokens into the packed 32-byte-word
/// representation. Values are expected to have been validated against
/// their parameter types (see [`Token::validate`]); the encoding itself
/// cannot fail.
pub fn encode(tokens: &[Token]) -> Vec<u8> {
    encode_sequence(tokens)
}

fn pad_usize(value: usize) -> [u8; 32] {
    let mut word = [0u8; 32];
    word[24..].copy_from_slice(&(value as u64).to_be_bytes());
    word
}

fn pad_right(bytes: &[u8]) -> Vec<u8> {
    let mut padded = bytes.to_vec();
    padded.resize((bytes.len() + 31) / 32 * 32, 0);
    padded
}

fn encode_token(token: &Token) -> Vec<u8> {
    match token {
        Token::Address(address) => {
            let mut word = [0u8; 32];
            word[12..].copy_from_slice(address.as_bytes());
            word.to_vec()
        }
        Token::Uint(value) | Token::Int(value) => {
            let mut word = [0u8; 32];
            value.to_big_endian(&mut word);
            word.to_vec()
        }
        Token::Bool(value) => {
            let mut word = [0u8; 32];
            word[31] = *value as u8;
            word.to_vec()
        }
        Token::FixedBytes(bytes) => pad_right(bytes),
        Token::Bytes(bytes) => {
            let mut buffer = pad_usize(bytes.len()).to_vec();
            buffer.extend(pad_right(bytes));
            buffer
        }
        Token::String(value) => {
            let mut buffer = pad_usize(value.len()).to_vec();
            buffer.extend(pad_right(value.as_bytes()));
            buffer
        }
        Token::Array(tokens) => {
            let mut buffer = pad_usize(tokens.len()).to_vec();
            buffer.extend(encode_sequence(tokens));
            buffer
        }
        Token::FixedArray(tokens) | Token::Tuple(tokens) => encode_sequence(tokens),
    }
}

/// Encode a token sequence as a head region followed by a tail region.
/// Static values sit in the head directly; dynamic values leave a byte
/// offset in the head pointing at their encoding in the tail. Offsets are
/// measured from the start of the head region.
fn encode_sequence(tokens: &[Token]) -> Vec<u8> {
    let encoded = tokens
        .iter()
        .map(|token| (token.is_dynamic(), encode_token(token)))
        .collect::<Vec<_>>();

    let head_len = encoded
        .iter()
        .map(|(dynamic, bytes)| if *dynamic { 32 } else { bytes.len() })
        .sum::<usize>();

    let mut head = Vec::with_capacity(head_len);
    let mut tail = Vec::new();
    for (dynamic, bytes) in encoded {
        if dynamic {
            head.extend_from_slice(&pad_usize(head_len + tail.len()));
            tail.extend(bytes);
        } else {
            head.extend(bytes);
        }
    }

    head.extend(tail);
    head
}
