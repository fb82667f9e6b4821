//! Implementation of the contract ABI: type descriptors, runtime values,
//! the word-packed encoding, and event log decoding.

mod decoder;
mod encoder;
mod event;
mod function;
mod log;
mod param;
mod param_type;
mod signature;
mod token;

pub use self::decoder::{decode, decode_params};
pub use self::encoder::encode;
pub use self::event::{Event, EventParam};
pub use self::function::Function;
pub use self::log::{Log, LogParam, RawLog};
pub use self::param::Param;
pub use self::param_type::ParamType;
pub use self::signature::{canonical_signature, long_signature, short_signature};
pub use self::token::Token;
