//! Contract function call builder.

use crate::abi::decoder::decode;
use crate::abi::encoder::encode;
use crate::abi::param::Param;
use crate::abi::param_type::ParamType;
use crate::abi::signature::{canonical_signature, short_signature};
use crate::abi::token::Token;
use crate::errors::AbiError;
use serde::Deserialize;

/// A contract function specification.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Function {
    /// Function name.
    pub name: String,
    /// Function input parameters.
    #[serde(default)]
    pub inputs: Vec<Param>,
    /// Function output parameters.
    #[serde(default)]
    pub outputs: Vec<Param>,
    /// Whether the function is declared as read-only.
    #[serde(default)]
    pub constant: bool,
}

impl Function {
    fn input_param_types(&self) -> Vec<ParamType> {
        self.inputs.iter().map(|p| p.kind.clone()).collect()
    }

    fn output_param_types(&self) -> Vec<ParamType> {
        self.outputs.iter().map(|p| p.kind.clone()).collect()
    }

    /// Compute the method signature in the canonical ABI format.
    pub fn signature(&self) -> String {
        canonical_signature(&self.name, &self.input_param_types())
    }

    /// Compute the 4-byte selector identifying this function.
    pub fn selector(&self) -> [u8; 4] {
        short_signature(&self.name, &self.input_param_types())
    }

    /// Validate the given arguments against the declared inputs and encode
    /// them into calldata, selector first.
    pub fn encode_input(&self, tokens: &[Token]) -> Result<Vec<u8>, AbiError> {
        if tokens.len() != self.inputs.len() {
            return Err(AbiError::Format {
                name: self.name.clone(),
                expected: format!(
                    "{} arguments, got {}",
                    self.inputs.len(),
                    tokens.len()
                ),
            });
        }
        for (index, (token, param)) in tokens.iter().zip(&self.inputs).enumerate() {
            let label = if param.name.is_empty() {
                index.to_string()
            } else {
                param.name.clone()
            };
            token
                .validate(&param.kind)
                .map_err(|err| err.for_param(&label))?;
        }

        let mut data = self.selector().to_vec();
        data.extend(encode(tokens));
        Ok(data)
    }

    /// Decode a call result against the declared outputs.
    pub fn decode_output(&self, data: &[u8]) -> Result<Vec<Token>, AbiError> {
        decode(&self.output_param_types(), data)
    }
}
