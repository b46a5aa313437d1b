//! This module implements extensions to the `ethabi` API.

use crate::hash;
use ethabi::{Function, Param};

/// Extension trait for `ethabi::Function`.
pub trait FunctionExt {
    /// Compute the method signature in the standard ABI format, for example
    /// `transfer(address,uint256)`.
    fn canonical_signature(&self) -> String;

    /// Compute the Keccak256 function selector used by contract ABIs.
    fn selector(&self) -> [u8; 4];

    /// The canonical type strings of the function outputs.
    fn output_types(&self) -> Vec<String>;
}

impl FunctionExt for Function {
    fn canonical_signature(&self) -> String {
        format!("{}({})", self.name, canonical_types(&self.inputs).join(","))
    }

    fn selector(&self) -> [u8; 4] {
        hash::function_selector(self.canonical_signature())
    }

    fn output_types(&self) -> Vec<String> {
        canonical_types(&self.outputs)
    }
}

fn canonical_types(params: &[Param]) -> Vec<String> {
    params.iter().map(|param| param.kind.to_string()).collect()
}
