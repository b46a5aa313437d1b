#![deny(missing_docs, unsafe_code)]

//! Crate for the pure ABI utilities shared by the `cheb3` runtime: parsing of
//! human-written function signatures (with type aliases and nested tuples),
//! calldata encoding, return data decoding and `CREATE`/`CREATE2` address
//! derivation. Nothing in here performs I/O except loading compiled artifacts
//! from disk.

pub mod abiext;
pub mod address;
pub mod artifact;
pub mod decode;
pub mod encode;
pub mod errors;
pub mod hash;
pub mod int;
pub mod signature;

pub use crate::abiext::FunctionExt;
pub use crate::address::{calc_create2_address, calc_create_address, parse_address, to_checksum};
pub use crate::artifact::{load_compiled, CompiledContract, DEFAULT_BASE_PATH};
pub use crate::decode::{decode_data, decode_hex_data, DecodedValue};
pub use crate::encode::{encode_with_signature, encode_with_signature_hex};
pub use crate::errors::AbiError;
pub use crate::int::I256;
pub use crate::signature::ResolvedSignature;
pub use ethabi::{self as abi, Contract as Abi};
pub use web3::types::{Address, Bytes, U256};
