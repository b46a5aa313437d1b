//! Module with common error types.

use ethabi::Error as EthabiError;
use hex::FromHexError;
use serde_json::Error as JsonError;
use std::io::Error as IoError;
use thiserror::Error;

/// An error parsing a signature, encoding calldata or decoding return data.
#[derive(Debug, Error)]
pub enum AbiError {
    /// Parentheses or brackets of a type signature are not balanced, or a
    /// component of the signature is empty.
    #[error("malformed type signature '{0}'")]
    MalformedSignature(String),

    /// The number of supplied arguments does not match the number of
    /// top-level parameter types of the signature.
    #[error("supplied parameters do not match the signature: expected {expected}, got {actual}")]
    MismatchedArity {
        /// Number of parameter types in the signature.
        expected: usize,
        /// Number of supplied arguments.
        actual: usize,
    },

    /// A type name is not part of the ABI type grammar (`InvalidName`), an
    /// argument does not fit its type (`InvalidData`), or the underlying ABI
    /// primitive failed to decode data.
    #[error("ABI error: {0}")]
    Abi(#[from] EthabiError),

    /// Hex encoded input could not be decoded.
    #[error("invalid hex data: {0}")]
    InvalidHex(#[from] FromHexError),

    /// An address was not exactly 20 bytes long.
    #[error("invalid address length {0}, expected 20 bytes")]
    InvalidAddressLength(usize),
}

/// An error loading a compiled contract artifact.
#[derive(Debug, Error)]
pub enum ArtifactError {
    /// An IO error occurred when loading an artifact from disk.
    #[error("failed to open contract artifact file: {0}")]
    Io(#[from] IoError),

    /// A JSON error occurred while parsing an artifact.
    #[error("failed to parse contract artifact JSON: {0}")]
    Json(#[from] JsonError),

    /// The artifact bytecode is not valid hex, for example because it still
    /// contains unlinked library placeholders.
    #[error("invalid artifact bytecode: {0}")]
    Bytecode(#[from] FromHexError),
}
