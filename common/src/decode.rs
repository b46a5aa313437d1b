//! Decoding of ABI encoded data into structured values, the equivalent of
//! Solidity's `abi.decode`.

use crate::address::to_checksum;
use crate::errors::AbiError;
use crate::int::I256;
use crate::signature::{
    base_param_type, param_type, parse_type, resolve_alias, split_top_level, TypeShape,
};
use ethabi::{ParamType, Token};
use web3::types::U256;

/// A decoded ABI value.
///
/// Mirrors the structure of the requested types. Addresses are always
/// rendered as EIP-55 checksummed strings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DecodedValue {
    /// A checksummed `0x` prefixed address.
    Address(String),
    /// An unsigned integer of any width.
    Uint(U256),
    /// A signed integer of any width.
    Int(I256),
    /// A boolean.
    Bool(bool),
    /// Dynamically sized bytes.
    Bytes(Vec<u8>),
    /// Fixed size bytes such as `bytes32`.
    FixedBytes(Vec<u8>),
    /// A UTF-8 string.
    String(String),
    /// A dynamically sized array.
    Array(Vec<DecodedValue>),
    /// A fixed size array.
    FixedArray(Vec<DecodedValue>),
    /// A tuple, also used for multiple top-level values.
    Tuple(Vec<DecodedValue>),
}

impl DecodedValue {
    /// The checksummed address if this value is an address.
    pub fn as_address(&self) -> Option<&str> {
        match self {
            DecodedValue::Address(address) => Some(address),
            _ => None,
        }
    }

    /// The integer if this value is an unsigned integer.
    pub fn as_uint(&self) -> Option<U256> {
        match self {
            DecodedValue::Uint(value) => Some(*value),
            _ => None,
        }
    }

    /// The integer if this value is a signed integer.
    pub fn as_int(&self) -> Option<I256> {
        match self {
            DecodedValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    /// The boolean if this value is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            DecodedValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// The raw bytes of a `bytes` or `bytesN` value.
    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            DecodedValue::Bytes(bytes) | DecodedValue::FixedBytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// The elements of an array or the members of a tuple.
    pub fn as_slice(&self) -> Option<&[DecodedValue]> {
        match self {
            DecodedValue::Array(values)
            | DecodedValue::FixedArray(values)
            | DecodedValue::Tuple(values) => Some(values),
            _ => None,
        }
    }
}

impl From<Token> for DecodedValue {
    fn from(token: Token) -> Self {
        match token {
            Token::Address(address) => DecodedValue::Address(to_checksum(&address)),
            Token::Uint(value) => DecodedValue::Uint(value),
            Token::Int(value) => DecodedValue::Int(I256::from_raw(value)),
            Token::Bool(value) => DecodedValue::Bool(value),
            Token::Bytes(bytes) => DecodedValue::Bytes(bytes),
            Token::FixedBytes(bytes) => DecodedValue::FixedBytes(bytes),
            Token::String(string) => DecodedValue::String(string),
            Token::Array(tokens) => DecodedValue::Array(tokens.into_iter().map(Self::from).collect()),
            Token::FixedArray(tokens) => {
                DecodedValue::FixedArray(tokens.into_iter().map(Self::from).collect())
            }
            Token::Tuple(tokens) => DecodedValue::Tuple(tokens.into_iter().map(Self::from).collect()),
        }
    }
}

/// Decode ABI encoded data according to a list of type signatures.
///
/// Type aliases are accepted. When exactly one type is requested the bare
/// value is returned, otherwise all values are returned as a
/// [`DecodedValue::Tuple`] in order. The number of types is not checked
/// against the data beyond what the ABI decoder itself validates.
///
/// ```
/// # use cheb3_common::decode::{decode_data, DecodedValue};
/// let data = [[0u8; 31].as_slice(), &[18]].concat();
/// assert_eq!(decode_data(data, &["uint8"]).unwrap(), DecodedValue::Uint(18.into()));
/// ```
pub fn decode_data<D, S>(data: D, types: &[S]) -> Result<DecodedValue, AbiError>
where
    D: AsRef<[u8]>,
    S: AsRef<str>,
{
    let param_types = types
        .iter()
        .map(|ty| param_type(ty.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;
    let tokens = ethabi::decode(&param_types, data.as_ref())?;

    let mut values = tokens
        .into_iter()
        .zip(types)
        .map(|(token, ty)| normalize(token, ty.as_ref()))
        .collect::<Result<Vec<_>, _>>()?;
    if values.len() == 1 {
        Ok(values.remove(0))
    } else {
        Ok(DecodedValue::Tuple(values))
    }
}

/// Same as [`decode_data`] for hex encoded data with an optional `0x` prefix.
pub fn decode_hex_data<S>(data: &str, types: &[S]) -> Result<DecodedValue, AbiError>
where
    S: AsRef<str>,
{
    let data = data.strip_prefix("0x").unwrap_or(data);
    decode_data(hex::decode(data)?, types)
}

/// Convert a decoded token into a value, walking the type it was decoded
/// with so that nested tuples are matched to their member types.
fn normalize(token: Token, ty: &str) -> Result<DecodedValue, AbiError> {
    let (shape, suffix) = parse_type(ty)?;
    if !suffix.is_empty() {
        let element = ty.rfind('[').map_or(ty, |i| &ty[..i]);
        return Ok(match token {
            Token::Array(tokens) => DecodedValue::Array(normalize_all(tokens, element)?),
            Token::FixedArray(tokens) => DecodedValue::FixedArray(normalize_all(tokens, element)?),
            token => DecodedValue::from(token),
        });
    }

    match (shape, token) {
        (TypeShape::Base(base), Token::Int(value)) => {
            let bits = match base_param_type(resolve_alias(base))? {
                ParamType::Int(bits) => bits,
                _ => 256,
            };
            Ok(DecodedValue::Int(I256::sign_extend(value, bits)))
        }
        (TypeShape::Tuple(members), Token::Tuple(tokens)) => {
            let members = split_top_level(members)?;
            let values = tokens
                .into_iter()
                .zip(members)
                .map(|(token, ty)| normalize(token, ty))
                .collect::<Result<_, _>>()?;
            Ok(DecodedValue::Tuple(values))
        }
        (_, token) => Ok(DecodedValue::from(token)),
    }
}

fn normalize_all(tokens: Vec<Token>, element: &str) -> Result<Vec<DecodedValue>, AbiError> {
    tokens
        .into_iter()
        .map(|token| normalize(token, element))
        .collect()
}
