//! Parsing of human-written ABI type signatures.
//!
//! Signatures follow the grammar
//! `BASE | '(' TYPE (',' TYPE)* ')' | TYPE '[' N? ']'` without any whitespace.
//! Type aliases such as `uint` are resolved to their canonical names so that
//! the resulting signature can be hashed into a function selector.

use crate::errors::AbiError;
use crate::hash;
use ethabi::{Error as EthabiError, ParamType};
use std::fmt::{self, Display, Formatter};

/// Shorthand type names and the canonical names they stand for.
const TYPE_ALIASES: &[(&str, &str)] = &[("uint", "uint256"), ("int", "int256")];

/// Resolve a base type alias to its canonical name. Unknown names, including
/// invalid ones, are returned unchanged; they are rejected once the type is
/// turned into a [`ParamType`].
pub fn resolve_alias(base: &str) -> &str {
    TYPE_ALIASES
        .iter()
        .find(|(alias, _)| *alias == base)
        .map(|(_, canonical)| *canonical)
        .unwrap_or(base)
}

/// Split a comma separated type list into its top-level types, leaving commas
/// nested inside tuples alone.
///
/// ```
/// # use cheb3_common::signature::split_top_level;
/// let types = split_top_level("uint256,(address,uint)[],bytes32").unwrap();
/// assert_eq!(types, ["uint256", "(address,uint)[]", "bytes32"]);
/// ```
///
/// An empty list yields no types.
pub fn split_top_level(type_list: &str) -> Result<Vec<&str>, AbiError> {
    if type_list.is_empty() {
        return Ok(Vec::new());
    }

    let mut types = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in type_list.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth
                    .checked_sub(1)
                    .ok_or_else(|| malformed(type_list))?;
            }
            ',' if depth == 0 => {
                types.push(non_empty(&type_list[start..i], type_list)?);
                start = i + 1;
            }
            _ => {}
        }
    }
    if depth != 0 {
        return Err(malformed(type_list));
    }
    types.push(non_empty(&type_list[start..], type_list)?);

    Ok(types)
}

/// The element part of a single top-level type, i.e. the type without its
/// array suffix.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypeShape<'a> {
    /// A base type such as `uint256` or `address`, possibly an alias.
    Base(&'a str),
    /// A tuple type. Holds the member list without the enclosing parentheses.
    Tuple(&'a str),
}

/// Split a single type into its shape and its array suffix, for example
/// `(uint,bool)[2][]` into `Tuple("uint,bool")` and `"[2][]"`.
///
/// Array sizes must be plain decimal integers.
pub fn parse_type(ty: &str) -> Result<(TypeShape<'_>, &str), AbiError> {
    let (shape, suffix) = if let Some(rest) = ty.strip_prefix('(') {
        let close = rest.rfind(')').ok_or_else(|| malformed(ty))?;
        (TypeShape::Tuple(&rest[..close]), &rest[close + 1..])
    } else {
        let end = ty.find('[').unwrap_or(ty.len());
        let base = &ty[..end];
        if base.is_empty() || base.contains(|c: char| matches!(c, '(' | ')' | ',' | ']')) {
            return Err(malformed(ty));
        }
        (TypeShape::Base(base), &ty[end..])
    };

    let mut rest = suffix;
    while let Some(group) = rest.strip_prefix('[') {
        let close = group.find(']').ok_or_else(|| malformed(ty))?;
        if !group[..close].bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed(ty));
        }
        rest = &group[close + 1..];
    }
    if !rest.is_empty() {
        return Err(malformed(ty));
    }

    Ok((shape, suffix))
}

/// Resolve all aliases in a single type, recursing into tuple members.
pub fn resolve_type(ty: &str) -> Result<String, AbiError> {
    let (shape, suffix) = parse_type(ty)?;
    let resolved = match shape {
        TypeShape::Base(base) => format!("{}{}", resolve_alias(base), suffix),
        TypeShape::Tuple(members) => {
            format!("({}){}", resolve_type_list(members)?.join(","), suffix)
        }
    };
    Ok(resolved)
}

/// Resolve all aliases in a comma separated type list. Tuples stay single
/// composite entries such as `(uint256,bytes32)`.
pub fn resolve_type_list(type_list: &str) -> Result<Vec<String>, AbiError> {
    split_top_level(type_list)?
        .into_iter()
        .map(resolve_type)
        .collect()
}

/// Resolve aliases in a type and build its `ethabi` parameter type.
///
/// Base types must be one of `address`, `bool`, `string`, `bytes`, `bytesN`
/// with `1 <= N <= 32`, or `uintN`/`intN` with `N` a multiple of 8 up to 256.
/// Anything else is reported as `ethabi::Error::InvalidName`.
///
/// ```
/// # use cheb3_common::signature::param_type;
/// # use cheb3_common::abi::ParamType;
/// assert_eq!(
///     param_type("uint[2][]").unwrap(),
///     ParamType::Array(Box::new(ParamType::FixedArray(Box::new(ParamType::Uint(256)), 2))),
/// );
/// assert!(param_type("addresss").is_err());
/// ```
pub fn param_type(ty: &str) -> Result<ParamType, AbiError> {
    let (shape, suffix) = parse_type(ty)?;
    let mut param = match shape {
        TypeShape::Base(base) => base_param_type(resolve_alias(base))?,
        TypeShape::Tuple(members) => ParamType::Tuple(
            split_top_level(members)?
                .into_iter()
                .map(param_type)
                .collect::<Result<_, _>>()?,
        ),
    };

    let mut rest = suffix;
    while let Some(group) = rest.strip_prefix('[') {
        let close = group.find(']').ok_or_else(|| malformed(ty))?;
        param = match &group[..close] {
            "" => ParamType::Array(Box::new(param)),
            size => {
                let size = size.parse().map_err(|_| malformed(ty))?;
                ParamType::FixedArray(Box::new(param), size)
            }
        };
        rest = &group[close + 1..];
    }

    Ok(param)
}

/// The parameter type of a canonical base type name.
pub(crate) fn base_param_type(base: &str) -> Result<ParamType, AbiError> {
    let param = match base {
        "address" => Some(ParamType::Address),
        "bool" => Some(ParamType::Bool),
        "string" => Some(ParamType::String),
        "bytes" => Some(ParamType::Bytes),
        _ => {
            if let Some(size) = base.strip_prefix("bytes") {
                type_size(size)
                    .filter(|size| (1..=32).contains(size))
                    .map(ParamType::FixedBytes)
            } else if let Some(bits) = base.strip_prefix("uint") {
                integer_bits(bits).map(ParamType::Uint)
            } else if let Some(bits) = base.strip_prefix("int") {
                integer_bits(bits).map(ParamType::Int)
            } else {
                None
            }
        }
    };
    param.ok_or_else(|| EthabiError::InvalidName(base.to_owned()).into())
}

/// A decimal size suffix without leading zeros.
fn type_size(size: &str) -> Option<usize> {
    if size.is_empty() || size.starts_with('0') || !size.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    size.parse().ok()
}

fn integer_bits(bits: &str) -> Option<usize> {
    type_size(bits).filter(|bits| bits % 8 == 0 && *bits <= 256)
}

/// A function signature with all type aliases resolved.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedSignature {
    /// The function name.
    pub name: String,
    /// The canonical top-level parameter types.
    pub types: Vec<String>,
}

impl ResolvedSignature {
    /// Parse a signature of the form `name(type,...)`.
    pub fn parse(signature: &str) -> Result<Self, AbiError> {
        let open = signature.find('(').ok_or_else(|| malformed(signature))?;
        let params = signature[open + 1..]
            .strip_suffix(')')
            .ok_or_else(|| malformed(signature))?;

        Ok(ResolvedSignature {
            name: signature[..open].to_owned(),
            types: resolve_type_list(params)?,
        })
    }

    /// The canonical signature used as the selector pre-image.
    pub fn canonical(&self) -> String {
        self.to_string()
    }

    /// The 4-byte function selector.
    pub fn selector(&self) -> [u8; 4] {
        hash::function_selector(self.canonical())
    }

    /// The `ethabi` parameter types of the resolved types. Fails for base
    /// type names outside the ABI type grammar.
    pub fn param_types(&self) -> Result<Vec<ParamType>, AbiError> {
        self.types.iter().map(|ty| param_type(ty)).collect()
    }
}

impl Display for ResolvedSignature {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "{}({})", self.name, self.types.join(","))
    }
}

fn non_empty<'a>(ty: &'a str, type_list: &str) -> Result<&'a str, AbiError> {
    if ty.is_empty() {
        Err(malformed(type_list))
    } else {
        Ok(ty)
    }
}

fn malformed(signature: &str) -> AbiError {
    AbiError::MalformedSignature(signature.to_owned())
}
