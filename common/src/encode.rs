//! Calldata encoding from a human-written function signature, the equivalent
//! of Solidity's `abi.encodeWithSignature` that also understands type aliases.

use crate::errors::AbiError;
use crate::int::I256;
use crate::signature::ResolvedSignature;
use ethabi::{Error as EthabiError, ParamType, Token};
use web3::types::Bytes;

/// Encode a function call as `selector ‖ arguments`.
///
/// The selector is computed from the canonical form of `signature`, so
/// `foo(uint)` and `foo(uint256)` produce identical calldata. Tuple arguments
/// are passed as `Token::Tuple` with their members in declaration order.
/// Integers must fit the declared width, so `300` is rejected as a `uint8`
/// argument and `-129` as an `int8`.
///
/// ```
/// # use cheb3_common::encode::encode_with_signature_hex;
/// # use cheb3_common::abi::Token;
/// let data = encode_with_signature_hex("foo(uint)", &[Token::Uint(1.into())]).unwrap();
/// assert_eq!(&data[..10], "0x2fbebd38");
/// ```
pub fn encode_with_signature(signature: &str, args: &[Token]) -> Result<Bytes, AbiError> {
    let signature = ResolvedSignature::parse(signature)?;
    if signature.types.len() != args.len() {
        return Err(AbiError::MismatchedArity {
            expected: signature.types.len(),
            actual: args.len(),
        });
    }

    let param_types = signature.param_types()?;
    if !Token::types_check(args, &param_types)
        || !args.iter().zip(&param_types).all(|(arg, ty)| in_range(arg, ty))
    {
        return Err(EthabiError::InvalidData.into());
    }

    let mut data = signature.selector().to_vec();
    data.extend(ethabi::encode(args));
    Ok(Bytes(data))
}

/// Whether every integer in a type-checked token fits its declared width.
fn in_range(token: &Token, ty: &ParamType) -> bool {
    match (token, ty) {
        (Token::Uint(value), ParamType::Uint(bits)) => value.bits() <= *bits,
        (Token::Int(value), ParamType::Int(bits)) => I256::from_raw(*value).fits_bits(*bits),
        (Token::Array(tokens), ParamType::Array(ty))
        | (Token::FixedArray(tokens), ParamType::FixedArray(ty, _)) => {
            tokens.iter().all(|token| in_range(token, ty))
        }
        (Token::Tuple(tokens), ParamType::Tuple(types)) => tokens
            .iter()
            .zip(types)
            .all(|(token, ty)| in_range(token, ty)),
        _ => true,
    }
}

/// Same as [`encode_with_signature`] but returns the `0x` prefixed lowercase
/// hex representation of the calldata.
pub fn encode_with_signature_hex(signature: &str, args: &[Token]) -> Result<String, AbiError> {
    let data = encode_with_signature(signature, args)?;
    Ok(format!("0x{}", hex::encode(data.0)))
}
