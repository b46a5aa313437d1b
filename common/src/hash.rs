//! Keccak256 hash utilities.

use tiny_keccak::{Hasher, Keccak};

/// Perform a Keccak256 hash of data and return its 32-byte result.
pub fn keccak256<B>(data: B) -> [u8; 32]
where
    B: AsRef<[u8]>,
{
    keccak256_concat(&[data.as_ref()])
}

/// Hash the concatenation of several byte slices without allocating the
/// concatenated buffer.
pub fn keccak256_concat(parts: &[&[u8]]) -> [u8; 32] {
    let mut output = [0u8; 32];
    let mut hasher = Keccak::v256();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize(&mut output);
    output
}

/// The 4-byte function selector for a canonical signature such as
/// `transfer(address,uint256)`.
///
/// No alias resolution happens here, see
/// [`ResolvedSignature`](crate::signature::ResolvedSignature) for that.
pub fn function_selector<S>(canonical: S) -> [u8; 4]
where
    S: AsRef<str>,
{
    let hash = keccak256(canonical.as_ref());
    let mut selector = [0u8; 4];
    selector.copy_from_slice(&hash[..4]);
    selector
}
