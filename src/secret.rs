//! This module implements secrets in the form of protected memory.

use crate::errors::InvalidPrivateKey;
use cheb3_common::hash;
use secp256k1::{constants, Message, PublicKey, Secp256k1, SecretKey};
use std::fmt::{self, Debug, Formatter};
use std::ops::Deref;
use std::str::FromStr;
use web3::signing::{Key, Signature, SigningError};
use web3::types::{Address, H256};
use zeroize::{DefaultIsZeroes, Zeroizing};

/// A secret key used for signing and hashing.
///
/// This type has a safe `Debug` implementation that does not leak information.
/// Additionally, it implements `Drop` to zeroize the memory to make leaking
/// keys less likely.
#[derive(Clone)]
pub struct PrivateKey(Zeroizing<ZeroizeableSecretKey>);

impl PrivateKey {
    /// Generates a new random private key.
    pub fn random() -> Self {
        let secret_key = SecretKey::new(&mut secp256k1::rand::thread_rng());
        PrivateKey(Zeroizing::new(secret_key.into()))
    }

    /// Creates a new private key from raw bytes.
    pub fn from_raw(raw: [u8; 32]) -> Result<Self, InvalidPrivateKey> {
        PrivateKey::from_slice(raw)
    }

    /// Creates a new private key from a slice of bytes.
    pub fn from_slice<B: AsRef<[u8]>>(raw: B) -> Result<Self, InvalidPrivateKey> {
        let secret_key = SecretKey::from_slice(raw.as_ref())?;
        Ok(PrivateKey(Zeroizing::new(secret_key.into())))
    }

    /// Creates a new private key from a hex string representation. Accepts hex
    /// string with or without leading `"0x"`.
    pub fn from_hex_str<S: AsRef<str>>(s: S) -> Result<Self, InvalidPrivateKey> {
        let s = s.as_ref();
        let hex_str = s.strip_prefix("0x").unwrap_or(s);
        let secret_key = SecretKey::from_str(hex_str)?;
        Ok(PrivateKey(Zeroizing::new(secret_key.into())))
    }

    /// The `0x` prefixed hex representation of the key.
    ///
    /// The returned string is zeroized on drop.
    pub fn to_hex(&self) -> Zeroizing<String> {
        Zeroizing::new(format!("0x{}", hex::encode(self.secret_bytes())))
    }

    /// Gets the public address for a given private key.
    pub fn public_address(&self) -> Address {
        let secp = Secp256k1::signing_only();
        let public_key = PublicKey::from_secret_key(&secp, self).serialize_uncompressed();

        // NOTE: An ethereum address is the last 20 bytes of the keccak hash of
        //   the public key. The first byte of the serialized key is the 0x04
        //   tag of an uncompressed public key and is not part of the hash.
        debug_assert_eq!(public_key[0], 0x04);
        let hash = hash::keccak256(&public_key[1..]);

        Address::from_slice(&hash[12..])
    }

    /// Sign a 32 byte hash as is, without any prefix.
    ///
    /// Returns the 65 byte `r ‖ s ‖ v` signature with `v` in `{27, 28}`.
    pub fn sign_hash(&self, hash: H256) -> [u8; 65] {
        let message = Message::from_digest(hash.0);
        let (recovery_id, signature) = Secp256k1::signing_only()
            .sign_ecdsa_recoverable(&message, self)
            .serialize_compact();

        let mut bytes = [0u8; 65];
        bytes[..64].copy_from_slice(&signature);
        bytes[64] = recovery_id.to_i32() as u8 + 27;
        bytes
    }
}

impl FromStr for PrivateKey {
    type Err = InvalidPrivateKey;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PrivateKey::from_hex_str(s)
    }
}

impl Deref for PrivateKey {
    type Target = SecretKey;

    fn deref(&self) -> &Self::Target {
        &(self.0).0
    }
}

impl Debug for PrivateKey {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.debug_tuple("PrivateKey")
            .field(&self.public_address())
            .finish()
    }
}

impl Key for &'_ PrivateKey {
    fn sign(&self, message: &[u8], chain_id: Option<u64>) -> Result<Signature, SigningError> {
        let signature = self.sign_message(message)?;

        Ok(Signature {
            v: if let Some(chain_id) = chain_id {
                signature.v + 35 + chain_id * 2
            } else {
                signature.v + 27
            },
            ..signature
        })
    }

    fn sign_message(&self, message: &[u8]) -> Result<Signature, SigningError> {
        let message =
            Message::from_digest_slice(message).map_err(|_| SigningError::InvalidMessage)?;
        let (recovery_id, signature) = Secp256k1::signing_only()
            .sign_ecdsa_recoverable(&message, self)
            .serialize_compact();

        let v = recovery_id.to_i32() as u64;
        let r = H256::from_slice(&signature[..32]);
        let s = H256::from_slice(&signature[32..]);

        Ok(Signature { v, r, s })
    }

    fn address(&self) -> Address {
        self.public_address()
    }
}

/// The secret key with value one, the smallest valid key.
fn one_key() -> SecretKey {
    SecretKey::from_slice(&constants::ONE).expect("one is a valid secret key")
}

/// An internal type that allows us to implement `Zeroize` on `SecretKey`. The
/// key is reset to [`one_key`] instead of `0`s since that is the first valid
/// key.
#[derive(Clone, Copy)]
struct ZeroizeableSecretKey(SecretKey);

impl From<SecretKey> for ZeroizeableSecretKey {
    fn from(secret_key: SecretKey) -> Self {
        ZeroizeableSecretKey(secret_key)
    }
}

impl Default for ZeroizeableSecretKey {
    fn default() -> Self {
        one_key().into()
    }
}

impl DefaultIsZeroes for ZeroizeableSecretKey {}

#[cfg(test)]
mod tests {
    use super::*;
    use zeroize::Zeroize;

    const KEY: &str = "0x58d23b55bc9cdce1f18c2500f40ff4ab7245df9a89505e9b1fa4851f623d241d";

    #[test]
    fn private_key_address() {
        let key = key!(KEY);
        let address = addr!("0xdC544d1AA88Ff8bbd2F2AeC754B1F1e99e1812fd");

        assert_eq!(key.public_address(), address);
    }

    #[test]
    fn parse_with_and_without_prefix() {
        let with_prefix: PrivateKey = KEY.parse().unwrap();
        let without_prefix = PrivateKey::from_hex_str(&KEY[2..]).unwrap();
        assert_eq!(*with_prefix, *without_prefix);
        assert_eq!(&*with_prefix.to_hex(), KEY);
    }

    #[test]
    fn invalid_keys() {
        assert_eq!(PrivateKey::from_raw([0; 32]).unwrap_err(), InvalidPrivateKey);
        assert!(PrivateKey::from_hex_str("0x1234").is_err());
    }

    #[test]
    fn random_keys_differ() {
        assert_ne!(
            PrivateKey::random().public_address(),
            PrivateKey::random().public_address()
        );
    }

    #[test]
    fn sign_raw_hash() {
        let key = key!(KEY);
        let hash = H256(hash::keccak256([0xffu8; 32]));
        assert_eq!(
            hex::encode(key.sign_hash(hash)),
            "bacc1c7c0b353c261bb992549e9f8d030b46078ec31b4a8a83fbfcccd64788b1\
             483d259536cab4408bcba2bae75f126d06483b39e7e46fa0c16c9fa6e21c527e1b",
        );
    }

    #[test]
    fn debug_does_not_leak() {
        let key = key!(KEY);
        let debug = format!("{:?}", key);
        assert!(!debug.contains(&KEY[2..]));
        assert!(debug.starts_with("PrivateKey("));
    }

    #[test]
    fn drop_private_key() {
        let mut key = key!("0x0102030405060708091011121314151617181920212223242526272829303132");
        key.0.zeroize();
        assert_eq!(*key, one_key());
    }

    #[test]
    fn one_key_is_one() {
        let mut expected = [0u8; 32];
        expected[31] = 1;
        assert_eq!(one_key().secret_bytes(), expected);
    }
}
