//! Address parsing, EIP-55 checksums and deterministic contract address
//! derivation for the `CREATE` and `CREATE2` opcodes.

use crate::errors::AbiError;
use crate::hash::{keccak256, keccak256_concat};
use rlp::RlpStream;
use web3::types::{Address, U256};

/// Parse a hex encoded address. The `0x` prefix is optional and the case of
/// the hex digits is ignored, so checksums are not verified.
pub fn parse_address(address: &str) -> Result<Address, AbiError> {
    let digits = address
        .strip_prefix("0x")
        .or_else(|| address.strip_prefix("0X"))
        .unwrap_or(address);
    let bytes = hex::decode(digits)?;
    if bytes.len() != 20 {
        return Err(AbiError::InvalidAddressLength(bytes.len()));
    }
    Ok(Address::from_slice(&bytes))
}

/// Render an address as a `0x` prefixed EIP-55 checksummed string.
pub fn to_checksum(address: &Address) -> String {
    let address_hex = hex::encode(address.as_bytes());
    let hash = hex::encode(keccak256(&address_hex));

    address_hex
        .bytes()
        .zip(hash.bytes())
        .fold("0x".to_owned(), |mut encoded, (digit, nibble)| {
            encoded.push(if nibble >= b'8' {
                digit.to_ascii_uppercase() as char
            } else {
                digit as char
            });
            encoded
        })
}

/// The address of a contract created by `sender` with the `CREATE` opcode
/// when the sender's transaction count is `nonce`.
pub fn calc_create_address(sender: Address, nonce: u64) -> String {
    let mut stream = RlpStream::new_list(2);
    stream.append(&sender.as_bytes().to_vec());
    stream.append(&nonce);

    to_checksum(&hash_to_address(keccak256(stream.out())))
}

/// The address of a contract created by `sender` with the `CREATE2` opcode,
/// as specified in EIP-1014:
/// `keccak256(0xff ‖ sender ‖ salt ‖ keccak256(initcode))[12..]`.
pub fn calc_create2_address(sender: Address, salt: U256, initcode: &[u8]) -> String {
    let mut salt_bytes = [0u8; 32];
    salt.to_big_endian(&mut salt_bytes);
    let hash = keccak256_concat(&[
        &[0xffu8][..],
        sender.as_bytes(),
        &salt_bytes,
        &keccak256(initcode),
    ]);

    to_checksum(&hash_to_address(hash))
}

fn hash_to_address(hash: [u8; 32]) -> Address {
    Address::from_slice(&hash[12..])
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn checksum_vectors() {
        for expected in &[
            "0x5aAeb6053F3E94C9b9A09f33669435E7Ef1BeAed",
            "0xD021B0c307af009B3fbE03994Db4fa9f79172084",
            "0x53D144BcF44de3DeE630b1CFEabD91AC3d3caF5a",
        ] {
            let address = parse_address(&expected.to_lowercase()).unwrap();
            assert_eq!(to_checksum(&address), *expected);
        }
    }

    #[test]
    fn parse_address_prefixes() {
        let expected = Address::from(hex!("518c2143bdd79d3bc060bc4883d92d545d3e3bb0"));
        for address in &[
            "0x518C2143bDd79d3bc060BC4883d92D545D3E3bb0",
            "0X518C2143BDD79D3BC060BC4883D92D545D3E3BB0",
            "518c2143bdd79d3bc060bc4883d92d545d3e3bb0",
        ] {
            assert_eq!(parse_address(address).unwrap(), expected);
        }
    }

    #[test]
    fn parse_address_errors() {
        assert!(matches!(
            parse_address("0x518c2143"),
            Err(AbiError::InvalidAddressLength(4))
        ));
        assert!(matches!(
            parse_address("0xnothex"),
            Err(AbiError::InvalidHex(_))
        ));
    }

    #[test]
    fn create_address() {
        for sender in &[
            "0x518C2143bDd79d3bc060BC4883d92D545D3E3bb0",
            "0x518c2143bdd79d3bc060bc4883d92d545d3e3bb0",
        ] {
            assert_eq!(
                calc_create_address(parse_address(sender).unwrap(), 1),
                "0x53D144BcF44de3DeE630b1CFEabD91AC3d3caF5a",
            );
        }
    }

    #[test]
    fn create2_address() {
        let salt = U256::from_dec_str(
            "29151182470403780934905230237472728569385652082807904518183748516236584329707",
        )
        .unwrap();
        let initcode =
            hex!("6019600c60003960196000f36f06bc8d9e5e9d436617b88de704a9f30760005260206000f3");
        for sender in &[
            "0x518C2143bDd79d3bc060BC4883d92D545D3E3bb0",
            "0x518c2143bdd79d3bc060bc4883d92d545d3e3bb0",
        ] {
            assert_eq!(
                calc_create2_address(parse_address(sender).unwrap(), salt, &initcode),
                "0x233030BEE50d246C5E53697B92194B73AceAB62e",
            );
        }
    }
}
