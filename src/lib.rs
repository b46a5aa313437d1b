#![deny(missing_docs, unsafe_code)]

//! Ergonomic Ethereum accounts and contracts on top of a `web3` JSON-RPC
//! client, together with the ABI utilities of [`cheb3_common`].
//!
//! A [`Connection`] wraps any `web3` transport and hands out locally signing
//! [`Account`]s and [`Contract`]s that share it:
//!
//! ```no_run
//! use cheb3::prelude::*;
//! use cheb3::abi::Token;
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let connection = Connection::http("http://localhost:8545")?;
//! let owner = connection.account(Some("0x58d23b55bc9cdce1f18c2500f40ff4ab7245df9a89505e9b1fa4851f623d241d".parse()?));
//!
//! let artifact = cheb3::load_compiled("Counter.sol", None, cheb3::DEFAULT_BASE_PATH)?;
//! let mut counter = connection
//!     .contract(artifact.abi, artifact.bytecode)
//!     .with_signer(owner)
//!     .with_name("Counter");
//! counter.deploy(&[Token::Uint(1.into())], DeployOptions::new()).await?;
//!
//! counter
//!     .function("increment")?
//!     .send_transaction(&[], TransactionOptions::new())
//!     .await?;
//! let count = counter.function("count")?.call(&[]).await?;
//! println!("count: {:?}", count.as_uint());
//! # Ok(())
//! # }
//! ```
//!
//! The library only emits `tracing` events, installing a subscriber is left
//! to the application.

#[cfg(test)]
#[allow(missing_docs)]
#[macro_use]
#[path = "test/macros.rs"]
mod test_macros;

pub mod account;
pub mod config;
pub mod connection;
pub mod contract;
pub mod errors;
pub mod secret;
pub mod transaction;
pub mod transport;

pub use crate::prelude::*;
pub use cheb3_common as common;
pub use cheb3_common::{
    abi, calc_create2_address, calc_create_address, decode_data, decode_hex_data,
    encode_with_signature, encode_with_signature_hex, load_compiled, to_checksum, Abi,
    CompiledContract, DecodedValue, I256, DEFAULT_BASE_PATH,
};
pub use futures;
pub use serde_json as json;
pub use web3;

pub mod prelude {
    //! A prelude module for importing commonly used types.

    pub use crate::account::Account;
    pub use crate::config::ConnectionConfig;
    pub use crate::connection::Connection;
    pub use crate::contract::{Contract, ContractFunction, DeployOptions};
    pub use crate::secret::PrivateKey;
    pub use crate::transaction::{TransactionOptions, TransactionOutcome};
    pub use web3::types::{Address, Bytes, H256, U256};
}
