//! The entry point of the runtime: a node connection that hands out accounts
//! and contracts sharing its transport.

use crate::account::Account;
use crate::config::ConnectionConfig;
use crate::contract::Contract;
use crate::errors::ExecutionError;
use crate::secret::PrivateKey;
use crate::transport::DynTransport;
use cheb3_common::Abi;
use serde_json::Value;
use std::future::Future;
use std::sync::Arc;
use web3::api::Web3;
use web3::error::Error as Web3Error;
use web3::types::{Address, Bytes, H256, U256};
use web3::Transport;

/// A connection to an Ethereum node.
///
/// Cloning a connection is cheap, all clones share the same transport.
#[derive(Clone, Debug)]
pub struct Connection {
    web3: Web3<DynTransport>,
    config: Arc<ConnectionConfig>,
}

impl Connection {
    /// Create a connection over a transport with the default configuration.
    ///
    /// This does not perform any requests.
    pub fn new<F, T>(transport: T) -> Self
    where
        F: Future<Output = Result<Value, Web3Error>> + Send + 'static,
        T: Transport<Out = F> + Send + Sync + 'static,
    {
        Connection::with_config(transport, ConnectionConfig::default())
    }

    /// Create a connection over a transport with a custom configuration.
    pub fn with_config<F, T>(transport: T, config: ConnectionConfig) -> Self
    where
        F: Future<Output = Result<Value, Web3Error>> + Send + 'static,
        T: Transport<Out = F> + Send + Sync + 'static,
    {
        Connection {
            web3: Web3::new(DynTransport::new(transport)),
            config: Arc::new(config),
        }
    }

    /// Create a connection and verify that the node responds to
    /// `web3_clientVersion`.
    pub async fn connect<F, T>(transport: T) -> Result<Self, ExecutionError>
    where
        F: Future<Output = Result<Value, Web3Error>> + Send + 'static,
        T: Transport<Out = F> + Send + Sync + 'static,
    {
        let connection = Connection::new(transport);
        let version = connection.web3.web3().client_version().await?;
        tracing::info!(%version, "connected to node");
        Ok(connection)
    }

    /// Create a connection to a node over HTTP.
    #[cfg(feature = "http")]
    pub fn http(endpoint_uri: &str) -> Result<Self, ExecutionError> {
        let transport = web3::transports::Http::new(endpoint_uri)?;
        Ok(Connection::new(transport))
    }

    /// The underlying `web3` instance.
    pub fn web3(&self) -> &Web3<DynTransport> {
        &self.web3
    }

    /// The connection configuration.
    pub fn config(&self) -> &ConnectionConfig {
        &self.config
    }

    /// An account signing with `private_key`, or with a newly generated random
    /// key when none is given.
    pub fn account(&self, private_key: Option<PrivateKey>) -> Account {
        let key = private_key.unwrap_or_else(PrivateKey::random);
        Account::new(self.clone(), key)
    }

    /// A contract that can be deployed with `bytecode`.
    pub fn contract(&self, abi: Abi, bytecode: Bytes) -> Contract {
        Contract::new(self.clone(), abi, Some(bytecode))
    }

    /// A contract bound to an already deployed `address`.
    pub fn contract_at(&self, abi: Abi, address: Address) -> Contract {
        Contract::new(self.clone(), abi, None).at(address)
    }

    /// The balance of an address at the latest block.
    pub async fn get_balance(&self, address: Address) -> Result<U256, ExecutionError> {
        Ok(self.web3.eth().balance(address, None).await?)
    }

    /// The value of a storage slot of an address at the latest block.
    pub async fn get_storage_at(
        &self,
        address: Address,
        slot: U256,
    ) -> Result<H256, ExecutionError> {
        Ok(self.web3.eth().storage(address, slot, None).await?)
    }

    /// The code deployed at an address.
    pub async fn get_code(&self, address: Address) -> Result<Bytes, ExecutionError> {
        Ok(self.web3.eth().code(address, None).await?)
    }

    /// The chain ID reported by the node.
    pub async fn chain_id(&self) -> Result<u64, ExecutionError> {
        Ok(self.web3.eth().chain_id().await?.as_u64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::prelude::*;

    #[test]
    fn new_does_not_query_the_node() {
        let transport = TestTransport::new();
        let connection = Connection::new(transport.clone());
        assert_eq!(connection.config(), &ConnectionConfig::default());
        transport.assert_no_more_requests();
    }

    #[test]
    fn connect_checks_client_version() {
        let mut transport = TestTransport::new();
        transport.add_response(json!("Geth/v1.13.0"));
        Connection::connect(transport.clone())
            .immediate()
            .expect("connect failed");

        transport.assert_request("web3_clientVersion", &[]);
        transport.assert_no_more_requests();
    }

    #[test]
    fn connect_fails_without_node() {
        let transport = TestTransport::new();
        let err = Connection::connect(transport).immediate().unwrap_err();
        assert!(matches!(err, ExecutionError::Web3(_)));
    }

    #[test]
    fn node_queries() {
        let mut transport = TestTransport::new();
        let connection = Connection::new(transport.clone());
        let address = addr!("0x0123456789012345678901234567890123456789");

        transport.add_response(json!("0x2a"));
        transport.add_response(json!(H256::repeat_byte(0x01)));
        transport.add_response(json!("0x6000"));
        transport.add_response(json!("0x539"));

        let balance = connection.get_balance(address).immediate().unwrap();
        let storage = connection
            .get_storage_at(address, 3.into())
            .immediate()
            .unwrap();
        let code = connection.get_code(address).immediate().unwrap();
        let chain_id = connection.chain_id().immediate().unwrap();

        assert_eq!(balance, 42.into());
        assert_eq!(storage, H256::repeat_byte(0x01));
        assert_eq!(code, bytes!("0x6000"));
        assert_eq!(chain_id, 1337);

        transport.assert_request("eth_getBalance", &[json!(address), json!("latest")]);
        transport.assert_request(
            "eth_getStorageAt",
            &[json!(address), json!("0x3"), json!("latest")],
        );
        transport.assert_request("eth_getCode", &[json!(address), json!("latest")]);
        transport.assert_request("eth_chainId", &[]);
        transport.assert_no_more_requests();
    }

    #[test]
    fn account_with_and_without_key() {
        let connection = Connection::new(TestTransport::new());
        let key = key!("0x58d23b55bc9cdce1f18c2500f40ff4ab7245df9a89505e9b1fa4851f623d241d");

        let account = connection.account(Some(key));
        assert_eq!(
            account.address(),
            addr!("0xdC544d1AA88Ff8bbd2F2AeC754B1F1e99e1812fd")
        );
        assert_ne!(connection.account(None).address(), account.address());
    }
}
