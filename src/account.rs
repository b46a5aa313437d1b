//! Locally signing accounts.

use crate::connection::Connection;
use crate::errors::ExecutionError;
use crate::secret::PrivateKey;
use crate::transaction::{
    build_transaction, send_signed, TransactionOptions, TransactionOutcome, TransactionRequest,
};
use web3::signing;
use web3::types::{Address, Bytes, CallRequest, H256, U256};
use zeroize::Zeroizing;

/// An account backed by a private key held in memory. Transactions are
/// signed locally and sent with `eth_sendRawTransaction`.
#[derive(Clone, Debug)]
pub struct Account {
    connection: Connection,
    key: PrivateKey,
}

impl Account {
    pub(crate) fn new(connection: Connection, key: PrivateKey) -> Self {
        Account { connection, key }
    }

    /// The address of the account.
    pub fn address(&self) -> Address {
        self.key.public_address()
    }

    /// The `0x` prefixed hex private key of the account.
    pub fn private_key(&self) -> Zeroizing<String> {
        self.key.to_hex()
    }

    /// The signing key.
    pub fn key(&self) -> &PrivateKey {
        &self.key
    }

    /// The connection this account sends transactions through.
    pub fn connection(&self) -> &Connection {
        &self.connection
    }

    /// The balance of the account at the latest block.
    pub async fn get_balance(&self) -> Result<U256, ExecutionError> {
        self.connection.get_balance(self.address()).await
    }

    /// Execute a message call from this account without creating a
    /// transaction.
    pub async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, ExecutionError> {
        let request = CallRequest {
            from: Some(self.address()),
            to: Some(to),
            data: Some(data),
            ..Default::default()
        };
        Ok(self.connection.web3().eth().call(request, None).await?)
    }

    /// Sign and send a transaction to `to`.
    ///
    /// Without a `gas_limit` override the gas is estimated by the node and
    /// used as is.
    pub async fn send_transaction(
        &self,
        to: Address,
        value: U256,
        data: Bytes,
        options: TransactionOptions,
    ) -> Result<TransactionOutcome, ExecutionError> {
        let from = self.address();
        let value = options.value.unwrap_or(value);
        let gas = match options.gas_limit {
            Some(gas) => gas,
            None => {
                let request = CallRequest {
                    from: Some(from),
                    to: Some(to),
                    value: Some(value),
                    data: Some(data.clone()),
                    ..Default::default()
                };
                self.connection
                    .web3()
                    .eth()
                    .estimate_gas(request, None)
                    .await?
            }
        };

        let request = TransactionRequest {
            from,
            to: Some(to),
            value,
            data,
            gas,
        };
        let tx = build_transaction(self.connection.web3(), request, &options).await?;
        send_signed(
            self.connection.web3(),
            self.connection.config(),
            &self.key,
            tx,
            options.wait_for_receipt,
        )
        .await
    }

    /// Sign a 32 byte hash without any prefix. Returns the 65 byte
    /// `r ‖ s ‖ v` signature.
    pub fn sign_message_hash(&self, hash: H256) -> [u8; 65] {
        self.key.sign_hash(hash)
    }

    /// Sign a message following EIP-191, that is the keccak hash of
    /// `"\x19Ethereum Signed Message:\n" ‖ len(message) ‖ message`.
    pub fn sign_message(&self, message: impl AsRef<[u8]>) -> [u8; 65] {
        self.sign_message_hash(signing::hash_message(message))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test::prelude::*;
    use crate::transaction::send::tests::{receipt_json, sign};
    use web3::types::TransactionParameters;

    const KEY: &str = "0x58d23b55bc9cdce1f18c2500f40ff4ab7245df9a89505e9b1fa4851f623d241d";

    fn account(transport: &TestTransport) -> Account {
        Connection::new(transport.clone()).account(Some(key!(KEY)))
    }

    #[test]
    fn address_and_private_key() {
        let account = account(&TestTransport::new());
        assert_eq!(
            account.address(),
            addr!("0xdC544d1AA88Ff8bbd2F2AeC754B1F1e99e1812fd")
        );
        assert_eq!(&*account.private_key(), KEY);
    }

    #[test]
    fn balance() {
        let mut transport = TestTransport::new();
        let account = account(&transport);

        transport.add_response(json!("0x64"));
        let balance = account.get_balance().immediate().unwrap();

        assert_eq!(balance, 100.into());
        transport.assert_request(
            "eth_getBalance",
            &[json!(account.address()), json!("latest")],
        );
        transport.assert_no_more_requests();
    }

    #[test]
    fn call_from_account() {
        let mut transport = TestTransport::new();
        let account = account(&transport);
        let to = addr!("0x0123456789012345678901234567890123456789");

        transport.add_response(json!("0x2a"));
        let output = account.call(to, bytes!("0xc2985578")).immediate().unwrap();

        assert_eq!(output, bytes!("0x2a"));
        transport.assert_request(
            "eth_call",
            &[
                json!({
                    "from": account.address(),
                    "to": to,
                    "data": "0xc2985578",
                }),
                json!("latest"),
            ],
        );
        transport.assert_no_more_requests();
    }

    #[test]
    fn send_estimates_gas_without_buffer() {
        let mut transport = TestTransport::new();
        let account = account(&transport);
        let to = addr!("0x0123456789012345678901234567890123456789");

        let expected = TransactionParameters {
            nonce: Some(7.into()),
            to: Some(to),
            gas: 21_000.into(),
            gas_price: Some(1.into()),
            value: 1_000.into(),
            data: bytes!("0x"),
            chain_id: Some(1),
            ..Default::default()
        };
        let (raw, hash) = sign(account.key(), expected);

        transport.add_response(json!("0x5208"));
        transport.add_response(json!("0x1"));
        transport.add_response(json!("0x7"));
        transport.add_response(json!("0x1"));
        transport.add_response(json!(hash));
        transport.add_response(receipt_json(hash, 1, None));

        let outcome = account
            .send_transaction(to, 1_000.into(), bytes!("0x"), TransactionOptions::new())
            .wait()
            .expect("send failed");

        transport.assert_request(
            "eth_estimateGas",
            &[json!({
                "from": account.address(),
                "to": to,
                "value": "0x3e8",
                "data": "0x",
            })],
        );
        transport.assert_request("eth_chainId", &[]);
        transport.assert_request(
            "eth_getTransactionCount",
            &[json!(account.address()), json!("latest")],
        );
        transport.assert_request("eth_gasPrice", &[]);
        transport.assert_request("eth_sendRawTransaction", &[raw]);
        transport.assert_request("eth_getTransactionReceipt", &[json!(hash)]);
        transport.assert_no_more_requests();
        assert_eq!(outcome.hash(), hash);
    }

    #[test]
    fn send_with_overrides_and_without_waiting() {
        let mut transport = TestTransport::new();
        let account = account(&transport);
        let to = addr!("0x0123456789012345678901234567890123456789");

        let expected = TransactionParameters {
            nonce: Some(0.into()),
            to: Some(to),
            gas: 50_000.into(),
            gas_price: Some(2.into()),
            value: 5.into(),
            data: bytes!("0x42"),
            chain_id: Some(1),
            ..Default::default()
        };
        let (raw, hash) = sign(account.key(), expected);

        transport.add_response(json!("0x1"));
        transport.add_response(json!(hash));

        let options = TransactionOptions::new()
            .nonce(0.into())
            .gas_limit(50_000.into())
            .gas_price(2.into())
            .value(5.into())
            .wait_for_receipt(false);
        let outcome = account
            .send_transaction(to, 1.into(), bytes!("0x42"), options)
            .immediate()
            .expect("send failed");

        transport.assert_request("eth_chainId", &[]);
        transport.assert_request("eth_sendRawTransaction", &[raw]);
        transport.assert_no_more_requests();
        assert!(outcome.is_hash());
    }

    #[test]
    fn estimation_errors_propagate() {
        let transport = TestTransport::new();
        let account = account(&transport);
        let err = account
            .send_transaction(
                addr!("0x0123456789012345678901234567890123456789"),
                0.into(),
                bytes!("0x"),
                TransactionOptions::new(),
            )
            .immediate()
            .unwrap_err();
        assert!(matches!(err, ExecutionError::Web3(_)));
    }

    #[test]
    fn sign_messages() {
        let account = account(&TestTransport::new());
        let hash = H256(cheb3_common::hash::keccak256([0xffu8; 32]));
        assert_eq!(account.sign_message_hash(hash), account.key().sign_hash(hash));

        let message = b"hello";
        assert_eq!(
            account.sign_message(message),
            account.sign_message_hash(signing::hash_message(message))
        );
        let v = account.sign_message(message)[64];
        assert!(v == 27 || v == 28);
    }
}
