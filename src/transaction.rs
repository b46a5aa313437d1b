//! Implementation of the transaction options shared by accounts and contracts
//! and the building of signable transaction parameters from them.

pub(crate) mod send;

pub use self::send::{send_signed, wait_for_receipt, TransactionOutcome};

use crate::errors::ExecutionError;
use crate::transport::DynTransport;
use serde::Deserialize;
use serde_json::json;
use web3::api::Web3;
use web3::helpers::CallFuture;
use web3::types::{AccessList, Address, Bytes, TransactionParameters, U256, U64};
use web3::Transport as _;

/// Transaction type of EIP-2930 access list transactions.
const ACCESS_LIST_TX_TYPE: u64 = 1;

/// Transaction type of EIP-1559 dynamic fee transactions.
const DYNAMIC_FEE_TX_TYPE: u64 = 2;

/// Overrides for the parameters of a transaction. Anything that is not set is
/// queried from the node when the transaction is built.
///
/// Setting either `max_fee_per_gas` or `max_priority_fee_per_gas` makes the
/// transaction an EIP-1559 transaction, in which case `gas_price` is ignored.
#[derive(Clone, Debug)]
pub struct TransactionOptions {
    /// The nonce, defaults to the sender's transaction count.
    pub nonce: Option<U256>,
    /// The legacy gas price, defaults to `eth_gasPrice`.
    pub gas_price: Option<U256>,
    /// The gas limit. When not set it is estimated.
    pub gas_limit: Option<U256>,
    /// The amount of wei to send with the transaction.
    pub value: Option<U256>,
    /// The EIP-1559 max fee per gas.
    pub max_fee_per_gas: Option<U256>,
    /// The EIP-1559 max priority fee per gas.
    pub max_priority_fee_per_gas: Option<U256>,
    /// The EIP-2930 access list.
    pub access_list: Option<AccessList>,
    /// Whether to wait for the transaction receipt, defaults to `true`.
    pub wait_for_receipt: bool,
}

impl TransactionOptions {
    /// Options without any overrides that wait for the receipt.
    pub fn new() -> Self {
        TransactionOptions {
            nonce: None,
            gas_price: None,
            gas_limit: None,
            value: None,
            max_fee_per_gas: None,
            max_priority_fee_per_gas: None,
            access_list: None,
            wait_for_receipt: true,
        }
    }

    /// Specify the nonce for the transaction.
    #[inline]
    pub fn nonce(mut self, value: U256) -> Self {
        self.nonce = Some(value);
        self
    }

    /// Specify the legacy gas price for the transaction.
    #[inline]
    pub fn gas_price(mut self, value: U256) -> Self {
        self.gas_price = Some(value);
        self
    }

    /// Specify the gas limit for the transaction.
    #[inline]
    pub fn gas_limit(mut self, value: U256) -> Self {
        self.gas_limit = Some(value);
        self
    }

    /// Specify the amount of wei to send with the transaction.
    #[inline]
    pub fn value(mut self, value: U256) -> Self {
        self.value = Some(value);
        self
    }

    /// Specify the EIP-1559 max fee per gas.
    #[inline]
    pub fn max_fee_per_gas(mut self, value: U256) -> Self {
        self.max_fee_per_gas = Some(value);
        self
    }

    /// Specify the EIP-1559 max priority fee per gas.
    #[inline]
    pub fn max_priority_fee_per_gas(mut self, value: U256) -> Self {
        self.max_priority_fee_per_gas = Some(value);
        self
    }

    /// Specify the EIP-2930 access list.
    #[inline]
    pub fn access_list(mut self, value: AccessList) -> Self {
        self.access_list = Some(value);
        self
    }

    /// Specify whether to wait for the transaction receipt.
    #[inline]
    pub fn wait_for_receipt(mut self, value: bool) -> Self {
        self.wait_for_receipt = value;
        self
    }

    fn is_dynamic_fee(&self) -> bool {
        self.max_fee_per_gas.is_some() || self.max_priority_fee_per_gas.is_some()
    }

    fn non_empty_access_list(&self) -> Option<AccessList> {
        self.access_list
            .as_ref()
            .filter(|access_list| !access_list.is_empty())
            .cloned()
    }
}

impl Default for TransactionOptions {
    fn default() -> Self {
        TransactionOptions::new()
    }
}

/// The unsigned content of a transaction before the node supplied fields
/// are resolved.
#[derive(Clone, Debug)]
pub struct TransactionRequest {
    /// The sender.
    pub from: Address,
    /// The receiver, `None` for contract creation.
    pub to: Option<Address>,
    /// The amount of wei to send.
    pub value: U256,
    /// The calldata or init code.
    pub data: Bytes,
    /// The gas limit.
    pub gas: U256,
}

/// Fill in the chain ID, nonce and fee fields of a transaction, querying the
/// node for anything the options do not override.
///
/// The node is queried in order for `eth_chainId`, `eth_getTransactionCount`
/// and then either `eth_gasPrice` for legacy transactions or
/// `eth_maxPriorityFeePerGas` and the latest block's base fee for EIP-1559
/// transactions.
pub async fn build_transaction(
    web3: &Web3<DynTransport>,
    request: TransactionRequest,
    options: &TransactionOptions,
) -> Result<TransactionParameters, ExecutionError> {
    let chain_id = web3.eth().chain_id().await?;
    let nonce = match options.nonce {
        Some(nonce) => nonce,
        None => web3.eth().transaction_count(request.from, None).await?,
    };
    let access_list = options.non_empty_access_list();

    let mut tx = TransactionParameters {
        nonce: Some(nonce),
        to: request.to,
        gas: request.gas,
        value: request.value,
        data: request.data,
        chain_id: Some(chain_id.as_u64()),
        ..Default::default()
    };

    if options.is_dynamic_fee() {
        let max_priority_fee_per_gas = match options.max_priority_fee_per_gas {
            Some(fee) => fee,
            None => max_priority_fee_per_gas(web3).await?,
        };
        let max_fee_per_gas = match options.max_fee_per_gas {
            Some(fee) => fee,
            None => {
                let base_fee = latest_base_fee(web3).await?.unwrap_or_default();
                max_priority_fee_per_gas + base_fee * 2
            }
        };

        tx.transaction_type = Some(U64::from(DYNAMIC_FEE_TX_TYPE));
        tx.max_fee_per_gas = Some(max_fee_per_gas);
        tx.max_priority_fee_per_gas = Some(max_priority_fee_per_gas);
    } else {
        let gas_price = match options.gas_price {
            Some(gas_price) => gas_price,
            None => web3.eth().gas_price().await?,
        };

        if access_list.is_some() {
            tx.transaction_type = Some(U64::from(ACCESS_LIST_TX_TYPE));
        }
        tx.gas_price = Some(gas_price);
    }
    tx.access_list = access_list;

    Ok(tx)
}

async fn max_priority_fee_per_gas(web3: &Web3<DynTransport>) -> Result<U256, ExecutionError> {
    let fee = CallFuture::new(
        web3.transport()
            .execute("eth_maxPriorityFeePerGas", vec![]),
    )
    .await?;
    Ok(fee)
}

/// The base fee of the latest block, `None` for chains without EIP-1559.
async fn latest_base_fee(web3: &Web3<DynTransport>) -> Result<Option<U256>, ExecutionError> {
    #[derive(Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct LatestBlock {
        base_fee_per_gas: Option<U256>,
    }

    let block: Option<LatestBlock> = CallFuture::new(
        web3.transport()
            .execute("eth_getBlockByNumber", vec![json!("latest"), json!(false)]),
    )
    .await?;
    Ok(block.and_then(|block| block.base_fee_per_gas))
}
