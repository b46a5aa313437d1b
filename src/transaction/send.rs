//! Signing and sending of transactions with optional waiting for the receipt.

use crate::config::ConnectionConfig;
use crate::errors::ExecutionError;
use crate::secret::PrivateKey;
use crate::transport::DynTransport;
use futures_timer::Delay;
use std::time::{Duration, Instant};
use web3::api::Web3;
use web3::types::{TransactionParameters, TransactionReceipt, H256, U64};

/// Sign a transaction with `key`, send it as a raw transaction and, if
/// `wait` is set, wait for its receipt.
///
/// A mined transaction with a status other than success is reported as
/// [`ExecutionError::Failure`].
pub async fn send_signed(
    web3: &Web3<DynTransport>,
    config: &ConnectionConfig,
    key: &PrivateKey,
    tx: TransactionParameters,
    wait: bool,
) -> Result<TransactionOutcome, ExecutionError> {
    let signed = web3.accounts().sign_transaction(tx, key).await?;
    let tx_hash = web3
        .eth()
        .send_raw_transaction(signed.raw_transaction)
        .await?;
    if tx_hash != signed.transaction_hash {
        return Err(ExecutionError::UnexpectedTransactionHash);
    }
    tracing::info!(hash = ?tx_hash, "sent transaction");

    if !wait {
        return Ok(TransactionOutcome::Hash(tx_hash));
    }

    let receipt =
        wait_for_receipt(web3, tx_hash, config.poll_interval(), config.receipt_timeout()).await?;
    match receipt.status {
        Some(U64([1])) => Ok(TransactionOutcome::Receipt(receipt)),
        _ => Err(ExecutionError::Failure(Box::new(receipt))),
    }
}

/// Poll `eth_getTransactionReceipt` every `poll_interval` until the receipt
/// is available or `timeout` has elapsed.
pub async fn wait_for_receipt(
    web3: &Web3<DynTransport>,
    tx_hash: H256,
    poll_interval: Duration,
    timeout: Duration,
) -> Result<TransactionReceipt, ExecutionError> {
    let start = Instant::now();
    loop {
        if let Some(receipt) = web3.eth().transaction_receipt(tx_hash).await? {
            return Ok(receipt);
        }
        if start.elapsed() >= timeout {
            return Err(ExecutionError::ReceiptTimeout(tx_hash));
        }
        delay(poll_interval).await;
    }
}

/// Create a new delay that resolves immediately for a zero duration.
///
/// The `Delay` future always returns `Poll::Pending` at least once, even with
/// a delay of zero, which would keep unit tests from resolving immediately.
async fn delay(duration: Duration) {
    if !duration.is_zero() {
        Delay::new(duration).await;
    }
}

/// The result of a sent transaction. This is a transaction hash if the sender
/// did not wait for the receipt, and the full receipt otherwise.
#[derive(Clone, Debug)]
#[allow(clippy::large_enum_variant)]
pub enum TransactionOutcome {
    /// The hash of a transaction whose receipt was not waited for.
    Hash(H256),
    /// The receipt of a successful transaction.
    Receipt(TransactionReceipt),
}

impl TransactionOutcome {
    /// Get the transaction hash.
    pub fn hash(&self) -> H256 {
        match self {
            TransactionOutcome::Hash(hash) => *hash,
            TransactionOutcome::Receipt(receipt) => receipt.transaction_hash,
        }
    }

    /// Returns true if the outcome is only a hash.
    pub fn is_hash(&self) -> bool {
        matches!(self, TransactionOutcome::Hash(_))
    }

    /// The transaction receipt, if it was waited for.
    pub fn as_receipt(&self) -> Option<&TransactionReceipt> {
        match self {
            TransactionOutcome::Receipt(receipt) => Some(receipt),
            TransactionOutcome::Hash(_) => None,
        }
    }

    /// Take the transaction receipt, if it was waited for.
    pub fn into_receipt(self) -> Option<TransactionReceipt> {
        match self {
            TransactionOutcome::Receipt(receipt) => Some(receipt),
            TransactionOutcome::Hash(_) => None,
        }
    }
}
