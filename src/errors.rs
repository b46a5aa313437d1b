//! Module with common error types.

use cheb3_common::abi::Error as EthabiError;
use secp256k1::Error as Secp256k1Error;
use thiserror::Error;
use web3::error::Error as Web3Error;
use web3::types::{TransactionReceipt, H256};

pub use cheb3_common::errors::*;

/// Error that can occur while deploying a contract.
#[derive(Debug, Error)]
pub enum DeployError {
    /// An error occured encoding deployment parameters with the contract ABI.
    #[error("error ABI encoding deployment parameters: {0}")]
    Abi(#[from] AbiError),

    /// Error executing contract deployment transaction.
    #[error("error executing contract deployment transaction: {0}")]
    Tx(#[from] ExecutionError),

    /// The contract has no signer to send the deployment transaction from.
    #[error("a signer is required to deploy a contract")]
    MissingSigner,

    /// The contract was created without bytecode.
    #[error("contract bytecode is required for deployment")]
    MissingBytecode,

    /// The deployment receipt did not contain a contract address.
    #[error("no contract address in the receipt of deployment transaction {0:?}")]
    MissingContractAddress(H256),
}

impl From<Web3Error> for DeployError {
    fn from(err: Web3Error) -> Self {
        DeployError::Tx(err.into())
    }
}

/// Error that can occur while executing a contract call or transaction.
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// An error occured while performing a web3 call.
    #[error("web3 error: {0}")]
    Web3(#[from] Web3Error),

    /// An error occured while encoding call data or decoding return data.
    #[error("abi error: {0}")]
    Abi(#[from] AbiError),

    /// A transaction was mined but reverted.
    #[error("transaction failed: {:?}", .0.transaction_hash)]
    Failure(Box<TransactionReceipt>),

    /// No receipt for a sent transaction showed up before the configured
    /// timeout elapsed.
    #[error("timed out waiting for the receipt of transaction {0:?}")]
    ReceiptTimeout(H256),

    /// The operation sends a transaction but no signing account was set.
    #[error("a signer is required to send a transaction")]
    MissingSigner,

    /// The operation requires a deployed contract address.
    #[error("contract is not deployed")]
    NotDeployed,

    /// The node returned a different transaction hash than the one computed
    /// locally for a signed transaction.
    #[error("node returned an unexpected transaction hash")]
    UnexpectedTransactionHash,
}

impl From<EthabiError> for ExecutionError {
    fn from(err: EthabiError) -> Self {
        ExecutionError::Abi(err.into())
    }
}

/// Invalid private key.
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
#[error("invalid private key")]
pub struct InvalidPrivateKey;

impl From<Secp256k1Error> for InvalidPrivateKey {
    fn from(_err: Secp256k1Error) -> Self {
        InvalidPrivateKey
    }
}
