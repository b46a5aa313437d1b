//! Abstraction for interacting with Ethereum smart contracts. A contract is
//! created from a connection with an ABI and either bytecode to deploy or the
//! address of an existing deployment.

mod deploy;
mod function;

pub use self::deploy::DeployOptions;
pub use self::function::ContractFunction;

use self::function::FunctionKind;
use crate::account::Account;
use crate::connection::Connection;
use crate::errors::{AbiError, ExecutionError};
use cheb3_common::abi::Error as EthabiError;
use cheb3_common::{Abi, FunctionExt, ResolvedSignature};
use std::sync::Arc;
use web3::types::{Address, Bytes, H256, U256};

/// Name used in logs for contracts that were not given one.
const DEFAULT_NAME: &str = "Contract";

/// A contract, optionally deployed and optionally with a signing account.
///
/// Reading state only requires an address, sending transactions and
/// deploying also require a signer.
#[derive(Clone, Debug)]
pub struct Contract {
    connection: Connection,
    abi: Arc<Abi>,
    bytecode: Option<Bytes>,
    address: Option<Address>,
    signer: Option<Account>,
    name: Option<String>,
}

impl Contract {
    pub(crate) fn new(connection: Connection, abi: Abi, bytecode: Option<Bytes>) -> Self {
        Contract {
            connection,
            abi: Arc::new(abi),
            bytecode,
            address: None,
            signer: None,
            name: None,
        }
    }

    /// Use `account` to sign deployments and transactions.
    pub fn with_signer(mut self, account: Account) -> Self {
        self.signer = Some(account);
        self
    }

    /// Bind the contract to a deployed address.
    pub fn at(mut self, address: Address) -> Self {
        self.address = Some(address);
        self
    }

    /// Set the name used for the contract in logs.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// The deployed address, if any.
    pub fn address(&self) -> Option<Address> {
        self.address
    }

    /// The contract ABI.
    pub fn abi(&self) -> &Abi {
        &self.abi
    }

    /// The signing account, if any.
    pub fn signer(&self) -> Option<&Account> {
        self.signer.as_ref()
    }

    /// The name of the contract used in logs.
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(DEFAULT_NAME)
    }

    /// The first function named `name` declared by the ABI.
    pub fn function(&self, name: &str) -> Result<ContractFunction, AbiError> {
        let function = self.abi.function(name)?;
        Ok(ContractFunction::new(
            self.clone(),
            FunctionKind::Function(function.clone()),
        ))
    }

    /// The function matching a signature such as `transfer(address,uint)`.
    /// Type aliases in the signature are resolved before matching, which
    /// allows selecting one of several overloads.
    pub fn function_by_signature(&self, signature: &str) -> Result<ContractFunction, AbiError> {
        let canonical = ResolvedSignature::parse(signature)?.canonical();
        let function = self
            .abi
            .functions()
            .find(|function| function.canonical_signature() == canonical)
            .ok_or_else(|| EthabiError::InvalidName(signature.to_owned()))?;
        Ok(ContractFunction::new(
            self.clone(),
            FunctionKind::Function(function.clone()),
        ))
    }

    /// The fallback function, if the ABI declares one.
    pub fn fallback(&self) -> Result<ContractFunction, AbiError> {
        if !self.abi.fallback {
            return Err(EthabiError::InvalidName("fallback".to_owned()).into());
        }
        Ok(ContractFunction::new(self.clone(), FunctionKind::Fallback))
    }

    /// The receive function, if the ABI declares one.
    pub fn receive(&self) -> Result<ContractFunction, AbiError> {
        if !self.abi.receive {
            return Err(EthabiError::InvalidName("receive".to_owned()).into());
        }
        Ok(ContractFunction::new(self.clone(), FunctionKind::Receive))
    }

    /// The balance of the deployed contract.
    pub async fn get_balance(&self) -> Result<U256, ExecutionError> {
        let address = self.deployed_address()?;
        self.connection.get_balance(address).await
    }

    /// The value of a storage slot of the deployed contract.
    pub async fn get_storage_at(&self, slot: U256) -> Result<H256, ExecutionError> {
        let address = self.deployed_address()?;
        self.connection.get_storage_at(address, slot).await
    }

    fn deployed_address(&self) -> Result<Address, ExecutionError> {
        self.address.ok_or(ExecutionError::NotDeployed)
    }
}
