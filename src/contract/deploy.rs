//! Implementation of contract deployment, optionally behind an ERC-1167
//! minimal proxy.

use crate::account::Account;
use crate::contract::Contract;
use crate::errors::{AbiError, DeployError};
use crate::transaction::{build_transaction, send_signed, TransactionOptions, TransactionRequest};
use cheb3_common::abi::Token;
use hex_literal::hex;
use web3::types::{Address, Bytes, CallRequest};

/// Init code of an ERC-1167 minimal proxy up to the logic contract address.
const PROXY_PREFIX: [u8; 20] = hex!("3d602d80600a3d3981f3363d3d373d3d3d363d73");

/// Init code of an ERC-1167 minimal proxy after the logic contract address.
const PROXY_SUFFIX: [u8; 15] = hex!("5af43d82803e903d91602b57fd5bf3");

/// Options for deploying a contract.
#[derive(Clone, Debug, Default)]
pub struct DeployOptions {
    /// Overrides for the deployment transaction.
    pub transaction: TransactionOptions,
    /// Deploy an ERC-1167 minimal proxy in front of the deployed contract and
    /// bind the contract to the proxy.
    pub proxy: bool,
}

impl DeployOptions {
    /// Default deployment options.
    pub fn new() -> Self {
        DeployOptions::default()
    }

    /// Specify the transaction overrides.
    #[inline]
    pub fn transaction(mut self, value: TransactionOptions) -> Self {
        self.transaction = value;
        self
    }

    /// Specify whether to deploy behind a minimal proxy.
    #[inline]
    pub fn proxy(mut self, value: bool) -> Self {
        self.proxy = value;
        self
    }
}

impl Contract {
    /// Deploy the contract with the constructor arguments `args` and bind it
    /// to the deployed address, which is returned.
    ///
    /// A contract that is already deployed is not deployed again. The
    /// transaction overrides apply to the contract deployment; a proxy
    /// deployment keeps only the fee and gas limit overrides.
    pub async fn deploy(
        &mut self,
        args: &[Token],
        options: DeployOptions,
    ) -> Result<Address, DeployError> {
        let signer = self.signer.clone().ok_or(DeployError::MissingSigner)?;
        if let Some(address) = self.address {
            tracing::info!(
                contract = %self.name(),
                address = ?address,
                "contract has already been deployed"
            );
            return Ok(address);
        }
        let bytecode = self
            .bytecode
            .as_ref()
            .ok_or(DeployError::MissingBytecode)?;
        let data = self.init_code(bytecode, args)?;

        tracing::debug!(contract = %self.name(), "deploying contract");
        let address = self.create(&signer, data, &options.transaction).await?;
        tracing::info!(
            contract = %self.name(),
            address = ?address,
            proxy = options.proxy,
            "contract deployed"
        );

        let address = if options.proxy {
            let proxy_options = TransactionOptions {
                nonce: None,
                value: None,
                access_list: None,
                ..options.transaction
            };

            tracing::debug!(contract = %self.name(), logic = ?address, "deploying proxy");
            let proxy = self
                .create(&signer, proxy_init_code(address), &proxy_options)
                .await?;
            tracing::info!(contract = %self.name(), address = ?proxy, "proxy deployed");
            proxy
        } else {
            address
        };

        self.address = Some(address);
        Ok(address)
    }

    /// The bytecode followed by the ABI encoded constructor arguments.
    fn init_code(&self, bytecode: &Bytes, args: &[Token]) -> Result<Bytes, AbiError> {
        let inputs = self
            .abi
            .constructor()
            .map(|constructor| constructor.inputs.len())
            .unwrap_or_default();
        if inputs != args.len() {
            return Err(AbiError::MismatchedArity {
                expected: inputs,
                actual: args.len(),
            });
        }

        match self.abi.constructor() {
            Some(constructor) => Ok(constructor.encode_input(bytecode.0.clone(), args)?.into()),
            None => Ok(bytecode.clone()),
        }
    }

    /// Send a contract creation transaction, wait for it to be mined and
    /// return the created address.
    async fn create(
        &self,
        signer: &Account,
        data: Bytes,
        options: &TransactionOptions,
    ) -> Result<Address, DeployError> {
        let web3 = self.connection.web3();
        let config = self.connection.config();
        let from = signer.address();
        let value = options.value.unwrap_or_default();

        let gas = match options.gas_limit {
            Some(gas) => gas,
            None => {
                let request = CallRequest {
                    from: Some(from),
                    value: options.value,
                    data: Some(data.clone()),
                    ..Default::default()
                };
                web3.eth().estimate_gas(request, None).await? + config.gas_buffer
            }
        };

        let request = TransactionRequest {
            from,
            to: None,
            value,
            data,
            gas,
        };
        let tx = build_transaction(web3, request, options).await?;
        let outcome = send_signed(web3, config, signer.key(), tx, true).await?;

        let hash = outcome.hash();
        outcome
            .into_receipt()
            .and_then(|receipt| receipt.contract_address)
            .ok_or(DeployError::MissingContractAddress(hash))
    }
}

/// Init code of an ERC-1167 minimal proxy delegating to `logic`.
fn proxy_init_code(logic: Address) -> Bytes {
    let mut code = Vec::with_capacity(PROXY_PREFIX.len() + 20 + PROXY_SUFFIX.len());
    code.extend_from_slice(&PROXY_PREFIX);
    code.extend_from_slice(logic.as_bytes());
    code.extend_from_slice(&PROXY_SUFFIX);
    code.into()
}
