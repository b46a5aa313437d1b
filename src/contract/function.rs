//! Calls and transactions of a single contract function.

use crate::contract::Contract;
use crate::errors::{AbiError, ExecutionError};
use crate::transaction::{
    build_transaction, send_signed, TransactionOptions, TransactionOutcome, TransactionRequest,
};
use cheb3_common::abi::{Function, Token};
use cheb3_common::{decode_data, DecodedValue, FunctionExt};
use web3::types::{Address, Bytes, CallRequest, U256};

/// The entry point a [`ContractFunction`] invokes.
#[derive(Clone, Debug)]
pub(crate) enum FunctionKind {
    Function(Function),
    Fallback,
    Receive,
}

/// A function of a contract bound to the contract's connection, address and
/// signer.
#[derive(Clone, Debug)]
pub struct ContractFunction {
    contract: Contract,
    kind: FunctionKind,
}

impl ContractFunction {
    pub(crate) fn new(contract: Contract, kind: FunctionKind) -> Self {
        ContractFunction { contract, kind }
    }

    /// The canonical signature, `fallback()` or `receive()` for the special
    /// entry points.
    pub fn signature(&self) -> String {
        match &self.kind {
            FunctionKind::Function(function) => function.canonical_signature(),
            FunctionKind::Fallback => "fallback()".to_owned(),
            FunctionKind::Receive => "receive()".to_owned(),
        }
    }

    /// Execute the function with `eth_call` at the latest block and decode
    /// its return data. A function with a single output returns that value
    /// directly, otherwise the outputs are returned as a tuple.
    pub async fn call(&self, args: &[Token]) -> Result<DecodedValue, ExecutionError> {
        let address = self.contract.deployed_address()?;
        let request = CallRequest {
            from: self.contract.signer.as_ref().map(|signer| signer.address()),
            to: Some(address),
            data: Some(self.encode(args)?),
            ..Default::default()
        };
        let output = self
            .contract
            .connection
            .web3()
            .eth()
            .call(request, None)
            .await?;

        let types = self.output_types();
        Ok(decode_data(&output.0, types.as_slice())?)
    }

    /// Estimate the gas of a transaction invoking the function.
    pub async fn estimate_gas(&self, args: &[Token]) -> Result<U256, ExecutionError> {
        let address = self.contract.deployed_address()?;
        self.estimate(address, self.encode(args)?, None).await
    }

    /// Sign and send a transaction invoking the function.
    ///
    /// Without a `gas_limit` override the gas is the estimate plus the
    /// connection's gas buffer, or the fallback gas limit if estimation
    /// fails.
    pub async fn send_transaction(
        &self,
        args: &[Token],
        options: TransactionOptions,
    ) -> Result<TransactionOutcome, ExecutionError> {
        let signer = self
            .contract
            .signer
            .as_ref()
            .ok_or(ExecutionError::MissingSigner)?;
        let address = self.contract.deployed_address()?;
        let data = self.encode(args)?;
        let config = self.contract.connection.config();

        let gas = match options.gas_limit {
            Some(gas) => gas,
            None => match self.estimate(address, data.clone(), options.value).await {
                Ok(gas) => gas + config.gas_buffer,
                Err(err) => {
                    tracing::warn!(
                        contract = %self.contract.name(),
                        function = %self.signature(),
                        error = %err,
                        "gas estimation failed, using fallback gas limit"
                    );
                    config.fallback_gas_limit.into()
                }
            },
        };

        let request = TransactionRequest {
            from: signer.address(),
            to: Some(address),
            value: options.value.unwrap_or_default(),
            data,
            gas,
        };
        let web3 = self.contract.connection.web3();
        let tx = build_transaction(web3, request, &options).await?;
        let outcome = send_signed(web3, config, signer.key(), tx, options.wait_for_receipt).await?;

        tracing::info!(
            contract = %self.contract.name(),
            address = ?address,
            function = %self.signature(),
            hash = ?outcome.hash(),
            "contract transaction"
        );
        Ok(outcome)
    }

    async fn estimate(
        &self,
        address: Address,
        data: Bytes,
        value: Option<U256>,
    ) -> Result<U256, ExecutionError> {
        let request = CallRequest {
            from: self.contract.signer.as_ref().map(|signer| signer.address()),
            to: Some(address),
            value,
            data: Some(data),
            ..Default::default()
        };
        Ok(self
            .contract
            .connection
            .web3()
            .eth()
            .estimate_gas(request, None)
            .await?)
    }

    fn encode(&self, args: &[Token]) -> Result<Bytes, AbiError> {
        match &self.kind {
            FunctionKind::Function(function) => {
                if function.inputs.len() != args.len() {
                    return Err(AbiError::MismatchedArity {
                        expected: function.inputs.len(),
                        actual: args.len(),
                    });
                }
                Ok(function.encode_input(args)?.into())
            }
            FunctionKind::Fallback | FunctionKind::Receive => {
                if !args.is_empty() {
                    return Err(AbiError::MismatchedArity {
                        expected: 0,
                        actual: args.len(),
                    });
                }
                Ok(Bytes::default())
            }
        }
    }

    fn output_types(&self) -> Vec<String> {
        match &self.kind {
            FunctionKind::Function(function) => function.output_types(),
            FunctionKind::Fallback | FunctionKind::Receive => Vec::new(),
        }
    }
}
