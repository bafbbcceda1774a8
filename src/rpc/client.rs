use alloy_network::{EthereumWallet, ReceiptResponse, TransactionBuilder};
use alloy_primitives::{Address, Bytes, B256};
use alloy_provider::{DynProvider, Provider, ProviderBuilder};
use alloy_rpc_types_eth::{Filter, TransactionRequest};
use alloy_signer_local::PrivateKeySigner;
use alloy_transport::TransportError;
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, info};

use super::types::{ChainLog, Receipt, TxRequest};
use super::ChainClient;
use crate::errors::GovernError;

/// Node connection through an alloy provider.
///
/// With a signer the provider is wallet-filled: nonce, fees and chain id
/// come from its fillers and transactions are signed in-process. Without one
/// it can only read.
pub struct JsonRpcChain {
    provider: DynProvider,
    sender: Option<Address>,
    confirm_timeout: Duration,
}

impl JsonRpcChain {
    /// Connect to `url` and check that it serves `expected_chain_id`.
    pub async fn connect(
        url: &str,
        expected_chain_id: u64,
        signer: Option<PrivateKeySigner>,
        confirm_timeout: Duration,
    ) -> Result<Self, GovernError> {
        let sender = signer.as_ref().map(|s| s.address());
        let invalid = |e: TransportError| {
            GovernError::Configuration(format!("invalid RPC URL {url}: {e}"))
        };
        let provider = match signer {
            Some(signer) => ProviderBuilder::new()
                .wallet(EthereumWallet::from(signer))
                .connect(url)
                .await
                .map_err(invalid)?
                .erased(),
            None => ProviderBuilder::new().connect(url).await.map_err(invalid)?.erased(),
        };

        let reported = provider
            .get_chain_id()
            .await
            .map_err(|e| GovernError::Network(format!("eth_chainId: {e}")))?;
        if reported != expected_chain_id {
            return Err(GovernError::Configuration(format!(
                "RPC at {url} serves chain {reported}, expected {expected_chain_id}"
            )));
        }

        info!(url, chain_id = reported, ?sender, "connected to node");
        Ok(Self { provider, sender, confirm_timeout })
    }
}

#[async_trait]
impl ChainClient for JsonRpcChain {
    fn sender(&self) -> Option<Address> {
        self.sender
    }

    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, GovernError> {
        debug!(%to, "eth_call");
        let tx = TransactionRequest::default().with_to(to).with_input(data);
        self.provider.call(tx).await.map_err(|e| call_error(to, e))
    }

    async fn send(&self, req: TxRequest) -> Result<Receipt, GovernError> {
        let from = self.sender.ok_or_else(|| {
            GovernError::Configuration("WALLET_KEY is required to send transactions".into())
        })?;
        let label = req.label.clone();

        let pending = self
            .provider
            .send_transaction(req.into_transaction(from))
            .await
            .map_err(|e| send_error(&label, e))?;
        let hash = *pending.tx_hash();
        info!(%label, %hash, "submitted transaction");

        let receipt = pending
            .with_timeout(Some(self.confirm_timeout))
            .get_receipt()
            .await
            .map_err(|e| GovernError::Network(format!("{label}: no receipt for {hash}: {e}")))?;
        if !ReceiptResponse::status(&receipt) {
            return Err(GovernError::ContractRevert {
                context: label,
                reason: format!("transaction {hash} reverted"),
            });
        }

        info!(%label, %hash, contract = ?receipt.contract_address, "transaction mined");
        Ok(Receipt {
            transaction_hash: receipt.transaction_hash,
            contract_address: receipt.contract_address,
        })
    }

    async fn block_number(&self) -> Result<u64, GovernError> {
        self.provider
            .get_block_number()
            .await
            .map_err(|e| GovernError::Network(format!("eth_blockNumber: {e}")))
    }

    async fn logs(
        &self,
        address: Address,
        signatures: &[B256],
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<ChainLog>, GovernError> {
        let filter = Filter::new()
            .address(address)
            .event_signature(signatures.to_vec())
            .from_block(from_block)
            .to_block(to_block);
        debug!(%address, from_block, to_block, "eth_getLogs");
        let logs = self.provider.get_logs(&filter).await.map_err(|e| {
            GovernError::Network(format!("eth_getLogs {from_block}..={to_block}: {e}"))
        })?;
        Ok(logs.into_iter().filter_map(ChainLog::from_rpc).collect())
    }
}

/// An error object from `eth_call` is the contract reverting; anything else
/// is the transport.
fn call_error(to: Address, err: TransportError) -> GovernError {
    match err.as_error_resp() {
        Some(payload) => GovernError::ContractRevert {
            context: format!("eth_call to {to}"),
            reason: payload.message.to_string(),
        },
        None => GovernError::Network(format!("eth_call to {to}: {err}")),
    }
}

/// Submission rejections (nonce, funds, pricing) are node-side failures, not
/// reverts: nothing was executed.
fn send_error(label: &str, err: TransportError) -> GovernError {
    GovernError::Network(format!("{label}: submission rejected: {err}"))
}
