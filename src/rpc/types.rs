use alloy_network::TransactionBuilder;
use alloy_primitives::{Address, Bytes, LogData, B256};
use alloy_rpc_types_eth::{Log, TransactionRequest};

/// A transaction to sign and send. `to: None` creates a contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TxRequest {
    pub to: Option<Address>,
    pub data: Bytes,
    pub gas_limit: u64,
    /// Human label used in logs and errors
    pub label: String,
}

impl TxRequest {
    pub fn call(to: Address, data: impl Into<Bytes>, gas_limit: u64, label: impl Into<String>) -> Self {
        Self { to: Some(to), data: data.into(), gas_limit, label: label.into() }
    }

    pub fn create(init_code: impl Into<Bytes>, gas_limit: u64, label: impl Into<String>) -> Self {
        Self { to: None, data: init_code.into(), gas_limit, label: label.into() }
    }

    /// Provider request sent from `from`. Nonce, fees and chain id are left
    /// to the provider's fillers.
    pub fn into_transaction(self, from: Address) -> TransactionRequest {
        let tx = TransactionRequest::default().with_from(from).with_gas_limit(self.gas_limit);
        match self.to {
            Some(to) => tx.with_to(to).with_input(self.data),
            None => tx.with_deploy_code(self.data),
        }
    }
}

/// Outcome of a mined, successful transaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub transaction_hash: B256,
    pub contract_address: Option<Address>,
}

/// A mined event log with its position in the chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainLog {
    pub address: Address,
    pub block_number: u64,
    pub transaction_hash: B256,
    pub log_index: u64,
    pub data: LogData,
}

impl ChainLog {
    /// `None` for pending logs, which have no block position yet.
    pub fn from_rpc(log: Log) -> Option<Self> {
        Some(Self {
            address: log.inner.address,
            block_number: log.block_number?,
            transaction_hash: log.transaction_hash?,
            log_index: log.log_index?,
            data: log.inner.data,
        })
    }
}
