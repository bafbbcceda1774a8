//! In-memory chain for tests.

use alloy_primitives::{Address, Bytes, B256, U256};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

use super::types::{ChainLog, Receipt, TxRequest};
use super::ChainClient;
use crate::errors::GovernError;

/// Records every sent transaction; creations get sequential addresses
/// starting at `0x..1000`. `eth_call` answers come from [`MockChain::respond`],
/// logs from [`MockChain::push_log`].
pub struct MockChain {
    sender: Address,
    sent: Mutex<Vec<TxRequest>>,
    responses: Mutex<HashMap<(Address, [u8; 4]), Bytes>>,
    revert_label: Mutex<Option<String>>,
    head: Mutex<u64>,
    logs: Mutex<Vec<ChainLog>>,
    log_queries: Mutex<Vec<(u64, u64)>>,
}

impl MockChain {
    pub fn new() -> Self {
        Self {
            sender: Address::repeat_byte(0xAD),
            sent: Mutex::new(Vec::new()),
            responses: Mutex::new(HashMap::new()),
            revert_label: Mutex::new(None),
            head: Mutex::new(0),
            logs: Mutex::new(Vec::new()),
            log_queries: Mutex::new(Vec::new()),
        }
    }

    pub fn set_block_number(&self, head: u64) {
        *self.head.lock().unwrap() = head;
    }

    pub fn push_log(&self, log: ChainLog) {
        self.logs.lock().unwrap().push(log);
    }

    /// Block ranges requested through `logs`, in order.
    pub fn log_queries(&self) -> Vec<(u64, u64)> {
        self.log_queries.lock().unwrap().clone()
    }

    /// Answer calls to `to` whose selector is `selector` with `ret`.
    pub fn respond(&self, to: Address, selector: [u8; 4], ret: Bytes) {
        self.responses.lock().unwrap().insert((to, selector), ret);
    }

    /// Make the transaction labelled `label` revert.
    pub fn revert_on(&self, label: &str) {
        *self.revert_label.lock().unwrap() = Some(label.to_string());
    }

    pub fn sent(&self) -> Vec<TxRequest> {
        self.sent.lock().unwrap().clone()
    }

    pub fn deployments(&self) -> usize {
        self.sent().iter().filter(|tx| tx.to.is_none()).count()
    }

    pub fn tx_count(&self) -> usize {
        self.sent.lock().unwrap().len()
    }

    /// Address the next contract creation will get.
    pub fn next_create_address(&self) -> Address {
        created_address(self.deployments())
    }
}

fn created_address(index: usize) -> Address {
    Address::left_padding_from(&(0x1000u64 + index as u64).to_be_bytes())
}

#[async_trait]
impl ChainClient for MockChain {
    fn sender(&self) -> Option<Address> {
        Some(self.sender)
    }

    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, GovernError> {
        let selector: [u8; 4] = data
            .get(..4)
            .and_then(|s| s.try_into().ok())
            .ok_or_else(|| GovernError::Encoding("calldata shorter than a selector".into()))?;
        self.responses.lock().unwrap().get(&(to, selector)).cloned().ok_or_else(|| {
            GovernError::ContractRevert { context: format!("eth_call to {to}"), reason: String::new() }
        })
    }

    async fn send(&self, tx: TxRequest) -> Result<Receipt, GovernError> {
        if self.revert_label.lock().unwrap().as_deref() == Some(tx.label.as_str()) {
            return Err(GovernError::ContractRevert { context: tx.label, reason: "mock".into() });
        }
        let mut sent = self.sent.lock().unwrap();
        let creations = sent.iter().filter(|t| t.to.is_none()).count();
        let contract_address = tx.to.is_none().then(|| created_address(creations));
        sent.push(tx);
        Ok(Receipt {
            transaction_hash: B256::from(U256::from(sent.len())),
            contract_address,
        })
    }

    async fn block_number(&self) -> Result<u64, GovernError> {
        Ok(*self.head.lock().unwrap())
    }

    async fn logs(
        &self,
        address: Address,
        signatures: &[B256],
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<ChainLog>, GovernError> {
        self.log_queries.lock().unwrap().push((from_block, to_block));
        let logs = self.logs.lock().unwrap();
        Ok(logs
            .iter()
            .filter(|log| log.address == address)
            .filter(|log| (from_block..=to_block).contains(&log.block_number))
            .filter(|log| log.data.topics().first().is_some_and(|t| signatures.contains(t)))
            .cloned()
            .collect())
    }
}
