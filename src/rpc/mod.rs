//! Chain access.
//!
//! Everything the deployment steps and delay lookups need from a node sits
//! behind [`ChainClient`], so the sequencer can run against an in-memory
//! chain in tests and against [`JsonRpcChain`] in production.

pub mod client;
pub mod types;

#[cfg(test)]
pub mod mock;

pub use client::JsonRpcChain;
pub use types::{ChainLog, Receipt, TxRequest};

use alloy_primitives::{Address, Bytes, B256, U256};
use alloy_sol_types::SolCall;
use async_trait::async_trait;

use crate::contracts::TimelockAccepts;
use crate::errors::GovernError;

/// Minimal chain interface: read, scan logs, and send one transaction at a
/// time, waiting for its receipt.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Account that signs `send`, if any.
    fn sender(&self) -> Option<Address>;

    /// `eth_call` against the latest block.
    async fn call(&self, to: Address, data: Bytes) -> Result<Bytes, GovernError>;

    /// Sign, submit and wait for the receipt. A reverted transaction is a
    /// `ContractRevert` error, so an `Ok` receipt always succeeded.
    async fn send(&self, tx: TxRequest) -> Result<Receipt, GovernError>;

    /// Latest block number.
    async fn block_number(&self) -> Result<u64, GovernError>;

    /// Mined logs of `address` whose first topic is one of `signatures`, in
    /// the inclusive block range.
    async fn logs(
        &self,
        address: Address,
        signatures: &[B256],
        from_block: u64,
        to_block: u64,
    ) -> Result<Vec<ChainLog>, GovernError>;
}

/// Read `getMinDelay()` from a timelock.
pub async fn timelock_min_delay(
    chain: &dyn ChainClient,
    timelock: Address,
) -> Result<u64, GovernError> {
    let ret = chain.call(timelock, TimelockAccepts::getMinDelayCall {}.abi_encode().into()).await?;
    let delay: U256 = TimelockAccepts::getMinDelayCall::abi_decode_returns(&ret)
        .map_err(|e| GovernError::Encoding(format!("bad getMinDelay() return: {e}")))?;
    u64::try_from(delay).map_err(|_| {
        GovernError::Encoding(format!("timelock {timelock} delay {delay} does not fit u64"))
    })
}

#[cfg(test)]
mod tests {
    use super::mock::MockChain;
    use super::*;
    use alloy_sol_types::SolValue;

    #[tokio::test]
    async fn test_timelock_min_delay_decodes_return() {
        let timelock = Address::with_last_byte(0x77);
        let chain = MockChain::new();
        chain.respond(
            timelock,
            TimelockAccepts::getMinDelayCall::SELECTOR,
            U256::from(172800u64).abi_encode().into(),
        );

        assert_eq!(timelock_min_delay(&chain, timelock).await.unwrap(), 172800);
    }

    #[tokio::test]
    async fn test_timelock_min_delay_unknown_contract_reverts() {
        let chain = MockChain::new();
        let err = timelock_min_delay(&chain, Address::with_last_byte(1)).await.unwrap_err();
        assert!(matches!(err, GovernError::ContractRevert { .. }));
    }
}
