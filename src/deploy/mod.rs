//! Deployment sequencer.
//!
//! The rollout is a fixed series of [`DeployStep`]s, each runnable on its
//! own. State lives in the address registry: a step attaches to every
//! contract the registry already names and deploys only what is missing, so
//! a run that died halfway is resumed by re-running from the failed step with
//! the printed registry.
//!
//! Every transaction passes through [`Confirm`] first.

pub mod artifacts;
pub mod confirm;
pub mod ledger;
pub mod steps;

pub use artifacts::{ArtifactSource, HardhatArtifacts};
pub use confirm::{AutoApprove, Confirm, StdinPrompt};
pub use ledger::{ContractState, DeploymentLedger};
pub use steps::{DeployStep, StepOutcome};

use alloy_primitives::Address;
use tracing::info;

use crate::constants::{DEPLOY_GAS_LIMIT, TIMELOCK_START_DELAY};
use crate::errors::GovernError;
use crate::output;
use crate::registry::{AddressRegistry, Role, SaltRegistry};
use crate::rpc::{ChainClient, Receipt, TxRequest};
use crate::timelock::TimelockCallBuilder;

/// Runs rollout steps against one chain and a working copy of the registry.
pub struct Sequencer<'a> {
    chain: &'a dyn ChainClient,
    artifacts: &'a dyn ArtifactSource,
    confirm: &'a dyn Confirm,
    salts: &'a SaltRegistry,
    calls: TimelockCallBuilder,
    registry: AddressRegistry,
    ledger: DeploymentLedger,
    target_delay: u64,
    pool_idx: Option<u64>,
}

impl<'a> Sequencer<'a> {
    pub fn new(
        chain: &'a dyn ChainClient,
        artifacts: &'a dyn ArtifactSource,
        confirm: &'a dyn Confirm,
        salts: &'a SaltRegistry,
        calls: TimelockCallBuilder,
        registry: AddressRegistry,
    ) -> Self {
        let ledger = DeploymentLedger::seeded_from(&registry, &Role::ALL);
        Self {
            chain,
            artifacts,
            confirm,
            salts,
            calls,
            registry,
            ledger,
            target_delay: TIMELOCK_START_DELAY,
            pool_idx: None,
        }
    }

    /// Delay the `timelock-delays` step proposes for the ops and treasury
    /// timelocks.
    pub fn with_target_delay(mut self, delay: u64) -> Self {
        self.target_delay = delay;
        self
    }

    /// Pool template index for the `pool-params` step, overriding the
    /// network's own.
    pub fn with_pool_idx(mut self, pool_idx: Option<u64>) -> Self {
        self.pool_idx = pool_idx;
        self
    }

    pub fn registry(&self) -> &AddressRegistry {
        &self.registry
    }

    pub fn ledger(&self) -> &DeploymentLedger {
        &self.ledger
    }

    pub fn into_registry(self) -> AddressRegistry {
        self.registry
    }

    /// Attach to `existing` if present, otherwise deploy `name` with
    /// `ctor_args` appended to its creation code. Attaching sends nothing;
    /// deploying sends exactly one transaction.
    pub async fn ensure_deployed(
        &mut self,
        name: &str,
        existing: Option<Address>,
        ctor_args: &[u8],
    ) -> Result<Address, GovernError> {
        if let Some(addr) = existing {
            info!(name, %addr, "attaching to existing contract");
            output::print_attached(name, &addr);
            return Ok(addr);
        }

        let mut init_code = self.artifacts.bytecode(name)?.to_vec();
        init_code.extend_from_slice(ctor_args);
        let receipt =
            self.transact(TxRequest::create(init_code, DEPLOY_GAS_LIMIT, format!("deploy {name}"))).await?;
        let addr = receipt.contract_address.ok_or_else(|| {
            GovernError::Network(format!("receipt for {name} deployment has no contract address"))
        })?;

        info!(name, %addr, "deployed contract");
        output::print_deployed(name, &addr);
        Ok(addr)
    }

    /// [`ensure_deployed`](Self::ensure_deployed) for a registry role; records
    /// the address and marks the role deployed.
    pub async fn ensure_role(
        &mut self,
        role: Role,
        name: &str,
        ctor_args: &[u8],
    ) -> Result<Address, GovernError> {
        let existing = self.registry.get(role);
        let addr = self.ensure_deployed(name, existing, ctor_args).await?;
        self.registry.set(role, addr);
        if self.ledger.state(role) < ContractState::Deployed {
            self.ledger.advance(role, ContractState::Deployed)?;
        }
        Ok(addr)
    }

    /// Ask for confirmation, then send and wait for the receipt.
    pub async fn transact(&self, tx: TxRequest) -> Result<Receipt, GovernError> {
        if !self.confirm.approve(&tx.label) {
            output::print_warning(&format!("declined: {}, nothing sent", tx.label));
            return Err(GovernError::Declined(tx.label));
        }
        let label = tx.label.clone();
        let receipt = self.chain.send(tx).await?;
        output::print_tx_confirmed(&label, &receipt.transaction_hash);
        Ok(receipt)
    }

    fn authority(&self) -> Result<Address, GovernError> {
        self.chain.sender().ok_or_else(|| {
            GovernError::Configuration("WALLET_KEY is required for deployment steps".into())
        })
    }
}
