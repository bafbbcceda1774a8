use alloy_primitives::{Address, U256};
use alloy_sol_types::{SolCall, SolValue};
use clap::ValueEnum;
use std::fmt;
use tracing::info;

use super::{ContractState, Sequencer};
use crate::codec::{opcodes, ProtocolCommand};
use crate::constants::{
    BOOT_PROXY_IDX, CMD_GAS_LIMIT, COLD_PROXY_IDX, FLAG_CROSS_PROXY_IDX, INIT_TIMELOCK_DELAY,
    KNOCKOUT_LP_PROXY_IDX, LONG_PROXY_IDX, LP_PROXY_IDX, MICRO_PROXY_IDX, SALTED_DEPLOY_GAS_LIMIT,
    SWAP_PROXY_IDX, TIMELOCK_START_DELAY,
};
use crate::contracts::{names, CrocDeployer, CrocPolicy};
use crate::errors::GovernError;
use crate::output;
use crate::registry::Role;
use crate::resolution::{GovernanceResolution, ResolutionKind, Resolutions};
use crate::rpc::TxRequest;

/// The rollout, in order. Each step assumes the registry entries produced
/// by the earlier ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum DeployStep {
    /// CrocDeployer owned by the signing wallet
    Deployer,
    /// CREATE2 deployment of CrocSwapDex through CrocDeployer
    Dex,
    /// ColdPath and CrocPolicy, cold path install, authority to policy
    Bootstrap,
    /// Every proxy module and periphery contract
    Sidecars,
    /// Install the proxies through the policy contract
    InstallProxies,
    /// Treasury, ops and emergency timelocks
    Timelocks,
    /// Hand the policy contract to the timelocks
    TransferGovernance,
    /// Print the resolution reinstalling WarmPath
    WarmResolution,
    /// Print the pool template and init liquidity resolutions
    PoolParams,
    /// Print the timelock delay updates
    TimelockDelays,
}

impl DeployStep {
    pub const ALL: [DeployStep; 10] = [
        DeployStep::Deployer,
        DeployStep::Dex,
        DeployStep::Bootstrap,
        DeployStep::Sidecars,
        DeployStep::InstallProxies,
        DeployStep::Timelocks,
        DeployStep::TransferGovernance,
        DeployStep::WarmResolution,
        DeployStep::PoolParams,
        DeployStep::TimelockDelays,
    ];

    /// 1-based position in the rollout.
    pub fn index(self) -> usize {
        DeployStep::ALL.iter().position(|s| *s == self).map_or(0, |i| i + 1)
    }

    pub fn name(self) -> &'static str {
        match self {
            DeployStep::Deployer => "deployer",
            DeployStep::Dex => "dex",
            DeployStep::Bootstrap => "bootstrap",
            DeployStep::Sidecars => "sidecars",
            DeployStep::InstallProxies => "install-proxies",
            DeployStep::Timelocks => "timelocks",
            DeployStep::TransferGovernance => "transfer-governance",
            DeployStep::WarmResolution => "warm-resolution",
            DeployStep::PoolParams => "pool-params",
            DeployStep::TimelockDelays => "timelock-delays",
        }
    }
}

impl fmt::Display for DeployStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What a step leaves for the operator: resolutions to hand to multisigs.
#[derive(Debug, Default)]
pub struct StepOutcome {
    pub resolutions: Vec<(String, GovernanceResolution)>,
}

impl StepOutcome {
    fn none() -> Self {
        Self::default()
    }
}

/// Proxy modules and the callpath each is installed at.
const PROXY_INSTALLS: [(Role, &str, u16); 6] = [
    (Role::Long, names::LONG_PATH, LONG_PROXY_IDX),
    (Role::Warm, names::WARM_PATH, LP_PROXY_IDX),
    (Role::Hot, names::HOT_PROXY, SWAP_PROXY_IDX),
    (Role::Micro, names::MICRO_PATHS, MICRO_PROXY_IDX),
    (Role::Knockout, names::KNOCKOUT_LIQ_PATH, KNOCKOUT_LP_PROXY_IDX),
    (Role::KoCross, names::KNOCKOUT_FLAG_PATH, FLAG_CROSS_PROXY_IDX),
];

const TIMELOCKS: [(Role, Role); 3] = [
    (Role::TimelockTreasury, Role::MultisigTreasury),
    (Role::TimelockOps, Role::MultisigOps),
    (Role::TimelockEmergency, Role::MultisigEmergency),
];

impl Sequencer<'_> {
    /// Run one step.
    pub async fn run(&mut self, step: DeployStep) -> Result<StepOutcome, GovernError> {
        output::print_step(step.index(), step.name());
        info!(step = %step, "running deployment step");
        match step {
            DeployStep::Deployer => self.deploy_deployer().await,
            DeployStep::Dex => self.deploy_dex().await,
            DeployStep::Bootstrap => self.bootstrap().await,
            DeployStep::Sidecars => self.deploy_sidecars().await,
            DeployStep::InstallProxies => self.install_proxies().await,
            DeployStep::Timelocks => self.deploy_timelocks().await,
            DeployStep::TransferGovernance => self.transfer_governance().await,
            DeployStep::WarmResolution => self.warm_resolution(),
            DeployStep::PoolParams => self.pool_params(),
            DeployStep::TimelockDelays => self.timelock_delays(),
        }
    }

    /// Run every step in order, collecting the printed resolutions.
    pub async fn run_all(&mut self) -> Result<StepOutcome, GovernError> {
        let mut all = StepOutcome::none();
        for step in DeployStep::ALL {
            all.resolutions.extend(self.run(step).await?.resolutions);
        }
        Ok(all)
    }

    async fn deploy_deployer(&mut self) -> Result<StepOutcome, GovernError> {
        let authority = self.authority()?;
        self.ensure_role(Role::Deployer, names::CROC_DEPLOYER, &authority.abi_encode()).await?;
        Ok(StepOutcome::none())
    }

    async fn deploy_dex(&mut self) -> Result<StepOutcome, GovernError> {
        if let Some(dex) = self.registry.get(Role::Dex) {
            output::print_attached(names::CROC_SWAP_DEX, &dex);
            return Ok(StepOutcome::none());
        }
        let deployer = self.registry.require(Role::Deployer)?;
        let salt = self.salts.resolve_address(deployer)?;
        let init_code = self.artifacts.bytecode(names::CROC_SWAP_DEX)?;

        let data = CrocDeployer::deployCall { initCode: init_code, salt: U256::from_be_bytes(salt.0) }
            .abi_encode();
        self.transact(TxRequest::call(
            deployer,
            data,
            SALTED_DEPLOY_GAS_LIMIT,
            "CrocDeployer.deploy(CrocSwapDex)",
        ))
        .await?;

        let ret = self.chain.call(deployer, CrocDeployer::dex_Call {}.abi_encode().into()).await?;
        let dex: Address = CrocDeployer::dex_Call::abi_decode_returns(&ret)
            .map_err(|e| GovernError::Encoding(format!("bad dex_() return: {e}")))?;

        info!(%dex, %salt, "CrocSwapDex deployed");
        output::print_deployed(names::CROC_SWAP_DEX, &dex);
        self.registry.set(Role::Dex, dex);
        self.ledger.advance(Role::Dex, ContractState::Deployed)?;
        Ok(StepOutcome::none())
    }

    async fn bootstrap(&mut self) -> Result<StepOutcome, GovernError> {
        let dex = self.registry.require(Role::Dex)?;
        let deployer = self.registry.require(Role::Deployer)?;

        let cold = self.ensure_role(Role::Cold, names::COLD_PATH, &[]).await?;
        let policy = self.ensure_role(Role::Policy, names::CROC_POLICY, &dex.abi_encode()).await?;

        let install = opcodes::install_proxy(cold, COLD_PROXY_IDX)?;
        self.deployer_cmd(deployer, dex, &install, "install ColdPath").await?;
        self.ledger.advance(Role::Cold, ContractState::Installed)?;

        let transfer = opcodes::authority_transfer(policy)?;
        self.deployer_cmd(deployer, dex, &transfer, "transfer authority to CrocPolicy").await?;
        self.ledger.advance(Role::Policy, ContractState::Installed)?;
        Ok(StepOutcome::none())
    }

    async fn deploy_sidecars(&mut self) -> Result<StepOutcome, GovernError> {
        let dex = self.registry.require(Role::Dex)?;
        let dex_arg = dex.abi_encode();

        self.ensure_role(Role::Cold, names::COLD_PATH, &[]).await?;
        for (role, name, _) in PROXY_INSTALLS {
            self.ensure_role(role, name, &[]).await?;
        }
        self.ensure_role(Role::Policy, names::CROC_POLICY, &dex_arg).await?;
        self.ensure_role(Role::Query, names::CROC_QUERY, &dex_arg).await?;
        self.ensure_role(Role::Impact, names::CROC_IMPACT, &dex_arg).await?;
        Ok(StepOutcome::none())
    }

    async fn install_proxies(&mut self) -> Result<StepOutcome, GovernError> {
        let dex = self.registry.require(Role::Dex)?;
        let policy = self.registry.require(Role::Policy)?;

        for (role, name, index) in PROXY_INSTALLS {
            let proxy = self.registry.require(role)?;
            let data = CrocPolicy::treasuryResolutionCall {
                minion: dex,
                proxyPath: BOOT_PROXY_IDX,
                cmd: opcodes::install_proxy_payload(proxy, index)?,
                sudo: true,
            }
            .abi_encode();
            let label = format!("install {name} at callpath {index}");
            self.transact(TxRequest::call(policy, data, CMD_GAS_LIMIT, label)).await?;
            self.ledger.advance(role, ContractState::Installed)?;
        }
        Ok(StepOutcome::none())
    }

    async fn deploy_timelocks(&mut self) -> Result<StepOutcome, GovernError> {
        for (timelock, multisig) in TIMELOCKS {
            let multisig = self.registry.require(multisig)?;
            let ctor = (U256::from(TIMELOCK_START_DELAY), vec![multisig], vec![multisig])
                .abi_encode_params();
            self.ensure_role(timelock, names::TIMELOCK_ACCEPTS, &ctor).await?;
        }
        Ok(StepOutcome::none())
    }

    async fn transfer_governance(&mut self) -> Result<StepOutcome, GovernError> {
        let policy = self.registry.require(Role::Policy)?;
        let data = CrocPolicy::transferGovernanceCall {
            ops: self.registry.require(Role::TimelockOps)?,
            treasury: self.registry.require(Role::TimelockTreasury)?,
            emergency: self.registry.require(Role::TimelockEmergency)?,
        }
        .abi_encode();
        self.transact(TxRequest::call(policy, data, CMD_GAS_LIMIT, "transfer governance to timelocks"))
            .await?;
        self.ledger.advance(Role::Policy, ContractState::ControlTransferred)?;
        Ok(StepOutcome::none())
    }

    fn warm_resolution(&mut self) -> Result<StepOutcome, GovernError> {
        let warm = self.registry.require(Role::Warm)?;
        let cmd = opcodes::install_proxy(warm, LP_PROXY_IDX)?;
        let res = Resolutions::new(&self.registry, &mut self.calls)
            .treasury_resolution(cmd, INIT_TIMELOCK_DELAY)?;
        Ok(StepOutcome { resolutions: vec![("Reinstall WarmPath at the LP callpath".into(), res)] })
    }

    fn pool_params(&mut self) -> Result<StepOutcome, GovernError> {
        let params = self.registry.network().pool_params(self.pool_idx)?;
        let mut flows = Resolutions::new(&self.registry, &mut self.calls);
        let init = flows.ops_resolution(opcodes::init_liquidity(&params)?, INIT_TIMELOCK_DELAY)?;
        let templ = flows.ops_resolution(opcodes::pool_template(&params)?, INIT_TIMELOCK_DELAY)?;
        Ok(StepOutcome {
            resolutions: vec![
                ("Set pool init liquidity".into(), init),
                ("Set standard pool template".into(), templ),
            ],
        })
    }

    fn timelock_delays(&mut self) -> Result<StepOutcome, GovernError> {
        let target = self.target_delay;
        let mut flows = Resolutions::new(&self.registry, &mut self.calls);
        let ops = flows.update_timelock_delay(ResolutionKind::Ops, target, INIT_TIMELOCK_DELAY)?;
        let treasury =
            flows.update_timelock_delay(ResolutionKind::Treasury, target, INIT_TIMELOCK_DELAY)?;
        Ok(StepOutcome {
            resolutions: vec![
                (format!("Set ops timelock delay to {target}s"), ops),
                (format!("Set treasury timelock delay to {target}s"), treasury),
            ],
        })
    }

    async fn deployer_cmd(
        &self,
        deployer: Address,
        dex: Address,
        cmd: &ProtocolCommand,
        label: &str,
    ) -> Result<(), GovernError> {
        let data = CrocDeployer::protocolCmdCall {
            dex,
            proxyPath: cmd.callpath,
            cmd: cmd.payload.clone(),
            sudo: cmd.sudo,
        }
        .abi_encode();
        self.transact(TxRequest::call(deployer, data, CMD_GAS_LIMIT, label)).await?;
        Ok(())
    }
}
