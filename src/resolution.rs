//! Governance resolutions.
//!
//! After rollout the policy contract only obeys the timelocks, and the
//! timelocks only obey their multisigs. Every administrative action is
//! therefore a [`GovernanceResolution`]: a policy call wrapped in a
//! schedule/execute pair on the right timelock, for the right multisig to
//! sign. Nothing here sends a transaction.

use alloy_primitives::{Address, Bytes, U256};
use alloy_sol_types::SolCall;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;
use tracing::info;

use crate::codec::opcodes;
use crate::codec::ProtocolCommand;
use crate::constants::MAX_TIMELOCK_DELAY;
use crate::contracts::{CrocPolicy, TimelockAccepts};
use crate::errors::GovernError;
use crate::registry::{AddressRegistry, Role};
use crate::timelock::{check_delay, TimelockCallBuilder, TimelockCallPair};

/// Which governance branch signs the resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResolutionKind {
    /// Routine parameters, signed by the ops multisig
    Ops,
    /// Upgrades and sudo commands, signed by the treasury multisig
    Treasury,
}

impl ResolutionKind {
    pub fn timelock_role(self) -> Role {
        match self {
            ResolutionKind::Ops => Role::TimelockOps,
            ResolutionKind::Treasury => Role::TimelockTreasury,
        }
    }

    pub fn multisig_role(self) -> Role {
        match self {
            ResolutionKind::Ops => Role::MultisigOps,
            ResolutionKind::Treasury => Role::MultisigTreasury,
        }
    }
}

impl fmt::Display for ResolutionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionKind::Ops => f.write_str("ops"),
            ResolutionKind::Treasury => f.write_str("treasury"),
        }
    }
}

impl FromStr for ResolutionKind {
    type Err = GovernError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ops" => Ok(ResolutionKind::Ops),
            "treasury" => Ok(ResolutionKind::Treasury),
            other => Err(GovernError::Configuration(format!(
                "unknown resolution kind `{other}` (expected ops or treasury)"
            ))),
        }
    }
}

/// What the resolution does once executed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum ResolutionAction {
    /// `protocolCmd` on the dex, relayed by the policy contract
    ProtocolCmd(ProtocolCommand),
    /// `emergencyHalt` on the policy contract
    EmergencyHalt { reason: String },
    /// `updateDelay` on the timelock itself
    TimelockDelay { current: u64, new: u64 },
}

/// One multisig-signed, timelocked governance action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GovernanceResolution {
    pub kind: ResolutionKind,
    pub action: ResolutionAction,
    pub multisig_origin: Address,
    pub policy_contract: Option<Address>,
    pub dex_contract: Option<Address>,
    pub timelock_call: TimelockCallPair,
}

impl GovernanceResolution {
    /// One-line summary of the executed effect.
    pub fn effect(&self) -> String {
        match &self.action {
            ResolutionAction::ProtocolCmd(cmd) => format!(
                "protocolCmd() on CrocSwapDex at {} (callpath {}, sudo {}, cmd {})",
                display_opt(self.dex_contract),
                cmd.callpath,
                cmd.sudo,
                cmd.payload
            ),
            ResolutionAction::EmergencyHalt { reason } => format!(
                "emergencyHalt() on CrocSwapDex at {} (reason: {reason:?})",
                display_opt(self.dex_contract)
            ),
            ResolutionAction::TimelockDelay { current, new } => format!(
                "updateDelay() on timelock at {} ({current}s -> {new}s)",
                self.timelock_call.target
            ),
        }
    }
}

fn display_opt(addr: Option<Address>) -> String {
    addr.map(|a| a.to_string()).unwrap_or_else(|| "<unset>".to_string())
}

/// Builds resolutions against one address registry.
pub struct Resolutions<'a> {
    registry: &'a AddressRegistry,
    calls: &'a mut TimelockCallBuilder,
}

impl<'a> Resolutions<'a> {
    pub fn new(registry: &'a AddressRegistry, calls: &'a mut TimelockCallBuilder) -> Self {
        Self { registry, calls }
    }

    /// `CrocPolicy.treasuryResolution(dex, callpath, cmd, sudo)` through the
    /// treasury timelock.
    pub fn treasury_resolution(
        &mut self,
        cmd: ProtocolCommand,
        delay: u64,
    ) -> Result<GovernanceResolution, GovernError> {
        let (policy, dex) = self.policy_and_dex()?;
        let data = CrocPolicy::treasuryResolutionCall {
            minion: dex,
            proxyPath: cmd.callpath,
            cmd: cmd.payload.clone(),
            sudo: cmd.sudo,
        }
        .abi_encode();
        self.wrap(ResolutionKind::Treasury, ResolutionAction::ProtocolCmd(cmd), policy, dex, data, delay)
    }

    /// `CrocPolicy.opsResolution(dex, callpath, cmd)` through the ops timelock.
    /// The sudo flag of `cmd` is not forwarded.
    pub fn ops_resolution(
        &mut self,
        cmd: ProtocolCommand,
        delay: u64,
    ) -> Result<GovernanceResolution, GovernError> {
        let (policy, dex) = self.policy_and_dex()?;
        let data = CrocPolicy::opsResolutionCall {
            minion: dex,
            proxyPath: cmd.callpath,
            cmd: cmd.payload.clone(),
        }
        .abi_encode();
        self.wrap(ResolutionKind::Ops, ResolutionAction::ProtocolCmd(cmd), policy, dex, data, delay)
    }

    /// Resolution for whichever branch `kind` names.
    pub fn resolution(
        &mut self,
        kind: ResolutionKind,
        cmd: ProtocolCommand,
        delay: u64,
    ) -> Result<GovernanceResolution, GovernError> {
        match kind {
            ResolutionKind::Ops => self.ops_resolution(cmd, delay),
            ResolutionKind::Treasury => self.treasury_resolution(cmd, delay),
        }
    }

    /// `CrocPolicy.emergencyHalt(dex, reason)` through the treasury timelock.
    pub fn emergency_halt(
        &mut self,
        reason: &str,
        delay: u64,
    ) -> Result<GovernanceResolution, GovernError> {
        let (policy, dex) = self.policy_and_dex()?;
        let data = CrocPolicy::emergencyHaltCall { minion: dex, reason: reason.to_string() }
            .abi_encode();
        let action = ResolutionAction::EmergencyHalt { reason: reason.to_string() };
        self.wrap(ResolutionKind::Treasury, action, policy, dex, data, delay)
    }

    /// Reopen the hot path, then leave safe mode.
    pub fn restore_operations(
        &mut self,
        delay: u64,
    ) -> Result<Vec<GovernanceResolution>, GovernError> {
        Ok(vec![
            self.treasury_resolution(opcodes::hot_path_open(true)?, delay)?,
            self.treasury_resolution(opcodes::safe_mode(false)?, delay)?,
        ])
    }

    /// Leave safe mode without touching the hot path.
    pub fn disable_safe_mode(&mut self, delay: u64) -> Result<GovernanceResolution, GovernError> {
        self.treasury_resolution(opcodes::safe_mode(false)?, delay)
    }

    /// `TimelockAccepts.updateDelay(new_delay)` on the timelock of `kind`,
    /// scheduled on that same timelock with `current_delay`.
    pub fn update_timelock_delay(
        &mut self,
        kind: ResolutionKind,
        new_delay: u64,
        current_delay: u64,
    ) -> Result<GovernanceResolution, GovernError> {
        check_delay(new_delay, Some(MAX_TIMELOCK_DELAY))?;

        let timelock = self.registry.require(kind.timelock_role())?;
        let multisig = self.registry.require(kind.multisig_role())?;
        let data: Bytes =
            TimelockAccepts::updateDelayCall { newDelay: U256::from(new_delay) }.abi_encode().into();
        let timelock_call = self.calls.build(timelock, timelock, data, current_delay)?;

        info!(%kind, new_delay, current_delay, "built timelock delay update");
        Ok(GovernanceResolution {
            kind,
            action: ResolutionAction::TimelockDelay { current: current_delay, new: new_delay },
            multisig_origin: multisig,
            policy_contract: self.registry.get(Role::Policy),
            dex_contract: self.registry.get(Role::Dex),
            timelock_call,
        })
    }

    fn policy_and_dex(&self) -> Result<(Address, Address), GovernError> {
        Ok((self.registry.require(Role::Policy)?, self.registry.require(Role::Dex)?))
    }

    fn wrap(
        &mut self,
        kind: ResolutionKind,
        action: ResolutionAction,
        policy: Address,
        dex: Address,
        data: Vec<u8>,
        delay: u64,
    ) -> Result<GovernanceResolution, GovernError> {
        let timelock = self.registry.require(kind.timelock_role())?;
        let multisig = self.registry.require(kind.multisig_role())?;
        let timelock_call = self.calls.build(timelock, policy, data.into(), delay)?;

        info!(%kind, %timelock, delay, "built governance resolution");
        Ok(GovernanceResolution {
            kind,
            action,
            multisig_origin: multisig,
            policy_contract: Some(policy),
            dex_contract: Some(dex),
            timelock_call,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::{decode, CmdArg, CmdArgType};
    use crate::constants::{BOOT_PROXY_IDX, LP_PROXY_IDX, SAFE_MODE_PROXY_PATH};
    use crate::registry::Network;
    use crate::timelock::HashedNonceSalt;
    use alloy_primitives::{address, B256};

    fn builder() -> TimelockCallBuilder {
        TimelockCallBuilder::new(HashedNonceSalt::with_entropy(B256::repeat_byte(3)))
    }

    fn exec_payload(res: &GovernanceResolution) -> Bytes {
        TimelockAccepts::executeCall::abi_decode(&res.timelock_call.exec_calldata).unwrap().data
    }

    #[test]
    fn test_treasury_resolution_wraps_policy_call() {
        let registry = AddressRegistry::builtin(Network::Mainnet);
        let mut calls = builder();
        let mut flows = Resolutions::new(&registry, &mut calls);
        let warm = address!("d268767BE4597151Ce2BB4a70A9E368ff26cB195");
        let cmd = opcodes::install_proxy(warm, LP_PROXY_IDX).unwrap();

        let res = flows.treasury_resolution(cmd.clone(), 172800).unwrap();
        let addrs = registry.addrs();
        assert_eq!(res.kind, ResolutionKind::Treasury);
        assert_eq!(res.multisig_origin, addrs.govern.multisig_treasury.unwrap());
        assert_eq!(res.timelock_call.timelock_addr, addrs.govern.timelock_treasury.unwrap());
        assert_eq!(res.timelock_call.target, addrs.policy.unwrap());
        assert_eq!(res.timelock_call.delay, 172800);

        let inner = CrocPolicy::treasuryResolutionCall::abi_decode(&exec_payload(&res)).unwrap();
        assert_eq!(inner.minion, addrs.dex.unwrap());
        assert_eq!(inner.proxyPath, BOOT_PROXY_IDX);
        assert_eq!(inner.cmd, cmd.payload);
        assert!(inner.sudo);
    }

    #[test]
    fn test_ops_resolution_uses_ops_branch() {
        let registry = AddressRegistry::builtin(Network::Mainnet);
        let mut calls = builder();
        let mut flows = Resolutions::new(&registry, &mut calls);
        let cmd = opcodes::init_liquidity(&Network::Mainnet.pool_params(None).unwrap()).unwrap();

        let res = flows.ops_resolution(cmd.clone(), 30).unwrap();
        let addrs = registry.addrs();
        assert_eq!(res.kind, ResolutionKind::Ops);
        assert_eq!(res.multisig_origin, addrs.govern.multisig_ops.unwrap());
        assert_eq!(res.timelock_call.timelock_addr, addrs.govern.timelock_ops.unwrap());

        let inner = CrocPolicy::opsResolutionCall::abi_decode(&exec_payload(&res)).unwrap();
        assert_eq!(inner.cmd, cmd.payload);
        let (opcode, args) = decode(&inner.cmd, &[CmdArgType::Uint(128)]).unwrap();
        assert_eq!(opcode, opcodes::INIT_LIQ_CODE);
        assert_eq!(args[0], CmdArg::uint(128, alloy_primitives::U256::from(10_000u64)));
    }

    #[test]
    fn test_missing_timelock_is_configuration_error() {
        let registry = AddressRegistry::builtin(Network::Mock);
        let mut calls = builder();
        let mut flows = Resolutions::new(&registry, &mut calls);
        let err = flows.disable_safe_mode(30).unwrap_err();
        assert!(matches!(err, GovernError::Configuration(_)));
    }

    #[test]
    fn test_emergency_halt_carries_reason() {
        let registry = AddressRegistry::builtin(Network::Goerli);
        let mut calls = builder();
        let mut flows = Resolutions::new(&registry, &mut calls);
        let res = flows.emergency_halt("oracle exploit", 0).unwrap();

        assert_eq!(res.kind, ResolutionKind::Treasury);
        let inner = CrocPolicy::emergencyHaltCall::abi_decode(&exec_payload(&res)).unwrap();
        assert_eq!(inner.reason, "oracle exploit");
        assert_eq!(inner.minion, registry.addrs().dex.unwrap());
    }

    #[test]
    fn test_restore_operations_opens_hot_path_then_leaves_safe_mode() {
        let registry = AddressRegistry::builtin(Network::Mainnet);
        let mut calls = builder();
        let mut flows = Resolutions::new(&registry, &mut calls);
        let steps = flows.restore_operations(3600).unwrap();
        assert_eq!(steps.len(), 2);

        let codes: Vec<u8> = steps
            .iter()
            .map(|res| {
                let inner =
                    CrocPolicy::treasuryResolutionCall::abi_decode(&exec_payload(res)).unwrap();
                assert_eq!(inner.proxyPath, SAFE_MODE_PROXY_PATH);
                assert!(inner.sudo);
                let (opcode, args) = decode(&inner.cmd, &[CmdArgType::Bool]).unwrap();
                match opcode {
                    opcodes::HOT_OPEN_CODE => assert_eq!(args[0], CmdArg::Bool(true)),
                    opcodes::SAFE_MODE_CODE => assert_eq!(args[0], CmdArg::Bool(false)),
                    other => panic!("unexpected opcode {other}"),
                }
                opcode
            })
            .collect();
        assert_eq!(codes, vec![opcodes::HOT_OPEN_CODE, opcodes::SAFE_MODE_CODE]);
        assert_ne!(steps[0].timelock_call.salt, steps[1].timelock_call.salt);
    }

    #[test]
    fn test_update_delay_targets_timelock_with_current_delay() {
        let registry = AddressRegistry::builtin(Network::Mainnet);
        let mut calls = builder();
        let mut flows = Resolutions::new(&registry, &mut calls);
        let res = flows.update_timelock_delay(ResolutionKind::Ops, 172800, 30).unwrap();

        let timelock = registry.addrs().govern.timelock_ops.unwrap();
        assert_eq!(res.timelock_call.timelock_addr, timelock);
        assert_eq!(res.timelock_call.target, timelock);
        assert_eq!(res.timelock_call.delay, 30);
        assert_eq!(res.action, ResolutionAction::TimelockDelay { current: 30, new: 172800 });

        let inner = TimelockAccepts::updateDelayCall::abi_decode(&exec_payload(&res)).unwrap();
        assert_eq!(inner.newDelay, U256::from(172800u64));
    }

    #[test]
    fn test_update_delay_ceiling_applies_to_new_delay() {
        let registry = AddressRegistry::builtin(Network::Mainnet);
        let mut calls = builder();
        let mut flows = Resolutions::new(&registry, &mut calls);

        assert!(flows.update_timelock_delay(ResolutionKind::Treasury, 604800, 30).is_ok());
        let err = flows.update_timelock_delay(ResolutionKind::Treasury, 604801, 30).unwrap_err();
        assert!(matches!(err, GovernError::PolicyViolation { value: 604801, .. }));

        // a long current delay is whatever the chain says it is
        assert!(flows.update_timelock_delay(ResolutionKind::Treasury, 30, 1_000_000).is_ok());
    }

    #[test]
    fn test_kind_parses() {
        assert_eq!("Ops".parse::<ResolutionKind>().unwrap(), ResolutionKind::Ops);
        assert_eq!("treasury".parse::<ResolutionKind>().unwrap(), ResolutionKind::Treasury);
        assert!("emergency".parse::<ResolutionKind>().is_err());
    }
}
