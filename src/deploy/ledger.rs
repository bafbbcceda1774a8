use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::errors::GovernError;
use crate::registry::{AddressRegistry, Role};

/// Lifecycle of one protocol contract during rollout. Ordered: a contract
/// only moves to a later state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ContractState {
    Unregistered,
    /// Has an address (fresh or attached)
    Deployed,
    /// Wired into the dex (proxy installed, or authority handed to policy)
    Installed,
    /// Control handed to the governance timelocks
    ControlTransferred,
}

impl fmt::Display for ContractState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ContractState::Unregistered => "unregistered",
            ContractState::Deployed => "deployed",
            ContractState::Installed => "installed",
            ContractState::ControlTransferred => "control-transferred",
        };
        f.write_str(s)
    }
}

/// Per-role lifecycle record for the current run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DeploymentLedger {
    states: BTreeMap<Role, ContractState>,
}

impl DeploymentLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every role present in `registry` starts as `Deployed`.
    pub fn seeded_from(registry: &AddressRegistry, roles: &[Role]) -> Self {
        let states = roles
            .iter()
            .filter(|role| registry.get(**role).is_some())
            .map(|role| (*role, ContractState::Deployed))
            .collect();
        Self { states }
    }

    pub fn state(&self, role: Role) -> ContractState {
        self.states.get(&role).copied().unwrap_or(ContractState::Unregistered)
    }

    /// Move `role` to `next`. Staying put is allowed; moving back is not.
    pub fn advance(&mut self, role: Role, next: ContractState) -> Result<(), GovernError> {
        let current = self.state(role);
        if next < current {
            return Err(GovernError::Configuration(format!(
                "{role} cannot move from {current} back to {next}"
            )));
        }
        self.states.insert(role, next);
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = (Role, ContractState)> + '_ {
        self.states.iter().map(|(r, s)| (*r, *s))
    }
}
