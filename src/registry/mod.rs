//! Address and salt registries.
//!
//! Both are plain values built once at startup and handed to whatever needs
//! them. The address record for a chain comes from the built-in table for its
//! [`Network`] unless a registry file replaces it; deployment steps update a
//! local copy and print it for the operator to commit.

pub mod addresses;
pub mod networks;
pub mod salts;

pub use addresses::{GovernAddrs, ProtocolAddrs};
pub use networks::Network;
pub use salts::{derive_salt, SaltRegistry};

use alloy_primitives::Address;
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::Path;

use crate::errors::GovernError;

/// A logical contract role in the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum Role {
    Deployer,
    Dex,
    Cold,
    Warm,
    Long,
    Micro,
    Hot,
    Knockout,
    KoCross,
    Policy,
    Query,
    Impact,
    MultisigTreasury,
    MultisigOps,
    MultisigEmergency,
    TimelockTreasury,
    TimelockOps,
    TimelockEmergency,
}

impl Role {
    pub const ALL: [Role; 18] = [
        Role::Deployer,
        Role::Dex,
        Role::Cold,
        Role::Warm,
        Role::Long,
        Role::Micro,
        Role::Hot,
        Role::Knockout,
        Role::KoCross,
        Role::Policy,
        Role::Query,
        Role::Impact,
        Role::MultisigTreasury,
        Role::MultisigOps,
        Role::MultisigEmergency,
        Role::TimelockTreasury,
        Role::TimelockOps,
        Role::TimelockEmergency,
    ];

    /// Field name used in registry files.
    pub fn key(self) -> &'static str {
        match self {
            Role::Deployer => "deployer",
            Role::Dex => "dex",
            Role::Cold => "cold",
            Role::Warm => "warm",
            Role::Long => "long",
            Role::Micro => "micro",
            Role::Hot => "hot",
            Role::Knockout => "knockout",
            Role::KoCross => "koCross",
            Role::Policy => "policy",
            Role::Query => "query",
            Role::Impact => "impact",
            Role::MultisigTreasury => "govern.multisigTreasury",
            Role::MultisigOps => "govern.multisigOps",
            Role::MultisigEmergency => "govern.multisigEmergency",
            Role::TimelockTreasury => "govern.timelockTreasury",
            Role::TimelockOps => "govern.timelockOps",
            Role::TimelockEmergency => "govern.timelockEmergency",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// The address record of the selected network.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressRegistry {
    network: Network,
    addrs: ProtocolAddrs,
}

impl AddressRegistry {
    /// Registry backed by the built-in record of `network`.
    pub fn builtin(network: Network) -> Self {
        Self { network, addrs: network.addrs() }
    }

    pub fn new(network: Network, addrs: ProtocolAddrs) -> Self {
        Self { network, addrs }
    }

    /// Registry whose record is read from a JSON file (same shape as the
    /// printed registry) instead of the built-in table.
    pub fn from_file(network: Network, path: &Path) -> Result<Self, GovernError> {
        let data = fs::read_to_string(path).map_err(|e| {
            GovernError::Configuration(format!("cannot read registry {}: {e}", path.display()))
        })?;
        let addrs = serde_json::from_str(&data).map_err(|e| {
            GovernError::Configuration(format!("invalid registry {}: {e}", path.display()))
        })?;
        Ok(Self { network, addrs })
    }

    pub fn network(&self) -> Network {
        self.network
    }

    pub fn addrs(&self) -> &ProtocolAddrs {
        &self.addrs
    }

    /// Address of `role`, or `None` if it is not deployed on this chain.
    pub fn get(&self, role: Role) -> Option<Address> {
        let a = &self.addrs;
        let g = &a.govern;
        match role {
            Role::Deployer => a.deployer,
            Role::Dex => a.dex,
            Role::Cold => a.cold,
            Role::Warm => a.warm,
            Role::Long => a.long,
            Role::Micro => a.micro,
            Role::Hot => a.hot,
            Role::Knockout => a.knockout,
            Role::KoCross => a.ko_cross,
            Role::Policy => a.policy,
            Role::Query => a.query,
            Role::Impact => a.impact,
            Role::MultisigTreasury => g.multisig_treasury,
            Role::MultisigOps => g.multisig_ops,
            Role::MultisigEmergency => g.multisig_emergency,
            Role::TimelockTreasury => g.timelock_treasury,
            Role::TimelockOps => g.timelock_ops,
            Role::TimelockEmergency => g.timelock_emergency,
        }
    }

    /// Address of `role`; a missing entry is a configuration error.
    pub fn require(&self, role: Role) -> Result<Address, GovernError> {
        self.get(role).ok_or_else(|| GovernError::missing_role(role.key()))
    }

    /// Record a deployed address.
    pub fn set(&mut self, role: Role, addr: Address) {
        let a = &mut self.addrs;
        let slot = match role {
            Role::Deployer => &mut a.deployer,
            Role::Dex => &mut a.dex,
            Role::Cold => &mut a.cold,
            Role::Warm => &mut a.warm,
            Role::Long => &mut a.long,
            Role::Micro => &mut a.micro,
            Role::Hot => &mut a.hot,
            Role::Knockout => &mut a.knockout,
            Role::KoCross => &mut a.ko_cross,
            Role::Policy => &mut a.policy,
            Role::Query => &mut a.query,
            Role::Impact => &mut a.impact,
            Role::MultisigTreasury => &mut a.govern.multisig_treasury,
            Role::MultisigOps => &mut a.govern.multisig_ops,
            Role::MultisigEmergency => &mut a.govern.multisig_emergency,
            Role::TimelockTreasury => &mut a.govern.timelock_treasury,
            Role::TimelockOps => &mut a.govern.timelock_ops,
            Role::TimelockEmergency => &mut a.govern.timelock_emergency,
        };
        *slot = Some(addr);
    }

    /// Pretty JSON of the record, in registry-file shape.
    pub fn to_json(&self) -> Result<String, GovernError> {
        serde_json::to_string_pretty(&self.addrs)
            .map_err(|e| GovernError::Configuration(format!("cannot serialize registry: {e}")))
    }

    /// Write the record to `path` in registry-file shape.
    pub fn write_file(&self, path: &Path) -> Result<(), GovernError> {
        fs::write(path, self.to_json()? + "\n").map_err(|e| {
            GovernError::Configuration(format!("cannot write registry {}: {e}", path.display()))
        })
    }
}
