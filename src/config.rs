//! Startup configuration.
//!
//! Flags and environment are turned into a [`ChainContext`] once, before any
//! network traffic, and the context is passed down by reference.

use alloy_signer_local::PrivateKeySigner;
use clap::ValueEnum;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, info};

use crate::cli::GlobalArgs;
use crate::errors::GovernError;
use crate::registry::{AddressRegistry, Network, SaltRegistry};
use crate::timelock::{HashedNonceSalt, TimelockCallBuilder, WallClockSalt};

/// How timelock salts are generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum SaltStrategy {
    /// Hash of the call, a counter and per-process entropy
    #[default]
    Hashed,
    /// Wall-clock milliseconds (collides within one millisecond)
    Timestamp,
}

impl SaltStrategy {
    pub fn call_builder(self) -> TimelockCallBuilder {
        match self {
            SaltStrategy::Hashed => TimelockCallBuilder::new(HashedNonceSalt::new()),
            SaltStrategy::Timestamp => TimelockCallBuilder::new(WallClockSalt::new()),
        }
    }
}

/// Everything a command needs to know about the target chain.
pub struct ChainContext {
    pub network: Network,
    pub registry: AddressRegistry,
    pub salts: SaltRegistry,
    pub rpc_url: Option<String>,
    pub wallet: Option<PrivateKeySigner>,
    pub confirm_timeout: Duration,
}

impl ChainContext {
    /// Resolve the network, load registries and parse the wallet key.
    pub fn load(args: &GlobalArgs) -> Result<Self, GovernError> {
        let chain = args.chain.as_deref().ok_or_else(|| {
            GovernError::Configuration("CHAIN_ID is not set (use --chain or CHAIN_ID)".into())
        })?;
        let network: Network = chain.parse()?;

        let registry = match &args.registry {
            Some(path) => AddressRegistry::from_file(network, path)?,
            None => AddressRegistry::builtin(network),
        };
        let salts = load_salts(args.salts.as_deref())?;
        let wallet = args.wallet_key.as_deref().map(parse_wallet_key).transpose()?;

        info!(%network, registry_file = ?args.registry, "loaded chain context");
        Ok(Self {
            network,
            registry,
            salts,
            rpc_url: args.rpc_url.clone().filter(|u| !u.trim().is_empty()),
            wallet,
            confirm_timeout: Duration::from_secs(args.confirm_timeout),
        })
    }

    pub fn require_rpc_url(&self) -> Result<&str, GovernError> {
        self.rpc_url.as_deref().ok_or_else(|| {
            GovernError::Configuration("RPC_URL is not set (use --rpc-url or RPC_URL)".into())
        })
    }

    pub fn require_wallet(&self) -> Result<&PrivateKeySigner, GovernError> {
        self.wallet.as_ref().ok_or_else(|| {
            GovernError::Configuration("WALLET_KEY is not set (use --wallet-key or WALLET_KEY)".into())
        })
    }
}

/// Built-in salts, plus the entries of `path` if given.
pub fn load_salts(path: Option<&Path>) -> Result<SaltRegistry, GovernError> {
    let mut salts = SaltRegistry::builtin();
    if let Some(path) = path {
        salts.merge_file(path)?;
        debug!(path = %path.display(), entries = salts.len(), "merged salt file");
    }
    Ok(salts)
}

/// Parse a hex private key, with or without `0x`.
pub fn parse_wallet_key(raw: &str) -> Result<PrivateKeySigner, GovernError> {
    raw.trim()
        .parse::<PrivateKeySigner>()
        .map_err(|_| GovernError::Configuration("WALLET_KEY is not a valid private key".into()))
}
