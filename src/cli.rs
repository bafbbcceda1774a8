use alloy_primitives::Address;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::codec::CmdArg;
use crate::config::SaltStrategy;
use crate::constants::{DEFAULT_CONFIRM_TIMEOUT_SECS, STATUS_FROM_BLOCK, TIMELOCK_START_DELAY};
use crate::deploy::DeployStep;
use crate::resolution::ResolutionKind;

/// CLI arguments for the CrocSwap operations tool
#[derive(Parser, Debug)]
#[command(name = "crocops", about = "CrocSwap deployment and governance tooling")]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Target chain: registry tag (0x1, 0x5, 0xafa, mock), chain id or name.
    #[arg(long = "chain", env = "CHAIN_ID", global = true)]
    pub chain: Option<String>,

    /// JSON-RPC endpoint of the target chain.
    #[arg(long, env = "RPC_URL", global = true)]
    pub rpc_url: Option<String>,

    /// Private key (hex) of the deploying authority.
    /// Can also be set via WALLET_KEY environment variable.
    #[arg(long, env = "WALLET_KEY", global = true, hide_env_values = true)]
    pub wallet_key: Option<String>,

    /// Address registry file replacing the built-in record of the chain.
    #[arg(long, global = true)]
    pub registry: Option<PathBuf>,

    /// Write the updated registry here after deployment steps.
    #[arg(long, global = true)]
    pub registry_out: Option<PathBuf>,

    /// Extra CREATE2 salts (`{"0xdeployer": "0xsalt"}`) merged into the built-in ones.
    #[arg(long, global = true)]
    pub salts: Option<PathBuf>,

    /// Hardhat artifacts directory.
    #[arg(long, global = true, default_value = "artifacts")]
    pub artifacts: PathBuf,

    /// Delay (seconds) to schedule resolutions with. When absent it is read
    /// from the timelock's getMinDelay().
    #[arg(long, global = true)]
    pub current_delay: Option<u64>,

    /// Standard pool template index, for chains without a known one.
    #[arg(long, global = true)]
    pub pool_idx: Option<u64>,

    /// How timelock salts are generated.
    #[arg(long, global = true, value_enum, default_value_t = SaltStrategy::Hashed)]
    pub salt_strategy: SaltStrategy,

    /// Seconds to wait for a transaction receipt.
    #[arg(long, global = true, default_value_t = DEFAULT_CONFIRM_TIMEOUT_SECS)]
    pub confirm_timeout: u64,

    /// Approve every transaction without prompting (CI).
    #[arg(long, global = true)]
    pub yes: bool,

    /// Print resolutions as JSON instead of instructions.
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable structured JSON logging instead of human-readable output.
    ///
    /// Logs go to stderr as newline-delimited JSON; operator output on
    /// stdout is unaffected.
    #[arg(long, global = true)]
    pub log_json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the address registry of the selected chain.
    Registry,

    /// Inspect or derive CREATE2 salts.
    Salt {
        #[command(subcommand)]
        action: SaltCommand,
    },

    /// Run rollout steps against the chain.
    Deploy {
        /// Step to run.
        #[arg(value_enum, required_unless_present = "all")]
        step: Option<DeployStep>,

        /// Run every step in order.
        #[arg(long, conflicts_with = "step")]
        all: bool,

        /// Delay (seconds) proposed by the timelock-delays step.
        #[arg(long, default_value_t = TIMELOCK_START_DELAY)]
        target_delay: u64,
    },

    /// Show safe mode and hot path state from the dex's event history.
    Status {
        /// First block to scan.
        #[arg(long, default_value_t = STATUS_FROM_BLOCK)]
        from: u64,
    },

    /// Print governance resolutions for the multisigs.
    Resolution {
        #[command(subcommand)]
        action: ResolutionCommand,
    },
}

#[derive(Subcommand, Debug)]
pub enum SaltCommand {
    /// Derive `keccak256(deployer)` and print it as a registry entry.
    Generate {
        /// Address of the CrocDeployer.
        deployer: Address,
    },
    /// Show the registered salt for a deployer, or every entry.
    Show {
        /// Deployer address (any hex case).
        deployer: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
pub enum ResolutionCommand {
    /// Arbitrary protocol command, e.g. `--opcode 21 address:0x.. uint16:2`.
    ProtocolCmd {
        /// ops or treasury.
        #[arg(long)]
        kind: ResolutionKind,
        /// Proxy callpath index the command is dispatched to.
        #[arg(long)]
        callpath: u16,
        /// Command opcode.
        #[arg(long)]
        opcode: u8,
        /// Dispatch with elevated privilege (treasury only).
        #[arg(long)]
        sudo: bool,
        /// Arguments as `type:value`.
        args: Vec<CmdArg>,
    },
    /// Install a proxy module at a callpath (treasury).
    InstallProxy {
        #[arg(long)]
        proxy: Address,
        #[arg(long)]
        index: u16,
    },
    /// Pool init liquidity and standard template for the chain (ops).
    PoolParams,
    /// Halt the dex (treasury).
    EmergencyHalt {
        #[arg(long)]
        reason: String,
    },
    /// Reopen the hot path and leave safe mode (treasury).
    RestoreOperations,
    /// Leave safe mode (treasury).
    DisableSafeMode,
    /// Change a timelock's delay, scheduled with its current delay.
    UpdateDelay {
        /// ops or treasury.
        #[arg(long)]
        kind: ResolutionKind,
        /// New delay in seconds (at most 7 days).
        #[arg(long)]
        new_delay: u64,
    },
}
