/// Boot callpath: privileged commands sent straight to the dispatcher
pub const BOOT_PROXY_IDX: u16 = 0;
/// Swap (hot) proxy callpath
pub const SWAP_PROXY_IDX: u16 = 1;
/// Flat LP (warm) proxy callpath
pub const LP_PROXY_IDX: u16 = 2;
/// Cold path proxy callpath (pool init, authority transfer)
pub const COLD_PROXY_IDX: u16 = 3;
/// Long-form order proxy callpath
pub const LONG_PROXY_IDX: u16 = 4;
/// Micro paths proxy callpath
pub const MICRO_PROXY_IDX: u16 = 5;
/// Knockout liquidity proxy callpath
pub const KNOCKOUT_LP_PROXY_IDX: u16 = 7;
/// Knockout cross-flag proxy callpath
pub const FLAG_CROSS_PROXY_IDX: u16 = 3500;
/// Safe-mode callpath, still reachable while the dex is halted
pub const SAFE_MODE_PROXY_PATH: u16 = 9999;

/// Ceiling applied to new timelock delays (7 days)
pub const MAX_TIMELOCK_DELAY: u64 = 7 * 24 * 3600;
/// Minimum delay the timelocks are deployed with
pub const TIMELOCK_START_DELAY: u64 = 30;
/// Delay used for resolutions issued during initial rollout
pub const INIT_TIMELOCK_DELAY: u64 = 30;

/// Gas limit for plain contract deployments
pub const DEPLOY_GAS_LIMIT: u64 = 6_000_000;
/// Gas limit for the salted CrocSwapDex deployment through CrocDeployer
pub const SALTED_DEPLOY_GAS_LIMIT: u64 = 10_000_000;
/// Gas limit for protocol commands and governance calls
pub const CMD_GAS_LIMIT: u64 = 1_000_000;

/// Default wait for a transaction receipt, in seconds
pub const DEFAULT_CONFIRM_TIMEOUT_SECS: u64 = 300;

/// Blocks per `eth_getLogs` request, under the common 10k provider cap
pub const LOG_BLOCK_RANGE: u64 = 9_900;
/// First block scanned for dex status events when no `--from` is given
pub const STATUS_FROM_BLOCK: u64 = 5_000_000;
