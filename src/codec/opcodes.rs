//! Typed constructors for the protocol commands the rollout and the
//! governance flows issue.

use alloy_primitives::{Address, Bytes, U256};

use super::{encode, CmdArg, ProtocolCommand};
use crate::constants::{BOOT_PROXY_IDX, COLD_PROXY_IDX, SAFE_MODE_PROXY_PATH};
use crate::errors::GovernError;

/// Transfer dispatcher authority to a new policy contract
pub const AUTHORITY_TRANSFER_CODE: u8 = 20;
/// Install a proxy module at a callpath index
pub const UPGRADE_CODE: u8 = 21;
/// Open or close the hot path (swaps outside the proxy)
pub const HOT_OPEN_CODE: u8 = 22;
/// Enable or disable safe mode
pub const SAFE_MODE_CODE: u8 = 23;
/// Set a pool type template
pub const POOL_TEMPLATE_CODE: u8 = 110;
/// Set the liquidity burned on pool initialization
pub const INIT_LIQ_CODE: u8 = 112;

/// Pool template and initial liquidity parameters for a network.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PoolParams {
    pub pool_idx: u64,
    pub fee_rate: u16,
    pub tick_size: u16,
    pub jit_thresh: u8,
    pub knockout: u8,
    pub oracle_flags: u8,
    pub init_liq: u128,
}

impl PoolParams {
    /// Standard template used on every network, only the pool index differs.
    pub const fn standard(pool_idx: u64) -> Self {
        Self {
            pool_idx,
            fee_rate: 500,
            tick_size: 64,
            jit_thresh: 5,
            knockout: 64,
            oracle_flags: 0,
            init_liq: 10_000,
        }
    }
}

/// `(20, policy)` sent through the cold path with sudo.
pub fn authority_transfer(policy: Address) -> Result<ProtocolCommand, GovernError> {
    let payload = encode(AUTHORITY_TRANSFER_CODE, &[CmdArg::Address(policy)])?;
    Ok(ProtocolCommand::new(COLD_PROXY_IDX, payload, true))
}

/// `(21, proxy, index)` sent through the boot callpath with sudo.
pub fn install_proxy(proxy: Address, index: u16) -> Result<ProtocolCommand, GovernError> {
    Ok(ProtocolCommand::new(BOOT_PROXY_IDX, install_proxy_payload(proxy, index)?, true))
}

pub fn install_proxy_payload(proxy: Address, index: u16) -> Result<Bytes, GovernError> {
    encode(UPGRADE_CODE, &[CmdArg::Address(proxy), CmdArg::uint(16, U256::from(index))])
}

/// `(22, open)` on the safe-mode callpath.
pub fn hot_path_open(open: bool) -> Result<ProtocolCommand, GovernError> {
    let payload = encode(HOT_OPEN_CODE, &[CmdArg::Bool(open)])?;
    Ok(ProtocolCommand::new(SAFE_MODE_PROXY_PATH, payload, true))
}

/// `(23, enabled)` on the safe-mode callpath.
pub fn safe_mode(enabled: bool) -> Result<ProtocolCommand, GovernError> {
    let payload = encode(SAFE_MODE_CODE, &[CmdArg::Bool(enabled)])?;
    Ok(ProtocolCommand::new(SAFE_MODE_PROXY_PATH, payload, true))
}

/// `(110, poolIdx, feeRate, tickSize, jitThresh, knockout, oracleFlags)`.
pub fn pool_template(params: &PoolParams) -> Result<ProtocolCommand, GovernError> {
    let payload = encode(
        POOL_TEMPLATE_CODE,
        &[
            CmdArg::uint(256, U256::from(params.pool_idx)),
            CmdArg::uint(16, U256::from(params.fee_rate)),
            CmdArg::uint(16, U256::from(params.tick_size)),
            CmdArg::uint(8, U256::from(params.jit_thresh)),
            CmdArg::uint(8, U256::from(params.knockout)),
            CmdArg::uint(8, U256::from(params.oracle_flags)),
        ],
    )?;
    Ok(ProtocolCommand::new(BOOT_PROXY_IDX, payload, false))
}

/// `(112, liquidity)`.
pub fn init_liquidity(params: &PoolParams) -> Result<ProtocolCommand, GovernError> {
    let payload = encode(INIT_LIQ_CODE, &[CmdArg::uint(128, U256::from(params.init_liq))])?;
    Ok(ProtocolCommand::new(BOOT_PROXY_IDX, payload, false))
}
