//! ABI surface of the CrocSwap contracts this tool talks to.
//!
//! Only the entry points the deployment steps and governance flows need are
//! declared. Calldata is produced with `SolCall::abi_encode`; the contracts
//! themselves are never modelled here.

use alloy_sol_types::sol;

sol! {
    /// OpenZeppelin-style timelock used by the treasury, ops and emergency roles.
    interface TimelockAccepts {
        function schedule(
            address target,
            uint256 value,
            bytes data,
            bytes32 predecessor,
            bytes32 salt,
            uint256 delay
        ) external;

        function execute(
            address target,
            uint256 value,
            bytes data,
            bytes32 predecessor,
            bytes32 salt
        ) external payable;

        function getMinDelay() external view returns (uint256);

        function updateDelay(uint256 newDelay) external;
    }
}

sol! {
    /// Governance front door of the dex; the timelocks own it after rollout.
    interface CrocPolicy {
        function treasuryResolution(address minion, uint16 proxyPath, bytes cmd, bool sudo) external;

        function opsResolution(address minion, uint16 proxyPath, bytes cmd) external;

        function emergencyHalt(address minion, string reason) external;

        function transferGovernance(address ops, address treasury, address emergency) external;
    }
}

sol! {
    /// Bootstrap authority that CREATE2-deploys the dex and boots its first proxy.
    interface CrocDeployer {
        function protocolCmd(address dex, uint16 proxyPath, bytes cmd, bool sudo) external;

        function deploy(bytes initCode, uint256 salt) external returns (address);

        function dex_() external view returns (address);
    }
}

sol! {
    /// Operational status events emitted by the dex.
    interface CrocEvents {
        event SafeMode(bool inSafeMode);

        event HotPathOpen(bool open);
    }
}

/// Hardhat artifact names of every contract the sequencer can deploy.
pub mod names {
    pub const CROC_DEPLOYER: &str = "CrocDeployer";
    pub const CROC_SWAP_DEX: &str = "CrocSwapDex";
    pub const CROC_POLICY: &str = "CrocPolicy";
    pub const CROC_QUERY: &str = "CrocQuery";
    pub const CROC_IMPACT: &str = "CrocImpact";
    pub const COLD_PATH: &str = "ColdPath";
    pub const WARM_PATH: &str = "WarmPath";
    pub const LONG_PATH: &str = "LongPath";
    pub const MICRO_PATHS: &str = "MicroPaths";
    pub const HOT_PROXY: &str = "HotProxy";
    pub const KNOCKOUT_LIQ_PATH: &str = "KnockoutLiqPath";
    pub const KNOCKOUT_FLAG_PATH: &str = "KnockoutFlagPath";
    pub const TIMELOCK_ACCEPTS: &str = "TimelockAccepts";
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::keccak256;
    use alloy_sol_types::SolCall;

    fn selector(signature: &str) -> [u8; 4] {
        let hash = keccak256(signature.as_bytes());
        [hash[0], hash[1], hash[2], hash[3]]
    }

    #[test]
    fn test_timelock_selectors() {
        assert_eq!(
            TimelockAccepts::scheduleCall::SELECTOR,
            selector("schedule(address,uint256,bytes,bytes32,bytes32,uint256)")
        );
        assert_eq!(
            TimelockAccepts::executeCall::SELECTOR,
            selector("execute(address,uint256,bytes,bytes32,bytes32)")
        );
        assert_eq!(TimelockAccepts::getMinDelayCall::SELECTOR, selector("getMinDelay()"));
    }

    #[test]
    fn test_policy_selectors() {
        assert_eq!(
            CrocPolicy::treasuryResolutionCall::SELECTOR,
            selector("treasuryResolution(address,uint16,bytes,bool)")
        );
        assert_eq!(
            CrocPolicy::opsResolutionCall::SELECTOR,
            selector("opsResolution(address,uint16,bytes)")
        );
        assert_eq!(
            CrocPolicy::emergencyHaltCall::SELECTOR,
            selector("emergencyHalt(address,string)")
        );
    }

    #[test]
    fn test_deployer_selectors() {
        assert_eq!(CrocDeployer::deployCall::SELECTOR, selector("deploy(bytes,uint256)"));
        assert_eq!(CrocDeployer::dex_Call::SELECTOR, selector("dex_()"));
    }

    #[test]
    fn test_status_event_topics() {
        use alloy_sol_types::SolEvent;
        assert_eq!(CrocEvents::SafeMode::SIGNATURE_HASH, keccak256("SafeMode(bool)"));
        assert_eq!(CrocEvents::HotPathOpen::SIGNATURE_HASH, keccak256("HotPathOpen(bool)"));
    }
}
