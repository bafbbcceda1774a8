use alloy_primitives::{address, Address};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use super::addresses::{GovernAddrs, ProtocolAddrs};
use crate::codec::opcodes::PoolParams;
use crate::errors::GovernError;

/// Every chain the tool has a registry record for.
///
/// Adding a chain means adding a variant; the compiler then points at every
/// match that needs a record, a chain id and pool parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Network {
    Mainnet,
    /// Goerli registry used for mainnet dry runs
    Goerli,
    MorphHolesky,
    /// Local fork
    Mock,
}

impl Network {
    pub const ALL: [Network; 4] =
        [Network::Mainnet, Network::Goerli, Network::MorphHolesky, Network::Mock];

    /// Registry key used by the original address files (`CHAIN_ID`).
    pub fn tag(self) -> &'static str {
        match self {
            Network::Mainnet => "0x1",
            Network::Goerli => "0x5",
            Network::MorphHolesky => "0xafa",
            Network::Mock => "mock",
        }
    }

    /// EIP-155 chain id.
    pub fn chain_id(self) -> u64 {
        match self {
            Network::Mainnet => 1,
            Network::Goerli => 5,
            Network::MorphHolesky => 2810,
            Network::Mock => 31337,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Network::Mainnet => "mainnet",
            Network::Goerli => "goerli",
            Network::MorphHolesky => "morph-holesky",
            Network::Mock => "mock",
        }
    }

    /// Built-in address record for this network.
    pub fn addrs(self) -> ProtocolAddrs {
        match self {
            Network::Mainnet => mainnet_addrs(),
            Network::Goerli => goerli_dry_run_addrs(),
            Network::MorphHolesky => morph_holesky_addrs(),
            Network::Mock => mock_addrs(),
        }
    }

    /// Standard pool template index in use on this network, if one is known.
    /// The mock chain mirrors goerli.
    pub fn pool_index(self) -> Option<u64> {
        match self {
            Network::Mainnet => Some(420),
            Network::Goerli | Network::Mock => Some(36000),
            Network::MorphHolesky => None,
        }
    }

    /// Pool parameters for `pool_idx`, or for the network's own index.
    pub fn pool_params(self, pool_idx: Option<u64>) -> Result<PoolParams, GovernError> {
        pool_idx.or(self.pool_index()).map(PoolParams::standard).ok_or_else(|| {
            GovernError::Configuration(format!(
                "no standard pool index known for {self}; pass --pool-idx"
            ))
        })
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.tag())
    }
}

/// Accepts the registry tag (`0xafa`), the decimal chain id (`2810`) or the name.
impl FromStr for Network {
    type Err = GovernError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Network::ALL
            .into_iter()
            .find(|n| {
                n.tag() == needle || n.name() == needle || n.chain_id().to_string() == needle
            })
            .ok_or_else(|| {
                GovernError::Configuration(format!(
                    "unsupported chain `{s}` (expected one of 0x1, 0x5, 0xafa, mock)"
                ))
            })
    }
}

fn some(addr: Address) -> Option<Address> {
    Some(addr)
}

fn mock_addrs() -> ProtocolAddrs {
    ProtocolAddrs {
        dex: some(address!("AAAAaAAa7A116286168fe3733f994062bc73CbF3")),
        cold: some(address!("C469e7aE4aD962c30c7111dc580B4adbc7E914DD")),
        policy: some(address!("43ca3D2C94be00692D207C6A1e60D8B325c6f12f")),
        deployer: some(address!("73511669fd4de447fed18bb79bafeac93ab7f31f")),
        ..Default::default()
    }
}

fn mainnet_addrs() -> ProtocolAddrs {
    ProtocolAddrs {
        dex: some(address!("AaAaAAAaA24eEeb8d57D431224f73832bC34f688")),
        cold: some(address!("F8fe6fA0D9c778F8d814c838758B57a9Cf1dD710")),
        warm: some(address!("d268767BE4597151Ce2BB4a70A9E368ff26cB195")),
        long: some(address!("13242bD05B1d3D6b79ADA2b28678C235F3f2389B")),
        micro: some(address!("396d435f5d0756c6f7EdD82E6C67BDc6C093985d")),
        hot: some(address!("a9Dd587ad17Aed82CAc5596B16DCc9DeFEc885Cb")),
        knockout: some(address!("7F5D75AdE75646919c923C98D53E9Cc7Be7ea794")),
        ko_cross: some(address!("509DE582af6B4658a1830f7882077FBA5523C957")),
        policy: some(address!("0b6CD0ECb176cb39Ad99B3A0E4294167a80B68a3")),
        query: some(address!("CA00926b6190c2C59336E73F02569c356d7B6b56")),
        impact: some(address!("3e3EDd3eD7621891E574E5d7f47b1f30A994c0D0")),
        shell: None,
        policy_shell: None,
        deployer: some(address!("25662C94D28DA775C4E4FDCA987B14D704B4b349")),
        govern: GovernAddrs {
            multisig_treasury: some(address!("DBD8D583a18C99e7f5191351E6E739AF8e62DaC3")),
            multisig_ops: some(address!("9fACdcfb3b58D85d0440aF292D64480Ad2503A6e")),
            multisig_emergency: some(address!("803291D2581C17de29FecA7C64b309e241988e2C")),
            timelock_treasury: some(address!("7237C120FCA2081f1A36AB933B065389174962B7")),
            timelock_ops: some(address!("41114A13230625A2735FaA7183e528Ed2538cB7b")),
            timelock_emergency: some(address!("7237C120FCA2081f1A36AB933B065389174962B7")),
        },
    }
}

fn goerli_dry_run_addrs() -> ProtocolAddrs {
    ProtocolAddrs {
        dex: some(address!("AaAaAAAaA24eEeb8d57D431224f73832bC34f688")),
        cold: some(address!("0b6CD0ECb176cb39Ad99B3A0E4294167a80B68a3")),
        warm: some(address!("d268767BE4597151Ce2BB4a70A9E368ff26cB195")),
        long: some(address!("13242bD05B1d3D6b79ADA2b28678C235F3f2389B")),
        micro: some(address!("323172539b1b0d9eddffbd0318c4d6ab45292843")),
        hot: some(address!("41114A13230625A2735FaA7183e528Ed2538cB7b")),
        knockout: some(address!("7F5D75AdE75646919c923C98D53E9Cc7Be7ea794")),
        ko_cross: some(address!("509DE582af6B4658a1830f7882077FBA5523C957")),
        policy: some(address!("62beAB7f90Fe2EFD230e61a95DD2c753f466AB13")),
        query: some(address!("c2e1f740E11294C64adE66f69a1271C5B32004c8")),
        impact: some(address!("3e3EDd3eD7621891E574E5d7f47b1f30A994c0D0")),
        shell: None,
        policy_shell: None,
        deployer: some(address!("25662C94D28DA775C4E4FDCA987B14D704B4b349")),
        govern: GovernAddrs {
            multisig_treasury: some(address!("78e80194528C5BbC1Bbce7f5A7e7B1A143200351")),
            multisig_ops: some(address!("2D2E5B97Acdea31efbf11b39AeA8dbd5B0c258F1")),
            multisig_emergency: some(address!("53e3713543737Af4eCb1ad74563402C64e307f0D")),
            timelock_treasury: some(address!("fd66C5FFF528e1855e498CD324520107885A5288")),
            timelock_ops: some(address!("eF7D040C5540feedD74BA8E5a5167b19c24C940d")),
            timelock_emergency: some(address!("fd66C5FFF528e1855e498CD324520107885A5288")),
        },
    }
}

fn morph_holesky_addrs() -> ProtocolAddrs {
    ProtocolAddrs {
        dex: some(address!("cd5f6Fa8d2f3DEAaf51b721dF0B109554D8853aF")),
        cold: some(address!("6bd17F4e0a5FAD35FE067DDc9ED7E4236286C8a3")),
        warm: some(address!("447B4ff02e87AF7f182a30F6C88d15d5Aa4B0945")),
        long: some(address!("395Bf9702833A43208914bCb99a73AEdAd36d1Bd")),
        micro: some(address!("06f53E3BabC31DB106e295B8E945990a01f09052")),
        hot: some(address!("88DeD87cb3A8582Ec57a150B78c16680102C18D6")),
        knockout: some(address!("c9381CA673C2E49596E3fD235bC99f4F3326285d")),
        ko_cross: some(address!("c6E378fbA998c3Aa350cB1C6c857dF25610f51f0")),
        policy: some(address!("deaAc49f52d2043E70F00B9dFF15Dc4141214f9C")),
        query: some(address!("248f259E685f6977C797E93c4FCC83cBE5556633")),
        impact: some(address!("4e1E63eFf1D99414eafd9D4a2D6840A93311c680")),
        shell: None,
        policy_shell: None,
        deployer: some(address!("30f85668C4b4C5e99Eb2B415CcEFab59228295bC")),
        govern: GovernAddrs {
            multisig_treasury: some(address!("86D9709eF6614e3F10FEF0806C24d30368C8F0Ed")),
            multisig_ops: some(address!("fDDb1a444D4C362c1c235426737206fb34575f8a")),
            multisig_emergency: some(address!("fDDb1a444D4C362c1c235426737206fb34575f8a")),
            timelock_treasury: some(address!("5c983967ABCE6f03c153b31Ee3395c7B58Ece2Ef")),
            timelock_ops: some(address!("4Ba179aDf98FddEFac1BC05fc021bb23afB7aF47")),
            timelock_emergency: some(address!("5c983967ABCE6f03c153b31Ee3395c7B58Ece2Ef")),
        },
    }
}
