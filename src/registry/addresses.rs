use alloy_primitives::Address;
use serde::{Deserialize, Serialize};

/// Governance sub-addresses: one multisig and one timelock per role.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GovernAddrs {
    #[serde(default, with = "empty_as_none")]
    pub multisig_treasury: Option<Address>,
    #[serde(default, with = "empty_as_none")]
    pub multisig_ops: Option<Address>,
    #[serde(default, with = "empty_as_none")]
    pub multisig_emergency: Option<Address>,
    #[serde(default, with = "empty_as_none")]
    pub timelock_treasury: Option<Address>,
    #[serde(default, with = "empty_as_none")]
    pub timelock_ops: Option<Address>,
    #[serde(default, with = "empty_as_none")]
    pub timelock_emergency: Option<Address>,
}

/// Deployed addresses of every protocol role on one chain.
///
/// `None` means the role has not been deployed on this chain yet. A present
/// address is trusted as-is; nothing here checks that code lives there.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProtocolAddrs {
    #[serde(default, with = "empty_as_none")]
    pub dex: Option<Address>,
    #[serde(default, with = "empty_as_none")]
    pub cold: Option<Address>,
    #[serde(default, with = "empty_as_none")]
    pub warm: Option<Address>,
    #[serde(default, with = "empty_as_none")]
    pub long: Option<Address>,
    #[serde(default, with = "empty_as_none")]
    pub micro: Option<Address>,
    #[serde(default, with = "empty_as_none")]
    pub hot: Option<Address>,
    #[serde(default, with = "empty_as_none")]
    pub knockout: Option<Address>,
    #[serde(default, with = "empty_as_none")]
    pub ko_cross: Option<Address>,
    #[serde(default, with = "empty_as_none")]
    pub policy: Option<Address>,
    #[serde(default, with = "empty_as_none")]
    pub query: Option<Address>,
    #[serde(default, with = "empty_as_none")]
    pub impact: Option<Address>,
    #[serde(default, with = "empty_as_none")]
    pub shell: Option<Address>,
    #[serde(default, with = "empty_as_none")]
    pub policy_shell: Option<Address>,
    #[serde(default, with = "empty_as_none")]
    pub deployer: Option<Address>,
    #[serde(default)]
    pub govern: GovernAddrs,
}

/// Registry files write undeployed roles as `""`.
mod empty_as_none {
    use alloy_primitives::Address;
    use serde::{de::Error, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<Address>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(addr) => s.serialize_str(&addr.to_checksum(None)),
            None => s.serialize_str(""),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Address>, D::Error> {
        let raw = Option::<String>::deserialize(d)?.unwrap_or_default();
        let raw = raw.trim();
        if raw.is_empty() {
            return Ok(None);
        }
        raw.parse::<Address>().map(Some).map_err(D::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloy_primitives::address;

    #[test]
    fn test_empty_string_means_undeployed() {
        let json = r#"{
            "dex": "0xAAAAaAAa7A116286168fe3733f994062bc73CbF3",
            "cold": "",
            "warm": "", "long": "", "micro": "", "hot": "", "knockout": "",
            "koCross": "", "policy": "", "query": "", "impact": "", "shell": "",
            "policyShell": "", "deployer": ""
        }"#;
        let addrs: ProtocolAddrs = serde_json::from_str(json).unwrap();
        assert_eq!(addrs.dex, Some(address!("AAAAaAAa7A116286168fe3733f994062bc73CbF3")));
        assert_eq!(addrs.cold, None);
        assert_eq!(addrs.govern, GovernAddrs::default());
    }

    #[test]
    fn test_lowercase_addresses_accepted() {
        let json = r#"{"multisigTreasury": "0x73511669fd4de447fed18bb79bafeac93ab7f31f",
            "multisigOps": "", "multisigEmergency": "", "timelockTreasury": "",
            "timelockOps": "", "timelockEmergency": ""}"#;
        let gov: GovernAddrs = serde_json::from_str(json).unwrap();
        assert_eq!(
            gov.multisig_treasury,
            Some(address!("73511669fd4de447fed18bb79bafeac93ab7f31f"))
        );
    }

    #[test]
    fn test_serializes_undeployed_as_empty_string() {
        let addrs = ProtocolAddrs {
            dex: Some(address!("AaAaAAAaA24eEeb8d57D431224f73832bC34f688")),
            ..Default::default()
        };
        let value = serde_json::to_value(&addrs).unwrap();
        assert_eq!(
            value["dex"].as_str().unwrap().to_lowercase(),
            "0xaaaaaaaaa24eeeb8d57d431224f73832bc34f688"
        );
        assert_eq!(value["koCross"], "");
        assert_eq!(value["govern"]["timelockOps"], "");

        let back: ProtocolAddrs = serde_json::from_value(value).unwrap();
        assert_eq!(back, addrs);
    }

    #[test]
    fn test_malformed_address_rejected() {
        let json = r#"{"multisigTreasury": "0x1234", "multisigOps": "", "multisigEmergency": "",
            "timelockTreasury": "", "timelockOps": "", "timelockEmergency": ""}"#;
        assert!(serde_json::from_str::<GovernAddrs>(json).is_err());
    }
}
