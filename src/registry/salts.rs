use alloy_primitives::{address, b256, keccak256, Address, B256};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use crate::errors::GovernError;

/// Curated CREATE2 salts for the CrocSwapDex vanity address, keyed by the
/// CrocDeployer that performs the salted deployment.
const BUILTIN_SALTS: [(Address, B256); 3] = [
    (
        address!("73511669fd4de447fed18bb79bafeac93ab7f31f"),
        b256!("6784dbbd6e38a55bce13da3fb1e54f646fce9f411916b1f835e1054a790367d9"),
    ),
    (
        address!("25662C94D28DA775C4E4FDCA987B14D704B4b349"),
        b256!("aa648ca9a669467563048f9854d0c61d261957924a3753296908131cee781714"),
    ),
    // Morph Holesky (0xafa)
    (
        address!("dbec288199e50cf0c9ebeb2f3035c9358aaec16f"),
        b256!("261099080c2043154e6be67071ca795b2630f231a8229a5de789af0051819c6c"),
    ),
];

/// Append-only map from deployer address to CREATE2 salt.
///
/// Keys are parsed addresses, so lookups ignore the hex case of the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SaltRegistry {
    salts: BTreeMap<Address, B256>,
}

impl SaltRegistry {
    /// An empty registry.
    pub fn empty() -> Self {
        Self { salts: BTreeMap::new() }
    }

    /// The curated entries shipped with the tool.
    pub fn builtin() -> Self {
        Self { salts: BUILTIN_SALTS.into_iter().collect() }
    }

    /// Merge a JSON file of `{"0xdeployer": "0xsalt"}` entries.
    pub fn merge_file(&mut self, path: &Path) -> Result<(), GovernError> {
        let data = fs::read_to_string(path).map_err(|e| {
            GovernError::Configuration(format!("cannot read salt file {}: {e}", path.display()))
        })?;
        let entries: BTreeMap<String, String> = serde_json::from_str(&data).map_err(|e| {
            GovernError::Configuration(format!("invalid salt file {}: {e}", path.display()))
        })?;
        for (deployer, salt) in entries {
            let deployer = parse_deployer(&deployer)?;
            let salt: B256 = salt.parse().map_err(|_| {
                GovernError::Configuration(format!("invalid salt `{salt}` for {deployer}"))
            })?;
            self.append(deployer, salt)?;
        }
        Ok(())
    }

    /// Add an entry. Re-adding the same pair is a no-op; changing the salt of
    /// an existing deployer is rejected.
    pub fn append(&mut self, deployer: Address, salt: B256) -> Result<(), GovernError> {
        match self.salts.get(&deployer) {
            Some(existing) if *existing != salt => Err(GovernError::Configuration(format!(
                "salt registry already maps {deployer} to {existing}"
            ))),
            Some(_) => Ok(()),
            None => {
                self.salts.insert(deployer, salt);
                Ok(())
            }
        }
    }

    /// Look up the salt for a deployer given as hex text, in any case.
    pub fn resolve(&self, deployer: &str) -> Result<B256, GovernError> {
        let not_found = || GovernError::NotFound { kind: "CREATE2 salt", key: deployer.to_string() };
        let addr = parse_deployer(deployer).map_err(|_| not_found())?;
        self.resolve_address(addr).map_err(|_| not_found())
    }

    /// Look up the salt for a parsed deployer address.
    pub fn resolve_address(&self, deployer: Address) -> Result<B256, GovernError> {
        self.salts.get(&deployer).copied().ok_or_else(|| GovernError::NotFound {
            kind: "CREATE2 salt",
            key: format!("{deployer:#x}"),
        })
    }

    /// Entries in address order.
    pub fn iter(&self) -> impl Iterator<Item = (&Address, &B256)> {
        self.salts.iter()
    }

    pub fn len(&self) -> usize {
        self.salts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.salts.is_empty()
    }
}

impl Default for SaltRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

fn parse_deployer(raw: &str) -> Result<Address, GovernError> {
    raw.trim()
        .to_lowercase()
        .parse::<Address>()
        .map_err(|_| GovernError::Configuration(format!("invalid deployer address `{raw}`")))
}

/// Salt derived from the deployer address bytes: `keccak256(deployer)`.
pub fn derive_salt(deployer: Address) -> B256 {
    keccak256(deployer.as_slice())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_is_case_insensitive() {
        let registry = SaltRegistry::builtin();
        let upper = registry.resolve("0x25662C94D28DA775C4E4FDCA987B14D704B4b349").unwrap();
        let lower = registry.resolve("0x25662c94d28da775c4e4fdca987b14d704b4b349").unwrap();
        assert_eq!(upper, lower);
        assert_eq!(
            upper,
            b256!("aa648ca9a669467563048f9854d0c61d261957924a3753296908131cee781714")
        );
    }

    #[test]
    fn test_unknown_deployer_not_found() {
        let registry = SaltRegistry::builtin();
        let err = registry.resolve("0x0000000000000000000000000000000000000001").unwrap_err();
        match err {
            GovernError::NotFound { kind, key } => {
                assert_eq!(kind, "CREATE2 salt");
                assert_eq!(key, "0x0000000000000000000000000000000000000001");
            }
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn test_garbage_key_not_found() {
        let registry = SaltRegistry::builtin();
        assert!(matches!(registry.resolve("not-an-address"), Err(GovernError::NotFound { .. })));
    }

    #[test]
    fn test_append_only() {
        let mut registry = SaltRegistry::empty();
        let deployer = address!("0000000000000000000000000000000000000abc");
        registry.append(deployer, B256::repeat_byte(1)).unwrap();
        registry.append(deployer, B256::repeat_byte(1)).unwrap();
        assert!(registry.append(deployer, B256::repeat_byte(2)).is_err());
        assert_eq!(registry.resolve_address(deployer).unwrap(), B256::repeat_byte(1));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_derive_salt_depends_only_on_address() {
        let a = address!("dbec288199e50cf0c9ebeb2f3035c9358aaec16f");
        let b = address!("DBEC288199E50CF0C9EBEB2F3035C9358AAEC16F");
        assert_eq!(derive_salt(a), derive_salt(b));
        assert_ne!(derive_salt(a), derive_salt(Address::ZERO));
    }
}
