use alloy_primitives::Bytes;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::errors::GovernError;

/// Where contract creation bytecode comes from.
pub trait ArtifactSource: Send + Sync {
    /// Creation bytecode of the contract called `name`, without constructor
    /// arguments.
    fn bytecode(&self, name: &str) -> Result<Bytes, GovernError>;
}

#[derive(Deserialize)]
struct HardhatArtifact {
    bytecode: Bytes,
}

/// Hardhat `artifacts/` directory: `<root>/**/<Name>.json` with a `bytecode`
/// field.
#[derive(Debug, Clone)]
pub struct HardhatArtifacts {
    root: PathBuf,
}

impl HardhatArtifacts {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn find(&self, file_name: &str) -> Result<Option<PathBuf>, GovernError> {
        find_file(&self.root, file_name).map_err(|e| {
            GovernError::Configuration(format!(
                "cannot search artifacts in {}: {e}",
                self.root.display()
            ))
        })
    }
}

impl ArtifactSource for HardhatArtifacts {
    fn bytecode(&self, name: &str) -> Result<Bytes, GovernError> {
        let file_name = format!("{name}.json");
        let path = self
            .find(&file_name)?
            .ok_or_else(|| GovernError::NotFound { kind: "artifact", key: name.to_string() })?;
        debug!(name, path = %path.display(), "loading artifact");

        let data = fs::read_to_string(&path).map_err(|e| {
            GovernError::Configuration(format!("cannot read {}: {e}", path.display()))
        })?;
        let artifact: HardhatArtifact = serde_json::from_str(&data).map_err(|e| {
            GovernError::Configuration(format!("invalid artifact {}: {e}", path.display()))
        })?;
        if artifact.bytecode.is_empty() {
            return Err(GovernError::Configuration(format!(
                "artifact {name} has no bytecode (abstract contract or interface?)"
            )));
        }
        Ok(artifact.bytecode)
    }
}

/// Depth-first search for `file_name`; entries are visited in name order so
/// the first match is stable.
fn find_file(dir: &Path, file_name: &str) -> std::io::Result<Option<PathBuf>> {
    let mut entries: Vec<_> = fs::read_dir(dir)?.collect::<Result<_, _>>()?;
    entries.sort_by_key(|e| e.file_name());
    for entry in entries {
        let path = entry.path();
        if path.is_dir() {
            if let Some(found) = find_file(&path, file_name)? {
                return Ok(Some(found));
            }
        } else if entry.file_name() == file_name {
            return Ok(Some(path));
        }
    }
    Ok(None)
}
