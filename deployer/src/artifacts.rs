// deployer/src/artifacts.rs
// Loads compiled Hardhat artifacts (ABI + creation bytecode).

use ethers::{abi::Abi, types::Bytes};
use eyre::{eyre, Result, WrapErr};
use serde::Deserialize;
use std::{fs, path::PathBuf};
use tracing::debug;

#[derive(Debug, Deserialize)]
struct HardhatArtifact {
    abi: serde_json::Value,
    bytecode: String,
}

#[derive(Debug, Clone)]
pub struct ContractArtifact {
    pub name: String,
    pub abi: Abi,
    /// The ABI as it appeared in the artifact, persisted verbatim to the deployment store.
    pub abi_json: serde_json::Value,
    pub bytecode: Bytes,
}

impl ContractArtifact {
    pub fn from_json(name: &str, json: &str) -> Result<Self> {
        let raw: HardhatArtifact =
            serde_json::from_str(json).wrap_err_with(|| format!("Invalid artifact JSON for {}", name))?;
        let abi: Abi = serde_json::from_value(raw.abi.clone()).wrap_err_with(|| format!("Invalid ABI for {}", name))?;

        let cleaned = raw.bytecode.trim().trim_start_matches("0x");
        if cleaned.is_empty() {
            return Err(eyre!("{} has no creation bytecode (interface or abstract contract?)", name));
        }
        let bytecode = hex::decode(cleaned).wrap_err_with(|| format!("Failed to decode bytecode for {}", name))?;

        Ok(Self { name: name.to_string(), abi, abi_json: raw.abi, bytecode: Bytes::from(bytecode) })
    }
}

#[derive(Debug, Clone)]
pub struct ArtifactLoader {
    root: PathBuf,
}

impl ArtifactLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Candidate paths for `name`, in lookup order.
    pub fn candidates(&self, name: &str) -> [PathBuf; 2] {
        [
            self.root.join("contracts").join(format!("{}.sol", name)).join(format!("{}.json", name)),
            self.root.join(format!("{}.json", name)),
        ]
    }

    pub fn load(&self, name: &str) -> Result<ContractArtifact> {
        let path = self
            .candidates(name)
            .into_iter()
            .find(|p| p.is_file())
            .ok_or_else(|| eyre!("No artifact for {} under {:?}", name, self.root))?;
        debug!(contract = name, path = ?path, "Loading artifact");

        let json = fs::read_to_string(&path).wrap_err_with(|| format!("Failed to read artifact file: {:?}", path))?;
        ContractArtifact::from_json(name, &json)
    }
}
