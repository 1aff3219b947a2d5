// deployer/src/store.rs
// On-disk deployment registry, one directory per network.

use ethers::types::{Address, TxHash};
use eyre::{eyre, Result, WrapErr};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::debug;

use crate::record::ConstructorArg;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredDeployment {
    pub address: Address,
    pub abi: serde_json::Value,
    pub transaction_hash: TxHash,
    pub args: Vec<ConstructorArg>,
    pub block_number: Option<u64>,
    pub deployed_at: String,
}

#[derive(Debug, Clone)]
pub struct DeploymentStore {
    dir: PathBuf,
}

impl DeploymentStore {
    /// `<root>/<network>/`
    pub fn new(root: impl AsRef<Path>, network: &str) -> Self {
        Self { dir: root.as_ref().join(network) }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(format!("{}.json", name))
    }

    pub fn write_chain_id(&self, chain_id: u64) -> Result<()> {
        fs::create_dir_all(&self.dir).wrap_err_with(|| format!("Failed to create {:?}", self.dir))?;
        fs::write(self.dir.join(".chainId"), chain_id.to_string()).wrap_err("Failed to write .chainId")
    }

    pub fn read_chain_id(&self) -> Result<Option<u64>> {
        let path = self.dir.join(".chainId");
        if !path.is_file() {
            return Ok(None);
        }
        let raw = fs::read_to_string(&path).wrap_err("Failed to read .chainId")?;
        raw.trim().parse::<u64>().map(Some).map_err(|e| eyre!("Corrupt .chainId {:?}: {}", path, e))
    }

    pub fn save(&self, name: &str, deployment: &StoredDeployment) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir).wrap_err_with(|| format!("Failed to create {:?}", self.dir))?;
        let path = self.path_for(name);
        let json = serde_json::to_string_pretty(deployment)?;
        fs::write(&path, json).wrap_err_with(|| format!("Failed to write deployment file: {:?}", path))?;
        debug!(contract = name, path = ?path, "Deployment saved");
        Ok(path)
    }

    pub fn load(&self, name: &str) -> Result<StoredDeployment> {
        let path = self.path_for(name);
        let json = fs::read_to_string(&path)
            .wrap_err_with(|| format!("No deployment of {} recorded at {:?}", name, path))?;
        serde_json::from_str(&json).wrap_err_with(|| format!("Corrupt deployment file: {:?}", path))
    }
}
