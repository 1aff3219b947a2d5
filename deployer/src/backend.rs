// deployer/src/backend.rs

use async_trait::async_trait;
use ethers::types::{Address, TxHash};
use std::collections::HashMap;

use crate::{error::DeployError, record::ConstructorArg};

/// Role name of the account that signs and pays for every deployment.
pub const DEPLOYER_ROLE: &str = "deployer";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployOptions {
    pub from: Address,
    pub args: Vec<ConstructorArg>,
    pub log: bool,
    /// Mine the creation transaction immediately on local networks. Ignored on live networks.
    pub auto_mine: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeployReceipt {
    pub address: Address,
    pub transaction_hash: TxHash,
}

/// What the orchestrator needs from a chain: accounts, contract creation and one diagnostic read.
#[async_trait]
pub trait DeploymentBackend: Send + Sync {
    async fn named_accounts(&self) -> Result<HashMap<String, Address>, DeployError>;

    async fn deploy(&self, name: &str, options: DeployOptions) -> Result<DeployReceipt, DeployError>;

    /// Calls `greeting()` on the previously deployed contract `name`.
    async fn read_greeting(&self, name: &str) -> Result<String, DeployError>;
}
