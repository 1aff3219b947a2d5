// deployer/src/config.rs

use dotenv::dotenv;
use ethers::types::U256;
use std::{env, path::PathBuf, time::Duration};
use tracing::{debug, warn};

use crate::error::DeployError;

// --- Defaults ---
pub const DEFAULT_NETWORK: &str = "localhost";
pub const DEFAULT_LOCAL_RPC_URL: &str = "http://127.0.0.1:8545";
/// Hardhat/Anvil account #0, pre-funded on every local node.
pub const LOCAL_DEV_PRIVATE_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";
pub const DEFAULT_TOKENS_TO_EARN: u64 = 100;
pub const PLACEHOLDER_APP_KEY: &str = "your_app_key";
const LOCAL_NETWORKS: [&str; 3] = ["localhost", "hardhat", "anvil"];

#[derive(Debug, Clone)]
pub struct NetworkConfig {
    pub name: String,
    pub rpc_url: String,
    pub expected_chain_id: Option<u64>,
}

impl NetworkConfig {
    pub fn is_local(&self) -> bool {
        LOCAL_NETWORKS.contains(&self.name.as_str())
    }
}

/// The values the deploy script itself consumes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptSettings {
    pub tokens_to_earn: U256,
    pub app_key: String,
    pub auto_mine: bool,
    pub log: bool,
    pub tags: Vec<String>,
}

impl Default for ScriptSettings {
    fn default() -> Self {
        Self {
            tokens_to_earn: U256::from(DEFAULT_TOKENS_TO_EARN),
            app_key: PLACEHOLDER_APP_KEY.to_string(),
            auto_mine: true,
            log: true,
            tags: Vec::new(),
        }
    }
}

impl ScriptSettings {
    /// Replaces the tag filter, dropping blank entries left by `--tags ""` or a trailing comma.
    pub fn set_tags<I, S>(&mut self, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.tags = tags
            .into_iter()
            .map(|t| t.as_ref().trim().to_string())
            .filter(|t| !t.is_empty())
            .collect();
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    // Network & Keys
    pub network: NetworkConfig,
    pub deployer_private_key: String,

    // Paths
    pub artifacts_dir: PathBuf,
    pub deployments_dir: PathBuf,

    // Transaction Options
    pub confirmations: usize,
    pub tx_timeout: Duration,

    pub script: ScriptSettings,
}

/// Loads `.env`, then reads the process environment for `network`.
pub fn load_config(network: &str) -> Result<Config, DeployError> {
    debug!("Loading configuration from .env file...");
    dotenv().ok();
    let config = config_from_lookup(network, |key| env::var(key).ok())?;
    debug!(network = %config.network.name, rpc_url = %config.network.rpc_url, "Configuration loaded");
    Ok(config)
}

/// Builds a [`Config`] from an arbitrary variable source.
pub fn config_from_lookup<F>(network: &str, lookup: F) -> Result<Config, DeployError>
where
    F: Fn(&str) -> Option<String>,
{
    let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());
    let parse_bool = |name: &str, default: bool| -> Result<bool, DeployError> {
        match var(name) {
            None => Ok(default),
            Some(s) if s.trim().eq_ignore_ascii_case("true") || s.trim() == "1" => Ok(true),
            Some(s) if s.trim().eq_ignore_ascii_case("false") || s.trim() == "0" => Ok(false),
            Some(s) => Err(DeployError::Configuration(format!("{} must be true/false or 1/0, got '{}'", name, s))),
        }
    };
    let parse_u64 = |name: &str| -> Result<Option<u64>, DeployError> {
        var(name)
            .map(|s| {
                s.trim()
                    .parse::<u64>()
                    .map_err(|e| DeployError::Configuration(format!("{} must be an unsigned integer: {}", name, e)))
            })
            .transpose()
    };

    // --- Network ---
    let name = network.trim();
    if name.is_empty() {
        return Err(DeployError::Configuration("network name must not be empty".into()));
    }
    let network_rpc_var = format!("{}_RPC_URL", name.to_ascii_uppercase().replace('-', "_"));
    let is_local = LOCAL_NETWORKS.contains(&name);
    let rpc_url = match var(&network_rpc_var).or_else(|| var("RPC_URL")) {
        Some(url) => url,
        None if is_local => DEFAULT_LOCAL_RPC_URL.to_string(),
        None => {
            return Err(DeployError::Configuration(format!(
                "no RPC URL for network '{}' (set {} or RPC_URL)",
                name, network_rpc_var
            )))
        }
    };
    let network = NetworkConfig { name: name.to_string(), rpc_url, expected_chain_id: parse_u64("CHAIN_ID")? };

    // --- Keys ---
    let deployer_private_key = match var("DEPLOYER_PRIVATE_KEY") {
        Some(key) => key,
        None if is_local => LOCAL_DEV_PRIVATE_KEY.to_string(),
        None => {
            return Err(DeployError::Configuration(format!(
                "DEPLOYER_PRIVATE_KEY is required on live network '{}'",
                name
            )))
        }
    };

    // --- Script values ---
    let tokens_to_earn = match var("TOKENS_TO_EARN") {
        Some(raw) => U256::from_dec_str(raw.trim())
            .map_err(|e| DeployError::Configuration(format!("TOKENS_TO_EARN must be a decimal integer: {}", e)))?,
        None => U256::from(DEFAULT_TOKENS_TO_EARN),
    };
    let app_key = var("APP_KEY").unwrap_or_else(|| PLACEHOLDER_APP_KEY.to_string());
    if app_key == PLACEHOLDER_APP_KEY && !is_local {
        warn!(network = %name, "APP_KEY is still the placeholder value");
    }

    let script = ScriptSettings {
        tokens_to_earn,
        app_key,
        auto_mine: parse_bool("AUTO_MINE", true)?,
        log: true,
        tags: Vec::new(),
    };

    let tx_timeout_secs = parse_u64("TX_TIMEOUT_SECS")?.unwrap_or(120);
    if tx_timeout_secs == 0 {
        return Err(DeployError::Configuration("TX_TIMEOUT_SECS must be greater than 0".into()));
    }

    Ok(Config {
        network,
        deployer_private_key,
        artifacts_dir: var("ARTIFACTS_DIR").map(PathBuf::from).unwrap_or_else(|| PathBuf::from("artifacts")),
        deployments_dir: var("DEPLOYMENTS_DIR").map(PathBuf::from).unwrap_or_else(|| PathBuf::from("deployments")),
        confirmations: parse_u64("CONFIRMATIONS")?.unwrap_or(1) as usize,
        tx_timeout: Duration::from_secs(tx_timeout_secs),
        script,
    })
}

// END OF FILE: deployer/src/config.rs
