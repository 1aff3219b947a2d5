// deployer/src/deploy.rs

use async_trait::async_trait;
use chrono::Utc;
use ethers::{
    prelude::{ContractFactory, Http, LocalWallet, Middleware, Provider, Signer, SignerMiddleware},
    types::{Address, TransactionReceipt, U64},
};
use std::{collections::HashMap, sync::Arc, time::Duration};
use tokio::time::timeout;
use tracing::{debug, info, instrument, warn};

use crate::{
    artifacts::ArtifactLoader,
    backend::{DeployOptions, DeployReceipt, DeploymentBackend, DEPLOYER_ROLE},
    bindings::GameContract,
    config::{Config, NetworkConfig},
    error::DeployError,
    record::encode_args,
    store::{DeploymentStore, StoredDeployment},
};

pub type DeployClient = SignerMiddleware<Provider<Http>, LocalWallet>;

const LOCAL_POLL_INTERVAL: Duration = Duration::from_millis(100);
const TX_SUCCESS_STATUS: U64 = U64([1]);

/// Deploys Hardhat artifacts through an ethers signer and records them in a [`DeploymentStore`].
#[derive(Debug)]
pub struct EthersBackend {
    client: Arc<DeployClient>,
    network: NetworkConfig,
    artifacts: ArtifactLoader,
    store: DeploymentStore,
    confirmations: usize,
    tx_timeout: Duration,
}

impl EthersBackend {
    pub async fn connect(config: &Config) -> Result<Self, DeployError> {
        let network = config.network.clone();
        let mut provider = Provider::<Http>::try_from(network.rpc_url.as_str())
            .map_err(|e| DeployError::Configuration(format!("invalid RPC URL {}: {}", network.rpc_url, e)))?;
        if network.is_local() {
            provider = provider.interval(LOCAL_POLL_INTERVAL);
        }

        let chain_id = provider
            .get_chainid()
            .await
            .map_err(|e| DeployError::Configuration(format!("cannot reach {} at {}: {}", network.name, network.rpc_url, e)))?
            .as_u64();
        if let Some(expected) = network.expected_chain_id {
            if expected != chain_id {
                return Err(DeployError::Configuration(format!(
                    "network {} reports chain id {}, expected {}",
                    network.name, chain_id, expected
                )));
            }
        }
        info!(network = %network.name, chain_id, "RPC OK");

        let wallet = config
            .deployer_private_key
            .parse::<LocalWallet>()
            .map_err(|e| DeployError::Configuration(format!("invalid DEPLOYER_PRIVATE_KEY: {}", e)))?
            .with_chain_id(chain_id);
        let client = Arc::new(SignerMiddleware::new(provider, wallet));

        let store = DeploymentStore::new(&config.deployments_dir, &network.name);
        let recorded = store
            .read_chain_id()
            .map_err(|e| DeployError::Configuration(format!("cannot read deployment store: {:#}", e)))?;
        if let Some(recorded) = recorded.filter(|id| *id != chain_id) {
            return Err(DeployError::Configuration(format!(
                "{:?} holds deployments for chain id {}, but {} reports {}",
                store.dir(),
                recorded,
                network.name,
                chain_id
            )));
        }
        store
            .write_chain_id(chain_id)
            .map_err(|e| DeployError::Configuration(format!("cannot initialise deployment store: {:#}", e)))?;

        Ok(Self {
            client,
            network,
            artifacts: ArtifactLoader::new(&config.artifacts_dir),
            store,
            confirmations: config.confirmations,
            tx_timeout: config.tx_timeout,
        })
    }

    pub fn store(&self) -> &DeploymentStore {
        &self.store
    }

    async fn mine_block(&self) {
        match self.client.provider().request::<_, serde_json::Value>("evm_mine", Vec::<u64>::new()).await {
            Ok(_) => debug!("evm_mine requested"),
            Err(e) => warn!(error = %e, "evm_mine failed; waiting for the node to mine"),
        }
    }
}

/// Address created by a mined deployment, or why there is none.
pub fn created_address(name: &str, receipt: &TransactionReceipt) -> Result<Address, DeployError> {
    let tx_hash = receipt.transaction_hash;
    if receipt.status != Some(TX_SUCCESS_STATUS) {
        return Err(DeployError::deployment(name, format!("transaction {:?} reverted", tx_hash)));
    }
    receipt
        .contract_address
        .ok_or_else(|| DeployError::deployment(name, format!("receipt for {:?} has no contract address", tx_hash)))
}

#[async_trait]
impl DeploymentBackend for EthersBackend {
    async fn named_accounts(&self) -> Result<HashMap<String, Address>, DeployError> {
        Ok(HashMap::from([(DEPLOYER_ROLE.to_string(), self.client.address())]))
    }

    #[instrument(skip(self, options), fields(network = %self.network.name))]
    async fn deploy(&self, name: &str, options: DeployOptions) -> Result<DeployReceipt, DeployError> {
        let artifact = self.artifacts.load(name).map_err(|e| DeployError::deployment(name, e))?;

        let factory = ContractFactory::new(artifact.abi.clone(), artifact.bytecode.clone(), self.client.clone());
        let deployer = factory
            .deploy_tokens(encode_args(&options.args))
            .map_err(|e| DeployError::deployment(name, e))?;
        let mut tx = deployer.tx;
        tx.set_from(options.from);

        let rendered: Vec<String> = options.args.iter().map(ToString::to_string).collect();
        debug!(args = ?rendered, "Sending deployment transaction...");
        let pending = self
            .client
            .send_transaction(tx, None)
            .await
            .map_err(|e| DeployError::deployment(name, e))?;
        let tx_hash = pending.tx_hash();

        if options.auto_mine && self.network.is_local() {
            self.mine_block().await;
        }

        let receipt = match timeout(self.tx_timeout, pending.confirmations(self.confirmations)).await {
            Ok(Ok(Some(receipt))) => receipt,
            Ok(Ok(None)) => {
                return Err(DeployError::deployment(name, format!("transaction {:?} was dropped", tx_hash)));
            }
            Ok(Err(e)) => return Err(DeployError::deployment(name, e)),
            Err(_) => {
                return Err(DeployError::deployment(
                    name,
                    format!("timed out after {}s waiting for {:?}", self.tx_timeout.as_secs(), tx_hash),
                ));
            }
        };
        let address = created_address(name, &receipt)?;

        let stored = StoredDeployment {
            address,
            abi: artifact.abi_json,
            transaction_hash: tx_hash,
            args: options.args,
            block_number: receipt.block_number.map(|b| b.as_u64()),
            deployed_at: Utc::now().to_rfc3339(),
        };
        self.store.save(name, &stored).map_err(|e| DeployError::deployment(name, e))?;

        let gas_used = receipt.gas_used.unwrap_or_default();
        if options.log {
            println!("deploying \"{}\" (tx: {:?})...: deployed at {:?} with {} gas", name, tx_hash, address, gas_used);
        }
        info!(contract = name, address = ?address, tx = ?tx_hash, gas_used = %gas_used, "Contract deployed");

        Ok(DeployReceipt { address, transaction_hash: tx_hash })
    }

    async fn read_greeting(&self, name: &str) -> Result<String, DeployError> {
        let stored = self.store.load(name).map_err(|e| DeployError::read(name, "greeting", e))?;
        let contract = GameContract::new(stored.address, self.client.clone());
        contract.greeting().call().await.map_err(|e| DeployError::read(name, "greeting", e))
    }
}
#[cfg(test)]
mod tests {
    use super::*;
    use ethers::types::TxHash;

    fn receipt(status: u64, contract_address: Option<Address>) -> TransactionReceipt {
        TransactionReceipt {
            transaction_hash: TxHash::repeat_byte(0xab),
            status: Some(U64::from(status)),
            contract_address,
            ..Default::default()
        }
    }

    #[test]
    fn successful_receipt_yields_the_created_address() {
        let created = Address::repeat_byte(0x5f);
        assert_eq!(created_address("RewardItem", &receipt(1, Some(created))).unwrap(), created);
    }

    #[test]
    fn reverted_receipt_is_a_deployment_error() {
        let err = created_address("RewardItem", &receipt(0, Some(Address::repeat_byte(0x5f)))).unwrap_err();
        assert!(matches!(&err, DeployError::Deployment { contract, .. } if contract == "RewardItem"));
        assert!(err.to_string().contains("reverted"));
    }

    #[test]
    fn receipt_without_contract_address_is_a_deployment_error() {
        let err = created_address("SinglePlayer", &receipt(1, None)).unwrap_err();
        assert_eq!(err.contract(), Some("SinglePlayer"));
        assert!(err.to_string().contains("no contract address"));
    }

    #[test]
    fn missing_status_counts_as_failure() {
        let mut pre_byzantium = receipt(1, Some(Address::repeat_byte(0x5f)));
        pre_byzantium.status = None;
        assert!(created_address("GameContract", &pre_byzantium).is_err());
    }
}
// END OF FILE: deployer/src/deploy.rs
