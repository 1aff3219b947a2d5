// tests/common/mod.rs
#![allow(dead_code)]

use async_trait::async_trait;
use ethers::{
    types::{Address, TxHash, H256, U256},
    utils::{get_contract_address, keccak256},
};
use std::{collections::HashMap, sync::Mutex};
use wordana_deploy::{DeployError, DeployOptions, DeployReceipt, DeploymentBackend, DEPLOYER_ROLE};

pub const DEPLOYER: &str = "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266";

pub fn deployer_address() -> Address {
    DEPLOYER.parse().expect("valid deployer address")
}

enum Greeting {
    Value(String),
    Reverts,
    BackendDown,
}

/// In-memory backend that records every call and hands out CREATE addresses by nonce.
pub struct MockBackend {
    accounts: HashMap<String, Address>,
    fail_on: Option<String>,
    greeting: Greeting,
    state: Mutex<MockState>,
}

#[derive(Default)]
struct MockState {
    nonce: u64,
    deployed: HashMap<String, Address>,
    deploy_calls: Vec<(String, DeployOptions)>,
    greeting_reads: Vec<String>,
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            accounts: HashMap::from([(DEPLOYER_ROLE.to_string(), deployer_address())]),
            fail_on: None,
            greeting: Greeting::Value("Building Unstoppable Apps!!!".to_string()),
            state: Mutex::new(MockState::default()),
        }
    }

    pub fn without_accounts() -> Self {
        Self { accounts: HashMap::new(), ..Self::new() }
    }

    /// Start the deployer's nonce somewhere else, as on a chain that already saw transactions.
    pub fn with_nonce(self, nonce: u64) -> Self {
        self.state.lock().unwrap().nonce = nonce;
        self
    }

    pub fn failing_on(mut self, contract: &str) -> Self {
        self.fail_on = Some(contract.to_string());
        self
    }

    pub fn with_broken_greeting(mut self) -> Self {
        self.greeting = Greeting::Reverts;
        self
    }

    /// The greeting read fails with something other than a read error.
    pub fn with_greeting_backend_down(mut self) -> Self {
        self.greeting = Greeting::BackendDown;
        self
    }

    pub fn deploy_calls(&self) -> Vec<(String, DeployOptions)> {
        self.state.lock().unwrap().deploy_calls.clone()
    }

    pub fn deployed_names(&self) -> Vec<String> {
        self.deploy_calls().into_iter().map(|(name, _)| name).collect()
    }

    pub fn greeting_reads(&self) -> Vec<String> {
        self.state.lock().unwrap().greeting_reads.clone()
    }
}

#[async_trait]
impl DeploymentBackend for MockBackend {
    async fn named_accounts(&self) -> Result<HashMap<String, Address>, DeployError> {
        Ok(self.accounts.clone())
    }

    async fn deploy(&self, name: &str, options: DeployOptions) -> Result<DeployReceipt, DeployError> {
        let mut state = self.state.lock().unwrap();
        state.deploy_calls.push((name.to_string(), options.clone()));

        if self.fail_on.as_deref() == Some(name) {
            return Err(DeployError::deployment(name, "insufficient funds for gas * price + value"));
        }

        let address = get_contract_address(options.from, U256::from(state.nonce));
        let transaction_hash: TxHash = H256::from(keccak256(format!("{}:{}", name, state.nonce)));
        state.nonce += 1;
        state.deployed.insert(name.to_string(), address);
        Ok(DeployReceipt { address, transaction_hash })
    }

    async fn read_greeting(&self, name: &str) -> Result<String, DeployError> {
        let mut state = self.state.lock().unwrap();
        state.greeting_reads.push(name.to_string());
        if !state.deployed.contains_key(name) {
            return Err(DeployError::read(name, "greeting", "no deployment found"));
        }
        match &self.greeting {
            Greeting::Value(greeting) => Ok(greeting.clone()),
            Greeting::Reverts => Err(DeployError::read(name, "greeting", "execution reverted")),
            Greeting::BackendDown => Err(DeployError::Configuration("signer disconnected".to_string())),
        }
    }
}
