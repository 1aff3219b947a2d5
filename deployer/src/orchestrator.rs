// deployer/src/orchestrator.rs
//
// The deploy script: five strictly ordered steps. Each step consumes the
// previous stage by value, so SinglePlayer can only be deployed from a stage
// that already holds the RewardItem address.

use ethers::types::Address;
use tracing::{info, instrument, warn};

use crate::{
    backend::{DeployOptions, DeploymentBackend, DEPLOYER_ROLE},
    config::ScriptSettings,
    error::DeployError,
    record::{ConstructorArg, DeploymentRecord},
};

// --- Contracts ---
pub const GAME_CONTRACT: &str = "GameContract";
pub const WORD_SELECTOR: &str = "WordSelector";
pub const REWARD_ITEM: &str = "RewardItem";
pub const SINGLE_PLAYER: &str = "SinglePlayer";

/// Tags attached to this script. A tag filter selects the whole script, never single steps.
pub const SCRIPT_TAGS: [&str; 4] = ["GameContract", "WordSelector", "SinglePlayer", "RewardToken"];

#[derive(Debug)]
pub struct DeployerResolved {
    deployer: Address,
}

#[derive(Debug)]
pub struct GameStage {
    deployer: Address,
    records: Vec<DeploymentRecord>,
}

#[derive(Debug)]
pub struct WordSelectorStage {
    deployer: Address,
    records: Vec<DeploymentRecord>,
}

#[derive(Debug)]
pub struct RewardItemStage {
    deployer: Address,
    reward_item: Address,
    records: Vec<DeploymentRecord>,
}

impl RewardItemStage {
    pub fn reward_item(&self) -> Address {
        self.reward_item
    }
}

#[derive(Debug, Clone)]
pub struct DeployScript {
    settings: ScriptSettings,
}

impl DeployScript {
    pub fn new(settings: ScriptSettings) -> Self {
        Self { settings }
    }

    /// True when no tag filter is set or any requested tag belongs to this script.
    pub fn should_run(&self) -> bool {
        self.settings.tags.is_empty() || self.settings.tags.iter().any(|t| SCRIPT_TAGS.contains(&t.as_str()))
    }

    /// Runs all steps in order and returns one record per deployed contract.
    ///
    /// The first fatal error aborts the run. Contracts deployed before the
    /// failure stay on chain.
    #[instrument(skip_all)]
    pub async fn run<B>(&self, backend: &B) -> Result<Vec<DeploymentRecord>, DeployError>
    where
        B: DeploymentBackend + ?Sized,
    {
        if !self.should_run() {
            info!(tags = ?self.settings.tags, "No matching tags, skipping deploy script");
            return Ok(Vec::new());
        }

        let resolved = self.resolve_deployer(backend).await?;
        let game = self.deploy_game(backend, resolved).await?;
        let word_selector = self.deploy_word_selector(backend, game).await?;
        let reward_item = self.deploy_reward_item(backend, word_selector).await?;
        self.deploy_single_player(backend, reward_item).await
    }

    pub async fn resolve_deployer<B>(&self, backend: &B) -> Result<DeployerResolved, DeployError>
    where
        B: DeploymentBackend + ?Sized,
    {
        let accounts = backend.named_accounts().await?;
        let deployer = accounts
            .get(DEPLOYER_ROLE)
            .copied()
            .ok_or_else(|| DeployError::Configuration(format!("no '{}' named account available", DEPLOYER_ROLE)))?;
        info!(deployer = ?deployer, "Deployer resolved");
        Ok(DeployerResolved { deployer })
    }

    pub async fn deploy_game<B>(&self, backend: &B, stage: DeployerResolved) -> Result<GameStage, DeployError>
    where
        B: DeploymentBackend + ?Sized,
    {
        let record = self
            .deploy_one(backend, stage.deployer, GAME_CONTRACT, vec![ConstructorArg::Address(stage.deployer)])
            .await?;

        match backend.read_greeting(GAME_CONTRACT).await {
            Ok(greeting) => println!("👋 Initial greeting from GameContract: {}", greeting),
            Err(e) if !e.is_fatal() => warn!(error = %e, "Could not read initial greeting, continuing"),
            Err(e) => return Err(e),
        }

        Ok(GameStage { deployer: stage.deployer, records: vec![record] })
    }

    pub async fn deploy_word_selector<B>(&self, backend: &B, stage: GameStage) -> Result<WordSelectorStage, DeployError>
    where
        B: DeploymentBackend + ?Sized,
    {
        let GameStage { deployer, mut records } = stage;
        let record = self.deploy_one(backend, deployer, WORD_SELECTOR, Vec::new()).await?;
        println!("📚 WordSelector deployed at: {:?}", record.address);
        records.push(record);
        Ok(WordSelectorStage { deployer, records })
    }

    pub async fn deploy_reward_item<B>(&self, backend: &B, stage: WordSelectorStage) -> Result<RewardItemStage, DeployError>
    where
        B: DeploymentBackend + ?Sized,
    {
        let WordSelectorStage { deployer, mut records } = stage;
        let record = self.deploy_one(backend, deployer, REWARD_ITEM, Vec::new()).await?;
        println!("🏆 RewardItem deployed at: {:?}", record.address);
        let reward_item = record.address;
        records.push(record);
        Ok(RewardItemStage { deployer, reward_item, records })
    }

    pub async fn deploy_single_player<B>(&self, backend: &B, stage: RewardItemStage) -> Result<Vec<DeploymentRecord>, DeployError>
    where
        B: DeploymentBackend + ?Sized,
    {
        let RewardItemStage { deployer, reward_item, mut records } = stage;
        let args = vec![
            ConstructorArg::Address(reward_item),
            ConstructorArg::Uint(self.settings.tokens_to_earn),
            ConstructorArg::String(self.settings.app_key.clone()),
        ];
        let record = self.deploy_one(backend, deployer, SINGLE_PLAYER, args).await?;
        println!("🎮 WordanaGame deployed at: {:?}", record.address);
        records.push(record);
        Ok(records)
    }

    async fn deploy_one<B>(
        &self,
        backend: &B,
        deployer: Address,
        name: &str,
        args: Vec<ConstructorArg>,
    ) -> Result<DeploymentRecord, DeployError>
    where
        B: DeploymentBackend + ?Sized,
    {
        let options = DeployOptions {
            from: deployer,
            args: args.clone(),
            log: self.settings.log,
            auto_mine: self.settings.auto_mine,
        };
        let receipt = backend.deploy(name, options).await?;
        Ok(DeploymentRecord {
            name: name.to_string(),
            address: receipt.address,
            args,
            transaction_hash: receipt.transaction_hash,
        })
    }
}
