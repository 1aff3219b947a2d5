// deployer/src/lib.rs

// Re-export modules needed by integration tests and the binary
pub mod artifacts;
pub mod backend;
pub mod bindings;
pub mod config;
pub mod deploy;
pub mod error;
pub mod orchestrator;
pub mod record;
pub mod store;

// Public types re-exported for convenience
pub use backend::{DeployOptions, DeployReceipt, DeploymentBackend, DEPLOYER_ROLE};
pub use config::{load_config, Config, ScriptSettings};
pub use deploy::EthersBackend;
pub use error::DeployError;
pub use orchestrator::{DeployScript, GAME_CONTRACT, REWARD_ITEM, SCRIPT_TAGS, SINGLE_PLAYER, WORD_SELECTOR};
pub use record::{ConstructorArg, DeploymentRecord};
