// deployer/src/main.rs

// --- Imports ---
use chrono::Utc;
use clap::Parser;
use eyre::{Result, WrapErr};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{filter::LevelFilter, fmt, EnvFilter};

use wordana_deploy::{config::DEFAULT_NETWORK, load_config, DeployScript, EthersBackend};

// --- CLI Argument Parsing ---
#[derive(Parser, Debug)]
#[command(author, version, about = "Deploys the Wordana game contracts", long_about = None)]
struct Cli {
    /// Network to deploy to (`localhost`, `hardhat`, `anvil` or a live network name).
    #[arg(long, env = "NETWORK", default_value = DEFAULT_NETWORK)]
    network: String,

    /// Only run if one of these tags is attached to the deploy script.
    #[arg(long, value_delimiter = ',', value_name = "TAG")]
    tags: Vec<String>,

    /// Directory holding compiled Hardhat artifacts. Overrides ARTIFACTS_DIR.
    #[arg(long = "artifacts", value_name = "DIR")]
    artifacts_dir: Option<PathBuf>,

    /// Directory deployments are recorded in. Overrides DEPLOYMENTS_DIR.
    #[arg(long = "deployments", value_name = "DIR")]
    deployments_dir: Option<PathBuf>,

    /// Do not request `evm_mine` after each deployment on local networks.
    #[arg(long)]
    no_auto_mine: bool,

    /// Suppress the per-contract deployment lines.
    #[arg(long)]
    quiet: bool,
}

fn init_tracing() {
    let _ = fmt()
        .with_env_filter(EnvFilter::builder().with_default_directive(LevelFilter::INFO.into()).from_env_lossy())
        .with_target(false)
        .try_init();
}

// --- Main Execution ---
#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut config = load_config(&cli.network).wrap_err("Failed to load configuration")?;
    if let Some(dir) = cli.artifacts_dir {
        config.artifacts_dir = dir;
    }
    if let Some(dir) = cli.deployments_dir {
        config.deployments_dir = dir;
    }
    config.script.set_tags(&cli.tags);
    config.script.auto_mine = config.script.auto_mine && !cli.no_auto_mine;
    config.script.log = !cli.quiet;

    let script = DeployScript::new(config.script.clone());
    if !script.should_run() {
        info!(tags = ?config.script.tags, "Nothing to deploy for the requested tags");
        return Ok(());
    }

    info!(network = %config.network.name, started_at = %Utc::now(), "Starting deployment");
    let backend = EthersBackend::connect(&config).await.wrap_err("Failed to set up deployment backend")?;

    let records = script
        .run(&backend)
        .await
        .wrap_err_with(|| format!("Deployment to {} aborted", config.network.name))?;

    info!(
        deployed = records.len(),
        store = ?backend.store().dir(),
        "Deployment complete"
    );
    Ok(())
}

// END OF FILE: deployer/src/main.rs
