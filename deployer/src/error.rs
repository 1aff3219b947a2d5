// deployer/src/error.rs

use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Everything that can go wrong during a deployment run.
#[derive(Debug, Error)]
pub enum DeployError {
    /// Missing deployer account, bad environment values, provider setup.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A contract could not be deployed (artifact, transaction, receipt or store failure).
    #[error("failed to deploy {contract}: {source}")]
    Deployment {
        contract: String,
        #[source]
        source: BoxError,
    },

    /// A post-deployment diagnostic read failed.
    #[error("failed to read {method}() from {contract}: {source}")]
    Read {
        contract: String,
        method: String,
        #[source]
        source: BoxError,
    },
}

impl DeployError {
    pub fn deployment(contract: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Deployment { contract: contract.into(), source: source.into() }
    }

    pub fn read(contract: impl Into<String>, method: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::Read { contract: contract.into(), method: method.into(), source: source.into() }
    }

    /// Only diagnostic reads are allowed to fail without aborting a run.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, Self::Read { .. })
    }

    /// Name of the contract involved, if any.
    pub fn contract(&self) -> Option<&str> {
        match self {
            Self::Configuration(_) => None,
            Self::Deployment { contract, .. } | Self::Read { contract, .. } => Some(contract),
        }
    }
}
