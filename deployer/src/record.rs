// deployer/src/record.rs

use ethers::{
    abi::Token,
    types::{Address, TxHash, U256},
};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A single constructor argument, typed so it can be both ABI-encoded and persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum ConstructorArg {
    Address(Address),
    Uint(U256),
    String(String),
}

impl ConstructorArg {
    pub fn to_token(&self) -> Token {
        match self {
            Self::Address(addr) => Token::Address(*addr),
            Self::Uint(value) => Token::Uint(*value),
            Self::String(s) => Token::String(s.clone()),
        }
    }

    /// Short type name, used when comparing argument shapes across runs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Address(_) => "address",
            Self::Uint(_) => "uint256",
            Self::String(_) => "string",
        }
    }
}

impl From<Address> for ConstructorArg {
    fn from(addr: Address) -> Self {
        Self::Address(addr)
    }
}

impl From<U256> for ConstructorArg {
    fn from(value: U256) -> Self {
        Self::Uint(value)
    }
}

impl From<String> for ConstructorArg {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<&str> for ConstructorArg {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl fmt::Display for ConstructorArg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Address(addr) => write!(f, "{:?}", addr),
            Self::Uint(value) => write!(f, "{}", value),
            Self::String(s) => write!(f, "{:?}", s),
        }
    }
}

pub fn encode_args(args: &[ConstructorArg]) -> Vec<Token> {
    args.iter().map(ConstructorArg::to_token).collect()
}

/// Outcome of one contract creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentRecord {
    pub name: String,
    pub address: Address,
    pub args: Vec<ConstructorArg>,
    pub transaction_hash: TxHash,
}

impl DeploymentRecord {
    pub fn arg_kinds(&self) -> Vec<&'static str> {
        self.args.iter().map(ConstructorArg::kind).collect()
    }
}
