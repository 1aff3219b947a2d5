// deployer/src/bindings.rs
#![allow(clippy::all)]
use ethers::prelude::abigen;

// Only the read used for the post-deployment diagnostic.
abigen!(
    GameContract,
    r#"[
        function greeting() external view returns (string)
    ]"#
);

// END OF FILE: deployer/src/bindings.rs
