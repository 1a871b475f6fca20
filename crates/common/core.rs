pub mod serde_utils;
pub mod types;

pub use ethereum_types::{Address, H256, U256};
pub use types::*;
