mod account;
mod blobs_bundle;
mod block;
mod constants;
mod receipt;
pub mod transaction;

pub use account::*;
pub use blobs_bundle::*;
pub use block::*;
pub use constants::*;
pub use receipt::*;
pub use transaction::*;
