use ethereum_rust_rlp::error::RLPDecodeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrieError {
    #[error(transparent)]
    RLPDecode(#[from] RLPDecodeError),
    #[error("Inconsistent internal tree structure")]
    InconsistentTree,
    #[error("Database error: {0}")]
    DbError(String),
    #[error("Verification error: {0}")]
    Verify(String),
}
