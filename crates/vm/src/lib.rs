pub mod account;
pub mod blob;
pub mod db;
pub mod errors;
pub mod gas;
pub mod processor;
pub mod traits;
pub mod validator;

pub use account::{Account, AccountInfo, StorageSlot};
pub use db::{Cache, Db};
pub use errors::{TransactionExecutionError, TransactionValidationError};
pub use processor::{process_transaction, ProcessorConfig, TransactionResult};
pub use traits::{
    AuthorityProcessor, BlockHashLookup, KzgVerifier, MessageOutcome, MessageProcessor,
    MessageStatus, Tracer, WorldStateUpdater, WorldStateView,
};
pub use validator::{validate_sender, validate_transaction, ValidationContext};
