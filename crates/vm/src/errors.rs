use thiserror::Error;

/// Reasons a transaction is rejected before (or instead of) being executed. Each stage
/// of the validator returns the first one of these it encounters, per the staged,
/// short-circuiting validation pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransactionValidationError {
    #[error("Transaction signature is invalid")]
    SignatureInvalid,
    #[error("Transaction chain id does not match the configured chain id")]
    WrongChainId,
    #[error("Legacy transaction without replay protection is not supported")]
    ReplayProtectedUnsupported,
    #[error("Transaction is malformed")]
    InvalidTransactionFormat,
    #[error("Transaction nonce would overflow u64")]
    NonceOverflow,
    #[error("Init code exceeds the maximum allowed size")]
    InitcodeTooLarge,
    #[error("Gas price is below the block's base fee")]
    GasPriceBelowBaseFee,
    #[error("Max priority fee exceeds max fee per gas")]
    MaxPriorityFeeExceedsMaxFee,
    #[error("Intrinsic gas exceeds the transaction's gas limit")]
    IntrinsicGasExceedsLimit,
    #[error("Upfront cost does not fit in a U256")]
    UpfrontCostExceedsUint256,
    #[error("Sender balance is lower than the transaction's upfront cost")]
    UpfrontCostExceedsBalance,
    #[error("Transaction nonce is lower than the account's current nonce")]
    NonceTooLow,
    #[error("Transaction nonce is higher than the account's current nonce")]
    NonceTooHigh,
    #[error("Transaction sender is not authorized to send transactions")]
    TxSenderNotAuthorized,
    #[error("Blob transaction carries invalid or missing blob data")]
    InvalidBlobs,
    #[error("Total blob gas in the block would exceed the per-block limit")]
    TotalBlobGasTooHigh,
    #[error("Blob gas fee cap is below the block's blob base fee")]
    BlobGasPriceBelowBase,
}

/// Errors produced while applying an already-validated transaction to world state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransactionExecutionError {
    #[error(transparent)]
    Validation(#[from] TransactionValidationError),
    #[error("Execution halted: {0}")]
    ExecutionHalted(String),
    #[error("Invalid EOF code: {0}")]
    EofCodeInvalid(String),
    #[error("Internal error: {0}")]
    InternalError(String),
}
