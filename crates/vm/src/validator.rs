//! Staged, short-circuiting transaction validation. Each stage either passes or
//! returns the first `TransactionValidationError` it hits; stages never partially
//! apply, so a caller can retry validation against a different context for free.
use ethereum_rust_core::{BlobsBundle, Transaction, TxKind, TxType};
use ethereum_types::U256;
use lazy_static::lazy_static;

use crate::{
    blob::check_sidecar_binding,
    errors::TransactionValidationError,
    gas::{intrinsic_gas, upfront_cost},
    traits::{KzgVerifier, WorldStateView},
};

lazy_static! {
    /// Upper bound secp256k1 allows for a signature's `s` component before it's
    /// considered malleable (n/2, per EIP-2).
    static ref SECP256K1_HALF_N: U256 = {
        let n = U256::from_big_endian(&hex_literal::hex!(
            "fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141"
        ));
        n.checked_div(U256::from(2u8)).unwrap_or_default()
    };
}

/// Fork/pool parameters the validator needs but that don't live on the transaction
/// or the world-state view itself.
pub struct ValidationContext<'a> {
    pub chain_id: u64,
    pub accepted_types: &'a [TxType],
    pub base_fee_per_gas: Option<u64>,
    pub is_shanghai_activated: bool,
    pub current_blob_gas_limit: u64,
    pub current_blob_base_fee: Option<u64>,
    pub allow_underpriced: bool,
    pub strict_nonce: bool,
    pub allow_sender_with_code: bool,
}

/// Stages 1-8: everything that can be decided from the transaction and the fork
/// context alone, without consulting the sender's account.
pub fn validate_transaction(
    tx: &Transaction,
    sidecar: Option<&BlobsBundle>,
    kzg: &dyn KzgVerifier,
    ctx: &ValidationContext,
) -> Result<(), TransactionValidationError> {
    validate_signature(tx, ctx.chain_id)?;

    if !ctx.accepted_types.contains(&tx.tx_type()) {
        return Err(TransactionValidationError::InvalidTransactionFormat);
    }

    if tx.tx_type() == TxType::EIP4844 {
        validate_blob_preflight(tx, sidecar, kzg)?;
    }

    if tx.nonce() == u64::MAX {
        return Err(TransactionValidationError::NonceOverflow);
    }

    if tx.is_contract_creation()
        && ctx.is_shanghai_activated
        && tx.data().len() > ethereum_rust_core::MAX_INITCODE_SIZE
    {
        return Err(TransactionValidationError::InitcodeTooLarge);
    }

    validate_fee_floors(tx, ctx)?;

    let intrinsic = intrinsic_gas(tx, tx.is_contract_creation(), ctx.is_shanghai_activated)?;
    if tx.gas_limit() < intrinsic {
        return Err(TransactionValidationError::IntrinsicGasExceedsLimit);
    }

    let effective_price = tx
        .effective_gas_price(ctx.base_fee_per_gas)
        .unwrap_or_else(|| tx.gas_price());
    let blob_gas_cost = blob_gas_cost_for_tx(tx)?;
    upfront_cost(tx.value(), tx.gas_limit(), effective_price, blob_gas_cost)
        .map_err(|_| TransactionValidationError::UpfrontCostExceedsUint256)?;

    Ok(())
}

/// Stage 9: sender checks, requiring a world-state view. Kept as a separate entry
/// point since it's the only stage that needs storage access.
pub fn validate_sender<S: WorldStateView>(
    tx: &Transaction,
    state: &S,
    ctx: &ValidationContext,
) -> Result<(), TransactionValidationError> {
    let sender = tx.sender();
    let account = state.get_account_info(sender);

    if !ctx.allow_sender_with_code && !account.bytecode.is_empty() {
        return Err(TransactionValidationError::TxSenderNotAuthorized);
    }

    if tx.nonce() < account.nonce {
        return Err(TransactionValidationError::NonceTooLow);
    }
    if ctx.strict_nonce && tx.nonce() > account.nonce {
        return Err(TransactionValidationError::NonceTooHigh);
    }

    let effective_price = tx
        .effective_gas_price(ctx.base_fee_per_gas)
        .unwrap_or_else(|| tx.gas_price());
    let blob_gas_cost = blob_gas_cost_for_tx(tx)?;
    let cost = upfront_cost(tx.value(), tx.gas_limit(), effective_price, blob_gas_cost)
        .map_err(|_| TransactionValidationError::UpfrontCostExceedsUint256)?;

    if account.balance < cost {
        return Err(TransactionValidationError::UpfrontCostExceedsBalance);
    }

    Ok(())
}

fn validate_signature(tx: &Transaction, expected_chain_id: u64) -> Result<(), TransactionValidationError> {
    if tx.signature_s() > *SECP256K1_HALF_N {
        return Err(TransactionValidationError::SignatureInvalid);
    }
    if tx.tx_type() == TxType::Legacy && !tx.protected() {
        return Err(TransactionValidationError::ReplayProtectedUnsupported);
    }
    match tx.chain_id() {
        Some(chain_id) if chain_id != expected_chain_id => {
            Err(TransactionValidationError::WrongChainId)
        }
        _ => Ok(()),
    }
}

fn validate_blob_preflight(
    tx: &Transaction,
    sidecar: Option<&BlobsBundle>,
    kzg: &dyn KzgVerifier,
) -> Result<(), TransactionValidationError> {
    if matches!(tx.to(), TxKind::Create) {
        return Err(TransactionValidationError::InvalidBlobs);
    }
    let versioned_hashes = tx.blob_versioned_hashes();
    if versioned_hashes.is_empty() {
        return Err(TransactionValidationError::InvalidBlobs);
    }
    if let Some(sidecar) = sidecar {
        check_sidecar_binding(&versioned_hashes, sidecar)?;
        if !kzg.verify_blob_kzg_proof_batch(&sidecar.blobs, &sidecar.commitments, &sidecar.proofs) {
            return Err(TransactionValidationError::InvalidBlobs);
        }
    }
    Ok(())
}

fn validate_fee_floors(
    tx: &Transaction,
    ctx: &ValidationContext,
) -> Result<(), TransactionValidationError> {
    if let Some(max_priority_fee) = tx.max_priority_fee() {
        if max_priority_fee > tx.max_fee_per_gas().unwrap_or(max_priority_fee) {
            return Err(TransactionValidationError::MaxPriorityFeeExceedsMaxFee);
        }
    }

    if !ctx.allow_underpriced {
        if let Some(base_fee) = ctx.base_fee_per_gas {
            let effective_price = tx.effective_gas_price(Some(base_fee)).unwrap_or_else(|| tx.gas_price());
            if effective_price < base_fee {
                return Err(TransactionValidationError::GasPriceBelowBaseFee);
            }
        }
    }

    if tx.tx_type() == TxType::EIP4844 {
        let blob_count = tx.blob_versioned_hashes().len() as u64;
        if blob_count.saturating_mul(ethereum_rust_core::GAS_PER_BLOB) > ctx.current_blob_gas_limit {
            return Err(TransactionValidationError::TotalBlobGasTooHigh);
        }
        if !ctx.allow_underpriced {
            if let Some(current_blob_base_fee) = ctx.current_blob_base_fee {
                let cap = tx.max_fee_per_blob_gas().unwrap_or_default();
                if cap < U256::from(current_blob_base_fee) {
                    return Err(TransactionValidationError::BlobGasPriceBelowBase);
                }
            }
        }
    }

    Ok(())
}

fn blob_gas_cost_for_tx(tx: &Transaction) -> Result<U256, TransactionValidationError> {
    if tx.tx_type() != TxType::EIP4844 {
        return Ok(U256::zero());
    }
    let blob_count = tx.blob_versioned_hashes().len() as u64;
    let gas = blob_count.saturating_mul(ethereum_rust_core::GAS_PER_BLOB);
    let fee_cap = tx.max_fee_per_blob_gas().unwrap_or_default();
    Ok(U256::from(gas).saturating_mul(fee_cap))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn half_n_is_half_of_the_curve_order() {
        let n = U256::from_big_endian(&hex_literal::hex!(
            "fffffffffffffffffffffffffffffffebaaedce6af48a03bbfd25e8cd0364141"
        ));
        // n is odd, so halving truncates by exactly one unit
        assert_eq!(
            SECP256K1_HALF_N.saturating_mul(U256::from(2u8)),
            n.saturating_sub(U256::from(1u8))
        );
    }
}
