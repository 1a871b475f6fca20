//! Gas accounting: intrinsic gas, the fee market, and the refund policy.
//!
//! Kept free of any dependency on how a message is actually executed - every
//! computation here takes plain transaction/header fields and returns a `u64`/`U256`,
//! so the transaction processor and the validator can both call into it.
use ethereum_rust_core::{
    AuthorizationTuple, Transaction, GAS_PER_BLOB, GAS_REFUND_DENOMINATOR_FRONTIER,
    GAS_REFUND_DENOMINATOR_LONDON, MAX_BLOB_NUMBER_PER_BLOCK, PER_EMPTY_ACCOUNT_COST,
    SELF_DESTRUCT_REFUND, TX_ACCESS_LIST_ADDRESS_GAS, TX_ACCESS_LIST_STORAGE_KEY_GAS,
    TX_BASE_COST, TX_CREATE_COST, TX_DATA_NON_ZERO_GAS_EIP2028, TX_DATA_ZERO_GAS_COST,
    TX_INIT_CODE_WORD_GAS_COST,
};
use ethereum_types::U256;

use crate::errors::{TransactionExecutionError, TransactionValidationError};

/// Intrinsic gas: the flat cost a transaction owes before a single opcode runs, for
/// its base fee, payload bytes, access list, init code, and (post EIP-7702) its
/// authorization list.
pub fn intrinsic_gas(
    tx: &Transaction,
    is_contract_creation: bool,
    is_shanghai_activated: bool,
) -> Result<u64, TransactionValidationError> {
    let overflow = || TransactionValidationError::IntrinsicGasExceedsLimit;

    let mut gas = if is_contract_creation {
        TX_CREATE_COST
    } else {
        TX_BASE_COST
    };

    let data = tx.data();
    let non_zero_count = data.iter().filter(|&&b| b != 0).count() as u64;
    let zero_count = (data.len() as u64).saturating_sub(non_zero_count);

    gas = gas
        .checked_add(non_zero_count.checked_mul(TX_DATA_NON_ZERO_GAS_EIP2028).ok_or_else(overflow)?)
        .ok_or_else(overflow)?;
    gas = gas
        .checked_add(zero_count.checked_mul(TX_DATA_ZERO_GAS_COST).ok_or_else(overflow)?)
        .ok_or_else(overflow)?;

    if is_contract_creation && is_shanghai_activated {
        let len_in_words = (data.len() as u64).saturating_add(31) / 32;
        gas = gas
            .checked_add(len_in_words.checked_mul(TX_INIT_CODE_WORD_GAS_COST).ok_or_else(overflow)?)
            .ok_or_else(overflow)?;
    }

    let access_list = tx.access_list();
    let storage_keys_count: u64 = access_list.iter().map(|(_, keys)| keys.len() as u64).sum();
    gas = gas
        .checked_add(
            (access_list.len() as u64)
                .checked_mul(TX_ACCESS_LIST_ADDRESS_GAS)
                .ok_or_else(overflow)?,
        )
        .ok_or_else(overflow)?;
    gas = gas
        .checked_add(
            storage_keys_count
                .checked_mul(TX_ACCESS_LIST_STORAGE_KEY_GAS)
                .ok_or_else(overflow)?,
        )
        .ok_or_else(overflow)?;

    gas = gas
        .checked_add(set_code_gas(&tx.authorization_list()).ok_or_else(overflow)?)
        .ok_or_else(overflow)?;

    Ok(gas)
}

/// EIP-7702: flat cost of the authorization tuples in a set-code transaction's list
pub fn set_code_gas(authorization_list: &[AuthorizationTuple]) -> Option<u64> {
    (authorization_list.len() as u64).checked_mul(PER_EMPTY_ACCOUNT_COST)
}

/// EIP-4844: flat gas cost of carrying `blob_count` blobs
pub fn blob_gas_cost(blob_count: usize) -> Result<u64, TransactionValidationError> {
    if blob_count > MAX_BLOB_NUMBER_PER_BLOCK {
        return Err(TransactionValidationError::TotalBlobGasTooHigh);
    }
    (blob_count as u64)
        .checked_mul(GAS_PER_BLOB)
        .ok_or(TransactionValidationError::TotalBlobGasTooHigh)
}

/// EIP-1559 effective gas price: `min(max_fee_per_gas, base_fee_per_gas + max_priority_fee_per_gas)`
/// for dynamic-fee transactions, or the flat `gas_price` for legacy/access-list ones.
pub fn effective_gas_price(
    gas_price: Option<u64>,
    max_fee_per_gas: Option<u64>,
    max_priority_fee_per_gas: Option<u64>,
    base_fee_per_gas: u64,
) -> Option<u64> {
    match (gas_price, max_fee_per_gas, max_priority_fee_per_gas) {
        (Some(gas_price), _, _) => Some(gas_price),
        (None, Some(max_fee), Some(max_priority_fee)) => {
            let priority = max_priority_fee.min(max_fee.saturating_sub(base_fee_per_gas));
            Some(base_fee_per_gas.saturating_add(priority))
        }
        _ => None,
    }
}

/// The portion of the effective gas price that goes to the block's coinbase, rather
/// than being burned as the base fee.
pub fn priority_fee_per_gas(effective_gas_price: u64, base_fee_per_gas: u64) -> u64 {
    effective_gas_price.saturating_sub(base_fee_per_gas)
}

/// Caps the accrued refund counter (gas refund counter plus any self-destruct refund)
/// at the fork's refund quotient (EIP-3529 reduced it from 1/2 to 1/5 of gas used, and
/// zeroed out the flat self-destruct refund). Callers still owe the sender the unused
/// `gas_limit - gas_used` on top of this — this is only the capped term of that sum.
pub fn apply_refund_cap(gas_used: u64, accrued_refund: u64, is_post_london: bool) -> u64 {
    let denominator = if is_post_london {
        GAS_REFUND_DENOMINATOR_LONDON
    } else {
        GAS_REFUND_DENOMINATOR_FRONTIER
    };
    accrued_refund.min(gas_used.checked_div(denominator).unwrap_or(0))
}

/// Self-destruct refund: zero post-London (EIP-3529), the flat historical amount before it.
pub fn self_destruct_refund(is_post_london: bool) -> u64 {
    if is_post_london {
        0
    } else {
        SELF_DESTRUCT_REFUND
    }
}

/// The upfront amount debited from the sender before execution starts: value plus
/// gas_limit * effective_gas_price plus any blob gas cost. Returned as a `U256`
/// because a maximally adversarial transaction can overflow a `u64`.
pub fn upfront_cost(
    value: U256,
    gas_limit: u64,
    effective_gas_price: u64,
    blob_gas_cost: U256,
) -> Result<U256, TransactionExecutionError> {
    let gas_cost = U256::from(gas_limit)
        .checked_mul(U256::from(effective_gas_price))
        .ok_or(TransactionExecutionError::Validation(
            TransactionValidationError::UpfrontCostExceedsUint256,
        ))?;
    value
        .checked_add(gas_cost)
        .and_then(|sum| sum.checked_add(blob_gas_cost))
        .ok_or(TransactionExecutionError::Validation(
            TransactionValidationError::UpfrontCostExceedsUint256,
        ))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn refund_cap_post_london_is_one_fifth() {
        assert_eq!(apply_refund_cap(100_000, 100_000, true), 20_000);
    }

    #[test]
    fn refund_cap_pre_london_is_one_half() {
        assert_eq!(apply_refund_cap(100_000, 100_000, false), 50_000);
    }

    #[test]
    fn self_destruct_refund_is_zero_post_london() {
        assert_eq!(self_destruct_refund(true), 0);
        assert_eq!(self_destruct_refund(false), 24_000);
    }

    #[test]
    fn effective_gas_price_uses_priority_fee_when_capped_by_max_fee() {
        // base_fee=100, max_priority_fee=50, max_fee=120 => priority capped at 20
        let price = effective_gas_price(None, Some(120), Some(50), 100).unwrap();
        assert_eq!(price, 120);
    }

    #[test]
    fn effective_gas_price_legacy_ignores_base_fee() {
        assert_eq!(effective_gas_price(Some(42), None, None, 100), Some(42));
    }
}
