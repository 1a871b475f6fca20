//! Drives one transaction from a validated world-state view to a committed (or
//! discarded) update, per the 15-step sequence: build an updater, validate, apply
//! authorizations, debit the sender, run the message frame to completion, refund,
//! reward the coinbase, sweep self-destructs/empty accounts.
use bytes::Bytes;
use ethereum_rust_core::{AuthorizationTuple, Log, Transaction, TxKind};
use ethereum_types::{Address, U256};
use keccak_hash::keccak;
use ethereum_rust_rlp::structs::Encoder;

use crate::{
    errors::{TransactionExecutionError, TransactionValidationError},
    gas::{apply_refund_cap, intrinsic_gas, priority_fee_per_gas, self_destruct_refund, upfront_cost},
    traits::{AuthorityProcessor, MessageProcessor, MessageStatus, Tracer, WorldStateUpdater},
    validator::{validate_sender, ValidationContext},
};

pub struct ProcessorConfig<'a> {
    pub coinbase: Address,
    pub is_post_london: bool,
    pub warm_coinbase: bool,
    pub sweep_empty_accounts: bool,
    pub validation: ValidationContext<'a>,
}

/// What happened to a transaction once the processor finished with it. Mirrors the
/// three-way split in the spec: invalid transactions never touch state, failed ones
/// consume gas but roll back their own effects, successful ones commit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionResult {
    Success {
        logs: Vec<Log>,
        used_gas: u64,
        refunded_gas: u64,
        return_data: Bytes,
    },
    Failed {
        used_gas: u64,
        refunded_gas: u64,
        reason: TransactionExecutionError,
        revert_reason: Option<Bytes>,
    },
    Invalid {
        reason: TransactionValidationError,
    },
}

/// Runs `tx` to completion against `state`, driving `message_processor` for the
/// initial frame and `authority_processor` for any EIP-7702 authorizations. `state`'s
/// mutations are committed on success; the caller is responsible for discarding them
/// (e.g. by cloning `state` beforehand) when the result is `Invalid` or `Failed`.
pub fn process_transaction<S, M, A, T>(
    tx: &Transaction,
    state: &mut S,
    message_processor: &mut M,
    authority_processor: &mut A,
    tracer: &mut T,
    config: &ProcessorConfig,
) -> TransactionResult
where
    S: WorldStateUpdater,
    M: MessageProcessor<S>,
    A: AuthorityProcessor<S>,
    T: Tracer,
{
    if let Err(reason) = validate_sender(tx, state, &config.validation) {
        return TransactionResult::Invalid { reason };
    }

    let sender = tx.sender();
    let authorization_list = tx.authorization_list();
    for authorization in &authorization_list {
        if let Err(reason) = apply_authorization(authority_processor, state, authorization) {
            return TransactionResult::Failed {
                used_gas: tx.gas_limit(),
                refunded_gas: 0,
                reason,
                revert_reason: None,
            };
        }
    }

    let sender_nonce_before = state.get_account_info(sender).nonce;
    state.set_nonce(sender, sender_nonce_before.saturating_add(1));

    let effective_price = tx
        .effective_gas_price(config.validation.base_fee_per_gas)
        .unwrap_or_else(|| tx.gas_price());
    let blob_fee_cap = tx.max_fee_per_blob_gas().unwrap_or_default();
    let blob_gas_cost = blob_fee_cap
        .checked_mul(U256::from(tx.blob_versioned_hashes().len() as u64))
        .unwrap_or_default();
    let upfront = match upfront_cost(tx.value(), tx.gas_limit(), effective_price, blob_gas_cost) {
        Ok(cost) => cost,
        Err(TransactionExecutionError::Validation(reason)) => {
            return TransactionResult::Invalid { reason }
        }
        Err(reason) => {
            return TransactionResult::Failed {
                used_gas: tx.gas_limit(),
                refunded_gas: 0,
                reason,
                revert_reason: None,
            }
        }
    };
    let sender_balance_before = state.get_account_info(sender).balance;
    state.set_balance(sender, sender_balance_before.saturating_sub(upfront));

    let is_contract_creation = tx.is_contract_creation();
    let intrinsic = match intrinsic_gas(tx, is_contract_creation, config.validation.is_shanghai_activated) {
        Ok(gas) => gas,
        Err(reason) => return TransactionResult::Invalid { reason },
    };
    let gas_available = tx.gas_limit().saturating_sub(intrinsic);

    let (to, code_address) = match tx.to() {
        TxKind::Call(address) => (Some(address), address),
        TxKind::Create => {
            let created = compute_created_address(sender, sender_nonce_before);
            (None, created)
        }
    };

    tracer.on_message_enter(sender, to, tx.value());
    let outcome = message_processor.process_message(
        state,
        sender,
        to,
        tx.value(),
        tx.data().clone(),
        gas_available,
    );
    let outcome = match outcome {
        Ok(outcome) => outcome,
        Err(reason) => {
            return TransactionResult::Failed {
                used_gas: tx.gas_limit(),
                refunded_gas: 0,
                reason,
                revert_reason: None,
            }
        }
    };
    tracer.on_message_exit(&outcome);

    let used_gas = tx.gas_limit().saturating_sub(gas_available).saturating_add(outcome.gas_used);
    let gas_remaining = tx.gas_limit().saturating_sub(used_gas);
    let self_destruct_count = outcome.self_destructed.len() as u64;
    let accrued_refund = outcome
        .gas_refunded
        .saturating_add(self_destruct_refund(config.is_post_london).saturating_mul(self_destruct_count));
    let capped_refund = apply_refund_cap(used_gas, accrued_refund, config.is_post_london);
    let refunded_gas = gas_remaining.saturating_add(capped_refund);

    let refund_amount = U256::from(refunded_gas).saturating_mul(U256::from(effective_price));
    let sender_balance_after_run = state.get_account_info(sender).balance;
    state.set_balance(sender, sender_balance_after_run.saturating_add(refund_amount));

    let priority_fee = priority_fee_per_gas(effective_price, config.validation.base_fee_per_gas.unwrap_or(0));
    let coinbase_reward = U256::from(used_gas).saturating_mul(U256::from(priority_fee));
    let coinbase_balance = state.get_account_info(config.coinbase).balance;
    state.set_balance(config.coinbase, coinbase_balance.saturating_add(coinbase_reward));

    for address in &outcome.self_destructed {
        state.delete_account(*address);
    }
    if config.sweep_empty_accounts {
        for address in [sender, config.coinbase, code_address] {
            if state.get_account_info(address).is_empty() {
                state.delete_account(address);
            }
        }
    }

    match outcome.status {
        MessageStatus::CompletedSuccess => TransactionResult::Success {
            logs: outcome.logs,
            used_gas,
            refunded_gas,
            return_data: outcome.output,
        },
        MessageStatus::Revert { reason } => TransactionResult::Failed {
            used_gas,
            refunded_gas: 0,
            reason: TransactionExecutionError::ExecutionHalted("reverted".to_string()),
            revert_reason: reason,
        },
        MessageStatus::ExceptionalHalt { reason } => TransactionResult::Failed {
            used_gas: tx.gas_limit(),
            refunded_gas: 0,
            reason: TransactionExecutionError::ExecutionHalted(reason),
            revert_reason: None,
        },
    }
}

fn apply_authorization<S, A>(
    authority_processor: &mut A,
    state: &mut S,
    authorization: &AuthorizationTuple,
) -> Result<(), TransactionExecutionError>
where
    S: WorldStateUpdater,
    A: AuthorityProcessor<S>,
{
    let authority = authorization.authority();
    authority_processor.apply_authorization(
        state,
        authority,
        authorization.chain_id,
        authorization.address,
        authorization.nonce,
    )
}

/// `keccak(RLP([sender, nonce]))[12..]`, the legacy `CREATE` contract address formula.
fn compute_created_address(sender: Address, nonce: u64) -> Address {
    let mut buf = Vec::new();
    Encoder::new(&mut buf)
        .encode_field(&sender)
        .encode_field(&nonce)
        .finish();
    let hash = keccak(&buf);
    Address::from_slice(&hash.0[12..])
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn created_address_is_stable_for_the_same_sender_and_nonce() {
        let sender = Address::from_low_u64_be(1);
        assert_eq!(
            compute_created_address(sender, 0),
            compute_created_address(sender, 0)
        );
        assert_ne!(
            compute_created_address(sender, 0),
            compute_created_address(sender, 1)
        );
    }
}
