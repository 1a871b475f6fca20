use std::fs;
use std::str::FromStr as _;

use anyhow::Context;
use bytes::{Bytes, BytesMut};
use clap::Parser;
use ethereum_rust_core::{Blob, Commitment, Proof, Transaction, TxType};
use ethereum_rust_vm::{
    process_transaction, validate_transaction, Account, AuthorityProcessor, Cache,
    KzgVerifier, MessageOutcome, MessageProcessor, MessageStatus, ProcessorConfig, Tracer,
    TransactionExecutionError, TransactionResult, ValidationContext, WorldStateUpdater,
    WorldStateView,
};
use ethereum_types::{Address, U256};
use serde::Deserialize;
use tracing::{info, warn};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod cli;

const ACCEPTED_TYPES: [TxType; 5] = [
    TxType::Legacy,
    TxType::EIP2930,
    TxType::EIP1559,
    TxType::EIP4844,
    TxType::SetCode,
];

#[derive(Debug, Deserialize)]
struct Fixture {
    chain_id: u64,
    coinbase: Address,
    #[serde(default)]
    base_fee_per_gas: Option<u64>,
    #[serde(default)]
    is_shanghai_activated: bool,
    #[serde(default = "default_true")]
    is_post_london: bool,
    accounts: Vec<AccountFixture>,
    transactions: Vec<String>,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize)]
struct AccountFixture {
    address: Address,
    #[serde(default)]
    balance: U256,
    #[serde(default)]
    nonce: u64,
}

fn main() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    init_tracing(&cli.log_level)?;

    let raw = fs::read_to_string(&cli.input)
        .with_context(|| format!("failed to read fixture at {}", cli.input.display()))?;
    let fixture: Fixture = serde_json::from_str(&raw).context("failed to parse fixture")?;

    let mut state = Cache::default();
    for account in &fixture.accounts {
        state.touch_account(
            account.address,
            Account::new(account.balance, Bytes::new(), account.nonce, Default::default()),
        );
    }

    let validation = ValidationContext {
        chain_id: fixture.chain_id,
        accepted_types: &ACCEPTED_TYPES,
        base_fee_per_gas: fixture.base_fee_per_gas,
        is_shanghai_activated: fixture.is_shanghai_activated,
        current_blob_gas_limit: ethereum_rust_core::GAS_PER_BLOB
            * ethereum_rust_core::MAX_BLOB_NUMBER_PER_BLOCK as u64,
        current_blob_base_fee: None,
        allow_underpriced: false,
        strict_nonce: true,
        allow_sender_with_code: false,
    };
    let config = ProcessorConfig {
        coinbase: fixture.coinbase,
        is_post_london: fixture.is_post_london,
        warm_coinbase: fixture.is_shanghai_activated,
        sweep_empty_accounts: true,
        validation,
    };

    let kzg = NoTrustedSetup;
    let mut message_processor = ValueTransferProcessor;
    let mut authority_processor = DelegationDesignatorProcessor;
    let mut tracer = LoggingTracer;

    for (index, raw_tx) in fixture.transactions.iter().enumerate() {
        let bytes = decode_hex(raw_tx)
            .with_context(|| format!("transaction {index} is not valid hex"))?;
        let tx = match Transaction::decode_canonical(&bytes) {
            Ok(tx) => tx,
            Err(err) => {
                warn!(index, %err, "could not decode transaction, skipping");
                continue;
            }
        };

        if let Err(reason) = validate_transaction(&tx, None, &kzg, &config.validation) {
            warn!(index, %reason, "transaction rejected before execution");
            continue;
        }

        let result = process_transaction(
            &tx,
            &mut state,
            &mut message_processor,
            &mut authority_processor,
            &mut tracer,
            &config,
        );
        report(index, &result);
    }

    for account in &fixture.accounts {
        let info = state.get_account_info(account.address);
        info!(address = %account.address, balance = %info.balance, nonce = info.nonce, "final account state");
    }

    Ok(())
}

fn report(index: usize, result: &TransactionResult) {
    match result {
        TransactionResult::Success { used_gas, refunded_gas, .. } => {
            info!(index, used_gas, refunded_gas, "transaction succeeded");
        }
        TransactionResult::Failed { used_gas, reason, .. } => {
            warn!(index, used_gas, %reason, "transaction failed during execution");
        }
        TransactionResult::Invalid { reason } => {
            warn!(index, %reason, "transaction invalid");
        }
    }
}

fn decode_hex(s: &str) -> anyhow::Result<Vec<u8>> {
    let trimmed = s.strip_prefix("0x").unwrap_or(s);
    hex::decode(trimmed).context("invalid hex string")
}

fn init_tracing(log_level: &str) -> anyhow::Result<()> {
    let filter = EnvFilter::builder()
        .with_default_directive(
            Directive::from_str(log_level).context("unsupported log level")?,
        )
        .from_env_lossy();
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default tracing subscriber failed")?;
    Ok(())
}

/// Handles plain value transfers (a `Call` to an address with empty calldata); any
/// transaction that actually needs bytecode interpretation is reported as failed,
/// since no interpreter is wired into this binary.
struct ValueTransferProcessor;

impl<S: WorldStateUpdater> MessageProcessor<S> for ValueTransferProcessor {
    fn process_message(
        &mut self,
        state: &mut S,
        caller: Address,
        to: Option<Address>,
        value: U256,
        data: Bytes,
        _gas_limit: u64,
    ) -> Result<MessageOutcome, TransactionExecutionError> {
        let Some(to) = to else {
            return Err(TransactionExecutionError::ExecutionHalted(
                "contract creation requires an interpreter".to_string(),
            ));
        };
        if !data.is_empty() {
            return Err(TransactionExecutionError::ExecutionHalted(
                "calldata execution requires an interpreter".to_string(),
            ));
        }

        let caller_balance = state.get_account_info(caller).balance;
        let caller_balance = caller_balance.checked_sub(value).ok_or_else(|| {
            TransactionExecutionError::ExecutionHalted(
                "insufficient balance for value transfer".to_string(),
            )
        })?;
        state.set_balance(caller, caller_balance);
        let recipient_balance = state.get_account_info(to).balance.saturating_add(value);
        state.set_balance(to, recipient_balance);

        Ok(MessageOutcome {
            status: MessageStatus::CompletedSuccess,
            gas_used: 0,
            gas_refunded: 0,
            output: Bytes::new(),
            created_address: None,
            logs: Vec::new(),
            self_destructed: Vec::new(),
        })
    }
}

/// Applies an EIP-7702 authorization by writing the `0xef0100 || address` delegation
/// designator to the authority's bytecode, per the EIP's wire format. Authorizations
/// whose nonce doesn't match the authority's current nonce are skipped rather than
/// rejected, matching the EIP's "invalid authorizations are no-ops" rule.
struct DelegationDesignatorProcessor;

impl<S: WorldStateUpdater> AuthorityProcessor<S> for DelegationDesignatorProcessor {
    fn apply_authorization(
        &mut self,
        state: &mut S,
        authority: Address,
        _chain_id: u64,
        delegated_address: Address,
        nonce: u64,
    ) -> Result<(), TransactionExecutionError> {
        let info = state.get_account_info(authority);
        if info.nonce != nonce {
            return Ok(());
        }
        let mut designator = BytesMut::with_capacity(23);
        designator.extend_from_slice(&[0xef, 0x01, 0x00]);
        designator.extend_from_slice(delegated_address.as_bytes());
        state.set_code(authority, designator.freeze());
        state.set_nonce(authority, nonce.saturating_add(1));
        Ok(())
    }
}

struct LoggingTracer;

impl Tracer for LoggingTracer {
    fn on_message_enter(&mut self, caller: Address, to: Option<Address>, value: U256) {
        tracing::debug!(%caller, ?to, %value, "message enter");
    }

    fn on_message_exit(&mut self, outcome: &MessageOutcome) {
        tracing::debug!(status = ?outcome.status, gas_used = outcome.gas_used, "message exit");
    }
}

/// No trusted setup is loaded in this binary, so blob transactions can only be
/// accepted without a sidecar (i.e. the preflight hash check, never this verifier).
struct NoTrustedSetup;

impl KzgVerifier for NoTrustedSetup {
    fn verify_blob_kzg_proof_batch(
        &self,
        _blobs: &[Blob],
        _commitments: &[Commitment],
        _proofs: &[Proof],
    ) -> bool {
        false
    }
}
