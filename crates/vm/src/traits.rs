use ethereum_rust_core::Log;
use ethereum_types::{Address, H256, U256};

use crate::account::{Account, AccountInfo, StorageSlot};
use crate::errors::TransactionExecutionError;

/// Read-only view of world state as of the start of the block being processed.
/// Implementations are expected to be cheap to query repeatedly; the processor never
/// mutates through this trait, only through a `WorldStateUpdater`.
pub trait WorldStateView {
    fn get_account_info(&self, address: Address) -> AccountInfo;
    fn get_storage_slot(&self, address: Address, key: H256) -> U256;
    fn account_exists(&self, address: Address) -> bool {
        !self.get_account_info(address).is_empty()
    }
}

/// Staged overlay collecting the world-state mutations a transaction makes. A
/// processor run builds one of these per transaction (or per block) and the caller
/// decides when, and whether, to fold it back into the base `WorldStateView`.
pub trait WorldStateUpdater: WorldStateView {
    fn set_balance(&mut self, address: Address, balance: U256);
    fn set_nonce(&mut self, address: Address, nonce: u64);
    fn set_code(&mut self, address: Address, code: bytes::Bytes);
    fn set_storage_slot(&mut self, address: Address, key: H256, slot: StorageSlot);
    fn touch_account(&mut self, address: Address, account: Account);
    /// Removes an account entirely, e.g. after a post-execution EIP-161 empty-account sweep.
    fn delete_account(&mut self, address: Address);
}

/// Resolves a block number to the hash of that block, for the `BLOCKHASH` opcode and
/// for validating a block header's `parent_hash` chain. Only the last 256 ancestors
/// are guaranteed to be available, per the Yellow Paper's `BLOCKHASH` window.
pub trait BlockHashLookup {
    fn get_block_hash(&self, block_number: u64) -> Option<H256>;
}

/// Outcome of running a transaction's message (the call or contract-creation it
/// triggers) to completion, as reported by a `MessageProcessor`.
/// One of a message frame's three terminal states (`NOT_STARTED`/`CODE_SUSPENDED`/
/// `CODE_EXECUTING` never escape the interpreter driving the frame).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageStatus {
    CompletedSuccess,
    Revert { reason: Option<bytes::Bytes> },
    ExceptionalHalt { reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageOutcome {
    pub status: MessageStatus,
    pub gas_used: u64,
    pub gas_refunded: u64,
    pub output: bytes::Bytes,
    pub created_address: Option<Address>,
    pub logs: Vec<Log>,
    pub self_destructed: Vec<Address>,
}

/// Abstraction over "run this message to completion", injected into the transaction
/// processor so it stays agnostic to how contract code is actually interpreted. The
/// interpreter implementing this trait owns the call-frame stack and the
/// NOT_STARTED -> CODE_SUSPENDED <-> CODE_EXECUTING -> terminal state machine of a
/// single message's execution.
pub trait MessageProcessor<S: WorldStateUpdater> {
    fn process_message(
        &mut self,
        state: &mut S,
        caller: Address,
        to: Option<Address>,
        value: U256,
        data: bytes::Bytes,
        gas_limit: u64,
    ) -> Result<MessageOutcome, TransactionExecutionError>;
}

/// Observes execution without being able to affect it: entry/exit of each message
/// frame and gas accounting milestones. Block explorers and `debug_traceTransaction`
/// style RPCs are built on top of a `Tracer` implementation.
pub trait Tracer {
    fn on_message_enter(&mut self, caller: Address, to: Option<Address>, value: U256) {
        let _ = (caller, to, value);
    }
    fn on_message_exit(&mut self, outcome: &MessageOutcome) {
        let _ = outcome;
    }
}

/// Resolves an EIP-7702 authorization tuple's `authority` address and applies (or
/// revokes) the resulting code delegation on world state. Separated out from
/// `WorldStateUpdater` because authority resolution involves signature recovery,
/// which a pure state overlay has no business doing itself.
pub trait AuthorityProcessor<S: WorldStateUpdater> {
    fn apply_authorization(
        &mut self,
        state: &mut S,
        authority: Address,
        chain_id: u64,
        delegated_address: Address,
        nonce: u64,
    ) -> Result<(), TransactionExecutionError>;
}

/// Verifies a blob transaction's KZG sidecar against its versioned hashes. Treated as
/// a blocking native call (per EIP-4844) and injected rather than linked directly,
/// since it depends on the trusted setup a real node loads at startup.
pub trait KzgVerifier {
    fn verify_blob_kzg_proof_batch(
        &self,
        blobs: &[ethereum_rust_core::Blob],
        commitments: &[ethereum_rust_core::Commitment],
        proofs: &[ethereum_rust_core::Proof],
    ) -> bool;
}
