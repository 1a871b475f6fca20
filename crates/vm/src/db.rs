use std::collections::HashMap;

use ethereum_types::{Address, H256, U256};

use crate::{
    account::{Account, AccountInfo, StorageSlot},
    traits::{BlockHashLookup, WorldStateUpdater, WorldStateView},
};

/// Flat in-memory world state, useful as the base `WorldStateView` for tests and for
/// the demo binary. A real node would back this with the account/storage trie instead.
#[derive(Debug, Default)]
pub struct Db {
    pub accounts: HashMap<Address, Account>,
    pub block_hashes: HashMap<u64, H256>,
}

impl Db {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_accounts(&mut self, accounts: Vec<(Address, Account)>) {
        self.accounts.extend(accounts);
    }

    pub fn add_block_hashes(&mut self, block_hashes: Vec<(u64, H256)>) {
        self.block_hashes.extend(block_hashes);
    }

    pub fn with_accounts(mut self, accounts: HashMap<Address, Account>) -> Self {
        self.accounts = accounts;
        self
    }

    pub fn with_block_hashes(mut self, block_hashes: HashMap<u64, H256>) -> Self {
        self.block_hashes = block_hashes;
        self
    }
}

impl WorldStateView for Db {
    fn get_account_info(&self, address: Address) -> AccountInfo {
        self.accounts
            .get(&address)
            .map(|account| account.info.clone())
            .unwrap_or_default()
    }

    fn get_storage_slot(&self, address: Address, key: H256) -> U256 {
        self.accounts
            .get(&address)
            .and_then(|account| account.storage.get(&key))
            .map(|slot| slot.original_value)
            .unwrap_or_default()
    }
}

impl BlockHashLookup for Db {
    fn get_block_hash(&self, block_number: u64) -> Option<H256> {
        self.block_hashes.get(&block_number).cloned()
    }
}

/// Staged, per-block overlay of account changes on top of a base `Db`. Mutations land
/// here first; the caller decides when to fold the cache back into the base state.
#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct Cache {
    pub accounts: HashMap<Address, Account>,
}

impl Cache {
    pub fn get_account(&self, address: Address) -> Option<&Account> {
        self.accounts.get(&address)
    }

    pub fn get_mut_account(&mut self, address: Address) -> Option<&mut Account> {
        self.accounts.get_mut(&address)
    }

    pub fn get_storage_slot(&self, address: Address, key: H256) -> Option<StorageSlot> {
        self.get_account(address)?.storage.get(&key).cloned()
    }

    pub fn add_account(&mut self, address: &Address, account: &Account) {
        self.accounts.insert(*address, account.clone());
    }

    pub fn is_account_cached(&self, address: &Address) -> bool {
        self.accounts.contains_key(address)
    }

    pub fn is_slot_cached(&self, address: &Address, key: H256) -> bool {
        self.get_account(*address)
            .is_some_and(|account| account.storage.contains_key(&key))
    }
}

impl WorldStateView for Cache {
    fn get_account_info(&self, address: Address) -> AccountInfo {
        self.accounts
            .get(&address)
            .map(|account| account.info.clone())
            .unwrap_or_default()
    }

    fn get_storage_slot(&self, address: Address, key: H256) -> U256 {
        self.get_storage_slot(address, key)
            .map(|slot| slot.current_value)
            .unwrap_or_default()
    }
}

impl WorldStateUpdater for Cache {
    fn set_balance(&mut self, address: Address, balance: U256) {
        self.accounts.entry(address).or_default().info.balance = balance;
    }

    fn set_nonce(&mut self, address: Address, nonce: u64) {
        self.accounts.entry(address).or_default().info.nonce = nonce;
    }

    fn set_code(&mut self, address: Address, code: bytes::Bytes) {
        self.accounts.entry(address).or_default().info.bytecode = code;
    }

    fn set_storage_slot(&mut self, address: Address, key: H256, slot: StorageSlot) {
        self.accounts
            .entry(address)
            .or_default()
            .storage
            .insert(key, slot);
    }

    fn touch_account(&mut self, address: Address, account: Account) {
        self.accounts.insert(address, account);
    }

    fn delete_account(&mut self, address: Address) {
        self.accounts.remove(&address);
    }
}
