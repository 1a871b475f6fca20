pub mod in_memory;

use crate::error::TrieError;

/// Key-value storage backing a trie's nodes, keyed by their `NodeHash` bytes.
pub trait TrieDB: Send + Sync {
    fn get(&self, key: Vec<u8>) -> Result<Option<Vec<u8>>, TrieError>;
    fn put(&self, key: Vec<u8>, value: Vec<u8>) -> Result<(), TrieError>;
    fn put_batch(&self, key_values: Vec<(Vec<u8>, Vec<u8>)>) -> Result<(), TrieError> {
        for (key, value) in key_values {
            self.put(key, value)?;
        }
        Ok(())
    }
}
