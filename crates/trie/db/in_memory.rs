use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use crate::{error::TrieError, db::TrieDB};

/// In-memory trie storage backend, useful for tests and for ephemeral tries
/// (e.g. computing a one-off storage root from an iterator of entries).
#[derive(Default, Clone)]
pub struct InMemoryTrieDB {
    inner: Arc<Mutex<HashMap<Vec<u8>, Vec<u8>>>>,
}

impl InMemoryTrieDB {
    pub fn new(inner: Arc<Mutex<HashMap<Vec<u8>, Vec<u8>>>>) -> Self {
        Self { inner }
    }
}

impl TrieDB for InMemoryTrieDB {
    fn get(&self, key: Vec<u8>) -> Result<Option<Vec<u8>>, TrieError> {
        let db = self
            .inner
            .lock()
            .map_err(|_| TrieError::DbError("poisoned lock".to_string()))?;
        Ok(db.get(&key).cloned())
    }

    fn put(&self, key: Vec<u8>, value: Vec<u8>) -> Result<(), TrieError> {
        let mut db = self
            .inner
            .lock()
            .map_err(|_| TrieError::DbError("poisoned lock".to_string()))?;
        db.insert(key, value);
        Ok(())
    }
}
