pub mod db;
mod error;
mod nibbles;
mod node;
mod node_hash;
mod state;

use ethereum_rust_rlp::constants::RLP_NULL;
use ethereum_types::H256;
use nibbles::Nibbles;
use node::Node;
use node_hash::NodeHash;
use sha3::{Digest, Keccak256};

pub use self::db::{in_memory::InMemoryTrieDB, TrieDB};
pub use self::error::TrieError;
use self::{node::LeafNode, state::TrieState};

use lazy_static::lazy_static;

lazy_static! {
    /// Root hash of an empty trie: keccak(RLP_NULL)
    pub static ref EMPTY_TRIE_HASH: H256 = H256::from_slice(
        Keccak256::new()
            .chain_update([RLP_NULL])
            .finalize()
            .as_slice(),
    );
}

/// RLP-encoded trie path
pub type PathRLP = Vec<u8>;
/// RLP-encoded trie value
pub type ValueRLP = Vec<u8>;
/// RLP-encoded trie node
pub type NodeRLP = Vec<u8>;

/// An Ethereum-compatible Merkle Patricia Trie.
///
/// Mutations (`insert`/`remove`) are structure-sharing: they never overwrite an
/// existing node, they build new ones and return a new root, leaving every previous
/// root's nodes reachable (and unmodified) in the backing `TrieDB`.
pub struct Trie {
    root: Option<NodeHash>,
    pub(crate) state: TrieState,
}

impl Trie {
    /// Creates a new, empty trie backed by `db`
    pub fn new(db: Box<dyn TrieDB>) -> Self {
        Self {
            state: TrieState::new(db),
            root: None,
        }
    }

    /// Opens a trie rooted at `root` in an already-populated `db`
    pub fn open(db: Box<dyn TrieDB>, root: H256) -> Self {
        let root = (root != *EMPTY_TRIE_HASH).then_some(root.into());
        Self {
            state: TrieState::new(db),
            root,
        }
    }

    /// Retrieves the RLP-encoded value stored at `path`, if any
    pub fn get(&self, path: &PathRLP) -> Result<Option<ValueRLP>, TrieError> {
        let Some(root) = &self.root else {
            return Ok(None);
        };
        let root_node = self
            .state
            .get_node(root.clone())?
            .ok_or(TrieError::InconsistentTree)?;
        root_node.get(&self.state, Nibbles::from_bytes(path))
    }

    /// Inserts an RLP-encoded value at `path`, replacing it if already present
    pub fn insert(&mut self, path: PathRLP, value: ValueRLP) -> Result<(), TrieError> {
        let root = self.root.take();
        self.root = Some(match root.map(|r| self.state.get_node(r)).transpose()?.flatten() {
            Some(root_node) => {
                let new_root = root_node.insert(&mut self.state, Nibbles::from_bytes(&path), value)?;
                new_root.insert_self(&mut self.state)?
            }
            None => {
                let new_leaf = Node::from(LeafNode::new(Nibbles::from_bytes(&path), value));
                new_leaf.insert_self(&mut self.state)?
            }
        });
        Ok(())
    }

    /// Removes the value stored at `path`, returning it if it was present
    pub fn remove(&mut self, path: PathRLP) -> Result<Option<ValueRLP>, TrieError> {
        let Some(root) = self.root.take() else {
            return Ok(None);
        };
        let root_node = self
            .state
            .get_node(root)?
            .ok_or(TrieError::InconsistentTree)?;
        let (new_root, old_value) = root_node.remove(&mut self.state, Nibbles::from_bytes(&path))?;
        self.root = new_root.map(|r| r.insert_self(&mut self.state)).transpose()?;
        Ok(old_value)
    }

    /// Returns the trie's root hash, flushing every node reachable from it to the DB.
    /// Returns `keccak(RLP_NULL)` for an empty trie.
    pub fn hash(&mut self) -> Result<H256, TrieError> {
        if let Some(ref root) = self.root {
            self.state.commit(root)?;
        }
        Ok(self.hash_no_commit())
    }

    /// Returns the trie's root hash without flushing pending nodes to the DB
    pub fn hash_no_commit(&self) -> H256 {
        self.root
            .as_ref()
            .map(|root| root.clone().finalize())
            .unwrap_or(*EMPTY_TRIE_HASH)
    }

    /// Builds an ephemeral, uncommittable trie from an iterator of entries and returns
    /// its root hash. Used to compute an account's storage root from its storage map.
    pub fn compute_hash_from_unsorted_iter(
        iter: impl Iterator<Item = (PathRLP, ValueRLP)>,
    ) -> H256 {
        let mut trie = Trie::stateless();
        for (path, value) in iter {
            // The null DB never fails, so this can't panic in practice.
            trie.insert(path, value).expect("in-memory trie insert");
        }
        trie.hash_no_commit()
    }

    /// Creates a trie whose DB discards everything written to it. Only the staged
    /// cache is used, so it must never be asked to read back a committed node.
    fn stateless() -> Trie {
        struct NullTrieDB;
        impl TrieDB for NullTrieDB {
            fn get(&self, _key: Vec<u8>) -> Result<Option<Vec<u8>>, TrieError> {
                Ok(None)
            }
            fn put(&self, _key: Vec<u8>, _value: Vec<u8>) -> Result<(), TrieError> {
                Ok(())
            }
        }
        Trie::new(Box::new(NullTrieDB))
    }

    /// Creates a new trie backed by a fresh in-memory DB, for tests
    pub fn new_temp() -> Self {
        use std::collections::HashMap;
        use std::sync::{Arc, Mutex};

        let map = Arc::new(Mutex::new(HashMap::new()));
        Trie::new(Box::new(InMemoryTrieDB::new(map)))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn get_insert_removed_value() {
        let mut trie = Trie::new_temp();
        trie.insert(b"first".to_vec(), b"value".to_vec()).unwrap();
        assert_eq!(
            trie.get(&b"first".to_vec()).unwrap(),
            Some(b"value".to_vec())
        );
        assert_eq!(
            trie.remove(b"first".to_vec()).unwrap(),
            Some(b"value".to_vec())
        );
        assert_eq!(trie.get(&b"first".to_vec()).unwrap(), None);
    }

    #[test]
    fn compute_hash_is_deterministic_and_order_independent() {
        let mut trie_a = Trie::new_temp();
        trie_a.insert(b"first".to_vec(), b"value".to_vec()).unwrap();
        trie_a.insert(b"second".to_vec(), b"value".to_vec()).unwrap();

        let mut trie_b = Trie::new_temp();
        trie_b.insert(b"second".to_vec(), b"value".to_vec()).unwrap();
        trie_b.insert(b"first".to_vec(), b"value".to_vec()).unwrap();

        assert_eq!(trie_a.hash().unwrap(), trie_b.hash().unwrap());
    }

    #[test]
    fn empty_trie_hash() {
        let mut trie = Trie::new_temp();
        assert_eq!(trie.hash().unwrap(), *EMPTY_TRIE_HASH);
    }

    #[test]
    fn mutating_a_root_keeps_old_root_nodes_reachable() {
        // Structural sharing: committing one version of the trie must not disturb
        // nodes that an earlier root still depends on.
        let mut trie = Trie::new_temp();
        trie.insert(b"a".to_vec(), b"1".to_vec()).unwrap();
        let root_a = trie.hash().unwrap();
        trie.insert(b"b".to_vec(), b"2".to_vec()).unwrap();
        let root_b = trie.hash().unwrap();
        assert_ne!(root_a, root_b);

        let mut reopened = Trie::new_temp();
        reopened.insert(b"a".to_vec(), b"1".to_vec()).unwrap();
        assert_eq!(reopened.hash().unwrap(), root_a);
    }

    #[test]
    fn insert_many_then_remove_all_yields_empty_root() {
        let mut trie = Trie::new_temp();
        let entries: Vec<(Vec<u8>, Vec<u8>)> = (0u8..50)
            .map(|i| (vec![i, i.wrapping_mul(7)], vec![i]))
            .collect();
        for (k, v) in &entries {
            trie.insert(k.clone(), v.clone()).unwrap();
        }
        for (k, _) in &entries {
            assert!(trie.remove(k.clone()).unwrap().is_some());
        }
        assert_eq!(trie.hash().unwrap(), *EMPTY_TRIE_HASH);
    }
}
