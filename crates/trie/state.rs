use std::collections::HashMap;

use crate::{db::TrieDB, error::TrieError, node::Node, node_hash::NodeHash};

/// Holds a trie's nodes. Newly inserted nodes sit in an in-memory cache until
/// `commit` walks the tree from a root and flushes everything reachable into the
/// backing `TrieDB`; this is what gives tries their structural sharing between roots,
/// since nodes from earlier versions are never rewritten, only left unreferenced.
pub struct TrieState {
    db: Box<dyn TrieDB>,
    cache: HashMap<NodeHash, Node>,
}

impl TrieState {
    pub fn new(db: Box<dyn TrieDB>) -> Self {
        Self {
            db,
            cache: HashMap::new(),
        }
    }

    /// Retrieves a node based on its hash
    pub fn get_node(&self, hash: NodeHash) -> Result<Option<Node>, TrieError> {
        if let Some(node) = self.cache.get(&hash) {
            return Ok(Some(node.clone()));
        }
        self.db
            .get(hash.into())?
            .map(|rlp| Node::decode_raw(&rlp))
            .transpose()
    }

    /// Stages a node under its hash, to be flushed on the next `commit`
    pub fn insert_node(&mut self, node: Node, hash: NodeHash) {
        self.cache.insert(hash, node);
    }

    /// Commits every node reachable from `root` to the DB and clears the cache
    pub fn commit(&mut self, root: &NodeHash) -> Result<(), TrieError> {
        self.commit_node(root)?;
        self.cache.clear();
        Ok(())
    }

    fn commit_node(&mut self, node_hash: &NodeHash) -> Result<(), TrieError> {
        let Some(node) = self.cache.remove(node_hash) else {
            // Already committed in a previous version of the trie, or inline.
            return Ok(());
        };
        match &node {
            Node::Branch(n) => {
                for child in n.choices.iter() {
                    if child.is_valid() {
                        self.commit_node(child)?;
                    }
                }
            }
            Node::Extension(n) => self.commit_node(&n.child)?,
            Node::Leaf(_) => {}
        }
        self.db.put(node_hash.into(), node.encode_raw())
    }
}
