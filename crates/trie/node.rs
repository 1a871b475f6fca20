mod branch;
mod extension;
mod leaf;

pub use branch::BranchNode;
pub use extension::ExtensionNode;
pub use leaf::LeafNode;

use ethereum_rust_rlp::structs::Decoder;

use crate::{
    error::TrieError, nibbles::Nibbles, node_hash::NodeHash, state::TrieState, NodeRLP, PathRLP,
    ValueRLP,
};

/// A node of the Merkle Patricia Trie. Mutating operations are structure-sharing:
/// they consume `self` and return a new `Node`, leaving any untouched subtrees
/// reachable from the old root intact.
#[derive(Debug, Clone)]
pub enum Node {
    Branch(BranchNode),
    Extension(ExtensionNode),
    Leaf(LeafNode),
}

impl From<BranchNode> for Node {
    fn from(node: BranchNode) -> Self {
        Node::Branch(node)
    }
}

impl From<ExtensionNode> for Node {
    fn from(node: ExtensionNode) -> Self {
        Node::Extension(node)
    }
}

impl From<LeafNode> for Node {
    fn from(node: LeafNode) -> Self {
        Node::Leaf(node)
    }
}

impl Node {
    pub fn get(&self, state: &TrieState, path: Nibbles) -> Result<Option<ValueRLP>, TrieError> {
        match self {
            Node::Branch(n) => n.get(state, path),
            Node::Extension(n) => n.get(state, path),
            Node::Leaf(n) => n.get(path),
        }
    }

    pub fn insert(
        self,
        state: &mut TrieState,
        path: Nibbles,
        value: ValueRLP,
    ) -> Result<Node, TrieError> {
        match self {
            Node::Branch(n) => n.insert(state, path, value),
            Node::Extension(n) => n.insert(state, path, value),
            Node::Leaf(n) => n.insert(state, path, value),
        }
    }

    pub fn remove(
        self,
        state: &mut TrieState,
        path: Nibbles,
    ) -> Result<(Option<Node>, Option<ValueRLP>), TrieError> {
        match self {
            Node::Branch(n) => n.remove(state, path),
            Node::Extension(n) => n.remove(state, path),
            Node::Leaf(n) => n.remove(path),
        }
    }

    /// RLP-encodes the node using its canonical, untagged trie representation:
    /// a 17-item list for branch nodes, a 2-item list for leaf/extension nodes.
    pub fn encode_raw(&self) -> NodeRLP {
        match self {
            Node::Branch(n) => n.encode_raw(),
            Node::Extension(n) => n.encode_raw(),
            Node::Leaf(n) => n.encode_raw(),
        }
    }

    /// Inverse of `encode_raw`. Tries the 17-item branch shape first, then falls
    /// back to the 2-item leaf/extension shape, disambiguated by the compact
    /// path's leaf flag.
    pub fn decode_raw(rlp: &[u8]) -> Result<Node, TrieError> {
        if let Ok(branch) = BranchNode::decode_raw(rlp) {
            return Ok(branch.into());
        }
        let decoder = Decoder::new(rlp)?;
        let (path_bytes, decoder): (PathRLP, _) = decoder.decode_field("path")?;
        let path = Nibbles::decode_compact(&path_bytes);
        if path.is_leaf() {
            let (value, decoder) = decoder.decode_field("value")?;
            decoder.finish()?;
            Ok(LeafNode::new(path, value).into())
        } else {
            let (child, decoder): (NodeHash, _) = decoder.decode_field("child")?;
            decoder.finish()?;
            Ok(ExtensionNode::new(path, child).into())
        }
    }

    /// Computes the node's hash (inline if the encoding is shorter than 32 bytes)
    pub fn compute_hash(&self) -> NodeHash {
        NodeHash::from_encoded_raw(self.encode_raw())
    }

    /// Stages the node (and recursively, any children it directly encodes) under its
    /// hash in `state`, to be flushed to the DB on the next `commit`, and returns that hash.
    pub fn insert_self(self, state: &mut TrieState) -> Result<NodeHash, TrieError> {
        let hash = self.compute_hash();
        state.insert_node(self, hash.clone());
        Ok(hash)
    }

    /// Appends the RLP encoding of every node (32 bytes or larger) traversed while
    /// looking up `path` to `node_path`, building a Merkle proof of (non-)membership.
    pub fn get_path(
        &self,
        state: &TrieState,
        mut path: Nibbles,
        node_path: &mut Vec<NodeRLP>,
    ) -> Result<(), TrieError> {
        let encoded = self.encode_raw();
        if encoded.len() >= 32 {
            node_path.push(encoded);
        }
        match self {
            Node::Branch(n) => {
                if let Some(idx) = path.next_choice() {
                    let child = &n.choices[idx];
                    if child.is_valid() {
                        if let Some(child_node) = state.get_node(child.clone())? {
                            child_node.get_path(state, path, node_path)?;
                        }
                    }
                }
                Ok(())
            }
            Node::Extension(n) => {
                if path.skip_prefix(&n.prefix) && n.child.is_valid() {
                    if let Some(child_node) = state.get_node(n.child.clone())? {
                        child_node.get_path(state, path, node_path)?;
                    }
                }
                Ok(())
            }
            Node::Leaf(_) => Ok(()),
        }
    }
}
