use ethereum_rust_rlp::structs::{Decoder, Encoder};

use crate::{
    error::TrieError,
    nibbles::Nibbles,
    node::{ExtensionNode, LeafNode, Node},
    node_hash::NodeHash,
    state::TrieState,
    NodeRLP, ValueRLP,
};

/// Branch node of a Merkle Patricia Trie: 16 children, one per nibble value, plus an
/// optional value stored at this node (for a path that ends exactly here).
#[derive(Debug, Clone)]
pub struct BranchNode {
    pub choices: [NodeHash; 16],
    pub value: ValueRLP,
}

impl BranchNode {
    pub fn empty_choices() -> [NodeHash; 16] {
        std::array::from_fn(|_| NodeHash::default())
    }

    pub fn new(choices: [NodeHash; 16]) -> Self {
        Self {
            choices,
            value: Vec::new(),
        }
    }

    pub fn new_with_value(choices: [NodeHash; 16], value: ValueRLP) -> Self {
        Self { choices, value }
    }

    pub fn get(&self, state: &TrieState, mut path: Nibbles) -> Result<Option<ValueRLP>, TrieError> {
        match path.next_choice() {
            Some(idx) => {
                let child = &self.choices[idx];
                if !child.is_valid() {
                    return Ok(None);
                }
                let child_node = state
                    .get_node(child.clone())?
                    .ok_or(TrieError::InconsistentTree)?;
                child_node.get(state, path)
            }
            None => Ok((!self.value.is_empty()).then(|| self.value.clone())),
        }
    }

    pub fn insert(
        mut self,
        state: &mut TrieState,
        mut path: Nibbles,
        value: ValueRLP,
    ) -> Result<Node, TrieError> {
        match path.next_choice() {
            Some(idx) => {
                let child_hash = &self.choices[idx];
                let new_child = if child_hash.is_valid() {
                    let child_node = state
                        .get_node(child_hash.clone())?
                        .ok_or(TrieError::InconsistentTree)?;
                    child_node.insert(state, path, value)?
                } else {
                    LeafNode::new(path, value).into()
                };
                self.choices[idx] = new_child.insert_self(state)?;
                Ok(self.into())
            }
            None => {
                self.value = value;
                Ok(self.into())
            }
        }
    }

    /// Removes the value stored at `path`. If, after removal, the branch has at most
    /// one live child and no value of its own, it is flattened away: zero live
    /// children collapses to nothing, one live child is absorbed into an extension
    /// (or directly merged, if the child is itself a leaf or extension).
    pub fn remove(
        mut self,
        state: &mut TrieState,
        mut path: Nibbles,
    ) -> Result<(Option<Node>, Option<ValueRLP>), TrieError> {
        let removed_value = match path.next_choice() {
            Some(idx) => {
                let child_hash = self.choices[idx].clone();
                if !child_hash.is_valid() {
                    return Ok((Some(self.into()), None));
                }
                let child_node = state
                    .get_node(child_hash)?
                    .ok_or(TrieError::InconsistentTree)?;
                let (new_child, old_value) = child_node.remove(state, path)?;
                self.choices[idx] = match new_child {
                    Some(node) => node.insert_self(state)?,
                    None => NodeHash::default(),
                };
                old_value
            }
            None => {
                let old_value = (!self.value.is_empty()).then(|| self.value.clone());
                self.value = Vec::new();
                old_value
            }
        };

        let live: Vec<usize> = self
            .choices
            .iter()
            .enumerate()
            .filter(|(_, c)| c.is_valid())
            .map(|(i, _)| i)
            .collect();

        let node = if live.is_empty() && self.value.is_empty() {
            None
        } else if live.len() == 1 && self.value.is_empty() {
            let idx = live[0];
            let child_hash = self.choices[idx].clone();
            let child_node = state
                .get_node(child_hash.clone())?
                .ok_or(TrieError::InconsistentTree)?;
            let collapsed = match child_node {
                Node::Leaf(mut leaf) => {
                    leaf.partial.prepend(idx as u8);
                    leaf.into()
                }
                Node::Extension(mut ext) => {
                    ext.prefix.prepend(idx as u8);
                    ext.into()
                }
                Node::Branch(_) => {
                    ExtensionNode::new(Nibbles::from_hex(vec![idx as u8]), child_hash).into()
                }
            };
            Some(collapsed)
        } else {
            Some(self.into())
        };

        Ok((node, removed_value))
    }

    pub fn compute_hash(&self) -> NodeHash {
        NodeHash::from_encoded_raw(self.encode_raw())
    }

    pub fn encode_raw(&self) -> NodeRLP {
        let mut buf = vec![];
        let mut encoder = Encoder::new(&mut buf);
        for choice in self.choices.iter() {
            encoder = encoder.encode_field(choice);
        }
        encoder.encode_field(&self.value).finish();
        buf
    }

    /// Attempts to decode a 17-item list: 16 children followed by a value. Fails
    /// (without side effects) if the list doesn't have exactly that shape, so the
    /// caller can fall back to the leaf/extension 2-item shape.
    pub fn decode_raw(rlp: &[u8]) -> Result<Self, TrieError> {
        let mut decoder = Decoder::new(rlp)?;
        let mut choices = Self::empty_choices();
        for choice in choices.iter_mut() {
            let (child, next) = decoder.decode_field("choice")?;
            *choice = child;
            decoder = next;
        }
        let (value, decoder) = decoder.decode_field("value")?;
        decoder.finish()?;
        Ok(Self { choices, value })
    }

    pub fn insert_self(self, state: &mut TrieState) -> Result<NodeHash, TrieError> {
        let hash = self.compute_hash();
        state.insert_node(self.into(), hash.clone());
        Ok(hash)
    }
}
