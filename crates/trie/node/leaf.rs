use ethereum_rust_rlp::structs::Encoder;

use crate::{
    error::TrieError,
    nibbles::Nibbles,
    node::{BranchNode, ExtensionNode, Node},
    node_hash::NodeHash,
    state::TrieState,
    NodeRLP, ValueRLP,
};

/// Leaf node of a Merkle Patricia Trie: a terminal (path, value) pair.
#[derive(Debug, Clone, Default)]
pub struct LeafNode {
    pub partial: Nibbles,
    pub value: ValueRLP,
}

impl LeafNode {
    pub fn new(partial: Nibbles, value: ValueRLP) -> Self {
        Self { partial, value }
    }

    pub fn get(&self, path: Nibbles) -> Result<Option<ValueRLP>, TrieError> {
        Ok((self.partial == path).then(|| self.value.clone()))
    }

    /// Stores the value under `path`, returning the new root of the subtrie previously
    /// rooted at this leaf.
    pub fn insert(
        mut self,
        state: &mut TrieState,
        path: Nibbles,
        value: ValueRLP,
    ) -> Result<Node, TrieError> {
        if self.partial == path {
            self.value = value;
            return Ok(self.into());
        }

        let match_index = path.count_prefix(&self.partial);
        let self_choice_idx = self.partial.at(match_index);
        let new_choice_idx = path.at(match_index);
        self.partial = self.partial.offset(match_index + 1);

        let branch_node = if self_choice_idx == 16 {
            // self's path ends here: it becomes the branch's terminal value
            let new_leaf = LeafNode::new(path.offset(match_index + 1), value);
            let mut choices = BranchNode::empty_choices();
            choices[new_choice_idx] = new_leaf.insert_self(state)?;
            BranchNode::new_with_value(choices, self.value)
        } else if new_choice_idx == 16 {
            // the new path ends here: it becomes the branch's terminal value
            let mut choices = BranchNode::empty_choices();
            choices[self_choice_idx] = self.clone().insert_self(state)?;
            BranchNode::new_with_value(choices, value)
        } else {
            let new_leaf = LeafNode::new(path.offset(match_index + 1), value);
            let mut choices = BranchNode::empty_choices();
            choices[new_choice_idx] = new_leaf.insert_self(state)?;
            choices[self_choice_idx] = self.clone().insert_self(state)?;
            BranchNode::new(choices)
        };

        Ok(if match_index == 0 {
            branch_node.into()
        } else {
            ExtensionNode::new(path.slice(0, match_index), branch_node.insert_self(state)?).into()
        })
    }

    pub fn remove(self, path: Nibbles) -> Result<(Option<Node>, Option<ValueRLP>), TrieError> {
        Ok(if self.partial == path {
            (None, Some(self.value))
        } else {
            (Some(self.into()), None)
        })
    }

    pub fn compute_hash(&self) -> NodeHash {
        NodeHash::from_encoded_raw(self.encode_raw())
    }

    pub fn encode_raw(&self) -> NodeRLP {
        let mut buf = vec![];
        Encoder::new(&mut buf)
            .encode_field(&self.partial.encode_compact())
            .encode_field(&self.value)
            .finish();
        buf
    }

    pub fn insert_self(self, state: &mut TrieState) -> Result<NodeHash, TrieError> {
        let hash = self.compute_hash();
        state.insert_node(self.into(), hash.clone());
        Ok(hash)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn get_some() {
        let node = LeafNode::new(Nibbles::from_bytes(&[0x12]), vec![0x12, 0x34, 0x56, 0x78]);
        assert_eq!(
            node.get(Nibbles::from_bytes(&[0x12])).unwrap(),
            Some(vec![0x12, 0x34, 0x56, 0x78]),
        );
    }

    #[test]
    fn get_none() {
        let node = LeafNode::new(Nibbles::from_bytes(&[0x12]), vec![0x12, 0x34, 0x56, 0x78]);
        assert!(node.get(Nibbles::from_bytes(&[0x34])).unwrap().is_none());
    }

    #[test]
    fn remove_self() {
        let node = LeafNode::new(
            Nibbles::from_bytes(&[0x12, 0x34]),
            vec![0x12, 0x34, 0x56, 0x78],
        );
        let (node, value) = node.remove(Nibbles::from_bytes(&[0x12, 0x34])).unwrap();
        assert!(node.is_none());
        assert_eq!(value, Some(vec![0x12, 0x34, 0x56, 0x78]));
    }

    #[test]
    fn remove_none() {
        let node = LeafNode::new(
            Nibbles::from_bytes(&[0x12, 0x34]),
            vec![0x12, 0x34, 0x56, 0x78],
        );
        let (node, value) = node.remove(Nibbles::from_bytes(&[0x12])).unwrap();
        assert!(node.is_some());
        assert_eq!(value, None);
    }
}
