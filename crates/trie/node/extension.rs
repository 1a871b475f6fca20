use ethereum_rust_rlp::structs::Encoder;

use crate::{
    error::TrieError,
    nibbles::Nibbles,
    node::{BranchNode, Node},
    node_hash::NodeHash,
    state::TrieState,
    NodeRLP, ValueRLP,
};

/// Extension node of a Merkle Patricia Trie: a shared path prefix with a single child,
/// used to collapse runs of single-child branches.
#[derive(Debug, Clone)]
pub struct ExtensionNode {
    pub prefix: Nibbles,
    pub child: NodeHash,
}

impl ExtensionNode {
    pub fn new(prefix: Nibbles, child: NodeHash) -> Self {
        Self { prefix, child }
    }

    fn get_child(&self, state: &TrieState) -> Result<Node, TrieError> {
        state
            .get_node(self.child.clone())?
            .ok_or(TrieError::InconsistentTree)
    }

    pub fn get(&self, state: &TrieState, mut path: Nibbles) -> Result<Option<ValueRLP>, TrieError> {
        if path.skip_prefix(&self.prefix) {
            self.get_child(state)?.get(state, path)
        } else {
            Ok(None)
        }
    }

    pub fn insert(
        mut self,
        state: &mut TrieState,
        path: Nibbles,
        value: ValueRLP,
    ) -> Result<Node, TrieError> {
        let match_index = path.count_prefix(&self.prefix);

        if match_index == self.prefix.len() {
            // path runs through the whole prefix: recurse into the child
            let child_node = self.get_child(state)?;
            let new_child = child_node.insert(state, path.offset(match_index), value)?;
            self.child = new_child.insert_self(state)?;
            return Ok(self.into());
        }

        // The prefix must be split at `match_index`. What follows it on this node's
        // side becomes either the original child directly (if nothing is left of the
        // prefix) or a shorter extension wrapping it.
        let rest_of_prefix = self.prefix.offset(match_index + 1);
        let branch_child = if rest_of_prefix.is_empty() {
            self.child
        } else {
            ExtensionNode::new(rest_of_prefix, self.child).insert_self(state)?
        };

        let branch_choice_idx = self.prefix.at(match_index);
        let mut choices = BranchNode::empty_choices();
        choices[branch_choice_idx] = branch_child;

        let new_choice_idx = path.at(match_index);
        let branch = if new_choice_idx == 16 {
            BranchNode::new_with_value(choices, value)
        } else {
            let new_leaf =
                crate::node::LeafNode::new(path.offset(match_index + 1), value);
            choices[new_choice_idx] = new_leaf.insert_self(state)?;
            BranchNode::new(choices)
        };

        Ok(if match_index == 0 {
            branch.into()
        } else {
            ExtensionNode::new(path.slice(0, match_index), branch.insert_self(state)?).into()
        })
    }

    pub fn remove(
        mut self,
        state: &mut TrieState,
        mut path: Nibbles,
    ) -> Result<(Option<Node>, Option<ValueRLP>), TrieError> {
        if !path.skip_prefix(&self.prefix) {
            return Ok((Some(self.into()), None));
        }
        let child_node = self.get_child(state)?;
        let (new_child, old_value) = child_node.remove(state, path)?;
        let Some(new_child) = new_child else {
            return Ok((None, old_value));
        };

        // Flatten: an extension whose child is itself an extension or a leaf absorbs it,
        // keeping the trie's invariant that extensions only ever precede branches.
        let node = match new_child {
            Node::Extension(mut child) => {
                self.prefix.extend(&child.prefix);
                child.prefix = self.prefix;
                child.into()
            }
            Node::Leaf(mut child) => {
                self.prefix.extend(&child.partial);
                child.partial = self.prefix;
                child.into()
            }
            branch @ Node::Branch(_) => {
                self.child = branch.insert_self(state)?;
                self.into()
            }
        };
        Ok((Some(node), old_value))
    }

    pub fn compute_hash(&self) -> NodeHash {
        NodeHash::from_encoded_raw(self.encode_raw())
    }

    pub fn encode_raw(&self) -> NodeRLP {
        let mut buf = vec![];
        Encoder::new(&mut buf)
            .encode_field(&self.prefix.encode_compact())
            .encode_field(&self.child)
            .finish();
        buf
    }

    pub fn insert_self(self, state: &mut TrieState) -> Result<NodeHash, TrieError> {
        let hash = self.compute_hash();
        state.insert_node(self.into(), hash.clone());
        Ok(hash)
    }
}
