use ethereum_rust_rlp::{decode::RLPDecode, encode::RLPEncode};
use ethereum_types::H256;
use sha3::{Digest, Keccak256};

/// Hash of a trie node. If the node's RLP encoding is shorter than 32 bytes it is
/// stored inline instead of being hashed, per the Merkle Patricia Trie spec.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum NodeHash {
    Hashed(H256),
    Inline(Vec<u8>),
}

impl AsRef<[u8]> for NodeHash {
    fn as_ref(&self) -> &[u8] {
        match self {
            NodeHash::Inline(x) => x.as_ref(),
            NodeHash::Hashed(x) => x.as_bytes(),
        }
    }
}

impl NodeHash {
    /// Returns the `NodeHash` of an encoded node (encoded using `Node::encode_raw`)
    pub fn from_encoded_raw(encoded: Vec<u8>) -> NodeHash {
        if encoded.len() >= 32 {
            let hash = Keccak256::new_with_prefix(&encoded).finalize();
            NodeHash::Hashed(H256::from_slice(hash.as_slice()))
        } else {
            NodeHash::Inline(encoded)
        }
    }

    /// Returns the finalized hash.
    /// NOTE: this will hash smaller nodes too, only use it to get the final root hash,
    /// not for intermediate node hashes (those must stay inline when short).
    pub fn finalize(self) -> H256 {
        match self {
            NodeHash::Inline(x) => {
                H256::from_slice(Keccak256::new().chain_update(&*x).finalize().as_slice())
            }
            NodeHash::Hashed(x) => x,
        }
    }

    /// A hash is invalid (absent) only when it is the empty inline value
    pub fn is_valid(&self) -> bool {
        !matches!(self, NodeHash::Inline(v) if v.is_empty())
    }
}

impl From<Vec<u8>> for NodeHash {
    fn from(value: Vec<u8>) -> Self {
        match value.len() {
            32 => NodeHash::Hashed(H256::from_slice(&value)),
            _ => NodeHash::Inline(value),
        }
    }
}

impl From<H256> for NodeHash {
    fn from(value: H256) -> Self {
        NodeHash::Hashed(value)
    }
}

impl From<NodeHash> for Vec<u8> {
    fn from(val: NodeHash) -> Self {
        match val {
            NodeHash::Hashed(x) => x.0.to_vec(),
            NodeHash::Inline(x) => x,
        }
    }
}

impl From<&NodeHash> for Vec<u8> {
    fn from(val: &NodeHash) -> Self {
        match val {
            NodeHash::Hashed(x) => x.0.to_vec(),
            NodeHash::Inline(x) => x.clone(),
        }
    }
}

impl Default for NodeHash {
    fn default() -> Self {
        NodeHash::Inline(Vec::new())
    }
}

impl RLPEncode for NodeHash {
    fn encode(&self, buf: &mut dyn bytes::BufMut) {
        RLPEncode::encode(&Into::<Vec<u8>>::into(self), buf)
    }
}

impl RLPDecode for NodeHash {
    fn decode_unfinished(
        rlp: &[u8],
    ) -> Result<(Self, &[u8]), ethereum_rust_rlp::error::RLPDecodeError> {
        let (hash, rest): (Vec<u8>, &[u8]) = RLPDecode::decode_unfinished(rlp)?;
        Ok((NodeHash::from(hash), rest))
    }
}
