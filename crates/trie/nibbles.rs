use ethereum_rust_rlp::{
    decode::RLPDecode,
    encode::RLPEncode,
    error::RLPDecodeError,
    structs::{Decoder, Encoder},
};

/// A sequence of nibbles (half-bytes), the unit trie paths are split into.
/// A trailing `16` marks a leaf path (the hex-prefix terminator).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Nibbles {
    data: Vec<u8>,
}

impl Nibbles {
    pub fn from_hex(hex: Vec<u8>) -> Self {
        Self { data: hex }
    }

    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self::from_raw(bytes, true)
    }

    pub fn from_raw(bytes: &[u8], is_leaf: bool) -> Self {
        let mut data: Vec<u8> = bytes
            .iter()
            .flat_map(|byte| [(byte >> 4 & 0x0F), byte & 0x0F])
            .collect();
        if is_leaf {
            data.push(16);
        }
        Self { data }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// If `prefix` is a prefix of self, drop it and return true; otherwise leave self untouched.
    pub fn skip_prefix(&mut self, prefix: &Nibbles) -> bool {
        if self.len() >= prefix.len() && &self.data[..prefix.len()] == prefix.as_ref() {
            self.data = self.data[prefix.len()..].to_vec();
            true
        } else {
            false
        }
    }

    /// Shared nibble count between self and other, counted from the start.
    pub fn count_prefix(&self, other: &Nibbles) -> usize {
        self.as_ref()
            .iter()
            .zip(other.as_ref().iter())
            .take_while(|(a, b)| a == b)
            .count()
    }

    /// Removes and returns the first nibble
    pub fn next(&mut self) -> Option<u8> {
        (!self.is_empty()).then_some(self.data.remove(0))
    }

    /// Removes and returns the first nibble if it is a valid branch choice index (< 16)
    pub fn next_choice(&mut self) -> Option<usize> {
        self.next().filter(|choice| *choice < 16).map(usize::from)
    }

    pub fn offset(&self, offset: usize) -> Nibbles {
        self.slice(offset, self.len())
    }

    pub fn slice(&self, start: usize, end: usize) -> Nibbles {
        Nibbles::from_hex(self.data[start..end].to_vec())
    }

    pub fn extend(&mut self, other: &Nibbles) {
        self.data.extend_from_slice(other.as_ref());
    }

    pub fn at(&self, i: usize) -> usize {
        self.data[i] as usize
    }

    pub fn prepend(&mut self, nibble: u8) {
        self.data.insert(0, nibble);
    }

    pub fn append(&mut self, nibble: u8) {
        self.data.push(nibble);
    }

    pub fn is_leaf(&self) -> bool {
        !self.data.is_empty() && self.data[self.data.len() - 1] == 16
    }

    /// Hex-prefix compact encoding (https://ethereum.org/en/developers/docs/data-structures-and-encoding/patricia-merkle-trie/#specification-compact-encoding)
    pub fn encode_compact(&self) -> Vec<u8> {
        let mut compact = vec![];
        let is_leaf = self.is_leaf();
        let mut hex = if is_leaf {
            &self.data[0..self.data.len() - 1]
        } else {
            &self.data[0..]
        };
        let v = if hex.len() % 2 == 1 {
            let v = 0x10 + hex[0];
            hex = &hex[1..];
            v
        } else {
            0x00
        };
        compact.push(v + if is_leaf { 0x20 } else { 0x00 });
        for i in 0..(hex.len() / 2) {
            compact.push((hex[i * 2] * 16) + (hex[i * 2 + 1]));
        }
        compact
    }

    /// Inverse of `encode_compact`
    pub fn decode_compact(compact: &[u8]) -> Nibbles {
        if compact.is_empty() {
            return Nibbles::from_hex(vec![]);
        }
        let is_leaf = compact[0] & 0x20 != 0;
        let is_odd = compact[0] & 0x10 != 0;
        let mut data = vec![];
        if is_odd {
            data.push(compact[0] & 0x0F);
        }
        for byte in &compact[1..] {
            data.push(byte >> 4);
            data.push(byte & 0x0F);
        }
        if is_leaf {
            data.push(16);
        }
        Nibbles::from_hex(data)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let data = if self.is_leaf() {
            &self.data[..self.len() - 1]
        } else {
            &self.data[..]
        };
        data.chunks(2)
            .map(|chunk| match chunk.len() {
                1 => chunk[0] << 4,
                _ => chunk[0] << 4 | chunk[1],
            })
            .collect::<Vec<_>>()
    }
}

impl AsRef<[u8]> for Nibbles {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl RLPEncode for Nibbles {
    fn encode(&self, buf: &mut dyn bytes::BufMut) {
        Encoder::new(buf).encode_field(&self.data).finish();
    }
}

impl RLPDecode for Nibbles {
    fn decode_unfinished(rlp: &[u8]) -> Result<(Self, &[u8]), RLPDecodeError> {
        let decoder = Decoder::new(rlp)?;
        let (data, decoder) = decoder.decode_field("data")?;
        Ok((Self { data }, decoder.finish()?))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn skip_prefix_true() {
        let mut a = Nibbles::from_hex(vec![1, 2, 3, 4, 5]);
        let b = Nibbles::from_hex(vec![1, 2, 3]);
        assert!(a.skip_prefix(&b));
        assert_eq!(a.as_ref(), &[4, 5])
    }

    #[test]
    fn skip_prefix_false() {
        let mut a = Nibbles::from_hex(vec![1, 2, 3, 4, 5]);
        let b = Nibbles::from_hex(vec![1, 2, 4]);
        assert!(!a.skip_prefix(&b));
        assert_eq!(a.as_ref(), &[1, 2, 3, 4, 5])
    }

    #[test]
    fn count_prefix_partial() {
        let a = Nibbles::from_hex(vec![1, 2, 3, 4, 5]);
        let b = Nibbles::from_hex(vec![1, 2, 3]);
        assert_eq!(a.count_prefix(&b), b.len());
    }

    #[test]
    fn compact_roundtrip_even_leaf() {
        let n = Nibbles::from_bytes(&[0x12, 0x34]);
        assert_eq!(Nibbles::decode_compact(&n.encode_compact()), n);
    }

    #[test]
    fn compact_roundtrip_odd_extension() {
        let n = Nibbles::from_raw(&[0x12, 0x34], false).slice(1, 4);
        assert_eq!(Nibbles::decode_compact(&n.encode_compact()), n);
    }
}
