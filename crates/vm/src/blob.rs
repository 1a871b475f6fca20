//! EIP-4844 blob sidecar checks that don't need the KZG trusted setup: shape
//! agreement between hashes/blobs/commitments/proofs, and the versioned-hash binding
//! `hash == 0x01 ++ SHA256(commitment)[1..]`. The KZG batch proof itself is delegated
//! to an injected `KzgVerifier`.
use ethereum_rust_core::{BlobsBundle, Commitment};
use ethereum_types::H256;
use sha2::{Digest, Sha256};

use crate::errors::TransactionValidationError;

const BLOB_COMMITMENT_VERSION_KZG: u8 = 0x01;

pub fn commitment_to_versioned_hash(commitment: &Commitment) -> H256 {
    let mut hasher = Sha256::new();
    hasher.update(commitment);
    let mut hash: [u8; 32] = hasher.finalize().into();
    hash[0] = BLOB_COMMITMENT_VERSION_KZG;
    H256(hash)
}

/// Checks sidecar shape (equal counts) and that every versioned hash is bound to its
/// commitment, per EIP-4844. Does not perform the KZG batch proof itself.
pub fn check_sidecar_binding(
    versioned_hashes: &[H256],
    sidecar: &BlobsBundle,
) -> Result<(), TransactionValidationError> {
    if versioned_hashes.is_empty() {
        return Err(TransactionValidationError::InvalidBlobs);
    }
    if sidecar.blobs.len() != versioned_hashes.len()
        || sidecar.commitments.len() != versioned_hashes.len()
        || sidecar.proofs.len() != versioned_hashes.len()
    {
        return Err(TransactionValidationError::InvalidBlobs);
    }
    for (hash, commitment) in versioned_hashes.iter().zip(sidecar.commitments.iter()) {
        if *hash != commitment_to_versioned_hash(commitment) {
            return Err(TransactionValidationError::InvalidBlobs);
        }
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn versioned_hash_carries_the_kzg_version_byte() {
        let commitment = [7u8; 48];
        let hash = commitment_to_versioned_hash(&commitment);
        assert_eq!(hash.0[0], BLOB_COMMITMENT_VERSION_KZG);
    }

    #[test]
    fn binding_rejects_flipped_commitment_byte() {
        let commitment = [3u8; 48];
        let good_hash = commitment_to_versioned_hash(&commitment);
        let mut flipped = commitment;
        flipped[10] ^= 0xff;

        let sidecar = BlobsBundle {
            blobs: vec![[0u8; ethereum_rust_core::BYTES_PER_BLOB]],
            commitments: vec![flipped],
            proofs: vec![[0u8; 48]],
        };
        assert_eq!(
            check_sidecar_binding(&[good_hash], &sidecar),
            Err(TransactionValidationError::InvalidBlobs)
        );
    }

    #[test]
    fn binding_rejects_mismatched_sidecar_lengths() {
        let commitment = [3u8; 48];
        let hash = commitment_to_versioned_hash(&commitment);
        let sidecar = BlobsBundle {
            blobs: vec![],
            commitments: vec![commitment],
            proofs: vec![[0u8; 48]],
        };
        assert_eq!(
            check_sidecar_binding(&[hash], &sidecar),
            Err(TransactionValidationError::InvalidBlobs)
        );
    }
}
