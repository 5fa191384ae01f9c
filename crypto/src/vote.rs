//! Off-chain vote signatures.
//!
//! Ed25519 has no public-key recovery, so every vote signature slice carries
//! its signer's key: `public_key (32) || signature (64)`. Recovering the signer
//! of a slice means verifying the signature against the embedded key and then
//! deriving the address from that key. Whether the address holds any voting
//! weight is decided by the caller; this module only authenticates.
//!
//! What gets signed is not the raw vote message hash but a domain-separated
//! digest of it, so a vote signature can never double as a signature over
//! some other 32-byte value.

use crate::error::SignatureError;
use crate::{blake2b_256_multi, derive_address, public_from_private, sign_message, verify_signature};
use hdao_types::{Address, Hash256, PrivateKey, PublicKey, Signature};

/// Size in bytes of one vote signature slice.
pub const SIGNATURE_LEN: usize = 96;

const SIGNED_VOTE_PREFIX: &[u8] = b"hdao signed vote:";

/// A single vote signature slice.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoteSignature {
    pub public_key: PublicKey,
    pub signature: Signature,
}

impl VoteSignature {
    pub fn from_bytes(bytes: &[u8; SIGNATURE_LEN]) -> Self {
        let mut public_key = [0u8; 32];
        let mut signature = [0u8; 64];
        public_key.copy_from_slice(&bytes[..32]);
        signature.copy_from_slice(&bytes[32..]);
        Self {
            public_key: PublicKey(public_key),
            signature: Signature(signature),
        }
    }

    pub fn to_bytes(&self) -> [u8; SIGNATURE_LEN] {
        let mut out = [0u8; SIGNATURE_LEN];
        out[..32].copy_from_slice(self.public_key.as_bytes());
        out[32..].copy_from_slice(self.signature.as_bytes());
        out
    }
}

/// The digest a voter actually signs for a given vote message hash.
pub fn signed_vote_digest(message_hash: &Hash256) -> [u8; 32] {
    blake2b_256_multi(&[SIGNED_VOTE_PREFIX, message_hash.as_bytes()])
}

/// Produce a vote signature slice over `message_hash`.
pub fn sign_vote(message_hash: &Hash256, private_key: &PrivateKey) -> VoteSignature {
    let digest = signed_vote_digest(message_hash);
    VoteSignature {
        public_key: public_from_private(private_key),
        signature: sign_message(&digest, private_key),
    }
}

/// Authenticate one slice and return its signer's address.
///
/// `index` is only used to label the error.
pub fn recover_signer(
    message_hash: &Hash256,
    slice: &VoteSignature,
    index: usize,
) -> Result<Address, SignatureError> {
    let digest = signed_vote_digest(message_hash);
    if verify_signature(&digest, &slice.signature, &slice.public_key) {
        Ok(derive_address(&slice.public_key))
    } else {
        Err(SignatureError::SignatureRecoveryFailed { index })
    }
}

/// Split a concatenated blob into slices, in submission order.
pub fn split_signatures(blob: &[u8]) -> Result<Vec<VoteSignature>, SignatureError> {
    if blob.is_empty() || blob.len() % SIGNATURE_LEN != 0 {
        return Err(SignatureError::InvalidSignatureLength {
            len: blob.len(),
            expected: SIGNATURE_LEN,
        });
    }
    Ok(blob
        .chunks_exact(SIGNATURE_LEN)
        .map(|chunk| {
            let mut bytes = [0u8; SIGNATURE_LEN];
            bytes.copy_from_slice(chunk);
            VoteSignature::from_bytes(&bytes)
        })
        .collect())
}

/// Recover every signer in a concatenated blob, in submission order.
///
/// Fails on the first slice that does not verify; nothing is returned for the
/// slices before it.
pub fn recover_signers(message_hash: &Hash256, blob: &[u8]) -> Result<Vec<Address>, SignatureError> {
    split_signatures(blob)?
        .iter()
        .enumerate()
        .map(|(index, slice)| recover_signer(message_hash, slice, index))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::keypair_from_seed;

    fn message() -> Hash256 {
        Hash256::new([0x42; 32])
    }

    #[test]
    fn sign_then_recover() {
        let kp = keypair_from_seed(&[1u8; 32]);
        let slice = sign_vote(&message(), &kp.private);
        let signer = recover_signer(&message(), &slice, 0).unwrap();
        assert_eq!(signer, derive_address(&kp.public));
    }

    #[test]
    fn recover_fails_for_other_message() {
        let kp = keypair_from_seed(&[1u8; 32]);
        let slice = sign_vote(&message(), &kp.private);
        let err = recover_signer(&Hash256::new([0x43; 32]), &slice, 3).unwrap_err();
        assert_eq!(err, SignatureError::SignatureRecoveryFailed { index: 3 });
    }

    #[test]
    fn swapped_key_is_rejected() {
        let a = keypair_from_seed(&[1u8; 32]);
        let b = keypair_from_seed(&[2u8; 32]);
        let mut slice = sign_vote(&message(), &a.private);
        slice.public_key = b.public.clone();
        assert!(recover_signer(&message(), &slice, 0).is_err());
    }

    #[test]
    fn raw_hash_signature_is_not_a_vote() {
        let kp = keypair_from_seed(&[1u8; 32]);
        let slice = VoteSignature {
            public_key: kp.public.clone(),
            signature: sign_message(message().as_bytes(), &kp.private),
        };
        assert!(recover_signer(&message(), &slice, 0).is_err());
    }

    #[test]
    fn batch_preserves_order() {
        let a = keypair_from_seed(&[1u8; 32]);
        let b = keypair_from_seed(&[2u8; 32]);
        let mut blob = sign_vote(&message(), &a.private).to_bytes().to_vec();
        blob.extend_from_slice(&sign_vote(&message(), &b.private).to_bytes());
        let signers = recover_signers(&message(), &blob).unwrap();
        assert_eq!(
            signers,
            vec![derive_address(&a.public), derive_address(&b.public)]
        );
    }

    #[test]
    fn batch_length_must_be_exact_multiple() {
        let kp = keypair_from_seed(&[1u8; 32]);
        let mut blob = sign_vote(&message(), &kp.private).to_bytes().to_vec();
        blob.push(0);
        assert_eq!(
            recover_signers(&message(), &blob).unwrap_err(),
            SignatureError::InvalidSignatureLength {
                len: 97,
                expected: SIGNATURE_LEN
            }
        );
        assert!(matches!(
            split_signatures(&[]),
            Err(SignatureError::InvalidSignatureLength { len: 0, .. })
        ));
    }

    #[test]
    fn batch_reports_offending_index() {
        let a = keypair_from_seed(&[1u8; 32]);
        let mut blob = sign_vote(&message(), &a.private).to_bytes().to_vec();
        let mut bad = sign_vote(&message(), &a.private).to_bytes();
        bad[40] ^= 0xFF;
        blob.extend_from_slice(&bad);
        assert_eq!(
            recover_signers(&message(), &blob).unwrap_err(),
            SignatureError::SignatureRecoveryFailed { index: 1 }
        );
    }
}
