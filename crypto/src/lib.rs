//! Cryptographic primitives for Hybrid DAO governance.
//!
//! - **Ed25519** for stakeholder keys and off-chain vote signatures
//! - **Blake2b-256** for every content hash (proposal ids, vote messages, addresses)
//! - Address derivation: trailing 20 bytes of the hashed public key
//! - Vote signature slices that carry their signer's key, so a batch of
//!   concatenated slices can be verified and attributed without a key registry

pub mod address;
pub mod error;
pub mod hash;
pub mod keys;
pub mod sign;
pub mod vote;

pub use address::derive_address;
pub use error::SignatureError;
pub use hash::{blake2b_256, blake2b_256_multi, hash_description};
pub use keys::{generate_keypair, keypair_from_private, keypair_from_seed, public_from_private};
pub use sign::{sign_message, verify_signature};
pub use vote::{
    recover_signer, recover_signers, sign_vote, signed_vote_digest, split_signatures,
    VoteSignature, SIGNATURE_LEN,
};
