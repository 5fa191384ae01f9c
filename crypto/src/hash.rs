//! Blake2b hashing for content ids and vote messages.

use blake2::digest::consts::U32;
use blake2::{Blake2b, Digest};
use hdao_types::Hash256;

type Blake2b256 = Blake2b<U32>;

/// Compute a 256-bit Blake2b hash of arbitrary data.
pub fn blake2b_256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    hasher.update(data);
    finish(hasher)
}

/// Hash multiple byte slices in sequence (avoids concatenation allocation).
pub fn blake2b_256_multi(parts: &[&[u8]]) -> [u8; 32] {
    let mut hasher = Blake2b256::new();
    for part in parts {
        hasher.update(part);
    }
    finish(hasher)
}

fn finish(hasher: Blake2b256) -> [u8; 32] {
    let mut output = [0u8; 32];
    output.copy_from_slice(&hasher.finalize());
    output
}

/// Content hash of a free-text proposal description.
///
/// Only the hash is stored with a proposal; the text itself stays off-ledger.
pub fn hash_description(description: &str) -> Hash256 {
    Hash256::new(blake2b_256(description.as_bytes()))
}
