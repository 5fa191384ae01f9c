//! Stakeholder address derivation from public keys.

use hdao_types::{Address, PublicKey};

/// Derive a stakeholder address: the trailing 20 bytes of Blake2b-256(public_key).
pub fn derive_address(public_key: &PublicKey) -> Address {
    Address::from_digest(&crate::blake2b_256(public_key.as_bytes()))
}
