//! Fundamental types for Hybrid DAO governance.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! identities, hashes and proposal ids, token-unit amounts, chain ids, keys and timestamps.

pub mod address;
pub mod amount;
pub mod error;
pub mod hash;
pub mod keys;
pub mod network;
pub mod time;

pub use address::Address;
pub use amount::{Amount, UNIT};
pub use error::TypesError;
pub use hash::{Hash256, ProposalId};
pub use keys::{KeyPair, PrivateKey, PublicKey, Signature};
pub use network::ChainId;
pub use time::Timestamp;
