//! Chain identifier bound into every off-chain vote.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies the ledger a DAO instance lives on.
///
/// Off-chain votes commit to the chain id so a signature collected for one
/// chain cannot be replayed on another.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChainId(u64);

impl ChainId {
    /// Chain id used by local development ledgers.
    pub const DEV: Self = Self(31337);

    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    pub fn to_be_bytes(&self) -> [u8; 8] {
        self.0.to_be_bytes()
    }
}

impl Default for ChainId {
    fn default() -> Self {
        Self::DEV
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
