//! Parsing errors for the textual forms of core types.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypesError {
    #[error("missing 0x prefix in {0:?}")]
    MissingPrefix(String),

    #[error("invalid hex: {0}")]
    InvalidHex(String),

    #[error("expected {expected} bytes, got {actual}")]
    InvalidLength { expected: usize, actual: usize },
}

/// Decode a `0x`-prefixed hex string into exactly `N` bytes.
pub(crate) fn decode_prefixed<const N: usize>(s: &str) -> Result<[u8; N], TypesError> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .ok_or_else(|| TypesError::MissingPrefix(s.to_string()))?;
    let bytes = hex::decode(digits).map_err(|e| TypesError::InvalidHex(e.to_string()))?;
    let actual = bytes.len();
    bytes
        .try_into()
        .map_err(|_| TypesError::InvalidLength { expected: N, actual })
}
