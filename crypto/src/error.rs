use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SignatureError {
    #[error("signature blob of {len} bytes is not a non-zero multiple of {expected}")]
    InvalidSignatureLength { len: usize, expected: usize },

    #[error("signature {index} does not recover to a valid signer")]
    SignatureRecoveryFailed { index: usize },
}
