use hdao_types::{Address, Amount};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("insufficient balance for {account}: need {needed}, have {available}")]
    InsufficientBalance {
        account: Address,
        needed: Amount,
        available: Amount,
    },

    #[error("recipient/amount length mismatch: {recipients} recipients, {amounts} amounts")]
    LengthMismatch { recipients: usize, amounts: usize },

    #[error("cannot credit the zero address")]
    ZeroRecipient,

    #[error("total supply overflow")]
    SupplyOverflow,

    #[error("token call encoding failed: {0}")]
    Encoding(String),

    #[error("malformed token call: {0}")]
    InvalidCall(String),
}
