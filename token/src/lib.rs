//! Token ledger for a DAO instance.
//!
//! Balances only move through [`TokenLedger`]; governance reaches it through
//! encoded [`TokenCall`]s carried as proposal calldata.

pub mod call;
pub mod error;
pub mod ledger;

pub use call::TokenCall;
pub use error::TokenError;
pub use ledger::TokenLedger;
