use hdao_governance::GovernanceError;
use hdao_token::TokenError;
use hdao_types::Address;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FactoryError {
    #[error("config error: {0}")]
    Config(String),

    #[error("governance error: {0}")]
    Governance(#[from] GovernanceError),

    #[error("token error: {0}")]
    Token(#[from] TokenError),

    #[error("no instance at {0}")]
    UnknownInstance(Address),

    #[error("snapshot error: {0}")]
    Snapshot(String),
}
