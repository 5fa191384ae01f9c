//! Token calls carried as opaque proposal calldata.

use crate::error::TokenError;
use hdao_types::{Address, Amount};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenCall {
    /// Credit each recipient with the amount at the same position.
    Mint {
        recipients: Vec<Address>,
        amounts: Vec<Amount>,
    },
    /// Move funds out of the instance treasury.
    Transfer { to: Address, amount: Amount },
}

impl TokenCall {
    pub fn mint(recipients: Vec<Address>, amounts: Vec<Amount>) -> Self {
        Self::Mint {
            recipients,
            amounts,
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>, TokenError> {
        bincode::serialize(self).map_err(|e| TokenError::Encoding(e.to_string()))
    }

    pub fn decode(calldata: &[u8]) -> Result<Self, TokenError> {
        bincode::deserialize(calldata).map_err(|e| TokenError::InvalidCall(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mint_survives_calldata_encoding() {
        let call = TokenCall::mint(vec![Address::new([3; 20])], vec![Amount::from_units(15)]);
        let bytes = call.encode().unwrap();
        assert!(!bytes.is_empty());
        assert_eq!(TokenCall::decode(&bytes).unwrap(), call);
    }

    #[test]
    fn different_calls_encode_differently() {
        let a = TokenCall::Transfer {
            to: Address::new([1; 20]),
            amount: Amount::new(1),
        };
        let b = TokenCall::Transfer {
            to: Address::new([1; 20]),
            amount: Amount::new(2),
        };
        assert_ne!(a.encode().unwrap(), b.encode().unwrap());
    }

    #[test]
    fn encoded_calldata_is_never_empty() {
        let calls = [
            TokenCall::mint(vec![], vec![]),
            TokenCall::Transfer {
                to: Address::ZERO,
                amount: Amount::ZERO,
            },
        ];
        for call in calls {
            let bytes = call.encode().unwrap();
            assert!(!bytes.is_empty());
            assert_eq!(TokenCall::decode(&bytes).unwrap(), call);
        }
    }

    #[test]
    fn garbage_calldata_rejected() {
        assert!(matches!(
            TokenCall::decode(&[0xFF, 0xFF, 0xFF, 0xFF]),
            Err(TokenError::InvalidCall(_))
        ));
        assert!(TokenCall::decode(&[]).is_err());
    }
}
