//! Balance ledger with a tracked total supply.

use crate::error::TokenError;
use hdao_types::{Address, Amount};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Balances of one fungible asset.
///
/// `Clone` is the checkpoint: executors snapshot the ledger before a
/// proposal runs and restore it if any action fails.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenLedger {
    asset_id: String,
    symbol: String,
    balances: BTreeMap<Address, Amount>,
    total_supply: Amount,
}

impl TokenLedger {
    pub fn new(asset_id: impl Into<String>, symbol: impl Into<String>) -> Self {
        Self {
            asset_id: asset_id.into(),
            symbol: symbol.into(),
            balances: BTreeMap::new(),
            total_supply: Amount::ZERO,
        }
    }

    pub fn asset_id(&self) -> &str {
        &self.asset_id
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn balance_of(&self, account: &Address) -> Amount {
        self.balances.get(account).copied().unwrap_or(Amount::ZERO)
    }

    pub fn total_supply(&self) -> Amount {
        self.total_supply
    }

    /// Accounts with a non-zero balance, in address order.
    pub fn holders(&self) -> impl Iterator<Item = (&Address, &Amount)> {
        self.balances.iter()
    }

    /// Credit every recipient. Nothing is applied unless all credits fit.
    pub fn mint(&mut self, recipients: &[Address], amounts: &[Amount]) -> Result<Amount, TokenError> {
        if recipients.len() != amounts.len() {
            return Err(TokenError::LengthMismatch {
                recipients: recipients.len(),
                amounts: amounts.len(),
            });
        }
        if recipients.iter().any(Address::is_zero) {
            return Err(TokenError::ZeroRecipient);
        }

        let minted = amounts
            .iter()
            .try_fold(Amount::ZERO, |acc, a| acc.checked_add(*a))
            .ok_or(TokenError::SupplyOverflow)?;
        let total_supply = self
            .total_supply
            .checked_add(minted)
            .ok_or(TokenError::SupplyOverflow)?;

        // Each balance is bounded by the new supply, so these adds cannot overflow.
        for (to, amount) in recipients.iter().zip(amounts) {
            if amount.is_zero() {
                continue;
            }
            let entry = self.balances.entry(*to).or_insert(Amount::ZERO);
            *entry = *entry + *amount;
        }
        self.total_supply = total_supply;

        tracing::debug!(asset = %self.asset_id, recipients = recipients.len(), minted = %minted, "tokens minted");
        Ok(minted)
    }

    pub fn transfer(&mut self, from: &Address, to: &Address, amount: Amount) -> Result<(), TokenError> {
        if to.is_zero() {
            return Err(TokenError::ZeroRecipient);
        }
        let available = self.balance_of(from);
        let remaining = available
            .checked_sub(amount)
            .ok_or(TokenError::InsufficientBalance {
                account: *from,
                needed: amount,
                available,
            })?;
        if amount.is_zero() || from == to {
            return Ok(());
        }

        if remaining.is_zero() {
            self.balances.remove(from);
        } else {
            self.balances.insert(*from, remaining);
        }
        let entry = self.balances.entry(*to).or_insert(Amount::ZERO);
        *entry = *entry + amount;

        tracing::debug!(asset = %self.asset_id, from = %from, to = %to, amount = %amount, "tokens transferred");
        Ok(())
    }
}
