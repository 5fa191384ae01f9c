//! The weighted stakeholder set of one instance.
//!
//! Weights are fixed when the instance is created; there is no re-weighting.

use crate::error::GovernanceError;
use hdao_types::{Address, Amount};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stakeholder {
    pub address: Address,
    pub weight: Amount,
}

/// Validated stakeholder set.
///
/// Invariants: non-empty, unique addresses, non-zero weights, and a total
/// weight that fits in `u128` (so no tally can ever overflow).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(try_from = "Vec<Stakeholder>", into = "Vec<Stakeholder>")]
pub struct StakeholderSet {
    members: Vec<Stakeholder>,
    index: HashMap<Address, usize>,
    total: Amount,
}

impl StakeholderSet {
    /// Build from positionally correlated address and weight lists.
    pub fn new(addresses: Vec<Address>, weights: Vec<Amount>) -> Result<Self, GovernanceError> {
        if addresses.len() != weights.len() {
            return Err(GovernanceError::InvalidStakeholders(format!(
                "{} addresses but {} weights",
                addresses.len(),
                weights.len()
            )));
        }
        Self::from_members(
            addresses
                .into_iter()
                .zip(weights)
                .map(|(address, weight)| Stakeholder { address, weight })
                .collect(),
        )
    }

    pub fn from_members(members: Vec<Stakeholder>) -> Result<Self, GovernanceError> {
        if members.is_empty() {
            return Err(GovernanceError::InvalidStakeholders(
                "at least one stakeholder is required".into(),
            ));
        }
        let mut index = HashMap::with_capacity(members.len());
        let mut total = Amount::ZERO;
        for (i, member) in members.iter().enumerate() {
            if member.weight.is_zero() {
                return Err(GovernanceError::InvalidStakeholders(format!(
                    "{} has zero weight",
                    member.address
                )));
            }
            if index.insert(member.address, i).is_some() {
                return Err(GovernanceError::InvalidStakeholders(format!(
                    "{} listed twice",
                    member.address
                )));
            }
            total = total.checked_add(member.weight).ok_or_else(|| {
                GovernanceError::InvalidStakeholders("total weight overflows".into())
            })?;
        }
        Ok(Self {
            members,
            index,
            total,
        })
    }

    /// Assigned weight, or `None` for an address that is not a stakeholder.
    pub fn weight_of(&self, address: &Address) -> Option<Amount> {
        self.index.get(address).map(|&i| self.members[i].weight)
    }

    pub fn contains(&self, address: &Address) -> bool {
        self.index.contains_key(address)
    }

    pub fn total_weight(&self) -> Amount {
        self.total
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Members in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Stakeholder> {
        self.members.iter()
    }
}

impl TryFrom<Vec<Stakeholder>> for StakeholderSet {
    type Error = GovernanceError;

    fn try_from(members: Vec<Stakeholder>) -> Result<Self, Self::Error> {
        Self::from_members(members)
    }
}

impl From<StakeholderSet> for Vec<Stakeholder> {
    fn from(set: StakeholderSet) -> Self {
        set.members
    }
}
