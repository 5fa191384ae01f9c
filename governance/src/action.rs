//! Proposal actions: the opaque call list a proposal executes.

use crate::error::GovernanceError;
use hdao_types::{Address, Amount, Hash256, ProposalId};
use serde::{Deserialize, Serialize};

/// One `(target, value, calldata)` triple.
///
/// The governance engine never interprets `calldata`; it is handed to the
/// instance's executor as-is.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    pub target: Address,
    pub value: Amount,
    pub calldata: Vec<u8>,
}

impl Action {
    pub fn new(target: Address, value: Amount, calldata: Vec<u8>) -> Self {
        Self {
            target,
            value,
            calldata,
        }
    }
}

/// An ordered list of actions. Order is part of the proposal's identity and
/// is the dispatch order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActionList(Vec<Action>);

impl ActionList {
    pub fn new(actions: Vec<Action>) -> Self {
        Self(actions)
    }

    /// Zip positionally correlated sequences into actions.
    pub fn from_parts(
        targets: Vec<Address>,
        values: Vec<Amount>,
        calldatas: Vec<Vec<u8>>,
    ) -> Result<Self, GovernanceError> {
        check_shape(targets.len(), values.len(), calldatas.len())?;
        Ok(Self(
            targets
                .into_iter()
                .zip(values)
                .zip(calldatas)
                .map(|((target, value), calldata)| Action::new(target, value, calldata))
                .collect(),
        ))
    }

    /// Content id of a proposal carrying these actions.
    pub fn proposal_id(&self, description_hash: &Hash256) -> ProposalId {
        crate::identity::hash_actions(
            self.0
                .iter()
                .map(|a| (&a.target, a.value, a.calldata.as_slice())),
            description_hash,
        )
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Action> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[Action] {
        &self.0
    }
}

impl<'a> IntoIterator for &'a ActionList {
    type Item = &'a Action;
    type IntoIter = std::slice::Iter<'a, Action>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl From<Vec<Action>> for ActionList {
    fn from(actions: Vec<Action>) -> Self {
        Self(actions)
    }
}

pub(crate) fn check_shape(
    targets: usize,
    values: usize,
    calldatas: usize,
) -> Result<(), GovernanceError> {
    if targets != values || targets != calldatas {
        return Err(GovernanceError::LengthMismatch {
            targets,
            values,
            calldatas,
        });
    }
    Ok(())
}
