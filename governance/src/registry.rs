//! Proposal registry: owns proposal records and their executed flag.

use crate::action::ActionList;
use crate::error::GovernanceError;
use crate::params::PeriodPolicy;
use crate::proposal::Proposal;
use hdao_types::{Address, Amount, Hash256, ProposalId, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Input for [`ProposalRegistry::create`].
#[derive(Clone, Debug)]
pub struct NewProposal {
    pub proposer: Address,
    /// The proposer's own voting weight, checked against `proposal_threshold`.
    pub proposer_weight: Amount,
    pub actions: ActionList,
    pub description_hash: Hash256,
    pub execution_threshold: Amount,
    pub proposal_threshold: Amount,
    pub period_policy: PeriodPolicy,
    pub created_at: Timestamp,
    pub vote_start: Timestamp,
    pub vote_end: Timestamp,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ProposalRegistry {
    proposals: HashMap<ProposalId, Proposal>,
    /// Ids in creation order.
    order: Vec<ProposalId>,
}

impl ProposalRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a proposal, or return the id of the identical one already
    /// registered. The flag is `true` when a new record was created.
    pub fn create(&mut self, new: NewProposal) -> Result<(ProposalId, bool), GovernanceError> {
        if new.actions.is_empty() {
            return Err(GovernanceError::EmptyActionList);
        }
        if new.proposer_weight < new.proposal_threshold {
            return Err(GovernanceError::BelowProposalThreshold {
                have: new.proposer_weight,
                need: new.proposal_threshold,
            });
        }
        let id = new.actions.proposal_id(&new.description_hash);
        if self.proposals.contains_key(&id) {
            return Ok((id, false));
        }
        self.proposals.insert(
            id,
            Proposal {
                id,
                proposer: new.proposer,
                actions: new.actions,
                description_hash: new.description_hash,
                execution_threshold: new.execution_threshold,
                proposal_threshold: new.proposal_threshold,
                period_policy: new.period_policy,
                created_at: new.created_at,
                vote_start: new.vote_start,
                vote_end: new.vote_end,
                executed_at: None,
            },
        );
        self.order.push(id);
        Ok((id, true))
    }

    pub fn get(&self, id: &ProposalId) -> Result<&Proposal, GovernanceError> {
        self.proposals
            .get(id)
            .ok_or(GovernanceError::NotFound(*id))
    }

    pub fn contains(&self, id: &ProposalId) -> bool {
        self.proposals.contains_key(id)
    }

    /// Transition to `Executed`. `total_weight` is the proposal's current tally.
    pub fn mark_executed(
        &mut self,
        id: &ProposalId,
        total_weight: Amount,
        now: Timestamp,
    ) -> Result<(), GovernanceError> {
        let proposal = self
            .proposals
            .get_mut(id)
            .ok_or(GovernanceError::NotFound(*id))?;
        if proposal.is_executed() {
            return Err(GovernanceError::AlreadyExecuted(*id));
        }
        if !proposal.threshold_met(total_weight) {
            return Err(GovernanceError::NotYetPassed(*id));
        }
        proposal.executed_at = Some(now);
        Ok(())
    }

    /// Proposals in creation order.
    pub fn iter(&self) -> impl Iterator<Item = &Proposal> {
        self.order.iter().filter_map(|id| self.proposals.get(id))
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
