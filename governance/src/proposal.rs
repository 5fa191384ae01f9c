//! Proposal records and their lifecycle.

use crate::action::ActionList;
use crate::params::PeriodPolicy;
use hdao_types::{Address, Amount, Hash256, ProposalId, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle state of a proposal.
///
/// Only `Executed` is stored; every other state is derived from the clock and
/// the current tally, so a state never regresses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProposalState {
    /// Created; voting has not opened yet.
    Pending,
    /// Accepting votes, threshold not yet reached.
    Active,
    /// Threshold reached; may be executed.
    Succeeded,
    /// Voting closed (enforced period) without reaching the threshold.
    Defeated,
    /// Actions dispatched. Terminal.
    Executed,
}

impl ProposalState {
    /// Whether votes may still be recorded in this state.
    pub fn accepts_votes(&self) -> bool {
        matches!(self, Self::Active | Self::Succeeded)
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Executed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Active => "active",
            Self::Succeeded => "succeeded",
            Self::Defeated => "defeated",
            Self::Executed => "executed",
        }
    }
}

impl fmt::Display for ProposalState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A registered proposal.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Proposal {
    pub id: ProposalId,
    pub proposer: Address,
    pub actions: ActionList,
    pub description_hash: Hash256,
    /// Threshold snapshot taken at creation.
    pub execution_threshold: Amount,
    pub proposal_threshold: Amount,
    pub period_policy: PeriodPolicy,
    pub created_at: Timestamp,
    pub vote_start: Timestamp,
    pub vote_end: Timestamp,
    pub executed_at: Option<Timestamp>,
}

impl Proposal {
    pub fn is_executed(&self) -> bool {
        self.executed_at.is_some()
    }

    pub fn threshold_met(&self, total_weight: Amount) -> bool {
        total_weight >= self.execution_threshold
    }

    /// Derive the lifecycle state for the given tally at `now`.
    pub fn state(&self, total_weight: Amount, now: Timestamp) -> ProposalState {
        if self.is_executed() {
            ProposalState::Executed
        } else if now < self.vote_start {
            ProposalState::Pending
        } else if self.threshold_met(total_weight) {
            ProposalState::Succeeded
        } else if self.period_policy == PeriodPolicy::Enforced && now >= self.vote_end {
            ProposalState::Defeated
        } else {
            ProposalState::Active
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn proposal(policy: PeriodPolicy) -> Proposal {
        Proposal {
            id: ProposalId::new([1; 32]),
            proposer: Address::new([1; 20]),
            actions: ActionList::default(),
            description_hash: Hash256::ZERO,
            execution_threshold: Amount::new(30),
            proposal_threshold: Amount::new(10),
            period_policy: policy,
            created_at: Timestamp::new(100),
            vote_start: Timestamp::new(110),
            vote_end: Timestamp::new(120),
            executed_at: None,
        }
    }

    #[test]
    fn pending_before_vote_start() {
        let p = proposal(PeriodPolicy::Advisory);
        assert_eq!(p.state(Amount::ZERO, Timestamp::new(105)), ProposalState::Pending);
        assert_eq!(p.state(Amount::ZERO, Timestamp::new(110)), ProposalState::Active);
    }

    #[test]
    fn threshold_reached_exactly_succeeds() {
        let p = proposal(PeriodPolicy::Advisory);
        assert_eq!(p.state(Amount::new(29), Timestamp::new(115)), ProposalState::Active);
        assert_eq!(p.state(Amount::new(30), Timestamp::new(115)), ProposalState::Succeeded);
    }

    #[test]
    fn advisory_period_never_defeats() {
        let p = proposal(PeriodPolicy::Advisory);
        assert_eq!(p.state(Amount::ZERO, Timestamp::new(10_000)), ProposalState::Active);
    }

    #[test]
    fn enforced_period_defeats_after_end() {
        let p = proposal(PeriodPolicy::Enforced);
        assert_eq!(p.state(Amount::ZERO, Timestamp::new(119)), ProposalState::Active);
        assert_eq!(p.state(Amount::ZERO, Timestamp::new(120)), ProposalState::Defeated);
        assert_eq!(p.state(Amount::new(30), Timestamp::new(500)), ProposalState::Succeeded);
    }

    #[test]
    fn executed_is_terminal() {
        let mut p = proposal(PeriodPolicy::Enforced);
        p.executed_at = Some(Timestamp::new(115));
        assert_eq!(p.state(Amount::ZERO, Timestamp::new(0)), ProposalState::Executed);
        assert!(!ProposalState::Executed.accepts_votes());
        assert!(ProposalState::Succeeded.accepts_votes());
    }
}
