//! Per-instance governance parameters.

use crate::error::GovernanceError;
use crate::stakeholders::StakeholderSet;
use hdao_types::Amount;
use serde::{Deserialize, Serialize};

/// How the voting period is treated.
///
/// The execution threshold is always the gate for execution. The period only
/// matters under `Enforced`, where votes are refused once it has elapsed and
/// a proposal that missed the threshold by then is `Defeated`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeriodPolicy {
    /// The period is recorded but never blocks votes or execution.
    #[default]
    Advisory,
    /// Votes after `vote_end` are rejected.
    Enforced,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GovernanceParams {
    /// Minimum accumulated weight before a proposal's actions may be dispatched.
    pub execution_threshold: Amount,
    /// Minimum weight a stakeholder must hold to create a proposal.
    pub proposal_threshold: Amount,
    /// Seconds between creation and the start of voting.
    #[serde(default)]
    pub voting_delay_secs: u64,
    /// Length of the voting window in seconds.
    pub voting_period_secs: u64,
    #[serde(default)]
    pub period_policy: PeriodPolicy,
}

impl GovernanceParams {
    pub fn new(execution_threshold: Amount, proposal_threshold: Amount, voting_period_secs: u64) -> Self {
        Self {
            execution_threshold,
            proposal_threshold,
            voting_delay_secs: 0,
            voting_period_secs,
            period_policy: PeriodPolicy::Advisory,
        }
    }

    pub fn with_policy(mut self, policy: PeriodPolicy) -> Self {
        self.period_policy = policy;
        self
    }

    pub fn with_voting_delay(mut self, secs: u64) -> Self {
        self.voting_delay_secs = secs;
        self
    }

    /// Reject parameters under which no proposal could ever execute.
    pub fn validate(&self, stakeholders: &StakeholderSet) -> Result<(), GovernanceError> {
        if self.execution_threshold.is_zero() {
            return Err(GovernanceError::InvalidParams(
                "execution threshold must be non-zero".into(),
            ));
        }
        if self.execution_threshold > stakeholders.total_weight() {
            return Err(GovernanceError::InvalidParams(format!(
                "execution threshold {} exceeds total stakeholder weight {}",
                self.execution_threshold,
                stakeholders.total_weight()
            )));
        }
        Ok(())
    }
}
