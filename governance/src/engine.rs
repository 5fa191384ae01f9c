//! Governance engine: proposal creation, direct and off-chain voting, and
//! threshold-gated execution for one instance.
//!
//! Every mutating call either commits fully or returns an error with no
//! observable change. The engine owns the registry and the vote ledger;
//! executors are borrowed for the duration of a single `execute` call.

use crate::action::ActionList;
use crate::error::GovernanceError;
use crate::event::{GovernanceEvent, VoteChannel};
use crate::executor::ActionExecutor;
use crate::identity::compute_vote_message_hash;
use crate::ledger::{Rejection, VoteLedger, VoteRecord};
use crate::params::GovernanceParams;
use crate::proposal::{Proposal, ProposalState};
use crate::registry::{NewProposal, ProposalRegistry};
use crate::stakeholders::StakeholderSet;
use hdao_crypto::{hash_description, recover_signer, split_signatures};
use hdao_types::{Address, Amount, ChainId, Hash256, ProposalId, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Result of a counted direct vote.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VoteReceipt {
    pub proposal: ProposalId,
    pub voter: Address,
    pub weight: Amount,
    pub total_weight: Amount,
}

/// Result of a signature batch.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BatchReceipt {
    pub proposal: ProposalId,
    /// Signers whose weight was added, in submission order.
    pub counted: Vec<(Address, Amount)>,
    /// Valid signers that had already voted (earlier, or earlier in the blob).
    pub duplicates: Vec<Address>,
    pub total_weight: Amount,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExecutionReceipt {
    pub proposal: ProposalId,
    pub dispatched: usize,
    pub total_weight: Amount,
}

/// Serializable engine state (everything except undrained events).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GovernanceSnapshot {
    pub chain_id: ChainId,
    pub instance: Address,
    pub stakeholders: StakeholderSet,
    pub params: GovernanceParams,
    pub registry: ProposalRegistry,
    pub ledger: VoteLedger,
}

pub struct GovernanceEngine {
    chain_id: ChainId,
    instance: Address,
    stakeholders: StakeholderSet,
    params: GovernanceParams,
    registry: ProposalRegistry,
    ledger: VoteLedger,
    pending_events: Vec<GovernanceEvent>,
}

impl GovernanceEngine {
    pub fn new(
        chain_id: ChainId,
        instance: Address,
        stakeholders: StakeholderSet,
        params: GovernanceParams,
    ) -> Result<Self, GovernanceError> {
        params.validate(&stakeholders)?;
        Ok(Self {
            chain_id,
            instance,
            stakeholders,
            params,
            registry: ProposalRegistry::new(),
            ledger: VoteLedger::new(),
            pending_events: Vec::new(),
        })
    }

    // ── Proposals ───────────────────────────────────────────────────────

    /// Create a proposal from a free-text description.
    pub fn propose(
        &mut self,
        proposer: &Address,
        actions: ActionList,
        description: &str,
        now: Timestamp,
    ) -> Result<ProposalId, GovernanceError> {
        self.propose_hashed(proposer, actions, hash_description(description), now)
    }

    /// Create a proposal from a precomputed description hash.
    ///
    /// Only stakeholders may propose. Resubmitting identical content returns
    /// the existing id without touching its record or tally.
    pub fn propose_hashed(
        &mut self,
        proposer: &Address,
        actions: ActionList,
        description_hash: Hash256,
        now: Timestamp,
    ) -> Result<ProposalId, GovernanceError> {
        let proposer_weight = self
            .stakeholders
            .weight_of(proposer)
            .ok_or(GovernanceError::UnknownVoter(*proposer))?;
        let vote_start = now.plus_secs(self.params.voting_delay_secs);
        let vote_end = vote_start.plus_secs(self.params.voting_period_secs);
        let action_count = actions.len();

        let (id, created) = self.registry.create(NewProposal {
            proposer: *proposer,
            proposer_weight,
            actions,
            description_hash,
            execution_threshold: self.params.execution_threshold,
            proposal_threshold: self.params.proposal_threshold,
            period_policy: self.params.period_policy,
            created_at: now,
            vote_start,
            vote_end,
        })?;

        if created {
            tracing::info!(
                proposal = %id,
                proposer = %proposer,
                actions = action_count,
                "proposal created"
            );
            self.pending_events.push(GovernanceEvent::ProposalCreated {
                proposal: id,
                proposer: *proposer,
                description_hash,
                action_count,
                vote_start,
                vote_end,
            });
        } else {
            tracing::debug!(proposal = %id, "identical proposal already registered");
        }
        Ok(id)
    }

    // ── Voting ──────────────────────────────────────────────────────────

    /// Count the authenticated caller's vote with its assigned weight.
    pub fn cast_vote(
        &mut self,
        proposal: &ProposalId,
        voter: &Address,
        now: Timestamp,
    ) -> Result<VoteReceipt, GovernanceError> {
        self.registry.get(proposal)?;
        let weight = self
            .stakeholders
            .weight_of(voter)
            .ok_or(GovernanceError::UnknownVoter(*voter))?;
        self.ensure_open(proposal, now)?;

        let total_weight = self
            .ledger
            .record_vote(
                proposal,
                VoteRecord {
                    voter: *voter,
                    weight,
                    channel: VoteChannel::Direct,
                    cast_at: now,
                },
            )
            .map_err(|r| rejection_error(r, proposal, voter))?;

        self.vote_counted(proposal, voter, weight, VoteChannel::Direct, total_weight);
        Ok(VoteReceipt {
            proposal: *proposal,
            voter: *voter,
            weight,
            total_weight,
        })
    }

    /// Count a batch of concatenated off-chain vote signatures.
    ///
    /// Every slice is authenticated and every signer authorized before any
    /// weight is counted; a single bad slice fails the whole batch with
    /// `BatchVoteFailed` carrying its index. Signers that already voted are
    /// skipped and reported, never counted twice.
    pub fn cast_votes_by_signature(
        &mut self,
        proposal: &ProposalId,
        signatures: &[u8],
        now: Timestamp,
    ) -> Result<BatchReceipt, GovernanceError> {
        self.registry.get(proposal)?;
        self.ensure_open(proposal, now)?;

        let (records, duplicates) = self
            .authorize_batch(proposal, signatures, now)
            .inspect_err(|e| {
                tracing::warn!(proposal = %proposal, error = %e, "signature batch rejected");
            })?;

        let counted: Vec<(Address, Amount)> =
            records.iter().map(|r| (r.voter, r.weight)).collect();
        let mut running = self.ledger.total_weight(proposal);
        let total_weight = if records.is_empty() {
            running
        } else {
            let first = records[0].voter;
            self.ledger
                .record_batch(proposal, records)
                .map_err(|r| rejection_error(r, proposal, &first))?
        };

        for (voter, weight) in &counted {
            running = running + *weight;
            self.vote_counted(proposal, voter, *weight, VoteChannel::Signature, running);
        }

        Ok(BatchReceipt {
            proposal: *proposal,
            counted,
            duplicates,
            total_weight,
        })
    }

    fn authorize_batch(
        &self,
        proposal: &ProposalId,
        signatures: &[u8],
        now: Timestamp,
    ) -> Result<(Vec<VoteRecord>, Vec<Address>), GovernanceError> {
        let message = self.vote_message_hash(proposal);
        let slices = split_signatures(signatures)?;

        let mut records = Vec::with_capacity(slices.len());
        let mut duplicates = Vec::new();
        let mut seen = HashSet::with_capacity(slices.len());
        for (index, slice) in slices.iter().enumerate() {
            let signer = recover_signer(&message, slice, index)
                .map_err(|e| batch_failure(index, e.into()))?;
            let weight = self
                .stakeholders
                .weight_of(&signer)
                .ok_or_else(|| batch_failure(index, GovernanceError::UnknownVoter(signer)))?;
            if self.ledger.has_voted(proposal, &signer) || !seen.insert(signer) {
                tracing::debug!(proposal = %proposal, voter = %signer, "duplicate signature vote skipped");
                duplicates.push(signer);
                continue;
            }
            records.push(VoteRecord {
                voter: signer,
                weight,
                channel: VoteChannel::Signature,
                cast_at: now,
            });
        }
        Ok((records, duplicates))
    }

    fn ensure_open(&self, proposal: &ProposalId, now: Timestamp) -> Result<(), GovernanceError> {
        let state = self.state(proposal, now)?;
        if !state.accepts_votes() {
            return Err(GovernanceError::ProposalNotActive {
                proposal: *proposal,
                state,
            });
        }
        Ok(())
    }

    fn vote_counted(
        &mut self,
        proposal: &ProposalId,
        voter: &Address,
        weight: Amount,
        channel: VoteChannel,
        total_weight: Amount,
    ) {
        tracing::info!(
            proposal = %proposal,
            voter = %voter,
            weight = %weight,
            total = %total_weight,
            ?channel,
            "vote counted"
        );
        self.pending_events.push(GovernanceEvent::VoteCast {
            proposal: *proposal,
            voter: *voter,
            weight,
            channel,
            total_weight,
        });
    }

    // ── Execution ───────────────────────────────────────────────────────

    /// Execute a proposal identified by its content.
    ///
    /// The id is recomputed from the supplied sequences, never taken from
    /// the caller.
    pub fn execute<E: ActionExecutor>(
        &mut self,
        executor: &mut E,
        targets: Vec<Address>,
        values: Vec<Amount>,
        calldatas: Vec<Vec<u8>>,
        description_hash: &Hash256,
        now: Timestamp,
    ) -> Result<ExecutionReceipt, GovernanceError> {
        let actions = ActionList::from_parts(targets, values, calldatas)?;
        self.execute_actions(executor, &actions, description_hash, now)
    }

    /// Execute a proposal identified by its action list and description hash.
    ///
    /// Dispatches every action in order inside an executor checkpoint. If any
    /// action fails the executor is rolled back and the proposal stays
    /// unexecuted, ready for a retry.
    pub fn execute_actions<E: ActionExecutor>(
        &mut self,
        executor: &mut E,
        actions: &ActionList,
        description_hash: &Hash256,
        now: Timestamp,
    ) -> Result<ExecutionReceipt, GovernanceError> {
        let id = actions.proposal_id(description_hash);
        let proposal = self.registry.get(&id)?;
        if proposal.is_executed() {
            return Err(GovernanceError::AlreadyExecuted(id));
        }
        let total_weight = self.ledger.total_weight(&id);
        if !proposal.threshold_met(total_weight) {
            return Err(GovernanceError::ThresholdNotMet {
                have: total_weight,
                need: proposal.execution_threshold,
            });
        }

        let checkpoint = executor.checkpoint();
        for (index, action) in proposal.actions.iter().enumerate() {
            if let Err(reason) = executor.dispatch(action) {
                executor.rollback(checkpoint);
                tracing::warn!(
                    proposal = %id,
                    index,
                    target = %action.target,
                    %reason,
                    "action dispatch failed, execution rolled back"
                );
                return Err(GovernanceError::Dispatch { index, reason });
            }
        }
        let dispatched = proposal.actions.len();

        self.registry.mark_executed(&id, total_weight, now)?;
        tracing::info!(proposal = %id, actions = dispatched, total = %total_weight, "proposal executed");
        self.pending_events.push(GovernanceEvent::ProposalExecuted {
            proposal: id,
            total_weight,
        });
        Ok(ExecutionReceipt {
            proposal: id,
            dispatched,
            total_weight,
        })
    }

    // ── Reads ───────────────────────────────────────────────────────────

    pub fn proposal(&self, id: &ProposalId) -> Result<&Proposal, GovernanceError> {
        self.registry.get(id)
    }

    /// Proposals in creation order.
    pub fn proposals(&self) -> impl Iterator<Item = &Proposal> {
        self.registry.iter()
    }

    pub fn state(&self, id: &ProposalId, now: Timestamp) -> Result<ProposalState, GovernanceError> {
        let proposal = self.registry.get(id)?;
        Ok(proposal.state(self.ledger.total_weight(id), now))
    }

    pub fn total_weight(&self, id: &ProposalId) -> Amount {
        self.ledger.total_weight(id)
    }

    pub fn has_voted(&self, id: &ProposalId, voter: &Address) -> bool {
        self.ledger.has_voted(id, voter)
    }

    pub fn votes(&self, id: &ProposalId) -> &[VoteRecord] {
        self.ledger.votes(id)
    }

    /// The hash stakeholders sign to vote on `id` in this instance.
    pub fn vote_message_hash(&self, id: &ProposalId) -> Hash256 {
        compute_vote_message_hash(self.chain_id, &self.instance, id)
    }

    pub fn chain_id(&self) -> ChainId {
        self.chain_id
    }

    pub fn instance_address(&self) -> &Address {
        &self.instance
    }

    pub fn stakeholders(&self) -> &StakeholderSet {
        &self.stakeholders
    }

    pub fn params(&self) -> &GovernanceParams {
        &self.params
    }

    /// Take all queued events, oldest first.
    pub fn drain_events(&mut self) -> Vec<GovernanceEvent> {
        std::mem::take(&mut self.pending_events)
    }

    // ── Persistence ─────────────────────────────────────────────────────

    pub fn snapshot(&self) -> GovernanceSnapshot {
        GovernanceSnapshot {
            chain_id: self.chain_id,
            instance: self.instance,
            stakeholders: self.stakeholders.clone(),
            params: self.params.clone(),
            registry: self.registry.clone(),
            ledger: self.ledger.clone(),
        }
    }

    /// Serialize registry, ledger and configuration with bincode.
    pub fn save_state(&self) -> Result<Vec<u8>, GovernanceError> {
        bincode::serialize(&self.snapshot()).map_err(|e| GovernanceError::Snapshot(e.to_string()))
    }

    /// Restore an engine saved with [`save_state`](Self::save_state).
    pub fn load_state(data: &[u8]) -> Result<Self, GovernanceError> {
        let snapshot: GovernanceSnapshot =
            bincode::deserialize(data).map_err(|e| GovernanceError::Snapshot(e.to_string()))?;
        Self::from_snapshot(snapshot)
    }

    /// Rebuild an engine, rejecting snapshots whose tallies do not match
    /// the stakeholder set or the registry.
    pub fn from_snapshot(snapshot: GovernanceSnapshot) -> Result<Self, GovernanceError> {
        snapshot.params.validate(&snapshot.stakeholders)?;
        check_ledger(&snapshot)?;
        Ok(Self {
            chain_id: snapshot.chain_id,
            instance: snapshot.instance,
            stakeholders: snapshot.stakeholders,
            params: snapshot.params,
            registry: snapshot.registry,
            ledger: snapshot.ledger,
            pending_events: Vec::new(),
        })
    }
}

fn check_ledger(snapshot: &GovernanceSnapshot) -> Result<(), GovernanceError> {
    snapshot
        .ledger
        .check_consistency()
        .map_err(GovernanceError::Snapshot)?;
    for proposal in snapshot.ledger.proposals() {
        if !snapshot.registry.contains(proposal) {
            return Err(GovernanceError::Snapshot(format!(
                "votes recorded for unknown proposal {proposal}"
            )));
        }
        for record in snapshot.ledger.votes(proposal) {
            if snapshot.stakeholders.weight_of(&record.voter) != Some(record.weight) {
                return Err(GovernanceError::Snapshot(format!(
                    "vote by {} on {proposal} does not match the stakeholder set",
                    record.voter
                )));
            }
        }
    }
    Ok(())
}

fn rejection_error(rejection: Rejection, proposal: &ProposalId, voter: &Address) -> GovernanceError {
    match rejection {
        Rejection::DuplicateVote => GovernanceError::DuplicateVote {
            proposal: *proposal,
            voter: *voter,
        },
        Rejection::WeightOverflow => GovernanceError::WeightOverflow(*proposal),
    }
}

fn batch_failure(index: usize, source: GovernanceError) -> GovernanceError {
    GovernanceError::BatchVoteFailed {
        index,
        source: Box::new(source),
    }
}
