//! Vote ledger: per-proposal, per-voter cast status and accumulated weight.
//!
//! A voter contributes to a proposal at most once. There is no vote removal,
//! so a proposal's total only ever grows.

use crate::event::VoteChannel;
use hdao_types::{Address, Amount, ProposalId, Timestamp};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// One counted vote.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRecord {
    pub voter: Address,
    pub weight: Amount,
    pub channel: VoteChannel,
    pub cast_at: Timestamp,
}

/// Why a vote was not recorded. The ledger is unchanged in every case.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Rejection {
    DuplicateVote,
    WeightOverflow,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct Tally {
    total: Amount,
    records: Vec<VoteRecord>,
    voters: HashSet<Address>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct VoteLedger {
    tallies: HashMap<ProposalId, Tally>,
}

impl VoteLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count `record.weight` for `record.voter` unless that voter already voted.
    ///
    /// Returns the new total on success.
    pub fn record_vote(
        &mut self,
        proposal: &ProposalId,
        record: VoteRecord,
    ) -> Result<Amount, Rejection> {
        let tally = self.tallies.entry(*proposal).or_default();
        if tally.voters.contains(&record.voter) {
            return Err(Rejection::DuplicateVote);
        }
        let total = tally
            .total
            .checked_add(record.weight)
            .ok_or(Rejection::WeightOverflow)?;
        tally.total = total;
        tally.voters.insert(record.voter);
        tally.records.push(record);
        Ok(total)
    }

    /// Count a set of votes as one unit: either every record is counted or
    /// none is.
    ///
    /// Returns the new total on success.
    pub fn record_batch(
        &mut self,
        proposal: &ProposalId,
        records: Vec<VoteRecord>,
    ) -> Result<Amount, Rejection> {
        let current = self.total_weight(proposal);
        let mut seen = HashSet::with_capacity(records.len());
        let mut total = current;
        for record in &records {
            if self.has_voted(proposal, &record.voter) || !seen.insert(record.voter) {
                return Err(Rejection::DuplicateVote);
            }
            total = total
                .checked_add(record.weight)
                .ok_or(Rejection::WeightOverflow)?;
        }

        let tally = self.tallies.entry(*proposal).or_default();
        tally.total = total;
        for record in records {
            tally.voters.insert(record.voter);
            tally.records.push(record);
        }
        Ok(total)
    }

    /// Accumulated support for a proposal (zero when nobody voted).
    pub fn total_weight(&self, proposal: &ProposalId) -> Amount {
        self.tallies
            .get(proposal)
            .map(|t| t.total)
            .unwrap_or(Amount::ZERO)
    }

    pub fn has_voted(&self, proposal: &ProposalId, voter: &Address) -> bool {
        self.tallies
            .get(proposal)
            .is_some_and(|t| t.voters.contains(voter))
    }

    /// Counted votes in the order they were recorded.
    pub fn votes(&self, proposal: &ProposalId) -> &[VoteRecord] {
        self.tallies
            .get(proposal)
            .map(|t| t.records.as_slice())
            .unwrap_or(&[])
    }

    /// Proposals that have at least one tally entry.
    pub fn proposals(&self) -> impl Iterator<Item = &ProposalId> {
        self.tallies.keys()
    }

    /// Check that every tally agrees with its records: one record per
    /// voter, the voter set matches the records, and the total is their sum.
    pub fn check_consistency(&self) -> Result<(), String> {
        for (proposal, tally) in &self.tallies {
            let mut voters = HashSet::with_capacity(tally.records.len());
            let mut sum = Amount::ZERO;
            for record in &tally.records {
                if !voters.insert(record.voter) {
                    return Err(format!("{} recorded twice on {proposal}", record.voter));
                }
                sum = sum
                    .checked_add(record.weight)
                    .ok_or_else(|| format!("tally of {proposal} overflows"))?;
            }
            if voters != tally.voters {
                return Err(format!("voter set of {proposal} does not match its records"));
            }
            if sum != tally.total {
                return Err(format!(
                    "total of {proposal} is {} but its records sum to {sum}",
                    tally.total
                ));
            }
        }
        Ok(())
    }
}
