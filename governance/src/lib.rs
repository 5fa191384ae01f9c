//! Governance core for Hybrid DAO instances.
//!
//! A small set of weighted stakeholders propose lists of actions, vote on them
//! directly or with off-chain signatures, and execute them once the
//! accumulated weight reaches the instance's execution threshold.
//!
//! Lifecycle per proposal: Pending → Active → Succeeded | Defeated → Executed.
//!
//! Key properties:
//! - proposal ids are a pure function of content (actions + description hash)
//! - a stakeholder's weight counts at most once per proposal
//! - batched signature votes apply all-or-nothing
//! - execution dispatches every action exactly once, or rolls back and leaves
//!   the proposal retryable

pub mod action;
pub mod engine;
pub mod error;
pub mod event;
pub mod executor;
pub mod identity;
pub mod ledger;
pub mod params;
pub mod proposal;
pub mod registry;
pub mod stakeholders;

pub use action::{Action, ActionList};
pub use engine::{BatchReceipt, ExecutionReceipt, GovernanceEngine, GovernanceSnapshot, VoteReceipt};
pub use error::{ErrorKind, GovernanceError};
pub use event::{GovernanceEvent, VoteChannel};
pub use executor::ActionExecutor;
pub use identity::{compute_proposal_id, compute_vote_message_hash};
pub use ledger::{Rejection, VoteLedger, VoteRecord};
pub use params::{GovernanceParams, PeriodPolicy};
pub use proposal::{Proposal, ProposalState};
pub use registry::{NewProposal, ProposalRegistry};
pub use stakeholders::{Stakeholder, StakeholderSet};
