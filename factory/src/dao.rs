//! One DAO instance: a governance engine and the token ledger it governs.

use crate::config::InstanceConfig;
use crate::FactoryError;
use hdao_governance::{
    Action, ActionExecutor, ActionList, BatchReceipt, ExecutionReceipt, GovernanceEngine,
    GovernanceError, GovernanceEvent, GovernanceSnapshot, Proposal, ProposalState, VoteReceipt,
};
use hdao_token::{TokenCall, TokenLedger};
use hdao_types::{Address, Amount, ChainId, Hash256, ProposalId, Timestamp};
use serde::{Deserialize, Serialize};

/// Applies proposal actions to an instance's own token ledger.
///
/// Only actions targeting the instance itself, carrying no native value and
/// holding a decodable [`TokenCall`], are accepted.
pub struct TreasuryExecutor<'a> {
    instance: Address,
    token: &'a mut TokenLedger,
}

impl<'a> TreasuryExecutor<'a> {
    pub fn new(instance: Address, token: &'a mut TokenLedger) -> Self {
        Self { instance, token }
    }
}

impl ActionExecutor for TreasuryExecutor<'_> {
    type Checkpoint = TokenLedger;

    fn checkpoint(&self) -> TokenLedger {
        self.token.clone()
    }

    fn dispatch(&mut self, action: &Action) -> Result<(), String> {
        if action.target != self.instance {
            return Err(format!("unsupported target {}", action.target));
        }
        if !action.value.is_zero() {
            return Err(format!("native value {} cannot be sent", action.value));
        }
        let result = match TokenCall::decode(&action.calldata).map_err(|e| e.to_string())? {
            TokenCall::Mint {
                recipients,
                amounts,
            } => self.token.mint(&recipients, &amounts).map(|_| ()),
            TokenCall::Transfer { to, amount } => self.token.transfer(&self.instance, &to, amount),
        };
        result.map_err(|e| e.to_string())
    }

    fn rollback(&mut self, checkpoint: TokenLedger) {
        *self.token = checkpoint;
    }
}

/// Serialized form of a [`HybridDao`].
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DaoSnapshot {
    pub address: Address,
    pub owner: Address,
    pub created_at: Timestamp,
    pub governance: GovernanceSnapshot,
    pub token: TokenLedger,
}

pub struct HybridDao {
    address: Address,
    owner: Address,
    created_at: Timestamp,
    engine: GovernanceEngine,
    token: TokenLedger,
}

impl HybridDao {
    /// Create an instance and mint its initial supply to the treasury.
    pub fn new(
        chain_id: ChainId,
        address: Address,
        owner: Address,
        config: &InstanceConfig,
        now: Timestamp,
    ) -> Result<Self, FactoryError> {
        let (stakeholders, params) = config.validate()?;
        let engine = GovernanceEngine::new(chain_id, address, stakeholders, params)?;
        let mut token = TokenLedger::new(config.asset_id.clone(), config.symbol.clone());
        if !config.initial_supply.is_zero() {
            token.mint(&[address], &[config.initial_supply])?;
        }
        Ok(Self {
            address,
            owner,
            created_at: now,
            engine,
            token,
        })
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn owner(&self) -> &Address {
        &self.owner
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn engine(&self) -> &GovernanceEngine {
        &self.engine
    }

    pub fn token(&self) -> &TokenLedger {
        &self.token
    }

    // ── Governance ──────────────────────────────────────────────────────

    pub fn propose(
        &mut self,
        proposer: &Address,
        actions: ActionList,
        description: &str,
        now: Timestamp,
    ) -> Result<ProposalId, GovernanceError> {
        self.engine.propose(proposer, actions, description, now)
    }

    pub fn propose_hashed(
        &mut self,
        proposer: &Address,
        actions: ActionList,
        description_hash: Hash256,
        now: Timestamp,
    ) -> Result<ProposalId, GovernanceError> {
        self.engine.propose_hashed(proposer, actions, description_hash, now)
    }

    pub fn cast_vote(
        &mut self,
        proposal: &ProposalId,
        voter: &Address,
        now: Timestamp,
    ) -> Result<VoteReceipt, GovernanceError> {
        self.engine.cast_vote(proposal, voter, now)
    }

    pub fn cast_votes_by_signature(
        &mut self,
        proposal: &ProposalId,
        signatures: &[u8],
        now: Timestamp,
    ) -> Result<BatchReceipt, GovernanceError> {
        self.engine.cast_votes_by_signature(proposal, signatures, now)
    }

    /// Execute against this instance's token ledger.
    pub fn execute(
        &mut self,
        targets: Vec<Address>,
        values: Vec<Amount>,
        calldatas: Vec<Vec<u8>>,
        description_hash: &Hash256,
        now: Timestamp,
    ) -> Result<ExecutionReceipt, GovernanceError> {
        let mut executor = TreasuryExecutor::new(self.address, &mut self.token);
        self.engine
            .execute(&mut executor, targets, values, calldatas, description_hash, now)
    }

    pub fn execute_actions(
        &mut self,
        actions: &ActionList,
        description_hash: &Hash256,
        now: Timestamp,
    ) -> Result<ExecutionReceipt, GovernanceError> {
        let mut executor = TreasuryExecutor::new(self.address, &mut self.token);
        self.engine
            .execute_actions(&mut executor, actions, description_hash, now)
    }

    // ── Reads ───────────────────────────────────────────────────────────

    pub fn proposal(&self, id: &ProposalId) -> Result<&Proposal, GovernanceError> {
        self.engine.proposal(id)
    }

    pub fn state(&self, id: &ProposalId, now: Timestamp) -> Result<ProposalState, GovernanceError> {
        self.engine.state(id, now)
    }

    pub fn total_weight(&self, id: &ProposalId) -> Amount {
        self.engine.total_weight(id)
    }

    pub fn has_voted(&self, id: &ProposalId, voter: &Address) -> bool {
        self.engine.has_voted(id, voter)
    }

    pub fn vote_message_hash(&self, id: &ProposalId) -> Hash256 {
        self.engine.vote_message_hash(id)
    }

    pub fn balance_of(&self, account: &Address) -> Amount {
        self.token.balance_of(account)
    }

    pub fn total_supply(&self) -> Amount {
        self.token.total_supply()
    }

    pub fn drain_events(&mut self) -> Vec<GovernanceEvent> {
        self.engine.drain_events()
    }

    // ── Persistence ─────────────────────────────────────────────────────

    pub fn snapshot(&self) -> DaoSnapshot {
        DaoSnapshot {
            address: self.address,
            owner: self.owner,
            created_at: self.created_at,
            governance: self.engine.snapshot(),
            token: self.token.clone(),
        }
    }

    pub fn save_state(&self) -> Result<Vec<u8>, FactoryError> {
        bincode::serialize(&self.snapshot()).map_err(|e| FactoryError::Snapshot(e.to_string()))
    }

    pub fn load_state(data: &[u8]) -> Result<Self, FactoryError> {
        let snapshot: DaoSnapshot =
            bincode::deserialize(data).map_err(|e| FactoryError::Snapshot(e.to_string()))?;
        Self::from_snapshot(snapshot)
    }

    pub fn from_snapshot(snapshot: DaoSnapshot) -> Result<Self, FactoryError> {
        if snapshot.governance.instance != snapshot.address {
            return Err(FactoryError::Snapshot(format!(
                "governance bound to {} but instance is {}",
                snapshot.governance.instance, snapshot.address
            )));
        }
        Ok(Self {
            address: snapshot.address,
            owner: snapshot.owner,
            created_at: snapshot.created_at,
            engine: GovernanceEngine::from_snapshot(snapshot.governance)?,
            token: snapshot.token,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hdao_governance::Stakeholder;

    const DAO: Address = Address::new([0xDA; 20]);

    fn config() -> InstanceConfig {
        InstanceConfig {
            asset_id: "ASSET-1".into(),
            symbol: "HDT".into(),
            initial_supply: Amount::from_units(1000),
            execution_threshold: Amount::from_units(2),
            proposal_threshold: Amount::ZERO,
            voting_delay_secs: 0,
            voting_period_secs: 60,
            period_policy: Default::default(),
            stakeholders: vec![
                Stakeholder {
                    address: Address::new([1; 20]),
                    weight: Amount::from_units(1),
                },
                Stakeholder {
                    address: Address::new([2; 20]),
                    weight: Amount::from_units(1),
                },
            ],
        }
    }

    fn dao() -> HybridDao {
        HybridDao::new(ChainId::DEV, DAO, Address::new([9; 20]), &config(), Timestamp::new(0)).unwrap()
    }

    fn passed(dao: &mut HybridDao, actions: &ActionList) -> Hash256 {
        let desc = Hash256::new([4; 32]);
        let id = dao
            .propose_hashed(&Address::new([1; 20]), actions.clone(), desc, Timestamp::new(1))
            .unwrap();
        dao.cast_vote(&id, &Address::new([1; 20]), Timestamp::new(2)).unwrap();
        dao.cast_vote(&id, &Address::new([2; 20]), Timestamp::new(2)).unwrap();
        desc
    }

    fn call(call: TokenCall) -> Action {
        Action::new(DAO, Amount::ZERO, call.encode().unwrap())
    }

    #[test]
    fn initial_supply_sits_in_treasury() {
        let dao = dao();
        assert_eq!(dao.balance_of(&DAO), Amount::from_units(1000));
        assert_eq!(dao.total_supply(), Amount::from_units(1000));
    }

    #[test]
    fn executed_transfer_moves_treasury_funds() {
        let mut dao = dao();
        let to = Address::new([7; 20]);
        let actions = ActionList::new(vec![call(TokenCall::Transfer {
            to,
            amount: Amount::from_units(40),
        })]);
        let desc = passed(&mut dao, &actions);
        dao.execute_actions(&actions, &desc, Timestamp::new(3)).unwrap();
        assert_eq!(dao.balance_of(&to), Amount::from_units(40));
        assert_eq!(dao.balance_of(&DAO), Amount::from_units(960));
    }

    #[test]
    fn foreign_target_fails_dispatch() {
        let mut dao = dao();
        let actions = ActionList::new(vec![Action::new(
            Address::new([5; 20]),
            Amount::ZERO,
            TokenCall::mint(vec![Address::new([7; 20])], vec![Amount::new(1)])
                .encode()
                .unwrap(),
        )]);
        let desc = passed(&mut dao, &actions);
        let err = dao.execute_actions(&actions, &desc, Timestamp::new(3)).unwrap_err();
        assert!(matches!(err, GovernanceError::Dispatch { index: 0, .. }));
    }

    #[test]
    fn failing_second_action_rolls_back_the_first() {
        let mut dao = dao();
        let to = Address::new([7; 20]);
        let actions = ActionList::new(vec![
            call(TokenCall::mint(vec![to], vec![Amount::from_units(5)])),
            call(TokenCall::Transfer {
                to,
                amount: Amount::from_units(5000),
            }),
        ]);
        let desc = passed(&mut dao, &actions);
        let err = dao.execute_actions(&actions, &desc, Timestamp::new(3)).unwrap_err();
        assert!(matches!(err, GovernanceError::Dispatch { index: 1, .. }));
        assert_eq!(dao.balance_of(&to), Amount::ZERO);
        assert_eq!(dao.total_supply(), Amount::from_units(1000));

        let id = actions.proposal_id(&desc);
        assert_eq!(dao.state(&id, Timestamp::new(3)).unwrap(), ProposalState::Succeeded);
    }

    #[test]
    fn value_bearing_action_fails_dispatch() {
        let mut dao = dao();
        let actions = ActionList::new(vec![Action::new(
            DAO,
            Amount::new(1),
            TokenCall::mint(vec![Address::new([7; 20])], vec![Amount::new(1)])
                .encode()
                .unwrap(),
        )]);
        let desc = passed(&mut dao, &actions);
        assert!(dao.execute_actions(&actions, &desc, Timestamp::new(3)).is_err());
    }

    #[test]
    fn snapshot_round_trip() {
        let mut dao = dao();
        let actions = ActionList::new(vec![call(TokenCall::mint(
            vec![Address::new([7; 20])],
            vec![Amount::from_units(3)],
        ))]);
        let desc = passed(&mut dao, &actions);
        dao.execute_actions(&actions, &desc, Timestamp::new(3)).unwrap();

        let restored = HybridDao::load_state(&dao.save_state().unwrap()).unwrap();
        assert_eq!(restored.balance_of(&Address::new([7; 20])), Amount::from_units(3));
        assert_eq!(
            restored.state(&actions.proposal_id(&desc), Timestamp::new(4)).unwrap(),
            ProposalState::Executed
        );
        assert_eq!(restored.owner(), &Address::new([9; 20]));
    }
}
