use proptest::prelude::*;

use hdao_crypto::{derive_address, keypair_from_seed, sign_vote};
use hdao_governance::{
    compute_proposal_id, Action, ActionExecutor, ActionList, GovernanceEngine, GovernanceError,
    GovernanceParams, StakeholderSet,
};
use hdao_types::{Address, Amount, ChainId, Hash256, KeyPair, Timestamp};

struct CountingExecutor(usize);

impl ActionExecutor for CountingExecutor {
    type Checkpoint = usize;

    fn checkpoint(&self) -> usize {
        self.0
    }

    fn dispatch(&mut self, _action: &Action) -> Result<(), String> {
        self.0 += 1;
        Ok(())
    }

    fn rollback(&mut self, checkpoint: usize) {
        self.0 = checkpoint;
    }
}

fn key(seed: u8) -> KeyPair {
    keypair_from_seed(&[seed; 32])
}

/// Stakeholders seeded 1..=n, each with weight equal to its seed.
fn engine(n: u8) -> GovernanceEngine {
    let addresses = (1..=n).map(|s| derive_address(&key(s).public)).collect();
    let weights = (1..=n).map(|s| Amount::new(s as u128)).collect();
    let stakeholders = StakeholderSet::new(addresses, weights).unwrap();
    let total = stakeholders.total_weight();
    let params = GovernanceParams::new(total, Amount::ZERO, 60);
    GovernanceEngine::new(ChainId::DEV, Address::new([0xDA; 20]), stakeholders, params).unwrap()
}

fn one_action(calldata: Vec<u8>) -> ActionList {
    ActionList::new(vec![Action::new(Address::new([0xDA; 20]), Amount::ZERO, calldata)])
}

fn arb_action() -> impl Strategy<Value = (Address, u128, Vec<u8>)> {
    (
        any::<[u8; 20]>().prop_map(Address::new),
        any::<u128>(),
        prop::collection::vec(any::<u8>(), 0..64),
    )
}

proptest! {
    /// The proposal id depends only on content, and any content change moves it.
    #[test]
    fn proposal_id_is_content_addressed(
        actions in prop::collection::vec(arb_action(), 1..6),
        desc in any::<[u8; 32]>(),
        flip in any::<u8>(),
    ) {
        let targets: Vec<Address> = actions.iter().map(|a| a.0).collect();
        let values: Vec<Amount> = actions.iter().map(|a| Amount::new(a.1)).collect();
        let calldatas: Vec<Vec<u8>> = actions.iter().map(|a| a.2.clone()).collect();
        let desc = Hash256::new(desc);

        let a = compute_proposal_id(&targets, &values, &calldatas, &desc).unwrap();
        let b = compute_proposal_id(&targets, &values, &calldatas, &desc).unwrap();
        prop_assert_eq!(a, b);

        let list = ActionList::from_parts(targets.clone(), values.clone(), calldatas.clone()).unwrap();
        prop_assert_eq!(list.proposal_id(&desc), a);

        let mut other = *desc.as_bytes();
        other[(flip % 32) as usize] ^= 0x01;
        let c = compute_proposal_id(&targets, &values, &calldatas, &Hash256::new(other)).unwrap();
        prop_assert_ne!(a, c);
    }

    /// Tally equals the summed weight of distinct voters, whatever the order
    /// and repetition of direct votes.
    #[test]
    fn direct_votes_never_double_count(order in prop::collection::vec(1u8..=6, 1..30)) {
        let mut engine = engine(6);
        let id = engine
            .propose_hashed(&derive_address(&key(1).public), one_action(vec![1]), Hash256::ZERO, Timestamp::new(0))
            .unwrap();

        let mut seen = std::collections::HashSet::new();
        let mut expected = 0u128;
        for seed in order {
            let voter = derive_address(&key(seed).public);
            let result = engine.cast_vote(&id, &voter, Timestamp::new(1));
            if seen.insert(seed) {
                expected += seed as u128;
                prop_assert!(result.is_ok());
            } else {
                let is_duplicate = matches!(result, Err(GovernanceError::DuplicateVote { .. }));
                prop_assert!(is_duplicate);
            }
        }
        prop_assert_eq!(engine.total_weight(&id), Amount::new(expected));
    }

    /// A batch with one corrupted slice changes nothing, wherever the slice sits.
    #[test]
    fn corrupted_batch_is_atomic(
        signers in prop::collection::vec(1u8..=6, 1..8),
        bad in any::<prop::sample::Index>(),
        byte in 32usize..96,
    ) {
        let mut engine = engine(6);
        let id = engine
            .propose_hashed(&derive_address(&key(1).public), one_action(vec![2]), Hash256::ZERO, Timestamp::new(0))
            .unwrap();
        let message = engine.vote_message_hash(&id);
        let mut blob: Vec<u8> = signers
            .iter()
            .flat_map(|&s| sign_vote(&message, &key(s).private).to_bytes())
            .collect();
        let bad = bad.index(signers.len());
        blob[bad * 96 + byte] ^= 0x80;

        let result = engine.cast_votes_by_signature(&id, &blob, Timestamp::new(1));
        let failed_at_bad = matches!(result, Err(GovernanceError::BatchVoteFailed { index, .. }) if index == bad);
        prop_assert!(failed_at_bad);
        prop_assert_eq!(engine.total_weight(&id), Amount::ZERO);
        prop_assert_eq!(engine.votes(&id).len(), 0);
    }

    /// Execution happens at most once, however many times it is attempted.
    #[test]
    fn execution_is_once_only(attempts in 2usize..6) {
        let mut engine = engine(3);
        let actions = one_action(vec![3]);
        let id = engine
            .propose_hashed(&derive_address(&key(1).public), actions.clone(), Hash256::ZERO, Timestamp::new(0))
            .unwrap();
        for seed in 1..=3 {
            engine.cast_vote(&id, &derive_address(&key(seed).public), Timestamp::new(1)).unwrap();
        }

        let mut executor = CountingExecutor(0);
        let mut successes = 0;
        for _ in 0..attempts {
            if engine.execute_actions(&mut executor, &actions, &Hash256::ZERO, Timestamp::new(2)).is_ok() {
                successes += 1;
            }
        }
        prop_assert_eq!(successes, 1);
        prop_assert_eq!(executor.0, 1);
    }
}
