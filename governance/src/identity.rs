//! Canonical identities for proposals and off-chain vote messages.
//!
//! Encodings are length-prefixed and domain-tagged, so distinct inputs never
//! share a preimage and a proposal id can never collide with a vote message.

use crate::action::check_shape;
use crate::error::GovernanceError;
use hdao_crypto::blake2b_256;
use hdao_types::{Address, Amount, ChainId, Hash256, ProposalId};

const PROPOSAL_TAG: &[u8] = b"hdao proposal:";
const VOTE_TAG: &[u8] = b"hdao vote:";

/// Compute the id of a proposal from its positionally correlated sequences.
///
/// Fails with `LengthMismatch` before hashing when the sequences differ in
/// length. An empty list hashes fine; creating a proposal from one does not.
pub fn compute_proposal_id<C: AsRef<[u8]>>(
    targets: &[Address],
    values: &[Amount],
    calldatas: &[C],
    description_hash: &Hash256,
) -> Result<ProposalId, GovernanceError> {
    check_shape(targets.len(), values.len(), calldatas.len())?;
    Ok(hash_actions(
        targets
            .iter()
            .zip(values.iter().copied())
            .zip(calldatas.iter().map(|c| c.as_ref()))
            .map(|((t, v), c)| (t, v, c)),
        description_hash,
    ))
}

/// Message a stakeholder signs to vote on `proposal_id` in one instance on
/// one chain. Binding both prevents replay across chains and across sibling
/// instances that hold a proposal with the same content.
pub fn compute_vote_message_hash(
    chain_id: ChainId,
    instance: &Address,
    proposal_id: &ProposalId,
) -> Hash256 {
    let mut buf = Vec::with_capacity(VOTE_TAG.len() + 8 + Address::LEN + 32);
    buf.extend_from_slice(VOTE_TAG);
    buf.extend_from_slice(&chain_id.to_be_bytes());
    buf.extend_from_slice(instance.as_bytes());
    buf.extend_from_slice(proposal_id.as_bytes());
    Hash256::new(blake2b_256(&buf))
}

pub(crate) fn hash_actions<'a>(
    actions: impl ExactSizeIterator<Item = (&'a Address, Amount, &'a [u8])>,
    description_hash: &Hash256,
) -> ProposalId {
    let mut buf = Vec::with_capacity(PROPOSAL_TAG.len() + 8 + actions.len() * 64 + 32);
    buf.extend_from_slice(PROPOSAL_TAG);
    buf.extend_from_slice(&(actions.len() as u64).to_be_bytes());
    for (target, value, calldata) in actions {
        buf.extend_from_slice(target.as_bytes());
        buf.extend_from_slice(&value.raw().to_be_bytes());
        buf.extend_from_slice(&(calldata.len() as u64).to_be_bytes());
        buf.extend_from_slice(calldata);
    }
    buf.extend_from_slice(description_hash.as_bytes());
    ProposalId::new(blake2b_256(&buf))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::ActionList;
    use hdao_crypto::hash_description;

    fn target() -> Address {
        Address::new([9; 20])
    }

    #[test]
    fn equal_inputs_equal_ids() {
        let desc = hash_description("Mint 15 token to User_3");
        let a = compute_proposal_id(&[target()], &[Amount::ZERO], &[vec![1, 2, 3]], &desc).unwrap();
        let b = compute_proposal_id(&[target()], &[Amount::ZERO], &[vec![1, 2, 3]], &desc).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn every_field_changes_the_id() {
        let desc = hash_description("d");
        let base = compute_proposal_id(&[target()], &[Amount::ZERO], &[vec![1]], &desc).unwrap();
        let other_target =
            compute_proposal_id(&[Address::new([8; 20])], &[Amount::ZERO], &[vec![1]], &desc)
                .unwrap();
        let other_value =
            compute_proposal_id(&[target()], &[Amount::new(1)], &[vec![1]], &desc).unwrap();
        let other_calldata =
            compute_proposal_id(&[target()], &[Amount::ZERO], &[vec![2]], &desc).unwrap();
        let other_desc = compute_proposal_id(
            &[target()],
            &[Amount::ZERO],
            &[vec![1]],
            &hash_description("e"),
        )
        .unwrap();
        for id in [other_target, other_value, other_calldata, other_desc] {
            assert_ne!(id, base);
        }
    }

    #[test]
    fn calldata_boundaries_are_unambiguous() {
        let desc = hash_description("d");
        let t = [target(), target()];
        let v = [Amount::ZERO, Amount::ZERO];
        let a = compute_proposal_id(&t, &v, &[vec![1, 2], vec![3]], &desc).unwrap();
        let b = compute_proposal_id(&t, &v, &[vec![1], vec![2, 3]], &desc).unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn mismatched_shape_fails_before_hashing() {
        let desc = hash_description("d");
        let err = compute_proposal_id(&[target()], &[], &[vec![0u8]], &desc).unwrap_err();
        assert!(matches!(err, GovernanceError::LengthMismatch { .. }));
    }

    #[test]
    fn action_list_matches_free_function() {
        let desc = hash_description("d");
        let list =
            ActionList::from_parts(vec![target()], vec![Amount::new(4)], vec![vec![7]]).unwrap();
        let id = compute_proposal_id(&[target()], &[Amount::new(4)], &[vec![7]], &desc).unwrap();
        assert_eq!(list.proposal_id(&desc), id);
    }

    #[test]
    fn vote_hash_binds_chain_and_instance() {
        let id = ProposalId::new([1; 32]);
        let instance = Address::new([2; 20]);
        let base = compute_vote_message_hash(ChainId::DEV, &instance, &id);
        assert_eq!(base, compute_vote_message_hash(ChainId::DEV, &instance, &id));
        assert_ne!(base, compute_vote_message_hash(ChainId::new(1), &instance, &id));
        assert_ne!(
            base,
            compute_vote_message_hash(ChainId::DEV, &Address::new([3; 20]), &id)
        );
        assert_ne!(
            base,
            compute_vote_message_hash(ChainId::DEV, &instance, &ProposalId::new([4; 32]))
        );
    }
}
