//! Command implementations. Each returns the JSON document `main` prints.

use anyhow::{bail, Context, Result};
use hdao_crypto::{
    derive_address, generate_keypair, hash_description, keypair_from_private, recover_signers,
    sign_vote,
};
use hdao_factory::{derive_instance_address, InstanceConfig};
use hdao_governance::{compute_proposal_id, compute_vote_message_hash};
use hdao_token::TokenCall;
use hdao_types::{Address, Amount, ChainId, Hash256, PrivateKey, ProposalId};
use serde_json::{json, Value};
use std::path::Path;

/// Parse hex bytes with an optional `0x` prefix. `0x` alone is empty calldata.
pub fn parse_hex_bytes(s: &str) -> Result<Vec<u8>, hex::FromHexError> {
    let digits = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")).unwrap_or(s);
    hex::decode(digits)
}

fn to_hex(bytes: &[u8]) -> String {
    format!("0x{}", hex::encode(bytes))
}

pub fn keygen(seed: Option<&str>) -> Result<Value> {
    let keypair = match seed {
        Some(seed) => {
            let private: PrivateKey = seed.parse().context("seed must be 32 bytes of 0x-prefixed hex")?;
            keypair_from_private(private)
        }
        None => generate_keypair(),
    };
    Ok(json!({
        "address": derive_address(&keypair.public).to_string(),
        "public_key": keypair.public.to_string(),
        "private_key": keypair.private.to_hex(),
    }))
}

pub fn describe_hash(text: &str) -> Value {
    json!({ "description_hash": hash_description(text).to_string() })
}

pub fn proposal_id(
    targets: &[Address],
    values: &[Amount],
    calldatas: &[Vec<u8>],
    description: Option<&str>,
    description_hash: Option<Hash256>,
) -> Result<Value> {
    let description_hash = match (description, description_hash) {
        (Some(text), None) => hash_description(text),
        (None, Some(hash)) => hash,
        _ => bail!("pass exactly one of --description or --description-hash"),
    };
    let id = compute_proposal_id(targets, values, calldatas, &description_hash)?;
    Ok(json!({
        "proposal_id": id.to_string(),
        "description_hash": description_hash.to_string(),
    }))
}

pub fn vote_hash(chain_id: ChainId, instance: &Address, proposal: &ProposalId) -> Value {
    let message = compute_vote_message_hash(chain_id, instance, proposal);
    json!({ "message_hash": message.to_string() })
}

pub fn sign_vote_slice(
    private_key: &str,
    chain_id: ChainId,
    instance: &Address,
    proposal: &ProposalId,
) -> Result<Value> {
    let private: PrivateKey = private_key.parse().context("invalid private key")?;
    let keypair = keypair_from_private(private);
    let message = compute_vote_message_hash(chain_id, instance, proposal);
    let slice = sign_vote(&message, &keypair.private);
    Ok(json!({
        "signer": derive_address(&keypair.public).to_string(),
        "signature": to_hex(&slice.to_bytes()),
    }))
}

/// Recover the signers of a concatenated signature blob.
///
/// Only authenticates; whether a signer holds weight is decided by the instance.
pub fn verify_votes(
    chain_id: ChainId,
    instance: &Address,
    proposal: &ProposalId,
    signatures: &[u8],
) -> Result<Value> {
    let message = compute_vote_message_hash(chain_id, instance, proposal);
    let signers = recover_signers(&message, signatures)?;
    tracing::debug!(count = signers.len(), "signature blob verified");
    Ok(json!({
        "signers": signers.iter().map(ToString::to_string).collect::<Vec<_>>(),
    }))
}

pub fn encode_mint(recipients: Vec<Address>, amounts: Vec<Amount>) -> Result<Value> {
    if recipients.len() != amounts.len() {
        bail!(
            "{} recipients but {} amounts",
            recipients.len(),
            amounts.len()
        );
    }
    let calldata = TokenCall::mint(recipients, amounts).encode()?;
    Ok(json!({ "calldata": to_hex(&calldata) }))
}

/// Validate an instance config and report the address it would get.
pub fn check_instance(path: &Path, chain_id: ChainId, owner: &Address, nonce: u64) -> Result<Value> {
    let config = InstanceConfig::from_toml_file(path)?;
    let (stakeholders, params) = config.validate()?;
    Ok(json!({
        "instance": derive_instance_address(chain_id, owner, nonce).to_string(),
        "symbol": config.symbol,
        "stakeholders": stakeholders.len(),
        "total_weight": stakeholders.total_weight().to_string(),
        "execution_threshold": params.execution_threshold.to_string(),
        "proposal_threshold": params.proposal_threshold.to_string(),
        "period_policy": params.period_policy,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const SEED_A: &str = "0x0101010101010101010101010101010101010101010101010101010101010101";
    const SEED_B: &str = "0x0202020202020202020202020202020202020202020202020202020202020202";

    fn instance() -> Address {
        Address::new([0xDA; 20])
    }

    #[test]
    fn seeded_keygen_is_stable() {
        let a = keygen(Some(SEED_A)).unwrap();
        let b = keygen(Some(SEED_A)).unwrap();
        assert_eq!(a, b);
        assert_eq!(a["private_key"], SEED_A);
        assert!(keygen(Some("0x01")).is_err());
    }

    #[test]
    fn hex_bytes_accept_optional_prefix() {
        assert_eq!(parse_hex_bytes("0xabcd").unwrap(), vec![0xab, 0xcd]);
        assert_eq!(parse_hex_bytes("abcd").unwrap(), vec![0xab, 0xcd]);
        assert!(parse_hex_bytes("0x").unwrap().is_empty());
        assert!(parse_hex_bytes("0xabc").is_err());
    }

    #[test]
    fn proposal_id_requires_one_description() {
        let targets = [instance()];
        let values = [Amount::ZERO];
        let calldatas = [vec![1u8]];
        let by_text = proposal_id(&targets, &values, &calldatas, Some("x"), None).unwrap();
        let by_hash =
            proposal_id(&targets, &values, &calldatas, None, Some(hash_description("x"))).unwrap();
        assert_eq!(by_text, by_hash);
        assert!(proposal_id(&targets, &values, &calldatas, None, None).is_err());
        assert!(proposal_id(&targets, &[], &calldatas, Some("x"), None).is_err());
    }

    #[test]
    fn signed_slices_verify_back_to_signers() {
        let proposal = ProposalId::new([7; 32]);
        let mut blob = Vec::new();
        let mut expected = Vec::new();
        for seed in [SEED_A, SEED_B] {
            let signed = sign_vote_slice(seed, ChainId::DEV, &instance(), &proposal).unwrap();
            blob.extend(parse_hex_bytes(signed["signature"].as_str().unwrap()).unwrap());
            expected.push(signed["signer"].clone());
        }
        let verified = verify_votes(ChainId::DEV, &instance(), &proposal, &blob).unwrap();
        assert_eq!(verified["signers"], Value::Array(expected));

        let other_chain = verify_votes(ChainId::new(1), &instance(), &proposal, &blob);
        assert!(other_chain.is_err());
    }

    #[test]
    fn mint_calldata_decodes() {
        let out = encode_mint(vec![instance()], vec![Amount::from_units(15)]).unwrap();
        let bytes = parse_hex_bytes(out["calldata"].as_str().unwrap()).unwrap();
        assert_eq!(
            TokenCall::decode(&bytes).unwrap(),
            TokenCall::mint(vec![instance()], vec![Amount::from_units(15)])
        );
        assert!(encode_mint(vec![instance()], vec![]).is_err());
    }

    #[test]
    fn check_instance_reports_address() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
            asset_id = "A"
            symbol = "S"
            execution_threshold = 3
            [[stakeholders]]
            address = "0x0101010101010101010101010101010101010101"
            weight = 3
            "#
        )
        .unwrap();
        let owner = Address::new([9; 20]);
        let out = check_instance(file.path(), ChainId::DEV, &owner, 0).unwrap();
        assert_eq!(
            out["instance"],
            derive_instance_address(ChainId::DEV, &owner, 0).to_string()
        );
        assert_eq!(out["period_policy"], "advisory");
    }
}
