//! hdao: offline tooling for Hybrid DAO stakeholders and operators.

mod commands;

use anyhow::Context;
use clap::{Parser, Subcommand};
use hdao_factory::FactoryConfig;
use hdao_types::{Address, Amount, ChainId, Hash256, ProposalId};
use hdao_utils::{init_logging, LogFormat};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "hdao", version, about = "Hybrid DAO keys, proposal ids and vote signatures")]
struct Cli {
    /// Log level filter, e.g. "info" or "debug,hdao_governance=trace".
    #[arg(long, global = true, env = "HDAO_LOG_LEVEL")]
    log_level: Option<String>,

    /// Log format: "human" or "json".
    #[arg(long, global = true, env = "HDAO_LOG_FORMAT")]
    log_format: Option<LogFormat>,

    /// Factory TOML file. Supplies the default chain id and log settings;
    /// flags and env vars override it.
    #[arg(long, global = true, env = "HDAO_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a stakeholder key pair (random, or from a 32-byte seed).
    Keygen {
        #[arg(long)]
        seed: Option<String>,
    },

    /// Hash a proposal description.
    DescribeHash {
        #[arg(long)]
        text: String,
    },

    /// Compute the content-derived id of a proposal.
    ProposalId {
        #[arg(long, value_delimiter = ',', required = true)]
        targets: Vec<Address>,
        #[arg(long, value_delimiter = ',', required = true)]
        values: Vec<Amount>,
        /// Hex calldata per action; "0x" for empty.
        #[arg(long, value_delimiter = ',', required = true, value_parser = commands::parse_hex_bytes)]
        calldatas: Vec<Vec<u8>>,
        #[arg(long, conflicts_with = "description_hash")]
        description: Option<String>,
        #[arg(long)]
        description_hash: Option<Hash256>,
    },

    /// Compute the message hash stakeholders sign to vote.
    VoteHash {
        #[arg(long)]
        chain_id: Option<u64>,
        #[arg(long)]
        instance: Address,
        #[arg(long)]
        proposal: ProposalId,
    },

    /// Produce a 96-byte vote signature slice.
    SignVote {
        #[arg(long, env = "HDAO_PRIVATE_KEY", hide_env_values = true)]
        private_key: String,
        #[arg(long)]
        chain_id: Option<u64>,
        #[arg(long)]
        instance: Address,
        #[arg(long)]
        proposal: ProposalId,
    },

    /// Authenticate a concatenated signature blob and list its signers.
    VerifyVotes {
        #[arg(long)]
        chain_id: Option<u64>,
        #[arg(long)]
        instance: Address,
        #[arg(long)]
        proposal: ProposalId,
        /// Hex of the concatenated 96-byte slices.
        #[arg(long)]
        signatures: String,
    },

    /// Encode mint calldata for an instance's token.
    EncodeMint {
        #[arg(long, value_delimiter = ',', required = true)]
        recipients: Vec<Address>,
        #[arg(long, value_delimiter = ',', required = true)]
        amounts: Vec<Amount>,
    },

    /// Validate an instance config and show the address it would receive.
    CheckInstance {
        #[arg(long)]
        file: PathBuf,
        #[arg(long)]
        owner: Address,
        #[arg(long, default_value_t = 0)]
        nonce: u64,
        #[arg(long)]
        chain_id: Option<u64>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let factory = match &cli.config {
        Some(path) => FactoryConfig::from_toml_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => FactoryConfig::default(),
    };
    let log_format = cli.log_format.unwrap_or(factory.log_format);
    let log_level = cli.log_level.as_deref().unwrap_or(&factory.log_level);
    init_logging(log_format, log_level)?;

    let chain = |flag: Option<u64>| flag.map(ChainId::new).unwrap_or(factory.chain_id);

    let output = match cli.command {
        Command::Keygen { seed } => commands::keygen(seed.as_deref())?,
        Command::DescribeHash { text } => commands::describe_hash(&text),
        Command::ProposalId {
            targets,
            values,
            calldatas,
            description,
            description_hash,
        } => commands::proposal_id(
            &targets,
            &values,
            &calldatas,
            description.as_deref(),
            description_hash,
        )?,
        Command::VoteHash {
            chain_id,
            instance,
            proposal,
        } => commands::vote_hash(chain(chain_id), &instance, &proposal),
        Command::SignVote {
            private_key,
            chain_id,
            instance,
            proposal,
        } => commands::sign_vote_slice(&private_key, chain(chain_id), &instance, &proposal)?,
        Command::VerifyVotes {
            chain_id,
            instance,
            proposal,
            signatures,
        } => {
            let blob = commands::parse_hex_bytes(&signatures).context("signatures must be hex")?;
            commands::verify_votes(chain(chain_id), &instance, &proposal, &blob)?
        }
        Command::EncodeMint {
            recipients,
            amounts,
        } => commands::encode_mint(recipients, amounts)?,
        Command::CheckInstance {
            file,
            owner,
            nonce,
            chain_id,
        } => commands::check_instance(&file, chain(chain_id), &owner, nonce)?,
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
