//! Factory and instance configuration with TOML file support.
//!
//! Amounts are raw base units (`1 token = 10^18`). TOML integers stop at
//! `i64::MAX`, so larger amounts are written as decimal strings.

use crate::FactoryError;
use hdao_governance::{GovernanceParams, PeriodPolicy, Stakeholder, StakeholderSet};
use hdao_types::{Amount, ChainId};
use hdao_utils::LogFormat;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Process-wide settings of a factory deployment.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FactoryConfig {
    /// Chain id every instance binds its vote signatures to.
    #[serde(default)]
    pub chain_id: ChainId,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Filter directive, e.g. `"info"` or `"debug,hdao_governance=trace"`.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

/// Everything needed to create one DAO instance.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceConfig {
    pub asset_id: String,
    pub symbol: String,

    /// Minted to the instance treasury on creation.
    #[serde(default)]
    pub initial_supply: Amount,

    pub execution_threshold: Amount,

    #[serde(default)]
    pub proposal_threshold: Amount,

    #[serde(default)]
    pub voting_delay_secs: u64,

    #[serde(default = "default_voting_period_secs")]
    pub voting_period_secs: u64,

    #[serde(default)]
    pub period_policy: PeriodPolicy,

    pub stakeholders: Vec<Stakeholder>,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_log_level() -> String {
    "info".to_string()
}

fn default_voting_period_secs() -> u64 {
    7 * 24 * 60 * 60
}

// ── Impl ───────────────────────────────────────────────────────────────

impl FactoryConfig {
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, FactoryError> {
        from_toml_file(path.as_ref())
    }

    pub fn from_toml_str(s: &str) -> Result<Self, FactoryError> {
        toml::from_str(s).map_err(|e| FactoryError::Config(e.to_string()))
    }

    pub fn to_toml_string(&self) -> Result<String, FactoryError> {
        toml::to_string_pretty(self).map_err(|e| FactoryError::Config(e.to_string()))
    }
}

impl Default for FactoryConfig {
    fn default() -> Self {
        Self {
            chain_id: ChainId::default(),
            log_format: LogFormat::default(),
            log_level: default_log_level(),
        }
    }
}

impl InstanceConfig {
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, FactoryError> {
        from_toml_file(path.as_ref())
    }

    pub fn from_toml_str(s: &str) -> Result<Self, FactoryError> {
        toml::from_str(s).map_err(|e| FactoryError::Config(e.to_string()))
    }

    pub fn to_toml_string(&self) -> Result<String, FactoryError> {
        toml::to_string_pretty(self).map_err(|e| FactoryError::Config(e.to_string()))
    }

    pub fn stakeholder_set(&self) -> Result<StakeholderSet, FactoryError> {
        Ok(StakeholderSet::from_members(self.stakeholders.clone())?)
    }

    pub fn governance_params(&self) -> GovernanceParams {
        GovernanceParams::new(
            self.execution_threshold,
            self.proposal_threshold,
            self.voting_period_secs,
        )
        .with_voting_delay(self.voting_delay_secs)
        .with_policy(self.period_policy)
    }

    /// Check the stakeholder set and parameters without creating anything.
    pub fn validate(&self) -> Result<(StakeholderSet, GovernanceParams), FactoryError> {
        if self.symbol.trim().is_empty() {
            return Err(FactoryError::Config("symbol must not be empty".into()));
        }
        let stakeholders = self.stakeholder_set()?;
        let params = self.governance_params();
        params.validate(&stakeholders)?;
        Ok((stakeholders, params))
    }
}

fn from_toml_file<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, FactoryError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| FactoryError::Config(format!("{}: {e}", path.display())))?;
    toml::from_str(&content).map_err(|e| FactoryError::Config(e.to_string()))
}
