//! DAO instances and the factory that creates them.
//!
//! A [`HybridDao`] couples a governance engine with the token ledger its
//! proposals act on. A [`DaoFactory`] creates instances from an
//! [`InstanceConfig`] and keeps the per-owner index.

pub mod config;
pub mod dao;
pub mod error;
pub mod factory;

pub use config::{FactoryConfig, InstanceConfig};
pub use dao::{DaoSnapshot, HybridDao, TreasuryExecutor};
pub use error::FactoryError;
pub use factory::{derive_instance_address, DaoFactory};
