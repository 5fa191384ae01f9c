//! Creates DAO instances and indexes them by owner.

use crate::config::{FactoryConfig, InstanceConfig};
use crate::dao::HybridDao;
use crate::FactoryError;
use hdao_crypto::blake2b_256_multi;
use hdao_types::{Address, ChainId, Timestamp};
use std::collections::HashMap;

const INSTANCE_DOMAIN: &[u8] = b"hdao instance:";

/// Address of the `nonce`-th instance created on `chain_id`, attributed to `owner`.
pub fn derive_instance_address(chain_id: ChainId, owner: &Address, nonce: u64) -> Address {
    let digest = blake2b_256_multi(&[
        INSTANCE_DOMAIN,
        &chain_id.to_be_bytes(),
        owner.as_bytes(),
        &nonce.to_be_bytes(),
    ]);
    Address::from_digest(&digest)
}

pub struct DaoFactory {
    chain_id: ChainId,
    instances: HashMap<Address, HybridDao>,
    owners: HashMap<Address, Vec<Address>>,
    nonce: u64,
}

impl DaoFactory {
    pub fn new(chain_id: ChainId) -> Self {
        Self {
            chain_id,
            instances: HashMap::new(),
            owners: HashMap::new(),
            nonce: 0,
        }
    }

    pub fn from_config(config: &FactoryConfig) -> Self {
        Self::new(config.chain_id)
    }

    pub fn chain_id(&self) -> ChainId {
        self.chain_id
    }

    /// Create an instance owned by `owner` and return its address.
    ///
    /// The configuration is validated first; an invalid one creates nothing
    /// and consumes no nonce.
    pub fn create_instance(
        &mut self,
        owner: &Address,
        config: &InstanceConfig,
        now: Timestamp,
    ) -> Result<Address, FactoryError> {
        let mut address = derive_instance_address(self.chain_id, owner, self.nonce);
        while self.instances.contains_key(&address) {
            self.nonce += 1;
            address = derive_instance_address(self.chain_id, owner, self.nonce);
        }

        let dao = HybridDao::new(self.chain_id, address, *owner, config, now)?;
        self.nonce += 1;
        self.instances.insert(address, dao);
        self.owners.entry(*owner).or_default().push(address);

        tracing::info!(
            instance = %address,
            owner = %owner,
            symbol = %config.symbol,
            stakeholders = config.stakeholders.len(),
            threshold = %config.execution_threshold,
            "dao instance created"
        );
        Ok(address)
    }

    /// Instances created by `owner`, oldest first.
    pub fn list_instances_for_owner(&self, owner: &Address) -> &[Address] {
        self.owners.get(owner).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn instance(&self, address: &Address) -> Result<&HybridDao, FactoryError> {
        self.instances
            .get(address)
            .ok_or(FactoryError::UnknownInstance(*address))
    }

    pub fn instance_mut(&mut self, address: &Address) -> Result<&mut HybridDao, FactoryError> {
        self.instances
            .get_mut(address)
            .ok_or(FactoryError::UnknownInstance(*address))
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}
