use async_trait::async_trait;
use lightsail_types::{CreatedKeyPair, Instance, InstanceState, KeyPair, KeyPairPage, Operation};

use crate::error::ApiError;
use crate::types::{InstanceBlueprint, PortRule};

#[cfg(test)]
pub mod fake;
pub mod lightsail;

/// The Lightsail calls used by the modules. Each method issues exactly one
/// request.
#[async_trait]
pub trait LightsailApi: Send + Sync {
    async fn open_instance_public_ports(
        &self,
        instance_name: &str,
        rule: &PortRule,
    ) -> Result<Operation, ApiError>;

    async fn close_instance_public_ports(
        &self,
        instance_name: &str,
        rule: &PortRule,
    ) -> Result<Operation, ApiError>;

    async fn import_key_pair(
        &self,
        key_pair_name: &str,
        public_key_base64: &str,
    ) -> Result<Operation, ApiError>;

    async fn create_key_pair(&self, key_pair_name: &str) -> Result<CreatedKeyPair, ApiError>;

    /// Returns `None` when the service reports the key pair as not found.
    async fn get_key_pair(&self, key_pair_name: &str) -> Result<Option<KeyPair>, ApiError>;

    async fn get_key_pairs(&self, page_token: Option<&str>) -> Result<KeyPairPage, ApiError>;

    async fn delete_key_pair(&self, key_pair_name: &str) -> Result<Operation, ApiError>;

    async fn create_instance(
        &self,
        instance_name: &str,
        blueprint: &InstanceBlueprint,
    ) -> Result<Vec<Operation>, ApiError>;

    async fn delete_instance(&self, instance_name: &str) -> Result<Vec<Operation>, ApiError>;

    async fn start_instance(&self, instance_name: &str) -> Result<Vec<Operation>, ApiError>;

    async fn stop_instance(&self, instance_name: &str) -> Result<Vec<Operation>, ApiError>;

    async fn reboot_instance(&self, instance_name: &str) -> Result<Vec<Operation>, ApiError>;

    /// Returns `None` when the service reports the instance as not found.
    async fn get_instance(&self, instance_name: &str) -> Result<Option<Instance>, ApiError>;

    async fn get_instance_state(&self, instance_name: &str) -> Result<InstanceState, ApiError>;
}
