use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_lightsail::types::{NetworkProtocol, PortInfo};
use aws_sdk_lightsail::Client;
use lightsail_types::{CreatedKeyPair, Instance, InstanceState, KeyPair, KeyPairPage, Operation};
use log::{debug, error, info};

use crate::api::LightsailApi;
use crate::error::ApiError;
use crate::types::{InstanceBlueprint, PortRule};

/// `LightsailApi` backed by the AWS SDK.
pub struct LightsailClient {
    client: Client,
}

impl LightsailClient {
    pub fn new(config: &SdkConfig) -> Self {
        LightsailClient {
            client: Client::new(config),
        }
    }
}

fn port_info(rule: &PortRule) -> PortInfo {
    PortInfo::builder()
        .protocol(NetworkProtocol::from(rule.protocol.as_str()))
        .from_port(rule.from_port)
        .to_port(rule.to_port)
        .build()
}

fn operations(operations: Option<Vec<aws_sdk_lightsail::types::Operation>>) -> Vec<Operation> {
    operations
        .unwrap_or_default()
        .into_iter()
        .map(Operation::from)
        .collect()
}

#[async_trait]
impl LightsailApi for LightsailClient {
    async fn open_instance_public_ports(
        &self,
        instance_name: &str,
        rule: &PortRule,
    ) -> Result<Operation, ApiError> {
        info!(
            "Opening {} ports {}-{} on instance {}",
            rule.protocol.as_str(),
            rule.from_port,
            rule.to_port,
            instance_name
        );
        let output = self
            .client
            .open_instance_public_ports()
            .instance_name(instance_name)
            .port_info(port_info(rule))
            .send()
            .await?;
        Ok(output.operation.map(Operation::from).unwrap_or_default())
    }

    async fn close_instance_public_ports(
        &self,
        instance_name: &str,
        rule: &PortRule,
    ) -> Result<Operation, ApiError> {
        info!(
            "Closing {} ports {}-{} on instance {}",
            rule.protocol.as_str(),
            rule.from_port,
            rule.to_port,
            instance_name
        );
        let output = self
            .client
            .close_instance_public_ports()
            .instance_name(instance_name)
            .port_info(port_info(rule))
            .send()
            .await?;
        Ok(output.operation.map(Operation::from).unwrap_or_default())
    }

    async fn import_key_pair(
        &self,
        key_pair_name: &str,
        public_key_base64: &str,
    ) -> Result<Operation, ApiError> {
        info!("Importing key pair {}", key_pair_name);
        let output = self
            .client
            .import_key_pair()
            .key_pair_name(key_pair_name)
            .public_key_base64(public_key_base64)
            .send()
            .await?;
        Ok(output.operation.map(Operation::from).unwrap_or_default())
    }

    async fn create_key_pair(&self, key_pair_name: &str) -> Result<CreatedKeyPair, ApiError> {
        info!("Creating key pair {}", key_pair_name);
        let output = self
            .client
            .create_key_pair()
            .key_pair_name(key_pair_name)
            .send()
            .await?;
        Ok(CreatedKeyPair {
            key_pair: output.key_pair.map(KeyPair::from).unwrap_or_default(),
            public_key_base64: output.public_key_base64,
            private_key_base64: output.private_key_base64,
            operation: output.operation.map(Operation::from),
        })
    }

    async fn get_key_pair(&self, key_pair_name: &str) -> Result<Option<KeyPair>, ApiError> {
        debug!("Looking up key pair {}", key_pair_name);
        match self
            .client
            .get_key_pair()
            .key_pair_name(key_pair_name)
            .send()
            .await
        {
            Ok(success) => Ok(success.key_pair.map(KeyPair::from)),
            Err(err) => {
                let err = ApiError::from(err);
                if err.is_not_found() {
                    debug!("Key pair {} does not exist", key_pair_name);
                    Ok(None)
                } else {
                    error!("Failed to look up key pair {}: {}", key_pair_name, err);
                    Err(err)
                }
            }
        }
    }

    async fn get_key_pairs(&self, page_token: Option<&str>) -> Result<KeyPairPage, ApiError> {
        debug!("Listing key pairs, page token: {:?}", page_token);
        let output = self
            .client
            .get_key_pairs()
            .set_page_token(page_token.map(String::from))
            .send()
            .await?;
        Ok(KeyPairPage {
            key_pairs: output
                .key_pairs
                .unwrap_or_default()
                .into_iter()
                .map(KeyPair::from)
                .collect(),
            next_page_token: output.next_page_token,
        })
    }

    async fn delete_key_pair(&self, key_pair_name: &str) -> Result<Operation, ApiError> {
        info!("Deleting key pair {}", key_pair_name);
        let output = self
            .client
            .delete_key_pair()
            .key_pair_name(key_pair_name)
            .send()
            .await?;
        Ok(output.operation.map(Operation::from).unwrap_or_default())
    }

    async fn create_instance(
        &self,
        instance_name: &str,
        blueprint: &InstanceBlueprint,
    ) -> Result<Vec<Operation>, ApiError> {
        info!(
            "Creating instance {} from blueprint {} with bundle {} in {}",
            instance_name, blueprint.blueprint_id, blueprint.bundle_id, blueprint.zone
        );
        let output = self
            .client
            .create_instances()
            .instance_names(instance_name)
            .availability_zone(&blueprint.zone)
            .blueprint_id(&blueprint.blueprint_id)
            .bundle_id(&blueprint.bundle_id)
            .set_user_data(blueprint.user_data.clone())
            .set_key_pair_name(blueprint.key_pair_name.clone())
            .send()
            .await?;
        Ok(operations(output.operations))
    }

    async fn delete_instance(&self, instance_name: &str) -> Result<Vec<Operation>, ApiError> {
        info!("Deleting instance {}", instance_name);
        let output = self
            .client
            .delete_instance()
            .instance_name(instance_name)
            .send()
            .await?;
        Ok(operations(output.operations))
    }

    async fn start_instance(&self, instance_name: &str) -> Result<Vec<Operation>, ApiError> {
        info!("Starting instance {}", instance_name);
        let output = self
            .client
            .start_instance()
            .instance_name(instance_name)
            .send()
            .await?;
        Ok(operations(output.operations))
    }

    async fn stop_instance(&self, instance_name: &str) -> Result<Vec<Operation>, ApiError> {
        info!("Stopping instance {}", instance_name);
        let output = self
            .client
            .stop_instance()
            .instance_name(instance_name)
            .send()
            .await?;
        Ok(operations(output.operations))
    }

    async fn reboot_instance(&self, instance_name: &str) -> Result<Vec<Operation>, ApiError> {
        info!("Rebooting instance {}", instance_name);
        let output = self
            .client
            .reboot_instance()
            .instance_name(instance_name)
            .send()
            .await?;
        Ok(operations(output.operations))
    }

    async fn get_instance(&self, instance_name: &str) -> Result<Option<Instance>, ApiError> {
        debug!("Looking up instance {}", instance_name);
        match self
            .client
            .get_instance()
            .instance_name(instance_name)
            .send()
            .await
        {
            Ok(success) => Ok(success.instance.map(Instance::from)),
            Err(err) => {
                let err = ApiError::from(err);
                if err.is_not_found() {
                    debug!("Instance {} does not exist", instance_name);
                    Ok(None)
                } else {
                    error!("Failed to look up instance {}: {}", instance_name, err);
                    Err(err)
                }
            }
        }
    }

    async fn get_instance_state(&self, instance_name: &str) -> Result<InstanceState, ApiError> {
        let output = self
            .client
            .get_instance_state()
            .instance_name(instance_name)
            .send()
            .await?;
        Ok(output.state.map(InstanceState::from).unwrap_or_default())
    }
}
