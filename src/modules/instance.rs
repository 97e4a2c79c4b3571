//! Instance lifecycle: create, delete, start, stop and reboot, with an
//! optional wait until the instance reaches the requested state.

use std::time::Duration;

use async_trait::async_trait;
use derive_builder::Builder;
use lightsail_types::Instance;
use log::{debug, info};
use serde_json::json;

use crate::api::LightsailApi;
use crate::error::ModuleError;
use crate::modules::Module;
use crate::types::{InstanceBlueprint, InstanceBlueprintBuilder, ModuleResult, State};

pub const DEFAULT_WAIT_TIMEOUT: Duration = Duration::from_secs(300);
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(5);

const KIND: &str = "Instance";
const RUNNING: &str = "running";
const STOPPED: &str = "stopped";

#[derive(Builder)]
pub struct InstanceLifecycle<'a> {
    api: &'a dyn LightsailApi,
    #[builder(setter(into))]
    name: String,
    #[builder(default = "State::Present")]
    state: State,
    #[builder(setter(into), default)]
    zone: Option<String>,
    #[builder(setter(into), default)]
    blueprint_id: Option<String>,
    #[builder(setter(into), default)]
    bundle_id: Option<String>,
    #[builder(setter(into), default)]
    user_data: Option<String>,
    #[builder(setter(into), default)]
    key_pair_name: Option<String>,
    #[builder(default = "true")]
    wait: bool,
    #[builder(default = "DEFAULT_WAIT_TIMEOUT")]
    wait_timeout: Duration,
    #[builder(default = "DEFAULT_POLL_INTERVAL")]
    poll_interval: Duration,
}

impl<'a> InstanceLifecycle<'a> {
    fn blueprint(&self) -> Result<InstanceBlueprint, ModuleError> {
        let mut builder = InstanceBlueprintBuilder::default();
        if let Some(zone) = &self.zone {
            builder.zone(zone);
        }
        if let Some(blueprint_id) = &self.blueprint_id {
            builder.blueprint_id(blueprint_id);
        }
        if let Some(bundle_id) = &self.bundle_id {
            builder.bundle_id(bundle_id);
        }
        builder
            .user_data(self.user_data.clone())
            .key_pair_name(self.key_pair_name.clone())
            .build()
            .map_err(|e| {
                ModuleError::InvalidArgument(format!(
                    "zone, blueprint_id and bundle_id are required to create instance {}: {}",
                    self.name, e
                ))
            })
    }

    async fn find(&self) -> Result<Option<Instance>, ModuleError> {
        self.api
            .get_instance(&self.name)
            .await
            .map_err(|e| ModuleError::api(format!("Error finding instance {}", self.name), e))
    }

    async fn require(&self) -> Result<Instance, ModuleError> {
        self.find().await?.ok_or_else(|| ModuleError::NotFound {
            kind: KIND,
            name: self.name.clone(),
        })
    }

    async fn describe(&self, changed: bool) -> Result<ModuleResult, ModuleError> {
        let instance = self.require().await?;
        ModuleResult::new(&self.name, changed).with("instance", &instance)
    }

    async fn poll_until(&self, target: &str) -> Result<(), ModuleError> {
        loop {
            let state = self.api.get_instance_state(&self.name).await.map_err(|e| {
                ModuleError::api(format!("Error getting state of instance {}", self.name), e)
            })?;
            if state.is(target) {
                return Ok(());
            }
            debug!(
                "Instance {} is {}, waiting for {}",
                self.name,
                state.name.as_deref().unwrap_or("unknown"),
                target
            );
            tokio::time::sleep(self.poll_interval).await;
        }
    }

    async fn wait_for(&self, target: &'static str) -> Result<(), ModuleError> {
        if !self.wait {
            return Ok(());
        }
        info!(
            "Waiting up to {}s for instance {} to be {}",
            self.wait_timeout.as_secs(),
            self.name,
            target
        );
        match tokio::time::timeout(self.wait_timeout, self.poll_until(target)).await {
            Ok(result) => result,
            Err(_) => Err(ModuleError::WaitTimeout {
                name: self.name.clone(),
                target,
                seconds: self.wait_timeout.as_secs(),
            }),
        }
    }

    async fn create(&self) -> Result<ModuleResult, ModuleError> {
        if let Some(instance) = self.find().await? {
            debug!("Instance {} already exists", self.name);
            return ModuleResult::new(&self.name, false).with("instance", &instance);
        }
        let blueprint = self.blueprint()?;
        self.api
            .create_instance(&self.name, &blueprint)
            .await
            .map_err(|e| ModuleError::api(format!("Error creating instance {}", self.name), e))?;
        self.wait_for(RUNNING).await?;
        self.describe(true).await
    }

    async fn delete(&self) -> Result<ModuleResult, ModuleError> {
        let Some(instance) = self.find().await? else {
            debug!("Instance {} does not exist", self.name);
            return ModuleResult::new(&self.name, false).with("instance", &json!({}));
        };
        self.api
            .delete_instance(&self.name)
            .await
            .map_err(|e| ModuleError::api(format!("Error deleting instance {}", self.name), e))?;
        ModuleResult::new(&self.name, true).with("instance", &instance)
    }

    async fn start_stop(&self, target: &'static str) -> Result<ModuleResult, ModuleError> {
        let instance = self.require().await?;
        if instance.state.as_ref().is_some_and(|s| s.is(target)) {
            debug!("Instance {} is already {}", self.name, target);
            return ModuleResult::new(&self.name, false).with("instance", &instance);
        }
        let result = if target == RUNNING {
            self.api.start_instance(&self.name).await
        } else {
            self.api.stop_instance(&self.name).await
        };
        result.map_err(|e| {
            ModuleError::api(
                format!("Error changing state of instance {} to {}", self.name, target),
                e,
            )
        })?;
        self.wait_for(target).await?;
        self.describe(true).await
    }

    async fn restart(&self) -> Result<ModuleResult, ModuleError> {
        self.require().await?;
        self.api
            .reboot_instance(&self.name)
            .await
            .map_err(|e| ModuleError::api(format!("Error restarting instance {}", self.name), e))?;
        self.wait_for(RUNNING).await?;
        self.describe(true).await
    }
}

#[async_trait]
impl<'a> Module for InstanceLifecycle<'a> {
    fn resource_name(&self) -> &str {
        &self.name
    }

    async fn run(&self) -> Result<ModuleResult, ModuleError> {
        debug!("Ensuring instance {} is {}", self.name, self.state);
        match self.state {
            State::Present => self.create().await,
            State::Absent => self.delete().await,
            State::Running => self.start_stop(RUNNING).await,
            State::Stopped => self.start_stop(STOPPED).await,
            State::Restarted => self.restart().await,
        }
    }
}
