//! Opens or closes a public port range on an instance firewall.
//!
//! No lookup of the current firewall happens first: every successful call
//! reports a change.

use async_trait::async_trait;
use derive_builder::Builder;
use log::{error, info};

use crate::api::LightsailApi;
use crate::error::ModuleError;
use crate::modules::Module;
use crate::types::{ModuleResult, PortRule, State};

#[derive(Builder)]
pub struct FirewallPorts<'a> {
    api: &'a dyn LightsailApi,
    #[builder(setter(into))]
    instance_name: String,
    rule: PortRule,
    #[builder(default = "State::Present")]
    state: State,
}

impl<'a> FirewallPorts<'a> {
    async fn open(&self) -> Result<ModuleResult, ModuleError> {
        let operation = self
            .api
            .open_instance_public_ports(&self.instance_name, &self.rule)
            .await
            .map_err(|e| {
                error!("Failed to open ports: {}", e);
                ModuleError::api(
                    format!("Error opening ports for instance {}", self.instance_name),
                    e,
                )
            })?;
        ModuleResult::new(&self.instance_name, true).with("operation", &operation)
    }

    async fn close(&self) -> Result<ModuleResult, ModuleError> {
        let operation = self
            .api
            .close_instance_public_ports(&self.instance_name, &self.rule)
            .await
            .map_err(|e| {
                error!("Failed to close ports: {}", e);
                ModuleError::api(
                    format!("Error closing ports for instance {}", self.instance_name),
                    e,
                )
            })?;
        ModuleResult::new(&self.instance_name, true).with("operation", &operation)
    }
}

#[async_trait]
impl<'a> Module for FirewallPorts<'a> {
    fn resource_name(&self) -> &str {
        &self.instance_name
    }

    async fn run(&self) -> Result<ModuleResult, ModuleError> {
        info!(
            "Ensuring {} ports {}-{} are {} on {}",
            self.rule.protocol.as_str(),
            self.rule.from_port,
            self.rule.to_port,
            self.state,
            self.instance_name
        );
        match self.state {
            State::Present => self.open().await,
            State::Absent => self.close().await,
            State::Running | State::Stopped | State::Restarted => {
                Err(ModuleError::UnsupportedState {
                    module: "firewall",
                    state: self.state,
                })
            }
        }
    }
}
