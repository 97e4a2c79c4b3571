//! In-memory Lightsail used by the module tests. Records every call and keeps
//! a small store of key pairs and instances.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use lightsail_types::{CreatedKeyPair, Instance, InstanceState, KeyPair, KeyPairPage, Operation};

use crate::api::LightsailApi;
use crate::error::ApiError;
use crate::types::{InstanceBlueprint, PortRule};

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    OpenPorts { instance_name: String, rule: PortRule },
    ClosePorts { instance_name: String, rule: PortRule },
    ImportKeyPair { name: String, public_key_base64: String },
    CreateKeyPair { name: String },
    GetKeyPair { name: String },
    GetKeyPairs { page_token: Option<String> },
    DeleteKeyPair { name: String },
    CreateInstance { name: String, blueprint: InstanceBlueprint },
    DeleteInstance { name: String },
    StartInstance { name: String },
    StopInstance { name: String },
    RebootInstance { name: String },
    GetInstance { name: String },
    GetInstanceState { name: String },
}

#[derive(Default)]
pub struct FakeLightsail {
    calls: Mutex<Vec<Call>>,
    key_pairs: Mutex<HashMap<String, KeyPair>>,
    instances: Mutex<HashMap<String, Instance>>,
    // Answers for successive state polls; the last entry repeats.
    state_script: Mutex<VecDeque<String>>,
    failures: Mutex<HashMap<&'static str, ApiError>>,
}

fn state(name: &str) -> InstanceState {
    InstanceState {
        code: None,
        name: Some(name.to_string()),
    }
}

fn operation(resource_name: &str, operation_type: &str) -> Operation {
    Operation {
        id: Some(format!("op-{}", resource_name)),
        resource_name: Some(resource_name.to_string()),
        operation_type: Some(operation_type.to_string()),
        status: Some("Succeeded".to_string()),
        is_terminal: Some(true),
        ..Default::default()
    }
}

impl FakeLightsail {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_key_pair(self, name: &str, fingerprint: &str) -> Self {
        self.key_pairs.lock().unwrap().insert(
            name.to_string(),
            KeyPair {
                name: name.to_string(),
                fingerprint: Some(fingerprint.to_string()),
                ..Default::default()
            },
        );
        self
    }

    pub fn with_instance(self, name: &str, status: &str) -> Self {
        self.instances.lock().unwrap().insert(
            name.to_string(),
            Instance {
                name: name.to_string(),
                public_ip_address: Some("34.207.152.202".to_string()),
                state: Some(state(status)),
                ..Default::default()
            },
        );
        self
    }

    pub fn with_state_sequence(self, states: &[&str]) -> Self {
        self.state_script
            .lock()
            .unwrap()
            .extend(states.iter().map(|s| s.to_string()));
        self
    }

    /// Makes every call of `operation` fail with `err`.
    pub fn failing(self, operation: &'static str, err: ApiError) -> Self {
        self.failures.lock().unwrap().insert(operation, err);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, operation: &'static str, call: Call) -> Result<(), ApiError> {
        self.calls.lock().unwrap().push(call);
        match self.failures.lock().unwrap().get(operation) {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    fn require_instance(&self, name: &str) -> Result<(), ApiError> {
        if self.instances.lock().unwrap().contains_key(name) {
            Ok(())
        } else {
            Err(ApiError::not_found(format!("The Instance does not exist: {}", name)))
        }
    }
}

#[async_trait]
impl LightsailApi for FakeLightsail {
    async fn open_instance_public_ports(
        &self,
        instance_name: &str,
        rule: &PortRule,
    ) -> Result<Operation, ApiError> {
        self.record(
            "open_instance_public_ports",
            Call::OpenPorts {
                instance_name: instance_name.to_string(),
                rule: rule.clone(),
            },
        )?;
        Ok(operation(instance_name, "OpenInstancePublicPorts"))
    }

    async fn close_instance_public_ports(
        &self,
        instance_name: &str,
        rule: &PortRule,
    ) -> Result<Operation, ApiError> {
        self.record(
            "close_instance_public_ports",
            Call::ClosePorts {
                instance_name: instance_name.to_string(),
                rule: rule.clone(),
            },
        )?;
        Ok(operation(instance_name, "CloseInstancePublicPorts"))
    }

    async fn import_key_pair(
        &self,
        key_pair_name: &str,
        public_key_base64: &str,
    ) -> Result<Operation, ApiError> {
        self.record(
            "import_key_pair",
            Call::ImportKeyPair {
                name: key_pair_name.to_string(),
                public_key_base64: public_key_base64.to_string(),
            },
        )?;
        self.key_pairs.lock().unwrap().insert(
            key_pair_name.to_string(),
            KeyPair {
                name: key_pair_name.to_string(),
                ..Default::default()
            },
        );
        Ok(operation(key_pair_name, "ImportKeyPair"))
    }

    async fn create_key_pair(&self, key_pair_name: &str) -> Result<CreatedKeyPair, ApiError> {
        self.record(
            "create_key_pair",
            Call::CreateKeyPair {
                name: key_pair_name.to_string(),
            },
        )?;
        let key_pair = KeyPair {
            name: key_pair_name.to_string(),
            fingerprint: Some("12:34".to_string()),
            ..Default::default()
        };
        self.key_pairs
            .lock()
            .unwrap()
            .insert(key_pair_name.to_string(), key_pair.clone());
        Ok(CreatedKeyPair {
            key_pair,
            public_key_base64: Some("c3NoLXJzYSBBQUFB".to_string()),
            private_key_base64: Some("LS0tLS1CRUdJTg==".to_string()),
            operation: Some(operation(key_pair_name, "CreateKeyPair")),
        })
    }

    async fn get_key_pair(&self, key_pair_name: &str) -> Result<Option<KeyPair>, ApiError> {
        self.record(
            "get_key_pair",
            Call::GetKeyPair {
                name: key_pair_name.to_string(),
            },
        )?;
        Ok(self.key_pairs.lock().unwrap().get(key_pair_name).cloned())
    }

    async fn get_key_pairs(&self, page_token: Option<&str>) -> Result<KeyPairPage, ApiError> {
        self.record(
            "get_key_pairs",
            Call::GetKeyPairs {
                page_token: page_token.map(String::from),
            },
        )?;
        let mut key_pairs: Vec<KeyPair> = self.key_pairs.lock().unwrap().values().cloned().collect();
        key_pairs.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(KeyPairPage {
            key_pairs,
            next_page_token: None,
        })
    }

    async fn delete_key_pair(&self, key_pair_name: &str) -> Result<Operation, ApiError> {
        self.record(
            "delete_key_pair",
            Call::DeleteKeyPair {
                name: key_pair_name.to_string(),
            },
        )?;
        self.key_pairs.lock().unwrap().remove(key_pair_name);
        Ok(operation(key_pair_name, "DeleteKeyPair"))
    }

    async fn create_instance(
        &self,
        instance_name: &str,
        blueprint: &InstanceBlueprint,
    ) -> Result<Vec<Operation>, ApiError> {
        self.record(
            "create_instance",
            Call::CreateInstance {
                name: instance_name.to_string(),
                blueprint: blueprint.clone(),
            },
        )?;
        self.instances.lock().unwrap().insert(
            instance_name.to_string(),
            Instance {
                name: instance_name.to_string(),
                blueprint_id: Some(blueprint.blueprint_id.clone()),
                bundle_id: Some(blueprint.bundle_id.clone()),
                ssh_key_name: blueprint.key_pair_name.clone(),
                state: Some(state("pending")),
                ..Default::default()
            },
        );
        Ok(vec![operation(instance_name, "CreateInstance")])
    }

    async fn delete_instance(&self, instance_name: &str) -> Result<Vec<Operation>, ApiError> {
        self.record(
            "delete_instance",
            Call::DeleteInstance {
                name: instance_name.to_string(),
            },
        )?;
        self.require_instance(instance_name)?;
        self.instances.lock().unwrap().remove(instance_name);
        Ok(vec![operation(instance_name, "DeleteInstance")])
    }

    async fn start_instance(&self, instance_name: &str) -> Result<Vec<Operation>, ApiError> {
        self.record(
            "start_instance",
            Call::StartInstance {
                name: instance_name.to_string(),
            },
        )?;
        self.require_instance(instance_name)?;
        Ok(vec![operation(instance_name, "StartInstance")])
    }

    async fn stop_instance(&self, instance_name: &str) -> Result<Vec<Operation>, ApiError> {
        self.record(
            "stop_instance",
            Call::StopInstance {
                name: instance_name.to_string(),
            },
        )?;
        self.require_instance(instance_name)?;
        Ok(vec![operation(instance_name, "StopInstance")])
    }

    async fn reboot_instance(&self, instance_name: &str) -> Result<Vec<Operation>, ApiError> {
        self.record(
            "reboot_instance",
            Call::RebootInstance {
                name: instance_name.to_string(),
            },
        )?;
        self.require_instance(instance_name)?;
        Ok(vec![operation(instance_name, "RebootInstance")])
    }

    async fn get_instance(&self, instance_name: &str) -> Result<Option<Instance>, ApiError> {
        self.record(
            "get_instance",
            Call::GetInstance {
                name: instance_name.to_string(),
            },
        )?;
        Ok(self.instances.lock().unwrap().get(instance_name).cloned())
    }

    async fn get_instance_state(&self, instance_name: &str) -> Result<InstanceState, ApiError> {
        self.record(
            "get_instance_state",
            Call::GetInstanceState {
                name: instance_name.to_string(),
            },
        )?;
        self.require_instance(instance_name)?;
        let scripted = {
            let mut script = self.state_script.lock().unwrap();
            if script.len() > 1 {
                script.pop_front()
            } else {
                script.front().cloned()
            }
        };
        let mut instances = self.instances.lock().unwrap();
        let instance = instances
            .get_mut(instance_name)
            .ok_or_else(|| ApiError::not_found(instance_name))?;
        if let Some(name) = scripted {
            instance.state = Some(state(&name));
        }
        Ok(instance.state.clone().unwrap_or_default())
    }
}
