//! Imports, creates and deletes key pairs.

use async_trait::async_trait;
use derive_builder::Builder;
use log::{debug, info};

use crate::api::LightsailApi;
use crate::error::ModuleError;
use crate::modules::Module;
use crate::types::{ModuleResult, State};

const KIND: &str = "Key pair";

#[derive(Builder)]
pub struct KeyPairs<'a> {
    api: &'a dyn LightsailApi,
    #[builder(setter(into))]
    name: String,
    #[builder(default = "State::Present")]
    state: State,
    /// When set, `present` imports this key instead of generating one.
    #[builder(setter(into), default)]
    public_key_base64: Option<String>,
}

impl<'a> KeyPairs<'a> {
    async fn ensure_absent_before_create(&self) -> Result<(), ModuleError> {
        let existing = self.api.get_key_pair(&self.name).await.map_err(|e| {
            ModuleError::api(format!("Unable to get key pair {}", self.name), e)
        })?;
        match existing {
            Some(_) => Err(ModuleError::AlreadyExists {
                kind: KIND,
                name: self.name.clone(),
            }),
            None => Ok(()),
        }
    }

    async fn import(&self, public_key_base64: &str) -> Result<ModuleResult, ModuleError> {
        self.ensure_absent_before_create().await?;
        let operation = self
            .api
            .import_key_pair(&self.name, public_key_base64)
            .await
            .map_err(|e| ModuleError::api(format!("Unable to import key pair {}", self.name), e))?;
        info!("Imported key pair {}", self.name);
        ModuleResult::new(&self.name, true).with("key_pair", &operation)
    }

    async fn create(&self) -> Result<ModuleResult, ModuleError> {
        self.ensure_absent_before_create().await?;
        let created = self
            .api
            .create_key_pair(&self.name)
            .await
            .map_err(|e| ModuleError::api(format!("Unable to create key pair {}", self.name), e))?;
        info!("Created key pair {}", self.name);
        ModuleResult::new(&self.name, true).with("key_pair", &created)
    }

    async fn delete(&self) -> Result<ModuleResult, ModuleError> {
        let operation = self
            .api
            .delete_key_pair(&self.name)
            .await
            .map_err(|e| ModuleError::api(format!("Unable to delete key pair {}", self.name), e))?;
        info!("Deleted key pair {}", self.name);
        ModuleResult::new(&self.name, true).with("key_pair", &operation)
    }
}

#[async_trait]
impl<'a> Module for KeyPairs<'a> {
    fn resource_name(&self) -> &str {
        &self.name
    }

    async fn run(&self) -> Result<ModuleResult, ModuleError> {
        debug!("Ensuring key pair {} is {}", self.name, self.state);
        match (self.state, &self.public_key_base64) {
            (State::Present, Some(public_key)) => self.import(public_key).await,
            (State::Present, None) => self.create().await,
            (State::Absent, _) => self.delete().await,
            (State::Running | State::Stopped | State::Restarted, _) => {
                Err(ModuleError::UnsupportedState {
                    module: "keypair",
                    state: self.state,
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::{Call, FakeLightsail};
    use crate::error::ApiError;

    fn module<'a>(api: &'a FakeLightsail, state: State, public_key: Option<&str>) -> KeyPairs<'a> {
        KeyPairsBuilder::default()
            .api(api)
            .name("k1")
            .state(state)
            .public_key_base64(public_key.map(String::from))
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn test_import_existing_key_pair_fails() {
        let api = FakeLightsail::new().with_key_pair("k1", "ab:cd");
        let err = module(&api, State::Present, Some("c3NoLXJzYQ=="))
            .run()
            .await
            .unwrap_err();
        assert!(err.to_string().contains("k1"));
        assert!(matches!(err, ModuleError::AlreadyExists { .. }));
        assert!(!api
            .calls()
            .iter()
            .any(|c| matches!(c, Call::ImportKeyPair { .. })));
    }

    #[tokio::test]
    async fn test_import_new_key_pair() {
        let api = FakeLightsail::new();
        let result = module(&api, State::Present, Some("c3NoLXJzYQ=="))
            .run()
            .await
            .unwrap();
        assert!(result.changed);
        let imports: Vec<Call> = api
            .calls()
            .into_iter()
            .filter(|c| matches!(c, Call::ImportKeyPair { .. }))
            .collect();
        assert_eq!(
            imports,
            vec![Call::ImportKeyPair {
                name: "k1".to_string(),
                public_key_base64: "c3NoLXJzYQ==".to_string(),
            }]
        );
    }

    #[tokio::test]
    async fn test_lookup_failure_stops_import() {
        let api = FakeLightsail::new().failing(
            "get_key_pair",
            ApiError::new("AccessDeniedException", "not authorized"),
        );
        let err = module(&api, State::Present, Some("c3NoLXJzYQ=="))
            .run()
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Unable to get key pair k1"));
        assert_eq!(
            api.calls(),
            vec![Call::GetKeyPair {
                name: "k1".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn test_create_key_pair_returns_key_material() {
        let api = FakeLightsail::new();
        let result = module(&api, State::Present, None).run().await.unwrap();
        assert!(result.changed);
        let key_pair = result.get("key_pair").unwrap();
        assert_eq!(key_pair["key_pair"]["name"], "k1");
        assert!(key_pair["private_key_base64"].is_string());
        assert!(api.calls().contains(&Call::CreateKeyPair {
            name: "k1".to_string()
        }));
    }

    #[tokio::test]
    async fn test_create_existing_key_pair_fails() {
        let api = FakeLightsail::new().with_key_pair("k1", "ab:cd");
        let err = module(&api, State::Present, None).run().await.unwrap_err();
        assert_eq!(err.to_string(), "Key pair with name k1 already exists");
    }

    #[tokio::test]
    async fn test_delete_key_pair() {
        let api = FakeLightsail::new().with_key_pair("k1", "ab:cd");
        let result = module(&api, State::Absent, None).run().await.unwrap();
        assert!(result.changed);
        assert_eq!(
            api.calls(),
            vec![Call::DeleteKeyPair {
                name: "k1".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn test_delete_failure_surfaces_message() {
        let api = FakeLightsail::new().failing(
            "delete_key_pair",
            ApiError::new("InvalidInputException", "key pair k1 is in use"),
        );
        let err = module(&api, State::Absent, None).run().await.unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("Unable to delete key pair k1"));
        assert!(msg.contains("key pair k1 is in use"));
    }

    #[tokio::test]
    async fn test_instance_states_are_rejected() {
        let api = FakeLightsail::new();
        for state in [State::Running, State::Stopped, State::Restarted] {
            let err = module(&api, state, None).run().await.unwrap_err();
            assert!(err.to_string().contains("not supported by the keypair module"));
        }
        assert!(api.calls().is_empty());
    }
}
