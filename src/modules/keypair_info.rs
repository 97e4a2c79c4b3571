use async_trait::async_trait;
use derive_builder::Builder;
use log::debug;

use crate::api::LightsailApi;
use crate::error::ModuleError;
use crate::modules::Module;
use crate::types::ModuleResult;

/// Lists one page of key pairs. Never changes anything.
#[derive(Builder)]
pub struct KeyPairListing<'a> {
    api: &'a dyn LightsailApi,
    #[builder(setter(into), default)]
    page_token: Option<String>,
}

#[async_trait]
impl<'a> Module for KeyPairListing<'a> {
    fn resource_name(&self) -> &str {
        "key pairs"
    }

    async fn run(&self) -> Result<ModuleResult, ModuleError> {
        let page = self
            .api
            .get_key_pairs(self.page_token.as_deref())
            .await
            .map_err(|e| {
                ModuleError::api(
                    format!(
                        "Unable to list key pairs from page {}",
                        self.page_token.as_deref().unwrap_or("<first>")
                    ),
                    e,
                )
            })?;
        debug!("Found {} key pairs", page.key_pairs.len());
        let mut result =
            ModuleResult::new(self.resource_name(), false).with("key_pairs", &page.key_pairs)?;
        if let Some(token) = &page.next_page_token {
            result = result.with("next_page_token", token)?;
        }
        Ok(result)
    }
}
