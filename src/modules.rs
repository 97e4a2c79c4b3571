//! The resource modules. Each one maps the requested `State` to a single
//! action against Lightsail.

use async_trait::async_trait;

use crate::error::ModuleError;
use crate::types::ModuleResult;

pub mod firewall;
pub mod instance;
pub mod keypair;
pub mod keypair_info;

#[async_trait]
pub trait Module {
    /// Name of the resource the module acts on, used in status lines.
    fn resource_name(&self) -> &str;

    async fn run(&self) -> Result<ModuleResult, ModuleError>;
}
