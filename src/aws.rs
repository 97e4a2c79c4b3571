use aws_config::meta::region::RegionProviderChain;
use aws_config::profile::ProfileFileRegionProvider;
use aws_config::BehaviorVersion;
use aws_config::SdkConfig;
use aws_sdk_lightsail::config::{Credentials, Region};
use headers::Authorization;
use hyper::client::HttpConnector;
use hyper::Uri;
use hyper_proxy::{Intercept, Proxy, ProxyConnector};
use log::debug;
use log::error;
use url::Url;

use crate::error::ModuleError;

const CREDENTIALS_PROVIDER: &str = "lightsail-cli";

/// Connection parameters shared by every module.
#[derive(clap::Args, Clone, Debug, Default)]
pub struct AwsArgs {
    /// AWS region, falls back to the environment and the shared config.
    #[arg(long, global = true)]
    pub region: Option<String>,
    /// Named profile from the shared AWS config.
    #[arg(long, global = true)]
    pub profile: Option<String>,
    /// Alternative Lightsail endpoint.
    #[arg(long, global = true)]
    pub endpoint_url: Option<String>,
    #[arg(long, global = true, requires = "aws_secret_key")]
    pub aws_access_key: Option<String>,
    #[arg(long, global = true, requires = "aws_access_key")]
    pub aws_secret_key: Option<String>,
    #[arg(long, global = true)]
    pub security_token: Option<String>,
}

impl AwsArgs {
    fn static_credentials(&self) -> Result<Option<Credentials>, ModuleError> {
        match (&self.aws_access_key, &self.aws_secret_key) {
            (Some(access_key), Some(secret_key)) => Ok(Some(Credentials::new(
                access_key,
                secret_key,
                self.security_token.clone(),
                None,
                CREDENTIALS_PROVIDER,
            ))),
            (None, None) if self.security_token.is_some() => Err(ModuleError::Config(
                "security_token requires aws_access_key and aws_secret_key".to_string(),
            )),
            (None, None) => Ok(None),
            _ => Err(ModuleError::Config(
                "aws_access_key and aws_secret_key must be given together".to_string(),
            )),
        }
    }
}

/// Returns `ProxyConnector<HttpConnector>` if env. variable 'https_proxy' is set
pub fn determine_proxy() -> Option<ProxyConnector<HttpConnector>> {
    let raw = std::env::var("HTTPS_PROXY")
        .or_else(|_v| std::env::var("https_proxy"))
        .ok()?;
    let proxy_url: Url = raw.parse().ok()?;
    let mut proxy_uri: Uri = raw.parse().ok()?;
    if proxy_uri.scheme().is_none() {
        error!("Configured proxy did not specify a scheme - falling back to HTTP.");
        proxy_uri = format!("http://{}", raw).parse().ok()?;
    }
    let mut proxy = Proxy::new(Intercept::All, proxy_uri);

    if let Some(password) = proxy_url.password() {
        proxy.set_authorization(Authorization::basic(proxy_url.username(), password));
    }

    let connector = HttpConnector::new();
    match ProxyConnector::from_proxy(connector, proxy) {
        Ok(connector) => Some(connector),
        Err(err) => {
            error!("Could not set up the configured proxy, connecting directly: {}", err);
            None
        }
    }
}

/// Region from `--region`, then the region of `--profile`, then the default
/// provider chain.
async fn resolve_region(args: &AwsArgs) -> Result<Region, ModuleError> {
    let mut region_provider = RegionProviderChain::first_try(args.region.clone().map(Region::new));
    if let Some(profile) = &args.profile {
        region_provider = region_provider.or_else(
            ProfileFileRegionProvider::builder()
                .profile_name(profile)
                .build(),
        );
    }
    region_provider
        .or_default_provider()
        .region()
        .await
        .ok_or(ModuleError::MissingRegion)
}

/// Builds the SdkConfig for the Lightsail client, with a proxy if needed.
/// Fails when no region can be determined.
pub async fn aws_setup(args: &AwsArgs) -> Result<SdkConfig, ModuleError> {
    let region = resolve_region(args).await?;
    debug!("Using region: {}", region);

    let mut loader = aws_config::defaults(BehaviorVersion::latest()).region(region);
    if let Some(profile) = &args.profile {
        debug!("Using profile: {}", profile);
        loader = loader.profile_name(profile);
    }
    if let Some(endpoint) = &args.endpoint_url {
        debug!("Using endpoint: {}", endpoint);
        loader = loader.endpoint_url(endpoint);
    }
    if let Some(credentials) = args.static_credentials()? {
        debug!("Using static credentials");
        loader = loader.credentials_provider(credentials);
    }

    let config = if let Some(proxy) = determine_proxy() {
        debug!("Using proxy");
        let client =
            aws_smithy_runtime::client::http::hyper_014::HyperClientBuilder::new().build(proxy);
        loader
            .load()
            .await
            .into_builder()
            .http_client(client)
            .build()
    } else {
        debug!("Not using a proxy");
        loader.load().await
    };
    Ok(config)
}
