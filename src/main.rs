//! This program manages AWS Lightsail resources: instances, key pairs and the
//! public ports of an instance firewall. Every subcommand drives one resource
//! towards the requested state and prints whether anything changed, together
//! with the service's answer.

mod api;
mod aws;
mod error;
mod modules;
mod snake;
mod types;

use std::process::exit;
use std::time::Duration;

use clap::{ArgAction, Args, Parser, Subcommand};
use log::{debug, error};

use crate::api::lightsail::LightsailClient;
use crate::api::LightsailApi;
use crate::aws::AwsArgs;
use crate::error::ModuleError;
use crate::modules::firewall::FirewallPortsBuilder;
use crate::modules::instance::{InstanceLifecycleBuilder, DEFAULT_WAIT_TIMEOUT};
use crate::modules::keypair::KeyPairsBuilder;
use crate::modules::keypair_info::KeyPairListingBuilder;
use crate::modules::Module;
use crate::types::{failure_json, failure_line, ModuleResult, PortRuleBuilder, Protocol, State};

#[derive(Clone, Debug, PartialEq, clap::ValueEnum)]
enum OutputFormat {
    Json,
    Pretty,
}

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Manages AWS Lightsail instances, key pairs and firewall ports.",
    long_about = "Manages AWS Lightsail instances, key pairs and firewall ports. AWS credentials are read from the usual environment variables and shared config files unless given explicitly."
)]
struct Options {
    #[command(flatten)]
    aws: AwsArgs,
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity,
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open or close public ports on an instance
    Firewall(FirewallArgs),
    /// Import, create or delete a key pair
    Keypair(KeyPairArgs),
    /// List key pairs
    KeypairInfo(KeyPairInfoArgs),
    /// Create, delete, start, stop or reboot an instance
    Instance(InstanceArgs),
}

#[derive(Args, Debug)]
struct FirewallArgs {
    /// Instance whose firewall is changed.
    #[arg(long)]
    name: String,
    #[arg(long, value_enum, default_value_t = State::Present)]
    state: State,
    #[arg(long, value_enum)]
    protocol: Protocol,
    #[arg(long, allow_negative_numbers = true)]
    from_port: i32,
    #[arg(long, allow_negative_numbers = true)]
    to_port: i32,
}

#[derive(Args, Debug)]
struct KeyPairArgs {
    #[arg(long, alias = "key-pair-name")]
    name: String,
    #[arg(long, value_enum, default_value_t = State::Present)]
    state: State,
    /// Public key to import. Without it a new key pair is generated.
    #[arg(long)]
    public_key_base64: Option<String>,
}

#[derive(Args, Debug)]
struct KeyPairInfoArgs {
    #[arg(long)]
    page_token: Option<String>,
}

#[derive(Args, Debug)]
struct InstanceArgs {
    #[arg(long)]
    name: String,
    #[arg(long, value_enum, default_value_t = State::Present)]
    state: State,
    /// Availability zone, required to create the instance.
    #[arg(long)]
    zone: Option<String>,
    /// Image of the instance, required to create the instance.
    #[arg(long)]
    blueprint_id: Option<String>,
    /// Size of the instance, required to create the instance.
    #[arg(long)]
    bundle_id: Option<String>,
    /// Launch script run on first boot.
    #[arg(long)]
    user_data: Option<String>,
    #[arg(long)]
    key_pair_name: Option<String>,
    /// Wait for the instance to reach the requested state.
    #[arg(long, default_value_t = true, action = ArgAction::Set)]
    wait: bool,
    /// Seconds to wait before giving up.
    #[arg(long, default_value_t = DEFAULT_WAIT_TIMEOUT.as_secs())]
    wait_timeout: u64,
}

impl Command {
    fn resource_name(&self) -> &str {
        match self {
            Command::Firewall(args) => &args.name,
            Command::Keypair(args) => &args.name,
            Command::KeypairInfo(_) => "key pairs",
            Command::Instance(args) => &args.name,
        }
    }

    fn build<'a>(&self, api: &'a dyn LightsailApi) -> Result<Box<dyn Module + 'a>, ModuleError> {
        let invalid = |e: &dyn std::fmt::Display| ModuleError::InvalidArgument(e.to_string());
        let module: Box<dyn Module + 'a> = match self {
            Command::Firewall(args) => {
                let rule = PortRuleBuilder::default()
                    .protocol(args.protocol)
                    .from_port(args.from_port)
                    .to_port(args.to_port)
                    .build()
                    .map_err(|e| invalid(&e))?;
                Box::new(
                    FirewallPortsBuilder::default()
                        .api(api)
                        .instance_name(&args.name)
                        .rule(rule)
                        .state(args.state)
                        .build()
                        .map_err(|e| invalid(&e))?,
                )
            }
            Command::Keypair(args) => Box::new(
                KeyPairsBuilder::default()
                    .api(api)
                    .name(&args.name)
                    .state(args.state)
                    .public_key_base64(args.public_key_base64.clone())
                    .build()
                    .map_err(|e| invalid(&e))?,
            ),
            Command::KeypairInfo(args) => Box::new(
                KeyPairListingBuilder::default()
                    .api(api)
                    .page_token(args.page_token.clone())
                    .build()
                    .map_err(|e| invalid(&e))?,
            ),
            Command::Instance(args) => Box::new(
                InstanceLifecycleBuilder::default()
                    .api(api)
                    .name(&args.name)
                    .state(args.state)
                    .zone(args.zone.clone())
                    .blueprint_id(args.blueprint_id.clone())
                    .bundle_id(args.bundle_id.clone())
                    .user_data(args.user_data.clone())
                    .key_pair_name(args.key_pair_name.clone())
                    .wait(args.wait)
                    .wait_timeout(Duration::from_secs(args.wait_timeout))
                    .build()
                    .map_err(|e| invalid(&e))?,
            ),
        };
        Ok(module)
    }
}

async fn run(options: &Options) -> Result<ModuleResult, ModuleError> {
    let config = aws::aws_setup(&options.aws).await?;
    let client = LightsailClient::new(&config);
    let module = options.command.build(&client)?;
    module.run().await
}

#[tokio::main]
async fn main() {
    let options = Options::parse();
    env_logger::Builder::new()
        .filter_level(options.verbose.log_level_filter())
        .init();
    debug!("Running {:?}", options.command);

    let name = options.command.resource_name();
    match run(&options).await {
        Ok(result) => match options.format {
            OutputFormat::Json => println!("{}", result.to_json()),
            OutputFormat::Pretty => println!("{}", result),
        },
        Err(err) => {
            error!("{}", err);
            match options.format {
                OutputFormat::Json => println!("{}", failure_json(&err)),
                OutputFormat::Pretty => println!("{}", failure_line(name, &err)),
            }
            exit(1);
        }
    }
}
