use colored::Colorize;
use derive_builder::Builder;
use serde::Serialize;
use serde_json::{json, Map, Value};
use std::fmt::Display;

use crate::error::ModuleError;
use crate::snake::camel_dict_to_snake_dict;

/// Desired state of the resource a module manages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum State {
    Present,
    Absent,
    Running,
    Stopped,
    Restarted,
}

impl State {
    pub fn as_str(&self) -> &'static str {
        match self {
            State::Present => "present",
            State::Absent => "absent",
            State::Running => "running",
            State::Stopped => "stopped",
            State::Restarted => "restarted",
        }
    }
}

impl Display for State {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Protocol {
    Tcp,
    Udp,
    All,
    Icmp,
    Icmpv6,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Tcp => "tcp",
            Protocol::Udp => "udp",
            Protocol::All => "all",
            Protocol::Icmp => "icmp",
            Protocol::Icmpv6 => "icmpv6",
        }
    }

    // ICMP rules carry type and code in the port fields instead of a range.
    fn is_port_range(&self) -> bool {
        !matches!(self, Protocol::Icmp | Protocol::Icmpv6)
    }
}

/// A public port rule on an instance firewall.
#[derive(Clone, Debug, PartialEq, Builder)]
#[builder(build_fn(validate = "Self::validate"))]
pub struct PortRule {
    pub protocol: Protocol,
    pub from_port: i32,
    pub to_port: i32,
}

impl PortRuleBuilder {
    fn validate(&self) -> Result<(), String> {
        for port in [self.from_port, self.to_port].into_iter().flatten() {
            if !(-1..=65535).contains(&port) {
                return Err(format!("port {} is outside of the range -1 to 65535", port));
            }
        }
        if let (Some(protocol), Some(from_port), Some(to_port)) =
            (self.protocol, self.from_port, self.to_port)
        {
            if protocol.is_port_range() && from_port > to_port {
                return Err(format!(
                    "from_port {} is greater than to_port {}",
                    from_port, to_port
                ));
            }
        }
        Ok(())
    }
}

/// Parameters required to launch a new instance.
#[derive(Clone, Debug, PartialEq, Builder)]
#[builder(setter(into))]
pub struct InstanceBlueprint {
    pub zone: String,
    pub blueprint_id: String,
    pub bundle_id: String,
    #[builder(default)]
    pub user_data: Option<String>,
    #[builder(default)]
    pub key_pair_name: Option<String>,
}

/// Outcome of a single module run. Every payload is stored with snake_case
/// keys, ready to be printed.
#[derive(Clone, Debug, PartialEq)]
pub struct ModuleResult {
    pub name: String,
    pub changed: bool,
    pub fields: Map<String, Value>,
}

impl ModuleResult {
    pub fn new(name: impl Into<String>, changed: bool) -> Self {
        ModuleResult {
            name: name.into(),
            changed,
            fields: Map::new(),
        }
    }

    pub fn with<T: Serialize>(mut self, key: &str, payload: &T) -> Result<Self, ModuleError> {
        let value = serde_json::to_value(payload)?;
        self.fields
            .insert(key.to_string(), camel_dict_to_snake_dict(value));
        Ok(self)
    }

    #[cfg(test)]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn to_json(&self) -> Value {
        let mut result = Map::new();
        result.insert("changed".to_string(), Value::Bool(self.changed));
        result.extend(self.fields.clone());
        Value::Object(result)
    }
}

impl Display for ModuleResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let status = if self.changed {
            format!("changed: [{}]", self.name).yellow()
        } else {
            format!("ok: [{}]", self.name).green()
        };
        let body = serde_json::to_string_pretty(&self.to_json()).map_err(|_| std::fmt::Error)?;
        write!(f, "{}\n{}", status, body)
    }
}

/// The document printed when a module fails. `exception` holds the whole
/// error chain for diagnostics.
pub fn failure_json(err: &ModuleError) -> Value {
    json!({
        "failed": true,
        "changed": false,
        "msg": err.to_string(),
        "exception": format!("{:?}", err),
    })
}

pub fn failure_line(name: &str, err: &ModuleError) -> String {
    format!("failed: [{}] => {}", name, err).red().to_string()
}
