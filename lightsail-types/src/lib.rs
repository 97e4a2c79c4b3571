//! Plain data types for the Lightsail resources handled by the modules.
//!
//! The SDK types do not implement `Serialize`, so every response is converted
//! into one of these types first. Field names serialize in camelCase, the same
//! way the Lightsail API documents them.

use aws_sdk_lightsail::primitives::{DateTime, DateTimeFormat};
use serde::Serialize;

fn timestamp(value: Option<DateTime>) -> Option<String> {
    value.and_then(|t| t.fmt(DateTimeFormat::DateTime).ok())
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    pub key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl From<aws_sdk_lightsail::types::Tag> for Tag {
    fn from(value: aws_sdk_lightsail::types::Tag) -> Self {
        Self {
            key: value.key,
            value: value.value,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResourceLocation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub availability_zone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub region_name: Option<String>,
}

impl From<aws_sdk_lightsail::types::ResourceLocation> for ResourceLocation {
    fn from(value: aws_sdk_lightsail::types::ResourceLocation) -> Self {
        Self {
            availability_zone: value.availability_zone,
            region_name: value.region_name.map(|r| r.as_str().to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyPair {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub support_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<ResourceLocation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
}

impl From<aws_sdk_lightsail::types::KeyPair> for KeyPair {
    fn from(value: aws_sdk_lightsail::types::KeyPair) -> Self {
        Self {
            name: value.name.unwrap_or_default(),
            arn: value.arn,
            support_code: value.support_code,
            created_at: timestamp(value.created_at),
            location: value.location.map(ResourceLocation::from),
            resource_type: value.resource_type.map(|r| r.as_str().to_string()),
            tags: value
                .tags
                .unwrap_or_default()
                .into_iter()
                .map(Tag::from)
                .collect(),
            fingerprint: value.fingerprint,
        }
    }
}

/// A key pair generated by Lightsail. The private key is only ever returned
/// by the create call.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedKeyPair {
    pub key_pair: KeyPair,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_key_base64: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_key_base64: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation: Option<Operation>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyPairPage {
    pub key_pairs: Vec<KeyPair>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_page_token: Option<String>,
}

/// Asynchronous request record returned by every mutating Lightsail call.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<ResourceLocation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_terminal: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_changed_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_details: Option<String>,
}

impl From<aws_sdk_lightsail::types::Operation> for Operation {
    fn from(value: aws_sdk_lightsail::types::Operation) -> Self {
        Self {
            id: value.id,
            resource_name: value.resource_name,
            resource_type: value.resource_type.map(|r| r.as_str().to_string()),
            created_at: timestamp(value.created_at),
            location: value.location.map(ResourceLocation::from),
            is_terminal: value.is_terminal.into(),
            operation_details: value.operation_details,
            operation_type: value.operation_type.map(|o| o.as_str().to_string()),
            status: value.status.map(|s| s.as_str().to_string()),
            status_changed_at: timestamp(value.status_changed_at),
            error_code: value.error_code,
            error_details: value.error_details,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceState {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl InstanceState {
    pub fn is(&self, name: &str) -> bool {
        self.name.as_deref() == Some(name)
    }
}

impl From<aws_sdk_lightsail::types::InstanceState> for InstanceState {
    fn from(value: aws_sdk_lightsail::types::InstanceState) -> Self {
        Self {
            code: value.code.into(),
            name: value.name,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceHardware {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cpu_count: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ram_size_in_gb: Option<f32>,
}

impl From<aws_sdk_lightsail::types::InstanceHardware> for InstanceHardware {
    fn from(value: aws_sdk_lightsail::types::InstanceHardware) -> Self {
        Self {
            cpu_count: value.cpu_count.into(),
            ram_size_in_gb: value.ram_size_in_gb.into(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyTransfer {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gb_per_month_allocated: Option<i32>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstancePort {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_port: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub to_port: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub common_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_direction: Option<String>,
}

impl From<aws_sdk_lightsail::types::InstancePortInfo> for InstancePort {
    fn from(value: aws_sdk_lightsail::types::InstancePortInfo) -> Self {
        Self {
            from_port: value.from_port.into(),
            to_port: value.to_port.into(),
            protocol: value.protocol.map(|p| p.as_str().to_string()),
            access_from: value.access_from,
            access_type: value.access_type.map(|a| a.as_str().to_string()),
            common_name: value.common_name,
            access_direction: value.access_direction.map(|a| a.as_str().to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceNetworking {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub monthly_transfer: Option<MonthlyTransfer>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub ports: Vec<InstancePort>,
}

impl From<aws_sdk_lightsail::types::InstanceNetworking> for InstanceNetworking {
    fn from(value: aws_sdk_lightsail::types::InstanceNetworking) -> Self {
        Self {
            monthly_transfer: value.monthly_transfer.map(|m| MonthlyTransfer {
                gb_per_month_allocated: m.gb_per_month_allocated.into(),
            }),
            ports: value
                .ports
                .unwrap_or_default()
                .into_iter()
                .map(InstancePort::from)
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Instance {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub arn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub support_code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<ResourceLocation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blueprint_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blueprint_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bundle_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_static_ip: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub private_ip_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_ip_address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hardware: Option<InstanceHardware>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub networking: Option<InstanceNetworking>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<InstanceState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ssh_key_name: Option<String>,
}

impl From<aws_sdk_lightsail::types::Instance> for Instance {
    fn from(value: aws_sdk_lightsail::types::Instance) -> Self {
        Self {
            name: value.name.unwrap_or_default(),
            arn: value.arn,
            support_code: value.support_code,
            created_at: timestamp(value.created_at),
            location: value.location.map(ResourceLocation::from),
            resource_type: value.resource_type.map(|r| r.as_str().to_string()),
            tags: value
                .tags
                .unwrap_or_default()
                .into_iter()
                .map(Tag::from)
                .collect(),
            blueprint_id: value.blueprint_id,
            blueprint_name: value.blueprint_name,
            bundle_id: value.bundle_id,
            is_static_ip: value.is_static_ip.into(),
            private_ip_address: value.private_ip_address,
            public_ip_address: value.public_ip_address,
            hardware: value.hardware.map(InstanceHardware::from),
            networking: value.networking.map(InstanceNetworking::from),
            state: value.state.map(InstanceState::from),
            username: value.username,
            ssh_key_name: value.ssh_key_name,
        }
    }
}
