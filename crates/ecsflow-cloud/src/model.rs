//! Typed records for ECS resources
//!
//! Produced once at the gateway boundary; all core logic operates on these
//! records, never on raw provider JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A provider region
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Region {
    pub region_id: String,
    pub local_name: Option<String>,
}

/// A machine image together with its dependent disk mappings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Image {
    pub image_id: String,
    pub image_name: String,

    /// Free-text description. Images created by ecsflow carry an encoded
    /// provenance tag here (see [`crate::tag::ProvenanceTag`]).
    pub description: String,

    pub creation_time: DateTime<Utc>,
    pub image_owner_alias: Option<String>,
    pub usage: Option<String>,
    pub status: Option<String>,

    /// Ordered mappings; the first entry is the root disk.
    pub disk_device_mappings: Vec<DiskDeviceMapping>,
}

/// One disk backing an image, referenced through its snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiskDeviceMapping {
    pub snapshot_id: String,
    pub size: i64,
    pub device: String,
}

/// A compute instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Instance {
    pub instance_id: String,
    pub instance_name: String,
    pub zone_id: String,
    pub instance_type: String,
    pub host_name: String,
    pub status: InstanceStatus,
    pub description: Option<String>,
    pub vpc: VpcAttributes,
    pub security_group_ids: Vec<String>,

    /// At most one elastic IP is bound to an instance at a time.
    pub eip: Option<EipBinding>,
}

impl Instance {
    /// First private IP of the instance, if any
    pub fn primary_private_ip(&self) -> Option<&str> {
        self.vpc.private_ip_addresses.first().map(String::as_str)
    }

    /// First security group of the instance, if any
    pub fn primary_security_group(&self) -> Option<&str> {
        self.security_group_ids.first().map(String::as_str)
    }

    pub fn is_stopped(&self) -> bool {
        self.status == InstanceStatus::Stopped
    }
}

/// VPC attributes of an instance
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VpcAttributes {
    pub vpc_id: Option<String>,
    pub v_switch_id: Option<String>,
    pub private_ip_addresses: Vec<String>,
}

/// An elastic IP bound to an instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EipBinding {
    pub ip_address: String,
    /// The mutable binding key used to reassign the address
    pub allocation_id: String,
}

/// Instance lifecycle status
///
/// Only `Stopped` is a recognized terminal state for stop and provisioning
/// waits; newly created instances land there before being started.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InstanceStatus {
    Pending,
    Starting,
    Running,
    Stopping,
    Stopped,
    #[serde(other)]
    Unknown,
}

impl std::fmt::Display for InstanceStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InstanceStatus::Pending => write!(f, "Pending"),
            InstanceStatus::Starting => write!(f, "Starting"),
            InstanceStatus::Running => write!(f, "Running"),
            InstanceStatus::Stopping => write!(f, "Stopping"),
            InstanceStatus::Stopped => write!(f, "Stopped"),
            InstanceStatus::Unknown => write!(f, "Unknown"),
        }
    }
}

/// A disk snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub snapshot_id: String,
    pub snapshot_name: String,
    /// `none` means unattached and reclaimable
    pub usage: Option<String>,
    pub source_disk_id: Option<String>,
}

/// A disk volume
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Disk {
    pub disk_id: String,
    pub disk_name: String,
}

/// An elastic IP address
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EipAddress {
    pub ip_address: String,
    pub allocation_id: String,
    pub status: Option<String>,
    /// Instance the address is currently bound to, if any
    pub instance_id: Option<String>,
}
