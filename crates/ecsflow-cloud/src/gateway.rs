//! Gateway abstraction over the provider API
//!
//! The gateway translates domain intents into provider calls and returns
//! typed records. Every call is scoped by the region the gateway was
//! constructed with. Mutations are fire-and-forget on the provider side:
//! an accepted request does not mean the resource is ready.

use crate::error::Result;
use crate::model::{Disk, EipAddress, Image, Instance, Region, Snapshot};
use async_trait::async_trait;
use std::collections::BTreeMap;

/// Unified interface to the elastic compute provider.
///
/// Implementations are stateless adapters: no waiting, no retries, no error
/// suppression. Provider rejections propagate unmasked.
#[async_trait]
pub trait EcsGateway: Send + Sync {
    async fn describe_regions(&self) -> Result<Vec<Region>>;

    async fn describe_images(&self, filter: &ImageFilter) -> Result<Vec<Image>>;

    async fn describe_instances(&self, filter: &InstanceFilter) -> Result<Vec<Instance>>;

    async fn describe_snapshots(&self, filter: &SnapshotFilter) -> Result<Vec<Snapshot>>;

    async fn describe_disks(&self, filter: &DiskFilter) -> Result<Vec<Disk>>;

    async fn describe_eip_addresses(&self, filter: &EipFilter) -> Result<Vec<EipAddress>>;

    /// Request an image capture. Returns the accepted image id; the image
    /// only appears in listings once the provider finishes the capture.
    async fn create_image(&self, request: &CreateImageRequest) -> Result<String>;

    /// Copy an image to another region. Returns the new image id there.
    async fn copy_image(&self, request: &CopyImageRequest) -> Result<String>;

    async fn delete_image(&self, image_id: &str) -> Result<()>;

    async fn delete_snapshot(&self, snapshot_id: &str) -> Result<()>;

    async fn delete_disk(&self, disk_id: &str) -> Result<()>;

    /// Request instance creation. Returns the accepted instance id; the
    /// provider provisions the instance into `Stopped`.
    async fn create_instance(&self, spec: &InstanceSpec) -> Result<String>;

    /// Delete an instance. The instance must already be `Stopped`; this call
    /// performs no waiting of its own.
    async fn delete_instance(&self, instance_id: &str) -> Result<()>;

    async fn stop_instance(&self, instance_id: &str) -> Result<()>;

    async fn start_instance(&self, instance_id: &str) -> Result<()>;

    async fn allocate_eip_address(&self) -> Result<EipAddress>;

    async fn release_eip_address(&self, allocation_id: &str) -> Result<()>;

    async fn associate_eip_address(&self, allocation_id: &str, instance_id: &str) -> Result<()>;

    async fn unassociate_eip_address(&self, allocation_id: &str, instance_id: &str) -> Result<()>;
}

/// Image listing filter
#[derive(Debug, Clone, Default)]
pub struct ImageFilter {
    /// Name or name pattern (`web-01.*` matches every capture of `web-01`)
    pub image_name: Option<String>,
    /// `self` restricts to images owned by this account
    pub image_owner_alias: Option<String>,
    pub usage: Option<String>,
    pub status: Option<String>,
}

impl ImageFilter {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            image_name: Some(name.into()),
            ..Self::default()
        }
    }
}

/// Instance listing filter
#[derive(Debug, Clone, Default)]
pub struct InstanceFilter {
    pub instance_name: Option<String>,
    pub instance_ids: Vec<String>,
}

impl InstanceFilter {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            instance_name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn with_id(instance_id: impl Into<String>) -> Self {
        Self {
            instance_ids: vec![instance_id.into()],
            ..Self::default()
        }
    }
}

/// Snapshot listing filter
#[derive(Debug, Clone, Default)]
pub struct SnapshotFilter {
    pub snapshot_name: Option<String>,
    pub usage: Option<String>,
}

/// Disk listing filter
#[derive(Debug, Clone, Default)]
pub struct DiskFilter {
    pub disk_name: Option<String>,
}

/// Elastic IP listing filter
#[derive(Debug, Clone, Default)]
pub struct EipFilter {
    pub eip_address: Option<String>,
    pub allocation_id: Option<String>,
}

impl EipFilter {
    pub fn with_address(eip_address: impl Into<String>) -> Self {
        Self {
            eip_address: Some(eip_address.into()),
            ..Self::default()
        }
    }

    pub fn with_allocation_id(allocation_id: impl Into<String>) -> Self {
        Self {
            allocation_id: Some(allocation_id.into()),
            ..Self::default()
        }
    }
}

/// Image capture request
#[derive(Debug, Clone)]
pub struct CreateImageRequest {
    pub instance_id: String,
    pub image_name: String,
    /// Encoded provenance tag
    pub description: String,
}

/// Cross-region image copy request
#[derive(Debug, Clone)]
pub struct CopyImageRequest {
    pub image_id: String,
    pub destination_image_name: String,
    pub destination_description: String,
    pub destination_region_id: String,
}

/// Creation request for an instance.
///
/// Optional fields are omitted from the provider call entirely rather than
/// sent empty; the provider fills its own defaults.
#[derive(Debug, Clone, PartialEq)]
pub struct InstanceSpec {
    pub image_id: String,
    pub instance_name: String,
    pub zone_id: Option<String>,
    pub instance_type: Option<String>,
    pub host_name: Option<String>,
    pub v_switch_id: Option<String>,
    pub security_group_id: Option<String>,
    pub description: Option<String>,
    pub private_ip_address: Option<String>,
    pub system_disk_category: String,
    pub data_disks: Vec<DataDiskSpec>,
    /// Raw parameter pass-through, forwarded verbatim after the typed fields
    pub extra: BTreeMap<String, String>,
}

impl InstanceSpec {
    pub fn new(image_id: impl Into<String>, instance_name: impl Into<String>) -> Self {
        Self {
            image_id: image_id.into(),
            instance_name: instance_name.into(),
            zone_id: None,
            instance_type: None,
            host_name: None,
            v_switch_id: None,
            security_group_id: None,
            description: None,
            private_ip_address: None,
            system_disk_category: "cloud_efficiency".to_string(),
            data_disks: Vec::new(),
            extra: BTreeMap::new(),
        }
    }

    /// Apply caller-supplied overrides last: known keys replace the derived
    /// typed fields, unknown keys are forwarded as raw parameters.
    pub fn apply_overrides(&mut self, overrides: &BTreeMap<String, String>) {
        for (key, value) in overrides {
            match key.as_str() {
                "image_id" => self.image_id = value.clone(),
                "instance_name" => self.instance_name = value.clone(),
                "zone_id" => self.zone_id = Some(value.clone()),
                "instance_type" => self.instance_type = Some(value.clone()),
                "host_name" => self.host_name = Some(value.clone()),
                "v_switch_id" => self.v_switch_id = Some(value.clone()),
                "security_group_id" => self.security_group_id = Some(value.clone()),
                "description" => self.description = Some(value.clone()),
                "private_ip_address" => self.private_ip_address = Some(value.clone()),
                "system_disk_category" | "system_disk.category" => {
                    self.system_disk_category = value.clone();
                }
                _ => {
                    self.extra.insert(key.clone(), value.clone());
                }
            }
        }
    }
}

/// One data disk of an instance creation request
#[derive(Debug, Clone, PartialEq)]
pub struct DataDiskSpec {
    /// 1-based position in the request
    pub index: usize,
    pub category: String,
    pub snapshot_id: String,
    pub size: i64,
    pub device: String,
    pub delete_with_instance: bool,
}
