//! Wire envelopes for ECS API responses
//!
//! The API nests every collection twice (`Images.Image`, `Instances.Instance`)
//! and is inconsistent about scalar types across API versions — disk sizes
//! arrive as either strings or numbers, creation times with or without a
//! seconds field. Everything is normalized here, once, into the typed records
//! of `ecsflow-cloud`.

use chrono::{DateTime, NaiveDateTime, Utc};
use ecsflow_cloud::{
    CloudError, Disk, DiskDeviceMapping, EipAddress, EipBinding, Image, Instance, InstanceStatus,
    Region, Result, Snapshot, VpcAttributes,
};
use serde::{Deserialize, Deserializer};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeRegionsResponse {
    pub regions: RegionList,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RegionList {
    #[serde(default)]
    pub region: Vec<RegionWire>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct RegionWire {
    pub region_id: String,
    #[serde(default)]
    pub local_name: Option<String>,
}

impl From<RegionWire> for Region {
    fn from(w: RegionWire) -> Self {
        Self {
            region_id: w.region_id,
            local_name: w.local_name,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeImagesResponse {
    pub images: ImageList,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ImageList {
    #[serde(default)]
    pub image: Vec<ImageWire>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ImageWire {
    pub image_id: String,
    pub image_name: String,
    #[serde(default)]
    pub description: String,
    pub creation_time: String,
    #[serde(default)]
    pub image_owner_alias: Option<String>,
    #[serde(default)]
    pub usage: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub disk_device_mappings: DiskDeviceMappingList,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DiskDeviceMappingList {
    #[serde(default)]
    pub disk_device_mapping: Vec<DiskDeviceMappingWire>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DiskDeviceMappingWire {
    #[serde(default)]
    pub snapshot_id: String,
    #[serde(default, deserialize_with = "de_flexible_i64")]
    pub size: i64,
    #[serde(default)]
    pub device: String,
}

pub fn convert_image(w: ImageWire) -> Result<Image> {
    Ok(Image {
        image_id: w.image_id,
        image_name: w.image_name,
        description: w.description,
        creation_time: parse_time(&w.creation_time)?,
        image_owner_alias: w.image_owner_alias,
        usage: w.usage,
        status: w.status,
        disk_device_mappings: w
            .disk_device_mappings
            .disk_device_mapping
            .into_iter()
            .map(|m| DiskDeviceMapping {
                snapshot_id: m.snapshot_id,
                size: m.size,
                device: m.device,
            })
            .collect(),
    })
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeInstancesResponse {
    pub instances: InstanceList,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InstanceList {
    #[serde(default)]
    pub instance: Vec<InstanceWire>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct InstanceWire {
    pub instance_id: String,
    pub instance_name: String,
    #[serde(default)]
    pub zone_id: String,
    #[serde(default)]
    pub instance_type: String,
    #[serde(default)]
    pub host_name: String,
    pub status: InstanceStatus,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub vpc_attributes: VpcAttributesWire,
    #[serde(default)]
    pub security_group_ids: SecurityGroupIdList,
    #[serde(default)]
    pub eip_address: EipBindingWire,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct VpcAttributesWire {
    #[serde(default)]
    pub vpc_id: String,
    #[serde(default)]
    pub v_switch_id: String,
    #[serde(default)]
    pub private_ip_address: IpAddressList,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct IpAddressList {
    #[serde(default)]
    pub ip_address: Vec<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SecurityGroupIdList {
    #[serde(default)]
    pub security_group_id: Vec<String>,
}

/// Present on every instance record; both fields empty when unbound.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EipBindingWire {
    #[serde(default)]
    pub ip_address: String,
    #[serde(default)]
    pub allocation_id: String,
}

impl From<InstanceWire> for Instance {
    fn from(w: InstanceWire) -> Self {
        Self {
            instance_id: w.instance_id,
            instance_name: w.instance_name,
            zone_id: w.zone_id,
            instance_type: w.instance_type,
            host_name: w.host_name,
            status: w.status,
            description: non_empty(w.description),
            vpc: VpcAttributes {
                vpc_id: non_empty(w.vpc_attributes.vpc_id),
                v_switch_id: non_empty(w.vpc_attributes.v_switch_id),
                private_ip_addresses: w.vpc_attributes.private_ip_address.ip_address,
            },
            security_group_ids: w.security_group_ids.security_group_id,
            eip: if w.eip_address.allocation_id.is_empty() {
                None
            } else {
                Some(EipBinding {
                    ip_address: w.eip_address.ip_address,
                    allocation_id: w.eip_address.allocation_id,
                })
            },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeSnapshotsResponse {
    pub snapshots: SnapshotList,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SnapshotList {
    #[serde(default)]
    pub snapshot: Vec<SnapshotWire>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct SnapshotWire {
    pub snapshot_id: String,
    #[serde(default)]
    pub snapshot_name: String,
    #[serde(default)]
    pub usage: Option<String>,
    #[serde(default)]
    pub source_disk_id: Option<String>,
}

impl From<SnapshotWire> for Snapshot {
    fn from(w: SnapshotWire) -> Self {
        Self {
            snapshot_id: w.snapshot_id,
            snapshot_name: w.snapshot_name,
            usage: w.usage,
            source_disk_id: w.source_disk_id,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeDisksResponse {
    pub disks: DiskList,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DiskList {
    #[serde(default)]
    pub disk: Vec<DiskWire>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DiskWire {
    pub disk_id: String,
    #[serde(default)]
    pub disk_name: String,
}

impl From<DiskWire> for Disk {
    fn from(w: DiskWire) -> Self {
        Self {
            disk_id: w.disk_id,
            disk_name: w.disk_name,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct DescribeEipAddressesResponse {
    pub eip_addresses: EipAddressList,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EipAddressList {
    #[serde(default)]
    pub eip_address: Vec<EipAddressWire>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct EipAddressWire {
    #[serde(default)]
    pub ip_address: String,
    pub allocation_id: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub instance_id: String,
}

impl From<EipAddressWire> for EipAddress {
    fn from(w: EipAddressWire) -> Self {
        Self {
            ip_address: w.ip_address,
            allocation_id: w.allocation_id,
            status: w.status,
            instance_id: non_empty(w.instance_id),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateImageResponse {
    pub image_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CopyImageResponse {
    pub image_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct CreateInstanceResponse {
    pub instance_id: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AllocateEipAddressResponse {
    pub allocation_id: String,
    pub eip_address: String,
}

impl From<AllocateEipAddressResponse> for EipAddress {
    fn from(w: AllocateEipAddressResponse) -> Self {
        Self {
            ip_address: w.eip_address,
            allocation_id: w.allocation_id,
            status: None,
            instance_id: None,
        }
    }
}

fn non_empty(s: String) -> Option<String> {
    if s.is_empty() { None } else { Some(s) }
}

/// Creation times come back as RFC 3339, with some API versions dropping the
/// seconds field (`2017-12-05T22:40Z`).
fn parse_time(s: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .map(|t| t.with_timezone(&Utc))
        .or_else(|_| {
            NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%MZ").map(|t| t.and_utc())
        })
        .map_err(|_| CloudError::ApiError(format!("unparseable CreationTime: {s:?}")))
}

fn de_flexible_i64<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum IntOrString {
        Int(i64),
        Str(String),
    }

    match IntOrString::deserialize(deserializer)? {
        IntOrString::Int(n) => Ok(n),
        IntOrString::Str(s) => s.parse().map_err(serde::de::Error::custom),
    }
}
