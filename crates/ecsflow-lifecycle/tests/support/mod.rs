//! In-memory recording gateway for workflow tests

// Not every test binary uses every helper.
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, TimeZone, Utc};
use ecsflow_cloud::{
    CloudError, CopyImageRequest, CreateImageRequest, Disk, DiskDeviceMapping, DiskFilter,
    EcsGateway, EipAddress, EipBinding, EipFilter, Image, ImageFilter, Instance, InstanceFilter,
    InstanceSpec, InstanceStatus, ProvenanceTag, Region, Result, Snapshot, SnapshotFilter,
    VpcAttributes,
};
use std::sync::Mutex;
use std::time::Duration;

use ecsflow_lifecycle::{Lifecycle, PollConfig};

/// One recorded gateway call, coarse enough for sequence assertions
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    DescribeImages(Option<String>),
    DescribeInstances,
    CreateImage { instance_id: String, image_name: String },
    DeleteImage(String),
    DeleteSnapshot(String),
    DeleteDisk(String),
    CreateInstance(InstanceSpec),
    DeleteInstance(String),
    StopInstance(String),
    StartInstance(String),
    AllocateEip,
    ReleaseEip(String),
    AssociateEip { allocation_id: String, instance_id: String },
    UnassociateEip { allocation_id: String, instance_id: String },
}

#[derive(Default)]
struct Inner {
    calls: Vec<Call>,
    instances: Vec<Instance>,
    images: Vec<Image>,
    snapshots: Vec<Snapshot>,
    disks: Vec<Disk>,
    eips: Vec<EipAddress>,
    /// Listing polls a freshly captured image must survive before it appears
    image_listing_delay: usize,
    /// Describe polls before a freshly created instance reports `Stopped`
    provision_delay: usize,
    next_serial: usize,
}

/// Scripted in-memory provider; created resources become visible to
/// subsequent describes, optionally after a configured number of polls.
#[derive(Default)]
pub struct FakeGateway {
    inner: Mutex<Inner>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_instance(self, instance: Instance) -> Self {
        self.inner.lock().unwrap().instances.push(instance);
        self
    }

    pub fn with_image(self, image: Image) -> Self {
        self.inner.lock().unwrap().images.push(image);
        self
    }

    pub fn with_snapshot(self, snapshot: Snapshot) -> Self {
        self.inner.lock().unwrap().snapshots.push(snapshot);
        self
    }

    pub fn with_disk(self, disk: Disk) -> Self {
        self.inner.lock().unwrap().disks.push(disk);
        self
    }

    pub fn with_eip(self, eip: EipAddress) -> Self {
        self.inner.lock().unwrap().eips.push(eip);
        self
    }

    pub fn with_image_listing_delay(self, polls: usize) -> Self {
        self.inner.lock().unwrap().image_listing_delay = polls;
        self
    }

    pub fn with_provision_delay(self, polls: usize) -> Self {
        self.inner.lock().unwrap().provision_delay = polls;
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.inner.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.inner.lock().unwrap().calls.clear();
    }

    /// Position of the first call matching `predicate`
    pub fn position<F: Fn(&Call) -> bool>(&self, predicate: F) -> Option<usize> {
        self.inner.lock().unwrap().calls.iter().position(|c| predicate(c))
    }

    pub fn count<F: Fn(&Call) -> bool>(&self, predicate: F) -> usize {
        self.inner
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|c| predicate(c))
            .count()
    }
}

fn matches_name_pattern(pattern: &str, name: &str) -> bool {
    match pattern.strip_suffix(".*") {
        Some(prefix) => name.starts_with(prefix) && name.len() > prefix.len(),
        None => pattern == name,
    }
}

#[async_trait]
impl EcsGateway for FakeGateway {
    async fn describe_regions(&self) -> Result<Vec<Region>> {
        Ok(vec![Region {
            region_id: "cn-test".to_string(),
            local_name: None,
        }])
    }

    async fn describe_images(&self, filter: &ImageFilter) -> Result<Vec<Image>> {
        let mut inner = self.inner.lock().unwrap();
        inner
            .calls
            .push(Call::DescribeImages(filter.image_name.clone()));
        if inner.image_listing_delay > 0 {
            inner.image_listing_delay -= 1;
            return Ok(Vec::new());
        }
        Ok(inner
            .images
            .iter()
            .filter(|image| match filter.image_name.as_deref() {
                Some(pattern) => matches_name_pattern(pattern, &image.image_name),
                None => true,
            })
            .cloned()
            .collect())
    }

    async fn describe_instances(&self, filter: &InstanceFilter) -> Result<Vec<Instance>> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(Call::DescribeInstances);
        if inner.provision_delay > 0 {
            inner.provision_delay -= 1;
            return Ok(Vec::new());
        }
        // Newest first, matching the provider's listing order; the copy
        // workflow relies on the replacement shadowing a same-named source.
        Ok(inner
            .instances
            .iter()
            .rev()
            .filter(|instance| {
                if !filter.instance_ids.is_empty() {
                    return filter.instance_ids.contains(&instance.instance_id);
                }
                match filter.instance_name.as_deref() {
                    Some(name) => instance.instance_name == name,
                    None => true,
                }
            })
            .cloned()
            .collect())
    }

    async fn describe_snapshots(&self, filter: &SnapshotFilter) -> Result<Vec<Snapshot>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .snapshots
            .iter()
            .filter(|snapshot| {
                let name_ok = match filter.snapshot_name.as_deref() {
                    Some(name) => snapshot.snapshot_name == name,
                    None => true,
                };
                let usage_ok = match filter.usage.as_deref() {
                    Some(usage) => snapshot.usage.as_deref() == Some(usage),
                    None => true,
                };
                name_ok && usage_ok
            })
            .cloned()
            .collect())
    }

    async fn describe_disks(&self, filter: &DiskFilter) -> Result<Vec<Disk>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .disks
            .iter()
            .filter(|disk| match filter.disk_name.as_deref() {
                Some(name) => disk.disk_name == name,
                None => true,
            })
            .cloned()
            .collect())
    }

    async fn describe_eip_addresses(&self, filter: &EipFilter) -> Result<Vec<EipAddress>> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .eips
            .iter()
            .filter(|eip| {
                let address_ok = match filter.eip_address.as_deref() {
                    Some(address) => eip.ip_address == address,
                    None => true,
                };
                let allocation_ok = match filter.allocation_id.as_deref() {
                    Some(id) => eip.allocation_id == id,
                    None => true,
                };
                address_ok && allocation_ok
            })
            .cloned()
            .collect())
    }

    async fn create_image(&self, request: &CreateImageRequest) -> Result<String> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(Call::CreateImage {
            instance_id: request.instance_id.clone(),
            image_name: request.image_name.clone(),
        });
        inner.next_serial += 1;
        let image_id = format!("m-fake-{}", inner.next_serial);
        let source_root = inner
            .instances
            .iter()
            .find(|i| i.instance_id == request.instance_id)
            .map(|i| format!("s-root-{}", i.instance_id))
            .unwrap_or_else(|| "s-root".to_string());
        inner.images.push(Image {
            image_id: image_id.clone(),
            image_name: request.image_name.clone(),
            description: request.description.clone(),
            creation_time: Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap(),
            image_owner_alias: Some("self".to_string()),
            usage: Some("none".to_string()),
            status: Some("Available".to_string()),
            disk_device_mappings: vec![DiskDeviceMapping {
                snapshot_id: source_root,
                size: 40,
                device: "/dev/xvda".to_string(),
            }],
        });
        Ok(image_id)
    }

    async fn copy_image(&self, _request: &CopyImageRequest) -> Result<String> {
        Ok("m-copied".to_string())
    }

    async fn delete_image(&self, image_id: &str) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(Call::DeleteImage(image_id.to_string()));
        inner.images.retain(|image| image.image_id != image_id);
        Ok(())
    }

    async fn delete_snapshot(&self, snapshot_id: &str) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(Call::DeleteSnapshot(snapshot_id.to_string()));
        inner
            .snapshots
            .retain(|snapshot| snapshot.snapshot_id != snapshot_id);
        Ok(())
    }

    async fn delete_disk(&self, disk_id: &str) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(Call::DeleteDisk(disk_id.to_string()));
        inner.disks.retain(|disk| disk.disk_id != disk_id);
        Ok(())
    }

    async fn create_instance(&self, spec: &InstanceSpec) -> Result<String> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(Call::CreateInstance(spec.clone()));
        inner.next_serial += 1;
        let instance_id = format!("i-fake-{}", inner.next_serial);
        let instance = Instance {
            instance_id: instance_id.clone(),
            instance_name: spec.instance_name.clone(),
            zone_id: spec.zone_id.clone().unwrap_or_default(),
            instance_type: spec.instance_type.clone().unwrap_or_default(),
            host_name: spec.host_name.clone().unwrap_or_default(),
            status: InstanceStatus::Stopped,
            description: spec.description.clone(),
            vpc: VpcAttributes {
                vpc_id: None,
                v_switch_id: spec.v_switch_id.clone(),
                private_ip_addresses: spec
                    .private_ip_address
                    .clone()
                    .into_iter()
                    .collect(),
            },
            security_group_ids: spec.security_group_id.clone().into_iter().collect(),
            eip: None,
        };
        inner.instances.push(instance);
        Ok(instance_id)
    }

    async fn delete_instance(&self, instance_id: &str) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(Call::DeleteInstance(instance_id.to_string()));
        inner
            .instances
            .retain(|instance| instance.instance_id != instance_id);
        Ok(())
    }

    async fn stop_instance(&self, instance_id: &str) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(Call::StopInstance(instance_id.to_string()));
        match inner
            .instances
            .iter_mut()
            .find(|instance| instance.instance_id == instance_id)
        {
            Some(instance) => {
                instance.status = InstanceStatus::Stopped;
                Ok(())
            }
            None => Err(CloudError::ApiError(format!(
                "InvalidInstanceId.NotFound: {instance_id}"
            ))),
        }
    }

    async fn start_instance(&self, instance_id: &str) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(Call::StartInstance(instance_id.to_string()));
        if let Some(instance) = inner
            .instances
            .iter_mut()
            .find(|instance| instance.instance_id == instance_id)
        {
            instance.status = InstanceStatus::Starting;
        }
        Ok(())
    }

    async fn allocate_eip_address(&self) -> Result<EipAddress> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(Call::AllocateEip);
        inner.next_serial += 1;
        let eip = EipAddress {
            ip_address: format!("203.0.113.{}", inner.next_serial),
            allocation_id: format!("eip-fake-{}", inner.next_serial),
            status: None,
            instance_id: None,
        };
        inner.eips.push(eip.clone());
        Ok(eip)
    }

    async fn release_eip_address(&self, allocation_id: &str) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(Call::ReleaseEip(allocation_id.to_string()));
        inner.eips.retain(|eip| eip.allocation_id != allocation_id);
        Ok(())
    }

    async fn associate_eip_address(&self, allocation_id: &str, instance_id: &str) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(Call::AssociateEip {
            allocation_id: allocation_id.to_string(),
            instance_id: instance_id.to_string(),
        });
        Ok(())
    }

    async fn unassociate_eip_address(&self, allocation_id: &str, instance_id: &str) -> Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.calls.push(Call::UnassociateEip {
            allocation_id: allocation_id.to_string(),
            instance_id: instance_id.to_string(),
        });
        Ok(())
    }
}

/// Lifecycle over a fake gateway with a test-speed poll interval
pub fn lifecycle(gateway: FakeGateway) -> Lifecycle<FakeGateway> {
    Lifecycle::with_poll(
        gateway,
        PollConfig {
            interval: Duration::from_millis(1),
            deadline: Some(Duration::from_secs(5)),
        },
    )
}

pub fn running_instance(instance_id: &str, name: &str) -> Instance {
    Instance {
        instance_id: instance_id.to_string(),
        instance_name: name.to_string(),
        zone_id: "cn-a".to_string(),
        instance_type: "ecs.n1".to_string(),
        host_name: name.to_string(),
        status: InstanceStatus::Running,
        description: Some("source".to_string()),
        vpc: VpcAttributes {
            vpc_id: Some("vpc-1".to_string()),
            v_switch_id: Some("vsw-1".to_string()),
            private_ip_addresses: vec!["10.0.0.5".to_string()],
        },
        security_group_ids: vec!["sg-1".to_string()],
        eip: None,
    }
}

pub fn stopped_instance(instance_id: &str, name: &str) -> Instance {
    let mut instance = running_instance(instance_id, name);
    instance.status = InstanceStatus::Stopped;
    instance
}

pub fn with_eip(mut instance: Instance, allocation_id: &str) -> Instance {
    instance.eip = Some(EipBinding {
        ip_address: "47.96.1.2".to_string(),
        allocation_id: allocation_id.to_string(),
    });
    instance
}

pub fn tagged_image(
    image_id: &str,
    name: &str,
    created: DateTime<Utc>,
    tag: &ProvenanceTag,
    mappings: Vec<DiskDeviceMapping>,
) -> Image {
    Image {
        image_id: image_id.to_string(),
        image_name: name.to_string(),
        description: tag.encode(),
        creation_time: created,
        image_owner_alias: Some("self".to_string()),
        usage: Some("none".to_string()),
        status: Some("Available".to_string()),
        disk_device_mappings: mappings,
    }
}

pub fn root_mapping(snapshot_id: &str) -> DiskDeviceMapping {
    DiskDeviceMapping {
        snapshot_id: snapshot_id.to_string(),
        size: 40,
        device: "/dev/xvda".to_string(),
    }
}
