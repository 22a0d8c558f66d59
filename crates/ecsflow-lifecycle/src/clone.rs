//! Clone workflows
//!
//! `copy` replaces live instances through a freshly captured image;
//! `run_instance` provisions from the newest tagged image alone. Both derive
//! the replacement specification, provision, reattach network identity, and
//! start. Batches run strictly sequentially and unguarded: a failure aborts
//! the remainder, with no rollback of steps already taken.

use crate::lifecycle::Lifecycle;
use ecsflow_cloud::{
    CloudError, DataDiskSpec, EcsGateway, EipFilter, Image, ImageFilter, Instance, InstanceFilter,
    InstanceSpec, ProvenanceTag, Result,
};
use std::collections::BTreeMap;

/// Options for the copy workflow
#[derive(Debug, Clone, Default)]
pub struct CopyOptions {
    /// Logical instance name; every match is processed independently
    pub name: String,
    /// Destroy the source once its image capture has converged
    pub renew: bool,
    /// Re-bind the source's elastic IP to the replacement
    pub auto_eip: bool,
    /// Caller overrides, applied after the derived defaults
    pub overrides: BTreeMap<String, String>,
}

/// Options for the clone-from-tag workflow
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Prefix of the image name (`{name}.*` selects its captures)
    pub name: String,
    /// Associate an elastic IP even if the tag's address is gone
    pub auto_eip: bool,
    pub overrides: BTreeMap<String, String>,
}

/// Clone every instance matching the selector through a fresh image.
pub async fn copy<G: EcsGateway>(
    ops: &Lifecycle<G>,
    options: &CopyOptions,
) -> Result<Vec<Instance>> {
    let sources = ops
        .gateway()
        .describe_instances(&InstanceFilter::named(&options.name))
        .await?;
    if sources.is_empty() {
        tracing::warn!("no instance matches {}", options.name);
    }

    let mut created = Vec::new();
    for instance in &sources {
        let image = ops.capture_image(instance).await?;

        // Destructive step runs only after the capture converged.
        if options.renew {
            ops.destroy_instance(&instance.instance_id).await?;
        }

        let mut spec = spec_from_instance(instance, &image);
        spec.apply_overrides(&options.overrides);
        let replacement = ops.provision_instance(&spec).await?;

        if options.auto_eip {
            let allocation_id = instance.eip.as_ref().map(|e| e.allocation_id.as_str());
            ops.associate_eip(&replacement.instance_id, allocation_id)
                .await?;
        }
        ops.start_instance(&replacement.instance_id).await?;
        created.push(replacement);
    }
    Ok(created)
}

/// Provision an instance from the newest image whose name matches
/// `{options.name}.*`, reconstructing the specification from its
/// provenance tag.
pub async fn run_instance<G: EcsGateway>(
    ops: &Lifecycle<G>,
    options: &RunOptions,
) -> Result<Instance> {
    let pattern = format!("{}.*", options.name);
    let images = ops
        .gateway()
        .describe_images(&ImageFilter::named(&pattern))
        .await?;
    let image = images
        .into_iter()
        .max_by_key(|image| image.creation_time)
        .ok_or_else(|| CloudError::ResourceNotFound(format!("no image matches {pattern}")))?;

    let tag = ProvenanceTag::decode(&image.description)?;
    let mut spec = spec_from_tag(&tag, &image);
    spec.apply_overrides(&options.overrides);
    let replacement = ops.provision_instance(&spec).await?;

    // The tag may reference an address that was since released; association
    // with no allocation id falls back to allocating a fresh one.
    let existing = match tag.eip_allocation_id.as_deref() {
        Some(allocation_id) => ops
            .gateway()
            .describe_eip_addresses(&EipFilter::with_allocation_id(allocation_id))
            .await?
            .into_iter()
            .next(),
        None => None,
    };
    if options.auto_eip || existing.is_some() {
        let allocation_id = existing.as_ref().map(|e| e.allocation_id.as_str());
        ops.associate_eip(&replacement.instance_id, allocation_id)
            .await?;
    }
    ops.start_instance(&replacement.instance_id).await?;
    Ok(replacement)
}

/// Replacement specification derived from a live source instance.
pub fn spec_from_instance(instance: &Instance, image: &Image) -> InstanceSpec {
    let mut spec = InstanceSpec::new(&image.image_id, &instance.instance_name);
    spec.zone_id = Some(instance.zone_id.clone());
    spec.instance_type = Some(instance.instance_type.clone());
    spec.host_name = Some(instance.host_name.clone());
    spec.v_switch_id = instance.vpc.v_switch_id.clone();
    spec.security_group_id = instance.primary_security_group().map(str::to_owned);
    spec.description = instance.description.clone();
    spec.private_ip_address = instance.primary_private_ip().map(str::to_owned);
    spec.data_disks = data_disks_from_image(image);
    spec
}

/// Replacement specification reconstructed entirely from a provenance tag.
pub fn spec_from_tag(tag: &ProvenanceTag, image: &Image) -> InstanceSpec {
    let mut spec = InstanceSpec::new(&image.image_id, &tag.instance_name);
    spec.zone_id = tag.zone_id.clone();
    spec.instance_type = tag.instance_type.clone();
    spec.host_name = Some(tag.instance_name.clone());
    spec.v_switch_id = tag.v_switch_id.clone();
    spec.security_group_id = tag.security_group_id.clone();
    spec.description = tag.description.clone();
    spec.private_ip_address = tag.private_ip_address.clone();
    spec.data_disks = data_disks_from_image(image);
    spec
}

/// Non-root disks carried by an image, re-expressed as creation parameters
/// so replacements retain the source's data volumes. The first mapping is
/// the root disk and is excluded.
pub fn data_disks_from_image(image: &Image) -> Vec<DataDiskSpec> {
    image
        .disk_device_mappings
        .iter()
        .skip(1)
        .enumerate()
        .map(|(i, mapping)| DataDiskSpec {
            index: i + 1,
            category: "cloud_efficiency".to_string(),
            snapshot_id: mapping.snapshot_id.clone(),
            size: mapping.size,
            device: mapping.device.clone(),
            delete_with_instance: false,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use ecsflow_cloud::DiskDeviceMapping;

    fn image_with_mappings(mappings: Vec<DiskDeviceMapping>) -> Image {
        Image {
            image_id: "m-1".to_string(),
            image_name: "web-01.20170101000000".to_string(),
            description: String::new(),
            creation_time: Utc.with_ymd_and_hms(2017, 1, 1, 0, 0, 0).unwrap(),
            image_owner_alias: Some("self".to_string()),
            usage: Some("none".to_string()),
            status: Some("Available".to_string()),
            disk_device_mappings: mappings,
        }
    }

    fn mapping(snapshot_id: &str, size: i64, device: &str) -> DiskDeviceMapping {
        DiskDeviceMapping {
            snapshot_id: snapshot_id.to_string(),
            size,
            device: device.to_string(),
        }
    }

    #[test]
    fn test_data_disks_exclude_the_root_mapping() {
        let image = image_with_mappings(vec![
            mapping("s-root", 40, "/dev/xvda"),
            mapping("s-data1", 200, "/dev/xvdb"),
            mapping("s-data2", 500, "/dev/xvdc"),
        ]);

        let disks = data_disks_from_image(&image);
        assert_eq!(disks.len(), 2);

        assert_eq!(disks[0].index, 1);
        assert_eq!(disks[0].snapshot_id, "s-data1");
        assert_eq!(disks[0].size, 200);
        assert_eq!(disks[0].device, "/dev/xvdb");
        assert_eq!(disks[0].category, "cloud_efficiency");
        assert!(!disks[0].delete_with_instance);

        assert_eq!(disks[1].index, 2);
        assert_eq!(disks[1].snapshot_id, "s-data2");
    }

    #[test]
    fn test_root_only_image_produces_no_data_disks() {
        let image = image_with_mappings(vec![mapping("s-root", 40, "/dev/xvda")]);
        assert!(data_disks_from_image(&image).is_empty());
    }

    #[test]
    fn test_spec_from_tag_uses_tag_name_as_host_name() {
        let tag = ProvenanceTag {
            instance_name: "app-01".to_string(),
            zone_id: Some("cn-hangzhou-b".to_string()),
            instance_type: Some("ecs.n4.large".to_string()),
            v_switch_id: Some("vsw-9".to_string()),
            security_group_id: Some("sg-9".to_string()),
            private_ip_address: Some("172.16.0.10".to_string()),
            description: Some("primary".to_string()),
            eip_allocation_id: None,
        };
        let spec = spec_from_tag(&tag, &image_with_mappings(vec![mapping("s", 40, "/dev/xvda")]));

        assert_eq!(spec.image_id, "m-1");
        assert_eq!(spec.instance_name, "app-01");
        assert_eq!(spec.host_name.as_deref(), Some("app-01"));
        assert_eq!(spec.zone_id.as_deref(), Some("cn-hangzhou-b"));
        assert_eq!(spec.instance_type.as_deref(), Some("ecs.n4.large"));
        assert_eq!(spec.v_switch_id.as_deref(), Some("vsw-9"));
        assert_eq!(spec.security_group_id.as_deref(), Some("sg-9"));
        assert_eq!(spec.private_ip_address.as_deref(), Some("172.16.0.10"));
        assert_eq!(spec.description.as_deref(), Some("primary"));
    }
}
