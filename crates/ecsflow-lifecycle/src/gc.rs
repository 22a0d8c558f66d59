//! Image and snapshot retention sweeps

use ecsflow_cloud::{
    DiskFilter, EcsGateway, Image, ImageFilter, ProvenanceTag, Result, SnapshotFilter,
};
use std::collections::BTreeMap;

/// Ids removed by a retention sweep
#[derive(Debug, Clone, Default)]
pub struct GcOutcome {
    pub deleted_images: Vec<String>,
    pub deleted_snapshots: Vec<String>,
}

/// Delete all but the `keep` most recent images per logical instance name.
///
/// Only images owned by this account, unused, and `Available` are
/// considered; images without a decodable provenance tag are skipped. Each
/// deleted image takes its dependent snapshots with it, image first. A
/// snapshot still referenced by a retained image of a different group is
/// not protected.
pub async fn deregister_images<G: EcsGateway>(
    gateway: &G,
    name: Option<&str>,
    keep: usize,
) -> Result<GcOutcome> {
    let filter = ImageFilter {
        image_name: name.map(str::to_owned),
        image_owner_alias: Some("self".to_string()),
        usage: Some("none".to_string()),
        status: Some("Available".to_string()),
    };
    let mut images = gateway.describe_images(&filter).await?;
    images.sort_by(|a, b| b.creation_time.cmp(&a.creation_time));

    let mut groups: BTreeMap<String, Vec<Image>> = BTreeMap::new();
    for image in images {
        match ProvenanceTag::decode(&image.description) {
            Ok(tag) => groups.entry(tag.instance_name).or_default().push(image),
            Err(_) => tracing::warn!("skipping untagged image {}", image.image_id),
        }
    }

    let mut outcome = GcOutcome::default();
    for (name, group) in groups {
        for image in group.into_iter().skip(keep) {
            tracing::info!("deregistering {} ({})", image.image_id, name);
            gateway.delete_image(&image.image_id).await?;
            outcome.deleted_images.push(image.image_id);
            for mapping in image.disk_device_mappings {
                tracing::info!("delete snapshot => {}", mapping.snapshot_id);
                gateway.delete_snapshot(&mapping.snapshot_id).await?;
                outcome.deleted_snapshots.push(mapping.snapshot_id);
            }
        }
    }
    Ok(outcome)
}

/// Delete every unattached snapshot matching `name`, unconditionally.
pub async fn deregister_snapshots<G: EcsGateway>(
    gateway: &G,
    name: Option<&str>,
) -> Result<Vec<String>> {
    let filter = SnapshotFilter {
        snapshot_name: name.map(str::to_owned),
        usage: Some("none".to_string()),
    };
    let mut deleted = Vec::new();
    for snapshot in gateway.describe_snapshots(&filter).await? {
        tracing::info!("delete snapshot => {}", snapshot.snapshot_id);
        gateway.delete_snapshot(&snapshot.snapshot_id).await?;
        deleted.push(snapshot.snapshot_id);
    }
    Ok(deleted)
}

/// Delete every disk matching `name`.
pub async fn delete_disks<G: EcsGateway>(gateway: &G, name: Option<&str>) -> Result<Vec<String>> {
    let filter = DiskFilter {
        disk_name: name.map(str::to_owned),
    };
    let mut deleted = Vec::new();
    for disk in gateway.describe_disks(&filter).await? {
        tracing::info!("delete disk => {}", disk.disk_id);
        gateway.delete_disk(&disk.disk_id).await?;
        deleted.push(disk.disk_id);
    }
    Ok(deleted)
}
