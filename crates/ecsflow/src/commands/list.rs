//! Read-only listing commands, each mapping 1:1 onto a single describe call

use super::print_json;
use ecsflow_cloud::{DiskFilter, EcsGateway, EipFilter, ImageFilter, InstanceFilter, SnapshotFilter};

pub async fn regions<G: EcsGateway>(gateway: &G) -> anyhow::Result<()> {
    print_json(&gateway.describe_regions().await?)
}

pub async fn images<G: EcsGateway>(gateway: &G, name: Option<&str>) -> anyhow::Result<()> {
    let filter = ImageFilter {
        image_name: name.map(str::to_owned),
        ..ImageFilter::default()
    };
    print_json(&gateway.describe_images(&filter).await?)
}

pub async fn instances<G: EcsGateway>(gateway: &G, name: Option<&str>) -> anyhow::Result<()> {
    let filter = InstanceFilter {
        instance_name: name.map(str::to_owned),
        ..InstanceFilter::default()
    };
    print_json(&gateway.describe_instances(&filter).await?)
}

pub async fn snapshots<G: EcsGateway>(gateway: &G, name: Option<&str>) -> anyhow::Result<()> {
    let filter = SnapshotFilter {
        snapshot_name: name.map(str::to_owned),
        ..SnapshotFilter::default()
    };
    print_json(&gateway.describe_snapshots(&filter).await?)
}

pub async fn disks<G: EcsGateway>(gateway: &G, name: Option<&str>) -> anyhow::Result<()> {
    let filter = DiskFilter {
        disk_name: name.map(str::to_owned),
    };
    print_json(&gateway.describe_disks(&filter).await?)
}

pub async fn eip_addresses<G: EcsGateway>(
    gateway: &G,
    eip_address: Option<&str>,
) -> anyhow::Result<()> {
    let filter = EipFilter {
        eip_address: eip_address.map(str::to_owned),
        ..EipFilter::default()
    };
    print_json(&gateway.describe_eip_addresses(&filter).await?)
}
