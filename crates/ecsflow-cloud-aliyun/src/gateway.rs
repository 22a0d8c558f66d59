//! `EcsGateway` implementation backed by the `aliyun` CLI

use crate::cli::{AliyunCli, Params, create_instance_params};
use crate::wire;
use async_trait::async_trait;
use ecsflow_cloud::{
    CopyImageRequest, CreateImageRequest, Disk, DiskFilter, EcsConfig, EcsGateway, EipAddress,
    EipFilter, Image, ImageFilter, Instance, InstanceFilter, InstanceSpec, Region, Result,
    Snapshot, SnapshotFilter,
};

const PAGE_SIZE: &str = "100";

/// Alibaba Cloud ECS gateway
pub struct AliyunGateway {
    cli: AliyunCli,
}

impl AliyunGateway {
    pub fn new(config: EcsConfig) -> Self {
        Self {
            cli: AliyunCli::new(config),
        }
    }

    pub fn region(&self) -> &str {
        self.cli.region()
    }

    async fn call(&self, action: &str, params: &Params) -> Result<String> {
        self.cli.run(action, params).await.map_err(Into::into)
    }
}

#[async_trait]
impl EcsGateway for AliyunGateway {
    async fn describe_regions(&self) -> Result<Vec<Region>> {
        let output = self.call("DescribeRegions", &Params::new()).await?;
        let response: wire::DescribeRegionsResponse = serde_json::from_str(&output)?;
        Ok(response.regions.region.into_iter().map(Into::into).collect())
    }

    async fn describe_images(&self, filter: &ImageFilter) -> Result<Vec<Image>> {
        let mut params = Params::new();
        params.push_opt("ImageName", filter.image_name.as_deref());
        params.push_opt("ImageOwnerAlias", filter.image_owner_alias.as_deref());
        params.push_opt("Usage", filter.usage.as_deref());
        params.push_opt("Status", filter.status.as_deref());
        params.push("PageSize", PAGE_SIZE);

        let output = self.call("DescribeImages", &params).await?;
        let response: wire::DescribeImagesResponse = serde_json::from_str(&output)?;
        response
            .images
            .image
            .into_iter()
            .map(wire::convert_image)
            .collect()
    }

    async fn describe_instances(&self, filter: &InstanceFilter) -> Result<Vec<Instance>> {
        let mut params = Params::new();
        params.push_opt("InstanceName", filter.instance_name.as_deref());
        if !filter.instance_ids.is_empty() {
            // The API takes instance ids as an embedded JSON array
            params.push("InstanceIds", serde_json::to_string(&filter.instance_ids)?);
        }
        params.push("PageSize", PAGE_SIZE);

        let output = self.call("DescribeInstances", &params).await?;
        let response: wire::DescribeInstancesResponse = serde_json::from_str(&output)?;
        Ok(response
            .instances
            .instance
            .into_iter()
            .map(Into::into)
            .collect())
    }

    async fn describe_snapshots(&self, filter: &SnapshotFilter) -> Result<Vec<Snapshot>> {
        let mut params = Params::new();
        params.push_opt("SnapshotName", filter.snapshot_name.as_deref());
        params.push_opt("Usage", filter.usage.as_deref());
        params.push("PageSize", PAGE_SIZE);

        let output = self.call("DescribeSnapshots", &params).await?;
        let response: wire::DescribeSnapshotsResponse = serde_json::from_str(&output)?;
        Ok(response
            .snapshots
            .snapshot
            .into_iter()
            .map(Into::into)
            .collect())
    }

    async fn describe_disks(&self, filter: &DiskFilter) -> Result<Vec<Disk>> {
        let mut params = Params::new();
        params.push_opt("DiskName", filter.disk_name.as_deref());
        params.push("PageSize", PAGE_SIZE);

        let output = self.call("DescribeDisks", &params).await?;
        let response: wire::DescribeDisksResponse = serde_json::from_str(&output)?;
        Ok(response.disks.disk.into_iter().map(Into::into).collect())
    }

    async fn describe_eip_addresses(&self, filter: &EipFilter) -> Result<Vec<EipAddress>> {
        let mut params = Params::new();
        params.push_opt("EipAddress", filter.eip_address.as_deref());
        params.push_opt("AllocationId", filter.allocation_id.as_deref());
        params.push("PageSize", PAGE_SIZE);

        let output = self.call("DescribeEipAddresses", &params).await?;
        let response: wire::DescribeEipAddressesResponse = serde_json::from_str(&output)?;
        Ok(response
            .eip_addresses
            .eip_address
            .into_iter()
            .map(Into::into)
            .collect())
    }

    async fn create_image(&self, request: &CreateImageRequest) -> Result<String> {
        let mut params = Params::new();
        params.push("InstanceId", &request.instance_id);
        params.push("ImageName", &request.image_name);
        params.push("Description", &request.description);

        let output = self.call("CreateImage", &params).await?;
        let response: wire::CreateImageResponse = serde_json::from_str(&output)?;
        Ok(response.image_id)
    }

    async fn copy_image(&self, request: &CopyImageRequest) -> Result<String> {
        let mut params = Params::new();
        params.push("ImageId", &request.image_id);
        params.push("DestinationImageName", &request.destination_image_name);
        params.push("DestinationDescription", &request.destination_description);
        params.push("DestinationRegionId", &request.destination_region_id);

        let output = self.call("CopyImage", &params).await?;
        let response: wire::CopyImageResponse = serde_json::from_str(&output)?;
        Ok(response.image_id)
    }

    async fn delete_image(&self, image_id: &str) -> Result<()> {
        let mut params = Params::new();
        params.push("ImageId", image_id);
        self.call("DeleteImage", &params).await?;
        Ok(())
    }

    async fn delete_snapshot(&self, snapshot_id: &str) -> Result<()> {
        let mut params = Params::new();
        params.push("SnapshotId", snapshot_id);
        self.call("DeleteSnapshot", &params).await?;
        Ok(())
    }

    async fn delete_disk(&self, disk_id: &str) -> Result<()> {
        let mut params = Params::new();
        params.push("DiskId", disk_id);
        self.call("DeleteDisk", &params).await?;
        Ok(())
    }

    async fn create_instance(&self, spec: &InstanceSpec) -> Result<String> {
        let params = create_instance_params(spec);
        let output = self.call("CreateInstance", &params).await?;
        let response: wire::CreateInstanceResponse = serde_json::from_str(&output)?;
        Ok(response.instance_id)
    }

    async fn delete_instance(&self, instance_id: &str) -> Result<()> {
        let mut params = Params::new();
        params.push("InstanceId", instance_id);
        self.call("DeleteInstance", &params).await?;
        Ok(())
    }

    async fn stop_instance(&self, instance_id: &str) -> Result<()> {
        let mut params = Params::new();
        params.push("InstanceId", instance_id);
        self.call("StopInstance", &params).await?;
        Ok(())
    }

    async fn start_instance(&self, instance_id: &str) -> Result<()> {
        let mut params = Params::new();
        params.push("InstanceId", instance_id);
        self.call("StartInstance", &params).await?;
        Ok(())
    }

    async fn allocate_eip_address(&self) -> Result<EipAddress> {
        let output = self.call("AllocateEipAddress", &Params::new()).await?;
        let response: wire::AllocateEipAddressResponse = serde_json::from_str(&output)?;
        Ok(response.into())
    }

    async fn release_eip_address(&self, allocation_id: &str) -> Result<()> {
        let mut params = Params::new();
        params.push("AllocationId", allocation_id);
        self.call("ReleaseEipAddress", &params).await?;
        Ok(())
    }

    async fn associate_eip_address(&self, allocation_id: &str, instance_id: &str) -> Result<()> {
        let mut params = Params::new();
        params.push("AllocationId", allocation_id);
        params.push("InstanceId", instance_id);
        self.call("AssociateEipAddress", &params).await?;
        Ok(())
    }

    async fn unassociate_eip_address(&self, allocation_id: &str, instance_id: &str) -> Result<()> {
        let mut params = Params::new();
        params.push("AllocationId", allocation_id);
        params.push("InstanceId", instance_id);
        self.call("UnassociateEipAddress", &params).await?;
        Ok(())
    }
}
