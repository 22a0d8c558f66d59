//! Lifecycle operations
//!
//! Each operation wraps a single asynchronous provider mutation with a
//! completion wait, so callers observe converged resources rather than
//! accepted requests.

use crate::poll::{self, PollConfig};
use chrono::{Local, NaiveDateTime};
use ecsflow_cloud::{
    CloudError, CreateImageRequest, EcsGateway, Image, ImageFilter, Instance, InstanceFilter,
    InstanceSpec, InstanceStatus, ProvenanceTag, Result,
};

/// Image names are `{instance_name}.{timestamp}`, compact numeric timestamp.
/// The name doubles as the convergence key for the capture wait.
pub fn image_name_for(instance_name: &str, at: NaiveDateTime) -> String {
    format!("{}.{}", instance_name, at.format("%Y%m%d%H%M%S"))
}

/// Lifecycle operations over a gateway, sharing one polling configuration
pub struct Lifecycle<G> {
    gateway: G,
    poll: PollConfig,
}

impl<G: EcsGateway> Lifecycle<G> {
    pub fn new(gateway: G) -> Self {
        Self {
            gateway,
            poll: PollConfig::default(),
        }
    }

    pub fn with_poll(gateway: G, poll: PollConfig) -> Self {
        Self { gateway, poll }
    }

    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Capture an image of `instance` with its configuration encoded into
    /// the description, and wait until the image is visible in listings.
    pub async fn capture_image(&self, instance: &Instance) -> Result<Image> {
        let image_name = image_name_for(&instance.instance_name, Local::now().naive_local());
        let tag = ProvenanceTag::from_instance(instance);
        let request = CreateImageRequest {
            instance_id: instance.instance_id.clone(),
            image_name: image_name.clone(),
            description: tag.encode(),
        };
        let accepted_id = self.gateway.create_image(&request).await?;
        tracing::info!("creating image => {}", image_name);
        tracing::debug!("accepted image id => {}", accepted_id);

        let gateway = &self.gateway;
        let filter = ImageFilter::named(&image_name);
        let image = poll::wait_for(
            &self.poll,
            move || {
                let filter = filter.clone();
                async move { Ok(gateway.describe_images(&filter).await?.into_iter().next()) }
            },
            |_image: &Image| true,
        )
        .await?;
        tracing::info!("ImageId => {}", image.image_id);
        Ok(image)
    }

    /// Create an instance and wait until the provider has provisioned it.
    /// New instances land in `Stopped`; this confirms provisioning
    /// completion, not a running state.
    pub async fn provision_instance(&self, spec: &InstanceSpec) -> Result<Instance> {
        let accepted_id = self.gateway.create_instance(spec).await?;
        tracing::info!("creating instance => {} ({})", spec.instance_name, accepted_id);

        let gateway = &self.gateway;
        let filter = InstanceFilter::named(&spec.instance_name);
        let instance = poll::wait_for(
            &self.poll,
            move || {
                let filter = filter.clone();
                async move {
                    Ok(gateway.describe_instances(&filter).await?.into_iter().next())
                }
            },
            Instance::is_stopped,
        )
        .await?;
        tracing::info!("created {}", spec.instance_name);
        Ok(instance)
    }

    /// Idempotent stop: an already-stopped instance issues no stop call.
    pub async fn stop_instance(&self, instance_id: &str) -> Result<()> {
        let current = self.describe_instance(instance_id).await?;
        if current.status == InstanceStatus::Stopped {
            return Ok(());
        }

        self.gateway.stop_instance(instance_id).await?;
        let gateway = &self.gateway;
        let filter = InstanceFilter::with_id(instance_id);
        poll::wait_for(
            &self.poll,
            move || {
                let filter = filter.clone();
                async move {
                    Ok(gateway.describe_instances(&filter).await?.into_iter().next())
                }
            },
            Instance::is_stopped,
        )
        .await?;
        tracing::info!("stopped {}", instance_id);
        Ok(())
    }

    /// Stop-then-delete. Deletion requires a stopped instance, so the stop
    /// wait always runs first.
    pub async fn destroy_instance(&self, instance_id: &str) -> Result<()> {
        self.stop_instance(instance_id).await?;
        self.gateway.delete_instance(instance_id).await?;
        tracing::info!("deleted {}", instance_id);
        Ok(())
    }

    /// Stop and delete every instance matching `name`, sequentially.
    pub async fn destroy_instances_named(&self, name: &str) -> Result<Vec<String>> {
        let instances = self
            .gateway
            .describe_instances(&InstanceFilter::named(name))
            .await?;
        let mut deleted = Vec::new();
        for instance in instances {
            self.destroy_instance(&instance.instance_id).await?;
            deleted.push(instance.instance_id);
        }
        Ok(deleted)
    }

    /// Stop every instance matching `name`, sequentially.
    pub async fn stop_instances_named(&self, name: &str) -> Result<Vec<String>> {
        let instances = self
            .gateway
            .describe_instances(&InstanceFilter::named(name))
            .await?;
        let mut stopped = Vec::new();
        for instance in instances {
            self.stop_instance(&instance.instance_id).await?;
            stopped.push(instance.instance_id);
        }
        Ok(stopped)
    }

    /// Bind an elastic IP to `instance_id`. With no allocation id supplied,
    /// a fresh address is allocated first, so the same operation serves
    /// both reassign and mint. Returns the allocation id that was bound.
    pub async fn associate_eip(
        &self,
        instance_id: &str,
        allocation_id: Option<&str>,
    ) -> Result<String> {
        let allocation_id = match allocation_id {
            Some(id) => id.to_string(),
            None => {
                let eip = self.gateway.allocate_eip_address().await?;
                tracing::info!("allocated {} ({})", eip.ip_address, eip.allocation_id);
                eip.allocation_id
            }
        };
        self.gateway
            .associate_eip_address(&allocation_id, instance_id)
            .await?;
        Ok(allocation_id)
    }

    /// Request an asynchronous start; deliberately no wait for `Running`.
    pub async fn start_instance(&self, instance_id: &str) -> Result<()> {
        self.gateway.start_instance(instance_id).await?;
        tracing::info!("starting {}", instance_id);
        Ok(())
    }

    async fn describe_instance(&self, instance_id: &str) -> Result<Instance> {
        self.gateway
            .describe_instances(&InstanceFilter::with_id(instance_id))
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| CloudError::ResourceNotFound(format!("instance {instance_id}")))
    }
}
