//! Image capture and cross-region copy

use colored::Colorize;
use ecsflow_cloud::{CopyImageRequest, EcsGateway, ImageFilter, InstanceFilter};
use ecsflow_lifecycle::Lifecycle;

/// Capture an image from every instance matching `name`
pub async fn create<G: EcsGateway>(ops: &Lifecycle<G>, name: &str) -> anyhow::Result<()> {
    let instances = ops
        .gateway()
        .describe_instances(&InstanceFilter::named(name))
        .await?;
    if instances.is_empty() {
        println!("{}", format!("no instance matches '{name}'").yellow());
        return Ok(());
    }

    for instance in &instances {
        let image = ops.capture_image(instance).await?;
        println!(
            "{}",
            format!("✓ captured {} => {}", image.image_name, image.image_id).green()
        );
    }
    Ok(())
}

/// Copy every image matching `name` to another region, preserving the name
/// and the tagged description
pub async fn copy<G: EcsGateway>(
    gateway: &G,
    name: &str,
    destination_region: &str,
) -> anyhow::Result<()> {
    for image in gateway.describe_images(&ImageFilter::named(name)).await? {
        let request = CopyImageRequest {
            image_id: image.image_id.clone(),
            destination_image_name: image.image_name.clone(),
            destination_description: image.description.clone(),
            destination_region_id: destination_region.to_string(),
        };
        let copied = gateway.copy_image(&request).await?;
        println!(
            "{}",
            format!(
                "✓ copying {} => {} ({})",
                image.image_name, copied, destination_region
            )
            .green()
        );
    }
    Ok(())
}
