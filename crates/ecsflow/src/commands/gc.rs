//! Retention sweep commands

use colored::Colorize;
use ecsflow_cloud::EcsGateway;

pub async fn deregister_images<G: EcsGateway>(
    gateway: &G,
    name: Option<&str>,
    keep: usize,
) -> anyhow::Result<()> {
    let outcome = ecsflow_lifecycle::deregister_images(gateway, name, keep).await?;
    println!(
        "{}",
        format!(
            "✓ deleted {} images and {} snapshots (kept the {} newest per instance)",
            outcome.deleted_images.len(),
            outcome.deleted_snapshots.len(),
            keep
        )
        .green()
    );
    Ok(())
}

pub async fn delete_snapshots<G: EcsGateway>(
    gateway: &G,
    name: Option<&str>,
) -> anyhow::Result<()> {
    let deleted = ecsflow_lifecycle::deregister_snapshots(gateway, name).await?;
    println!("{}", format!("✓ deleted {} snapshots", deleted.len()).green());
    Ok(())
}

pub async fn delete_disks<G: EcsGateway>(gateway: &G, name: Option<&str>) -> anyhow::Result<()> {
    let deleted = ecsflow_lifecycle::delete_disks(gateway, name).await?;
    println!("{}", format!("✓ deleted {} disks", deleted.len()).green());
    Ok(())
}
