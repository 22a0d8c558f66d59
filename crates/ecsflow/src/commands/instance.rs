//! Instance stop/delete commands

use colored::Colorize;
use ecsflow_cloud::EcsGateway;
use ecsflow_lifecycle::Lifecycle;

pub async fn delete<G: EcsGateway>(ops: &Lifecycle<G>, name: &str) -> anyhow::Result<()> {
    println!("{}", format!("deleting '{name}'...").yellow());
    let deleted = ops.destroy_instances_named(name).await?;
    if deleted.is_empty() {
        println!("{}", format!("no instance matches '{name}'").yellow());
    }
    for instance_id in &deleted {
        println!("{}", format!("✓ deleted {instance_id}").green());
    }
    Ok(())
}

pub async fn stop<G: EcsGateway>(ops: &Lifecycle<G>, name: &str) -> anyhow::Result<()> {
    println!("{}", format!("stopping '{name}'...").yellow());
    let stopped = ops.stop_instances_named(name).await?;
    if stopped.is_empty() {
        println!("{}", format!("no instance matches '{name}'").yellow());
    }
    for instance_id in &stopped {
        println!("{}", format!("✓ stopped {instance_id}").green());
    }
    Ok(())
}
