//! Elastic IP binding commands

use anyhow::anyhow;
use colored::Colorize;
use ecsflow_cloud::{EcsGateway, EipFilter, InstanceFilter};
use ecsflow_lifecycle::Lifecycle;

/// Bind an existing elastic IP (looked up by address) to the instance
/// matching `name`
pub async fn associate<G: EcsGateway>(
    ops: &Lifecycle<G>,
    name: &str,
    eip_address: &str,
) -> anyhow::Result<()> {
    let eip = ops
        .gateway()
        .describe_eip_addresses(&EipFilter::with_address(eip_address))
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| anyhow!("no elastic IP matches '{eip_address}'"))?;
    let instance = ops
        .gateway()
        .describe_instances(&InstanceFilter::named(name))
        .await?
        .into_iter()
        .next()
        .ok_or_else(|| anyhow!("no instance matches '{name}'"))?;

    ops.associate_eip(&instance.instance_id, Some(&eip.allocation_id))
        .await?;
    println!(
        "{}",
        format!("✓ associated {} => {}", eip.ip_address, instance.instance_id).green()
    );
    Ok(())
}

/// Unbind the elastic IP from every instance matching `name`
pub async fn unassociate<G: EcsGateway>(gateway: &G, name: &str) -> anyhow::Result<()> {
    for instance in gateway
        .describe_instances(&InstanceFilter::named(name))
        .await?
    {
        match &instance.eip {
            Some(eip) => {
                gateway
                    .unassociate_eip_address(&eip.allocation_id, &instance.instance_id)
                    .await?;
                println!(
                    "{}",
                    format!(
                        "✓ unassociated {} from {}",
                        eip.ip_address, instance.instance_id
                    )
                    .green()
                );
            }
            None => {
                println!(
                    "{}",
                    format!("ℹ {} has no elastic IP", instance.instance_id).dimmed()
                );
            }
        }
    }
    Ok(())
}

/// Release every elastic IP matching the filter
pub async fn release<G: EcsGateway>(gateway: &G, eip_address: Option<&str>) -> anyhow::Result<()> {
    let filter = EipFilter {
        eip_address: eip_address.map(str::to_owned),
        ..EipFilter::default()
    };
    for eip in gateway.describe_eip_addresses(&filter).await? {
        gateway.release_eip_address(&eip.allocation_id).await?;
        println!("{}", format!("✓ released {}", eip.ip_address).green());
    }
    Ok(())
}
