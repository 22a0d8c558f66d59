//! Clone workflow commands

use colored::Colorize;
use ecsflow_cloud::EcsGateway;
use ecsflow_lifecycle::{CopyOptions, Lifecycle, RunOptions};
use std::collections::BTreeMap;

pub async fn copy<G: EcsGateway>(
    ops: &Lifecycle<G>,
    name: String,
    params: Vec<(String, String)>,
    renew: bool,
    auto_eip: bool,
) -> anyhow::Result<()> {
    println!("{}", format!("cloning '{name}'...").yellow());
    let options = CopyOptions {
        name,
        renew,
        auto_eip,
        overrides: params.into_iter().collect::<BTreeMap<_, _>>(),
    };
    let created = ecsflow_lifecycle::copy(ops, &options).await?;
    for instance in &created {
        println!(
            "{}",
            format!(
                "✓ cloned {} => {}",
                instance.instance_name, instance.instance_id
            )
            .green()
            .bold()
        );
    }
    Ok(())
}

pub async fn run_instance<G: EcsGateway>(
    ops: &Lifecycle<G>,
    name: String,
    params: Vec<(String, String)>,
    auto_eip: bool,
) -> anyhow::Result<()> {
    println!("{}", format!("provisioning from image '{name}.*'...").yellow());
    let options = RunOptions {
        name,
        auto_eip,
        overrides: params.into_iter().collect::<BTreeMap<_, _>>(),
    };
    let created = ecsflow_lifecycle::run_instance(ops, &options).await?;
    println!(
        "{}",
        format!(
            "✓ created {} => {}",
            created.instance_name, created.instance_id
        )
        .green()
        .bold()
    );
    Ok(())
}
