mod commands;

use clap::{Parser, Subcommand};
use ecsflow_cloud::EcsConfig;
use ecsflow_cloud_aliyun::AliyunGateway;
use ecsflow_lifecycle::Lifecycle;

#[derive(Parser)]
#[command(name = "ecsflow")]
#[command(about = "Operator CLI for ECS instance, image, and elastic IP lifecycle", long_about = None)]
struct Cli {
    /// Region id every request is scoped to
    #[arg(long, env = "ALIYUN_REGION", global = true)]
    region: Option<String>,

    /// aliyun CLI credentials profile
    #[arg(long, env = "ALIYUN_PROFILE", global = true)]
    profile: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List regions
    Regions,
    /// List images
    Images {
        /// Image name filter (wildcards allowed)
        #[arg(short, long)]
        name: Option<String>,
    },
    /// List instances
    Instances {
        /// Instance name filter
        #[arg(short, long)]
        name: Option<String>,
    },
    /// List snapshots
    Snapshots {
        /// Snapshot name filter
        #[arg(short, long)]
        name: Option<String>,
    },
    /// List disks
    Disks {
        /// Disk name filter
        #[arg(short, long)]
        name: Option<String>,
    },
    /// List elastic IP addresses
    EipAddresses {
        /// Elastic IP address filter
        #[arg(short, long)]
        eip_address: Option<String>,
    },
    /// Capture an image from every instance matching NAME
    CreateImage {
        /// Instance name
        #[arg(short, long)]
        name: String,
    },
    /// Copy matching images to another region
    CopyImage {
        /// Image name filter
        #[arg(short, long)]
        name: String,
        /// Destination region id
        #[arg(long)]
        destination_region: String,
    },
    /// Clone every instance matching NAME through a fresh image
    Copy {
        /// Instance name
        #[arg(short, long)]
        name: String,
        /// Override creation parameters (key=value, repeatable)
        #[arg(short, long = "param", value_parser = parse_key_val)]
        params: Vec<(String, String)>,
        /// Destroy the source instance after its image is captured
        #[arg(short, long)]
        renew: bool,
        /// Re-bind the source's elastic IP to the replacement
        #[arg(long)]
        auto_eip: bool,
    },
    /// Provision an instance from the newest image tagged with NAME
    RunInstance {
        /// Logical instance name (selects images named NAME.*)
        #[arg(short, long)]
        name: String,
        /// Override creation parameters (key=value, repeatable)
        #[arg(short, long = "param", value_parser = parse_key_val)]
        params: Vec<(String, String)>,
        /// Associate an elastic IP even if the tagged one is gone
        #[arg(long)]
        auto_eip: bool,
    },
    /// Delete old images and their snapshots, keeping the newest per instance
    DeregisterImages {
        /// Image name filter
        #[arg(short, long)]
        name: Option<String>,
        /// Images to retain per logical instance name
        #[arg(long, default_value_t = 2)]
        keep: usize,
    },
    /// Delete unattached snapshots matching NAME
    DeleteSnapshots {
        /// Snapshot name filter
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Delete disks matching NAME
    DeleteDisks {
        /// Disk name filter
        #[arg(short, long)]
        name: Option<String>,
    },
    /// Stop and delete every instance matching NAME
    DeleteInstance {
        /// Instance name
        #[arg(short, long)]
        name: String,
    },
    /// Stop every instance matching NAME
    StopInstance {
        /// Instance name
        #[arg(short, long)]
        name: String,
    },
    /// Bind an elastic IP to the instance matching NAME
    AssociateEipAddress {
        /// Instance name
        #[arg(short, long)]
        name: String,
        /// Elastic IP address to bind
        #[arg(short, long)]
        eip_address: String,
    },
    /// Unbind the elastic IP from every instance matching NAME
    UnassociateEipAddress {
        /// Instance name
        #[arg(short, long)]
        name: String,
    },
    /// Release matching elastic IPs
    ReleaseEipAddresses {
        /// Elastic IP address filter
        #[arg(short, long)]
        eip_address: Option<String>,
    },
    /// Show version
    Version,
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got {s:?}"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();

    // Version needs no region or credentials
    if matches!(cli.command, Commands::Version) {
        println!("ecsflow {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    let region = cli
        .region
        .ok_or_else(|| anyhow::anyhow!("--region (or ALIYUN_REGION) is required"))?;
    let mut config = EcsConfig::new(region);
    if let Some(profile) = cli.profile {
        config = config.with_profile(profile);
    }
    tracing::debug!("region => {}", config.region);
    let ops = Lifecycle::new(AliyunGateway::new(config));

    match cli.command {
        Commands::Regions => commands::list::regions(ops.gateway()).await,
        Commands::Images { name } => commands::list::images(ops.gateway(), name.as_deref()).await,
        Commands::Instances { name } => {
            commands::list::instances(ops.gateway(), name.as_deref()).await
        }
        Commands::Snapshots { name } => {
            commands::list::snapshots(ops.gateway(), name.as_deref()).await
        }
        Commands::Disks { name } => commands::list::disks(ops.gateway(), name.as_deref()).await,
        Commands::EipAddresses { eip_address } => {
            commands::list::eip_addresses(ops.gateway(), eip_address.as_deref()).await
        }
        Commands::CreateImage { name } => commands::image::create(&ops, &name).await,
        Commands::CopyImage {
            name,
            destination_region,
        } => commands::image::copy(ops.gateway(), &name, &destination_region).await,
        Commands::Copy {
            name,
            params,
            renew,
            auto_eip,
        } => commands::clone::copy(&ops, name, params, renew, auto_eip).await,
        Commands::RunInstance {
            name,
            params,
            auto_eip,
        } => commands::clone::run_instance(&ops, name, params, auto_eip).await,
        Commands::DeregisterImages { name, keep } => {
            commands::gc::deregister_images(ops.gateway(), name.as_deref(), keep).await
        }
        Commands::DeleteSnapshots { name } => {
            commands::gc::delete_snapshots(ops.gateway(), name.as_deref()).await
        }
        Commands::DeleteDisks { name } => {
            commands::gc::delete_disks(ops.gateway(), name.as_deref()).await
        }
        Commands::DeleteInstance { name } => commands::instance::delete(&ops, &name).await,
        Commands::StopInstance { name } => commands::instance::stop(&ops, &name).await,
        Commands::AssociateEipAddress { name, eip_address } => {
            commands::eip::associate(&ops, &name, &eip_address).await
        }
        Commands::UnassociateEipAddress { name } => {
            commands::eip::unassociate(ops.gateway(), &name).await
        }
        Commands::ReleaseEipAddresses { eip_address } => {
            commands::eip::release(ops.gateway(), eip_address.as_deref()).await
        }
        Commands::Version => unreachable!(),
    }
}
