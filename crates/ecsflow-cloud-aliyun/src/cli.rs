//! `aliyun` CLI wrapper
//!
//! Builds and runs `aliyun ecs <Action> --Flag value ...` invocations and
//! returns their stdout. Region (and an optional credentials profile) come
//! from the [`EcsConfig`] the wrapper was constructed with; every call is
//! scoped to it.

use crate::error::{AliyunError, Result};
use ecsflow_cloud::{DataDiskSpec, EcsConfig, InstanceSpec};
use std::process::Stdio;
use tokio::process::Command;

/// `aliyun` CLI wrapper
pub struct AliyunCli {
    config: EcsConfig,
}

impl AliyunCli {
    pub fn new(config: EcsConfig) -> Self {
        Self { config }
    }

    pub fn region(&self) -> &str {
        &self.config.region
    }

    /// Run an ECS action and return stdout
    pub async fn run(&self, action: &str, params: &Params) -> Result<String> {
        let mut cmd = Command::new("aliyun");
        if let Some(profile) = &self.config.profile {
            cmd.arg("--profile").arg(profile);
        }
        cmd.arg("ecs").arg(action);
        cmd.arg("--RegionId").arg(&self.config.region);
        for (flag, value) in &params.0 {
            cmd.arg(format!("--{flag}")).arg(value);
        }
        cmd.stdout(Stdio::piped());
        cmd.stderr(Stdio::piped());

        tracing::debug!(
            "Running: aliyun ecs {} --RegionId {} ({} flags)",
            action,
            self.config.region,
            params.0.len()
        );

        let output = cmd.output().await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                AliyunError::CliNotFound
            } else {
                AliyunError::Io(e)
            }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(AliyunError::CommandFailed(stderr.trim().to_string()));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

/// Ordered `--Flag value` pairs for one invocation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params(pub(crate) Vec<(String, String)>);

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, flag: &str, value: impl Into<String>) {
        self.0.push((flag.to_string(), value.into()));
    }

    /// Push when the value is present and non-empty; the provider fills its
    /// own defaults for omitted parameters.
    pub fn push_opt(&mut self, flag: &str, value: Option<&str>) {
        if let Some(value) = value {
            if !value.is_empty() {
                self.push(flag, value);
            }
        }
    }
}

/// Flatten an instance creation request into CLI parameters.
///
/// Typed fields first, positional data-disk parameters next, raw overrides
/// last (so a caller-supplied flag of the same name wins on the provider
/// side, which keeps the last occurrence).
pub fn create_instance_params(spec: &InstanceSpec) -> Params {
    let mut params = Params::new();
    params.push("ImageId", &spec.image_id);
    params.push("InstanceName", &spec.instance_name);
    params.push_opt("ZoneId", spec.zone_id.as_deref());
    params.push_opt("InstanceType", spec.instance_type.as_deref());
    params.push_opt("HostName", spec.host_name.as_deref());
    params.push_opt("VSwitchId", spec.v_switch_id.as_deref());
    params.push_opt("SecurityGroupId", spec.security_group_id.as_deref());
    params.push_opt("Description", spec.description.as_deref());
    params.push_opt("PrivateIpAddress", spec.private_ip_address.as_deref());
    params.push("SystemDisk.Category", &spec.system_disk_category);
    for disk in &spec.data_disks {
        push_data_disk(&mut params, disk);
    }
    for (key, value) in &spec.extra {
        params.push(key, value);
    }
    params
}

fn push_data_disk(params: &mut Params, disk: &DataDiskSpec) {
    let n = disk.index;
    params.push(&format!("DataDisk.{n}.Category"), &disk.category);
    params.push(&format!("DataDisk.{n}.SnapshotId"), &disk.snapshot_id);
    params.push(&format!("DataDisk.{n}.Size"), disk.size.to_string());
    params.push(&format!("DataDisk.{n}.Device"), &disk.device);
    params.push(
        &format!("DataDisk.{n}.DeleteWithInstance"),
        disk.delete_with_instance.to_string(),
    );
}
