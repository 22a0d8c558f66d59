//! Alibaba Cloud ECS gateway
//!
//! Implements [`ecsflow_cloud::EcsGateway`] by shelling out to the `aliyun`
//! CLI, which owns request signing, transport, and pagination. This crate
//! only builds the invocations and normalizes the JSON responses into the
//! typed records.

pub mod cli;
pub mod error;
pub mod gateway;
mod wire;

pub use cli::AliyunCli;
pub use error::{AliyunError, Result};
pub use gateway::AliyunGateway;
