//! ecsflow Cloud Abstraction
//!
//! This crate provides the typed resource model and gateway abstraction for
//! ecsflow. The gateway is a thin, stateless adapter: it translates domain
//! intents (describe/create/delete a resource) into provider API calls and
//! normalizes the responses into typed records. It never waits for anything;
//! convergence is the lifecycle layer's job.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────┐
//! │                  ecsflow CLI                     │
//! │        (copy / run-instance / deregister)        │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │              ecsflow-lifecycle                   │
//! │   poller · lifecycle ops · clone workflows · gc  │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//! ┌─────────────────▼───────────────────────────────┐
//! │               ecsflow-cloud                      │
//! │  trait EcsGateway { ... }   typed records        │
//! └─────────────────┬───────────────────────────────┘
//!                   │
//!           ┌───────▼────────┐
//!           │ aliyun gateway │
//!           │  (aliyun CLI)  │
//!           └────────────────┘
//! ```

pub mod config;
pub mod error;
pub mod gateway;
pub mod model;
pub mod tag;

// Re-exports
pub use config::EcsConfig;
pub use error::{CloudError, Result};
pub use gateway::{
    CopyImageRequest, CreateImageRequest, DataDiskSpec, DiskFilter, EcsGateway, EipFilter,
    ImageFilter, InstanceFilter, InstanceSpec, SnapshotFilter,
};
pub use model::{
    Disk, DiskDeviceMapping, EipAddress, EipBinding, Image, Instance, InstanceStatus, Region,
    Snapshot, VpcAttributes,
};
pub use tag::ProvenanceTag;
