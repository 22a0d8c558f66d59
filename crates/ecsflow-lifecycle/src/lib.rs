//! ecsflow Lifecycle Orchestration
//!
//! Turns the provider's fire-and-forget mutations into synchronous,
//! terminal-state-checked operations, and composes them into the clone and
//! garbage-collection workflows. All state lives in the provider and is
//! rediscovered by polling; a process restart simply forgets in-flight
//! operations.

pub mod clone;
pub mod gc;
pub mod lifecycle;
pub mod poll;

// Re-exports
pub use clone::{CopyOptions, RunOptions, copy, data_disks_from_image, run_instance};
pub use gc::{GcOutcome, delete_disks, deregister_images, deregister_snapshots};
pub use lifecycle::{Lifecycle, image_name_for};
pub use poll::{PollConfig, wait_for};
