//! Gateway configuration
//!
//! Region and credential scope are explicit constructor parameters rather
//! than ambient process state; the CLI edge is the only place that reads the
//! environment.

/// Scope for every gateway request
#[derive(Debug, Clone)]
pub struct EcsConfig {
    /// Region id threaded into each provider call
    pub region: String,
    /// Named credentials profile of the provider CLI; the default profile
    /// is used when unset
    pub profile: Option<String>,
}

impl EcsConfig {
    pub fn new(region: impl Into<String>) -> Self {
        Self {
            region: region.into(),
            profile: None,
        }
    }

    pub fn with_profile(mut self, profile: impl Into<String>) -> Self {
        self.profile = Some(profile.into());
        self
    }
}
