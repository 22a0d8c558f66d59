//! Async-operation completion polling
//!
//! The provider accepts mutations and completes them in the background; the
//! only way to observe completion is to re-describe the resource until it
//! reaches a terminal state.

use ecsflow_cloud::{CloudError, Result};
use std::future::Future;
use std::time::Duration;
use tokio::time::{Instant, sleep};

/// Polling cadence and optional bound for a convergence wait
#[derive(Debug, Clone)]
pub struct PollConfig {
    /// Delay between describe attempts
    pub interval: Duration,
    /// Overall bound on the wait; `None` waits indefinitely
    pub deadline: Option<Duration>,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(10),
            deadline: None,
        }
    }
}

impl PollConfig {
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }
}

/// Repeatedly describe a resource until it reaches a terminal state.
///
/// `describe` yielding `None` (a just-created resource not yet visible in
/// listings) and a resource failing `is_terminal` both wait one interval and
/// retry. An error from `describe` propagates immediately: retry applies to
/// "not yet converged", never to failed calls. With no deadline configured
/// the wait is unbounded.
pub async fn wait_for<R, F, Fut, P>(config: &PollConfig, mut describe: F, is_terminal: P) -> Result<R>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<R>>>,
    P: Fn(&R) -> bool,
{
    let started = Instant::now();
    loop {
        if let Some(resource) = describe().await? {
            if is_terminal(&resource) {
                return Ok(resource);
            }
        }
        if let Some(deadline) = config.deadline {
            if started.elapsed() >= deadline {
                return Err(CloudError::Timeout(format!(
                    "resource did not converge within {deadline:?}"
                )));
            }
        }
        sleep(config.interval).await;
    }
}
