use std::error::Error;
use std::sync::Arc;

use async_trait::async_trait;
use linkme::distributed_slice;

use crate::config::Config;
use crate::engine::scheduler::Scheduler;
use crate::engine::store::StateStore;

/// Result type for integration factory functions
///
/// `Ok(None)` means the integration is not configured and should be skipped.
/// `Err` means the integration is configured but cannot be built, which is
/// fatal: a daemon that silently drops a misconfigured integration looks
/// healthy while doing nothing.
pub type IntegrationFactoryResult = anyhow::Result<Option<Box<dyn Integration>>>;

/// Context passed to integration factory functions
pub struct IntegrationContext<'a> {
    pub config: &'a Config,
    pub store: &'a Arc<StateStore>,
    pub scheduler: &'a Scheduler,
}

/// Registry of integration factory functions, populated at link time
#[distributed_slice]
pub static REGISTRY: [fn(&IntegrationContext) -> IntegrationFactoryResult];

/// Integration trait that all integrations must implement
#[async_trait]
pub trait Integration: Send + Sync {
    /// Name/identifier of this integration
    fn name(&self) -> &str;

    /// Start the integration: connect transports, schedule jobs, spawn
    /// listeners
    async fn setup(&mut self) -> Result<(), Box<dyn Error + Send>>;

    /// Shutdown the integration gracefully
    async fn shutdown(&mut self) -> Result<(), Box<dyn Error + Send>>;
}
