use std::sync::Arc;

use tracing::{info, warn};

use crate::config::Config;
use crate::engine::integration::{Integration, IntegrationContext, REGISTRY};
use crate::engine::scheduler::Scheduler;
use crate::engine::store::StateStore;

/// The pulsed engine.
///
/// Builds integrations from the link-time registry, runs their lifecycle,
/// and owns the shared state store and scheduler they operate on.
pub struct Engine {
    store: Arc<StateStore>,
    scheduler: Scheduler,
    integrations: Vec<Box<dyn Integration>>,
}

impl Engine {
    pub fn new(store: Arc<StateStore>) -> Self {
        Self {
            store,
            scheduler: Scheduler::new(),
            integrations: Vec::new(),
        }
    }

    pub fn store(&self) -> &Arc<StateStore> {
        &self.store
    }

    /// Build every registered integration the config enables.
    ///
    /// A factory error is fatal and aborts startup. Skipped integrations
    /// (factory returned `None`) are not an error.
    pub fn register_integrations_from_config(&mut self, config: &Config) -> anyhow::Result<()> {
        let ctx = IntegrationContext {
            config,
            store: &self.store,
            scheduler: &self.scheduler,
        };

        for factory in REGISTRY {
            if let Some(integration) = factory(&ctx)? {
                info!("Registered integration: {}", integration.name());
                self.integrations.push(integration);
            }
        }

        if self.integrations.is_empty() {
            warn!("No integrations configured, the daemon will idle");
        }

        Ok(())
    }

    /// Run setup on every registered integration, in registration order.
    pub async fn start(&mut self) -> anyhow::Result<()> {
        for integration in &mut self.integrations {
            let name = integration.name().to_string();
            info!("Starting integration: {}", name);
            integration
                .setup()
                .await
                .map_err(|e| anyhow::anyhow!("integration {} failed to start: {}", name, e))?;
        }

        Ok(())
    }

    /// Shut down every integration, most recently started first.
    pub async fn stop(&mut self) {
        for integration in self.integrations.iter_mut().rev() {
            let name = integration.name().to_string();
            if let Err(e) = integration.shutdown().await {
                warn!("Integration {} failed to shut down cleanly: {}", name, e);
            }
        }
        self.integrations.clear();
    }

    #[cfg(test)]
    pub fn integration_names(&self) -> Vec<&str> {
        self.integrations.iter().map(|i| i.name()).collect()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn engine() -> Engine {
        Engine::new(Arc::new(StateStore::new(
            Duration::from_secs(60),
            Duration::from_secs(3600),
        )))
    }

    #[test]
    fn test_empty_config_registers_nothing() {
        let config: Config = toml::from_str("").unwrap();

        let mut engine = engine();
        engine.register_integrations_from_config(&config).unwrap();

        assert!(engine.integration_names().is_empty());
    }

    #[test]
    fn test_configured_integration_is_registered() {
        let config: Config = toml::from_str(
            r#"
            [pulse]
            api_key = "pk-123"
            "#,
        )
        .unwrap();

        let mut engine = engine();
        engine.register_integrations_from_config(&config).unwrap();

        assert_eq!(engine.integration_names(), vec!["pulse"]);
    }
}
