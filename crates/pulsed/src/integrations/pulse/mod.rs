//! The Pulse bridge integration.
//!
//! Polls the Pulse cloud API on two schedules (fast state updates, slow
//! topology discovery) and republishes everything over MQTT. The two jobs
//! are rescheduled on the fly when the intervals change in the state store.

mod config;
mod discovery;
mod entity;
mod publisher;

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use linkme::distributed_slice;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use pulse_api::PulseClient;

pub use config::Config as PulseConfig;
pub use entity::Topics;

use crate::engine;
use crate::engine::{JobHandle, Scheduler, StateStore};
use crate::integrations::mqtt::{MqttClient, RumqttcClient};

/// Environment variable consulted when the config has no API key.
const PULSE_API_KEY_ENV: &str = "PULSE_API_KEY";

/// Everything one poll cycle needs: the vendor client, the optional bus
/// transport, the shared store, and the topic layout.
pub(crate) struct Bridge<C: MqttClient> {
    pub(crate) client: PulseClient,
    pub(crate) mqtt: Option<Mutex<C>>,
    pub(crate) store: Arc<StateStore>,
    pub(crate) topics: Topics,
}

impl<C: MqttClient> Bridge<C> {
    /// Publish to the bus if a transport is configured. Failures are logged
    /// and swallowed; retained messages are re-published next cycle anyway.
    pub(crate) async fn publish(&self, topic: &str, payload: Vec<u8>, retain: bool) {
        let Some(mqtt) = &self.mqtt else { return };
        if let Err(e) = mqtt.lock().await.publish(topic, &payload, retain).await {
            warn!("Failed to publish to {}: {}", topic, e);
        }
    }
}

/// The two periodic jobs, held behind a mutex so the interval listener can
/// swap them out while they run.
#[derive(Default)]
struct Jobs {
    update: Option<JobHandle>,
    discovery: Option<JobHandle>,
}

fn schedule_update<C: MqttClient + 'static>(
    scheduler: &Scheduler,
    bridge: &Arc<Bridge<C>>,
    period: Duration,
) -> JobHandle {
    let bridge = bridge.clone();
    scheduler.run_every("pulse-update", period, move || {
        let bridge = bridge.clone();
        async move {
            publisher::run(&bridge).await;
        }
    })
}

fn schedule_discovery<C: MqttClient + 'static>(
    scheduler: &Scheduler,
    bridge: &Arc<Bridge<C>>,
    period: Duration,
) -> JobHandle {
    let bridge = bridge.clone();
    scheduler.run_every("pulse-discovery", period, move || {
        let bridge = bridge.clone();
        async move {
            if let Err(e) = discovery::run(&bridge).await {
                warn!("Discovery cycle failed: {:#}", e);
            }
        }
    })
}

/// Watch the store's interval values and reschedule the matching job on
/// every change. Each change cancels exactly one job and schedules exactly
/// one replacement, which fires immediately.
fn spawn_interval_listener<C: MqttClient + 'static>(
    scheduler: Scheduler,
    bridge: Arc<Bridge<C>>,
    jobs: Arc<Mutex<Jobs>>,
) -> JoinHandle<()> {
    let mut update_rx = bridge.store.watch_update_interval();
    let mut discovery_rx = bridge.store.watch_discovery_interval();

    tokio::spawn(async move {
        loop {
            tokio::select! {
                changed = update_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let period = *update_rx.borrow_and_update();
                    info!("Update interval changed to {:?}, rescheduling", period);
                    let mut jobs = jobs.lock().await;
                    if let Some(job) = jobs.update.take() {
                        job.cancel();
                    }
                    jobs.update = Some(schedule_update(&scheduler, &bridge, period));
                }
                changed = discovery_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let period = *discovery_rx.borrow_and_update();
                    info!("Discovery interval changed to {:?}, rescheduling", period);
                    let mut jobs = jobs.lock().await;
                    if let Some(job) = jobs.discovery.take() {
                        job.cancel();
                    }
                    jobs.discovery = Some(schedule_discovery(&scheduler, &bridge, period));
                }
            }
        }
    })
}

/// Pulse bridge integration
pub struct PulseIntegration<C: MqttClient + 'static> {
    bridge: Arc<Bridge<C>>,
    scheduler: Scheduler,
    jobs: Arc<Mutex<Jobs>>,
    listener: Option<JoinHandle<()>>,
}

impl<C: MqttClient + 'static> PulseIntegration<C> {
    pub fn new(
        client: PulseClient,
        mqtt: Option<C>,
        store: Arc<StateStore>,
        scheduler: Scheduler,
        topics: Topics,
    ) -> Self {
        Self {
            bridge: Arc::new(Bridge {
                client,
                mqtt: mqtt.map(Mutex::new),
                store,
                topics,
            }),
            scheduler,
            jobs: Arc::new(Mutex::new(Jobs::default())),
            listener: None,
        }
    }
}

#[async_trait]
impl<C: MqttClient + 'static> engine::Integration for PulseIntegration<C> {
    fn name(&self) -> &str {
        "pulse"
    }

    async fn setup(&mut self) -> Result<(), Box<dyn Error + Send>> {
        if let Some(mqtt) = &self.bridge.mqtt {
            mqtt.lock().await.connect().await?;
            info!("Connected to MQTT broker");
        }

        let update_interval = self.bridge.store.update_interval();
        let discovery_interval = self.bridge.store.discovery_interval();

        let mut jobs = self.jobs.lock().await;
        jobs.update = Some(schedule_update(
            &self.scheduler,
            &self.bridge,
            update_interval,
        ));
        jobs.discovery = Some(schedule_discovery(
            &self.scheduler,
            &self.bridge,
            discovery_interval,
        ));
        drop(jobs);

        self.listener = Some(spawn_interval_listener(
            self.scheduler,
            self.bridge.clone(),
            self.jobs.clone(),
        ));

        Ok(())
    }

    async fn shutdown(&mut self) -> Result<(), Box<dyn Error + Send>> {
        if let Some(listener) = self.listener.take() {
            listener.abort();
        }

        let mut jobs = self.jobs.lock().await;
        if let Some(job) = jobs.update.take() {
            job.cancel();
        }
        if let Some(job) = jobs.discovery.take() {
            job.cancel();
        }

        info!("Pulse bridge stopped");
        Ok(())
    }
}

#[distributed_slice(engine::INTEGRATION_REGISTRY)]
fn init_pulse(ctx: &engine::IntegrationContext) -> engine::IntegrationFactoryResult {
    let pulse_config = if let Some(c) = &ctx.config.pulse {
        c
    } else {
        return Ok(None);
    };

    let api_key = match &pulse_config.api_key {
        Some(key) => key.clone(),
        None => std::env::var(PULSE_API_KEY_ENV).with_context(|| {
            format!("No Pulse API key in config or {PULSE_API_KEY_ENV}")
        })?,
    };

    let client = PulseClient::with_base_url(&pulse_config.base_url, &api_key, pulse_config.timeout())
        .context("Failed to create Pulse API client")?;

    let (mqtt, topics) = match &ctx.config.mqtt {
        Some(mqtt_config) => (
            Some(RumqttcClient::new(mqtt_config).context("Failed to create MQTT client")?),
            Topics {
                discovery_prefix: mqtt_config.discovery_prefix.clone(),
                state_prefix: mqtt_config.topic_prefix.clone(),
            },
        ),
        None => (None, Topics::default()),
    };

    Ok(Some(Box::new(PulseIntegration::new(
        client,
        mqtt,
        ctx.store.clone(),
        *ctx.scheduler,
        topics,
    ))))
}
