mod client;
mod config;

#[cfg(test)]
pub use client::MockMqttClient;
pub use client::MqttClient;
pub use client::RumqttcClient;
pub use config::Config as MqttConfig;
