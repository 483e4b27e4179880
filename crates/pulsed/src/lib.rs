pub mod api;
pub mod config;
mod engine;
mod integrations;

pub use config::Config;
pub use config::LogLevel;
pub use engine::DiscoveryCounts;
pub use engine::Engine;
pub use engine::StateStore;
pub use engine::TopologySnapshot;
