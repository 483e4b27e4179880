mod engine;
mod integration;
mod scheduler;
mod store;

pub use engine::Engine;
pub use integration::Integration;
pub use integration::IntegrationContext;
pub use integration::IntegrationFactoryResult;
pub use integration::REGISTRY as INTEGRATION_REGISTRY;
pub use scheduler::JobHandle;
pub use scheduler::Scheduler;
pub use store::DiscoveryCounts;
pub use store::StateStore;
pub use store::TopologySnapshot;
