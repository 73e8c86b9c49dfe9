// Infrastructure layer (shared components)
pub mod infrastructure;

pub use infrastructure::config;
pub use infrastructure::error;
pub use infrastructure::metrics;
pub use infrastructure::postgres;

// Domain layer
pub mod generation;
pub mod mail;
pub mod ratelimit;
pub mod template;
pub mod verification;

// Application layer
pub mod api;
pub mod server;

// Supporting modules
pub mod telemetry;
