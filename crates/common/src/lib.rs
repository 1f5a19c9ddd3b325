//! Common library for the flightbridge service.
//!
//! Configuration loading, the service-level error type and tracing setup
//! shared by the bridge binary.

// Configuration management
pub mod config;
pub use config::{Config, FeedConfig, Protocol};

// Error handling types
pub mod error;
pub use error::{BridgeError, Result};

// Telemetry and observability
pub mod telemetry;

pub use telemetry::init_tracing;
