//! System orchestration: startup, shared services and shutdown.

pub mod dashboard_system;
pub mod telemetry;

pub use dashboard_system::*;
pub use telemetry::*;
