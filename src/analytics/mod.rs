//! Pure reductions over fetched records.

pub mod categories;
pub mod summary;

pub use categories::InventoryAnalytics;
pub use summary::DashboardSummary;
