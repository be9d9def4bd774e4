//! Shared primitive types used across the crate.

/// Row identifier assigned by the store on insert.
pub type RecordId = i64;

/// Customer display name. The natural key for alerts: at most one alert
/// exists per customer name.
pub type CustomerName = String;
