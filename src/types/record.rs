use serde::{Deserialize, Serialize};

/// Format of [`ForecastRecord::timestamp`], matching the upstream `hourly.time` values.
///
/// Upstream times that carry a seconds field are accepted and stored in this format.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// One hourly temperature forecast for one point.
///
/// Coordinates are copied from the catalog point at fetch time, so a record is
/// self-contained for rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastRecord {
    /// Name of the catalog point this forecast belongs to.
    pub point_name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Local (timezone-naive) hour, formatted like `2024-01-01T13:00`.
    pub timestamp: String,
    /// Air temperature 2 m above ground, in degrees Celsius.
    pub temperature: f64,
}
