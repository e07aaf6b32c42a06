//! Defines the geographic primitives of the crate: a coordinate pair and the named
//! points whose forecasts are fetched.

use serde::{Deserialize, Serialize};

/// Represents a geographical coordinate using latitude and longitude.
///
/// Latitude is the first element (index 0), and longitude is the second (index 1).
/// Both values are represented as `f64` decimal degrees.
///
/// # Examples
///
/// ```
/// use temperature_map::LatLon;
///
/// let tokyo = LatLon(35.6895, 139.6917);
/// assert_eq!(tokyo.0, 35.6895); // Latitude
/// assert_eq!(tokyo.1, 139.6917); // Longitude
/// assert!(tokyo.is_valid());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon(pub f64, pub f64);

impl LatLon {
    pub fn latitude(&self) -> f64 {
        self.0
    }

    pub fn longitude(&self) -> f64 {
        self.1
    }

    /// Returns `true` when both components are finite and inside their valid ranges
    /// (latitude in `[-90, 90]`, longitude in `[-180, 180]`).
    pub fn is_valid(&self) -> bool {
        self.0.is_finite()
            && self.1.is_finite()
            && (-90.0..=90.0).contains(&self.0)
            && (-180.0..=180.0).contains(&self.1)
    }

    /// Great-circle distance to `other` in kilometers.
    pub fn distance_km(&self, other: &LatLon) -> f64 {
        haversine::distance(
            haversine::Location {
                latitude: self.0,
                longitude: self.1,
            },
            haversine::Location {
                latitude: other.0,
                longitude: other.1,
            },
            haversine::Units::Kilometers,
        )
    }
}

/// A named, fixed location monitored for forecasts.
///
/// Points are immutable once created; the [`crate::Catalog`] they belong to decides
/// which points exist and in which order they are requested.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// Unique, stable identifier of the point (e.g. "Tokyo").
    pub name: String,
    /// Where the point is.
    pub location: LatLon,
}

impl Point {
    pub fn new(name: impl Into<String>, location: LatLon) -> Self {
        Self {
            name: name.into(),
            location,
        }
    }
}
