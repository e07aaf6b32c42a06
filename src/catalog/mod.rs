//! The fixed set of points whose forecasts are fetched.
//!
//! A [`Catalog`] is validated once on construction (non-empty, unique names, valid
//! coordinates) so that everything downstream can rely on it without re-checking.

pub mod error;

use crate::types::point::{LatLon, Point};
use error::CatalogError;
use std::collections::HashSet;
use std::fmt::Write;

/// Built-in catalog: major Japanese cities, north to south.
const JAPAN: [(&str, f64, f64); 13] = [
    ("Sapporo", 43.0618, 141.3545),
    ("Aomori", 40.8244, 140.7400),
    ("Sendai", 38.2682, 140.8694),
    ("Niigata", 37.9022, 139.0236),
    ("Tokyo", 35.6895, 139.6917),
    ("Kanazawa", 36.5613, 136.6562),
    ("Nagoya", 35.1815, 136.9066),
    ("Osaka", 34.6937, 135.5023),
    ("Hiroshima", 34.3853, 132.4553),
    ("Kochi", 33.5588, 133.5312),
    ("Fukuoka", 33.5904, 130.4017),
    ("Kagoshima", 31.5600, 130.5580),
    ("Naha", 26.2124, 127.6809),
];

/// An ordered, validated, non-empty list of [`Point`]s.
///
/// The order matters: it is the order in which coordinates are sent upstream, and the
/// order in which per-point responses are matched back to points.
///
/// # Examples
///
/// ```
/// use temperature_map::{Catalog, LatLon, Point};
///
/// let catalog = Catalog::new(vec![
///     Point::new("Tokyo", LatLon(35.6895, 139.6917)),
///     Point::new("Osaka", LatLon(34.6937, 135.5023)),
/// ])
/// .unwrap();
/// assert_eq!(catalog.len(), 2);
/// assert!(Catalog::new(vec![]).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Catalog {
    points: Vec<Point>,
}

impl Catalog {
    pub fn new(points: Vec<Point>) -> Result<Self, CatalogError> {
        if points.is_empty() {
            return Err(CatalogError::Empty);
        }

        let mut seen = HashSet::with_capacity(points.len());
        for point in &points {
            if !point.location.is_valid() {
                return Err(CatalogError::InvalidCoordinate {
                    name: point.name.clone(),
                    latitude: point.location.0,
                    longitude: point.location.1,
                });
            }
            if !seen.insert(point.name.as_str()) {
                return Err(CatalogError::DuplicateName(point.name.clone()));
            }
        }

        Ok(Self { points })
    }

    /// The built-in catalog of 13 major Japanese cities.
    pub fn japan() -> Self {
        Self {
            points: JAPAN
                .iter()
                .map(|&(name, lat, lon)| Point::new(name, LatLon(lat, lon)))
                .collect(),
        }
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always `false`; present for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Point> {
        self.points.iter().find(|p| p.name == name)
    }

    /// Stable identity of this catalog, used as the forecast cache key.
    ///
    /// Two catalogs with the same points in the same order produce the same key.
    pub fn cache_key(&self) -> String {
        let mut key = String::new();
        for point in &self.points {
            // Writing to a String cannot fail.
            let _ = write!(
                key,
                "{}@{},{};",
                point.name, point.location.0, point.location.1
            );
        }
        key
    }
}
