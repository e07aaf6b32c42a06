//! Maps a forecast temperature to the visual attributes of a map column: its height
//! and its fill color.
//!
//! Every record is encoded on its own. There is no normalization across a snapshot,
//! so a point's column only changes when its own temperature changes.

use crate::types::record::ForecastRecord;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Added to the temperature before scaling so sub-zero columns keep a visible height.
pub const ELEVATION_OFFSET_C: f64 = 20.0;

/// Elevation units per degree Celsius (after the offset).
pub const ELEVATION_SCALE: f64 = 2000.0;

/// Alpha shared by every band color.
pub const COLOR_ALPHA: u8 = 200;

/// An RGBA color, one byte per channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgba(pub u8, pub u8, pub u8, pub u8);

impl Rgba {
    pub fn to_array(self) -> [u8; 4] {
        [self.0, self.1, self.2, self.3]
    }
}

/// Half-open temperature bands, in ascending order.
///
/// The bands are contiguous and cover the whole real line, so any temperature falls into
/// exactly one of them. Lower bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TemperatureBand {
    /// Below 0 °C.
    Freezing,
    /// 0 °C up to 10 °C.
    Cold,
    /// 10 °C up to 20 °C.
    Mild,
    /// 20 °C up to 25 °C.
    Warm,
    /// 25 °C and above.
    Hot,
}

impl TemperatureBand {
    /// All bands, coldest first.
    pub const ALL: [TemperatureBand; 5] = [
        TemperatureBand::Freezing,
        TemperatureBand::Cold,
        TemperatureBand::Mild,
        TemperatureBand::Warm,
        TemperatureBand::Hot,
    ];

    /// Finds the band for `temperature`, testing the bands coldest first.
    ///
    /// NaN compares false against every upper bound and ends up in [`TemperatureBand::Hot`].
    pub fn classify(temperature: f64) -> Self {
        Self::ALL
            .into_iter()
            .find(|band| band.upper_bound().is_some_and(|upper| temperature < upper))
            .unwrap_or(TemperatureBand::Hot)
    }

    /// Inclusive lower bound, `None` for the open-ended coldest band.
    pub fn lower_bound(&self) -> Option<f64> {
        match self {
            TemperatureBand::Freezing => None,
            TemperatureBand::Cold => Some(0.0),
            TemperatureBand::Mild => Some(10.0),
            TemperatureBand::Warm => Some(20.0),
            TemperatureBand::Hot => Some(25.0),
        }
    }

    /// Exclusive upper bound, `None` for the open-ended hottest band.
    pub fn upper_bound(&self) -> Option<f64> {
        match self {
            TemperatureBand::Freezing => Some(0.0),
            TemperatureBand::Cold => Some(10.0),
            TemperatureBand::Mild => Some(20.0),
            TemperatureBand::Warm => Some(25.0),
            TemperatureBand::Hot => None,
        }
    }

    pub fn color(&self) -> Rgba {
        match self {
            TemperatureBand::Freezing => Rgba(0, 0, 255, COLOR_ALPHA),
            TemperatureBand::Cold => Rgba(0, 255, 255, COLOR_ALPHA),
            TemperatureBand::Mild => Rgba(0, 255, 0, COLOR_ALPHA),
            TemperatureBand::Warm => Rgba(255, 165, 0, COLOR_ALPHA),
            TemperatureBand::Hot => Rgba(255, 0, 0, COLOR_ALPHA),
        }
    }

    fn label(&self) -> &'static str {
        match self {
            TemperatureBand::Freezing => "freezing",
            TemperatureBand::Cold => "cold",
            TemperatureBand::Mild => "mild",
            TemperatureBand::Warm => "warm",
            TemperatureBand::Hot => "hot",
        }
    }
}

/// Formats a band by its lowercase name.
///
/// # Examples
///
/// ```
/// use temperature_map::TemperatureBand;
///
/// assert_eq!(TemperatureBand::Warm.to_string(), "warm");
/// ```
impl fmt::Display for TemperatureBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Visual attributes of one record.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Encoding {
    pub elevation: f64,
    pub color: Rgba,
}

/// Column height for a temperature: `(temperature + 20) * 2000`.
pub fn elevation_for(temperature: f64) -> f64 {
    (temperature + ELEVATION_OFFSET_C) * ELEVATION_SCALE
}

pub fn color_for(temperature: f64) -> Rgba {
    TemperatureBand::classify(temperature).color()
}

/// Encodes one record. Depends on nothing but the record's own temperature.
///
/// # Examples
///
/// ```
/// use temperature_map::{encode, ForecastRecord, Rgba};
///
/// let record = ForecastRecord {
///     point_name: "Tokyo".into(),
///     latitude: 35.6895,
///     longitude: 139.6917,
///     timestamp: "2024-07-01T12:00".into(),
///     temperature: 5.0,
/// };
/// let encoding = encode(&record);
/// assert_eq!(encoding.elevation, 50_000.0);
/// assert_eq!(encoding.color, Rgba(0, 255, 255, 200));
/// ```
pub fn encode(record: &ForecastRecord) -> Encoding {
    Encoding {
        elevation: elevation_for(record.temperature),
        color: color_for(record.temperature),
    }
}
