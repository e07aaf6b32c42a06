//! Selects the records for one timestamp and encodes them as map columns.

use crate::encoding::{encode, Rgba};
use crate::types::record::ForecastRecord;
use ordered_float::OrderedFloat;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Returns the records whose timestamp equals `timestamp`, in their original order.
///
/// A timestamp that does not occur yields an empty vector; this is a valid state and
/// not an error.
pub fn select<'a>(records: &'a [ForecastRecord], timestamp: &str) -> Vec<&'a ForecastRecord> {
    records
        .iter()
        .filter(|r| r.timestamp == timestamp)
        .collect()
}

/// A forecast record together with its visual encoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncodedRecord {
    #[serde(flatten)]
    pub record: ForecastRecord,
    pub elevation: f64,
    pub color: Rgba,
}

impl EncodedRecord {
    pub fn new(record: ForecastRecord) -> Self {
        let encoding = encode(&record);
        Self {
            record,
            elevation: encoding.elevation,
            color: encoding.color,
        }
    }
}

/// The encoded records of a forecast at one timestamp.
///
/// For a forecast produced by the fetcher there is at most one entry per point.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Snapshot {
    pub timestamp: String,
    pub entries: Vec<EncodedRecord>,
}

impl Snapshot {
    /// Selects the records at `timestamp` and encodes each of them.
    pub fn build(records: &[ForecastRecord], timestamp: &str) -> Self {
        Self {
            timestamp: timestamp.to_string(),
            entries: select(records, timestamp)
                .into_iter()
                .cloned()
                .map(EncodedRecord::new)
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn get(&self, point_name: &str) -> Option<&EncodedRecord> {
        self.entries
            .iter()
            .find(|e| e.record.point_name == point_name)
    }

    /// Entries ordered hottest first. Points with equal temperatures keep their
    /// catalog order.
    pub fn ranked_by_temperature(&self) -> Vec<&EncodedRecord> {
        let mut ranked: Vec<&EncodedRecord> = self.entries.iter().collect();
        ranked.sort_by_key(|e| std::cmp::Reverse(OrderedFloat(e.record.temperature)));
        ranked
    }

    /// Collects the snapshot into a `DataFrame` with one row per point.
    ///
    /// Columns: `point`, `latitude`, `longitude`, `timestamp`, `temperature`,
    /// `elevation`, `r`, `g`, `b`, `a`.
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        let channel = |pick: fn(&Rgba) -> u8| -> Vec<u32> {
            self.entries
                .iter()
                .map(|e| u32::from(pick(&e.color)))
                .collect()
        };

        let points: Vec<&str> = self
            .entries
            .iter()
            .map(|e| e.record.point_name.as_str())
            .collect();
        let timestamps: Vec<&str> = self
            .entries
            .iter()
            .map(|e| e.record.timestamp.as_str())
            .collect();

        polars::df!(
            "point" => points,
            "latitude" => self.entries.iter().map(|e| e.record.latitude).collect::<Vec<_>>(),
            "longitude" => self.entries.iter().map(|e| e.record.longitude).collect::<Vec<_>>(),
            "timestamp" => timestamps,
            "temperature" => self.entries.iter().map(|e| e.record.temperature).collect::<Vec<_>>(),
            "elevation" => self.entries.iter().map(|e| e.elevation).collect::<Vec<_>>(),
            "r" => channel(|c| c.0),
            "g" => channel(|c| c.1),
            "b" => channel(|c| c.2),
            "a" => channel(|c| c.3),
        )
    }
}
