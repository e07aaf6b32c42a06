//! Builds the list of selectable timestamps from a forecast and picks the default one.

use crate::types::record::ForecastRecord;
use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::HashSet;

/// Distinct timestamps of a forecast in first-seen order, plus the default selection.
///
/// The order is not sorted. It is chronological because each point's hourly series is
/// chronological and points are concatenated without interleaving.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct TimestampIndex {
    timestamps: Vec<String>,
    default_index: usize,
}

impl TimestampIndex {
    pub fn timestamps(&self) -> &[String] {
        &self.timestamps
    }

    /// Position of the default selection. `0` when the index is empty.
    pub fn default_index(&self) -> usize {
        self.default_index
    }

    /// The timestamp at [`Self::default_index`], if there is any timestamp at all.
    pub fn default_timestamp(&self) -> Option<&str> {
        self.timestamps
            .get(self.default_index)
            .map(String::as_str)
    }

    pub fn position(&self, timestamp: &str) -> Option<usize> {
        self.timestamps.iter().position(|t| t == timestamp)
    }

    pub fn contains(&self, timestamp: &str) -> bool {
        self.position(timestamp).is_some()
    }

    pub fn len(&self) -> usize {
        self.timestamps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.timestamps.is_empty()
    }

    pub fn into_parts(self) -> (Vec<String>, usize) {
        (self.timestamps, self.default_index)
    }
}

/// `now` truncated to the hour, in the same format as record timestamps.
pub fn current_hour_key(now: NaiveDateTime) -> String {
    now.format("%Y-%m-%dT%H:00").to_string()
}

/// Collects distinct timestamps in first-seen order and selects the hour containing `now`.
///
/// When the current hour is not part of the forecast (the clock is outside the fetched
/// horizon, or the local clock and the query timezone disagree) the first hour is the
/// default.
pub fn build_index(records: &[ForecastRecord], now: NaiveDateTime) -> TimestampIndex {
    let mut seen = HashSet::new();
    let mut timestamps = Vec::new();
    for record in records {
        if seen.insert(record.timestamp.as_str()) {
            timestamps.push(record.timestamp.clone());
        }
    }

    let current = current_hour_key(now);
    let default_index = timestamps
        .iter()
        .position(|t| *t == current)
        .unwrap_or(0);

    TimestampIndex {
        timestamps,
        default_index,
    }
}
