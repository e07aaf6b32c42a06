//! Contains the `Forecast` structure holding the normalized records of one fetch.

use crate::snapshot::{select, Snapshot};
use crate::timeline::{build_index, TimestampIndex};
use crate::types::record::ForecastRecord;
use chrono::{Local, NaiveDateTime};
use polars::prelude::{col, lit, DataFrame, IntoLazy, LazyFrame, PolarsResult};
use std::sync::Arc;

/// The normalized result of one successful fetch: one record per (point, hour),
/// points in catalog order and each point's hours in upstream order.
///
/// A `Forecast` is immutable and cheap to clone; clones share the same records.
/// [`Forecast::empty`] is the degraded state used after a failed fetch.
///
/// # Examples
///
/// ```
/// use temperature_map::{Forecast, ForecastRecord};
///
/// let forecast = Forecast::new(vec![ForecastRecord {
///     point_name: "Osaka".into(),
///     latitude: 34.6937,
///     longitude: 135.5023,
///     timestamp: "2024-08-01T14:00".into(),
///     temperature: 33.1,
/// }]);
///
/// let snapshot = forecast.snapshot("2024-08-01T14:00");
/// assert_eq!(snapshot.len(), 1);
/// assert!(forecast.snapshot("2024-08-02T14:00").is_empty());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Forecast {
    records: Arc<[ForecastRecord]>,
}

impl Default for Forecast {
    fn default() -> Self {
        Self::empty()
    }
}

impl Forecast {
    pub fn new(records: Vec<ForecastRecord>) -> Self {
        Self {
            records: records.into(),
        }
    }

    /// A forecast without any records.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    pub fn records(&self) -> &[ForecastRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// All records of one point, in hour order.
    pub fn for_point<'a>(
        &'a self,
        point_name: &'a str,
    ) -> impl Iterator<Item = &'a ForecastRecord> + 'a {
        self.records
            .iter()
            .filter(move |r| r.point_name == point_name)
    }

    /// Selectable timestamps, defaulting to the current hour of the local clock.
    pub fn timeline(&self) -> TimestampIndex {
        self.timeline_at(Local::now().naive_local())
    }

    /// Selectable timestamps, defaulting to the hour containing `now`.
    pub fn timeline_at(&self, now: NaiveDateTime) -> TimestampIndex {
        build_index(&self.records, now)
    }

    /// Records at `timestamp`, unencoded.
    pub fn select(&self, timestamp: &str) -> Vec<&ForecastRecord> {
        select(&self.records, timestamp)
    }

    /// Records at `timestamp`, encoded for display.
    pub fn snapshot(&self, timestamp: &str) -> Snapshot {
        Snapshot::build(&self.records, timestamp)
    }

    /// Collects all records into a `DataFrame`.
    ///
    /// Columns: `point`, `latitude`, `longitude`, `timestamp`, `temperature`.
    pub fn to_dataframe(&self) -> PolarsResult<DataFrame> {
        polars::df!(
            "point" => self.records.iter().map(|r| r.point_name.as_str()).collect::<Vec<_>>(),
            "latitude" => self.records.iter().map(|r| r.latitude).collect::<Vec<_>>(),
            "longitude" => self.records.iter().map(|r| r.longitude).collect::<Vec<_>>(),
            "timestamp" => self.records.iter().map(|r| r.timestamp.as_str()).collect::<Vec<_>>(),
            "temperature" => self.records.iter().map(|r| r.temperature).collect::<Vec<_>>(),
        )
    }

    pub fn to_lazy_frame(&self) -> PolarsResult<LazyFrame> {
        Ok(self.to_dataframe()?.lazy())
    }

    /// A lazy view of the records at `timestamp`.
    ///
    /// Collecting it yields the same rows as [`Forecast::select`], in the same order.
    pub fn lazy_at(&self, timestamp: &str) -> PolarsResult<LazyFrame> {
        Ok(self
            .to_lazy_frame()?
            .filter(col("timestamp").eq(lit(timestamp))))
    }
}

impl From<Vec<ForecastRecord>> for Forecast {
    fn from(records: Vec<ForecastRecord>) -> Self {
        Self::new(records)
    }
}
