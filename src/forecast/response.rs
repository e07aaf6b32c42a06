//! Turns the forecast service's JSON answer into [`ForecastRecord`]s.
//!
//! The service answers a single-point query with one object and a multi-point query
//! with an array of objects in request order. Both shapes are reduced to one object per
//! point before any record is built, so the records never depend on the shape.
//!
//! The objects carry no point identity. They are matched to catalog points by position;
//! only the count is checked. The grid coordinate the service echoes back is compared
//! with the requested one and a large gap is logged, without failing the fetch.

use crate::catalog::Catalog;
use crate::forecast::error::FetchError;
use crate::types::point::{LatLon, Point};
use crate::types::record::{ForecastRecord, TIMESTAMP_FORMAT};
use chrono::NaiveDateTime;
use log::warn;
use serde::Deserialize;
use serde_json::Value;
use std::collections::HashSet;

/// Also accepted from upstream; normalized to [`TIMESTAMP_FORMAT`].
const TIMESTAMP_WITH_SECONDS_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// The part of one point's answer that is used.
#[derive(Debug, Deserialize)]
pub(crate) struct PointForecast {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub hourly: Option<HourlySeries>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct HourlySeries {
    pub time: Option<Vec<String>>,
    pub temperature_2m: Option<Vec<Option<f64>>>,
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Reduces both answer shapes to one JSON value per point.
pub(crate) fn split_points(body: Value) -> Result<Vec<Value>, FetchError> {
    match body {
        Value::Array(items) => Ok(items),
        object @ Value::Object(_) => Ok(vec![object]),
        other => Err(FetchError::UnexpectedShape {
            found: json_kind(&other),
        }),
    }
}

/// Builds the records of the whole catalog from a parsed answer.
///
/// Fails as a whole on the first problem; no partial record set is ever returned.
pub(crate) fn normalize(
    catalog: &Catalog,
    body: Value,
    drift_warning_km: f64,
) -> Result<Vec<ForecastRecord>, FetchError> {
    let items = split_points(body)?;
    if items.len() != catalog.len() {
        return Err(FetchError::PointCountMismatch {
            expected: catalog.len(),
            found: items.len(),
        });
    }

    let mut records = Vec::new();
    for (point, item) in catalog.points().iter().zip(items) {
        let forecast: PointForecast =
            serde_json::from_value(item).map_err(|e| FetchError::InvalidPoint {
                point: point.name.clone(),
                source: e,
            })?;
        warn_on_drift(point, &forecast, drift_warning_km);
        records.extend(point_records(point, forecast)?);
    }
    Ok(records)
}

fn point_records(
    point: &Point,
    forecast: PointForecast,
) -> Result<Vec<ForecastRecord>, FetchError> {
    let missing = |field| FetchError::MissingField {
        point: point.name.clone(),
        field,
    };

    let hourly = forecast.hourly.ok_or_else(|| missing("hourly"))?;
    let times = hourly.time.ok_or_else(|| missing("hourly.time"))?;
    let temperatures = hourly
        .temperature_2m
        .ok_or_else(|| missing("hourly.temperature_2m"))?;

    if times.len() != temperatures.len() {
        return Err(FetchError::LengthMismatch {
            point: point.name.clone(),
            times: times.len(),
            temperatures: temperatures.len(),
        });
    }

    let mut seen = HashSet::with_capacity(times.len());
    let mut records = Vec::with_capacity(times.len());
    for (raw, temperature) in times.into_iter().zip(temperatures) {
        let timestamp = match parse_timestamp(&raw) {
            Ok(parsed) => parsed.format(TIMESTAMP_FORMAT).to_string(),
            Err(e) => {
                return Err(FetchError::MalformedTimestamp {
                    point: point.name.clone(),
                    timestamp: raw,
                    source: e,
                });
            }
        };
        if !seen.insert(timestamp.clone()) {
            return Err(FetchError::DuplicateTimestamp {
                point: point.name.clone(),
                timestamp,
            });
        }
        let temperature = temperature.ok_or_else(|| FetchError::MissingTemperature {
            point: point.name.clone(),
            timestamp: timestamp.clone(),
        })?;
        records.push(ForecastRecord {
            point_name: point.name.clone(),
            latitude: point.location.0,
            longitude: point.location.1,
            timestamp,
            temperature,
        });
    }
    Ok(records)
}

/// Parses an upstream time in the record format, or with a seconds field.
fn parse_timestamp(raw: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    NaiveDateTime::parse_from_str(raw, TIMESTAMP_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(raw, TIMESTAMP_WITH_SECONDS_FORMAT))
}

fn warn_on_drift(point: &Point, forecast: &PointForecast, drift_warning_km: f64) {
    let (Some(lat), Some(lon)) = (forecast.latitude, forecast.longitude) else {
        return;
    };
    let drift = point.location.distance_km(&LatLon(lat, lon));
    if drift > drift_warning_km {
        warn!(
            "Forecast for {} is located at ({}, {}), {:.1} km from the requested point; \
             the service may have answered out of order",
            point.name, lat, lon, drift
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::error::FailureKind;
    use serde_json::json;

    fn catalog(names: &[&str]) -> Catalog {
        Catalog::new(
            names
                .iter()
                .enumerate()
                .map(|(i, name)| Point::new(*name, LatLon(30.0 + i as f64, 130.0 + i as f64)))
                .collect(),
        )
        .unwrap()
    }

    fn point_json(lat: f64, lon: f64, temps: &[f64]) -> Value {
        let times: Vec<String> = (0..temps.len())
            .map(|h| format!("2024-06-01T{h:02}:00"))
            .collect();
        json!({
            "latitude": lat,
            "longitude": lon,
            "timezone": "Asia/Tokyo",
            "hourly_units": { "time": "iso8601", "temperature_2m": "°C" },
            "hourly": { "time": times, "temperature_2m": temps },
        })
    }

    #[test]
    fn test_single_object_and_list_normalize_identically() {
        let one = catalog(&["Kochi"]);
        let body = point_json(30.0, 130.0, &[18.0, 17.5, 17.1]);
        let from_object = normalize(&one, body.clone(), 50.0).unwrap();
        let from_list = normalize(&one, Value::Array(vec![body]), 50.0).unwrap();
        assert_eq!(from_object, from_list);
        assert_eq!(from_object.len(), 3);
    }

    #[test]
    fn test_one_record_per_point_and_hour() {
        let two = catalog(&["Niigata", "Nagoya"]);
        let body = json!([
            point_json(30.0, 130.0, &[1.0, 2.0, 3.0]),
            point_json(31.0, 131.0, &[4.0, 5.0]),
        ]);
        let records = normalize(&two, body, 50.0).unwrap();
        assert_eq!(records.len(), 5);
        assert!(records[..3].iter().all(|r| r.point_name == "Niigata"));
        assert!(records[3..].iter().all(|r| r.point_name == "Nagoya"));
        // Coordinates come from the catalog, not from the answer.
        assert_eq!(records[3].latitude, 31.0);
        assert_eq!(records[3].longitude, 131.0);
        assert_eq!(records[4].timestamp, "2024-06-01T01:00");
        assert_eq!(records[4].temperature, 5.0);
    }

    #[test]
    fn test_length_mismatch_fails() {
        let one = catalog(&["Sendai"]);
        let body = json!({
            "hourly": {
                "time": ["2024-06-01T00:00", "2024-06-01T01:00"],
                "temperature_2m": [12.0],
            }
        });
        let err = normalize(&one, body, 50.0).unwrap_err();
        assert!(matches!(
            err,
            FetchError::LengthMismatch { times: 2, temperatures: 1, .. }
        ));
    }

    #[test]
    fn test_repeated_timestamp_fails() {
        let one = catalog(&["Tokyo"]);
        let body = json!({
            "hourly": {
                "time": ["2024-06-01T00:00", "2024-06-01T01:00", "2024-06-01T01:00"],
                "temperature_2m": [19.5, 20.0, 21.0],
            }
        });
        let err = normalize(&one, body, 50.0).unwrap_err();
        assert!(matches!(
            err,
            FetchError::DuplicateTimestamp { ref point, ref timestamp }
                if point == "Tokyo" && timestamp == "2024-06-01T01:00"
        ));
        assert_eq!(err.kind(), FailureKind::Schema);
    }

    #[test]
    fn test_same_hour_in_both_formats_is_a_repeat() {
        let one = catalog(&["Tokyo"]);
        let body = json!({
            "hourly": {
                "time": ["2024-06-01T01:00", "2024-06-01T01:00:00"],
                "temperature_2m": [20.0, 21.0],
            }
        });
        let err = normalize(&one, body, 50.0).unwrap_err();
        assert!(matches!(err, FetchError::DuplicateTimestamp { .. }));
    }

    #[test]
    fn test_timestamps_with_seconds_are_normalized() {
        let one = catalog(&["Sendai"]);
        let body = json!({
            "hourly": {
                "time": ["2024-06-01T00:00:00", "2024-06-01T01:00:00"],
                "temperature_2m": [12.0, 11.5],
            }
        });
        let records = normalize(&one, body, 50.0).unwrap();
        let times: Vec<_> = records.iter().map(|r| r.timestamp.as_str()).collect();
        assert_eq!(times, ["2024-06-01T00:00", "2024-06-01T01:00"]);
    }

    #[test]
    fn test_missing_fields_fail() {
        let one = catalog(&["Aomori"]);

        let err = normalize(&one, json!({ "latitude": 30.0 }), 50.0).unwrap_err();
        assert!(matches!(err, FetchError::MissingField { field: "hourly", .. }));

        let body = json!({ "hourly": { "temperature_2m": [] } });
        let err = normalize(&one, body, 50.0).unwrap_err();
        assert!(matches!(err, FetchError::MissingField { field: "hourly.time", .. }));

        let err = normalize(&one, json!({ "hourly": { "time": [] } }), 50.0).unwrap_err();
        assert!(matches!(
            err,
            FetchError::MissingField { field: "hourly.temperature_2m", .. }
        ));
    }

    #[test]
    fn test_malformed_types_fail() {
        let one = catalog(&["Aomori"]);
        let body = json!({ "hourly": { "time": "2024-06-01T00:00", "temperature_2m": [1.0] } });
        let err = normalize(&one, body, 50.0).unwrap_err();
        assert!(matches!(err, FetchError::InvalidPoint { ref point, .. } if point == "Aomori"));

        let err = normalize(&one, json!(42), 50.0).unwrap_err();
        assert!(matches!(err, FetchError::UnexpectedShape { found: "a number" }));
    }

    #[test]
    fn test_bad_timestamp_fails() {
        let one = catalog(&["Osaka"]);
        let body = json!({ "hourly": { "time": ["yesterday"], "temperature_2m": [20.0] } });
        let err = normalize(&one, body, 50.0).unwrap_err();
        assert!(matches!(
            err,
            FetchError::MalformedTimestamp { ref timestamp, .. } if timestamp == "yesterday"
        ));
    }

    #[test]
    fn test_null_temperature_fails() {
        let one = catalog(&["Osaka"]);
        let body = json!({
            "hourly": {
                "time": ["2024-06-01T00:00", "2024-06-01T01:00"],
                "temperature_2m": [20.0, null],
            }
        });
        let err = normalize(&one, body, 50.0).unwrap_err();
        assert!(matches!(
            err,
            FetchError::MissingTemperature { ref timestamp, .. } if timestamp == "2024-06-01T01:00"
        ));
    }

    #[test]
    fn test_point_count_mismatch_fails() {
        let three = catalog(&["Sapporo", "Tokyo", "Naha"]);
        let body = json!([point_json(30.0, 130.0, &[1.0]), point_json(31.0, 131.0, &[1.0])]);
        let err = normalize(&three, body, 50.0).unwrap_err();
        assert!(matches!(err, FetchError::PointCountMismatch { expected: 3, found: 2 }));

        // A single object for a multi-point catalog is a count mismatch too.
        let two = catalog(&["Sapporo", "Tokyo"]);
        let err = normalize(&two, point_json(30.0, 130.0, &[1.0]), 50.0).unwrap_err();
        assert!(matches!(err, FetchError::PointCountMismatch { expected: 2, found: 1 }));
    }

    #[test]
    fn test_drifted_coordinates_still_succeed() {
        let two = catalog(&["Fukuoka", "Kagoshima"]);
        // Answers swapped: each echoed coordinate is ~140 km off its requested point.
        let body = json!([
            point_json(31.0, 131.0, &[15.0]),
            point_json(30.0, 130.0, &[16.0]),
        ]);
        let records = normalize(&two, body, 50.0).unwrap();
        assert_eq!(records[0].point_name, "Fukuoka");
        assert_eq!(records[0].temperature, 15.0);
    }

    #[test]
    fn test_empty_hourly_series_yields_no_records() {
        let one = catalog(&["Naha"]);
        let body = json!({ "hourly": { "time": [], "temperature_2m": [] } });
        assert!(normalize(&one, body, 50.0).unwrap().is_empty());
    }
}
