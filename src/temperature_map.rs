//! This module provides the main entry point: a client that fetches, caches and
//! encodes the hourly temperature forecast of a fixed catalog of points.

use crate::catalog::Catalog;
use crate::error::TemperatureMapError;
use crate::forecast::cache::TtlCache;
use crate::forecast::config::FetchConfig;
use crate::forecast::fetcher::ForecastFetcher;
use crate::types::forecast::Forecast;
use crate::view::MapFrame;
use bon::bon;
use chrono::{Local, NaiveDateTime};
use log::{error, info};

/// The main client for the temperature map.
///
/// Owns the [`Catalog`] of points, the fetcher that talks to the forecast service and a
/// cache that keeps the last successful forecast for the configured TTL (one hour by
/// default). Every method takes `&self`, so a single client can be shared between tasks;
/// concurrent callers that miss the cache wait for one shared request.
///
/// Create an instance using [`TemperatureMap::new()`] for the built-in Japan catalog with
/// default settings, or [`TemperatureMap::builder()`] to supply your own.
///
/// # Examples
///
/// ```rust
/// # use temperature_map::TemperatureMap;
/// # use temperature_map::TemperatureMapError;
/// # async fn run() -> Result<(), TemperatureMapError> {
/// let client = TemperatureMap::new();
/// let forecast = client.forecast().await?;
/// println!("{} hourly records", forecast.len());
/// # Ok(())
/// # }
/// ```
pub struct TemperatureMap {
    catalog: Catalog,
    fetcher: ForecastFetcher,
    cache: TtlCache<String, Forecast>,
}

impl Default for TemperatureMap {
    fn default() -> Self {
        Self::new()
    }
}

#[bon]
impl TemperatureMap {
    /// Creates a client for the built-in Japan catalog with the default [`FetchConfig`].
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Creates a client from its parts.
    ///
    /// This method uses a builder pattern, started with [`TemperatureMap::builder()`].
    ///
    /// # Arguments
    ///
    /// * `.catalog(Catalog)`: Optional. The points to fetch. Defaults to [`Catalog::japan()`].
    /// * `.config(FetchConfig)`: Optional. Service URL, timezone, cache TTL and timeout.
    ///   Defaults to [`FetchConfig::default()`].
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use temperature_map::{Catalog, FetchConfig, LatLon, Point, TemperatureMap};
    /// # use std::time::Duration;
    /// let catalog = Catalog::new(vec![
    ///     Point::new("Tokyo", LatLon(35.6895, 139.6917)),
    ///     Point::new("Naha", LatLon(26.2124, 127.6809)),
    /// ])
    /// .unwrap();
    ///
    /// let client = TemperatureMap::builder()
    ///     .catalog(catalog)
    ///     .config(
    ///         FetchConfig::builder()
    ///             .cache_ttl(Duration::from_secs(600))
    ///             .request_timeout(Duration::from_secs(10))
    ///             .build(),
    ///     )
    ///     .build();
    /// assert_eq!(client.catalog().len(), 2);
    /// ```
    #[builder(start_fn = builder, finish_fn = build)]
    pub fn from_parts(
        #[builder(default = Catalog::japan())] catalog: Catalog,
        #[builder(default)] config: FetchConfig,
    ) -> Self {
        let cache = TtlCache::new(config.cache_ttl);
        Self {
            catalog,
            fetcher: ForecastFetcher::new(config),
            cache,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn config(&self) -> &FetchConfig {
        self.fetcher.config()
    }

    /// Returns the forecast for every catalog point.
    ///
    /// The first call fetches from the forecast service; later calls within the cache
    /// TTL return the stored forecast without touching the network. Failed fetches are
    /// not cached, so the next call tries again.
    ///
    /// # Errors
    ///
    /// Returns [`TemperatureMapError::Fetch`] if the request fails or the response cannot
    /// be normalized. Use [`TemperatureMapError::failure_kind`] to tell transport
    /// failures from schema failures.
    pub async fn forecast(&self) -> Result<Forecast, TemperatureMapError> {
        let forecast = self
            .cache
            .get_or_try_insert_with(self.catalog.cache_key(), || {
                self.fetcher.fetch(&self.catalog)
            })
            .await?;
        Ok(forecast)
    }

    /// Like [`TemperatureMap::forecast`], but never fails: on error the failure is logged
    /// and handed back next to an empty forecast, so a caller can still render a map
    /// without columns and report what went wrong.
    pub async fn forecast_or_empty(&self) -> (Forecast, Option<TemperatureMapError>) {
        match self.forecast().await {
            Ok(forecast) => (forecast, None),
            Err(e) => {
                error!("Forecast unavailable, continuing without data: {}", e);
                (Forecast::empty(), Some(e))
            }
        }
    }

    /// Builds the [`MapFrame`] a renderer needs for one hour.
    ///
    /// This method uses a builder pattern.
    ///
    /// # Arguments
    ///
    /// * `.at(&str)`: Optional. The timestamp to show, in `YYYY-MM-DDTHH:MM` form. Defaults
    ///   to the timestamp closest to `now`.
    /// * `.now(NaiveDateTime)`: Optional. The current time used to pick the default
    ///   timestamp. Defaults to the local clock.
    ///
    /// A failed fetch yields a frame without timestamps or columns; the failure is logged.
    ///
    /// # Examples
    ///
    /// ```rust
    /// # use temperature_map::TemperatureMap;
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), serde_json::Error> {
    /// let client = TemperatureMap::new();
    /// let frame = client.frame().maybe_at(Some("2024-08-01T14:00")).call().await;
    /// println!("{}", frame.to_json()?);
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub async fn frame(&self, at: Option<&str>, now: Option<NaiveDateTime>) -> MapFrame {
        let (forecast, _) = self.forecast_or_empty().await;
        let now = now.unwrap_or_else(|| Local::now().naive_local());
        MapFrame::build(&forecast, forecast.timeline_at(now), at)
    }

    /// Drops the cached forecast so the next request fetches a fresh one.
    pub async fn refresh(&self) {
        info!("Refreshing forecast for {} points", self.catalog.len());
        self.cache.invalidate(&self.catalog.cache_key()).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::error::{FailureKind, FetchError};
    use crate::types::point::{LatLon, Point};
    use chrono::NaiveDate;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Answers successive connections with `responses` in turn, repeating the last one.
    /// Returns the URL and the number of requests served so far.
    async fn serve(responses: Vec<(&'static str, &'static str)>) -> (String, Arc<AtomicUsize>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let served = Arc::new(AtomicUsize::new(0));
        let counter = served.clone();
        tokio::spawn(async move {
            loop {
                let (mut socket, _) = listener.accept().await.unwrap();
                let n = counter.fetch_add(1, Ordering::SeqCst);
                let (status, body) = responses[n.min(responses.len() - 1)];
                let mut request = Vec::new();
                let mut buf = [0u8; 1024];
                while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                    let read = socket.read(&mut buf).await.unwrap();
                    if read == 0 {
                        break;
                    }
                    request.extend_from_slice(&buf[..read]);
                }
                let response = format!(
                    "HTTP/1.1 {status}\r\nContent-Type: application/json\r\n\
                     Content-Length: {}\r\nConnection: close\r\n\r\n{body}",
                    body.len()
                );
                socket.write_all(response.as_bytes()).await.unwrap();
                socket.shutdown().await.unwrap();
            }
        });
        (format!("http://{addr}/v1/forecast"), served)
    }

    const OK: (&str, &str) = (
        "200 OK",
        r#"[
            {"latitude": 43.06, "longitude": 141.35, "hourly": {
                "time": ["2024-02-10T09:00", "2024-02-10T10:00", "2024-02-10T11:00"],
                "temperature_2m": [-3.0, -1.0, 2.0]}},
            {"latitude": 26.2, "longitude": 127.7, "hourly": {
                "time": ["2024-02-10T09:00", "2024-02-10T10:00", "2024-02-10T11:00"],
                "temperature_2m": [19.0, 21.0, 26.0]}}
        ]"#,
    );

    const UNAVAILABLE: (&str, &str) = ("503 Service Unavailable", r#"{"error": true}"#);

    fn client(url: String) -> TemperatureMap {
        let catalog = Catalog::new(vec![
            Point::new("Sapporo", LatLon(43.0618, 141.3545)),
            Point::new("Naha", LatLon(26.2124, 127.6809)),
        ])
        .unwrap();
        TemperatureMap::builder()
            .catalog(catalog)
            .config(FetchConfig::builder().base_url(url).build())
            .build()
    }

    fn ten_past(hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 2, 10)
            .unwrap()
            .and_hms_opt(hour, 10, 0)
            .unwrap()
    }

    #[test]
    fn test_defaults() {
        let client = TemperatureMap::new();
        assert_eq!(client.catalog().len(), 13);
        assert_eq!(client.config().timezone, "Asia/Tokyo");
    }

    #[tokio::test]
    async fn test_forecast_is_cached() -> Result<(), TemperatureMapError> {
        let (url, served) = serve(vec![OK]).await;
        let client = client(url);

        let first = client.forecast().await?;
        let second = client.forecast().await?;
        assert_eq!(first.len(), 6);
        assert_eq!(first, second);
        assert_eq!(served.load(Ordering::SeqCst), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_one_request() {
        let (url, served) = serve(vec![OK]).await;
        let client = client(url);

        let (a, b) = tokio::join!(client.forecast(), client.forecast());
        assert_eq!(a.unwrap(), b.unwrap());
        assert_eq!(served.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_refresh_fetches_again() -> Result<(), TemperatureMapError> {
        let (url, served) = serve(vec![OK]).await;
        let client = client(url);

        client.forecast().await?;
        client.refresh().await;
        client.forecast().await?;
        assert_eq!(served.load(Ordering::SeqCst), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_failure_degrades_to_empty_and_is_retried() {
        let (url, served) = serve(vec![UNAVAILABLE, OK]).await;
        let client = client(url);

        let (forecast, err) = client.forecast_or_empty().await;
        assert!(forecast.is_empty());
        let err = err.unwrap();
        assert!(matches!(
            err,
            TemperatureMapError::Fetch(FetchError::HttpStatus { .. })
        ));
        assert_eq!(err.failure_kind(), Some(FailureKind::Transport));

        let (forecast, err) = client.forecast_or_empty().await;
        assert!(err.is_none());
        assert_eq!(forecast.len(), 6);
        assert_eq!(served.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_frame_at_selected_hour() {
        let (url, _served) = serve(vec![OK]).await;
        let client = client(url);

        let frame = client
            .frame()
            .at("2024-02-10T10:00")
            .now(ten_past(9))
            .call()
            .await;
        assert_eq!(frame.timestamps.len(), 3);
        assert_eq!(frame.default_index, 0);
        assert_eq!(frame.columns.len(), 2);
        assert_eq!(frame.columns[0].elevation, 38_000.0);
        assert_eq!(frame.columns[1].record.temperature, 21.0);
    }

    #[tokio::test]
    async fn test_frame_defaults_to_now() {
        let (url, _served) = serve(vec![OK]).await;
        let client = client(url);

        let frame = client.frame().now(ten_past(11)).call().await;
        assert_eq!(frame.default_index, 2);
        assert_eq!(frame.selected.as_deref(), Some("2024-02-10T11:00"));
    }

    #[tokio::test]
    async fn test_frame_after_failure_is_empty() {
        let (url, _served) = serve(vec![UNAVAILABLE]).await;
        let client = client(url);

        let frame = client.frame().now(ten_past(9)).call().await;
        assert!(frame.timestamps.is_empty());
        assert_eq!(frame.selected, None);
        assert!(!frame.has_columns());
    }
}
