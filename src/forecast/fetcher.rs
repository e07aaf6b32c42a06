use crate::catalog::Catalog;
use crate::forecast::config::{FetchConfig, FORECAST_DAYS};
use crate::forecast::error::FetchError;
use crate::forecast::response::normalize;
use crate::types::forecast::Forecast;
use crate::types::point::Point;
use log::{info, warn};
use reqwest::Client;
use serde_json::Value;

pub struct ForecastFetcher {
    config: FetchConfig,
    client: Client,
}

impl ForecastFetcher {
    pub fn new(config: FetchConfig) -> Self {
        Self::with_client(config, Client::new())
    }

    pub fn with_client(config: FetchConfig, client: Client) -> Self {
        Self { config, client }
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// Query parameters for one batched request covering every catalog point.
    pub fn query(&self, catalog: &Catalog) -> Vec<(&'static str, String)> {
        let join = |coord: fn(&Point) -> f64| {
            catalog
                .points()
                .iter()
                .map(|p| coord(p).to_string())
                .collect::<Vec<_>>()
                .join(",")
        };
        vec![
            ("latitude", join(|p| p.location.0)),
            ("longitude", join(|p| p.location.1)),
            ("hourly", "temperature_2m".to_string()),
            ("timezone", self.config.timezone.clone()),
            ("forecast_days", FORECAST_DAYS.to_string()),
        ]
    }

    /// Fetches today's hourly temperatures for every point of `catalog` in one request.
    ///
    /// Either every point yields its records or the whole fetch fails.
    pub async fn fetch(&self, catalog: &Catalog) -> Result<Forecast, FetchError> {
        let url = self.config.base_url.clone();
        info!(
            "Requesting hourly forecast for {} points from {}",
            catalog.len(),
            url
        );

        let body = match self.config.request_timeout {
            Some(limit) => tokio::time::timeout(limit, self.download(catalog, &url))
                .await
                .map_err(|_| {
                    warn!("Forecast request to {} timed out after {:?}", url, limit);
                    FetchError::Timeout {
                        url: url.clone(),
                        after: limit,
                    }
                })??,
            None => self.download(catalog, &url).await?,
        };

        let records = normalize(catalog, body, self.config.drift_warning_km)?;
        info!(
            "Received {} hourly records for {} points",
            records.len(),
            catalog.len()
        );
        Ok(Forecast::new(records))
    }

    async fn download(&self, catalog: &Catalog, url: &str) -> Result<Value, FetchError> {
        let response = self
            .client
            .get(url)
            .query(&self.query(catalog))
            .send()
            .await
            .map_err(|e| FetchError::NetworkRequest(url.to_string(), e))?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                warn!("HTTP error for {}: {:?}", url, e);
                return Err(if let Some(status) = e.status() {
                    FetchError::HttpStatus {
                        url: url.to_string(),
                        status,
                        source: e,
                    }
                } else {
                    FetchError::NetworkRequest(url.to_string(), e)
                });
            }
        };

        let bytes = response
            .bytes()
            .await
            .map_err(|e| FetchError::NetworkRequest(url.to_string(), e))?;
        Ok(serde_json::from_slice(&bytes)?)
    }
}
