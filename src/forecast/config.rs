use bon::Builder;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://api.open-meteo.com/v1/forecast";
pub const DEFAULT_TIMEZONE: &str = "Asia/Tokyo";

/// The forecast horizon: today only.
pub const FORECAST_DAYS: u8 = 1;

/// Settings for talking to the forecast service and caching its answers.
///
/// Every field has a default, so `FetchConfig::default()` and
/// `FetchConfig::builder().build()` are equivalent.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use temperature_map::FetchConfig;
///
/// let config = FetchConfig::builder()
///     .timezone("Europe/Amsterdam")
///     .cache_ttl(Duration::from_secs(600))
///     .request_timeout(Duration::from_secs(10))
///     .build();
///
/// assert_eq!(config.timezone, "Europe/Amsterdam");
/// ```
#[derive(Debug, Clone, Builder)]
pub struct FetchConfig {
    /// Forecast endpoint.
    #[builder(default = DEFAULT_BASE_URL.to_string(), into)]
    pub base_url: String,

    /// Named timezone the service uses for the returned hourly timestamps.
    #[builder(default = DEFAULT_TIMEZONE.to_string(), into)]
    pub timezone: String,

    /// How long a successful fetch is reused before asking the service again.
    #[builder(default = Duration::from_secs(3600))]
    pub cache_ttl: Duration,

    /// Client-side limit for the whole request. `None` keeps the transport's default.
    pub request_timeout: Option<Duration>,

    /// Distance between a requested point and the coordinate echoed back by the service
    /// above which a warning is logged.
    #[builder(default = 50.0)]
    pub drift_warning_km: f64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}
