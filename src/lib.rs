mod catalog;
mod encoding;
mod error;
mod forecast;
mod snapshot;
mod temperature_map;
mod timeline;
mod types;
mod view;

pub use error::TemperatureMapError;
pub use temperature_map::*;

pub use catalog::error::CatalogError;
pub use catalog::Catalog;

pub use types::forecast::Forecast;
pub use types::point::{LatLon, Point};
pub use types::record::{ForecastRecord, TIMESTAMP_FORMAT};

pub use forecast::cache::TtlCache;
pub use forecast::config::{FetchConfig, DEFAULT_BASE_URL, DEFAULT_TIMEZONE, FORECAST_DAYS};
pub use forecast::error::{FailureKind, FetchError};
pub use forecast::fetcher::ForecastFetcher;

pub use encoding::*;
pub use snapshot::{select, EncodedRecord, Snapshot};
pub use timeline::{build_index, current_hour_key, TimestampIndex};
pub use view::{ColumnLayerStyle, MapFrame, ViewState};
