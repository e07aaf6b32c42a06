use crate::catalog::error::CatalogError;
use crate::forecast::error::{FailureKind, FetchError};
use polars::prelude::PolarsError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TemperatureMapError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("Failed to build forecast frame")]
    Frame(#[from] PolarsError),
}

impl TemperatureMapError {
    /// The failure class of a fetch error, `None` for anything that is not a fetch.
    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            TemperatureMapError::Fetch(e) => Some(e.kind()),
            _ => None,
        }
    }
}
