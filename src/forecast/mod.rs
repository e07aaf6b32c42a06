pub mod cache;
pub mod config;
pub mod error;
pub mod fetcher;
pub(crate) mod response;
