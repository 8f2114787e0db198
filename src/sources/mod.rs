//! Job sources.
//!
//! A source knows one careers page: where it lives and how its markup lists
//! openings. Every source turns that page into [`Posting`]s so storage and
//! notification never need to know which site a posting came from.
//!
//! Sources are created by name through the [`SourceRegistry`]. Adding a site
//! means writing a module with a type implementing [`JobSource`] and adding
//! one line to [`SourceRegistry::builtin`].

mod cern;
mod iter;
mod registry;

pub use cern::CernSource;
pub use iter::IterSource;
pub use registry::{SourceFactory, SourceRegistry};

use async_trait::async_trait;
use scraper::Selector;
use serde::de::DeserializeOwned;

use crate::error::{AppError, Result};
use crate::models::Posting;

/// A careers page that can be scraped for postings.
#[async_trait]
pub trait JobSource: Send + Sync {
    /// Registered name of this source.
    fn name(&self) -> &str;

    /// Fetch the postings currently listed.
    ///
    /// Issues a single request. An empty listing is `Ok(vec![])`.
    async fn fetch(&self) -> Result<Vec<Posting>>;
}

/// Deserialize a source's option table into its typed options.
pub(crate) fn parse_options<T: DeserializeOwned>(source: &str, options: &toml::Table) -> Result<T> {
    toml::Value::Table(options.clone())
        .try_into::<T>()
        .map_err(|e| AppError::config(format!("Invalid options for source '{source}': {e}")))
}

pub(crate) fn parse_selector(s: &str) -> Result<Selector> {
    Selector::parse(s).map_err(|e| AppError::selector(s, format!("{e:?}")))
}
