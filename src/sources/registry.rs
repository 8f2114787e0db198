//! Name to constructor mapping for job sources.

use std::collections::HashMap;

use super::{CernSource, IterSource, JobSource};
use crate::error::{AppError, Result};
use crate::models::HttpConfig;

/// Builds a source from the shared HTTP settings and its own option table.
pub type SourceFactory = fn(&HttpConfig, &toml::Table) -> Result<Box<dyn JobSource>>;

/// Registry of source factories keyed by name.
///
/// Filled once at startup, read afterwards. There is no removal.
#[derive(Clone, Default)]
pub struct SourceRegistry {
    factories: HashMap<String, SourceFactory>,
}

impl SourceRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry holding every source shipped with the crate.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        registry.register(CernSource::NAME, CernSource::create);
        registry.register(IterSource::NAME, IterSource::create);
        registry
    }

    /// Store `factory` under `name`, replacing any previous registration.
    pub fn register(&mut self, name: impl Into<String>, factory: SourceFactory) {
        let name = name.into();
        if self.factories.insert(name.clone(), factory).is_some() {
            log::warn!("Source '{}' registered twice, keeping the last one", name);
        }
    }

    /// Factory registered under `name`.
    pub fn lookup(&self, name: &str) -> Option<SourceFactory> {
        self.factories.get(name).copied()
    }

    /// Build the source registered under `name`.
    pub fn construct(
        &self,
        name: &str,
        http: &HttpConfig,
        options: &toml::Table,
    ) -> Result<Box<dyn JobSource>> {
        let factory = self.lookup(name).ok_or_else(|| AppError::UnknownSource {
            name: name.to_string(),
            available: self.names().join(", "),
        })?;
        factory(http, options)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.factories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}
