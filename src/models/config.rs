//! Application configuration structures.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// Root application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Where seen postings are persisted
    #[serde(default)]
    pub state: StateConfig,

    /// HTTP client behavior shared by all sources
    #[serde(default)]
    pub http: HttpConfig,

    /// Telegram delivery settings
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// Sources to check, in order
    #[serde(default = "defaults::sources")]
    pub sources: Vec<SourceEntry>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Validate settings that do not depend on notification credentials.
    pub fn validate(&self) -> Result<()> {
        if self.http.user_agent.trim().is_empty() {
            return Err(AppError::validation("http.user_agent is empty"));
        }
        if self.http.timeout_secs == 0 {
            return Err(AppError::validation("http.timeout_secs must be > 0"));
        }
        if self.http.fetch_deadline_secs == Some(0) {
            return Err(AppError::validation("http.fetch_deadline_secs must be > 0"));
        }
        if self.sources.is_empty() {
            return Err(AppError::validation("No sources defined"));
        }

        let mut names = HashSet::new();
        let mut files = HashSet::new();
        for entry in &self.sources {
            if entry.name.trim().is_empty() {
                return Err(AppError::validation("Source with empty name"));
            }
            if !names.insert(entry.name.as_str()) {
                return Err(AppError::validation(format!(
                    "Source '{}' listed twice",
                    entry.name
                )));
            }
            let file = self.jobs_file_for(entry);
            if !files.insert(file.clone()) {
                return Err(AppError::validation(format!(
                    "Sources share the state file {}",
                    file.display()
                )));
            }
        }
        Ok(())
    }

    /// Validate everything [`Config::validate`] does plus the Telegram credentials.
    pub fn validate_for_delivery(&self) -> Result<()> {
        self.validate()?;
        self.telegram.validate()
    }

    /// State file used by a source.
    ///
    /// An explicit `jobs_file` on the entry wins. A lone source uses the
    /// global `state.jobs_file`; with several sources each one gets
    /// `{state.jobs_file}-{name}`.
    pub fn jobs_file_for(&self, entry: &SourceEntry) -> PathBuf {
        if let Some(file) = &entry.jobs_file {
            return file.clone();
        }
        if self.sources.len() <= 1 {
            return self.state.jobs_file.clone();
        }
        let mut file = self.state.jobs_file.clone().into_os_string();
        file.push(format!("-{}", entry.name));
        PathBuf::from(file)
    }

    /// Restrict the run to the given sources, in the given order.
    ///
    /// Names already configured keep their entry; others get a bare one.
    pub fn select_sources(&mut self, names: &[String]) {
        let selected: Vec<SourceEntry> = names
            .iter()
            .map(|name| {
                self.sources
                    .iter()
                    .find(|entry| &entry.name == name)
                    .cloned()
                    .unwrap_or_else(|| SourceEntry::named(name))
            })
            .collect();
        self.sources = selected;
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            state: StateConfig::default(),
            http: HttpConfig::default(),
            telegram: TelegramConfig::default(),
            sources: defaults::sources(),
        }
    }
}

/// Persistence settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StateConfig {
    /// File holding the snapshot of known postings
    #[serde(default = "defaults::jobs_file")]
    pub jobs_file: PathBuf,
}

impl Default for StateConfig {
    fn default() -> Self {
        Self {
            jobs_file: defaults::jobs_file(),
        }
    }
}

/// HTTP client settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent header for HTTP requests
    #[serde(default = "defaults::user_agent")]
    pub user_agent: String,

    /// Request timeout in seconds
    #[serde(default = "defaults::timeout")]
    pub timeout_secs: u64,

    /// Upper bound for a whole source fetch, unbounded when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fetch_deadline_secs: Option<u64>,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: defaults::user_agent(),
            timeout_secs: defaults::timeout(),
            fetch_deadline_secs: None,
        }
    }
}

/// Telegram Bot API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    /// Bot API token
    #[serde(default)]
    pub token: String,

    /// Destination chat
    #[serde(default)]
    pub chat_id: i64,

    /// Bot API base URL
    #[serde(default = "defaults::api_base")]
    pub api_base: String,

    /// Telegram parse mode for messages
    #[serde(default = "defaults::parse_mode")]
    pub parse_mode: String,

    /// Message template, see [`crate::models::Posting::format`]
    #[serde(default = "defaults::template")]
    pub template: String,
}

impl TelegramConfig {
    /// Both token and chat id are required before anything is sent.
    pub fn validate(&self) -> Result<()> {
        if self.token.trim().is_empty() {
            return Err(AppError::config("telegram api token not provided"));
        }
        if self.chat_id == 0 {
            return Err(AppError::config("telegram chat id not provided"));
        }
        Ok(())
    }
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            token: String::new(),
            chat_id: 0,
            api_base: defaults::api_base(),
            parse_mode: defaults::parse_mode(),
            template: defaults::template(),
        }
    }
}

/// One source to check.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceEntry {
    /// Registered source name (e.g. "cern")
    pub name: String,

    /// State file for this source, see [`Config::jobs_file_for`]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub jobs_file: Option<PathBuf>,

    /// Source specific options, validated by the source itself
    #[serde(default)]
    pub options: toml::Table,
}

impl SourceEntry {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            jobs_file: None,
            options: toml::Table::new(),
        }
    }
}

mod defaults {
    use std::path::PathBuf;

    use super::SourceEntry;

    pub fn jobs_file() -> PathBuf {
        PathBuf::from("/tmp/jobs-cern")
    }

    pub fn user_agent() -> String {
        "Mozilla/5.0 (compatible; jobwatch/0.1)".into()
    }
    pub fn timeout() -> u64 {
        60
    }

    pub fn api_base() -> String {
        "https://api.telegram.org".into()
    }
    pub fn parse_mode() -> String {
        "Markdown".into()
    }
    pub fn template() -> String {
        "💼 {title}\n\n👉 [More details]({link})".into()
    }

    pub fn sources() -> Vec<SourceEntry> {
        vec![SourceEntry::named("cern")]
    }
}
