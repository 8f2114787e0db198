// src/models/mod.rs

//! Domain models for the job watcher.
//!
//! This module contains the data structures shared across sources, storage
//! and notification.

mod config;
mod posting;

// Re-export all public types
pub use config::{Config, HttpConfig, SourceEntry, StateConfig, TelegramConfig};
pub use posting::Posting;
