// src/lib.rs

//! jobwatch library: job sources, seen-posting state and notifications.

pub mod error;
pub mod models;
pub mod notify;
pub mod pipeline;
pub mod sources;
pub mod storage;
pub mod utils;
