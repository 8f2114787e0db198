// src/utils/http.rs

//! HTTP client utilities.

use std::time::Duration;

use reqwest::StatusCode;
use reqwest::header::CONTENT_TYPE;

use crate::error::{AppError, Result};
use crate::models::HttpConfig;

/// Create a configured asynchronous HTTP client.
pub fn create_async_client(config: &HttpConfig) -> Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .user_agent(&config.user_agent)
        .timeout(Duration::from_secs(config.timeout_secs))
        .build()?;
    Ok(client)
}

/// Fetch a page and return its body as text.
///
/// Anything other than `200 OK` is a hard failure. The body is decoded with
/// the charset from `Content-Type`; undecodable bytes are replaced. A reply
/// declaring a media type that is not a text document is a parse error.
pub async fn fetch_page(client: &reqwest::Client, url: &str) -> Result<String> {
    let response = client.get(url).send().await?;
    let status = response.status();
    if status != StatusCode::OK {
        return Err(AppError::Status {
            url: url.to_string(),
            status,
        });
    }

    if let Some(value) = response.headers().get(CONTENT_TYPE) {
        let media_type = media_type(value.to_str().unwrap_or_default());
        if !is_document(&media_type) {
            return Err(AppError::parse(
                url,
                format!("expected an HTML page, got '{media_type}'"),
            ));
        }
    }

    Ok(response.text().await?)
}

fn media_type(content_type: &str) -> String {
    content_type
        .split(';')
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_lowercase()
}

fn is_document(media_type: &str) -> bool {
    media_type.is_empty() || media_type.starts_with("text/") || media_type == "application/xhtml+xml"
}
