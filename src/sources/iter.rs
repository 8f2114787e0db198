// src/sources/iter.rs

//! ITER Organization vacancies.
//!
//! The listing is a table with one `tr.job` per opening. Both the title cell
//! and the trailing button carry an `a.job-link` pointing at the
//! SuccessFactors detail page; the link target is query-escaped.

use async_trait::async_trait;
use reqwest::Client;
use scraper::Html;
use serde::Deserialize;
use url::Url;

use super::{JobSource, parse_options, parse_selector};
use crate::error::Result;
use crate::models::{HttpConfig, Posting};
use crate::utils::http::{create_async_client, fetch_page};
use crate::utils::{absolute_url, query_unescape};

const JOBS_URL: &str = "https://www.iter.org/jobs";

/// Options accepted by the `iter` source.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IterOptions {
    /// Listing page (default: the public ITER jobs page)
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
}

fn default_endpoint() -> String {
    JOBS_URL.to_string()
}

/// Scraper for the ITER jobs page.
pub struct IterSource {
    client: Client,
    endpoint: Url,
}

impl IterSource {
    pub const NAME: &'static str = "iter";

    pub fn create(http: &HttpConfig, options: &toml::Table) -> Result<Box<dyn JobSource>> {
        let options: IterOptions = parse_options(Self::NAME, options)?;
        Ok(Box::new(Self {
            client: create_async_client(http)?,
            endpoint: Url::parse(&options.endpoint)?,
        }))
    }

    /// Extract postings from a listing page. ITER does not expose departments.
    pub fn parse_postings(html: &str, base: &Url) -> Result<Vec<Posting>> {
        let document = Html::parse_document(html);

        let job_sel = parse_selector(".job")?;
        let link_sel = parse_selector("a.job-link")?;

        let postings = document
            .select(&job_sel)
            .map(|job| {
                let link = job.select(&link_sel).next();
                let title: String = link.map(|a| a.text().collect()).unwrap_or_default();
                let href = link.and_then(|a| a.value().attr("href")).unwrap_or("");

                Posting {
                    details_url: absolute_url(base, &query_unescape(href.trim())),
                    title: title.trim().to_string(),
                    department: String::new(),
                }
            })
            .collect();

        Ok(postings)
    }
}

#[async_trait]
impl JobSource for IterSource {
    fn name(&self) -> &str {
        Self::NAME
    }

    async fn fetch(&self) -> Result<Vec<Posting>> {
        log::debug!("GET {}", self.endpoint);
        let html = fetch_page(&self.client, self.endpoint.as_str()).await?;
        let postings = Self::parse_postings(&html, &self.endpoint)?;
        log::info!("[{}] {} postings listed", Self::NAME, postings.len());
        Ok(postings)
    }
}
