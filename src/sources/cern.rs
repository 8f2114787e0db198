// src/sources/cern.rs

//! CERN staff openings on SmartRecruiters.
//!
//! Each opening is rendered as:
//!
//! ```html
//! <li class="opening-job job">
//!   <a href="https://jobs.smartrecruiters.com/CERN/743999918559253-applied-physicist" class="link--block details">
//!     <h4 class="details-title job-title link--block-target">Applied Physicist (EP-NU-2023-99-LD)</h4>
//!     <ul class="job-list list--dotted">
//!       <li class="job-desc">Geneva, Switzerland</li>
//!       <li class="job-desc">EP</li>
//!     </ul>
//!   </a>
//! </li>
//! ```
//!
//! The first `job-desc` is the location, the last one the department.

use async_trait::async_trait;
use reqwest::Client;
use scraper::Html;
use serde::Deserialize;
use url::Url;

use super::{JobSource, parse_options, parse_selector};
use crate::error::Result;
use crate::models::{HttpConfig, Posting};
use crate::utils::absolute_url;
use crate::utils::http::{create_async_client, fetch_page};

const JOBS_URL: &str = "https://careers.smartrecruiters.com/CERN/staff";

/// Options accepted by the `cern` source.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CernOptions {
    /// Listing page (default: the public CERN staff listing)
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
}

fn default_endpoint() -> String {
    JOBS_URL.to_string()
}

/// Scraper for the CERN careers page.
pub struct CernSource {
    client: Client,
    endpoint: Url,
}

impl CernSource {
    pub const NAME: &'static str = "cern";

    /// Build the source from shared HTTP settings and its option table.
    pub fn create(http: &HttpConfig, options: &toml::Table) -> Result<Box<dyn JobSource>> {
        let options: CernOptions = parse_options(Self::NAME, options)?;
        Ok(Box::new(Self {
            client: create_async_client(http)?,
            endpoint: Url::parse(&options.endpoint)?,
        }))
    }

    /// Extract postings from a listing page.
    pub fn parse_postings(html: &str, base: &Url) -> Result<Vec<Posting>> {
        let document = Html::parse_document(html);

        let job_sel = parse_selector(".opening-job.job")?;
        let title_sel = parse_selector(".job-title")?;
        let link_sel = parse_selector("a")?;
        let desc_sel = parse_selector(".job-desc")?;

        let postings = document
            .select(&job_sel)
            .map(|job| {
                let title: String = job.select(&title_sel).flat_map(|e| e.text()).collect();
                let href = job
                    .select(&link_sel)
                    .next()
                    .and_then(|a| a.value().attr("href"))
                    .unwrap_or("");
                let department: String = job
                    .select(&desc_sel)
                    .last()
                    .map(|e| e.text().collect())
                    .unwrap_or_default();

                Posting {
                    details_url: absolute_url(base, href.trim()),
                    title: title.trim().to_string(),
                    department,
                }
            })
            .collect();

        Ok(postings)
    }
}

#[async_trait]
impl JobSource for CernSource {
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
