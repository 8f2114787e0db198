//! Job posting data structure.

use serde::{Deserialize, Serialize};

/// A job opening scraped from a careers page.
///
/// Field names on disk keep the capitalized form used by existing state
/// files (`DetailsURL`, `Title`, `Department`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Posting {
    /// Absolute URL of the detail page (empty if the markup has none)
    #[serde(rename = "DetailsURL", default)]
    pub details_url: String,

    /// Job title, whitespace-trimmed
    #[serde(rename = "Title")]
    pub title: String,

    /// Organizational unit or location label (empty if not exposed)
    #[serde(rename = "Department", default)]
    pub department: String,
}

impl Posting {
    pub fn new(
        title: impl Into<String>,
        department: impl Into<String>,
        details_url: impl Into<String>,
    ) -> Self {
        Self {
            details_url: details_url.into(),
            title: title.into(),
            department: department.into(),
        }
    }

    /// Whether `other` denotes the same opening.
    ///
    /// Only title and department take part; the detail URL is ignored.
    pub fn same_posting(&self, other: &Posting) -> bool {
        self.title == other.title && self.department == other.department
    }

    /// Format posting for display using a template.
    ///
    /// Supported placeholders: `{title}`, `{department}`, `{link}`.
    pub fn format(&self, template: &str) -> String {
        template
            .replace("{title}", &self.title)
            .replace("{department}", &self.department)
            .replace("{link}", &self.details_url)
    }
}
