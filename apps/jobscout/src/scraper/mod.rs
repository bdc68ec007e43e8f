//! Scraper protocol and per-platform adapters.
//!
//! Each adapter talks to one public job-board endpoint keyed by company slug
//! and normalizes its payload into `RawPosting`s.

use async_trait::async_trait;

use crate::errors::AppError;
use crate::models::job::RawPosting;

pub mod greenhouse;
pub mod lever;
pub mod registry;

pub use greenhouse::GreenhouseScraper;
pub use lever::LeverScraper;
pub use registry::ScraperRegistry;

pub(crate) const REQUEST_TIMEOUT_SECS: u64 = 30;

#[async_trait]
pub trait Scraper: Send + Sync {
    /// Platform id, matched against `Company::platform`.
    fn name(&self) -> &'static str;

    async fn fetch_jobs(&self, company_slug: &str) -> Result<Vec<RawPosting>, AppError>;
}

pub(crate) fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()
        .expect("Failed to build HTTP client")
}

pub(crate) fn is_remote(location: &str) -> bool {
    location.to_lowercase().contains("remote")
}
