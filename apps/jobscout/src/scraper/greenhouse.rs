use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::{debug, warn};

use super::{http_client, is_remote, Scraper};
use crate::errors::AppError;
use crate::models::job::RawPosting;

pub const GREENHOUSE_API_URL: &str = "https://boards-api.greenhouse.io";

#[derive(Debug, Deserialize)]
struct GreenhouseJobList {
    #[serde(default)]
    jobs: Vec<GreenhouseJob>,
}

#[derive(Debug, Deserialize)]
struct GreenhouseJob {
    id: i64,
    #[serde(default)]
    title: String,
    #[serde(default)]
    absolute_url: String,
    #[serde(default)]
    location: GreenhouseLocation,
    #[serde(default)]
    updated_at: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    departments: Vec<GreenhouseDepartment>,
}

#[derive(Debug, Default, Deserialize)]
struct GreenhouseLocation {
    #[serde(default)]
    name: String,
}

#[derive(Debug, Deserialize)]
struct GreenhouseDepartment {
    #[serde(default)]
    name: String,
}

pub struct GreenhouseScraper {
    client: reqwest::Client,
    base_url: String,
}

impl GreenhouseScraper {
    pub fn new() -> Self {
        Self::with_base_url(GREENHOUSE_API_URL)
    }

    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            client: http_client(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

impl Default for GreenhouseScraper {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Scraper for GreenhouseScraper {
    fn name(&self) -> &'static str {
        "greenhouse"
    }

    /// Lists the board, then re-fetches it with `?content=true` so postings
    /// carry full descriptions. A usable second body replaces the listing.
    async fn fetch_jobs(&self, company_slug: &str) -> Result<Vec<RawPosting>, AppError> {
        let url = format!("{}/v1/boards/{company_slug}/jobs", self.base_url);

        let response = self.client.get(&url).send().await?;
        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(AppError::Fetch(format!(
                "greenhouse API returned status {}",
                status.as_u16()
            )));
        }
        let mut listing: GreenhouseJobList = response
            .json()
            .await
            .map_err(|e| AppError::Fetch(format!("decoding greenhouse response: {e}")))?;

        let response = self
            .client
            .get(&url)
            .query(&[("content", "true")])
            .send()
            .await
            .map_err(|e| AppError::Fetch(format!("fetching greenhouse job content: {e}")))?;
        if response.status() == reqwest::StatusCode::OK {
            match response.json::<GreenhouseJobList>().await {
                Ok(with_content) => listing = with_content,
                Err(e) => warn!("greenhouse/{company_slug}: content listing undecodable, keeping summary: {e}"),
            }
        } else {
            warn!(
                "greenhouse/{company_slug}: content listing returned {}, keeping summary",
                response.status().as_u16()
            );
        }

        debug!("greenhouse/{company_slug}: {} postings", listing.jobs.len());
        Ok(listing.jobs.into_iter().map(to_raw_posting).collect())
    }
}

fn to_raw_posting(j: GreenhouseJob) -> RawPosting {
    let posted_at = DateTime::parse_from_rfc3339(&j.updated_at)
        .ok()
        .map(|t| t.with_timezone(&Utc));
    let department = j
        .departments
        .iter()
        .map(|d| d.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    RawPosting {
        external_id: j.id.to_string(),
        title: j.title,
        description: j.content,
        remote: is_remote(&j.location.name),
        location: j.location.name,
        department,
        url: j.absolute_url,
        posted_at,
    }
}
