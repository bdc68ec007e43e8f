use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use serde::Deserialize;
use tracing::debug;

use super::{http_client, is_remote, Scraper};
use crate::errors::AppError;
use crate::models::job::RawPosting;

pub const LEVER_API_URL: &str = "https://api.lever.co";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LeverPosting {
    id: String,
    #[serde(default)]
    text: String,
    #[serde(rename = "hostedUrl", alias = "hostedURL", default)]
    hosted_url: String,
    #[serde(default)]
    categories: LeverCategories,
    #[serde(default)]
    description_plain: String,
    #[serde(default)]
    lists: Vec<LeverList>,
    #[serde(default)]
    created_at: i64,
}

#[derive(Debug, Default, Deserialize)]
struct LeverCategories {
    #[serde(default)]
    location: String,
    #[serde(default)]
    department: String,
}

#[derive(Debug, Deserialize)]
struct LeverList {
    #[serde(default)]
    text: String,
    #[serde(default)]
    content: String,
}

pub struct LeverScraper {
    client: reqwest::Client,
    base_url: String,
}

impl LeverScraper {
    pub fn new() -> Self {
        Self::with_base_url(LEVER_API_URL)
    }

    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            client: http_client(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }
}

impl Default for LeverScraper {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Scraper for LeverScraper {
    fn name(&self) -> &'static str {
        "lever"
    }

    async fn fetch_jobs(&self, company_slug: &str) -> Result<Vec<RawPosting>, AppError> {
        let url = format!("{}/v0/postings/{company_slug}?mode=json", self.base_url);
        let response = self.client.get(&url).send().await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            return Err(AppError::Fetch(format!(
                "lever API returned status {}",
                status.as_u16()
            )));
        }

        let postings: Vec<LeverPosting> = response
            .json()
            .await
            .map_err(|e| AppError::Fetch(format!("decoding lever response: {e}")))?;
        debug!("lever/{company_slug}: {} postings", postings.len());

        Ok(postings.into_iter().map(to_raw_posting).collect())
    }
}

fn to_raw_posting(p: LeverPosting) -> RawPosting {
    let mut description = p.description_plain;
    for list in &p.lists {
        description.push_str(&format!("\n\n{}\n{}", list.text, list.content));
    }

    let posted_at = if p.created_at > 0 {
        Utc.timestamp_millis_opt(p.created_at).single()
    } else {
        None
    };

    RawPosting {
        external_id: p.id,
        title: p.text,
        description,
        remote: is_remote(&p.categories.location),
        location: p.categories.location,
        department: p.categories.department,
        url: p.hosted_url,
        posted_at,
    }
}
