use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A tracked employer and the ATS board it publishes to.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Company {
    pub id: Uuid,
    pub name: String,
    /// Registry key of the scraper adapter, e.g. "lever" or "greenhouse".
    pub platform: String,
    pub slug: String,
    pub career_url: Option<String>,
    pub enabled: bool,
    pub last_scraped_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub sponsor_id: Option<Uuid>,
    pub sponsors_h1b: bool,
    pub h1b_approval_rate: Option<f64>,
    pub h1b_total_filed: Option<i32>,
}

/// Operator-supplied fields for a new company target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCompany {
    pub name: String,
    pub platform: String,
    pub slug: String,
    pub career_url: Option<String>,
}

impl Company {
    /// Builds an enabled, never-scraped company with no sponsor linkage.
    pub fn new(new: NewCompany) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: new.name,
            platform: new.platform,
            slug: new.slug,
            career_url: new.career_url,
            enabled: true,
            last_scraped_at: None,
            created_at: Utc::now(),
            sponsor_id: None,
            sponsors_h1b: false,
            h1b_approval_rate: None,
            h1b_total_filed: None,
        }
    }
}
