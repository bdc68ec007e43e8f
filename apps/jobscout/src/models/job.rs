use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::errors::AppError;

/// A posting as returned by a scraper adapter, before persistence.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPosting {
    pub external_id: String,
    pub title: String,
    pub description: String,
    pub location: String,
    pub remote: bool,
    pub department: String,
    pub url: String,
    pub posted_at: Option<DateTime<Utc>>,
}

/// A persisted job. `(company_id, external_id)` is unique; content is never
/// rewritten by re-ingestion.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Job {
    pub id: Uuid,
    pub company_id: Uuid,
    /// Joined from `companies.name` on every read.
    pub company_name: Option<String>,
    pub external_id: String,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub remote: bool,
    pub department: Option<String>,
    pub url: String,
    pub posted_at: Option<DateTime<Utc>>,
    pub scraped_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub status: String,
    pub experience_level: Option<String>,
    pub is_new_grad: bool,
    pub visa_mentioned: bool,
    pub visa_sentiment: Option<String>,
    pub match_score: Option<f64>,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub match_reason: Option<String>,
    pub scored_at: Option<DateTime<Utc>>,
}

impl Job {
    /// Materializes a freshly ingested posting: status `new`, unclassified, unscored.
    pub fn from_posting(company_id: Uuid, posting: &RawPosting) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            company_id,
            company_name: None,
            external_id: posting.external_id.clone(),
            title: posting.title.clone(),
            description: non_empty(&posting.description),
            location: non_empty(&posting.location),
            remote: posting.remote,
            department: non_empty(&posting.department),
            url: posting.url.clone(),
            posted_at: posting.posted_at,
            scraped_at: now,
            created_at: now,
            status: JobStatus::New.as_str().to_string(),
            experience_level: None,
            is_new_grad: false,
            visa_mentioned: false,
            visa_sentiment: None,
            match_score: None,
            matched_skills: vec![],
            missing_skills: vec![],
            match_reason: None,
            scored_at: None,
        }
    }
}

fn non_empty(s: &str) -> Option<String> {
    if s.trim().is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

/// Review lifecycle of a job.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    #[default]
    New,
    Applied,
    Interviewing,
    Offer,
    Rejected,
    Archived,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::New => "new",
            JobStatus::Applied => "applied",
            JobStatus::Interviewing => "interviewing",
            JobStatus::Offer => "offer",
            JobStatus::Rejected => "rejected",
            JobStatus::Archived => "archived",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "new" => Ok(JobStatus::New),
            "applied" => Ok(JobStatus::Applied),
            "interviewing" => Ok(JobStatus::Interviewing),
            "offer" => Ok(JobStatus::Offer),
            "rejected" => Ok(JobStatus::Rejected),
            "archived" => Ok(JobStatus::Archived),
            other => Err(AppError::Validation(format!("unknown job status '{other}'"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_posting_starts_new_and_unscored() {
        let posting = RawPosting {
            external_id: "abc".to_string(),
            title: "Backend Engineer".to_string(),
            description: "Go".to_string(),
            location: "".to_string(),
            url: "https://jobs.example.com/abc".to_string(),
            ..Default::default()
        };
        let job = Job::from_posting(Uuid::new_v4(), &posting);
        assert_eq!(job.status, "new");
        assert!(job.match_score.is_none());
        assert!(job.location.is_none());
        assert_eq!(job.description.as_deref(), Some("Go"));
    }

    #[test]
    fn test_status_parse_is_case_insensitive() {
        assert_eq!("Applied".parse::<JobStatus>().unwrap(), JobStatus::Applied);
    }

    #[test]
    fn test_unknown_status_is_validation_error() {
        let err = "hired".parse::<JobStatus>().unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }
}
