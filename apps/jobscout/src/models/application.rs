use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::models::job::JobStatus;

/// The candidate's application to one job. At most one per job; its status
/// is mirrored onto the job row.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Application {
    pub id: Uuid,
    pub job_id: Uuid,
    pub applied_at: DateTime<Utc>,
    pub status: String,
    pub notes: String,
    pub updated_at: DateTime<Utc>,
}

impl Application {
    pub fn new(job_id: Uuid, notes: &str) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            job_id,
            applied_at: now,
            status: JobStatus::Applied.as_str().to_string(),
            notes: notes.to_string(),
            updated_at: now,
        }
    }
}

/// Number of applications currently in one status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct StatusCount {
    pub status: String,
    pub count: i64,
}
