use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// The single candidate profile every job is scored against.
#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow)]
pub struct Profile {
    pub name: String,
    pub email: String,
    pub skills: Vec<String>,
    pub experience_years: i32,
    pub preferred_roles: Vec<String>,
    pub preferred_locations: Vec<String>,
    pub min_match_score: f64,
    pub visa_required: bool,
    pub resume_raw: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}
