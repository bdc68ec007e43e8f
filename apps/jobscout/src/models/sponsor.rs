use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Historical visa-petition statistics for one employer.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Sponsor {
    pub id: Uuid,
    pub company_name: String,
    /// Join key against `Company::name` after `h1b::sponsors::normalize_name`.
    pub normalized_name: String,
    pub fiscal_year: Option<i32>,
    /// Percentage, 0–100.
    pub approval_rate: f64,
    pub total_petitions: i32,
}
