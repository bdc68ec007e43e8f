//! Persistence collaborator.
//!
//! `JobStore` is the only path to stored state. `PgStore` is the production
//! backend; tests use the in-memory store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::errors::AppError;
use crate::h1b::classifier::Classification;
use crate::matching::SkillScoreResult;
use crate::models::application::{Application, StatusCount};
use crate::models::company::Company;
use crate::models::job::{Job, JobStatus};
use crate::models::profile::Profile;
use crate::models::sponsor::Sponsor;

#[cfg(test)]
pub mod memory;
pub mod postgres;

pub use postgres::PgStore;

/// Filters for listing jobs. Results are ordered by score descending, then
/// newest first.
#[derive(Debug, Clone, Default)]
pub struct JobQuery {
    pub min_score: Option<f64>,
    pub company_id: Option<Uuid>,
    pub status: Option<JobStatus>,
    pub remote_only: bool,
    /// Only jobs whose company is linked to a visa sponsor.
    pub sponsor_only: bool,
    pub new_grad_only: bool,
    pub limit: Option<i64>,
}

#[async_trait]
pub trait JobStore: Send + Sync {
    // ── Jobs ────────────────────────────────────────────────────────────────

    /// Inserts `job` unless a job with the same (company_id, external_id)
    /// exists. Returns true only when a row was created.
    async fn create_job_if_absent(&self, job: &Job) -> Result<bool, AppError>;

    async fn get_job(&self, id: Uuid) -> Result<Job, AppError>;

    /// Ids whose textual form starts with `prefix`.
    async fn find_job_ids_by_prefix(&self, prefix: &str) -> Result<Vec<Uuid>, AppError>;

    async fn list_jobs(&self, query: &JobQuery) -> Result<Vec<Job>, AppError>;

    async fn list_unscored_jobs(&self) -> Result<Vec<Job>, AppError>;

    async fn update_job_status(&self, id: Uuid, status: JobStatus) -> Result<(), AppError>;

    async fn update_job_classification(
        &self,
        id: Uuid,
        classification: &Classification,
    ) -> Result<(), AppError>;

    async fn update_job_score(&self, id: Uuid, result: &SkillScoreResult) -> Result<(), AppError>;

    // ── Companies ───────────────────────────────────────────────────────────

    async fn create_company(&self, company: &Company) -> Result<(), AppError>;

    async fn get_company(&self, id: Uuid) -> Result<Company, AppError>;

    async fn list_companies(&self) -> Result<Vec<Company>, AppError>;

    async fn set_company_enabled(&self, id: Uuid, enabled: bool) -> Result<(), AppError>;

    async fn delete_company(&self, id: Uuid) -> Result<(), AppError>;

    async fn stamp_last_scraped(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), AppError>;

    // ── Profile ─────────────────────────────────────────────────────────────

    async fn get_profile(&self) -> Result<Option<Profile>, AppError>;

    async fn upsert_profile(&self, profile: &Profile) -> Result<(), AppError>;

    // ── Applications ────────────────────────────────────────────────────────

    /// Records an application for `job_id` and moves the job to `applied`.
    /// A job can be applied to once.
    async fn create_application(&self, job_id: Uuid, notes: &str) -> Result<Application, AppError>;

    async fn get_application(&self, job_id: Uuid) -> Result<Option<Application>, AppError>;

    /// Moves the application and its job to `status`. `None` keeps the notes.
    async fn update_application(
        &self,
        job_id: Uuid,
        status: JobStatus,
        notes: Option<&str>,
    ) -> Result<(), AppError>;

    /// Applications per status, most common first.
    async fn application_summary(&self) -> Result<Vec<StatusCount>, AppError>;

    // ── Sponsors ────────────────────────────────────────────────────────────

    /// Inserts or replaces the record keyed by (normalized_name, fiscal_year).
    async fn upsert_sponsor(&self, sponsor: &Sponsor) -> Result<(), AppError>;

    /// Best record for a normalized employer name: most petitions first.
    async fn find_sponsor_by_normalized_name(
        &self,
        normalized_name: &str,
    ) -> Result<Option<Sponsor>, AppError>;

    async fn link_company_to_sponsor(
        &self,
        company_id: Uuid,
        sponsor: &Sponsor,
    ) -> Result<(), AppError>;
}

/// An application that exists has left `new` for good.
pub(crate) fn check_application_status(status: JobStatus) -> Result<(), AppError> {
    if status == JobStatus::New {
        return Err(AppError::Validation(
            "an application cannot move back to 'new'".to_string(),
        ));
    }
    Ok(())
}

/// Resolves a full or abbreviated job id. A prefix matching more than one
/// job is rejected rather than guessed.
pub async fn resolve_job_reference(store: &dyn JobStore, reference: &str) -> Result<Job, AppError> {
    let reference = reference.trim().to_lowercase();
    if let Ok(id) = Uuid::parse_str(&reference) {
        return store.get_job(id).await;
    }
    if reference.is_empty() || !reference.chars().all(|c| c.is_ascii_hexdigit() || c == '-') {
        return Err(AppError::Validation(format!(
            "'{reference}' is not a job id or id prefix"
        )));
    }

    let ids = store.find_job_ids_by_prefix(&reference).await?;
    match ids.as_slice() {
        [] => Err(AppError::NotFound(format!("job with id prefix '{reference}'"))),
        [id] => store.get_job(*id).await,
        _ => Err(AppError::AmbiguousReference {
            prefix: reference,
            count: ids.len(),
        }),
    }
}
