use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use super::{check_application_status, JobQuery, JobStore};
use crate::errors::AppError;
use crate::h1b::classifier::Classification;
use crate::matching::SkillScoreResult;
use crate::models::application::{Application, StatusCount};
use crate::models::company::Company;
use crate::models::job::{Job, JobStatus};
use crate::models::profile::Profile;
use crate::models::sponsor::Sponsor;

const JOB_SELECT: &str = r#"
    SELECT j.*, c.name AS company_name
    FROM jobs j
    JOIN companies c ON c.id = j.company_id
"#;

/// `JobStore` backed by PostgreSQL. Schema: `apps/jobscout/schema.sql`.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn expect_one(rows_affected: u64, what: String) -> Result<(), AppError> {
    if rows_affected == 0 {
        Err(AppError::NotFound(what))
    } else {
        Ok(())
    }
}

#[async_trait]
impl JobStore for PgStore {
    async fn create_job_if_absent(&self, job: &Job) -> Result<bool, AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO jobs
                (id, company_id, external_id, title, description, location, remote,
                 department, url, posted_at, scraped_at, created_at, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            ON CONFLICT (company_id, external_id) DO NOTHING
            "#,
        )
        .bind(job.id)
        .bind(job.company_id)
        .bind(&job.external_id)
        .bind(&job.title)
        .bind(&job.description)
        .bind(&job.location)
        .bind(job.remote)
        .bind(&job.department)
        .bind(&job.url)
        .bind(job.posted_at)
        .bind(job.scraped_at)
        .bind(job.created_at)
        .bind(&job.status)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() == 1)
    }

    async fn get_job(&self, id: Uuid) -> Result<Job, AppError> {
        sqlx::query_as::<_, Job>(&format!("{JOB_SELECT} WHERE j.id = $1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("job {id}")))
    }

    async fn find_job_ids_by_prefix(&self, prefix: &str) -> Result<Vec<Uuid>, AppError> {
        Ok(
            sqlx::query_scalar::<_, Uuid>("SELECT id FROM jobs WHERE id::text LIKE $1 ORDER BY created_at DESC")
                .bind(format!("{prefix}%"))
                .fetch_all(&self.pool)
                .await?,
        )
    }

    async fn list_jobs(&self, query: &JobQuery) -> Result<Vec<Job>, AppError> {
        let sql = format!(
            r#"{JOB_SELECT}
            WHERE ($1::float8 IS NULL OR j.match_score >= $1)
              AND ($2::uuid IS NULL OR j.company_id = $2)
              AND ($3::text IS NULL OR j.status = $3)
              AND (NOT $4 OR j.remote)
              AND (NOT $5 OR c.sponsors_h1b)
              AND (NOT $6 OR j.is_new_grad)
            ORDER BY j.match_score DESC NULLS LAST, j.created_at DESC
            LIMIT $7
            "#
        );
        Ok(sqlx::query_as::<_, Job>(&sql)
            .bind(query.min_score)
            .bind(query.company_id)
            .bind(query.status.map(|s| s.as_str()))
            .bind(query.remote_only)
            .bind(query.sponsor_only)
            .bind(query.new_grad_only)
            .bind(query.limit)
            .fetch_all(&self.pool)
            .await?)
    }

    async fn list_unscored_jobs(&self) -> Result<Vec<Job>, AppError> {
        Ok(sqlx::query_as::<_, Job>(&format!(
            "{JOB_SELECT} WHERE j.scored_at IS NULL ORDER BY j.created_at ASC"
        ))
        .fetch_all(&self.pool)
        .await?)
    }

    async fn update_job_status(&self, id: Uuid, status: JobStatus) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE jobs SET status = $1 WHERE id = $2")
            .bind(status.as_str())
            .bind(id)
            .execute(&self.pool)
            .await?;
        expect_one(result.rows_affected(), format!("job {id}"))
    }

    async fn update_job_classification(
        &self,
        id: Uuid,
        classification: &Classification,
    ) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE jobs
            SET experience_level = $1, is_new_grad = $2, visa_mentioned = $3, visa_sentiment = $4
            WHERE id = $5
            "#,
        )
        .bind(classification.experience_level.as_str())
        .bind(classification.is_new_grad)
        .bind(classification.visa_mentioned)
        .bind(classification.visa_sentiment.as_stored())
        .bind(id)
        .execute(&self.pool)
        .await?;
        expect_one(result.rows_affected(), format!("job {id}"))
    }

    async fn update_job_score(&self, id: Uuid, result: &SkillScoreResult) -> Result<(), AppError> {
        let outcome = sqlx::query(
            r#"
            UPDATE jobs
            SET match_score = $1, matched_skills = $2, missing_skills = $3,
                match_reason = $4, scored_at = NOW()
            WHERE id = $5
            "#,
        )
        .bind(result.score)
        .bind(&result.matched_skills)
        .bind(&result.missing_skills)
        .bind(&result.reason)
        .bind(id)
        .execute(&self.pool)
        .await?;
        expect_one(outcome.rows_affected(), format!("job {id}"))
    }

    async fn create_company(&self, company: &Company) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO companies (id, name, platform, slug, career_url, enabled, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(company.id)
        .bind(&company.name)
        .bind(&company.platform)
        .bind(&company.slug)
        .bind(&company.career_url)
        .bind(company.enabled)
        .bind(company.created_at)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn get_company(&self, id: Uuid) -> Result<Company, AppError> {
        sqlx::query_as::<_, Company>("SELECT * FROM companies WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("company {id}")))
    }

    async fn list_companies(&self) -> Result<Vec<Company>, AppError> {
        Ok(
            sqlx::query_as::<_, Company>("SELECT * FROM companies ORDER BY name ASC")
                .fetch_all(&self.pool)
                .await?,
        )
    }

    async fn set_company_enabled(&self, id: Uuid, enabled: bool) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE companies SET enabled = $1 WHERE id = $2")
            .bind(enabled)
            .bind(id)
            .execute(&self.pool)
            .await?;
        expect_one(result.rows_affected(), format!("company {id}"))
    }

    async fn delete_company(&self, id: Uuid) -> Result<(), AppError> {
        // jobs cascade on the foreign key
        let result = sqlx::query("DELETE FROM companies WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        expect_one(result.rows_affected(), format!("company {id}"))
    }

    async fn stamp_last_scraped(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), AppError> {
        let result = sqlx::query("UPDATE companies SET last_scraped_at = $1 WHERE id = $2")
            .bind(at)
            .bind(id)
            .execute(&self.pool)
            .await?;
        expect_one(result.rows_affected(), format!("company {id}"))
    }

    async fn get_profile(&self) -> Result<Option<Profile>, AppError> {
        Ok(sqlx::query_as::<_, Profile>(
            r#"
            SELECT name, email, skills, experience_years, preferred_roles, preferred_locations,
                   min_match_score, visa_required, resume_raw, updated_at
            FROM profile
            WHERE id = 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn upsert_profile(&self, profile: &Profile) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO profile
                (id, name, email, skills, experience_years, preferred_roles,
                 preferred_locations, min_match_score, visa_required, resume_raw, updated_at)
            VALUES (1, $1, $2, $3, $4, $5, $6, $7, $8, $9, NOW())
            ON CONFLICT (id) DO UPDATE SET
                name = EXCLUDED.name,
                email = EXCLUDED.email,
                skills = EXCLUDED.skills,
                experience_years = EXCLUDED.experience_years,
                preferred_roles = EXCLUDED.preferred_roles,
                preferred_locations = EXCLUDED.preferred_locations,
                min_match_score = EXCLUDED.min_match_score,
                visa_required = EXCLUDED.visa_required,
                resume_raw = EXCLUDED.resume_raw,
                updated_at = NOW()
            "#,
        )
        .bind(&profile.name)
        .bind(&profile.email)
        .bind(&profile.skills)
        .bind(profile.experience_years)
        .bind(&profile.preferred_roles)
        .bind(&profile.preferred_locations)
        .bind(profile.min_match_score)
        .bind(profile.visa_required)
        .bind(&profile.resume_raw)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn create_application(&self, job_id: Uuid, notes: &str) -> Result<Application, AppError> {
        let application = Application::new(job_id, notes);
        let mut tx = self.pool.begin().await?;

        let marked = sqlx::query("UPDATE jobs SET status = $1 WHERE id = $2")
            .bind(&application.status)
            .bind(job_id)
            .execute(&mut *tx)
            .await?;
        expect_one(marked.rows_affected(), format!("job {job_id}"))?;

        let created = sqlx::query_as::<_, Application>(
            r#"
            INSERT INTO applications (id, job_id, applied_at, status, notes, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (job_id) DO NOTHING
            RETURNING *
            "#,
        )
        .bind(application.id)
        .bind(job_id)
        .bind(application.applied_at)
        .bind(&application.status)
        .bind(&application.notes)
        .bind(application.updated_at)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::Validation(format!("job {job_id} already has an application")))?;

        tx.commit().await?;
        Ok(created)
    }

    async fn get_application(&self, job_id: Uuid) -> Result<Option<Application>, AppError> {
        Ok(
            sqlx::query_as::<_, Application>("SELECT * FROM applications WHERE job_id = $1")
                .bind(job_id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn update_application(
        &self,
        job_id: Uuid,
        status: JobStatus,
        notes: Option<&str>,
    ) -> Result<(), AppError> {
        check_application_status(status)?;
        let mut tx = self.pool.begin().await?;

        let updated = sqlx::query(
            r#"
            UPDATE applications
            SET status = $1, notes = COALESCE($2, notes), updated_at = NOW()
            WHERE job_id = $3
            "#,
        )
        .bind(status.as_str())
        .bind(notes)
        .bind(job_id)
        .execute(&mut *tx)
        .await?;
        expect_one(updated.rows_affected(), format!("application for job {job_id}"))?;

        sqlx::query("UPDATE jobs SET status = $1 WHERE id = $2")
            .bind(status.as_str())
            .bind(job_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    async fn application_summary(&self) -> Result<Vec<StatusCount>, AppError> {
        Ok(sqlx::query_as::<_, StatusCount>(
            r#"
            SELECT status, COUNT(*) AS count
            FROM applications
            GROUP BY status
            ORDER BY count DESC, status ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?)
    }

    async fn upsert_sponsor(&self, sponsor: &Sponsor) -> Result<(), AppError> {
        sqlx::query(
            r#"
            INSERT INTO h1b_sponsors
                (id, company_name, normalized_name, fiscal_year, approval_rate, total_petitions)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (normalized_name, (COALESCE(fiscal_year, 0))) DO UPDATE SET
                company_name = EXCLUDED.company_name,
                approval_rate = EXCLUDED.approval_rate,
                total_petitions = EXCLUDED.total_petitions
            "#,
        )
        .bind(sponsor.id)
        .bind(&sponsor.company_name)
        .bind(&sponsor.normalized_name)
        .bind(sponsor.fiscal_year)
        .bind(sponsor.approval_rate)
        .bind(sponsor.total_petitions)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn find_sponsor_by_normalized_name(
        &self,
        normalized_name: &str,
    ) -> Result<Option<Sponsor>, AppError> {
        Ok(sqlx::query_as::<_, Sponsor>(
            r#"
            SELECT * FROM h1b_sponsors
            WHERE normalized_name = $1
            ORDER BY total_petitions DESC
            LIMIT 1
            "#,
        )
        .bind(normalized_name)
        .fetch_optional(&self.pool)
        .await?)
    }

    async fn link_company_to_sponsor(
        &self,
        company_id: Uuid,
        sponsor: &Sponsor,
    ) -> Result<(), AppError> {
        let result = sqlx::query(
            r#"
            UPDATE companies
            SET sponsor_id = $1, sponsors_h1b = TRUE, h1b_approval_rate = $2, h1b_total_filed = $3
            WHERE id = $4
            "#,
        )
        .bind(sponsor.id)
        .bind(sponsor.approval_rate)
        .bind(sponsor.total_petitions)
        .bind(company_id)
        .execute(&self.pool)
        .await?;
        expect_one(result.rows_affected(), format!("company {company_id}"))
    }
}
