//! In-memory `JobStore` for tests. Mirrors the Postgres semantics that the
//! pipeline relies on: insert-if-absent keyed on (company_id, external_id),
//! company-name join on reads, and score/created ordering.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
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

#[derive(Default)]
pub struct MemoryStore {
    jobs: Mutex<Vec<Job>>,
    companies: Mutex<Vec<Company>>,
    profile: Mutex<Option<Profile>>,
    sponsors: Mutex<Vec<Sponsor>>,
    applications: Mutex<Vec<Application>>,
}

impl MemoryStore {
    pub fn job_count(&self) -> usize {
        self.jobs.lock().unwrap().len()
    }

    fn with_company_name(&self, mut job: Job) -> Job {
        job.company_name = self
            .companies
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == job.company_id)
            .map(|c| c.name.clone());
        job
    }

    fn update_job<F: FnOnce(&mut Job)>(&self, id: Uuid, f: F) -> Result<(), AppError> {
        let mut jobs = self.jobs.lock().unwrap();
        let job = jobs
            .iter_mut()
            .find(|j| j.id == id)
            .ok_or_else(|| AppError::NotFound(format!("job {id}")))?;
        f(job);
        Ok(())
    }

    fn update_company<F: FnOnce(&mut Company)>(&self, id: Uuid, f: F) -> Result<(), AppError> {
        let mut companies = self.companies.lock().unwrap();
        let company = companies
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| AppError::NotFound(format!("company {id}")))?;
        f(company);
        Ok(())
    }
}

#[async_trait]
impl JobStore for MemoryStore {
    async fn create_job_if_absent(&self, job: &Job) -> Result<bool, AppError> {
        let mut jobs = self.jobs.lock().unwrap();
        if jobs
            .iter()
            .any(|j| j.company_id == job.company_id && j.external_id == job.external_id)
        {
            return Ok(false);
        }
        jobs.push(job.clone());
        Ok(true)
    }

    async fn get_job(&self, id: Uuid) -> Result<Job, AppError> {
        let job = self
            .jobs
            .lock()
            .unwrap()
            .iter()
            .find(|j| j.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("job {id}")))?;
        Ok(self.with_company_name(job))
    }

    async fn find_job_ids_by_prefix(&self, prefix: &str) -> Result<Vec<Uuid>, AppError> {
        Ok(self
            .jobs
            .lock()
            .unwrap()
            .iter()
            .filter(|j| j.id.to_string().starts_with(prefix))
            .map(|j| j.id)
            .collect())
    }

    async fn list_jobs(&self, query: &JobQuery) -> Result<Vec<Job>, AppError> {
        let sponsors: Vec<Uuid> = self
            .companies
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.sponsors_h1b)
            .map(|c| c.id)
            .collect();

        let mut jobs: Vec<Job> = self
            .jobs
            .lock()
            .unwrap()
            .iter()
            .filter(|j| match query.min_score {
                Some(min) => j.match_score.is_some_and(|s| s >= min),
                None => true,
            })
            .filter(|j| query.company_id.map_or(true, |id| j.company_id == id))
            .filter(|j| query.status.map_or(true, |s| j.status == s.as_str()))
            .filter(|j| !query.remote_only || j.remote)
            .filter(|j| !query.new_grad_only || j.is_new_grad)
            .filter(|j| !query.sponsor_only || sponsors.contains(&j.company_id))
            .cloned()
            .collect();

        jobs.sort_by(|a, b| {
            let by_score = b
                .match_score
                .unwrap_or(f64::MIN)
                .partial_cmp(&a.match_score.unwrap_or(f64::MIN))
                .unwrap_or(Ordering::Equal);
            by_score.then(b.created_at.cmp(&a.created_at))
        });
        if let Some(limit) = query.limit {
            jobs.truncate(limit.max(0) as usize);
        }
        Ok(jobs.into_iter().map(|j| self.with_company_name(j)).collect())
    }

    async fn list_unscored_jobs(&self) -> Result<Vec<Job>, AppError> {
        let jobs: Vec<Job> = self
            .jobs
            .lock()
            .unwrap()
            .iter()
            .filter(|j| j.scored_at.is_none())
            .cloned()
            .collect();
        Ok(jobs.into_iter().map(|j| self.with_company_name(j)).collect())
    }

    async fn update_job_status(&self, id: Uuid, status: JobStatus) -> Result<(), AppError> {
        self.update_job(id, |j| j.status = status.as_str().to_string())
    }

    async fn update_job_classification(
        &self,
        id: Uuid,
        classification: &Classification,
    ) -> Result<(), AppError> {
        self.update_job(id, |j| {
            j.experience_level = Some(classification.experience_level.as_str().to_string());
            j.is_new_grad = classification.is_new_grad;
            j.visa_mentioned = classification.visa_mentioned;
            j.visa_sentiment = classification.visa_sentiment.as_stored().map(str::to_string);
        })
    }

    async fn update_job_score(&self, id: Uuid, result: &SkillScoreResult) -> Result<(), AppError> {
        self.update_job(id, |j| {
            j.match_score = Some(result.score);
            j.matched_skills = result.matched_skills.clone();
            j.missing_skills = result.missing_skills.clone();
            j.match_reason = Some(result.reason.clone());
            j.scored_at = Some(Utc::now());
        })
    }

    async fn create_company(&self, company: &Company) -> Result<(), AppError> {
        let mut companies = self.companies.lock().unwrap();
        if companies
            .iter()
            .any(|c| c.platform == company.platform && c.slug == company.slug)
        {
            return Err(AppError::Validation(format!(
                "company {}/{} already exists",
                company.platform, company.slug
            )));
        }
        companies.push(company.clone());
        Ok(())
    }

    async fn get_company(&self, id: Uuid) -> Result<Company, AppError> {
        self.companies
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("company {id}")))
    }

    async fn list_companies(&self) -> Result<Vec<Company>, AppError> {
        let mut companies = self.companies.lock().unwrap().clone();
        companies.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(companies)
    }

    async fn set_company_enabled(&self, id: Uuid, enabled: bool) -> Result<(), AppError> {
        self.update_company(id, |c| c.enabled = enabled)
    }

    async fn delete_company(&self, id: Uuid) -> Result<(), AppError> {
        let mut companies = self.companies.lock().unwrap();
        let before = companies.len();
        companies.retain(|c| c.id != id);
        if companies.len() == before {
            return Err(AppError::NotFound(format!("company {id}")));
        }
        self.jobs.lock().unwrap().retain(|j| j.company_id != id);
        Ok(())
    }

    async fn stamp_last_scraped(&self, id: Uuid, at: DateTime<Utc>) -> Result<(), AppError> {
        self.update_company(id, |c| c.last_scraped_at = Some(at))
    }

    async fn get_profile(&self) -> Result<Option<Profile>, AppError> {
        Ok(self.profile.lock().unwrap().clone())
    }

    async fn upsert_profile(&self, profile: &Profile) -> Result<(), AppError> {
        let mut stored = profile.clone();
        stored.updated_at = Some(Utc::now());
        *self.profile.lock().unwrap() = Some(stored);
        Ok(())
    }

    async fn create_application(&self, job_id: Uuid, notes: &str) -> Result<Application, AppError> {
        let mut applications = self.applications.lock().unwrap();
        if applications.iter().any(|a| a.job_id == job_id) {
            return Err(AppError::Validation(format!(
                "job {job_id} already has an application"
            )));
        }
        let application = Application::new(job_id, notes);
        self.update_job(job_id, |j| j.status = application.status.clone())?;
        applications.push(application.clone());
        Ok(application)
    }

    async fn get_application(&self, job_id: Uuid) -> Result<Option<Application>, AppError> {
        Ok(self
            .applications
            .lock()
            .unwrap()
            .iter()
            .find(|a| a.job_id == job_id)
            .cloned())
    }

    async fn update_application(
        &self,
        job_id: Uuid,
        status: JobStatus,
        notes: Option<&str>,
    ) -> Result<(), AppError> {
        check_application_status(status)?;
        let mut applications = self.applications.lock().unwrap();
        let application = applications
            .iter_mut()
            .find(|a| a.job_id == job_id)
            .ok_or_else(|| AppError::NotFound(format!("application for job {job_id}")))?;
        application.status = status.as_str().to_string();
        if let Some(notes) = notes {
            application.notes = notes.to_string();
        }
        application.updated_at = Utc::now();
        self.update_job(job_id, |j| j.status = status.as_str().to_string())
    }

    async fn application_summary(&self) -> Result<Vec<StatusCount>, AppError> {
        let mut counts: HashMap<String, i64> = HashMap::new();
        for application in self.applications.lock().unwrap().iter() {
            *counts.entry(application.status.clone()).or_default() += 1;
        }
        let mut summary: Vec<StatusCount> = counts
            .into_iter()
            .map(|(status, count)| StatusCount { status, count })
            .collect();
        summary.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.status.cmp(&b.status)));
        Ok(summary)
    }

    async fn upsert_sponsor(&self, sponsor: &Sponsor) -> Result<(), AppError> {
        let mut sponsors = self.sponsors.lock().unwrap();
        sponsors.retain(|s| {
            !(s.normalized_name == sponsor.normalized_name && s.fiscal_year == sponsor.fiscal_year)
        });
        sponsors.push(sponsor.clone());
        Ok(())
    }

    async fn find_sponsor_by_normalized_name(
        &self,
        normalized_name: &str,
    ) -> Result<Option<Sponsor>, AppError> {
        Ok(self
            .sponsors
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.normalized_name == normalized_name)
            .max_by_key(|s| s.total_petitions)
            .cloned())
    }

    async fn link_company_to_sponsor(
        &self,
        company_id: Uuid,
        sponsor: &Sponsor,
    ) -> Result<(), AppError> {
        self.update_company(company_id, |c| {
            c.sponsor_id = Some(sponsor.id);
            c.sponsors_h1b = true;
            c.h1b_approval_rate = Some(sponsor.approval_rate);
            c.h1b_total_filed = Some(sponsor.total_petitions);
        })
    }
}
