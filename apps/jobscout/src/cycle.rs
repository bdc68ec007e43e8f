//! One watch cycle: scrape enabled companies, classify and score whatever is
//! unscored, then notify on strong matches. `watch` repeats it on an interval.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::filter::{self, FilterParams};
use crate::h1b::{apply_adjustment, classify_job, score_h1b};
use crate::matching::MatchingPipeline;
use crate::models::company::Company;
use crate::models::job::Job;
use crate::models::profile::Profile;
use crate::notifier::{notify_all, Notifier};
use crate::store::JobStore;
use crate::worker::{ScrapeSummary, WorkerPool};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CycleReport {
    pub scrape: ScrapeSummary,
    pub scored: usize,
    pub notified: usize,
}

pub struct Scout {
    store: Arc<dyn JobStore>,
    pool: WorkerPool,
    pipeline: MatchingPipeline,
    notifiers: Vec<Arc<dyn Notifier>>,
    /// Used when the profile sets no threshold of its own.
    default_min_score: f64,
}

impl Scout {
    pub fn new(
        store: Arc<dyn JobStore>,
        pool: WorkerPool,
        pipeline: MatchingPipeline,
        notifiers: Vec<Arc<dyn Notifier>>,
        default_min_score: f64,
    ) -> Self {
        Self {
            store,
            pool,
            pipeline,
            notifiers,
            default_min_score,
        }
    }

    /// Runs cycles until `cancel` fires. The first cycle starts immediately.
    pub async fn watch(&self, interval: Duration, cancel: CancellationToken) {
        info!(
            "Watching every {}s (scoring mode: {}). Press Ctrl+C to stop.",
            interval.as_secs(),
            self.pipeline.mode()
        );
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {
                    if let Err(e) = self.run_cycle(&cancel).await {
                        warn!("Watch cycle failed [{}]: {e}", e.code());
                    }
                }
            }
        }
        info!("Watch stopped.");
    }

    pub async fn run_cycle(&self, cancel: &CancellationToken) -> Result<CycleReport, AppError> {
        let mut report = CycleReport::default();

        let companies = self.store.list_companies().await?;
        let enabled: Vec<Company> = companies.iter().filter(|c| c.enabled).cloned().collect();
        if enabled.is_empty() {
            info!("No companies to watch.");
        } else {
            info!("Scraping {} companies...", enabled.len());
            let results = self.pool.run(enabled, cancel).await;
            for r in results.iter() {
                if let Some(e) = &r.error {
                    warn!("FAIL {} [{}]: {e}", r.company.name, e.code());
                }
            }
            report.scrape = ScrapeSummary::from_results(&results);
        }

        if cancel.is_cancelled() {
            return Ok(report);
        }

        let Some(profile) = self.store.get_profile().await? else {
            info!("No profile configured; skipping scoring.");
            return Ok(report);
        };

        let scored = self.score_unscored(&profile, &companies).await?;
        report.scored = scored.len();
        report.notified = self.notify_matches(&profile, &companies, scored).await;

        info!(
            "Cycle done: {} new jobs, {} scored, {} notified",
            report.scrape.new_jobs, report.scored, report.notified
        );
        Ok(report)
    }

    /// Classifies and scores every unscored job, in store order. Per-job
    /// failures are logged and skipped. Returns the jobs scored this pass.
    pub async fn score_unscored(
        &self,
        profile: &Profile,
        companies: &[Company],
    ) -> Result<Vec<Job>, AppError> {
        let by_id: HashMap<Uuid, &Company> = companies.iter().map(|c| (c.id, c)).collect();
        let unscored = self.store.list_unscored_jobs().await?;
        let mut scored = Vec::with_capacity(unscored.len());

        for mut job in unscored {
            let classification = classify_job(&job.title, job.description.as_deref());
            if let Err(e) = self
                .store
                .update_job_classification(job.id, &classification)
                .await
            {
                warn!("Failed to store classification for job {}: {e}", job.id);
                continue;
            }
            job.experience_level = Some(classification.experience_level.as_str().to_string());
            job.is_new_grad = classification.is_new_grad;
            job.visa_mentioned = classification.visa_mentioned;
            job.visa_sentiment = classification.visa_sentiment.as_stored().map(str::to_string);

            let mut result = self
                .pipeline
                .score(&profile.skills, job.description.as_deref())
                .await;
            if let Some(company) = by_id.get(&job.company_id) {
                let adjustment = score_h1b(&job, company, profile);
                result = apply_adjustment(result, &adjustment);
            }

            if let Err(e) = self.store.update_job_score(job.id, &result).await {
                warn!("Failed to store score for job {}: {e}", job.id);
                continue;
            }
            debug!("Scored '{}' at {:.0}: {}", job.title, result.score, result.reason);

            job.match_score = Some(result.score);
            job.matched_skills = result.matched_skills;
            job.missing_skills = result.missing_skills;
            job.match_reason = Some(result.reason);
            scored.push(job);
        }
        Ok(scored)
    }

    /// Notifies on freshly scored jobs that clear the score floor and the
    /// profile's preferences. Returns the number of jobs announced.
    pub async fn notify_matches(
        &self,
        profile: &Profile,
        companies: &[Company],
        scored: Vec<Job>,
    ) -> usize {
        let min_score = if profile.min_match_score > 0.0 {
            profile.min_match_score
        } else {
            self.default_min_score
        };

        let above: Vec<Job> = scored
            .into_iter()
            .filter(|j| j.match_score.is_some_and(|s| s >= min_score))
            .collect();
        if above.is_empty() {
            return 0;
        }

        let sponsor_ids: HashSet<Uuid> = companies
            .iter()
            .filter(|c| c.sponsors_h1b)
            .map(|c| c.id)
            .collect();
        let filters = filter::build(&FilterParams::from_profile(profile), sponsor_ids);
        let matches = filter::apply(above, &filters);

        let names: HashMap<Uuid, &str> = companies.iter().map(|c| (c.id, c.name.as_str())).collect();
        for job in &matches {
            let company_name = job
                .company_name
                .as_deref()
                .or_else(|| names.get(&job.company_id).copied())
                .unwrap_or("unknown company");
            notify_all(
                &self.notifiers,
                job,
                company_name,
                job.match_score.unwrap_or_default(),
            )
            .await;
        }
        matches.len()
    }
}
