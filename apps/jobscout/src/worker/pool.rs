//! Bounded-concurrency scrape fan-out.
//!
//! Companies are loaded into a channel that is closed before any worker
//! starts; N workers drain it. Every company produces exactly one
//! `ScrapeResult`, including companies skipped after cancellation.

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::errors::AppError;
use crate::models::company::Company;
use crate::models::job::Job;
use crate::scraper::ScraperRegistry;
use crate::store::JobStore;

pub struct ScrapeResult {
    pub company: Company,
    /// Postings inserted for the first time during this run.
    pub new_jobs: usize,
    pub error: Option<AppError>,
}

impl ScrapeResult {
    fn ok(company: Company, new_jobs: usize) -> Self {
        Self {
            company,
            new_jobs,
            error: None,
        }
    }

    fn failed(company: Company, error: AppError) -> Self {
        Self {
            company,
            new_jobs: 0,
            error: Some(error),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScrapeSummary {
    pub succeeded: usize,
    pub failed: usize,
    pub new_jobs: usize,
}

impl ScrapeSummary {
    pub fn from_results(results: &[ScrapeResult]) -> Self {
        results.iter().fold(Self::default(), |mut acc, r| {
            match r.error {
                Some(_) => acc.failed += 1,
                None => acc.succeeded += 1,
            }
            acc.new_jobs += r.new_jobs;
            acc
        })
    }
}

#[derive(Clone)]
pub struct WorkerPool {
    registry: Arc<ScraperRegistry>,
    store: Arc<dyn JobStore>,
    workers: usize,
}

impl WorkerPool {
    pub fn new(registry: Arc<ScraperRegistry>, store: Arc<dyn JobStore>, workers: usize) -> Self {
        Self {
            registry,
            store,
            workers: workers.max(1),
        }
    }

    pub async fn run(&self, companies: Vec<Company>, cancel: &CancellationToken) -> Vec<ScrapeResult> {
        let total = companies.len();
        let (tx, rx) = mpsc::channel(total.max(1));
        for company in companies {
            // capacity == total, so this never blocks or fails
            if let Err(e) = tx.try_send(company) {
                error!("Scrape queue rejected company: {e}");
            }
        }
        drop(tx);

        let queue = Arc::new(Mutex::new(rx));
        let results = Arc::new(Mutex::new(Vec::with_capacity(total)));

        let worker_count = self.workers.min(total.max(1));
        let mut handles = Vec::with_capacity(worker_count);
        for worker_id in 0..worker_count {
            let pool = self.clone();
            let queue = queue.clone();
            let results = results.clone();
            let cancel = cancel.clone();

            handles.push(tokio::spawn(async move {
                loop {
                    let next = queue.lock().await.recv().await;
                    let Some(company) = next else { break };

                    let result = if cancel.is_cancelled() {
                        let name = company.name.clone();
                        ScrapeResult::failed(company, AppError::Cancelled(name))
                    } else {
                        debug!("worker {worker_id}: scraping {}", company.name);
                        pool.scrape_company(company).await
                    };
                    results.lock().await.push(result);
                }
            }));
        }

        for handle in handles {
            if let Err(e) = handle.await {
                error!("Scrape worker task failed: {e}");
            }
        }

        let results = std::mem::take(&mut *results.lock().await);
        let summary = ScrapeSummary::from_results(&results);
        info!(
            "Scrape batch done: {} ok, {} failed, {} new jobs",
            summary.succeeded, summary.failed, summary.new_jobs
        );
        results
    }

    async fn scrape_company(&self, company: Company) -> ScrapeResult {
        let scraper = match self.registry.get(&company.platform) {
            Ok(s) => s,
            Err(e) => {
                warn!("{}: {e}", company.name);
                return ScrapeResult::failed(company, e);
            }
        };

        let postings = match scraper.fetch_jobs(&company.slug).await {
            Ok(p) => p,
            Err(e) => {
                let err = with_company_context(&company.name, e);
                warn!("{err}");
                return ScrapeResult::failed(company, err);
            }
        };

        let mut new_jobs = 0;
        for posting in &postings {
            let job = Job::from_posting(company.id, posting);
            match self.store.create_job_if_absent(&job).await {
                Ok(true) => new_jobs += 1,
                Ok(false) => {}
                Err(e) => warn!(
                    "{}: failed to store posting {}: {e}",
                    company.name, posting.external_id
                ),
            }
        }

        if let Err(e) = self.store.stamp_last_scraped(company.id, Utc::now()).await {
            warn!("{}: failed to stamp last_scraped_at: {e}", company.name);
        }

        info!(
            "{}: {} postings, {new_jobs} new",
            company.name,
            postings.len()
        );
        ScrapeResult::ok(company, new_jobs)
    }
}

/// Adds the company to a fetch failure's message. Other errors pass through.
fn with_company_context(company: &str, e: AppError) -> AppError {
    match e {
        AppError::Fetch(msg) => AppError::Fetch(format!("scraping {company}: {msg}")),
        other => other,
    }
}
