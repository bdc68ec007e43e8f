//! Match notifications. Delivery is fire-and-forget: failures are logged
//! and never reach the pipeline.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::models::job::Job;

const WEBHOOK_TIMEOUT_SECS: u64 = 10;

#[async_trait]
pub trait Notifier: Send + Sync {
    fn name(&self) -> &'static str;

    async fn notify(&self, job: &Job, company_name: &str, score: f64) -> Result<(), AppError>;
}

/// Writes one `info` line per match.
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    fn name(&self) -> &'static str {
        "log"
    }

    async fn notify(&self, job: &Job, company_name: &str, score: f64) -> Result<(), AppError> {
        info!("{} -> {}", match_line(job, company_name, score), job.url);
        Ok(())
    }
}

/// Posts a Slack-style `{"text": ...}` payload to a webhook URL.
pub struct WebhookNotifier {
    client: reqwest::Client,
    url: String,
}

impl WebhookNotifier {
    pub fn new(url: String) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(WEBHOOK_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            url,
        }
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    fn name(&self) -> &'static str {
        "webhook"
    }

    async fn notify(&self, job: &Job, company_name: &str, score: f64) -> Result<(), AppError> {
        let payload = json!({ "text": webhook_text(job, company_name, score) });
        let response = self.client.post(&self.url).json(&payload).send().await?;

        let status = response.status();
        if status.as_u16() >= 400 {
            return Err(AppError::Fetch(format!(
                "webhook returned status {}",
                status.as_u16()
            )));
        }
        Ok(())
    }
}

pub(crate) fn match_line(job: &Job, company_name: &str, score: f64) -> String {
    format!(
        "NEW MATCH [{score:.0}] {} @ {company_name} ({})",
        job.title,
        job.location.as_deref().unwrap_or_default()
    )
}

pub(crate) fn webhook_text(job: &Job, company_name: &str, score: f64) -> String {
    format!(
        "*New Job Match [{score:.0}]*\n*{}* @ {company_name}\nLocation: {}\n<{}|Apply>",
        job.title,
        job.location.as_deref().unwrap_or_default(),
        job.url
    )
}

/// Sends to every notifier; returns how many deliveries succeeded.
pub async fn notify_all(
    notifiers: &[Arc<dyn Notifier>],
    job: &Job,
    company_name: &str,
    score: f64,
) -> usize {
    let mut delivered = 0;
    for notifier in notifiers {
        match notifier.notify(job, company_name, score).await {
            Ok(()) => delivered += 1,
            Err(e) => warn!("{} notifier failed for job {}: {e}", notifier.name(), job.id),
        }
    }
    delivered
}
