use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use jobscout::config::Config;
use jobscout::cycle::Scout;
use jobscout::db::create_pool;
use jobscout::matching::{MatchingPipeline, ScoringMode};
use jobscout::notifier::{LogNotifier, Notifier, WebhookNotifier};
use jobscout::scraper::ScraperRegistry;
use jobscout::skills::{extract_from_resume, SkillTaxonomy};
use jobscout::store::{JobStore, PgStore};
use jobscout::worker::WorkerPool;
use jobscout::{h1b, llm_client};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting jobscout v{}", env!("CARGO_PKG_VERSION"));

    let db = create_pool(&config.database_url, config.scrape_workers).await?;
    let store: Arc<dyn JobStore> = Arc::new(PgStore::new(db));

    let taxonomy = Arc::new(SkillTaxonomy::new());
    backfill_profile_skills(store.as_ref(), &taxonomy).await?;

    let linked = h1b::link_companies(store.as_ref())
        .await
        .context("Linking companies to sponsor records")?;
    info!("{linked} companies carry sponsor data");

    let registry = Arc::new(ScraperRegistry::new());
    info!("Scrapers registered: {}", registry.platforms().join(", "));

    let pipeline = MatchingPipeline::from_config(&config, taxonomy);
    if pipeline.uses_external_model() {
        info!("LLM client initialized (model: {})", llm_client::MODEL);
    } else if config.matcher_mode != ScoringMode::Keyword {
        warn!(
            "MATCHER_MODE={} but ANTHROPIC_API_KEY is not set; scoring by keyword only",
            config.matcher_mode
        );
    }

    let mut notifiers: Vec<Arc<dyn Notifier>> = vec![Arc::new(LogNotifier)];
    if let Some(url) = &config.webhook_url {
        notifiers.push(Arc::new(WebhookNotifier::new(url.clone())));
        info!("Webhook notifications enabled");
    }

    let pool = WorkerPool::new(registry, store.clone(), config.scrape_workers);
    let scout = Scout::new(store, pool, pipeline, notifiers, config.min_match_score);

    let cancel = CancellationToken::new();
    let shutdown = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutting down gracefully...");
        }
        shutdown.cancel();
    });

    scout
        .watch(Duration::from_secs(config.watch_interval_secs.max(1)), cancel)
        .await;

    Ok(())
}

/// Seeds an empty profile skill list from the stored resume text, and flags
/// profile skills the extractor can never report.
async fn backfill_profile_skills(store: &dyn JobStore, taxonomy: &SkillTaxonomy) -> Result<()> {
    let Some(mut profile) = store.get_profile().await? else {
        warn!("No profile stored; jobs will be scraped but not scored");
        return Ok(());
    };
    if !profile.skills.is_empty() {
        let unknown: Vec<&str> = profile
            .skills
            .iter()
            .map(String::as_str)
            .filter(|s| !taxonomy.is_known(s))
            .collect();
        if !unknown.is_empty() {
            warn!(
                "Profile skills outside the taxonomy never match a description: {}",
                unknown.join(", ")
            );
        }
        return Ok(());
    }
    let Some(resume) = profile.resume_raw.as_deref() else {
        return Ok(());
    };

    profile.skills = extract_from_resume(taxonomy, resume);
    info!(
        "Extracted {} skills from resume: {}",
        profile.skills.len(),
        profile.skills.join(", ")
    );
    store.upsert_profile(&profile).await?;
    Ok(())
}
