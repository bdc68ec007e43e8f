//! Job-posting ingestion and scoring: scrape career boards, classify and
//! score each posting against the candidate profile, adjust for visa
//! sponsorship, and notify on strong matches.

pub mod config;
pub mod cycle;
pub mod db;
pub mod errors;
pub mod filter;
pub mod h1b;
pub mod llm_client;
pub mod matching;
pub mod models;
pub mod notifier;
pub mod scraper;
pub mod skills;
pub mod store;
pub mod worker;

pub use errors::AppError;
