//! Visa-sponsorship signal: posting classification, score adjustment and
//! sponsor-record linking.

pub mod adjuster;
pub mod classifier;
pub mod sponsors;

pub use adjuster::{apply_adjustment, score_h1b};
pub use classifier::classify_job;
pub use sponsors::link_companies;
