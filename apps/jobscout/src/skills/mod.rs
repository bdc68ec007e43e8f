//! Skill vocabulary and text extraction.

pub mod extractor;
pub mod taxonomy;

pub use extractor::{extract_from_job, extract_from_resume};
pub use taxonomy::SkillTaxonomy;
