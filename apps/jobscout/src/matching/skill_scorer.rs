//! Keyword skill scorer: weighted coverage of a job's extracted skills by the
//! candidate's profile. Pure, deterministic, no network.
//!
//! score = cov(required) × 70 + cov(preferred) × 20 + cov(mentioned) × 10
//!
//! where cov(bucket) = matched / total, or 1 when the bucket is empty.

use std::collections::HashSet;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::skills::{extract_from_job, SkillTaxonomy};

const REQUIRED_WEIGHT: f64 = 70.0;
const PREFERRED_WEIGHT: f64 = 20.0;
const MENTIONED_WEIGHT: f64 = 10.0;

/// Outcome of scoring one job against the profile. Recomputed on every pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkillScoreResult {
    pub score: f64,
    #[serde(default)]
    pub matched_skills: Vec<String>,
    #[serde(default)]
    pub missing_skills: Vec<String>,
    #[serde(default)]
    pub reason: String,
}

impl SkillScoreResult {
    pub fn zero(reason: &str) -> Self {
        Self {
            score: 0.0,
            reason: reason.to_string(),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone)]
pub struct KeywordSkillScorer {
    taxonomy: Arc<SkillTaxonomy>,
}

impl KeywordSkillScorer {
    pub fn new(taxonomy: Arc<SkillTaxonomy>) -> Self {
        Self { taxonomy }
    }

    pub fn score(&self, profile_skills: &[String], description: Option<&str>) -> SkillScoreResult {
        let profile: HashSet<String> = profile_skills
            .iter()
            .filter(|s| !s.trim().is_empty())
            .map(|s| self.taxonomy.normalize(s.trim()))
            .collect();
        if profile.is_empty() {
            return SkillScoreResult::zero("No skills in profile");
        }

        let description = match description {
            Some(d) if !d.trim().is_empty() => d,
            _ => return SkillScoreResult::zero("No job description"),
        };

        let job = extract_from_job(&self.taxonomy, description);

        let required_matched = intersect(&profile, &job.required);
        let preferred_matched = intersect(&profile, &job.preferred);
        let mentioned_matched = intersect(&profile, &job.mentioned);

        let score = coverage(required_matched.len(), job.required.len()) * REQUIRED_WEIGHT
            + coverage(preferred_matched.len(), job.preferred.len()) * PREFERRED_WEIGHT
            + coverage(mentioned_matched.len(), job.mentioned.len()) * MENTIONED_WEIGHT;

        let missing_required = difference(&profile, &job.required);
        let missing_preferred = difference(&profile, &job.preferred);

        let reason = build_reason(
            required_matched.len(),
            job.required.len(),
            &missing_required,
            &missing_preferred,
        );

        let mut matched = required_matched;
        matched.extend(preferred_matched);
        matched.extend(mentioned_matched);

        let mut missing = missing_required;
        missing.extend(missing_preferred);

        SkillScoreResult {
            score: score.clamp(0.0, 100.0),
            matched_skills: matched,
            missing_skills: missing,
            reason,
        }
    }
}

fn coverage(matched: usize, total: usize) -> f64 {
    if total == 0 {
        1.0
    } else {
        matched as f64 / total as f64
    }
}

fn intersect(profile: &HashSet<String>, skills: &[String]) -> Vec<String> {
    skills.iter().filter(|s| profile.contains(*s)).cloned().collect()
}

fn difference(profile: &HashSet<String>, skills: &[String]) -> Vec<String> {
    skills.iter().filter(|s| !profile.contains(*s)).cloned().collect()
}

fn build_reason(
    matched_required: usize,
    total_required: usize,
    missing_required: &[String],
    missing_preferred: &[String],
) -> String {
    if total_required == 0 {
        return "No required skills listed in job description".to_string();
    }

    let coverage = format!("{matched_required}/{total_required} required skills matched");

    if !missing_required.is_empty() {
        format!("{coverage}. Missing required: {}.", missing_required.join(", "))
    } else if !missing_preferred.is_empty() {
        format!("{coverage}. Missing preferred: {}.", missing_preferred.join(", "))
    } else {
        format!("{coverage}. Full match on all required and preferred skills.")
    }
}
