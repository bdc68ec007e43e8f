//! External-model skill scorer.
//!
//! `ExternalScorer` is the seam the pipeline calls through; `LlmSkillScorer`
//! is the production backend. Any error returned here is absorbed by the
//! pipeline, which falls back to keyword scoring.

use async_trait::async_trait;

use crate::errors::AppError;
use crate::llm_client::{prompts::JSON_ONLY_SYSTEM, LlmClient};
use crate::matching::prompts::SKILL_FIT_PROMPT;
use crate::matching::skill_scorer::SkillScoreResult;

/// Descriptions are cut to this many characters before prompting.
pub const MAX_DESCRIPTION_CHARS: usize = 3000;

#[async_trait]
pub trait ExternalScorer: Send + Sync {
    async fn score(
        &self,
        profile_skills: &[String],
        description: Option<&str>,
    ) -> Result<SkillScoreResult, AppError>;
}

pub struct LlmSkillScorer(pub LlmClient);

#[async_trait]
impl ExternalScorer for LlmSkillScorer {
    async fn score(
        &self,
        profile_skills: &[String],
        description: Option<&str>,
    ) -> Result<SkillScoreResult, AppError> {
        let description = match description {
            Some(d) if !d.trim().is_empty() => d,
            _ => return Ok(SkillScoreResult::zero("No job description")),
        };

        let prompt = build_prompt(profile_skills, description);
        let result: SkillScoreResult = self.0.call_json(&prompt, Some(JSON_ONLY_SYSTEM)).await?;
        Ok(clamp_result(result))
    }
}

pub(crate) fn build_prompt(profile_skills: &[String], description: &str) -> String {
    SKILL_FIT_PROMPT
        .replace("{skills}", &profile_skills.join(", "))
        .replace("{description}", &truncate_description(description))
}

fn truncate_description(description: &str) -> String {
    match description.char_indices().nth(MAX_DESCRIPTION_CHARS) {
        Some((cut, _)) => format!("{}...", &description[..cut]),
        None => description.to_string(),
    }
}

pub(crate) fn clamp_result(mut result: SkillScoreResult) -> SkillScoreResult {
    result.score = if result.score.is_nan() {
        0.0
    } else {
        result.score.clamp(0.0, 100.0)
    };
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_long_description_is_truncated() {
        let long = "é".repeat(MAX_DESCRIPTION_CHARS + 50);
        let cut = truncate_description(&long);
        assert_eq!(cut.chars().count(), MAX_DESCRIPTION_CHARS + 3);
        assert!(cut.ends_with("..."));
    }

    #[test]
    fn test_short_description_is_untouched() {
        assert_eq!(truncate_description("Go and Rust"), "Go and Rust");
    }

    #[test]
    fn test_prompt_carries_skills_and_description() {
        let prompt = build_prompt(&["Go".to_string(), "Rust".to_string()], "Build pipelines");
        assert!(prompt.contains("Candidate skills: Go, Rust"));
        assert!(prompt.contains("Build pipelines"));
        assert!(!prompt.contains("{description}"));
    }

    #[test]
    fn test_out_of_range_scores_are_clamped() {
        let high = clamp_result(SkillScoreResult {
            score: 140.0,
            ..Default::default()
        });
        assert_eq!(high.score, 100.0);
        let low = clamp_result(SkillScoreResult {
            score: -5.0,
            ..Default::default()
        });
        assert_eq!(low.score, 0.0);
    }

    #[tokio::test]
    async fn test_empty_description_skips_network() {
        // Unroutable URL: a network call would fail the test.
        let client = LlmClient::with_api_url("key".into(), "http://127.0.0.1:9/v1/messages".into());
        let result = LlmSkillScorer(client)
            .score(&["Go".to_string()], Some("   "))
            .await
            .unwrap();
        assert_eq!(result.score, 0.0);
        assert_eq!(result.reason, "No job description");
    }
}
