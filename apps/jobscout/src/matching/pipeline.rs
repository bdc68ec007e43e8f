//! Matching pipeline. Selects a scoring strategy and absorbs external-model
//! failures by falling back to the keyword scorer.

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::Config;
use crate::errors::AppError;
use crate::llm_client::LlmClient;
use crate::matching::llm_scorer::{ExternalScorer, LlmSkillScorer};
use crate::matching::skill_scorer::{KeywordSkillScorer, SkillScoreResult};
use crate::skills::SkillTaxonomy;

pub const DEFAULT_LLM_THRESHOLD: f64 = 30.0;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoringMode {
    #[default]
    Keyword,
    Llm,
    /// Keyword first; the external model only sees jobs at or above the threshold.
    Hybrid,
}

impl ScoringMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScoringMode::Keyword => "keyword",
            ScoringMode::Llm => "llm",
            ScoringMode::Hybrid => "hybrid",
        }
    }
}

impl fmt::Display for ScoringMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ScoringMode {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "keyword" => Ok(ScoringMode::Keyword),
            "llm" => Ok(ScoringMode::Llm),
            "hybrid" => Ok(ScoringMode::Hybrid),
            other => Err(AppError::Validation(format!(
                "unknown scoring mode '{other}' (expected keyword, llm or hybrid)"
            ))),
        }
    }
}

pub struct MatchingPipeline {
    keyword: KeywordSkillScorer,
    external: Option<Arc<dyn ExternalScorer>>,
    mode: ScoringMode,
    threshold: f64,
}

impl MatchingPipeline {
    pub fn new(
        taxonomy: Arc<SkillTaxonomy>,
        mode: ScoringMode,
        threshold: f64,
        external: Option<Arc<dyn ExternalScorer>>,
    ) -> Self {
        // Keyword mode never consults the external model.
        let external = match mode {
            ScoringMode::Keyword => None,
            ScoringMode::Llm | ScoringMode::Hybrid => external,
        };
        Self {
            keyword: KeywordSkillScorer::new(taxonomy),
            external,
            mode,
            threshold,
        }
    }

    /// Builds the pipeline from config. Without an API key, llm and hybrid
    /// modes score by keyword only.
    pub fn from_config(config: &Config, taxonomy: Arc<SkillTaxonomy>) -> Self {
        let external = config.anthropic_api_key.as_ref().map(|key| {
            Arc::new(LlmSkillScorer(LlmClient::new(key.clone()))) as Arc<dyn ExternalScorer>
        });
        Self::new(
            taxonomy,
            config.matcher_mode,
            config.matcher_llm_threshold,
            external,
        )
    }

    pub fn mode(&self) -> ScoringMode {
        self.mode
    }

    pub fn uses_external_model(&self) -> bool {
        self.external.is_some()
    }

    pub async fn score(
        &self,
        profile_skills: &[String],
        description: Option<&str>,
    ) -> SkillScoreResult {
        match (self.mode, &self.external) {
            (ScoringMode::Llm, Some(external)) => {
                match external.score(profile_skills, description).await {
                    Ok(result) => result,
                    Err(e) => {
                        warn!("External scorer failed, falling back to keyword: {e}");
                        self.keyword.score(profile_skills, description)
                    }
                }
            }
            (ScoringMode::Hybrid, Some(external)) => {
                let keyword_result = self.keyword.score(profile_skills, description);
                if keyword_result.score < self.threshold {
                    debug!(
                        "Keyword score {:.1} below threshold {:.1}, skipping external scorer",
                        keyword_result.score, self.threshold
                    );
                    return keyword_result;
                }
                match external.score(profile_skills, description).await {
                    Ok(result) => result,
                    Err(e) => {
                        warn!("External scorer failed, keeping keyword result: {e}");
                        keyword_result
                    }
                }
            }
            _ => self.keyword.score(profile_skills, description),
        }
    }
}
