pub mod gap;
pub mod llm_scorer;
pub mod pipeline;
pub mod prompts;
pub mod skill_scorer;

pub use gap::{analyze_skill_gaps, skill_gaps, GapReport, SkillGap};
pub use pipeline::{MatchingPipeline, ScoringMode};
pub use skill_scorer::SkillScoreResult;
