//! Skill-gap report: which missing skills keep coming up across the jobs the
//! candidate already matches well.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::models::job::Job;
use crate::store::{JobQuery, JobStore};

pub const DEFAULT_GAP_MIN_SCORE: f64 = 50.0;
pub const DEFAULT_GAP_TOP: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillGap {
    pub skill: String,
    /// Jobs listing this skill as missing.
    pub count: usize,
    /// `count` as a percentage of the jobs analyzed.
    pub percent: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GapReport {
    pub min_score: f64,
    pub jobs_analyzed: usize,
    pub gaps: Vec<SkillGap>,
}

/// Counts missing skills over scored jobs at or above `min_score` and keeps
/// the `top` most frequent. Ties are broken by skill name.
pub fn skill_gaps(jobs: &[Job], min_score: f64, top: usize) -> GapReport {
    let mut freq: HashMap<&str, usize> = HashMap::new();
    let mut analyzed = 0;

    for job in jobs {
        if !job.match_score.is_some_and(|s| s >= min_score) {
            continue;
        }
        analyzed += 1;
        for skill in &job.missing_skills {
            *freq.entry(skill.as_str()).or_default() += 1;
        }
    }

    if analyzed == 0 {
        return GapReport {
            min_score,
            ..Default::default()
        };
    }

    let mut gaps: Vec<SkillGap> = freq
        .into_iter()
        .map(|(skill, count)| SkillGap {
            skill: skill.to_string(),
            count,
            percent: count as f64 / analyzed as f64 * 100.0,
        })
        .collect();
    gaps.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.skill.cmp(&b.skill)));
    gaps.truncate(top);

    GapReport {
        min_score,
        jobs_analyzed: analyzed,
        gaps,
    }
}

/// Builds the report from every stored job scored at or above `min_score`.
pub async fn analyze_skill_gaps(
    store: &dyn JobStore,
    min_score: f64,
    top: usize,
) -> Result<GapReport, AppError> {
    let jobs = store
        .list_jobs(&JobQuery {
            min_score: Some(min_score),
            ..Default::default()
        })
        .await?;
    Ok(skill_gaps(&jobs, min_score, top))
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::matching::SkillScoreResult;
    use crate::models::job::RawPosting;
    use crate::store::memory::MemoryStore;

    fn scored(ext: &str, score: Option<f64>, missing: &[&str]) -> Job {
        let mut job = Job::from_posting(
            Uuid::nil(),
            &RawPosting {
                external_id: ext.to_string(),
                title: "Engineer".to_string(),
                ..Default::default()
            },
        );
        job.match_score = score;
        job.missing_skills = missing.iter().map(|s| s.to_string()).collect();
        job
    }

    #[test]
    fn test_counts_and_percentages() {
        let jobs = vec![
            scored("a", Some(80.0), &["Kubernetes", "Terraform"]),
            scored("b", Some(70.0), &["Kubernetes"]),
            scored("c", Some(55.0), &["Kafka", "Kubernetes"]),
            scored("d", Some(90.0), &[]),
        ];
        let report = skill_gaps(&jobs, 50.0, 10);
        assert_eq!(report.jobs_analyzed, 4);
        assert_eq!(report.gaps[0].skill, "Kubernetes");
        assert_eq!(report.gaps[0].count, 3);
        assert!((report.gaps[0].percent - 75.0).abs() < 1e-9);
        // ties ordered by name
        assert_eq!(report.gaps[1].skill, "Kafka");
        assert_eq!(report.gaps[2].skill, "Terraform");
    }

    #[test]
    fn test_floor_and_unscored_jobs_are_skipped() {
        let jobs = vec![
            scored("a", Some(40.0), &["Rust"]),
            scored("b", None, &["Rust"]),
            scored("c", Some(60.0), &["Go"]),
        ];
        let report = skill_gaps(&jobs, 50.0, 10);
        assert_eq!(report.jobs_analyzed, 1);
        assert_eq!(report.gaps.len(), 1);
        assert_eq!(report.gaps[0].skill, "Go");
    }

    #[test]
    fn test_top_truncates() {
        let jobs = vec![scored("a", Some(90.0), &["Go", "Rust", "Kafka", "Redis"])];
        assert_eq!(skill_gaps(&jobs, 0.0, 2).gaps.len(), 2);
    }

    #[test]
    fn test_no_scored_jobs_is_empty_report() {
        let report = skill_gaps(&[scored("a", None, &["Go"])], 50.0, 10);
        assert_eq!(report.jobs_analyzed, 0);
        assert!(report.gaps.is_empty());
    }

    #[tokio::test]
    async fn test_analyze_reads_scored_jobs_from_store() {
        let store = MemoryStore::default();
        for (ext, score, missing) in [
            ("strong", 85.0, vec!["Kubernetes".to_string()]),
            ("weak", 20.0, vec!["Scala".to_string()]),
        ] {
            let job = scored(ext, None, &[]);
            store.create_job_if_absent(&job).await.unwrap();
            store
                .update_job_score(
                    job.id,
                    &SkillScoreResult {
                        score,
                        missing_skills: missing,
                        ..Default::default()
                    },
                )
                .await
                .unwrap();
        }

        let report = analyze_skill_gaps(&store, DEFAULT_GAP_MIN_SCORE, DEFAULT_GAP_TOP)
            .await
            .unwrap();
        assert_eq!(report.jobs_analyzed, 1);
        assert_eq!(report.gaps[0].skill, "Kubernetes");
        assert!((report.gaps[0].percent - 100.0).abs() < 1e-9);
    }
}
