//! Visa-aware score adjustment. Only applies when the profile needs
//! sponsorship; otherwise the delta is always zero.

use crate::h1b::classifier::VisaSentiment;
use crate::matching::SkillScoreResult;
use crate::models::company::Company;
use crate::models::job::Job;
use crate::models::profile::Profile;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct H1bAdjustment {
    pub delta: f64,
    pub reason: String,
}

pub fn score_h1b(job: &Job, company: &Company, profile: &Profile) -> H1bAdjustment {
    if !profile.visa_required {
        return H1bAdjustment::default();
    }

    let mut delta = 0.0;
    let mut reasons: Vec<String> = Vec::new();

    if company.sponsors_h1b {
        let rate = company.h1b_approval_rate.unwrap_or(0.0);
        delta += if rate >= 90.0 {
            15.0
        } else if rate >= 70.0 {
            10.0
        } else {
            5.0
        };
        reasons.push(format!("H1B sponsor ({rate:.0}% approval)"));
    }

    match VisaSentiment::from_stored(job.visa_sentiment.as_deref()) {
        VisaSentiment::Positive => {
            delta += 10.0;
            reasons.push("Visa sponsorship mentioned positively".to_string());
        }
        VisaSentiment::Negative => {
            delta -= 20.0;
            reasons.push("No visa sponsorship".to_string());
        }
        VisaSentiment::Neutral | VisaSentiment::None => {}
    }

    if job.is_new_grad && profile.experience_years <= 2 {
        delta += 5.0;
        reasons.push("New grad friendly".to_string());
    }

    H1bAdjustment {
        delta,
        reason: reasons.join(" | "),
    }
}

/// Folds an adjustment into a skill score: the sum is clamped to [0, 100] and
/// a non-empty adjustment reason is appended after " | ".
pub fn apply_adjustment(mut result: SkillScoreResult, adjustment: &H1bAdjustment) -> SkillScoreResult {
    result.score = (result.score + adjustment.delta).clamp(0.0, 100.0);
    if !adjustment.reason.is_empty() {
        result.reason = if result.reason.is_empty() {
            adjustment.reason.clone()
        } else {
            format!("{} | {}", result.reason, adjustment.reason)
        };
    }
    result
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;
    use crate::models::company::NewCompany;
    use crate::models::job::RawPosting;

    fn company(sponsors: bool, rate: Option<f64>) -> Company {
        let mut c = Company::new(NewCompany {
            name: "Acme".to_string(),
            platform: "lever".to_string(),
            slug: "acme".to_string(),
            career_url: None,
        });
        c.sponsors_h1b = sponsors;
        c.h1b_approval_rate = rate;
        c
    }

    fn job(sentiment: Option<&str>, new_grad: bool) -> Job {
        let mut j = Job::from_posting(Uuid::new_v4(), &RawPosting::default());
        j.visa_sentiment = sentiment.map(str::to_string);
        j.is_new_grad = new_grad;
        j
    }

    fn profile(visa_required: bool, years: i32) -> Profile {
        Profile {
            visa_required,
            experience_years: years,
            ..Default::default()
        }
    }

    #[test]
    fn test_no_visa_requirement_means_no_adjustment() {
        for sponsors in [false, true] {
            for sentiment in [None, Some("positive"), Some("negative"), Some("neutral")] {
                for new_grad in [false, true] {
                    let adj = score_h1b(
                        &job(sentiment, new_grad),
                        &company(sponsors, Some(95.0)),
                        &profile(false, 0),
                    );
                    assert_eq!(adj, H1bAdjustment::default());
                }
            }
        }
    }

    #[test]
    fn test_sponsor_rate_tiers() {
        let p = profile(true, 5);
        let j = job(None, false);
        assert_eq!(score_h1b(&j, &company(true, Some(95.0)), &p).delta, 15.0);
        assert_eq!(score_h1b(&j, &company(true, Some(75.0)), &p).delta, 10.0);
        assert_eq!(score_h1b(&j, &company(true, Some(40.0)), &p).delta, 5.0);
        let unknown = score_h1b(&j, &company(true, None), &p);
        assert_eq!(unknown.delta, 5.0);
        assert_eq!(unknown.reason, "H1B sponsor (0% approval)");
    }

    #[test]
    fn test_signals_accumulate() {
        let adj = score_h1b(
            &job(Some("positive"), true),
            &company(true, Some(92.4)),
            &profile(true, 1),
        );
        assert_eq!(adj.delta, 30.0);
        assert_eq!(
            adj.reason,
            "H1B sponsor (92% approval) | Visa sponsorship mentioned positively | New grad friendly"
        );
    }

    #[test]
    fn test_negative_sentiment_penalizes() {
        let adj = score_h1b(&job(Some("negative"), false), &company(false, None), &profile(true, 4));
        assert_eq!(adj.delta, -20.0);
        assert_eq!(adj.reason, "No visa sponsorship");
    }

    #[test]
    fn test_new_grad_bonus_needs_junior_profile() {
        let adj = score_h1b(&job(None, true), &company(false, None), &profile(true, 3));
        assert_eq!(adj.delta, 0.0);
        assert!(adj.reason.is_empty());
    }

    #[test]
    fn test_apply_adjustment_clamps_and_joins() {
        let base = SkillScoreResult {
            score: 95.0,
            reason: "4/4 required skills matched".to_string(),
            ..Default::default()
        };
        let adj = H1bAdjustment {
            delta: 15.0,
            reason: "H1B sponsor (95% approval)".to_string(),
        };
        let out = apply_adjustment(base.clone(), &adj);
        assert_eq!(out.score, 100.0);
        assert_eq!(
            out.reason,
            "4/4 required skills matched | H1B sponsor (95% approval)"
        );

        let low = apply_adjustment(
            SkillScoreResult {
                score: 10.0,
                ..base.clone()
            },
            &H1bAdjustment {
                delta: -20.0,
                reason: "No visa sponsorship".to_string(),
            },
        );
        assert_eq!(low.score, 0.0);

        let unchanged = apply_adjustment(base.clone(), &H1bAdjustment::default());
        assert_eq!(unchanged, base);
    }
}
