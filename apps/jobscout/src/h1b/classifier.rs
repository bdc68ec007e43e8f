//! Heuristic classification of a posting's seniority, new-grad status and
//! visa stance. Pure over (title, description); precedence is fixed and
//! first match wins.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// "2-8 YOE", "3–5 years", "0-2 yrs"
static YOE_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+)\s*[-–]\s*(\d+)\s*(?:years?|yrs?|yoe)\b")
        .expect("years range pattern is valid")
});

/// "8+ years", "3+ yoe", "5 yrs"
static YOE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(\d+)\+?\s*(?:years?|yrs?|yoe)\b").expect("years pattern is valid")
});

const NEW_GRAD_PATTERNS: &[&str] = &[
    "new grad",
    "new graduate",
    "university grad",
    "entry level",
    "entry-level",
    "junior",
    "associate",
    "early career",
    "early-career",
    "campus",
    "recent graduate",
    "fresh graduate",
    "0-2 years",
    "0-1 years",
    "1-2 years",
];

const SENIOR_MARKERS: &[&str] = &["senior", "sr.", "sr "];
const STAFF_MARKERS: &[&str] = &["staff", "principal"];
const LEAD_MARKERS: &[&str] = &["lead", "manager", "director"];

const NEGATIVE_VISA_PATTERNS: &[&str] = &[
    "no visa sponsorship",
    "not sponsor",
    "cannot sponsor",
    "will not sponsor",
    "without sponsorship",
    "no sponsorship",
    "must be authorized",
    "must be legally authorized",
    "authorized to work",
    "without visa sponsorship",
    "u.s. citizen",
    "us citizen",
    "permanent resident",
    "green card",
    "security clearance required",
];

const POSITIVE_VISA_PATTERNS: &[&str] = &[
    "visa sponsorship available",
    "will sponsor",
    "sponsorship provided",
    "we sponsor",
    "open to sponsorship",
    "h1b sponsorship",
    "visa support",
];

const VISA_KEYWORDS: &[&str] = &["visa", "sponsorship", "h1b", "h-1b", "work authorization"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExperienceLevel {
    Intern,
    Entry,
    #[default]
    Mid,
    Senior,
    Staff,
    Lead,
}

impl ExperienceLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExperienceLevel::Intern => "intern",
            ExperienceLevel::Entry => "entry",
            ExperienceLevel::Mid => "mid",
            ExperienceLevel::Senior => "senior",
            ExperienceLevel::Staff => "staff",
            ExperienceLevel::Lead => "lead",
        }
    }

    fn by_years(years: u32) -> Self {
        match years {
            n if n >= 5 => ExperienceLevel::Senior,
            n if n >= 3 => ExperienceLevel::Mid,
            _ => ExperienceLevel::Entry,
        }
    }
}

impl fmt::Display for ExperienceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VisaSentiment {
    #[default]
    None,
    Positive,
    Negative,
    Neutral,
}

impl VisaSentiment {
    /// Stored form; `None` is persisted as NULL.
    pub fn as_stored(&self) -> Option<&'static str> {
        match self {
            VisaSentiment::None => None,
            VisaSentiment::Positive => Some("positive"),
            VisaSentiment::Negative => Some("negative"),
            VisaSentiment::Neutral => Some("neutral"),
        }
    }

    pub fn from_stored(value: Option<&str>) -> Self {
        match value {
            Some("positive") => VisaSentiment::Positive,
            Some("negative") => VisaSentiment::Negative,
            Some("neutral") => VisaSentiment::Neutral,
            _ => VisaSentiment::None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Classification {
    pub experience_level: ExperienceLevel,
    pub is_new_grad: bool,
    pub visa_mentioned: bool,
    pub visa_sentiment: VisaSentiment,
}

pub fn classify_job(title: &str, description: Option<&str>) -> Classification {
    let title = title.to_lowercase();
    let combined = format!("{} {}", title, description.unwrap_or_default().to_lowercase());

    let (experience_level, is_new_grad) = detect_experience_level(&title, &combined);
    let (visa_mentioned, visa_sentiment) = detect_visa_stance(&combined);

    Classification {
        experience_level,
        is_new_grad,
        visa_mentioned,
        visa_sentiment,
    }
}

fn contains_any(text: &str, patterns: &[&str]) -> bool {
    patterns.iter().any(|p| text.contains(p))
}

fn detect_experience_level(title: &str, combined: &str) -> (ExperienceLevel, bool) {
    if contains_any(combined, NEW_GRAD_PATTERNS) {
        return (ExperienceLevel::Entry, true);
    }
    if title.contains("intern") {
        return (ExperienceLevel::Intern, false);
    }
    if contains_any(title, SENIOR_MARKERS) {
        return (ExperienceLevel::Senior, false);
    }
    if contains_any(title, STAFF_MARKERS) {
        return (ExperienceLevel::Staff, false);
    }
    if contains_any(title, LEAD_MARKERS) {
        return (ExperienceLevel::Lead, false);
    }

    // An explicit range in the title ("(2-8 YOE)") is bucketed by its upper bound.
    if let Some(caps) = YOE_RANGE.captures(title) {
        let upper = caps[2].parse().unwrap_or(0);
        return (ExperienceLevel::by_years(upper), false);
    }
    if let Some(caps) = YOE.captures(combined) {
        let years = caps[1].parse().unwrap_or(0);
        return (ExperienceLevel::by_years(years), false);
    }

    (ExperienceLevel::Mid, false)
}

fn detect_visa_stance(combined: &str) -> (bool, VisaSentiment) {
    if contains_any(combined, NEGATIVE_VISA_PATTERNS) {
        return (true, VisaSentiment::Negative);
    }
    if contains_any(combined, POSITIVE_VISA_PATTERNS) {
        return (true, VisaSentiment::Positive);
    }
    if contains_any(combined, VISA_KEYWORDS) {
        return (true, VisaSentiment::Neutral);
    }
    (false, VisaSentiment::None)
}
