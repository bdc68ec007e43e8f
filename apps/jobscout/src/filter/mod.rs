//! Read-time job filters, composed per request into an AND chain.

use std::collections::HashSet;

use tracing::debug;
use uuid::Uuid;

use crate::models::job::Job;
use crate::models::profile::Profile;

/// Shorthand role names → the phrase looked for in titles.
const TITLE_ALIASES: &[(&str, &str)] = &[
    ("swe", "software engineer"),
    ("sde", "software engineer"),
    ("mle", "machine learning engineer"),
    ("ml", "machine learning"),
    ("sre", "site reliability engineer"),
    ("devops", "developer operations"),
    ("fe", "frontend"),
    ("be", "backend"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobFilter {
    /// Title contains any of the (alias-resolved) phrases.
    Title(Vec<String>),
    /// Location contains any token; "remote" also matches the remote flag.
    Location(Vec<String>),
    NewGrad,
    /// Company is one of the known sponsors.
    H1bSponsor(HashSet<Uuid>),
}

impl JobFilter {
    pub fn name(&self) -> &'static str {
        match self {
            JobFilter::Title(_) => "title",
            JobFilter::Location(_) => "location",
            JobFilter::NewGrad => "new_grad",
            JobFilter::H1bSponsor(_) => "h1b",
        }
    }

    pub fn matches(&self, job: &Job) -> bool {
        match self {
            JobFilter::Title(titles) => {
                let title = job.title.to_lowercase();
                titles.iter().any(|t| title.contains(resolve_title_alias(t).as_str()))
            }
            JobFilter::Location(locations) => {
                let location = job.location.as_deref().unwrap_or_default().to_lowercase();
                locations.iter().any(|token| {
                    let token = token.trim().to_lowercase();
                    if token == "remote" {
                        job.remote || location.contains("remote")
                    } else {
                        location.contains(token.as_str())
                    }
                })
            }
            JobFilter::NewGrad => job.is_new_grad,
            JobFilter::H1bSponsor(sponsor_ids) => sponsor_ids.contains(&job.company_id),
        }
    }
}

fn resolve_title_alias(raw: &str) -> String {
    let lower = raw.trim().to_lowercase();
    TITLE_ALIASES
        .iter()
        .find(|(alias, _)| *alias == lower)
        .map(|(_, phrase)| phrase.to_string())
        .unwrap_or(lower)
}

#[derive(Debug, Clone, Default)]
pub struct FilterParams {
    /// Entries may themselves be comma-separated lists.
    pub titles: Vec<String>,
    pub locations: Vec<String>,
    pub new_grad: bool,
    pub h1b_only: bool,
}

impl FilterParams {
    /// Preferences a profile implies: roles, locations and, when the
    /// candidate needs a visa, sponsoring companies only.
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            titles: profile.preferred_roles.clone(),
            locations: profile.preferred_locations.clone(),
            new_grad: false,
            h1b_only: profile.visa_required,
        }
    }
}

fn split_list(values: &[String]) -> Vec<String> {
    values
        .iter()
        .flat_map(|v| v.split(','))
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .collect()
}

/// Builds the active predicates. Inactive parameters contribute nothing.
pub fn build(params: &FilterParams, sponsor_ids: HashSet<Uuid>) -> Vec<JobFilter> {
    let mut filters = Vec::new();

    let titles = split_list(&params.titles);
    if !titles.is_empty() {
        filters.push(JobFilter::Title(titles));
    }
    let locations = split_list(&params.locations);
    if !locations.is_empty() {
        filters.push(JobFilter::Location(locations));
    }
    if params.new_grad {
        filters.push(JobFilter::NewGrad);
    }
    if params.h1b_only {
        filters.push(JobFilter::H1bSponsor(sponsor_ids));
    }
    filters
}

/// Keeps jobs passing every filter. An empty chain keeps everything.
pub fn apply(jobs: Vec<Job>, filters: &[JobFilter]) -> Vec<Job> {
    if filters.is_empty() {
        return jobs;
    }
    let before = jobs.len();
    let kept: Vec<Job> = jobs
        .into_iter()
        .filter(|job| filters.iter().all(|f| f.matches(job)))
        .collect();
    debug!(
        "Filters [{}] kept {} of {before} jobs",
        filters.iter().map(JobFilter::name).collect::<Vec<_>>().join(", "),
        kept.len()
    );
    kept
}
