//! Section-aware skill extraction from job descriptions and resumes.
//!
//! A description is scanned line by line. Heading lines switch the active
//! bucket; every other line is attributed to whichever bucket is active.
//! Skills are then matched per bucket against the taxonomy.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::taxonomy::SkillTaxonomy;

static REQUIRED_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(requirements?|qualifications?|must.have|what you.?ll need\b|minimum qualifications?)",
    )
    .expect("required heading pattern is valid")
});

static PREFERRED_HEADING: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)(nice.to.have|bonus|preferred qualifications?|what would be (great|nice)|additional qualifications?)",
    )
    .expect("preferred heading pattern is valid")
});

/// Skills found in a job description, split by the section they appeared in.
/// A skill appears in at most one list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSkills {
    pub required: Vec<String>,
    pub preferred: Vec<String>,
    pub mentioned: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Required,
    Preferred,
    Mentioned,
}

fn heading_section(line: &str) -> Option<Section> {
    if PREFERRED_HEADING.is_match(line) {
        Some(Section::Preferred)
    } else if REQUIRED_HEADING.is_match(line) {
        Some(Section::Required)
    } else {
        None
    }
}

/// Extracts canonical skills from a job description, bucketed by section.
pub fn extract_from_job(taxonomy: &SkillTaxonomy, description: &str) -> JobSkills {
    let mut required = String::new();
    let mut preferred = String::new();
    let mut mentioned = String::new();
    let mut section = Section::Mentioned;

    for line in description.lines() {
        let mut line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(next) = heading_section(line) {
            section = next;
            // Inline lists ("Requirements: Go, Docker") keep the part after the colon.
            match line.split_once(':') {
                Some((_, rest)) if !rest.trim().is_empty() => line = rest.trim(),
                _ => continue,
            }
        }
        let buf = match section {
            Section::Required => &mut required,
            Section::Preferred => &mut preferred,
            Section::Mentioned => &mut mentioned,
        };
        buf.push_str(line);
        buf.push(' ');
    }

    let required = find_skills(taxonomy, &required);
    let mut claimed: HashSet<String> = required.iter().cloned().collect();

    let preferred: Vec<String> = find_skills(taxonomy, &preferred)
        .into_iter()
        .filter(|s| claimed.insert(s.clone()))
        .collect();

    let mentioned: Vec<String> = find_skills(taxonomy, &mentioned)
        .into_iter()
        .filter(|s| claimed.insert(s.clone()))
        .collect();

    JobSkills {
        required,
        preferred,
        mentioned,
    }
}

/// Extracts every canonical skill from free text, with no section detection.
pub fn extract_from_resume(taxonomy: &SkillTaxonomy, text: &str) -> Vec<String> {
    find_skills(taxonomy, text)
}

/// Matches multi-word aliases by substring first, then single-word aliases and
/// canonical names as whole words. Results are canonical, deduplicated, and in
/// first-seen order.
fn find_skills(taxonomy: &SkillTaxonomy, text: &str) -> Vec<String> {
    if text.trim().is_empty() {
        return vec![];
    }
    let lower = text.to_lowercase();
    let mut seen = HashSet::new();
    let mut found = Vec::new();

    for (alias, canonical) in taxonomy.multi_word_aliases() {
        if lower.contains(alias.as_str()) && seen.insert(*canonical) {
            found.push(canonical.to_string());
        }
    }
    for (term, canonical) in taxonomy.single_word_terms() {
        if contains_word(&lower, term) && seen.insert(*canonical) {
            found.push(canonical.to_string());
        }
    }
    found
}

/// True if `word` occurs in `text` with no ASCII alphanumeric character
/// directly before or after it.
pub fn contains_word(text: &str, word: &str) -> bool {
    if word.is_empty() {
        return false;
    }
    let bytes = text.as_bytes();
    let mut start = 0;
    while let Some(offset) = text[start..].find(word) {
        let pos = start + offset;
        let end = pos + word.len();
        let before_ok = pos == 0 || !bytes[pos - 1].is_ascii_alphanumeric();
        let after_ok = end >= bytes.len() || !bytes[end].is_ascii_alphanumeric();
        if before_ok && after_ok {
            return true;
        }
        start = pos + text[pos..].chars().next().map_or(1, char::len_utf8);
        if start >= text.len() {
            break;
        }
    }
    false
}
