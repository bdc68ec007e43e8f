/// Skill-fit prompt for the external model.
/// Placeholders: {skills}, {description}
pub const SKILL_FIT_PROMPT: &str = r#"You are a technical recruiter evaluating skill fit.

Candidate skills: {skills}

Job description:
{description}

Rate the TECHNICAL SKILL FIT ONLY from 0-100.
Do NOT consider location, job title, experience level, or visa status.
Focus purely on: does this candidate have the technical skills this job needs?

Respond with ONLY valid JSON, no explanation outside the JSON:
{
  "score": <number 0-100>,
  "matched_skills": [<skills the candidate has that the job wants>],
  "missing_skills": [<skills the job wants that the candidate lacks>],
  "reason": "<2 sentence explanation of the skill fit>"
}"#;
