use std::collections::HashMap;

/// Canonical skill names, grouped by category. Extraction reports skills in
/// this spelling.
pub const CANONICAL_SKILLS: &[&str] = &[
    // Languages
    "Go", "Python", "Java", "JavaScript", "TypeScript", "Rust", "C++", "C#", "Ruby", "PHP",
    "Kotlin", "Swift", "SQL", "R", "Scala",
    // Frameworks
    "React", "Next.js", "Vue", "Angular", "Django", "Flask", "Spring Boot", "Express",
    "FastAPI", "Gin", "Echo", "Fiber", "Rails", "Node.js",
    // Databases
    "PostgreSQL", "MySQL", "MongoDB", "Redis", "SQLite", "DynamoDB", "Cassandra",
    "Elasticsearch", "Neo4j", "ClickHouse", "Snowflake",
    // Cloud
    "AWS", "GCP", "Azure", "S3", "EC2", "Lambda", "Cloud Run", "BigQuery", "ECS", "EKS",
    "GKE", "CloudFormation",
    // DevOps
    "Docker", "Kubernetes", "Terraform", "Ansible", "Jenkins", "GitHub Actions", "CircleCI",
    "ArgoCD", "Helm", "Pulumi",
    // Tools & protocols
    "Git", "Linux", "Nginx", "Kafka", "RabbitMQ", "gRPC", "GraphQL", "REST", "Prometheus",
    "Grafana", "Datadog", "OpenTelemetry",
    // Concepts
    "microservices", "CI/CD", "distributed systems", "system design", "API design",
    "event-driven", "caching", "load balancing", "message queue", "observability",
];

/// Alternate spellings and abbreviations → canonical name. Many-to-one.
/// Order is significant: extraction walks this table front to back.
pub const SKILL_ALIASES: &[(&str, &str)] = &[
    ("js", "JavaScript"),
    ("ts", "TypeScript"),
    ("k8s", "Kubernetes"),
    ("kube", "Kubernetes"),
    ("postgres", "PostgreSQL"),
    ("pg", "PostgreSQL"),
    ("mongo", "MongoDB"),
    ("node", "Node.js"),
    ("nodejs", "Node.js"),
    ("gh actions", "GitHub Actions"),
    ("google cloud", "GCP"),
    ("microsoft azure", "Azure"),
    ("rabbit", "RabbitMQ"),
    ("elk", "Elasticsearch"),
    ("elastic", "Elasticsearch"),
    ("cicd", "CI/CD"),
    ("rest api", "REST"),
    ("restful", "REST"),
    ("amazon web services", "AWS"),
    ("google kubernetes engine", "GKE"),
    ("amazon eks", "EKS"),
    ("amazon ecs", "ECS"),
    ("golang", "Go"),
    ("python3", "Python"),
    ("react.js", "React"),
    ("reactjs", "React"),
    ("vue.js", "Vue"),
    ("vuejs", "Vue"),
    ("nextjs", "Next.js"),
    ("angular.js", "Angular"),
    ("angularjs", "Angular"),
];

/// Case-insensitive lookup over the canonical list and alias table.
///
/// Built once at startup and shared by reference with the extractor and
/// scorer; it holds no mutable state after construction.
#[derive(Debug, Clone)]
pub struct SkillTaxonomy {
    /// lowercase name or alias → canonical
    index: HashMap<String, &'static str>,
    multi_word_aliases: Vec<(String, &'static str)>,
    single_word_terms: Vec<(String, &'static str)>,
}

impl SkillTaxonomy {
    pub fn new() -> Self {
        Self::from_tables(CANONICAL_SKILLS, SKILL_ALIASES)
    }

    pub fn from_tables(canonical: &[&'static str], aliases: &[(&'static str, &'static str)]) -> Self {
        let mut index = HashMap::with_capacity(canonical.len() + aliases.len());
        for skill in canonical {
            index.insert(skill.to_lowercase(), *skill);
        }
        for (alias, skill) in aliases {
            // A canonical spelling always resolves to itself.
            index.entry(alias.to_lowercase()).or_insert(*skill);
        }

        let mut multi_word_aliases = Vec::new();
        let mut single_word_terms = Vec::new();
        for (alias, skill) in aliases {
            let alias = alias.to_lowercase();
            if alias.contains(' ') {
                multi_word_aliases.push((alias, *skill));
            } else {
                single_word_terms.push((alias, *skill));
            }
        }
        for skill in canonical {
            single_word_terms.push((skill.to_lowercase(), *skill));
        }

        Self {
            index,
            multi_word_aliases,
            single_word_terms,
        }
    }

    /// Returns the canonical name for `raw`, or `raw` unchanged if unrecognized.
    pub fn normalize(&self, raw: &str) -> String {
        match self.lookup(raw) {
            Some(canonical) => canonical.to_string(),
            None => raw.to_string(),
        }
    }

    pub fn is_known(&self, raw: &str) -> bool {
        self.lookup(raw).is_some()
    }

    pub fn lookup(&self, raw: &str) -> Option<&'static str> {
        self.index.get(&raw.trim().to_lowercase()).copied()
    }

    /// Aliases containing a space, matched by plain substring containment.
    pub(crate) fn multi_word_aliases(&self) -> &[(String, &'static str)] {
        &self.multi_word_aliases
    }

    /// Single-word aliases followed by every canonical name, matched as whole words.
    pub(crate) fn single_word_terms(&self) -> &[(String, &'static str)] {
        &self.single_word_terms
    }
}

impl Default for SkillTaxonomy {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_alias_resolves_to_its_canonical() {
        let tax = SkillTaxonomy::new();
        for (alias, canonical) in SKILL_ALIASES {
            assert_eq!(tax.normalize(alias), *canonical, "alias {alias}");
            assert_eq!(tax.normalize(&alias.to_uppercase()), *canonical);
            assert_eq!(tax.normalize(&format!("  {alias}\t")), *canonical);
        }
    }

    #[test]
    fn test_every_canonical_normalizes_to_itself() {
        let tax = SkillTaxonomy::new();
        for skill in CANONICAL_SKILLS {
            assert_eq!(tax.normalize(skill), *skill);
        }
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let tax = SkillTaxonomy::new();
        for raw in ["k8s", "GOLANG", "Haskell", "  postgres ", "", "ci/cd"] {
            let once = tax.normalize(raw);
            assert_eq!(tax.normalize(&once), once, "input {raw:?}");
        }
    }

    #[test]
    fn test_unknown_skill_passes_through_unchanged() {
        let tax = SkillTaxonomy::new();
        assert_eq!(tax.normalize("Haskell"), "Haskell");
        assert!(!tax.is_known("Haskell"));
    }

    #[test]
    fn test_is_known_ignores_case_and_whitespace() {
        let tax = SkillTaxonomy::new();
        assert!(tax.is_known(" KUBERNETES "));
        assert!(tax.is_known("Amazon Web Services"));
    }

    #[test]
    fn test_alias_partition() {
        let tax = SkillTaxonomy::new();
        assert!(tax
            .multi_word_aliases()
            .iter()
            .all(|(alias, _)| alias.contains(' ')));
        assert!(tax
            .single_word_terms()
            .iter()
            .any(|(term, canonical)| term == "golang" && *canonical == "Go"));
    }
}
