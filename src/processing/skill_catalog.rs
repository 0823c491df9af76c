//! Skill catalog: the fixed vocabulary of recognised skills

use crate::error::{AtsCheckerError, Result};
use crate::processing::text_processor::normalize;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub enum SkillCategory {
    Language,
    Framework,
    Cloud,
    DevOps,
    Database,
    Data,
    Practice,
    #[default]
    Tool,
}

impl SkillCategory {
    pub const ALL: [SkillCategory; 8] = [
        SkillCategory::Language,
        SkillCategory::Framework,
        SkillCategory::Cloud,
        SkillCategory::DevOps,
        SkillCategory::Database,
        SkillCategory::Data,
        SkillCategory::Practice,
        SkillCategory::Tool,
    ];
}

impl std::fmt::Display for SkillCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            SkillCategory::Language => "Language",
            SkillCategory::Framework => "Framework",
            SkillCategory::Cloud => "Cloud",
            SkillCategory::DevOps => "DevOps",
            SkillCategory::Database => "Database",
            SkillCategory::Data => "Data",
            SkillCategory::Practice => "Practice",
            SkillCategory::Tool => "Tool",
        };
        write!(f, "{}", name)
    }
}

impl std::str::FromStr for SkillCategory {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "language" | "languages" => Ok(SkillCategory::Language),
            "framework" | "frameworks" => Ok(SkillCategory::Framework),
            "cloud" => Ok(SkillCategory::Cloud),
            "devops" => Ok(SkillCategory::DevOps),
            "database" | "databases" => Ok(SkillCategory::Database),
            "data" => Ok(SkillCategory::Data),
            "practice" | "practices" => Ok(SkillCategory::Practice),
            "tool" | "tools" => Ok(SkillCategory::Tool),
            _ => Err(format!(
                "Unknown skill category: {}. Supported: language, framework, cloud, devops, database, data, practice, tool",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillEntry {
    pub name: String,
    #[serde(default)]
    pub aliases: Vec<String>,
    #[serde(default)]
    pub category: SkillCategory,
}

impl SkillEntry {
    pub fn new(name: impl Into<String>, category: SkillCategory) -> Self {
        Self {
            name: name.into(),
            aliases: Vec::new(),
            category,
        }
    }

    pub fn with_aliases(mut self, aliases: &[&str]) -> Self {
        self.aliases.extend(aliases.iter().map(|a| a.to_string()));
        self
    }

    /// Normalized name followed by normalized aliases, without duplicates.
    pub fn match_terms(&self) -> Vec<String> {
        let mut terms: Vec<String> = Vec::with_capacity(1 + self.aliases.len());
        for term in std::iter::once(&self.name).chain(self.aliases.iter()) {
            let term = normalize(term);
            if !terms.contains(&term) {
                terms.push(term);
            }
        }
        terms
    }
}

#[derive(Debug, Deserialize)]
struct CatalogFile {
    skills: Vec<SkillEntry>,
}

/// Ordered, immutable set of skills. Built once and handed to the matcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillCatalog {
    entries: Vec<SkillEntry>,
}

impl SkillCatalog {
    /// Build a catalog, rejecting blank terms and terms claimed by two skills.
    pub fn new(entries: Vec<SkillEntry>) -> Result<Self> {
        {
            let mut owners: HashMap<String, &str> = HashMap::new();

            for entry in &entries {
                if normalize(&entry.name).is_empty() {
                    return Err(AtsCheckerError::Catalog(
                        "Skill names must not be empty".to_string(),
                    ));
                }
                if entry.aliases.iter().any(|a| normalize(a).is_empty()) {
                    return Err(AtsCheckerError::Catalog(format!(
                        "Skill '{}' has an empty alias",
                        entry.name
                    )));
                }
                for term in entry.match_terms() {
                    if let Some(owner) = owners.insert(term.clone(), &entry.name) {
                        return Err(AtsCheckerError::Catalog(format!(
                            "'{}' is used by both '{}' and '{}'",
                            term, owner, entry.name
                        )));
                    }
                }
            }
        }

        Ok(Self { entries })
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let file: CatalogFile = toml::from_str(content)
            .map_err(|e| AtsCheckerError::Catalog(format!("Failed to parse catalog: {}", e)))?;
        Self::new(file.skills)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            AtsCheckerError::Catalog(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn entries(&self) -> &[SkillEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&SkillEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn by_category(&self, category: SkillCategory) -> impl Iterator<Item = &SkillEntry> {
        self.entries.iter().filter(move |e| e.category == category)
    }

    /// The built-in technical skill dictionary.
    pub fn builtin() -> Self {
        Self {
            entries: Self::builtin_entries(),
        }
    }

    fn builtin_entries() -> Vec<SkillEntry> {
        use SkillCategory::*;

        vec![
            // Programming languages
            SkillEntry::new("Python", Language),
            SkillEntry::new("Java", Language),
            SkillEntry::new("JavaScript", Language).with_aliases(&["js", "ecmascript"]),
            SkillEntry::new("TypeScript", Language),
            SkillEntry::new("C++", Language).with_aliases(&["cpp"]),
            SkillEntry::new("C#", Language).with_aliases(&["csharp", "c sharp"]),
            SkillEntry::new("Golang", Language),
            SkillEntry::new("Rust", Language),
            SkillEntry::new("Ruby", Language),
            SkillEntry::new("PHP", Language),
            SkillEntry::new("Kotlin", Language),
            SkillEntry::new("Scala", Language),
            SkillEntry::new("SQL", Language),
            SkillEntry::new("Bash", Language).with_aliases(&["shell scripting"]),
            // Frameworks and libraries
            SkillEntry::new("React", Framework).with_aliases(&["react.js", "reactjs"]),
            SkillEntry::new("Angular", Framework).with_aliases(&["angularjs"]),
            SkillEntry::new("Vue.js", Framework).with_aliases(&["vue", "vuejs"]),
            SkillEntry::new("Node.js", Framework).with_aliases(&["nodejs", "node"]),
            SkillEntry::new("Django", Framework),
            SkillEntry::new("Flask", Framework),
            SkillEntry::new("FastAPI", Framework),
            SkillEntry::new("Spring Boot", Framework).with_aliases(&["spring framework"]),
            SkillEntry::new(".NET", Framework).with_aliases(&["dotnet"]),
            // Cloud platforms
            SkillEntry::new("AWS", Cloud).with_aliases(&["amazon web services"]),
            SkillEntry::new("Azure", Cloud).with_aliases(&["microsoft azure"]),
            SkillEntry::new("GCP", Cloud).with_aliases(&["google cloud", "google cloud platform"]),
            // DevOps and infrastructure
            SkillEntry::new("Docker", DevOps),
            SkillEntry::new("Kubernetes", DevOps).with_aliases(&["k8s"]),
            SkillEntry::new("Terraform", DevOps),
            SkillEntry::new("Ansible", DevOps),
            SkillEntry::new("Jenkins", DevOps),
            SkillEntry::new("CI/CD", DevOps).with_aliases(&["cicd", "continuous integration"]),
            SkillEntry::new("Git", DevOps),
            SkillEntry::new("Linux", DevOps),
            // Databases
            SkillEntry::new("PostgreSQL", Database).with_aliases(&["postgres"]),
            SkillEntry::new("MySQL", Database),
            SkillEntry::new("MongoDB", Database).with_aliases(&["mongo"]),
            SkillEntry::new("Redis", Database),
            SkillEntry::new("Elasticsearch", Database),
            // Data and machine learning
            SkillEntry::new("Machine Learning", Data).with_aliases(&["ml"]),
            SkillEntry::new("Deep Learning", Data),
            SkillEntry::new("TensorFlow", Data),
            SkillEntry::new("PyTorch", Data),
            SkillEntry::new("Pandas", Data),
            SkillEntry::new("NumPy", Data),
            SkillEntry::new("Apache Spark", Data).with_aliases(&["spark", "pyspark"]),
            SkillEntry::new("Kafka", Data).with_aliases(&["apache kafka"]),
            SkillEntry::new("Data Analysis", Data).with_aliases(&["data analytics"]),
            // Practices
            SkillEntry::new("REST API", Practice).with_aliases(&["rest apis", "restful"]),
            SkillEntry::new("GraphQL", Practice),
            SkillEntry::new("Microservices", Practice),
            SkillEntry::new("Agile", Practice),
            SkillEntry::new("Scrum", Practice),
            SkillEntry::new("TDD", Practice).with_aliases(&["test driven development"]),
            // Tools
            SkillEntry::new("Jira", Tool),
            SkillEntry::new("Tableau", Tool),
            SkillEntry::new("Power BI", Tool).with_aliases(&["powerbi"]),
        ]
    }
}

impl Default for SkillCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
