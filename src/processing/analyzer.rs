//! Resume vs job description analysis

use crate::config::MatchingConfig;
use crate::error::Result;
use crate::processing::similarity::tfidf_cosine;
use crate::processing::skill_catalog::SkillCatalog;
use crate::processing::skill_matcher::{NearMatch, SkillMatcher};
use crate::processing::text_processor::TextProcessor;
use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Plain text of the two documents being compared.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AnalysisInput {
    pub resume_text: String,
    pub job_text: String,
}

impl AnalysisInput {
    pub fn new(resume_text: impl Into<String>, job_text: impl Into<String>) -> Self {
        Self {
            resume_text: resume_text.into(),
            job_text: job_text.into(),
        }
    }
}

/// Outcome of one analysis.
///
/// `matched_skills`, `missing_skills` and `unrelated_skills` partition the
/// catalog; the first two together are the skills the job asks for. All
/// skill lists follow catalog order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Percentage of job-relevant skills found in the resume
    pub score: u8,
    pub matched_skills: Vec<String>,
    pub missing_skills: Vec<String>,
    pub unrelated_skills: Vec<String>,
    /// Resume skills the job does not mention (subset of `unrelated_skills`)
    pub additional_skills: Vec<String>,
    pub matched_keywords: Vec<String>,
    pub missing_keywords: Vec<String>,
    pub near_matches: Vec<NearMatch>,
    /// TF-IDF cosine similarity of the full texts, 0-100
    pub text_similarity: f64,
    pub suggestions: Vec<String>,
}

impl AnalysisResult {
    pub fn relevant_skill_count(&self) -> usize {
        self.matched_skills.len() + self.missing_skills.len()
    }
}

/// `round(100 * matched / relevant)` with halves rounded up, 0 when nothing is relevant.
pub fn compatibility_score(matched: usize, relevant: usize) -> u8 {
    if relevant == 0 {
        return 0;
    }
    let matched = matched.min(relevant) as u64;
    let relevant = relevant as u64;
    ((200 * matched + relevant) / (2 * relevant)).min(100) as u8
}

pub struct Analyzer {
    matcher: SkillMatcher,
    text_processor: TextProcessor,
    top_keywords: usize,
    fuzzy_threshold: f64,
}

impl Analyzer {
    pub fn new(catalog: SkillCatalog, settings: &MatchingConfig) -> Result<Self> {
        Ok(Self {
            matcher: SkillMatcher::new(catalog)?,
            text_processor: TextProcessor::new(settings.min_keyword_len)?,
            top_keywords: settings.top_keywords,
            fuzzy_threshold: settings.fuzzy_threshold,
        })
    }

    pub fn catalog(&self) -> &SkillCatalog {
        self.matcher.catalog()
    }

    /// Score `input` against the catalog. Never fails; empty text simply matches nothing.
    pub fn analyze(&self, input: &AnalysisInput) -> AnalysisResult {
        let catalog = self.matcher.catalog();

        let job_skills = self.matcher.find_skills(&input.job_text);
        let resume_skills = self.matcher.find_skills(&input.resume_text);

        let matched: BTreeSet<usize> = job_skills.intersection(&resume_skills).copied().collect();
        let missing: Vec<usize> = job_skills.difference(&resume_skills).copied().collect();

        let matched_skills = skill_names(catalog, matched.iter().copied());
        let missing_skills = skill_names(catalog, missing.iter().copied());
        let unrelated_skills =
            skill_names(catalog, (0..catalog.len()).filter(|i| !job_skills.contains(i)));
        let additional_skills =
            skill_names(catalog, resume_skills.difference(&job_skills).copied());

        let job_keywords = self
            .text_processor
            .extract_keywords(&input.job_text, self.top_keywords);
        let resume_vocabulary = self.text_processor.vocabulary(&input.resume_text);
        let (matched_keywords, missing_keywords): (Vec<String>, Vec<String>) = job_keywords
            .into_iter()
            .partition(|keyword| resume_vocabulary.contains(&self.text_processor.stem(keyword)));

        let near_matches =
            self.matcher
                .near_matches(&missing, &input.resume_text, self.fuzzy_threshold);

        let text_similarity = tfidf_cosine(
            &self.text_processor.term_counts(&input.resume_text),
            &self.text_processor.term_counts(&input.job_text),
        );

        let score = compatibility_score(matched_skills.len(), job_skills.len());

        debug!(
            "Analysis: {} relevant, {} matched, {} missing, score {}",
            job_skills.len(),
            matched_skills.len(),
            missing_skills.len(),
            score
        );

        let suggestions = build_suggestions(
            job_skills.len(),
            &missing_skills,
            &missing_keywords,
            &near_matches,
        );

        AnalysisResult {
            score,
            matched_skills,
            missing_skills,
            unrelated_skills,
            additional_skills,
            matched_keywords,
            missing_keywords,
            near_matches,
            text_similarity,
            suggestions,
        }
    }
}

fn skill_names(catalog: &SkillCatalog, indices: impl IntoIterator<Item = usize>) -> Vec<String> {
    indices
        .into_iter()
        .filter_map(|i| catalog.get(i))
        .map(|entry| entry.name.clone())
        .collect()
}

const SUGGESTED_SKILLS: usize = 5;
const SUGGESTED_KEYWORDS: usize = 8;

fn build_suggestions(
    relevant: usize,
    missing_skills: &[String],
    missing_keywords: &[String],
    near_matches: &[NearMatch],
) -> Vec<String> {
    let mut suggestions = Vec::new();

    if relevant == 0 {
        suggestions.push(
            "The job description names no recognised skills; compare the wording of both documents by hand."
                .to_string(),
        );
    }

    if !missing_skills.is_empty() {
        let named: Vec<&str> = missing_skills
            .iter()
            .take(SUGGESTED_SKILLS)
            .map(String::as_str)
            .collect();
        let more = missing_skills.len().saturating_sub(SUGGESTED_SKILLS);
        let tail = if more > 0 {
            format!(" (and {} more)", more)
        } else {
            String::new()
        };
        suggestions.push(format!(
            "If you have experience with {}{}, mention it explicitly in your resume.",
            named.join(", "),
            tail
        ));
    }

    for near in near_matches {
        suggestions.push(format!(
            "'{}' is close to {}; if you meant {}, spell it exactly, since ATS software only counts exact skill names.",
            near.found, near.skill, near.skill
        ));
    }

    if !missing_keywords.is_empty() {
        let named: Vec<&str> = missing_keywords
            .iter()
            .take(SUGGESTED_KEYWORDS)
            .map(String::as_str)
            .collect();
        suggestions.push(format!(
            "Add more keywords from the job description, such as: {}.",
            named.join(", ")
        ));
    }

    suggestions
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::processing::skill_catalog::{SkillCategory, SkillEntry};

    fn analyzer_for(catalog: SkillCatalog) -> Analyzer {
        Analyzer::new(catalog, &Config::default().matching).unwrap()
    }

    fn small_catalog() -> SkillCatalog {
        SkillCatalog::new(vec![
            SkillEntry::new("Python", SkillCategory::Language),
            SkillEntry::new("React", SkillCategory::Framework),
            SkillEntry::new("Docker", SkillCategory::DevOps),
            SkillEntry::new("AWS", SkillCategory::Cloud),
            SkillEntry::new("Java", SkillCategory::Language),
            SkillEntry::new("JavaScript", SkillCategory::Language),
        ])
        .unwrap()
    }

    #[test]
    fn test_python_react_docker_scenario() {
        let analyzer = analyzer_for(small_catalog());
        let result = analyzer.analyze(&AnalysisInput::new(
            "Experienced in Python and React.",
            "Looking for Python, React, and Docker skills.",
        ));

        assert_eq!(result.matched_skills, vec!["Python", "React"]);
        assert_eq!(result.missing_skills, vec!["Docker"]);
        assert_eq!(result.score, 67);
        assert_eq!(result.unrelated_skills, vec!["AWS", "Java", "JavaScript"]);
        assert!(result.additional_skills.is_empty());
    }

    #[test]
    fn test_empty_resume_scenario() {
        let analyzer = analyzer_for(small_catalog());
        let result = analyzer.analyze(&AnalysisInput::new("", "Need AWS experience."));

        assert!(result.matched_skills.is_empty());
        assert_eq!(result.missing_skills, vec!["AWS"]);
        assert_eq!(result.score, 0);
        assert_eq!(result.text_similarity, 0.0);
    }

    #[test]
    fn test_no_relevant_skills_scores_zero() {
        let analyzer = analyzer_for(small_catalog());
        let result = analyzer.analyze(&AnalysisInput::new(
            "Python, React, Docker, AWS",
            "Friendly barista wanted for the morning shift.",
        ));

        assert_eq!(result.score, 0);
        assert!(result.matched_skills.is_empty());
        assert!(result.missing_skills.is_empty());
        assert_eq!(result.additional_skills, vec!["Python", "React", "Docker", "AWS"]);
        assert!(result.suggestions[0].contains("no recognised skills"));
    }

    #[test]
    fn test_both_empty() {
        let analyzer = analyzer_for(small_catalog());
        let result = analyzer.analyze(&AnalysisInput::default());

        assert_eq!(result.score, 0);
        assert_eq!(result.unrelated_skills.len(), 6);
        assert!(result.matched_keywords.is_empty());
    }

    #[test]
    fn test_case_insensitive_matching() {
        let analyzer = analyzer_for(small_catalog());
        let job = "Python developer";

        let upper = analyzer.analyze(&AnalysisInput::new("Python", job));
        let lower = analyzer.analyze(&AnalysisInput::new("python", job));

        assert_eq!(upper.matched_skills, vec!["Python"]);
        assert_eq!(upper.matched_skills, lower.matched_skills);
        assert_eq!(upper.score, lower.score);
    }

    #[test]
    fn test_javascript_resume_does_not_satisfy_java() {
        let analyzer = analyzer_for(small_catalog());
        let result = analyzer.analyze(&AnalysisInput::new(
            "Senior JavaScript engineer",
            "We need Java expertise",
        ));

        assert!(result.matched_skills.is_empty());
        assert_eq!(result.missing_skills, vec!["Java"]);
        assert_eq!(result.additional_skills, vec!["JavaScript"]);
    }

    #[test]
    fn test_every_catalog_entry_classified_once() {
        let analyzer = analyzer_for(SkillCatalog::builtin());
        let result = analyzer.analyze(&AnalysisInput::new(
            "Python, Django, PostgreSQL, Docker and some Kubernets",
            "Backend role: Python, Django, Kubernetes, AWS, Terraform, CI/CD.",
        ));

        let mut all: Vec<&String> = result
            .matched_skills
            .iter()
            .chain(&result.missing_skills)
            .chain(&result.unrelated_skills)
            .collect();
        assert_eq!(all.len(), analyzer.catalog().len());
        all.sort();
        all.dedup();
        assert_eq!(all.len(), analyzer.catalog().len());

        assert_eq!(result.matched_skills, vec!["Python", "Django"]);
        assert_eq!(
            result.missing_skills,
            vec!["AWS", "Kubernetes", "Terraform", "CI/CD"]
        );
        assert_eq!(result.additional_skills, vec!["Docker", "PostgreSQL"]);
        assert_eq!(result.score, 33);
        assert!(result.near_matches.iter().any(|n| n.skill == "Kubernetes"));
    }

    #[test]
    fn test_analysis_is_idempotent() {
        let analyzer = analyzer_for(SkillCatalog::builtin());
        let input = AnalysisInput::new(
            "Data engineer: Spark, Kafka, Airflow, Python, SQL.",
            "Data platform engineer with Kafka, Spark, Scala and SQL. Airflow preferred.",
        );

        let first = analyzer.analyze(&input);
        let second = analyzer.analyze(&input);
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn test_plural_keyword_matches_singular() {
        let analyzer = analyzer_for(small_catalog());
        let result = analyzer.analyze(&AnalysisInput::new(
            "Built a data pipeline for reporting",
            "Own data pipelines and reporting",
        ));

        assert!(result.matched_keywords.contains(&"pipelines".to_string()));
        assert!(!result.missing_keywords.contains(&"pipelines".to_string()));
    }

    #[test]
    fn test_hyphenated_skill_in_job() {
        let catalog = SkillCatalog::new(vec![
            SkillEntry::new("Machine Learning", SkillCategory::Data).with_aliases(&["ml"]),
            SkillEntry::new("Power BI", SkillCategory::Tool),
        ])
        .unwrap();
        let result = analyzer_for(catalog).analyze(&AnalysisInput::new(
            "Machine Learning engineer",
            "Hiring a machine-learning engineer, Power-BI a plus",
        ));

        assert_eq!(result.matched_skills, vec!["Machine Learning"]);
        assert_eq!(result.missing_skills, vec!["Power BI"]);
        assert_eq!(result.score, 50);
    }

    #[test]
    fn test_derived_words_are_not_typos() {
        let analyzer = analyzer_for(small_catalog());
        let result = analyzer.analyze(&AnalysisInput::new(
            "Dockerized legacy services; reactive UIs",
            "Docker and React",
        ));

        assert_eq!(result.missing_skills, vec!["React", "Docker"]);
        assert!(result.near_matches.is_empty());
        assert!(!result.suggestions.iter().any(|s| s.contains("dockerized")));
    }

    #[test]
    fn test_keywords_found_in_both_texts() {
        let analyzer = analyzer_for(small_catalog());
        let result = analyzer.analyze(&AnalysisInput::new(
            "Built payment microservices and observability dashboards",
            "Payment platform: microservices, observability, compliance",
        ));

        assert!(result.matched_keywords.contains(&"payment".to_string()));
        assert!(result.matched_keywords.contains(&"observability".to_string()));
        assert!(result.missing_keywords.contains(&"compliance".to_string()));
        assert!(!result.matched_keywords.contains(&"compliance".to_string()));
    }

    #[test]
    fn test_score_formula() {
        assert_eq!(compatibility_score(0, 0), 0);
        assert_eq!(compatibility_score(3, 0), 0);
        assert_eq!(compatibility_score(2, 3), 67);
        assert_eq!(compatibility_score(1, 3), 33);
        assert_eq!(compatibility_score(1, 2), 50);
        assert_eq!(compatibility_score(1, 8), 13);
        assert_eq!(compatibility_score(5, 5), 100);
        assert_eq!(compatibility_score(7, 5), 100);
    }

    #[test]
    fn test_score_monotonic_in_matches() {
        for relevant in 1..=40 {
            let mut previous = 0;
            for matched in 0..=relevant {
                let score = compatibility_score(matched, relevant);
                assert!(score >= previous);
                assert!(score <= 100);
                previous = score;
            }
        }
    }

    #[test]
    fn test_suggestions_name_missing_skills() {
        let analyzer = analyzer_for(small_catalog());
        let result = analyzer.analyze(&AnalysisInput::new(
            "Python",
            "Python, Docker and AWS",
        ));

        assert!(result
            .suggestions
            .iter()
            .any(|s| s.contains("Docker, AWS")));
    }
}
