//! Whole-word skill detection over normalized text

use crate::error::{AtsCheckerError, Result};
use crate::processing::skill_catalog::SkillCatalog;
use crate::processing::text_processor::{is_word_char, normalize};
use aho_corasick::{AhoCorasick, MatchKind};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashSet};
use strsim::jaro_winkler;

/// One accepted occurrence of a catalog term in normalized text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkillOccurrence {
    pub skill_index: usize,
    pub term: String,
    pub start: usize,
    pub end: usize,
}

/// A resume token that looks like a missing skill without matching it exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearMatch {
    pub skill: String,
    pub found: String,
    pub similarity: f64,
}

/// Finds catalog skills in free text.
///
/// Every name and alias goes into one Aho-Corasick automaton. Overlapping
/// matches are enumerated so a rejected long candidate never hides a valid
/// shorter one, and each occurrence must sit on word boundaries. Dotted
/// tokens are atomic: "js" is not found inside "node.js".
pub struct SkillMatcher {
    catalog: SkillCatalog,
    automaton: AhoCorasick,
    terms: Vec<String>,
    term_owner: Vec<usize>,
    single_word_terms: HashSet<String>,
}

impl SkillMatcher {
    pub fn new(catalog: SkillCatalog) -> Result<Self> {
        let mut terms = Vec::new();
        let mut term_owner = Vec::new();

        for (index, entry) in catalog.entries().iter().enumerate() {
            for term in entry.match_terms() {
                terms.push(term);
                term_owner.push(index);
            }
        }

        let automaton = AhoCorasick::builder()
            .match_kind(MatchKind::Standard)
            .build(&terms)
            .map_err(|e| {
                AtsCheckerError::Processing(format!("Failed to build skill matcher: {}", e))
            })?;

        let single_word_terms = terms
            .iter()
            .filter(|t| !t.contains(' '))
            .cloned()
            .collect();

        Ok(Self {
            catalog,
            automaton,
            terms,
            term_owner,
            single_word_terms,
        })
    }

    pub fn catalog(&self) -> &SkillCatalog {
        &self.catalog
    }

    /// All boundary-respecting occurrences in `normalized`, in text order.
    ///
    /// `normalized` must already have gone through [`normalize`].
    pub fn find_occurrences(&self, normalized: &str) -> Vec<SkillOccurrence> {
        self.automaton
            .find_overlapping_iter(normalized)
            .filter(|mat| on_word_boundary(normalized, mat.start(), mat.end()))
            .map(|mat| {
                let pattern = mat.pattern().as_usize();
                SkillOccurrence {
                    skill_index: self.term_owner[pattern],
                    term: self.terms[pattern].clone(),
                    start: mat.start(),
                    end: mat.end(),
                }
            })
            .collect()
    }

    /// Catalog indices of every skill present in `text`.
    pub fn find_skills(&self, text: &str) -> BTreeSet<usize> {
        let normalized = normalize(text);
        self.find_occurrences(&normalized)
            .into_iter()
            .map(|occurrence| occurrence.skill_index)
            .collect()
    }

    /// For each missing skill, the closest resume token at or above `threshold`.
    ///
    /// Tokens that are themselves catalog terms are skipped; they name other skills.
    /// So are tokens that extend a term ("dockerized", "reactive"): those are
    /// derived words, not typos.
    pub fn near_matches(&self, missing: &[usize], text: &str, threshold: f64) -> Vec<NearMatch> {
        let tokens: BTreeSet<String> = normalize(text)
            .split(' ')
            .map(|token| token.trim_matches(|c: char| !is_word_char(c) && c != '.'))
            .map(|token| token.trim_end_matches('.'))
            .filter(|token| token.chars().count() >= 3)
            .filter(|token| !self.single_word_terms.contains(*token))
            .map(str::to_string)
            .collect();

        let mut near = Vec::new();
        for &index in missing {
            let Some(entry) = self.catalog.get(index) else {
                continue;
            };

            let terms = entry.match_terms();
            let candidates: Vec<&String> = tokens
                .iter()
                .filter(|token| !terms.iter().any(|term| token.starts_with(term.as_str())))
                .collect();

            let mut best: Option<(f64, &String)> = None;
            for term in terms.iter().filter(|t| t.chars().count() >= 3) {
                for &token in &candidates {
                    let similarity = jaro_winkler(term, token);
                    if similarity >= threshold && best.map_or(true, |(s, _)| similarity > s) {
                        best = Some((similarity, token));
                    }
                }
            }

            if let Some((similarity, token)) = best {
                near.push(NearMatch {
                    skill: entry.name.clone(),
                    found: token.clone(),
                    similarity: (similarity * 100.0).round() / 100.0,
                });
            }
        }
        near
    }
}

fn on_word_boundary(text: &str, start: usize, end: usize) -> bool {
    let mut before = text[..start].chars().rev();
    let (prev, prev2) = (before.next(), before.next());
    let mut after = text[end..].chars();
    let (next, next2) = (after.next(), after.next());

    !continues_token(prev, prev2) && !continues_token(next, next2)
}

/// A neighbouring char extends the token if it is a word char, or a dot
/// joined to one ("node.js", "asp.net").
fn continues_token(adjacent: Option<char>, beyond: Option<char>) -> bool {
    match adjacent {
        Some('.') => beyond.map_or(false, is_word_char),
        Some(c) => is_word_char(c),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::skill_catalog::{SkillCategory, SkillEntry};

    fn names(matcher: &SkillMatcher, found: &BTreeSet<usize>) -> Vec<String> {
        found
            .iter()
            .map(|&i| matcher.catalog().entries()[i].name.clone())
            .collect()
    }

    fn languages_matcher() -> SkillMatcher {
        let catalog = SkillCatalog::new(vec![
            SkillEntry::new("C", SkillCategory::Language),
            SkillEntry::new("C++", SkillCategory::Language),
            SkillEntry::new("C#", SkillCategory::Language),
            SkillEntry::new("Java", SkillCategory::Language),
            SkillEntry::new("JavaScript", SkillCategory::Language),
            SkillEntry::new(".NET", SkillCategory::Framework),
            SkillEntry::new("Machine Learning", SkillCategory::Data).with_aliases(&["ml"]),
        ])
        .unwrap();
        SkillMatcher::new(catalog).unwrap()
    }

    #[test]
    fn test_javascript_does_not_match_java() {
        let matcher = languages_matcher();
        let found = matcher.find_skills("Five years of JavaScript.");
        assert_eq!(names(&matcher, &found), vec!["JavaScript"]);
    }

    #[test]
    fn test_both_java_and_javascript() {
        let matcher = languages_matcher();
        let found = matcher.find_skills("Java, JavaScript");
        assert_eq!(names(&matcher, &found), vec!["Java", "JavaScript"]);
    }

    #[test]
    fn test_c_family_boundaries() {
        let matcher = languages_matcher();

        let found = matcher.find_skills("Systems work in C++ and C#");
        assert_eq!(names(&matcher, &found), vec!["C++", "C#"]);

        let found = matcher.find_skills("Embedded C (ANSI)");
        assert_eq!(names(&matcher, &found), vec!["C"]);

        assert!(matcher.find_skills("JavaScript and CSS").iter().all(|&i| i != 0));
    }

    #[test]
    fn test_leading_punctuation_term() {
        let matcher = languages_matcher();

        let found = matcher.find_skills("Built services on .NET 6");
        assert_eq!(names(&matcher, &found), vec![".NET"]);

        assert!(matcher.find_skills("ASP.NET only").is_empty());
    }

    #[test]
    fn test_multi_word_terms_ignore_whitespace_and_case() {
        let matcher = languages_matcher();

        let found = matcher.find_skills("Applied MACHINE\n   learning to search ranking");
        assert_eq!(names(&matcher, &found), vec!["Machine Learning"]);

        let found = matcher.find_skills("ML pipelines");
        assert_eq!(names(&matcher, &found), vec!["Machine Learning"]);

        assert!(matcher.find_skills("HTML templates").is_empty());
    }

    #[test]
    fn test_occurrences_report_terms_and_offsets() {
        let matcher = languages_matcher();
        let text = normalize("java then ml");
        let occurrences = matcher.find_occurrences(&text);

        assert_eq!(occurrences.len(), 2);
        assert_eq!(occurrences[0].term, "java");
        assert_eq!((occurrences[0].start, occurrences[0].end), (0, 4));
        assert_eq!(occurrences[1].term, "ml");
    }

    #[test]
    fn test_builtin_aliases() {
        let matcher = SkillMatcher::new(SkillCatalog::builtin()).unwrap();
        let found = matcher.find_skills("Deployed on k8s with Postgres and Node.js backends");

        assert_eq!(
            names(&matcher, &found),
            vec!["Node.js", "Kubernetes", "PostgreSQL"]
        );
    }

    #[test]
    fn test_near_matches_flag_typos_only() {
        let matcher = SkillMatcher::new(SkillCatalog::builtin()).unwrap();
        let kubernetes = matcher
            .catalog()
            .entries()
            .iter()
            .position(|e| e.name == "Kubernetes")
            .unwrap();
        let terraform = matcher
            .catalog()
            .entries()
            .iter()
            .position(|e| e.name == "Terraform")
            .unwrap();

        let near = matcher.near_matches(
            &[kubernetes, terraform],
            "Ran Kubernets clusters. Wrote docs.",
            0.9,
        );

        assert_eq!(near.len(), 1);
        assert_eq!(near[0].skill, "Kubernetes");
        assert_eq!(near[0].found, "kubernets");
        assert!(near[0].similarity >= 0.9);
    }

    #[test]
    fn test_derived_words_are_not_near_matches() {
        let matcher = SkillMatcher::new(SkillCatalog::builtin()).unwrap();
        let missing: Vec<usize> = ["Docker", "React"]
            .iter()
            .map(|name| {
                matcher
                    .catalog()
                    .entries()
                    .iter()
                    .position(|e| e.name == *name)
                    .unwrap()
            })
            .collect();

        let near = matcher.near_matches(&missing, "Dockerized legacy services; reactive UIs", 0.9);
        assert!(near.is_empty());

        let near = matcher.near_matches(&missing, "Shipped with Dokcer", 0.9);
        assert_eq!(near.len(), 1);
        assert_eq!(near[0].found, "dokcer");
    }

    #[test]
    fn test_hyphenated_multi_word_skills() {
        let matcher = SkillMatcher::new(SkillCatalog::builtin()).unwrap();
        let found = matcher.find_skills("machine-learning, Spring-Boot and Power-BI; test-driven development");

        assert_eq!(
            names(&matcher, &found),
            vec!["Spring Boot", "Machine Learning", "TDD", "Power BI"]
        );
    }
}
