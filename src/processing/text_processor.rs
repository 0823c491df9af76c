//! Text processing and normalization

use crate::error::{AtsCheckerError, Result};
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::{BTreeMap, BTreeSet, HashSet};
use unicode_segmentation::UnicodeSegmentation;

/// Lowercase, read `-`, `_` and `/` between word chars as a space, and
/// collapse every whitespace run to a single space.
///
/// Skill names, aliases and both documents go through this before matching,
/// so "Machine\n  Learning", "machine-learning" and "machine learning"
/// compare equal.
pub fn normalize(text: &str) -> String {
    let lowered = text.to_lowercase();
    let mut joined = String::with_capacity(lowered.len());
    let mut prev: Option<char> = None;
    let mut chars = lowered.chars().peekable();

    while let Some(c) = chars.next() {
        let is_joiner = matches!(c, '-' | '_' | '/')
            && prev.map_or(false, is_word_char)
            && chars.peek().map_or(false, |&next| is_word_char(next));
        joined.push(if is_joiner { ' ' } else { c });
        prev = Some(c);
    }

    joined.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Characters that continue a skill token. `+` and `#` keep "C++" and "C#"
/// from being read as "C".
pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '+' || c == '#'
}

pub struct TextProcessor {
    stop_words: HashSet<&'static str>,
    stemmer: Stemmer,
    email_regex: Regex,
    url_regex: Regex,
    min_token_len: usize,
}

impl TextProcessor {
    pub fn new(min_token_len: usize) -> Result<Self> {
        let email_regex = Regex::new(r"[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}")
            .map_err(|e| AtsCheckerError::Processing(format!("Invalid email regex: {}", e)))?;

        let url_regex = Regex::new(r"(?:https?://|www\.)[^\s]+")
            .map_err(|e| AtsCheckerError::Processing(format!("Invalid URL regex: {}", e)))?;

        Ok(Self {
            stop_words: Self::create_stop_words(),
            stemmer: Stemmer::create(Algorithm::English),
            email_regex,
            url_regex,
            min_token_len: min_token_len.max(1),
        })
    }

    /// Drop contact details and fold typographic punctuation to ASCII.
    pub fn clean_text(&self, text: &str) -> String {
        let cleaned = self.url_regex.replace_all(text, " ");
        let cleaned = self.email_regex.replace_all(&cleaned, " ");
        Self::normalize_unicode(&cleaned)
    }

    /// Keyword tokens: lowercase words without stop words, short tokens or pure numbers.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        self.clean_text(text)
            .unicode_words()
            .map(str::to_lowercase)
            .filter(|word| {
                word.chars().count() >= self.min_token_len
                    && word.chars().any(char::is_alphabetic)
                    && !self.stop_words.contains(word.as_str())
            })
            .collect()
    }

    /// Snowball stem of a lowercase token, so "pipelines" and "pipeline" agree.
    pub fn stem(&self, token: &str) -> String {
        self.stemmer.stem(token).into_owned()
    }

    /// Stem frequencies in a stable order.
    pub fn term_counts(&self, text: &str) -> BTreeMap<String, usize> {
        let mut counts = BTreeMap::new();
        for token in self.tokenize(text) {
            *counts.entry(self.stem(&token)).or_insert(0) += 1;
        }
        counts
    }

    /// The `max_keywords` most frequent stems, each shown as its most common
    /// surface form. Ties resolve alphabetically.
    pub fn extract_keywords(&self, text: &str, max_keywords: usize) -> Vec<String> {
        let mut groups: BTreeMap<String, BTreeMap<String, usize>> = BTreeMap::new();
        for token in self.tokenize(text) {
            *groups
                .entry(self.stem(&token))
                .or_default()
                .entry(token)
                .or_insert(0) += 1;
        }

        let mut keywords: Vec<(String, usize)> = groups
            .into_values()
            .filter_map(|forms| {
                let total = forms.values().sum();
                // BTreeMap order makes the alphabetically first form win ties
                let (surface, _) = forms
                    .into_iter()
                    .fold(None, |best: Option<(String, usize)>, (form, count)| match best {
                        Some((_, best_count)) if best_count >= count => best,
                        _ => Some((form, count)),
                    })?;
                Some((surface, total))
            })
            .collect();
        keywords.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        keywords
            .into_iter()
            .take(max_keywords)
            .map(|(word, _)| word)
            .collect()
    }

    /// Stems present in `text`.
    pub fn vocabulary(&self, text: &str) -> BTreeSet<String> {
        self.tokenize(text)
            .iter()
            .map(|token| self.stem(token))
            .collect()
    }

    fn normalize_unicode(text: &str) -> String {
        text.chars()
            .map(|c| match c {
                '\u{2018}' | '\u{2019}' => '\'',
                '\u{201C}' | '\u{201D}' => '"',
                '\u{2013}' | '\u{2014}' => '-',
                '\u{2022}' | '\u{25CF}' | '\u{2026}' => ' ',
                '\u{00A0}' => ' ',
                _ => c,
            })
            .collect()
    }

    /// Common English function words plus job-posting boilerplate.
    fn create_stop_words() -> HashSet<&'static str> {
        [
            "a", "about", "above", "after", "again", "against", "all", "also", "am", "an",
            "and", "any", "are", "as", "at", "be", "because", "been", "before", "being",
            "below", "between", "both", "but", "by", "can", "could", "did", "do", "does",
            "doing", "down", "during", "each", "etc", "few", "for", "from", "further", "had",
            "has", "have", "having", "he", "her", "here", "hers", "him", "his", "how", "i",
            "if", "in", "into", "is", "it", "its", "itself", "just", "me", "more", "most",
            "must", "my", "no", "nor", "not", "now", "of", "off", "on", "once", "only", "or",
            "other", "our", "ours", "out", "over", "own", "per", "same", "she", "should",
            "so", "some", "such", "than", "that", "the", "their", "them", "then", "there",
            "these", "they", "this", "those", "through", "to", "too", "under", "until", "up",
            "us", "very", "was", "we", "were", "what", "when", "where", "which", "while",
            "who", "whom", "why", "will", "with", "within", "would", "you", "your", "yours",
            // posting boilerplate
            "ability", "candidate", "candidates", "experience", "experienced", "join",
            "looking", "plus", "preferred", "required", "requirements", "responsibilities",
            "role", "seeking", "skills", "strong", "team", "using", "work", "working",
            "years", "year",
        ]
        .into_iter()
        .collect()
    }
}
