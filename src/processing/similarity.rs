//! TF-IDF cosine similarity between the resume and the job description

use std::collections::{BTreeMap, BTreeSet};

/// Cosine similarity of the two documents' TF-IDF vectors, as a percentage
/// rounded to two decimals.
///
/// The corpus is just the two documents. Weights are raw term count times the
/// smoothed inverse document frequency `ln((1 + n) / (1 + df)) + 1`, so terms
/// shared by both documents weigh 1 and terms unique to one weigh more.
pub fn tfidf_cosine(a: &BTreeMap<String, usize>, b: &BTreeMap<String, usize>) -> f64 {
    const DOCUMENTS: f64 = 2.0;

    let vocabulary: BTreeSet<&String> = a.keys().chain(b.keys()).collect();

    let mut dot = 0.0;
    let mut norm_a = 0.0;
    let mut norm_b = 0.0;

    for term in vocabulary {
        let tf_a = a.get(term).copied().unwrap_or(0) as f64;
        let tf_b = b.get(term).copied().unwrap_or(0) as f64;
        let df = (tf_a > 0.0) as u8 as f64 + (tf_b > 0.0) as u8 as f64;
        let idf = ((1.0 + DOCUMENTS) / (1.0 + df)).ln() + 1.0;

        let weight_a = tf_a * idf;
        let weight_b = tf_b * idf;
        dot += weight_a * weight_b;
        norm_a += weight_a * weight_a;
        norm_b += weight_b * weight_b;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    let cosine = (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(0.0, 1.0);
    (cosine * 10_000.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(words: &[(&str, usize)]) -> BTreeMap<String, usize> {
        words.iter().map(|(w, c)| (w.to_string(), *c)).collect()
    }

    #[test]
    fn test_identical_documents() {
        let doc = counts(&[("rust", 2), ("kafka", 1)]);
        assert_eq!(tfidf_cosine(&doc, &doc), 100.0);
    }

    #[test]
    fn test_disjoint_documents() {
        let a = counts(&[("rust", 1)]);
        let b = counts(&[("cobol", 1)]);
        assert_eq!(tfidf_cosine(&a, &b), 0.0);
    }

    #[test]
    fn test_empty_document() {
        let a = counts(&[("rust", 1)]);
        assert_eq!(tfidf_cosine(&a, &BTreeMap::new()), 0.0);
        assert_eq!(tfidf_cosine(&BTreeMap::new(), &BTreeMap::new()), 0.0);
    }

    #[test]
    fn test_partial_overlap() {
        // shared "python" has idf 1, unique terms idf ln(1.5) + 1
        let a = counts(&[("python", 1), ("react", 1)]);
        let b = counts(&[("python", 1), ("docker", 1)]);

        let unique = 1.5f64.ln() + 1.0;
        let expected = 1.0 / (1.0 + unique * unique);
        let expected = (expected * 10_000.0).round() / 100.0;

        assert_eq!(tfidf_cosine(&a, &b), expected);
        assert!(expected > 0.0 && expected < 100.0);
    }
}
