//! TF-IDF cosine similarity between two texts, as a percentage.
//!
//! Vocabulary is built over the two-document corpus only. IDF is smoothed:
//! `ln((1 + n) / (1 + df)) + 1`. Vectors are L2-normalized before the dot product.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;

use regex::Regex;

use crate::analysis::stopwords::is_stopword;

fn token_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b\w\w+\b").expect("valid regex"))
}

/// Similarity in `[0, 100]`, rounded to 2 decimals. Empty input or an empty
/// vocabulary scores 0.0.
pub fn score(text_a: &str, text_b: &str) -> f64 {
    if text_a.trim().is_empty() || text_b.trim().is_empty() {
        return 0.0;
    }

    let counts_a = term_counts(text_a);
    let counts_b = term_counts(text_b);
    if counts_a.is_empty() && counts_b.is_empty() {
        return 0.0;
    }

    let vocabulary: BTreeSet<&str> = counts_a
        .keys()
        .chain(counts_b.keys())
        .map(String::as_str)
        .collect();

    let n_docs = 2.0_f64;
    let weights = |counts: &BTreeMap<String, usize>| -> Vec<f64> {
        vocabulary
            .iter()
            .map(|term| {
                let df = [&counts_a, &counts_b]
                    .iter()
                    .filter(|c| c.contains_key(*term))
                    .count() as f64;
                let idf = ((1.0 + n_docs) / (1.0 + df)).ln() + 1.0;
                counts.get(*term).copied().unwrap_or(0) as f64 * idf
            })
            .collect()
    };

    let vec_a = l2_normalize(weights(&counts_a));
    let vec_b = l2_normalize(weights(&counts_b));

    let cosine: f64 = vec_a.iter().zip(&vec_b).map(|(a, b)| a * b).sum();
    ((cosine * 100.0 * 100.0).round() / 100.0).clamp(0.0, 100.0)
}

fn term_counts(text: &str) -> BTreeMap<String, usize> {
    let lower = text.to_lowercase();
    let mut counts = BTreeMap::new();
    for token in token_regex().find_iter(&lower).map(|m| m.as_str()) {
        if is_stopword(token) {
            continue;
        }
        *counts.entry(token.to_string()).or_insert(0) += 1;
    }
    counts
}

fn l2_normalize(mut vector: Vec<f64>) -> Vec<f64> {
    let norm = vector.iter().map(|v| v * v).sum::<f64>().sqrt();
    if norm > 0.0 {
        vector.iter_mut().for_each(|v| *v /= norm);
    }
    vector
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESUME: &str = "Experienced Python developer with skills in machine learning, \
        data analysis, and web development using Django.";
    const JD_MATCH: &str = "Looking for a Python developer with machine learning knowledge. \
        Experience with Django is a plus. Strong data analysis skills required.";
    const JD_OTHER: &str = "Seeking a graphic designer with Adobe Photoshop skills.";

    #[test]
    fn test_related_jd_scores_higher_than_unrelated() {
        let related = score(RESUME, JD_MATCH);
        let unrelated = score(RESUME, JD_OTHER);
        assert!(related > unrelated, "{related} <= {unrelated}");
        assert!(related > 0.0);
    }

    #[test]
    fn test_symmetric() {
        assert_eq!(score(RESUME, JD_MATCH), score(JD_MATCH, RESUME));
        assert_eq!(score(RESUME, JD_OTHER), score(JD_OTHER, RESUME));
    }

    #[test]
    fn test_empty_text_scores_zero() {
        assert_eq!(score("", RESUME), 0.0);
        assert_eq!(score(RESUME, ""), 0.0);
        assert_eq!(score("   ", "   "), 0.0);
    }

    #[test]
    fn test_stopword_only_texts_score_zero() {
        assert_eq!(score("the and of", "with a the"), 0.0);
    }

    #[test]
    fn test_identical_texts_score_hundred() {
        assert_eq!(score(RESUME, RESUME), 100.0);
    }

    #[test]
    fn test_disjoint_texts_score_zero() {
        assert_eq!(score("rust compiler", "watercolor painting"), 0.0);
    }

    #[test]
    fn test_rounded_to_two_decimals() {
        let s = score(RESUME, JD_MATCH);
        assert!(((s * 100.0).round() - s * 100.0).abs() < 1e-6);
        assert!((0.0..=100.0).contains(&s));
    }
}
