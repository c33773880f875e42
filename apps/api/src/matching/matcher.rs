//! Resume/Profile Matcher: scores candidate text against a job's keyword set.
//!
//! Pure and deterministic. Presence is case-insensitive substring containment,
//! looser than the whole-word rule the JD analyzer applies on extraction.

use serde::{Deserialize, Serialize};

/// Matched/missing partition of a keyword set for one candidate text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KeywordMatch {
    /// 0.0 to 100.0, one decimal place
    pub score: f64,
    pub matched: Vec<String>,
    pub missing: Vec<String>,
}

/// Partitions `keywords` by presence in `candidate_text`, preserving keyword order.
pub fn match_keywords<I, S>(candidate_text: &str, keywords: I) -> KeywordMatch
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let text_lower = candidate_text.to_lowercase();
    let mut matched = Vec::new();
    let mut missing = Vec::new();

    for keyword in keywords {
        let keyword = keyword.as_ref();
        if text_lower.contains(&keyword.to_lowercase()) {
            matched.push(keyword.to_string());
        } else {
            missing.push(keyword.to_string());
        }
    }

    let score = coverage_score(matched.len(), matched.len() + missing.len());

    KeywordMatch {
        score,
        matched,
        missing,
    }
}

/// `matched / total * 100` rounded to one decimal, or 0 when there is nothing to match.
///
/// Rounding is decided on the exact binary value of the percentage with ties
/// going to the even digit, so `1 / 16` scores 6.2 rather than 6.3.
pub fn coverage_score(matched: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let percent = (matched as f64 / total as f64) * 100.0;
    round_to_tenth(percent)
}

fn round_to_tenth(value: f64) -> f64 {
    // `{:.1}` formats from the exact decimal expansion and breaks ties to even.
    format!("{value:.1}").parse().unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeSet;

    const KEYWORDS: [&str; 3] = ["Python", "AWS", "Docker"];

    #[test]
    fn test_partial_match_scores_two_thirds() {
        let result = match_keywords("I have 5 years of Python and Docker experience", KEYWORDS);
        assert_eq!(result.matched, vec!["Python", "Docker"]);
        assert_eq!(result.missing, vec!["AWS"]);
        assert_eq!(result.score, 66.7);
    }

    #[test]
    fn test_empty_keyword_set_scores_zero() {
        let result = match_keywords("Python, AWS, Docker", Vec::<String>::new());
        assert_eq!(result.score, 0.0);
        assert!(result.matched.is_empty());
        assert!(result.missing.is_empty());
    }

    #[test]
    fn test_full_match_scores_one_hundred() {
        let result = match_keywords("python aws docker", KEYWORDS);
        assert_eq!(result.score, 100.0);
        assert!(result.missing.is_empty());
    }

    #[test]
    fn test_no_match_scores_zero() {
        let result = match_keywords("Ten years of COBOL", KEYWORDS);
        assert_eq!(result.score, 0.0);
        assert_eq!(result.missing.len(), 3);
    }

    #[test]
    fn test_containment_is_looser_than_whole_word() {
        // "Go" is found inside "Google" here, unlike during JD extraction.
        let result = match_keywords("Worked at Google", ["Go"]);
        assert_eq!(result.matched, vec!["Go"]);
    }

    #[test]
    fn test_empty_candidate_text_misses_everything() {
        let result = match_keywords("", KEYWORDS);
        assert_eq!(result.missing, vec!["Python", "AWS", "Docker"]);
        assert_eq!(result.score, 0.0);
    }

    #[test]
    fn test_order_follows_keyword_set() {
        let keywords: BTreeSet<String> = ["Rust", "AWS", "Kubernetes", "Docker"]
            .iter()
            .map(|s| s.to_string())
            .collect();
        let result = match_keywords("docker, rust", &keywords);
        assert_eq!(result.matched, vec!["Docker", "Rust"]);
        assert_eq!(result.missing, vec!["AWS", "Kubernetes"]);
        assert_eq!(result.score, 50.0);
    }

    #[test]
    fn test_partition_covers_keywords_and_is_disjoint() {
        let texts = [
            "",
            "python",
            "AWS and docker and python",
            "nothing relevant at all",
            "PyThOn dOcKeR",
        ];
        for text in texts {
            let result = match_keywords(text, KEYWORDS);
            let mut union: Vec<&str> = result
                .matched
                .iter()
                .chain(result.missing.iter())
                .map(String::as_str)
                .collect();
            union.sort_unstable();
            let mut expected = KEYWORDS.to_vec();
            expected.sort_unstable();
            assert_eq!(union, expected, "union mismatch for {text:?}");
            assert!(result.matched.iter().all(|m| !result.missing.contains(m)));
            assert!((0.0..=100.0).contains(&result.score));
        }
    }

    #[test]
    fn test_coverage_score_rounds_to_one_decimal() {
        assert_eq!(coverage_score(1, 3), 33.3);
        assert_eq!(coverage_score(2, 3), 66.7);
        assert_eq!(coverage_score(1, 8), 12.5);
        assert_eq!(coverage_score(0, 0), 0.0);
        assert_eq!(coverage_score(7, 7), 100.0);
    }

    #[test]
    fn test_exact_halves_round_to_even() {
        let scores: Vec<f64> = [1, 5, 9, 13].iter().map(|&k| coverage_score(k, 16)).collect();
        assert_eq!(scores, vec![6.2, 31.2, 56.2, 81.2]);
        assert_eq!(coverage_score(3, 16), 18.8);
        assert_eq!(coverage_score(7, 16), 43.8);
    }

    #[test]
    fn test_rounding_follows_binary_value_not_decimal_literal() {
        // 0.35 and 6.35 are stored just below the half; 0.45 just above.
        assert_eq!(round_to_tenth(0.35), 0.3);
        assert_eq!(round_to_tenth(6.35), 6.3);
        assert_eq!(round_to_tenth(0.45), 0.5);
    }
}
