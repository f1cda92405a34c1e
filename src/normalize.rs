//! Answer canonicalization and fuzzy spelling comparison.
//!
//! Comparison must be lenient on accents, casing, whitespace, and hyphen or
//! apostrophe variants while still verifying actual spelling knowledge.

use strsim::{jaro_winkler, normalized_levenshtein};
use unicode_normalization::UnicodeNormalization;

/// Canonicalize a string for comparison: lowercase, NFD-decompose, then keep
/// only alphanumeric characters. Decomposition separates base letters from
/// combining marks, which the filter drops along with whitespace, hyphens,
/// dashes, and apostrophes in all their Unicode variants. Idempotent.
pub fn normalize(s: &str) -> String {
    s.to_lowercase()
        .nfd()
        .filter(|c| c.is_alphanumeric())
        .collect()
}

/// Character-level similarity of the normalized forms, in [0, 100].
///
/// Weighted blend of normalized Levenshtein and Jaro-Winkler; the latter is
/// weighted higher since it handles transpositions and typos better.
/// Symmetric, and 100 exactly when the normalized forms are equal.
pub fn similarity(a: &str, b: &str) -> f64 {
    let na = normalize(a);
    let nb = normalize(b);
    if na == nb {
        return 100.0;
    }
    let lev = normalized_levenshtein(&na, &nb);
    let jw = jaro_winkler(&na, &nb);
    ((lev * 0.4 + jw * 0.6) * 100.0).clamp(0.0, 100.0)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Exact,
    Near,
    Wrong,
}

/// Outcome of a spelling comparison.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpellCheck {
    pub verdict: Verdict,
    pub similarity: f64,
}

/// Compare user input against the target word. `threshold_pct` is the
/// similarity (in percent) at or above which a non-exact answer counts as a
/// near miss rather than plain wrong.
pub fn check_spelling(input: &str, target: &str, threshold_pct: f64) -> SpellCheck {
    if normalize(input) == normalize(target) {
        return SpellCheck {
            verdict: Verdict::Exact,
            similarity: 100.0,
        };
    }
    let similarity = similarity(input, target);
    let verdict = if similarity >= threshold_pct {
        Verdict::Near
    } else {
        Verdict::Wrong
    };
    SpellCheck {
        verdict,
        similarity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_is_idempotent() {
        for s in ["café-like", "Hello World", "l'été", "naïve—ish", ""] {
            let once = normalize(s);
            assert_eq!(normalize(&once), once);
        }
    }

    #[test]
    fn normalize_ignores_case_accents_and_hyphens() {
        assert_eq!(normalize("café-like"), normalize("CAFE LIKE"));
        assert_eq!(normalize("well-known"), "wellknown");
        assert_eq!(normalize("don’t"), normalize("dont"));
        assert_eq!(normalize("  Über "), "uber");
    }

    #[test]
    fn similarity_of_identical_strings_is_100() {
        for s in ["a", "necessary", "Café", "two words"] {
            assert_eq!(similarity(s, s), 100.0);
        }
    }

    #[test]
    fn similarity_is_symmetric() {
        let pairs = [
            ("necessary", "neccessary"),
            ("cat", "dog"),
            ("receive", "recieve"),
        ];
        for (a, b) in pairs {
            assert_eq!(similarity(a, b), similarity(b, a));
        }
    }

    #[test]
    fn exact_match_ignores_surface_differences() {
        let check = check_spelling("CAFE like", "café-like", 85.0);
        assert_eq!(check.verdict, Verdict::Exact);
        assert_eq!(check.similarity, 100.0);
    }

    #[test]
    fn close_misspelling_is_a_near_miss() {
        let check = check_spelling("neccessary", "necessary", 85.0);
        assert_eq!(check.verdict, Verdict::Near);
        assert!(check.similarity >= 85.0);
        assert!(check.similarity < 100.0);
    }

    #[test]
    fn unrelated_answer_is_wrong() {
        let check = check_spelling("banana", "necessary", 70.0);
        assert_eq!(check.verdict, Verdict::Wrong);
        assert!(check.similarity < 70.0);
    }
}
