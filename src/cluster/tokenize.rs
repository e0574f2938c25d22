//! Tokenizer and Jaccard similarity.

use std::collections::HashSet;

/// Normalized tokens of a line, used only for similarity scoring.
pub type TokenSet = HashSet<String>;

/// Extract the whitespace-delimited words made only of ASCII letters and
/// digits. Words carrying any other character are skipped whole.
pub fn tokenize(line: &str) -> TokenSet {
    line.split_whitespace()
        .filter(|word| word.bytes().all(|b| b.is_ascii_alphanumeric()))
        .map(str::to_owned)
        .collect()
}

/// `|a ∩ b| / |a ∪ b|`, or 0 when both sets are empty.
pub fn jaccard(a: &TokenSet, b: &TokenSet) -> f64 {
    ratio(a.intersection(b).count(), a.union(b).count())
}

/// Jaccard similarity between `current` and the union of `history`.
pub fn jaccard_history<'a>(
    history: impl IntoIterator<Item = &'a TokenSet>,
    current: &TokenSet,
) -> f64 {
    let past: HashSet<&str> = history
        .into_iter()
        .flat_map(|set| set.iter().map(String::as_str))
        .collect();

    let shared = current.iter().filter(|t| past.contains(t.as_str())).count();
    let union = past.len() + current.len() - shared;
    ratio(shared, union)
}

#[allow(clippy::cast_precision_loss)]
fn ratio(shared: usize, union: usize) -> f64 {
    if union == 0 {
        0.0
    } else {
        shared as f64 / union as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set(words: &[&str]) -> TokenSet {
        words.iter().map(|w| (*w).to_string()).collect()
    }

    #[test]
    fn test_tokenize_drops_punctuated_words() {
        let tokens = tokenize(r#"open("/etc/passwd", O_RDONLY) = 3 ok GET"#);
        assert_eq!(tokens, set(&["3", "ok", "GET"]));
    }

    #[test]
    fn test_tokenize_never_splits() {
        let tokens = tokenize("abc123 a-b c.d  tab\there");
        assert_eq!(tokens, set(&["abc123", "tab", "here"]));
        assert!(tokens
            .iter()
            .all(|t| !t.is_empty() && t.chars().all(|c| c.is_ascii_alphanumeric())));
    }

    #[test]
    fn test_tokenize_empty_line() {
        assert!(tokenize("   ").is_empty());
    }

    #[test]
    fn test_jaccard_identity() {
        let a = set(&["read", "3", "4096"]);
        assert!((jaccard(&a, &a) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_jaccard_empty_is_zero() {
        assert!(jaccard(&TokenSet::new(), &TokenSet::new()).abs() < f64::EPSILON);
    }

    #[test]
    fn test_jaccard_symmetric() {
        let a = set(&["a", "b", "c"]);
        let b = set(&["b", "c", "d", "e"]);
        assert!((jaccard(&a, &b) - jaccard(&b, &a)).abs() < f64::EPSILON);
        assert!((jaccard(&a, &b) - 2.0 / 5.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_jaccard_history_uses_union() {
        let history = [set(&["a", "b"]), set(&["b", "c"])];
        let current = set(&["a", "c", "z"]);
        // past = {a, b, c}; shared = {a, c}; union = {a, b, c, z}
        let score = jaccard_history(&history, &current);
        assert!((score - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_jaccard_history_empty() {
        let history: Vec<TokenSet> = Vec::new();
        assert!(jaccard_history(&history, &TokenSet::new()).abs() < f64::EPSILON);
    }
}
