//! Cleans raw element text into lowercase candidate tokens.
//!
//! The cleaning steps run in a fixed order; each operates on the output of
//! the previous one. The pre-filter whitespace split count is returned to
//! the caller, since document length accounting is independent of stop-word
//! filtering.

use lazy_static::lazy_static;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::stopwords::Stopwords;

lazy_static! {
    static ref URL_RE: Regex = Regex::new(r"(?i)[a-z][a-z0-9+.-]*://\S+").expect("valid regex");
    static ref COPYRIGHT_RE: Regex = Regex::new(r"(?i)\(c\)").expect("valid regex");
    static ref POSSESSIVE_RE: Regex = Regex::new(r"'s\b").expect("valid regex");
    static ref DIGIT_RE: Regex = Regex::new(r"\d+").expect("valid regex");
    static ref NON_WORD_RE: Regex = Regex::new(r"[^\w\s]").expect("valid regex");
}

/// Normalizes `text` into candidate tokens.
///
/// Returns the filtered lowercase tokens plus the count of
/// whitespace-delimited words seen before filtering.
pub fn normalize(text: &str, stop_words: &Stopwords) -> (Vec<String>, usize) {
    let text: String = text.nfkc().collect();
    let text = URL_RE.replace_all(&text, "");
    let text = COPYRIGHT_RE.replace_all(&text, "");
    let text = POSSESSIVE_RE.replace_all(&text, "");
    let text = text.replace('+', "");
    let text = text.replace("&quot;", "");
    let text = DIGIT_RE.replace_all(&text, "");
    // Punctuation separates words rather than vanishing inside them.
    let text = NON_WORD_RE.replace_all(&text, " ");

    let raw: Vec<&str> = text.split_whitespace().collect();
    let raw_count = raw.len();

    let tokens = raw
        .into_iter()
        .filter_map(|word| {
            let word = word.trim().to_lowercase();
            if word.chars().count() <= 1 || stop_words.contains(&word) {
                None
            } else {
                Some(word)
            }
        })
        .collect();

    (tokens, raw_count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cleans_urls_digits_and_punctuation() {
        let stops = Stopwords::none();
        let (tokens, _) = normalize(
            "Visit https://example.com/x for John's 3 dogs + &quot;cats&quot; (C) today!",
            &stops,
        );
        assert_eq!(tokens, vec!["visit", "for", "john", "dogs", "cats", "today"]);
    }

    #[test]
    fn raw_count_is_pre_filter() {
        let stops = Stopwords::from_words(["the"]);
        let (tokens, raw) = normalize("the cat sat on a mat", &stops);
        // "the" is a stop word and "a" is too short, but both still count.
        assert_eq!(raw, 6);
        assert_eq!(tokens, vec!["cat", "sat", "on", "mat"]);
    }

    #[test]
    fn idempotent_on_own_output() {
        let stops = Stopwords::from_words(["the", "and"]);
        let (first, _) = normalize("The CAT, and the dog's bowl: 42 bowls!", &stops);
        let rejoined = first.join(" ");
        let (second, raw) = normalize(&rejoined, &stops);
        assert_eq!(first, second);
        assert_eq!(raw, first.len());
    }

    #[test]
    fn empty_text() {
        let (tokens, raw) = normalize("", &Stopwords::none());
        assert!(tokens.is_empty());
        assert_eq!(raw, 0);
    }

    #[test]
    fn possessive_marker_is_dropped_before_punctuation_splits() {
        let (tokens, _) = normalize("Britain's", &Stopwords::none());
        assert_eq!(tokens, vec!["britain"]);
    }
}
