//! Stemming collaborator boundary.
//!
//! The engine never constructs a stemmer itself; callers build one and pass
//! it down through term extraction and query parsing.

use rust_stemmers::{Algorithm, Stemmer};

/// Morphological reduction: an ordered sequence of lowercase words maps to
/// an equally long, ordered sequence of stems. No filtering happens here.
pub trait Stem {
    fn stem_words(&self, words: &[String]) -> Vec<String>;
}

/// English Snowball stemmer.
pub struct EnglishStemmer {
    inner: Stemmer,
}

impl EnglishStemmer {
    pub fn new() -> Self {
        Self {
            inner: Stemmer::create(Algorithm::English),
        }
    }
}

impl Default for EnglishStemmer {
    fn default() -> Self {
        Self::new()
    }
}

impl Stem for EnglishStemmer {
    fn stem_words(&self, words: &[String]) -> Vec<String> {
        words.iter().map(|w| self.inner.stem(w).to_string()).collect()
    }
}
