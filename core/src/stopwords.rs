use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::error::{Error, Result};

/// Lowercase words excluded during normalization.
#[derive(Debug, Default, Clone)]
pub struct Stopwords {
    words: HashSet<String>,
}

impl Stopwords {
    /// An empty set; nothing is filtered.
    pub fn none() -> Self {
        Self::default()
    }

    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            words: words
                .into_iter()
                .map(|w| w.as_ref().trim().to_lowercase())
                .filter(|w| !w.is_empty())
                .collect(),
        }
    }

    /// Loads the comma-separated `.txt` stop-word list format.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.extension().and_then(|e| e.to_str()) != Some("txt") {
            return Err(Error::StopwordFile(path.to_path_buf()));
        }
        let content = fs::read_to_string(path)?;
        Ok(Self::from_words(content.lines().flat_map(|line| line.split(','))))
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}
