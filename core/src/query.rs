//! Ad hoc query parsing: the same cleaning and stemming pipeline documents
//! go through, applied to one short string.

use std::collections::HashMap;

use crate::document::count_terms;
use crate::stem::Stem;
use crate::stopwords::Stopwords;

/// Produces a stemmed term-frequency mapping for a free-text query. Unlike
/// document extraction there is no length tracking.
pub fn query_terms(
    text: &str,
    stop_words: &Stopwords,
    stemmer: &dyn Stem,
) -> HashMap<String, u64> {
    let mut terms = HashMap::new();
    count_terms(text, stop_words, stemmer, &mut terms);
    terms
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stem::EnglishStemmer;

    #[test]
    fn counts_stemmed_query_terms() {
        let stops = Stopwords::from_words(["the"]);
        let terms = query_terms("The British-Fashion Awards", &stops, &EnglishStemmer::new());
        assert_eq!(terms.get("british"), Some(&1));
        assert_eq!(terms.get("fashion"), Some(&1));
        assert_eq!(terms.get("award"), Some(&1));
        assert!(!terms.contains_key("the"));
    }
}
