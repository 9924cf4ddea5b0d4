//! Per-document term extraction: walk a parsed tree, normalize and stem each
//! element's own text, and accumulate a term-frequency mapping.

use std::collections::HashMap;

use serde::Serialize;

use crate::markup::{preorder, Element};
use crate::stem::Stem;
use crate::stopwords::Stopwords;
use crate::tokenizer::normalize;

/// Tag identifying a document's root element.
pub const DOC_TAG: &str = "newsitem";
/// Attribute of [`DOC_TAG`] carrying the document identifier.
pub const ID_ATTR: &str = "itemid";

/// One corpus item: identifier, stemmed index terms and raw word count.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Document {
    /// Empty when no identifying element was present.
    pub id: String,
    pub terms: HashMap<String, u64>,
    /// Whitespace-delimited words counted before stop-word filtering. BM25
    /// length normalization uses this, not the filtered term count.
    pub raw_length: usize,
}

impl Document {
    /// Builds a document from a parsed forest.
    ///
    /// Every element contributes its own text independently of its
    /// children; text owned by a nested element is counted on that child.
    /// When several identifying elements occur, the last one visited wins.
    pub fn from_elements(roots: &[Element], stop_words: &Stopwords, stemmer: &dyn Stem) -> Self {
        let mut doc = Document::default();
        for element in preorder(roots) {
            if element.tag == DOC_TAG {
                doc.id = element
                    .attributes
                    .get(ID_ATTR)
                    .cloned()
                    .unwrap_or_default();
            }
            if !element.own_text.is_empty() {
                doc.raw_length += count_terms(&element.own_text, stop_words, stemmer, &mut doc.terms);
            }
        }
        doc
    }

    /// Total indexing-term occurrences.
    pub fn term_count(&self) -> u64 {
        self.terms.values().sum()
    }

    /// Terms by descending frequency; equal frequencies order by term.
    pub fn sorted_terms(&self) -> Vec<(&str, u64)> {
        let mut terms: Vec<(&str, u64)> =
            self.terms.iter().map(|(t, &f)| (t.as_str(), f)).collect();
        terms.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        terms
    }
}

/// Normalizes and stems one text fragment into `terms`. Empty stems are
/// discarded. Returns the raw pre-filter word count for the caller to
/// aggregate.
pub(crate) fn count_terms(
    text: &str,
    stop_words: &Stopwords,
    stemmer: &dyn Stem,
    terms: &mut HashMap<String, u64>,
) -> usize {
    let (words, raw_count) = normalize(text, stop_words);
    for stem in stemmer.stem_words(&words) {
        let stem = stem.trim();
        if !stem.is_empty() {
            *terms.entry(stem.to_string()).or_insert(0) += 1;
        }
    }
    raw_count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::markup::parse;
    use crate::stem::EnglishStemmer;

    #[test]
    fn extracts_id_and_terms() {
        let roots = parse(
            r#"<newsitem itemid="81234"><title>Fashion awards</title><text><p>Awards for fashion designers.</p></text></newsitem>"#,
        );
        let stops = Stopwords::from_words(["for"]);
        let doc = Document::from_elements(&roots, &stops, &EnglishStemmer::new());
        assert_eq!(doc.id, "81234");
        assert_eq!(doc.terms.get("award"), Some(&2));
        assert_eq!(doc.terms.get("fashion"), Some(&2));
        assert_eq!(doc.terms.get("design"), Some(&1));
        // "Fashion awards" + "Awards for fashion designers." = 6 raw words.
        assert_eq!(doc.raw_length, 6);
    }

    #[test]
    fn missing_identifier_defaults_to_empty() {
        let roots = parse("<newsitem><p>text here</p></newsitem>");
        let doc = Document::from_elements(&roots, &Stopwords::none(), &EnglishStemmer::new());
        assert_eq!(doc.id, "");
    }

    #[test]
    fn last_identifying_element_wins() {
        let roots = parse(
            r#"<newsitem itemid="1"><p>a b</p></newsitem><newsitem itemid="2"><p>c d</p></newsitem>"#,
        );
        let doc = Document::from_elements(&roots, &Stopwords::none(), &EnglishStemmer::new());
        assert_eq!(doc.id, "2");
    }

    #[test]
    fn raw_length_bounds_term_total() {
        let roots = parse("<newsitem itemid=\"7\"><p>The cat and the cat again</p></newsitem>");
        let stops = Stopwords::from_words(["the", "and"]);
        let doc = Document::from_elements(&roots, &stops, &EnglishStemmer::new());
        assert!(doc.raw_length as u64 >= doc.term_count());
    }
}
