//! Corpus-wide statistics: document frequencies, TF-IDF vectors and length
//! accounting. Built once per batch load; read-only afterwards, so answering
//! any number of queries against the same corpus needs no locking.

use std::cmp::Ordering;
use std::collections::HashMap;

use tracing::{debug, warn};

use crate::document::Document;
use crate::error::{Error, Result};
use crate::markup;
use crate::stem::Stem;
use crate::stopwords::Stopwords;

pub struct Corpus {
    /// Document ids in insertion order; ranking tie-breaks follow it.
    order: Vec<String>,
    documents: HashMap<String, Document>,
    document_frequency: HashMap<String, u32>,
    tfidf_vectors: HashMap<String, HashMap<String, f64>>,
    total_raw_length: usize,
}

impl Corpus {
    /// Parses every raw markup document and derives the corpus statistics.
    /// A document that fails to parse degrades to an empty element forest
    /// rather than aborting the batch.
    pub fn build<I>(raw_docs: I, stop_words: &Stopwords, stemmer: &dyn Stem) -> Self
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let mut corpus = Corpus {
            order: Vec::new(),
            documents: HashMap::new(),
            document_frequency: HashMap::new(),
            tfidf_vectors: HashMap::new(),
            total_raw_length: 0,
        };

        for raw in raw_docs {
            let elements = markup::parse(raw.as_ref());
            corpus.insert(Document::from_elements(&elements, stop_words, stemmer));
        }
        debug!(
            documents = corpus.order.len(),
            total_raw_length = corpus.total_raw_length,
            "corpus loaded"
        );

        corpus.document_frequency = corpus.compute_df();
        corpus.recompute_tfidf();
        corpus
    }

    fn insert(&mut self, doc: Document) {
        let id = doc.id.clone();
        self.total_raw_length += doc.raw_length;
        if let Some(previous) = self.documents.insert(id.clone(), doc) {
            // Last write wins; the earlier document is lost. Its length must
            // not keep inflating the corpus average.
            warn!(%id, "duplicate document id, replacing earlier document");
            self.total_raw_length -= previous.raw_length;
        } else {
            self.order.push(id);
        }
    }

    fn compute_df(&self) -> HashMap<String, u32> {
        let mut df: HashMap<String, u32> = HashMap::new();
        for doc in self.iter() {
            for term in doc.terms.keys() {
                *df.entry(term.clone()).or_insert(0) += 1;
            }
        }
        df
    }

    /// Vectors derive from the document frequencies, so they are recomputed
    /// in full whenever those change. There is no incremental path.
    fn recompute_tfidf(&mut self) {
        let mut vectors = HashMap::with_capacity(self.order.len());
        for id in &self.order {
            vectors.insert(id.clone(), self.tfidf_vector(&self.documents[id].terms));
        }
        self.tfidf_vectors = vectors;
    }

    /// Embeds a term-frequency mapping into the corpus TF-IDF space:
    /// `tf = 1 + log10(f)`, `idf = log10(N / df)`, L2-normalized.
    ///
    /// Works for documents and queries alike. Terms outside the corpus
    /// vocabulary have no defined idf and are dropped. A zero-norm vector is
    /// left unnormalized.
    pub fn tfidf_vector(&self, terms: &HashMap<String, u64>) -> HashMap<String, f64> {
        let n = self.len() as f64;
        let mut weights: HashMap<String, f64> = HashMap::new();
        for (term, &freq) in terms {
            if freq == 0 {
                continue;
            }
            let Some(&df) = self.document_frequency.get(term) else {
                continue;
            };
            let tf = 1.0 + (freq as f64).log10();
            let idf = (n / df as f64).log10();
            weights.insert(term.clone(), tf * idf);
        }
        let norm = weights.values().map(|w| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for w in weights.values_mut() {
                *w /= norm;
            }
        }
        weights
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Documents in corpus insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Document> {
        self.order.iter().map(move |id| &self.documents[id])
    }

    pub fn get(&self, id: &str) -> Option<&Document> {
        self.documents.get(id)
    }

    pub fn document_frequency(&self) -> &HashMap<String, u32> {
        &self.document_frequency
    }

    /// Documents containing `term` at least once; 0 for unknown terms.
    pub fn df(&self, term: &str) -> u32 {
        self.document_frequency.get(term).copied().unwrap_or(0)
    }

    /// Document-frequency table by descending count, for reporting.
    pub fn sorted_document_frequency(&self) -> Vec<(&str, u32)> {
        let mut table: Vec<(&str, u32)> = self
            .document_frequency
            .iter()
            .map(|(t, &df)| (t.as_str(), df))
            .collect();
        table.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        table
    }

    /// A document's normalized TF-IDF vector.
    pub fn vector(&self, id: &str) -> Option<&HashMap<String, f64>> {
        self.tfidf_vectors.get(id)
    }

    /// A document's TF-IDF weights by descending weight.
    pub fn sorted_vector(&self, id: &str) -> Option<Vec<(&str, f64)>> {
        let vector = self.tfidf_vectors.get(id)?;
        let mut weights: Vec<(&str, f64)> =
            vector.iter().map(|(t, &w)| (t.as_str(), w)).collect();
        weights.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(Ordering::Equal)
                .then_with(|| a.0.cmp(b.0))
        });
        Some(weights)
    }

    pub fn total_raw_length(&self) -> usize {
        self.total_raw_length
    }

    /// Mean raw word count per document.
    pub fn average_length(&self) -> Result<f64> {
        if self.is_empty() {
            return Err(Error::EmptyCorpus);
        }
        Ok(self.total_raw_length as f64 / self.len() as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stem::EnglishStemmer;

    fn tiny_corpus() -> Corpus {
        let docs = [
            r#"<newsitem itemid="A"><p>cat cat dog</p></newsitem>"#,
            r#"<newsitem itemid="B"><p>dog dog dog</p></newsitem>"#,
        ];
        Corpus::build(docs, &Stopwords::none(), &EnglishStemmer::new())
    }

    #[test]
    fn document_frequency_counts_documents_not_occurrences() {
        let corpus = tiny_corpus();
        assert_eq!(corpus.df("cat"), 1);
        assert_eq!(corpus.df("dog"), 2);
        assert_eq!(corpus.df("ferret"), 0);
    }

    #[test]
    fn tfidf_vectors_are_unit_norm() {
        let corpus = tiny_corpus();
        let vector = corpus.vector("A").unwrap();
        let norm: f64 = vector.values().map(|w| w * w).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-9);
    }

    #[test]
    fn zero_norm_vector_stays_unnormalized() {
        // Document B only holds "dog", present everywhere: idf 0, norm 0.
        let corpus = tiny_corpus();
        let vector = corpus.vector("B").unwrap();
        assert_eq!(vector.get("dog"), Some(&0.0));
    }

    #[test]
    fn average_length_over_empty_corpus_errors() {
        let corpus = Corpus::build(
            std::iter::empty::<&str>(),
            &Stopwords::none(),
            &EnglishStemmer::new(),
        );
        assert!(matches!(corpus.average_length(), Err(Error::EmptyCorpus)));
    }

    #[test]
    fn duplicate_id_keeps_last_write_and_consistent_length() {
        let docs = [
            r#"<newsitem itemid="X"><p>one two three four</p></newsitem>"#,
            r#"<newsitem itemid="X"><p>five six</p></newsitem>"#,
        ];
        let corpus = Corpus::build(docs, &Stopwords::none(), &EnglishStemmer::new());
        assert_eq!(corpus.len(), 1);
        let doc = corpus.get("X").unwrap();
        assert!(doc.terms.contains_key("five"));
        assert!(!doc.terms.contains_key("one"));
        assert_eq!(corpus.total_raw_length(), 2);
        assert!((corpus.average_length().unwrap() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn average_length_uses_raw_counts() {
        let docs = [
            r#"<newsitem itemid="A"><p>the cat</p></newsitem>"#,
            r#"<newsitem itemid="B"><p>the dog ran</p></newsitem>"#,
        ];
        let stops = Stopwords::from_words(["the"]);
        let corpus = Corpus::build(docs, &stops, &EnglishStemmer::new());
        // 2 + 3 raw words, stop-word filtering notwithstanding.
        assert_eq!(corpus.total_raw_length(), 5);
        assert!((corpus.average_length().unwrap() - 2.5).abs() < 1e-9);
    }
}
