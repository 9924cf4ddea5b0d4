//! Ranks corpus documents against a parsed query under two models: TF-IDF
//! cosine (dot product of L2-normalized vectors) and Okapi BM25.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::Serialize;

use crate::corpus::Corpus;
use crate::error::Result;

// Okapi constants. Fixed, not tunable at the interface.
const K1: f64 = 1.2;
const K2: f64 = 100.0;
const B: f64 = 0.75;

/// One ranked document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Scored {
    pub id: String,
    pub score: f64,
}

impl Corpus {
    /// Scores every document against a query term-frequency mapping by the
    /// dot product of normalized TF-IDF vectors. Both sides are unit-norm,
    /// so this is cosine similarity; query terms outside the corpus
    /// vocabulary contribute nothing.
    pub fn rank_tfidf(&self, query_terms: &HashMap<String, u64>) -> Vec<Scored> {
        let query = self.tfidf_vector(query_terms);
        let mut scores: Vec<Scored> = self
            .iter()
            .map(|doc| {
                let vector = self.vector(&doc.id);
                let score = query
                    .iter()
                    .map(|(term, weight)| {
                        weight
                            * vector
                                .and_then(|v| v.get(term))
                                .copied()
                                .unwrap_or(0.0)
                    })
                    .sum();
                Scored {
                    id: doc.id.clone(),
                    score,
                }
            })
            .collect();
        sort_descending(&mut scores);
        scores
    }

    /// Scores every document by Okapi BM25.
    ///
    /// The matched frequency `f` is the document's filtered term count while
    /// length normalization uses the raw pre-filter word count; the two
    /// length notions are deliberate and load-bearing for score values.
    /// Negative IDF is clamped to zero, so common terms stop contributing
    /// instead of being penalized.
    pub fn rank_bm25(&self, query_terms: &HashMap<String, u64>) -> Result<Vec<Scored>> {
        let n = self.len() as f64;
        let avg_length = self.average_length()?;
        let mut scores: Vec<Scored> = self
            .iter()
            .map(|doc| {
                let k = K1 * ((1.0 - B) + B * (doc.raw_length as f64 / avg_length));
                let score = query_terms
                    .iter()
                    .map(|(term, &qf)| {
                        let f = doc.terms.get(term).copied().unwrap_or(0) as f64;
                        let df = f64::from(self.df(term));
                        let idf = (((n - df + 0.5) / (df + 0.5)).log10()).max(0.0);
                        let qf = qf as f64;
                        idf * ((K1 + 1.0) * f) / (k + f) * ((K2 + 1.0) * qf) / (K2 + qf)
                    })
                    .sum();
                Scored {
                    id: doc.id.clone(),
                    score,
                }
            })
            .collect();
        sort_descending(&mut scores);
        Ok(scores)
    }
}

/// Descending by score. The sort is stable, so equal scores keep corpus
/// insertion order and rankings stay deterministic for a fixed input.
fn sort_descending(scores: &mut [Scored]) {
    scores.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
}
