//! Batch driver surface: load a corpus directory plus stop-word list, then
//! write the term / document-frequency / TF-IDF reports and ranked query
//! results.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use newsrank::query::query_terms;
use newsrank::{Corpus, Scored, Stem, Stopwords};
use serde::Serialize;
use walkdir::WalkDir;

/// Reads every `.xml` file under `input` (sorted by file name, so corpus
/// iteration order is reproducible across runs) and builds the corpus.
pub fn load_corpus(input: &Path, stop_words: &Stopwords, stemmer: &dyn Stem) -> Result<Corpus> {
    let mut raw_docs = Vec::new();
    for entry in WalkDir::new(input)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
    {
        let path = entry.path();
        if path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("xml") {
            let content = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            raw_docs.push(content);
        }
    }
    tracing::info!(files = raw_docs.len(), input = %input.display(), "loading corpus");
    Ok(Corpus::build(raw_docs, stop_words, stemmer))
}

/// Per-document index term listing, descending by frequency.
pub fn write_terms_report<W: Write>(out: &mut W, corpus: &Corpus) -> Result<()> {
    for doc in corpus.iter() {
        writeln!(
            out,
            "Document {} contains {} indexing terms and has a total {} words.",
            doc.id,
            doc.term_count(),
            doc.raw_length
        )?;
        for (term, freq) in doc.sorted_terms() {
            writeln!(out, "{term} : {freq}")?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Corpus summary plus the document-frequency table, descending.
pub fn write_df_report<W: Write>(out: &mut W, corpus: &Corpus) -> Result<()> {
    let total: u64 = corpus
        .document_frequency()
        .values()
        .map(|&df| u64::from(df))
        .sum();
    writeln!(
        out,
        "There are {} documents in this data set and contains {} terms",
        corpus.len(),
        total
    )?;
    writeln!(out)?;
    writeln!(out, "The following are the terms' document-frequency:")?;
    for (term, df) in corpus.sorted_document_frequency() {
        writeln!(out, "{term} : {df}")?;
    }
    Ok(())
}

/// Per-document top-`top` TF-IDF weights, descending.
pub fn write_tfidf_report<W: Write>(out: &mut W, corpus: &Corpus, top: usize) -> Result<()> {
    for doc in corpus.iter() {
        writeln!(out, "Document {} contains {} terms", doc.id, doc.raw_length)?;
        if let Some(weights) = corpus.sorted_vector(&doc.id) {
            for (term, weight) in weights.into_iter().take(top) {
                writeln!(out, "{term} : {weight}")?;
            }
        }
        writeln!(out)?;
    }
    Ok(())
}

/// Parses `query` and ranks every document by TF-IDF cosine.
pub fn rank_query(
    corpus: &Corpus,
    query: &str,
    stop_words: &Stopwords,
    stemmer: &dyn Stem,
) -> Vec<Scored> {
    let terms: HashMap<String, u64> = query_terms(query, stop_words, stemmer);
    corpus.rank_tfidf(&terms)
}

/// Parses `query` and ranks every document by BM25.
pub fn bm25_query(
    corpus: &Corpus,
    query: &str,
    stop_words: &Stopwords,
    stemmer: &dyn Stem,
) -> Result<Vec<Scored>> {
    let terms = query_terms(query, stop_words, stemmer);
    Ok(corpus.rank_bm25(&terms)?)
}

pub fn write_rank_report<W: Write>(
    out: &mut W,
    corpus: &Corpus,
    queries: &[String],
    stop_words: &Stopwords,
    stemmer: &dyn Stem,
) -> Result<()> {
    for query in queries {
        let scores = rank_query(corpus, query, stop_words, stemmer);
        writeln!(out, "The Ranking Result for query: {query}")?;
        writeln!(out)?;
        for Scored { id, score } in scores {
            writeln!(out, "{id} : {score}")?;
        }
        writeln!(out)?;
    }
    Ok(())
}

pub fn write_bm25_report<W: Write>(
    out: &mut W,
    corpus: &Corpus,
    queries: &[String],
    stop_words: &Stopwords,
    stemmer: &dyn Stem,
    top: usize,
) -> Result<()> {
    writeln!(
        out,
        "Average document length for this collection is: {}",
        corpus.average_length()?
    )?;
    for query in queries {
        writeln!(out, "The query is: {query}")?;
        writeln!(out)?;
        let scores = bm25_query(corpus, query, stop_words, stemmer)?;
        writeln!(out, "The following are the BM25 score for each document:")?;
        for scored in &scores {
            let length = corpus.get(&scored.id).map(|d| d.raw_length).unwrap_or(0);
            writeln!(
                out,
                "Document ID: {}, Doc Length: {} -- BM25 Score: {}",
                scored.id, length, scored.score
            )?;
        }
        writeln!(out)?;
        writeln!(out, "For query \"{query}\", the top-{top} relevant documents are:")?;
        for scored in scores.iter().take(top) {
            writeln!(out, "{} {}", scored.id, scored.score)?;
        }
        writeln!(out)?;
    }
    Ok(())
}

/// One query's ranked results, for `--json` output.
#[derive(Serialize)]
pub struct RankedQuery<'a> {
    pub query: &'a str,
    pub model: &'a str,
    pub results: Vec<Scored>,
}

pub fn write_json_report<W: Write>(out: &mut W, ranked: &[RankedQuery<'_>]) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, ranked)?;
    writeln!(out)?;
    Ok(())
}
