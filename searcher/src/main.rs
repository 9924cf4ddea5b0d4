use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use newsrank::{EnglishStemmer, Stopwords};
use searcher::{
    bm25_query, load_corpus, rank_query, write_bm25_report, write_df_report, write_json_report,
    write_rank_report, write_terms_report, write_tfidf_report, RankedQuery,
};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "searcher")]
#[command(about = "Batch news retrieval: term reports, TF-IDF and BM25 ranking", long_about = None)]
struct Cli {
    /// Corpus directory of .xml news documents
    #[arg(long)]
    input: PathBuf,
    /// Comma-separated stop-word .txt file
    #[arg(long)]
    stopwords: PathBuf,
    /// Write the report to a file instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Per-document index term listing
    Terms,
    /// Corpus summary and document-frequency table
    Df,
    /// Per-document top TF-IDF weights
    Tfidf {
        /// Weights listed per document
        #[arg(long, default_value_t = 30)]
        top: usize,
    },
    /// Rank documents against queries with TF-IDF cosine
    Rank {
        /// Query string; repeat for several queries
        #[arg(long = "query", required = true)]
        queries: Vec<String>,
        /// Emit JSON instead of the text report
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Rank documents against queries with Okapi BM25
    Bm25 {
        /// Query string; repeat for several queries
        #[arg(long = "query", required = true)]
        queries: Vec<String>,
        /// Documents in the top-k summary
        #[arg(long, default_value_t = 6)]
        top: usize,
        /// Emit JSON instead of the text report
        #[arg(long, default_value_t = false)]
        json: bool,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    let stop_words = Stopwords::from_file(&cli.stopwords)?;
    let stemmer = EnglishStemmer::new();
    let corpus = load_corpus(&cli.input, &stop_words, &stemmer)?;

    let mut out: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(BufWriter::new(File::create(path)?)),
        None => Box::new(std::io::stdout().lock()),
    };

    match cli.command {
        Commands::Terms => write_terms_report(&mut out, &corpus)?,
        Commands::Df => write_df_report(&mut out, &corpus)?,
        Commands::Tfidf { top } => write_tfidf_report(&mut out, &corpus, top)?,
        Commands::Rank { queries, json } => {
            if json {
                let ranked: Vec<RankedQuery> = queries
                    .iter()
                    .map(|q| RankedQuery {
                        query: q.as_str(),
                        model: "tfidf",
                        results: rank_query(&corpus, q, &stop_words, &stemmer),
                    })
                    .collect();
                write_json_report(&mut out, &ranked)?;
            } else {
                write_rank_report(&mut out, &corpus, &queries, &stop_words, &stemmer)?;
            }
        }
        Commands::Bm25 { queries, top, json } => {
            if json {
                let ranked = queries
                    .iter()
                    .map(|q| {
                        Ok(RankedQuery {
                            query: q.as_str(),
                            model: "bm25",
                            results: bm25_query(&corpus, q, &stop_words, &stemmer)?,
                        })
                    })
                    .collect::<Result<Vec<_>>>()?;
                write_json_report(&mut out, &ranked)?;
            } else {
                write_bm25_report(&mut out, &corpus, &queries, &stop_words, &stemmer, top)?;
            }
        }
    }
    out.flush()?;
    Ok(())
}
