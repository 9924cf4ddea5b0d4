//! Batch retrieval engine over structured news markup: parse documents into
//! element trees, extract stemmed index terms, compute corpus statistics,
//! and rank documents against free-text queries (TF-IDF cosine and BM25).

pub mod corpus;
pub mod document;
pub mod error;
pub mod markup;
pub mod query;
pub mod rank;
pub mod stem;
pub mod stopwords;
pub mod tokenizer;

pub use corpus::Corpus;
pub use document::Document;
pub use error::{Error, Result};
pub use markup::Element;
pub use rank::Scored;
pub use stem::{EnglishStemmer, Stem};
pub use stopwords::Stopwords;
