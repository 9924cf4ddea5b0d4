use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The stop-word collaborator only understands comma-separated `.txt`
    /// lists; anything else is refused rather than guessed at.
    #[error("stop-word list must be a comma-separated .txt file: {}", .0.display())]
    StopwordFile(PathBuf),

    /// Average document length is undefined over zero documents.
    #[error("corpus contains no documents")]
    EmptyCorpus,
}
