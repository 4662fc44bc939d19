use crate::{SubwordEncoding, TokenInt};
use snafu::Snafu;
use std::path::PathBuf;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum WordtokError {
    #[snafu(display("Input text cannot be empty or whitespace only"))]
    InvalidInput,

    #[snafu(display("Vocabulary is empty or malformed: {reason}"))]
    EmptyVocabulary { reason: String },

    #[snafu(display("Token not found in vocabulary: '{token}'"))]
    UnknownToken { token: String },

    #[snafu(display("ID not found in vocabulary: {id}"))]
    UnknownId { id: TokenInt },

    #[snafu(display(
        "Window length and stride must both be at least 1 (window length {window_len}, stride {stride})"
    ))]
    InvalidWindow { window_len: usize, stride: usize },

    #[snafu(display("Batch size must be at least 1"))]
    InvalidBatchSize,

    #[snafu(display("Data file not found: {}", path.display()))]
    CorpusNotFound { path: PathBuf },

    #[snafu(display("File I/O error on file '{}'", path.display()))]
    FileIo {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display("Invalid loader configuration in '{}'", path.display()))]
    ConfigParse {
        path: PathBuf,
        source: serde_json::Error,
    },

    #[snafu(display("The encoding '{encoding}' isn't one of the supported encodings"))]
    UnknownEncoding { encoding: String },

    #[snafu(display("tiktoken failed for encoding '{encoding}': {inner}"))]
    TikToken {
        encoding: SubwordEncoding,
        inner: anyhow::Error,
    },
}
