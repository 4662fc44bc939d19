//! Word level tokenization and sliding window dataset construction for language model training.
//!
//! Raw text is tokenized with a [`VocabTokenizer`], whose [`Vocabulary`] is built from a training
//! corpus, or with a pretrained [`SubwordEncoder`].  Either one produces a stream of integer
//! token ids, which [`WindowedDataset`] slices into fixed length (input, target) pairs.  A
//! [`DataLoader`] can then hand those pairs out in batches.
//!
//! ```
//! use wordtok::{VocabTokenizer, WindowedDataset};
//!
//! let tokenizer = VocabTokenizer::new("Hello, do you like tea?")?;
//! let ids = tokenizer.encode("Hello, do you like tea?")?;
//! assert_eq!("Hello, do you like tea?", tokenizer.decode(&ids)?);
//!
//! let dataset = WindowedDataset::build(&ids, 4, 2)?;
//! assert_eq!(2, dataset.len());
//! # Ok::<(), wordtok::WordtokError>(())
//! ```
mod codec;
mod config;
mod corpus;
mod error;
mod loader;
pub mod split;
mod subword;
mod token;
mod tokenizer;
mod vocab;
mod window;

pub use codec::*;
pub use config::*;
pub use corpus::*;
pub use error::*;
pub use loader::*;
pub use subword::*;
pub use token::*;
pub use tokenizer::*;
pub use vocab::{Vocabulary, VocabularyPolicy};
pub use window::*;

pub type Result<T> = std::result::Result<T, WordtokError>;

#[cfg(test)]
pub mod test_helpers {
    use std::sync::OnceLock;
    use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter};

    static TRACING: OnceLock<()> = OnceLock::new();

    /// Initialize tracing for tests with a stdout subscriber.
    /// Safe to call multiple times - will only initialize once.
    pub fn init_test_logging() {
        TRACING.get_or_init(|| {
            let filter = std::env::var("RUST_LOG")
                .map(EnvFilter::new)
                .unwrap_or_else(|_| EnvFilter::new("debug"));

            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_span_events(FmtSpan::CLOSE)
                .with_test_writer()
                .try_init()
                .ok();
        });
    }
}
