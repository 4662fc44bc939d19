use crate::error::{ConfigParseSnafu, FileIoSnafu};
use crate::{Result, SubwordEncoding};
use serde::{Deserialize, Serialize};
use snafu::ResultExt;
use std::path::Path;

/// Settings for turning a text into batches of windowed pairs.  See
/// [`crate::create_dataloader`].
///
/// Every field has a default, so a config file only needs to mention the settings it changes.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoaderConfig {
    /// Number of pairs in each batch
    pub batch_size: usize,

    /// Window length of each input and target sequence
    pub max_len: usize,

    /// Distance between the starts of consecutive windows
    pub stride: usize,

    /// Visit the pairs in a new random order every epoch
    pub shuffle: bool,

    /// Drop the last batch of an epoch if it has fewer than `batch_size` pairs
    pub drop_last: bool,

    /// Seed for the shuffle.  Without one, every loader shuffles differently.
    pub seed: Option<u64>,

    /// The subword encoding used to tokenize the text
    pub encoding: SubwordEncoding,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            batch_size: 4,
            max_len: 256,
            stride: 128,
            shuffle: true,
            drop_last: true,
            seed: None,
            encoding: SubwordEncoding::Gpt2,
        }
    }
}

impl LoaderConfig {
    /// Read a config from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let json = std::fs::read_to_string(path).context(FileIoSnafu { path })?;

        serde_json::from_str(&json).context(ConfigParseSnafu { path })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WordtokError;
    use assert_matches::assert_matches;
    use std::io::Write;

    #[test]
    fn partial_config_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "batch_size": 8, "encoding": "cl100k_base", "seed": 42 }}"#).unwrap();

        let config = LoaderConfig::load(file.path()).unwrap();

        assert_eq!(
            LoaderConfig {
                batch_size: 8,
                encoding: SubwordEncoding::Cl100kBase,
                seed: Some(42),
                ..Default::default()
            },
            config
        );
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "num_workers": 2 }}"#).unwrap();

        assert_matches!(
            LoaderConfig::load(file.path()),
            Err(WordtokError::ConfigParse { .. })
        );
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();

        assert_matches!(
            LoaderConfig::load(dir.path().join("nope.json")),
            Err(WordtokError::FileIo { .. })
        );
    }
}
