//! Loading corpus text from the filesystem.
use crate::error::{CorpusNotFoundSnafu, FileIoSnafu};
use crate::Result;
use snafu::{ensure, ResultExt};
use std::path::Path;
use tracing::*;

/// Read the text file at `path`.
///
/// Fails with [`crate::WordtokError::CorpusNotFound`] if there is no such file.  A file that
/// isn't valid UTF-8 is still loaded, with the invalid bytes replaced by U+FFFD.
pub fn load_text(path: impl AsRef<Path>) -> Result<String> {
    let path = path.as_ref();

    ensure!(path.exists(), CorpusNotFoundSnafu { path });

    let contents = std::fs::read(path).context(FileIoSnafu { path })?;

    let text = match String::from_utf8(contents) {
        Ok(text) => text,
        Err(e) => {
            warn!(path = %path.display(),
                "Input file did not decode as clean UTF-8.   \
                Invalid bytes have been replaced with a UTF-8 placeholder sequence.   \
                The resulting tokens will not be able to precisely reproduce this file");
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    };

    debug!(path = %path.display(), bytes = text.len(), "Loaded corpus text");

    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::WordtokError;
    use assert_matches::assert_matches;
    use std::io::Write;

    #[test]
    fn loads_utf8_text() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "I HAD always thought Jack Gisburn rather a cheap genius").unwrap();

        assert_eq!(
            "I HAD always thought Jack Gisburn rather a cheap genius",
            load_text(file.path()).unwrap()
        );
    }

    #[test]
    fn replaces_invalid_utf8() {
        crate::test_helpers::init_test_logging();

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"caf\xff au lait").unwrap();

        assert_eq!("caf\u{fffd} au lait", load_text(file.path()).unwrap());
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("the-verdict.txt");

        assert_matches!(
            load_text(&path),
            Err(WordtokError::CorpusNotFound { path: missing }) if missing == path
        );
    }
}
