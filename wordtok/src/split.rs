//! The rules for breaking text into word-level tokens, and for joining tokens back into text.
//!
//! Text is split on whitespace and on a fixed set of punctuation marks.  The punctuation marks
//! are kept as tokens of their own; the whitespace is discarded.  Joining is the inverse as far as
//! it can be: tokens are separated by a single space, except that the space in front of most
//! punctuation marks is removed again.
use crate::error::InvalidInputSnafu;
use crate::Result;
use itertools::Itertools;
use once_cell::sync::Lazy;
use regex::Regex;
use snafu::ensure;

/// Matches a single delimiter.  The alternation order matters: `--` is only a delimiter as a pair,
/// and a lone `-` stays part of the surrounding word.
static DELIMITER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"[,.:;?_!"()']|--|\s"#).expect("BUG: delimiter regex is not valid")
});

/// Whitespace in front of a punctuation mark that should hug the preceding word.
static SPACE_BEFORE_PUNCTUATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"\s+([,.?!"()'])"#).expect("BUG: punctuation spacing regex is not valid")
});

/// Split `text` into tokens.
///
/// Fails with [`crate::WordtokError::InvalidInput`] if `text` has nothing in it but whitespace.
/// The returned tokens borrow from `text`.
pub fn tokenize(text: &str) -> Result<Vec<&str>> {
    ensure!(!text.trim().is_empty(), InvalidInputSnafu);

    Ok(Pieces::new(text).collect())
}

/// Join tokens back into text, restoring natural spacing around punctuation.
pub fn join_tokens<'a>(tokens: impl IntoIterator<Item = &'a str>) -> String {
    let joined = tokens.into_iter().join(" ");

    SPACE_BEFORE_PUNCTUATION
        .replace_all(&joined, "$1")
        .into_owned()
}

/// Iterator over the tokens in a piece of text.
///
/// Each step yields either the text between two delimiters or a delimiter itself, trimmed of
/// whitespace.  Pieces that are empty after trimming (whitespace delimiters, or the gap between
/// two adjacent delimiters) are skipped.
///
/// Unlike [`tokenize`] this does no validation; blank text simply yields nothing.
#[derive(Clone, Debug)]
pub struct Pieces<'a> {
    text: &'a str,

    /// Offset into `text` where the next delimiter search starts
    pos: usize,

    /// The delimiter found by the previous search, to be yielded after the text preceding it
    pending: Option<&'a str>,

    done: bool,
}

impl<'a> Pieces<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            pos: 0,
            pending: None,
            done: false,
        }
    }

    /// The next untrimmed piece, or `None` once the whole text has been consumed.
    fn next_piece(&mut self) -> Option<&'a str> {
        if let Some(delimiter) = self.pending.take() {
            return Some(delimiter);
        }

        if self.done {
            return None;
        }

        match DELIMITER.find_at(self.text, self.pos) {
            Some(m) => {
                let piece = &self.text[self.pos..m.start()];
                self.pending = Some(m.as_str());
                self.pos = m.end();
                Some(piece)
            }
            None => {
                self.done = true;
                Some(&self.text[self.pos..])
            }
        }
    }
}

impl<'a> Iterator for Pieces<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(piece) = self.next_piece() {
            let piece = piece.trim();
            if !piece.is_empty() {
                return Some(piece);
            }
        }

        None
    }
}
