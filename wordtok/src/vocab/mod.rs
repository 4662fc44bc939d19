use crate::error::EmptyVocabularySnafu;
use crate::split::{self, Pieces};
use crate::token::{TokenInt, TokenString, RESERVED_TOKENS};
use crate::Result;
use snafu::ensure;
use std::collections::BTreeSet;
use tracing::*;

mod hash;

pub(crate) use hash::{TokenDecoder, TokenEncoder};

/// How ids are assigned to the tokens of a corpus when building a [`Vocabulary`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum VocabularyPolicy {
    /// Deduplicate the corpus tokens, sort them, number them from zero, then append the reserved
    /// tokens [`crate::ENDOFTEXT`] and [`crate::UNK`].
    #[default]
    Sorted,

    /// Legacy mode: each token gets the position of its *last* occurrence in the corpus.
    ///
    /// Repeated tokens overwrite the id of their earlier occurrences, so the resulting ids have
    /// gaps and no reserved tokens are added.  Only useful for reproducing vocabularies built by
    /// older tooling that worked this way.
    Positional,
}

/// A bidirectional mapping between tokens and integer ids.
///
/// A vocabulary is built once and never modified afterwards.
#[derive(Clone, Debug)]
pub struct Vocabulary {
    encode: TokenEncoder,
    decode: TokenDecoder,
}

impl Vocabulary {
    /// Build a vocabulary from `corpus` with the [`VocabularyPolicy::Sorted`] policy.
    pub fn build(corpus: &str) -> Result<Self> {
        Self::build_with_policy(corpus, VocabularyPolicy::Sorted)
    }

    /// Build a vocabulary from `corpus`.
    ///
    /// Fails with [`crate::WordtokError::InvalidInput`] if the corpus is blank.
    pub fn build_with_policy(corpus: &str, policy: VocabularyPolicy) -> Result<Self> {
        let tokens = split::tokenize(corpus)?;

        let vocab = match policy {
            VocabularyPolicy::Sorted => {
                // Reserved tokens that happen to appear literally in the corpus only get their
                // reserved id, otherwise the same token would end up with two ids
                let unique = tokens
                    .iter()
                    .copied()
                    .filter(|token| !RESERVED_TOKENS.contains(token))
                    .collect::<BTreeSet<_>>();

                Self::from_entries(
                    unique
                        .into_iter()
                        .chain(RESERVED_TOKENS)
                        .enumerate()
                        .map(|(id, token)| (token, id)),
                )
            }
            VocabularyPolicy::Positional => {
                let vocab =
                    Self::from_entries(tokens.iter().enumerate().map(|(id, token)| (*token, id)));

                let overwritten = tokens.len() - vocab.len();
                if overwritten > 0 {
                    warn!(
                        overwritten,
                        "Positional vocabulary discarded the ids of repeated tokens.  \
                        The vocabulary ids are not contiguous"
                    );
                }

                vocab
            }
        };

        debug!(
            ?policy,
            corpus_tokens = tokens.len(),
            vocab_size = vocab.len(),
            "Built vocabulary"
        );

        Ok(vocab)
    }

    /// Make a vocabulary directly out of token/id pairs.
    ///
    /// No checks are made here; a token listed twice keeps the id it was listed with last.  Call
    /// [`Self::validate`] to find out whether the result is usable.
    pub fn from_entries<S>(entries: impl IntoIterator<Item = (S, TokenInt)>) -> Self
    where
        S: Into<TokenString>,
    {
        let encode = TokenEncoder::new(entries);
        let decode = encode.invert();

        Self { encode, decode }
    }

    /// Check that this vocabulary can be used for encoding and decoding.
    ///
    /// Fails with [`crate::WordtokError::EmptyVocabulary`] if there are no entries at all, if any
    /// token is blank, or if two tokens share the same id.
    pub fn validate(&self) -> Result<()> {
        ensure!(
            !self.encode.is_empty(),
            EmptyVocabularySnafu {
                reason: "vocabulary has no entries"
            }
        );

        if let Some((token, id)) = self
            .encode
            .tokens()
            .find(|(token, _)| token.trim().is_empty())
        {
            return EmptyVocabularySnafu {
                reason: format!("token {token:?} with id {id} is blank"),
            }
            .fail();
        }

        ensure!(
            self.encode.len() == self.decode.len(),
            EmptyVocabularySnafu {
                reason: format!(
                    "{} tokens share {} ids",
                    self.encode.len(),
                    self.decode.len()
                )
            }
        );

        Ok(())
    }

    pub fn id_for_token(&self, token: &str) -> Option<TokenInt> {
        self.encode.id_for_token(token)
    }

    pub fn token_for_id(&self, id: TokenInt) -> Option<&str> {
        self.decode.token_for_id(id)
    }

    /// The number of distinct tokens in the vocabulary.
    pub fn len(&self) -> usize {
        self.encode.len()
    }

    pub fn is_empty(&self) -> bool {
        self.encode.is_empty()
    }

    /// The largest id in use, if there are any entries.
    pub fn max_id(&self) -> Option<TokenInt> {
        self.encode.tokens().map(|(_, id)| id).max()
    }

    /// All entries, ordered by ascending id.
    pub fn entries(&self) -> Vec<(&str, TokenInt)> {
        let mut entries = self
            .encode
            .tokens()
            .map(|(token, id)| (token.as_str(), id))
            .collect::<Vec<_>>();
        entries.sort_unstable_by_key(|(token, id)| (*id, *token));

        entries
    }

    /// Count the tokens of `text` that this vocabulary has no id for.
    ///
    /// Useful to check a text before encoding it with a strict tokenizer.
    pub fn count_unknown(&self, text: &str) -> usize {
        Pieces::new(text)
            .filter(|token| self.encode.id_for_token(token).is_none())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{WordtokError, ENDOFTEXT, UNK};
    use assert_matches::assert_matches;

    #[test]
    fn sorted_vocabulary_is_dense_and_ends_with_reserved_tokens() {
        let vocab = Vocabulary::build("the cat sat on the mat.").unwrap();

        assert_eq!(
            vec![
                (".", 0),
                ("cat", 1),
                ("mat", 2),
                ("on", 3),
                ("sat", 4),
                ("the", 5),
                (ENDOFTEXT, 6),
                (UNK, 7),
            ],
            vocab.entries()
        );
        assert_eq!(Some(7), vocab.max_id());
        vocab.validate().unwrap();
    }

    #[test]
    fn sorts_by_code_point() {
        let vocab = Vocabulary::build("b a B ä").unwrap();

        assert_eq!(Some(0), vocab.id_for_token("B"));
        assert_eq!(Some(1), vocab.id_for_token("a"));
        assert_eq!(Some(2), vocab.id_for_token("b"));
        assert_eq!(Some(3), vocab.id_for_token("ä"));
    }

    #[test]
    fn reserved_tokens_in_corpus_keep_only_their_reserved_id() {
        let vocab = Vocabulary::build("first <|endoftext|> second").unwrap();

        assert_eq!(4, vocab.len());
        assert_eq!(Some(2), vocab.id_for_token(ENDOFTEXT));
        assert_eq!(Some(3), vocab.id_for_token(UNK));
        vocab.validate().unwrap();
    }

    #[test]
    fn positional_vocabulary_overwrites_repeats() {
        let vocab =
            Vocabulary::build_with_policy("a b a c", VocabularyPolicy::Positional).unwrap();

        assert_eq!(vec![("b", 1), ("a", 2), ("c", 3)], vocab.entries());
        assert_eq!(None, vocab.token_for_id(0));
        assert_eq!(None, vocab.id_for_token(UNK));
        vocab.validate().unwrap();
    }

    #[test]
    fn blank_corpus_is_rejected() {
        assert_matches!(Vocabulary::build(""), Err(WordtokError::InvalidInput));
        assert_matches!(Vocabulary::build(" \n "), Err(WordtokError::InvalidInput));
    }

    #[test]
    fn validate_rejects_malformed_vocabularies() {
        let empty = Vocabulary::from_entries(Vec::<(String, TokenInt)>::new());
        assert_matches!(empty.validate(), Err(WordtokError::EmptyVocabulary { .. }));

        let blank = Vocabulary::from_entries([("ok", 0), ("  ", 1)]);
        assert_matches!(blank.validate(), Err(WordtokError::EmptyVocabulary { .. }));

        let shared = Vocabulary::from_entries([("a", 0), ("b", 0)]);
        assert_matches!(shared.validate(), Err(WordtokError::EmptyVocabulary { .. }));
    }

    #[test]
    fn counts_unknown_tokens() {
        let vocab = Vocabulary::build("Hello, world").unwrap();

        assert_eq!(0, vocab.count_unknown("world, Hello"));
        assert_eq!(2, vocab.count_unknown("Hello there, big world"));
    }
}
