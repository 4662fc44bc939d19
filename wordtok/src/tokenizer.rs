//! Word level tokenizer backed by a vocabulary built from a training corpus.
use crate::error::{UnknownIdSnafu, UnknownTokenSnafu};
use crate::split;
use crate::{Result, TokenCodec, TokenInt, Vocabulary, VocabularyPolicy, UNK};
use snafu::OptionExt;

/// What [`VocabTokenizer::encode`] does with a token that isn't in the vocabulary.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum UnknownTokenPolicy {
    /// Fail with [`crate::WordtokError::UnknownToken`].
    #[default]
    Strict,

    /// Encode the token as the id of the reserved [`UNK`] token.
    ///
    /// If the vocabulary has no such token (as with [`VocabularyPolicy::Positional`]), unknown
    /// tokens still fail the same way they do with [`Self::Strict`].
    Substitute,
}

/// Encodes text into ids and decodes ids into text using a fixed [`Vocabulary`].
///
/// The vocabulary is owned by the tokenizer and never changes after construction.  It is
/// nonetheless validated again at the start of every encode and decode call.
#[derive(Clone, Debug)]
pub struct VocabTokenizer {
    vocab: Vocabulary,
    unknown: UnknownTokenPolicy,
}

impl VocabTokenizer {
    /// Build a tokenizer whose vocabulary comes from `corpus`, using the sorted vocabulary policy
    /// and failing on unknown tokens.
    pub fn new(corpus: &str) -> Result<Self> {
        Self::with_policy(corpus, VocabularyPolicy::Sorted)
    }

    pub fn with_policy(corpus: &str, policy: VocabularyPolicy) -> Result<Self> {
        Ok(Self::from_vocabulary(Vocabulary::build_with_policy(
            corpus, policy,
        )?))
    }

    /// Use an existing vocabulary.  It's not validated until the first encode or decode.
    pub fn from_vocabulary(vocab: Vocabulary) -> Self {
        Self {
            vocab,
            unknown: UnknownTokenPolicy::default(),
        }
    }

    pub fn with_unknown_policy(mut self, policy: UnknownTokenPolicy) -> Self {
        self.unknown = policy;
        self
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocab
    }

    pub fn unknown_policy(&self) -> UnknownTokenPolicy {
        self.unknown
    }

    /// Encode `text` into token ids.
    ///
    /// Fails if the vocabulary is malformed, if `text` is blank, or (with the strict policy) if
    /// any token of `text` is missing from the vocabulary.  Nothing is returned unless every token
    /// was encoded.
    pub fn encode(&self, text: &str) -> Result<Vec<TokenInt>> {
        self.vocab.validate()?;

        let fallback = match self.unknown {
            UnknownTokenPolicy::Strict => None,
            UnknownTokenPolicy::Substitute => self.vocab.id_for_token(UNK),
        };

        split::tokenize(text)?
            .into_iter()
            .map(|token| {
                self.vocab
                    .id_for_token(token)
                    .or(fallback)
                    .context(UnknownTokenSnafu { token })
            })
            .collect()
    }

    /// Decode token ids back into text.
    ///
    /// Tokens are separated by a single space, except in front of `, . ? ! " ( ) '`.  Fails if the
    /// vocabulary is malformed or if any id isn't in it.
    pub fn decode(&self, ids: &[TokenInt]) -> Result<String> {
        self.vocab.validate()?;

        let tokens = ids
            .iter()
            .map(|&id| self.vocab.token_for_id(id).context(UnknownIdSnafu { id }))
            .collect::<Result<Vec<_>>>()?;

        Ok(split::join_tokens(tokens))
    }
}

impl TokenCodec for VocabTokenizer {
    fn encode(&self, text: &str) -> Result<Vec<TokenInt>> {
        VocabTokenizer::encode(self, text)
    }

    fn decode(&self, ids: &[TokenInt]) -> Result<String> {
        VocabTokenizer::decode(self, ids)
    }
}
