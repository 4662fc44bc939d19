//! Lookup tables mapping token strings to ids and back.
//!
//! Both directions are plain hash maps keyed with the `FxHash` function, which is considerably
//! faster than the default SipHash for the short string keys a word vocabulary holds.
use crate::token::{TokenInt, TokenString};

pub use rustc_hash::FxHashMap as HashMap;

/// Maps each token string to its id in the vocabulary.
#[derive(Clone, Debug, Default)]
pub struct TokenEncoder(HashMap<TokenString, TokenInt>);

/// The reverse mapping, from an id to its token string.
#[derive(Clone, Debug, Default)]
pub struct TokenDecoder(HashMap<TokenInt, TokenString>);

impl TokenEncoder {
    /// Build an encoder from token/id pairs.  If a token appears more than once, the id that came
    /// last wins.
    pub fn new<Iter, Token, Int>(items: Iter) -> Self
    where
        Iter: IntoIterator<Item = (Token, Int)>,
        Token: Into<TokenString>,
        Int: Into<TokenInt>,
    {
        Self(
            items
                .into_iter()
                .map(|(token, id)| (token.into(), id.into()))
                .collect(),
        )
    }

    pub fn id_for_token(&self, token: &str) -> Option<TokenInt> {
        self.0.get(token).copied()
    }

    /// Invert the lookup table so the keys become the values.
    ///
    /// If two tokens share an id, only one of them survives in the decoder, which makes the
    /// decoder shorter than the encoder.
    pub fn invert(&self) -> TokenDecoder {
        TokenDecoder::new(self.0.iter().map(|(token, id)| (token.clone(), *id)))
    }

    pub fn tokens(&self) -> impl Iterator<Item = (&TokenString, TokenInt)> {
        self.0.iter().map(|(s, i)| (s, *i))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl TokenDecoder {
    pub fn new<Iter, Token, Int>(items: Iter) -> Self
    where
        Iter: IntoIterator<Item = (Token, Int)>,
        Token: Into<TokenString>,
        Int: Into<TokenInt>,
    {
        Self(
            items
                .into_iter()
                .map(|(token, id)| (id.into(), token.into()))
                .collect(),
        )
    }

    pub fn token_for_id(&self, id: TokenInt) -> Option<&str> {
        self.0.get(&id).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}
