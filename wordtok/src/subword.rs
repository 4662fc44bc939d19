//! Pretrained subword (byte pair encoding) tokenizers, as an alternative source of token id
//! streams for the windowed dataset.
//!
//! The encodings themselves come from `tiktoken-rs`, which embeds the token rank tables of the
//! OpenAI encodings.  Nothing here learns merges; this is only an adapter to [`TokenCodec`].
use crate::error::{TikTokenSnafu, UnknownEncodingSnafu};
use crate::{Result, TokenCodec, TokenInt};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use strum::{EnumIter, EnumString, EnumVariantNames};
use tracing::*;

/// The pretrained subword encoding to tokenize text with.
///
/// Each of these uses a BPE subword tokenizing approach, but with different sets of tokens and
/// corresponding ranks, and with a different regex for breaking up text into approximate word
/// boundaries.
#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    PartialEq,
    EnumString,
    EnumIter,
    EnumVariantNames,
    strum::Display,
    Serialize,
    Deserialize,
)]
pub enum SubwordEncoding {
    #[strum(serialize = "cl100k_base")]
    #[serde(rename = "cl100k_base")]
    Cl100kBase,
    #[strum(serialize = "gpt2")]
    #[serde(rename = "gpt2")]
    Gpt2,
    #[strum(serialize = "p50k_base")]
    #[serde(rename = "p50k_base")]
    P50kBase,
    #[strum(serialize = "p50k_edit")]
    #[serde(rename = "p50k_edit")]
    P50kEdit,
    #[strum(serialize = "r50k_base")]
    #[serde(rename = "r50k_base")]
    R50kBase,
}

impl SubwordEncoding {
    /// Look up an encoding by name, e.g. `gpt2` or `cl100k_base`.
    pub fn from_name(name: &str) -> Result<Self> {
        Self::from_str(name).map_err(|_| UnknownEncodingSnafu { encoding: name }.build())
    }
}

impl From<SubwordEncoding> for tiktoken_rs::tokenizer::Tokenizer {
    fn from(encoding: SubwordEncoding) -> Self {
        use tiktoken_rs::tokenizer::Tokenizer;

        match encoding {
            SubwordEncoding::Cl100kBase => Tokenizer::Cl100kBase,
            SubwordEncoding::Gpt2 => Tokenizer::Gpt2,
            SubwordEncoding::P50kBase => Tokenizer::P50kBase,
            SubwordEncoding::P50kEdit => Tokenizer::P50kEdit,
            SubwordEncoding::R50kBase => Tokenizer::R50kBase,
        }
    }
}

/// A loaded subword encoding.
///
/// Loading parses the embedded rank table and compiles the encoding's regex, so it's worth
/// keeping one of these around rather than making a new one for every text.
#[derive(Clone)]
pub struct SubwordEncoder {
    encoding: SubwordEncoding,
    bpe: tiktoken_rs::CoreBPE,
}

impl SubwordEncoder {
    pub fn new(encoding: SubwordEncoding) -> Result<Self> {
        let bpe = tiktoken_rs::get_bpe_from_tokenizer(encoding.into())
            .map_err(|inner| TikTokenSnafu { encoding, inner }.build())?;

        debug!(%encoding, "Loaded subword encoding");

        Ok(Self { encoding, bpe })
    }

    pub fn encoding(&self) -> SubwordEncoding {
        self.encoding
    }
}

impl fmt::Debug for SubwordEncoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubwordEncoder")
            .field("encoding", &self.encoding)
            .finish_non_exhaustive()
    }
}

impl TokenCodec for SubwordEncoder {
    /// Encode `text`, including special tokens such as `<|endoftext|>`, which are encoded as their
    /// reserved ids rather than broken up into subwords.
    fn encode(&self, text: &str) -> Result<Vec<TokenInt>> {
        Ok(self.bpe.encode_with_special_tokens(text))
    }

    fn decode(&self, ids: &[TokenInt]) -> Result<String> {
        self.bpe.decode(ids.to_vec()).map_err(|inner| {
            TikTokenSnafu {
                encoding: self.encoding,
                inner,
            }
            .build()
        })
    }
}
