use crate::{Result, TokenInt};

/// Anything that can turn text into a token id stream and back.
///
/// The windowed dataset builder takes one of these as a parameter instead of reaching for a
/// default tokenizer, so the same builder works with a corpus vocabulary or a pretrained subword
/// encoding.
pub trait TokenCodec {
    /// Encode `text` into token ids.
    fn encode(&self, text: &str) -> Result<Vec<TokenInt>>;

    /// Decode token ids back into text.
    fn decode(&self, ids: &[TokenInt]) -> Result<String>;
}

impl<T: TokenCodec + ?Sized> TokenCodec for &T {
    fn encode(&self, text: &str) -> Result<Vec<TokenInt>> {
        (**self).encode(text)
    }

    fn decode(&self, ids: &[TokenInt]) -> Result<String> {
        (**self).decode(ids)
    }
}

impl<T: TokenCodec + ?Sized> TokenCodec for Box<T> {
    fn encode(&self, text: &str) -> Result<Vec<TokenInt>> {
        (**self).encode(text)
    }

    fn decode(&self, ids: &[TokenInt]) -> Result<String> {
        (**self).decode(ids)
    }
}
