/// A token in its integer form, as assigned by the vocabulary (or by a subword encoding).
///
/// This is the same width `tiktoken-rs` uses, so id streams from either tokenizer can be fed to
/// the windowed dataset builder without conversion.
pub type TokenInt = usize;

/// A token in its text form: a word, a punctuation mark, or a reserved control token.
pub type TokenString = String;

/// Reserved token marking the boundary between unrelated texts.
pub const ENDOFTEXT: &str = "<|endoftext|>";

/// Reserved token standing in for text that isn't in the vocabulary.
pub const UNK: &str = "<|unk|>";

/// The reserved tokens, in the order they're appended to a sorted vocabulary.
pub const RESERVED_TOKENS: [&str; 2] = [ENDOFTEXT, UNK];
