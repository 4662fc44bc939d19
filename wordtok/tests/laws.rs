//! Properties that must hold for any corpus and any token id stream.
use proptest::prelude::*;
use std::collections::HashSet;
use wordtok::{
    pair_count, split, windows, TokenInt, VocabTokenizer, Vocabulary, WindowedDataset, ENDOFTEXT,
    UNK,
};

/// Text built from words, punctuation and `--`, separated by optional whitespace.  Adjacent words
/// without a separator just merge into a longer word.
fn corpus() -> impl Strategy<Value = String> {
    prop::collection::vec(
        ("[a-zA-Z]{1,6}|[,.:;?_!\"()']|--", "[ \t\n]{0,2}"),
        1..40,
    )
    .prop_map(|parts| {
        parts
            .into_iter()
            .map(|(token, separator)| token + &separator)
            .collect()
    })
}

proptest! {
    #[test]
    fn decode_inverts_encode_up_to_spacing(text in corpus()) {
        let tokenizer = VocabTokenizer::new(&text).unwrap();

        let ids = tokenizer.encode(&text).unwrap();
        let decoded = tokenizer.decode(&ids).unwrap();

        prop_assert_eq!(
            split::join_tokens(split::tokenize(&text).unwrap()),
            decoded.clone()
        );

        // Decoded text tokenizes back into exactly the same tokens
        prop_assert_eq!(ids, tokenizer.encode(&decoded).unwrap());
    }

    #[test]
    fn vocabulary_is_injective_and_dense(text in corpus()) {
        let vocab = Vocabulary::build(&text).unwrap();
        let entries = vocab.entries();

        let ids = entries.iter().map(|(_, id)| *id).collect::<Vec<_>>();
        prop_assert_eq!((0..vocab.len()).collect::<Vec<_>>(), ids);

        let tokens = entries.iter().map(|(token, _)| *token).collect::<HashSet<_>>();
        prop_assert_eq!(entries.len(), tokens.len());

        let n = vocab.len() - 2;
        prop_assert_eq!(Some(n), vocab.id_for_token(ENDOFTEXT));
        prop_assert_eq!(Some(n + 1), vocab.id_for_token(UNK));

        // Corpus tokens are numbered in sorted order
        let corpus_tokens = entries[..n].iter().map(|(token, _)| *token).collect::<Vec<_>>();
        let mut sorted = corpus_tokens.clone();
        sorted.sort_unstable();
        prop_assert_eq!(sorted, corpus_tokens);
    }

    #[test]
    fn windows_shift_by_one(
        stream in prop::collection::vec(0usize..50_000, 0..200),
        window_len in 1usize..20,
        stride in 1usize..20,
    ) {
        let dataset = WindowedDataset::build(&stream, window_len, stride).unwrap();

        prop_assert_eq!(pair_count(stream.len(), window_len, stride).unwrap(), dataset.len());

        let expected_len = if stream.len() > window_len {
            (stream.len() - window_len + stride - 1) / stride
        } else {
            0
        };
        prop_assert_eq!(expected_len, dataset.len());

        for (k, pair) in dataset.iter().enumerate() {
            let start = k * stride;

            prop_assert_eq!(window_len, pair.input.len());
            prop_assert_eq!(window_len, pair.target.len());
            prop_assert_eq!(&stream[start..start + window_len], pair.input.as_slice());

            for j in 0..window_len - 1 {
                prop_assert_eq!(pair.target[j], pair.input[j + 1]);
            }
            prop_assert_eq!(pair.target[window_len - 1], stream[start + window_len]);
        }
    }

    #[test]
    fn windowing_is_deterministic(
        stream in prop::collection::vec(any::<TokenInt>(), 0..100),
        window_len in 1usize..10,
        stride in 1usize..10,
    ) {
        let first = WindowedDataset::build(&stream, window_len, stride).unwrap();
        let second = WindowedDataset::build(&stream, window_len, stride).unwrap();
        prop_assert_eq!(&first, &second);

        let lazy = windows(&stream, window_len, stride)
            .unwrap()
            .map(|(input, target)| (input.to_vec(), target.to_vec()))
            .collect::<Vec<_>>();
        let eager = first
            .into_iter()
            .map(|pair| (pair.input, pair.target))
            .collect::<Vec<_>>();
        prop_assert_eq!(eager, lazy);
    }
}
