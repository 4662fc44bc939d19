//! Slicing a token id stream into fixed length (input, target) training pairs with a sliding
//! window.
//!
//! A window of `window_len` ids starts at every multiple of `stride`, for as long as there is at
//! least one more id after the window.  The input is the window itself and the target is the same
//! window shifted one id to the right, so `target[j]` is the id that follows `input[j]`.
//!
//! [`windows`] yields the pairs lazily as slices of the stream.  [`WindowedDataset`] materializes
//! them, in exactly the same order, into a collection that supports indexed access.
use crate::error::InvalidWindowSnafu;
use crate::{Result, TokenCodec, TokenInt};
use snafu::ensure;
use std::iter::FusedIterator;
use tracing::*;

/// One training example: `window_len` input ids and the `window_len` ids that follow each of them.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct WindowedPair {
    pub input: Vec<TokenInt>,
    pub target: Vec<TokenInt>,
}

/// The number of pairs a stream of `stream_len` ids yields.
///
/// This is `ceil((stream_len - window_len) / stride)` when the stream is longer than one window,
/// and zero otherwise.  Fails under the same conditions as [`windows`].
pub fn pair_count(stream_len: usize, window_len: usize, stride: usize) -> Result<usize> {
    check_window(window_len, stride)?;

    Ok(count_pairs(stream_len, window_len, stride))
}

/// `stride` must already be checked to be non-zero.
fn count_pairs(stream_len: usize, window_len: usize, stride: usize) -> usize {
    match stream_len.checked_sub(window_len) {
        Some(span) if span > 0 => span / stride + usize::from(span % stride != 0),
        _ => 0,
    }
}

fn check_window(window_len: usize, stride: usize) -> Result<()> {
    ensure!(
        window_len >= 1 && stride >= 1,
        InvalidWindowSnafu { window_len, stride }
    );

    Ok(())
}

/// Iterate over the windowed pairs of `ids` without copying them.
///
/// Fails with [`crate::WordtokError::InvalidWindow`] if `window_len` or `stride` is zero.  A
/// stream no longer than `window_len` is not an error; it just has no pairs.
pub fn windows(ids: &[TokenInt], window_len: usize, stride: usize) -> Result<Windows<'_>> {
    check_window(window_len, stride)?;

    Ok(Windows {
        ids,
        window_len,
        stride,
        next_start: 0,
    })
}

/// Iterator over `(input, target)` slices of a token id stream.  See [`windows`].
///
/// A clone continues from the same position as the original.  [`Windows::restart`] goes back to
/// the first window.
#[derive(Clone, Debug)]
pub struct Windows<'a> {
    ids: &'a [TokenInt],
    window_len: usize,
    stride: usize,

    /// Offset into `ids` of the next window
    next_start: usize,
}

impl Windows<'_> {
    /// Rewind to the first window of the stream.
    pub fn restart(&mut self) {
        self.next_start = 0;
    }
}

impl<'a> Iterator for Windows<'a> {
    type Item = (&'a [TokenInt], &'a [TokenInt]);

    fn next(&mut self) -> Option<Self::Item> {
        let start = self.next_start;
        let end = start.checked_add(self.window_len)?;

        // The target needs the id at `end`, so that must exist too
        if end >= self.ids.len() {
            return None;
        }

        self.next_start = start.saturating_add(self.stride);

        Some((&self.ids[start..end], &self.ids[start + 1..end + 1]))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = count_pairs(
            self.ids.len().saturating_sub(self.next_start),
            self.window_len,
            self.stride,
        );

        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Windows<'_> {}

impl FusedIterator for Windows<'_> {}

/// All the windowed pairs of a token id stream, materialized up front.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct WindowedDataset {
    pairs: Vec<WindowedPair>,
    window_len: usize,
    stride: usize,
}

impl WindowedDataset {
    /// Slice `ids` into pairs.  Fails under the same conditions as [`windows`].
    pub fn build(ids: &[TokenInt], window_len: usize, stride: usize) -> Result<Self> {
        let pairs = windows(ids, window_len, stride)?
            .map(|(input, target)| WindowedPair {
                input: input.to_vec(),
                target: target.to_vec(),
            })
            .collect::<Vec<_>>();

        debug!(
            stream_len = ids.len(),
            window_len,
            stride,
            pairs = pairs.len(),
            "Built windowed dataset"
        );

        Ok(Self {
            pairs,
            window_len,
            stride,
        })
    }

    /// Encode `text` with `codec`, then slice the resulting ids into pairs.
    pub fn from_text<C>(text: &str, codec: &C, window_len: usize, stride: usize) -> Result<Self>
    where
        C: TokenCodec + ?Sized,
    {
        // Check the window before doing the potentially expensive encoding
        check_window(window_len, stride)?;

        let ids = codec.encode(text)?;

        Self::build(&ids, window_len, stride)
    }

    /// The number of pairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&WindowedPair> {
        self.pairs.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, WindowedPair> {
        self.pairs.iter()
    }

    pub fn pairs(&self) -> &[WindowedPair] {
        &self.pairs
    }

    pub fn window_len(&self) -> usize {
        self.window_len
    }

    pub fn stride(&self) -> usize {
        self.stride
    }
}

impl<'a> IntoIterator for &'a WindowedDataset {
    type Item = &'a WindowedPair;
    type IntoIter = std::slice::Iter<'a, WindowedPair>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.iter()
    }
}

impl IntoIterator for WindowedDataset {
    type Item = WindowedPair;
    type IntoIter = std::vec::IntoIter<WindowedPair>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.into_iter()
    }
}
