//! Grouping the pairs of a [`WindowedDataset`] into batches, one epoch at a time.
//!
//! The loader is single threaded.  Each call to [`DataLoader::batches`] is one pass over the
//! dataset; with shuffling enabled, every pass visits the pairs in a new order.
use crate::error::InvalidBatchSizeSnafu;
use crate::{LoaderConfig, Result, SubwordEncoder, TokenInt, WindowedDataset, WindowedPair};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use snafu::ensure;
use tracing::*;

/// A batch of pairs borrowed from the loader's dataset.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Batch<'a> {
    pairs: Vec<&'a WindowedPair>,
}

impl<'a> Batch<'a> {
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn pairs(&self) -> &[&'a WindowedPair] {
        &self.pairs
    }

    /// The input sequences of the batch, one per pair.
    pub fn inputs(&self) -> impl Iterator<Item = &'a [TokenInt]> + '_ {
        self.pairs.iter().map(|&pair| pair.input.as_slice())
    }

    /// The target sequences of the batch, one per pair.
    pub fn targets(&self) -> impl Iterator<Item = &'a [TokenInt]> + '_ {
        self.pairs.iter().map(|&pair| pair.target.as_slice())
    }
}

/// Owns a dataset and hands out its pairs in batches.
#[derive(Debug)]
pub struct DataLoader {
    dataset: WindowedDataset,
    batch_size: usize,
    shuffle: bool,
    drop_last: bool,
    rng: StdRng,
}

impl DataLoader {
    /// Wrap `dataset` using the batching settings of `config`.  The window settings of `config`
    /// aren't used; the dataset is already windowed.
    ///
    /// Fails with [`crate::WordtokError::InvalidBatchSize`] if the batch size is zero.
    pub fn new(dataset: WindowedDataset, config: &LoaderConfig) -> Result<Self> {
        ensure!(config.batch_size >= 1, InvalidBatchSizeSnafu);

        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let loader = Self {
            dataset,
            batch_size: config.batch_size,
            shuffle: config.shuffle,
            drop_last: config.drop_last,
            rng,
        };

        debug!(
            pairs = loader.dataset.len(),
            batch_size = loader.batch_size,
            shuffle = loader.shuffle,
            drop_last = loader.drop_last,
            batches = loader.num_batches(),
            "Created data loader"
        );

        Ok(loader)
    }

    pub fn dataset(&self) -> &WindowedDataset {
        &self.dataset
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// How many batches each epoch yields.
    pub fn num_batches(&self) -> usize {
        let pairs = self.dataset.len();

        if self.drop_last {
            pairs / self.batch_size
        } else {
            pairs.div_ceil(self.batch_size)
        }
    }

    /// Start an epoch.
    pub fn batches(&mut self) -> Batches<'_> {
        let mut order = (0..self.dataset.len()).collect::<Vec<_>>();
        if self.shuffle {
            order.shuffle(&mut self.rng);
        }

        Batches {
            dataset: &self.dataset,
            order,
            pos: 0,
            batch_size: self.batch_size,
            drop_last: self.drop_last,
        }
    }
}

/// Iterator over the batches of one epoch.  See [`DataLoader::batches`].
#[derive(Debug)]
pub struct Batches<'a> {
    dataset: &'a WindowedDataset,

    /// Indices into `dataset`, in the order this epoch visits them
    order: Vec<usize>,

    pos: usize,
    batch_size: usize,
    drop_last: bool,
}

impl<'a> Iterator for Batches<'a> {
    type Item = Batch<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let remaining = self.order.len() - self.pos;
        if remaining == 0 || (self.drop_last && remaining < self.batch_size) {
            return None;
        }

        let end = self.pos + remaining.min(self.batch_size);
        let pairs = self.order[self.pos..end]
            .iter()
            .filter_map(|&index| self.dataset.get(index))
            .collect::<Vec<_>>();
        self.pos = end;

        trace!(size = pairs.len(), "Yielding batch");

        Some(Batch { pairs })
    }
}

/// Tokenize `text` with the subword encoding named in `config`, slice it into windowed pairs and
/// wrap those in a [`DataLoader`].
pub fn create_dataloader(text: &str, config: &LoaderConfig) -> Result<DataLoader> {
    let encoder = SubwordEncoder::new(config.encoding)?;
    let dataset = WindowedDataset::from_text(text, &encoder, config.max_len, config.stride)?;

    DataLoader::new(dataset, config)
}
