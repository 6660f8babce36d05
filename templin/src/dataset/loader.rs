use super::{MnistPartition, MnistSource, Partition};
use crate::error::{Error, Result};
use crate::tensor::{Dim2, Tensor, Tensor2};
use log::debug;
use rand::seq::SliceRandom;
use rand::Rng;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Per-pixel standardization `(pixel / 255 - mean) / std` applied to loaded images.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Standardization {
    pub mean: f32,
    pub std: f32,
}

impl Standardization {
    /// Corpus-wide MNIST mean and standard deviation.
    pub const MNIST: Standardization = Standardization {
        mean: 0.1307,
        std: 0.3081,
    };

    /// Only scales pixels into [0, 1].
    pub const UNIT: Standardization = Standardization { mean: 0.0, std: 1.0 };

    #[inline]
    pub fn apply(&self, pixel: u8) -> f32 {
        (f32::from(pixel) / 255.0 - self.mean) / self.std
    }
}

impl Default for Standardization {
    fn default() -> Self {
        Standardization::MNIST
    }
}

/// A run of flattened, standardized images with their labels.
#[derive(Clone, Debug)]
pub struct Batch {
    images: Tensor2<f32>,
    labels: Vec<u8>,
}

impl Batch {
    #[inline]
    pub fn images(&self) -> &Tensor2<f32> {
        &self.images
    }

    #[inline]
    pub fn labels(&self) -> &[u8] {
        &self.labels
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Splits a partition into batches, in storage order unless shuffled.
#[derive(Clone, Debug)]
pub struct DataLoader {
    partition: MnistPartition,
    batch_size: usize,
    standardization: Standardization,
    order: Option<Vec<usize>>,
}

impl DataLoader {
    pub fn new(partition: MnistPartition, batch_size: usize) -> Result<Self> {
        if batch_size == 0 {
            return Err(Error::InvalidBatchSize);
        }
        Ok(DataLoader {
            partition,
            batch_size,
            standardization: Standardization::default(),
            order: None,
        })
    }

    pub fn with_standardization(mut self, standardization: Standardization) -> Self {
        self.standardization = standardization;
        self
    }

    /// Visits the samples in a random order drawn from `rng`.
    pub fn shuffled<R: Rng>(mut self, rng: &mut R) -> Self {
        let mut order: Vec<usize> = (0..self.partition.len()).collect();
        order.shuffle(rng);
        self.order = Some(order);
        self
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.partition.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.partition.is_empty()
    }

    #[inline]
    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    #[inline]
    pub fn num_batches(&self) -> usize {
        self.len().div_ceil(self.batch_size)
    }

    /// Pixels per flattened image.
    #[inline]
    pub fn input_size(&self) -> usize {
        self.partition.image_len()
    }

    pub fn iter(&self) -> Batches<'_> {
        Batches { loader: self, next: 0 }
    }

    fn sample_index(&self, position: usize) -> usize {
        match &self.order {
            Some(order) => order[position],
            None => position,
        }
    }

    fn batch(&self, positions: std::ops::Range<usize>) -> Batch {
        let input_size = self.input_size();
        let mut images = Vec::with_capacity(positions.len() * input_size);
        let mut labels = Vec::with_capacity(positions.len());
        for position in positions {
            let index = self.sample_index(position);
            images.extend(self.partition.image(index).iter().map(|&p| self.standardization.apply(p)));
            labels.push(self.partition.labels()[index]);
        }
        Batch {
            images: Tensor::from_vec(images, Dim2(labels.len(), input_size)),
            labels,
        }
    }
}

pub struct Batches<'a> {
    loader: &'a DataLoader,
    next: usize,
}

impl<'a> Iterator for Batches<'a> {
    type Item = Batch;

    fn next(&mut self) -> Option<Self::Item> {
        let len = self.loader.len();
        if self.next >= len {
            return None;
        }
        let end = (self.next + self.loader.batch_size).min(len);
        debug!("Loading samples {}..{end} of {len}", self.next);
        let batch = self.loader.batch(self.next..end);
        self.next = end;
        Some(batch)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.loader.len() - self.next).div_ceil(self.loader.batch_size);
        (remaining, Some(remaining))
    }
}

impl<'a> ExactSizeIterator for Batches<'a> {}

impl<'a> IntoIterator for &'a DataLoader {
    type Item = Batch;
    type IntoIter = Batches<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Order-preserving loader over the test partition with MNIST standardization.
pub fn test_loader<S: MnistSource + ?Sized>(source: &S, batch_size: usize) -> Result<DataLoader> {
    DataLoader::new(source.fetch(Partition::Test)?, batch_size)
}
