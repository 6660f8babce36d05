//! MNIST access: idx decoding, the on-disk cache, batching and train/validation/test splits.

mod dir;
mod idx;
mod loader;
mod splits;

pub use dir::*;
pub use idx::*;
pub use loader::*;
pub use splits::*;

use crate::error::{Error, Result};
use crate::tensor::{Dim3, ITensor, Tensor1, Tensor3};
use crate::NUM_CLASSES;
use std::fmt::{Display, Formatter};
use std::ops::Range;

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Partition {
    Train,
    Test,
}

impl Display for Partition {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Partition::Train => "train",
            Partition::Test => "test",
        })
    }
}

/// Images and labels of one MNIST partition, as stored in the idx files.
#[derive(Clone, Debug, PartialEq)]
pub struct MnistPartition {
    images: Tensor3<u8>,
    labels: Tensor1<u8>,
}

impl MnistPartition {
    pub fn new(images: Tensor3<u8>, labels: Tensor1<u8>) -> Result<Self> {
        let count = images.dims().0;
        if count != labels.len() {
            return Err(Error::LabelCountMismatch {
                images: count,
                labels: labels.len(),
            });
        }
        if let Some((index, &label)) = labels
            .iter()
            .enumerate()
            .find(|&(_, &l)| usize::from(l) >= NUM_CLASSES)
        {
            return Err(Error::InvalidLabel { index, label });
        }
        Ok(MnistPartition { images, labels })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Pixels per image.
    #[inline]
    pub fn image_len(&self) -> usize {
        let &Dim3(_, rows, cols) = self.images.dims();
        rows * cols
    }

    #[inline]
    pub fn images(&self) -> &Tensor3<u8> {
        &self.images
    }

    #[inline]
    pub fn labels(&self) -> &Tensor1<u8> {
        &self.labels
    }

    #[inline]
    pub fn image(&self, index: usize) -> &[u8] {
        let len = self.image_len();
        &self.images.as_ref()[index * len..(index + 1) * len]
    }

    /// Copies the samples in `range` into a new partition.
    pub fn slice(&self, range: Range<usize>) -> Result<Self> {
        Ok(MnistPartition {
            images: self.images.slice_major(range.clone())?,
            labels: self.labels.slice_major(range)?,
        })
    }

    pub fn into_parts(self) -> (Tensor3<u8>, Tensor1<u8>) {
        (self.images, self.labels)
    }
}

/// Provides raw MNIST partitions. The default implementation is [`MnistDir`], which caches the
/// idx files on disk, but anything able to produce partitions can stand in for it.
pub trait MnistSource {
    fn fetch(&self, partition: Partition) -> Result<MnistPartition>;
}

/// Serves partitions that are already in memory.
#[derive(Clone, Debug)]
pub struct InMemorySource {
    train: MnistPartition,
    test: MnistPartition,
}

impl InMemorySource {
    pub fn new(train: MnistPartition, test: MnistPartition) -> Self {
        InMemorySource { train, test }
    }
}

impl MnistSource for InMemorySource {
    fn fetch(&self, partition: Partition) -> Result<MnistPartition> {
        Ok(match partition {
            Partition::Train => self.train.clone(),
            Partition::Test => self.test.clone(),
        })
    }
}

impl<S: MnistSource + ?Sized> MnistSource for &S {
    fn fetch(&self, partition: Partition) -> Result<MnistPartition> {
        (**self).fetch(partition)
    }
}

#[cfg(test)]
pub(crate) mod test {
    use super::*;
    use crate::tensor::Tensor;

    /// Partition of `count` 2x2 images where image `i` is filled with `i` and labelled `i % 10`.
    pub(crate) fn counting_partition(count: usize) -> MnistPartition {
        let images = (0..count).flat_map(|i| [i as u8; 4]).collect();
        let labels = (0..count).map(|i| (i % NUM_CLASSES) as u8).collect();
        MnistPartition::new(
            Tensor::from_vec(images, Dim3(count, 2, 2)),
            Tensor1::from_vec_1d(labels),
        )
        .unwrap()
    }

    #[test]
    fn test_label_count_mismatch() {
        let err = MnistPartition::new(Tensor::zeroed(Dim3(3, 2, 2)), Tensor1::from_vec_1d(vec![0, 1])).unwrap_err();
        assert!(matches!(err, Error::LabelCountMismatch { images: 3, labels: 2 }));
    }

    #[test]
    fn test_invalid_label() {
        let err = MnistPartition::new(Tensor::zeroed(Dim3(2, 2, 2)), Tensor1::from_vec_1d(vec![3, 10])).unwrap_err();
        assert!(matches!(err, Error::InvalidLabel { index: 1, label: 10 }));
    }

    #[test]
    fn test_slice() {
        let p = counting_partition(12);
        let s = p.slice(3..5).unwrap();
        assert_eq!(s.len(), 2);
        assert_eq!(s.image(0), &[3, 3, 3, 3]);
        assert_eq!(s.labels().as_ref(), &[3, 4]);
        assert!(p.slice(10..13).is_err());
    }

    #[test]
    fn test_in_memory_source() {
        let source = InMemorySource::new(counting_partition(6), counting_partition(2));
        assert_eq!(source.fetch(Partition::Train).unwrap().len(), 6);
        assert_eq!((&source).fetch(Partition::Test).unwrap().len(), 2);
    }
}
