use super::{MnistPartition, MnistSource, Partition};
use crate::error::{Error, Result};
use crate::tensor::{Tensor1, Tensor3};
use log::info;

/// Both MNIST partitions as raw `u8` images and labels.
#[derive(Clone, Debug, PartialEq)]
pub struct RawMnist {
    pub x_train: Tensor3<u8>,
    pub y_train: Tensor1<u8>,
    pub x_test: Tensor3<u8>,
    pub y_test: Tensor1<u8>,
}

pub fn load_raw<S: MnistSource + ?Sized>(source: &S) -> Result<RawMnist> {
    let (x_train, y_train) = source.fetch(Partition::Train)?.into_parts();
    let (x_test, y_test) = source.fetch(Partition::Test)?.into_parts();
    Ok(RawMnist {
        x_train,
        y_train,
        x_test,
        y_test,
    })
}

/// Training, validation and test subsets.
///
/// Validation samples directly follow the training samples in the train partition. The test
/// subset is the head of the test partition.
#[derive(Clone, Debug, PartialEq)]
pub struct MnistSplits {
    pub x_train: Tensor3<u8>,
    pub y_train: Tensor1<u8>,
    pub x_val: Tensor3<u8>,
    pub y_val: Tensor1<u8>,
    pub x_test: Tensor3<u8>,
    pub y_test: Tensor1<u8>,
}

impl MnistSplits {
    pub const DEFAULT_TRAIN: usize = 5000;
    pub const DEFAULT_VAL: usize = 500;
    pub const DEFAULT_TEST: usize = 500;
}

pub fn get_splits<S: MnistSource + ?Sized>(
    source: &S,
    num_training: usize,
    num_validation: usize,
    num_test: usize,
) -> Result<MnistSplits> {
    let train = source.fetch(Partition::Train)?;
    let test = source.fetch(Partition::Test)?;
    split_partitions(&train, &test, num_training, num_validation, num_test)
}

/// Carves the subsets out of already loaded partitions.
pub fn split_partitions(
    train: &MnistPartition,
    test: &MnistPartition,
    num_training: usize,
    num_validation: usize,
    num_test: usize,
) -> Result<MnistSplits> {
    let train_end = num_training.checked_add(num_validation).ok_or(Error::SplitOutOfRange {
        partition: Partition::Train,
        requested: usize::MAX,
        available: train.len(),
    })?;
    check_available(Partition::Train, train_end, train.len())?;
    check_available(Partition::Test, num_test, test.len())?;
    let (x_train, y_train) = train.slice(0..num_training)?.into_parts();
    let (x_val, y_val) = train.slice(num_training..train_end)?.into_parts();
    let (x_test, y_test) = test.slice(0..num_test)?.into_parts();
    info!("Split MNIST into {num_training} train, {num_validation} validation and {num_test} test samples");
    Ok(MnistSplits {
        x_train,
        y_train,
        x_val,
        y_val,
        x_test,
        y_test,
    })
}

fn check_available(partition: Partition, requested: usize, available: usize) -> Result<()> {
    if requested > available {
        return Err(Error::SplitOutOfRange {
            partition,
            requested,
            available,
        });
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::dataset::test::counting_partition;
    use crate::dataset::InMemorySource;
    use crate::tensor::{Dim3, ITensor};

    fn source(train: usize, test: usize) -> InMemorySource {
        InMemorySource::new(counting_partition(train), counting_partition(test))
    }

    #[test]
    fn test_load_raw() {
        let raw = load_raw(&source(20, 7)).unwrap();
        assert_eq!(raw.x_train.dims(), &Dim3(20, 2, 2));
        assert_eq!(raw.y_train.len(), 20);
        assert_eq!(raw.x_test.dims(), &Dim3(7, 2, 2));
        assert_eq!(raw.y_test.as_ref(), &[0, 1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_default_split_sizes() {
        let splits = get_splits(
            &InMemorySource::new(counting_partition(6000), counting_partition(1000)),
            MnistSplits::DEFAULT_TRAIN,
            MnistSplits::DEFAULT_VAL,
            MnistSplits::DEFAULT_TEST,
        )
        .unwrap();
        assert_eq!(splits.x_train.dims(), &Dim3(5000, 2, 2));
        assert_eq!(splits.y_train.len(), 5000);
        assert_eq!(splits.x_val.dims(), &Dim3(500, 2, 2));
        assert_eq!(splits.y_val.len(), 500);
        assert_eq!(splits.x_test.dims(), &Dim3(500, 2, 2));
        assert_eq!(splits.y_test.len(), 500);
    }

    #[test]
    fn test_validation_follows_training() {
        let splits = get_splits(&source(30, 10), 12, 5, 3).unwrap();
        // counting images are filled with their own index
        assert_eq!(splits.x_train.as_ref()[0], 0);
        assert_eq!(splits.x_val.as_ref()[0], 12);
        assert_eq!(splits.y_val.as_ref(), &[2, 3, 4, 5, 6]);
        assert_eq!(splits.y_test.as_ref(), &[0, 1, 2]);
    }

    #[test]
    fn test_empty_splits() {
        let splits = get_splits(&source(4, 4), 0, 0, 0).unwrap();
        assert!(splits.y_train.is_empty());
        assert!(splits.y_val.is_empty());
        assert!(splits.y_test.is_empty());
    }

    #[test]
    fn test_overflowing_request() {
        let partition = counting_partition(8);
        let err = split_partitions(&partition, &partition, usize::MAX, 1, 0).unwrap_err();
        assert!(matches!(
            err,
            Error::SplitOutOfRange {
                partition: Partition::Train,
                requested: usize::MAX,
                available: 8
            }
        ));
    }

    #[test]
    fn test_out_of_range() {
        let err = get_splits(&source(10, 10), 8, 3, 1).unwrap_err();
        assert!(matches!(
            err,
            Error::SplitOutOfRange {
                partition: Partition::Train,
                requested: 11,
                available: 10
            }
        ));
        let err = get_splits(&source(10, 10), 1, 1, 11).unwrap_err();
        assert!(matches!(
            err,
            Error::SplitOutOfRange {
                partition: Partition::Test,
                ..
            }
        ));
    }
}
