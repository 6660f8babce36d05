use crate::dataset::Partition;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O error on '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to decode image '{}': {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to encode image '{}': {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("failed to download {url}: {source}")]
    Download {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("invalid shape: expected {expected}, got {actual}")]
    Shape { expected: String, actual: String },
    #[error("bias must have {expected} elements, got {actual}")]
    BiasLength { expected: usize, actual: usize },
    #[error("inversion factor must lie within [0, 1], got {0}")]
    InvalidEta(f32),
    #[error("batch size must be greater than zero")]
    InvalidBatchSize,
    #[error("template canvas is flat (every pixel is {value}) and cannot be min-max normalized")]
    DegenerateImage { value: f32 },
    #[error("invalid idx data in {name}: {reason}")]
    InvalidIdx { name: String, reason: String },
    #[error("sample {index} has label {label}, expected a digit")]
    InvalidLabel { index: usize, label: u8 },
    #[error("{images} images but {labels} labels")]
    LabelCountMismatch { images: usize, labels: usize },
    #[error("'{}' does not exist and downloading is disabled", path.display())]
    MissingFile { path: PathBuf },
    #[error("requested {requested} samples from the {partition} partition, which only holds {available}")]
    SplitOutOfRange {
        partition: Partition,
        requested: usize,
        available: usize,
    },
}

impl Error {
    pub(crate) fn io<P: AsRef<Path>>(path: P) -> impl FnOnce(std::io::Error) -> Error {
        let path = path.as_ref().to_path_buf();
        move |source| Error::Io { path, source }
    }

    pub(crate) fn shape<E: ToString, A: ToString>(expected: E, actual: A) -> Error {
        Error::Shape {
            expected: expected.to_string(),
            actual: actual.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
