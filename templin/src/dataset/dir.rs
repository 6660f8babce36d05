use super::idx::{read_idx_images, read_idx_labels};
use super::{MnistPartition, MnistSource, Partition};
use crate::error::{Error, Result};
use flate2::read::GzDecoder;
use log::info;
use std::fs::{self, File};
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};

// CVDF mirror of http://yann.lecun.com/exdb/mnist/
const URL: &str = "https://storage.googleapis.com/cvdf-datasets/mnist/";
const TRAIN_IMAGES: &str = "train-images-idx3-ubyte";
const TRAIN_LABELS: &str = "train-labels-idx1-ubyte";
const TEST_IMAGES: &str = "t10k-images-idx3-ubyte";
const TEST_LABELS: &str = "t10k-labels-idx1-ubyte";

/// Cache directory used when none is configured.
pub const DEFAULT_DATA_DIR: &str = "datasets/mnist";

impl Partition {
    /// Names of the (decompressed) image and label idx files.
    pub fn file_names(self) -> (&'static str, &'static str) {
        match self {
            Partition::Train => (TRAIN_IMAGES, TRAIN_LABELS),
            Partition::Test => (TEST_IMAGES, TEST_LABELS),
        }
    }
}

/// MNIST idx files cached in a local directory.
///
/// Fetching a partition creates the directory when absent, then looks for each idx file,
/// falling back to its `.gz` archive and finally to a download from the CVDF mirror.
/// Two processes downloading into the same empty directory at once race with each other.
#[derive(Clone, Debug)]
pub struct MnistDir {
    root: PathBuf,
    download: bool,
}

impl MnistDir {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        MnistDir {
            root: root.into(),
            download: true,
        }
    }

    pub fn with_download(mut self, download: bool) -> Self {
        self.download = download;
        self
    }

    #[inline]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path of the decompressed idx file `name`, fetching it first if needed.
    fn ensure_file(&self, name: &str) -> Result<PathBuf> {
        let path = self.root.join(name);
        if path.exists() {
            return Ok(path);
        }
        let archive = self.root.join(format!("{name}.gz"));
        let compressed = if archive.exists() {
            info!("Decompressing {}", archive.display());
            fs::read(&archive).map_err(Error::io(&archive))?
        } else if self.download {
            download_file_as_bytes(&format!("{URL}{name}.gz"))?
        } else {
            return Err(Error::MissingFile { path });
        };
        inflate_to(&compressed, &path)?;
        Ok(path)
    }
}

impl Default for MnistDir {
    fn default() -> Self {
        MnistDir::new(DEFAULT_DATA_DIR)
    }
}

impl MnistSource for MnistDir {
    fn fetch(&self, partition: Partition) -> Result<MnistPartition> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(Error::io(&self.root))?;
        }
        let (images_name, labels_name) = partition.file_names();
        let images_path = self.ensure_file(images_name)?;
        let labels_path = self.ensure_file(labels_name)?;

        let images_file = File::open(&images_path).map_err(Error::io(&images_path))?;
        let images = read_idx_images(BufReader::new(images_file), images_name)?;
        let labels_file = File::open(&labels_path).map_err(Error::io(&labels_path))?;
        let labels = read_idx_labels(BufReader::new(labels_file), labels_name)?;

        info!(
            "Loaded {} MNIST {partition} samples from {}",
            labels.as_ref().len(),
            self.root.display()
        );
        MnistPartition::new(images, labels)
    }
}

fn download_file_as_bytes(url: &str) -> Result<Vec<u8>> {
    info!("Downloading {url}");
    let to_error = |source| Error::Download {
        url: url.to_owned(),
        source,
    };
    let response = reqwest::blocking::get(url)
        .and_then(|r| r.error_for_status())
        .map_err(to_error)?;
    let bytes = response.bytes().map_err(to_error)?;
    Ok(bytes.to_vec())
}

/// Decodes gzip content into `path`. The data is written to a sibling file first and renamed
/// once complete, so `path` never holds a partial idx file.
fn inflate_to(compressed: &[u8], path: &Path) -> Result<()> {
    let partial = path.with_extension("part");
    let mut output = File::create(&partial).map_err(Error::io(&partial))?;
    let mut decoder = GzDecoder::new(compressed);
    let copied = io::copy(&mut decoder, &mut output);
    drop(output);
    if let Err(source) = copied {
        // the decode error takes precedence over a failed cleanup
        let _ = fs::remove_file(&partial);
        return Err(Error::io(&partial)(source));
    }
    fs::rename(&partial, path).map_err(Error::io(path))
}
